//! Domain types representing expense categories and their hierarchy.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::common::*;

/// Labels expenses for filtering and reporting.
///
/// The hierarchy is stored as a non-owning `parent_id` key; subcategory lists are
/// derived by [`CategoryArena`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub color: String,
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl Category {
    pub fn new(name: impl Into<String>, color: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            user_id: DEFAULT_USER_ID.to_string(),
            name: name.into(),
            color: color.into(),
            icon: icon.into(),
            parent_id: None,
        }
    }

    pub fn for_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn is_subcategory(&self) -> bool {
        self.parent_id.is_some()
    }
}

impl Identifiable for Category {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Arena of categories indexed by identifier.
///
/// Parent links are keys, and each parent's subcategory list holds keys in
/// insertion order, so navigation works in both directions without shared
/// ownership. Only direct self-reference is rejected; longer cycles are not
/// detected.
#[derive(Debug, Clone, Default)]
pub struct CategoryArena {
    nodes: Vec<Category>,
    index: HashMap<String, usize>,
    children: HashMap<String, Vec<String>>,
}

impl CategoryArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the arena from flat records. Duplicate identifiers keep the first record.
    pub fn from_categories(categories: impl IntoIterator<Item = Category>) -> Self {
        let mut arena = Self::new();
        for category in categories {
            arena.insert(category);
        }
        arena
    }

    /// Inserts a category, returning `false` when its identifier is already present.
    pub fn insert(&mut self, mut category: Category) -> bool {
        if self.index.contains_key(&category.id) {
            return false;
        }
        if category.parent_id.as_deref() == Some(category.id.as_str()) {
            category.parent_id = None;
        }
        if let Some(parent) = category.parent_id.as_ref() {
            self.children
                .entry(parent.clone())
                .or_default()
                .push(category.id.clone());
        }
        self.index.insert(category.id.clone(), self.nodes.len());
        self.nodes.push(category);
        true
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn categories(&self) -> &[Category] {
        &self.nodes
    }

    pub fn into_categories(self) -> Vec<Category> {
        self.nodes
    }

    pub fn get(&self, id: &str) -> Option<&Category> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Category> {
        self.nodes.iter().find(|category| category.name == name)
    }

    pub fn parent(&self, id: &str) -> Option<&Category> {
        let parent_id = self.get(id)?.parent_id.as_deref()?;
        self.get(parent_id)
    }

    pub fn subcategory_ids(&self, id: &str) -> &[String] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn subcategories(&self, id: &str) -> Vec<&Category> {
        self.subcategory_ids(id)
            .iter()
            .filter_map(|child| self.get(child))
            .collect()
    }

    /// Categories without a resolvable parent, in insertion order.
    pub fn roots(&self) -> Vec<&Category> {
        self.nodes
            .iter()
            .filter(|category| {
                category
                    .parent_id
                    .as_deref()
                    .map_or(true, |parent| !self.index.contains_key(parent))
            })
            .collect()
    }

    /// Attaches `child_id` under `parent_id`, detaching it from any previous parent.
    ///
    /// Returns `false` without changes when either key is unknown or both keys match.
    pub fn add_subcategory(&mut self, parent_id: &str, child_id: &str) -> bool {
        if parent_id == child_id
            || !self.index.contains_key(parent_id)
            || !self.index.contains_key(child_id)
        {
            return false;
        }
        self.detach(child_id);
        if let Some(&idx) = self.index.get(child_id) {
            self.nodes[idx].parent_id = Some(parent_id.to_string());
        }
        self.children
            .entry(parent_id.to_string())
            .or_default()
            .push(child_id.to_string());
        true
    }

    /// Detaches `child_id` from `parent_id`. Returns `false` when it was not attached there.
    pub fn remove_subcategory(&mut self, parent_id: &str, child_id: &str) -> bool {
        let attached = self
            .get(child_id)
            .and_then(|child| child.parent_id.as_deref())
            == Some(parent_id);
        if !attached {
            return false;
        }
        self.detach(child_id);
        true
    }

    fn detach(&mut self, child_id: &str) {
        let Some(&idx) = self.index.get(child_id) else {
            return;
        };
        if let Some(previous) = self.nodes[idx].parent_id.take() {
            if let Some(siblings) = self.children.get_mut(&previous) {
                siblings.retain(|id| id != child_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena() -> (CategoryArena, String, String) {
        let food = Category::new("Food", "#FF0000", "food_icon");
        let snacks = Category::new("Snacks", "#FFFFFF", "default_icon");
        let (food_id, snacks_id) = (food.id.clone(), snacks.id.clone());
        (
            CategoryArena::from_categories([food, snacks]),
            food_id,
            snacks_id,
        )
    }

    #[test]
    fn subcategory_links_are_navigable_both_ways() {
        let (mut arena, food, snacks) = arena();
        assert!(arena.add_subcategory(&food, &snacks));

        assert_eq!(arena.parent(&snacks).map(|c| c.name.as_str()), Some("Food"));
        let names: Vec<_> = arena.subcategories(&food).iter().map(|c| c.name.clone()).collect();
        assert_eq!(names, vec!["Snacks".to_string()]);
        assert!(arena.get(&snacks).unwrap().is_subcategory());
        assert_eq!(arena.roots().len(), 1);
    }

    #[test]
    fn self_reference_is_ignored() {
        let (mut arena, food, _) = arena();
        assert!(!arena.add_subcategory(&food, &food));
        assert!(arena.get(&food).unwrap().parent_id.is_none());
        assert!(arena.subcategory_ids(&food).is_empty());
    }

    #[test]
    fn reparenting_moves_child() {
        let (mut arena, food, snacks) = arena();
        let treats = Category::new("Treats", "#000000", "default_icon");
        let treats_id = treats.id.clone();
        arena.insert(treats);

        arena.add_subcategory(&food, &snacks);
        arena.add_subcategory(&treats_id, &snacks);

        assert!(arena.subcategory_ids(&food).is_empty());
        assert_eq!(arena.subcategory_ids(&treats_id), &[snacks.clone()]);
        assert!(arena.remove_subcategory(&treats_id, &snacks));
        assert!(!arena.remove_subcategory(&treats_id, &snacks));
        assert!(arena.parent(&snacks).is_none());
    }

    #[test]
    fn from_categories_rebuilds_children_from_parent_keys() {
        let parent = Category::new("Bills", "#FFA500", "utilities_icon");
        let mut child = Category::new("Power", "#FFA500", "utilities_icon");
        child.parent_id = Some(parent.id.clone());
        let parent_id = parent.id.clone();

        let arena = CategoryArena::from_categories([parent, child]);
        assert_eq!(arena.subcategories(&parent_id).len(), 1);
    }
}
