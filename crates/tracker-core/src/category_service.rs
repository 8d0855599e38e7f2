//! Category bootstrapping, naming and hierarchy maintenance.

use tracing::info;
use tracker_domain::{Category, CategoryArena};

use crate::{validation::validate_category_name, CoreError, CoreResult, RecordStore};

/// Name, color and icon of the categories seeded into an empty store.
pub const DEFAULT_CATEGORIES: [(&str, &str, &str); 5] = [
    ("Food", "#FF0000", "food_icon"),
    ("Transport", "#00FF00", "transport_icon"),
    ("School", "#0000FF", "school_icon"),
    ("Utilities", "#FFA500", "utilities_icon"),
    ("Entertainment", "#800080", "entertainment_icon"),
];

pub const NEW_CATEGORY_COLOR: &str = "#FFFFFF";
pub const NEW_CATEGORY_ICON: &str = "default_icon";

pub struct CategoryService;

impl CategoryService {
    /// Seeds the default categories when the store is empty. Returns how many were added.
    pub fn bootstrap_defaults(store: &mut RecordStore<Category>, user_id: &str) -> CoreResult<usize> {
        if !store.is_empty() {
            return Ok(0);
        }
        let defaults: Vec<Category> = DEFAULT_CATEGORIES
            .iter()
            .map(|(name, color, icon)| Category::new(*name, *color, *icon).for_user(user_id))
            .collect();
        let count = defaults.len();
        store.extend(defaults)?;
        info!(count, "default categories created");
        Ok(count)
    }

    /// Adds a category with the default display hints.
    ///
    /// Names are trimmed and must be unique ignoring ASCII case.
    pub fn add(
        store: &mut RecordStore<Category>,
        name: &str,
        user_id: &str,
    ) -> CoreResult<Category> {
        let name = validate_category_name(name)?;
        Self::ensure_unique(store, &name, None)?;
        let category =
            Category::new(name, NEW_CATEGORY_COLOR, NEW_CATEGORY_ICON).for_user(user_id);
        store.add(category.clone())?;
        Ok(category)
    }

    /// Renames a category. Expenses keep their old category string.
    pub fn rename(store: &mut RecordStore<Category>, id: &str, name: &str) -> CoreResult<bool> {
        let name = validate_category_name(name)?;
        Self::ensure_unique(store, &name, Some(id))?;
        let Some(current) = store.find(id).cloned() else {
            return Ok(false);
        };
        let mut renamed = current.clone();
        renamed.name = name;
        store.update(&current, renamed)
    }

    /// Removes a category; its subcategories become roots.
    pub fn remove(store: &mut RecordStore<Category>, id: &str) -> CoreResult<bool> {
        let Some(target) = store.find(id).cloned() else {
            return Ok(false);
        };
        let orphans: Vec<(Category, Category)> = store
            .records()
            .iter()
            .filter(|category| category.parent_id.as_deref() == Some(id))
            .map(|category| {
                let mut detached = category.clone();
                detached.parent_id = None;
                (category.clone(), detached)
            })
            .collect();
        if !orphans.is_empty() {
            store.update_all(orphans)?;
        }
        store.delete(&target)
    }

    /// Attaches `child_id` under `parent_id`. Returns `Ok(false)` for self-reference
    /// or unknown identifiers.
    pub fn add_subcategory(
        store: &mut RecordStore<Category>,
        parent_id: &str,
        child_id: &str,
    ) -> CoreResult<bool> {
        let mut arena = Self::arena(store);
        if !arena.add_subcategory(parent_id, child_id) {
            return Ok(false);
        }
        Self::apply(store, &arena)?;
        Ok(true)
    }

    pub fn remove_subcategory(
        store: &mut RecordStore<Category>,
        parent_id: &str,
        child_id: &str,
    ) -> CoreResult<bool> {
        let mut arena = Self::arena(store);
        if !arena.remove_subcategory(parent_id, child_id) {
            return Ok(false);
        }
        Self::apply(store, &arena)?;
        Ok(true)
    }

    /// Builds the navigable hierarchy from the stored records.
    pub fn arena(store: &RecordStore<Category>) -> CategoryArena {
        CategoryArena::from_categories(store.records().iter().cloned())
    }

    pub fn find_by_name<'a>(store: &'a RecordStore<Category>, name: &str) -> CoreResult<&'a Category> {
        store
            .records()
            .iter()
            .find(|category| category.name == name)
            .ok_or_else(|| CoreError::NotFound(format!("category `{}`", name)))
    }

    fn apply(store: &mut RecordStore<Category>, arena: &CategoryArena) -> CoreResult<()> {
        let replacements: Vec<(Category, Category)> = arena
            .categories()
            .iter()
            .filter_map(|updated| {
                let current = store.find(&updated.id)?;
                (current != updated).then(|| (current.clone(), updated.clone()))
            })
            .collect();
        store.update_all(replacements)?;
        Ok(())
    }

    fn ensure_unique(
        store: &RecordStore<Category>,
        name: &str,
        exclude: Option<&str>,
    ) -> CoreResult<()> {
        let duplicate = store.records().iter().any(|category| {
            category.name.eq_ignore_ascii_case(name) && exclude != Some(category.id.as_str())
        });
        if duplicate {
            Err(CoreError::validation(format!(
                "Category `{}` already exists.",
                name
            )))
        } else {
            Ok(())
        }
    }
}
