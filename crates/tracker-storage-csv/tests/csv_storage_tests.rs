use std::fs;

use chrono::NaiveDate;
use tempfile::tempdir;
use tracker_core::{CoreError, PersistenceAdapter};
use tracker_domain::{Budget, BudgetPeriod, Category, Expense, Frequency, RecurringExpense};
use tracker_storage_csv::{
    export_expenses, import_expenses, CsvStorage, BUDGETS_FILE, CATEGORIES_FILE, EXPENSES_FILE,
    RECURRING_FILE,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn missing_files_load_as_empty() {
    let dir = tempdir().unwrap();
    let storage = CsvStorage::new(dir.path().join("data"));

    assert!(storage.load_expenses().unwrap().records.is_empty());
    assert!(storage.load_categories().unwrap().records.is_empty());
    assert!(storage.load_recurring_expenses().unwrap().records.is_empty());
    assert!(storage.load_budgets().unwrap().records.is_empty());
}

#[test]
fn expenses_round_trip_with_two_decimal_amounts() {
    let dir = tempdir().unwrap();
    let storage = CsvStorage::new(dir.path());
    let expenses = vec![
        Expense::new(10.0, "Food", date(2024, 1, 1), "Lunch, with \"friends\""),
        Expense::new(2.5, "Transport", date(2024, 1, 2), ""),
    ];
    storage.save_expenses(&expenses).unwrap();

    let raw = fs::read_to_string(dir.path().join(EXPENSES_FILE)).unwrap();
    assert!(raw.starts_with("id,amount,category,date,description"));
    assert!(raw.contains(",10.00,Food,2024-01-01,"));
    assert!(!dir.path().join("expenses.csv.tmp").exists());

    let loaded = storage.load_expenses().unwrap();
    assert!(loaded.warnings.is_empty());
    assert_eq!(loaded.records, expenses);
}

#[test]
fn malformed_rows_are_skipped_with_warnings() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join(EXPENSES_FILE),
        "id,amount,category,date,description\n\
         a,12.00,Food,2024-01-01,ok\n\
         b,abc,Food,2024-01-02,bad amount\n\
         c,3.00,Food,01/03/2024,bad date\n\
         ,4.00,School,2024-01-04,\n",
    )
    .unwrap();
    let storage = CsvStorage::new(dir.path());

    let report = storage.load_expenses().unwrap();
    assert_eq!(report.records.len(), 2);
    assert_eq!(report.warnings.len(), 2);
    assert_eq!(report.records[0].id, "a");
    assert!(!report.records[1].id.is_empty());
}

#[test]
fn category_hierarchy_survives_reload() {
    let dir = tempdir().unwrap();
    let storage = CsvStorage::new(dir.path());
    let parent = Category::new("Food", "#FF0000", "food_icon");
    let mut child = Category::new("Snacks", "#FFFFFF", "default_icon");
    child.parent_id = Some(parent.id.clone());
    storage
        .save_categories(&[parent.clone(), child.clone()])
        .unwrap();

    let loaded = storage.load_categories().unwrap().records;
    assert_eq!(loaded, vec![parent, child]);
}

#[test]
fn legacy_category_rows_without_ids_get_generated_ids() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join(CATEGORIES_FILE),
        "userId,name,color,icon\ndefault_user,Food,#FF0000,food_icon\n",
    )
    .unwrap();
    let storage = CsvStorage::new(dir.path());

    let loaded = storage.load_categories().unwrap().records;
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].name, "Food");
    assert!(!loaded[0].id.is_empty());
    assert!(loaded[0].parent_id.is_none());
}

#[test]
fn recurring_templates_keep_watermark() {
    let dir = tempdir().unwrap();
    let storage = CsvStorage::new(dir.path());
    let template = RecurringExpense::new(
        99.99,
        "Utilities",
        date(2024, 1, 31),
        Frequency::Monthly,
        "Internet",
    )
    .with_last_generated(Some(date(2024, 2, 29)));
    let fresh = RecurringExpense::new(5.0, "Food", date(2024, 3, 1), Frequency::Daily, "");
    storage
        .save_recurring_expenses(&[template.clone(), fresh.clone()])
        .unwrap();

    let raw = fs::read_to_string(dir.path().join(RECURRING_FILE)).unwrap();
    assert!(raw.contains("MONTHLY"));

    let loaded = storage.load_recurring_expenses().unwrap().records;
    assert_eq!(loaded, vec![template, fresh]);
}

#[test]
fn budgets_round_trip() {
    let dir = tempdir().unwrap();
    let storage = CsvStorage::new(dir.path());
    let budgets = vec![
        Budget::new("Food", 300.0, BudgetPeriod::Monthly),
        Budget::new("Food", 80.0, BudgetPeriod::Weekly),
    ];
    storage.save_budgets(&budgets).unwrap();

    let raw = fs::read_to_string(dir.path().join(BUDGETS_FILE)).unwrap();
    assert!(raw.starts_with("id,category,budgetAmount,period"));
    assert_eq!(storage.load_budgets().unwrap().records, budgets);
}

#[test]
fn import_requires_core_columns() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("import.csv");
    fs::write(&path, "id,category,date,description\nx,Food,2024-01-01,\n").unwrap();

    let err = import_expenses(&path).unwrap_err();
    assert!(matches!(err, CoreError::MissingColumn(ref column) if column == "amount"));
}

#[test]
fn import_generates_ids_and_reports_bad_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("import.csv");
    fs::write(
        &path,
        "amount,category,date\n7.50,Food,2024-02-01\nseven,Food,2024-02-02\n",
    )
    .unwrap();

    let report = import_expenses(&path).unwrap();
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.warnings.len(), 1);
    assert!(!report.records[0].id.is_empty());
    assert_eq!(report.records[0].description, "");
}

#[test]
fn export_then_import_preserves_expenses() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out").join("export.csv");
    let expenses = vec![Expense::new(42.0, "School", date(2024, 5, 6), "Books")];

    export_expenses(&path, &expenses).unwrap();
    assert_eq!(import_expenses(&path).unwrap().records, expenses);
}

#[test]
fn non_positive_and_non_finite_amounts_are_skipped() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join(EXPENSES_FILE),
        "id,amount,category,date,description\n\
         a,10.00,Food,2024-01-01,ok\n\
         b,NaN,Food,2024-01-02,\n\
         c,-5.00,Transport,2024-01-03,\n\
         d,inf,School,2024-01-04,\n\
         e,0,School,2024-01-05,\n\
         f,3.00,,2024-01-06,no category\n",
    )
    .unwrap();
    fs::write(
        dir.path().join(BUDGETS_FILE),
        "id,category,budgetAmount,period\nb1,Food,-1,MONTHLY\nb2,Food,50,MONTHLY\n",
    )
    .unwrap();
    fs::write(
        dir.path().join(RECURRING_FILE),
        "id,amount,category,startDate,frequency,description,lastGenerated\n\
         r1,NaN,Rent,2024-01-01,MONTHLY,,\n",
    )
    .unwrap();
    let storage = CsvStorage::new(dir.path());

    let expenses = storage.load_expenses().unwrap();
    assert_eq!(expenses.records.len(), 1);
    assert_eq!(expenses.records[0].id, "a");
    assert_eq!(expenses.warnings.len(), 5);
    assert!(expenses.warnings[4].contains("empty category"));

    let budgets = storage.load_budgets().unwrap();
    assert_eq!(budgets.records.len(), 1);
    assert_eq!(budgets.warnings.len(), 1);

    let templates = storage.load_recurring_expenses().unwrap();
    assert!(templates.records.is_empty());
    assert_eq!(templates.warnings.len(), 1);
}

#[test]
fn import_skips_rows_that_would_poison_totals() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("import.csv");
    fs::write(
        &path,
        "id,amount,category,date,description\n\
         a,10.00,Food,2024-01-01,\n\
         b,NaN,Food,2024-01-02,\n\
         c,-5.00,Transport,2024-01-03,\n\
         d,inf,School,2024-01-04,\n",
    )
    .unwrap();

    let report = import_expenses(&path).unwrap();
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.warnings.len(), 3);
    let total: f64 = report.records.iter().map(|expense| expense.amount).sum();
    assert!(total.is_finite());
    assert_eq!(total, 10.0);
}
