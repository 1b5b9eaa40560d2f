use pizzeria_core::db::open_db_in_memory;
use pizzeria_core::model::topping::ToppingValidationError;
use pizzeria_core::{
    SqliteToppingRepository, Topping, ToppingError, ToppingRegistry, ToppingRepository,
};

fn names(registry: &ToppingRegistry<SqliteToppingRepository<'_>>) -> Vec<String> {
    registry
        .list()
        .iter()
        .map(|topping| topping.name.clone())
        .collect()
}

#[test]
fn load_fetches_existing_rows_in_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteToppingRepository::new(&conn);
    repo.insert(&Topping::new("tomato").unwrap()).unwrap();
    repo.insert(&Topping::new("basil").unwrap()).unwrap();

    let registry = ToppingRegistry::load(SqliteToppingRepository::new(&conn)).unwrap();
    assert_eq!(names(&registry), vec!["tomato", "basil"]);
}

#[test]
fn add_lowercases_and_rejects_second_attempt() {
    let conn = open_db_in_memory().unwrap();
    let mut registry = ToppingRegistry::load(SqliteToppingRepository::new(&conn)).unwrap();

    registry.add("Cheese").unwrap();
    assert_eq!(registry.list(), &[Topping { name: "cheese".to_string() }]);

    let err = registry.add("cheese").unwrap_err();
    assert!(matches!(err, ToppingError::Duplicate(ref name) if name == "cheese"));
    assert_eq!(err.to_string(), "Topping already exists.");

    let stored = SqliteToppingRepository::new(&conn).select_all().unwrap();
    assert_eq!(stored.len(), 1);
}

#[test]
fn add_rejects_blank_name_without_store_write() {
    let conn = open_db_in_memory().unwrap();
    let mut registry = ToppingRegistry::load(SqliteToppingRepository::new(&conn)).unwrap();

    let err = registry.add("   ").unwrap_err();
    assert!(matches!(
        err,
        ToppingError::Validation(ToppingValidationError::EmptyName)
    ));
    assert!(registry.list().is_empty());
}

#[test]
fn store_primary_key_catches_stale_cache() {
    let conn = open_db_in_memory().unwrap();
    let mut registry = ToppingRegistry::load(SqliteToppingRepository::new(&conn)).unwrap();

    SqliteToppingRepository::new(&conn)
        .insert(&Topping::new("olive").unwrap())
        .unwrap();

    let err = registry.add("Olive").unwrap_err();
    assert!(matches!(err, ToppingError::Duplicate(_)));
}

#[test]
fn rename_keeps_position_and_normalizes() {
    let conn = open_db_in_memory().unwrap();
    let mut registry = ToppingRegistry::load(SqliteToppingRepository::new(&conn)).unwrap();
    registry.add("ham").unwrap();
    registry.add("onion").unwrap();
    registry.add("pepper").unwrap();

    registry.rename("onion", "Red Onion").unwrap();
    assert_eq!(names(&registry), vec!["ham", "red onion", "pepper"]);
}

#[test]
fn rename_to_existing_name_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let mut registry = ToppingRegistry::load(SqliteToppingRepository::new(&conn)).unwrap();
    registry.add("ham").unwrap();
    registry.add("onion").unwrap();

    let err = registry.rename("onion", "HAM").unwrap_err();
    assert!(matches!(err, ToppingError::Duplicate(_)));

    let err = registry.rename("onion", "onion").unwrap_err();
    assert!(matches!(err, ToppingError::Duplicate(_)));
    assert_eq!(names(&registry), vec!["ham", "onion"]);
}

#[test]
fn rename_of_missing_topping_is_a_no_op() {
    let conn = open_db_in_memory().unwrap();
    let mut registry = ToppingRegistry::load(SqliteToppingRepository::new(&conn)).unwrap();
    registry.add("ham").unwrap();

    registry.rename("anchovy", "sardine").unwrap();
    assert_eq!(names(&registry), vec!["ham"]);
}

#[test]
fn remove_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let mut registry = ToppingRegistry::load(SqliteToppingRepository::new(&conn)).unwrap();
    registry.add("ham").unwrap();

    registry.remove("pineapple").unwrap();
    assert_eq!(names(&registry), vec!["ham"]);

    registry.remove("ham").unwrap();
    registry.remove("ham").unwrap();
    assert!(registry.list().is_empty());
}

#[test]
fn remove_uses_exact_name() {
    let conn = open_db_in_memory().unwrap();
    let mut registry = ToppingRegistry::load(SqliteToppingRepository::new(&conn)).unwrap();
    registry.add("ham").unwrap();

    registry.remove("HAM").unwrap();
    assert_eq!(names(&registry), vec!["ham"]);
}
