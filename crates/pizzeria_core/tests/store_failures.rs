//! Store failure handling, exercised through repository doubles that fail
//! on demand.

use pizzeria_core::{
    Pizza, PizzaCatalog, PizzaDraft, PizzaError, PizzaId, PizzaRepository, RepoError,
    RepoResult, Topping, ToppingError, ToppingRegistry, ToppingRepository,
};
use std::cell::{Cell, RefCell};

#[derive(Default)]
struct FlakyToppings {
    rows: RefCell<Vec<Topping>>,
    fail_writes: Cell<bool>,
    fail_reads: Cell<bool>,
    writes: Cell<usize>,
}

impl FlakyToppings {
    fn check(&self, flag: &Cell<bool>) -> RepoResult<()> {
        if flag.get() {
            return Err(RepoError::Unavailable("connection reset".to_string()));
        }
        Ok(())
    }
}

impl ToppingRepository for &FlakyToppings {
    fn select_all(&self) -> RepoResult<Vec<Topping>> {
        self.check(&self.fail_reads)?;
        Ok(self.rows.borrow().clone())
    }

    fn insert(&self, topping: &Topping) -> RepoResult<()> {
        self.writes.set(self.writes.get() + 1);
        self.check(&self.fail_writes)?;
        self.rows.borrow_mut().push(topping.clone());
        Ok(())
    }

    fn update(&self, name: &str, topping: &Topping) -> RepoResult<()> {
        self.writes.set(self.writes.get() + 1);
        self.check(&self.fail_writes)?;
        for row in self.rows.borrow_mut().iter_mut().filter(|row| row.name == name) {
            *row = topping.clone();
        }
        Ok(())
    }

    fn delete(&self, name: &str) -> RepoResult<()> {
        self.writes.set(self.writes.get() + 1);
        self.check(&self.fail_writes)?;
        self.rows.borrow_mut().retain(|row| row.name != name);
        Ok(())
    }
}

#[derive(Default)]
struct FlakyPizzas {
    rows: RefCell<Vec<Pizza>>,
    fail_writes: Cell<bool>,
    fail_reads: Cell<bool>,
    writes: Cell<usize>,
}

impl PizzaRepository for &FlakyPizzas {
    fn select_all(&self) -> RepoResult<Vec<Pizza>> {
        if self.fail_reads.get() {
            return Err(RepoError::Unavailable("read timeout".to_string()));
        }
        Ok(self.rows.borrow().clone())
    }

    fn insert(&self, draft: &PizzaDraft) -> RepoResult<PizzaId> {
        self.writes.set(self.writes.get() + 1);
        if self.fail_writes.get() {
            return Err(RepoError::Unavailable("timeout".to_string()));
        }
        let mut rows = self.rows.borrow_mut();
        let id = PizzaId(rows.len() as i64 + 1);
        rows.push(Pizza {
            id,
            title: draft.title().to_string(),
            toppings: draft.toppings().to_vec(),
        });
        Ok(id)
    }

    fn update(&self, id: PizzaId, draft: &PizzaDraft) -> RepoResult<()> {
        self.writes.set(self.writes.get() + 1);
        if self.fail_writes.get() {
            return Err(RepoError::Unavailable("timeout".to_string()));
        }
        if let Some(row) = self.rows.borrow_mut().iter_mut().find(|row| row.id == id) {
            row.title = draft.title().to_string();
            row.toppings = draft.toppings().to_vec();
        }
        Ok(())
    }

    fn delete(&self, id: PizzaId) -> RepoResult<()> {
        self.writes.set(self.writes.get() + 1);
        if self.fail_writes.get() {
            return Err(RepoError::Unavailable("timeout".to_string()));
        }
        self.rows.borrow_mut().retain(|row| row.id != id);
        Ok(())
    }
}

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn failed_topping_writes_leave_cache_unchanged() {
    let store = FlakyToppings::default();
    let mut registry = ToppingRegistry::load(&store).unwrap();
    registry.add("cheese").unwrap();

    store.fail_writes.set(true);
    let err = registry.add("tomato").unwrap_err();
    assert!(matches!(err, ToppingError::Store(RepoError::Unavailable(_))));
    assert!(registry.remove("cheese").is_err());
    assert!(registry.rename("cheese", "mozzarella").is_err());

    assert_eq!(registry.list(), &[Topping { name: "cheese".to_string() }]);
}

#[test]
fn validation_errors_never_reach_the_topping_store() {
    let store = FlakyToppings::default();
    let mut registry = ToppingRegistry::load(&store).unwrap();
    registry.add("cheese").unwrap();
    let writes_before = store.writes.get();

    assert!(registry.add("CHEESE").is_err());
    assert!(registry.add("").is_err());
    assert!(registry.rename("cheese", "Cheese").is_err());

    assert_eq!(store.writes.get(), writes_before);
}

#[test]
fn failed_refresh_keeps_previous_cache() {
    let store = FlakyToppings::default();
    let mut registry = ToppingRegistry::load(&store).unwrap();
    registry.add("cheese").unwrap();

    store.fail_reads.set(true);
    assert!(registry.refresh().is_err());
    assert_eq!(registry.list().len(), 1);
}

#[test]
fn initial_fetch_failure_is_reported() {
    let store = FlakyToppings::default();
    store.fail_reads.set(true);
    assert!(matches!(
        ToppingRegistry::load(&store),
        Err(ToppingError::Store(_))
    ));
}

#[test]
fn failed_pizza_writes_leave_cache_unchanged() {
    let store = FlakyPizzas::default();
    let mut catalog = PizzaCatalog::load(&store).unwrap();
    let id = catalog.add("Margherita", names(&["cheese"])).unwrap();

    store.fail_writes.set(true);
    let err = catalog.add("Marinara", names(&["garlic"])).unwrap_err();
    assert!(matches!(err, PizzaError::Store(_)));
    assert!(err.to_string().contains("timeout"));
    assert!(catalog.update(id, "Regina", names(&["ham"])).is_err());
    assert!(catalog.remove(id).is_err());

    assert_eq!(catalog.list().len(), 1);
    assert_eq!(catalog.get(id).unwrap().title, "Margherita");
}

#[test]
fn validation_errors_never_reach_the_pizza_store() {
    let store = FlakyPizzas::default();
    let mut catalog = PizzaCatalog::load(&store).unwrap();
    catalog.add("Margherita", names(&["cheese", "tomato"])).unwrap();
    let writes_before = store.writes.get();

    assert!(catalog.add("", names(&["basil"])).is_err());
    assert!(catalog.add("MARGHERITA", names(&["basil"])).is_err());
    assert!(catalog.add("Red", names(&["tomato", "cheese"])).is_err());

    assert_eq!(store.writes.get(), writes_before);
}

#[test]
fn committed_topping_writes_survive_a_failed_refetch() {
    let store = FlakyToppings::default();
    let mut registry = ToppingRegistry::load(&store).unwrap();
    registry.add("ham").unwrap();

    store.fail_reads.set(true);
    registry.add("Cheese").unwrap();
    assert_eq!(*store.rows.borrow(), registry.list());

    registry.rename("ham", "Prosciutto").unwrap();
    assert_eq!(*store.rows.borrow(), registry.list());

    registry.remove("cheese").unwrap();
    assert_eq!(registry.list(), &[Topping { name: "prosciutto".to_string() }]);

    let err = registry.add("prosciutto").unwrap_err();
    assert!(matches!(err, ToppingError::Duplicate(_)));
}

#[test]
fn committed_pizza_writes_survive_a_failed_refetch() {
    let store = FlakyPizzas::default();
    let mut catalog = PizzaCatalog::load(&store).unwrap();

    store.fail_reads.set(true);
    let id = catalog.add(" Margherita ", names(&["cheese"])).unwrap();
    assert_eq!(*store.rows.borrow(), catalog.list());

    catalog.update(id, "Regina", names(&["ham", "cheese"])).unwrap();
    assert_eq!(*store.rows.borrow(), catalog.list());
    assert_eq!(catalog.get(id).unwrap().title, "Regina");

    let err = catalog.add("regina", names(&["olive"])).unwrap_err();
    assert!(matches!(err, PizzaError::DuplicateTitle));

    catalog.remove(id).unwrap();
    assert!(catalog.list().is_empty());
}
