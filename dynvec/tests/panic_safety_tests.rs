use std::cell::Cell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use dynvec::DynVec;

/// Element whose clones draw from a shared budget; cloning past the budget
/// panics. Live instances are counted so leaks and double drops show up.
struct Flaky {
    id: usize,
    budget: Rc<Cell<usize>>,
    live: Rc<Cell<usize>>,
}

impl Flaky {
    fn new(id: usize, budget: &Rc<Cell<usize>>, live: &Rc<Cell<usize>>) -> Self {
        live.set(live.get() + 1);
        Self {
            id,
            budget: Rc::clone(budget),
            live: Rc::clone(live),
        }
    }
}

impl Clone for Flaky {
    fn clone(&self) -> Self {
        let left = self.budget.get();
        if left == 0 {
            panic!("clone budget exhausted");
        }
        self.budget.set(left - 1);
        Flaky::new(self.id, &self.budget, &self.live)
    }
}

impl Drop for Flaky {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

fn flaky_vec(
    n: usize,
    budget: &Rc<Cell<usize>>,
    live: &Rc<Cell<usize>>,
) -> DynVec<Flaky> {
    let mut v = DynVec::new();
    for i in 0..n {
        v.push(Flaky::new(i, budget, live)).unwrap();
    }
    v
}

#[test]
fn test_failed_clone_leaves_source_untouched() {
    let budget = Rc::new(Cell::new(2));
    let live = Rc::new(Cell::new(0));
    let source = flaky_vec(5, &budget, &live);
    let capacity = source.capacity();

    let outcome = catch_unwind(AssertUnwindSafe(|| source.clone()));

    assert!(outcome.is_err());
    // Source size, capacity and elements are exactly as before; the two
    // clones built before the panic were rolled back.
    assert_eq!(source.len(), 5);
    assert_eq!(source.capacity(), capacity);
    for (i, element) in source.iter().enumerate() {
        assert_eq!(element.id, i);
    }
    assert_eq!(live.get(), 5);

    drop(source);
    assert_eq!(live.get(), 0);
}

#[test]
fn test_successful_clone_consumes_budget() {
    let budget = Rc::new(Cell::new(3));
    let live = Rc::new(Cell::new(0));
    let source = flaky_vec(3, &budget, &live);

    let copy = source.clone();

    assert_eq!(budget.get(), 0);
    assert_eq!(live.get(), 6);
    assert_eq!(copy.len(), 3);

    drop(copy);
    drop(source);
    assert_eq!(live.get(), 0);
}

#[test]
fn test_failed_clone_from_keeps_target_length() {
    let budget = Rc::new(Cell::new(usize::MAX));
    let live = Rc::new(Cell::new(0));
    let mut target = flaky_vec(2, &budget, &live);
    target.reserve(8).unwrap();
    let source = flaky_vec(5, &budget, &live);

    // Enough budget to assign the shared prefix, none for the new tail.
    budget.set(2);
    let outcome = catch_unwind(AssertUnwindSafe(|| target.clone_from(&source)));

    assert!(outcome.is_err());
    assert_eq!(target.len(), 2);
    assert_eq!(source.len(), 5);
    assert_eq!(live.get(), 7);

    drop(target);
    drop(source);
    assert_eq!(live.get(), 0);
}

thread_local! {
    static DEFAULT_BUDGET: Cell<usize> = Cell::new(0);
    static DEFAULT_LIVE: Cell<usize> = Cell::new(0);
}

/// Element whose default construction draws from a thread-local budget.
struct FlakyDefault {
    value: usize,
}

impl FlakyDefault {
    fn with_value(value: usize) -> Self {
        DEFAULT_LIVE.with(|l| l.set(l.get() + 1));
        Self { value }
    }
}

impl Default for FlakyDefault {
    fn default() -> Self {
        let left = DEFAULT_BUDGET.with(Cell::get);
        if left == 0 {
            panic!("default budget exhausted");
        }
        DEFAULT_BUDGET.with(|b| b.set(left - 1));
        Self::with_value(7)
    }
}

impl Drop for FlakyDefault {
    fn drop(&mut self) {
        DEFAULT_LIVE.with(|l| l.set(l.get() - 1));
    }
}

#[test]
fn test_failed_resize_rolls_back_new_elements() {
    let mut v = DynVec::new();
    v.push(FlakyDefault::with_value(1)).unwrap();
    v.push(FlakyDefault::with_value(2)).unwrap();
    assert_eq!(DEFAULT_LIVE.with(Cell::get), 2);

    // Three defaults succeed, the fourth panics partway through the grow.
    DEFAULT_BUDGET.with(|b| b.set(3));
    let outcome = catch_unwind(AssertUnwindSafe(|| v.resize(8)));

    assert!(outcome.is_err());
    assert_eq!(v.len(), 2);
    assert_eq!(v[0].value, 1);
    assert_eq!(v[1].value, 2);
    assert_eq!(DEFAULT_LIVE.with(Cell::get), 2);

    drop(v);
    assert_eq!(DEFAULT_LIVE.with(Cell::get), 0);
}

#[test]
fn test_resize_succeeds_within_budget() {
    let mut v: DynVec<FlakyDefault> = DynVec::new();
    DEFAULT_BUDGET.with(|b| b.set(4));

    v.resize(4).unwrap();

    assert_eq!(v.len(), 4);
    assert!(v.iter().all(|e| e.value == 7));

    drop(v);
    assert_eq!(DEFAULT_LIVE.with(Cell::get), 0);
}
