// SharedPtr integration suite.
//
// Core invariants exercised:
// - Counting: k live copies of one pointer all report use_count == k.
// - Destruction: the target is destroyed exactly once, when the last
//   owner is dropped, reset or overwritten.
// - Null: a null pointer has no counter and is unaffected by copies.
use handmade_collections::SharedPtr;
use std::cell::Cell;
use std::rc::Rc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

struct Probe {
    drops: Rc<Cell<usize>>,
}

impl Drop for Probe {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

fn probe() -> (Rc<Cell<usize>>, SharedPtr<Probe>) {
    let drops = Rc::new(Cell::new(0));
    let p = SharedPtr::new(Probe {
        drops: drops.clone(),
    });
    (drops, p)
}

// Test: k simultaneous copies share one count.
// Verifies: every copy reports k; the target dies once after all k go.
#[test]
fn k_copies_report_k_and_destroy_once() {
    init_tracing();
    for k in 1..=16 {
        let (drops, p) = probe();
        let copies: Vec<SharedPtr<Probe>> = (1..k).map(|_| p.clone()).collect();
        assert_eq!(p.use_count(), k);
        for c in &copies {
            assert_eq!(c.use_count(), k);
            assert!(SharedPtr::ptr_eq(c, &p));
        }
        drop(copies);
        assert_eq!(drops.get(), 0);
        assert_eq!(p.use_count(), 1);
        drop(p);
        assert_eq!(drops.get(), 1);
    }
}

// Test: overwriting through assignment releases the old group.
#[test]
fn assignment_releases_previous_target() {
    let (first, mut p) = probe();
    let (second, q) = probe();
    let keep = q.clone();
    assert_eq!(p.use_count(), 1);

    p = q;
    assert_eq!(first.get(), 1);
    assert_eq!(p.use_count(), 2);

    // Self-assignment through a clone leaves the count where it was.
    p = p.clone();
    assert_eq!(p.use_count(), 2);

    drop(keep);
    drop(p);
    assert_eq!(second.get(), 1);
}

// Test: move leaves the source null without touching the count.
#[test]
fn move_nulls_source() {
    let (drops, mut p) = probe();
    let q = p.take();
    assert!(p.is_null());
    assert_eq!(p.use_count(), 0);
    assert_eq!(q.use_count(), 1);
    drop(p);
    assert_eq!(drops.get(), 0);
    drop(q);
    assert_eq!(drops.get(), 1);
}

// Test: reset with and without a replacement.
#[test]
fn reset_adopts_fresh_count() {
    let (drops, mut p) = probe();
    let other = p.clone();
    let (fresh_drops, fresh) = probe();
    let fresh = SharedPtr::try_unwrap(fresh).ok().expect("sole owner");

    p.reset(Some(Box::new(fresh)));
    assert_eq!(p.use_count(), 1);
    assert_eq!(other.use_count(), 1);
    assert_eq!(drops.get(), 0);

    p.reset(None);
    assert!(p.is_null());
    assert_eq!(fresh_drops.get(), 1);

    drop(other);
    assert_eq!(drops.get(), 1);
}

// Test: null pointers and boolean-style checks.
#[test]
fn null_pointer_behavior() {
    let p: SharedPtr<String> = SharedPtr::default();
    assert!(p.is_null());
    assert_eq!(p.use_count(), 0);
    let copies = vec![p.clone(), p.clone()];
    assert!(copies.iter().all(|c| c.use_count() == 0 && c.get().is_none()));
    assert!(SharedPtr::ptr_eq(&p, &copies[0]));

    let s: SharedPtr<String> = String::from("hi").into();
    assert!(!s.is_null());
    assert_eq!(s.len(), 2);
}

// Test: a shared target can itself own shared pointers; dropping the outer
// group releases the inner one.
#[test]
fn nested_ownership_releases_inner() {
    let (drops, inner) = probe();
    let outer = SharedPtr::new(vec![inner.clone(), inner.clone()]);
    assert_eq!(inner.use_count(), 3);
    let outer2 = outer.clone();
    drop(outer);
    assert_eq!(inner.use_count(), 3);
    drop(outer2);
    assert_eq!(inner.use_count(), 1);
    drop(inner);
    assert_eq!(drops.get(), 1);
}
