/*!
 * Failure Policy Tests
 * Every unsatisfiable request reports through exactly one channel
 */

use oom_policy::memory::{
    AllocError, AllocationOutcome, FailurePolicy, LimitedBackend, PolicyAllocator,
};
use oom_policy::{new_handler, HandlerScope};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

/// Panic payload used by handlers that terminate the request
struct HandlerGaveUp;

fn limited(limit: usize) -> (Rc<LimitedBackend>, PolicyAllocator) {
    let backend = Rc::new(LimitedBackend::new(limit));
    let allocator = PolicyAllocator::from_shared(backend.clone());
    (backend, allocator)
}

/// Counting handler that terminates the request by unwinding
fn giving_up_handler(calls: Rc<Cell<usize>>) -> oom_policy::NewHandler {
    new_handler(move || {
        calls.set(calls.get() + 1);
        panic::panic_any(HandlerGaveUp);
    })
}

#[test]
fn test_small_requests_succeed_under_every_policy() {
    let (backend, allocator) = limited(1024);

    for policy in FailurePolicy::ALL {
        let blocks: Vec<_> = (0..16)
            .map(|_| allocator.allocate(1, policy).into_block())
            .collect();

        assert!(blocks.iter().all(Option::is_some), "policy {}", policy);
        assert_eq!(backend.used(), 16);
    }

    assert_eq!(backend.used(), 0);
}

#[test]
fn test_address_space_sized_request_never_yields_block() {
    let allocator = PolicyAllocator::system();
    let _scope = HandlerScope::clear();

    for policy in FailurePolicy::ALL {
        match allocator.allocate(usize::MAX, policy) {
            AllocationOutcome::Allocated(block) => panic!("{} produced {:?}", policy, block),
            AllocationOutcome::Failed(err) => {
                assert_ne!(policy, FailurePolicy::NullReturn);
                assert_eq!(err, AllocError::CapacityOverflow { requested: usize::MAX });
            }
            AllocationOutcome::Null => assert_eq!(policy, FailurePolicy::NullReturn),
        }
    }
}

#[test]
fn test_exception_raises_before_returning() {
    let (_backend, allocator) = limited(10);
    let _scope = HandlerScope::clear();

    let err = allocator.try_allocate(11).unwrap_err();
    assert_eq!(err.to_string(), "memory allocation of 11 bytes failed");
    assert_eq!(err.requested(), Some(11));
}

#[test]
fn test_null_return_never_invokes_handler() {
    let (_backend, allocator) = limited(0);
    let calls = Rc::new(Cell::new(0));
    let _scope = HandlerScope::install(giving_up_handler(calls.clone()));

    assert!(allocator.allocate_or_null(8).is_none());
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_non_terminating_handler_retries_until_capped() {
    // The handler neither frees memory nor removes itself for the first
    // 1000 calls; the cap only exists so the test ends.
    let (_backend, allocator) = limited(0);
    let calls = Rc::new(Cell::new(0usize));
    let seen = calls.clone();
    let _scope = HandlerScope::install(new_handler(move || {
        seen.set(seen.get() + 1);
        if seen.get() == 1000 {
            panic::panic_any(HandlerGaveUp);
        }
    }));

    let result = panic::catch_unwind(AssertUnwindSafe(|| allocator.allocate_with_hook(32)));
    let payload = result.unwrap_err();
    assert!(payload.is::<HandlerGaveUp>());
    assert_eq!(calls.get(), 1000);
}

#[test]
fn test_handler_that_frees_memory_lets_request_succeed() {
    let (backend, allocator) = limited(96);
    let reserve = Rc::new(std::cell::RefCell::new(vec![
        allocator.try_allocate(32).unwrap(),
        allocator.try_allocate(32).unwrap(),
    ]));
    let pool = reserve.clone();
    let _scope = HandlerScope::install(new_handler(move || {
        pool.borrow_mut().pop();
    }));

    let block = allocator.allocate_with_hook(96).unwrap();
    assert_eq!(block.size(), 96);
    assert!(reserve.borrow().is_empty());
    assert_eq!(backend.used(), 96);
}

proptest! {
    #[test]
    fn prop_unsatisfiable_request_fires_exactly_one_channel(
        limit in 0usize..4096,
        excess in 1usize..4096,
        policy_index in 0usize..3,
    ) {
        let policy = FailurePolicy::ALL[policy_index];
        let (backend, allocator) = limited(limit);
        let calls = Rc::new(Cell::new(0usize));
        let _scope = HandlerScope::install(giving_up_handler(calls.clone()));

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            allocator.allocate(limit + excess, policy)
        }));

        match policy {
            FailurePolicy::Exception => {
                let outcome = result.unwrap();
                prop_assert!(outcome.is_failed());
                prop_assert_eq!(calls.get(), 0);
            }
            FailurePolicy::HandlerHook => {
                prop_assert!(result.is_err());
                prop_assert_eq!(calls.get(), 1);
            }
            FailurePolicy::NullReturn => {
                let outcome = result.unwrap();
                prop_assert!(outcome.is_null());
                prop_assert_eq!(calls.get(), 0);
            }
        }
        prop_assert_eq!(backend.used(), 0);
    }
}
