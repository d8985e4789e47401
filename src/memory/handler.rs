/*!
 * New-Handler Slot
 *
 * The callback consulted by the handler-hook policy when a backend cannot
 * satisfy a request. The slot is thread-local: a handler installed on one
 * thread is never invoked for allocations on another.
 */

use std::cell::RefCell;
use std::rc::Rc;

/// Callback invoked on allocation failure
///
/// Returning normally asks the allocator to retry the same request. To stop
/// retrying, the handler must free memory, replace or clear itself through
/// [`install_handler`], or terminate (panic or abort).
pub type NewHandler = Rc<dyn Fn()>;

thread_local! {
    static NEW_HANDLER: RefCell<Option<NewHandler>> = const { RefCell::new(None) };
}

/// Wrap a closure as a [`NewHandler`]
pub fn new_handler(f: impl Fn() + 'static) -> NewHandler {
    Rc::new(f)
}

/// Install `handler` and return the one it replaces
///
/// Passing `None` clears the slot. Safe to call from inside a running
/// handler.
pub fn install_handler(handler: Option<NewHandler>) -> Option<NewHandler> {
    NEW_HANDLER.with(|slot| slot.replace(handler))
}

/// The currently installed handler, if any
pub fn current_handler() -> Option<NewHandler> {
    NEW_HANDLER.with(|slot| slot.borrow().clone())
}

/// Identity comparison of two handler slots
pub fn same_handler(a: Option<&NewHandler>, b: Option<&NewHandler>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ()),
        _ => false,
    }
}
