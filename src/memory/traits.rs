/*!
 * Memory Traits
 * Backend allocator abstraction
 */

use std::alloc::Layout;
use std::ptr::NonNull;

/// Raw allocator behind a [`PolicyAllocator`](super::PolicyAllocator)
///
/// A backend reports failure by returning `None`; turning that into an
/// error, a handler call or an empty result is the policy's job.
pub trait Backend {
    /// Backend name for logging/debugging
    fn name(&self) -> &'static str;

    /// Allocate a block for `layout`, which always has a non-zero size
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>>;

    /// Free a block
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by `allocate` on this backend with the
    /// same `layout`, and must not be freed twice.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}
