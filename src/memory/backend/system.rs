/*!
 * System Backend
 * The platform allocator
 */

use crate::memory::traits::Backend;
use std::alloc::{GlobalAlloc, Layout, System};
use std::ptr::NonNull;

/// Backend over [`std::alloc::System`]
///
/// Failure reflects the real state of the machine: on an overcommitting
/// kernel an oversized request may succeed and only fail when touched.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBackend;

impl Backend for SystemBackend {
    fn name(&self) -> &'static str {
        "system"
    }

    #[inline]
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        debug_assert!(layout.size() != 0);
        // SAFETY: callers pass layouts built by AllocationRequest, which are non-zero
        NonNull::new(unsafe { System.alloc(layout) })
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        System.dealloc(ptr.as_ptr(), layout)
    }
}
