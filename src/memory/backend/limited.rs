/*!
 * Limited Backend
 * Caps live bytes so allocation failure is deterministic
 */

use super::SystemBackend;
use crate::core::types::Size;
use crate::memory::traits::Backend;
use std::alloc::Layout;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::trace;

/// Backend that refuses requests which would push live bytes past a limit
///
/// Counts `Layout::size()` bytes. The limit can be moved at runtime, which
/// lets a new-handler "free memory" by raising it.
#[derive(Debug)]
pub struct LimitedBackend<B: Backend = SystemBackend> {
    inner: B,
    limit: AtomicUsize,
    used: AtomicUsize,
}

impl LimitedBackend<SystemBackend> {
    /// Limit the system allocator to `limit` live bytes
    pub fn new(limit: Size) -> Self {
        Self::wrap(SystemBackend, limit)
    }
}

impl<B: Backend> LimitedBackend<B> {
    pub fn wrap(inner: B, limit: Size) -> Self {
        Self {
            inner,
            limit: AtomicUsize::new(limit),
            used: AtomicUsize::new(0),
        }
    }

    /// Bytes currently allocated through this backend
    #[inline]
    pub fn used(&self) -> Size {
        self.used.load(Ordering::SeqCst)
    }

    #[inline]
    pub fn limit(&self) -> Size {
        self.limit.load(Ordering::SeqCst)
    }

    /// Bytes still available under the limit
    #[inline]
    pub fn available(&self) -> Size {
        self.limit().saturating_sub(self.used())
    }

    /// Move the limit; live blocks are unaffected
    pub fn set_limit(&self, limit: Size) {
        self.limit.store(limit, Ordering::SeqCst);
    }
}

impl<B: Backend> Backend for LimitedBackend<B> {
    fn name(&self) -> &'static str {
        "limited"
    }

    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        let size = layout.size();
        let used = self.used.fetch_add(size, Ordering::SeqCst);
        let limit = self.limit();

        if used.checked_add(size).map_or(true, |total| total > limit) {
            // Revert the increment
            self.used.fetch_sub(size, Ordering::SeqCst);
            trace!(requested = size, used, limit, "limited backend refused request");
            return None;
        }

        let ptr = self.inner.allocate(layout);
        if ptr.is_none() {
            self.used.fetch_sub(size, Ordering::SeqCst);
        }
        ptr
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.inner.deallocate(ptr, layout);
        self.used.fetch_sub(layout.size(), Ordering::SeqCst);
    }
}
