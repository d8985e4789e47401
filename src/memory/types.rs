/*!
 * Memory Types
 * Requests, blocks, outcomes and errors at the allocator boundary
 */

use super::traits::Backend;
use crate::core::limits::DEFAULT_ALIGNMENT;
use crate::core::types::{Alignment, Size};
use miette::Diagnostic;
use std::alloc::Layout;
use std::fmt;
use std::ptr::NonNull;
use std::rc::Rc;
use thiserror::Error;

/// Allocation result
pub type AllocResult<T> = Result<T, AllocError>;

/// Allocation errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum AllocError {
    #[error("memory allocation of {requested} bytes failed")]
    #[diagnostic(
        code(memory::exhausted),
        help("The allocator could not satisfy the request. Free memory or request less.")
    )]
    Exhausted { requested: Size, align: Alignment },

    #[error("requested {requested} bytes exceeds the address space")]
    #[diagnostic(
        code(memory::capacity_overflow),
        help("No allocator can satisfy a request larger than isize::MAX bytes.")
    )]
    CapacityOverflow { requested: Size },

    #[error("invalid alignment {0}: must be a power of two")]
    #[diagnostic(code(memory::invalid_alignment))]
    InvalidAlignment(Alignment),
}

impl AllocError {
    /// Number of bytes the failed request asked for
    pub fn requested(&self) -> Option<Size> {
        match self {
            AllocError::Exhausted { requested, .. } | AllocError::CapacityOverflow { requested } => {
                Some(*requested)
            }
            AllocError::InvalidAlignment(_) => None,
        }
    }

    /// Layout of the failed request, if it formed a valid one
    pub fn layout(&self) -> Option<Layout> {
        match self {
            AllocError::Exhausted { requested, align } => {
                Layout::from_size_align((*requested).max(1), *align).ok()
            }
            _ => None,
        }
    }
}

/// Memory allocation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationRequest {
    pub size: Size,
    pub alignment: Alignment,
}

impl AllocationRequest {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            alignment: DEFAULT_ALIGNMENT,
        }
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Layout handed to the backend
    ///
    /// Zero-byte requests are serviced as one byte so every block is unique
    /// and non-null.
    pub fn layout(&self) -> AllocResult<Layout> {
        if !self.alignment.is_power_of_two() {
            return Err(AllocError::InvalidAlignment(self.alignment));
        }
        Layout::from_size_align(self.size.max(1), self.alignment).map_err(|_| {
            AllocError::CapacityOverflow {
                requested: self.size,
            }
        })
    }

    /// Error reported when a backend refuses this request
    pub fn exhausted(&self) -> AllocError {
        AllocError::Exhausted {
            requested: self.size,
            align: self.alignment,
        }
    }
}

/// An owned allocation, freed on drop
///
/// The pointer is never null; "no block" is expressed as `Option<Block>`
/// or `Err(AllocError)`, never as a null `Block`.
pub struct Block {
    ptr: NonNull<u8>,
    layout: Layout,
    backend: Rc<dyn Backend>,
}

impl Block {
    /// # Safety
    ///
    /// `ptr` must have been returned by `backend.allocate(layout)` and not
    /// freed since.
    pub(crate) unsafe fn from_raw(ptr: NonNull<u8>, layout: Layout, backend: Rc<dyn Backend>) -> Self {
        Self {
            ptr,
            layout,
            backend,
        }
    }

    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Usable size in bytes (at least one)
    #[inline]
    pub fn size(&self) -> Size {
        self.layout.size()
    }

    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("ptr", &self.ptr)
            .field("size", &self.layout.size())
            .field("align", &self.layout.align())
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl Drop for Block {
    fn drop(&mut self) {
        // SAFETY: `from_raw` guarantees ptr came from this backend with this layout
        unsafe { self.backend.deallocate(self.ptr, self.layout) }
    }
}

/// Result of one allocation attempt
///
/// Exactly one of the three channels is reported per attempt.
#[derive(Debug)]
pub enum AllocationOutcome {
    Allocated(Block),
    Failed(AllocError),
    Null,
}

impl AllocationOutcome {
    pub fn is_allocated(&self) -> bool {
        matches!(self, AllocationOutcome::Allocated(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, AllocationOutcome::Failed(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AllocationOutcome::Null)
    }

    pub fn into_block(self) -> Option<Block> {
        match self {
            AllocationOutcome::Allocated(block) => Some(block),
            _ => None,
        }
    }
}
