/*!
 * Allocation Failure Policies
 *
 * How a request the backend cannot satisfy is surfaced to the caller. The
 * policy is chosen per call site:
 *
 * - **Exception**: `Err(AllocError)`; never retried, never consults the handler
 * - **HandlerHook**: the thread's new-handler runs and the request is retried
 *   for as long as the handler keeps returning; without a handler this
 *   behaves like Exception
 * - **NullReturn**: `None`; no error and no handler
 */

use super::backend::SystemBackend;
use super::handler::current_handler;
use super::traits::Backend;
use super::types::{AllocResult, AllocationOutcome, AllocationRequest, Block};
use crate::core::types::Size;
use std::alloc::Layout;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// Failure-reporting policy for one allocation call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailurePolicy {
    Exception,
    HandlerHook,
    NullReturn,
}

impl FailurePolicy {
    pub const ALL: [FailurePolicy; 3] = [
        FailurePolicy::Exception,
        FailurePolicy::HandlerHook,
        FailurePolicy::NullReturn,
    ];
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FailurePolicy::Exception => write!(f, "EXCEPTION"),
            FailurePolicy::HandlerHook => write!(f, "HANDLER_HOOK"),
            FailurePolicy::NullReturn => write!(f, "NULL_RETURN"),
        }
    }
}

/// Allocator front-end applying a [`FailurePolicy`] over a [`Backend`]
#[derive(Clone)]
pub struct PolicyAllocator {
    backend: Rc<dyn Backend>,
}

impl PolicyAllocator {
    pub fn new(backend: impl Backend + 'static) -> Self {
        Self {
            backend: Rc::new(backend),
        }
    }

    /// Share a backend the caller keeps a handle to (e.g. to inspect usage)
    pub fn from_shared(backend: Rc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Allocator over the platform allocator
    pub fn system() -> Self {
        Self::new(SystemBackend)
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Allocate `size` bytes under the given policy
    pub fn allocate(&self, size: Size, policy: FailurePolicy) -> AllocationOutcome {
        self.allocate_request(AllocationRequest::new(size), policy)
    }

    /// Allocate an explicit request (size and alignment) under the given policy
    pub fn allocate_request(&self, request: AllocationRequest, policy: FailurePolicy) -> AllocationOutcome {
        match policy {
            FailurePolicy::Exception => match self.raise_on_failure(request) {
                Ok(block) => AllocationOutcome::Allocated(block),
                Err(err) => AllocationOutcome::Failed(err),
            },
            FailurePolicy::HandlerHook => match self.hook_on_failure(request) {
                Ok(block) => AllocationOutcome::Allocated(block),
                Err(err) => AllocationOutcome::Failed(err),
            },
            FailurePolicy::NullReturn => match self.null_on_failure(request) {
                Some(block) => AllocationOutcome::Allocated(block),
                None => AllocationOutcome::Null,
            },
        }
    }

    /// Exception policy: fail with an error, never consult the handler
    pub fn try_allocate(&self, size: Size) -> AllocResult<Block> {
        self.raise_on_failure(AllocationRequest::new(size))
    }

    /// Handler-hook policy
    ///
    /// While the backend refuses the request and a new-handler is installed,
    /// the handler is called and the request retried. A handler that returns
    /// without freeing memory or clearing itself keeps this loop running
    /// forever. Requests that cannot form a layout fail immediately, without
    /// invoking the handler.
    pub fn allocate_with_hook(&self, size: Size) -> AllocResult<Block> {
        self.hook_on_failure(AllocationRequest::new(size))
    }

    /// Null-return policy: report failure as `None`
    pub fn allocate_or_null(&self, size: Size) -> Option<Block> {
        self.null_on_failure(AllocationRequest::new(size))
    }

    fn raise_on_failure(&self, request: AllocationRequest) -> AllocResult<Block> {
        let layout = request.layout()?;

        self.attempt(layout).ok_or_else(|| {
            let err = request.exhausted();
            warn!(
                policy = %FailurePolicy::Exception,
                requested = request.size,
                backend = self.backend.name(),
                error = %err,
                "allocation failed"
            );
            err
        })
    }

    fn hook_on_failure(&self, request: AllocationRequest) -> AllocResult<Block> {
        let layout = request.layout()?;
        let mut invocations: u64 = 0;

        loop {
            if let Some(block) = self.attempt(layout) {
                if invocations > 0 {
                    debug!(
                        requested = request.size,
                        invocations, "allocation succeeded after new-handler"
                    );
                }
                return Ok(block);
            }

            match current_handler() {
                Some(handler) => {
                    invocations += 1;
                    trace!(requested = request.size, invocations, "invoking new-handler");
                    handler();
                }
                None => {
                    let err = request.exhausted();
                    warn!(
                        policy = %FailurePolicy::HandlerHook,
                        requested = request.size,
                        invocations,
                        error = %err,
                        "allocation failed with no new-handler installed"
                    );
                    return Err(err);
                }
            }
        }
    }

    fn null_on_failure(&self, request: AllocationRequest) -> Option<Block> {
        let block = request.layout().ok().and_then(|layout| self.attempt(layout));

        if block.is_none() {
            debug!(
                policy = %FailurePolicy::NullReturn,
                requested = request.size,
                "allocation returned null"
            );
        }
        block
    }

    fn attempt(&self, layout: Layout) -> Option<Block> {
        let ptr = self.backend.allocate(layout)?;
        trace!(size = layout.size(), backend = self.backend.name(), "allocated block");
        // SAFETY: ptr was just returned by this backend for this layout
        Some(unsafe { Block::from_raw(ptr, layout, Rc::clone(&self.backend)) })
    }
}

impl fmt::Debug for PolicyAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyAllocator")
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl Default for PolicyAllocator {
    fn default() -> Self {
        Self::system()
    }
}
