/*!
 * Memory Module
 * Allocation failure policies at the allocator boundary
 */

pub mod backend;
pub mod handler;
pub mod policy;
pub mod traits;
pub mod types;

pub use backend::{LimitedBackend, SystemBackend};
pub use handler::{current_handler, install_handler, new_handler, same_handler, NewHandler};
pub use policy::{FailurePolicy, PolicyAllocator};
pub use traits::Backend;
pub use types::{AllocError, AllocResult, AllocationOutcome, AllocationRequest, Block};
