/*!
 * OOM Policy Library
 * Out-of-memory handling policies at the allocator boundary
 */

pub mod core;
pub mod demo;
pub mod memory;
pub mod monitoring;

// Re-exports
pub use crate::core::{to_text, ConversionError, HandlerScope};
pub use demo::{Console, Demo, DemoConfig, DemoDriver, DemoError, Termination};
pub use memory::{
    current_handler, install_handler, new_handler, AllocError, AllocationOutcome,
    AllocationRequest, Block, FailurePolicy, LimitedBackend, NewHandler, PolicyAllocator,
    SystemBackend,
};
pub use monitoring::init_tracing;
