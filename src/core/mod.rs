/*!
 * Core Module
 * Fundamental types, constants, guards and error handling
 */

pub mod errors;
pub mod guard;
pub mod limits;
pub mod text;
pub mod types;

// Re-export for convenience
pub use errors::*;
pub use guard::{Guard, GuardDrop, GuardMetadata, GuardResult, HandlerScope, Observable};
pub use text::to_text;
pub use types::*;
