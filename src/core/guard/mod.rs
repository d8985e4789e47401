/*!
 * RAII Guards
 *
 * Scoped ownership of process state with automatic restoration.
 *
 * ## Guard Types
 *
 * - **HandlerScope**: Installs a new-handler and restores the previous one
 *
 * ## Example
 *
 * ```rust
 * use oom_policy::core::guard::HandlerScope;
 * use oom_policy::memory::{current_handler, new_handler};
 *
 * {
 *     let _scope = HandlerScope::install(new_handler(|| eprintln!("out of memory")));
 *     assert!(current_handler().is_some());
 * }
 * // Previous handler restored on drop
 * assert!(current_handler().is_none());
 * ```
 */

mod handler;
mod traits;

pub use handler::HandlerScope;
pub use traits::{Guard, GuardDrop, Observable};

/// Result type for guard operations
pub type GuardResult<T> = Result<T, GuardError>;

/// Errors that can occur during guard operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum GuardError {
    #[error("Resource already released")]
    #[diagnostic(
        code(guard::already_released),
        help("A guard restores its state once. Drop it instead of releasing twice.")
    )]
    AlreadyReleased,
}

/// Guard metadata for observability
#[derive(Debug, Clone)]
pub struct GuardMetadata {
    pub resource_type: &'static str,
    pub creation_time: std::time::Instant,
}

impl GuardMetadata {
    #[inline]
    pub fn new(resource_type: &'static str) -> Self {
        Self {
            resource_type,
            creation_time: std::time::Instant::now(),
        }
    }

    #[inline]
    pub fn lifetime_micros(&self) -> u64 {
        self.creation_time.elapsed().as_micros() as u64
    }
}
