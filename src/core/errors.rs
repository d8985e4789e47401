/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 */

use miette::Diagnostic;
use thiserror::Error;

// Re-export AllocError from memory module
pub use crate::memory::AllocError;

// Re-export GuardError from guard module
pub use super::guard::GuardError;

// Re-export DemoError from demo module
pub use crate::demo::DemoError;

/// A value could not be rendered as text
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
#[error("toString({type_name})")]
#[diagnostic(
    code(core::conversion_failed),
    help("The value's Display implementation returned an error.")
)]
pub struct ConversionError {
    type_name: &'static str,
}

impl ConversionError {
    /// Conversion failure for a value of type `T`
    pub fn of<T: ?Sized>() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Runtime type name of the operand that failed to format
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}
