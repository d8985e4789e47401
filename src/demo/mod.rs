/*!
 * Demo Module
 *
 * Drives one allocation failure policy against an oversized request and
 * reports what the caller observes.
 */

mod console;
mod driver;

pub use console::Console;
pub use driver::DemoDriver;

use crate::core::errors::ConversionError;
use crate::core::limits::{DEMO_ITERATIONS, OVERSIZED_REQUEST};
use crate::core::types::Size;
use crate::memory::{AllocError, FailurePolicy};
use miette::Diagnostic;
use std::fmt;
use thiserror::Error;

/// Progress line prefix
pub const PROGRESS_PREFIX: &str = "count: ";

/// Printed by the demo new-handler on every invocation
pub const NEW_HANDLER_MARKER: &str = "new handler ";

/// Printed when the exception demo catches an allocation failure
pub const EXCEPTION_PREFIX: &str = "korrekt, Exception: ";

/// Printed when the new-handler demo catches an allocation failure
pub const HANDLER_FALLBACK_PREFIX: &str = "test: ";

/// Printed when a null-return allocation is detected
pub const NULL_DETECTED_PREFIX: &str = "Test Ende bei NULL: ";

/// Demo result type
pub type DemoResult<T> = Result<T, DemoError>;

/// Failures of the demo itself, as opposed to the allocations it observes
#[derive(Error, Debug, Diagnostic)]
pub enum DemoError {
    #[error("Console write failed: {0}")]
    #[diagnostic(code(demo::console), help("Check that stdout is still open."))]
    Console(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Conversion(#[from] ConversionError),
}

/// The four demos; exactly one runs per build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Demo {
    /// Null-return policy with the result checked
    NullReturn,
    /// Error-raising allocation whose result is (uselessly) checked for null
    UncheckedNull,
    /// Exception policy with the error caught
    Exception,
    /// Handler-hook policy with a marker-printing handler
    NewHandler,
}

impl Demo {
    pub const ALL: [Demo; 4] = [
        Demo::NullReturn,
        Demo::UncheckedNull,
        Demo::Exception,
        Demo::NewHandler,
    ];

    /// Demo selected by Cargo features at build time
    pub const fn selected() -> Self {
        if cfg!(feature = "demo-null-return") {
            Demo::NullReturn
        } else if cfg!(feature = "demo-unchecked-null") {
            Demo::UncheckedNull
        } else if cfg!(feature = "demo-exception") {
            Demo::Exception
        } else {
            Demo::NewHandler
        }
    }

    /// Policy the demo allocates under
    pub const fn policy(self) -> FailurePolicy {
        match self {
            Demo::NullReturn => FailurePolicy::NullReturn,
            Demo::UncheckedNull | Demo::Exception => FailurePolicy::Exception,
            Demo::NewHandler => FailurePolicy::HandlerHook,
        }
    }
}

impl fmt::Display for Demo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Demo::NullReturn => write!(f, "null-return"),
            Demo::UncheckedNull => write!(f, "unchecked-null"),
            Demo::Exception => write!(f, "exception"),
            Demo::NewHandler => write!(f, "new-handler"),
        }
    }
}

/// Demo parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoConfig {
    /// Allocation attempts per run
    pub count: usize,
    /// Bytes requested per attempt
    pub request_size: Size,
    /// Clear the demo new-handler after this many invocations
    ///
    /// `None` keeps it installed, so a request that never succeeds retries
    /// forever.
    pub handler_limit: Option<usize>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            count: DEMO_ITERATIONS,
            request_size: OVERSIZED_REQUEST,
            handler_limit: None,
        }
    }
}

impl DemoConfig {
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_request_size(mut self, request_size: Size) -> Self {
        self.request_size = request_size;
        self
    }

    pub fn with_handler_limit(mut self, limit: usize) -> Self {
        self.handler_limit = Some(limit);
        self
    }
}

/// How a demo run wants the process to end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// Every attempt succeeded
    Completed,
    /// Failure observed and handled; exit with status 0
    Exit,
    /// Failure observed; abort the process
    Abort,
    /// Failure was never handled and reached the top level
    Unhandled(AllocError),
}

impl Termination {
    /// Exit status for orderly terminations; `None` means abort
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Termination::Completed | Termination::Exit => Some(0),
            Termination::Abort | Termination::Unhandled(_) => None,
        }
    }
}
