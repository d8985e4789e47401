/*!
 * Guard Traits
 *
 * Core abstractions for RAII guards
 */

use super::{GuardError, GuardMetadata, GuardResult};

/// Core guard trait
///
/// All guards must implement this to provide:
/// - Resource type identification
/// - Metadata access
/// - Manual release capability
///
/// Guards are not required to be `Send`: a guard over thread-local state
/// must release on the thread that created it.
pub trait Guard {
    /// Resource type name for logging/debugging
    fn resource_type(&self) -> &'static str;

    /// Get guard metadata
    fn metadata(&self) -> &GuardMetadata;

    /// Check if guard is still active
    fn is_active(&self) -> bool;

    /// Manually release the resource
    ///
    /// Returns `Err` if already released
    fn release(&mut self) -> GuardResult<()>;
}

/// Guards that can be dropped with custom cleanup
///
/// Separates Drop logic for better testability and observability
pub trait GuardDrop: Guard {
    /// Perform cleanup on drop
    ///
    /// # Panics
    ///
    /// Should NOT panic. Log errors instead.
    fn on_drop(&mut self);
}

/// Guards with observable lifecycle
pub trait Observable: Guard {
    /// Emit creation event
    fn emit_created(&self);

    /// Emit cleanup event
    fn emit_dropped(&self);

    /// Emit error event
    fn emit_error(&self, error: &GuardError);
}
