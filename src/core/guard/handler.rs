/*!
 * New-Handler Guards
 *
 * RAII scope for the per-thread new-handler slot
 */

use super::traits::{Guard, GuardDrop, Observable};
use super::{GuardError, GuardMetadata, GuardResult};
use crate::memory::handler::{install_handler, NewHandler};
use tracing::{debug, error};

/// Scoped new-handler installation
///
/// Installs a handler on creation and puts the previous one back when
/// released or dropped, including during panic unwinding. Scopes on the
/// same thread must be released in LIFO order.
///
/// # Example
///
/// ```ignore
/// let _scope = HandlerScope::install(new_handler(|| println!("new handler ")));
/// let block = allocator.allocate_with_hook(size)?;
/// // Previous handler restored on drop
/// ```
pub struct HandlerScope {
    previous: Option<NewHandler>,
    metadata: GuardMetadata,
    active: bool,
}

impl HandlerScope {
    /// Install `handler` for the lifetime of the returned scope
    pub fn install(handler: NewHandler) -> Self {
        Self::replace(Some(handler))
    }

    /// Remove any installed handler for the lifetime of the returned scope
    pub fn clear() -> Self {
        Self::replace(None)
    }

    fn replace(handler: Option<NewHandler>) -> Self {
        let previous = install_handler(handler);
        let scope = Self {
            previous,
            metadata: GuardMetadata::new("new_handler"),
            active: true,
        };

        scope.emit_created();
        scope
    }

    /// Whether a handler was installed when this scope was created
    #[inline]
    pub fn had_previous(&self) -> bool {
        self.previous.is_some()
    }
}

impl Guard for HandlerScope {
    fn resource_type(&self) -> &'static str {
        "new_handler"
    }

    fn metadata(&self) -> &GuardMetadata {
        &self.metadata
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn release(&mut self) -> GuardResult<()> {
        if !self.active {
            return Err(GuardError::AlreadyReleased);
        }

        self.active = false;
        install_handler(self.previous.take());

        self.emit_dropped();
        Ok(())
    }
}

impl GuardDrop for HandlerScope {
    fn on_drop(&mut self) {
        if self.active {
            if let Err(e) = self.release() {
                error!(error = %e, "new-handler scope drop failed");
                self.emit_error(&e);
            }
        }
    }
}

impl Observable for HandlerScope {
    fn emit_created(&self) {
        debug!(
            resource = self.resource_type(),
            had_previous = self.previous.is_some(),
            "new-handler scope entered"
        );
    }

    fn emit_dropped(&self) {
        debug!(
            resource = self.resource_type(),
            lifetime_us = self.metadata.lifetime_micros(),
            "new-handler scope restored previous handler"
        );
    }

    fn emit_error(&self, error: &GuardError) {
        error!(resource = self.resource_type(), error = %error, "new-handler scope error");
    }
}

impl Drop for HandlerScope {
    #[inline]
    fn drop(&mut self) {
        self.on_drop();
    }
}
