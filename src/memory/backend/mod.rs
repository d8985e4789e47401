/*!
 * Allocator Backends
 */

mod limited;
mod system;

pub use limited::LimitedBackend;
pub use system::SystemBackend;
