/*!
 * Demo Limits and Constants
 *
 * Centralized location for the fixed numbers the demos run against.
 */

use super::types::{Alignment, Size};

// =============================================================================
// ALLOCATION
// =============================================================================

/// One gibibyte
pub const GIB: Size = 1024 * 1024 * 1024;

/// Default alignment for a byte buffer request (`new char[n]`)
pub const DEFAULT_ALIGNMENT: Alignment = 1;

/// Oversized request used to force allocation failure (32GB on 64-bit targets)
#[cfg(target_pointer_width = "64")]
pub const OVERSIZED_REQUEST: Size = 32 * GIB;

/// Oversized request used to force allocation failure (1GB on 32-bit targets)
#[cfg(not(target_pointer_width = "64"))]
pub const OVERSIZED_REQUEST: Size = GIB;

// =============================================================================
// DEMO DRIVER
// =============================================================================

/// Number of allocation attempts per demo run
pub const DEMO_ITERATIONS: usize = 16;
