/*!
 * Core Types
 * Common types used across the crate
 */

/// Size type for allocation requests, in bytes
pub type Size = usize;

/// Alignment type for allocation requests, in bytes (always a power of two)
pub type Alignment = usize;
