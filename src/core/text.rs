/*!
 * Text Conversion
 * Checked conversion of printable values into owned strings
 */

use super::errors::ConversionError;
use std::fmt::{Display, Write};

/// Render `value` through its `Display` impl
///
/// Unlike `ToString::to_string`, a `Display` impl that reports
/// `fmt::Error` surfaces as a [`ConversionError`] instead of a panic.
///
/// # Example
///
/// ```
/// use oom_policy::core::to_text;
///
/// assert_eq!(to_text(&42usize).unwrap(), "42");
/// ```
pub fn to_text<T: Display + ?Sized>(value: &T) -> Result<String, ConversionError> {
    let mut out = String::new();
    write!(out, "{}", value).map_err(|_| ConversionError::of::<T>())?;
    Ok(out)
}
