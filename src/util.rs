/// Numeric conversion helpers.
///
/// Safe conversions between `i64`, `u32`, `usize` and `f64` that report a
/// `RuntimeError` instead of silently truncating or rounding.
pub mod num;
/// Source text normalisation applied before lexing.
pub mod source;
