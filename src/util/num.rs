use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Largest integer magnitude exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_U64_INT: u64 = 9_007_199_254_740_991;

/// Safely converts an `i64` to `f64` if and only if it is exactly
/// representable.
///
/// ## Errors
/// Returns `Err(error)` if the value exceeds `MAX_SAFE_U64_INT` in absolute
/// value.
///
/// ## Example
/// ```
/// use kmsl::util::num::{MAX_SAFE_U64_INT, i64_to_f64_checked};
///
/// assert_eq!(i64_to_f64_checked(42, "too big!"), Ok(42.0));
///
/// let big = MAX_SAFE_U64_INT as i64 + 1;
/// assert!(i64_to_f64_checked(big, "too big!").is_err());
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn i64_to_f64_checked<E>(value: i64, error: E) -> Result<f64, E> {
    if value.unsigned_abs() > MAX_SAFE_U64_INT {
        return Err(error);
    }
    Ok(value as f64)
}

/// Converts a whole `f64` to `i64`.
///
/// ## Errors
/// Non-finite values are a type mismatch, values outside the `i64` range are
/// `LiteralTooLarge`, and fractional values are a domain error.
///
/// ## Example
/// ```
/// use kmsl::{error::RuntimeError, util::num::f64_to_i64_checked};
///
/// assert_eq!(f64_to_i64_checked(1000.0, 1).unwrap(), 1000);
/// assert!(matches!(f64_to_i64_checked(1e20, 5), Err(RuntimeError::LiteralTooLarge { pos: 5, .. })));
/// assert!(matches!(f64_to_i64_checked(1.5, 9), Err(RuntimeError::Domain { pos: 9, .. })));
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
pub fn f64_to_i64_checked(value: f64, pos: usize) -> EvalResult<i64> {
    if !value.is_finite() {
        return Err(RuntimeError::mismatch(format!("cannot convert {value} to an int"), pos));
    }
    if value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return Err(RuntimeError::LiteralTooLarge { value: value.to_string(),
                                                   pos });
    }
    if value.fract() != 0.0 {
        return Err(RuntimeError::Domain { operation: "int conversion",
                                          operand: value.to_string(),
                                          pos });
    }
    Ok(value as i64)
}

/// Converts a shift amount to `u32`.
///
/// ## Errors
/// Negative amounts and amounts of 64 or more.
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
pub fn shift_amount_checked(value: i64, pos: usize) -> EvalResult<u32> {
    if !(0..64).contains(&value) {
        return Err(RuntimeError::Domain { operation: "shift",
                                          operand: value.to_string(),
                                          pos });
    }
    Ok(value as u32)
}

/// Longest string, in bytes, that string operators may build.
pub const MAX_STRING_LEN: usize = 1 << 28;

/// Converts a repetition count to `usize`, given the byte length of the
/// string being repeated.
///
/// ## Errors
/// Negative counts are a `NegativeRepetition`; counts whose result would
/// be longer than [`MAX_STRING_LEN`] are `StringTooLong`.
///
/// ## Example
/// ```
/// use kmsl::{error::RuntimeError, util::num::repetition_count_checked};
///
/// assert_eq!(repetition_count_checked(3, 2, 0).unwrap(), 3);
/// assert!(matches!(repetition_count_checked(-1, 2, 4),
///                  Err(RuntimeError::NegativeRepetition { count: -1, pos: 4 })));
/// assert!(matches!(repetition_count_checked(i64::MAX, 2, 4),
///                  Err(RuntimeError::StringTooLong { pos: 4, .. })));
/// ```
pub fn repetition_count_checked(count: i64, len: usize, pos: usize) -> EvalResult<usize> {
    if count < 0 {
        return Err(RuntimeError::NegativeRepetition { count, pos });
    }
    let count = usize::try_from(count).map_err(|_| RuntimeError::StringTooLong { limit: MAX_STRING_LEN,
                                                                                pos })?;
    string_len_checked(len.checked_mul(count), pos)?;
    Ok(count)
}

/// Checks the byte length a string operator is about to produce.
///
/// `None` stands for a length that overflowed `usize`.
///
/// ## Errors
/// `StringTooLong` when the length is unknown or above [`MAX_STRING_LEN`].
pub fn string_len_checked(len: Option<usize>, pos: usize) -> EvalResult<usize> {
    len.filter(|&len| len <= MAX_STRING_LEN)
       .ok_or(RuntimeError::StringTooLong { limit: MAX_STRING_LEN,
                                            pos })
}
