//! Types needed in multiple modules

/// Enumeration of binary symbol values
#[derive(Clone, Eq, PartialEq, Debug, Copy)]
pub enum Bit {
    /// Binary symbol `0`
    Zero = 0,
    /// Binary symbol `1`
    One = 1,
}

/// Custom error type
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Input outside the domain of a formula
    #[error("{0}")]
    InvalidInput(String),
    /// Required input field absent from the request
    #[error("{0}")]
    MissingInput(String),
    /// Request body that could not be parsed
    #[error("{0}")]
    MalformedBody(String),
    /// Cross-origin request from an origin outside the allow-list
    #[error("Not allowed by CORS")]
    OriginNotAllowed(String),
    /// Invalid preview-origin pattern
    #[error("Invalid origin pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    /// Socket error
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Background task failure
    #[error("Task failed: {0}")]
    Task(String),
}

/// Returns an error unless `value` is finite.
pub(crate) fn check_finite(name: &str, value: f64) -> Result<(), Error> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!("{name} must be a finite number")))
    }
}

/// Returns an error unless the computed result `value` is finite.
pub(crate) fn check_result(name: &str, value: f64) -> Result<(), Error> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "inputs yield a {name} that is not a finite number"
        )))
    }
}

/// Returns an error unless `value` is finite and strictly positive.
pub(crate) fn check_positive(name: &str, value: f64) -> Result<(), Error> {
    check_finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "{name} must be positive (found {value})"
        )))
    }
}

/// Returns an error unless `value` is finite and nonnegative.
pub(crate) fn check_nonnegative(name: &str, value: f64) -> Result<(), Error> {
    check_finite(name, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "{name} cannot be negative (found {value})"
        )))
    }
}

/// Returns the modulation order as an integer if it is a power of two no less than `2`.
///
/// # Errors
///
/// Returns an error if `order` is not an integral power of two in `[2, 2^31]`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn modulation_order(name: &str, order: f64) -> Result<u32, Error> {
    check_finite(name, order)?;
    if order < 2.0 || order.fract() != 0.0 || order > f64::from(1u32 << 31) {
        return Err(Error::InvalidInput(format!(
            "{name} must be a power of two no less than 2 (found {order})"
        )));
    }
    let order = order as u32;
    if order.is_power_of_two() {
        Ok(order)
    } else {
        Err(Error::InvalidInput(format!(
            "{name} must be a power of two no less than 2 (found {order})"
        )))
    }
}
