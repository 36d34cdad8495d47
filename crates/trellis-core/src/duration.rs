use std::time::Duration;

/// Errors from [`parse_duration`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DurationError {
    /// The value is not a number followed by an optional `ms` or `s` unit.
    #[error("invalid duration: {0:?}")]
    Invalid(String),
    /// The value is negative or not finite.
    #[error("duration out of range: {0:?}")]
    OutOfRange(String),
}

/// Parse a CSS-style time value: `"150ms"`, `"0.3s"`, or a bare number of
/// milliseconds. Surrounding whitespace is ignored; an empty string is zero.
pub fn parse_duration(value: &str) -> Result<Duration, DurationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(Duration::ZERO);
    }

    let (number, scale) = if let Some(ms) = value.strip_suffix("ms") {
        (ms, 1.0)
    } else if let Some(s) = value.strip_suffix('s') {
        (s, 1000.0)
    } else {
        (value, 1.0)
    };

    let millis: f64 = number
        .trim()
        .parse()
        .map_err(|_| DurationError::Invalid(value.to_string()))?;
    let millis = millis * scale;
    if !millis.is_finite() || millis < 0.0 {
        return Err(DurationError::OutOfRange(value.to_string()));
    }
    Ok(Duration::from_nanos((millis * 1_000_000.0).round() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn milliseconds() {
        assert_eq!(parse_duration("150ms"), Ok(Duration::from_millis(150)));
    }

    #[test]
    fn seconds() {
        assert_eq!(parse_duration(" 0.5s "), Ok(Duration::from_millis(500)));
    }

    #[test]
    fn bare_number_is_milliseconds() {
        assert_eq!(parse_duration("40"), Ok(Duration::from_millis(40)));
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(parse_duration(""), Ok(Duration::ZERO));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(parse_duration("soon"), Err(DurationError::Invalid(_))));
        assert!(matches!(
            parse_duration("-5ms"),
            Err(DurationError::OutOfRange(_))
        ));
    }
}
