use once_cell::sync::Lazy;
use regex::Regex;
use wasm_bindgen::{JsCast, JsValue};

// "25", "1.5", ".5", "25m", "25 min", "25 minutes". ASCII digits only.
static MINUTES_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]+(?:\.[0-9]*)?|\.[0-9]+)\s*(?:m|min|mins|minutes?)?$").unwrap()
});

/// Whole minutes shown for a duration in seconds (rounded down).
pub fn seconds_to_minutes(secs: u32) -> u32 {
    secs / 60
}

/// Best-effort human readable text for a thrown JavaScript value.
pub fn js_error_text(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// Minute-entry parsing error types
#[derive(Debug, PartialEq, Eq)]
pub enum MinutesParseError {
    EmptyInput,
    InvalidFormat(String),
    TooLarge,
}

impl std::fmt::Display for MinutesParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MinutesParseError::EmptyInput => write!(f, "Minutes cannot be empty"),
            MinutesParseError::InvalidFormat(input) => {
                write!(f, "Invalid minutes: {:?}. Use a number such as 25 or 1.5", input)
            }
            MinutesParseError::TooLarge => write!(f, "Minutes value is too large"),
        }
    }
}

impl std::error::Error for MinutesParseError {}

/// Parse the text of a minutes input box.
///
/// Only the shape of the text is checked; the value is not range-checked.
///
/// # Examples
/// ```
/// use lofi_pomodoro::utils::parse_minutes;
/// assert_eq!(parse_minutes("25"), Ok(25.0));
/// assert_eq!(parse_minutes("25m"), Ok(25.0));
/// assert_eq!(parse_minutes(" 1.5 min "), Ok(1.5));
/// ```
pub fn parse_minutes(input: &str) -> Result<f64, MinutesParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(MinutesParseError::EmptyInput);
    }

    let captures = MINUTES_REGEX
        .captures(trimmed)
        .ok_or_else(|| MinutesParseError::InvalidFormat(trimmed.to_string()))?;
    let minutes = captures[1]
        .parse::<f64>()
        .map_err(|_| MinutesParseError::InvalidFormat(trimmed.to_string()))?;
    if !minutes.is_finite() {
        return Err(MinutesParseError::TooLarge);
    }
    Ok(minutes)
}

/// Convert typed minutes to whole seconds (rounded to the nearest second),
/// refusing negative values and values that overflow.
pub fn minutes_to_seconds(minutes: f64) -> Result<u32, MinutesParseError> {
    if !minutes.is_finite() || minutes < 0.0 {
        return Err(MinutesParseError::InvalidFormat(minutes.to_string()));
    }
    let secs = (minutes * 60.0).round();
    if secs > u32::MAX as f64 {
        return Err(MinutesParseError::TooLarge);
    }
    Ok(secs as u32)
}
