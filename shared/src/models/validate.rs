//! Custom field validators used by the payload derives

use validator::ValidationError;

/// Local part of a phone number: 6 to 15 digits
pub(crate) fn mobile_number(value: &str) -> Result<(), ValidationError> {
    let ok = (6..=15).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit());
    if ok {
        Ok(())
    } else {
        Err(ValidationError::new("mobile_number")
            .with_message("must be 6 to 15 digits".into()))
    }
}

/// Dial code such as `+91` or `91`
pub(crate) fn country_code(value: &str) -> Result<(), ValidationError> {
    let digits = value.strip_prefix('+').unwrap_or(value);
    let ok = (1..=4).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit());
    if ok {
        Ok(())
    } else {
        Err(ValidationError::new("country_code")
            .with_message("must look like +91".into()))
    }
}
