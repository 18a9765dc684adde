//! Form-level input checks shared by the cells.

use std::sync::OnceLock;

use regex::Regex;

use shared_models::error::AppError;

pub const OTP_LENGTH: usize = 6;
pub const MIN_PASSWORD_LENGTH: usize = 8;

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("email pattern compiles")
    })
}

fn phone_pattern() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^\+?[0-9]{9,15}$").expect("phone pattern compiles"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email.trim())
}

/// Digits with an optional leading `+`; spaces, dots and dashes are ignored.
pub fn is_valid_phone(phone: &str) -> bool {
    let compact: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.'))
        .collect();
    phone_pattern().is_match(&compact)
}

pub fn is_valid_otp(code: &str) -> bool {
    code.len() == OTP_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
}

pub fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::ValidationError(format!("{} is required", field)));
    }
    Ok(())
}

pub fn require_phone(phone: &str) -> Result<(), AppError> {
    if !is_valid_phone(phone) {
        return Err(AppError::ValidationError("Phone number is invalid".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(is_valid_email("patient@example.com"));
        assert!(is_valid_email(" first.last+tag@clinic.co.uk "));
        assert!(!is_valid_email("patient@"));
        assert!(!is_valid_email("not an email"));
    }

    #[test]
    fn test_phone() {
        assert!(is_valid_phone("0901234567"));
        assert!(is_valid_phone("+84 901-234-567"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("09012abc67"));
    }

    #[test]
    fn test_otp() {
        assert!(is_valid_otp("012345"));
        assert!(!is_valid_otp("12345"));
        assert!(!is_valid_otp("1234567"));
        assert!(!is_valid_otp("12a456"));
        assert!(!is_valid_otp("١٢٣٤٥٦"));
    }
}
