//! Input validation for API requests.
//!
//! For collecting multiple validation errors and returning them as an
//! ApiError, use the `ValidationErrorBuilder` from the `error` module.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for a plausible email address (local@domain.tld)
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9]([a-zA-Z0-9-]*[a-zA-Z0-9])?(\.[a-zA-Z0-9]([a-zA-Z0-9-]*[a-zA-Z0-9])?)+$"
    ).unwrap();
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email is too long (max 254 characters)".to_string());
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate a display name
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name is required".to_string());
    }

    if name.len() > 120 {
        return Err("Name is too long (max 120 characters)".to_string());
    }

    Ok(())
}

/// Validate a password. No complexity policy, only presence.
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    Ok(())
}

/// Validate an event title
pub fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Title is required".to_string());
    }

    if title.len() > 200 {
        return Err("Title is too long (max 200 characters)".to_string());
    }

    Ok(())
}

/// Validate an event location
pub fn validate_location(location: &str) -> Result<(), String> {
    if location.trim().is_empty() {
        return Err("Location is required".to_string());
    }

    Ok(())
}

/// Validate an event date. Accepts RFC 3339 or a bare local datetime
/// (`2025-01-01T20:00:00`). Past dates are allowed.
pub fn validate_event_date(date: &str) -> Result<(), String> {
    if date.is_empty() {
        return Err("Date is required".to_string());
    }

    if chrono::DateTime::parse_from_rfc3339(date).is_ok() {
        return Ok(());
    }
    if chrono::NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S").is_ok() {
        return Ok(());
    }

    Err("Invalid date format. Use RFC 3339 or YYYY-MM-DDTHH:MM:SS".to_string())
}

/// Validate a ticket count
pub fn validate_ticket_count(count: i64) -> Result<(), String> {
    if count < 1 {
        return Err("Number of tickets must be at least 1".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("first.last+tag@sub.example.co.uk").is_ok());
    }

    #[test]
    fn test_invalid_emails() {
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("missing@tld").is_err());
        assert!(validate_email("@example.com").is_err());
    }

    #[test]
    fn test_name_and_title() {
        assert!(validate_name("Ann").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_title("Gig").is_ok());
        assert!(validate_title("").is_err());
    }

    #[test]
    fn test_event_dates() {
        assert!(validate_event_date("2025-01-01T20:00:00").is_ok());
        assert!(validate_event_date("2025-01-01T20:00:00Z").is_ok());
        assert!(validate_event_date("2025-01-01T20:00:00+02:00").is_ok());
        // Past dates are accepted
        assert!(validate_event_date("1999-12-31T23:59:59").is_ok());
        assert!(validate_event_date("tomorrow").is_err());
        assert!(validate_event_date("").is_err());
    }

    #[test]
    fn test_ticket_counts() {
        assert!(validate_ticket_count(1).is_ok());
        assert!(validate_ticket_count(50).is_ok());
        assert!(validate_ticket_count(0).is_err());
        assert!(validate_ticket_count(-3).is_err());
    }
}
