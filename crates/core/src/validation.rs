//! Input policy for registration fields.

use crate::error::DomainError;

/// Minimum number of characters in a password.
pub const MIN_PASSWORD_CHARS: usize = 8;

/// bcrypt only reads the first 72 bytes of its input.
pub const MAX_PASSWORD_BYTES: usize = 72;

const MAX_DISPLAY_NAME_CHARS: usize = 100;

/// Check a new password against the strength policy.
///
/// Requires at least 8 characters, at least one letter and one digit, and no
/// more than 72 bytes.
pub fn validate_password_strength(password: &str) -> Result<(), DomainError> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(DomainError::validation(format!(
            "password must be at least {MIN_PASSWORD_CHARS} characters"
        )));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(DomainError::validation(format!(
            "password must be at most {MAX_PASSWORD_BYTES} bytes"
        )));
    }
    if !password.chars().any(char::is_alphabetic) {
        return Err(DomainError::validation("password must contain a letter"));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(DomainError::validation("password must contain a digit"));
    }
    Ok(())
}

/// Check a display name: non-blank, at most 100 characters.
pub fn validate_display_name(name: &str) -> Result<(), DomainError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("name is required"));
    }
    if name.chars().count() > MAX_DISPLAY_NAME_CHARS {
        return Err(DomainError::validation("name is too long"));
    }
    Ok(())
}
