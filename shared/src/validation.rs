//! Input validation functions
//!
//! This module provides validation utilities for user input.

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if email.len() > 255 {
        return Err("Email too long".to_string());
    }
    let email_regex = regex_lite::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    if !email_regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Validate username: 3-50 characters, letters, digits, dot, dash, underscore
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.len() < 3 {
        return Err("Username must be at least 3 characters".to_string());
    }
    if username.len() > 50 {
        return Err("Username must be at most 50 characters".to_string());
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
    {
        return Err("Username may only contain letters, digits, '.', '-' and '_'".to_string());
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 6 {
        return Err("Password must be at least 6 characters".to_string());
    }
    if password.len() > 128 {
        return Err("Password too long".to_string());
    }
    Ok(())
}

/// Validate a saved position name
pub fn validate_position_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Position name cannot be empty".to_string());
    }
    if name.len() > 100 {
        return Err("Position name too long".to_string());
    }
    Ok(())
}

/// Validate a stage coordinate value
pub fn validate_coordinate(value: f64) -> Result<(), String> {
    if value.is_nan() || value.is_infinite() {
        return Err("Coordinate must be a valid number".to_string());
    }
    Ok(())
}
