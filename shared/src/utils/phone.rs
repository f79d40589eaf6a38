//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

// E.164 with leading plus
static E164_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+[1-9]\d{7,14}$").unwrap());

// Bare national/international digits (e.g. 998901234567)
static DIGITS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[1-9]\d{7,14}$").unwrap());

/// Normalize a phone number by removing common formatting characters
pub fn normalize_phone_number(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Check if a phone number is valid (E.164 or bare digit form)
pub fn is_valid_phone(phone: &str) -> bool {
    let normalized = normalize_phone_number(phone);
    E164_REGEX.is_match(&normalized) || DIGITS_REGEX.is_match(&normalized)
}

/// Mask a phone number for logs (e.g. 998****4567)
pub fn mask_phone_number(phone: &str) -> String {
    let normalized = normalize_phone_number(phone);
    if normalized.len() >= 7 {
        format!(
            "{}****{}",
            &normalized[0..3],
            &normalized[normalized.len() - 4..]
        )
    } else {
        "****".to_string()
    }
}
