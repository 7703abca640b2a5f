//! Request field validation and normalization.
//!
//! Every check returns the value as it will be stored (trimmed, digits
//! only, lowercase phone type) or an `InvalidArgument` error.

use lazy_regex::regex_is_match;
use uuid::Uuid;

use crate::error::AppError;
use crate::errors::ErrorCode;

pub const MAX_USERNAME_LEN: usize = 254;
pub const NICKNAME_MIN: usize = 2;
pub const NICKNAME_MAX: usize = 50;
pub const MAX_ADDRESS_FIELD_LEN: usize = 128;

pub const PHONE_TYPES: [&str; 4] = ["mobile", "home", "work", "other"];

pub fn username(raw: &str) -> Result<String, AppError> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(AppError::invalid(ErrorCode::InvalidUsername, "username is required"));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(AppError::invalid(
            ErrorCode::InvalidUsername,
            format!("username must be {MAX_USERNAME_LEN} characters or less"),
        ));
    }
    if !regex_is_match!(r"^[^\s@]+@[^\s@]+\.[^\s@.]+$", username) {
        return Err(AppError::invalid(
            ErrorCode::InvalidUsername,
            "username must be a valid email address",
        ));
    }
    Ok(username.to_string())
}

/// Blank clears the nickname (`None`).
pub fn nickname(raw: Option<&str>) -> Result<Option<String>, AppError> {
    let Some(nickname) = raw.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };
    let len = nickname.chars().count();
    if len < NICKNAME_MIN {
        return Err(AppError::invalid(
            ErrorCode::InvalidNickname,
            format!("nickname must be at least {NICKNAME_MIN} characters"),
        ));
    }
    if len > NICKNAME_MAX {
        return Err(AppError::invalid(
            ErrorCode::InvalidNickname,
            format!("nickname must be {NICKNAME_MAX} characters or less"),
        ));
    }
    if !regex_is_match!(r"^[\p{L}\p{N}\s._'-]+$", nickname) {
        return Err(AppError::invalid(
            ErrorCode::InvalidNickname,
            "nickname may only contain letters, numbers, spaces, dots, underscores, hyphens and apostrophes",
        ));
    }
    if nickname.contains("  ") {
        return Err(AppError::invalid(
            ErrorCode::InvalidNickname,
            "nickname cannot contain consecutive spaces",
        ));
    }
    Ok(Some(nickname.to_string()))
}

/// Slugs are UUIDs; the canonical lowercase hyphenated form is returned
/// so the blind index matches the one computed at creation.
pub fn slug(raw: &str) -> Result<String, AppError> {
    Uuid::parse_str(raw.trim())
        .map(|u| u.to_string())
        .map_err(|_| AppError::invalid(ErrorCode::InvalidSlug, "slug must be a valid uuid"))
}

/// Kinds of address text, each with its own allowed character set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressPart {
    Street,
    City,
    State,
    PostalCode,
    Country,
}

impl AddressPart {
    fn matches(self, value: &str) -> bool {
        match self {
            AddressPart::Street => regex_is_match!(r"^[\p{L}\p{N}\s.,'#/&()-]+$", value),
            AddressPart::City | AddressPart::State | AddressPart::Country => {
                regex_is_match!(r"^[\p{L}\s.,'()-]+$", value)
            }
            AddressPart::PostalCode => regex_is_match!(r"^[\p{L}\p{N} -]+$", value),
        }
    }
}

pub fn address_field(field: &str, part: AddressPart, raw: &str) -> Result<String, AppError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(AppError::invalid(
            ErrorCode::InvalidAddress,
            format!("{field} is required"),
        ));
    }
    check_address_text(field, part, value)?;
    Ok(value.to_string())
}

/// Blank is `None`.
pub fn optional_address_field(
    field: &str,
    part: AddressPart,
    raw: Option<&str>,
) -> Result<Option<String>, AppError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => {
            check_address_text(field, part, value)?;
            Ok(Some(value.to_string()))
        }
    }
}

fn check_address_text(field: &str, part: AddressPart, value: &str) -> Result<(), AppError> {
    if value.chars().count() > MAX_ADDRESS_FIELD_LEN {
        return Err(AppError::invalid(
            ErrorCode::InvalidAddress,
            format!("{field} must be {MAX_ADDRESS_FIELD_LEN} characters or less"),
        ));
    }
    if !part.matches(value) {
        return Err(AppError::invalid(
            ErrorCode::InvalidAddress,
            format!("{field} contains invalid characters"),
        ));
    }
    Ok(())
}

fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

fn digit_run(field: &str, raw: &str, min: usize, max: usize) -> Result<String, AppError> {
    let digits = digits_only(raw);
    if digits.len() < min || digits.len() > max {
        return Err(AppError::invalid(
            ErrorCode::InvalidPhone,
            format!("{field} must be {min} to {max} digits"),
        ));
    }
    Ok(digits)
}

pub fn phone_number(raw: &str) -> Result<String, AppError> {
    digit_run("phone_number", raw, 4, 15)
}

/// Absent or without any digit is `None`.
pub fn country_code(raw: Option<&str>) -> Result<Option<String>, AppError> {
    match raw.filter(|v| !digits_only(v).is_empty()) {
        None => Ok(None),
        Some(v) => digit_run("country_code", v, 1, 4).map(Some),
    }
}

/// Absent or without any digit is `None`.
pub fn extension(raw: Option<&str>) -> Result<Option<String>, AppError> {
    match raw.filter(|v| !digits_only(v).is_empty()) {
        None => Ok(None),
        Some(v) => digit_run("extension", v, 1, 6).map(Some),
    }
}

/// Accepts `mobile` as well as `PHONE_TYPE_MOBILE`, any case.
pub fn phone_type(raw: &str) -> Result<String, AppError> {
    let upper = raw.trim().to_ascii_uppercase();
    let bare = upper.strip_prefix("PHONE_TYPE_").unwrap_or(&upper);
    let lower = bare.to_ascii_lowercase();
    if PHONE_TYPES.contains(&lower.as_str()) {
        Ok(lower)
    } else {
        Err(AppError::invalid(
            ErrorCode::InvalidPhone,
            format!("phone_type must be one of {}", PHONE_TYPES.join(", ")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_is_trimmed_email() {
        assert_eq!(username("  alice@example.com ").unwrap(), "alice@example.com");
        for bad in ["", "alice", "alice@", "a b@example.com", "alice@example"] {
            let err = username(bad).unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidUsername, "{bad:?}");
        }
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(username(&long).is_err());
    }

    #[test]
    fn nickname_rules() {
        assert_eq!(nickname(None).unwrap(), None);
        assert_eq!(nickname(Some("   ")).unwrap(), None);
        assert_eq!(nickname(Some(" Zoë O'Neil ")).unwrap().as_deref(), Some("Zoë O'Neil"));
        assert!(nickname(Some("a")).is_err());
        assert!(nickname(Some(&"x".repeat(51))).is_err());
        assert!(nickname(Some("two  spaces")).is_err());
        assert!(nickname(Some("semi;colon")).is_err());
    }

    #[test]
    fn slug_is_canonical_uuid() {
        let s = slug("  6F9619FF-8B86-D011-B42D-00C04FC964FF ").unwrap();
        assert_eq!(s, "6f9619ff-8b86-d011-b42d-00c04fc964ff");
        assert_eq!(slug("nope").unwrap_err().code(), ErrorCode::InvalidSlug);
    }

    #[test]
    fn address_fields() {
        assert_eq!(
            address_field("street_address", AddressPart::Street, " 12 Rue de l'Église ").unwrap(),
            "12 Rue de l'Église"
        );
        assert!(address_field("city", AddressPart::City, "").is_err());
        assert!(address_field("city", AddressPart::City, "Paris<script>").is_err());
        assert!(address_field("city", AddressPart::City, &"a".repeat(129)).is_err());
        assert_eq!(
            optional_address_field("street_address_2", AddressPart::Street, Some(" ")).unwrap(),
            None
        );
        assert_eq!(
            address_field("postal_code", AddressPart::PostalCode, "SW1A 1AA").unwrap(),
            "SW1A 1AA"
        );
    }

    #[test]
    fn phone_parts_normalize_to_digits() {
        assert_eq!(phone_number("(555) 123-4567").unwrap(), "5551234567");
        assert!(phone_number("12").is_err());
        assert!(phone_number(&"9".repeat(16)).is_err());
        assert_eq!(country_code(Some("+1")).unwrap().as_deref(), Some("1"));
        assert_eq!(country_code(Some("")).unwrap(), None);
        assert!(country_code(Some("+12345")).is_err());
        assert_eq!(extension(Some("x 204")).unwrap().as_deref(), Some("204"));
        assert!(extension(Some("1234567")).is_err());
    }

    #[test]
    fn phone_type_accepts_prefixed_and_bare_names() {
        assert_eq!(phone_type("PHONE_TYPE_MOBILE").unwrap(), "mobile");
        assert_eq!(phone_type(" Work ").unwrap(), "work");
        assert_eq!(phone_type("phone_type_home").unwrap(), "home");
        assert!(phone_type("PHONE_TYPE_UNSPECIFIED").is_err());
        assert!(phone_type("fax").is_err());
    }
}
