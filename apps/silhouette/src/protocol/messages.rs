//! Request and response bodies for every method.
//!
//! Every request carries the owning `username`; the auth gate reads it as
//! the target owner for self-access decisions.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::repos::addresses::Address;
use crate::repos::phones::Phone;
use crate::repos::profiles::{CompleteProfile, Profile};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProfileRequest {
    pub username: String,
    #[serde(default)]
    pub nickname: Option<String>,
    /// Defaults to `true` when omitted.
    #[serde(default)]
    pub dark_mode: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetProfileRequest {
    pub username: String,
}

/// Full replacement; a blank or absent nickname clears it.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: String,
    #[serde(default)]
    pub nickname: Option<String>,
    pub dark_mode: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileResponse {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub nickname: Option<String>,
    pub dark_mode: bool,
    #[serde(default)]
    pub addresses: Vec<AddressResponse>,
    #[serde(default)]
    pub phones: Vec<PhoneResponse>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        Self {
            username: p.username,
            nickname: p.nickname,
            dark_mode: p.dark_mode,
            addresses: Vec::new(),
            phones: Vec::new(),
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

impl From<CompleteProfile> for ProfileResponse {
    fn from(c: CompleteProfile) -> Self {
        Self {
            addresses: c.addresses.into_iter().map(AddressResponse::from).collect(),
            phones: c.phones.into_iter().map(PhoneResponse::from).collect(),
            ..Self::from(c.profile)
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAddressRequest {
    pub username: String,
    pub street_address: String,
    #[serde(default)]
    pub street_address_2: Option<String>,
    pub city: String,
    pub state_province: String,
    pub postal_code: String,
    pub country: String,
    #[serde(default)]
    pub is_current: bool,
}

/// Full replacement of the address at `slug`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAddressRequest {
    pub username: String,
    pub slug: String,
    pub street_address: String,
    #[serde(default)]
    pub street_address_2: Option<String>,
    pub city: String,
    pub state_province: String,
    pub postal_code: String,
    pub country: String,
    #[serde(default)]
    pub is_current: bool,
}

/// Body of GetAddress and DeleteAddress.
#[derive(Debug, Clone, Deserialize)]
pub struct AddressLookupRequest {
    pub username: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddressResponse {
    pub slug: String,
    pub street_address: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub street_address_2: Option<String>,
    pub city: String,
    pub state_province: String,
    pub postal_code: String,
    pub country: String,
    pub is_current: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Address> for AddressResponse {
    fn from(a: Address) -> Self {
        Self {
            slug: a.slug,
            street_address: a.address_line_1,
            street_address_2: a.address_line_2,
            city: a.city,
            state_province: a.state,
            postal_code: a.zip,
            country: a.country,
            is_current: a.is_current,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePhoneRequest {
    pub username: String,
    #[serde(default)]
    pub country_code: Option<String>,
    pub phone_number: String,
    #[serde(default)]
    pub extension: Option<String>,
    pub phone_type: String,
    #[serde(default)]
    pub is_current: bool,
}

/// Full replacement of the phone at `slug`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePhoneRequest {
    pub username: String,
    pub slug: String,
    #[serde(default)]
    pub country_code: Option<String>,
    pub phone_number: String,
    #[serde(default)]
    pub extension: Option<String>,
    pub phone_type: String,
    #[serde(default)]
    pub is_current: bool,
}

/// Body of GetPhone and DeletePhone.
#[derive(Debug, Clone, Deserialize)]
pub struct PhoneLookupRequest {
    pub username: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhoneResponse {
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub country_code: Option<String>,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub extension: Option<String>,
    pub phone_type: String,
    pub is_current: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Phone> for PhoneResponse {
    fn from(p: Phone) -> Self {
        Self {
            slug: p.slug,
            country_code: p.country_code,
            phone_number: p.phone_number,
            extension: p.extension,
            phone_type: p.phone_type,
            is_current: p.is_current,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn profile_response_omits_absent_nickname_and_uses_rfc3339() {
        let resp = ProfileResponse::from(Profile {
            id: "internal".into(),
            username: "alice@example.com".into(),
            nickname: None,
            dark_mode: true,
            created_at: datetime!(2025-03-01 12:00 UTC),
            updated_at: datetime!(2025-03-01 12:00 UTC),
        });
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("nickname").is_none());
        assert!(json.get("id").is_none());
        assert_eq!(json["created_at"], "2025-03-01T12:00:00Z");
        assert_eq!(json["addresses"], serde_json::json!([]));
    }

    #[test]
    fn create_profile_defaults() {
        let req: CreateProfileRequest =
            serde_json::from_str(r#"{"username":"bob@example.com"}"#).unwrap();
        assert_eq!(req.nickname, None);
        assert_eq!(req.dark_mode, None);
    }
}
