//! DTOs for profiles_sea adapter.

use sea_orm::FromQueryResult;
use time::OffsetDateTime;

/// Sealed profile ready for insert.
#[derive(Debug, Clone)]
pub struct ProfileCreate {
    pub id: String,
    pub username: String,
    pub user_index: String,
    pub nickname: Option<String>,
    pub dark_mode: bool,
}

/// Columns to overwrite by primary key; `None` leaves a column untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub id: String,
    pub nickname: Option<Option<String>>,
    pub dark_mode: Option<bool>,
}

impl ProfileUpdate {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_nickname(mut self, nickname: Option<String>) -> Self {
        self.nickname = Some(nickname);
        self
    }

    pub fn with_dark_mode(mut self, dark_mode: bool) -> Self {
        self.dark_mode = Some(dark_mode);
        self
    }
}

/// One row of the profile ⟕ addresses ⟕ phones join. Address and phone
/// columns are null when the profile has none.
#[derive(Debug, Clone, FromQueryResult)]
pub struct CompleteProfileRow {
    pub profile_id: String,
    pub username: String,
    pub nickname: Option<String>,
    pub dark_mode: bool,
    pub profile_created_at: OffsetDateTime,
    pub profile_updated_at: OffsetDateTime,

    pub address_id: Option<String>,
    pub address_slug: Option<String>,
    pub address_slug_index: Option<String>,
    pub address_line_1: Option<String>,
    pub address_line_2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    pub address_is_current: Option<bool>,
    pub address_created_at: Option<OffsetDateTime>,
    pub address_updated_at: Option<OffsetDateTime>,

    pub phone_id: Option<String>,
    pub phone_slug: Option<String>,
    pub phone_slug_index: Option<String>,
    pub country_code: Option<String>,
    pub phone_number: Option<String>,
    pub extension: Option<String>,
    pub phone_type: Option<String>,
    pub phone_is_current: Option<bool>,
    pub phone_created_at: Option<OffsetDateTime>,
    pub phone_updated_at: Option<OffsetDateTime>,
}
