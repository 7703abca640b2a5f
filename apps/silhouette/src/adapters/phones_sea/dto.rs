//! DTOs for phones_sea adapter.

/// Sealed phone ready for insert.
#[derive(Debug, Clone)]
pub struct PhoneCreate {
    pub id: String,
    pub slug: String,
    pub slug_index: String,
    pub country_code: Option<String>,
    pub phone_number: String,
    pub extension: Option<String>,
    pub phone_type: String,
    pub is_current: bool,
}

/// Columns to overwrite by primary key; `None` leaves a column untouched.
#[derive(Debug, Clone, Default)]
pub struct PhoneUpdate {
    pub id: String,
    pub country_code: Option<Option<String>>,
    pub phone_number: Option<String>,
    pub extension: Option<Option<String>>,
    pub phone_type: Option<String>,
    pub is_current: Option<bool>,
}
