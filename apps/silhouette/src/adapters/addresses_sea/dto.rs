//! DTOs for addresses_sea adapter.

/// Sealed address ready for insert.
#[derive(Debug, Clone)]
pub struct AddressCreate {
    pub id: String,
    pub slug: String,
    pub slug_index: String,
    pub address_line_1: String,
    pub address_line_2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub is_current: bool,
}

/// Columns to overwrite by primary key; `None` leaves a column untouched.
#[derive(Debug, Clone, Default)]
pub struct AddressUpdate {
    pub id: String,
    pub address_line_1: Option<String>,
    pub address_line_2: Option<Option<String>>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    pub is_current: Option<bool>,
}
