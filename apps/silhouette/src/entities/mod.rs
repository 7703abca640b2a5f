pub mod addresses;
pub mod phones;
pub mod profile_addresses;
pub mod profile_phones;
pub mod profiles;

pub use addresses::Entity as Addresses;
pub use phones::Entity as Phones;
pub use profile_addresses::Entity as ProfileAddresses;
pub use profile_phones::Entity as ProfilePhones;
pub use profiles::Entity as Profiles;
