//! SeaORM adapters. Every value crossing this boundary is already sealed:
//! ciphertext and blind indexes in, ciphertext out.

pub mod addresses_sea;
pub mod phones_sea;
pub mod profiles_sea;
pub mod xref_sea;
