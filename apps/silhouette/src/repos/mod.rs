//! Record stores. Every function takes the connection, the shared
//! [`RecordCrypto`](crate::crypto::RecordCrypto) and the caller's
//! cancellation token explicitly; plaintext only exists above this layer.

pub mod addresses;
pub mod phones;
pub mod profiles;
pub mod xref;
