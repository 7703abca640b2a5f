//! Method identities and their declared authorization policies.
//!
//! Each method is exposed at `POST <full method name>`, so the request
//! path is exactly what the policy table is keyed by.

pub mod messages;

use crate::auth::{AuthPolicy, PolicyError, PolicyTable};

pub const PACKAGE: &str = "silhouette.v1";

pub mod methods {
    pub const CREATE_PROFILE: &str = "/silhouette.v1.Profiles/CreateProfile";
    pub const GET_PROFILE: &str = "/silhouette.v1.Profiles/GetProfile";
    pub const UPDATE_PROFILE: &str = "/silhouette.v1.Profiles/UpdateProfile";

    pub const CREATE_ADDRESS: &str = "/silhouette.v1.Addresses/CreateAddress";
    pub const GET_ADDRESS: &str = "/silhouette.v1.Addresses/GetAddress";
    pub const UPDATE_ADDRESS: &str = "/silhouette.v1.Addresses/UpdateAddress";
    pub const DELETE_ADDRESS: &str = "/silhouette.v1.Addresses/DeleteAddress";

    pub const CREATE_PHONE: &str = "/silhouette.v1.Phones/CreatePhone";
    pub const GET_PHONE: &str = "/silhouette.v1.Phones/GetPhone";
    pub const UPDATE_PHONE: &str = "/silhouette.v1.Phones/UpdatePhone";
    pub const DELETE_PHONE: &str = "/silhouette.v1.Phones/DeletePhone";
}

const PROFILE_READ: [&str; 2] = ["r:silhouette:*", "r:silhouette:profile:*"];
const PROFILE_WRITE: [&str; 2] = ["w:silhouette:*", "w:silhouette:profile:*"];
const ADDRESS_READ: [&str; 2] = ["r:silhouette:*", "r:silhouette:address:*"];
const ADDRESS_WRITE: [&str; 2] = ["w:silhouette:*", "w:silhouette:address:*"];
const PHONE_READ: [&str; 2] = ["r:silhouette:*", "r:silhouette:phone:*"];
const PHONE_WRITE: [&str; 2] = ["w:silhouette:*", "w:silhouette:phone:*"];

/// Every served method with its policy. Profile creation is performed by
/// a service on a user's behalf; everything else acts for a user.
pub fn declared_policies() -> Vec<(&'static str, AuthPolicy)> {
    use methods::*;

    vec![
        (
            CREATE_PROFILE,
            AuthPolicy::scoped(&PROFILE_WRITE).with_service_only(),
        ),
        (GET_PROFILE, AuthPolicy::scoped(&PROFILE_READ).with_self_access()),
        (UPDATE_PROFILE, AuthPolicy::scoped(&PROFILE_WRITE).with_self_access()),
        (CREATE_ADDRESS, AuthPolicy::scoped(&ADDRESS_WRITE).with_self_access()),
        (GET_ADDRESS, AuthPolicy::scoped(&ADDRESS_READ).with_self_access()),
        (UPDATE_ADDRESS, AuthPolicy::scoped(&ADDRESS_WRITE).with_self_access()),
        (DELETE_ADDRESS, AuthPolicy::scoped(&ADDRESS_WRITE).with_self_access()),
        (CREATE_PHONE, AuthPolicy::scoped(&PHONE_WRITE).with_self_access()),
        (GET_PHONE, AuthPolicy::scoped(&PHONE_READ).with_self_access()),
        (UPDATE_PHONE, AuthPolicy::scoped(&PHONE_WRITE).with_self_access()),
        (DELETE_PHONE, AuthPolicy::scoped(&PHONE_WRITE).with_self_access()),
    ]
}

pub fn policy_table() -> Result<PolicyTable, PolicyError> {
    PolicyTable::from_declarations(declared_policies())
}
