pub mod auth_context;
pub mod call_cancel;
pub mod validated_json;

pub use call_cancel::CallCancel;
pub use validated_json::ValidatedJson;
