pub mod errors;
pub mod policy;

pub use errors::GateError;
pub use policy::AccessPolicy;
pub use policy::AuthorizationGate;
