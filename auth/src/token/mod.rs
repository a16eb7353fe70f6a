pub mod bearer;
pub mod claims;
pub mod codec;
pub mod errors;

pub use bearer::parse_bearer;
pub use bearer::BEARER_SCHEME;
pub use claims::Claims;
pub use codec::SessionToken;
pub use codec::TokenCodec;
pub use codec::SESSION_TTL_DAYS;
pub use errors::TokenError;
