use super::errors::TokenError;

/// The only authorization scheme accepted, compared case-sensitively.
pub const BEARER_SCHEME: &str = "Bearer";

/// Split an `Authorization` header value into its opaque token.
///
/// The value must be exactly two non-empty segments separated by a
/// single space, the first being `Bearer`.
///
/// # Errors
/// * `MalformedHeader` - Not exactly `<scheme> <token>`
/// * `UnsupportedScheme` - Scheme is anything other than `Bearer`
pub fn parse_bearer(authorization: &str) -> Result<&str, TokenError> {
    let parts: Vec<&str> = authorization.split(' ').collect();

    match parts.as_slice() {
        [scheme, token] if !scheme.is_empty() && !token.is_empty() => {
            if *scheme != BEARER_SCHEME {
                return Err(TokenError::UnsupportedScheme(scheme.to_string()));
            }
            Ok(token)
        }
        _ => Err(TokenError::MalformedHeader),
    }
}
