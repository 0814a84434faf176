use actix_web::dev::ServiceRequest;

use crate::{
    constants::{AUTHORIZATION_HEADER_NAME, AUTHORIZATION_HEADER_VALUE_PREFIX, PUBLIC_ENDPOINTS},
    models::SecretString,
};

/// Checks that the request carries exactly one `Authorization: Bearer <token>`
/// header whose token equals `expected_key`.
pub fn check_authorization_header(req: &ServiceRequest, expected_key: &SecretString) -> bool {
    let headers: Vec<_> = req.headers().get_all(AUTHORIZATION_HEADER_NAME).collect();
    if headers.len() != 1 {
        return false;
    }

    let Ok(value) = headers[0].to_str() else {
        return false;
    };
    let Some(token) = value.strip_prefix(AUTHORIZATION_HEADER_VALUE_PREFIX) else {
        return false;
    };
    if token.is_empty() || token.contains(' ') {
        return false;
    }

    expected_key.matches(token)
}

/// Endpoints served without a bearer token.
pub fn is_public_endpoint(path: &str) -> bool {
    PUBLIC_ENDPOINTS.iter().any(|public| {
        path == *public
            || path
                .strip_prefix(public)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}
