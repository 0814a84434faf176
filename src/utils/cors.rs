use actix_cors::Cors;

/// Cross-origin policy for the browser dashboard: only `allowed_origins` may
/// call the API, with credentials.
pub fn cors_policy(allowed_origins: &[String]) -> Cors {
    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}
