/// Path prefixes reachable without a bearer token.
///
/// `/update` is the notifier webhook and authenticates with the shared secret
/// carried in its body instead.
pub const PUBLIC_ENDPOINTS: &[&str] = &["/health", "/update", "/api-docs"];
