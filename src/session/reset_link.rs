//! Reset-link parsing.
//!
//! The password-reset email carries a link whose `token` query parameter
//! authorizes the reset. A link without one is terminal for that flow — the
//! user must request a new email.

/// Extract the `token` query parameter from a full reset link (or a bare
/// query string).
pub fn token_from_link(link: &str) -> Option<String> {
    let query = match link.split_once('?') {
        Some((_, query)) => query,
        None => link,
    };
    token_from_query(query)
}

/// Extract `token` from a `k=v&k=v` query string. No percent-decoding —
/// reset tokens are URL-safe by construction.
pub fn token_from_query(query: &str) -> Option<String> {
    for pair in query.split('&') {
        let mut parts = pair.splitn(2, '=');
        if let (Some(key), Some(value)) = (parts.next(), parts.next()) {
            if key == "token" && !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}
