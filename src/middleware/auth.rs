use axum::http::HeaderMap;

use crate::auth::AdminCredential;

pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";
pub const LOCKER_PASSWORD_HEADER: &str = "x-locker-password";

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Admin credential presented on the request, if any.
///
/// A bearer session token wins over the password header. Verification is
/// left to the service so every mutating call derives the capability fresh.
pub fn admin_credential_from_headers(headers: &HeaderMap) -> Option<AdminCredential> {
    if let Some(token) = header_str(headers, "authorization")
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        return Some(AdminCredential::Session(token.to_string()));
    }

    header_str(headers, ADMIN_PASSWORD_HEADER).map(|p| AdminCredential::Password(p.to_string()))
}

/// Locker password from `X-Locker-Password`
pub fn locker_password_from_headers(headers: &HeaderMap) -> Option<String> {
    header_str(headers, LOCKER_PASSWORD_HEADER).map(str::to_string)
}
