use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// The admin credential sent with a request, if any. Checking it is up to
/// the tracker.
#[derive(Debug, Clone, Default)]
pub struct AdminKey(pub Option<String>);

impl AdminKey {
    #[must_use]
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for AdminKey
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get(ADMIN_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(ToOwned::to_owned);

        Ok(Self(key))
    }
}
