use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};
use tracing::debug;
use vocab_extraction::DEFAULT_USER;

/// Identity the saved-word routes act on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserId(pub String);

impl UserId {
    /// Resolve from request headers.
    ///
    /// Priority:
    /// 1. X-User-ID header
    /// 2. X-Username header (URL-decoded)
    /// 3. `default_user`
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        if let Some(id) = header("x-user-id") {
            return Self(id.to_string());
        }
        if let Some(name) = header("x-username") {
            let decoded = urlencoding::decode(name)
                .map(|d| d.into_owned())
                .unwrap_or_else(|_| name.to_string());
            return Self(decoded);
        }
        Self(DEFAULT_USER.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Middleware to attach a [`UserId`] to every request
pub async fn resolve_user(mut request: Request, next: Next) -> Response {
    let user = UserId::from_headers(request.headers());
    debug!(user = %user.0, "Resolved user");
    request.extensions_mut().insert(user);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_user_id_header_wins() {
        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", HeaderValue::from_static("u-42"));
        headers.insert("x-username", HeaderValue::from_static("alice"));
        assert_eq!(UserId::from_headers(&headers).as_str(), "u-42");
    }

    #[test]
    fn test_username_is_url_decoded() {
        let mut headers = HeaderMap::new();
        headers.insert("x-username", HeaderValue::from_static("%E5%B0%8F%E6%98%8E"));
        assert_eq!(UserId::from_headers(&headers).as_str(), "小明");
    }

    #[test]
    fn test_falls_back_to_default_user() {
        assert_eq!(UserId::from_headers(&HeaderMap::new()).as_str(), "default_user");
    }
}
