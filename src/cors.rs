//! Cross-origin access policy
//!
//! A [`CorsPolicy`] admits a fixed list of exact origins plus, optionally, every origin matching
//! one pattern (used for preview deployments whose host names are generated). Requests without
//! an `Origin` header are always admitted. The policy is built once at startup and shared
//! read-only by the router.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, request::Parts, HeaderValue, Method};
use axum::middleware::Next;
use axum::response::Response;
use regex::Regex;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::Error;

/// Origin admitted when no allow-list is configured
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Cross-origin access policy
#[derive(Clone, Debug)]
pub struct CorsPolicy {
    /// Origins admitted by exact match
    allowed_origins: Vec<String>,
    /// Pattern that must match an entire origin for it to be admitted
    preview_pattern: Option<Regex>,
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self {
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
            preview_pattern: None,
        }
    }
}

impl CorsPolicy {
    /// Returns policy admitting the given origins and, optionally, origins matching a pattern.
    ///
    /// # Parameters
    ///
    /// - `allowed_origins`: Origins admitted by exact match, e.g. `https://app.example.com`.
    ///   Trailing slashes are ignored.
    ///
    /// - `preview_pattern`: Regular expression that must match the whole origin, e.g.
    ///   `https://my-app-[a-z0-9]+\.vercel\.app`.
    ///
    /// # Errors
    ///
    /// Returns an error if `preview_pattern` is not a valid regular expression.
    ///
    /// # Examples
    ///
    /// ```
    /// use telcalc::CorsPolicy;
    ///
    /// let policy = CorsPolicy::new(
    ///     vec!["https://app.example.com".to_string()],
    ///     Some(r"https://app-[a-z0-9]+\.example\.dev"),
    /// )?;
    /// assert!(policy.is_allowed("https://app.example.com"));
    /// assert!(policy.is_allowed("https://app-3f9a.example.dev"));
    /// assert!(!policy.is_allowed("https://evil.example.org"));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(allowed_origins: Vec<String>, preview_pattern: Option<&str>) -> Result<Self, Error> {
        let allowed_origins = allowed_origins
            .into_iter()
            .map(|origin| origin.trim().trim_end_matches('/').to_string())
            .filter(|origin| !origin.is_empty())
            .collect();
        let preview_pattern = preview_pattern
            .map(|pattern| Regex::new(&format!("^(?:{pattern})$")))
            .transpose()?;
        Ok(Self {
            allowed_origins,
            preview_pattern,
        })
    }

    /// Returns `true` if cross-origin requests from `origin` are admitted.
    #[must_use]
    pub fn is_allowed(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|allowed| allowed == origin)
            || self
                .preview_pattern
                .as_ref()
                .is_some_and(|pattern| pattern.is_match(origin))
    }

    /// Returns the origins admitted by exact match.
    #[must_use]
    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed_origins
    }

    /// Returns CORS layer emitting response headers for admitted origins.
    #[must_use]
    pub fn layer(&self) -> CorsLayer {
        let policy = self.clone();
        CorsLayer::new()
            .allow_origin(AllowOrigin::predicate(
                move |origin: &HeaderValue, _parts: &Parts| {
                    origin.to_str().is_ok_and(|origin| policy.is_allowed(origin))
                },
            ))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE])
    }
}

/// Rejects requests whose `Origin` header names an origin not admitted by the policy.
///
/// # Errors
///
/// Returns [`Error::OriginNotAllowed`] for a rejected origin.
pub async fn enforce_origin(
    State(policy): State<Arc<CorsPolicy>>,
    request: Request,
    next: Next,
) -> Result<Response, Error> {
    if let Some(origin) = request.headers().get(header::ORIGIN) {
        let origin = String::from_utf8_lossy(origin.as_bytes()).into_owned();
        if !policy.is_allowed(&origin) {
            tracing::warn!(origin = %origin, "CORS error: origin is not allowed");
            return Err(Error::OriginNotAllowed(origin));
        }
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests_of_functions {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = CorsPolicy::default();
        assert!(policy.is_allowed("http://localhost:3000"));
        assert!(!policy.is_allowed("http://localhost:3001"));
        assert!(!policy.is_allowed(""));
    }

    #[test]
    fn test_new() {
        // Invalid input
        assert!(CorsPolicy::new(Vec::new(), Some("(unclosed")).is_err());
        // Valid input
        let policy = CorsPolicy::new(
            vec![
                " https://a.example.com/ ".to_string(),
                String::new(),
                "http://localhost:3000".to_string(),
            ],
            None,
        )
        .unwrap();
        assert_eq!(
            policy.allowed_origins(),
            ["https://a.example.com", "http://localhost:3000"]
        );
    }

    #[test]
    fn test_is_allowed_with_pattern() {
        let policy = CorsPolicy::new(
            vec!["https://calc.example.com".to_string()],
            Some(r"https://calc-client-[a-z0-9-]+\.vercel\.app"),
        )
        .unwrap();
        assert!(policy.is_allowed("https://calc.example.com"));
        assert!(policy.is_allowed("https://calc-client-6j70mopxl-team.vercel.app"));
        // The pattern must match the whole origin
        assert!(!policy.is_allowed("https://calc-client-x.vercel.app.evil.com"));
        assert!(!policy.is_allowed("http://evil.com/https://calc-client-x.vercel.app"));
        assert!(!policy.is_allowed("https://calc.example.com.evil.com"));
    }
}
