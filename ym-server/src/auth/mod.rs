//! Shared-secret authentication for settlement and scheduled-reset endpoints
//!
//! The caller's token may arrive in the JSON body, the query string or the
//! `Authorization` header, checked in that order. A leading `Bearer ` is
//! stripped. Comparison is exact and case-sensitive; every failure maps to
//! the same `TokenInvalid` error.

use std::sync::Arc;

use http::HeaderMap;
use shared::error::AppError;

#[derive(Clone)]
pub struct SettlementToken {
    secret: Arc<str>,
}

impl std::fmt::Debug for SettlementToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SettlementToken(***)")
    }
}

impl SettlementToken {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: Arc::from(secret),
        }
    }

    /// Pick the candidate token by precedence: body, query, header
    pub fn resolve<'a>(
        body: Option<&'a str>,
        query: Option<&'a str>,
        headers: &'a HeaderMap,
    ) -> Option<&'a str> {
        let header = headers
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        [body, query, header]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|t| !t.is_empty())
            .map(|t| t.strip_prefix("Bearer ").unwrap_or(t))
    }

    pub fn matches(&self, candidate: &str) -> bool {
        let expected = self.secret.as_bytes();
        let given = candidate.as_bytes();
        if expected.len() != given.len() {
            return false;
        }
        expected
            .iter()
            .zip(given)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }

    /// Resolve and check in one step
    pub fn verify(
        &self,
        body: Option<&str>,
        query: Option<&str>,
        headers: &HeaderMap,
    ) -> Result<(), AppError> {
        match Self::resolve(body, query, headers) {
            Some(candidate) if self.matches(candidate) => Ok(()),
            Some(_) => {
                tracing::warn!("Rejected request with invalid token");
                Err(AppError::invalid_token())
            }
            None => Err(AppError::invalid_token()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use shared::ErrorCode;

    fn headers(auth: Option<&str>) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Some(value) = auth {
            map.insert(
                http::header::AUTHORIZATION,
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn test_body_wins_over_query_and_header() {
        let h = headers(Some("Bearer from-header"));
        assert_eq!(
            SettlementToken::resolve(Some("from-body"), Some("from-query"), &h),
            Some("from-body")
        );
        assert_eq!(
            SettlementToken::resolve(None, Some("from-query"), &h),
            Some("from-query")
        );
        assert_eq!(SettlementToken::resolve(None, None, &h), Some("from-header"));
    }

    #[test]
    fn test_empty_candidates_are_skipped() {
        let h = headers(Some("Bearer abc"));
        assert_eq!(SettlementToken::resolve(Some(""), Some("  "), &h), Some("abc"));
        assert_eq!(SettlementToken::resolve(None, None, &headers(None)), None);
    }

    #[test]
    fn test_bearer_prefix_is_optional() {
        let token = SettlementToken::new("s3cret");
        assert!(token.verify(None, None, &headers(Some("Bearer s3cret"))).is_ok());
        assert!(token.verify(None, None, &headers(Some("s3cret"))).is_ok());
        assert!(token.verify(None, Some("Bearer s3cret"), &headers(None)).is_ok());
    }

    #[test]
    fn test_comparison_is_case_sensitive() {
        let token = SettlementToken::new("s3cret");
        assert!(token.matches("s3cret"));
        assert!(!token.matches("S3CRET"));
        assert!(!token.matches("s3cre"));
        assert!(!token.matches("s3cret "));
    }

    #[test]
    fn test_missing_and_wrong_tokens_fail_identically() {
        let token = SettlementToken::new("s3cret");
        let missing = token.verify(None, None, &headers(None)).unwrap_err();
        let wrong = token.verify(Some("nope"), None, &headers(None)).unwrap_err();
        assert_eq!(missing.code, ErrorCode::TokenInvalid);
        assert_eq!(missing.message, wrong.message);
        assert_eq!(missing.code, wrong.code);
    }

    #[test]
    fn test_debug_hides_secret() {
        let token = SettlementToken::new("s3cret");
        assert!(!format!("{token:?}").contains("s3cret"));
    }
}
