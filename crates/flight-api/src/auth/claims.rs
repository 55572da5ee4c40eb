//! JWT claims structure.
//!
//! Contains the claims extracted from verified tokens. Registered claims the
//! verifier checks are typed; every other claim is kept verbatim so handlers
//! can echo the full claim set. The `sub` field is redacted in Debug output.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A NumericDate as written by the issuer: integer or fractional seconds.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumericDate {
    Integer(i64),
    Fractional(f64),
}

impl NumericDate {
    /// Whole seconds, truncating any fraction. Non-finite or out-of-range
    /// values are rejected.
    fn whole_seconds(self) -> Option<i64> {
        match self {
            NumericDate::Integer(secs) => Some(secs),
            NumericDate::Fractional(secs) => {
                let whole = secs.trunc();
                // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
                (whole.is_finite() && whole >= i64::MIN as f64 && whole < i64::MAX as f64)
                    .then_some(whole as i64)
            }
        }
    }
}

fn numeric_date<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    NumericDate::deserialize(deserializer)?
        .whole_seconds()
        .ok_or_else(|| serde::de::Error::custom("NumericDate out of range"))
}

fn optional_numeric_date<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<NumericDate>::deserialize(deserializer)?
        .map(|date| {
            date.whole_seconds()
                .ok_or_else(|| serde::de::Error::custom("NumericDate out of range"))
        })
        .transpose()
}

/// The `aud` claim: a single audience or a list of audiences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    Single(String),
    Multiple(Vec<String>),
}

impl Audience {
    /// Whether `expected` is one of the audiences.
    pub fn contains(&self, expected: &str) -> bool {
        match self {
            Audience::Single(aud) => aud == expected,
            Audience::Multiple(auds) => auds.iter().any(|aud| aud == expected),
        }
    }
}

/// Claims of a verified access token.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Subject (user identifier) - redacted in Debug output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Intended audience(s).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<Audience>,

    /// Expiration timestamp (Unix epoch seconds).
    #[serde(deserialize_with = "numeric_date")]
    pub exp: i64,

    /// Not-before timestamp (Unix epoch seconds).
    #[serde(
        default,
        deserialize_with = "optional_numeric_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub nbf: Option<i64>,

    /// Issued-at timestamp (Unix epoch seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// All remaining claims (`scope`, `azp`, custom namespaced claims, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl fmt::Debug for Claims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claims")
            .field("iss", &self.iss)
            .field("sub", &"[REDACTED]")
            .field("aud", &self.aud)
            .field("exp", &self.exp)
            .field("nbf", &self.nbf)
            .field("iat", &self.iat)
            .field("extra_claims", &self.extra.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_debug_redacts_sub() {
        let claims: Claims = serde_json::from_value(serde_json::json!({
            "sub": "auth0|secret-user-id",
            "exp": 1234567890
        }))
        .unwrap();

        let debug_str = format!("{:?}", claims);

        assert!(
            !debug_str.contains("secret-user-id"),
            "Debug output should not contain actual sub value"
        );
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_audience_single_and_multiple() {
        let single: Audience = serde_json::from_str(r#""api://flights""#).unwrap();
        assert!(single.contains("api://flights"));
        assert!(!single.contains("api://other"));

        let multiple: Audience =
            serde_json::from_str(r#"["api://flights", "https://tenant/userinfo"]"#).unwrap();
        assert!(multiple.contains("api://flights"));
        assert!(multiple.contains("https://tenant/userinfo"));
        assert!(!multiple.contains("api://flight"));
    }

    #[test]
    fn test_claims_preserve_unknown_claims() {
        let json = serde_json::json!({
            "iss": "https://tenant.example.com/",
            "sub": "auth0|abc",
            "aud": ["api://flights"],
            "exp": 1700003600,
            "iat": 1700000000,
            "scope": "openid profile",
            "azp": "client-123"
        });

        let claims: Claims = serde_json::from_value(json.clone()).unwrap();

        assert_eq!(claims.extra.get("scope").unwrap(), "openid profile");
        assert_eq!(claims.extra.get("azp").unwrap(), "client-123");
        assert_eq!(serde_json::to_value(&claims).unwrap(), json);
    }

    #[test]
    fn test_claims_require_numeric_exp() {
        let missing: Result<Claims, _> = serde_json::from_value(serde_json::json!({"sub": "x"}));
        assert!(missing.is_err());

        let wrong_type: Result<Claims, _> =
            serde_json::from_value(serde_json::json!({"exp": "tomorrow"}));
        assert!(wrong_type.is_err());
    }

    #[test]
    fn test_fractional_dates_truncate_to_whole_seconds() {
        let claims: Claims = serde_json::from_value(serde_json::json!({
            "exp": 1700003600.5,
            "nbf": 1699999999.9
        }))
        .unwrap();

        assert_eq!(claims.exp, 1700003600);
        assert_eq!(claims.nbf, Some(1699999999));
        assert!(!claims.extra.contains_key("nbf"));
    }

    #[test]
    fn test_out_of_range_exp_is_rejected() {
        let huge: Result<Claims, _> = serde_json::from_value(serde_json::json!({"exp": 1e300}));
        assert!(huge.is_err());

        let text_nbf: Result<Claims, _> =
            serde_json::from_value(serde_json::json!({"exp": 1, "nbf": "soon"}));
        assert!(text_nbf.is_err());
    }

    #[test]
    fn test_optional_registered_claims_may_be_absent() {
        let claims: Claims = serde_json::from_value(serde_json::json!({"exp": 1})).unwrap();

        assert!(claims.iss.is_none());
        assert!(claims.sub.is_none());
        assert!(claims.aud.is_none());
        assert!(claims.iat.is_none());
        assert!(claims.nbf.is_none());
        assert!(claims.extra.is_empty());
    }
}
