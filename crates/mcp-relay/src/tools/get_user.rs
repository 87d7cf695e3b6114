//! Tool: get_user — Look up a user record by numeric id.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::types::{McpError, McpResult, ToolDefinition};

use super::ToolHandler;

pub const NAME: &str = "get_user";

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        description: "Get user details by ID. Useful for concurrency testing.".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "user_id": {
                    "type": "integer",
                    "description": "The user ID to fetch."
                }
            },
            "required": ["user_id"]
        }),
    }
}

/// User lookup with a simulated backend latency.
pub struct GetUser {
    latency: Duration,
}

impl GetUser {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

/// A coerced user id of any magnitude.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserId {
    Small(i128),
    /// Decimal digits, with a leading `-` when negative, of an id beyond `i128`.
    Large(String),
}

impl UserId {
    /// Parse a base-10 integer with an optional sign.
    fn parse(text: &str) -> Option<Self> {
        if let Ok(n) = text.parse::<i128>() {
            return Some(UserId::Small(n));
        }

        let (sign, digits) = match text.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", text.strip_prefix('+').unwrap_or(text)),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        // All digits yet too wide for i128, so it is non-zero once leading zeros go.
        Some(UserId::Large(format!("{sign}{}", digits.trim_start_matches('0'))))
    }

    fn from_float(f: f64) -> Option<Self> {
        if !f.is_finite() {
            return None;
        }
        let whole = f.trunc();
        if whole >= i128::MIN as f64 && whole < i128::MAX as f64 {
            Some(UserId::Small(whole as i128))
        } else {
            Some(UserId::Large(format!("{whole:.0}")))
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserId::Small(0))
    }

    /// The id as a JSON value: an exact integer when one fits, else the nearest float.
    pub fn to_value(&self) -> Value {
        match self {
            UserId::Small(n) => i64::try_from(*n)
                .map(Value::from)
                .or_else(|_| u64::try_from(*n).map(Value::from))
                .unwrap_or_else(|_| float_or_digits(&n.to_string())),
            UserId::Large(digits) => float_or_digits(digits),
        }
    }
}

fn float_or_digits(digits: &str) -> Value {
    digits
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(digits.to_string()))
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserId::Small(n) => write!(f, "{n}"),
            UserId::Large(digits) => f.write_str(digits),
        }
    }
}

/// Coerce a `user_id` argument to an integer.
///
/// Integers pass through, finite floats truncate toward zero, booleans are 0/1,
/// and strings must hold a base-10 integer. There is no magnitude limit.
pub fn coerce_user_id(value: &Value) -> Option<UserId> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(UserId::Small(i128::from(i)))
            } else if let Some(u) = n.as_u64() {
                Some(UserId::Small(i128::from(u)))
            } else {
                n.as_f64().and_then(UserId::from_float)
            }
        }
        Value::Bool(b) => Some(UserId::Small(i128::from(*b))),
        Value::String(s) => UserId::parse(s.trim()),
        _ => None,
    }
}

#[async_trait]
impl ToolHandler for GetUser {
    async fn invoke(&self, arguments: Option<Value>) -> McpResult<Value> {
        let uid = arguments
            .as_ref()
            .and_then(|args| args.get("user_id"))
            .and_then(coerce_user_id)
            .ok_or_else(|| McpError::invalid_argument("user_id"))?;

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        Ok(json!({
            "id": uid.to_value(),
            "name": format!("User_{uid}"),
            "email": format!("user{uid}@example.com"),
            "role": if uid.is_admin() { "admin" } else { "user" },
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(n: i128) -> Option<UserId> {
        Some(UserId::Small(n))
    }

    #[test]
    fn test_coerce_user_id() {
        assert_eq!(coerce_user_id(&json!(7)), small(7));
        assert_eq!(coerce_user_id(&json!(-3)), small(-3));
        assert_eq!(coerce_user_id(&json!(7.9)), small(7));
        assert_eq!(coerce_user_id(&json!(-7.9)), small(-7));
        assert_eq!(coerce_user_id(&json!(" 12 ")), small(12));
        assert_eq!(coerce_user_id(&json!("+5")), small(5));
        assert_eq!(coerce_user_id(&json!(true)), small(1));
        assert_eq!(coerce_user_id(&json!("abc")), None);
        assert_eq!(coerce_user_id(&json!("7.5")), None);
        assert_eq!(coerce_user_id(&json!("-")), None);
        assert_eq!(coerce_user_id(&json!(null)), None);
        assert_eq!(coerce_user_id(&json!([1])), None);
    }

    #[test]
    fn test_coerce_wide_user_ids() {
        assert_eq!(
            coerce_user_id(&json!(18446744073709551615u64)),
            small(18446744073709551615)
        );
        assert_eq!(coerce_user_id(&json!(9.3e18)), small(9_300_000_000_000_000_000));

        let digits = "123456789012345678901234567890123456789012345";
        assert_eq!(
            coerce_user_id(&json!(format!("-000{digits}"))),
            Some(UserId::Large(format!("-{digits}")))
        );

        match coerce_user_id(&json!(1e300)) {
            Some(UserId::Large(spelled)) => {
                assert_eq!(spelled.len(), 301);
                assert!(spelled.starts_with("10000000000000000"));
            }
            other => panic!("expected a wide id, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_wide_ids_yield_records() {
        let tool = GetUser::new(Duration::ZERO);

        let max = tool
            .invoke(Some(json!({"user_id": 18446744073709551615u64})))
            .await
            .unwrap();
        assert_eq!(max["id"], json!(18446744073709551615u64));
        assert_eq!(max["name"], "User_18446744073709551615");
        assert_eq!(max["role"], "user");

        let float = tool.invoke(Some(json!({"user_id": 9.3e18}))).await.unwrap();
        assert_eq!(float["id"], json!(9_300_000_000_000_000_000u64));
        assert_eq!(float["email"], "user9300000000000000000@example.com");

        let huge = tool.invoke(Some(json!({"user_id": 1e300}))).await.unwrap();
        assert_eq!(huge["id"], json!(1e300));
        assert!(huge["name"].as_str().unwrap().starts_with("User_10000000000000000"));
    }

    #[tokio::test]
    async fn test_negative_zero_is_admin() {
        let tool = GetUser::new(Duration::ZERO);
        for raw in [json!(-0.0), json!("-0"), json!(0.4)] {
            let user = tool.invoke(Some(json!({"user_id": raw}))).await.unwrap();
            assert_eq!(user["role"], "admin");
            assert_eq!(user["id"], 0);
        }
    }

    #[tokio::test]
    async fn test_admin_and_regular_roles() {
        let tool = GetUser::new(Duration::ZERO);
        let admin = tool.invoke(Some(json!({"user_id": 0}))).await.unwrap();
        assert_eq!(admin["role"], "admin");
        assert_eq!(admin["email"], "user0@example.com");
        let user = tool.invoke(Some(json!({"user_id": "7"}))).await.unwrap();
        assert_eq!(user["role"], "user");
        assert_eq!(user["name"], "User_7");
        assert_eq!(user["id"], 7);
    }

    #[tokio::test]
    async fn test_missing_arguments_are_invalid() {
        let tool = GetUser::new(Duration::ZERO);
        for args in [None, Some(json!({})), Some(json!({"user_id": "abc"}))] {
            let err = tool.invoke(args).await.unwrap_err();
            assert_eq!(err.to_string(), "Invalid user_id");
        }
    }
}
