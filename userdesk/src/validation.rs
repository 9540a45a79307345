//! Field rules for user input.
//!
//! Every field is checked and all failures are reported together, in the order
//! name, age, email, address. The rules run on raw JSON values so that wrong types
//! become field errors instead of body rejections.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::model::{NewUser, UserPatch};

/// Minimum length of a name, in characters.
pub const NAME_MIN_CHARS: usize = 2;

const REQUIRED: &str = "is required";
const NOT_A_STRING: &str = "must be a string";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("valid email regex"));

/// Request body for create and update.
///
/// Each field is `None` when its key is absent and `Some(Value::Null)` when it is an
/// explicit `null`. Create reads an absent key as `null`; update leaves it untouched.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UserPayload {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub age: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub email: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub address: Option<Value>,
}

/// Keeps an explicit `null` as `Some(Value::Null)`; serde's `default` covers the absent key.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// One failed rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

/// All rules that failed for one payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("user validation failed: {}", describe(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self(vec![FieldError::new(field, message)])
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

fn name(value: &Value) -> Result<String, &'static str> {
    match value {
        Value::Null => Err(REQUIRED),
        Value::String(s) if s.is_empty() => Err(REQUIRED),
        Value::String(s) if s.chars().count() < NAME_MIN_CHARS => Err("must be at least 2 characters"),
        Value::String(s) => Ok(s.clone()),
        _ => Err(NOT_A_STRING),
    }
}

fn age(value: &Value) -> Result<i64, &'static str> {
    if let Value::Number(n) = value {
        if let Some(whole) = n.as_i64() {
            return if whole < 0 { Err("must be >= 0") } else { Ok(whole) };
        }
    }

    let number = match value {
        Value::Null => return Err(REQUIRED),
        Value::String(s) if s.trim().is_empty() => return Err(REQUIRED),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
    .ok_or("must be a number")?;

    if number < 0.0 {
        Err("must be >= 0")
    } else if number.fract() != 0.0 {
        Err("must be an integer")
    } else if number >= i64::MAX as f64 {
        Err("is too large")
    } else {
        Ok(number as i64)
    }
}

fn email(value: &Value) -> Result<String, &'static str> {
    match value {
        Value::Null => Err(REQUIRED),
        Value::String(s) if s.is_empty() => Err(REQUIRED),
        Value::String(s) if !EMAIL_RE.is_match(s) => Err("is invalid"),
        Value::String(s) => Ok(s.clone()),
        _ => Err(NOT_A_STRING),
    }
}

fn address(value: &Value) -> Result<Option<String>, &'static str> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err(NOT_A_STRING),
    }
}

fn collect_errors(results: [(&str, Option<&'static str>); 4]) -> ValidationErrors {
    ValidationErrors(
        results
            .into_iter()
            .filter_map(|(field, message)| message.map(|message| FieldError::new(field, message)))
            .collect(),
    )
}

/// Runs `rule` on a present field; an absent field passes as `None`.
fn given<T>(
    value: &Option<Value>,
    rule: impl Fn(&Value) -> Result<T, &'static str>,
) -> Result<Option<T>, &'static str> {
    value.as_ref().map(rule).transpose()
}

/// Checks every field of `payload` for a new user, returning the validated user or
/// every failure. Absent fields are checked as `null`.
pub fn validate(payload: &UserPayload) -> Result<NewUser, ValidationErrors> {
    let field = |value: &Option<Value>| value.clone().unwrap_or(Value::Null);

    match (
        name(&field(&payload.name)),
        age(&field(&payload.age)),
        email(&field(&payload.email)),
        address(&field(&payload.address)),
    ) {
        (Ok(name), Ok(age), Ok(email), Ok(address)) => Ok(NewUser { name, age, email, address }),
        (name, age, email, address) => Err(collect_errors([
            ("name", name.err()),
            ("age", age.err()),
            ("email", email.err()),
            ("address", address.err()),
        ])),
    }
}

/// Checks the fields present in `payload` for an update.
///
/// Absent keys are left out of the patch. An explicit `null` fails the required
/// fields and clears the address.
pub fn validate_patch(payload: &UserPayload) -> Result<UserPatch, ValidationErrors> {
    match (
        given(&payload.name, name),
        given(&payload.age, age),
        given(&payload.email, email),
        given(&payload.address, address),
    ) {
        (Ok(name), Ok(age), Ok(email), Ok(address)) => Ok(UserPatch { name, age, email, address }),
        (name, age, email, address) => Err(collect_errors([
            ("name", name.err()),
            ("age", age.err()),
            ("email", email.err()),
            ("address", address.err()),
        ])),
    }
}
