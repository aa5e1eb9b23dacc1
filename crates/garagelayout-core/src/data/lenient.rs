//! Tolerant deserializers for values that older snapshots stored as strings.
//!
//! Form inputs historically wrote counts and ports either as JSON numbers or
//! as numeric strings. These helpers accept both.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Int(i64),
    Float(f64),
    Text(String),
}

impl NumberOrString {
    fn into_text(self) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }

    fn into_u32(self) -> u32 {
        match self {
            Self::Int(n) => n.clamp(0, u32::MAX as i64) as u32,
            Self::Float(n) if n.is_finite() && n > 0.0 => n as u32,
            Self::Float(_) => 0,
            Self::Text(s) => s.trim().parse().unwrap_or(0),
        }
    }
}

/// Deserializes a count, coercing strings and bad values to `0`.
pub fn u32_or_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<NumberOrString>::deserialize(deserializer)?
        .map(NumberOrString::into_u32)
        .unwrap_or(0))
}

/// Deserializes an optional count written as number or string.
pub fn opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<NumberOrString>::deserialize(deserializer)?.and_then(|v| match v {
            NumberOrString::Text(s) if s.trim().is_empty() => None,
            other => Some(other.into_u32()),
        }),
    )
}

/// Deserializes an optional string that may have been written as a number.
pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<NumberOrString>::deserialize(deserializer)?.map(NumberOrString::into_text))
}

/// Deserializes a string that may have been written as a number; absent or
/// null becomes the empty string.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_text(deserializer)?.unwrap_or_default())
}
