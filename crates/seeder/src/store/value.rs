//! Firestore typed values.
//!
//! Documents travel over the REST API as maps of tagged values, e.g.
//!
//! ```json
//! {
//!   "name": { "stringValue": "Milk" },
//!   "quantity": { "integerValue": "2" },
//!   "lastUpdated": { "integerValue": "1709281800000" }
//! }
//! ```
//!
//! The tag names map one-to-one onto the variants of [`Value`], so serde's
//! externally tagged enum representation reads and writes them directly.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A document's fields, keyed by field name.
pub type Fields = BTreeMap<String, Value>;

/// Explicit `null`. Serializes as JSON `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Null;

/// A nested map (`mapValue`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MapValue {
    /// Omitted by the API when the map is empty.
    #[serde(default)]
    pub fields: Fields,
}

/// An array (`arrayValue`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArrayValue {
    /// Omitted by the API when the array is empty.
    #[serde(default)]
    pub values: Vec<Value>,
}

/// A geographic point (`geoPointValue`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

/// A single Firestore value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    NullValue(Null),
    BooleanValue(bool),
    /// int64, carried as a decimal string on the wire.
    IntegerValue(#[serde(with = "int64")] i64),
    DoubleValue(f64),
    TimestampValue(DateTime<Utc>),
    StringValue(String),
    /// Base64-encoded.
    BytesValue(String),
    /// Full resource name of another document.
    ReferenceValue(String),
    GeoPointValue(GeoPoint),
    MapValue(MapValue),
    ArrayValue(ArrayValue),
}

impl Value {
    /// Name of the wire tag, for error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::NullValue(_) => "null",
            Self::BooleanValue(_) => "boolean",
            Self::IntegerValue(_) => "integer",
            Self::DoubleValue(_) => "double",
            Self::TimestampValue(_) => "timestamp",
            Self::StringValue(_) => "string",
            Self::BytesValue(_) => "bytes",
            Self::ReferenceValue(_) => "reference",
            Self::GeoPointValue(_) => "geoPoint",
            Self::MapValue(_) => "map",
            Self::ArrayValue(_) => "array",
        }
    }

    /// Encode a number, using `integerValue` when it has no fractional part.
    #[must_use]
    pub fn number(n: f64) -> Self {
        const MAX_EXACT: f64 = 9_007_199_254_740_992.0; // 2^53
        if n.fract() == 0.0 && n.abs() <= MAX_EXACT {
            #[allow(clippy::cast_possible_truncation)] // bounded by 2^53 above
            return Self::IntegerValue(n as i64);
        }
        Self::DoubleValue(n)
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::NullValue(_))
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::StringValue(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::IntegerValue(n) => Some(*n),
            _ => None,
        }
    }

    /// Read either numeric variant as `f64`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // quantities are small
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::IntegerValue(n) => Some(*n as f64),
            Self::DoubleValue(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::TimestampValue(ts) => Some(*ts),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_map(&self) -> Option<&Fields> {
        match self {
            Self::MapValue(map) => Some(&map.fields),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::ArrayValue(array) => Some(&array.values),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::StringValue(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::StringValue(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::BooleanValue(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::IntegerValue(n)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(ts: DateTime<Utc>) -> Self {
        Self::TimestampValue(ts)
    }
}

impl From<Fields> for Value {
    fn from(fields: Fields) -> Self {
        Self::MapValue(MapValue { fields })
    }
}

impl From<Vec<Self>> for Value {
    fn from(values: Vec<Self>) -> Self {
        Self::ArrayValue(ArrayValue { values })
    }
}

/// `integerValue` is a JSON string holding an int64.
mod int64 {
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(n: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(n)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Number(i64),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Text(s) => s.parse().map_err(de::Error::custom),
            Repr::Number(n) => Ok(n),
        }
    }
}
