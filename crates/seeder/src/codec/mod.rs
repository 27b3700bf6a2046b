//! Conversions between pantry records and store documents.
//!
//! Field names are the camelCase names the pantry application reads.
//! Optional fields are omitted when empty rather than written as `null`,
//! matching what the application itself writes.

mod invite;
mod pantry;
mod user;

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::store::{Fields, Value};

/// A document does not have the shape of the record it should hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A required field is absent or `null`.
    #[error("missing field {0}")]
    Missing(String),

    /// A field holds a value of the wrong type.
    #[error("field {field} should be {expected}, found {found}")]
    WrongType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A field has the right type but an unusable value.
    #[error("field {field}: {message}")]
    Invalid { field: String, message: String },
}

/// A record stored as a single document (or, for list items, a map).
pub trait DocumentCodec: Sized {
    /// Encode the record's fields.
    fn to_fields(&self) -> Fields;

    /// Decode a record from a document's fields.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] naming the first field that is missing or
    /// malformed.
    fn from_fields(fields: &Fields) -> Result<Self, CodecError>;
}

/// Builds a [`Fields`] map.
#[derive(Debug, Default)]
pub struct FieldWriter(Fields);

impl FieldWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn set(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.0.insert(name.to_owned(), value.into());
        self
    }

    /// Set the field only when `value` is present.
    #[must_use]
    pub fn set_opt(self, name: &str, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(value) => self.set(name, value),
            None => self,
        }
    }

    #[must_use]
    pub fn finish(self) -> Fields {
        self.0
    }
}

/// Typed access to a [`Fields`] map, tracking the field path for errors.
#[derive(Debug, Clone)]
pub struct FieldReader<'a> {
    fields: &'a Fields,
    prefix: String,
}

impl<'a> FieldReader<'a> {
    #[must_use]
    pub const fn new(fields: &'a Fields) -> Self {
        Self {
            fields,
            prefix: String::new(),
        }
    }

    fn path(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_owned()
        } else {
            format!("{}.{name}", self.prefix)
        }
    }

    /// `null` counts as absent.
    fn value(&self, name: &str) -> Option<&'a Value> {
        self.fields.get(name).filter(|value| !value.is_null())
    }

    fn required(&self, name: &str) -> Result<&'a Value, CodecError> {
        self.value(name)
            .ok_or_else(|| CodecError::Missing(self.path(name)))
    }

    fn wrong_type(&self, name: &str, expected: &'static str, found: &Value) -> CodecError {
        CodecError::WrongType {
            field: self.path(name),
            expected,
            found: found.type_name(),
        }
    }

    /// # Errors
    ///
    /// Returns [`CodecError`] if the field is missing or not a string.
    pub fn string(&self, name: &str) -> Result<String, CodecError> {
        let value = self.required(name)?;
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| self.wrong_type(name, "string", value))
    }

    /// # Errors
    ///
    /// Returns [`CodecError`] if the field is present but not a string.
    pub fn opt_string(&self, name: &str) -> Result<Option<String>, CodecError> {
        self.value(name)
            .map(|value| {
                value
                    .as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| self.wrong_type(name, "string", value))
            })
            .transpose()
    }

    /// Parse a string field with [`FromStr`].
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] if the field is missing, not a string, or
    /// does not parse.
    pub fn parse<T>(&self, name: &str) -> Result<T, CodecError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.string(name)?
            .parse()
            .map_err(|e: T::Err| CodecError::Invalid {
                field: self.path(name),
                message: e.to_string(),
            })
    }

    /// # Errors
    ///
    /// Returns [`CodecError`] if the field is present but does not parse.
    pub fn opt_parse<T>(&self, name: &str) -> Result<Option<T>, CodecError>
    where
        T: FromStr,
        T::Err: Display,
    {
        if self.value(name).is_none() {
            return Ok(None);
        }
        self.parse(name).map(Some)
    }

    /// # Errors
    ///
    /// Returns [`CodecError`] if the field is missing or not an integer.
    pub fn integer(&self, name: &str) -> Result<i64, CodecError> {
        let value = self.required(name)?;
        value
            .as_i64()
            .ok_or_else(|| self.wrong_type(name, "integer", value))
    }

    /// An integer or double field.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] if the field is present but not numeric.
    pub fn opt_number(&self, name: &str) -> Result<Option<f64>, CodecError> {
        self.value(name)
            .map(|value| {
                value
                    .as_f64()
                    .ok_or_else(|| self.wrong_type(name, "number", value))
            })
            .transpose()
    }

    /// # Errors
    ///
    /// Returns [`CodecError`] if the field is missing or not a timestamp.
    pub fn timestamp(&self, name: &str) -> Result<DateTime<Utc>, CodecError> {
        let value = self.required(name)?;
        value
            .as_timestamp()
            .ok_or_else(|| self.wrong_type(name, "timestamp", value))
    }

    /// A nested map field.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] if the field is missing or not a map.
    pub fn map(&self, name: &str) -> Result<Self, CodecError> {
        let value = self.required(name)?;
        let fields = value
            .as_map()
            .ok_or_else(|| self.wrong_type(name, "map", value))?;
        Ok(Self {
            fields,
            prefix: self.path(name),
        })
    }

    /// A nested map field that may be absent.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] if the field is present but not a map.
    pub fn opt_map(&self, name: &str) -> Result<Option<Self>, CodecError> {
        if self.value(name).is_none() {
            return Ok(None);
        }
        self.map(name).map(Some)
    }

    /// An array of maps. A missing array reads as empty.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] if the field is not an array or an element is
    /// not a map.
    pub fn map_array(&self, name: &str) -> Result<Vec<Self>, CodecError> {
        let Some(value) = self.value(name) else {
            return Ok(Vec::new());
        };
        let values = value
            .as_array()
            .ok_or_else(|| self.wrong_type(name, "array", value))?;

        values
            .iter()
            .enumerate()
            .map(|(index, element)| {
                let element_name = format!("{name}[{index}]");
                element
                    .as_map()
                    .map(|fields| Self {
                        fields,
                        prefix: self.path(&element_name),
                    })
                    .ok_or_else(|| self.wrong_type(&element_name, "map", element))
            })
            .collect()
    }

    /// The underlying map.
    #[must_use]
    pub const fn fields(&self) -> &'a Fields {
        self.fields
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Fields {
        let item = FieldWriter::new().set("name", "Milk").finish();
        FieldWriter::new()
            .set("name", "Home Kitchen")
            .set("count", 3_i64)
            .set("nothing", Value::NullValue(crate::store::Null))
            .set("preferences", FieldWriter::new().set("language", "no").finish())
            .set("inStock", vec![Value::from(item), Value::from("oops")])
            .finish()
    }

    #[test]
    fn test_missing_and_null_are_absent() {
        let fields = sample();
        let reader = FieldReader::new(&fields);
        assert_eq!(
            reader.string("location"),
            Err(CodecError::Missing("location".to_string()))
        );
        assert_eq!(reader.opt_string("nothing"), Ok(None));
    }

    #[test]
    fn test_wrong_type_names_field() {
        let fields = sample();
        let err = FieldReader::new(&fields).string("count").unwrap_err();
        assert_eq!(err.to_string(), "field count should be string, found integer");
    }

    #[test]
    fn test_nested_paths_in_errors() {
        let fields = sample();
        let reader = FieldReader::new(&fields);
        let preferences = reader.map("preferences").unwrap();
        assert_eq!(
            preferences.string("defaultPantryId"),
            Err(CodecError::Missing("preferences.defaultPantryId".to_string()))
        );

        let err = reader.map_array("inStock").unwrap_err();
        assert!(matches!(err, CodecError::WrongType { ref field, .. } if field == "inStock[1]"));
    }

    #[test]
    fn test_missing_array_is_empty() {
        let fields = sample();
        assert!(FieldReader::new(&fields).map_array("shoppingList").unwrap().is_empty());
    }

    #[test]
    fn test_parse_reports_invalid_value() {
        let fields = FieldWriter::new().set("role", "admin").finish();
        let err = FieldReader::new(&fields)
            .parse::<tandberg_pantry_core::MemberRole>("role")
            .unwrap_err();
        assert!(matches!(err, CodecError::Invalid { .. }));
    }

    #[test]
    fn test_set_opt_skips_none() {
        let fields = FieldWriter::new()
            .set_opt("unit", None::<&str>)
            .set_opt("name", Some("Bread"))
            .finish();
        assert_eq!(fields.len(), 1);
    }
}
