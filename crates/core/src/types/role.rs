//! Enumerations stored as plain strings in documents.

use serde::{Deserialize, Serialize};

/// A string did not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    /// Which enumeration was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// A member's role within a pantry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    /// Created the pantry. Exactly one per pantry.
    Owner,
    /// May change items and lists.
    Editor,
    /// Read-only access.
    Viewer,
}

impl MemberRole {
    /// The value written to the `role` field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Editor => "editor",
            Self::Viewer => "viewer",
        }
    }
}

impl std::fmt::Display for MemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MemberRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "editor" => Ok(Self::Editor),
            "viewer" => Ok(Self::Viewer),
            _ => Err(ParseEnumError {
                kind: "member role",
                value: s.to_owned(),
            }),
        }
    }
}

/// Interface language preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Norwegian.
    No,
    /// English. New accounts start here.
    #[default]
    En,
    /// Russian.
    Ru,
}

impl Language {
    /// The language code written to `preferences.language`.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::No => "no",
            Self::En => "en",
            Self::Ru => "ru",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Language {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no" => Ok(Self::No),
            "en" => Ok(Self::En),
            "ru" => Ok(Self::Ru),
            _ => Err(ParseEnumError {
                kind: "language",
                value: s.to_owned(),
            }),
        }
    }
}
