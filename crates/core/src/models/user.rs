//! User accounts.

use chrono::{DateTime, Utc};

use crate::types::{Email, Language, PantryId, UserId};

/// Per-user settings stored under `preferences`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Preferences {
    /// Interface language (`language`).
    pub language: Language,
    /// Pantry opened on login (`defaultPantryId`).
    pub default_pantry_id: Option<PantryId>,
}

/// A user document in `users/{id}`.
///
/// The document ID is the auth system's user ID, so a signed-in user can be
/// looked up without a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub display_name: Option<String>,
    pub preferences: Preferences,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a user whose timestamps are both `now`.
    #[must_use]
    pub fn new(
        id: UserId,
        email: Email,
        display_name: Option<&str>,
        preferences: Preferences,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            display_name: display_name.map(str::to_owned),
            preferences,
            created_at: now,
            updated_at: now,
        }
    }
}
