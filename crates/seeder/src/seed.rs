//! The fixed sample data written by `populate`.
//!
//! Every identifier is a literal so that repeated runs produce the same
//! document paths, and every timestamp derives from one seed instant.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use tandberg_pantry_core::{
    Email, EmailError, Invite, InviteCode, Item, ItemList, Language, MemberRole, Membership,
    Pantry, PantryId, Preferences, User, UserId, Validate, ValidationError,
};

/// The account developers sign in with against the auth emulator.
pub const TEST_USER_ID: &str = "s1isQk9Oon02UQQ1xQ8R1XDHV9DD";
pub const TEST_USER_EMAIL: &str = "test@example.com";

/// A second account, shared into the home pantry as an editor.
pub const SECOND_USER_ID: &str = "s2xTandbergSecondUser0000001";
pub const SECOND_USER_EMAIL: &str = "second@example.com";

pub const HOME_PANTRY_ID: &str = "pantry1";
pub const CABIN_PANTRY_ID: &str = "pantry2";

pub const WELCOME_INVITE_CODE: &str = "WELCOME-HOME-2024";
pub const INVITE_TTL_DAYS: i64 = 7;

/// Errors building or checking seed data.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Invalid seed record: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Invalid seed email: {0}")]
    Email(#[from] EmailError),

    #[error("{record} refers to unknown user {user}")]
    UnknownUser { record: String, user: String },

    #[error("{record} refers to unknown pantry {pantry}")]
    UnknownPantry { record: String, pantry: String },
}

/// Every record `populate` writes.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedData {
    pub users: Vec<User>,
    pub pantries: Vec<Pantry>,
    pub invites: Vec<Invite>,
}

impl SeedData {
    /// The standard data set, timestamped at `now`.
    ///
    /// # Errors
    ///
    /// Returns `SeedError` if a literal email fails to parse.
    pub fn fixed(now: DateTime<Utc>) -> Result<Self, SeedError> {
        let test_user = UserId::new(TEST_USER_ID);
        let second_user = UserId::new(SECOND_USER_ID);

        let users = vec![
            User::new(
                test_user.clone(),
                Email::parse(TEST_USER_EMAIL)?,
                Some("Test User"),
                Preferences {
                    language: Language::No,
                    default_pantry_id: None,
                },
                now,
            ),
            User::new(
                second_user.clone(),
                Email::parse(SECOND_USER_EMAIL)?,
                Some("Second User"),
                Preferences {
                    language: Language::En,
                    default_pantry_id: None,
                },
                now,
            ),
        ];

        let pantries = vec![
            Pantry::new(HOME_PANTRY_ID, "Home Kitchen", "Hjemme", test_user.clone(), now)
                .with_item(ItemList::InStock, Item::new("milk", "Milk", 2.0, "l", now))
                .with_item(ItemList::InStock, Item::new("bread", "Bread", 1.0, "loaf", now))
                .with_item(
                    ItemList::ShoppingList,
                    Item::new("tomatoes", "Tomatoes", 6.0, "pcs", now),
                )
                .with_member(Membership::added(
                    second_user,
                    MemberRole::Editor,
                    test_user.clone(),
                    now,
                )),
            Pantry::new(
                CABIN_PANTRY_ID,
                "Mountain Cabin",
                "Hytta i Fjellet",
                test_user.clone(),
                now,
            )
            .with_item(ItemList::InStock, Item::new("coffee", "Coffee", 1.0, "kg", now))
            .with_item(
                ItemList::ShoppingList,
                Item::new("toilet-paper", "Toilet Paper", 8.0, "rolls", now),
            ),
        ];

        let invites = vec![Invite::new(
            InviteCode::new(WELCOME_INVITE_CODE),
            PantryId::new(HOME_PANTRY_ID),
            test_user,
            now,
            Duration::days(INVITE_TTL_DAYS),
        )];

        Ok(Self {
            users,
            pantries,
            invites,
        })
    }

    /// Check every record and every reference between records.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), SeedError> {
        let user_ids: HashSet<&UserId> = self.users.iter().map(|user| &user.id).collect();
        let pantry_ids: HashSet<&PantryId> =
            self.pantries.iter().map(|pantry| &pantry.id).collect();

        let known_user = |record: String, user: &UserId| {
            if user_ids.contains(user) {
                Ok(())
            } else {
                Err(SeedError::UnknownUser {
                    record,
                    user: user.to_string(),
                })
            }
        };
        let known_pantry = |record: String, pantry: &PantryId| {
            if pantry_ids.contains(pantry) {
                Ok(())
            } else {
                Err(SeedError::UnknownPantry {
                    record,
                    pantry: pantry.to_string(),
                })
            }
        };

        for user in &self.users {
            user.validate()?;
            if let Some(pantry) = &user.preferences.default_pantry_id {
                known_pantry(format!("user {}", user.id), pantry)?;
            }
        }

        for pantry in &self.pantries {
            pantry.validate()?;
            for member in &pantry.members {
                let record = format!("pantry {} member", pantry.id);
                known_user(record.clone(), &member.user_id)?;
                if let Some(added_by) = &member.added_by {
                    known_user(record, added_by)?;
                }
            }
        }

        for invite in &self.invites {
            invite.validate()?;
            let record = format!("invite {}", invite.code);
            known_user(record.clone(), &invite.created_by)?;
            known_pantry(record, &invite.pantry_id)?;
        }

        Ok(())
    }

    /// Number of membership documents across all pantries.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.pantries.iter().map(|pantry| pantry.members.len()).sum()
    }

    /// Number of items across both lists of every pantry.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.pantries
            .iter()
            .map(|pantry| pantry.in_stock.len() + pantry.shopping_list.len())
            .sum()
    }

    #[must_use]
    pub fn pantry(&self, id: &str) -> Option<&Pantry> {
        self.pantries.iter().find(|pantry| pantry.id.as_str() == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap()
    }

    #[test]
    fn test_fixed_data_is_valid() {
        let seed = SeedData::fixed(now()).unwrap();
        seed.validate().unwrap();
        assert_eq!(seed.users.len(), 2);
        assert_eq!(seed.pantries.len(), 2);
        assert_eq!(seed.invites.len(), 1);
        assert_eq!(seed.member_count(), 3);
        assert_eq!(seed.item_count(), 5);
    }

    #[test]
    fn test_home_kitchen_contents() {
        let seed = SeedData::fixed(now()).unwrap();
        let home = seed.pantry(HOME_PANTRY_ID).unwrap();
        assert_eq!(home.name, "Home Kitchen");

        let milk = home.find_item(ItemList::InStock, "Milk").unwrap();
        assert_eq!(milk.quantity, Some(2.0));
        assert_eq!(milk.unit.as_deref(), Some("l"));

        let editor = home
            .members
            .iter()
            .find(|member| member.role == MemberRole::Editor)
            .unwrap();
        assert_eq!(editor.user_id.as_str(), SECOND_USER_ID);
        assert_eq!(editor.added_by.as_ref().unwrap().as_str(), TEST_USER_ID);
    }

    #[test]
    fn test_test_user_prefers_norwegian() {
        let seed = SeedData::fixed(now()).unwrap();
        let user = seed
            .users
            .iter()
            .find(|user| user.id.as_str() == TEST_USER_ID)
            .unwrap();
        assert_eq!(user.email.as_str(), TEST_USER_EMAIL);
        assert_eq!(
            user.preferences,
            Preferences {
                language: Language::No,
                default_pantry_id: None,
            }
        );
    }

    #[test]
    fn test_every_timestamp_is_the_seed_instant() {
        let seed = SeedData::fixed(now()).unwrap();
        assert!(seed.users.iter().all(|user| user.created_at == now()));
        assert!(seed.pantries.iter().all(|pantry| {
            pantry.created_at == now()
                && pantry
                    .in_stock
                    .iter()
                    .all(|item| item.last_updated == now().timestamp_millis())
        }));

        let invite = seed.invites.first().unwrap();
        assert_eq!(invite.expires_at - invite.created_at, Duration::days(INVITE_TTL_DAYS));
    }

    #[test]
    fn test_same_instant_same_data() {
        assert_eq!(SeedData::fixed(now()).unwrap(), SeedData::fixed(now()).unwrap());
    }

    #[test]
    fn test_rejects_member_without_user() {
        let mut seed = SeedData::fixed(now()).unwrap();
        seed.users.retain(|user| user.id.as_str() != SECOND_USER_ID);
        assert!(matches!(seed.validate(), Err(SeedError::UnknownUser { .. })));
    }

    #[test]
    fn test_rejects_invite_for_missing_pantry() {
        let mut seed = SeedData::fixed(now()).unwrap();
        seed.invites.first_mut().unwrap().pantry_id = PantryId::new("pantry9");
        assert!(matches!(seed.validate(), Err(SeedError::UnknownPantry { .. })));
    }

    #[test]
    fn test_rejects_unknown_default_pantry() {
        let mut seed = SeedData::fixed(now()).unwrap();
        seed.users.first_mut().unwrap().preferences.default_pantry_id =
            Some(PantryId::new("pantry9"));
        assert!(matches!(seed.validate(), Err(SeedError::UnknownPantry { .. })));
    }

    #[test]
    fn test_rejects_invalid_pantry() {
        let mut seed = SeedData::fixed(now()).unwrap();
        seed.pantries.first_mut().unwrap().members.clear();
        assert!(matches!(
            seed.validate(),
            Err(SeedError::Invalid(ValidationError::OwnerCount { count: 0, .. }))
        ));
    }
}
