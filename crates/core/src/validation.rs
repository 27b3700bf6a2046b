//! Shape checks run before a record is written.
//!
//! The document store accepts anything, so these checks are the only place
//! the record invariants are enforced.

use std::collections::HashSet;

use thiserror::Error;

use crate::models::{Invite, ItemList, Pantry, User};

/// Maximum document ID length in bytes accepted by the store.
pub const MAX_DOCUMENT_ID_BYTES: usize = 1500;

/// A record violates one of its invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A document ID cannot be used as a path segment.
    #[error("invalid {kind} id {id:?}: {reason}")]
    InvalidId {
        kind: &'static str,
        id: String,
        reason: &'static str,
    },

    /// A required text field is empty.
    #[error("{record} {id}: {field} cannot be empty")]
    EmptyField {
        record: &'static str,
        id: String,
        field: &'static str,
    },

    /// Pantry does not have exactly one owner.
    #[error("pantry {pantry} has {count} owners, expected exactly one")]
    OwnerCount { pantry: String, count: usize },

    /// The owner is someone other than the creator.
    #[error("pantry {pantry} is owned by {owner} but was created by {creator}")]
    OwnerNotCreator {
        pantry: String,
        owner: String,
        creator: String,
    },

    /// A user appears twice in a pantry's members.
    #[error("pantry {pantry} lists member {user} more than once")]
    DuplicateMember { pantry: String, user: String },

    /// Two items in one list share an ID.
    #[error("pantry {pantry} has duplicate item id {item} in {list}")]
    DuplicateItem {
        pantry: String,
        list: ItemList,
        item: String,
    },

    /// An item quantity is negative or not a number.
    #[error("pantry {pantry} item {item} has invalid quantity {quantity}")]
    InvalidQuantity {
        pantry: String,
        item: String,
        quantity: f64,
    },

    /// An invite expires no later than it was created.
    #[error("invite {code} expires before it was created")]
    InviteExpiry { code: String },
}

/// Check a record before writing it.
pub trait Validate {
    /// # Errors
    ///
    /// Returns the first invariant the record violates.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Check that `id` can be used as a document ID.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidId`] if the ID is empty, too long,
/// contains `/`, is `.` or `..`, or uses the reserved `__name__` form.
pub fn check_document_id(kind: &'static str, id: &str) -> Result<(), ValidationError> {
    let reason = if id.is_empty() {
        Some("must not be empty")
    } else if id.len() > MAX_DOCUMENT_ID_BYTES {
        Some("must be at most 1500 bytes")
    } else if id.contains('/') {
        Some("must not contain '/'")
    } else if id == "." || id == ".." {
        Some("must not be '.' or '..'")
    } else if id.len() > 4 && id.starts_with("__") && id.ends_with("__") {
        Some("'__name__' ids are reserved")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ValidationError::InvalidId {
            kind,
            id: id.to_owned(),
            reason,
        }),
        None => Ok(()),
    }
}

fn non_empty(
    record: &'static str,
    id: &str,
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField {
            record,
            id: id.to_owned(),
            field,
        });
    }
    Ok(())
}

impl Validate for User {
    fn validate(&self) -> Result<(), ValidationError> {
        check_document_id("user", self.id.as_str())?;
        if let Some(name) = &self.display_name {
            non_empty("user", self.id.as_str(), "displayName", name)?;
        }
        Ok(())
    }
}

impl Validate for Pantry {
    fn validate(&self) -> Result<(), ValidationError> {
        let pantry = self.id.as_str();
        check_document_id("pantry", pantry)?;
        non_empty("pantry", pantry, "name", &self.name)?;
        non_empty("pantry", pantry, "location", &self.location)?;

        let owners: Vec<_> = self.owners().collect();
        let [owner] = owners.as_slice() else {
            return Err(ValidationError::OwnerCount {
                pantry: pantry.to_owned(),
                count: owners.len(),
            });
        };
        if owner.user_id != self.created_by {
            return Err(ValidationError::OwnerNotCreator {
                pantry: pantry.to_owned(),
                owner: owner.user_id.to_string(),
                creator: self.created_by.to_string(),
            });
        }

        let mut seen = HashSet::new();
        for member in &self.members {
            check_document_id("member", member.user_id.as_str())?;
            if !seen.insert(&member.user_id) {
                return Err(ValidationError::DuplicateMember {
                    pantry: pantry.to_owned(),
                    user: member.user_id.to_string(),
                });
            }
        }

        for list in ItemList::ALL {
            let mut ids = HashSet::new();
            for item in self.items(list) {
                non_empty("item", item.id.as_str(), "id", item.id.as_str())?;
                non_empty("item", item.id.as_str(), "name", &item.name)?;
                if !ids.insert(&item.id) {
                    return Err(ValidationError::DuplicateItem {
                        pantry: pantry.to_owned(),
                        list,
                        item: item.id.to_string(),
                    });
                }
                if let Some(quantity) = item.quantity
                    && (!quantity.is_finite() || quantity < 0.0)
                {
                    return Err(ValidationError::InvalidQuantity {
                        pantry: pantry.to_owned(),
                        item: item.id.to_string(),
                        quantity,
                    });
                }
            }
        }

        Ok(())
    }
}

impl Validate for Invite {
    fn validate(&self) -> Result<(), ValidationError> {
        check_document_id("invite", self.code.as_str())?;
        check_document_id("pantry", self.pantry_id.as_str())?;
        if self.expires_at <= self.created_at {
            return Err(ValidationError::InviteExpiry {
                code: self.code.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use super::*;
    use crate::models::{Item, Membership};
    use crate::types::{InviteCode, MemberRole, PantryId, UserId};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap()
    }

    fn pantry() -> Pantry {
        Pantry::new("pantry1", "Home Kitchen", "Hjemme", UserId::new("owner"), now())
            .with_item(ItemList::InStock, Item::new("item1", "Milk", 2.0, "l", now()))
    }

    #[test]
    fn test_valid_pantry() {
        assert_eq!(pantry().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_missing_owner() {
        let mut pantry = pantry();
        pantry.members.clear();
        assert!(matches!(
            pantry.validate(),
            Err(ValidationError::OwnerCount { count: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_second_owner() {
        let pantry = pantry().with_member(Membership::owner(UserId::new("other"), now()));
        assert!(matches!(
            pantry.validate(),
            Err(ValidationError::OwnerCount { count: 2, .. })
        ));
    }

    #[test]
    fn test_rejects_owner_other_than_creator() {
        let mut pantry = pantry();
        pantry.created_by = UserId::new("someone-else");
        assert!(matches!(
            pantry.validate(),
            Err(ValidationError::OwnerNotCreator { .. })
        ));
    }

    #[test]
    fn test_rejects_duplicate_member() {
        let pantry = pantry().with_member(Membership::added(
            UserId::new("owner"),
            MemberRole::Viewer,
            UserId::new("owner"),
            now(),
        ));
        assert!(matches!(
            pantry.validate(),
            Err(ValidationError::DuplicateMember { .. })
        ));
    }

    #[test]
    fn test_duplicate_item_ids_only_matter_within_a_list() {
        let across_lists = pantry().with_item(
            ItemList::ShoppingList,
            Item::new("item1", "Bread", 1.0, "loaf", now()),
        );
        assert_eq!(across_lists.validate(), Ok(()));

        let within_list =
            pantry().with_item(ItemList::InStock, Item::new("item1", "Bread", 1.0, "loaf", now()));
        assert!(matches!(
            within_list.validate(),
            Err(ValidationError::DuplicateItem {
                list: ItemList::InStock,
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_negative_quantity() {
        let pantry =
            pantry().with_item(ItemList::InStock, Item::new("item2", "Eggs", -1.0, "pcs", now()));
        assert!(matches!(
            pantry.validate(),
            Err(ValidationError::InvalidQuantity { .. })
        ));
    }

    #[test]
    fn test_rejects_empty_name() {
        let mut pantry = pantry();
        pantry.name = "  ".to_owned();
        assert!(matches!(
            pantry.validate(),
            Err(ValidationError::EmptyField { field: "name", .. })
        ));
    }

    #[test]
    fn test_document_id_rules() {
        assert!(check_document_id("pantry", "pantry1").is_ok());
        assert!(check_document_id("pantry", "").is_err());
        assert!(check_document_id("pantry", "a/b").is_err());
        assert!(check_document_id("pantry", "..").is_err());
        assert!(check_document_id("pantry", "__id__").is_err());
        assert!(check_document_id("pantry", &"x".repeat(1501)).is_err());
    }

    #[test]
    fn test_invite_expiry_must_follow_creation() {
        let mut invite = Invite::new(
            InviteCode::new("CODE"),
            PantryId::new("pantry1"),
            UserId::new("owner"),
            now(),
            Duration::days(7),
        );
        assert_eq!(invite.validate(), Ok(()));

        invite.expires_at = invite.created_at;
        assert!(matches!(
            invite.validate(),
            Err(ValidationError::InviteExpiry { .. })
        ));
    }
}
