//! Pantries, their items, and their members.

use chrono::{DateTime, Utc};

use crate::types::{ItemId, MemberRole, PantryId, UserId};

/// Which of a pantry's two item lists an item lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemList {
    /// Items currently in the pantry (`inStock`).
    InStock,
    /// Items to buy (`shoppingList`).
    ShoppingList,
}

impl ItemList {
    /// Both lists, in document field order.
    pub const ALL: [Self; 2] = [Self::InStock, Self::ShoppingList];

    /// The document field holding this list.
    #[must_use]
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::InStock => "inStock",
            Self::ShoppingList => "shoppingList",
        }
    }
}

impl std::fmt::Display for ItemList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field_name())
    }
}

/// An entry in `inStock` or `shoppingList`.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    /// Epoch milliseconds.
    pub last_updated: i64,
}

impl Item {
    /// Create an item last updated at `at`.
    #[must_use]
    pub fn new(
        id: impl Into<ItemId>,
        name: &str,
        quantity: f64,
        unit: &str,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.to_owned(),
            quantity: Some(quantity),
            unit: Some(unit.to_owned()),
            last_updated: at.timestamp_millis(),
        }
    }
}

/// A member document in `pantries/{pantryId}/members/{userId}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub user_id: UserId,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
    /// Who granted access. `None` for the owner.
    pub added_by: Option<UserId>,
}

impl Membership {
    /// The creator's owner membership.
    #[must_use]
    pub const fn owner(user_id: UserId, joined_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            role: MemberRole::Owner,
            joined_at,
            added_by: None,
        }
    }

    /// A membership granted by an existing member.
    #[must_use]
    pub const fn added(
        user_id: UserId,
        role: MemberRole,
        added_by: UserId,
        joined_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            role,
            joined_at,
            added_by: Some(added_by),
        }
    }
}

/// A pantry document in `pantries/{id}`.
///
/// `members` is not part of the pantry document itself; each entry is a
/// separate document in the pantry's `members` sub-collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Pantry {
    pub id: PantryId,
    pub name: String,
    pub location: String,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub in_stock: Vec<Item>,
    pub shopping_list: Vec<Item>,
    pub members: Vec<Membership>,
}

impl Pantry {
    /// Create an empty pantry with its creator as owner.
    #[must_use]
    pub fn new(
        id: impl Into<PantryId>,
        name: &str,
        location: &str,
        created_by: UserId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.to_owned(),
            location: location.to_owned(),
            members: vec![Membership::owner(created_by.clone(), now)],
            created_by,
            created_at: now,
            updated_at: now,
            in_stock: Vec::new(),
            shopping_list: Vec::new(),
        }
    }

    /// Append an item to one of the lists.
    #[must_use]
    pub fn with_item(mut self, list: ItemList, item: Item) -> Self {
        self.items_mut(list).push(item);
        self
    }

    /// Add a member.
    #[must_use]
    pub fn with_member(mut self, member: Membership) -> Self {
        self.members.push(member);
        self
    }

    /// The items in one list.
    #[must_use]
    pub fn items(&self, list: ItemList) -> &[Item] {
        match list {
            ItemList::InStock => &self.in_stock,
            ItemList::ShoppingList => &self.shopping_list,
        }
    }

    fn items_mut(&mut self, list: ItemList) -> &mut Vec<Item> {
        match list {
            ItemList::InStock => &mut self.in_stock,
            ItemList::ShoppingList => &mut self.shopping_list,
        }
    }

    /// Members holding the owner role.
    pub fn owners(&self) -> impl Iterator<Item = &Membership> {
        self.members
            .iter()
            .filter(|member| member.role == MemberRole::Owner)
    }

    /// Look up an item by name in one list.
    #[must_use]
    pub fn find_item(&self, list: ItemList, name: &str) -> Option<&Item> {
        self.items(list).iter().find(|item| item.name == name)
    }
}
