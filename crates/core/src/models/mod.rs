//! Records the pantry application keeps in its document store.
//!
//! Field names in the docs below are the stored (camelCase) names.

pub mod invite;
pub mod pantry;
pub mod user;

pub use invite::Invite;
pub use pantry::{Item, ItemList, Membership, Pantry};
pub use user::{Preferences, User};
