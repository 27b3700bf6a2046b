//! Tandberg Pantry Core - Shared record types.
//!
//! This crate provides the records the pantry application keeps in its
//! document store, shared by the seeding tool and its tests:
//! - `User` - an authenticated account and its preferences
//! - `Pantry` - a named pantry with in-stock and shopping-list items
//! - `Membership` - a user's role in a pantry
//! - `Invite` - an invite link code granting access to a pantry
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no document
//! store access, no HTTP clients. Encoding to the store's wire format lives
//! in the seeder crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, roles and languages
//! - [`models`] - The stored records
//! - [`validation`] - Shape checks run before a record is written

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::{Validate, ValidationError, check_document_id};
