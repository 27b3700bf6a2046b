//! Tandberg Pantry Seeder - Reset the local Firestore emulator.
//!
//! Clears the collections the pantry application uses and writes a fixed set
//! of sample users, pantries, members and invites, so that every developer
//! starts from the same data.
//!
//! # Architecture
//!
//! - [`config`] - Emulator address and credentials from the environment
//! - [`store`] - The [`DocumentStore`] seam, the emulator REST client and an
//!   in-memory store
//! - [`codec`] - Record to document conversions
//! - [`seed`] - The fixed data set
//! - [`workflow`] - `clear`, `populate` and `reset`
//! - [`queries`] - Reading seeded records back
//!
//! # Example
//!
//! ```rust,no_run
//! use tandberg_pantry_seeder::{EmulatorConfig, FirestoreEmulator, SeedData, reset};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EmulatorConfig::from_env()?;
//! let emulator = FirestoreEmulator::new(&config)?;
//! let seed = SeedData::fixed(chrono::Utc::now())?;
//!
//! let outcome = reset(&emulator, &seed).await;
//! assert!(outcome.is_completed());
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod codec;
pub mod config;
pub mod queries;
pub mod seed;
pub mod store;
pub mod workflow;

pub use codec::{CodecError, DocumentCodec};
pub use config::{ConfigError, EmulatorConfig};
pub use seed::{SeedData, SeedError};
pub use store::{
    CollectionPath, Document, DocumentPath, DocumentStore, Fields, FirestoreEmulator,
    MemoryStore, StoreError, Value,
};
pub use workflow::{
    ClearReport, CollectionCleared, PopulateReport, ResetOutcome, SEEDED_COLLECTIONS,
    WorkflowError, clear, populate, reset,
};
