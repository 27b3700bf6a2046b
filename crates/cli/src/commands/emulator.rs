//! Emulator reset commands.
//!
//! # Usage
//!
//! ```bash
//! # Clear and repopulate (default)
//! pantry-seed
//! pantry-seed reset
//!
//! # Only delete the seeded collections
//! pantry-seed clear
//!
//! # Only write the seed data
//! pantry-seed populate
//! ```
//!
//! # Environment Variables
//!
//! - `FIRESTORE_EMULATOR_HOST` - Emulator `host:port` (default: localhost:8080)
//! - `FIRESTORE_PROJECT_ID` - Project to seed (default: tandberg-pantry)

use chrono::Utc;
use tracing::info;

use tandberg_pantry_seeder::{FirestoreEmulator, SEEDED_COLLECTIONS, SeedData, workflow};

/// Delete every document in the seeded collections.
///
/// # Errors
///
/// Returns an error if any list or delete request fails.
pub async fn clear(emulator: &FirestoreEmulator) -> Result<(), Box<dyn std::error::Error>> {
    info!("Clearing emulator data...");
    let report = workflow::clear(emulator, &SEEDED_COLLECTIONS).await?;
    info!(documents = report.total(), "Clear complete!");
    Ok(())
}

/// Write the seed data.
///
/// # Errors
///
/// Returns an error if the seed data is invalid or a write fails.
pub async fn populate(emulator: &FirestoreEmulator) -> Result<(), Box<dyn std::error::Error>> {
    info!("Populating emulator with test data...");
    let seed = SeedData::fixed(Utc::now())?;
    let report = workflow::populate(emulator, &seed).await?;

    info!("Summary:");
    info!("  Users: {}", report.users);
    info!("  Pantries: {}", report.pantries);
    info!("  Members: {}", report.members);
    info!("  Items: {}", report.items);
    info!("  Invites: {}", report.invites);
    Ok(())
}

/// Clear, then populate. Workflow failures are logged, not returned.
///
/// # Errors
///
/// Returns an error only if the seed data cannot be built.
pub async fn reset(emulator: &FirestoreEmulator) -> Result<(), Box<dyn std::error::Error>> {
    info!("Resetting emulator...");
    let seed = SeedData::fixed(Utc::now())?;
    // The outcome is already logged by the workflow
    let _outcome = workflow::reset(emulator, &seed).await;
    Ok(())
}
