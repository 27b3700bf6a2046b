//! Integration tests against a running Firestore emulator.
//!
//! Ignored by default. Start the emulator and run with `--ignored`; the
//! emulator address comes from `FIRESTORE_EMULATOR_HOST` as for the CLI.

#![allow(clippy::unwrap_used)]

use tandberg_pantry_core::ItemList;
use tandberg_pantry_integration_tests::seed_data;
use tandberg_pantry_seeder::queries::{fetch_invite, fetch_pantry, list_members};
use tandberg_pantry_seeder::seed::{HOME_PANTRY_ID, WELCOME_INVITE_CODE};
use tandberg_pantry_seeder::{
    CollectionPath, DocumentStore, EmulatorConfig, FirestoreEmulator, SEEDED_COLLECTIONS, clear,
    reset,
};

fn emulator() -> FirestoreEmulator {
    FirestoreEmulator::new(&EmulatorConfig::from_env().unwrap()).unwrap()
}

#[tokio::test]
#[ignore = "requires a running Firestore emulator"]
async fn test_reset_against_emulator() {
    let emulator = emulator();
    let seed = seed_data().unwrap();

    assert!(reset(&emulator, &seed).await.is_completed());

    let pantry = fetch_pantry(&emulator, HOME_PANTRY_ID).await.unwrap().unwrap();
    let milk = pantry.find_item(ItemList::InStock, "Milk").unwrap();
    assert_eq!(milk.quantity, Some(2.0));
    assert_eq!(pantry.members.len(), 2);

    let invite = fetch_invite(&emulator, WELCOME_INVITE_CODE).await.unwrap().unwrap();
    assert_eq!(invite.expires_at, seed.invites.first().unwrap().expires_at);
}

#[tokio::test]
#[ignore = "requires a running Firestore emulator"]
async fn test_clear_against_emulator() {
    let emulator = emulator();
    assert!(reset(&emulator, &seed_data().unwrap()).await.is_completed());

    clear(&emulator, &SEEDED_COLLECTIONS).await.unwrap();

    for collection in SEEDED_COLLECTIONS {
        let documents = emulator.list(&CollectionPath::root(collection)).await.unwrap();
        assert!(documents.is_empty(), "{collection} not empty");
    }
    assert!(list_members(&emulator, HOME_PANTRY_ID).await.unwrap().is_empty());
}
