//! Read seeded records back out of a store.

use tandberg_pantry_core::{Invite, Membership, Pantry, User};

use crate::codec::DocumentCodec;
use crate::store::{CollectionPath, DocumentStore};
use crate::workflow::{INVITES, MEMBERS, PANTRIES, USERS, WorkflowError};

/// # Errors
///
/// Returns error if the store fails or the document is malformed.
pub async fn fetch_user<S: DocumentStore>(
    store: &S,
    id: &str,
) -> Result<Option<User>, WorkflowError> {
    let Some(document) = store.get(&CollectionPath::root(USERS).doc(id)).await? else {
        return Ok(None);
    };
    Ok(Some(User::from_fields(&document.fields)?))
}

/// A pantry with its `members` sub-collection loaded.
///
/// # Errors
///
/// Returns error if the store fails or a document is malformed.
pub async fn fetch_pantry<S: DocumentStore>(
    store: &S,
    id: &str,
) -> Result<Option<Pantry>, WorkflowError> {
    let path = CollectionPath::root(PANTRIES).doc(id);
    let Some(document) = store.get(&path).await? else {
        return Ok(None);
    };

    let mut pantry = Pantry::from_fields(&document.fields)?;
    pantry.members = list_members(store, id).await?;
    Ok(Some(pantry))
}

/// # Errors
///
/// Returns error if the store fails or a document is malformed.
pub async fn fetch_invite<S: DocumentStore>(
    store: &S,
    code: &str,
) -> Result<Option<Invite>, WorkflowError> {
    let Some(document) = store.get(&CollectionPath::root(INVITES).doc(code)).await? else {
        return Ok(None);
    };
    Ok(Some(Invite::from_fields(&document.fields)?))
}

/// # Errors
///
/// Returns error if the store fails or a document is malformed.
pub async fn list_users<S: DocumentStore>(store: &S) -> Result<Vec<User>, WorkflowError> {
    let documents = store.list(&CollectionPath::root(USERS)).await?;
    Ok(documents
        .iter()
        .map(|document| User::from_fields(&document.fields))
        .collect::<Result<Vec<_>, _>>()?)
}

/// Members of one pantry, whether or not the pantry document exists.
///
/// # Errors
///
/// Returns error if the store fails or a document is malformed.
pub async fn list_members<S: DocumentStore>(
    store: &S,
    pantry_id: &str,
) -> Result<Vec<Membership>, WorkflowError> {
    let collection = CollectionPath::root(PANTRIES)
        .doc(pantry_id)
        .collection(MEMBERS);
    let documents = store.list(&collection).await?;
    Ok(documents
        .iter()
        .map(|document| Membership::from_fields(&document.fields))
        .collect::<Result<Vec<_>, _>>()?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::seed::{HOME_PANTRY_ID, SeedData, TEST_USER_ID, WELCOME_INVITE_CODE};
    use crate::store::MemoryStore;
    use crate::workflow::populate;

    async fn seeded() -> (MemoryStore, SeedData) {
        let store = MemoryStore::new();
        let seed =
            SeedData::fixed(Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap()).unwrap();
        populate(&store, &seed).await.unwrap();
        (store, seed)
    }

    #[tokio::test]
    async fn test_reads_back_seeded_records() {
        let (store, seed) = seeded().await;

        let user = fetch_user(&store, TEST_USER_ID).await.unwrap().unwrap();
        assert_eq!(Some(&user), seed.users.first());

        let invite = fetch_invite(&store, WELCOME_INVITE_CODE).await.unwrap().unwrap();
        assert_eq!(Some(&invite), seed.invites.first());
    }

    #[tokio::test]
    async fn test_pantry_includes_members() {
        let (store, seed) = seeded().await;
        let mut pantry = fetch_pantry(&store, HOME_PANTRY_ID).await.unwrap().unwrap();
        let mut expected = seed.pantry(HOME_PANTRY_ID).unwrap().clone();

        // Sub-collection listing is ordered by user ID
        pantry.members.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        expected.members.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        assert_eq!(pantry, expected);
    }

    #[tokio::test]
    async fn test_missing_records_are_none() {
        let store = MemoryStore::new();
        assert!(fetch_user(&store, "nobody").await.unwrap().is_none());
        assert!(fetch_pantry(&store, "pantry9").await.unwrap().is_none());
        assert!(list_users(&store).await.unwrap().is_empty());
    }
}
