//! The reset workflow: clear the seeded collections, then write the seed
//! data.
//!
//! Steps run strictly in sequence against a single [`DocumentStore`]. There
//! is no rollback: if `populate` fails part way, the store keeps whatever
//! was written before the failure.

use thiserror::Error;
use tracing::{error, info, instrument};

use tandberg_pantry_core::{Invite, Pantry, User};

use crate::codec::{CodecError, DocumentCodec};
use crate::seed::{SeedData, SeedError};
use crate::store::{CollectionPath, DocumentPath, DocumentStore, StoreError};

pub const USERS: &str = "users";
pub const PANTRIES: &str = "pantries";
pub const INVITES: &str = "invites";
/// Sub-collection under each pantry document.
pub const MEMBERS: &str = "members";

/// Top-level collections the seed data lives in, in clearing order.
pub const SEEDED_COLLECTIONS: [&str; 3] = [USERS, PANTRIES, INVITES];

/// Errors from the workflow steps.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Seed data error: {0}")]
    Seed(#[from] SeedError),

    #[error("Malformed document: {0}")]
    Codec(#[from] CodecError),
}

/// What `clear` removed from one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionCleared {
    pub collection: String,
    /// Documents deleted directly from the collection.
    pub documents: usize,
    /// `members` documents deleted from under those documents.
    pub members: usize,
}

/// Result of a `clear` run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearReport {
    pub collections: Vec<CollectionCleared>,
}

impl ClearReport {
    /// Documents deleted across all collections, sub-collections included.
    #[must_use]
    pub fn total(&self) -> usize {
        self.collections
            .iter()
            .map(|cleared| cleared.documents + cleared.members)
            .sum()
    }

    #[must_use]
    pub fn collection(&self, name: &str) -> Option<&CollectionCleared> {
        self.collections
            .iter()
            .find(|cleared| cleared.collection == name)
    }
}

/// Result of a `populate` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopulateReport {
    pub users: usize,
    pub pantries: usize,
    pub members: usize,
    /// Items across both lists of every pantry. Not separate documents.
    pub items: usize,
    pub invites: usize,
}

/// How a `reset` run ended.
#[derive(Debug)]
pub enum ResetOutcome {
    Completed {
        cleared: ClearReport,
        populated: PopulateReport,
    },
    /// The error has already been logged.
    Failed(WorkflowError),
}

impl ResetOutcome {
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

#[must_use]
pub fn user_path(user: &User) -> DocumentPath {
    CollectionPath::root(USERS).doc(user.id.as_str())
}

#[must_use]
pub fn pantry_path(pantry: &Pantry) -> DocumentPath {
    CollectionPath::root(PANTRIES).doc(pantry.id.as_str())
}

#[must_use]
pub fn invite_path(invite: &Invite) -> DocumentPath {
    CollectionPath::root(INVITES).doc(invite.code.as_str())
}

/// Delete every document in `collections`.
///
/// For `pantries`, each pantry's `members` sub-collection is emptied before
/// the pantry document itself is deleted. This includes pantries that were
/// already deleted on their own and left members behind.
///
/// # Errors
///
/// Returns the first store error; documents deleted before it stay deleted.
#[instrument(skip(store))]
pub async fn clear<S: DocumentStore>(
    store: &S,
    collections: &[&str],
) -> Result<ClearReport, WorkflowError> {
    let mut report = ClearReport::default();

    for &name in collections {
        info!("Clearing collection: {name}");
        let collection = CollectionPath::root(name);

        let mut members = 0;
        if name == PANTRIES {
            for pantry in store.list_including_missing(&collection).await? {
                let deleted = clear_members(store, &pantry).await?;
                if deleted > 0 {
                    info!(pantry = pantry.id(), "  Deleted {deleted} members from pantry");
                }
                members += deleted;
            }
        }

        let documents = store.list(&collection).await?;
        for document in &documents {
            store.delete(&document.path).await?;
        }

        info!("Deleted {} documents from {name}", documents.len());
        report.collections.push(CollectionCleared {
            collection: name.to_owned(),
            documents: documents.len(),
            members,
        });
    }

    info!(total = report.total(), "Clear complete");
    Ok(report)
}

async fn clear_members<S: DocumentStore>(
    store: &S,
    pantry: &DocumentPath,
) -> Result<usize, StoreError> {
    let members = store.list(&pantry.collection(MEMBERS)).await?;
    for member in &members {
        store.delete(&member.path).await?;
    }
    Ok(members.len())
}

/// Validate the seed data and write it.
///
/// Nothing is written if validation fails.
///
/// # Errors
///
/// Returns `WorkflowError::Seed` for invalid seed data, or the first store
/// error.
#[instrument(skip(store, seed))]
pub async fn populate<S: DocumentStore>(
    store: &S,
    seed: &SeedData,
) -> Result<PopulateReport, WorkflowError> {
    seed.validate()?;
    let mut report = PopulateReport::default();

    info!("Creating users:");
    for user in &seed.users {
        store.set(&user_path(user), &user.to_fields()).await?;
        info!("  Created user: {} ({})", user.email, user.id);
        report.users += 1;
    }

    info!("Creating pantries:");
    for pantry in &seed.pantries {
        let path = pantry_path(pantry);
        store.set(&path, &pantry.to_fields()).await?;

        let members = path.collection(MEMBERS);
        for member in &pantry.members {
            store
                .set(&members.doc(member.user_id.as_str()), &member.to_fields())
                .await?;
        }

        info!("  Created pantry: {} ({})", pantry.name, pantry.id);
        info!("    Items in stock: {}", pantry.in_stock.len());
        info!("    Items in shopping list: {}", pantry.shopping_list.len());
        info!("    Members: {}", pantry.members.len());

        report.pantries += 1;
        report.members += pantry.members.len();
        report.items += pantry.in_stock.len() + pantry.shopping_list.len();
    }

    info!("Creating invites:");
    for invite in &seed.invites {
        store.set(&invite_path(invite), &invite.to_fields()).await?;
        info!(
            "  Created invite: {} for pantry {} (expires {})",
            invite.code, invite.pantry_id, invite.expires_at
        );
        report.invites += 1;
    }

    info!("Population complete!");
    Ok(report)
}

/// Clear the seeded collections, then populate.
///
/// Errors are logged and returned inside the outcome rather than
/// propagated.
#[instrument(skip(store, seed))]
pub async fn reset<S: DocumentStore>(store: &S, seed: &SeedData) -> ResetOutcome {
    let result = async {
        let cleared = clear(store, &SEEDED_COLLECTIONS).await?;
        let populated = populate(store, seed).await?;
        Ok::<_, WorkflowError>((cleared, populated))
    }
    .await;

    match result {
        Ok((cleared, populated)) => {
            info!("Reset complete");
            ResetOutcome::Completed { cleared, populated }
        }
        Err(e) => {
            error!(error = %e, "Error resetting emulator");
            ResetOutcome::Failed(e)
        }
    }
}
