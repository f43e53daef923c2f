//! Storage backends
//!
//! This module holds the store traits and the two built-in backends:
//! an in-memory store (atomic counters, used by embedding request handlers
//! and most tests) and a file-backed snapshot store (durable, used by the
//! CLI). The factory picks a backend from configuration.

pub mod memory;
pub mod snapshot;
pub mod traits;

pub use memory::{MemoryCommunityStore, MemoryPatientStore};
pub use snapshot::SnapshotStore;
pub use traits::{CommunityStore, PatientStore};

use crate::config::schema::{SentinelConfig, StorageBackend};
use crate::domain::Result;
use std::sync::Arc;

/// Create the patient and community stores selected by the configuration
///
/// # Arguments
///
/// * `config` - The loaded configuration
///
/// # Returns
///
/// Returns Arc-wrapped trait objects for both stores. For the snapshot
/// backend both handles point at the same underlying store so patients and
/// communities land in one snapshot file.
///
/// # Errors
///
/// Returns an error if the snapshot file cannot be opened or fails its
/// integrity check.
pub async fn create_stores(
    config: &SentinelConfig,
) -> Result<(Arc<dyn PatientStore>, Arc<dyn CommunityStore>)> {
    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::info!("Creating in-memory stores");
            Ok((
                Arc::new(MemoryPatientStore::new()) as Arc<dyn PatientStore>,
                Arc::new(MemoryCommunityStore::new()) as Arc<dyn CommunityStore>,
            ))
        }
        StorageBackend::Snapshot => {
            tracing::info!(
                path = %config.storage.snapshot_path,
                "Opening snapshot store"
            );
            let store = SnapshotStore::open(
                &config.storage.snapshot_path,
                config.storage.verify_checksum,
            )
            .await?;
            Ok((
                Arc::new(store.clone()) as Arc<dyn PatientStore>,
                Arc::new(store) as Arc<dyn CommunityStore>,
            ))
        }
    }
}
