//! Repository purge for Archiva managed repositories.
//!
//! Snapshot builds are removed by one of two policies, retention count or
//! age, and snapshot versions superseded by a newer version can be removed
//! wholesale. The [`RepositoryScanner`] walks a repository and feeds each
//! artifact file to a [`RepositoryPurgeConsumer`].

pub mod cleanup_released;
pub mod consumer;
pub mod days_older;
pub mod error;
pub mod pattern;
pub mod retention_count;
pub mod scanner;
pub mod strategy;

#[cfg(test)]
mod fixture;

pub use cleanup_released::CleanupReleasedSnapshotsPurge;
pub use consumer::{PurgeStrategyKind, RepositoryPurgeConsumer};
pub use days_older::DaysOlderPurge;
pub use error::{PurgeError, PurgeResult};
pub use pattern::FilePattern;
pub use retention_count::RetentionCountPurge;
pub use scanner::{RepositoryConsumer, RepositoryScanner, ScanStatistics};
pub use strategy::{PurgeContext, PurgeStrategy};
