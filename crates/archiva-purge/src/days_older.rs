//! Remove snapshot builds older than a number of days.

use archiva_core::filename::FilenameLexer;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::{Duration, SystemTime};
use tracing::{debug, info};

use crate::{PurgeContext, PurgeResult, PurgeStrategy};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

pub struct DaysOlderPurge {
    context: PurgeContext,
    days_older: u32,
}

impl DaysOlderPurge {
    pub fn new(context: PurgeContext, days_older: u32) -> Self {
        Self {
            context,
            days_older,
        }
    }

    fn cutoff(&self) -> Option<SystemTime> {
        SystemTime::now().checked_sub(Duration::from_secs(
            u64::from(self.days_older) * SECONDS_PER_DAY,
        ))
    }
}

#[async_trait]
impl PurgeStrategy for DaysOlderPurge {
    fn name(&self) -> &'static str {
        "days-older"
    }

    async fn process(&self, path: &str) -> PurgeResult<()> {
        let Some((file, artifact)) = self.context.snapshot_target(path).await? else {
            return Ok(());
        };
        let Some(cutoff) = self.cutoff() else {
            return Ok(());
        };

        let modified = tokio::fs::metadata(&file).await?.modified()?;
        if modified >= cutoff {
            debug!(path = %path, "Snapshot is younger than the purge threshold");
            return Ok(());
        }

        let (Some(dir), Some(name)) = (file.parent(), file.file_name().and_then(|n| n.to_str()))
        else {
            return Ok(());
        };
        let prefix = FilenameLexer::new(name).stem();
        let siblings = self.context.sibling_files(dir, prefix).await?;
        let deleted = self.context.purge_files(&siblings).await?;

        info!(
            repository = %self.context.repository().id,
            artifact = %artifact,
            modified = %DateTime::<Utc>::from(modified),
            files = deleted,
            "Purged snapshot older than {} days",
            self.days_older
        );
        Ok(())
    }
}
