//! The watermark: timestamp of the newest post already delivered.
//!
//! Stored as a single ISO-8601 line (`2024-01-02T00:00:00.000Z`) in a plain
//! text file. A missing or unparsable file is an error, never an implicit
//! "start from the beginning".
//!
//! The file only holds millisecond precision, so every timestamp that is
//! compared against or stored as a watermark goes through [`to_millis`]
//! first. Otherwise a post dated `…00.000500Z` would be saved as `…00.000Z`
//! and look new again on the next cycle.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use tokio::fs;

use crate::error::{RelayError, Result};

pub struct WatermarkStore {
    path: PathBuf,
}

impl WatermarkStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted watermark.
    pub async fn load(&self) -> Result<DateTime<Utc>> {
        let raw = fs::read_to_string(&self.path).await?;
        parse(&raw)
    }

    /// Overwrite the persisted watermark.
    pub async fn save(&self, at: DateTime<Utc>) -> Result<()> {
        fs::write(&self.path, encode(at)).await?;
        Ok(())
    }
}

/// Drop precision below the millisecond, the resolution the file stores.
pub fn to_millis(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(3)
}

fn parse(raw: &str) -> Result<DateTime<Utc>> {
    let value = raw.trim();
    DateTime::parse_from_rfc3339(value)
        .map(|dt| to_millis(dt.with_timezone(&Utc)))
        .map_err(|source| RelayError::Watermark {
            value: value.to_string(),
            source,
        })
}

fn encode(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
