use serde::{Deserialize, Serialize};

/// Result of a single enrichment attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum EnrichmentOutcome {
    /// The record was updated. `populated` counts metric fields written.
    Enriched { populated: usize },
    /// The record no longer exists; nothing was done.
    Skipped,
}
