//! Saved optimizer runs, kept per user in the record store.

use serde::{Deserialize, Serialize};

use super::{OptimizeAction, OptimizeOutcome, OptimizeRequest};
use crate::model::{Entity, Record};
use crate::store::RecordStore;
use crate::types::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizeRun {
    pub action: OptimizeAction,
    pub template_id: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
}

impl OptimizeRun {
    pub fn new(request: &OptimizeRequest, outcome: &OptimizeOutcome) -> Self {
        Self {
            action: request.action,
            template_id: request.template_id(),
            prompt: request.prompt.clone(),
            result: Some(outcome.result.clone()).filter(|r| !r.is_empty()),
            analysis: outcome.analysis.clone(),
        }
    }

    /// Rewrite or analysis text, whichever the run produced
    pub fn output(&self) -> &str {
        self.analysis
            .as_deref()
            .or(self.result.as_deref())
            .unwrap_or_default()
    }
}

impl Entity for OptimizeRun {
    const COLLECTION: &'static str = "optimize_history";

    fn display_name(&self) -> &str {
        &self.template_id
    }

    /// Newest first
    fn sort_records(records: &mut [Record<Self>]) {
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }
}

/// Save a finished run for `user`.
pub fn save_run<S: RecordStore>(
    store: &S,
    user: &UserId,
    request: &OptimizeRequest,
    outcome: &OptimizeOutcome,
) -> anyhow::Result<Record<OptimizeRun>> {
    let record = store.insert(user, OptimizeRun::new(request, outcome))?;
    tracing::debug!("Saved {} run {}", record.data.template_id, record.id);
    Ok(record)
}

/// Saved runs of `user`, newest first, at most `limit` of them.
pub fn history<S: RecordStore>(
    store: &S,
    user: &UserId,
    limit: usize,
) -> anyhow::Result<Vec<Record<OptimizeRun>>> {
    let mut records = store.list::<OptimizeRun>(user)?;
    records.truncate(limit);
    Ok(records)
}
