//! # Evaluation Dispatcher
//!
//! Sends evaluation units to the external evaluation capability with a
//! bounded fan-out: a semaphore caps in-flight remote calls, a `JoinSet`
//! joins them, and each call carries its own timeout.
//!
//! Units are deduplicated by identity key before fan-out, so a distinct
//! identity reaches the service at most once per run — duplicates and
//! repeats are served from the [`ReviewCache`]. Results are reassembled in
//! original unit order regardless of completion order.
//!
//! ## Partial failure policy
//!
//! A failed unit (transport error, timeout, panicked worker) becomes a
//! zero-violation result carrying an error note, so one flaky rule never
//! hides sibling results. The whole invocation fails only when some file
//! ends up with no successful evaluation at all.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::timeout;

use crate::api::review::Evaluate;
use crate::review::cache::{CacheStats, ReviewCache};
use crate::review::types::{EvaluationResult, EvaluationUnit, UnitKey, Violation};

/// Hard cap on simultaneous outstanding remote calls.
pub const MAX_CONCURRENT_EVALUATIONS: usize = 4;

/// Per-call timeout; a timed-out call is a per-unit failure, not a run
/// abort.
pub const EVALUATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Evaluation results for one file, in planned unit order.
#[derive(Debug, Clone)]
pub struct FileResults {
    /// Path of the file the units originated from
    pub path: String,
    /// One result per planned unit
    pub results: Vec<EvaluationResult>,
}

/// Fatal dispatch failure: a complete result set could not be assembled.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Every evaluation for the named file failed, so its verdict cannot
    /// be computed at all.
    #[error("could not complete any evaluation for {path}: {detail}")]
    Undeliverable {
        /// File with no successful evaluation
        path: String,
        /// Note from one of the failed units
        detail: String,
    },
}

/// Outcome for one distinct unit identity.
enum KeyOutcome {
    /// Remote call succeeded
    Evaluated(Vec<Violation>),
    /// Served from the cache without a remote call
    Cached(Vec<Violation>),
    /// Remote call failed; carries the error note
    Failed(String),
}

/// Bounded-concurrency dispatcher over an [`Evaluate`] implementation.
pub struct Dispatcher<E> {
    evaluator: Arc<E>,
    cache: Arc<ReviewCache>,
    semaphore: Arc<Semaphore>,
    call_timeout: Duration,
}

impl<E: Evaluate + 'static> Dispatcher<E> {
    /// Create a dispatcher with the default concurrency cap and timeout
    /// and a fresh run-scoped cache.
    pub fn new(evaluator: E) -> Self {
        Self {
            evaluator: Arc::new(evaluator),
            cache: Arc::new(ReviewCache::new()),
            semaphore: Arc::new(Semaphore::new(MAX_CONCURRENT_EVALUATIONS)),
            call_timeout: EVALUATION_TIMEOUT,
        }
    }

    /// Override the per-call timeout (used by tests).
    pub fn with_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Override the concurrency cap.
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.semaphore = Arc::new(Semaphore::new(max_in_flight.max(1)));
        self
    }

    /// Share an existing cache (e.g., one pre-warmed by an earlier pass).
    pub fn with_cache(mut self, cache: Arc<ReviewCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Snapshot of the cache hit/miss counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Dispatch all units and return their results grouped by originating
    /// file, in planned order.
    pub async fn dispatch(
        &self,
        units: Vec<EvaluationUnit>,
    ) -> Result<Vec<FileResults>, DispatchError> {
        if units.is_empty() {
            return Ok(Vec::new());
        }

        // Collapse duplicate identities up front; one slot per distinct key.
        let mut slot_by_key: HashMap<UnitKey, usize> = HashMap::new();
        let mut distinct: Vec<(UnitKey, EvaluationUnit)> = Vec::new();
        for unit in &units {
            let key = unit.key();
            if !slot_by_key.contains_key(&key) {
                slot_by_key.insert(key.clone(), distinct.len());
                distinct.push((key, unit.clone()));
            }
        }

        let mut outcomes: Vec<Option<KeyOutcome>> = Vec::with_capacity(distinct.len());
        outcomes.resize_with(distinct.len(), || None);

        // Cache lookups happen before any remote call.
        let mut join_set: JoinSet<(usize, Result<Vec<Violation>, String>)> = JoinSet::new();
        for (slot, (key, unit)) in distinct.iter().enumerate() {
            if let Some(violations) = self.cache.get(key) {
                outcomes[slot] = Some(KeyOutcome::Cached(violations));
                continue;
            }

            let evaluator = Arc::clone(&self.evaluator);
            let semaphore = Arc::clone(&self.semaphore);
            let call_timeout = self.call_timeout;
            let unit = unit.clone();

            join_set.spawn(async move {
                let _permit = semaphore.acquire().await.expect("semaphore closed");

                let result = match timeout(call_timeout, evaluator.evaluate(&unit)).await {
                    Ok(Ok(violations)) => Ok(violations),
                    Ok(Err(e)) => Err(e.to_string()),
                    Err(_) => Err(format!(
                        "evaluation timed out after {}s",
                        call_timeout.as_secs_f64()
                    )),
                };

                (slot, result)
            });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((slot, Ok(violations))) => {
                    outcomes[slot] = Some(KeyOutcome::Evaluated(violations));
                }
                Ok((slot, Err(note))) => {
                    log::debug!("evaluation failed for {}: {}", distinct[slot].1.path, note);
                    outcomes[slot] = Some(KeyOutcome::Failed(note));
                }
                Err(e) => {
                    // Slot unknown for a panicked task; it is filled below.
                    log::warn!("evaluation task panicked: {}", e);
                }
            }
        }

        // Populate the cache only after a call completed successfully, so
        // a cancelled or failed call can never write a partial entry.
        for (slot, (key, _)) in distinct.iter().enumerate() {
            match &outcomes[slot] {
                Some(KeyOutcome::Evaluated(violations)) => {
                    self.cache.put(key.clone(), violations.clone());
                }
                Some(_) => {}
                None => {
                    outcomes[slot] = Some(KeyOutcome::Failed(
                        "evaluation task panicked".to_string(),
                    ));
                }
            }
        }

        // Reassemble per-unit results in original order; the first consumer
        // of a freshly evaluated slot is the uncached one. Every further
        // consumer of a slot is served from cached data and counts as a
        // stats hit, so the counters match the report rather than the
        // distinct-identity set.
        let mut consumed_slots: HashSet<usize> = HashSet::new();
        let mut files: Vec<FileResults> = Vec::new();
        let mut file_index: HashMap<String, usize> = HashMap::new();

        for unit in units {
            let slot = slot_by_key[&unit.key()];
            let result = match outcomes[slot].as_ref().expect("outcome filled") {
                KeyOutcome::Evaluated(violations) => {
                    let first_consumer = consumed_slots.insert(slot);
                    if !first_consumer {
                        self.cache.record_hit();
                    }
                    EvaluationResult {
                        unit: unit.clone(),
                        violations: violations.clone(),
                        cached: !first_consumer,
                        error: None,
                    }
                }
                KeyOutcome::Cached(violations) => {
                    // The distinct key's lookup already counted one hit
                    if !consumed_slots.insert(slot) {
                        self.cache.record_hit();
                    }
                    EvaluationResult {
                        unit: unit.clone(),
                        violations: violations.clone(),
                        cached: true,
                        error: None,
                    }
                }
                KeyOutcome::Failed(note) => EvaluationResult {
                    unit: unit.clone(),
                    violations: Vec::new(),
                    cached: false,
                    error: Some(note.clone()),
                },
            };

            let idx = *file_index.entry(unit.path.clone()).or_insert_with(|| {
                files.push(FileResults {
                    path: unit.path.clone(),
                    results: Vec::new(),
                });
                files.len() - 1
            });
            files[idx].results.push(result);
        }

        // A file with zero successful evaluations cannot be reported on.
        for file in &files {
            if file.results.iter().all(|r| r.error.is_some()) {
                let detail = file
                    .results
                    .first()
                    .and_then(|r| r.error.clone())
                    .unwrap_or_else(|| "no evaluations completed".to_string());
                return Err(DispatchError::Undeliverable {
                    path: file.path.clone(),
                    detail,
                });
            }
        }

        Ok(files)
    }
}
