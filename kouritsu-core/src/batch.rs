//! Parallel discard evaluation for many independent players.
//!
//! Every request gets its own engine and cache, so requests share no mutable
//! state and run on a dedicated rayon ThreadPool.

use anyhow::Context;
use rayon::prelude::*;

use crate::config::{BatchConfig, EngineConfig};
use crate::efficiency::{DiscardCandidate, TileEfficiencyEngine};
use crate::errors::EfficiencyResult;
use crate::hand::PlayerHand;
use crate::revealed::RevealedCounts;

/// One player's decision point: a 3n+2 hand and everything they can see.
#[derive(Debug, Clone)]
pub struct DecisionRequest {
    pub hand: PlayerHand,
    pub revealed: RevealedCounts,
}

/// Ranked candidates for one request, or why it was rejected.
pub type DecisionResult = EfficiencyResult<Vec<DiscardCandidate>>;

fn evaluate_single(
    index: usize,
    request: &DecisionRequest,
    config: &EngineConfig,
) -> DecisionResult {
    let result = TileEfficiencyEngine::with_config(config.clone())
        .and_then(|mut engine| engine.evaluate_discards(&request.hand, &request.revealed));
    if let Err(e) = &result {
        log::warn!("batch request {index} rejected: {e}");
    }
    result
}

/// Parallel batch evaluator using a dedicated rayon ThreadPool.
pub struct BatchEvaluator {
    pool: rayon::ThreadPool,
    engine: EngineConfig,
}

impl BatchEvaluator {
    /// Builds the pool described by `config`.
    pub fn new(config: &BatchConfig) -> anyhow::Result<Self> {
        config
            .engine
            .validate()
            .context("invalid engine config for batch evaluator")?;
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(n) = config.num_threads {
            builder = builder.num_threads(n);
        }
        let pool = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build thread pool: {}", e))?;
        log::debug!(
            "batch evaluator ready with {} threads",
            pool.current_num_threads()
        );
        Ok(Self {
            pool,
            engine: config.engine.clone(),
        })
    }

    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Evaluates every request in parallel. Results keep request order.
    pub fn run_batch(&self, requests: &[DecisionRequest]) -> Vec<DecisionResult> {
        let config = &self.engine;
        self.pool.install(|| {
            requests
                .par_iter()
                .enumerate()
                .map(|(i, req)| evaluate_single(i, req, config))
                .collect()
        })
    }
}

/// Convenience: run a batch without constructing a BatchEvaluator.
/// Uses rayon's global thread pool.
pub fn evaluate_batch_simple(
    requests: &[DecisionRequest],
    config: &EngineConfig,
) -> Vec<DecisionResult> {
    requests
        .par_iter()
        .enumerate()
        .map(|(i, req)| evaluate_single(i, req, config))
        .collect()
}
