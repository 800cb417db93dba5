//! Parallel fetch of every source followed by a barrier.
//!
//! One tokio task per source, no concurrency limit: the source list is
//! small and fixed by configuration. [`Coordinator::collect`] only returns
//! once every task has finished, successfully or not.

use std::fmt;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::aggregator::{Aggregator, AllowBuckets};
use crate::config::{Family, Source};
use crate::fetcher::Fetcher;
use crate::utils::format_count;

/// What happened to one source during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOutcome {
    pub url: String,
    pub family: Family,
    /// Line count on success, error description on failure
    pub result: Result<usize, String>,
}

impl SourceOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

impl fmt::Display for SourceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(count) => write!(f, "{} ({}): {} ranges", self.url, self.family, count),
            Err(e) => write!(f, "{} ({}): FAILED - {}", self.url, self.family, e),
        }
    }
}

/// Result of a completed fetch round
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub buckets: AllowBuckets,
    /// One entry per source, in configured order
    pub outcomes: Vec<SourceOutcome>,
}

impl Collection {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Launches one fetch per source and merges the results
pub struct Coordinator {
    sources: Vec<Source>,
    fetcher: Arc<Fetcher>,
}

impl Coordinator {
    pub fn new(sources: Vec<Source>, fetcher: Fetcher) -> Self {
        Self {
            sources,
            fetcher: Arc::new(fetcher),
        }
    }

    /// Fetch every source in parallel and wait for all of them.
    ///
    /// Failed sources contribute nothing and are reported in the outcomes.
    /// If every source fails the buckets are simply empty.
    pub async fn collect(&self) -> Collection {
        let aggregator = Arc::new(Aggregator::new());
        let mut tasks = JoinSet::new();

        for (index, source) in self.sources.iter().cloned().enumerate() {
            let fetcher = Arc::clone(&self.fetcher);
            let aggregator = Arc::clone(&aggregator);

            tasks.spawn(async move {
                // The fetch runs outside the lock, only contribute() is serialized
                let result = match fetcher.fetch(&source).await {
                    Ok(batch) => {
                        let count = batch.len();
                        aggregator.contribute(source.family, batch);
                        Ok(count)
                    }
                    Err(e) => {
                        warn!("Skipping {}: {:#}", source.url, e);
                        Err(format!("{:#}", e))
                    }
                };
                (index, result)
            });
        }

        // Barrier: nothing is written until every fetch has settled
        let mut results: Vec<Option<Result<usize, String>>> = vec![None; self.sources.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = Some(result),
                Err(e) => error!("Fetch task failed: {}", e),
            }
        }

        let outcomes: Vec<SourceOutcome> = self
            .sources
            .iter()
            .zip(results)
            .map(|(source, result)| SourceOutcome {
                url: source.url.clone(),
                family: source.family,
                result: result.unwrap_or_else(|| Err("fetch task aborted".to_string())),
            })
            .collect();

        let collection = Collection {
            buckets: aggregator.take(),
            outcomes,
        };

        if !self.sources.is_empty() && collection.succeeded() == 0 {
            error!("All sources failed, output will only contain the user defined list");
        } else if !self.sources.is_empty() && collection.buckets.is_empty() {
            warn!("Sources returned no ranges, output will only contain the user defined list");
        } else {
            info!(
                "Collected {} ranges ({} IPv4, {} IPv6) from {}/{} sources",
                format_count(collection.buckets.total()),
                format_count(collection.buckets.ipv4.len()),
                format_count(collection.buckets.ipv6.len()),
                collection.succeeded(),
                collection.outcomes.len()
            );
        }

        collection
    }
}
