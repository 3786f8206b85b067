//! Re-issue many documents, sequentially or on a fixed number of threads.

use std::thread;

use thiserror::Error;
use tracing::{info, warn};

use super::pipeline::{Reissued, Reissuer};
use crate::core::{FragmentStream, ReissueError};

/// What to do when a document fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Log the failure, record it in the report, continue.
    #[default]
    Skip,
    /// Stop at the first failure in input order.
    Abort,
}

/// A named fragment stream.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub stream: FragmentStream,
}

impl Document {
    pub fn new(name: impl Into<String>, stream: FragmentStream) -> Self {
        Self {
            name: name.into(),
            stream,
        }
    }
}

/// Per-document results, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub reissued: Vec<(String, Reissued)>,
    pub failed: Vec<(String, ReissueError)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.reissued.len() + self.failed.len()
    }
}

/// Returned under [`FailurePolicy::Abort`].
#[derive(Debug, Error)]
#[error("re-issue aborted at '{document}': {source}")]
pub struct BatchAbort {
    pub document: String,
    #[source]
    pub source: ReissueError,
    /// Documents before the failing one that succeeded.
    pub completed: Vec<(String, Reissued)>,
}

/// Drives a [`Reissuer`] over a list of documents.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    reissuer: Reissuer,
    policy: FailurePolicy,
}

impl Batch {
    pub fn new(reissuer: Reissuer, policy: FailurePolicy) -> Self {
        Self { reissuer, policy }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Process documents one after the other.
    pub fn run(&self, documents: &[Document]) -> Result<BatchReport, BatchAbort> {
        let results = documents
            .iter()
            .map(|doc| self.reissuer.reissue(&doc.stream));
        self.collect(documents, results)
    }

    /// Process documents on up to `workers` threads.
    ///
    /// Each thread gets its own clone of the reissuer and a contiguous chunk
    /// of the input. The report keeps input order. Under
    /// [`FailurePolicy::Abort`] all documents are still processed; the error
    /// names the first failure in input order.
    pub fn run_parallel(
        &self,
        documents: &[Document],
        workers: usize,
    ) -> Result<BatchReport, BatchAbort> {
        let workers = workers.clamp(1, documents.len().max(1));
        if workers == 1 {
            return self.run(documents);
        }
        let chunk_size = documents.len().div_ceil(workers);

        let results: Vec<Result<Reissued, ReissueError>> = thread::scope(|scope| {
            let handles: Vec<_> = documents
                .chunks(chunk_size)
                .map(|chunk| {
                    let reissuer = self.reissuer.clone();
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|doc| reissuer.reissue(&doc.stream))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|handle| match handle.join() {
                    Ok(chunk) => chunk,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        });

        self.collect(documents, results)
    }

    fn collect(
        &self,
        documents: &[Document],
        results: impl IntoIterator<Item = Result<Reissued, ReissueError>>,
    ) -> Result<BatchReport, BatchAbort> {
        let mut report = BatchReport::default();
        for (doc, result) in documents.iter().zip(results) {
            match result {
                Ok(reissued) => report.reissued.push((doc.name.clone(), reissued)),
                Err(source) if self.policy == FailurePolicy::Abort => {
                    warn!(document = %doc.name, error = %source, "aborting batch");
                    return Err(BatchAbort {
                        document: doc.name.clone(),
                        source,
                        completed: report.reissued,
                    });
                }
                Err(e) => {
                    warn!(document = %doc.name, error = %e, "skipping document");
                    report.failed.push((doc.name.clone(), e));
                }
            }
        }
        info!(
            reissued = report.reissued.len(),
            failed = report.failed.len(),
            "batch complete"
        );
        Ok(report)
    }
}
