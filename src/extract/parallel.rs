//! Parallel extraction
//!
//! Scoped worker threads pull entry indexes from a shared counter and send
//! results back over a channel. Results are re-ordered by index before the
//! failure policy is applied, so reporting matches a sequential walk.
//!
//! The source is only read and the output directory is created with
//! `create_dir_all`, so workers share nothing mutable beyond the counter
//! and the lowest failing index.
//!
//! Under `FailFast` a worker re-checks the lowest failing index between
//! reading an entry and writing it, and drops entries above it. An entry
//! whose write began before a lower index failed is still written; that
//! file stays on disk but is not reported.

use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam::channel;

use crate::config::FailurePolicy;
use crate::error::{DtboError, Result};
use crate::source::ByteSource;

use super::{ExtractedEntry, ExtractionReport, Extractor};

/// No failure recorded yet
const NO_FAILURE: u64 = u64::MAX;

pub(super) fn extract<S, F>(extractor: &Extractor<'_, S>, mut on_entry: F) -> Result<ExtractionReport>
where
    S: ByteSource,
    F: FnMut(&ExtractedEntry),
{
    let count = u64::from(extractor.image.entry_count());
    let jobs = extractor.config.jobs.min(count as usize).max(1);
    let fail_fast = extractor.config.on_error == FailurePolicy::FailFast;

    let next = AtomicU64::new(0);
    let lowest_failure = AtomicU64::new(NO_FAILURE);
    let (tx, rx) = channel::unbounded::<(u32, Result<ExtractedEntry>)>();

    tracing::debug!(jobs, "starting extraction workers");

    crossbeam::thread::scope(|scope| {
        for _ in 0..jobs {
            let tx = tx.clone();
            let (next, lowest_failure) = (&next, &lowest_failure);
            scope.spawn(move |_| loop {
                // Indexes are claimed in ascending order, so once anything
                // failed every unclaimed index lies above the failure.
                if fail_fast && lowest_failure.load(Ordering::Acquire) != NO_FAILURE {
                    break;
                }

                let index = next.fetch_add(1, Ordering::AcqRel);
                if index >= count {
                    break;
                }

                // index < count <= u32::MAX
                let result = match extractor.read_entry(index as u32) {
                    Ok(_) if fail_fast && index > lowest_failure.load(Ordering::Acquire) => {
                        break;
                    }
                    Ok((record, payload)) => extractor.store_entry(index as u32, &record, &payload),
                    Err(error) => Err(error),
                };

                if fail_fast && result.is_err() {
                    lowest_failure.fetch_min(index, Ordering::AcqRel);
                }

                if tx.send((index as u32, result)).is_err() {
                    break;
                }
            });
        }
    })
    .map_err(|_| DtboError::WorkerPanicked)?;

    drop(tx);
    let mut results: Vec<_> = rx.into_iter().collect();
    results.sort_unstable_by_key(|(index, _)| *index);

    // Every index below the lowest failure was claimed before it and is
    // never dropped, so the sorted results hold all of them.
    let mut report = ExtractionReport::default();
    for (index, result) in results {
        match result {
            Ok(entry) => {
                on_entry(&entry);
                report.entries.push(entry);
            }
            Err(error) => extractor.record_failure(&mut report, index, error)?,
        }
    }

    Ok(report)
}
