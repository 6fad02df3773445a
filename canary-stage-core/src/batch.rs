//! Batch runner: walks the manifest in order and isolates failures per row.
//!
//! Rows run strictly one after another. Out-of-scope rows are skipped without
//! a log line and without any factory call. An error escaping the row pipeline
//! is logged with `severity = "critical"` and the batch moves on.

use tracing::{error, info, info_span, Instrument};

use crate::contract::{ObjectUploader, TokenFactory};
use crate::manifest::ManifestRow;
use crate::pipeline::{process_row, RowOutcome};
use crate::scope::is_in_scope;

/// Tally of one run. Purely informational.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub staged: usize,
    pub rejected: usize,
    pub upload_failed: usize,
    pub errored: usize,
    pub skipped: usize,
}

impl BatchReport {
    pub fn processed(&self) -> usize {
        self.staged + self.rejected + self.upload_failed + self.errored
    }

    fn record(&mut self, outcome: &RowOutcome) {
        match outcome {
            RowOutcome::Staged { .. } => self.staged += 1,
            RowOutcome::Rejected { .. } => self.rejected += 1,
            RowOutcome::UploadFailed { .. } => self.upload_failed += 1,
        }
    }
}

pub async fn run_batch<I, F, U>(rows: I, factory: &F, uploader: &U) -> BatchReport
where
    I: IntoIterator<Item = ManifestRow>,
    F: TokenFactory + ?Sized,
    U: ObjectUploader + ?Sized,
{
    let mut report = BatchReport::default();

    for (index, row) in rows.into_iter().enumerate() {
        if !is_in_scope(row.in_scope.as_deref()) {
            report.skipped += 1;
            continue;
        }

        // 1-based position among data rows, header excluded.
        let row_number = index + 1;
        let key = row.object_key();
        let span = info_span!(
            "row",
            row = row_number,
            domain = %row.canary_domain,
            bucket = %row.bucket_name,
            key = %key,
        );

        match process_row(&row, factory, uploader).instrument(span.clone()).await {
            Ok(outcome) => {
                span.in_scope(|| info!(outcome = ?outcome, "[BATCH] Row finished"));
                report.record(&outcome);
            }
            Err(e) => {
                span.in_scope(|| {
                    error!(
                        severity = "critical",
                        error = %e,
                        flock_id = %row.flock_id,
                        kind = %row.token_type,
                        "[BATCH] Unexpected failure processing row, continuing with next row"
                    )
                });
                report.errored += 1;
            }
        }
    }

    report
}
