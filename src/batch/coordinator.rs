use std::{path::Path, sync::mpsc};

use anyhow::Context as _;
use rayon::prelude::*;
use serde::Serialize;

use crate::{
    batch::{
        discover::discover,
        sink::{BatchPlan, OutcomeSink},
    },
    foundation::{
        config::{ProcessingConfig, WatermarkSpec},
        error::{PadmarkError, PadmarkResult},
    },
    pipeline::{
        file::process_file,
        outcome::{FileOutcome, FileReport, SkipReason},
    },
};

/// Totals for a finished batch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Files that produced an output.
    pub processed: usize,
    /// Files deliberately left alone.
    pub skipped: usize,
    /// Files whose processing failed.
    pub failed: usize,
    /// Directory entries that were not supported images.
    pub ignored: usize,
    /// Pipeline invocations dispatched to the worker pool.
    pub dispatched: usize,
    /// Sources removed after processing.
    pub originals_deleted: usize,
    /// Sources that could not be removed.
    pub delete_failures: usize,
    /// Processed files where the configured watermark was not applied.
    pub watermark_fallbacks: usize,
}

impl BatchSummary {
    /// Whether any file failed.
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    fn absorb(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Processed {
                original_deleted,
                watermark_fallback,
                delete_error,
                ..
            } => {
                self.processed += 1;
                self.originals_deleted += usize::from(*original_deleted);
                self.delete_failures += usize::from(delete_error.is_some());
                self.watermark_fallbacks += usize::from(watermark_fallback.is_some());
            }
            FileOutcome::Skipped { .. } => self.skipped += 1,
            FileOutcome::Failed { .. } => self.failed += 1,
        }
    }
}

/// Verify everything that must hold before any file is touched.
///
/// Checks option ranges, that the input directory exists and that an explicitly configured
/// watermark file exists. The watermark is not decoded here.
pub fn check_preconditions(
    config: &ProcessingConfig,
    watermark: Option<&WatermarkSpec>,
) -> PadmarkResult<()> {
    config.validate()?;
    if let Some(spec) = watermark {
        spec.validate()?;
    }
    if !config.input_dir.is_dir() {
        return Err(PadmarkError::precondition(format!(
            "folder not found at '{}'",
            config.input_dir.display()
        )));
    }
    if let Some(spec) = watermark
        && !spec.path.is_file()
    {
        return Err(PadmarkError::precondition(format!(
            "watermark image not found at '{}'",
            spec.path.display()
        )));
    }
    Ok(())
}

/// Process every eligible image in `config.input_dir` on a worker pool.
///
/// Fatal configuration problems are returned as errors before anything is written. Per-file
/// problems never abort the batch; they are reported to `sink` and counted in the summary.
/// Once `sink.begin` succeeded, sink write errors are logged and the summary is still returned.
#[tracing::instrument(skip_all, fields(input = %config.input_dir.display()))]
pub fn run_batch(
    config: &ProcessingConfig,
    watermark: Option<&WatermarkSpec>,
    sink: &mut dyn OutcomeSink,
) -> PadmarkResult<BatchSummary> {
    check_preconditions(config, watermark)?;

    let output_dir = config.output_dir().to_path_buf();
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("create output directory '{}'", output_dir.display()))?;

    let found = discover(&config.input_dir)?;
    let workers = config.workers();
    let pool = build_thread_pool(workers)?;
    tracing::info!(
        entries = found.total(),
        candidates = found.candidates.len(),
        already_processed = found.already_processed.len(),
        ignored = found.ignored,
        workers,
        "dispatching batch"
    );

    let plan = BatchPlan {
        input_dir: config.input_dir.clone(),
        output_dir: output_dir.clone(),
        watermark: watermark.map(|w| w.path.clone()),
        delete_originals: config.delete_originals,
        workers,
        candidates: found.candidates.len(),
        already_processed: found.already_processed.len(),
        ignored: found.ignored,
    };
    sink.begin(&plan)?;

    let mut summary = std::thread::scope(|scope| -> PadmarkResult<BatchSummary> {
        let (tx, rx) = mpsc::sync_channel::<FileReport>(workers.saturating_mul(2).max(1));
        let sink_ref: &mut dyn OutcomeSink = sink;

        // Reporter: forwards outcomes in completion order. A sink that stops accepting lines
        // does not stop the batch.
        let reporter = scope.spawn(move || -> BatchSummary {
            let mut summary = BatchSummary::default();
            for report in rx {
                summary.absorb(&report.outcome);
                if let Err(e) = sink_ref.record(&report) {
                    tracing::warn!(
                        error = %e,
                        file = %report.file_name,
                        "could not report outcome"
                    );
                }
            }
            summary
        });

        for path in &found.already_processed {
            let report = FileReport {
                file_name: file_name_of(path),
                outcome: FileOutcome::skipped(SkipReason::AlreadyProcessed),
            };
            if tx.send(report).is_err() {
                break;
            }
        }

        pool.install(|| {
            found
                .candidates
                .par_iter()
                .for_each_with(tx.clone(), |tx, path| {
                    let outcome = process_file(path, config, watermark, &output_dir);
                    let report = FileReport {
                        file_name: file_name_of(path),
                        outcome,
                    };
                    // A closed channel means the reporter is gone; keep processing regardless.
                    let _ = tx.send(report);
                });
        });
        drop(tx);

        reporter
            .join()
            .map_err(|_| PadmarkError::Other(anyhow::anyhow!("reporter thread panicked")))
    })?;

    summary.ignored = found.ignored;
    summary.dispatched = found.candidates.len();
    if let Err(e) = sink.end(&summary) {
        tracing::warn!(error = %e, "could not report batch summary");
    }
    Ok(summary)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn build_thread_pool(threads: usize) -> PadmarkResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(PadmarkError::validation("worker count must be >= 1"));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("padmark-worker-{i}"))
        .build()
        .map_err(|e| PadmarkError::Other(anyhow::anyhow!("failed to build worker pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/batch/coordinator.rs"]
mod tests;
