use std::{io::Write, path::PathBuf};

use anyhow::Context as _;
use serde::Serialize;

use crate::{
    batch::coordinator::BatchSummary,
    foundation::error::PadmarkResult,
    pipeline::outcome::{FileOutcome, FileReport},
};

/// What a batch run is about to do, handed to [`OutcomeSink::begin`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BatchPlan {
    /// Directory being scanned.
    pub input_dir: PathBuf,
    /// Directory receiving outputs.
    pub output_dir: PathBuf,
    /// Watermark source, if configured.
    pub watermark: Option<PathBuf>,
    /// Whether sources are removed after processing.
    pub delete_originals: bool,
    /// Worker pool size.
    pub workers: usize,
    /// Files that will be dispatched.
    pub candidates: usize,
    /// Files skipped because they carry the suffix marker.
    pub already_processed: usize,
    /// Directory entries that are not supported images.
    pub ignored: usize,
}

/// Receiver of batch progress.
///
/// `record` is called once per candidate and per skipped file, in completion order, from a
/// single reporting thread.
pub trait OutcomeSink: Send {
    /// Called once before any file is reported.
    fn begin(&mut self, plan: &BatchPlan) -> PadmarkResult<()>;
    /// Report one finished file.
    fn record(&mut self, report: &FileReport) -> PadmarkResult<()>;
    /// Called once after the last file was reported.
    fn end(&mut self, summary: &BatchSummary) -> PadmarkResult<()>;
}

/// In-memory sink for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemorySink {
    plan: Option<BatchPlan>,
    reports: Vec<FileReport>,
    summary: Option<BatchSummary>,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan captured in `begin`, if any.
    pub fn plan(&self) -> Option<&BatchPlan> {
        self.plan.as_ref()
    }

    /// Reports in arrival order.
    pub fn reports(&self) -> &[FileReport] {
        &self.reports
    }

    /// Summary captured in `end`, if any.
    pub fn summary(&self) -> Option<&BatchSummary> {
        self.summary.as_ref()
    }

    /// Outcome reported for `file_name`, if any.
    pub fn outcome_for(&self, file_name: &str) -> Option<&FileOutcome> {
        self.reports
            .iter()
            .find(|r| r.file_name == file_name)
            .map(|r| &r.outcome)
    }
}

impl OutcomeSink for InMemorySink {
    fn begin(&mut self, plan: &BatchPlan) -> PadmarkResult<()> {
        self.plan = Some(plan.clone());
        self.reports.clear();
        self.summary = None;
        Ok(())
    }

    fn record(&mut self, report: &FileReport) -> PadmarkResult<()> {
        self.reports.push(report.clone());
        Ok(())
    }

    fn end(&mut self, summary: &BatchSummary) -> PadmarkResult<()> {
        self.summary = Some(summary.clone());
        Ok(())
    }
}

/// Human-readable status lines, one per file plus a summary.
#[derive(Debug)]
pub struct ConsoleSink<W> {
    out: W,
}

impl<W: Write + Send> ConsoleSink<W> {
    /// Write status lines to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> OutcomeSink for ConsoleSink<W> {
    fn begin(&mut self, plan: &BatchPlan) -> PadmarkResult<()> {
        let out = &mut self.out;
        writeln!(out, "Scanning folder: {}", plan.input_dir.display())
            .context("write status line")?;
        if plan.output_dir != plan.input_dir {
            writeln!(out, "Writing to: {}", plan.output_dir.display())
                .context("write status line")?;
        }
        if let Some(wm) = &plan.watermark {
            writeln!(out, "Using watermark: {}", wm.display()).context("write status line")?;
        }
        if plan.delete_originals {
            writeln!(
                out,
                "WARNING: Original files will be deleted after processing."
            )
            .context("write status line")?;
        }
        Ok(())
    }

    fn record(&mut self, report: &FileReport) -> PadmarkResult<()> {
        let out = &mut self.out;
        let name = &report.file_name;
        match &report.outcome {
            FileOutcome::Processed {
                output_name,
                watermarked,
                original_deleted,
                watermark_fallback,
                delete_error,
            } => {
                let action = if *watermarked {
                    "Bordered & Watermarked"
                } else {
                    "Bordered"
                };
                writeln!(
                    out,
                    "Processed '{name}' -> Saved as '{output_name}' ({action})"
                )
                .context("write status line")?;
                if let Some(reason) = watermark_fallback {
                    writeln!(out, "  -> WARNING: watermark not applied. Reason: {reason}")
                        .context("write status line")?;
                }
                if *original_deleted {
                    writeln!(out, "  -> Removed original: '{name}'")
                        .context("write status line")?;
                }
                if let Some(e) = delete_error {
                    writeln!(
                        out,
                        "  -> ERROR: Could not remove original '{name}'. Reason: {e}"
                    )
                    .context("write status line")?;
                }
            }
            FileOutcome::Skipped { reason } => {
                writeln!(out, "Skipped '{name}' ({reason})").context("write status line")?;
            }
            FileOutcome::Failed { error } => {
                writeln!(out, "Could not process file '{name}'. Reason: {error}")
                    .context("write status line")?;
            }
        }
        Ok(())
    }

    fn end(&mut self, summary: &BatchSummary) -> PadmarkResult<()> {
        writeln!(
            self.out,
            "\nProcessing complete: {} processed, {} skipped, {} failed.",
            summary.processed, summary.skipped, summary.failed
        )
        .context("write status line")?;
        self.out.flush().context("flush status output")?;
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum JsonEvent<'a> {
    Begin(&'a BatchPlan),
    File(&'a FileReport),
    Summary(&'a BatchSummary),
}

/// Machine-readable sink: one JSON object per line.
#[derive(Debug)]
pub struct JsonLinesSink<W> {
    out: W,
}

impl<W: Write + Send> JsonLinesSink<W> {
    /// Write JSON lines to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, event: JsonEvent<'_>) -> PadmarkResult<()> {
        serde_json::to_writer(&mut self.out, &event).context("serialize json event")?;
        self.out.write_all(b"\n").context("write json event")?;
        Ok(())
    }
}

impl<W: Write + Send> OutcomeSink for JsonLinesSink<W> {
    fn begin(&mut self, plan: &BatchPlan) -> PadmarkResult<()> {
        self.emit(JsonEvent::Begin(plan))
    }

    fn record(&mut self, report: &FileReport) -> PadmarkResult<()> {
        self.emit(JsonEvent::File(report))
    }

    fn end(&mut self, summary: &BatchSummary) -> PadmarkResult<()> {
        self.emit(JsonEvent::Summary(summary))?;
        self.out.flush().context("flush json output")?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/batch/sink.rs"]
mod tests;
