use std::fmt;

use serde::Serialize;

/// Why a file was not processed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The name already carries the processed-file suffix marker.
    AlreadyProcessed,
    /// The extension is not one padmark writes.
    UnsupportedExtension,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyProcessed => f.write_str("already processed"),
            Self::UnsupportedExtension => f.write_str("unsupported extension"),
        }
    }
}

/// Result of running the pipeline on one input file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// Exactly one output file was written.
    Processed {
        /// File name of the written output.
        output_name: String,
        /// Whether the watermark made it into the output.
        watermarked: bool,
        /// Whether the source file was removed afterwards.
        original_deleted: bool,
        /// Why a configured watermark was not applied.
        #[serde(skip_serializing_if = "Option::is_none")]
        watermark_fallback: Option<String>,
        /// Why removing the source failed; the file still counts as processed.
        #[serde(skip_serializing_if = "Option::is_none")]
        delete_error: Option<String>,
    },
    /// The file was deliberately left alone.
    Skipped {
        /// Skip cause.
        reason: SkipReason,
    },
    /// Decoding, transforming, encoding or writing failed.
    Failed {
        /// Human-readable description.
        error: String,
    },
}

impl FileOutcome {
    /// Build a [`FileOutcome::Skipped`].
    pub fn skipped(reason: SkipReason) -> Self {
        Self::Skipped { reason }
    }

    /// Build a [`FileOutcome::Failed`].
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }

    /// Whether this outcome is a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// A [`FileOutcome`] tagged with the input file it belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// Input file name (no directory).
    pub file_name: String,
    /// What happened to it.
    #[serde(flatten)]
    pub outcome: FileOutcome,
}
