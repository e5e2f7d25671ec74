use image::{Rgb, RgbImage};

use super::*;
use crate::batch::sink::InMemorySink;

fn write_rgb(path: &Path, w: u32, h: u32) {
    RgbImage::from_pixel(w, h, Rgb([40, 80, 120])).save(path).unwrap();
}

#[test]
fn summary_absorbs_each_outcome_kind() {
    let mut s = BatchSummary::default();
    s.absorb(&FileOutcome::Processed {
        output_name: "a_1x1.png".into(),
        watermarked: false,
        original_deleted: true,
        watermark_fallback: Some("bad logo".into()),
        delete_error: None,
    });
    s.absorb(&FileOutcome::Processed {
        output_name: "b_1x1.png".into(),
        watermarked: true,
        original_deleted: false,
        watermark_fallback: None,
        delete_error: Some("denied".into()),
    });
    s.absorb(&FileOutcome::skipped(SkipReason::AlreadyProcessed));
    s.absorb(&FileOutcome::failed("x"));

    assert_eq!(s.processed, 2);
    assert_eq!(s.skipped, 1);
    assert_eq!(s.failed, 1);
    assert_eq!(s.originals_deleted, 1);
    assert_eq!(s.delete_failures, 1);
    assert_eq!(s.watermark_fallbacks, 1);
    assert!(s.has_failures());
}

#[test]
fn missing_input_dir_is_fatal_and_touches_nothing() {
    let root = tempfile::tempdir().unwrap();
    let mut cfg = ProcessingConfig::new(root.path().join("absent"));
    cfg.output_dir = Some(root.path().join("out"));

    let mut sink = InMemorySink::new();
    let err = run_batch(&cfg, None, &mut sink).unwrap_err();
    assert!(matches!(err, PadmarkError::Precondition(_)), "{err}");
    assert!(!root.path().join("out").exists());
    assert!(sink.plan().is_none());
}

#[test]
fn missing_watermark_is_fatal_before_dispatch() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("a.png");
    write_rgb(&input, 3, 2);

    let cfg = ProcessingConfig::new(dir.path());
    let spec = WatermarkSpec::new(dir.path().join("nope.png"));
    let mut sink = InMemorySink::new();
    let err = run_batch(&cfg, Some(&spec), &mut sink).unwrap_err();

    assert!(err.is_fatal());
    assert!(!dir.path().join("a_1x1.png").exists());
}

#[test]
fn invalid_options_are_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = ProcessingConfig::new(dir.path());
    cfg.jpeg_quality = 0;
    assert!(matches!(
        check_preconditions(&cfg, None),
        Err(PadmarkError::Validation(_))
    ));

    let cfg = ProcessingConfig::new(dir.path());
    let logo = dir.path().join("logo.png");
    write_rgb(&logo, 1, 1);
    let mut spec = WatermarkSpec::new(&logo);
    spec.opacity = 2.0;
    assert!(check_preconditions(&cfg, Some(&spec)).is_err());
}

#[test]
fn dispatches_candidates_and_reports_marker_skips() {
    let dir = tempfile::tempdir().unwrap();
    write_rgb(&dir.path().join("a.png"), 4, 2);
    write_rgb(&dir.path().join("b.jpg"), 2, 4);
    write_rgb(&dir.path().join("c_1x1.png"), 2, 2);
    std::fs::write(dir.path().join("readme.md"), b"hi").unwrap();

    let mut cfg = ProcessingConfig::new(dir.path());
    cfg.worker_count = Some(1);
    let mut sink = InMemorySink::new();
    let summary = run_batch(&cfg, None, &mut sink).unwrap();

    assert_eq!(summary.dispatched, 2);
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.ignored, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(sink.reports().len(), 3);
    assert_eq!(sink.summary(), Some(&summary));
    assert_eq!(sink.plan().unwrap().candidates, 2);
    assert_eq!(
        sink.outcome_for("c_1x1.png"),
        Some(&FileOutcome::skipped(SkipReason::AlreadyProcessed))
    );
}

struct ClosedPipeSink {
    records: usize,
}

impl OutcomeSink for ClosedPipeSink {
    fn begin(&mut self, _plan: &BatchPlan) -> PadmarkResult<()> {
        Ok(())
    }

    fn record(&mut self, _report: &FileReport) -> PadmarkResult<()> {
        self.records += 1;
        Err(PadmarkError::Other(anyhow::anyhow!("broken pipe")))
    }

    fn end(&mut self, _summary: &BatchSummary) -> PadmarkResult<()> {
        Err(PadmarkError::Other(anyhow::anyhow!("broken pipe")))
    }
}

#[test]
fn sink_write_errors_do_not_fail_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    write_rgb(&dir.path().join("a.png"), 4, 2);
    write_rgb(&dir.path().join("b.png"), 2, 4);
    write_rgb(&dir.path().join("c_1x1.png"), 2, 2);

    let mut sink = ClosedPipeSink { records: 0 };
    let summary = run_batch(&ProcessingConfig::new(dir.path()), None, &mut sink).unwrap();

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(sink.records, 3);
    assert!(dir.path().join("a_1x1.png").exists());
    assert!(dir.path().join("b_1x1.png").exists());
}
