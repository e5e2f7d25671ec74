use super::*;

fn plan() -> BatchPlan {
    BatchPlan {
        input_dir: PathBuf::from("/in"),
        output_dir: PathBuf::from("/in"),
        watermark: None,
        delete_originals: true,
        workers: 2,
        candidates: 1,
        already_processed: 0,
        ignored: 0,
    }
}

fn processed(watermarked: bool) -> FileReport {
    FileReport {
        file_name: "a.png".to_owned(),
        outcome: FileOutcome::Processed {
            output_name: "a_1x1.png".to_owned(),
            watermarked,
            original_deleted: true,
            watermark_fallback: None,
            delete_error: None,
        },
    }
}

#[test]
fn console_sink_prints_status_lines() {
    let mut sink = ConsoleSink::new(Vec::new());
    sink.begin(&plan()).unwrap();
    sink.record(&processed(true)).unwrap();
    sink.record(&FileReport {
        file_name: "b_1x1.png".to_owned(),
        outcome: FileOutcome::skipped(crate::SkipReason::AlreadyProcessed),
    })
    .unwrap();
    sink.record(&FileReport {
        file_name: "c.jpg".to_owned(),
        outcome: FileOutcome::failed("decode error: bad"),
    })
    .unwrap();
    sink.end(&BatchSummary {
        processed: 1,
        skipped: 1,
        failed: 1,
        ..BatchSummary::default()
    })
    .unwrap();

    let text = String::from_utf8(sink.into_inner()).unwrap();
    assert!(text.contains("Scanning folder: /in"));
    assert!(text.contains("WARNING: Original files will be deleted"));
    assert!(text.contains("Processed 'a.png' -> Saved as 'a_1x1.png' (Bordered & Watermarked)"));
    assert!(text.contains("  -> Removed original: 'a.png'"));
    assert!(text.contains("Skipped 'b_1x1.png' (already processed)"));
    assert!(text.contains("Could not process file 'c.jpg'. Reason: decode error: bad"));
    assert!(text.contains("1 processed, 1 skipped, 1 failed"));
}

#[test]
fn json_sink_emits_one_object_per_line() {
    let mut sink = JsonLinesSink::new(Vec::new());
    sink.begin(&plan()).unwrap();
    sink.record(&processed(false)).unwrap();
    sink.end(&BatchSummary::default()).unwrap();

    let text = String::from_utf8(sink.into_inner()).unwrap();
    let lines: Vec<serde_json::Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["event"], "begin");
    assert_eq!(lines[1]["event"], "file");
    assert_eq!(lines[1]["status"], "processed");
    assert_eq!(lines[1]["file_name"], "a.png");
    assert_eq!(lines[1]["output_name"], "a_1x1.png");
    assert!(lines[1].get("delete_error").is_none());
    assert_eq!(lines[2]["event"], "summary");
    assert_eq!(lines[2]["failed"], 0);
}

#[test]
fn in_memory_sink_captures_everything() {
    let mut sink = InMemorySink::new();
    sink.begin(&plan()).unwrap();
    sink.record(&processed(false)).unwrap();
    sink.end(&BatchSummary::default()).unwrap();

    assert_eq!(sink.plan(), Some(&plan()));
    assert_eq!(sink.reports().len(), 1);
    assert!(matches!(
        sink.outcome_for("a.png"),
        Some(FileOutcome::Processed { .. })
    ));
    assert!(sink.outcome_for("zzz.png").is_none());
    assert!(sink.summary().is_some());
}
