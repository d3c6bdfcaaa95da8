//! # Trace Loading Tests

use std::io::{Cursor, Write as _};

use cachesim_core::sim::{load_trace, parse_trace};
use cachesim_core::{AccessRecord, SimError};
use tempfile::NamedTempFile;

use crate::common::builder::TraceBuilder;

#[test]
fn parses_records_in_order() {
    let text = "2 400\n0 1000\n1 1004\n";
    let records = parse_trace(Cursor::new(text)).unwrap();
    assert_eq!(
        records,
        vec![
            AccessRecord::fetch(0x400),
            AccessRecord::read(0x1000),
            AccessRecord::write(0x1004),
        ]
    );
}

#[test]
fn skips_blank_lines() {
    let text = "\n0 10\n   \n\n1 20\n";
    assert_eq!(parse_trace(Cursor::new(text)).unwrap().len(), 2);
}

#[test]
fn empty_input_is_empty_trace() {
    assert!(parse_trace(Cursor::new("")).unwrap().is_empty());
}

#[test]
fn invalid_kind_stops_loading() {
    let text = "0 10\n7 20\n0 30\n";
    assert!(matches!(
        parse_trace(Cursor::new(text)),
        Err(SimError::InvalidAccessKind(7))
    ));
}

#[test]
fn malformed_line_reports_physical_line_number() {
    // Line 4, counting the blank line.
    let text = "0 10\n\n1 20\n0 zz\n";
    match parse_trace(Cursor::new(text)) {
        Err(SimError::TraceParse { line, reason }) => {
            assert_eq!(line, 4);
            assert!(reason.contains("zz"), "{reason}");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn loads_trace_file() {
    let trace = TraceBuilder::new()
        .fetches([0x400, 0x404])
        .write(0x8000)
        .reads([0x8000, 0xFFFF_FFF0]);
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(trace.to_text().as_bytes()).unwrap();

    let loaded = load_trace(file.path()).unwrap();
    assert_eq!(loaded, trace.build());
}

#[test]
fn missing_file_is_io_error_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.trace");
    match load_trace(&path) {
        Err(SimError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("unexpected result: {other:?}"),
    }
}
