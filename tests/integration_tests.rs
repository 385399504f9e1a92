//! Integration tests for loghq
//!
//! These tests verify:
//! - Encoder output through the public logger API
//! - Odd key/value lists and escaping
//! - Multi-handler fan-out and error reporting
//! - File rotation, compression and retention
//! - Derived loggers and contexts
//! - Caller resolution through helper functions

use loghq::prelude::*;
use loghq::sinks::{list_backups, prune_backups};
use loghq::Record;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

type Output = Arc<LockedWriter<Vec<u8>>>;

fn output() -> Output {
    Arc::new(LockedWriter::new(Vec::new()))
}

fn text(out: &Output) -> String {
    String::from_utf8(out.lock().clone()).expect("utf-8 output")
}

fn json_lines(out: &Output) -> Vec<serde_json::Value> {
    text(out)
        .lines()
        .map(|line| serde_json::from_str(line).expect("valid JSON line"))
        .collect()
}

#[test]
fn test_json_request_line() {
    let out = output();
    let logger = Logger::builder().handler(JsonHandler::new(out.clone())).build();

    logger.info("request", &["method".into(), "GET".into(), "status".into(), 200.into()]);

    let line = text(&out);
    assert!(line.contains(r#""level":"INFO""#), "{}", line);
    assert!(line.contains(r#""msg":"request""#), "{}", line);
    assert!(line.contains(r#""method":"GET","status":200"#), "{}", line);
    assert!(line.ends_with("}\n"));

    let value = &json_lines(&out)[0];
    assert_eq!(value["method"], "GET");
    assert_eq!(value["status"], 200);
    assert!(value["caller"]
        .as_str()
        .is_some_and(|c| c.contains("integration_tests.rs:")));
}

#[test]
fn test_orphan_key_logfmt_and_json() {
    let logfmt_out = output();
    let json_out = output();
    let handler = MultiHandler::new(Vec::new())
        .push(LogfmtHandler::new(logfmt_out.clone()))
        .push(JsonHandler::new(json_out.clone()));
    let logger = Logger::builder().handler(handler).add_caller(false).build();

    logger.warn("odd", &["orphan".into()]);

    let logfmt = text(&logfmt_out);
    assert!(logfmt.ends_with(" level=warn msg=odd orphan=MISSING\n"), "{}", logfmt);
    assert!(text(&json_out).contains(r#""orphan":"MISSING""#));
}

#[test]
fn test_console_no_color_has_no_escapes() {
    let out = output();
    let logger = Logger::builder()
        .handler(ConsoleHandler::new().with_sink(out.clone()).no_color())
        .build();

    logger.warn("disk almost full", &["free".into(), "2GB".into()]);

    let line = text(&out);
    assert!(!line.as_bytes().contains(&0x1b), "{:?}", line);
    assert!(line.contains("WARN"));
    assert!(line.contains("disk almost full"));
    assert!(line.contains("free=2GB"));
}

#[test]
fn test_json_fields_roundtrip_through_parser() {
    let out = output();
    let logger = Logger::builder()
        .handler(JsonHandler::new(out.clone()))
        .add_caller(false)
        .build();

    logger.info("m", &["a".into(), 1.into(), "b".into(), "x".into()]);

    let value = &json_lines(&out)[0];
    let object = value.as_object().expect("object");
    assert_eq!(object["a"], 1);
    assert_eq!(object["b"], "x");
    assert!(!object.contains_key("caller"));
}

#[test]
fn test_json_escapes_hostile_message() {
    let out = output();
    let logger = Logger::builder().handler(JsonHandler::new(out.clone())).build();

    let message = "User login\n{\"level\":\"FATAL\"}\t\u{1}";
    logger.info(message, &["path".into(), "C:\\tmp\\\"x\"".into()]);

    let lines = json_lines(&out);
    assert_eq!(lines.len(), 1, "an injected newline must not split the line");
    assert_eq!(lines[0]["msg"], message);
    assert_eq!(lines[0]["path"], "C:\\tmp\\\"x\"");
}

#[test]
fn test_level_gates_logger_then_handler() {
    let out = output();
    let logger = Logger::builder()
        .level(Level::DEBUG)
        .handler(JsonHandler::new(out.clone()).with_level(Level::WARN))
        .build();

    logger.trace("dropped by logger", &[]);
    logger.info("dropped by handler", &[]);
    logger.error("kept", &[]);
    logger.set_level(Level::FATAL);
    logger.error("dropped after raise", &[]);

    let messages: Vec<String> = json_lines(&out)
        .iter()
        .map(|v| v["msg"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(messages, ["kept"]);
}

#[test]
fn test_stack_attached_at_stack_level() {
    let out = output();
    let logger = Logger::builder()
        .handler(JsonHandler::new(out.clone()))
        .stack_level(Level::ERROR)
        .build();

    logger.warn("no stack", &[]);
    logger.error("with stack", &[]);

    let lines = json_lines(&out);
    assert!(lines[0].get("stack").is_none());
    assert!(lines[1]["stack"].as_str().is_some_and(|s| !s.is_empty()));
}

#[test]
fn test_derived_loggers_and_context() {
    let out = output();
    let root = Logger::builder()
        .level(Level::DEBUG)
        .handler(LogfmtHandler::new(out.clone()))
        .add_caller(false)
        .build();

    let service = root.with_fields([("service", "api")]);
    let context = LogContext::new()
        .with_field("request_id", "r-42")
        .with_field("user", 7);
    let request = service.with_context(&context);

    root.debug("root", &[]);
    service.info("service", &[]);
    request.info("request", &["status".into(), 204.into()]);

    // A derived logger's gate is independent of its parent.
    request.set_level(Level::ERROR);
    request.info("hidden", &[]);
    service.info("visible", &[]);

    let text = text(&out);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4, "{}", text);
    assert!(lines[0].ends_with("msg=root"));
    assert!(lines[1].ends_with("msg=service service=api"));
    assert!(lines[2].ends_with("msg=request service=api request_id=r-42 user=7 status=204"));
    assert!(lines[3].ends_with("msg=visible service=api"));
}

#[test]
fn test_multi_handler_reports_first_error() {
    let good = output();
    let errors = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&errors);

    let failing = JsonHandler::new(BrokenSink).on_error(move |_| {
        seen.fetch_add(1, Ordering::Relaxed);
    });
    let multi = MultiHandler::new(Vec::new())
        .push(failing)
        .push(LogfmtHandler::new(good.clone()));

    let mut record = Record::new(Level::INFO, "fan out");
    record.add_kvs(&["k".into(), "v".into()]);
    let err = multi.handle(&record).expect_err("first handler fails");

    assert!(err.io_error().is_some(), "{:?}", err);
    assert_eq!(errors.load(Ordering::Relaxed), 1);
    assert!(text(&good).contains("msg=\"fan out\" k=v"));
}

struct BrokenSink;

impl Sink for BrokenSink {
    fn write(&self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"))
    }

    fn sync(&self) -> std::io::Result<()> {
        Ok(())
    }
}

// ============================================================================
// File rotation
// ============================================================================

fn line_of(len: usize) -> Vec<u8> {
    let mut line = vec![b'x'; len - 1];
    line.push(b'\n');
    line
}

#[test]
fn test_rotation_boundary() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("app.log");
    let config = FileConfig::new(&path).with_max_size(100);
    let writer = FileWriter::new(config.clone()).expect("Failed to create writer");

    writer.write(&line_of(40)).unwrap();
    writer.write(&line_of(40)).unwrap();
    assert_eq!(writer.size(), 80);
    assert_eq!(writer.rotation_count(), 0);

    // 80 + 20 == 100 still fits.
    writer.write(&line_of(20)).unwrap();
    assert_eq!(writer.rotation_count(), 0);

    // 100 + 1 does not.
    writer.write(&line_of(1)).unwrap();
    assert_eq!(writer.rotation_count(), 1);
    assert_eq!(writer.size(), 1);
    writer.close().unwrap();

    let backups = list_backups(&config);
    assert_eq!(backups.len(), 1);
    assert_eq!(fs::metadata(&backups[0]).unwrap().len(), 100);
    assert_eq!(fs::read(&path).unwrap(), b"\n");

    let name = backups[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("app-") && name.ends_with(".log"), "{}", name);
}

#[test]
fn test_oversized_write_into_empty_file_does_not_rotate() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("big.log");
    let config = FileConfig::new(&path).with_max_size(10);
    let writer = FileWriter::new(config.clone()).expect("Failed to create writer");

    writer.write(&line_of(64)).unwrap();
    assert_eq!(writer.rotation_count(), 0);
    assert_eq!(writer.size(), 64);
    assert!(list_backups(&config).is_empty());
}

#[test]
fn test_rotations_in_same_second_get_unique_names() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("burst.log");
    let config = FileConfig::new(&path).with_max_size(10);
    let writer = FileWriter::new(config.clone()).expect("Failed to create writer");

    for _ in 0..4 {
        writer.write(&line_of(8)).unwrap();
    }
    writer.close().unwrap();

    assert_eq!(writer.rotation_count(), 3);
    assert_eq!(list_backups(&config).len(), 3);
}

#[test]
fn test_compressed_backup_is_readable() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("gz.log");
    let config = FileConfig::new(&path)
        .with_max_size(32)
        .with_compression(true);
    let writer = FileWriter::new(config.clone()).expect("Failed to create writer");

    writer.write(b"first record that fills file\n").unwrap();
    writer.write(b"second\n").unwrap();
    writer.wait_for_maintenance();

    let backups = list_backups(&config);
    assert_eq!(backups.len(), 1, "{:?}", backups);
    assert!(backups[0].to_string_lossy().ends_with(".log.gz"));

    let mut decoded = String::new();
    flate2::read::GzDecoder::new(File::open(&backups[0]).unwrap())
        .read_to_string(&mut decoded)
        .unwrap();
    assert_eq!(decoded, "first record that fills file\n");
}

fn touch_backup(dir: &Path, name: &str, age: Duration) {
    let path = dir.join(name);
    let file = File::create(&path).expect("create backup");
    file.set_modified(SystemTime::now() - age)
        .expect("set mtime");
}

#[test]
fn test_age_retention() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let dir = temp_dir.path();
    let config = FileConfig::new(dir.join("svc.log")).with_max_age(Duration::from_secs(3600));

    touch_backup(dir, "svc-2024-01-01T00-00-00.log", Duration::from_secs(7200));
    touch_backup(dir, "svc-2024-01-01T01-00-00.log.gz", Duration::from_secs(7200));
    touch_backup(dir, "svc-2024-01-01T02-00-00.log", Duration::from_secs(60));
    touch_backup(dir, "unrelated.log", Duration::from_secs(7200));

    assert_eq!(prune_backups(&config), 2);

    let remaining = list_backups(&config);
    assert_eq!(remaining.len(), 1);
    assert!(remaining[0].ends_with("svc-2024-01-01T02-00-00.log"));
    assert!(dir.join("unrelated.log").exists());
}

#[test]
fn test_count_retention_keeps_newest() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let dir = temp_dir.path();
    let config = FileConfig::new(dir.join("svc.log")).with_max_backups(2);

    for name in [
        "svc-2024-03-01T00-00-00.log",
        "svc-2024-03-02T00-00-00.log.gz",
        "svc-2024-03-03T00-00-00.log",
        "svc-2024-03-03T00-00-00_1.log",
    ] {
        touch_backup(dir, name, Duration::ZERO);
    }

    assert_eq!(prune_backups(&config), 2);

    let mut remaining: Vec<String> = list_backups(&config)
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    remaining.sort();
    assert_eq!(
        remaining,
        ["svc-2024-03-03T00-00-00.log", "svc-2024-03-03T00-00-00_1.log"]
    );
}

#[test]
fn test_unlimited_retention_keeps_everything() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let dir = temp_dir.path();
    let config = FileConfig::new(dir.join("svc.log"));

    touch_backup(dir, "svc-2020-01-01T00-00-00.log", Duration::from_secs(86_400 * 365));
    touch_backup(dir, "svc-2020-01-02T00-00-00.log", Duration::ZERO);

    let config = config.with_max_age(Duration::ZERO).with_max_backups(0);
    assert_eq!(prune_backups(&config), 0);
    assert_eq!(list_backups(&config).len(), 2);
}

#[test]
fn test_file_writer_with_json_handler() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("logs").join("app.log");
    let config = FileConfig::new(&path).with_max_size(512).with_max_backups(0);
    let writer = Arc::new(FileWriter::new(config.clone()).expect("Failed to create writer"));

    let logger = Logger::builder()
        .level(Level::DEBUG)
        .handler(JsonHandler::new(writer.clone()))
        .build();

    for i in 0..50 {
        logger.debug("tick", &["i".into(), i.into()]);
    }
    logger.flush().unwrap();
    logger.close().unwrap();
    assert!(writer.rotation_count() > 0);

    let mut seen = Vec::new();
    let mut files = list_backups(&config);
    files.push(path.clone());
    for file in files {
        for line in fs::read_to_string(&file).unwrap().lines() {
            let value: serde_json::Value = serde_json::from_str(line).expect("whole JSON line");
            seen.push(value["i"].as_i64().unwrap());
        }
    }
    seen.sort_unstable();
    assert_eq!(seen, (0..50).collect::<Vec<i64>>());
}

#[test]
fn test_writer_rejects_empty_path() {
    let err = FileWriter::new(FileConfig::new("")).expect_err("empty path");
    assert!(matches!(err, LoggerError::InvalidConfiguration { .. }), "{:?}", err);
}

#[test]
fn test_write_after_close_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let writer = FileWriter::new(FileConfig::new(temp_dir.path().join("c.log"))).unwrap();
    writer.write(b"before\n").unwrap();
    writer.close().unwrap();
    assert!(writer.write(b"after\n").is_err());
}

#[inline(never)]
fn log_via_helper(logger: &Logger) {
    logger.info("from helper", &[]);
}

#[test]
fn test_caller_skip_reports_helper_call_site() {
    let out = output();
    let logger = Logger::builder()
        .handler(JsonHandler::new(out.clone()))
        .caller_skip(1)
        .build();

    let call_line = line!() + 1;
    log_via_helper(&logger);

    let value = &json_lines(&out)[0];
    let caller = value["caller"].as_str().expect("caller present");
    assert!(
        caller.ends_with(&format!("integration_tests.rs:{}", call_line)),
        "{}",
        caller
    );
}
