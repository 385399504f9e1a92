//! Property-based tests for loghq using proptest

use loghq::core::{fields_from_kvs, INLINE_FIELDS};
use loghq::prelude::*;
use loghq::{Buffer, Encoder, JsonEncoder, LogfmtEncoder, Record};
use proptest::prelude::*;

fn any_level() -> impl Strategy<Value = Level> {
    prop::sample::select(Level::ALL.to_vec())
}

fn encode<E: Encoder>(encoder: &E, record: &Record) -> String {
    let mut buf = Buffer::new();
    encoder.encode(&mut buf, record);
    String::from_utf8(buf.as_bytes().to_vec()).expect("encoders emit UTF-8")
}

/// Undo logfmt quoting for a value that contains no raw control bytes
/// besides the escaped ones.
fn logfmt_unquote(raw: &str) -> String {
    let Some(inner) = raw.strip_prefix('"').and_then(|r| r.strip_suffix('"')) else {
        return raw.to_string();
    };
    let mut out = String::new();
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

// ============================================================================
// Level Tests
// ============================================================================

proptest! {
    /// Canonical names parse back to the same level
    #[test]
    fn test_level_name_roundtrip(level in any_level()) {
        prop_assert_eq!(Level::parse(&level.to_string()), level);
        prop_assert_eq!(Level::parse(&level.to_string().to_lowercase()), level);
    }

    /// Enabled is exactly numeric comparison
    #[test]
    fn test_level_enabled_matches_order(a in any::<i8>(), b in any::<i8>()) {
        let (a, b) = (Level::from_i8(a), Level::from_i8(b));
        prop_assert_eq!(a.enabled(b), a.as_i8() >= b.as_i8());
        prop_assert_eq!(a.enabled(b), a >= b);
    }

    /// Unknown names fall back to INFO instead of failing
    #[test]
    fn test_level_parse_never_fails(name in "[a-z]{0,12}") {
        let parsed = Level::parse(&name);
        if name.parse::<Level>().is_err() {
            prop_assert_eq!(parsed, Level::INFO);
        }
    }

    /// Out-of-range levels still index the encoder tables
    #[test]
    fn test_clamped_index_in_range(raw in any::<i8>()) {
        prop_assert!(Level::from_i8(raw).clamped_index() < Level::ALL.len());
    }
}

// ============================================================================
// Field Tests
// ============================================================================

proptest! {
    /// Key/value ingestion produces the same fields as the typed constructors
    #[test]
    fn test_kvs_match_typed_constructors(
        s in ".*",
        i in any::<i64>(),
        f in any::<f64>().prop_filter("NaN never compares equal", |f| !f.is_nan()),
        b in any::<bool>(),
    ) {
        let kvs: Vec<Arg> = vec![
            "s".into(), s.clone().into(),
            "i".into(), i.into(),
            "f".into(), f.into(),
            "b".into(), b.into(),
        ];
        prop_assert_eq!(
            fields_from_kvs(&kvs),
            vec![
                Field::string("s", s),
                Field::int("i", i),
                Field::float("f", f),
                Field::bool("b", b),
            ]
        );
    }

    /// An odd-length list ends with the trailing key marked MISSING
    #[test]
    fn test_odd_kvs_mark_missing(pairs in 0usize..6, key in "[a-z]{1,8}") {
        let mut kvs: Vec<Arg> = Vec::new();
        for n in 0..pairs {
            kvs.push(format!("k{}", n).into());
            kvs.push((n as i64).into());
        }
        kvs.push(key.clone().into());

        let fields = fields_from_kvs(&kvs);
        prop_assert_eq!(fields.len(), pairs + 1);
        prop_assert_eq!(fields[pairs].clone(), Field::string(key, "MISSING"));
    }
}

// ============================================================================
// Record Tests
// ============================================================================

proptest! {
    /// Fields beyond the inline capacity spill over in order
    #[test]
    fn test_inline_then_overflow(count in 0usize..40) {
        let mut record = Record::new(Level::INFO, "m");
        for n in 0..count {
            record.add_field(Field::int("n", n as i64));
        }

        prop_assert_eq!(record.num_fields(), count);
        prop_assert_eq!(record.inline_len(), count.min(INLINE_FIELDS));
        if count <= INLINE_FIELDS {
            prop_assert_eq!(record.overflow_capacity(), 0);
        }
        let values: Vec<String> = record.fields().map(|f| f.value.to_string()).collect();
        let expected: Vec<String> = (0..count).map(|n| n.to_string()).collect();
        prop_assert_eq!(values, expected);
    }

    /// Reset leaves a record indistinguishable from a fresh one, every time
    #[test]
    fn test_reset_is_idempotent(message in ".*", count in 0usize..24) {
        let mut record = Record::new(Level::ERROR, message);
        record.stack = "frame".to_string();
        for n in 0..count {
            record.add_field(Field::int("n", n as i64));
        }

        for _ in 0..2 {
            record.reset();
            prop_assert_eq!(record.num_fields(), 0);
            prop_assert_eq!(record.inline_len(), 0);
            prop_assert!(record.message.is_empty());
            prop_assert!(record.stack.is_empty());
            prop_assert!(record.caller.is_none());
            prop_assert!(record.field_at(0).is_none());
        }
    }
}

// ============================================================================
// Encoder Tests
// ============================================================================

proptest! {
    /// Any message and string value survive JSON encoding intact
    #[test]
    fn test_json_is_always_valid(message in ".*", value in ".*", key in "[a-z_]{1,10}") {
        let key = format!("f_{}", key);
        let mut record = Record::new(Level::WARN, message.clone());
        record.add_field(Field::string(key.clone(), value.clone()));

        let line = encode(&JsonEncoder::new(), &record);
        prop_assert!(line.ends_with("}\n"), "line: {:?}", line);
        prop_assert_eq!(line.matches('\n').count(), 1);

        let parsed: serde_json::Value = serde_json::from_str(&line).expect("valid JSON");
        prop_assert_eq!(parsed["msg"].as_str(), Some(message.as_str()));
        prop_assert_eq!(parsed[key.as_str()].as_str(), Some(value.as_str()));
        prop_assert_eq!(parsed["level"].as_str(), Some("WARN"));
    }

    /// Numeric JSON fields stay numbers; non-finite floats become strings
    #[test]
    fn test_json_floats(f in any::<f64>()) {
        let mut record = Record::new(Level::INFO, "m");
        record.add_field(Field::float("f", f));

        let line = encode(&JsonEncoder::new(), &record);
        let parsed: serde_json::Value = serde_json::from_str(&line).expect("valid JSON");
        if f.is_finite() {
            let got = parsed["f"].as_f64().expect("finite floats stay numbers");
            prop_assert!((got - f).abs() <= f.abs() * 1e-12 + f64::MIN_POSITIVE, "{} vs {}", got, f);
        } else {
            prop_assert!(parsed["f"].is_string());
        }
    }

    /// Logfmt values are bare only when safe and always decode back
    #[test]
    fn test_logfmt_quoting(value in "[ -~\n\r\t]{0,40}") {
        let mut record = Record::new(Level::INFO, "m");
        record.add_field(Field::string("v", value.clone()));

        let encoder = LogfmtEncoder::new().with_time_format(TimestampFormat::Unix);
        let line = encode(&encoder, &record);
        prop_assert!(line.ends_with('\n'));
        prop_assert_eq!(line.matches('\n').count(), 1);

        let (_, raw) = line.trim_end_matches('\n').split_once(" v=").expect("field present");
        let needs_quotes = value.is_empty()
            || value.contains(|c: char| c == ' ' || c == '=' || c == '"' || c == '\\' || c.is_control());
        prop_assert_eq!(raw.starts_with('"'), needs_quotes);
        prop_assert_eq!(logfmt_unquote(raw), value);
    }
}
