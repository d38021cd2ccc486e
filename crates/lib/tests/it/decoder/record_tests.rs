use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use envtree::{Decoder, Mapper, Options, codec, from_slice, from_str, record};

use crate::helpers::*;

#[derive(Debug, Default, PartialEq)]
struct Settings {
    name: String,
    retries: u8,
    offset: i16,
    ratio: f64,
    verbose: bool,
    timeout: Duration,
    deadline: DateTime<FixedOffset>,
    day: NaiveDate,
}
record!(Settings {
    name,
    retries,
    offset,
    ratio,
    verbose,
    timeout,
    deadline,
    day,
});

#[derive(Debug, Default, PartialEq)]
struct Wrapper {
    inner: Option<Box<Config>>,
    note: String,
}
record!(Wrapper { inner, note });

#[test]
fn test_sample_text() {
    let config: Config = from_str(SAMPLE_TEXT).expect("Failed to decode");
    assert_eq!(config, sample_config());
}

#[test]
fn test_no_records() {
    let config: Config = from_slice(b"NOVALUEHERE\n").expect("Failed to decode");
    assert_eq!(config, Config::default());
}

#[test]
fn test_scalar_coercions() {
    let input = "NAME=svc\n\
                 RETRIES=3\n\
                 OFFSET=-12\n\
                 RATIO=0.25\n\
                 VERBOSE=T\n\
                 TIMEOUT=1m30s\n\
                 DEADLINE=2024-05-01T10:00:00+02:00\n\
                 DAY=2024-04-30\n";
    let settings: Settings = from_str(input).expect("Failed to decode");

    assert_eq!(settings.name, "svc");
    assert_eq!(settings.retries, 3);
    assert_eq!(settings.offset, -12);
    assert_eq!(settings.ratio, 0.25);
    assert!(settings.verbose);
    assert_eq!(settings.timeout, Duration::from_secs(90));
    assert_eq!(
        settings.deadline.with_timezone(&Utc).to_rfc3339(),
        "2024-05-01T08:00:00+00:00"
    );
    assert_eq!(settings.day, NaiveDate::from_ymd_opt(2024, 4, 30).unwrap());
}

#[test]
fn test_out_of_range_values_are_zero() {
    let settings: Settings =
        from_str("RETRIES=300\nOFFSET=abc\nRATIO=x\nTIMEOUT=-1s\nDAY=yesterday\n")
            .expect("Failed to decode");
    assert_eq!(settings, Settings::default());
}

#[test]
fn test_numeric_duration_is_nanoseconds() {
    let settings: Settings = from_str("TIMEOUT=1500\n").expect("Failed to decode");
    assert_eq!(settings.timeout, Duration::from_nanos(1500));
}

#[test]
fn test_nested_pointer_allocated_only_with_data() {
    let empty: Wrapper = from_str("NOTE=n\n").expect("Failed to decode");
    assert!(empty.inner.is_none());
    assert_eq!(empty.note, "n");

    let filled: Wrapper =
        from_str("INNER_CHILD_BOOL-VAL=true\n").expect("Failed to decode");
    let inner = filled.inner.expect("inner should be allocated");
    assert!(inner.child.bool_val);
    assert_eq!(inner.root_int_value, 0);
}

#[test]
fn test_decode_with_prefix_ignores_other_records() {
    let mapper = Mapper::default();
    let source = mapper.parse(b"APP_ROOT-INT-VALUE=5\nROOT-INT-VALUE=9\nAPP_EXTRA=1\n");

    let mut config = Config::default();
    mapper
        .decode_with_prefix(&source, "app", &mut config)
        .expect("Failed to decode");
    assert_eq!(config.root_int_value, 5);
}

#[test]
fn test_mapping_lists_destination_paths() {
    let options = Options::default();
    let source = codec::decode(b"");
    let mut config = Config::default();

    let mapping = Decoder::new(&options)
        .mapping("cfg", &source, &mut config)
        .expect("Failed to build mapping");
    assert_eq!(
        mapping.paths(),
        vec!["CFG_CHILD_BOOL-VAL", "CFG_CHILD_STRING-VAL", "CFG_ROOT-INT-VALUE"]
    );
}
