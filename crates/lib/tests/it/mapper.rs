//! End-to-end tests through the Mapper facade

use chrono::{DateTime, FixedOffset, TimeZone};
use envtree::{Mapper, NodeStorage, Options, from_slice_into, record, unite_storages};

use crate::helpers::*;

#[derive(Debug, Default, Clone, PartialEq)]
struct Database {
    host: String,
    port: u16,
    replicas: Vec<String>,
}
record!(Database { host, port, replicas });

#[derive(Debug, Default, PartialEq)]
struct Stamp {
    at: DateTime<FixedOffset>,
}
record!(Stamp { at });

#[derive(Debug, Default, Clone, PartialEq)]
struct AppConfig {
    name: String,
    database: Database,
    backup: Option<Database>,
    workers: Vec<Item>,
}
record!(AppConfig {
    name,
    database: "db",
    backup,
    workers,
});

fn sample_app() -> AppConfig {
    AppConfig {
        name: "demo".to_string(),
        database: Database {
            host: "localhost".to_string(),
            port: 5432,
            replicas: vec!["r1".to_string(), "r2".to_string()],
        },
        backup: Some(Database {
            host: "backup".to_string(),
            port: 6543,
            replicas: Vec::new(),
        }),
        workers: vec![Item { b: 1 }, Item { b: 2 }],
    }
}

#[test]
fn test_round_trip_with_prefix() {
    let mapper = Mapper::default();
    let app = sample_app();

    let text = mapper
        .marshal_with_prefix("app", &app)
        .expect("Failed to encode");
    assert_eq!(
        String::from_utf8(text.clone()).unwrap(),
        "APP_NAME=demo\n\
         APP_DB_HOST=localhost\n\
         APP_DB_PORT=5432\n\
         APP_DB_REPLICAS=r1,r2\n\
         APP_BACKUP_HOST=backup\n\
         APP_BACKUP_PORT=6543\n\
         APP_WORKERS_[0]_B=1\n\
         APP_WORKERS_[1]_B=2\n"
    );

    let back: AppConfig = mapper
        .unmarshal_with_prefix(&text, "app")
        .expect("Failed to decode");
    assert_eq!(back, app);
}

#[test]
fn test_encode_then_flatten_matches_parse() {
    let mapper = Mapper::default();
    let node = mapper
        .encode("", &sample_app())
        .expect("Failed to encode")
        .expect("Encoded nothing");
    let flattened = NodeStorage::flatten(&node);

    let text = mapper.marshal(&sample_app()).expect("Failed to encode");
    let parsed = mapper.parse(&text);

    assert_eq!(records(&flattened), records(&parsed));
}

#[test]
fn test_decode_node_subtree() {
    let mapper = Mapper::default();
    let source = mapper.parse(b"APP_DB_HOST=h\nAPP_DB_PORT=1\nAPP_NAME=x\n");
    let subtree = source
        .get("APP_DB")
        .expect("Failed to get APP_DB")
        .to_node();

    let mut database = Database::default();
    mapper
        .decode_node(&subtree, &mut database)
        .expect("Failed to decode");
    assert_eq!(database.host, "h");
    assert_eq!(database.port, 1);
}

#[test]
fn test_layered_configuration() {
    // Defaults overlaid by environment-specific values
    let mapper = Mapper::default();
    let mut layered = mapper.parse(&mapper.marshal(&sample_app()).expect("Failed to encode"));
    let overrides = mapper.parse(b"DB_PORT=7000\nNAME=prod\n");
    unite_storages(&overrides, &mut layered);

    let mut app = AppConfig::default();
    mapper.decode(&layered, &mut app).expect("Failed to decode");

    let mut expected = sample_app();
    expected.name = "prod".to_string();
    expected.database.port = 7000;
    assert_eq!(app, expected);
}

#[test]
fn test_unmarshal_into_existing_value() {
    let mut app = sample_app();
    from_slice_into(b"BACKUP_HOST=elsewhere\n", &mut app).expect("Failed to decode");

    let backup = app.backup.expect("backup should still be set");
    assert_eq!(backup.host, "elsewhere");
    assert_eq!(backup.port, 6543);
}

#[test]
fn test_options_from_json() {
    let options: Options = serde_json::from_str(
        r#"{ "level_separator": ".", "upper_case_names": false }"#,
    )
    .expect("Failed to parse options");
    let mapper = Mapper::new(options);

    let node = mapper
        .encode("cfg", &sample_config())
        .expect("Failed to encode")
        .expect("Encoded nothing");
    assert_eq!(node.name, "cfg");

    let text = mapper
        .marshal_with_prefix("cfg", &sample_config())
        .expect("Failed to encode");
    assert_eq!(
        text,
        b"cfg.root-int-value=3\ncfg.child.string-val=12\ncfg.child.bool-val=true\n".to_vec()
    );

    let back: Config = mapper
        .unmarshal_with_prefix(&text, "cfg")
        .expect("Failed to decode");
    assert_eq!(back, sample_config());
}

#[test]
fn test_instant_with_offset_round_trip() {
    let offset = FixedOffset::east_opt(2 * 3600).unwrap();
    let stamp = Stamp {
        at: offset.with_ymd_and_hms(2024, 3, 1, 15, 4, 5).unwrap(),
    };

    let text = envtree::to_string(&stamp).expect("Failed to encode");
    assert_eq!(text, "AT=2024-03-01T15:04:05+02:00\n");

    let back: Stamp = envtree::from_str(&text).expect("Failed to decode");
    assert_eq!(back, stamp);
    assert_eq!(back.at.offset(), stamp.at.offset());
}
