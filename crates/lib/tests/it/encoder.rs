//! Encoder integration tests
//!
//! Covers the emission policy for each shape as seen through the text form.

use std::{collections::HashMap, time::Duration};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use envtree::{
    CustomEncoder, Decode, Encode, Error, Mapper, Node, Options, Result, Shape, Slot, record,
    to_string,
};

use crate::helpers::*;

#[derive(Debug, Default)]
struct Server {
    host: String,
    port: u16,
    timeout: Duration,
    started: DateTime<Utc>,
    release: NaiveDate,
    tags: Vec<String>,
    debug: Option<bool>,
}
record!(Server {
    host,
    port,
    timeout,
    started,
    release,
    tags,
    debug: "omitempty",
});

struct Endpoints(Vec<String>);

impl Encode for Endpoints {
    fn shape(&self) -> Shape<'_> {
        self.0.shape()
    }

    fn as_custom_encoder(&self) -> Option<&dyn CustomEncoder> {
        Some(self)
    }
}

impl CustomEncoder for Endpoints {
    fn encode(&self, prefix: &str) -> Result<Vec<Node>> {
        if self.0.iter().any(|url| url.contains('\n')) {
            return Err(Error::custom("endpoint contains a line feed"));
        }
        Ok(self
            .0
            .iter()
            .enumerate()
            .map(|(i, url)| Node::leaf(format!("{prefix}_URL{i}"), url.as_str()))
            .collect())
    }
}

impl Decode for Endpoints {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Unsupported("endpoints")
    }
}

struct Gateway {
    endpoints: Endpoints,
}
record!(Gateway { endpoints });

#[test]
fn test_sample_config() {
    assert_eq!(
        to_string(&sample_config()).expect("Failed to encode"),
        SAMPLE_TEXT
    );
}

#[test]
fn test_scalar_kinds() {
    let server = Server {
        host: "localhost".to_string(),
        port: 8080,
        timeout: Duration::from_millis(1500),
        started: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
        release: NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(),
        tags: vec!["a".to_string(), "b".to_string()],
        debug: None,
    };

    let text = Mapper::default()
        .marshal_with_prefix("srv", &server)
        .expect("Failed to encode");
    assert_eq!(
        String::from_utf8(text).unwrap(),
        "SRV_HOST=localhost\n\
         SRV_PORT=8080\n\
         SRV_TIMEOUT=1.5s\n\
         SRV_STARTED=2024-05-01 12:30:00\n\
         SRV_RELEASE=2024-04-30\n\
         SRV_TAGS=a,b\n"
    );
}

#[test]
fn test_omitempty_keeps_set_pointer() {
    let server = Server {
        debug: Some(false),
        ..Default::default()
    };
    let text = to_string(&server).expect("Failed to encode");
    assert!(text.contains("DEBUG=false\n"));
}

#[test]
fn test_custom_encoder_on_sequence_field() {
    let gateway = Gateway {
        endpoints: Endpoints(vec!["http://a".to_string(), "http://b".to_string()]),
    };
    assert_eq!(
        to_string(&gateway).expect("Failed to encode"),
        "ENDPOINTS_URL0=http://a\nENDPOINTS_URL1=http://b\n"
    );
}

#[test]
fn test_custom_encoder_error_is_wrapped() {
    let gateway = Gateway {
        endpoints: Endpoints(vec!["bad\nurl".to_string()]),
    };
    let err = to_string(&gateway).unwrap_err();

    assert_eq!(err.module(), "encoder");
    assert!(err.is_custom());
    assert_eq!(err.path(), Some("ENDPOINTS"));
    assert!(err.to_string().contains("line feed"));
}

#[test]
fn test_map_output_is_sorted() {
    let mut limits = HashMap::new();
    limits.insert("zeta", 3);
    limits.insert("alpha", 1);
    limits.insert("mid", 2);

    let text = Mapper::default()
        .marshal_with_prefix("limits", &limits)
        .expect("Failed to encode");
    assert_eq!(text, b"LIMITS_ALPHA=1\nLIMITS_MID=2\nLIMITS_ZETA=3\n".to_vec());
}

#[test]
fn test_lower_case_names() {
    let options = Options::default().with_upper_case_names(false);
    let text = Mapper::new(options)
        .marshal_with_prefix("app", &sample_config())
        .expect("Failed to encode");
    assert_eq!(
        text,
        b"app_root-int-value=3\napp_child_string-val=12\napp_child_bool-val=true\n".to_vec()
    );
}

#[test]
fn test_positional_listing() {
    let listing = Listing {
        a: vec![Item { b: 1 }, Item { b: 2 }],
    };
    assert_eq!(
        to_string(&listing).expect("Failed to encode"),
        "A_[0]_B=1\nA_[1]_B=2\n"
    );
}

#[test]
fn test_strict_sequences_error() {
    let listing = Listing {
        a: vec![Item { b: 1 }],
    };
    let mapper = Mapper::new(Options::default().with_strict_sequences(true));
    let err = mapper.marshal(&listing).unwrap_err();

    assert!(err.is_unsupported_shape());
    assert_eq!(err.path(), Some("A_[0]"));
}
