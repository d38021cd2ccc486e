use std::collections::BTreeMap;

use envtree::{
    CustomDecoder, CustomEncoder, Decode, Encode, Error, Node, NodeRef, Result, Shape, Slot,
    from_str, record, to_string,
};

/// String map that encodes and decodes itself, one leaf per entry.
#[derive(Debug, Default, PartialEq)]
struct Env(BTreeMap<String, String>);

impl Encode for Env {
    fn shape(&self) -> Shape<'_> {
        self.0.shape()
    }

    fn as_custom_encoder(&self) -> Option<&dyn CustomEncoder> {
        Some(self)
    }
}

impl CustomEncoder for Env {
    fn encode(&self, prefix: &str) -> Result<Vec<Node>> {
        Ok(self
            .0
            .iter()
            .map(|(key, value)| Node::leaf(format!("{prefix}_{key}"), value.as_str()))
            .collect())
    }
}

impl Decode for Env {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Map("env")
    }

    fn as_custom_decoder(&mut self) -> Option<&mut dyn CustomDecoder> {
        Some(self)
    }
}

impl CustomDecoder for Env {
    fn decode(&mut self, node: NodeRef<'_>) -> Result<()> {
        for leaf in node.descendants().filter(|n| n.is_leaf()) {
            let key = leaf
                .name()
                .strip_prefix(node.name())
                .and_then(|rest| rest.strip_prefix('_'))
                .ok_or_else(|| Error::custom(format!("unexpected path {}", leaf.name())))?;
            let value = leaf.value().map(|v| v.to_string()).unwrap_or_default();
            self.0.insert(key.to_string(), value);
        }
        Ok(())
    }
}

#[derive(Debug, Default, PartialEq)]
struct Port {
    name: String,
    number: u16,
}
record!(Port { name, number });

/// Sequence of ports written as `NAME=NUMBER` leaves instead of `[i]` elements.
#[derive(Debug, Default, PartialEq)]
struct Ports(Vec<Port>);

impl Decode for Ports {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Sequence(&mut self.0)
    }

    fn as_custom_decoder(&mut self) -> Option<&mut dyn CustomDecoder> {
        Some(self)
    }
}

impl Encode for Ports {
    fn shape(&self) -> Shape<'_> {
        Shape::Unsupported("ports")
    }
}

impl CustomDecoder for Ports {
    fn decode(&mut self, node: NodeRef<'_>) -> Result<()> {
        for child in node.children() {
            let text = child.value().map(|v| v.to_string()).unwrap_or_default();
            let number = text
                .parse()
                .map_err(|_| Error::custom(format!("bad port '{text}'")))?;
            self.0.push(Port {
                name: child.segment().to_string(),
                number,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Default, PartialEq)]
struct Deployment {
    env: Env,
    replicas: u8,
}
record!(Deployment { env, replicas });

#[derive(Debug, Default, PartialEq)]
struct Service {
    ports: Ports,
}
record!(Service { ports });

#[test]
fn test_custom_map_round_trip() {
    let mut env = BTreeMap::new();
    env.insert("LOG_LEVEL".to_string(), "debug".to_string());
    env.insert("MODE".to_string(), "prod".to_string());
    let deployment = Deployment {
        env: Env(env),
        replicas: 2,
    };

    let text = to_string(&deployment).expect("Failed to encode");
    assert_eq!(text, "ENV_LOG_LEVEL=debug\nENV_MODE=prod\nREPLICAS=2\n");

    let back: Deployment = from_str(&text).expect("Failed to decode");
    assert_eq!(back, deployment);
}

#[test]
fn test_custom_sequence_decoder() {
    let service: Service = from_str("PORTS_HTTP=80\nPORTS_HTTPS=443\n").expect("Failed to decode");
    assert_eq!(
        service.ports.0,
        vec![
            Port {
                name: "HTTP".to_string(),
                number: 80,
            },
            Port {
                name: "HTTPS".to_string(),
                number: 443,
            },
        ]
    );
}

#[test]
fn test_custom_decoder_error_is_wrapped() {
    let err = from_str::<Service>("PORTS_HTTP=eighty\n").unwrap_err();

    assert!(err.is_custom());
    assert_eq!(err.module(), "decoder");
    assert_eq!(err.path(), Some("PORTS"));
    assert!(err.to_string().contains("bad port 'eighty'"));
}
