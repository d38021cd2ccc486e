//! High-level entry points.
//!
//! [`Mapper`] ties the codec, the encoder and the decoder together behind a
//! single set of [`Options`]. The crate-level functions ([`to_vec`],
//! [`to_string`], [`from_slice`], [`from_str`], [`from_slice_into`]) use a
//! default mapper.

use tracing::debug;

use crate::{
    Result,
    codec,
    decoder::Decoder,
    encoder::Encoder,
    options::Options,
    shape::{Decode, Encode},
    tree::{Node, NodeStorage},
};

/// Converts between typed values and flat `PATH=VALUE` text.
///
/// ```
/// # use envtree::{Mapper, Options, record};
/// #[derive(Debug, Default, PartialEq)]
/// struct Server {
///     host: String,
///     port: u16,
/// }
/// record!(Server { host, port });
///
/// let mapper = Mapper::new(Options::default());
/// let server = Server { host: "localhost".into(), port: 8080 };
///
/// let text = mapper.marshal_with_prefix("server", &server)?;
/// assert_eq!(text, b"SERVER_HOST=localhost\nSERVER_PORT=8080\n");
///
/// let back: Server = mapper.unmarshal_with_prefix(&text, "server")?;
/// assert_eq!(back, server);
/// # Ok::<(), envtree::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Mapper {
    options: Options,
}

impl Mapper {
    /// Creates a mapper using `options`.
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    /// The options this mapper was created with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Encodes `value` below `prefix` into a node tree.
    pub fn encode(&self, prefix: &str, value: &dyn Encode) -> Result<Option<Node>> {
        Ok(Encoder::new(&self.options).encode(prefix, value)?)
    }

    /// Encodes `value` into text.
    pub fn marshal(&self, value: &dyn Encode) -> Result<Vec<u8>> {
        self.marshal_with_prefix("", value)
    }

    /// Encodes `value` below `prefix` into text.
    pub fn marshal_with_prefix(&self, prefix: &str, value: &dyn Encode) -> Result<Vec<u8>> {
        let Some(node) = self.encode(prefix, value)? else {
            return Ok(Vec::new());
        };
        let out = codec::encode(std::slice::from_ref(&node));
        debug!(prefix, bytes = out.len(), "Marshaled value");
        Ok(out)
    }

    /// Parses text into a storage using the configured level separator.
    pub fn parse(&self, input: &[u8]) -> NodeStorage {
        codec::decode_with_separator(input, self.options.level_separator)
    }

    /// Decodes the whole of `source` into `target`.
    pub fn decode(&self, source: &NodeStorage, target: &mut dyn Decode) -> Result<()> {
        self.decode_with_prefix(source, "", target)
    }

    /// Decodes the part of `source` below `prefix` into `target`.
    pub fn decode_with_prefix(
        &self,
        source: &NodeStorage,
        prefix: &str,
        target: &mut dyn Decode,
    ) -> Result<()> {
        Ok(Decoder::new(&self.options).decode(prefix, source, target)?)
    }

    /// Decodes a detached subtree into `target`.
    ///
    /// The node's name is used as the prefix, so a node taken out of a
    /// larger tree decodes the same way it would have in place.
    pub fn decode_node(&self, node: &Node, target: &mut dyn Decode) -> Result<()> {
        let source = NodeStorage::flatten_with_separator(
            &Node::internal("", vec![node.clone()]),
            self.options.level_separator,
        );
        self.decode_with_prefix(&source, &node.name, target)
    }

    /// Decodes text into a new value.
    pub fn unmarshal<T: Decode + Default>(&self, input: &[u8]) -> Result<T> {
        self.unmarshal_with_prefix(input, "")
    }

    /// Decodes the records of `input` below `prefix` into a new value.
    pub fn unmarshal_with_prefix<T: Decode + Default>(&self, input: &[u8], prefix: &str) -> Result<T> {
        let mut value = T::default();
        self.unmarshal_into(input, prefix, &mut value)?;
        Ok(value)
    }

    /// Decodes the records of `input` below `prefix` into an existing value.
    ///
    /// Fields without a record keep their current value.
    pub fn unmarshal_into(&self, input: &[u8], prefix: &str, target: &mut dyn Decode) -> Result<()> {
        let source = self.parse(input);
        self.decode_with_prefix(&source, prefix, target)
    }
}

/// Encodes `value` into text with default options.
pub fn to_vec(value: &dyn Encode) -> Result<Vec<u8>> {
    Mapper::default().marshal(value)
}

/// Encodes `value` into a string with default options.
pub fn to_string(value: &dyn Encode) -> Result<String> {
    let bytes = to_vec(value)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Decodes text into a new value with default options.
pub fn from_slice<T: Decode + Default>(input: &[u8]) -> Result<T> {
    Mapper::default().unmarshal(input)
}

/// Decodes a string into a new value with default options.
pub fn from_str<T: Decode + Default>(input: &str) -> Result<T> {
    from_slice(input.as_bytes())
}

/// Decodes text into an existing value with default options.
pub fn from_slice_into(input: &[u8], target: &mut dyn Decode) -> Result<()> {
    Mapper::default().unmarshal_into(input, "", target)
}
