//! The `record!` macro.

/// Implements [`Encode`](crate::Encode) and [`Decode`](crate::Decode) for a
/// struct by listing its fields.
///
/// Fields are listed in declaration order; each may carry a tag string
/// (see [`Field`](crate::Field)). Fields left out of the list are invisible
/// to both the encoder and the decoder.
///
/// A trailing `with CustomEncoder` and/or `with CustomDecoder` exposes the
/// corresponding capability, which the type must implement separately.
///
/// ```rust
/// use envtree::{Node, Result, record, CustomEncoder};
///
/// #[derive(Debug, Default)]
/// struct Server {
///     host: String,
///     port: u16,
///     debug: bool,
///     password: String,
/// }
///
/// record!(Server {
///     host: "addr",
///     port: "port,omitempty",
///     debug,
///     password: "-",
/// });
///
/// #[derive(Debug, Default)]
/// struct Upstream {
///     name: String,
///     url: String,
/// }
///
/// impl CustomEncoder for Upstream {
///     fn encode(&self, prefix: &str) -> Result<Vec<Node>> {
///         Ok(vec![Node::leaf(format!("{prefix}_{}", self.name.to_uppercase()), self.url.as_str())])
///     }
/// }
///
/// record!(Upstream { name, url } with CustomEncoder);
///
/// let server = Server { host: "localhost".into(), ..Default::default() };
/// assert_eq!(envtree::to_string(&server)?, "ADDR=localhost\nDEBUG=false\n");
/// # Ok::<(), envtree::Error>(())
/// ```
#[macro_export]
macro_rules! record {
    ($ty:ty { $($field:ident $(: $tag:literal)?),* $(,)? } $(with $($capability:ident),+ $(,)?)?) => {
        impl $crate::Encode for $ty {
            fn shape(&self) -> $crate::Shape<'_> {
                $crate::Shape::Record(vec![
                    $((
                        $crate::Field::new(stringify!($field), $crate::__field_tag!($($tag)?)),
                        &self.$field as &dyn $crate::Encode,
                    ),)*
                ])
            }

            $($($crate::__encode_capability!($capability);)+)?
        }

        impl $crate::Decode for $ty {
            fn slot(&mut self) -> $crate::Slot<'_> {
                $crate::Slot::Record(vec![
                    $((
                        $crate::Field::new(stringify!($field), $crate::__field_tag!($($tag)?)),
                        &mut self.$field as &mut dyn $crate::Decode,
                    ),)*
                ])
            }

            $($($crate::__decode_capability!($capability);)+)?
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_tag {
    () => {
        ""
    };
    ($tag:literal) => {
        $tag
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __encode_capability {
    (CustomEncoder) => {
        fn as_custom_encoder(&self) -> Option<&dyn $crate::CustomEncoder> {
            Some(self)
        }
    };
    ($other:ident) => {};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __decode_capability {
    (CustomDecoder) => {
        fn as_custom_decoder(&mut self) -> Option<&mut dyn $crate::CustomDecoder> {
            Some(self)
        }
    };
    ($other:ident) => {};
}
