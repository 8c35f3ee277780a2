//! # bitfield-decoder
//!
//! Decoding of named bit fields packed into 64-bit integers, such as detector
//! cell identifiers.
//!
//! A schema is written as a compact description: a comma-separated list of
//! `name:width` or `name:offset:width` clauses. Fields without an offset are
//! laid out one after another starting at bit 0; a negative width marks a
//! signed (two's-complement) field.
//!
//! ## Example
//!
//! ```
//! use bitfield_decoder::{Decoder, PackedValue, DecodedValue};
//!
//! let mut ecal = Decoder::new("system:4,cryo:1,module:11,type:3,subtype:3,cell:6,eta:9").unwrap();
//!
//! ecal.set_value(36280732133u64);
//! assert_eq!(ecal.value("system"), Ok(5));
//! assert_eq!(ecal.value("module"), Ok(79));
//! assert_eq!(ecal.value("eta"), Ok(135));
//!
//! let hits = PackedValue::from(vec![36280732133u64, 35987131109]);
//! assert_eq!(ecal.decode_many(&hits, "cell"), Ok(DecodedValue::Flat(vec![10, 4])));
//! ```

pub mod bits;
pub mod config;
pub mod decoder;
pub mod description;
pub mod errors;
pub mod field;
pub mod schema;
#[cfg(feature = "serde")]
pub mod serde;
pub mod value;

pub use config::{DecoderConfig, OverlapPolicy};
pub use decoder::Decoder;
pub use errors::{DecodeError, SchemaError};
pub use field::FieldSpec;
pub use schema::Schema;
pub use value::{DecodedValue, PackedInt, PackedValue};
