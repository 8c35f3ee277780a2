//! Decoder: a [Schema] plus a "current value" register, with scalar and bulk
//! decode entry points.

use tracing::{error, trace};

use crate::{
    config::DecoderConfig,
    errors::{DecodeError, SchemaError},
    field::FieldSpec,
    schema::Schema,
    value::{DecodedValue, PackedInt, PackedValue},
};

/// Reads named fields out of packed 64-bit values.
///
/// The schema is fixed at construction. The only mutable state is the current
/// value register used by [Decoder::value]; [Decoder::set_value] takes
/// `&mut self`, so sharing a decoder between threads that update the register
/// requires a lock around it.
///
/// ```
/// use bitfield_decoder::Decoder;
///
/// let decoder = Decoder::new("x:16,y:-16").unwrap();
/// assert_eq!(decoder.decode(2682840153, "x"), Ok(58457));
/// assert_eq!(decoder.decode(2682840153, "y"), Ok(-24600));
/// ```
#[derive(Debug, Clone)]
pub struct Decoder {
    schema: Schema,
    config: DecoderConfig,
    current_value: u64,
}

impl Decoder {
    /// Parses `description` with the default configuration.
    pub fn new(description: &str) -> Result<Self, SchemaError> {
        Self::with_config(description, DecoderConfig::default())
    }

    pub fn with_config(description: &str, config: DecoderConfig) -> Result<Self, SchemaError> {
        let schema = Schema::parse_with(description, config.overlap)?;
        Ok(Self::from_schema(schema, config))
    }

    /// Wraps an already built schema. The register starts at zero.
    pub fn from_schema(schema: Schema, config: DecoderConfig) -> Self {
        Self {
            schema,
            config,
            current_value: 0,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Looks up a field, failing with [DecodeError::UnknownField].
    pub fn field(&self, name: &str) -> Result<&FieldSpec, DecodeError> {
        self.schema
            .get(name)
            .ok_or_else(|| DecodeError::UnknownField(name.to_string()))
    }

    /// Decodes `field` from `value`. Does not touch the register.
    pub fn decode(&self, value: u64, field: &str) -> Result<i128, DecodeError> {
        let spec = self.field(field)?;
        self.decode_field(spec, value)
    }

    fn decode_field(&self, spec: &FieldSpec, packed: u64) -> Result<i128, DecodeError> {
        let value = spec.extract(packed);

        if !self.config.strict {
            return Ok(value);
        }

        spec.check_range(value).inspect_err(|err| {
            error!(%err, packed, "decoded value escaped its field range");
        })
    }

    /// Stores `value` in the register read by [Decoder::value].
    pub fn set_value<T: PackedInt>(&mut self, value: T) {
        self.current_value = value.to_packed();
    }

    pub fn current_value(&self) -> u64 {
        self.current_value
    }

    /// Decodes `field` from the register.
    pub fn value(&self, field: &str) -> Result<i128, DecodeError> {
        self.decode(self.current_value, field)
    }

    /// Decodes `field` from `value` instead of the register, leaving the register unchanged.
    pub fn value_of<T: PackedInt>(&self, field: &str, value: T) -> Result<i128, DecodeError> {
        self.decode(value.to_packed(), field)
    }

    /// Decodes `field` from every container in `values`, keeping the input's shape.
    ///
    /// Each element is decoded exactly as [Decoder::decode] would; either every
    /// element succeeds or the whole call fails.
    pub fn decode_many(
        &self,
        values: &PackedValue,
        field: &str,
    ) -> Result<DecodedValue, DecodeError> {
        let spec = self.field(field)?;
        trace!(field, count = values.count(), "bulk decode");

        values.try_map(&|packed: u64| self.decode_field(spec, packed))
    }

    /// Flat-slice variant of [Decoder::decode_many].
    pub fn decode_slice(&self, values: &[u64], field: &str) -> Result<Vec<i128>, DecodeError> {
        let spec = self.field(field)?;

        values
            .iter()
            .map(|&packed| self.decode_field(spec, packed))
            .collect()
    }

    /// Decodes every field of `value`, in declaration order.
    pub fn decode_all(&self, value: u64) -> Result<Vec<(String, i128)>, DecodeError> {
        self.schema
            .iter()
            .map(|spec| {
                self.decode_field(spec, value)
                    .map(|decoded| (spec.name().to_string(), decoded))
            })
            .collect()
    }

    /// Packs field values into a fresh container. Fields that are not named stay zero;
    /// a field named twice keeps its last value.
    pub fn encode<I, S>(&self, values: I) -> Result<u64, DecodeError>
    where
        I: IntoIterator<Item = (S, i128)>,
        S: AsRef<str>,
    {
        values.into_iter().try_fold(0u64, |packed, (name, value)| {
            self.field(name.as_ref())?.insert(packed, value)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::config::OverlapPolicy;

    use super::*;

    #[test]
    fn test_basic_values() {
        let decoder = Decoder::new("sys:2,name:2,type:4").unwrap();
        let cases = [(5u64, [1, 1, 0]), (7, [3, 1, 0]), (15, [3, 3, 0]), (21, [1, 1, 1])];

        for (value, [sys, name, kind]) in cases {
            assert_eq!(decoder.decode(value, "sys"), Ok(sys));
            assert_eq!(decoder.decode(value, "name"), Ok(name));
            assert_eq!(decoder.decode(value, "type"), Ok(kind));
        }
    }

    #[test]
    fn test_negative_fields() {
        let decoder = Decoder::new("x:-16,y:-16").unwrap();
        let cases = [
            (4294901760u64, 0, -1),
            (65535, -1, 0),
            (0, 0, 0),
            (4294967295, -1, -1),
        ];

        for (value, x, y) in cases {
            assert_eq!(decoder.value_of("x", value), Ok(x));
            assert_eq!(decoder.value_of("y", value), Ok(y));
        }
    }

    #[test]
    fn test_mixed_fields() {
        let decoder = Decoder::new("x:16,y:-16").unwrap();
        let cases = [
            (24947260u64, 43580, 380),
            (5873629, 40925, 89),
            (2682840153, 58457, -24600),
            (2860302816, 49632, -21892),
        ];

        for (value, x, y) in cases {
            assert_eq!(decoder.decode(value, "x"), Ok(x));
            assert_eq!(decoder.decode(value, "y"), Ok(y));
        }
    }

    #[test]
    fn test_register() {
        let fields = ["system", "cryo", "module", "type", "subtype", "cell", "eta"];
        let mut ecal =
            Decoder::new("system:4,cryo:1,module:11,type:3,subtype:3,cell:6,eta:9").unwrap();
        let cases: [(u64, [i128; 7]); 5] = [
            (36280732133, [5, 0, 79, 0, 0, 10, 135]),
            (35987131109, [5, 0, 87, 0, 0, 4, 134]),
            (37358668421, [5, 0, 84, 0, 0, 11, 139]),
            (36263955141, [5, 0, 86, 0, 0, 6, 135]),
            (35995519653, [5, 0, 85, 0, 0, 6, 134]),
        ];

        assert_eq!(ecal.current_value(), 0);
        for (value, expected) in cases {
            ecal.set_value(value);
            for (field, expected) in fields.iter().zip(expected) {
                assert_eq!(ecal.value(field), Ok(expected), "field {field} of {value}");
            }
        }
    }

    #[test]
    fn test_value_of_leaves_register() {
        let mut decoder = Decoder::new("a:8,b:8").unwrap();
        decoder.set_value(0x0201u32);
        assert_eq!(decoder.value_of("b", 0x0500u64), Ok(5));
        assert_eq!(decoder.current_value(), 0x0201);
        assert_eq!(decoder.value("b"), Ok(2));
    }

    #[test]
    fn test_signed_register_value() {
        let mut decoder = Decoder::new("lo:-8,hi:8").unwrap();
        decoder.set_value(-2i64);
        assert_eq!(decoder.value("lo"), Ok(-2));
        assert_eq!(decoder.value("hi"), Ok(255));
    }

    #[test]
    fn test_unknown_field() {
        let decoder = Decoder::new("a:8").unwrap();
        assert_eq!(
            decoder.decode(1, "b"),
            Err(DecodeError::UnknownField("b".to_string()))
        );
        assert_eq!(
            decoder.decode_many(&PackedValue::Flat(vec![1, 2]), "b"),
            Err(DecodeError::UnknownField("b".to_string()))
        );
    }

    #[test]
    fn test_decode_many_shapes() {
        let decoder = Decoder::new("x:16,y:-16").unwrap();

        assert_eq!(
            decoder.decode_many(&PackedValue::Scalar(2682840153), "y"),
            Ok(DecodedValue::Scalar(-24600))
        );

        let flat = PackedValue::from(vec![24947260u64, 2682840153]);
        assert_eq!(
            decoder.decode_many(&flat, "y"),
            Ok(DecodedValue::Flat(vec![380, -24600]))
        );

        let jagged = PackedValue::from(vec![vec![5873629u64], vec![], vec![2860302816, 0]]);
        assert_eq!(
            decoder.decode_many(&jagged, "x"),
            Ok(DecodedValue::Nested(vec![
                DecodedValue::Flat(vec![40925]),
                DecodedValue::Flat(vec![]),
                DecodedValue::Flat(vec![49632, 0]),
            ]))
        );
    }

    #[test]
    fn test_decode_slice_matches_scalar() {
        let decoder = Decoder::new("x:16,y:-16").unwrap();
        let values = [24947260u64, 5873629, 2682840153, 2860302816];
        let bulk = decoder.decode_slice(&values, "y").unwrap();

        for (value, decoded) in values.iter().zip(bulk) {
            assert_eq!(decoder.decode(*value, "y"), Ok(decoded));
        }
    }

    #[test]
    fn test_decode_all() {
        let decoder = Decoder::new("sys:2,name:2,type:4").unwrap();
        assert_eq!(
            decoder.decode_all(21),
            Ok(vec![
                ("sys".to_string(), 1),
                ("name".to_string(), 1),
                ("type".to_string(), 1)
            ])
        );
    }

    #[test]
    fn test_encode() {
        let decoder = Decoder::new("x:16,y:-16").unwrap();
        assert_eq!(decoder.encode([("x", 58457), ("y", -24600)]), Ok(2682840153));
        assert_eq!(decoder.encode([("y", -1)]), Ok(0xFFFF_0000));
        assert_eq!(
            decoder.encode([("z", 1)]),
            Err(DecodeError::UnknownField("z".to_string()))
        );
        assert!(matches!(
            decoder.encode([("y", 40000)]),
            Err(DecodeError::FieldRange { .. })
        ));

        let record = decoder.decode_all(2860302816).unwrap();
        assert_eq!(decoder.encode(record), Ok(2860302816));
    }

    #[test]
    fn test_strict_mode_accepts_valid_values() {
        let mut config = DecoderConfig::new();
        config.set_strict(true);
        let decoder = Decoder::with_config("x:-16,y:-16", config).unwrap();
        assert_eq!(decoder.decode(4294967295, "x"), Ok(-1));
        assert_eq!(decoder.decode_slice(&[0, 65535], "x"), Ok(vec![0, -1]));
    }

    #[test]
    fn test_overlap_policy_from_config() {
        let mut config = DecoderConfig::new();
        config.set_overlap(OverlapPolicy::Reject);
        assert!(matches!(
            Decoder::with_config("a:8,b:0:4", config),
            Err(SchemaError::OverlappingFields { .. })
        ));
        assert!(Decoder::new("a:8,b:0:4").is_ok());
    }

    #[test]
    fn test_overlapping_fields_decode_shared_bits() {
        let decoder = Decoder::new("byte:8,low:0:4").unwrap();
        assert_eq!(decoder.decode(0xAB, "byte"), Ok(0xAB));
        assert_eq!(decoder.decode(0xAB, "low"), Ok(0xB));
    }
}
