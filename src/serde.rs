//! JSON-deserializable schema description.
//!
//! An alternative to the compact description string for schemas shipped as
//! configuration files:
//!
//! ```json
//! {
//!   "fields": [
//!     { "name": "x", "width": 16 },
//!     { "name": "y", "offset": 16, "width": -16 }
//!   ],
//!   "overlap": "reject"
//! }
//! ```
//!
//! Fields follow the same placement rules as the string form: without an
//! `offset` a field starts where the previous fields end.

use serde::{Deserialize, Serialize};

use crate::{
    config::OverlapPolicy, description::Clause, errors::SchemaError, schema::Schema,
};

/// Top-level schema definition consisting of a list of fields.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SchemaDef {
    /// Fields in declaration order.
    pub fields: Vec<FieldDef>,
    /// How to treat fields that share bits.
    #[serde(default)]
    pub overlap: OverlapPolicy,
}

/// Description of a single field.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Name used to look the field up when decoding.
    pub name: String,
    /// Bit position of the least significant bit; omitted for implicit placement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    /// Bit count; negative for two's-complement fields.
    pub width: i64,
}

impl TryFrom<&SchemaDef> for Schema {
    type Error = SchemaError;

    fn try_from(def: &SchemaDef) -> Result<Self, Self::Error> {
        let clauses = def.fields.iter().map(|field| Clause {
            name: &field.name,
            offset: field.offset,
            width: field.width,
        });

        Schema::from_clauses(clauses, def.overlap)
    }
}

impl TryFrom<SchemaDef> for Schema {
    type Error = SchemaError;

    fn try_from(def: SchemaDef) -> Result<Self, Self::Error> {
        Schema::try_from(&def)
    }
}

/// Every field is written with an explicit offset.
impl From<&Schema> for SchemaDef {
    fn from(schema: &Schema) -> Self {
        SchemaDef {
            fields: schema
                .iter()
                .map(|field| {
                    let width = i64::from(field.width());
                    FieldDef {
                        name: field.name().to_string(),
                        offset: Some(i64::from(field.offset())),
                        width: if field.is_signed() { -width } else { width },
                    }
                })
                .collect(),
            overlap: OverlapPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{config::DecoderConfig, value::PackedValue};

    use super::*;

    #[test]
    fn test_schema_from_json() {
        let json = r#"{
            "fields": [
                { "name": "x", "width": 16 },
                { "name": "y", "width": -16 }
            ]
        }"#;
        let def: SchemaDef = serde_json::from_str(json).unwrap();
        let schema = Schema::try_from(def).unwrap();

        assert_eq!(schema, Schema::parse("x:0:16,y:16:-16").unwrap());
    }

    #[test]
    fn test_overlap_policy_from_json() {
        let json = r#"{
            "fields": [
                { "name": "byte", "width": 8 },
                { "name": "low", "offset": 0, "width": 4 }
            ],
            "overlap": "reject"
        }"#;
        let def: SchemaDef = serde_json::from_str(json).unwrap();

        assert!(matches!(
            Schema::try_from(&def),
            Err(SchemaError::OverlappingFields { .. })
        ));
    }

    #[test]
    fn test_schema_def_round_trip() {
        let schema = Schema::parse("system:4,cryo:1,x:32:-16,y:-16").unwrap();
        let json = serde_json::to_string(&SchemaDef::from(&schema)).unwrap();
        let def: SchemaDef = serde_json::from_str(&json).unwrap();

        assert_eq!(Schema::try_from(def).unwrap(), schema);
    }

    #[test]
    fn test_config_from_json() {
        let config: DecoderConfig = serde_json::from_str(r#"{ "strict": true }"#).unwrap();
        assert!(config.strict);
        assert_eq!(config.overlap, OverlapPolicy::Allow);
    }

    #[test]
    fn test_packed_value_shapes_from_json() {
        let scalar: PackedValue = serde_json::from_str("21").unwrap();
        assert_eq!(scalar, PackedValue::Scalar(21));

        let flat: PackedValue = serde_json::from_str("[1, 2]").unwrap();
        assert_eq!(flat, PackedValue::Flat(vec![1, 2]));

        let nested: PackedValue = serde_json::from_str("[[1], [2, 3], []]").unwrap();
        assert_eq!(
            nested,
            PackedValue::Nested(vec![
                PackedValue::Flat(vec![1]),
                PackedValue::Flat(vec![2, 3]),
                PackedValue::Flat(vec![]),
            ])
        );
    }
}
