//! Schema: ordered set of [FieldSpec]s built from a description string.

use std::{collections::HashMap, fmt, str::FromStr};

use tracing::{debug, warn};

use crate::{
    config::OverlapPolicy,
    description::{Clause, parse_clauses},
    errors::SchemaError,
    field::FieldSpec,
};

/// An immutable, ordered table of fields. Use [Schema::parse] to build one from
/// a description such as `"system:8,barrel:8:3,x:32:-16,y:-16"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Fields in declaration order.
    fields: Vec<FieldSpec>,
    index: HashMap<String, usize>,
    total_bits: u32,
}

impl Schema {
    /// Parses a description, allowing explicit-offset fields to overlap.
    pub fn parse(description: &str) -> Result<Self, SchemaError> {
        Self::parse_with(description, OverlapPolicy::default())
    }

    /// Parses a description, applying `overlap` to fields that share bits.
    ///
    /// `name:width` clauses are placed at the running offset, which starts at 0.
    /// `name:offset:width` clauses are placed where they say, and move the
    /// running offset past their end if they reach further than it.
    pub fn parse_with(description: &str, overlap: OverlapPolicy) -> Result<Self, SchemaError> {
        Self::from_clauses(parse_clauses(description)?, overlap)
    }

    /// Places clauses one after another, resolving implicit offsets.
    pub(crate) fn from_clauses<'a, I>(clauses: I, overlap: OverlapPolicy) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = Clause<'a>>,
    {
        let mut fields = Vec::new();
        let mut cursor = 0i64;

        for clause in clauses {
            let offset = clause.offset.unwrap_or(cursor);
            let field = FieldSpec::new(clause.name, offset, clause.width)?;
            cursor = cursor.max(field.end() as i64);
            fields.push(field);
        }

        Self::compile(fields, overlap)
    }

    /// Builds a schema from fields that were constructed elsewhere.
    pub fn compile(fields: Vec<FieldSpec>, overlap: OverlapPolicy) -> Result<Self, SchemaError> {
        let mut index = HashMap::with_capacity(fields.len());

        for (position, field) in fields.iter().enumerate() {
            if index.insert(field.name().to_string(), position).is_some() {
                return Err(SchemaError::DuplicateField(field.name().to_string()));
            }
        }

        for (position, second) in fields.iter().enumerate() {
            for first in &fields[..position] {
                if !first.overlaps(second) {
                    continue;
                }
                match overlap {
                    OverlapPolicy::Allow => {
                        warn!(
                            first = first.name(),
                            second = second.name(),
                            "schema fields share bits"
                        );
                    }
                    OverlapPolicy::Reject => {
                        return Err(SchemaError::OverlappingFields {
                            first: first.name().to_string(),
                            second: second.name().to_string(),
                        });
                    }
                }
            }
        }

        let total_bits = fields.iter().map(FieldSpec::end).max().unwrap_or(0);

        for field in &fields {
            debug!(
                field = field.name(),
                offset = field.offset(),
                width = field.width(),
                signed = field.is_signed(),
                min = %field.min_val(),
                max = %field.max_val(),
                "schema field"
            );
        }
        debug!(fields = fields.len(), total_bits, "compiled schema");

        Ok(Self {
            fields,
            index,
            total_bits,
        })
    }

    /// Looks up a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.index.get(name).map(|&position| &self.fields[position])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldSpec> {
        self.fields.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldSpec::name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// One past the highest bit used by any field.
    pub fn total_bits(&self) -> u32 {
        self.total_bits
    }

    /// Canonical description with every offset spelled out, e.g. `"x:0:16,y:16:-16"`.
    /// Parsing it yields an equal schema.
    pub fn to_description(&self) -> String {
        self.fields
            .iter()
            .map(FieldSpec::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromStr for Schema {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a FieldSpec;
    type IntoIter = std::slice::Iter<'a, FieldSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Renders a table of every field with its layout and value range.
impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<10} {:<8} {:<15} {:<10} {:<22} {:<22}",
            "Field", "Offset", "Width (bits)", "Signed", "Min Value", "Max Value"
        )?;
        writeln!(f, "{}", "-".repeat(92))?;

        for field in &self.fields {
            writeln!(
                f,
                "{:<10} {:<8} {:<15} {:<10} {:<22} {:<22}",
                field.name(),
                field.offset(),
                field.width(),
                if field.is_signed() { "Yes" } else { "No" },
                field.min_val(),
                field.max_val()
            )?;
        }

        Ok(())
    }
}
