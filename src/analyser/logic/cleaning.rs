//! Derived columns computed from structured cells before classification.
//!
//! Every derivation reads one source column, decodes it with the tolerant
//! parsers and appends a text column so later stages see a uniform table.

use super::io::Dataset;
use super::parsing::{parse_mapping, parse_number, parse_sequence, value_to_cell};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Derivation {
    /// Sum of `value[field]` over every value of a mapping cell.
    MappingFieldTotal {
        source: String,
        field: String,
        name: String,
    },
    /// Number of entries in a sequence cell.
    SequenceLength { source: String, name: String },
    /// First entry of a sequence cell, or `None`.
    SequenceFirst { source: String, name: String },
    /// `1` when a sequence cell contains `item`, else `0`.
    SequenceContains {
        source: String,
        item: String,
        name: String,
    },
}

impl Derivation {
    pub fn name(&self) -> &str {
        match self {
            Self::MappingFieldTotal { name, .. }
            | Self::SequenceLength { name, .. }
            | Self::SequenceFirst { name, .. }
            | Self::SequenceContains { name, .. } => name,
        }
    }

    pub fn source(&self) -> &str {
        match self {
            Self::MappingFieldTotal { source, .. }
            | Self::SequenceLength { source, .. }
            | Self::SequenceFirst { source, .. }
            | Self::SequenceContains { source, .. } => source,
        }
    }

    /// Derives one cell from a raw source cell.
    pub fn derive(&self, raw: &str) -> String {
        match self {
            Self::MappingFieldTotal { field, .. } => {
                let total = parse_mapping(raw)
                    .values()
                    .map(|entry| field_number(entry, field))
                    .fold(0.0, |acc, v| acc + v);
                format_number(total)
            }
            Self::SequenceLength { .. } => parse_sequence(raw).len().to_string(),
            Self::SequenceFirst { .. } => parse_sequence(raw)
                .first()
                .map(value_to_cell)
                .unwrap_or_else(|| "None".to_owned()),
            Self::SequenceContains { item, .. } => {
                let found = parse_sequence(raw)
                    .iter()
                    .any(|v| v.as_str() == Some(item.as_str()));
                if found { "1" } else { "0" }.to_owned()
            }
        }
    }
}

fn field_number(entry: &Value, field: &str) -> f64 {
    match entry.get(field) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => parse_number(s).value().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Integral totals print without a fractional part so they read like the source data.
pub fn format_number(v: f64) -> String {
    // Negative zero would print as "-0".
    let v = if v == 0.0 { 0.0 } else { v };
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        v.to_string()
    }
}

/// Appends every derived column to the dataset, in declaration order.
pub fn apply_derivations(dataset: &mut Dataset, derivations: &[Derivation]) -> Result<()> {
    for derivation in derivations {
        if !dataset.has_column(derivation.source()) {
            tracing::debug!(
                "Source column '{}' missing; '{}' derives from empty values",
                derivation.source(),
                derivation.name()
            );
        }
        let values: Vec<String> = dataset
            .records()
            .iter()
            .map(|record| derivation.derive(dataset.value(record, derivation.source()).unwrap_or("")))
            .collect();
        dataset.push_column(derivation.name(), values)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(field: &str) -> Derivation {
        Derivation::MappingFieldTotal {
            source: "delivery_by_region".to_owned(),
            field: field.to_owned(),
            name: format!("delivery_region_total_{field}"),
        }
    }

    #[test]
    fn test_mapping_field_total() {
        let raw = "{'CA': {'spend': 100, 'impressions': 2000}, 'NY': {'spend': 50.5}, 'TX': {}}";
        assert_eq!(total("spend").derive(raw), "150.5");
        assert_eq!(total("impressions").derive(raw), "2000");
        assert_eq!(total("spend").derive("not a dict"), "0");
        assert_eq!(total("spend").derive("{broken"), "0");
        assert_eq!(total("spend").derive("{}"), "0");
        assert_eq!(total("spend").derive(""), "0");
    }

    #[test]
    fn test_sequence_derivations() {
        let raw = "['facebook', 'instagram']";
        let len = Derivation::SequenceLength {
            source: "s".to_owned(),
            name: "n".to_owned(),
        };
        let first = Derivation::SequenceFirst {
            source: "s".to_owned(),
            name: "f".to_owned(),
        };
        let contains = |item: &str| Derivation::SequenceContains {
            source: "s".to_owned(),
            item: item.to_owned(),
            name: format!("is_{item}"),
        };

        assert_eq!(len.derive(raw), "2");
        assert_eq!(len.derive(""), "0");
        assert_eq!(first.derive(raw), "facebook");
        assert_eq!(first.derive("[]"), "None");
        assert_eq!(contains("instagram").derive(raw), "1");
        assert_eq!(contains("messenger").derive(raw), "0");
    }

    #[test]
    fn test_apply_derivations_appends_columns() -> Result<()> {
        let mut ds = Dataset::from_rows(
            ["id", "publisher_platforms"],
            vec![vec!["1", "['facebook']"], vec!["2", "nan"]],
        );
        let derivations = vec![
            Derivation::SequenceContains {
                source: "publisher_platforms".to_owned(),
                item: "facebook".to_owned(),
                name: "is_facebook".to_owned(),
            },
            Derivation::SequenceLength {
                source: "illuminating_mentions".to_owned(),
                name: "mention_count".to_owned(),
            },
        ];
        apply_derivations(&mut ds, &derivations)?;

        assert_eq!(ds.headers().len(), 4);
        let cells: Vec<Option<&str>> = ds
            .records()
            .iter()
            .map(|r| ds.value(r, "is_facebook"))
            .collect();
        assert_eq!(cells, vec![Some("1"), Some("0")]);
        let counts: Vec<Option<&str>> = ds
            .records()
            .iter()
            .map(|r| ds.value(r, "mention_count"))
            .collect();
        assert_eq!(counts, vec![Some("0"), Some("0")]);
        Ok(())
    }

    #[test]
    fn test_derivation_serde_tagging() {
        let json = r#"{"type": "sequence_first", "source": "illuminating_mentions", "name": "first_mention"}"#;
        let parsed: Derivation = serde_json::from_str(json).expect("valid derivation");
        assert_eq!(parsed.name(), "first_mention");
        assert_eq!(parsed.source(), "illuminating_mentions");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(2.25), "2.25");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-2.5), "-2.5");
    }
}
