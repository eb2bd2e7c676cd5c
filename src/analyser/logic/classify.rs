use super::types::ColumnKind;
use serde::{Deserialize, Serialize};

/// Declared column kinds plus the naming fallback used for undeclared columns.
///
/// Precedence: declared numeric, declared binary flag, declared structured,
/// declared categorical, then flag suffix/prefix, then `Categorical`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ColumnSchema {
    pub numeric: Vec<String>,
    pub binary: Vec<String>,
    pub structured: Vec<String>,
    pub categorical: Vec<String>,
    pub flag_suffixes: Vec<String>,
    pub flag_prefixes: Vec<String>,
}

impl ColumnSchema {
    pub fn classify(&self, name: &str) -> ColumnKind {
        let declared = |list: &[String]| list.iter().any(|c| c == name);

        if declared(self.numeric.as_slice()) {
            ColumnKind::Numeric
        } else if declared(self.binary.as_slice()) {
            ColumnKind::BinaryFlag
        } else if declared(self.structured.as_slice()) {
            ColumnKind::Structured
        } else if declared(self.categorical.as_slice()) {
            ColumnKind::Categorical
        } else if self.flag_suffixes.iter().any(|s| name.ends_with(s.as_str()))
            || self.flag_prefixes.iter().any(|p| name.starts_with(p.as_str()))
        {
            ColumnKind::BinaryFlag
        } else {
            ColumnKind::Categorical
        }
    }

    /// Declared columns in report order (numeric, categorical, binary), first declaration wins.
    pub fn declared_columns(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.numeric
            .iter()
            .chain(&self.categorical)
            .chain(&self.binary)
            .map(String::as_str)
            .filter(|name| seen.insert(*name))
            .collect()
    }
}

/// One kind per column, computed once per report.
#[derive(Clone, Debug, Default)]
pub struct Classification {
    columns: Vec<(String, ColumnKind)>,
}

impl Classification {
    pub fn build<'a>(names: impl IntoIterator<Item = &'a str>, schema: &ColumnSchema) -> Self {
        let columns = names
            .into_iter()
            .map(|name| (name.to_owned(), schema.classify(name)))
            .collect();
        Self { columns }
    }

    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, k)| *k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ColumnKind)> {
        self.columns.iter().map(|(n, k)| (n.as_str(), *k))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
