use serde::{Deserialize, Serialize};

/// Raw tokens that mean "no value". `None` and `nan` match case-insensitively.
pub const MISSING_SENTINELS: [&str; 4] = ["", "-", "None", "nan"];

/// Cell values counted as `ones` in a binary-flag column.
pub const TRUTHY_TOKENS: [&str; 3] = ["1", "true", "True"];
/// Cell values counted as `zeros` in a binary-flag column.
pub const FALSY_TOKENS: [&str; 3] = ["0", "false", "False"];

/// Returns true when the trimmed cell is one of the missing-value sentinels.
pub fn is_missing(raw: &str) -> bool {
    let v = raw.trim();
    MISSING_SENTINELS
        .iter()
        .any(|s| v.eq_ignore_ascii_case(s))
}

/// How a column is summarised. Decided from its name and the profile, never from its values.
#[derive(Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash, Debug)]
pub enum ColumnKind {
    Numeric,
    BinaryFlag,
    Categorical,
    Structured,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "Numeric",
            Self::BinaryFlag => "BinaryFlag",
            Self::Categorical => "Categorical",
            Self::Structured => "Structured",
        }
    }

    /// Structured columns only feed derived columns and never get a bundle of their own.
    pub fn is_summarised(&self) -> bool {
        !matches!(self, Self::Structured)
    }
}

/// Outcome of a tolerant parse. Failure is a value, never an error.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Parsed<T> {
    Value(T),
    Absent,
}

impl<T> Parsed<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl<T> From<Option<T>> for Parsed<T> {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Absent, Self::Value)
    }
}

/// A decoded nested cell. Decoding failures collapse to the empty shape that was asked for.
#[derive(Clone, PartialEq, Debug)]
pub enum Structured {
    Mapping(serde_json::Map<String, serde_json::Value>),
    Sequence(Vec<serde_json::Value>),
}

impl Structured {
    pub fn empty_mapping() -> Self {
        Self::Mapping(serde_json::Map::new())
    }

    pub fn empty_sequence() -> Self {
        Self::Sequence(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Mapping(m) => m.is_empty(),
            Self::Sequence(s) => s.is_empty(),
        }
    }
}

/// Distribution of the parseable values. Only the counts are present when nothing parsed.
#[derive(Clone, Deserialize, Serialize, PartialEq, Debug, Default)]
pub struct NumericStats {
    pub count: usize,
    /// Non-sentinel values that did not parse as numbers.
    pub excluded: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std_dev: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p25: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p50: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p75: Option<f64>,
}

/// Truthy and falsy token counts. Other values count towards `count` only.
#[derive(Clone, Deserialize, Serialize, PartialEq, Debug, Default)]
pub struct BinaryFlagStats {
    pub count: usize,
    pub ones: usize,
    pub zeros: usize,
    pub percent_ones: f64,
}

/// Value frequencies. Ties rank in first-seen order.
#[derive(Clone, Deserialize, Serialize, PartialEq, Eq, Debug, Default)]
pub struct CategoricalStats {
    pub count: usize,
    pub unique: usize,
    pub most_common_value: Option<String>,
    pub most_common_count: usize,
    /// Up to five `(value, count)` pairs, most frequent first.
    pub top_values: Vec<(String, usize)>,
}

/// Statistics for one column, shaped by its kind.
#[derive(Clone, Deserialize, Serialize, PartialEq, Debug)]
#[serde(tag = "kind")]
pub enum StatBundle {
    Numeric(NumericStats),
    BinaryFlag(BinaryFlagStats),
    Categorical(CategoricalStats),
}

impl StatBundle {
    pub fn count(&self) -> usize {
        match self {
            Self::Numeric(s) => s.count,
            Self::BinaryFlag(s) => s.count,
            Self::Categorical(s) => s.count,
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Numeric(_) => ColumnKind::Numeric,
            Self::BinaryFlag(_) => ColumnKind::BinaryFlag,
            Self::Categorical(_) => ColumnKind::Categorical,
        }
    }
}

#[derive(Clone, Deserialize, Serialize, PartialEq, Debug)]
pub struct ColumnSummary {
    pub name: String,
    pub stats: StatBundle,
}

/// Ordered per-column bundles for one slice of the dataset.
#[derive(Clone, Deserialize, Serialize, PartialEq, Debug, Default)]
pub struct SummaryRecord {
    pub columns: Vec<ColumnSummary>,
}

impl SummaryRecord {
    pub fn get(&self, name: &str) -> Option<&StatBundle> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.stats)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Summary of the records sharing one key tuple.
#[derive(Clone, Deserialize, Serialize, PartialEq, Debug)]
pub struct GroupSection {
    pub key_columns: Vec<String>,
    pub key: Vec<String>,
    /// Records in the group, including those with missing cells.
    pub rows: usize,
    pub summary: SummaryRecord,
}

impl GroupSection {
    /// Section heading, e.g. `Group: source = web, lang = en`.
    pub fn title(&self) -> String {
        let parts: Vec<String> = self
            .key_columns
            .iter()
            .zip(&self.key)
            .map(|(col, val)| format!("{col} = {val}"))
            .collect();
        format!("Group: {}", parts.join(", "))
    }
}

/// Every group of one key set, in first-seen order.
#[derive(Clone, Deserialize, Serialize, PartialEq, Debug)]
pub struct KeySetReport {
    pub key_columns: Vec<String>,
    pub groups: Vec<GroupSection>,
}

/// The overall summary followed by each key set's groups, in profile order.
#[derive(Clone, Deserialize, Serialize, PartialEq, Debug)]
pub struct Report {
    pub profile: String,
    pub row_count: usize,
    pub overall: SummaryRecord,
    pub key_sets: Vec<KeySetReport>,
}
