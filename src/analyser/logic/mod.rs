pub mod analysis;
pub mod classify;
pub mod cleaning;
pub mod grouping;
pub mod io;
pub mod parsing;
pub mod profiling;
pub mod types;

pub use analysis::{build_report, classify_dataset, summarize_records};
pub use classify::{Classification, ColumnSchema};
pub use cleaning::{Derivation, apply_derivations};
pub use grouping::{Group, group_dataset, group_records};
pub use io::{Dataset, Record, load_dataset};
pub use parsing::{parse_mapping, parse_number, parse_sequence, parse_structured};
pub use profiling::summarize;
pub use types::{
    BinaryFlagStats, CategoricalStats, ColumnKind, ColumnSummary, GroupSection, KeySetReport,
    NumericStats, Parsed, Report, StatBundle, Structured, SummaryRecord, is_missing,
};

#[cfg(test)]
mod tests;
