use super::classify::Classification;
use super::cleaning::apply_derivations;
use super::grouping::group_records;
use super::io::{Dataset, Record};
use super::profiling::summarize;
use super::types::{ColumnSummary, GroupSection, KeySetReport, Report, SummaryRecord, is_missing};
use crate::config::{ColumnScope, DatasetProfile};
use anyhow::{Context as _, Result};

/// Builds the overall summary and every grouped summary for a dataset.
///
/// The dataset is consumed: derived columns are added to this run's copy only.
pub fn build_report(mut dataset: Dataset, profile: &DatasetProfile) -> Result<Report> {
    apply_derivations(&mut dataset, &profile.derivations)
        .context("Failed to derive structured columns")?;

    let classification = classify_dataset(&dataset, profile);
    tracing::debug!(
        "Classified {} columns for profile '{}'",
        classification.len(),
        profile.name
    );

    let records: Vec<&Record> = dataset.records().iter().collect();
    let overall = summarize_records(&dataset, &records, &classification);

    let mut key_sets = Vec::with_capacity(profile.group_by.len());
    for key_columns in &profile.group_by {
        let groups = group_records(&dataset, &records, key_columns);
        tracing::info!("Grouped by {:?}: {} groups", key_columns, groups.len());

        let groups = groups
            .into_iter()
            .map(|group| GroupSection {
                key_columns: key_columns.clone(),
                rows: group.records.len(),
                summary: summarize_records(&dataset, &group.records, &classification),
                key: group.key,
            })
            .collect();
        key_sets.push(KeySetReport {
            key_columns: key_columns.clone(),
            groups,
        });
    }

    Ok(Report {
        profile: profile.name.clone(),
        row_count: dataset.row_count(),
        overall,
        key_sets,
    })
}

/// Classifies the columns this profile reports on. Declared columns absent from the data are skipped.
pub fn classify_dataset(dataset: &Dataset, profile: &DatasetProfile) -> Classification {
    match profile.scope {
        ColumnScope::AllColumns => Classification::build(
            dataset.headers().iter().map(String::as_str),
            &profile.schema,
        ),
        ColumnScope::DeclaredOnly => {
            let declared = profile.schema.declared_columns();
            let present = declared.into_iter().filter(|name| {
                let found = dataset.has_column(name);
                if !found {
                    tracing::debug!("Declared column '{}' not in dataset; skipping", name);
                }
                found
            });
            Classification::build(present, &profile.schema)
        }
    }
}

/// Summarises one slice of records column by column, in classification order.
pub fn summarize_records(
    dataset: &Dataset,
    records: &[&Record],
    classification: &Classification,
) -> SummaryRecord {
    let mut columns = Vec::with_capacity(classification.len());
    for (name, kind) in classification.iter() {
        if !kind.is_summarised() {
            continue;
        }
        let Some(index) = dataset.column_index(name) else {
            continue;
        };
        let values: Vec<&str> = records
            .iter()
            .filter_map(|r| r.cell(index))
            .map(str::trim)
            .filter(|v| !is_missing(v))
            .collect();
        if let Some(stats) = summarize(kind, &values) {
            columns.push(ColumnSummary {
                name: name.to_owned(),
                stats,
            });
        }
    }
    SummaryRecord { columns }
}
