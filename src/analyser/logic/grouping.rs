use super::io::{Dataset, Record};
use super::types::is_missing;
use std::collections::HashMap;

/// Records sharing one key tuple. Records are borrowed, never copied.
#[derive(Debug)]
pub struct Group<'a> {
    pub key: Vec<String>,
    pub records: Vec<&'a Record>,
}

/// Partitions `records` by the trimmed values of `key_columns`.
///
/// Records with any missing key component are dropped. Groups come out in the
/// order their key was first seen and keep the input record order.
pub fn group_records<'a>(
    dataset: &Dataset,
    records: &[&'a Record],
    key_columns: &[String],
) -> Vec<Group<'a>> {
    let Some(indices) = key_columns
        .iter()
        .map(|c| dataset.column_index(c))
        .collect::<Option<Vec<usize>>>()
    else {
        tracing::debug!("Key columns {:?} not all present; no groups", key_columns);
        return Vec::new();
    };

    let mut slots: HashMap<Vec<String>, usize> = HashMap::new();
    let mut groups: Vec<Group<'a>> = Vec::new();

    for &record in records {
        let key: Vec<String> = indices
            .iter()
            .map(|&i| record.cell(i).unwrap_or("").trim().to_owned())
            .collect();
        if key.iter().any(|k| is_missing(k)) {
            continue;
        }
        match slots.get(&key) {
            Some(&slot) => {
                if let Some(group) = groups.get_mut(slot) {
                    group.records.push(record);
                }
            }
            None => {
                slots.insert(key.clone(), groups.len());
                groups.push(Group {
                    key,
                    records: vec![record],
                });
            }
        }
    }
    groups
}

/// Groups every record of the dataset.
pub fn group_dataset<'a>(dataset: &'a Dataset, key_columns: &[String]) -> Vec<Group<'a>> {
    let all: Vec<&Record> = dataset.records().iter().collect();
    group_records(dataset, &all, key_columns)
}
