//! Per-column statistic bundles.
//!
//! Inputs are the trimmed, non-sentinel cells of one column for one slice of
//! the dataset. Numeric bundles use population standard deviation and linear
//! quantiles. An empty numeric column carries only its counts so that "no
//! data" stays distinguishable from "all zeros".

use super::parsing::parse_number;
use super::types::{
    BinaryFlagStats, CategoricalStats, ColumnKind, FALSY_TOKENS, NumericStats, StatBundle,
    TRUTHY_TOKENS,
};
use polars::prelude::*;
use std::collections::HashMap;

pub const TOP_VALUES_LIMIT: usize = 5;

/// Returns `None` for structured columns, which are summarised through their derived columns.
pub fn summarize(kind: ColumnKind, values: &[&str]) -> Option<StatBundle> {
    match kind {
        ColumnKind::Numeric => Some(StatBundle::Numeric(analyse_numeric(values))),
        ColumnKind::BinaryFlag => Some(StatBundle::BinaryFlag(analyse_binary(values))),
        ColumnKind::Categorical => Some(StatBundle::Categorical(analyse_categorical(values))),
        ColumnKind::Structured => None,
    }
}

pub fn analyse_numeric(values: &[&str]) -> NumericStats {
    let nums: Vec<f64> = values
        .iter()
        .filter_map(|v| parse_number(v).value())
        .collect();
    let count = nums.len();
    let excluded = values.len() - count;

    if count == 0 {
        return NumericStats {
            count,
            excluded,
            ..Default::default()
        };
    }

    let mean = nums.iter().sum::<f64>() / count as f64;
    let variance = nums.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / count as f64;
    let min = nums.iter().copied().fold(f64::INFINITY, f64::min);
    let max = nums.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let ca = Float64Chunked::from_vec("values".into(), nums);
    let quantile = |p: f64| ca.quantile(p, QuantileMethod::Linear).unwrap_or(None);

    NumericStats {
        count,
        excluded,
        mean: Some(mean),
        min: Some(min),
        max: Some(max),
        std_dev: Some(variance.sqrt()),
        p25: quantile(0.25),
        p50: quantile(0.5),
        p75: quantile(0.75),
    }
}

pub fn analyse_binary(values: &[&str]) -> BinaryFlagStats {
    let count = values.len();
    let ones = values.iter().filter(|v| TRUTHY_TOKENS.contains(*v)).count();
    let zeros = values.iter().filter(|v| FALSY_TOKENS.contains(*v)).count();
    let percent_ones = if count > 0 {
        100.0 * ones as f64 / count as f64
    } else {
        0.0
    };

    BinaryFlagStats {
        count,
        ones,
        zeros,
        percent_ones,
    }
}

/// Frequency table in first-seen order.
pub fn frequencies<'a>(values: &[&'a str]) -> Vec<(&'a str, usize)> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut freq: Vec<(&str, usize)> = Vec::new();
    for &v in values {
        match slots.get(v) {
            Some(&slot) => {
                if let Some(entry) = freq.get_mut(slot) {
                    entry.1 += 1;
                }
            }
            None => {
                slots.insert(v, freq.len());
                freq.push((v, 1));
            }
        }
    }
    freq
}

pub fn analyse_categorical(values: &[&str]) -> CategoricalStats {
    let freq = frequencies(values);

    // Stable sort keeps first-seen order among equal counts.
    let mut ranked = freq.clone();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let (most_common_value, most_common_count) = ranked
        .first()
        .map(|(v, c)| (Some((*v).to_owned()), *c))
        .unwrap_or((None, 0));

    CategoricalStats {
        count: values.len(),
        unique: freq.len(),
        most_common_value,
        most_common_count,
        top_values: ranked
            .into_iter()
            .take(TOP_VALUES_LIMIT)
            .map(|(v, c)| (v.to_owned(), c))
            .collect(),
    }
}
