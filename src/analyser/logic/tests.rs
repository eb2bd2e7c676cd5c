use super::*;
use crate::config::{ColumnScope, DatasetProfile};
use anyhow::Result;

fn posts() -> Dataset {
    Dataset::from_rows(
        ["source", "lang", "likeCount", "isQuote", "url", "extra"],
        vec![
            vec!["web", "en", "10", "1", "a", "x"],
            vec!["ios", "en", "1,200", "0", "b", "x"],
            vec!["web", "fr", "n/a", "true", "a", "x"],
            vec!["nan", "en", "5", "False", "c", "x"],
            vec!["web", "en", "", "1", "-", "x"],
            vec!["ios", "None", "7", "maybe", "b", "x"],
        ],
    )
}

fn posts_profile() -> DatasetProfile {
    DatasetProfile {
        name: "posts".to_owned(),
        schema: ColumnSchema {
            numeric: vec!["likeCount".to_owned(), "retweetCount".to_owned()],
            binary: vec!["isQuote".to_owned()],
            categorical: vec!["source".to_owned(), "url".to_owned()],
            ..Default::default()
        },
        group_by: vec![
            vec!["source".to_owned()],
            vec!["source".to_owned(), "lang".to_owned()],
        ],
        ..Default::default()
    }
}

fn numeric(summary: &SummaryRecord, name: &str) -> NumericStats {
    match summary.get(name) {
        Some(StatBundle::Numeric(s)) => s.clone(),
        other => panic!("expected numeric bundle for {name}, got {other:?}"),
    }
}

#[test]
fn test_overall_summary_covers_all_columns() -> Result<()> {
    let report = build_report(posts(), &posts_profile())?;
    let names: Vec<&str> = report
        .overall
        .columns
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["source", "lang", "likeCount", "isQuote", "url", "extra"]);
    assert_eq!(report.row_count, 6);
    assert_eq!(
        report.overall.get("isQuote").map(StatBundle::kind),
        Some(ColumnKind::BinaryFlag)
    );
    assert_eq!(
        report.overall.get("extra").map(StatBundle::kind),
        Some(ColumnKind::Categorical)
    );

    let likes = numeric(&report.overall, "likeCount");
    assert_eq!(likes.count, 4);
    assert_eq!(likes.max, Some(1200.0));
    Ok(())
}

#[test]
fn test_numeric_count_plus_excluded_matches_rows_in_scope() -> Result<()> {
    let ds = posts();
    let non_sentinel = ds
        .records()
        .iter()
        .filter(|r| !is_missing(ds.value(r, "likeCount").unwrap_or("")))
        .count();
    let report = build_report(ds, &posts_profile())?;
    let likes = numeric(&report.overall, "likeCount");
    assert_eq!(likes.count + likes.excluded, non_sentinel);
    assert_eq!(likes.excluded, 1);
    Ok(())
}

#[test]
fn test_group_counts_sum_to_overall() -> Result<()> {
    let report = build_report(posts(), &posts_profile())?;
    for key_set in &report.key_sets {
        for column in &report.overall.columns {
            if key_set.key_columns.contains(&column.name) {
                continue;
            }
            let grouped: usize = key_set
                .groups
                .iter()
                .filter_map(|g| g.summary.get(&column.name))
                .map(StatBundle::count)
                .sum();
            // Rows with a missing key are outside every group.
            assert!(grouped <= column.stats.count(), "{}", column.name);
        }
    }

    // The single-key set only drops the `nan` source row.
    let by_source = report.key_sets.first().expect("source key set");
    let url_total: usize = by_source
        .groups
        .iter()
        .filter_map(|g| g.summary.get("url"))
        .map(StatBundle::count)
        .sum();
    assert_eq!(url_total, 4);
    Ok(())
}

#[test]
fn test_group_merge_conserves_counts_without_missing_keys() -> Result<()> {
    let ds = Dataset::from_rows(
        ["a", "b", "v"],
        vec![
            vec!["x", "1", "1"],
            vec!["y", "1", "2"],
            vec!["x", "2", "3"],
            vec!["x", "1", ""],
        ],
    );
    let profile = DatasetProfile {
        schema: ColumnSchema {
            numeric: vec!["v".to_owned()],
            ..Default::default()
        },
        group_by: vec![vec!["a".to_owned(), "b".to_owned()]],
        ..Default::default()
    };
    let report = build_report(ds, &profile)?;
    let overall = numeric(&report.overall, "v").count;
    let key_set = report.key_sets.first().expect("key set");
    let merged: usize = key_set
        .groups
        .iter()
        .map(|g| numeric(&g.summary, "v").count)
        .sum();
    assert_eq!(merged, overall);
    assert_eq!(overall, 3);
    Ok(())
}

#[test]
fn test_sentinel_key_rows_excluded() -> Result<()> {
    let report = build_report(posts(), &posts_profile())?;
    let composite = report.key_sets.get(1).expect("composite key set");
    let rows: usize = composite.groups.iter().map(|g| g.rows).sum();
    // `nan` source and `None` lang rows are dropped.
    assert_eq!(rows, 6 - 2);

    let titles: Vec<String> = composite.groups.iter().map(GroupSection::title).collect();
    assert_eq!(
        titles,
        vec![
            "Group: source = web, lang = en",
            "Group: source = ios, lang = en",
            "Group: source = web, lang = fr",
        ]
    );
    Ok(())
}

#[test]
fn test_binary_and_categorical_in_groups() -> Result<()> {
    let report = build_report(posts(), &posts_profile())?;
    let by_source = report.key_sets.first().expect("source key set");
    let web = by_source.groups.first().expect("web group");
    assert_eq!(web.key, vec!["web".to_owned()]);

    match web.summary.get("isQuote") {
        Some(StatBundle::BinaryFlag(s)) => {
            assert_eq!((s.count, s.ones, s.zeros), (3, 3, 0));
        }
        other => panic!("expected flag bundle, got {other:?}"),
    }
    match web.summary.get("url") {
        Some(StatBundle::Categorical(s)) => {
            assert_eq!(s.count, 2);
            assert_eq!(s.most_common_value.as_deref(), Some("a"));
        }
        other => panic!("expected categorical bundle, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_empty_group_column_gets_zero_count() -> Result<()> {
    let report = build_report(posts(), &posts_profile())?;
    let composite = report.key_sets.get(1).expect("composite key set");
    let web_fr = composite.groups.get(2).expect("web/fr group");
    let likes = numeric(&web_fr.summary, "likeCount");
    assert_eq!(likes.count, 0);
    assert_eq!(likes.mean, None);
    Ok(())
}

#[test]
fn test_declared_only_scope_skips_missing_columns() -> Result<()> {
    let profile = DatasetProfile {
        scope: ColumnScope::DeclaredOnly,
        ..posts_profile()
    };
    let report = build_report(posts(), &profile)?;
    let names: Vec<&str> = report
        .overall
        .columns
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    // retweetCount is declared but absent.
    assert_eq!(names, vec!["likeCount", "source", "url", "isQuote"]);
    Ok(())
}

#[test]
fn test_structured_columns_feed_derivations_only() -> Result<()> {
    let ds = Dataset::from_rows(
        ["page_id", "publisher_platforms", "illuminating_mentions"],
        vec![
            vec!["p1", "['facebook', 'instagram']", "['a', 'b']"],
            vec!["p1", "['messenger']", "[]"],
            vec!["p2", "garbage", "['c']"],
        ],
    );
    let report = build_report(ds, &DatasetProfile::facebook_ads())?;
    assert!(report.overall.get("publisher_platforms").is_none());

    let mentions = numeric(&report.overall, "mention_count");
    assert_eq!(mentions.count, 3);
    assert_eq!(mentions.mean, Some(1.0));

    match report.overall.get("is_facebook") {
        Some(StatBundle::BinaryFlag(s)) => assert_eq!((s.ones, s.zeros), (1, 2)),
        other => panic!("expected flag bundle, got {other:?}"),
    }
    // Absent source columns still derive zero totals.
    let spend = numeric(&report.overall, "delivery_region_total_spend");
    assert_eq!(spend.count, 3);
    assert_eq!(spend.max, Some(0.0));

    // first_mention of an empty list is the `None` sentinel.
    match report.overall.get("first_mention") {
        Some(StatBundle::Categorical(s)) => assert_eq!(s.count, 2),
        other => panic!("expected categorical bundle, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_report_is_idempotent() -> Result<()> {
    let first = build_report(posts(), &posts_profile())?;
    let second = build_report(posts(), &posts_profile())?;
    assert_eq!(first, second);
    assert_eq!(
        crate::export::render_report(&first),
        crate::export::render_report(&second)
    );
    Ok(())
}
