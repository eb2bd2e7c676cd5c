//! Dataset profiles: the declared schema a report run consumes.
//!
//! A profile names the numeric, binary-flag, structured and categorical
//! columns, the naming fallback for undeclared flag columns, the derived
//! columns to compute, and the key sets to group by. Three presets cover the
//! Facebook ads, Facebook posts and Twitter posts exports; any other layout
//! can be described in a JSON file.

use crate::analyser::logic::{ColumnSchema, Derivation};
use crate::error::{Result, ResultExt as _, SocialStatsError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which columns appear in each summary.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ColumnScope {
    /// Every dataset column in header order, derived columns last.
    #[default]
    AllColumns,
    /// Only declared columns: numeric, then categorical, then binary.
    DeclaredOnly,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatasetProfile {
    pub name: String,
    #[serde(flatten)]
    pub schema: ColumnSchema,
    #[serde(default)]
    pub derivations: Vec<Derivation>,
    #[serde(default)]
    pub group_by: Vec<Vec<String>>,
    #[serde(default)]
    pub scope: ColumnScope,
}

impl Default for DatasetProfile {
    fn default() -> Self {
        Self {
            name: "custom".to_owned(),
            schema: ColumnSchema::default(),
            derivations: Vec::new(),
            group_by: Vec::new(),
            scope: ColumnScope::AllColumns,
        }
    }
}

pub const PRESET_NAMES: [&str; 3] = ["fb-ads", "fb-posts", "tw-posts"];

const FLAG_SUFFIX: &str = "_illuminating";
const PLATFORMS: [&str; 4] = ["facebook", "instagram", "messenger", "audience_network"];

const TW_BINARY: [&str; 32] = [
    "election_integrity_Truth_illuminating",
    "advocacy_msg_type_illuminating",
    "issue_msg_type_illuminating",
    "attack_msg_type_illuminating",
    "image_msg_type_illuminating",
    "cta_msg_type_illuminating",
    "engagement_cta_subtype_illuminating",
    "fundraising_cta_subtype_illuminating",
    "voting_cta_subtype_illuminating",
    "covid_topic_illuminating",
    "economy_topic_illuminating",
    "education_topic_illuminating",
    "environment_topic_illuminating",
    "foreign_policy_topic_illuminating",
    "governance_topic_illuminating",
    "health_topic_illuminating",
    "immigration_topic_illuminating",
    "lgbtq_issues_topic_illuminating",
    "military_topic_illuminating",
    "race_and_ethnicity_topic_illuminating",
    "safety_topic_illuminating",
    "social_and_cultural_topic_illuminating",
    "technology_and_privacy_topic_illuminating",
    "womens_issue_topic_illuminating",
    "incivility_illuminating",
    "scam_illuminating",
    "freefair_illuminating",
    "fraud_illuminating",
    "isRetweet",
    "isQuote",
    "isConversationControlled",
    "z",
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

impl DatasetProfile {
    /// Looks up a built-in profile by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "fb-ads" => Some(Self::facebook_ads()),
            "fb-posts" => Some(Self::facebook_posts()),
            "tw-posts" => Some(Self::twitter_posts()),
            _ => None,
        }
    }

    pub fn facebook_ads() -> Self {
        let mut derivations = Vec::new();
        for (source, prefix) in [
            ("delivery_by_region", "delivery_region"),
            ("demographic_distribution", "demo_dist"),
        ] {
            for field in ["spend", "impressions"] {
                derivations.push(Derivation::MappingFieldTotal {
                    source: source.to_owned(),
                    field: field.to_owned(),
                    name: format!("{prefix}_total_{field}"),
                });
            }
        }
        for platform in PLATFORMS {
            derivations.push(Derivation::SequenceContains {
                source: "publisher_platforms".to_owned(),
                item: platform.to_owned(),
                name: format!("is_{platform}"),
            });
        }
        derivations.push(Derivation::SequenceLength {
            source: "illuminating_mentions".to_owned(),
            name: "mention_count".to_owned(),
        });
        derivations.push(Derivation::SequenceFirst {
            source: "illuminating_mentions".to_owned(),
            name: "first_mention".to_owned(),
        });

        Self {
            name: "fb-ads".to_owned(),
            schema: ColumnSchema {
                numeric: strings(&[
                    "estimated_audience_size",
                    "estimated_impressions",
                    "estimated_spend",
                    "delivery_region_total_spend",
                    "delivery_region_total_impressions",
                    "demo_dist_total_spend",
                    "demo_dist_total_impressions",
                    "mention_count",
                ]),
                structured: strings(&[
                    "delivery_by_region",
                    "demographic_distribution",
                    "publisher_platforms",
                    "illuminating_mentions",
                ]),
                flag_suffixes: strings(&[FLAG_SUFFIX]),
                flag_prefixes: strings(&["is_"]),
                ..Default::default()
            },
            derivations,
            group_by: vec![
                strings(&["page_id"]),
                strings(&["page_id", "bylines", "currency"]),
            ],
            scope: ColumnScope::AllColumns,
        }
    }

    pub fn facebook_posts() -> Self {
        Self {
            name: "fb-posts".to_owned(),
            schema: ColumnSchema {
                numeric: strings(&[
                    "Total Interactions",
                    "Likes",
                    "Comments",
                    "Shares",
                    "Love",
                    "Wow",
                    "Haha",
                    "Sad",
                    "Angry",
                ]),
                ..Default::default()
            },
            derivations: Vec::new(),
            group_by: vec![
                strings(&["Facebook_Id"]),
                strings(&["Facebook_Id", "Page Category"]),
            ],
            scope: ColumnScope::AllColumns,
        }
    }

    pub fn twitter_posts() -> Self {
        Self {
            name: "tw-posts".to_owned(),
            schema: ColumnSchema {
                numeric: strings(&[
                    "retweetCount",
                    "replyCount",
                    "likeCount",
                    "quoteCount",
                    "viewCount",
                    "bookmarkCount",
                    "z",
                    "illuminating_scored_message",
                ]),
                categorical: strings(&[
                    "id",
                    "url",
                    "source",
                    "createdAt",
                    "lang",
                    "quoteId",
                    "inReplyToId",
                    "month_year",
                ]),
                binary: strings(&TW_BINARY),
                ..Default::default()
            },
            derivations: Vec::new(),
            group_by: vec![strings(&["source"]), strings(&["source", "lang"])],
            scope: ColumnScope::DeclaredOnly,
        }
    }

    /// Checks the profile for mistakes that would silently produce an empty report.
    pub fn validate(&self) -> Result<()> {
        if let Some(empty) = self.group_by.iter().position(Vec::is_empty) {
            return Err(SocialStatsError::Config(format!(
                "profile '{}': key set #{} has no columns",
                self.name,
                empty + 1
            )));
        }
        for derivation in &self.derivations {
            if derivation.name().trim().is_empty() {
                return Err(SocialStatsError::Config(format!(
                    "profile '{}': derivation from '{}' has an empty name",
                    self.name,
                    derivation.source()
                )));
            }
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile {}", path.display()))?;
        let profile: Self = serde_json::from_str(&content)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
