//! Read-only product knowledge: plan pricing and support/refund policies.
//!
//! The document is loaded once at startup and never mutated. Lookups are
//! pure and never fail; any value the document leaves out is rendered as
//! [`ABSENT_VALUE`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const ABSENT_VALUE: &str = "None";

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("knowledge document `{0}` not found. Add the local JSON knowledge base.")]
    Missing(PathBuf),
    #[error("could not read knowledge document `{path}`: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not parse knowledge document `{path}`: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    #[serde(default)]
    pub pricing: PricingSection,
    #[serde(default)]
    pub policies: PolicySection,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingSection {
    #[serde(default)]
    pub basic: PlanDetails,
    #[serde(default)]
    pub pro: PlanDetails,
}

/// One plan's entry. The monthly allowance may be keyed `quota` or `videos`;
/// when both are present `quota` wins. A `null` or empty `features` list
/// means the plan advertises no features.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanDetails {
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub videos: Option<Value>,
    #[serde(default)]
    pub resolution: Option<Value>,
    #[serde(default)]
    pub features: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicySection {
    #[serde(default)]
    pub refund: Option<Value>,
    #[serde(default)]
    pub support: Option<Value>,
}

impl KnowledgeBase {
    pub fn load(path: &Path) -> Result<Self, KnowledgeError> {
        if !path.exists() {
            return Err(KnowledgeError::Missing(path.to_path_buf()));
        }

        let raw = fs::read_to_string(path)
            .map_err(|source| KnowledgeError::Read { path: path.to_path_buf(), source })?;
        serde_json::from_str(&raw)
            .map_err(|source| KnowledgeError::Parse { path: path.to_path_buf(), source })
    }

    /// Two lines: basic plan, then pro plan with its feature list when present.
    pub fn pricing_answer(&self) -> String {
        let basic = &self.pricing.basic;
        let pro = &self.pricing.pro;

        let basic_text = format!("Basic Plan: {}", basic.summary());
        let mut pro_text = format!("Pro Plan: {}", pro.summary());
        if let Some(features) = pro.features() {
            pro_text.push_str(&format!(" (Features: {})", features.join(", ")));
        }

        format!("{basic_text}\n{pro_text}")
    }

    pub fn policy_answer(&self) -> String {
        format!(
            "Refund policy: {}. Support: {}.",
            render_value(self.policies.refund.as_ref()),
            render_value(self.policies.support.as_ref())
        )
    }
}

impl PlanDetails {
    pub fn allowance(&self) -> Option<&Value> {
        let present = |value: &&Value| !value.is_null();
        self.quota.as_ref().filter(present).or_else(|| self.videos.as_ref().filter(present))
    }

    pub fn features(&self) -> Option<&[String]> {
        self.features.as_deref().filter(|features| !features.is_empty())
    }

    fn summary(&self) -> String {
        format!(
            "{} , {} , {}",
            render_value(self.price.as_ref()),
            render_value(self.allowance()),
            render_value(self.resolution.as_ref())
        )
    }
}

fn render_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => ABSENT_VALUE.to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}
