//! Declarative configuration for loop steps and the wizard that hosts them.
//!
//! Everything here deserializes from camelCase JSON. Field value transforms
//! cannot come from JSON and are attached in code through [`FieldConfig`].

pub mod wizard;

use std::{fmt, sync::Arc};

use indexmap::IndexMap;
use serde::{de::Deserializer, Deserialize, Serialize};
use serde_json::Value;

use crate::utils::paths::strip_leading_slash;

pub use wizard::{load_wizard_config, SectionField, StepConfig, WizardConfig};

pub const DEFAULT_STORE_KEY: &str = "items";

/// Display transform applied to a stored value before it is shown.
pub type Transform = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Per-field settings supplied by the surrounding wizard.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    #[serde(skip)]
    pub parse: Option<Transform>,
    #[serde(default)]
    pub omit_from_summary: bool,
}

impl FieldConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parse<F>(mut self, parse: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.parse = Some(Arc::new(parse));
        self
    }

    pub fn omitted_from_summary(mut self) -> Self {
        self.omit_from_summary = true;
        self
    }
}

impl fmt::Debug for FieldConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldConfig")
            .field("parse", &self.parse.as_ref().map(|_| "<transform>"))
            .field("omit_from_summary", &self.omit_from_summary)
            .finish()
    }
}

/// Global field registry: field name -> shared configuration.
pub type FieldsConfig = IndexMap<String, Arc<FieldConfig>>;

/// Fields a loop collects, in declaration order. Fields missing from the
/// registry map to `None`.
pub type FieldSet = IndexMap<String, Option<Arc<FieldConfig>>>;

pub fn omitted_from_summary(fields_config: &FieldsConfig, field: &str) -> bool {
    fields_config
        .get(field)
        .map(|config| config.omit_from_summary)
        .unwrap_or(false)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForkCondition {
    pub field: String,
    pub value: Value,
}

/// Conditional branch to `target` when the submitted value matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fork {
    pub target: String,
    pub condition: ForkCondition,
}

/// One page within a loop's fixed sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubStep {
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// Session keys that must hold a value before this sub-step can be shown.
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub prereqs: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub forks: Vec<Fork>,
}

impl SubStep {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_next(mut self, next: impl Into<String>) -> Self {
        self.next = Some(next.into());
        self
    }

    pub fn with_prereq(mut self, prereq: impl Into<String>) -> Self {
        self.prereqs.push(prereq.into());
        self
    }

    pub fn with_fork(mut self, fork: Fork) -> Self {
        self.forks.push(fork);
        self
    }

    pub fn owns(&self, field: &str) -> bool {
        self.fields.iter().any(|candidate| candidate == field)
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values,
    })
}

/// Final-step answer that sends the user round the loop again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopCondition {
    pub field: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryOptions {
    #[serde(default = "SummaryOptions::default_apply_spacer")]
    pub apply_spacer: bool,
}

impl SummaryOptions {
    pub fn default_apply_spacer() -> bool {
        true
    }
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            apply_spacer: Self::default_apply_spacer(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm_step: Option<String>,
    /// Field shown as each item's title instead of as an editable row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_fields_individually: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_condition: Option<LoopCondition>,
    #[serde(default)]
    pub summary: SummaryOptions,
}

/// Static description of one loop step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopConfig {
    #[serde(default)]
    pub route: String,
    /// Explicit field set. Empty means "every sub-step's fields".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    #[serde(default)]
    pub sub_steps: IndexMap<String, SubStep>,
    #[serde(default)]
    pub loop_data: LoopData,
}

impl LoopConfig {
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            ..Self::default()
        }
    }

    pub fn with_sub_step(mut self, name: impl Into<String>, step: SubStep) -> Self {
        self.sub_steps.insert(name.into(), step);
        self
    }

    pub fn with_loop_data(mut self, loop_data: LoopData) -> Self {
        self.loop_data = loop_data;
        self
    }

    /// Fills `storeKey` and `sectionKey` when they were not supplied.
    pub fn apply_defaults(&mut self) {
        if self.loop_data.store_key.is_none() {
            self.loop_data.store_key = Some(DEFAULT_STORE_KEY.to_string());
        }
        if self.loop_data.section_key.is_none() {
            self.loop_data.section_key = Some(strip_leading_slash(&self.route).to_string());
        }
    }

    pub fn store_key(&self) -> &str {
        self.loop_data
            .store_key
            .as_deref()
            .unwrap_or(DEFAULT_STORE_KEY)
    }

    pub fn section_key(&self) -> &str {
        self.loop_data
            .section_key
            .as_deref()
            .unwrap_or_else(|| strip_leading_slash(&self.route))
    }

    pub fn sub_step(&self, name: &str) -> Option<&SubStep> {
        self.sub_steps.get(name)
    }

    pub fn first_step(&self) -> Option<&str> {
        self.sub_steps.keys().next().map(String::as_str)
    }

    /// The summary sub-step: the first one declared without a `next`.
    pub fn final_step(&self) -> Option<&str> {
        self.sub_steps
            .iter()
            .find(|(_, step)| step.next.is_none())
            .map(|(name, _)| name.as_str())
    }

    /// Last sub-step in declaration order.
    pub fn last_declared_step(&self) -> Option<&str> {
        self.sub_steps.keys().last().map(String::as_str)
    }

    /// Name of the sub-step whose field list contains `field`.
    pub fn owning_sub_step(&self, field: &str) -> Option<&str> {
        self.sub_steps
            .iter()
            .find(|(_, step)| step.owns(field))
            .map(|(name, _)| name.as_str())
    }

    /// Every sub-step's fields in declaration order, without duplicates.
    pub fn sub_step_fields(&self) -> Vec<String> {
        let mut fields: Vec<String> = Vec::new();
        for field in self.sub_steps.values().flat_map(|step| step.fields.iter()) {
            if !fields.contains(field) {
                fields.push(field.clone());
            }
        }
        fields
    }

    /// Resolves the loop's field set against the registry. Configurations are
    /// shared with the registry, not copied.
    pub fn derive_field_set(&self, fields_config: &FieldsConfig) -> FieldSet {
        let names = if self.fields.is_empty() {
            self.sub_step_fields()
        } else {
            self.fields.clone()
        };
        names
            .into_iter()
            .map(|name| {
                let config = fields_config.get(&name).cloned();
                (name, config)
            })
            .collect()
    }
}
