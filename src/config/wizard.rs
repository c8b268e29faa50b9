use std::{fmt, fs, path::Path, sync::Arc};

use indexmap::IndexMap;
use serde::{de::Deserializer, Deserialize};
use serde_json::Value;

use super::{FieldConfig, FieldsConfig, LoopConfig, Transform};
use crate::errors::{Result, WizardError};
use crate::utils::paths::strip_leading_slash;

/// A top-level wizard step. Steps carrying a `loop` block repeat their
/// sub-steps once per collected item.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepConfig {
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default, rename = "loop")]
    pub loop_config: Option<LoopConfig>,
}

impl StepConfig {
    pub fn is_loop(&self) -> bool {
        self.loop_config.is_some()
    }

    /// Declared fields, or for loop steps without any, every sub-step field.
    pub fn summary_fields(&self) -> Vec<String> {
        match &self.loop_config {
            Some(config) if self.fields.is_empty() => config.sub_step_fields(),
            _ => self.fields.clone(),
        }
    }
}

/// Entry of a confirmation page section: a field name plus an optional
/// display transform overriding the field's own.
#[derive(Clone)]
pub struct SectionField {
    pub field: String,
    pub parse: Option<Transform>,
}

impl SectionField {
    pub fn named(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            parse: None,
        }
    }

    pub fn parsed<F>(field: impl Into<String>, parse: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self {
            field: field.into(),
            parse: Some(Arc::new(parse)),
        }
    }
}

impl From<&str> for SectionField {
    fn from(field: &str) -> Self {
        Self::named(field)
    }
}

impl fmt::Debug for SectionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionField")
            .field("field", &self.field)
            .field("parse", &self.parse.as_ref().map(|_| "<transform>"))
            .finish()
    }
}

impl<'de> Deserialize<'de> for SectionField {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawSectionField {
            Name(String),
            Entry { field: String },
        }

        Ok(match RawSectionField::deserialize(deserializer)? {
            RawSectionField::Name(field) | RawSectionField::Entry { field } => {
                SectionField::named(field)
            }
        })
    }
}

pub type SectionsConfig = IndexMap<String, Vec<SectionField>>;

/// The whole wizard as seen by the confirmation page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardConfig {
    #[serde(default)]
    pub steps: IndexMap<String, StepConfig>,
    /// Explicit confirmation page layout: section key -> fields.
    #[serde(default)]
    pub sections: Option<SectionsConfig>,
    #[serde(default)]
    pub fields: FieldsConfig,
}

impl WizardConfig {
    pub fn from_json_str(data: &str) -> Result<Self> {
        let config: WizardConfig = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_step(mut self, key: impl Into<String>, step: StepConfig) -> Self {
        self.steps.insert(key.into(), step);
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, config: FieldConfig) -> Self {
        self.fields.insert(name.into(), Arc::new(config));
        self
    }

    /// Section layout used by the confirmation page: the explicit `sections`
    /// when present, otherwise one section per step keyed by its path.
    pub fn section_settings(&self) -> SectionsConfig {
        if let Some(sections) = &self.sections {
            return sections.clone();
        }
        self.steps
            .iter()
            .map(|(key, step)| {
                let fields = step
                    .summary_fields()
                    .into_iter()
                    .map(SectionField::named)
                    .collect();
                (strip_leading_slash(key).to_string(), fields)
            })
            .collect()
    }

    /// Path of the first non-loop step declaring `field`.
    pub fn step_for_field(&self, field: &str) -> Option<&str> {
        self.steps
            .iter()
            .find(|(_, step)| !step.is_loop() && step.fields.iter().any(|f| f == field))
            .map(|(key, _)| key.as_str())
    }

    /// Defaulted loop configuration of the step at `path`. A loop without its
    /// own `route` takes the step's path.
    pub fn loop_for(&self, path: &str) -> Option<LoopConfig> {
        let (key, step) = self
            .steps
            .get_key_value(path)
            .or_else(|| self.steps.get_key_value(format!("/{}", strip_leading_slash(path)).as_str()))?;
        let mut config = step.loop_config.clone()?;
        if config.route.is_empty() {
            config.route = key.clone();
        }
        config.apply_defaults();
        Some(config)
    }

    /// Checks that every sub-step `next` and fork target names a sibling.
    pub fn validate(&self) -> Result<()> {
        for (key, step) in &self.steps {
            let Some(config) = &step.loop_config else {
                continue;
            };
            for (name, sub_step) in &config.sub_steps {
                let targets = sub_step
                    .next
                    .iter()
                    .chain(sub_step.forks.iter().map(|fork| &fork.target));
                for target in targets {
                    let target = strip_leading_slash(target);
                    if !config.sub_steps.contains_key(target) {
                        return Err(WizardError::Config(format!(
                            "sub-step `{name}` of loop `{key}` points at unknown sub-step `{target}`"
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Reads and validates a wizard description from a JSON file.
pub fn load_wizard_config(path: &Path) -> Result<WizardConfig> {
    let data = fs::read_to_string(path)?;
    WizardConfig::from_json_str(&data)
}
