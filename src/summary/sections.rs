//! Confirmation page sections.
//!
//! [`StandardSummary`] builds the ordinary per-step sections; [`add_loop_sections`]
//! splices one section per loop step into that list at the position the loop
//! step holds in the wizard's declaration order.

use serde::Serialize;
use serde_json::Value;

use super::format::apply_transform;
use crate::config::{omitted_from_summary, LoopConfig, SectionField, WizardConfig};
use crate::session::{is_blank, read_items, SessionStore, StoredItem};
use crate::translate::Translator;
use crate::utils::paths::section_key;

/// One row of a section: a labelled value with a link back to its step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryField {
    pub field: String,
    pub value: Value,
    pub step: String,
    pub label: String,
    pub change_link_description: String,
}

/// Separator placed between consecutive loop items.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Spacer {
    pub spacer: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SectionRow {
    Field(SummaryField),
    Spacer(Spacer),
}

impl SectionRow {
    pub fn spacer() -> Self {
        SectionRow::Spacer(Spacer { spacer: true })
    }

    pub fn is_spacer(&self) -> bool {
        matches!(self, SectionRow::Spacer(_))
    }

    pub fn as_field(&self) -> Option<&SummaryField> {
        match self {
            SectionRow::Field(field) => Some(field),
            SectionRow::Spacer(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub section: String,
    pub fields: Vec<SectionRow>,
}

/// Produces the ordinary (non-loop) sections of a confirmation page.
pub trait SectionSource {
    fn parse_sections(
        &self,
        wizard: &WizardConfig,
        session: &dyn SessionStore,
        translator: &dyn Translator,
    ) -> Vec<Section>;
}

/// Base section builder: one section per step (or per configured section),
/// listing the fields that hold a value. Loop fields are left to
/// [`add_loop_sections`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardSummary;

impl SectionSource for StandardSummary {
    fn parse_sections(
        &self,
        wizard: &WizardConfig,
        session: &dyn SessionStore,
        translator: &dyn Translator,
    ) -> Vec<Section> {
        wizard
            .section_settings()
            .into_iter()
            .filter_map(|(key, entries)| {
                let fields: Vec<SectionRow> = entries
                    .iter()
                    .filter_map(|entry| {
                        let step = wizard.step_for_field(&entry.field)?;
                        let value = session.get(&entry.field).filter(|v| !is_blank(v))?;
                        let transform = entry.parse.as_ref().or_else(|| {
                            wizard
                                .fields
                                .get(&entry.field)
                                .and_then(|config| config.parse.as_ref())
                        });
                        Some(SectionRow::Field(summary_field(
                            &entry.field,
                            apply_transform(&value, transform),
                            step.to_string(),
                            translator,
                        )))
                    })
                    .collect();
                if fields.is_empty() {
                    return None;
                }
                Some(Section {
                    section: section_header(&key, translator),
                    fields,
                })
            })
            .collect()
    }
}

fn section_header(key: &str, translator: &dyn Translator) -> String {
    translator.translate_first(&[
        format!("pages.confirm.sections.{key}.header"),
        format!("pages.{key}.header"),
    ])
}

fn summary_field(
    field: &str,
    value: Value,
    step: String,
    translator: &dyn Translator,
) -> SummaryField {
    let label = translator.translate_first(&[
        format!("pages.confirm.fields.{field}.label"),
        format!("fields.{field}.summary"),
        format!("fields.{field}.label"),
        format!("fields.{field}.legend"),
    ]);
    let change_link_description = translator.translate_first(&[
        format!("pages.confirm.fields.{field}.changeLinkDescription"),
        format!("fields.{field}.changeLinkDescription"),
        format!("pages.confirm.fields.{field}.label"),
        format!("fields.{field}.summary"),
        format!("fields.{field}.label"),
        format!("fields.{field}.legend"),
    ]);
    SummaryField {
        field: field.to_string(),
        value,
        step,
        label,
        change_link_description,
    }
}

/// True when a section's first row links to the step at `key`.
fn is_displayed_section(key: &str, sections: &[Section]) -> bool {
    sections.iter().any(|section| {
        section
            .fields
            .first()
            .and_then(SectionRow::as_field)
            .map(|field| field.step == key)
            .unwrap_or(false)
    })
}

/// Inserts a section for every loop step that has something to show.
pub fn add_loop_sections(
    wizard: &WizardConfig,
    mut sections: Vec<Section>,
    session: &dyn SessionStore,
    translator: &dyn Translator,
) -> Vec<Section> {
    let mut found_sections = 0;
    for (key, step) in &wizard.steps {
        match &step.loop_config {
            Some(loop_config) => {
                let section = loop_section(wizard, key, loop_config, session, translator);
                if section.fields.is_empty() {
                    continue;
                }
                tracing::debug!(
                    step = %key,
                    rows = section.fields.len(),
                    "splicing loop section into summary"
                );
                let position = found_sections.min(sections.len());
                sections.insert(position, section);
                found_sections += 1;
            }
            None => {
                if is_displayed_section(key, &sections) {
                    found_sections += 1;
                }
            }
        }
    }
    sections
}

fn loop_section(
    wizard: &WizardConfig,
    path: &str,
    loop_config: &LoopConfig,
    session: &dyn SessionStore,
    translator: &dyn Translator,
) -> Section {
    let key = section_key(path);
    let store_key = loop_config
        .loop_data
        .store_key
        .clone()
        .unwrap_or_else(|| format!("{key}-items"));
    let entities = read_items(session, &store_key);
    let allowlist = wizard
        .sections
        .as_ref()
        .map(|sections| sections.get(&key).cloned().unwrap_or_default());
    let apply_spacer = loop_config.loop_data.summary.apply_spacer;

    let mut rows = Vec::new();
    for (id, entity) in entities.iter().enumerate() {
        let included = included_fields(wizard, allowlist.as_deref(), entity);
        for (position, field) in included.iter().enumerate() {
            if id > 0 && position == 0 && apply_spacer {
                rows.push(SectionRow::spacer());
            }
            let transform = allowlist
                .as_deref()
                .and_then(|entries| entries.iter().find(|entry| entry.field == *field))
                .and_then(|entry| entry.parse.as_ref())
                .or_else(|| {
                    wizard
                        .fields
                        .get(field.as_str())
                        .and_then(|config| config.parse.as_ref())
                });
            let sub_step = loop_config.owning_sub_step(field).unwrap_or_default();
            rows.push(SectionRow::Field(summary_field(
                field,
                apply_transform(&entity[field.as_str()], transform),
                format!("{path}/{sub_step}/{id}"),
                translator,
            )));
        }
    }

    Section {
        section: section_header(&key, translator),
        fields: rows,
    }
}

/// Fields of `entity` to show: the section's allowlist order when one is
/// configured, otherwise stored order minus fields omitted from summaries.
fn included_fields(
    wizard: &WizardConfig,
    allowlist: Option<&[SectionField]>,
    entity: &StoredItem,
) -> Vec<String> {
    match allowlist {
        Some(entries) => entries
            .iter()
            .filter(|entry| entity.contains_key(&entry.field))
            .map(|entry| entry.field.clone())
            .collect(),
        None => entity
            .keys()
            .filter(|field| !omitted_from_summary(&wizard.fields, field))
            .cloned()
            .collect(),
    }
}
