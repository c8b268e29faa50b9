use serde::Serialize;
use serde_json::Value;

use super::format::{display_text, format_value};
use crate::config::{omitted_from_summary, FieldsConfig, LoopConfig};
use crate::session::{is_truthy, StoredItem};
use crate::translate::{field_label_keys, Translator};

/// One field of one stored item, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub field: String,
    pub header: String,
    pub subroute: Option<String>,
    pub value: Value,
}

/// Display model of a single loop item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub id: usize,
    pub delete_route: Option<String>,
    pub item_title: String,
    pub edit_fields_individually: bool,
    pub edit_header: bool,
    pub change_route: Option<String>,
    pub fields: Vec<SummaryRow>,
}

/// Converts stored items into per-item display models. An item's position in
/// `items` is its id.
pub fn to_displayable_summary(
    items: &[StoredItem],
    loop_config: &LoopConfig,
    fields_config: &FieldsConfig,
    translator: &dyn Translator,
) -> Vec<ItemSummary> {
    let loop_data = &loop_config.loop_data;
    let header_field = loop_data.header_field.as_deref();

    items
        .iter()
        .enumerate()
        .map(|(id, item)| {
            let item_title = match header_field.and_then(|field| item.get(field).map(|v| (field, v))) {
                Some((field, value)) if is_truthy(value) => {
                    display_text(&format_value(value, field, fields_config))
                }
                _ => {
                    let title = translator.translate(&format!(
                        "pages.{}.summary-item",
                        loop_config.section_key()
                    ));
                    if items.len() > 1 {
                        format!("{} {}", title, id + 1)
                    } else {
                        title
                    }
                }
            };

            let item_fields: Vec<&String> = item
                .keys()
                .filter(|field| !omitted_from_summary(fields_config, field))
                .collect();

            let fields: Vec<SummaryRow> = item_fields
                .iter()
                .filter(|field| Some(field.as_str()) != header_field)
                .map(|field| SummaryRow {
                    field: field.to_string(),
                    header: translator.translate_first(&field_label_keys(field)),
                    subroute: loop_config.owning_sub_step(field).map(str::to_string),
                    value: format_value(&item[field.as_str()], field, fields_config),
                })
                .collect();

            let edit_fields_individually =
                !fields.is_empty() && loop_data.edit_fields_individually.unwrap_or(true);

            ItemSummary {
                id,
                delete_route: loop_config.first_step().map(str::to_string),
                item_title,
                edit_fields_individually,
                edit_header: header_field.is_some(),
                change_route: item_fields
                    .first()
                    .and_then(|field| loop_config.owning_sub_step(field))
                    .map(str::to_string),
                fields,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FieldConfig, LoopData, SubStep};
    use serde_json::json;
    use std::sync::Arc;

    fn loop_config(loop_data: LoopData) -> LoopConfig {
        LoopConfig::new("/some-section")
            .with_sub_step("step-1", SubStep::new(["field1", "field2"]).with_next("step-2"))
            .with_sub_step("step-2", SubStep::new(["field3"]))
            .with_loop_data(loop_data)
    }

    fn fields() -> FieldsConfig {
        ["field1", "field2", "field3"]
            .into_iter()
            .map(|name| (name.to_string(), Arc::new(FieldConfig::new())))
            .collect()
    }

    fn translator(key: &str) -> String {
        match key {
            "pages.some-section.summary-item" => "item title".into(),
            "fields.field1.summary" => "field 1 display".into(),
            "fields.field2.label" => "field 2 display".into(),
            "fields.field3.legend" => "field 3 display".into(),
            other => other.into(),
        }
    }

    fn item(pairs: &[(&str, Value)]) -> StoredItem {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    fn row(field: &str, header: &str, subroute: &str, value: Value) -> SummaryRow {
        SummaryRow {
            field: field.into(),
            header: header.into(),
            subroute: Some(subroute.into()),
            value,
        }
    }

    fn badger() -> StoredItem {
        item(&[
            ("field1", json!("badger")),
            ("field2", json!("monkeys")),
            ("field3", json!("meerkat")),
        ])
    }

    #[test]
    fn single_item_uses_unnumbered_title() {
        let summary = to_displayable_summary(
            &[badger()],
            &loop_config(LoopData::default()),
            &fields(),
            &translator,
        );
        assert_eq!(
            summary,
            vec![ItemSummary {
                id: 0,
                delete_route: Some("step-1".into()),
                item_title: "item title".into(),
                edit_fields_individually: true,
                edit_header: false,
                change_route: Some("step-1".into()),
                fields: vec![
                    row("field1", "field 1 display", "step-1", json!("badger")),
                    row("field2", "field 2 display", "step-1", json!("monkeys")),
                    row("field3", "field 3 display", "step-2", json!("meerkat")),
                ],
            }]
        );
    }

    #[test]
    fn multiple_items_are_numbered_from_one() {
        let second = item(&[("field3", json!("giraffe"))]);
        let summary = to_displayable_summary(
            &[badger(), second],
            &loop_config(LoopData::default()),
            &fields(),
            &translator,
        );
        assert_eq!(summary[0].item_title, "item title 1");
        assert_eq!(summary[1].item_title, "item title 2");
        assert_eq!(summary[1].id, 1);
        assert_eq!(summary[1].change_route.as_deref(), Some("step-2"));
    }

    #[test]
    fn blank_fields_are_presented_as_stored() {
        let blank = item(&[("field1", json!("")), ("field3", json!("meerkat"))]);
        let summary = to_displayable_summary(
            &[blank],
            &loop_config(LoopData::default()),
            &fields(),
            &translator,
        );
        assert_eq!(summary[0].fields[0].value, json!(""));
        assert_eq!(summary[0].fields.len(), 2);
    }

    #[test]
    fn configured_parse_formats_values() {
        let mut fields = fields();
        fields.insert(
            "field1".into(),
            Arc::new(FieldConfig::new().with_parse(|value| json!(format!("{} parsed", display_text(value))))),
        );
        let summary = to_displayable_summary(
            &[badger()],
            &loop_config(LoopData::default()),
            &fields,
            &translator,
        );
        assert_eq!(summary[0].fields[0].value, json!("badger parsed"));
    }

    #[test]
    fn omitted_fields_are_not_listed() {
        let mut fields = fields();
        fields.insert(
            "field1".into(),
            Arc::new(FieldConfig::new().omitted_from_summary()),
        );
        let summary = to_displayable_summary(
            &[badger()],
            &loop_config(LoopData::default()),
            &fields,
            &translator,
        );
        let listed: Vec<_> = summary[0].fields.iter().map(|row| row.field.as_str()).collect();
        assert_eq!(listed, vec!["field2", "field3"]);
    }

    #[test]
    fn header_field_becomes_the_title() {
        let config = loop_config(LoopData {
            header_field: Some("field2".into()),
            ..LoopData::default()
        });
        let summary = to_displayable_summary(&[badger()], &config, &fields(), &translator);
        assert_eq!(summary[0].item_title, "monkeys");
        assert!(summary[0].edit_header);
        let listed: Vec<_> = summary[0].fields.iter().map(|row| row.field.as_str()).collect();
        assert_eq!(listed, vec!["field1", "field3"]);
        assert!(summary[0].edit_fields_individually);
    }

    #[test]
    fn nothing_left_to_edit_forces_whole_item_editing() {
        let config = loop_config(LoopData {
            header_field: Some("field2".into()),
            edit_fields_individually: Some(true),
            ..LoopData::default()
        });
        let only_header = item(&[("field2", json!("monkeys"))]);
        let summary = to_displayable_summary(&[only_header], &config, &fields(), &translator);
        assert_eq!(summary[0].item_title, "monkeys");
        assert!(summary[0].fields.is_empty());
        assert!(!summary[0].edit_fields_individually);
        assert_eq!(summary[0].change_route.as_deref(), Some("step-1"));
    }

    #[test]
    fn explicit_false_disables_individual_editing() {
        let config = loop_config(LoopData {
            edit_fields_individually: Some(false),
            ..LoopData::default()
        });
        let summary = to_displayable_summary(&[badger()], &config, &fields(), &translator);
        assert!(!summary[0].edit_fields_individually);
        assert_eq!(summary[0].fields.len(), 3);
    }

    #[test]
    fn empty_item_has_no_rows() {
        let summary = to_displayable_summary(
            &[StoredItem::new()],
            &loop_config(LoopData::default()),
            &fields(),
            &translator,
        );
        assert!(summary[0].fields.is_empty());
        assert!(!summary[0].edit_fields_individually);
        assert_eq!(summary[0].change_route, None);
    }
}
