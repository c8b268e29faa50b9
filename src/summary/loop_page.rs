use serde::Serialize;

use super::items::{to_displayable_summary, ItemSummary};
use crate::config::{FieldsConfig, LoopConfig};
use crate::session::StoredItem;
use crate::translate::{conditional_translate, Translator};

/// View model for a loop's add/summary pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopPageSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
    pub items: Vec<ItemSummary>,
    pub has_items: usize,
    pub delete_text: String,
}

/// Builds the page model for `page_path` (`<route>-<sub-step>`).
///
/// Title and intro prefer the copy written for the item about to be added
/// (`item-<N+1>-header`) and fall back to the page's general copy.
pub fn summary_for(
    translator: &dyn Translator,
    page_path: &str,
    items: &[StoredItem],
    loop_config: &LoopConfig,
    fields_config: &FieldsConfig,
) -> LoopPageSummary {
    let summaries = to_displayable_summary(items, loop_config, fields_config, translator);
    let next_item_number = summaries.len() + 1;

    let title = conditional_translate(
        &vec![
            format!("pages.{page_path}.item-{next_item_number}-header"),
            format!("pages.{page_path}.header"),
        ],
        translator,
    );
    let intro = conditional_translate(
        &vec![
            format!("pages.{page_path}.item-{next_item_number}-intro"),
            format!("pages.{page_path}.intro"),
        ],
        translator,
    );

    LoopPageSummary {
        title,
        intro,
        items: summaries,
        has_items: items.len(),
        delete_text: translator.translate(&format!(
            "pages.{}.delete-text",
            loop_config.section_key()
        )),
    }
}

/// Title variant keyed on whether the first item is being added.
pub fn resolve_title(
    translator: &dyn Translator,
    first_item: bool,
    page_path: &str,
) -> Option<String> {
    let header = format!("pages.{page_path}.header");
    if first_item {
        conditional_translate(
            &vec![format!("pages.{page_path}.first-item-header"), header],
            translator,
        )
    } else {
        conditional_translate(&header, translator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LoopData, SubStep};
    use crate::translate::Catalog;
    use serde_json::json;

    fn people() -> LoopConfig {
        let mut config = LoopConfig::new("/people")
            .with_sub_step("name", SubStep::new(["name"]).with_next("add-another"))
            .with_sub_step("add-another", SubStep::new(["another"]))
            .with_loop_data(LoopData::default());
        config.apply_defaults();
        config
    }

    fn item(name: &str) -> StoredItem {
        let mut item = StoredItem::new();
        item.insert("name".into(), json!(name));
        item
    }

    fn catalog() -> Catalog {
        Catalog::new()
            .with("pages.people-name.header", "Add a person")
            .with("pages.people-name.item-2-header", "Add a second person")
            .with("pages.people-name.intro", "Tell us about them")
            .with("pages.people.delete-text", "Remove")
    }

    #[test]
    fn numbered_title_is_preferred_for_the_next_item() {
        let page = summary_for(&catalog(), "people-name", &[item("Ada")], &people(), &FieldsConfig::new());
        assert_eq!(page.title.as_deref(), Some("Add a second person"));
        assert_eq!(page.intro.as_deref(), Some("Tell us about them"));
        assert_eq!(page.has_items, 1);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.delete_text, "Remove");
    }

    #[test]
    fn general_title_when_no_numbered_copy_exists() {
        let page = summary_for(&catalog(), "people-name", &[], &people(), &FieldsConfig::new());
        assert_eq!(page.title.as_deref(), Some("Add a person"));
        assert_eq!(page.has_items, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn missing_copy_is_left_out_of_the_page_model() {
        let page = summary_for(&Catalog::new(), "people-name", &[], &people(), &FieldsConfig::new());
        let value = serde_json::to_value(&page).expect("serialize page");
        assert!(value.get("title").is_none());
        assert_eq!(value["hasItems"], json!(0));
        assert_eq!(value["deleteText"], json!("pages.people.delete-text"));
    }

    #[test]
    fn first_item_title_variant() {
        let catalog = catalog().with("pages.people-name.first-item-header", "Add the first person");
        assert_eq!(
            resolve_title(&catalog, true, "people-name").as_deref(),
            Some("Add the first person")
        );
        assert_eq!(
            resolve_title(&catalog, false, "people-name").as_deref(),
            Some("Add a person")
        );
    }
}
