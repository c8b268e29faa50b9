use serde_json::Value;

use super::base::{StepController, StepResponse};
use super::request::{Locals, StepRequest};
use crate::config::WizardConfig;
use crate::errors::Result;
use crate::session::StoredItem;
use crate::summary::{add_loop_sections, Section, SectionSource, StandardSummary};

/// Confirmation page: the base step's locals plus `rows`, the wizard's
/// sections with loop sections spliced in.
pub struct SummaryPageController<B> {
    base: B,
    wizard: WizardConfig,
    sections: Box<dyn SectionSource>,
}

impl<B: StepController> SummaryPageController<B> {
    pub fn new(base: B, wizard: WizardConfig) -> Self {
        Self {
            base,
            wizard,
            sections: Box::new(StandardSummary),
        }
    }

    /// Replaces the builder used for the non-loop sections.
    pub fn with_section_source(mut self, source: impl SectionSource + 'static) -> Self {
        self.sections = Box::new(source);
        self
    }

    pub fn wizard(&self) -> &WizardConfig {
        &self.wizard
    }

    pub fn parse_sections(&self, req: &StepRequest<'_>) -> Vec<Section> {
        let session = req.session();
        let base = self
            .sections
            .parse_sections(&self.wizard, session, req.translator);
        add_loop_sections(&self.wizard, base, session, req.translator)
    }
}

impl<B: StepController> StepController for SummaryPageController<B> {
    fn configure(&self, req: &mut StepRequest<'_>) -> Result<()> {
        self.base.configure(req)
    }

    fn get(&self, req: &mut StepRequest<'_>) -> Result<StepResponse> {
        self.base.get(req)
    }

    fn get_values(&self, req: &StepRequest<'_>) -> Result<StoredItem> {
        self.base.get_values(req)
    }

    fn locals(&self, req: &StepRequest<'_>) -> Result<Locals> {
        let mut locals = self.base.locals(req)?;
        let rows = serde_json::to_value(self.parse_sections(req))?;
        locals.insert("rows".into(), rows);
        Ok(locals)
    }

    fn save_values(&self, req: &mut StepRequest<'_>) -> Result<()> {
        self.base.save_values(req)
    }

    fn success_handler(&self, req: &mut StepRequest<'_>) -> Result<()> {
        self.base.success_handler(req)
    }

    fn get_next_step(&self, req: &StepRequest<'_>) -> String {
        self.base.get_next_step(req)
    }

    fn get_back_link(&self, req: &StepRequest<'_>) -> Option<String> {
        self.base.get_back_link(req)
    }

    fn get_fork_target(&self, req: &StepRequest<'_>) -> Option<String> {
        self.base.get_fork_target(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::base::StandardController;
    use crate::controller::request::{RouteParams, StepOptions};
    use crate::session::{MemorySession, SessionStore};
    use crate::summary::SectionRow;
    use crate::translate::Translator;
    use serde_json::json;

    const WIZARD: &str = r#"{
        "steps": {
            "/name": {"fields": ["name"], "next": "/pets"},
            "/pets": {
                "next": "/confirm",
                "loop": {
                    "route": "/pets",
                    "loopData": {"storeKey": "pets"},
                    "subSteps": {
                        "pet-name": {"fields": ["pet-name"], "next": "add-another"},
                        "add-another": {"fields": ["another"]}
                    }
                }
            },
            "/confirm": {}
        },
        "fields": {"another": {"omitFromSummary": true}}
    }"#;

    struct Fixed;

    impl SectionSource for Fixed {
        fn parse_sections(
            &self,
            _wizard: &WizardConfig,
            _session: &dyn SessionStore,
            _translator: &dyn Translator,
        ) -> Vec<Section> {
            vec![Section {
                section: "fixed".into(),
                fields: vec![SectionRow::spacer()],
            }]
        }
    }

    fn identity(key: &str) -> String {
        key.to_string()
    }

    fn session() -> MemorySession {
        let mut session = MemorySession::new();
        session.set("name", json!("Ada"));
        session.set(
            "pets",
            json!([{"pet-name": "Rex", "another": "yes"}, {"pet-name": "Tom", "another": "no"}]),
        );
        session
    }

    #[test]
    fn locals_carry_spliced_rows() {
        let wizard = WizardConfig::from_json_str(WIZARD).expect("wizard");
        let controller = SummaryPageController::new(StandardController, wizard);
        let mut session = session();
        let req = StepRequest::new(
            RouteParams::default(),
            StepOptions::new("/confirm"),
            &mut session,
            &identity,
        );
        let locals = controller.locals(&req).expect("locals");
        let rows = locals["rows"].as_array().cloned().unwrap_or_default();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["section"], json!("pages.confirm.sections.name.header"));
        assert_eq!(rows[0]["fields"][0]["value"], json!("Ada"));
        assert_eq!(rows[0]["fields"][0]["step"], json!("/name"));
        assert_eq!(rows[1]["section"], json!("pages.confirm.sections.pets.header"));
        assert_eq!(
            rows[1]["fields"],
            json!([
                {
                    "field": "pet-name",
                    "value": "Rex",
                    "step": "/pets/pet-name/0",
                    "label": "pages.confirm.fields.pet-name.label",
                    "changeLinkDescription": "pages.confirm.fields.pet-name.changeLinkDescription"
                },
                {"spacer": true},
                {
                    "field": "pet-name",
                    "value": "Tom",
                    "step": "/pets/pet-name/1",
                    "label": "pages.confirm.fields.pet-name.label",
                    "changeLinkDescription": "pages.confirm.fields.pet-name.changeLinkDescription"
                }
            ])
        );
        assert_eq!(locals["route"], json!("confirm"));
    }

    #[test]
    fn custom_section_source_is_used_for_base_sections() {
        let wizard = WizardConfig::from_json_str(WIZARD).expect("wizard");
        let controller = SummaryPageController::new(StandardController, wizard).with_section_source(Fixed);
        let mut session = session();
        let req = StepRequest::new(
            RouteParams::default(),
            StepOptions::new("/confirm"),
            &mut session,
            &identity,
        );
        let sections = controller.parse_sections(&req);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].section, "pages.confirm.sections.pets.header");
        assert_eq!(sections[1].section, "fixed");
    }
}
