#![allow(dead_code)]

use serde_json::Value;

use wizard_loop::{
    controller::{handle_get, handle_post, PageOutcome, RouteParams, StepOptions},
    Catalog, EditMode, LoopController, MemorySession, Result, StandardController, StepController,
    StepRequest, WizardConfig,
};

pub const WIZARD: &str = r#"{
    "steps": {
        "/name": {"fields": ["name"], "next": "/people"},
        "/people": {
            "next": "/contact",
            "loop": {
                "loopData": {
                    "storeKey": "people",
                    "confirmStep": "/confirm",
                    "headerField": "person-name",
                    "loopCondition": {"field": "another", "value": "yes"}
                },
                "subSteps": {
                    "person-name": {"fields": ["person-name"], "next": "age"},
                    "age": {
                        "fields": ["age"],
                        "next": "add-another",
                        "prereqs": "person-name",
                        "forks": [{"target": "guardian", "condition": {"field": "age", "value": "child"}}]
                    },
                    "guardian": {"fields": ["guardian"], "next": "add-another"},
                    "add-another": {"fields": ["another"]}
                }
            }
        },
        "/contact": {"fields": ["email"], "next": "/confirm"},
        "/confirm": {}
    },
    "fields": {
        "name": {},
        "person-name": {},
        "age": {},
        "guardian": {},
        "another": {"omitFromSummary": true},
        "email": {}
    }
}"#;

pub const LOCALE: &str = r#"{
    "pages": {
        "people-person-name": {
            "header": "Add a person",
            "item-2-header": "Add a second person"
        },
        "people-add-another": {"header": "People you have added"},
        "people": {"delete-text": "Remove", "header": "People"},
        "confirm": {"sections": {"contact": {"header": "Contact details"}}}
    },
    "fields": {
        "person-name": {"label": "Full name"},
        "age": {"summary": "Age group"}
    }
}"#;

pub fn wizard() -> WizardConfig {
    WizardConfig::from_json_str(WIZARD).expect("fixture wizard parses")
}

pub fn catalog() -> Catalog {
    Catalog::from_json_str(LOCALE).expect("fixture locale parses")
}

/// Drives one loop step through the request pipeline, the way a web
/// framework would for each incoming request.
pub struct Harness<C: StepController> {
    pub controller: C,
    pub session: MemorySession,
    pub catalog: Catalog,
    pub route: String,
    pub next: Option<String>,
}

impl Harness<LoopController<StandardController>> {
    pub fn people() -> Self {
        Self::people_with(StandardController)
    }
}

impl<B: StepController> Harness<LoopController<B>> {
    pub fn people_with(base: B) -> Self {
        let wizard = wizard();
        let config = wizard.loop_for("/people").expect("people is a loop");
        Harness {
            controller: LoopController::new(base, config, &wizard.fields),
            session: MemorySession::new(),
            catalog: catalog(),
            route: "/people".into(),
            next: Some("/contact".into()),
        }
    }

    pub fn items(&self) -> Value {
        use wizard_loop::SessionStore;
        self.session.get("people").unwrap_or(Value::Null)
    }

    pub fn get(&mut self, params: RouteParams) -> Result<PageOutcome> {
        let url = url_for(&self.route, &params);
        let mut options = StepOptions::new(self.route.clone())
            .with_fields(self.controller.fields().clone());
        options.next = self.next.clone();
        let mut req = StepRequest::new(params, options, &mut self.session, &self.catalog)
            .with_base_url("/app")
            .with_url(url);
        handle_get(&self.controller, &mut req)
    }

    pub fn post(&mut self, params: RouteParams, values: &[(&str, Value)]) -> Result<PageOutcome> {
        let url = url_for(&self.route, &params);
        let mut options = StepOptions::new(self.route.clone())
            .with_fields(self.controller.fields().clone());
        options.next = self.next.clone();
        let mut req = StepRequest::new(params, options, &mut self.session, &self.catalog)
            .with_base_url("/app")
            .with_url(url);
        for (field, value) in values {
            req.form.values.insert(field.to_string(), value.clone());
        }
        handle_post(&self.controller, &mut req)
    }
}

/// `/<route>/<action>[/<id>[/<edit>]]`
pub fn url_for(route: &str, params: &RouteParams) -> String {
    let mut url = route.to_string();
    if let Some(action) = &params.action {
        url.push('/');
        url.push_str(action);
    }
    if let Some(id) = params.id {
        url.push_str(&format!("/{id}"));
    }
    if let Some(edit) = params.edit {
        url.push('/');
        url.push_str(edit.as_str());
    }
    url
}

pub fn step(action: &str) -> RouteParams {
    RouteParams::action(action)
}

pub fn editing(action: &str, id: usize, mode: EditMode) -> RouteParams {
    RouteParams::action(action).with_id(id).with_edit(mode)
}
