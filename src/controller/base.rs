use serde_json::Value;

use super::request::{Locals, StepRequest};
use crate::errors::Result;
use crate::session::{is_blank, StoredItem};
use crate::utils::paths::{join_url, relative_route};

/// Outcome of serving a GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResponse {
    /// Render the named template.
    Render(String),
    Redirect(String),
}

/// Request handling contract shared by plain steps and the layers wrapped
/// around them.
///
/// Wrappers hold their base controller and call it explicitly; a base never
/// calls back into the wrapper. Callers that need the wrapper's view of
/// `locals` or `get_next_step` must ask the outermost controller.
pub trait StepController {
    /// Adjusts the request's step options before any other operation runs.
    fn configure(&self, _req: &mut StepRequest<'_>) -> Result<()> {
        Ok(())
    }

    fn get(&self, req: &mut StepRequest<'_>) -> Result<StepResponse>;

    /// Values used to pre-fill the form.
    fn get_values(&self, req: &StepRequest<'_>) -> Result<StoredItem>;

    fn locals(&self, req: &StepRequest<'_>) -> Result<Locals>;

    fn save_values(&self, req: &mut StepRequest<'_>) -> Result<()>;

    fn success_handler(&self, req: &mut StepRequest<'_>) -> Result<()>;

    fn get_next_step(&self, req: &StepRequest<'_>) -> String;

    fn get_back_link(&self, req: &StepRequest<'_>) -> Option<String>;

    /// Target of the last fork whose condition matches the submitted values,
    /// otherwise the step's `next`.
    fn get_fork_target(&self, req: &StepRequest<'_>) -> Option<String> {
        let options = &req.form.options;
        options
            .forks
            .iter()
            .filter(|fork| req.form.values.get(&fork.condition.field) == Some(&fork.condition.value))
            .last()
            .map(|fork| fork.target.clone())
            .or_else(|| options.next.clone())
    }
}

/// Plain single-page step backed by the session store.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardController;

impl StandardController {
    pub fn new() -> Self {
        Self
    }
}

impl StepController for StandardController {
    fn get(&self, req: &mut StepRequest<'_>) -> Result<StepResponse> {
        let template = match req.params.action.as_deref() {
            Some(action) => format!("{}/{}", relative_route(&req.form.options.route), action),
            None => relative_route(&req.form.options.route).to_string(),
        };
        Ok(StepResponse::Render(template))
    }

    fn get_values(&self, req: &StepRequest<'_>) -> Result<StoredItem> {
        let session = req.session();
        Ok(req
            .form
            .options
            .fields
            .keys()
            .filter_map(|field| session.get(field).map(|value| (field.clone(), value)))
            .collect())
    }

    fn locals(&self, req: &StepRequest<'_>) -> Result<Locals> {
        let mut locals = Locals::new();
        locals.insert(
            "route".into(),
            Value::String(relative_route(&req.form.options.route).to_string()),
        );
        if let Some(action) = &req.params.action {
            locals.insert("action".into(), Value::String(action.clone()));
        }
        locals.insert("baseUrl".into(), Value::String(req.base_url.clone()));
        if let Some(back_link) = self.get_back_link(req) {
            locals.insert("backLink".into(), Value::String(back_link));
        }
        Ok(locals)
    }

    /// Copies submitted values into the session; blank submissions clear the key.
    fn save_values(&self, req: &mut StepRequest<'_>) -> Result<()> {
        let mut cleared = Vec::new();
        for (field, value) in &req.form.values {
            if is_blank(value) {
                cleared.push(field.clone());
            } else {
                req.session.set(field, value.clone());
            }
        }
        if !cleared.is_empty() {
            req.session.unset(&cleared);
        }
        Ok(())
    }

    fn success_handler(&self, _req: &mut StepRequest<'_>) -> Result<()> {
        Ok(())
    }

    fn get_next_step(&self, req: &StepRequest<'_>) -> String {
        let next = self.get_fork_target(req).unwrap_or_default();
        join_url(&[req.base_url.as_str(), next.as_str()])
    }

    fn get_back_link(&self, req: &StepRequest<'_>) -> Option<String> {
        req.form.options.back_link.clone()
    }
}
