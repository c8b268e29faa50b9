use serde_json::Value;

use super::base::{StepController, StepResponse};
use super::request::{Locals, StepRequest};
use crate::errors::Result;

/// What the web layer should do with a request.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Page { template: String, locals: Locals },
    Redirect(String),
}

impl PageOutcome {
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            PageOutcome::Redirect(target) => Some(target),
            PageOutcome::Page { .. } => None,
        }
    }

    pub fn locals(&self) -> Option<&Locals> {
        match self {
            PageOutcome::Page { locals, .. } => Some(locals),
            PageOutcome::Redirect(_) => None,
        }
    }
}

/// Serves a GET: configure, then either redirect or render with the form
/// values and page locals.
pub fn handle_get<C>(controller: &C, req: &mut StepRequest<'_>) -> Result<PageOutcome>
where
    C: StepController + ?Sized,
{
    controller.configure(req)?;
    match controller.get(req)? {
        StepResponse::Redirect(target) => Ok(PageOutcome::Redirect(target)),
        StepResponse::Render(template) => {
            let values = controller.get_values(req)?;
            let mut locals = controller.locals(req)?;
            locals.insert("values".into(), Value::Object(values));
            Ok(PageOutcome::Page { template, locals })
        }
    }
}

/// Serves a POST: configure, persist, record success, then redirect to the
/// next step. Persistence errors stop the request before anything else runs.
pub fn handle_post<C>(controller: &C, req: &mut StepRequest<'_>) -> Result<PageOutcome>
where
    C: StepController + ?Sized,
{
    controller.configure(req)?;
    controller.save_values(req)?;
    controller.success_handler(req)?;
    let next = controller.get_next_step(req);
    tracing::debug!(action = req.action(), %next, "step submitted");
    Ok(PageOutcome::Redirect(next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::base::StandardController;
    use crate::controller::request::{RouteParams, StepOptions};
    use crate::session::{MemorySession, SessionStore};
    use serde_json::json;

    fn identity(key: &str) -> String {
        key.to_string()
    }

    #[test]
    fn get_renders_with_values() {
        let mut session = MemorySession::new();
        session.set("name", json!("Rex"));
        let mut fields = crate::config::FieldSet::new();
        fields.insert("name".into(), None);
        let mut req = StepRequest::new(
            RouteParams::default(),
            StepOptions::new("/pet").with_fields(fields),
            &mut session,
            &identity,
        );
        let outcome = handle_get(&StandardController, &mut req).expect("get");
        match outcome {
            PageOutcome::Page { template, locals } => {
                assert_eq!(template, "pet");
                assert_eq!(locals["values"], json!({"name": "Rex"}));
                assert_eq!(locals["route"], json!("pet"));
            }
            other => panic!("Unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn post_saves_then_redirects() {
        let mut session = MemorySession::new();
        {
            let mut req = StepRequest::new(
                RouteParams::default(),
                StepOptions::new("/pet").with_next("/done"),
                &mut session,
                &identity,
            )
            .with_base_url("/app")
            .with_value("name", json!("Rex"));
            let outcome = handle_post(&StandardController, &mut req).expect("post");
            assert_eq!(outcome.redirect_target(), Some("/app/done"));
        }
        assert_eq!(session.get("name"), Some(json!("Rex")));
    }
}
