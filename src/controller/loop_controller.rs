//! Repeats a fixed run of sub-steps once per collected item.
//!
//! URLs look like `<baseUrl><route>/<sub-step>[/<id>[/<edit|change|delete>]]`.
//! Items live in the session under the loop's store key; the sub-steps a user
//! has completed are tracked under `subSteps` for back links.

use serde_json::Value;

use super::base::{StepController, StepResponse};
use super::request::{EditMode, Locals, StepRequest};
use crate::config::{FieldSet, FieldsConfig, LoopConfig, SubStep};
use crate::errors::Result;
use crate::session::{
    is_truthy, read_items, stored_len, visited_sub_steps, write_items, StoredItem,
    VISITED_SUB_STEPS_KEY,
};
use crate::summary::summary_for;
use crate::utils::paths::{join_url, relative_route, strip_leading_slash, strip_trailing_slash};

pub struct LoopController<B> {
    base: B,
    config: LoopConfig,
    fields: FieldSet,
    fields_config: FieldsConfig,
}

impl<B: StepController> LoopController<B> {
    /// Wraps `base`, filling the loop's default store and section keys and
    /// deriving its field set from the registry.
    pub fn new(base: B, mut config: LoopConfig, fields_config: &FieldsConfig) -> Self {
        config.apply_defaults();
        let fields = config.derive_field_set(fields_config);
        tracing::debug!(
            route = %config.route,
            store_key = config.store_key(),
            fields = fields.len(),
            "loop controller configured"
        );
        Self {
            base,
            config,
            fields,
            fields_config: fields_config.clone(),
        }
    }

    /// The defaulted configuration.
    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn confirm_step(&self) -> Option<&str> {
        self.config.loop_data.confirm_step.as_deref()
    }

    pub fn base(&self) -> &B {
        &self.base
    }

    fn find_sub_step(&self, req: &StepRequest<'_>) -> Option<&SubStep> {
        req.params
            .action
            .as_deref()
            .and_then(|action| self.config.sub_step(action))
    }

    fn final_step(&self) -> &str {
        self.config.final_step().unwrap_or_default()
    }

    fn first_step(&self) -> &str {
        self.config.first_step().unwrap_or_default()
    }

    fn has_items(&self, req: &StepRequest<'_>) -> bool {
        stored_len(req.session(), self.config.store_key()) > 0
    }

    fn items(&self, req: &StepRequest<'_>) -> Vec<StoredItem> {
        read_items(req.session(), self.config.store_key())
    }

    /// Every prerequisite key holds a value, `null` included.
    fn prereqs_satisfied(&self, step: &SubStep, req: &StepRequest<'_>) -> bool {
        step.prereqs
            .iter()
            .all(|prereq| req.session().get(prereq).is_some())
    }

    fn redirect_to(&self, step: &str, req: &StepRequest<'_>) -> StepResponse {
        let target = format!(
            "{}{}/{}",
            strip_trailing_slash(&req.base_url),
            strip_trailing_slash(&self.config.route),
            step
        );
        tracing::debug!(%target, "redirecting within loop");
        StepResponse::Redirect(target)
    }

    fn remove_item(&self, id: usize, req: &mut StepRequest<'_>) -> StepResponse {
        let mut items = self.items(req);
        if id < items.len() {
            items.remove(id);
            tracing::debug!(id, remaining = items.len(), "removed loop item");
        } else {
            tracing::warn!(id, len = items.len(), "delete requested for missing loop item");
        }
        let remaining = items.len();
        write_items(req.session, self.config.store_key(), items);
        let step = if remaining > 0 {
            self.final_step()
        } else {
            self.first_step()
        };
        self.redirect_to(step, req)
    }

    /// Next sub-step from the submitted values: the fork target when forks
    /// are configured, otherwise the declared `next`.
    fn next_sub_step(&self, req: &StepRequest<'_>) -> Option<String> {
        if req.form.options.forks.is_empty() {
            req.form.options.next.clone()
        } else {
            self.get_fork_target(req)
        }
    }

    fn merge_into_item(&self, id: usize, req: &mut StepRequest<'_>) {
        let mut items = self.items(req);
        let Some(item) = items.get_mut(id) else {
            tracing::warn!(id, len = items.len(), "edit submitted for missing loop item");
            return;
        };
        for (field, value) in &req.form.values {
            if is_truthy(value) {
                item.insert(field.clone(), value.clone());
            } else {
                item.shift_remove(field);
            }
        }
        write_items(req.session, self.config.store_key(), items);
        tracing::debug!(id, "updated loop item");
    }

    /// Collects the field set's session values into a new item and clears
    /// them from the session.
    fn append_item(&self, req: &mut StepRequest<'_>) {
        let item: StoredItem = self
            .fields
            .keys()
            .filter_map(|field| {
                req.session()
                    .get(field)
                    .filter(is_truthy)
                    .map(|value| (field.clone(), value))
            })
            .collect();
        let mut items = self.items(req);
        items.push(item);
        let count = items.len();
        write_items(req.session, self.config.store_key(), items);
        let fields: Vec<String> = self.fields.keys().cloned().collect();
        req.session.unset(&fields);
        tracing::debug!(items = count, "appended loop item");
    }
}

impl<B: StepController> StepController for LoopController<B> {
    /// Narrows the request to the current sub-step's fields. Routing keys the
    /// sub-step declares replace the step's own; the final sub-step keeps the
    /// step's `next`, which leads out of the loop.
    fn configure(&self, req: &mut StepRequest<'_>) -> Result<()> {
        let Some(step) = self.find_sub_step(req) else {
            return Ok(());
        };
        let options = &mut req.form.options;
        options.fields = self
            .fields
            .iter()
            .filter(|(name, _)| step.owns(name))
            .map(|(name, config)| (name.clone(), config.clone()))
            .collect();
        if step.next.is_some() {
            options.next = step.next.clone();
        }
        if !step.forks.is_empty() {
            options.forks = step.forks.clone();
        }
        if !step.prereqs.is_empty() {
            options.prereqs = step.prereqs.clone();
        }
        Ok(())
    }

    fn get(&self, req: &mut StepRequest<'_>) -> Result<StepResponse> {
        let allowed = match self.find_sub_step(req) {
            Some(step) => self.prereqs_satisfied(step, req) || req.params.is_editing(),
            None => false,
        };
        if !allowed {
            let step = if self.has_items(req) {
                self.final_step()
            } else {
                self.first_step()
            };
            return Ok(self.redirect_to(step, req));
        }
        if let (Some(EditMode::Delete), Some(id)) = (req.params.edit, req.params.id) {
            return Ok(self.remove_item(id, req));
        }
        self.base.get(req)
    }

    /// Base values, overlaid with the stored item being edited.
    fn get_values(&self, req: &StepRequest<'_>) -> Result<StoredItem> {
        let mut values = self.base.get_values(req)?;
        if let Some(id) = req.params.id {
            match self.items(req).into_iter().nth(id) {
                Some(item) => values.extend(item),
                None => tracing::warn!(id, "no stored loop item to pre-fill from"),
            }
        }
        Ok(values)
    }

    /// Base locals plus the loop page model. The base only knows its own
    /// back link, so the loop's link (previous visited sub-step) replaces it.
    fn locals(&self, req: &StepRequest<'_>) -> Result<Locals> {
        let mut locals = self.base.locals(req)?;
        let route = locals
            .get("route")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| relative_route(&self.config.route).to_string());
        let page_path = format!("{}-{}", route, req.action());
        let items = self.items(req);
        let page = summary_for(
            req.translator,
            &page_path,
            &items,
            &self.config,
            &self.fields_config,
        );
        if let Value::Object(page) = serde_json::to_value(page)? {
            locals.extend(page);
        }
        if let Some(back_link) = self.get_back_link(req) {
            locals.insert("backLink".into(), Value::String(back_link));
        }
        Ok(locals)
    }

    fn save_values(&self, req: &mut StepRequest<'_>) -> Result<()> {
        if let Some(id) = req.params.id {
            self.merge_into_item(id, req);
            return Ok(());
        }

        let next = self.next_sub_step(req);
        let reaches_final = next
            .as_deref()
            .map(|next| strip_leading_slash(next) == self.final_step())
            .unwrap_or(false);
        if reaches_final || self.config.sub_steps.len() == 1 {
            self.base.save_values(req)?;
            self.append_item(req);
            return Ok(());
        }

        if req.params.action.as_deref() == self.config.last_declared_step() {
            return Ok(());
        }
        self.base.save_values(req)
    }

    /// Moves the completed sub-step to the end of the visited history.
    fn success_handler(&self, req: &mut StepRequest<'_>) -> Result<()> {
        let action = req.action().to_string();
        let mut visited = visited_sub_steps(req.session());
        visited.retain(|step| *step != action);
        visited.push(action);
        req.session.set(
            VISITED_SUB_STEPS_KEY,
            Value::Array(visited.into_iter().map(Value::String).collect()),
        );
        self.base.success_handler(req)
    }

    fn get_next_step(&self, req: &StepRequest<'_>) -> String {
        let action = req.action();
        let last = self.final_step();

        match req.params.edit {
            Some(EditMode::Edit) => {
                return join_url(&[req.base_url.as_str(), self.confirm_step().unwrap_or_default()]);
            }
            Some(EditMode::Change) => {
                let route = relative_route(&self.config.route);
                let prefix = format!("{route}/{action}");
                let url = match req.url.find(&prefix) {
                    Some(start) => {
                        let keep = start + route.len() + 1;
                        format!("{}{}", &req.url[..keep], last)
                    }
                    None => req.url.clone(),
                };
                return join_url(&[req.base_url.as_str(), url.as_str()]);
            }
            _ => {}
        }

        if action != last {
            let Some(next) = self.next_sub_step(req) else {
                return self.base.get_next_step(req);
            };
            let url = match req.url.strip_suffix(action) {
                Some(prefix) => format!("{prefix}{next}"),
                None => req.url.clone(),
            };
            return join_url(&[req.base_url.as_str(), url.as_str()]);
        }

        let restart = self
            .config
            .loop_data
            .loop_condition
            .as_ref()
            .map(|condition| req.form.values.get(&condition.field) == Some(&condition.value))
            .unwrap_or(false);
        if restart {
            let mut url = req.url.replacen(action, self.first_step(), 1);
            if let Some(id) = req.params.id {
                let suffix = format!("/{id}");
                if let Some(stripped) = url.strip_suffix(&suffix) {
                    url = stripped.to_string();
                }
            }
            tracing::debug!(%url, "loop condition met, starting another item");
            return join_url(&[req.base_url.as_str(), url.as_str()]);
        }
        self.base.get_next_step(req)
    }

    /// Points at the previously completed sub-step, wrapping round to the
    /// summary step from the first one.
    fn get_back_link(&self, req: &StepRequest<'_>) -> Option<String> {
        let action = req.action();
        let mut seen = visited_sub_steps(req.session());
        seen.push(action.to_string());
        let sub_steps: Vec<&str> = self
            .config
            .sub_steps
            .keys()
            .map(String::as_str)
            .filter(|name| seen.iter().any(|step| step == name))
            .collect();

        let last = self.final_step();
        if sub_steps.len() == 1 || action == last {
            return self.base.get_back_link(req);
        }
        let previous = sub_steps
            .iter()
            .position(|name| *name == action)
            .and_then(|index| index.checked_sub(1))
            .and_then(|index| sub_steps.get(index).copied())
            .unwrap_or(last);
        Some(format!("{}/{}", relative_route(&self.config.route), previous))
    }

    fn get_fork_target(&self, req: &StepRequest<'_>) -> Option<String> {
        self.base.get_fork_target(req)
    }
}
