use std::{fmt, str::FromStr};

use serde_json::{Map, Value};

use crate::config::{FieldSet, Fork};
use crate::errors::WizardError;
use crate::session::{SessionStore, StoredItem};
use crate::translate::Translator;

/// Page model handed to the view layer.
pub type Locals = Map<String, Value>;

/// Optional edit segment of a loop URL (`/<route>/<sub-step>/<id>/<mode>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// Editing from the confirmation page; returns there when done.
    Edit,
    /// Editing from the loop's own summary page; returns there when done.
    Change,
    Delete,
}

impl EditMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditMode::Edit => "edit",
            EditMode::Change => "change",
            EditMode::Delete => "delete",
        }
    }
}

impl fmt::Display for EditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditMode {
    type Err = WizardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "edit" => Ok(EditMode::Edit),
            "change" => Ok(EditMode::Change),
            "delete" => Ok(EditMode::Delete),
            other => Err(WizardError::InvalidInput(format!(
                "unknown edit mode `{other}`"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    /// Current sub-step name.
    pub action: Option<String>,
    pub edit: Option<EditMode>,
    /// Index of the stored item being edited or deleted.
    pub id: Option<usize>,
}

impl RouteParams {
    pub fn action(action: impl Into<String>) -> Self {
        Self {
            action: Some(action.into()),
            ..Self::default()
        }
    }

    pub fn with_edit(mut self, edit: EditMode) -> Self {
        self.edit = Some(edit);
        self
    }

    pub fn with_id(mut self, id: usize) -> Self {
        self.id = Some(id);
        self
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.edit, Some(EditMode::Edit) | Some(EditMode::Change))
    }
}

/// Merged configuration of the step being served. Loop controllers overwrite
/// `fields`, `next`, `forks` and `prereqs` with the current sub-step's.
#[derive(Debug, Clone, Default)]
pub struct StepOptions {
    pub route: String,
    pub fields: FieldSet,
    pub next: Option<String>,
    pub forks: Vec<Fork>,
    pub prereqs: Vec<String>,
    pub back_link: Option<String>,
}

impl StepOptions {
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            ..Self::default()
        }
    }

    pub fn with_fields(mut self, fields: FieldSet) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_next(mut self, next: impl Into<String>) -> Self {
        self.next = Some(next.into());
        self
    }

    pub fn with_back_link(mut self, back_link: impl Into<String>) -> Self {
        self.back_link = Some(back_link.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormState {
    /// Submitted values, keyed by field.
    pub values: StoredItem,
    pub options: StepOptions,
}

/// Everything a controller sees while serving one request.
pub struct StepRequest<'a> {
    pub params: RouteParams,
    pub form: FormState,
    pub base_url: String,
    /// Path below `base_url`, e.g. `/people/name/0/change`.
    pub url: String,
    pub session: &'a mut dyn SessionStore,
    pub translator: &'a dyn Translator,
}

impl<'a> StepRequest<'a> {
    pub fn new(
        params: RouteParams,
        options: StepOptions,
        session: &'a mut dyn SessionStore,
        translator: &'a dyn Translator,
    ) -> Self {
        Self {
            params,
            form: FormState {
                values: StoredItem::new(),
                options,
            },
            base_url: String::new(),
            url: String::new(),
            session,
            translator,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_value(mut self, field: impl Into<String>, value: Value) -> Self {
        self.form.values.insert(field.into(), value);
        self
    }

    pub fn action(&self) -> &str {
        self.params.action.as_deref().unwrap_or_default()
    }

    pub fn session(&self) -> &dyn SessionStore {
        &*self.session
    }
}

impl fmt::Debug for StepRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepRequest")
            .field("params", &self.params)
            .field("form", &self.form)
            .field("base_url", &self.base_url)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}
