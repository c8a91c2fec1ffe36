//! HTML forms: binding submitted data, validation errors and rendering.
//!
//! A [`Form`] is a list of [`FormField`]s plus whole-form errors. It is
//! `Serialize`, so templates render it with `{% include "forms/form.html" %}`
//! and a single row with `forms/field_row.html`. Concrete forms implement
//! [`ValidatedForm`], which is what [`validate_field_layer`] needs to
//! re-validate one field for htmx.

mod monster_form;
mod render;
mod validate;

pub use monster_form::{MonsterForm, MonsterFormKind};
pub use render::{field_row_context, render_field_row, FIELD_ROW_TEMPLATE, FORM_TEMPLATE};
pub use validate::{validate_field_layer, VALIDATE_FIELD_PARAM};

use serde::Serialize;

/// Message for a missing required value
pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Submitted form data: urlencoded pairs in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData(Vec<(String, String)>);

impl FormData {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }

    /// Parse an urlencoded string; malformed input yields no pairs.
    pub fn parse(encoded: &str) -> Self {
        Self(serde_urlencoded::from_str(encoded).unwrap_or_default())
    }

    /// First value submitted for `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|(key, _)| key == name)
    }
}

impl From<Vec<(String, String)>> for FormData {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }
}

/// One `<option>` of a select field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

/// Widget used to render a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Widget {
    Text,
    Checkbox,
    Date,
    Select,
}

/// A form field with its submitted value and errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub widget: Widget,
    pub required: bool,
    /// Raw submitted value (or initial value) for redisplay
    pub value: String,
    /// Checkbox state
    pub checked: bool,
    pub max_length: Option<usize>,
    pub choices: Vec<Choice>,
    pub errors: Vec<String>,
}

impl FormField {
    pub fn new(name: impl Into<String>, label: impl Into<String>, widget: Widget) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            widget,
            required: false,
            value: String::new(),
            checked: false,
            max_length: None,
            choices: Vec::new(),
            errors: Vec::new(),
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    #[must_use]
    pub fn choices(mut self, choices: Vec<Choice>) -> Self {
        self.choices = choices;
        self
    }

    #[must_use]
    pub fn initial(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    #[must_use]
    pub fn initially_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// A set of fields plus errors not tied to any field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Form {
    pub fields: Vec<FormField>,
    pub non_field_errors: Vec<String>,
    /// Render `hx-get` attributes that re-validate a field when it changes
    pub do_htmx_validation: bool,
    /// Whether data was submitted (unbound forms show no errors)
    pub is_bound: bool,
}

impl Form {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self {
            fields,
            non_field_errors: Vec::new(),
            do_htmx_validation: false,
            is_bound: false,
        }
    }

    #[must_use]
    pub fn with_htmx_validation(mut self, enabled: bool) -> Self {
        self.do_htmx_validation = enabled;
        self
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// Attach an error to a field, or to the form when `field` is `None`
    /// or unknown.
    pub fn add_error(&mut self, field: Option<&str>, message: impl Into<String>) {
        let message = message.into();
        match field.and_then(|name| self.field_mut(name)) {
            Some(f) => f.errors.push(message),
            None => self.non_field_errors.push(message),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.non_field_errors.is_empty() || self.fields.iter().any(FormField::has_errors)
    }
}

/// A form that can be bound from submitted data and validated.
pub trait ValidatedForm: Send + Sized + 'static {
    /// Bind submitted data; nothing is validated yet.
    fn bind(data: &FormData) -> Self;

    /// Run field validation and the whole-record check. Errors end up in
    /// [`ValidatedForm::form`].
    fn is_valid(&mut self) -> bool;

    /// Field values and errors for rendering
    fn form(&self) -> &Form;
}
