//! Rendering of forms and single field rows.

use minijinja::{context, Value};

use super::Form;
use crate::error::{Error, Result};
use crate::templates::Templates;

/// Template for one labelled field with its errors
pub const FIELD_ROW_TEMPLATE: &str = "forms/field_row.html";
/// Template for a whole form body (non-field errors plus every row)
pub const FORM_TEMPLATE: &str = "forms/form.html";

/// Context for rendering the row of `field_name`, or `None` for an unknown field.
pub fn field_row_context(form: &Form, field_name: &str) -> Option<Value> {
    let field = form.field(field_name)?;
    Some(context! {
        field => field,
        errors => &field.errors,
        do_htmx_validation => form.do_htmx_validation,
    })
}

/// Render the row of a single field.
pub fn render_field_row(form: &Form, field_name: &str, templates: &Templates) -> Result<String> {
    let ctx = field_row_context(form, field_name)
        .ok_or_else(|| Error::BadRequest(format!("Unknown form field: {field_name}")))?;
    templates.render(FIELD_ROW_TEMPLATE, &ctx)
}
