//! MiniJinja template environment for the server-rendered pages.
//!
//! Templates are embedded at compile time. When `templates.override_dir` is
//! configured, a file with the same relative name in that directory is used
//! instead of the embedded one, so pages can be customised without a rebuild.
//!
//! Besides whole-template rendering, [`Templates::render_blocks`] renders named
//! `{% block %}`s of a template against a context, which is what the htmx
//! fragment selector uses to answer partial requests.
//!
//! # Example
//!
//! ```rust,ignore
//! use htmx_patterns::templates::{Templates, TemplateResponse};
//! use minijinja::context;
//!
//! async fn home() -> TemplateResponse {
//!     TemplateResponse::new("home.html", context! { title => "Home" })
//! }
//! ```

mod helpers;
mod response;

pub use helpers::{pluralize, truncate};
pub use response::{render_deferred, DeferredTemplate, TemplateResponse, ViewResponse};

use minijinja::{Environment, Value};
use rust_embed::Embed;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Result;

/// Pages and partials embedded at compile time
#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

/// Shared, cheaply cloneable template environment.
#[derive(Clone)]
pub struct Templates {
    env: Arc<Environment<'static>>,
}

impl std::fmt::Debug for Templates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Templates").finish_non_exhaustive()
    }
}

impl Templates {
    /// Build the environment over the embedded templates, optionally shadowed
    /// by files in `override_dir`.
    pub fn load(override_dir: Option<&Path>) -> Result<Self> {
        let override_dir: Option<PathBuf> = override_dir.map(Path::to_path_buf);
        if let Some(dir) = &override_dir {
            tracing::info!("Template override directory: {}", dir.display());
        }

        let mut env = Environment::new();
        env.set_loader(move |name: &str| load_source(override_dir.as_deref(), name));
        register_helpers(&mut env);

        Ok(Self { env: Arc::new(env) })
    }

    /// Build an environment from in-memory sources only.
    pub fn from_sources<I, N, S>(sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<String>,
    {
        let mut env = Environment::new();
        for (name, source) in sources {
            env.add_template_owned(name.into(), source.into())?;
        }
        register_helpers(&mut env);
        Ok(Self { env: Arc::new(env) })
    }

    /// Render a whole template.
    pub fn render(&self, name: &str, ctx: &Value) -> Result<String> {
        let template = self.env.get_template(name)?;
        Ok(template.render(ctx)?)
    }

    /// Render the named blocks of `name` in order and concatenate the output.
    pub fn render_blocks(&self, name: &str, blocks: &[String], ctx: &Value) -> Result<String> {
        let template = self.env.get_template(name)?;
        let mut state = template.eval_to_state(ctx)?;
        let mut out = String::new();
        for block in blocks {
            out.push_str(&state.render_block(block)?);
        }
        Ok(out)
    }

    /// Names of all embedded templates
    pub fn embedded_names() -> Vec<String> {
        EmbeddedTemplates::iter().map(|s| s.to_string()).collect()
    }
}

fn load_source(override_dir: Option<&Path>, name: &str) -> std::result::Result<Option<String>, minijinja::Error> {
    if let Some(dir) = override_dir {
        let path = dir.join(name);
        if path.is_file() {
            return std::fs::read_to_string(&path).map(Some).map_err(|e| {
                minijinja::Error::new(
                    minijinja::ErrorKind::InvalidOperation,
                    format!("could not read template {}", path.display()),
                )
                .with_source(e)
            });
        }
    }

    match EmbeddedTemplates::get(name) {
        Some(file) => String::from_utf8(file.data.into_owned())
            .map(Some)
            .map_err(|e| {
                minijinja::Error::new(
                    minijinja::ErrorKind::InvalidOperation,
                    format!("template {name} is not valid UTF-8"),
                )
                .with_source(e)
            }),
        None => Ok(None),
    }
}

fn register_helpers(env: &mut Environment<'static>) {
    env.add_filter("pluralize", helpers::pluralize_filter);
    env.add_filter("truncate", helpers::truncate_filter);
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    fn layout() -> Templates {
        Templates::from_sources([
            (
                "base.html",
                "<html>{% block content %}{% endblock %}</html>",
            ),
            (
                "page.html",
                "{% extends \"base.html\" %}{% block content %}<h1>{{ title }}</h1>{% block items %}<ul>{% for i in items %}<li>{{ i }}</li>{% endfor %}</ul>{% endblock %}{% endblock %}",
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_render_whole_template() {
        let html = layout()
            .render("page.html", &context! { title => "Hi", items => vec![1, 2] })
            .unwrap();
        assert_eq!(html, "<html><h1>Hi</h1><ul><li>1</li><li>2</li></ul></html>");
    }

    #[test]
    fn test_render_blocks_of_child_template() {
        let html = layout()
            .render_blocks(
                "page.html",
                &["items".to_string()],
                &context! { title => "Hi", items => vec![3] },
            )
            .unwrap();
        assert_eq!(html, "<ul><li>3</li></ul>");
    }

    #[test]
    fn test_unknown_block_is_an_error() {
        let result = layout().render_blocks("page.html", &["nope".to_string()], &context! {});
        assert!(result.is_err());
    }

    #[test]
    fn test_autoescape_for_html_templates() {
        let templates = Templates::from_sources([("x.html", "{{ name }}")]).unwrap();
        let html = templates
            .render("x.html", &context! { name => "<b>" })
            .unwrap();
        assert_eq!(html, "&lt;b&gt;");
    }

    #[test]
    fn test_embedded_pages_load() {
        let templates = Templates::load(None).unwrap();
        assert!(Templates::embedded_names().contains(&"base.html".to_string()));
        assert!(templates.env.get_template("forms/field_row.html").is_ok());
    }

    #[test]
    fn test_override_dir_shadows_embedded() {
        let dir = std::env::temp_dir().join(format!("htmx-patterns-tpl-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("home.html"), "overridden {{ 1 + 1 }}").unwrap();

        let templates = Templates::load(Some(&dir)).unwrap();
        let html = templates.render("home.html", &context! {}).unwrap();
        assert_eq!(html, "overridden 2");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
