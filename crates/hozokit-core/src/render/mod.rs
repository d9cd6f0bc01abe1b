//! Template rendering for generated theme and component files
//!
//! Templates are compiled into the binary and rendered with Tera. Every file
//! operation is attempted even when an earlier one failed; failures are
//! collected and reported together.

pub mod component;
pub mod theme;

pub use component::{ComponentGenerator, ComponentReport};
pub use theme::{RenderReport, ThemeRenderer};

use crate::error::{Result, ScaffoldError};
use std::path::Path;
use tera::{Context, Tera};
use tokio::fs;

pub const BASE_STYLES_TEMPLATE: &str = "theme/base.scss";
pub const ENV_TEMPLATE: &str = "theme/.env";
pub const README_TEMPLATE: &str = "theme/README.md";
pub const COMPONENT_MARKUP_TEMPLATE: &str = "component/index.twig";
pub const COMPONENT_STYLE_TEMPLATE: &str = "component/style.scss";

const TEMPLATES: &[(&str, &str)] = &[
    (BASE_STYLES_TEMPLATE, include_str!("../../templates/theme/base.scss")),
    (ENV_TEMPLATE, include_str!("../../templates/theme/.env")),
    (README_TEMPLATE, include_str!("../../templates/theme/README.md")),
    (
        COMPONENT_MARKUP_TEMPLATE,
        include_str!("../../templates/component/index.twig"),
    ),
    (
        COMPONENT_STYLE_TEMPLATE,
        include_str!("../../templates/component/style.scss"),
    ),
];

/// Template engine loaded with the built-in templates
pub fn engine() -> Result<Tera> {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    tera.add_raw_templates(TEMPLATES.iter().copied())
        .map_err(|source| ScaffoldError::Template {
            name: "built-in templates".to_string(),
            source,
        })?;
    Ok(tera)
}

/// Render `name` with `context`
pub fn render(tera: &Tera, name: &str, context: &Context) -> Result<String> {
    tera.render(name, context)
        .map_err(|source| ScaffoldError::Template {
            name: name.to_string(),
            source,
        })
}

/// Render `name` and write it to `path`, creating parent directories
pub(crate) async fn write_rendered(
    tera: &Tera,
    name: &str,
    context: &Context,
    path: &Path,
) -> Result<()> {
    let content = render(tera, name, context)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| ScaffoldError::fs("create directory", parent, e))?;
    }
    fs::write(path, content)
        .await
        .map_err(|e| ScaffoldError::fs("write", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_templates_compile() {
        let tera = engine().unwrap();
        let names: Vec<&str> = tera.get_template_names().collect();
        for (name, _) in TEMPLATES {
            assert!(names.contains(name), "missing {}", name);
        }
    }

    #[test]
    fn test_twig_syntax_is_left_untouched() {
        let tera = engine().unwrap();
        let mut context = Context::new();
        context.insert("component_name", "Hero");
        context.insert("component_description", &None::<String>);
        context.insert("component_class", "hoz-hero");

        let markup = render(&tera, COMPONENT_MARKUP_TEMPLATE, &context).unwrap();
        assert!(markup.starts_with("{#"));
        assert!(markup.contains("{{ title }}"));
        assert!(markup.contains("class=\"hoz-hero\""));
    }
}
