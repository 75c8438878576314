//! Theme engine with Tera templates.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tera::Tera;
use tracing::debug;

use crate::markup::Markup;
use crate::navigation::Navigation;

/// Templates compiled into the binary; a template directory may override them.
const BUILTIN_TEMPLATES: [(&str, &str); 3] = [
    ("layout.html", include_str!("../../templates/layout.html")),
    ("dashboard.html", include_str!("../../templates/dashboard.html")),
    ("resource.html", include_str!("../../templates/resource.html")),
];

/// A navigation entry as templates see it.
#[derive(Debug, Serialize)]
struct NavigationView<'a> {
    label: &'a str,
    icon: &'a str,
    url: &'a str,
    active: bool,
}

/// Everything the layout needs besides page-specific variables.
#[derive(Debug)]
pub struct PageFrame<'a> {
    pub title: &'a str,
    pub navigation: &'a Navigation,
    pub route_name: Option<&'a str>,
    pub path: &'a str,
    pub scripts: Markup,
    pub styles: Markup,
}

/// Theme engine for rendering panel pages.
pub struct ThemeEngine {
    tera: Tera,
}

impl ThemeEngine {
    /// Create a theme engine from the built-in templates, overridden by any
    /// `*.html` files under `template_dir`.
    ///
    /// Overrides are named by their path relative to `template_dir` and may
    /// extend the built-in `layout.html`.
    pub fn new(template_dir: Option<&Path>) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(BUILTIN_TEMPLATES)
            .context("failed to compile built-in templates")?;

        if let Some(dir) = template_dir {
            let mut files = Vec::new();
            collect_templates(dir, dir, &mut files)
                .with_context(|| format!("failed to read templates in {}", dir.display()))?;

            debug!(path = %dir.display(), count = files.len(), "loading template overrides");
            tera.add_template_files(files)
                .context("failed to load template overrides")?;
        }

        debug!(count = tera.get_template_names().count(), "loaded templates");
        Ok(Self { tera })
    }

    /// Render `template` inside the panel layout.
    pub fn render_page(
        &self,
        template: &str,
        frame: &PageFrame<'_>,
        mut context: tera::Context,
    ) -> Result<Markup> {
        let navigation: Vec<NavigationView<'_>> = frame
            .navigation
            .sorted()
            .into_iter()
            .map(|item| NavigationView {
                label: &item.label,
                icon: &item.icon,
                url: &item.url,
                active: item.is_active(frame.route_name, frame.path),
            })
            .collect();

        context.insert("title", frame.title);
        context.insert("navigation", &navigation);
        context.insert("scripts", frame.scripts.as_str());
        context.insert("styles", frame.styles.as_str());

        let html = self
            .tera
            .render(template, &context)
            .with_context(|| format!("failed to render template {template}"))?;

        Ok(Markup::trusted(html))
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|t| t == name)
    }
}

/// Every `*.html` file under `dir`, paired with its name relative to `root`.
fn collect_templates(
    root: &Path,
    dir: &Path,
    files: &mut Vec<(PathBuf, Option<String>)>,
) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_templates(root, &path, files)?;
            continue;
        }
        if path.extension().is_some_and(|ext| ext == "html") {
            let name = path
                .strip_prefix(root)
                .ok()
                .map(|relative| relative.to_string_lossy().replace('\\', "/"));
            files.push((path, name));
        }
    }
    Ok(())
}

impl std::fmt::Debug for ThemeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeEngine")
            .field("templates", &self.tera.get_template_names().count())
            .finish()
    }
}
