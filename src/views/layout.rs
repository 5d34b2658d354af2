//! Page Layout
//!
//! Sidebar plus content area. The static fragments are rendered once when
//! the [`Layout`] is built; only the sidebar highlight and the 404 message
//! depend on the request.

use crate::analytics::Analytics;

use super::pages::{analytics_page, home_page, not_found_page, upload_page};
use super::router::{active_links, route, ViewTag};

const BOOTSTRAP_CSS: &str =
    "https://cdn.jsdelivr.net/npm/bootstrap@4.6.2/dist/css/bootstrap.min.css";
const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";

/// Sidebar entries: label and target path
const NAV_LINKS: [(&str, &str); 3] = [
    ("Inicio", "/page-1"),
    ("Análisis de datos", "/page-2"),
    ("Predicción", "/page-3"),
];

const STYLES: &str = r#"
        .sidebar {
            position: fixed;
            top: 0;
            left: 0;
            bottom: 0;
            width: 16rem;
            padding: 2rem 1rem;
            background-color: #f8f9fa;
        }
        .content {
            margin-left: 18rem;
            margin-right: 2rem;
            padding: 2rem 1rem;
        }
        .upload-zone {
            display: block;
            width: 100%;
            height: 60px;
            line-height: 60px;
            border: 1px dashed #6c757d;
            border-radius: 5px;
            text-align: center;
            margin: 10px;
            cursor: pointer;
        }
        .upload-zone.dragging { background-color: #e9ecef; }
        .upload-result img { height: 35%; width: 35%; }
        .upload-result pre { white-space: pre-wrap; word-break: break-all; }
"#;

/// A fully rendered page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub view: ViewTag,
    pub html: String,
}

impl RenderedPage {
    pub fn is_not_found(&self) -> bool {
        matches!(self.view, ViewTag::NotFound(_))
    }
}

/// Pre-rendered page skeleton and static views
#[derive(Debug, Clone)]
pub struct Layout {
    home: String,
    analytics: String,
    upload: String,
}

impl Layout {
    /// Render the static views. Chart data is baked into the analytics view.
    pub fn new(analytics: &Analytics) -> Self {
        Self {
            home: home_page(),
            analytics: analytics_page(analytics),
            upload: upload_page(),
        }
    }

    /// Render the page for a browser path
    pub fn render(&self, path: &str) -> RenderedPage {
        let view = route(path);
        let content = match &view {
            ViewTag::Home => self.home.clone(),
            ViewTag::Analytics => self.analytics.clone(),
            ViewTag::Upload => self.upload.clone(),
            ViewTag::NotFound(path) => not_found_page(path),
        };

        let html = document(&sidebar(active_links(path)), &content);
        RenderedPage { view, html }
    }
}

fn sidebar(active: (bool, bool, bool)) -> String {
    let flags = [active.0, active.1, active.2];
    let links: String = NAV_LINKS
        .iter()
        .zip(flags)
        .enumerate()
        .map(|(idx, ((label, href), is_active))| {
            format!(
                r#"            <a class="nav-link{active}" id="page-{n}-link" href="{href}">{label}</a>
"#,
                active = if is_active { " active" } else { "" },
                n = idx + 1,
                href = href,
                label = label,
            )
        })
        .collect();

    format!(
        r#"<div class="sidebar">
        <h2 class="display-4">Bone Age App</h2>
        <hr>
        <p class="lead">RSNA Bone Age Predict Age from X-Rays</p>
        <nav class="nav nav-pills flex-column">
{links}        </nav>
    </div>"#,
        links = links,
    )
}

fn document(sidebar: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Bone Age App</title>
    <link rel="stylesheet" href="{bootstrap}">
    <script src="{plotly}"></script>
    <style>{styles}</style>
</head>
<body>
    {sidebar}
    <div id="page-content" class="content">
{content}
    </div>
</body>
</html>"#,
        bootstrap = BOOTSTRAP_CSS,
        plotly = PLOTLY_JS,
        styles = STYLES,
        sidebar = sidebar,
        content = content,
    )
}
