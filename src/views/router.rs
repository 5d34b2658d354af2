//! Path Routing
//!
//! Maps the browser path to the view shown in the content area and to the
//! sidebar link that should be highlighted. Both are total functions.

/// Content shown in the main area
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewTag {
    /// Project information ("Inicio")
    Home,
    /// Dataset charts ("Análisis de datos")
    Analytics,
    /// X-ray upload and predictions ("Predicción")
    Upload,
    /// Any unrecognized path, echoed back to the user
    NotFound(String),
}

/// Resolve a path to its view
pub fn route(path: &str) -> ViewTag {
    match path {
        "/" | "/page-1" => ViewTag::Home,
        "/page-2" => ViewTag::Analytics,
        "/page-3" => ViewTag::Upload,
        other => ViewTag::NotFound(other.to_string()),
    }
}

/// Which of the three sidebar links is active. `/` counts as page 1.
pub fn active_links(path: &str) -> (bool, bool, bool) {
    if path == "/" {
        return (true, false, false);
    }
    (path == "/page-1", path == "/page-2", path == "/page-3")
}
