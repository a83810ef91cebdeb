use serde::{Deserialize, Serialize};

/// One entry in the navigation history stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    /// Navigation target, e.g. `#!/services`.
    pub redirect: String,
    /// Label shown in the header; defaults to the redirect when unset.
    pub display_text: String,
}

/// A header-rendered control set by the currently active view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionButton {
    /// Composed style class string, always prefixed `"btn "`.
    pub styles: String,
    pub display_text: String,
    pub redirect: String,
    pub target: String,
    pub endpoint: String,
}

/// Shared header/navigation state, one instance per process.
///
/// `loader_unit` is always the string rendering of `loader_width`; within
/// one progress cycle `loader_width` only grows, and never past 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameState {
    pub session_theme: String,
    pub frame_title: String,
    pub breadcrumbs: Vec<Breadcrumb>,
    /// The most recently resolved "previous route" target.
    pub route_next: String,
    pub actions: Vec<ActionButton>,
    pub loader_width: u32,
    pub loader_step: u32,
    pub loader_unit: String,
}

impl Default for FrameState {
    fn default() -> Self {
        Self {
            session_theme: String::new(),
            frame_title: String::new(),
            breadcrumbs: Vec::new(),
            route_next: String::new(),
            actions: Vec::new(),
            loader_width: 0,
            loader_step: 0,
            loader_unit: "0".to_string(),
        }
    }
}
