use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::state::{ActionButton, Breadcrumb, FrameState};

/// Delay before an exhausted loader snaps back to idle.
const RESET_DELAY: Duration = Duration::from_millis(500);

const DEFAULT_ACTION_STYLES: &str = "success create";

#[derive(Debug, Default)]
struct Inner {
    state: FrameState,
    /// The single outstanding loader-reset task. Its presence prevents a
    /// duplicate from being scheduled; it clears itself when it fires.
    reset_task: Option<JoinHandle<()>>,
}

/// Cloneable handle to the shared view-frame state.
///
/// Created once by the composition root and shared between otherwise
/// unrelated views; tests construct their own isolated instance. Getters
/// return snapshots — all mutation goes through the operations here.
/// Every operation is infallible: inputs clamp or default, never reject.
#[derive(Debug, Clone, Default)]
pub struct ViewFrame {
    inner: Arc<RwLock<Inner>>,
}

impl ViewFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk-overwrite recognized [`FrameState`] fields from a key/value
    /// mapping. Unknown keys and mis-typed values are silently dropped;
    /// `loader_unit` stays the rendering of `loader_width` no matter what
    /// the mapping says.
    pub async fn initialize(&self, options: &Map<String, Value>) {
        let mut inner = self.inner.write().await;
        let state = &mut inner.state;
        for (key, value) in options {
            match key.as_str() {
                "session_theme" => {
                    if let Some(value) = value.as_str() {
                        state.session_theme = value.to_string();
                    }
                }
                "frame_title" => {
                    if let Some(value) = value.as_str() {
                        state.frame_title = value.to_string();
                    }
                }
                "route_next" => {
                    if let Some(value) = value.as_str() {
                        state.route_next = value.to_string();
                    }
                }
                "loader_width" => {
                    if let Some(width) = value.as_u64() {
                        set_width(state, width.min(100) as u32);
                    }
                }
                "loader_step" => {
                    if let Some(step) = value.as_u64() {
                        state.loader_step = step.min(100) as u32;
                    }
                }
                // Derived field: already kept in sync by loader_width.
                "loader_unit" => {}
                "breadcrumbs" => {
                    if let Ok(crumbs) = serde_json::from_value(value.clone()) {
                        state.breadcrumbs = crumbs;
                    }
                }
                "actions" => {
                    if let Ok(actions) = serde_json::from_value(value.clone()) {
                        state.actions = actions;
                    }
                }
                other => debug!(key = other, "ignoring unrecognized frame key"),
            }
        }
    }

    // ── Title and theme ───────────────────────────────────────────────────────

    pub async fn set_title(&self, title: impl Into<String>) {
        self.inner.write().await.state.frame_title = title.into();
    }

    pub async fn set_session_theme(&self, theme: impl Into<String>) {
        self.inner.write().await.state.session_theme = theme.into();
    }

    pub async fn session_theme(&self) -> String {
        self.inner.read().await.state.session_theme.clone()
    }

    // ── Breadcrumbs ───────────────────────────────────────────────────────────

    /// Append a visited view. The display text defaults to the redirect.
    /// `route_next` becomes the just-added redirect only once the stack
    /// holds at least two entries — with a single entry there is nowhere
    /// to go back to.
    pub async fn add_breadcrumb(&self, redirect: &str, display_text: Option<&str>) {
        let mut inner = self.inner.write().await;
        let state = &mut inner.state;
        state.breadcrumbs.push(Breadcrumb {
            redirect: redirect.to_string(),
            display_text: display_text.unwrap_or(redirect).to_string(),
        });
        state.route_next = if state.breadcrumbs.len() >= 2 {
            redirect.to_string()
        } else {
            String::new()
        };
    }

    pub async fn clear_breadcrumbs(&self) {
        let mut inner = self.inner.write().await;
        inner.state.breadcrumbs.clear();
        inner.state.route_next.clear();
    }

    pub async fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        self.inner.read().await.state.breadcrumbs.clone()
    }

    /// Resolve the "back" target.
    ///
    /// With `should_pop` false this is a pure peek. Otherwise two entries
    /// come off the stack: the view being left, then the view being
    /// returned to — the controller handling the resulting navigation
    /// re-pushes the latter. A stack with fewer than two entries drains to
    /// empty and resolves to `""` without complaint.
    pub async fn previous_route(&self, should_pop: bool) -> String {
        let mut inner = self.inner.write().await;
        if !should_pop {
            return inner.state.route_next.clone();
        }
        let state = &mut inner.state;
        state.route_next = match state.breadcrumbs.pop() {
            None => String::new(),
            Some(_leaving) => state
                .breadcrumbs
                .pop()
                .map(|entry| entry.redirect)
                .unwrap_or_default(),
        };
        state.route_next.clone()
    }

    // ── Action buttons ────────────────────────────────────────────────────────

    /// Append a header action with default styling (`btn success create`).
    pub async fn add_action(&self, display_text: &str, redirect: &str) {
        self.add_action_full(display_text, redirect, DEFAULT_ACTION_STYLES, "", "")
            .await;
    }

    pub async fn add_action_full(
        &self,
        display_text: &str,
        redirect: &str,
        styles: &str,
        target: &str,
        endpoint: &str,
    ) {
        self.inner.write().await.state.actions.push(ActionButton {
            styles: format!("btn {}", styles),
            display_text: display_text.to_string(),
            redirect: redirect.to_string(),
            target: target.to_string(),
            endpoint: endpoint.to_string(),
        });
    }

    pub async fn clear_actions(&self) {
        self.inner.write().await.state.actions.clear();
    }

    pub async fn actions(&self) -> Vec<ActionButton> {
        self.inner.read().await.state.actions.clone()
    }

    // ── Loader cycle ──────────────────────────────────────────────────────────

    /// Enter the loading state with `n` expected increments.
    ///
    /// Only takes effect while idle: a second caller mid-cycle must not
    /// reset the progress granularity, so non-idle calls (and `n = 0`) are
    /// no-ops.
    pub async fn set_loader_steps(&self, n: u32) {
        let mut inner = self.inner.write().await;
        if inner.state.loader_width != 0 || n == 0 {
            return;
        }
        inner.state.loader_step = 100u32.div_ceil(n);
        set_width(&mut inner.state, 1);
    }

    /// Advance the loader one step, capped at 100. Reaching the cap
    /// schedules the one-shot reset back to idle, unless one is already
    /// pending.
    pub async fn increment_loader(&self) {
        let mut inner = self.inner.write().await;
        let width = (inner.state.loader_width + inner.state.loader_step).min(100);
        set_width(&mut inner.state, width);

        if width >= 100 && inner.reset_task.is_none() {
            let frame = self.clone();
            inner.reset_task = Some(tokio::spawn(async move {
                tokio::time::sleep(RESET_DELAY).await;
                let mut inner = frame.inner.write().await;
                inner.state.loader_step = 0;
                set_width(&mut inner.state, 0);
                inner.reset_task = None;
            }));
        }
    }

    /// Force an immediate return to idle. An already-scheduled reset task
    /// is left to fire; it writes idle over idle.
    pub async fn reset_loader(&self) {
        let mut inner = self.inner.write().await;
        inner.state.loader_step = 0;
        set_width(&mut inner.state, 0);
    }

    // ── Snapshot ──────────────────────────────────────────────────────────────

    pub async fn state(&self) -> FrameState {
        self.inner.read().await.state.clone()
    }
}

fn set_width(state: &mut FrameState, width: u32) {
    state.loader_width = width;
    state.loader_unit = width.to_string();
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn initialize_ignores_unknown_keys() {
        let frame = ViewFrame::new();
        let mut options = Map::new();
        options.insert("session_theme".into(), json!("dark"));
        options.insert("no_such_field".into(), json!("x"));
        frame.initialize(&options).await;

        let state = frame.state().await;
        assert_eq!(state.session_theme, "dark");
        assert_eq!(state.frame_title, "");
    }

    #[tokio::test]
    async fn initialize_recognizes_every_field_name() {
        let frame = ViewFrame::new();
        let mut options = Map::new();
        options.insert("frame_title".into(), json!("Services"));
        options.insert("route_next".into(), json!("#!/services"));
        options.insert("loader_width".into(), json!(50));
        options.insert("loader_step".into(), json!(10));
        options.insert(
            "breadcrumbs".into(),
            json!([{ "redirect": "/a", "display_text": "A" }]),
        );
        options.insert(
            "actions".into(),
            json!([{
                "styles": "btn success create",
                "display_text": "New Item",
                "redirect": "#/new",
                "target": "",
                "endpoint": ""
            }]),
        );
        frame.initialize(&options).await;

        let state = frame.state().await;
        assert_eq!(state.frame_title, "Services");
        assert_eq!(state.route_next, "#!/services");
        assert_eq!(state.loader_width, 50);
        assert_eq!(state.loader_step, 10);
        assert_eq!(state.loader_unit, "50");
        assert_eq!(state.breadcrumbs.len(), 1);
        assert_eq!(state.breadcrumbs[0].redirect, "/a");
        assert_eq!(state.actions.len(), 1);
        assert_eq!(state.actions[0].display_text, "New Item");
    }

    #[tokio::test]
    async fn initialize_clamps_width_and_derives_unit() {
        let frame = ViewFrame::new();
        let mut options = Map::new();
        options.insert("loader_width".into(), json!(250));
        options.insert("loader_unit".into(), json!("99"));
        options.insert("loader_step".into(), json!("ten"));
        frame.initialize(&options).await;

        let state = frame.state().await;
        assert_eq!(state.loader_width, 100);
        // Always the rendering of loader_width, never the supplied value.
        assert_eq!(state.loader_unit, "100");
        // Mis-typed values degrade to no effect.
        assert_eq!(state.loader_step, 0);
    }

    // ── Breadcrumbs ───────────────────────────────────────────────────────────

    #[tokio::test]
    async fn first_breadcrumb_leaves_route_next_empty() {
        let frame = ViewFrame::new();
        frame.add_breadcrumb("#!/services", Some("Services")).await;
        assert_eq!(frame.state().await.route_next, "");
    }

    #[tokio::test]
    async fn back_navigation_pops_two() {
        let frame = ViewFrame::new();
        frame.clear_breadcrumbs().await;
        frame.add_breadcrumb("/a", Some("A")).await;
        frame.add_breadcrumb("/b", Some("B")).await;
        assert_eq!(frame.state().await.route_next, "/b");

        assert_eq!(frame.previous_route(true).await, "/a");
        assert!(frame.breadcrumbs().await.is_empty());

        // Empty stack resolves to empty without complaint.
        assert_eq!(frame.previous_route(true).await, "");
    }

    #[tokio::test]
    async fn peek_does_not_mutate() {
        let frame = ViewFrame::new();
        frame.add_breadcrumb("/a", None).await;
        frame.add_breadcrumb("/b", None).await;

        assert_eq!(frame.previous_route(false).await, "/b");
        assert_eq!(frame.breadcrumbs().await.len(), 2);
    }

    #[tokio::test]
    async fn single_entry_stack_drains_to_empty() {
        let frame = ViewFrame::new();
        frame.add_breadcrumb("/only", None).await;
        assert_eq!(frame.previous_route(true).await, "");
        assert!(frame.breadcrumbs().await.is_empty());
    }

    #[tokio::test]
    async fn display_text_defaults_to_redirect() {
        let frame = ViewFrame::new();
        frame.add_breadcrumb("#!/routes", None).await;
        let crumbs = frame.breadcrumbs().await;
        assert_eq!(crumbs[0].display_text, "#!/routes");
    }

    #[tokio::test]
    async fn clear_breadcrumbs_resets_route_next() {
        let frame = ViewFrame::new();
        frame.add_breadcrumb("/a", None).await;
        frame.add_breadcrumb("/b", None).await;
        frame.clear_breadcrumbs().await;

        let state = frame.state().await;
        assert!(state.breadcrumbs.is_empty());
        assert_eq!(state.route_next, "");
    }

    // ── Action buttons ────────────────────────────────────────────────────────

    #[tokio::test]
    async fn add_action_composes_default_styles() {
        let frame = ViewFrame::new();
        frame.add_action("New Item", "#/new").await;

        let actions = frame.actions().await;
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].styles, "btn success create");
        assert_eq!(actions[0].display_text, "New Item");
        assert_eq!(actions[0].redirect, "#/new");
    }

    #[tokio::test]
    async fn clear_actions_empties_the_list() {
        let frame = ViewFrame::new();
        frame.add_action("New Item", "#/new").await;
        frame
            .add_action_full("Delete", "", "danger delete", "object", "/services/s1")
            .await;
        assert_eq!(frame.actions().await.len(), 2);
        assert_eq!(frame.actions().await[1].styles, "btn danger delete");

        frame.clear_actions().await;
        assert!(frame.actions().await.is_empty());
    }

    // ── Loader cycle ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn loader_steps_compute_ceiling() {
        let frame = ViewFrame::new();
        frame.set_loader_steps(3).await;
        let state = frame.state().await;
        assert_eq!(state.loader_step, 34); // ceil(100/3)
        assert_eq!(state.loader_width, 1);
        assert_eq!(state.loader_unit, "1");
    }

    #[tokio::test]
    async fn loader_steps_noop_while_loading() {
        let frame = ViewFrame::new();
        frame.set_loader_steps(4).await;
        frame.set_loader_steps(10).await;
        assert_eq!(frame.state().await.loader_step, 25);
    }

    #[tokio::test]
    async fn loader_steps_zero_is_noop() {
        let frame = ViewFrame::new();
        frame.set_loader_steps(0).await;
        let state = frame.state().await;
        assert_eq!(state.loader_width, 0);
        assert_eq!(state.loader_step, 0);
    }

    #[tokio::test]
    async fn loader_width_caps_at_100() {
        let frame = ViewFrame::new();
        frame.set_loader_steps(3).await;
        let mut last = 0;
        for _ in 0..10 {
            frame.increment_loader().await;
            let state = frame.state().await;
            assert!(state.loader_width >= last, "width must not decrease");
            assert!(state.loader_width <= 100);
            assert_eq!(state.loader_unit, state.loader_width.to_string());
            last = state.loader_width;
        }
        assert_eq!(last, 100);
    }

    #[tokio::test(start_paused = true)]
    async fn loader_auto_resets_after_delay() {
        let frame = ViewFrame::new();
        frame.set_loader_steps(1).await;
        frame.increment_loader().await;
        assert_eq!(frame.state().await.loader_width, 100);

        tokio::time::sleep(Duration::from_millis(600)).await;
        let state = frame.state().await;
        assert_eq!(state.loader_width, 0);
        assert_eq!(state.loader_step, 0);
        assert_eq!(state.loader_unit, "0");

        // Idle again: a new cycle may begin.
        frame.set_loader_steps(2).await;
        assert_eq!(frame.state().await.loader_step, 50);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_reset_is_immediate_and_pending_timer_is_harmless() {
        let frame = ViewFrame::new();
        frame.set_loader_steps(1).await;
        frame.increment_loader().await;

        frame.reset_loader().await;
        assert_eq!(frame.state().await.loader_width, 0);

        // The scheduled reset still fires; it writes idle over idle.
        tokio::time::sleep(Duration::from_millis(600)).await;
        let state = frame.state().await;
        assert_eq!(state.loader_width, 0);
        assert_eq!(state.loader_step, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_increments_at_cap_schedule_one_reset() {
        let frame = ViewFrame::new();
        frame.set_loader_steps(1).await;
        frame.increment_loader().await;
        frame.increment_loader().await;
        frame.increment_loader().await;
        assert_eq!(frame.state().await.loader_width, 100);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(frame.state().await.loader_width, 0);
    }
}
