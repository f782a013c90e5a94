//! Browser platform backed by `web_sys::Window`

use super::{DetachedTask, Platform};
use web_sys::window;

/// Platform for the wasm console running in a browser tab
#[derive(Debug, Clone, Copy, Default)]
pub struct WebPlatform;

impl Platform for WebPlatform {
    fn is_interactive(&self) -> bool {
        window().is_some()
    }

    fn current_path(&self) -> Option<String> {
        window()?.location().pathname().ok()
    }

    fn navigate(&self, path: &str) {
        let Some(window) = window() else {
            return;
        };
        if let Err(err) = window.location().set_href(path) {
            warn!(path, error = ?err, "Failed to navigate");
        }
    }

    fn reload(&self) {
        let Some(window) = window() else {
            return;
        };
        if let Err(err) = window.location().reload() {
            warn!(error = ?err, "Failed to reload page");
        }
    }

    fn spawn_detached(&self, task: DetachedTask) {
        wasm_bindgen_futures::spawn_local(task);
    }
}
