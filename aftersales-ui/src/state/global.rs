//! Global Application State
//!
//! Reactive state management using Leptos signals.

use aftersales::views::{Notice, NOTICE_TIMEOUT_MS};
use leptos::*;

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Notice currently on screen
    pub notice: RwSignal<Option<Notice>>,
    /// Bumped whenever tickets change so open lists and charts refetch
    pub revision: RwSignal<u32>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    provide_context(GlobalState {
        notice: create_rw_signal(None),
        revision: create_rw_signal(0),
    });
}

impl GlobalState {
    /// Show a notice; it clears itself unless replaced in the meantime
    pub fn notify(&self, notice: Notice) {
        self.notice.set(Some(notice.clone()));

        let signal = self.notice;
        gloo_timers::callback::Timeout::new(NOTICE_TIMEOUT_MS, move || {
            signal.update(|current| {
                if current.as_ref() == Some(&notice) {
                    *current = None;
                }
            });
        })
        .forget();
    }

    pub fn show_success(&self, message: &str) {
        self.notify(Notice::success(message));
    }

    pub fn show_warning(&self, message: &str) {
        self.notify(Notice::warning(message));
    }

    /// Log a failed call to the console and show an error notice
    pub fn report_failure(&self, action: &str, error: &str) {
        log::error!("Failed to {}: {}", action, error);
        self.notify(Notice::report_failure(action, &error));
    }

    pub fn clear_notice(&self) {
        self.notice.set(None);
    }

    /// Mark ticket data as stale
    pub fn tickets_changed(&self) {
        self.revision.update(|r| *r = r.wrapping_add(1));
    }
}
