use std::cell::RefCell;
use std::rc::Rc;

use aro_core::{ConversionResult, accepts_input, display_diameter, resolve_chart};
use chart_core::{Labels, Lang};
use serde::Serialize;
use web_sys::{Document, Window};

/// Diameter shown when the page opens.
pub const DEFAULT_INPUT: &str = "18.7";

/// Everything the converter view is derived from: the latest input and the
/// result computed from it, plus the two UI flags.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub input: String,
    pub result: ConversionResult,
    pub chart_visible: bool,
    pub copied: bool,
    pub lang: Lang,
    #[serde(skip)]
    copy_seq: u32,
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new(DEFAULT_INPUT)
    }
}

impl AppState {
    pub fn new(initial: &str) -> Self {
        AppState {
            input: initial.to_string(),
            result: resolve_chart(initial),
            chart_visible: false,
            copied: false,
            lang: Lang::default(),
            copy_seq: 0,
        }
    }

    /// Apply an edit from the text field. Edits rejected by the input filter
    /// leave the state untouched and return false.
    pub fn set_input(&mut self, candidate: &str) -> bool {
        if !accepts_input(candidate) {
            return false;
        }
        if candidate != self.input {
            self.input = candidate.to_string();
            self.result = resolve_chart(candidate);
            self.copied = false;
        }
        true
    }

    pub fn clear(&mut self) {
        self.set_input("");
    }

    pub fn toggle_chart(&mut self) {
        self.chart_visible = !self.chart_visible;
    }

    pub fn show_clear(&self) -> bool {
        !self.input.is_empty()
    }

    /// Text placed on the clipboard; nothing when the input is invalid.
    pub fn copy_text(&self) -> Option<String> {
        match (self.result.is_valid, self.result.size) {
            (true, Some(size)) => Some(size.to_string()),
            _ => None,
        }
    }

    /// Show the confirmation. Returns a ticket for [`AppState::reset_copied`].
    pub fn mark_copied(&mut self) -> u32 {
        self.copy_seq = self.copy_seq.wrapping_add(1);
        self.copied = true;
        self.copy_seq
    }

    /// Hide the confirmation unless a newer copy happened since `ticket`.
    pub fn reset_copied(&mut self, ticket: u32) {
        if ticket == self.copy_seq {
            self.copied = false;
        }
    }

    /// Diameter for the ring drawing: the parsed value, or 0.
    pub fn diameter_for_display(&self) -> f64 {
        display_diameter(&self.input)
    }
}

/// Browser handles plus the converter state, shared across callbacks.
pub struct State {
    pub window: Window,
    pub document: Document,
    pub app: AppState,
    pub labels: Labels,
}

impl State {
    pub fn set_lang(&mut self, lang: Lang) {
        self.app.lang = lang;
        self.labels = Labels::for_lang(lang);
    }
}

/// Thread local storage for the single runtime state instance.
thread_local! {
    pub static STATE: RefCell<Option<Rc<RefCell<State>>>> = const { RefCell::new(None) };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_default_diameter() {
        let app = AppState::default();
        assert_eq!(app.input, "18.7");
        assert_eq!(app.result.size, Some(19));
        assert!(!app.chart_visible);
        assert!(!app.copied);
    }

    #[test]
    fn filtered_edits_are_ignored() {
        let mut app = AppState::new("16.5");
        assert!(!app.set_input("16.5.1"));
        assert!(!app.set_input("abc"));
        assert_eq!(app.input, "16.5");
        assert_eq!(app.result.size, Some(12));
    }

    #[test]
    fn accepted_edits_recompute_result() {
        let mut app = AppState::default();
        assert!(app.set_input("1,"));
        assert_eq!(app.input, "1,");
        assert!(app.result.is_valid);
        assert!(app.set_input(","));
        assert!(!app.result.is_valid);
        assert_eq!(app.copy_text(), None);
    }

    #[test]
    fn clear_empties_and_invalidates() {
        let mut app = AppState::default();
        assert!(app.show_clear());
        app.clear();
        assert_eq!(app.input, "");
        assert_eq!(app.result, ConversionResult::INVALID);
        assert!(!app.show_clear());
        assert_eq!(app.diameter_for_display(), 0.0);
    }

    #[test]
    fn toggle_chart_flips() {
        let mut app = AppState::default();
        app.toggle_chart();
        assert!(app.chart_visible);
        app.toggle_chart();
        assert!(!app.chart_visible);
    }

    #[test]
    fn copy_confirmation_lifecycle() {
        let mut app = AppState::default();
        assert_eq!(app.copy_text().as_deref(), Some("19"));
        let first = app.mark_copied();
        let second = app.mark_copied();
        app.reset_copied(first);
        assert!(app.copied, "stale ticket must not hide a newer confirmation");
        app.reset_copied(second);
        assert!(!app.copied);

        app.mark_copied();
        app.set_input("20");
        assert!(!app.copied, "editing hides the confirmation");
    }

    #[test]
    fn snapshot_serializes_without_ticket() {
        let json = serde_json::to_string(&AppState::default()).unwrap();
        assert_eq!(
            json,
            r#"{"input":"18.7","result":{"size":19,"isValid":true},"chartVisible":false,"copied":false,"lang":"pt"}"#
        );
    }
}
