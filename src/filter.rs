//! Institution filter panel.
//!
//! One toggle per institution. The panel's selection is always read from the
//! toggles themselves; every change is published as a `SelectionChanged` event
//! to the single subscriber registered through `subscribe`.

use std::sync::mpsc::{self, Receiver, Sender};

use log::{debug, warn};

/// Published whenever a toggle flips. `selected` follows institution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChanged {
    pub selected: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toggle {
    pub institution: String,
    pub checked: bool,
}

#[derive(Debug, Default)]
pub struct FilterPanel {
    toggles: Vec<Toggle>,
    cursor: usize,
    visible: bool,
    subscriber: Option<Sender<SelectionChanged>>,
}

impl FilterPanel {
    pub fn new() -> Self {
        Self {
            visible: true,
            ..Self::default()
        }
    }

    /// Replace every toggle with a fresh, unchecked one per institution.
    pub fn build(&mut self, institutions: &[String]) {
        self.toggles = institutions
            .iter()
            .map(|institution| Toggle {
                institution: institution.clone(),
                checked: false,
            })
            .collect();
        self.cursor = 0;
    }

    /// Register the change listener. A later call replaces the earlier subscriber.
    pub fn subscribe(&mut self) -> Receiver<SelectionChanged> {
        let (tx, rx) = mpsc::channel();
        self.subscriber = Some(tx);
        rx
    }

    pub fn toggles(&self) -> &[Toggle] {
        &self.toggles
    }

    /// Names of the checked institutions, in toggle order.
    pub fn selection(&self) -> Vec<String> {
        self.toggles
            .iter()
            .filter(|t| t.checked)
            .map(|t| t.institution.clone())
            .collect()
    }

    /// Flip toggle `index`. Returns `false` when there is no such toggle.
    pub fn toggle(&mut self, index: usize) -> bool {
        let Some(toggle) = self.toggles.get_mut(index) else {
            return false;
        };
        toggle.checked = !toggle.checked;
        debug!("filter: {} -> {}", toggle.institution, toggle.checked);
        self.publish();
        true
    }

    /// Check or uncheck by name. Unknown names are ignored (and logged).
    pub fn set_checked(&mut self, institution: &str, checked: bool) -> bool {
        let Some(toggle) = self.toggles.iter_mut().find(|t| t.institution == institution) else {
            warn!("filter: unknown institution '{institution}'");
            return false;
        };
        if toggle.checked != checked {
            toggle.checked = checked;
            self.publish();
        }
        true
    }

    /// Uncheck everything.
    pub fn clear(&mut self) {
        if self.toggles.iter().any(|t| t.checked) {
            self.toggles.iter_mut().for_each(|t| t.checked = false);
            self.publish();
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_cursor(&mut self, delta: i32) {
        if self.toggles.is_empty() {
            return;
        }
        let last = self.toggles.len() - 1;
        self.cursor = if delta < 0 {
            self.cursor.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            (self.cursor + delta as usize).min(last)
        };
    }

    pub fn toggle_at_cursor(&mut self) -> bool {
        self.toggle(self.cursor)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn publish(&mut self) {
        let event = SelectionChanged {
            selected: self.selection(),
        };
        let Some(tx) = &self.subscriber else {
            return;
        };
        if tx.send(event).is_err() {
            debug!("filter: subscriber dropped");
            self.subscriber = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn build_replaces_existing_toggles() {
        let mut panel = FilterPanel::new();
        panel.build(&names(&["A", "B", "C"]));
        panel.toggle(1);
        panel.build(&names(&["X", "Y"]));
        assert_eq!(panel.toggles().len(), 2);
        assert!(panel.selection().is_empty());
    }

    #[test]
    fn toggles_publish_selection_in_institution_order() {
        let mut panel = FilterPanel::new();
        panel.build(&names(&["A", "B", "C"]));
        let rx = panel.subscribe();

        panel.toggle(2);
        panel.toggle(0);
        assert_eq!(rx.try_recv().unwrap().selected, names(&["C"]));
        assert_eq!(rx.try_recv().unwrap().selected, names(&["A", "C"]));
        assert!(rx.try_recv().is_err());

        assert!(!panel.toggle(9));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn set_checked_and_clear_only_publish_real_changes() {
        let mut panel = FilterPanel::new();
        panel.build(&names(&["A", "B"]));
        let rx = panel.subscribe();

        assert!(panel.set_checked("B", true));
        assert!(panel.set_checked("B", true));
        assert!(!panel.set_checked("Z", true));
        panel.clear();
        panel.clear();

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events.len(), 2);
        assert!(events[1].selected.is_empty());
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut panel = FilterPanel::new();
        panel.build(&names(&["A", "B"]));
        panel.move_cursor(-3);
        assert_eq!(panel.cursor(), 0);
        panel.move_cursor(5);
        assert_eq!(panel.cursor(), 1);
        assert!(panel.toggle_at_cursor());
        assert_eq!(panel.selection(), names(&["B"]));
    }

    #[test]
    fn dropped_subscriber_is_tolerated() {
        let mut panel = FilterPanel::new();
        panel.build(&names(&["A"]));
        drop(panel.subscribe());
        assert!(panel.toggle(0));
        assert!(panel.toggle(0));
    }
}
