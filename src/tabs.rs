//! Top-level tab sections.
//!
//! Exactly one tab is active at a time. What a tab shows and whether the
//! filter panel is visible are properties of each tab, not of its id.

/// Body content of a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabView {
    /// The chart grid; the only view that reacts to the pointer.
    Charts,
    /// Load report and per-institution summaries.
    Data,
    About,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabSpec {
    pub id: String,
    pub title: String,
    pub view: TabView,
    pub shows_filter: bool,
}

impl TabSpec {
    pub fn new(id: &str, title: &str, view: TabView, shows_filter: bool) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            view,
            shows_filter,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TabController {
    tabs: Vec<TabSpec>,
    active: usize,
}

impl TabController {
    /// The first tab starts active.
    pub fn new(tabs: Vec<TabSpec>) -> Self {
        Self { tabs, active: 0 }
    }

    /// Tabs shown by the terminal UI.
    pub fn standard() -> Self {
        Self::new(vec![
            TabSpec::new("charts", "Charts", TabView::Charts, true),
            TabSpec::new("data", "Data", TabView::Data, false),
            TabSpec::new("about", "About", TabView::About, false),
        ])
    }

    pub fn tabs(&self) -> &[TabSpec] {
        &self.tabs
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> Option<&TabSpec> {
        self.tabs.get(self.active)
    }

    /// Activate the tab with `id`. Unknown ids leave the current tab active.
    pub fn activate(&mut self, id: &str) -> bool {
        match self.tabs.iter().position(|t| t.id == id) {
            Some(idx) => {
                self.active = idx;
                true
            }
            None => false,
        }
    }

    pub fn activate_index(&mut self, index: usize) -> bool {
        if index < self.tabs.len() {
            self.active = index;
            true
        } else {
            false
        }
    }

    pub fn next(&mut self) {
        if !self.tabs.is_empty() {
            self.active = (self.active + 1) % self.tabs.len();
        }
    }

    pub fn prev(&mut self) {
        if !self.tabs.is_empty() {
            self.active = (self.active + self.tabs.len() - 1) % self.tabs.len();
        }
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.active().is_some_and(|t| t.id == id)
    }

    pub fn filter_visible(&self) -> bool {
        self.active().is_some_and(|t| t.shows_filter)
    }

    pub fn active_view(&self) -> Option<TabView> {
        self.active().map(|t| t.view)
    }
}
