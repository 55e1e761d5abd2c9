#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Analyze,
    Recommend,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Analyze, Tab::Recommend];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Analyze => "Analyze",
            Tab::Recommend => "Recommend",
        }
    }

    pub fn other(self) -> Tab {
        match self {
            Tab::Analyze => Tab::Recommend,
            Tab::Recommend => Tab::Analyze,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    Gallery,
}

/// Shows exactly one view at a time and marks its tab active.
#[derive(Debug, Default)]
pub struct TabSwitcher {
    active: Tab,
}

impl TabSwitcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        self.active = tab;
    }

    pub fn toggle(&mut self) {
        self.switch_tab(self.active.other());
    }

    pub fn active(&self) -> Tab {
        self.active
    }

    pub fn is_visible(&self, tab: Tab) -> bool {
        self.active == tab
    }

    pub fn is_active(&self, tab: Tab) -> bool {
        self.active == tab
    }
}
