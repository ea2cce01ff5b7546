/// Tab identifiers for the TUI application.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TabId {
    #[default]
    Overview,
    Detail,
    Heatmap,
    Simulation,
    Sources,
}

impl TabId {
    pub const ALL: [TabId; 5] = [
        TabId::Overview,
        TabId::Detail,
        TabId::Heatmap,
        TabId::Simulation,
        TabId::Sources,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TabId::Overview => "Überblick",
            TabId::Detail => "Detail",
            TabId::Heatmap => "Heatmap",
            TabId::Simulation => "Lebensverdienst",
            TabId::Sources => "Quellen",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            TabId::Overview => 0,
            TabId::Detail => 1,
            TabId::Heatmap => 2,
            TabId::Simulation => 3,
            TabId::Sources => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}
