use std::path::PathBuf;

use tariffscope_core::model::DEFAULT_DURATION_YEARS;
use tariffscope_core::simulation::YEARS_RANGE;
use tariffscope_core::{Dashboard, LoadError, Recomputed, Selections, Side};

use crate::export::{ExportFormat, write_export};

use super::TabId;

/// What the dashboard area currently shows
#[derive(Debug, Clone, PartialEq, Default)]
pub enum View {
    /// Nothing recomputed yet
    #[default]
    Loading,
    Ready(Box<Dashboard>),
    /// The selected pair has no comparable cells
    NoData,
    /// No source could be resolved; replaces the dashboard entirely
    Fatal(String),
}

#[derive(Debug)]
pub struct AppState {
    pub exit: bool,
    pub active_tab: TabId,
    /// Table names of the resolved source
    pub tables: Vec<String>,
    /// Display form of the resolved source
    pub source_label: Option<String>,
    pub selections: Selections,
    pub view: View,
    pub error_message: Option<String>,
    pub status_message: Option<String>,
    pub export_dir: PathBuf,
    /// Step duration used when switching to the custom time mode
    pub custom_years: f64,
    pub detail_scroll: usize,
    pub simulation_scroll: usize,
    needs_refresh: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Selections::default(), PathBuf::from("."))
    }
}

impl AppState {
    pub fn new(selections: Selections, export_dir: PathBuf) -> Self {
        Self {
            exit: false,
            active_tab: TabId::default(),
            tables: Vec::new(),
            source_label: None,
            selections,
            view: View::default(),
            error_message: None,
            status_message: None,
            export_dir,
            custom_years: DEFAULT_DURATION_YEARS,
            detail_scroll: 0,
            simulation_scroll: 0,
            needs_refresh: false,
        }
    }

    pub fn dashboard(&self) -> Option<&Dashboard> {
        match &self.view {
            View::Ready(d) => Some(&**d),
            _ => None,
        }
    }

    pub fn switch_tab(&mut self, tab: TabId) {
        self.active_tab = tab;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status_message = None;
        self.error_message = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.error_message = None;
        self.status_message = Some(message.into());
    }

    /// Install the listed tables, keeping configured tariffs that exist.
    pub fn set_tables(&mut self, tables: Vec<String>) {
        let known = |name: &str| tables.iter().any(|t| t == name);
        if !known(&self.selections.tariff_a) {
            self.selections.tariff_a = tables.first().cloned().unwrap_or_default();
        }
        if !known(&self.selections.tariff_b) {
            self.selections.tariff_b = tables
                .get(1)
                .or(tables.first())
                .cloned()
                .unwrap_or_default();
        }
        self.tables = tables;
        self.request_refresh();
    }

    pub fn set_fatal(&mut self, message: impl Into<String>) {
        self.view = View::Fatal(message.into());
    }

    pub fn request_refresh(&mut self) {
        self.needs_refresh = true;
    }

    /// Whether a refresh was requested since the last call
    pub fn take_refresh(&mut self) -> bool {
        std::mem::take(&mut self.needs_refresh)
    }

    /// Apply a recomputation; a failed refresh keeps the previous view.
    pub fn apply_outcome(&mut self, outcome: Result<Recomputed, LoadError>) {
        match outcome {
            Ok(Recomputed::Ready(dashboard)) => {
                self.clear_error();
                self.detail_scroll = self.detail_scroll.min(dashboard.detail.len().saturating_sub(1));
                self.simulation_scroll = self
                    .simulation_scroll
                    .min(dashboard.simulation.len().saturating_sub(1));
                self.view = View::Ready(dashboard);
            }
            Ok(Recomputed::NoData) => {
                self.clear_error();
                self.view = View::NoData;
            }
            Err(e) => {
                tracing::warn!(error = %e, "refresh failed");
                self.set_error(e.to_string());
            }
        }
    }

    // ========== Selection changes ==========

    pub fn cycle_tariff(&mut self, side: Side, forward: bool) {
        if self.tables.is_empty() {
            return;
        }
        let current = match side {
            Side::A => &self.selections.tariff_a,
            Side::B => &self.selections.tariff_b,
        };
        let len = self.tables.len();
        let index = self.tables.iter().position(|t| t == current).unwrap_or(0);
        let next = if forward {
            (index + 1) % len
        } else {
            (index + len - 1) % len
        };
        let name = self.tables[next].clone();
        match side {
            Side::A => self.selections.tariff_a = name,
            Side::B => self.selections.tariff_b = name,
        }
        self.request_refresh();
    }

    pub fn toggle_reference(&mut self) {
        self.selections.reference = self.selections.reference.toggled();
        self.request_refresh();
    }

    pub fn toggle_heatmap_value(&mut self) {
        self.selections.heatmap = self.selections.heatmap.toggled();
        self.request_refresh();
    }

    pub fn toggle_argument_mode(&mut self) {
        self.selections.argument_mode = !self.selections.argument_mode;
        self.request_refresh();
    }

    /// Move the detail and simulation group through the filtered groups
    pub fn cycle_group(&mut self, forward: bool) {
        let Some(dashboard) = self.dashboard() else {
            return;
        };
        let groups = &dashboard.groups;
        if groups.is_empty() {
            return;
        }
        let len = groups.len();
        let index = groups
            .iter()
            .position(|g| *g == dashboard.detail_group)
            .unwrap_or(0);
        let next = if forward {
            (index + 1) % len
        } else {
            (index + len - 1) % len
        };
        let group = groups[next].clone();
        self.selections.detail_group = Some(group.clone());
        self.selections.simulation_group = Some(group);
        self.detail_scroll = 0;
        self.request_refresh();
    }

    pub fn cycle_time_mode(&mut self) {
        let params = &mut self.selections.simulation;
        params.time_mode = params.time_mode.next(self.custom_years);
        self.request_refresh();
    }

    pub fn adjust_years(&mut self, delta: i32) {
        let years = &mut self.selections.simulation.years;
        let adjusted = years.saturating_add_signed(delta).clamp(YEARS_RANGE.0, YEARS_RANGE.1);
        if adjusted != *years {
            *years = adjusted;
            self.request_refresh();
        }
    }

    pub fn scroll(&mut self, down: bool) {
        let (position, len) = match (self.active_tab, self.dashboard()) {
            (TabId::Detail, Some(d)) => (self.detail_scroll, d.detail.len()),
            (TabId::Simulation, Some(d)) => (self.simulation_scroll, d.simulation.len()),
            _ => return,
        };
        let next = if down {
            (position + 1).min(len.saturating_sub(1))
        } else {
            position.saturating_sub(1)
        };
        match self.active_tab {
            TabId::Detail => self.detail_scroll = next,
            _ => self.simulation_scroll = next,
        }
    }

    /// Write `format` into the export directory and report the outcome in the status bar.
    pub fn export(&mut self, format: ExportFormat) {
        let result = match self.dashboard() {
            Some(dashboard) => write_export(dashboard, format, None, &self.export_dir),
            None => {
                self.set_error("Keine Daten zum Exportieren");
                return;
            }
        };
        match result {
            Ok(path) => self.set_status(format!("{} exportiert: {}", format.label(), path.display())),
            Err(e) => self.set_error(format!("Export fehlgeschlagen: {e}")),
        }
    }
}
