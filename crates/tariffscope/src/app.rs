use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Direction, Layout, Rect},
};
use tariffscope_core::source::TableLoader;
use tariffscope_core::{Side, load_and_recompute};
use tokio::runtime::Runtime;

use crate::components::{Component, EventResult, status_bar::StatusBar, tab_bar::TabBar};
use crate::export::ExportFormat;
use crate::screens::{
    detail::DetailScreen, heatmap::HeatmapScreen, overview::OverviewScreen,
    simulation::SimulationScreen, sources::SourcesScreen,
};
use crate::state::{AppState, TabId};

pub struct App {
    state: AppState,
    runtime: Runtime,
    loader: TableLoader,
    tab_bar: TabBar,
    status_bar: StatusBar,
    overview_screen: OverviewScreen,
    detail_screen: DetailScreen,
    heatmap_screen: HeatmapScreen,
    simulation_screen: SimulationScreen,
    sources_screen: SourcesScreen,
}

impl App {
    pub fn new(state: AppState, loader: TableLoader) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            state,
            runtime,
            loader,
            tab_bar: TabBar::new(),
            status_bar: StatusBar::new(),
            overview_screen: OverviewScreen::new(),
            detail_screen: DetailScreen::new(),
            heatmap_screen: HeatmapScreen::new(),
            simulation_screen: SimulationScreen::new(),
            sources_screen: SourcesScreen::new(),
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        terminal.draw(|frame| self.draw(frame))?;
        self.load_tables();

        while !self.state.exit {
            if self.state.take_refresh() {
                self.refresh();
            }
            terminal.draw(|frame| self.draw(frame))?;
            self.handle_events()?;
        }
        Ok(())
    }

    /// Resolve the source and list its tables; failure replaces the view.
    pub fn load_tables(&mut self) {
        match self.runtime.block_on(self.loader.table_names()) {
            Ok(names) => {
                let names = names.to_vec();
                self.state.source_label = self.loader.resolved_base().map(ToString::to_string);
                tracing::info!(
                    source = self.state.source_label.as_deref().unwrap_or_default(),
                    tables = names.len(),
                    "tables listed"
                );
                self.state.set_tables(names);
            }
            Err(e) => {
                tracing::error!(error = %e, "no table source could be resolved");
                self.state.set_fatal(e.to_string());
            }
        }
    }

    /// Load the selected pair and recompute the dashboard.
    pub fn refresh(&mut self) {
        let outcome = self
            .runtime
            .block_on(load_and_recompute(&self.loader, &self.state.selections));
        self.state.apply_outcome(outcome);
    }

    fn draw(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Tab bar
                Constraint::Min(0),    // Content
                Constraint::Length(2), // Status bar
            ])
            .split(frame.area());

        self.tab_bar.render(frame, chunks[0], &self.state);
        self.render_active_screen(frame, chunks[1]);
        self.status_bar.render(frame, chunks[2], &self.state);
    }

    fn render_active_screen(&mut self, frame: &mut Frame, area: Rect) {
        match self.state.active_tab {
            TabId::Overview => self.overview_screen.render(frame, area, &self.state),
            TabId::Detail => self.detail_screen.render(frame, area, &self.state),
            TabId::Heatmap => self.heatmap_screen.render(frame, area, &self.state),
            TabId::Simulation => self.simulation_screen.render(frame, area, &self.state),
            TabId::Sources => self.sources_screen.render(frame, area, &self.state),
        }
    }

    fn handle_events(&mut self) -> io::Result<()> {
        match event::read()? {
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                self.handle_key_event(key_event)
            }
            _ => {}
        };
        Ok(())
    }

    pub fn handle_key_event(&mut self, key_event: KeyEvent) {
        if key_event.modifiers.contains(KeyModifiers::CONTROL) {
            if key_event.code == KeyCode::Char('c') {
                self.state.exit = true;
            }
            return;
        }

        // Global key bindings
        let state = &mut self.state;
        match key_event.code {
            KeyCode::Char('q') => state.exit = true,
            KeyCode::Esc => state.clear_error(),
            KeyCode::Char('a') => state.cycle_tariff(Side::A, true),
            KeyCode::Char('A') => state.cycle_tariff(Side::A, false),
            KeyCode::Char('b') => state.cycle_tariff(Side::B, true),
            KeyCode::Char('B') => state.cycle_tariff(Side::B, false),
            KeyCode::Char('r') => state.toggle_reference(),
            KeyCode::Char('h') => state.toggle_heatmap_value(),
            KeyCode::Char('m') => state.toggle_argument_mode(),
            KeyCode::Char('g') => state.cycle_group(true),
            KeyCode::Char('G') => state.cycle_group(false),
            KeyCode::Char('t') => state.cycle_time_mode(),
            KeyCode::Char('+') => state.adjust_years(1),
            KeyCode::Char('-') => state.adjust_years(-1),
            KeyCode::Char('c') => state.export(ExportFormat::Csv),
            KeyCode::Char('x') => state.export(ExportFormat::Tsv),
            KeyCode::Char('p') => state.export(ExportFormat::Png),
            _ => {
                self.dispatch_key(key_event);
            }
        }
    }

    fn dispatch_key(&mut self, key_event: KeyEvent) {
        // Try tab bar first
        let result = self.tab_bar.handle_key(key_event, &mut self.state);
        if result != EventResult::NotHandled {
            return;
        }

        let result = match self.state.active_tab {
            TabId::Overview => self.overview_screen.handle_key(key_event, &mut self.state),
            TabId::Detail => self.detail_screen.handle_key(key_event, &mut self.state),
            TabId::Heatmap => self.heatmap_screen.handle_key(key_event, &mut self.state),
            TabId::Simulation => self.simulation_screen.handle_key(key_event, &mut self.state),
            TabId::Sources => self.sources_screen.handle_key(key_event, &mut self.state),
        };

        if result == EventResult::Exit {
            self.state.exit = true
        }
    }
}
