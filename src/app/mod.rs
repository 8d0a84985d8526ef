// Application state management
//
// This module contains the main AppState struct and re-exports
// configuration types from the config submodule.

pub mod config;
pub mod event;
pub mod playback;
pub mod session;

// Re-export config types for convenience
pub use config::{LayerSettings, PlaybackConfig};
pub use playback::{Playback, PlaybackState};
pub use session::Session;

use crate::data::{self, DataError, Location, SimulationEntry};
use crate::render::lines::refresh_arrowheads;
use crate::render::{Equirectangular, FrameBuffer, RenderSink};
use crate::scaling::{LogisticParams, MagnitudeKind};
use crate::theme::Palette;
use chrono::NaiveDate;
use config::{MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Main application state
pub struct AppState {
    /// Whether the application is running
    pub running: bool,

    /// Directory the simulation files are read from
    pub data_dir: PathBuf,

    /// Simulations available in `data_dir`
    pub simulations: Vec<SimulationEntry>,

    /// Index into `simulations` of the loaded one
    pub active_simulation: Option<usize>,

    /// Loaded simulation and its derived render state
    pub session: Option<Session>,

    /// Last load failure (if any), shown in the status bar
    pub load_error: Option<String>,

    /// Startup configuration; scaling and threshold mode follow the user's
    /// choices so a newly loaded simulation keeps them
    pub config: PlaybackConfig,

    /// Layer visibility toggles
    pub layers: LayerSettings,

    pub palette: Palette,

    /// Projection at the current zoom
    pub projection: Equirectangular,

    pub playback: Playback,

    /// Directives of the latest redraw
    pub frame: FrameBuffer,

    /// Currently selected location index in the current step
    pub selected_location: Option<usize>,
}

impl AppState {
    /// Create an AppState with nothing loaded yet
    pub fn new(
        data_dir: PathBuf,
        simulations: Vec<SimulationEntry>,
        config: PlaybackConfig,
    ) -> Self {
        Self {
            running: true,
            data_dir,
            simulations,
            active_simulation: None,
            session: None,
            load_error: None,
            projection: Equirectangular::new(config.zoom.clamp(MIN_ZOOM, MAX_ZOOM)),
            playback: Playback::new(config.speed),
            config,
            layers: LayerSettings::default(),
            palette: Palette::default(),
            frame: FrameBuffer::default(),
            selected_location: None,
        }
    }

    /// Open a data directory, or a single simulation file
    pub fn open(path: &Path, config: PlaybackConfig) -> Result<Self, DataError> {
        if path.is_file() {
            let data_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();
            return Ok(Self::new(data_dir, vec![SimulationEntry { name }], config));
        }

        let simulations = data::list_simulations(path)?;
        info!(
            dir = %path.display(),
            count = simulations.len(),
            "Found simulations"
        );
        Ok(Self::new(path.to_path_buf(), simulations, config))
    }

    /// Load the simulation at `index` of the listing
    ///
    /// Playback is stopped first. On failure the previous simulation stays
    /// loaded and visible, and the error is kept in `load_error`.
    pub fn load_simulation(&mut self, index: usize) -> bool {
        self.playback.stop();

        let Some(entry) = self.simulations.get(index) else {
            debug!(index, "No simulation at index");
            return false;
        };
        let path = self.data_dir.join(&entry.name);

        match data::load_dataset(&path) {
            Ok(dataset) => {
                self.session = Some(Session::new(dataset, &self.config));
                self.active_simulation = Some(index);
                self.selected_location = None;
                self.load_error = None;
                self.redraw();
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to load simulation");
                self.load_error = Some(e.to_string());
                false
            }
        }
    }

    /// Load a simulation by its listing name
    pub fn load_simulation_named(&mut self, name: &str) -> bool {
        match self.simulations.iter().position(|s| s.name == name) {
            Some(index) => self.load_simulation(index),
            None => {
                self.load_error = Some(format!("Unknown simulation: {}", name));
                false
            }
        }
    }

    /// Load the next simulation of the listing, wrapping around
    pub fn next_simulation(&mut self) -> bool {
        if self.simulations.is_empty() {
            return false;
        }
        let next = self
            .active_simulation
            .map(|i| (i + 1) % self.simulations.len())
            .unwrap_or(0);
        self.load_simulation(next)
    }

    /// Advance playback if a step is due (called from the event loop)
    pub fn on_tick(&mut self, now: Instant) {
        if !self.playback.poll(now) {
            return;
        }

        let advanced = self.session.as_mut().is_some_and(|s| s.forward());
        if advanced {
            self.redraw();
        }

        if self.session.as_ref().map_or(true, Session::at_end) {
            self.playback.stop();
            info!("Playback reached the last step");
        }
    }

    /// Start or stop playback
    pub fn toggle_playback(&mut self, now: Instant) {
        let at_end = self.session.as_ref().map_or(true, Session::at_end);
        let state = self.playback.toggle(at_end, now);
        info!(?state, speed = self.playback.speed(), "Playback toggled");
    }

    pub fn forward(&mut self) {
        self.jump(Session::forward);
    }

    pub fn back(&mut self) {
        self.jump(Session::back);
    }

    pub fn beginning(&mut self) {
        self.jump(Session::beginning);
    }

    pub fn end(&mut self) {
        self.jump(Session::end);
    }

    /// Move the cursor `delta` steps, stopping at either end
    pub fn seek(&mut self, delta: isize) {
        self.jump(|session| {
            let target = session
                .current_step()
                .saturating_add_signed(delta)
                .min(session.end_step());
            session.goto_step(target)
        });
    }

    /// Manual cursor moves always stop playback first
    fn jump(&mut self, step: impl FnOnce(&mut Session) -> bool) {
        self.playback.stop();
        if self.session.as_mut().is_some_and(step) {
            self.redraw();
        }
    }

    pub fn cycle_scaling(&mut self) {
        let next = self.config.scaling.next();
        self.config.scaling = next;
        if let Some(session) = self.session.as_mut() {
            session.set_scaling(next);
        }
        self.redraw();
    }

    pub fn cycle_threshold_mode(&mut self) {
        let next = self.config.threshold_mode.next();
        self.config.threshold_mode = next;
        if let Some(session) = self.session.as_mut() {
            session.set_threshold_mode(next);
        }
        info!(mode = next.label(), "Threshold mode changed");
        self.redraw();
    }

    /// Replace logistic parameters for one magnitude kind and redraw
    pub fn set_logistic_params(&mut self, kind: MagnitudeKind, params: LogisticParams) -> bool {
        let changed = self
            .session
            .as_mut()
            .is_some_and(|s| s.set_logistic_params(kind, params));
        if changed {
            self.redraw();
        }
        changed
    }

    /// Shift the midpoint of every logistic curve by `delta` steps
    ///
    /// Does nothing unless logistic growth is the active method.
    pub fn nudge_logistic_midpoint(&mut self, delta: f64) -> bool {
        let changed = self
            .session
            .as_mut()
            .is_some_and(|s| s.shift_logistic_midpoints(delta));
        if changed {
            self.redraw();
        }
        changed
    }

    pub fn cycle_heatmap_view(&mut self) {
        self.layers.cycle_heatmap();
        self.redraw();
    }

    pub fn toggle_circles(&mut self) {
        self.layers.circles = !self.layers.circles;
        self.redraw();
    }

    pub fn toggle_routes(&mut self) {
        self.layers.routes = !self.layers.routes;
        self.redraw();
    }

    pub fn toggle_camps(&mut self) {
        self.layers.camps = !self.layers.camps;
        self.redraw();
    }

    pub fn toggle_cities(&mut self) {
        self.layers.cities = !self.layers.cities;
        self.redraw();
    }

    /// Labels are drawn by the map panel straight from the frame
    pub fn toggle_labels(&mut self) {
        self.layers.labels = !self.layers.labels;
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.projection.zoom() + ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.projection.zoom() - ZOOM_STEP);
    }

    /// Change zoom and re-place arrowheads; colors and radii are kept
    fn set_zoom(&mut self, zoom: f64) {
        let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        if zoom == self.projection.zoom() {
            return;
        }
        self.projection.set_zoom(zoom);
        refresh_arrowheads(&mut self.frame.lines, &self.projection);
        debug!(zoom, "Zoom changed");
    }

    pub fn faster(&mut self, now: Instant) {
        self.playback.faster(now);
        debug!(speed = self.playback.speed(), "Playback speed changed");
    }

    pub fn slower(&mut self, now: Instant) {
        self.playback.slower(now);
        debug!(speed = self.playback.speed(), "Playback speed changed");
    }

    /// Locations of the current step
    pub fn locations(&self) -> &[Location] {
        match &self.session {
            Some(session) => session.locations(),
            None => &[],
        }
    }

    pub fn selected(&self) -> Option<&Location> {
        self.selected_location.and_then(|i| self.locations().get(i))
    }

    /// Move location selection up (decrease index)
    pub fn select_previous_location(&mut self) {
        let count = self.locations().len();
        if count == 0 {
            self.selected_location = None;
            return;
        }

        self.selected_location = match self.selected_location {
            // Start at the last location
            None => Some(count - 1),
            Some(idx) => Some(idx.saturating_sub(1)),
        };
    }

    /// Move location selection down (increase index)
    pub fn select_next_location(&mut self) {
        let count = self.locations().len();
        if count == 0 {
            self.selected_location = None;
            return;
        }

        self.selected_location = match self.selected_location {
            None => Some(0),
            Some(idx) => Some((idx + 1).min(count - 1)),
        };
    }

    pub fn current_date(&self) -> Option<NaiveDate> {
        self.session.as_ref().and_then(Session::current_date)
    }

    /// Rebuild the frame from the current step
    pub fn redraw(&mut self) {
        match &self.session {
            Some(session) => {
                session.render(&self.layers, &self.palette, &self.projection, &mut self.frame)
            }
            None => self.frame.clear(),
        }
    }
}
