// Loaded simulation session
//
// A dataset together with everything derived from it: the active scaling
// method, the thresholds, the radius multiplier and the heatmap bounds.
// Derived state is computed in `Session::new`, so no render can ever see a
// scaling method that has not been fitted to the data.

use super::config::{LayerSettings, PlaybackConfig};
use crate::data::{Dataset, Location};
use crate::render::circles::{build_circles, radius_multiplier};
use crate::render::lines::build_lines;
use crate::render::markers::build_markers;
use crate::render::{
    HeatmapBuilder, HeatmapView, Projection, RenderContext, RenderSink, ThresholdMode,
    Thresholds,
};
use crate::scaling::{LogisticParams, MagnitudeKind, ScalingKind, ScalingTool};
use crate::theme::Palette;
use chrono::NaiveDate;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct Session {
    dataset: Dataset,
    scaling: ScalingTool,
    threshold_mode: ThresholdMode,
    thresholds: Thresholds,
    radius_multiplier: f64,
    max_radius_px: f64,
    mid_point_deviation: f64,
    refugee_heatmap: HeatmapBuilder,
    difference_heatmap: HeatmapBuilder,
}

impl Session {
    pub fn new(dataset: Dataset, config: &PlaybackConfig) -> Self {
        let scaling = ScalingTool::for_dataset(config.scaling, &dataset, config.mid_point_deviation);
        let refugee_heatmap = HeatmapBuilder::for_dataset(HeatmapView::Refugees, &dataset);
        let difference_heatmap = HeatmapBuilder::for_dataset(HeatmapView::Difference, &dataset);

        let mut session = Self {
            dataset,
            scaling,
            threshold_mode: config.threshold_mode,
            thresholds: Thresholds::default(),
            radius_multiplier: 0.0,
            max_radius_px: config.max_radius_px,
            mid_point_deviation: config.mid_point_deviation,
            refugee_heatmap,
            difference_heatmap,
        };
        session.recalibrate();
        session
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn scaling(&self) -> &ScalingTool {
        &self.scaling
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn threshold_mode(&self) -> ThresholdMode {
        self.threshold_mode
    }

    pub fn radius_multiplier(&self) -> f64 {
        self.radius_multiplier
    }

    pub fn heatmap(&self, view: HeatmapView) -> &HeatmapBuilder {
        match view {
            HeatmapView::Refugees => &self.refugee_heatmap,
            HeatmapView::Difference => &self.difference_heatmap,
        }
    }

    pub fn locations(&self) -> &[Location] {
        &self.dataset.timeline.current().locations
    }

    pub fn current_step(&self) -> usize {
        self.dataset.timeline.current_step()
    }

    pub fn end_step(&self) -> usize {
        self.dataset.timeline.end_step()
    }

    pub fn at_end(&self) -> bool {
        self.dataset.timeline.at_end()
    }

    pub fn current_date(&self) -> Option<NaiveDate> {
        self.dataset.current_date()
    }

    /// Switch scaling method; the logistic curves are refitted to the data
    pub fn set_scaling(&mut self, kind: ScalingKind) {
        self.scaling = ScalingTool::for_dataset(kind, &self.dataset, self.mid_point_deviation);
        info!(method = kind.name(), "Scaling method changed");
        self.recalibrate();
    }

    /// Replace the logistic parameters for one magnitude kind
    ///
    /// Returns `false` when the active method is not logistic growth.
    pub fn set_logistic_params(&mut self, kind: MagnitudeKind, params: LogisticParams) -> bool {
        let ScalingTool::LogisticGrowth(growth) = &mut self.scaling else {
            return false;
        };
        growth.set_params(kind, params);
        debug!(?kind, ?params, "Logistic parameters replaced");
        self.recalibrate();
        true
    }

    /// Move the midpoint of every logistic curve by `delta`, clamped at 0
    ///
    /// One recalibration covers all three curves. Returns `false` when the
    /// active method is not logistic growth.
    pub fn shift_logistic_midpoints(&mut self, delta: f64) -> bool {
        let ScalingTool::LogisticGrowth(growth) = &mut self.scaling else {
            return false;
        };
        for kind in MagnitudeKind::ALL {
            let mut params = growth.params(kind);
            params.mid_point = (params.mid_point + delta).max(0.0);
            growth.set_params(kind, params);
        }
        debug!(delta, "Logistic midpoints shifted");
        self.recalibrate();
        true
    }

    pub fn set_threshold_mode(&mut self, mode: ThresholdMode) {
        self.threshold_mode = mode;
        self.recompute_thresholds();
    }

    pub fn forward(&mut self) -> bool {
        let moved = self.dataset.timeline.next();
        self.after_move(moved)
    }

    pub fn back(&mut self) -> bool {
        let moved = self.dataset.timeline.previous();
        self.after_move(moved)
    }

    pub fn goto_step(&mut self, t: usize) -> bool {
        let moved = self.dataset.timeline.goto_step(t);
        self.after_move(moved)
    }

    pub fn beginning(&mut self) -> bool {
        self.goto_step(0)
    }

    pub fn end(&mut self) -> bool {
        let last = self.end_step();
        self.goto_step(last)
    }

    /// Emit every enabled layer for the current step into `sink`
    pub fn render(
        &self,
        layers: &LayerSettings,
        palette: &Palette,
        projection: &dyn Projection,
        sink: &mut dyn RenderSink,
    ) {
        sink.clear();

        let ctx = RenderContext {
            scaling: &self.scaling,
            thresholds: &self.thresholds,
            palette,
            radius_multiplier: self.radius_multiplier,
        };
        let snapshot = self.dataset.timeline.current();

        if let Some(view) = layers.heatmap {
            sink.heatmap(self.heatmap(view).build(&snapshot.locations, &self.scaling));
        }
        if layers.routes {
            build_lines(&snapshot.links, &ctx, projection, sink);
        }
        if layers.circles {
            build_circles(&snapshot.locations, &ctx, sink);
        }
        if layers.camps || layers.cities {
            build_markers(&snapshot.locations, layers.camps, layers.cities, sink);
        }
    }

    fn after_move(&mut self, moved: bool) -> bool {
        if moved && self.threshold_mode == ThresholdMode::CurrentStep {
            self.recompute_thresholds();
        }
        moved
    }

    fn recalibrate(&mut self) {
        self.radius_multiplier = radius_multiplier(
            self.max_radius_px,
            self.dataset.max_location_value(),
            &self.scaling,
        );
        self.recompute_thresholds();
    }

    fn recompute_thresholds(&mut self) {
        self.thresholds =
            Thresholds::for_mode(self.threshold_mode, &self.dataset.timeline, &self.scaling);
        debug!(
            mode = self.threshold_mode.label(),
            step = self.current_step(),
            location_middle = self.thresholds.locations.middle_threshold,
            location_final = self.thresholds.locations.final_threshold,
            "Thresholds recomputed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;
    use crate::render::{Bucket, Equirectangular, FrameBuffer};
    use crate::scaling::calculate_parameters;

    fn session(rows: &[&[u64]], config: &PlaybackConfig) -> Session {
        Session::new(fixtures::dataset(rows), config)
    }

    #[test]
    fn test_new_calibrates_before_first_render() {
        let config = PlaybackConfig {
            scaling: ScalingKind::Raw,
            ..Default::default()
        };
        let session = session(&[&[10, 20], &[30, 60]], &config);

        // Largest location maps to the configured maximum radius
        assert_eq!(session.radius_multiplier(), config.max_radius_px / 60.0);
        assert!(!session.thresholds().locations.is_degenerate());
        assert_eq!(session.heatmap(HeatmapView::Refugees).bounds(), (60, 1));
        assert_eq!(session.heatmap(HeatmapView::Difference).bounds(), (40, 1));
    }

    #[test]
    fn test_set_scaling_recalibrates() {
        let config = PlaybackConfig {
            scaling: ScalingKind::Raw,
            ..Default::default()
        };
        let mut session = session(&[&[10, 20], &[30, 60]], &config);
        let raw_max = session.thresholds().locations.max;

        session.set_scaling(ScalingKind::Log);
        assert_eq!(session.scaling().kind(), ScalingKind::Log);
        assert!((session.thresholds().locations.max - 60f64.ln()).abs() < 1e-12);
        assert!(session.thresholds().locations.max < raw_max);
        assert!((session.radius_multiplier() - config.max_radius_px / 60f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_logistic_params_need_logistic_method() {
        let config = PlaybackConfig {
            scaling: ScalingKind::Log,
            ..Default::default()
        };
        let mut session = session(&[&[10, 20], &[30, 60]], &config);
        let params = calculate_parameters(0.0, 100.0, 2, 12.0);
        assert!(!session.set_logistic_params(MagnitudeKind::Location, params));

        session.set_scaling(ScalingKind::LogisticGrowth);
        assert!(session.set_logistic_params(MagnitudeKind::Location, params));
        match session.scaling() {
            ScalingTool::LogisticGrowth(growth) => {
                assert_eq!(growth.params(MagnitudeKind::Location), params)
            }
            other => panic!("unexpected scaling {:?}", other),
        }
    }

    #[test]
    fn test_shift_logistic_midpoints_moves_every_curve() {
        let config = PlaybackConfig {
            scaling: ScalingKind::Raw,
            ..Default::default()
        };
        let mut session = session(&[&[10, 20], &[30, 60]], &config);
        assert!(!session.shift_logistic_midpoints(1.0));

        session.set_scaling(ScalingKind::LogisticGrowth);
        let before = match session.scaling() {
            ScalingTool::LogisticGrowth(growth) => growth.clone(),
            other => panic!("unexpected scaling {:?}", other),
        };

        assert!(session.shift_logistic_midpoints(3.0));
        let ScalingTool::LogisticGrowth(after) = session.scaling() else {
            panic!("logistic growth expected");
        };
        for kind in MagnitudeKind::ALL {
            assert_eq!(after.params(kind).mid_point, before.params(kind).mid_point + 3.0);
            assert_eq!(after.params(kind).ceiling, before.params(kind).ceiling);
        }

        assert!(session.shift_logistic_midpoints(-100.0));
        let ScalingTool::LogisticGrowth(after) = session.scaling() else {
            panic!("logistic growth expected");
        };
        assert!(MagnitudeKind::ALL
            .iter()
            .all(|&kind| after.params(kind).mid_point == 0.0));
    }

    #[test]
    fn test_step_mode_follows_cursor() {
        let config = PlaybackConfig {
            scaling: ScalingKind::Raw,
            threshold_mode: ThresholdMode::CurrentStep,
            ..Default::default()
        };
        let mut session = session(&[&[1, 2, 3], &[100, 200, 300]], &config);
        assert_eq!(session.thresholds().locations.max, 3.0);

        assert!(session.forward());
        assert_eq!(session.thresholds().locations.max, 300.0);

        // No move, no change
        assert!(!session.forward());
        assert!(session.back());
        assert_eq!(session.thresholds().locations.max, 3.0);
    }

    #[test]
    fn test_global_mode_ignores_cursor() {
        let config = PlaybackConfig {
            scaling: ScalingKind::Raw,
            ..Default::default()
        };
        let mut session = session(&[&[1, 2, 3], &[100, 200, 300]], &config);
        let before = *session.thresholds();
        assert!(session.end());
        assert_eq!(*session.thresholds(), before);
        assert!(session.at_end());
        assert!(session.beginning());
        assert_eq!(session.current_step(), 0);
    }

    #[test]
    fn test_render_respects_layers() {
        let config = PlaybackConfig {
            scaling: ScalingKind::Raw,
            ..Default::default()
        };
        let mut dataset = fixtures::dataset(&[&[0, 5, 9]]);
        dataset.timeline = crate::data::TimedData::new(vec![crate::data::Snapshot {
            locations: dataset.timeline.current().locations.clone(),
            links: vec![fixtures::link("L1", "L2", 4, false)],
        }])
        .unwrap();
        let session = Session::new(dataset, &config);

        let palette = Palette::default();
        let projection = Equirectangular::new(6.0);
        let mut frame = FrameBuffer::default();

        let mut layers = LayerSettings::default();
        session.render(&layers, &palette, &projection, &mut frame);
        assert_eq!(frame.circles.len(), 2);
        assert_eq!(frame.lines.len(), 1);
        assert!(frame.heatmap.is_none());
        assert_eq!(frame.circles[1].bucket, Bucket::High);
        // The empty location keeps its marker
        assert_eq!(frame.markers.len(), 3);

        layers.circles = false;
        layers.routes = false;
        layers.heatmap = Some(HeatmapView::Refugees);
        session.render(&layers, &palette, &projection, &mut frame);
        assert!(frame.circles.is_empty());
        assert!(frame.lines.is_empty());
        assert_eq!(frame.heatmap.as_ref().map(|h| h.data.len()), Some(2));
        assert_eq!(frame.markers.len(), 3);

        layers.cities = false;
        session.render(&layers, &palette, &projection, &mut frame);
        assert!(frame.markers.is_empty());
    }
}
