use crate::config::ACTIVE_THRESHOLD_PCT;
use crate::domain::{SortType, SupportLevel};

#[cfg(debug_assertions)]
use crate::config::DF;

use super::sink::{OverlayTarget, SupportSink};
use super::sort::sort_levels;
use super::state::{ActiveTier, DisplayState};

/// Owns the canonical support list and the price it is measured against.
///
/// One instance lives for the whole session. Every mutation runs to
/// completion before returning; callers must not re-enter from inside a sink.
#[derive(Debug, Clone)]
pub struct SupportLevelEngine {
    levels: Vec<SupportLevel>,
    sort_type: SortType,
    current_price: f64,
    active_threshold_pct: f64,
    overlay_visible: bool,
    display: DisplayState,
}

impl Default for SupportLevelEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SupportLevelEngine {
    pub fn new() -> Self {
        Self {
            levels: Vec::new(),
            sort_type: SortType::default(),
            current_price: 0.0,
            active_threshold_pct: ACTIVE_THRESHOLD_PCT,
            overlay_visible: true,
            display: DisplayState::Loading,
        }
    }

    /// Starts from persisted user choices.
    pub fn with_preferences(sort_type: SortType, overlay_visible: bool) -> Self {
        Self {
            sort_type,
            overlay_visible,
            ..Self::new()
        }
    }

    /// Replaces the level set and, when given a usable price, re-measures it.
    ///
    /// `levels == None` is the "payload wasn't a list" case: the panel goes
    /// Empty and the stored levels are kept as they were.
    pub fn update<S, O>(
        &mut self,
        levels: Option<Vec<SupportLevel>>,
        price: Option<f64>,
        sink: &mut S,
        overlay: &mut O,
    ) -> DisplayState
    where
        S: SupportSink + ?Sized,
        O: OverlayTarget + ?Sized,
    {
        let Some(levels) = levels else {
            return self.transition_empty(sink);
        };

        self.levels = levels;

        match price.filter(|p| p.is_finite() && *p != 0.0) {
            Some(p) => {
                self.current_price = p;
                self.recalculate_distances();
            }
            // Fresh levels arrive without analytics, measure them against
            // the price we already have.
            None if self.current_price != 0.0 => self.recalculate_distances(),
            None => {}
        }

        if self.levels.is_empty() {
            return self.transition_empty(sink);
        }

        self.render_sorted(sink);

        if self.overlay_visible {
            overlay.sync_overlay(&self.levels, true);
        }

        self.display
    }

    /// Changes ordering only. Distances and the price are left alone.
    pub fn set_sort_type<S>(&mut self, sort_type: SortType, sink: &mut S)
    where
        S: SupportSink + ?Sized,
    {
        self.sort_type = sort_type;
        if !self.levels.is_empty() {
            self.render_sorted(sink);
        }
    }

    pub fn set_overlay_visible<O>(&mut self, visible: bool, overlay: &mut O)
    where
        O: OverlayTarget + ?Sized,
    {
        self.overlay_visible = visible;
        if visible {
            overlay.sync_overlay(&self.levels, true);
        } else {
            overlay.sync_overlay(&[], false);
        }
    }

    /// Puts the panel into its loading state ahead of a server round trip.
    pub fn begin_refresh<S>(&mut self, sink: &mut S)
    where
        S: SupportSink + ?Sized,
    {
        self.display = DisplayState::Loading;
        sink.show_loading();
    }

    /// Forgets the reference price. Levels read as unmeasured until a new
    /// price arrives with the next update.
    pub fn reset_price(&mut self) {
        self.current_price = 0.0;
        for level in &mut self.levels {
            level.distance = 0.0;
            level.is_active = false;
        }
    }

    pub fn sorted_levels(&self) -> Vec<SupportLevel> {
        sort_levels(&self.levels, self.sort_type)
    }

    pub fn active_count(&self) -> usize {
        self.levels.iter().filter(|l| l.is_active).count()
    }

    pub fn active_tier(&self) -> ActiveTier {
        ActiveTier::from_count(self.active_count())
    }

    pub fn levels(&self) -> &[SupportLevel] {
        &self.levels
    }

    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    pub fn sort_type(&self) -> SortType {
        self.sort_type
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    pub fn display(&self) -> DisplayState {
        self.display
    }

    pub fn active_threshold_pct(&self) -> f64 {
        self.active_threshold_pct
    }

    fn recalculate_distances(&mut self) {
        let price = self.current_price;
        let threshold = self.active_threshold_pct;
        for level in &mut self.levels {
            level.apply_price(price, threshold);
        }
    }

    fn render_sorted<S>(&mut self, sink: &mut S)
    where
        S: SupportSink + ?Sized,
    {
        let view = self.sorted_levels();
        let active = self.active_count();

        #[cfg(debug_assertions)]
        if DF.log_engine_updates {
            log::info!(
                "ENGINE: {} levels ({} active) sorted by {} @ {:.4}",
                view.len(),
                active,
                self.sort_type,
                self.current_price
            );
        }

        self.display = DisplayState::Populated;
        sink.render(&view, active);
    }

    fn transition_empty<S>(&mut self, sink: &mut S) -> DisplayState
    where
        S: SupportSink + ?Sized,
    {
        #[cfg(debug_assertions)]
        if DF.log_engine_updates {
            log::info!("ENGINE: no support levels to show");
        }
        self.display = DisplayState::Empty;
        sink.show_empty();
        self.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        rendered: Vec<(Vec<SupportLevel>, usize)>,
        empties: usize,
        loadings: usize,
    }

    impl SupportSink for RecordingSink {
        fn render(&mut self, levels: &[SupportLevel], active_count: usize) {
            self.rendered.push((levels.to_vec(), active_count));
        }
        fn show_empty(&mut self) {
            self.empties += 1;
        }
        fn show_loading(&mut self) {
            self.loadings += 1;
        }
    }

    #[derive(Default)]
    struct RecordingOverlay {
        syncs: Vec<(usize, bool)>,
    }

    impl OverlayTarget for RecordingOverlay {
        fn sync_overlay(&mut self, levels: &[SupportLevel], overlay_visible: bool) {
            self.syncs.push((levels.len(), overlay_visible));
        }
    }

    fn scenario_levels() -> Vec<SupportLevel> {
        vec![
            SupportLevel::new(103.0, 90.0, 4, Some(2_000)),
            SupportLevel::new(95.0, 40.0, 2, Some(1_000)),
        ]
    }

    #[test]
    fn scenario_distances_and_orders() {
        let mut engine = SupportLevelEngine::new();
        let mut sink = RecordingSink::default();
        let mut overlay = RecordingOverlay::default();

        let state = engine.update(Some(scenario_levels()), Some(100.0), &mut sink, &mut overlay);
        assert_eq!(state, DisplayState::Populated);

        let levels = engine.levels();
        assert_eq!(levels[0].distance, 3.0);
        assert!(levels[0].is_active);
        assert_eq!(levels[1].distance, -5.0);
        assert!(!levels[1].is_active);
        assert_eq!(engine.active_count(), 1);

        engine.set_sort_type(SortType::Distance, &mut sink);
        let by_distance: Vec<f64> = sink.rendered.last().unwrap().0.iter().map(|l| l.price).collect();
        assert_eq!(by_distance, vec![103.0, 95.0]);

        engine.set_sort_type(SortType::Strength, &mut sink);
        let by_strength: Vec<f64> = sink.rendered.last().unwrap().0.iter().map(|l| l.price).collect();
        assert_eq!(by_strength, vec![103.0, 95.0]);

        assert_eq!(overlay.syncs, vec![(2, true)]);
    }

    #[test]
    fn none_and_empty_both_go_empty() {
        let mut engine = SupportLevelEngine::new();
        let mut sink = RecordingSink::default();
        let mut overlay = RecordingOverlay::default();

        assert_eq!(engine.update(None, Some(100.0), &mut sink, &mut overlay), DisplayState::Empty);
        assert_eq!(engine.update(Some(vec![]), None, &mut sink, &mut overlay), DisplayState::Empty);
        assert_eq!(sink.empties, 2);
        assert!(sink.rendered.is_empty());
        assert!(overlay.syncs.is_empty());
    }

    #[test]
    fn none_payload_keeps_previous_levels_and_price() {
        let mut engine = SupportLevelEngine::new();
        let mut sink = RecordingSink::default();
        let mut overlay = RecordingOverlay::default();

        engine.update(Some(scenario_levels()), Some(100.0), &mut sink, &mut overlay);
        engine.update(None, Some(200.0), &mut sink, &mut overlay);
        assert_eq!(engine.levels().len(), 2);
        assert_eq!(engine.current_price(), 100.0);
    }

    #[test]
    fn sort_change_does_not_touch_analytics() {
        let mut engine = SupportLevelEngine::new();
        let mut sink = RecordingSink::default();
        let mut overlay = RecordingOverlay::default();

        engine.update(Some(scenario_levels()), Some(100.0), &mut sink, &mut overlay);
        let before = engine.levels().to_vec();
        for sort in [SortType::Price, SortType::Recent, SortType::Distance] {
            engine.set_sort_type(sort, &mut sink);
        }
        assert_eq!(engine.levels(), before.as_slice());
        assert_eq!(engine.current_price(), 100.0);
    }

    #[test]
    fn zero_price_skips_recalculation() {
        let mut engine = SupportLevelEngine::new();
        let mut sink = RecordingSink::default();
        let mut overlay = RecordingOverlay::default();

        let state = engine.update(Some(scenario_levels()), Some(0.0), &mut sink, &mut overlay);
        assert_eq!(state, DisplayState::Populated);
        assert_eq!(engine.current_price(), 0.0);
        assert!(engine.levels().iter().all(|l| l.distance == 0.0 && !l.is_active));
        assert!(engine.levels().iter().all(|l| l.distance.is_finite()));
    }

    #[test]
    fn levels_without_price_use_stored_price() {
        let mut engine = SupportLevelEngine::new();
        let mut sink = RecordingSink::default();
        let mut overlay = RecordingOverlay::default();

        engine.update(Some(scenario_levels()), Some(100.0), &mut sink, &mut overlay);
        let fresh = vec![SupportLevel::new(99.0, 70.0, 1, None)];
        engine.update(Some(fresh), None, &mut sink, &mut overlay);

        assert_eq!(engine.current_price(), 100.0);
        assert_eq!(engine.levels()[0].distance, -1.0);
        assert!(engine.levels()[0].is_active);
    }

    #[test]
    fn reset_price_stops_stale_measurement() {
        let mut engine = SupportLevelEngine::new();
        let mut sink = RecordingSink::default();
        let mut overlay = RecordingOverlay::default();

        engine.update(Some(scenario_levels()), Some(100.0), &mut sink, &mut overlay);
        engine.reset_price();
        assert_eq!(engine.current_price(), 0.0);
        assert_eq!(engine.active_count(), 0);

        let fresh = vec![SupportLevel::new(2950.0, 70.0, 1, None)];
        engine.update(Some(fresh.clone()), None, &mut sink, &mut overlay);
        assert_eq!(engine.levels()[0].distance, 0.0);
        assert!(!engine.levels()[0].is_active);

        engine.update(Some(fresh), Some(3000.0), &mut sink, &mut overlay);
        assert_eq!(engine.levels()[0].distance, -1.67);
        assert!(engine.levels()[0].is_active);
    }

    #[test]
    fn update_is_idempotent() {
        let mut engine = SupportLevelEngine::new();
        let mut sink = RecordingSink::default();
        let mut overlay = RecordingOverlay::default();

        engine.update(Some(scenario_levels()), Some(100.0), &mut sink, &mut overlay);
        let first = sink.rendered.last().cloned();
        engine.update(Some(scenario_levels()), Some(100.0), &mut sink, &mut overlay);
        assert_eq!(sink.rendered.last().cloned(), first);
    }

    #[test]
    fn hidden_overlay_is_not_synced_on_update() {
        let mut engine = SupportLevelEngine::with_preferences(SortType::Price, false);
        let mut sink = RecordingSink::default();
        let mut overlay = RecordingOverlay::default();

        engine.update(Some(scenario_levels()), Some(100.0), &mut sink, &mut overlay);
        assert!(overlay.syncs.is_empty());

        engine.set_overlay_visible(true, &mut overlay);
        engine.set_overlay_visible(false, &mut overlay);
        assert_eq!(overlay.syncs, vec![(2, true), (0, false)]);
    }

    #[test]
    fn refresh_shows_loading() {
        let mut engine = SupportLevelEngine::new();
        let mut sink = RecordingSink::default();
        engine.begin_refresh(&mut sink);
        assert_eq!(engine.display(), DisplayState::Loading);
        assert_eq!(sink.loadings, 1);
    }
}
