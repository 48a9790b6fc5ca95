use std::rc::Rc;

use foundation::bounds::GeoBounds;
use poi::{FetchError, PoiBatch, PoiSource};
use runtime::Subscription;
use tracing::{debug, error, info};

use crate::config::OverlayConfig;
use crate::dedup::DedupIndex;
use crate::location::{MarkerSink, PositionFix};
use crate::marker::MarkerFactory;

/// Result of handling one position fix.
///
/// Lookup failures are reported here and logged, never propagated: the
/// overlay keeps running and tries again on the next fix that passes the
/// movement gate.
#[derive(Debug)]
pub enum FixOutcome {
    /// Neither the first fix nor far enough from the last one.
    Skipped,
    Placed(PlacementSummary),
    Failed(FetchError),
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct PlacementSummary {
    /// New markers added to the scene.
    pub placed: usize,
    /// Records whose id already had a marker.
    pub duplicates: usize,
    /// Features the lookup dropped for lacking a point geometry.
    pub skipped_geometry: usize,
}

/// Reacts to position fixes by placing one marker per newly seen POI.
pub struct OverlayController<S> {
    source: S,
    factory: MarkerFactory,
    index: DedupIndex,
    first_fix: bool,
    fetch_threshold_m: f64,
    bbox_half_width_deg: f64,
    attempts: u64,
    failures: u64,
}

impl<S: PoiSource> OverlayController<S> {
    pub fn new(source: S, config: &OverlayConfig) -> Self {
        Self {
            source,
            factory: MarkerFactory::new(config.marker),
            index: DedupIndex::new(),
            first_fix: true,
            fetch_threshold_m: config.fetch_threshold_m,
            bbox_half_width_deg: config.bbox_half_width_deg,
            attempts: 0,
            failures: 0,
        }
    }

    /// Gate on the movement the location engine reports for this fix, which
    /// is the distance from the previous fix. It is not accumulated: a walk
    /// made of steps each at or below the threshold never triggers a lookup.
    pub fn should_fetch(&self, fix: &PositionFix) -> bool {
        self.first_fix || fix.distance_moved_m > self.fetch_threshold_m
    }

    pub fn query_bounds(&self, fix: &PositionFix) -> GeoBounds {
        GeoBounds::around(fix.position, self.bbox_half_width_deg)
    }

    /// Handle one fix: gate, look up, place new markers.
    ///
    /// The first-fix flag is cleared after any lookup attempt, successful or
    /// not, so a failed first lookup is only retried once the movement gate
    /// opens again.
    pub async fn on_position_update<M: MarkerSink + ?Sized>(
        &mut self,
        fix: &PositionFix,
        sink: &M,
    ) -> FixOutcome {
        if !self.should_fetch(fix) {
            debug!(distance_moved_m = fix.distance_moved_m, "fix within threshold, no lookup");
            return FixOutcome::Skipped;
        }

        let bounds = self.query_bounds(fix);
        debug!(
            source = self.source.name(),
            bbox = %bounds.to_query_value(),
            "looking up POIs"
        );
        let result = self.source.fetch(bounds).await;
        self.first_fix = false;
        self.attempts += 1;

        match result {
            Ok(batch) => FixOutcome::Placed(self.place(batch, sink)),
            Err(err) => {
                self.failures += 1;
                error!(error = %err, kind = err.kind(), "error fetching POIs");
                FixOutcome::Failed(err)
            }
        }
    }

    fn place<M: MarkerSink + ?Sized>(&mut self, batch: PoiBatch, sink: &M) -> PlacementSummary {
        let mut summary = PlacementSummary {
            skipped_geometry: batch.skipped_geometry,
            ..PlacementSummary::default()
        };
        for poi in batch.records {
            if self.index.contains(&poi.id) {
                summary.duplicates += 1;
                continue;
            }
            let arrow = self.factory.build(&poi);
            let entity = sink.add_marker(arrow, poi.position);
            self.index.insert(poi.id, entity);
            summary.placed += 1;
        }
        info!(
            placed = summary.placed,
            duplicates = summary.duplicates,
            total = self.index.len(),
            "POI markers updated"
        );
        summary
    }

    /// Handle fixes in arrival order until the subscription ends.
    pub async fn run<M: MarkerSink>(
        mut self,
        mut updates: Subscription<PositionFix>,
        sink: Rc<M>,
    ) -> Self {
        while let Some(fix) = updates.next().await {
            self.on_position_update(&fix, &*sink).await;
        }
        info!(
            attempts = self.attempts,
            failures = self.failures,
            markers = self.index.len(),
            "position updates ended"
        );
        self
    }

    pub fn index(&self) -> &DedupIndex {
        &self.index
    }

    pub fn is_first_fix(&self) -> bool {
        self.first_fix
    }

    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }
}
