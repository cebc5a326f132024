//! Rejection-sampling placement.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

use super::names::random_name;
use super::{PlacementConfig, ValvePolicy};
use crate::classify::{Classification, Classifier};
use crate::coord::LatLng;
use crate::geometry::{GeometryKind, RegionGeometry};
use crate::region::RegionConfig;
use crate::store::{IdAllocator, Vessel};

/// Outcome of one placement run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementReport {
    pub region: String,
    /// Placed vessels, shuffled.
    pub vessels: Vec<Vessel>,
    pub inside_target: usize,
    pub outside_target: usize,
    pub inside_placed: usize,
    pub outside_placed: usize,
    /// Candidate points drawn across both quotas.
    pub attempts: usize,
    /// Degradations the caller should surface (missing geometry, short quota).
    pub warnings: Vec<String>,
}

impl PlacementReport {
    /// True when both quotas were filled.
    pub fn is_complete(&self) -> bool {
        self.inside_placed == self.inside_target && self.outside_placed == self.outside_target
    }
}

/// Which quota a sampling loop is filling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quota {
    Inside,
    Outside,
}

impl Quota {
    fn accepts(self, c: Classification) -> bool {
        match self {
            Quota::Inside => c.is_restricted_water(),
            Quota::Outside => c.is_open_water(),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Quota::Inside => "inside",
            Quota::Outside => "outside",
        }
    }
}

/// Places fleets for a region using the zone and land predicates.
#[derive(Debug, Clone)]
pub struct PlacementGenerator {
    classifier: Classifier,
    config: PlacementConfig,
}

impl PlacementGenerator {
    pub fn new(classifier: Classifier, config: PlacementConfig) -> Self {
        Self { classifier, config }
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Generate up to `n` vessels for `region`.
    ///
    /// Every random draw comes from `rng`, so a seeded generator reproduces
    /// the same names, positions, and valve states. Ids come from `ids` and
    /// depend on its state.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        region: &RegionConfig,
        n: usize,
        buffer: &RegionGeometry,
        land: &RegionGeometry,
        ids: &IdAllocator,
        rng: &mut R,
    ) -> PlacementReport {
        let (inside_target, outside_target) = self.config.quota(n);
        let mut report = PlacementReport {
            region: region.code.clone(),
            vessels: Vec::with_capacity(n),
            inside_target,
            outside_target,
            inside_placed: 0,
            outside_placed: 0,
            attempts: 0,
            warnings: Vec::new(),
        };

        if n == 0 {
            return report;
        }

        if region.boxes.is_empty() {
            warn!(region = %region.code, "Region has no sampling boxes");
            report
                .warnings
                .push(format!("Region '{}' has no sampling boxes", region.code));
            return report;
        }

        let engine_ready = self.classifier.engine_available();
        for (kind, geometry) in [(GeometryKind::Buffer, buffer), (GeometryKind::Land, land)] {
            if geometry.is_empty() || !engine_ready {
                warn!(region = %region.code, kind = %kind, "Geometry unavailable, check skipped");
                report.warnings.push(format!(
                    "{} geometry unavailable for '{}'; {} check skipped",
                    kind.label(),
                    region.code,
                    kind
                ));
            }
        }

        for quota in [Quota::Inside, Quota::Outside] {
            let target = match quota {
                Quota::Inside => inside_target,
                Quota::Outside => outside_target,
            };
            let budget = target.saturating_mul(self.config.attempt_multiplier);
            let (placed, attempts) =
                self.fill(quota, region, target, budget, buffer, land, ids, rng, &mut report.vessels);

            report.attempts += attempts;
            match quota {
                Quota::Inside => report.inside_placed = placed,
                Quota::Outside => report.outside_placed = placed,
            }

            if placed < target {
                warn!(
                    region = %region.code,
                    quota = quota.label(),
                    placed,
                    target,
                    attempts,
                    "Placement budget exhausted"
                );
                report.warnings.push(format!(
                    "Only placed {} of {} vessels {} the zone for '{}' after {} attempts",
                    placed,
                    target,
                    quota.label(),
                    region.code,
                    attempts
                ));
            }
        }

        report.vessels.shuffle(rng);

        info!(
            region = %region.code,
            requested = n,
            inside = report.inside_placed,
            outside = report.outside_placed,
            attempts = report.attempts,
            "Fleet generated"
        );
        report
    }

    /// Run one quota's sampling loop. Returns (placed, attempts).
    #[allow(clippy::too_many_arguments)]
    fn fill<R: Rng + ?Sized>(
        &self,
        quota: Quota,
        region: &RegionConfig,
        target: usize,
        budget: usize,
        buffer: &RegionGeometry,
        land: &RegionGeometry,
        ids: &IdAllocator,
        rng: &mut R,
        out: &mut Vec<Vessel>,
    ) -> (usize, usize) {
        let mut placed = 0;
        let mut attempts = 0;

        while placed < target && attempts < budget {
            attempts += 1;

            let Some(sampling_box) = region.boxes.choose(rng) else {
                break;
            };
            let candidate = sampling_box.sample(rng);
            let classification = self.classifier.classify(&candidate, buffer, land);
            if !quota.accepts(classification) {
                continue;
            }

            out.push(self.make_vessel(quota, region, candidate, ids, rng));
            placed += 1;
        }

        (placed, attempts)
    }

    fn make_vessel<R: Rng + ?Sized>(
        &self,
        quota: Quota,
        region: &RegionConfig,
        position: LatLng,
        ids: &IdAllocator,
        rng: &mut R,
    ) -> Vessel {
        let name = random_name(rng);
        let valve_open = match (self.config.valve_policy, quota) {
            (ValvePolicy::ClosedInZone, Quota::Inside) => false,
            _ => rng.gen_bool(0.5),
        };
        Vessel::new(ids.next_id(), name, position, valve_open, region.code.clone())
    }
}
