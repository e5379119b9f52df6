//! Region → zone → woreda lookups for the two address blocks.
//!
//! Every fetch takes a generation ticket under the lock before awaiting. A response is applied
//! only if its ticket is still current, so a slow answer for an earlier selection can never
//! replace the list of a later one.

use crate::reference::{ReferenceSource, fetch_options};
use campus_domain::reference::{CascadeLevel, CascadeTarget, DropdownOption};
use parking_lot::Mutex;
use tracing::debug;

/// One address block's selections and dependent lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeState {
    pub region_code: Option<String>,
    pub zones: Vec<DropdownOption>,
    pub selected_zone: Option<String>,
    pub woredas: Vec<DropdownOption>,
    pub selected_woreda: Option<String>,
    zone_generation: u64,
    woreda_generation: u64,
}

impl CascadeState {
    fn select_region(&mut self, code: Option<&str>) -> u64 {
        self.region_code = code.map(str::to_owned);
        self.zones.clear();
        self.zone_generation += 1;
        self.select_zone(None);
        self.zone_generation
    }

    fn select_zone(&mut self, code: Option<&str>) -> u64 {
        self.selected_zone = code.map(str::to_owned);
        self.woredas.clear();
        self.selected_woreda = None;
        self.woreda_generation += 1;
        self.woreda_generation
    }
}

/// Shared controller for both cascades. All methods take `&self`.
#[derive(Debug)]
pub struct CascadeController<R> {
    source: R,
    birth: Mutex<CascadeState>,
    current: Mutex<CascadeState>,
}

fn code(raw: &str) -> Option<&str> {
    Some(raw.trim()).filter(|c| !c.is_empty())
}

impl<R: ReferenceSource> CascadeController<R> {
    pub fn new(source: R) -> Self {
        Self { source, birth: Mutex::default(), current: Mutex::default() }
    }

    const fn slot(&self, target: CascadeTarget) -> &Mutex<CascadeState> {
        match target {
            CascadeTarget::Birth => &self.birth,
            CascadeTarget::Current => &self.current,
        }
    }

    #[must_use]
    pub fn state(&self, target: CascadeTarget) -> CascadeState {
        self.slot(target).lock().clone()
    }

    #[must_use]
    pub fn zones(&self, target: CascadeTarget) -> Vec<DropdownOption> {
        self.slot(target).lock().zones.clone()
    }

    #[must_use]
    pub fn woredas(&self, target: CascadeTarget) -> Vec<DropdownOption> {
        self.slot(target).lock().woredas.clone()
    }

    /// Selects a region: clears the zone and woreda selections and lists, then loads the zones.
    ///
    /// A blank code only clears. Returns whether the fetched list was applied; `false` means a
    /// newer selection superseded this one while it was in flight.
    pub async fn fetch_zones_by_region(&self, region_code: &str, target: CascadeTarget) -> bool {
        let region = code(region_code);
        let ticket = self.slot(target).lock().select_region(region);
        let Some(region) = region else {
            return true;
        };

        let level = CascadeLevel::Zones;
        let zones = fetch_options(&self.source, &level.path(region), level.shape()).await;

        let mut state = self.slot(target).lock();
        if state.zone_generation != ticket {
            debug!(%target, region, "Discarding stale zone list");
            return false;
        }
        state.zones = zones;
        true
    }

    /// Selects a zone: clears the woreda selection and list, then loads the woredas.
    ///
    /// Same blank-code and staleness rules as [`CascadeController::fetch_zones_by_region`].
    pub async fn fetch_woredas_by_zone(&self, zone_code: &str, target: CascadeTarget) -> bool {
        let zone = code(zone_code);
        let ticket = self.slot(target).lock().select_zone(zone);
        let Some(zone) = zone else {
            return true;
        };

        let level = CascadeLevel::Woredas;
        let woredas = fetch_options(&self.source, &level.path(zone), level.shape()).await;

        let mut state = self.slot(target).lock();
        if state.woreda_generation != ticket {
            debug!(%target, zone, "Discarding stale woreda list");
            return false;
        }
        state.woredas = woredas;
        true
    }

    /// Records the final woreda choice. No fetch is involved.
    pub fn select_woreda(&self, target: CascadeTarget, woreda_code: &str) {
        self.slot(target).lock().selected_woreda = code(woreda_code).map(str::to_owned);
    }

    /// Rebuilds the lists for selections restored from a saved draft.
    pub async fn resume(
        &self,
        target: CascadeTarget,
        region: Option<&str>,
        zone: Option<&str>,
        woreda: Option<&str>,
    ) {
        let Some(region) = region.and_then(code) else {
            return;
        };
        self.fetch_zones_by_region(region, target).await;
        if let Some(zone) = zone.and_then(code) {
            self.fetch_woredas_by_zone(zone, target).await;
            if let Some(woreda) = woreda {
                self.select_woreda(target, woreda);
            }
        }
    }

    /// Forgets both cascades.
    pub fn reset(&self) {
        for target in [CascadeTarget::Birth, CascadeTarget::Current] {
            self.slot(target).lock().select_region(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdmissionsError;
    use serde_json::{Value, json};
    use std::time::Duration;

    /// Zones for region `r` are `r01`, `r02`; woredas for zone `z` are `z-a`. Region `slow`
    /// answers after a delay.
    #[derive(Debug, Default)]
    struct Geography;

    impl ReferenceSource for Geography {
        async fn fetch(&self, path: &str) -> Result<Value, AdmissionsError> {
            if let Some(region) = path.strip_prefix("/api/zones/region/") {
                if region == "slow" {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                }
                return Ok(json!([
                    { "zoneCode": format!("{region}01"), "zone": "First" },
                    { "zoneCode": format!("{region}02"), "zone": "Second" },
                ]));
            }
            if let Some(zone) = path.strip_prefix("/api/woredas/zone/") {
                return Ok(json!({ "data": [{ "woredaCode": format!("{zone}-a"), "woreda": "A" }] }));
            }
            Err("unexpected path".into())
        }
    }

    #[tokio::test]
    async fn selecting_a_region_empties_woredas() {
        let cascade = CascadeController::new(Geography);
        assert!(cascade.fetch_zones_by_region("03", CascadeTarget::Birth).await);
        assert!(cascade.fetch_woredas_by_zone("0301", CascadeTarget::Birth).await);
        assert_eq!(cascade.woredas(CascadeTarget::Birth).len(), 1);

        cascade.fetch_zones_by_region("04", CascadeTarget::Birth).await;
        let state = cascade.state(CascadeTarget::Birth);
        assert_eq!(state.region_code.as_deref(), Some("04"));
        assert_eq!(state.zones[0].value, "0401");
        assert!(state.selected_zone.is_none());
        assert!(state.woredas.is_empty());
    }

    #[tokio::test]
    async fn targets_are_independent() {
        let cascade = CascadeController::new(Geography);
        cascade.fetch_zones_by_region("01", CascadeTarget::Birth).await;
        cascade.fetch_zones_by_region("07", CascadeTarget::Current).await;

        assert_eq!(cascade.zones(CascadeTarget::Birth)[0].value, "0101");
        assert_eq!(cascade.zones(CascadeTarget::Current)[0].value, "0701");
    }

    #[tokio::test]
    async fn stale_zone_response_is_discarded() {
        let cascade = CascadeController::new(Geography);

        let (slow, fast) = tokio::join!(
            cascade.fetch_zones_by_region("slow", CascadeTarget::Current),
            async {
                tokio::time::sleep(Duration::from_millis(5)).await;
                cascade.fetch_zones_by_region("02", CascadeTarget::Current).await
            },
        );

        assert!(!slow);
        assert!(fast);
        let state = cascade.state(CascadeTarget::Current);
        assert_eq!(state.region_code.as_deref(), Some("02"));
        assert_eq!(state.zones[0].value, "0201");
    }

    #[tokio::test]
    async fn blank_codes_clear_without_fetching() {
        let cascade = CascadeController::new(Geography);
        cascade.fetch_zones_by_region("05", CascadeTarget::Birth).await;

        assert!(cascade.fetch_zones_by_region("  ", CascadeTarget::Birth).await);
        assert_eq!(cascade.state(CascadeTarget::Birth), CascadeState {
            zone_generation: 2,
            woreda_generation: 2,
            ..CascadeState::default()
        });
    }

    #[tokio::test]
    async fn resume_rebuilds_lists_and_keeps_selection() {
        let cascade = CascadeController::new(Geography);
        cascade.resume(CascadeTarget::Current, Some("09"), Some("0902"), Some("0902-a")).await;

        let state = cascade.state(CascadeTarget::Current);
        assert_eq!(state.zones.len(), 2);
        assert_eq!(state.selected_zone.as_deref(), Some("0902"));
        assert_eq!(state.woredas[0].value, "0902-a");
        assert_eq!(state.selected_woreda.as_deref(), Some("0902-a"));
    }
}
