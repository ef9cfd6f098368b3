use crate::types::{ClippedInterval, DowntimeReport, Outage, Timestamp};
use std::collections::BTreeMap;

/// Soma os intervalos recortados por estado e monta o relatório.
#[derive(Debug, Clone)]
pub struct DowntimeAggregator<'a> {
    healthy_state: &'a str,
    from: Option<Timestamp>,
    to: Option<Timestamp>,
}

impl<'a> DowntimeAggregator<'a> {
    pub fn new(healthy_state: &'a str, from: Option<Timestamp>, to: Option<Timestamp>) -> Self {
        Self {
            healthy_state,
            from,
            to,
        }
    }

    /// Duração da janela de consulta, se ambos os extremos existem e a
    /// diferença cabe em `i64`.
    pub fn window_seconds(&self) -> Option<i64> {
        match (self.from, self.to) {
            (Some(from), Some(to)) => to.checked_sub(from),
            _ => None,
        }
    }

    pub fn aggregate(&self, outages: &[Outage], clipped: Vec<ClippedInterval>) -> DowntimeReport {
        // Estados com outage mas totalmente cobertos por manutenção ficam com 0.
        let mut total_seconds: BTreeMap<String, i64> = outages
            .iter()
            .filter(|outage| outage.state != self.healthy_state)
            .map(|outage| (outage.state.clone(), 0))
            .collect();

        for interval in clipped.iter().filter(|i| i.state != self.healthy_state) {
            let entry = total_seconds.entry(interval.state.clone()).or_insert(0);
            if let Some(duration) = interval.duration() {
                *entry = entry.saturating_add(duration);
            }
        }

        let mut percentages: BTreeMap<String, Option<f64>> = BTreeMap::new();
        match self.window_seconds() {
            Some(window) => {
                let unhealthy = total_seconds.values().fold(0i64, |acc, s| acc.saturating_add(*s));
                total_seconds.insert(self.healthy_state.to_string(), window.saturating_sub(unhealthy));
                for (state, seconds) in &total_seconds {
                    let percentage = (window > 0).then(|| (*seconds as f64 * 100.0) / window as f64);
                    percentages.insert(state.clone(), percentage);
                }
            }
            None => {
                for state in total_seconds.keys() {
                    percentages.insert(state.clone(), None);
                }
            }
        }

        let mut downtime: Vec<ClippedInterval> = clipped
            .into_iter()
            .filter(|interval| interval.state != self.healthy_state)
            .collect();
        downtime.sort_by_key(|interval| interval.start);

        DowntimeReport {
            total_seconds,
            percentages,
            downtime,
        }
    }
}


#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::*;
    use crate::maintenance::MaintenanceClipper;
    use crate::outage::OutageExtractor;
    use crate::types::{MaintenanceWindow, StateSample};

    fn arb_samples() -> impl Strategy<Value = Vec<StateSample>> {
        prop::collection::vec((prop::sample::select(vec!["ok", "warning", "critical"]), 0i64..600), 0..20)
            .prop_map(|steps| {
                let mut ts = 0;
                steps
                    .into_iter()
                    .map(|(state, gap)| {
                        ts += gap;
                        StateSample::new(state, ts)
                    })
                    .collect()
            })
    }

    fn arb_windows() -> impl Strategy<Value = Vec<MaintenanceWindow>> {
        prop::collection::vec(
            (0i64..12_000, 0i64..900).prop_map(|(s, l)| MaintenanceWindow::new(s, s + l).unwrap()),
            0..6,
        )
    }

    proptest! {
        #[test]
        fn bounded_percentages_sum_to_hundred(
            samples in arb_samples(),
            windows in arb_windows(),
            extra in 1i64..5_000,
        ) {
            let from = 0;
            let to = samples.last().map_or(0, |s| s.timestamp) + extra;
            let outages = OutageExtractor::new(Some(from), Some(to)).extract(&samples, None);
            let clipped = MaintenanceClipper::new(&windows).clip_all(&outages, "ok");
            let report = DowntimeAggregator::new("ok", Some(from), Some(to)).aggregate(&outages, clipped);

            let sum: f64 = report.percentages.values().map(|p| p.unwrap()).sum();
            prop_assert!((sum - 100.0).abs() < 1e-6);
            prop_assert_eq!(report.total_seconds.values().sum::<i64>(), to - from);
        }

        #[test]
        fn open_intervals_never_add_seconds(samples in arb_samples()) {
            let outages = OutageExtractor::default().extract(&samples, None);
            let clipped = MaintenanceClipper::new(&[]).clip_all(&outages, "ok");
            let closed: i64 = clipped.iter().filter_map(|c| c.duration()).sum();
            let report = DowntimeAggregator::new("ok", None, None).aggregate(&outages, clipped);

            prop_assert_eq!(report.total_seconds.values().sum::<i64>(), closed);
            prop_assert!(report.percentages.values().all(Option::is_none));
        }

        #[test]
        fn consolidated_outages_alternate(samples in arb_samples()) {
            let outages = OutageExtractor::default().extract(&samples, None);
            for pair in outages.windows(2) {
                prop_assert_ne!(&pair[0].state, &pair[1].state);
                prop_assert_eq!(pair[0].end, Some(pair[1].start));
            }
        }
    }
}
