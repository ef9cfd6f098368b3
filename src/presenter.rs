//! presenter.rs — Consultas de outage, manutenção e downtime de um check
//!
//! Busca os dados brutos no `HistoryStore` e encadeia extrator, recorte de
//! manutenção e agregação. Não guarda estado entre chamadas.

use crate::downtime::DowntimeAggregator;
use crate::error::{DowntimeError, check_range};
use crate::maintenance::MaintenanceClipper;
use crate::outage::{OutageExtractor, problems};
use crate::storage::HistoryStore;
use crate::types::{DEFAULT_HEALTHY_STATE, DowntimeReport, MaintenanceWindow, Outage, Timestamp};
use tracing::{debug, info};

/// Fachada consumida pela camada de API
#[derive(Debug, Clone)]
pub struct CheckPresenter<S> {
    store: S,
    healthy_state: String,
}

impl<S: HistoryStore> CheckPresenter<S> {
    pub fn new(store: S) -> Self {
        Self::with_healthy_state(store, DEFAULT_HEALTHY_STATE)
    }

    pub fn with_healthy_state(store: S, healthy_state: impl Into<String>) -> Self {
        Self {
            store,
            healthy_state: healthy_state.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Linha do tempo consolidada, inclusive os períodos saudáveis.
    pub async fn outage(
        &self,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
    ) -> Result<Vec<Outage>, DowntimeError> {
        check_range(from, to)?;

        let samples = self.store.get_states(from, to).await?;
        let previous = match from {
            Some(from) => self.store.get_state_before(from).await?,
            None => None,
        };

        let outages = OutageExtractor::new(from, to).extract(&samples, previous.as_ref());
        debug!(
            "{} amostras consolidadas em {} outages (from={:?}, to={:?})",
            samples.len(),
            outages.len(),
            from,
            to
        );
        Ok(outages)
    }

    /// Apenas os outages em estados não saudáveis.
    pub async fn problem_outages(
        &self,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
    ) -> Result<Vec<Outage>, DowntimeError> {
        let outages = self.outage(from, to).await?;
        Ok(problems(&outages, &self.healthy_state))
    }

    pub async fn scheduled_maintenance(
        &self,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
    ) -> Result<Vec<MaintenanceWindow>, DowntimeError> {
        self.maintenance(from, to, true).await
    }

    pub async fn unscheduled_maintenance(
        &self,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
    ) -> Result<Vec<MaintenanceWindow>, DowntimeError> {
        self.maintenance(from, to, false).await
    }

    /// Janelas no intervalo mais as que começaram antes de `from` e ainda
    /// estavam em vigor nele.
    async fn maintenance(
        &self,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
        scheduled: bool,
    ) -> Result<Vec<MaintenanceWindow>, DowntimeError> {
        check_range(from, to)?;

        let mut windows = self.store.get_maintenance_windows(from, to, scheduled).await?;
        if let Some(from) = from {
            let earlier = self
                .store
                .get_maintenance_windows(None, Some(from), scheduled)
                .await?;
            for window in earlier.into_iter().filter(|w| w.end > from) {
                if !windows.contains(&window) {
                    windows.push(window);
                }
            }
        }
        windows.sort_by_key(|window| (window.start, window.end));

        debug!(
            "{} janelas de manutenção (scheduled={}) em [{:?}, {:?})",
            windows.len(),
            scheduled,
            from,
            to
        );
        Ok(windows)
    }

    /// Downtime por estado, descontadas as manutenções agendadas.
    pub async fn downtime(
        &self,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
    ) -> Result<DowntimeReport, DowntimeError> {
        check_range(from, to)?;

        let windows = self.scheduled_maintenance(from, to).await?;
        let outages = self.outage(from, to).await?;

        let clipped = MaintenanceClipper::new(&windows).clip_all(&outages, &self.healthy_state);
        let report = DowntimeAggregator::new(&self.healthy_state, from, to).aggregate(&outages, clipped);

        info!(
            "Downtime calculado: {} intervalos, totais {:?}",
            report.downtime.len(),
            report.total_seconds
        );
        Ok(report)
    }
}
