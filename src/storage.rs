use crate::error::StoreError;
use crate::types::{MaintenanceWindow, StateSample, Timestamp};
use anyhow::Result;
use deadpool_postgres::{Config as PgConfig, Pool, PoolConfig, Runtime};
use postgres_types::ToSql;
use std::future::Future;
use tokio_postgres::{NoTls, Row};
use tracing::{debug, warn};

/// Contrato do provedor de histórico de estados e manutenções de um check.
pub trait HistoryStore {
    /// Amostras em `[from, to)`, ordenadas pelo timestamp.
    fn get_states(
        &self,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
    ) -> impl Future<Output = Result<Vec<StateSample>, StoreError>> + Send;

    /// Última amostra estritamente anterior a `timestamp`.
    fn get_state_before(
        &self,
        timestamp: Timestamp,
    ) -> impl Future<Output = Result<Option<StateSample>, StoreError>> + Send;

    /// Janelas que se sobrepõem a `[from, to)`, ordenadas pelo início.
    fn get_maintenance_windows(
        &self,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
        scheduled: bool,
    ) -> impl Future<Output = Result<Vec<MaintenanceWindow>, StoreError>> + Send;
}

fn in_range(timestamp: Timestamp, from: Option<Timestamp>, to: Option<Timestamp>) -> bool {
    from.is_none_or(|from| timestamp >= from) && to.is_none_or(|to| timestamp < to)
}

fn overlaps(window: &MaintenanceWindow, from: Option<Timestamp>, to: Option<Timestamp>) -> bool {
    from.is_none_or(|from| window.end > from) && to.is_none_or(|to| window.start < to)
}

/// Histórico em memória (testes e uso embarcado)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    states: Vec<StateSample>,
    maintenances: Vec<(MaintenanceWindow, bool)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_states(mut self, states: impl IntoIterator<Item = StateSample>) -> Self {
        self.states.extend(states);
        self.states.sort_by_key(|sample| sample.timestamp);
        self
    }

    pub fn with_maintenance(mut self, window: MaintenanceWindow, scheduled: bool) -> Self {
        self.maintenances.push((window, scheduled));
        self
    }
}

impl HistoryStore for MemoryStore {
    async fn get_states(
        &self,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
    ) -> Result<Vec<StateSample>, StoreError> {
        Ok(self
            .states
            .iter()
            .filter(|sample| in_range(sample.timestamp, from, to))
            .cloned()
            .collect())
    }

    async fn get_state_before(&self, timestamp: Timestamp) -> Result<Option<StateSample>, StoreError> {
        Ok(self
            .states
            .iter()
            .rev()
            .find(|sample| sample.timestamp < timestamp)
            .cloned())
    }

    async fn get_maintenance_windows(
        &self,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
        scheduled: bool,
    ) -> Result<Vec<MaintenanceWindow>, StoreError> {
        let mut windows: Vec<MaintenanceWindow> = self
            .maintenances
            .iter()
            .filter(|(window, kind)| *kind == scheduled && overlaps(window, from, to))
            .map(|(window, _)| *window)
            .collect();
        windows.sort_by_key(|window| window.start);
        Ok(windows)
    }
}

const SELECT_STATES: &str = r#"
    SELECT state, ts FROM check_states
    WHERE check_id = $1
      AND ($2::BIGINT IS NULL OR ts >= $2)
      AND ($3::BIGINT IS NULL OR ts < $3)
    ORDER BY ts
"#;

const SELECT_STATE_BEFORE: &str = r#"
    SELECT state, ts FROM check_states
    WHERE check_id = $1 AND ts < $2
    ORDER BY ts DESC
    LIMIT 1
"#;

const SELECT_MAINTENANCES: &str = r#"
    SELECT start_time, end_time FROM check_maintenances
    WHERE check_id = $1
      AND scheduled = $4
      AND ($2::BIGINT IS NULL OR end_time > $2)
      AND ($3::BIGINT IS NULL OR start_time < $3)
    ORDER BY start_time
"#;

/// Histórico persistido no PostgreSQL, restrito a um check.
pub struct PgHistoryStore {
    pool: Pool,
    check_id: String,
}

impl PgHistoryStore {
    pub fn connect(database_url: &str, pool_size: usize, check_id: impl Into<String>) -> Result<Self> {
        let mut config = PgConfig::new();
        config.url = Some(database_url.to_string());
        config.pool = Some(PoolConfig::new(pool_size));
        let pool = config.create_pool(Some(Runtime::Tokio1), NoTls)?;
        Ok(Self {
            pool,
            check_id: check_id.into(),
        })
    }
}

fn sample_from_row(row: &Row) -> Result<StateSample, StoreError> {
    Ok(StateSample {
        state: row.try_get("state")?,
        timestamp: row.try_get("ts")?,
    })
}

fn window_from_row(row: &Row) -> Result<MaintenanceWindow, StoreError> {
    let start: Timestamp = row.try_get("start_time")?;
    let end: Timestamp = row.try_get("end_time")?;
    MaintenanceWindow::new(start, end).map_err(|e| {
        warn!("Manutenção com fim anterior ao início: {}", e);
        StoreError::from(e)
    })
}

impl HistoryStore for PgHistoryStore {
    async fn get_states(
        &self,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
    ) -> Result<Vec<StateSample>, StoreError> {
        let client = self.pool.get().await?;
        let params: [&(dyn ToSql + Sync); 3] = [&self.check_id, &from, &to];
        let rows = client.query(SELECT_STATES, &params).await?;
        debug!(
            "[CHECK {}] {} amostras de estado em [{:?}, {:?})",
            self.check_id,
            rows.len(),
            from,
            to
        );
        rows.iter().map(sample_from_row).collect()
    }

    async fn get_state_before(&self, timestamp: Timestamp) -> Result<Option<StateSample>, StoreError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(SELECT_STATE_BEFORE, &[&self.check_id, &timestamp])
            .await?;
        row.as_ref().map(sample_from_row).transpose()
    }

    async fn get_maintenance_windows(
        &self,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
        scheduled: bool,
    ) -> Result<Vec<MaintenanceWindow>, StoreError> {
        let client = self.pool.get().await?;
        let params: [&(dyn ToSql + Sync); 4] = [&self.check_id, &from, &to, &scheduled];
        let rows = client.query(SELECT_MAINTENANCES, &params).await?;
        debug!(
            "[CHECK {}] {} manutenções (scheduled={}) em [{:?}, {:?})",
            self.check_id,
            rows.len(),
            scheduled,
            from,
            to
        );
        rows.iter().map(window_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryStore {
        MemoryStore::new()
            .with_states([
                StateSample::new("ok", 300),
                StateSample::new("critical", 100),
                StateSample::new("ok", 200),
            ])
            .with_maintenance(MaintenanceWindow::new(50, 150).unwrap(), true)
            .with_maintenance(MaintenanceWindow::new(250, 400).unwrap(), true)
            .with_maintenance(MaintenanceWindow::new(120, 130).unwrap(), false)
    }

    #[tokio::test]
    async fn test_states_respect_half_open_range() {
        let store = store();
        let states = store.get_states(Some(100), Some(300)).await.unwrap();
        assert_eq!(
            states,
            vec![StateSample::new("critical", 100), StateSample::new("ok", 200)]
        );
        assert_eq!(store.get_states(None, None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_state_before_is_strict() {
        let store = store();
        assert_eq!(
            store.get_state_before(200).await.unwrap(),
            Some(StateSample::new("critical", 100))
        );
        assert_eq!(store.get_state_before(100).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_maintenance_filtered_by_kind_and_overlap() {
        let store = store();
        let scheduled = store.get_maintenance_windows(Some(140), Some(260), true).await.unwrap();
        assert_eq!(scheduled.len(), 2);
        let unscheduled = store.get_maintenance_windows(Some(140), None, false).await.unwrap();
        assert!(unscheduled.is_empty());
        let backward = store.get_maintenance_windows(None, Some(200), true).await.unwrap();
        assert_eq!(backward, vec![MaintenanceWindow::new(50, 150).unwrap()]);
    }
}
