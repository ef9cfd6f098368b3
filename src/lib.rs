//! Núcleo de cálculo de outages e downtime de checks monitorados.
//!
//! A partir do histórico de mudanças de estado e das janelas de manutenção,
//! reconstrói os outages, desconta o tempo justificado e soma o downtime por
//! estado dentro de uma janela opcionalmente aberta.

pub mod config;
pub mod downtime;
pub mod error;
pub mod maintenance;
pub mod outage;
pub mod presenter;
pub mod storage;
pub mod types;

pub use downtime::DowntimeAggregator;
pub use error::{DowntimeError, StoreError};
pub use maintenance::{MaintenanceClipper, MaintenanceSpan};
pub use outage::OutageExtractor;
pub use presenter::CheckPresenter;
pub use storage::{HistoryStore, MemoryStore, PgHistoryStore};
pub use types::{
    ClippedInterval, DEFAULT_HEALTHY_STATE, DowntimeReport, MaintenanceWindow, Outage, StateSample,
    Timestamp,
};
