use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Segundos desde a época Unix.
pub type Timestamp = i64;

/// Estado saudável padrão de um check.
pub const DEFAULT_HEALTHY_STATE: &str = "ok";

/// Amostra de mudança de estado vinda do histórico
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateSample {
    pub state: String,
    pub timestamp: Timestamp,
}

impl StateSample {
    pub fn new(state: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            state: state.into(),
            timestamp,
        }
    }
}

/// Intervalo contínuo em um único estado. `end == None` significa que o
/// estado ainda está ativo (outage em aberto).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Outage {
    pub state: String,
    pub start: Timestamp,
    pub end: Option<Timestamp>,
}

impl Outage {
    pub fn new(state: impl Into<String>, start: Timestamp, end: Option<Timestamp>) -> Self {
        Self {
            state: state.into(),
            start,
            end,
        }
    }

    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Duração em segundos, indefinida enquanto o outage estiver aberto.
    pub fn duration(&self) -> Option<i64> {
        self.end.and_then(|end| end.checked_sub(self.start))
    }
}

/// Erro de construção de uma janela de manutenção
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("janela de manutenção inválida: fim ({end}) anterior ao início ({start})")]
pub struct InvalidWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

/// Janela de manutenção (downtime justificado). `duration` é sempre
/// `end - start`; o construtor garante isso.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMaintenanceWindow")]
pub struct MaintenanceWindow {
    pub start: Timestamp,
    pub end: Timestamp,
    pub duration: i64,
}

impl MaintenanceWindow {
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, InvalidWindow> {
        if end < start {
            return Err(InvalidWindow { start, end });
        }
        Ok(Self {
            start,
            end,
            duration: end - start,
        })
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMaintenanceWindow {
    start: Timestamp,
    end: Timestamp,
    #[serde(default)]
    #[allow(dead_code)]
    duration: Option<i64>,
}

impl TryFrom<RawMaintenanceWindow> for MaintenanceWindow {
    type Error = InvalidWindow;

    fn try_from(raw: RawMaintenanceWindow) -> Result<Self, Self::Error> {
        MaintenanceWindow::new(raw.start, raw.end)
    }
}

/// Parte de um outage que sobrou depois de descontar manutenções
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClippedInterval {
    pub state: String,
    pub start: Timestamp,
    pub end: Option<Timestamp>,
}

impl ClippedInterval {
    pub fn new(state: impl Into<String>, start: Timestamp, end: Option<Timestamp>) -> Self {
        Self {
            state: state.into(),
            start,
            end,
        }
    }

    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    pub fn duration(&self) -> Option<i64> {
        self.end.and_then(|end| end.checked_sub(self.start))
    }
}

/// Relatório final de downtime de um check
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DowntimeReport {
    /// Segundos acumulados por estado (apenas intervalos fechados).
    pub total_seconds: BTreeMap<String, i64>,
    /// Percentual por estado; `None` quando a janela não é limitada.
    pub percentages: BTreeMap<String, Option<f64>>,
    /// Intervalos de downtime em ordem cronológica, inclusive os abertos.
    pub downtime: Vec<ClippedInterval>,
}
