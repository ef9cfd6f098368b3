//! maintenance.rs — Desconto de janelas de manutenção sobre outages
//!
//! As janelas chegam sem ordem e podem se sobrepor; antes da subtração elas
//! são unidas em spans disjuntos e ordenados.

use crate::types::{ClippedInterval, MaintenanceWindow, Outage, Timestamp};

/// Span de manutenção já coalescido
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaintenanceSpan {
    pub start: Timestamp,
    pub end: Timestamp,
}

/// Subtrai a cobertura de manutenção dos outages de estados com falha.
#[derive(Debug, Clone, Default)]
pub struct MaintenanceClipper {
    spans: Vec<MaintenanceSpan>,
}

impl MaintenanceClipper {
    pub fn new(windows: &[MaintenanceWindow]) -> Self {
        Self {
            spans: coalesce(windows),
        }
    }

    /// Spans disjuntos, em ordem cronológica.
    pub fn spans(&self) -> &[MaintenanceSpan] {
        &self.spans
    }

    /// Recorta um único outage.
    ///
    /// - outage aberto: devolvido intacto, manutenção não se aplica
    /// - span cobre o outage inteiro: nenhum intervalo
    /// - span dentro do outage: divide em dois
    /// - span sobre o início ou o fim: apara o lado correspondente
    /// - sem interseção: devolvido intacto
    pub fn clip(&self, outage: &Outage) -> Vec<ClippedInterval> {
        let Some(end) = outage.end else {
            return vec![ClippedInterval::new(outage.state.clone(), outage.start, None)];
        };

        let mut pieces = Vec::new();
        let mut cursor = outage.start;
        for span in &self.spans {
            if span.end <= cursor {
                continue;
            }
            if span.start >= end {
                break;
            }
            if span.start > cursor {
                pieces.push(ClippedInterval::new(outage.state.clone(), cursor, Some(span.start)));
            }
            cursor = span.end;
            if cursor >= end {
                break;
            }
        }
        if cursor < end {
            pieces.push(ClippedInterval::new(outage.state.clone(), cursor, Some(end)));
        }
        pieces
    }

    /// Recorta todos os outages não saudáveis, preservando a ordem.
    pub fn clip_all(&self, outages: &[Outage], healthy_state: &str) -> Vec<ClippedInterval> {
        outages
            .iter()
            .filter(|outage| outage.state != healthy_state)
            .flat_map(|outage| self.clip(outage))
            .collect()
    }
}

/// União das janelas: ordena pelo início e funde as que se tocam ou se
/// sobrepõem. Janelas vazias são descartadas.
fn coalesce(windows: &[MaintenanceWindow]) -> Vec<MaintenanceSpan> {
    let mut sorted: Vec<MaintenanceSpan> = windows
        .iter()
        .filter(|window| window.end > window.start)
        .map(|window| MaintenanceSpan {
            start: window.start,
            end: window.end,
        })
        .collect();
    sorted.sort_by_key(|span| span.start);

    let mut merged: Vec<MaintenanceSpan> = Vec::with_capacity(sorted.len());
    for span in sorted {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged
}
