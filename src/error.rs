use crate::types::{InvalidWindow, Timestamp};
use thiserror::Error;

/// Falhas do provedor de histórico/manutenção
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("falha ao obter conexão do pool: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    #[error("falha na consulta ao PostgreSQL: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("registro inválido no histórico: {0}")]
    InvalidRow(#[from] InvalidWindow),

    #[error("provedor indisponível: {0}")]
    Unavailable(String),
}

/// Erros das consultas de outage/downtime
#[derive(Debug, Error)]
pub enum DowntimeError {
    #[error("intervalo inválido: to ({to}) anterior a from ({from})")]
    InvalidRange { from: Timestamp, to: Timestamp },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Rejeita `to < from` antes de qualquer consulta.
pub fn check_range(from: Option<Timestamp>, to: Option<Timestamp>) -> Result<(), DowntimeError> {
    match (from, to) {
        (Some(from), Some(to)) if to < from => Err(DowntimeError::InvalidRange { from, to }),
        _ => Ok(()),
    }
}
