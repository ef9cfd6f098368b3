use config as config_crate;
use serde::Deserialize;

/// Configuração operacional do relatório de downtime.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// URL de conexão com o banco PostgreSQL.
    pub database_url: String,
    /// Identificador do check consultado.
    pub check_id: String,
    /// Estado considerado saudável (fora da contagem de downtime).
    pub healthy_state: String,
    /// Tamanho da janela do relatório, em horas, terminando agora.
    /// Zero consulta o histórico inteiro, sem percentuais.
    pub window_hours: u64,
    /// Conexões máximas no pool.
    pub pool_size: usize,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let settings = config_crate::Config::builder()
            .set_default("healthy_state", crate::types::DEFAULT_HEALTHY_STATE)?
            .set_default("window_hours", 24)?
            .set_default("pool_size", 4)?
            .add_source(config_crate::File::with_name("config").required(false))
            .add_source(config_crate::Environment::with_prefix("DOWNTIME"))
            .build()?;
        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.check_id.trim().is_empty() {
            anyhow::bail!("check_id não pode ser vazio");
        }
        if self.healthy_state.trim().is_empty() {
            anyhow::bail!("healthy_state não pode ser vazio");
        }
        if self.pool_size == 0 {
            anyhow::bail!("pool_size deve ser maior que zero");
        }
        Ok(())
    }
}
