use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use monitoramento_downtime::{CheckPresenter, PgHistoryStore, config};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Inicializa o sistema de logging (tracing)
    tracing_subscriber::fmt::init();

    let config = config::Config::load()?;
    info!("Configuração carregada para o check {}", config.check_id);

    let store = PgHistoryStore::connect(&config.database_url, config.pool_size, &config.check_id)?;
    let presenter = CheckPresenter::with_healthy_state(store, &config.healthy_state);

    // window_hours = 0 consulta o histórico inteiro
    let now: DateTime<Utc> = Utc::now();
    let (from, to) = match config.window_hours {
        0 => (None, None),
        hours => {
            let span = Duration::try_hours(i64::try_from(hours)?)
                .ok_or_else(|| anyhow::anyhow!("window_hours fora do limite: {}", hours))?;
            let start = now - span;
            (Some(start.timestamp()), Some(now.timestamp()))
        }
    };
    info!(
        "Calculando downtime de {} até {}",
        from.and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
            .map_or_else(|| "o início".to_string(), |dt| dt.to_rfc3339()),
        now.to_rfc3339()
    );

    let outages = presenter.problem_outages(from, to).await?;
    let scheduled = presenter.scheduled_maintenance(from, to).await?;
    let unscheduled = presenter.unscheduled_maintenance(from, to).await?;
    let report = presenter.downtime(from, to).await?;
    info!(
        "{} outages, {} manutenções agendadas, {} não agendadas",
        outages.len(),
        scheduled.len(),
        unscheduled.len()
    );

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "check_id": config.check_id,
            "from": from,
            "to": to,
            "outages": outages,
            "scheduled_maintenances": scheduled,
            "unscheduled_maintenances": unscheduled,
            "downtime": report,
        }))?
    );

    Ok(())
}
