use anyhow::{Context, Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

/// Голый уровень (`debug`) относится только к крейтам клиента, зависимости
/// остаются на `warn`. Полные директивы (`reqwest=debug,...`) берутся как есть.
fn filter_directives(level: &str) -> String {
    let level = level.trim();
    if level.is_empty() {
        return "warn".to_string();
    }
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }
    format!("warn,movie_client={level},movie_cli={level}")
}

/// Логи идут в stderr без времени, чтобы не мешать выводу команд.
pub fn init_logging(level: &str) -> Result<()> {
    let directives = filter_directives(level);
    let filter = EnvFilter::try_new(&directives)
        .with_context(|| format!("invalid log filter `{directives}`"))?;

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(())
}
