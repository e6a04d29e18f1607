use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use todo_core::{InMemoryTodoGateway, TodoGateway, TodoService};
use todo_server::{AppConfig, PgTodoGateway};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let gateway: Arc<dyn TodoGateway> = match &config.database.url {
        Some(url) => {
            let gateway = PgTodoGateway::connect(url, config.database.max_connections)
                .await
                .context("connecting to database")?;
            tracing::info!("using postgres gateway");
            Arc::new(gateway)
        }
        None => {
            tracing::warn!("no database configured, todos are kept in memory");
            Arc::new(InMemoryTodoGateway::new())
        }
    };

    let addr = config.server_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("listening on {}", listener.local_addr()?);
    todo_server::run(listener, TodoService::new(gateway)).await?;
    Ok(())
}
