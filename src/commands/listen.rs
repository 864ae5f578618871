use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;

use anyhow::Context;
use tokio::task::JoinSet;
use tracing::info;

use crate::broker::Broker;
use crate::config::Config;
use crate::db::Database;
use crate::error::AppResult;
use crate::worker;

/// Start the listeners and run until one of them fails.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let broker = Broker::connect(&config.rabbitmq)
        .await
        .context("failed to connect to RabbitMQ")?;
    let broker = Arc::new(broker);

    let database = Database::connect(&config.postgresql)
        .await
        .context("failed to connect to PostgreSQL")?;

    let count = config
        .listeners
        .worker_count()
        .context("failed to load workers number")?;

    info!(
        "spawning {count} listeners on queue '{queue}'",
        queue = config.rabbitmq.queue
    );

    spawn_listeners(count, |listener| {
        let broker = Arc::clone(&broker);
        let database = database.clone();
        async move { worker::run(listener, &broker, &database).await }
    })
    .await
}

/// Spawn listeners numbered `1..=count` and wait for the first one to fail.
///
/// Listeners only return on failure, so this never returns `Ok` while any
/// listener is still running. The remaining listeners are aborted on return.
pub async fn spawn_listeners<F, Fut>(count: NonZeroUsize, listen: F) -> anyhow::Result<()>
where
    F: Fn(usize) -> Fut,
    Fut: Future<Output = AppResult<()>> + Send + 'static,
{
    let mut listeners = JoinSet::new();
    for listener in 1..=count.get() {
        listeners.spawn(listen(listener));
    }

    while let Some(result) = listeners.join_next().await {
        result.context("listener task failed")??;
    }

    Ok(())
}
