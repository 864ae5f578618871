use futures_util::{Stream, StreamExt};
use lapin::options::BasicConsumeOptions;
use lapin::types::FieldTable;
use lapin::{Channel, Connection, ConnectionProperties};
use tracing::info;

use crate::config::RabbitMq;
use crate::error::AppResult;

/// A single connection to RabbitMQ, shared by all listeners. Each listener
/// gets its own channel from it.
pub struct Broker {
    connection: Connection,
    queue: String,
}

impl Broker {
    pub async fn connect(params: &RabbitMq) -> AppResult<Self> {
        let connection = Connection::connect(&params.uri(), ConnectionProperties::default()).await?;
        info!(
            "connected to RabbitMQ at {host}:{port}",
            host = params.host,
            port = params.port
        );

        Ok(Self {
            connection,
            queue: params.queue.clone(),
        })
    }

    /// Open a channel for a single listener. Channels are never shared.
    pub async fn open_channel(&self) -> AppResult<Channel> {
        Ok(self.connection.create_channel().await?)
    }

    /// Start consuming the queue on `channel`, yielding message bodies.
    ///
    /// Deliveries are acknowledged by the broker as soon as they are sent, so
    /// a message that later fails to be processed is gone. The channel must
    /// outlive the returned stream.
    pub async fn consume(
        &self,
        channel: &Channel,
        listener: usize,
    ) -> AppResult<impl Stream<Item = Result<Vec<u8>, lapin::Error>>> {
        let consumer = channel
            .basic_consume(
                &self.queue,
                &format!("listener-{listener}"),
                BasicConsumeOptions {
                    no_local: false,
                    no_ack: true,
                    exclusive: false,
                    nowait: false,
                },
                FieldTable::default(),
            )
            .await?;

        Ok(consumer.map(|delivery| delivery.map(|delivery| delivery.data)))
    }
}
