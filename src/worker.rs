use chrono::Utc;
use futures_util::{pin_mut, Stream, StreamExt};
use tracing::{debug, error, info};

use crate::broker::Broker;
use crate::db::PasteStore;
use crate::error::{AppError, AppResult, MessageError};
use crate::models::{decode_message, Paste};

/// Run one listener until its channel goes away.
///
/// `listener` is a 1-based number used only in log lines.
pub async fn run<S: PasteStore>(listener: usize, broker: &Broker, store: &S) -> AppResult<()> {
    let channel = broker.open_channel().await?;
    let messages = broker.consume(&channel, listener).await?;

    info!("listener {listener} is up and listening for messages");

    consume(listener, messages, store).await
}

/// Process messages one at a time, in delivery order.
///
/// Bad messages and failed inserts are logged and skipped. Only a broken
/// channel ends the loop, and that is always an error.
pub async fn consume<St, E, S>(listener: usize, messages: St, store: &S) -> AppResult<()>
where
    St: Stream<Item = Result<Vec<u8>, E>>,
    E: Into<AppError>,
    S: PasteStore,
{
    pin_mut!(messages);

    while let Some(message) = messages.next().await {
        let body = message.map_err(Into::<AppError>::into)?;
        if let Err(err) = handle_message(listener, &body, store).await {
            error!("listener {listener}: {:#}", anyhow::Error::from(err));
        }
    }

    Err(AppError::ChannelClosed { listener })
}

/// Decode a single message body and store it.
pub async fn handle_message<S: PasteStore>(
    listener: usize,
    body: &[u8],
    store: &S,
) -> Result<(), MessageError> {
    let fields = decode_message(body)?;
    info!(
        "listener {listener}: received a message, length: {len} B",
        len = body.len()
    );

    let paste = Paste::from_fields(fields, Utc::now())?;

    store
        .insert_paste(&paste)
        .await
        .map_err(|source| MessageError::Insert { source })?;
    debug!("listener {listener}: stored paste '{id}'", id = paste.id);

    Ok(())
}
