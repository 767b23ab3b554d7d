//! The consuming side: subscribe to one topic and log everything read from it.
//!
//! The loop waits without a timeout for the next message. A read error is
//! logged and the loop carries on with the next read; there is no backoff and
//! no retry limit. The only ways out are the shutdown future, a caller
//! supplied [`ControlFlow::Break`] and the end of the message stream, which
//! never happens for a live consumer.

use std::future::Future;
use std::ops::ControlFlow;

use futures_util::{Stream, StreamExt};
use log::{error, info};
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::error::KafkaResult;
use rdkafka::message::Message;

use crate::config::ClientSettings;
use crate::error::{Error, Result};

/// Counters kept by [`read_loop`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReadStats {
    pub received: usize,
    pub errors: usize,
}

/// Creates a consumer and subscribes it to `settings.topic`.
///
/// Partition assignment is left to the group coordinator; no rebalance
/// callback is installed.
pub fn create(settings: &ClientSettings) -> Result<StreamConsumer> {
    let consumer: StreamConsumer = settings
        .consumer_config()
        .create()
        .map_err(Error::ClientCreation)?;

    consumer
        .subscribe(&[settings.topic.as_str()])
        .map_err(Error::Subscription)?;
    info!(
        "Subscribed to {} in group {} (offset reset: {})",
        settings.topic, settings.group_id, settings.offset_reset
    );

    Ok(consumer)
}

/// Reads `messages` until `shutdown` resolves, the stream ends or
/// `on_message` breaks.
///
/// Every payload is logged as text and then handed to `on_message`. Errors
/// are logged and counted, and the next read starts right away.
pub async fn read_loop<S, M, F, H>(messages: S, shutdown: F, mut on_message: H) -> ReadStats
where
    S: Stream<Item = KafkaResult<M>>,
    M: Message,
    F: Future<Output = ()>,
    H: FnMut(&str) -> ControlFlow<()>,
{
    tokio::pin!(messages);
    tokio::pin!(shutdown);
    let mut stats = ReadStats::default();

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown requested, leaving the read loop");
                break;
            }
            next = messages.next() => match next {
                Some(Ok(message)) => {
                    stats.received += 1;
                    let text = message
                        .payload()
                        .map(String::from_utf8_lossy)
                        .unwrap_or_default();
                    info!("Received message: {}", text);
                    if on_message(&text).is_break() {
                        break;
                    }
                }
                Some(Err(err)) => {
                    stats.errors += 1;
                    error!("Error reading message: {}", err);
                }
                None => {
                    info!("Message stream ended");
                    break;
                }
            }
        }
    }

    stats
}

/// Subscribes and reads until `shutdown` resolves or `on_message` breaks.
///
/// The consumer is closed, leaving its group, before this returns.
pub async fn run<F, H>(settings: &ClientSettings, shutdown: F, on_message: H) -> Result<ReadStats>
where
    F: Future<Output = ()>,
    H: FnMut(&str) -> ControlFlow<()>,
{
    let consumer = create(settings)?;
    let stats = read_loop(consumer.stream(), shutdown, on_message).await;
    info!(
        "Consumer stopped after {} message(s) and {} read error(s)",
        stats.received, stats.errors
    );
    Ok(stats)
}
