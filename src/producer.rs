//! The producing side: send a fixed batch, then wait a bounded time for the
//! broker to acknowledge it.

use std::time::Duration;

use log::{debug, info, warn};
use rdkafka::producer::{BaseRecord, Producer, ThreadedProducer};
use tokio::task;

use crate::config::ClientSettings;
use crate::delivery::{self, DeliverySummary, ReportingContext};
use crate::error::{Error, Result};

/// Number of messages sent by one run.
pub const MESSAGE_COUNT: usize = 10;

/// Upper bound on the final wait for outstanding acknowledgements.
pub const FLUSH_TIMEOUT: Duration = Duration::from_secs(15);

/// Payload of the `index`-th message.
pub fn payload(index: usize) -> String {
    format!("Hello Kafka {}", index)
}

/// Payloads of a full batch, in send order.
pub fn payloads() -> impl Iterator<Item = String> {
    (0..MESSAGE_COUNT).map(payload)
}

/// What happened to the batch by the time the producer was closed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProduceSummary {
    /// Messages accepted into the client's queue.
    pub submitted: usize,
    /// Messages the client refused to enqueue. They are not retried.
    pub rejected: usize,
    /// Messages still unacknowledged when the flush window closed.
    pub abandoned: usize,
    /// Delivery reports received, by outcome.
    pub deliveries: DeliverySummary,
}

/// Produces one batch to `settings.topic` and waits at most `flush_timeout`
/// for it to be acknowledged.
///
/// Fails only if the producer cannot be created, in which case nothing is
/// sent. Per-message failures are logged by the delivery worker and counted
/// in the returned summary.
pub async fn run(settings: &ClientSettings, flush_timeout: Duration) -> Result<ProduceSummary> {
    let (context, reports) = ReportingContext::new();
    let producer: ThreadedProducer<ReportingContext> = settings
        .producer_config()
        .create_with_context(context)
        .map_err(Error::ClientCreation)?;

    let worker = delivery::spawn_drain(reports);
    let mut summary = ProduceSummary::default();

    for (index, value) in payloads().enumerate() {
        let record = BaseRecord::<(), _>::to(&settings.topic).payload(&value);
        match producer.send(record) {
            Ok(()) => summary.submitted += 1,
            Err((err, _)) => {
                warn!("Failed to enqueue message {}: {}", index, err);
                summary.rejected += 1;
            }
        }
    }
    debug!(
        "Enqueued {} message(s) to {}, waiting up to {:?} for acknowledgements",
        summary.submitted, settings.topic, flush_timeout
    );

    // Flushing and closing block, keep them off the runtime threads. Dropping
    // the producer closes the report channel.
    let (flushed, in_flight) = task::spawn_blocking(move || {
        let flushed = producer.flush(flush_timeout);
        let in_flight = producer.in_flight_count();
        drop(producer);
        (flushed, in_flight)
    })
    .await
    .map_err(|err| Error::Worker(format!("producer shutdown: {}", err)))?;

    if let Err(err) = flushed {
        warn!("Flush did not complete within {:?}: {}", flush_timeout, err);
    }
    // The out queue may also hold protocol requests.
    summary.abandoned = usize::try_from(in_flight)
        .unwrap_or(0)
        .min(summary.submitted);
    if summary.abandoned > 0 {
        warn!(
            "Abandoning {} unacknowledged message(s) after {:?}",
            summary.abandoned, flush_timeout
        );
    }

    summary.deliveries = worker
        .await
        .map_err(|err| Error::Worker(format!("delivery reports: {}", err)))?;

    info!(
        "Messages produced: {} delivered, {} failed, {} abandoned, {} rejected",
        summary.deliveries.delivered, summary.deliveries.failed, summary.abandoned, summary.rejected
    );
    Ok(summary)
}
