//! Delivery reports and the worker that drains them.
//!
//! librdkafka resolves every produced message asynchronously, on its own
//! polling thread. The [`ReportingContext`] installed on the producer turns
//! each resolution into an owned [`DeliveryReport`] and pushes it into an
//! unbounded channel. The sending half lives inside the context, so the
//! channel closes when the producer handle is dropped, which is what ends the
//! drain worker.

use std::fmt;

use futures_channel::mpsc;
use futures_util::StreamExt;
use log::{info, trace, warn};
use rdkafka::client::ClientContext;
use rdkafka::error::KafkaError;
use rdkafka::message::Message;
use rdkafka::producer::{DeliveryResult, ProducerContext};
use tokio::task::JoinHandle;

/// The outcome of one produced message, detached from librdkafka memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryReport {
    /// The broker acknowledged the message.
    Delivered {
        topic: String,
        partition: i32,
        offset: i64,
    },
    /// The message could not be delivered. librdkafka already gave up on it.
    Failed {
        topic: String,
        partition: i32,
        error: KafkaError,
    },
}

impl DeliveryReport {
    /// Converts the borrowed result handed to the delivery callback.
    pub fn from_result(delivery_result: &DeliveryResult<'_>) -> DeliveryReport {
        match *delivery_result {
            Ok(ref message) => DeliveryReport::Delivered {
                topic: message.topic().to_owned(),
                partition: message.partition(),
                offset: message.offset(),
            },
            Err((ref error, ref message)) => DeliveryReport::Failed {
                topic: message.topic().to_owned(),
                partition: message.partition(),
                error: error.clone(),
            },
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryReport::Delivered { .. })
    }
}

impl fmt::Display for DeliveryReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            DeliveryReport::Delivered {
                ref topic,
                partition,
                offset,
            } => write!(f, "Message delivered to {}[{}]@{}", topic, partition, offset),
            DeliveryReport::Failed {
                ref topic,
                partition,
                ref error,
            } => write!(
                f,
                "Message delivery failed: {} ({}[{}])",
                error, topic, partition
            ),
        }
    }
}

/// Producer context forwarding every delivery result to a channel.
pub struct ReportingContext {
    reports: mpsc::UnboundedSender<DeliveryReport>,
}

impl ReportingContext {
    /// Creates the context together with the receiving end of its channel.
    pub fn new() -> (ReportingContext, mpsc::UnboundedReceiver<DeliveryReport>) {
        let (tx, rx) = mpsc::unbounded();
        (ReportingContext { reports: tx }, rx)
    }
}

impl ClientContext for ReportingContext {}

impl ProducerContext for ReportingContext {
    type DeliveryOpaque = ();

    fn delivery(&self, delivery_result: &DeliveryResult<'_>, _: Self::DeliveryOpaque) {
        let report = DeliveryReport::from_result(delivery_result);
        trace!("Delivery callback: {:?}", report);
        if let Err(err) = self.reports.unbounded_send(report) {
            // Only happens if the drain worker is gone before the producer.
            warn!("Delivery report lost: {}", err.into_inner());
        }
    }
}

/// Counts of resolved deliveries, by outcome.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeliverySummary {
    pub delivered: usize,
    pub failed: usize,
}

impl DeliverySummary {
    /// Logs the report on a single line and counts it.
    pub fn record(&mut self, report: &DeliveryReport) {
        if report.is_delivered() {
            info!("{}", report);
            self.delivered += 1;
        } else {
            warn!("{}", report);
            self.failed += 1;
        }
    }

    /// Number of reports seen.
    pub fn resolved(&self) -> usize {
        self.delivered + self.failed
    }
}

/// Consumes reports until every sender is gone.
pub async fn drain(mut reports: mpsc::UnboundedReceiver<DeliveryReport>) -> DeliverySummary {
    let mut summary = DeliverySummary::default();
    while let Some(report) = reports.next().await {
        summary.record(&report);
    }
    trace!("Delivery report channel closed");
    summary
}

/// Runs [`drain`] as a background task. Must be called within a tokio runtime.
pub fn spawn_drain(reports: mpsc::UnboundedReceiver<DeliveryReport>) -> JoinHandle<DeliverySummary> {
    tokio::spawn(drain(reports))
}
