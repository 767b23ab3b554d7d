//! A minimal producer and consumer pair for a Kafka-compatible broker.
//!
//! Both programs are thin wrappers around [`rdkafka`]. The broker protocol,
//! partition assignment, group coordination and retries all belong to
//! librdkafka; this crate only owns the lifecycle of the connection handle
//! and what gets logged.
//!
//! ## Producer
//!
//! [`producer::run`] sends ten messages, `"Hello Kafka 0"` to
//! `"Hello Kafka 9"`, to a single topic without choosing a partition. Each
//! send returns as soon as the message is queued. Acknowledgements come back
//! later through the [`delivery`] channel, drained by a background task that
//! logs one line per message. The producer then flushes for at most
//! [`producer::FLUSH_TIMEOUT`] and reports how many messages were abandoned
//! when the window closed.
//!
//! ## Consumer
//!
//! [`consumer::run`] joins a consumer group, subscribes to the topic and logs
//! every payload it reads. Read errors are logged and ignored. The loop stops
//! when the supplied shutdown future resolves, for example on Ctrl-C.
//!
//! ## Configuration
//!
//! Both programs take their connection settings from
//! [`config::ClientSettings`], whose defaults are `localhost:9092`,
//! `my-topic` and group `my-group` reading from the earliest offset.

pub mod config;
pub mod consumer;
pub mod delivery;
pub mod error;
pub mod logging;
pub mod producer;

pub use crate::config::ClientSettings;
pub use crate::error::{Error, Result};
