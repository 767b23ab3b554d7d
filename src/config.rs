//! Connection settings shared by the producer and the consumer.
//!
//! [`ClientSettings`] holds the handful of values both programs need. It is
//! turned into an [`rdkafka::ClientConfig`] right before the client is
//! created; the client keeps its own copy of the resulting configuration.

use std::fmt;
use std::str::FromStr;

use rdkafka::ClientConfig;

use crate::error::{Error, Result};

/// Broker list used when none is given.
pub const DEFAULT_BROKERS: &str = "localhost:9092";
/// Topic both programs talk to.
pub const DEFAULT_TOPIC: &str = "my-topic";
/// Consumer group joined by the consumer.
pub const DEFAULT_GROUP_ID: &str = "my-group";

/// Where a consumer group without a committed offset starts reading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OffsetReset {
    /// Start from the oldest message still retained by the broker.
    #[default]
    Earliest,
    /// Only read messages produced after the subscription.
    Latest,
}

impl OffsetReset {
    /// Returns the librdkafka value of `auto.offset.reset`.
    pub fn as_str(self) -> &'static str {
        match self {
            OffsetReset::Earliest => "earliest",
            OffsetReset::Latest => "latest",
        }
    }
}

impl fmt::Display for OffsetReset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OffsetReset {
    type Err = Error;

    fn from_str(s: &str) -> Result<OffsetReset> {
        match s {
            "earliest" => Ok(OffsetReset::Earliest),
            "latest" => Ok(OffsetReset::Latest),
            other => Err(Error::Config(format!(
                "unknown offset reset policy {:?}, expected \"earliest\" or \"latest\"",
                other
            ))),
        }
    }
}

/// Settings for one connection handle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientSettings {
    /// Comma separated `host:port` list, passed as `bootstrap.servers`.
    pub brokers: String,
    /// The single topic produced to or subscribed to.
    pub topic: String,
    /// Consumer group id. Ignored by the producer.
    pub group_id: String,
    /// Offset policy for a group with no committed offset. Ignored by the
    /// producer.
    pub offset_reset: OffsetReset,
    /// Raw librdkafka properties applied last, in order.
    pub overrides: Vec<(String, String)>,
}

impl Default for ClientSettings {
    fn default() -> ClientSettings {
        ClientSettings {
            brokers: DEFAULT_BROKERS.to_owned(),
            topic: DEFAULT_TOPIC.to_owned(),
            group_id: DEFAULT_GROUP_ID.to_owned(),
            offset_reset: OffsetReset::default(),
            overrides: Vec::new(),
        }
    }
}

impl ClientSettings {
    /// Settings pointing at `brokers`, everything else left at its default.
    pub fn with_brokers<B: Into<String>>(brokers: B) -> ClientSettings {
        ClientSettings {
            brokers: brokers.into(),
            ..ClientSettings::default()
        }
    }

    /// Adds a raw librdkafka property. Later overrides win.
    pub fn set_override<K, V>(&mut self, key: K, value: V) -> &mut ClientSettings
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.overrides.push((key.into(), value.into()));
        self
    }

    /// Configuration for the producer handle.
    pub fn producer_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        config.set("bootstrap.servers", &self.brokers);
        self.apply_overrides(&mut config);
        config
    }

    /// Configuration for the consumer handle.
    pub fn consumer_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", &self.brokers)
            .set("group.id", &self.group_id)
            .set("auto.offset.reset", self.offset_reset.as_str());
        self.apply_overrides(&mut config);
        config
    }

    fn apply_overrides(&self, config: &mut ClientConfig) {
        for (key, value) in &self.overrides {
            config.set(key, value);
        }
    }
}

/// Parses a `key=value` librdkafka property as given to `-X`.
///
/// The value may itself contain `=`; only the first one splits.
pub fn parse_override(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| Error::Config(format!("missing '=' in {:?}", raw)))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(Error::Config(format!("empty property name in {:?}", raw)));
    }
    Ok((key.to_owned(), value.trim().to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ClientSettings::default();
        assert_eq!(settings.brokers, "localhost:9092");
        assert_eq!(settings.topic, "my-topic");
        assert_eq!(settings.group_id, "my-group");
        assert_eq!(settings.offset_reset, OffsetReset::Earliest);
        assert!(settings.overrides.is_empty());
    }

    #[test]
    fn test_producer_config() {
        let mut settings = ClientSettings::with_brokers("kafka-1:9092,kafka-2:9092");
        settings.set_override("message.timeout.ms", "5000");
        let config = settings.producer_config();

        assert_eq!(
            config.get("bootstrap.servers"),
            Some("kafka-1:9092,kafka-2:9092")
        );
        assert_eq!(config.get("message.timeout.ms"), Some("5000"));
        assert_eq!(config.get("group.id"), None);
        assert_eq!(config.get("auto.offset.reset"), None);
    }

    #[test]
    fn test_consumer_config() {
        let config = ClientSettings::default().consumer_config();
        assert_eq!(config.get("bootstrap.servers"), Some("localhost:9092"));
        assert_eq!(config.get("group.id"), Some("my-group"));
        assert_eq!(config.get("auto.offset.reset"), Some("earliest"));
    }

    #[test]
    fn test_overrides_are_applied_last() {
        let mut settings = ClientSettings::default();
        settings
            .set_override("auto.offset.reset", "latest")
            .set_override("group.id", "first")
            .set_override("group.id", "second");
        let config = settings.consumer_config();
        assert_eq!(config.get("auto.offset.reset"), Some("latest"));
        assert_eq!(config.get("group.id"), Some("second"));
    }

    #[test]
    fn test_offset_reset_parsing() {
        assert_eq!("earliest".parse::<OffsetReset>(), Ok(OffsetReset::Earliest));
        assert_eq!("latest".parse::<OffsetReset>(), Ok(OffsetReset::Latest));
        assert!(matches!(
            "smallest".parse::<OffsetReset>(),
            Err(Error::Config(_))
        ));
        assert_eq!(OffsetReset::Latest.to_string(), "latest");
    }

    #[test]
    fn test_parse_override() {
        assert_eq!(
            parse_override("acks=all").unwrap(),
            ("acks".to_owned(), "all".to_owned())
        );
        assert_eq!(
            parse_override(" sasl.jaas.config = a=b ").unwrap(),
            ("sasl.jaas.config".to_owned(), "a=b".to_owned())
        );
        assert_eq!(
            parse_override("debug=").unwrap(),
            ("debug".to_owned(), String::new())
        );
        assert!(parse_override("acks").is_err());
        assert!(parse_override("=all").is_err());
    }
}
