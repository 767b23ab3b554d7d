use std::ops::ControlFlow;
use std::process;

use clap::{Arg, ArgAction, Command};
use log::{error, info, warn};

use hello_kafka::config::{self, ClientSettings, OffsetReset};
use hello_kafka::consumer;
use hello_kafka::error::Error;
use hello_kafka::logging::setup_logger;
use rdkafka::util::get_rdkafka_version;

fn fail<T>(err: Error) -> T {
    error!("{}", err);
    process::exit(2);
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl-C"),
        Err(err) => {
            // Without a signal handler the consumer can only be killed.
            warn!("Unable to listen for Ctrl-C: {}", err);
            std::future::pending::<()>().await;
        }
    }
}

#[tokio::main]
async fn main() {
    let matches = Command::new("consumer")
        .version(option_env!("CARGO_PKG_VERSION").unwrap_or(""))
        .about("Reads a topic as part of a consumer group and logs every message")
        .arg(
            Arg::new("brokers")
                .short('b')
                .long("brokers")
                .help("Broker list in kafka format")
                .default_value(config::DEFAULT_BROKERS),
        )
        .arg(
            Arg::new("group-id")
                .short('g')
                .long("group-id")
                .help("Consumer group id")
                .default_value(config::DEFAULT_GROUP_ID),
        )
        .arg(
            Arg::new("topic")
                .short('t')
                .long("topic")
                .help("Topic to subscribe to")
                .default_value(config::DEFAULT_TOPIC),
        )
        .arg(
            Arg::new("offset-reset")
                .long("offset-reset")
                .help("Where to start without a committed offset")
                .value_parser(["earliest", "latest"])
                .default_value("earliest"),
        )
        .arg(
            Arg::new("property")
                .short('X')
                .help("Extra librdkafka property (example: 'session.timeout.ms=6000')")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("log-conf")
                .long("log-conf")
                .help("Configure the logging format (example: 'rdkafka=trace')"),
        )
        .get_matches();

    setup_logger(true, matches.get_one::<String>("log-conf").map(String::as_str));

    let (version_n, version_s) = get_rdkafka_version();
    info!("rd_kafka_version: 0x{:08x}, {}", version_n, version_s);

    let mut settings = ClientSettings::default();
    if let Some(brokers) = matches.get_one::<String>("brokers") {
        settings.brokers = brokers.clone();
    }
    if let Some(group_id) = matches.get_one::<String>("group-id") {
        settings.group_id = group_id.clone();
    }
    if let Some(topic) = matches.get_one::<String>("topic") {
        settings.topic = topic.clone();
    }
    if let Some(raw) = matches.get_one::<String>("offset-reset") {
        settings.offset_reset = raw.parse::<OffsetReset>().unwrap_or_else(fail);
    }
    for raw in matches.get_many::<String>("property").into_iter().flatten() {
        let (key, value) = config::parse_override(raw).unwrap_or_else(fail);
        settings.set_override(key, value);
    }

    let read = consumer::run(&settings, shutdown_signal(), |_| ControlFlow::Continue(())).await;
    if let Err(err) = read {
        error!("{}", err);
        process::exit(1);
    }
}
