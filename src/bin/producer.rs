use std::process;

use clap::{Arg, ArgAction, Command};
use log::{error, info};

use hello_kafka::config::{self, ClientSettings};
use hello_kafka::error::Error;
use hello_kafka::logging::setup_logger;
use hello_kafka::producer::{self, FLUSH_TIMEOUT};
use rdkafka::util::get_rdkafka_version;

fn fail<T>(err: Error) -> T {
    error!("{}", err);
    process::exit(2);
}

#[tokio::main]
async fn main() {
    let matches = Command::new("producer")
        .version(option_env!("CARGO_PKG_VERSION").unwrap_or(""))
        .about("Sends ten messages to a topic and waits for them to be acknowledged")
        .arg(
            Arg::new("brokers")
                .short('b')
                .long("brokers")
                .help("Broker list in kafka format")
                .default_value(config::DEFAULT_BROKERS),
        )
        .arg(
            Arg::new("topic")
                .short('t')
                .long("topic")
                .help("Destination topic")
                .default_value(config::DEFAULT_TOPIC),
        )
        .arg(
            Arg::new("property")
                .short('X')
                .help("Extra librdkafka property (example: 'acks=all')")
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
    if let Some(topic) = matches.get_one::<String>("topic") {
        settings.topic = topic.clone();
    }
    for raw in matches.get_many::<String>("property").into_iter().flatten() {
        let (key, value) = config::parse_override(raw).unwrap_or_else(fail);
        settings.set_override(key, value);
    }

    if let Err(err) = producer::run(&settings, FLUSH_TIMEOUT).await {
        error!("{}", err);
        process::exit(1);
    }
}
