use std::collections::HashSet;
use std::ops::ControlFlow;
use std::time::Duration;

use hello_kafka::consumer;
use hello_kafka::producer::{self, FLUSH_TIMEOUT, MESSAGE_COUNT};

use crate::utils::logging::init_test_logger;
use crate::utils::mock::MockKafka;

mod utils;

#[tokio::test]
pub async fn test_consumer_receives_every_payload() {
    init_test_logger();

    let mock = match MockKafka::start("end_to_end", 3) {
        Ok(mock) => mock,
        Err(err) => panic!("could not start mock cluster: {:#}", err),
    };

    let produce_result = producer::run(&mock.settings, FLUSH_TIMEOUT).await;
    let Ok(summary) = produce_result else {
        panic!("producer run failed: {}", produce_result.unwrap_err());
    };
    assert_eq!(summary.deliveries.delivered, MESSAGE_COUNT);

    // Partitions are read in any order, only the set of payloads matters.
    let mut missing = producer::payloads().collect::<HashSet<_>>();
    let consume_result = consumer::run(
        &mock.settings,
        tokio::time::sleep(Duration::from_secs(60)),
        |text| {
            missing.remove(text);
            if missing.is_empty() {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        },
    )
    .await;
    let Ok(stats) = consume_result else {
        panic!("consumer run failed: {}", consume_result.unwrap_err());
    };

    assert!(missing.is_empty(), "payloads never consumed: {:?}", missing);
    assert_eq!(stats.received, MESSAGE_COUNT);
    assert_eq!(stats.errors, 0);
}
