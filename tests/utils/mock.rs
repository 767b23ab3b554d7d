use anyhow::Context;
use rdkafka::mocking::MockCluster;
use rdkafka::producer::DefaultProducerContext;

use hello_kafka::ClientSettings;

use crate::utils::rand::{rand_test_group, rand_test_topic};

/// An in-process broker cluster with one topic already created.
pub struct MockKafka {
    pub cluster: MockCluster<'static, DefaultProducerContext>,
    pub settings: ClientSettings,
}

impl MockKafka {
    pub fn start(test_name: &str, partitions: i32) -> anyhow::Result<MockKafka> {
        let cluster = MockCluster::new(3).context("failed to start mock cluster")?;
        let topic = rand_test_topic(test_name);
        cluster
            .create_topic(&topic, partitions, 3)
            .context("failed to create topic on mock cluster")?;

        let mut settings = ClientSettings::with_brokers(cluster.bootstrap_servers());
        settings.topic = topic;
        settings.group_id = rand_test_group();

        Ok(MockKafka { cluster, settings })
    }
}
