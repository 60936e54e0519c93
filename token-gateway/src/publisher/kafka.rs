use crate::config::publish::PublishConfig;
use crate::publisher::{EventBroker, PublishError};
use async_trait::async_trait;
use log::debug;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use std::time::Duration;

/// Kafka producer for the event topic
pub struct KafkaBroker {
    producer: FutureProducer,
    message_timeout: Duration,
}

impl KafkaBroker {
    pub fn new(config: &PublishConfig) -> Result<Self, PublishError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("message.timeout.ms", config.message_timeout.to_string())
            .create()
            .map_err(|e| PublishError::Unavailable(e.to_string()))?;
        Ok(Self {
            producer,
            message_timeout: Duration::from_millis(config.message_timeout),
        })
    }
}

#[async_trait]
impl EventBroker for KafkaBroker {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), PublishError> {
        let record: FutureRecord<'_, (), Vec<u8>> = FutureRecord::to(topic).payload(&payload);
        let delivery = self
            .producer
            .send(record, Timeout::After(self.message_timeout))
            .await
            .map_err(|(e, _message)| PublishError::Delivery {
                topic: topic.to_string(),
                message: e.to_string(),
            })?;
        debug!("Delivered event to '{}': {:?}", topic, delivery);
        Ok(())
    }
}
