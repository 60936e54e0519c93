use crate::config::http::HttpClientConfig;
use crate::config::GatewayConfig;
use crate::flow::Orchestrator;
use crate::publisher::{EventPublisher, PublishError};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error(transparent)]
    Publisher(#[from] PublishError),
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    fn create_http_client(config: &HttpClientConfig) -> Result<Client, reqwest::Error> {
        Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()
    }

    pub fn new(config: &GatewayConfig) -> Result<Self, StateError> {
        let publisher = EventPublisher::from_config(&config.publish)?;
        Self::with_publisher(config, publisher)
    }

    /// Builds the state around an already constructed publisher
    pub fn with_publisher(
        config: &GatewayConfig,
        publisher: EventPublisher,
    ) -> Result<Self, StateError> {
        let config = Arc::new(config.clone());
        let client = Arc::new(Self::create_http_client(&config.http)?);
        let orchestrator = Orchestrator::new(config.clone(), client, publisher);
        Ok(Self {
            config,
            orchestrator: Arc::new(orchestrator),
        })
    }
}
