//! The authorization code flow
//!
//! Each request walks the stages below in order. A stage either hands the
//! next stage its input or ends the request with a [`FlowError`].
//!
//! ```text
//! ExtractCode -> BuildAuthRequest -> ExchangeToken -> DecodeClaims
//!   -> FetchResource -> AssemblePayload -> [PublishEvent] -> Respond
//! ```

pub mod assertion;
pub mod auth_code;
pub mod claims;
pub mod client_auth;
pub mod payload;
pub mod resource;
pub mod token_exchange;

use crate::config::GatewayConfig;
use crate::errors::FlowError;
use crate::flow::client_auth::{ClientAuthenticator, TokenRequest};
use crate::models::{Claims, EventPayload, ResourceRecord};
use crate::publisher::EventPublisher;
use http::HeaderMap;
use log::{debug, info, log, warn};
use reqwest::Client;
use std::sync::Arc;

/// Position of a request in the flow, carrying the input of that stage
#[derive(Debug)]
enum Stage {
    BuildAuthRequest {
        code: String,
    },
    ExchangeToken {
        request: TokenRequest,
    },
    DecodeClaims {
        access_token: String,
    },
    FetchResource {
        access_token: String,
        claims: Claims,
    },
    AssemblePayload {
        claims: Claims,
        record: ResourceRecord,
    },
    PublishEvent {
        payload: EventPayload,
        record: ResourceRecord,
    },
    Respond(ResourceRecord),
}

impl Stage {
    fn name(&self) -> &'static str {
        match self {
            Stage::BuildAuthRequest { .. } => "BuildAuthRequest",
            Stage::ExchangeToken { .. } => "ExchangeToken",
            Stage::DecodeClaims { .. } => "DecodeClaims",
            Stage::FetchResource { .. } => "FetchResource",
            Stage::AssemblePayload { .. } => "AssemblePayload",
            Stage::PublishEvent { .. } => "PublishEvent",
            Stage::Respond(_) => "Respond",
        }
    }
}

/// Runs the token flow for one request at a time; shared between requests
#[derive(Clone)]
pub struct Orchestrator {
    config: Arc<GatewayConfig>,
    client: Arc<Client>,
    authenticator: ClientAuthenticator,
    publisher: EventPublisher,
}

impl Orchestrator {
    pub fn new(
        config: Arc<GatewayConfig>,
        client: Arc<Client>,
        publisher: EventPublisher,
    ) -> Self {
        let authenticator = ClientAuthenticator::new(&config.oauth);
        Self {
            config,
            client,
            authenticator,
            publisher,
        }
    }

    /// Runs the whole flow and returns the record to send back to the caller
    pub async fn run(
        &self,
        headers: &HeaderMap,
        raw_query: Option<&str>,
    ) -> Result<ResourceRecord, FlowError> {
        let code = auth_code::extract_code(headers, raw_query);
        if code.is_empty() {
            warn!("Token request without authorization code");
            return Err(FlowError::MissingCode);
        }

        let mut stage = Stage::BuildAuthRequest { code };
        loop {
            let name = stage.name();
            stage = match stage {
                Stage::Respond(record) => {
                    info!(
                        "Token flow complete, returning {} transactions",
                        record.transactions.len()
                    );
                    return Ok(record);
                }
                stage => self.advance(stage).await.inspect_err(|e| {
                    log!(e.log_level(), "Token flow failed at {}: {}", name, e);
                })?,
            };
            debug!("Token flow: {} -> {}", name, stage.name());
        }
    }

    async fn advance(&self, stage: Stage) -> Result<Stage, FlowError> {
        let next = match stage {
            Stage::BuildAuthRequest { code } => Stage::ExchangeToken {
                request: self
                    .authenticator
                    .build_request(&self.config.oauth, &code)
                    .await?,
            },
            Stage::ExchangeToken { request } => Stage::DecodeClaims {
                access_token: token_exchange::exchange_code(
                    &self.client,
                    &self.config.oauth.token_url,
                    &request,
                )
                .await?,
            },
            Stage::DecodeClaims { access_token } => {
                let claims = claims::decode_claims(&access_token)?;
                Stage::FetchResource {
                    access_token,
                    claims,
                }
            }
            Stage::FetchResource {
                access_token,
                claims,
            } => {
                let record = resource::fetch_resource(
                    &self.client,
                    &self.config.resource.get_url(),
                    &access_token,
                )
                .await?;
                Stage::AssemblePayload { claims, record }
            }
            Stage::AssemblePayload { claims, record } => {
                let payload = payload::assemble_payload(&claims, &record)?;
                if self.publisher.is_enabled() {
                    Stage::PublishEvent { payload, record }
                } else {
                    Stage::Respond(record)
                }
            }
            Stage::PublishEvent { payload, record } => {
                self.publisher.publish(&payload).await?;
                Stage::Respond(record)
            }
            Stage::Respond(_) => {
                return Err(FlowError::Unhandled(
                    "token flow has already completed".to_string(),
                ))
            }
        };
        Ok(next)
    }
}
