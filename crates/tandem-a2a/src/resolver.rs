//! Agent card resolution.
//!
//! Agents publish their card at a well-known path under their base URL.
//! Older agents use `/.well-known/agent.json`; the resolver falls back to it
//! when the current path returns 404.

use reqwest::{Client, StatusCode};
use tracing::{debug, info};
use url::Url;

use crate::error::{A2aError, A2aResult};
use crate::types::AgentCard;

/// Well-known path of the agent card
pub const AGENT_CARD_WELL_KNOWN_PATH: &str = "/.well-known/agent-card.json";

/// Path used by agents written against earlier protocol revisions
pub const LEGACY_AGENT_CARD_PATH: &str = "/.well-known/agent.json";

/// Fetches [`AgentCard`]s from an agent's base URL
#[derive(Debug, Clone)]
pub struct CardResolver {
    http: Client,
    base_url: Url,
    card_path: String,
}

impl CardResolver {
    /// Create a resolver for the agent at `base_url`
    pub fn new(http: Client, base_url: impl AsRef<str>) -> A2aResult<Self> {
        Ok(Self {
            http,
            base_url: Url::parse(base_url.as_ref())?,
            card_path: AGENT_CARD_WELL_KNOWN_PATH.to_string(),
        })
    }

    /// Use a non-standard card path
    pub fn with_card_path(mut self, path: impl Into<String>) -> Self {
        self.card_path = path.into();
        self
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch the agent card, falling back to the legacy path on 404
    pub async fn get_agent_card(&self) -> A2aResult<AgentCard> {
        info!(base_url = %self.base_url, "Fetching agent card");

        match self.fetch(&self.card_path).await {
            Err(A2aError::AgentNotFound { .. }) if self.card_path == AGENT_CARD_WELL_KNOWN_PATH => {
                debug!("Agent card not found at well-known path, trying legacy path");
                self.fetch(LEGACY_AGENT_CARD_PATH).await
            }
            other => other,
        }
    }

    async fn fetch(&self, path: &str) -> A2aResult<AgentCard> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| A2aError::protocol_error(format!("Invalid card path: {}", e)))?;

        debug!(url = %url, "Requesting agent card");

        let response = self.http.get(url.clone()).send().await.map_err(|e| {
            A2aError::connection_error(format!("Failed to fetch agent card: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(match status {
                StatusCode::NOT_FOUND => A2aError::agent_not_found(url.to_string()),
                StatusCode::UNAUTHORIZED => A2aError::AuthenticationRequired,
                StatusCode::FORBIDDEN => A2aError::NotAuthorized {
                    reason: response.text().await.unwrap_or_default(),
                },
                _ => A2aError::protocol_error(format!(
                    "HTTP {} while fetching agent card",
                    status
                )),
            });
        }

        let card: AgentCard = response
            .json()
            .await
            .map_err(|e| A2aError::invalid_agent_card(format!("Failed to parse agent card: {}", e)))?;

        info!(
            name = %card.name,
            url = %card.url,
            transport = %card.preferred_transport,
            streaming = card.capabilities.streaming,
            skills = card.skills.len(),
            "Fetched agent card"
        );

        Ok(card)
    }
}
