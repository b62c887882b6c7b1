#[cfg(test)]
#[path = "spymaster_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_derive::Deserialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::BotError;
use crate::domain::models::ClueRequest;
use crate::domain::models::ClueResponse;
use crate::domain::models::GameClient;
use crate::domain::models::GameStateResponse;
use crate::domain::models::GuessRequest;
use crate::domain::models::GuessResponse;
use crate::domain::models::LoadModelsRequest;
use crate::domain::models::LoadModelsResponse;
use crate::domain::models::NextMoveRequest;
use crate::domain::models::NextMoveResponse;
use crate::domain::models::StartGameRequest;
use crate::domain::models::StartGameResponse;
use crate::domain::services::log_context;

pub const CONTEXT_HEADER: &str = "x-spymaster-context";
pub const CONTEXT_ID_HEADER: &str = "x-spymaster-context-id";

/// Body of non-2xx answers.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
    #[serde(default)]
    details: serde_json::Value,
}

fn truncate(text: &str) -> String {
    return text.chars().take(200).collect();
}

/// HTTP client for the Spymaster game API.
pub struct Spymaster {
    url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl Default for Spymaster {
    fn default() -> Spymaster {
        return Spymaster::new(
            &Config::get(ConfigKey::BackendURL),
            Duration::from_millis(Config::get_u64(ConfigKey::RequestTimeout)),
        );
    }
}

impl Spymaster {
    pub fn new(url: &str, timeout: Duration) -> Spymaster {
        return Spymaster {
            url: url.trim_end_matches('/').to_string(),
            timeout,
            client: reqwest::Client::new(),
        };
    }

    fn endpoint(&self, path: &str) -> String {
        return format!("{url}/api/v1/game/{path}", url = self.url);
    }

    async fn post<Req, Res>(&self, path: &str, body: &Req) -> Result<Res>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let url = self.endpoint(path);
        let req = self.client.post(&url).json(body);
        return self.execute(url, req).await;
    }

    async fn get<Res>(&self, path: &str, query: &[(&str, &str)]) -> Result<Res>
    where
        Res: DeserializeOwned,
    {
        let url = self.endpoint(path);
        let req = self.client.get(&url).query(query);
        return self.execute(url, req).await;
    }

    /// Sends the request with the current log context attached and maps the
    /// answer onto `BotError`.
    async fn execute<Res>(&self, url: String, mut req: reqwest::RequestBuilder) -> Result<Res>
    where
        Res: DeserializeOwned,
    {
        if let Some(context) = log_context::current() {
            req = req
                .header(CONTEXT_HEADER, serde_json::to_string(&context)?)
                .header(CONTEXT_ID_HEADER, context.context_id);
        }

        tracing::debug!(url = %url, "Game API request");
        let res = match req.timeout(self.timeout).send().await {
            Ok(res) => res,
            Err(source) => return Err(BotError::Transport { url, source }.into()),
        };

        let status = res.status().as_u16();
        let body = match res.text().await {
            Ok(body) => body,
            Err(source) => return Err(BotError::Transport { url, source }.into()),
        };
        tracing::debug!(url = %url, status, "Game API response");

        if !(200..300).contains(&status) {
            if let Ok(err) = serde_json::from_str::<ErrorResponse>(&body) {
                return Err(BotError::RemoteService {
                    status,
                    message: err.message,
                    details: err.details,
                }
                .into());
            }

            return Err(BotError::UnexpectedResponse {
                url,
                status,
                reason: truncate(&body),
            }
            .into());
        }

        match serde_json::from_str::<Res>(&body) {
            Ok(res) => return Ok(res),
            Err(err) => {
                return Err(BotError::UnexpectedResponse {
                    url,
                    status,
                    reason: err.to_string(),
                }
                .into())
            }
        }
    }
}

#[async_trait]
impl GameClient for Spymaster {
    #[allow(clippy::implicit_return)]
    async fn start_game(&self, request: StartGameRequest) -> Result<StartGameResponse> {
        return self.post("start/", &request).await;
    }

    #[allow(clippy::implicit_return)]
    async fn clue(&self, request: ClueRequest) -> Result<ClueResponse> {
        return self.post("clue/", &request).await;
    }

    #[allow(clippy::implicit_return)]
    async fn guess(&self, request: GuessRequest) -> Result<GuessResponse> {
        return self.post("guess/", &request).await;
    }

    #[allow(clippy::implicit_return)]
    async fn next_move(&self, request: NextMoveRequest) -> Result<NextMoveResponse> {
        return self.post("next-move/", &request).await;
    }

    #[allow(clippy::implicit_return)]
    async fn get_state(&self, game_id: &str) -> Result<GameStateResponse> {
        return self.get("state/", &[("game_id", game_id)]).await;
    }

    #[allow(clippy::implicit_return)]
    async fn load_models(&self, request: LoadModelsRequest) -> Result<LoadModelsResponse> {
        return self.post("async-load-models/", &request).await;
    }
}
