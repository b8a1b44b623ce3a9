//! HTTP implementation of the game server API

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{
    AnswerReply, GameApi, PhotoReply, RoundReply, ScoreboardReply, SessionReply, Stats,
    wire::{GameResponse, StatsResponse},
};
use crate::{
    config::ClientConfig,
    error::{Error, Result},
    session::CreateSession,
};

/// Talks to the game server over HTTP with JSON bodies
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    config: ClientConfig,
}

impl HttpApi {
    /// Creates a client for the server described by `config`
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration is invalid, or
    /// `Error::Transport` if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let config = config.checked()?;
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { client, config })
    }

    /// Makes a server-relative photo location absolute
    fn absolute(&self, url: String) -> String {
        if url.starts_with('/') {
            format!("{}{url}", self.config.base_url.trim_end_matches('/'))
        } else {
            url
        }
    }

    /// Performs one request and decodes the body
    ///
    /// Error statuses still carry a JSON body describing the refusal, so the
    /// body is decoded regardless of status. Only an error status with an
    /// unreadable body is reported as `Error::Status`.
    async fn call<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        B: serde::Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.config.endpoint(path);
        debug!(%method, %url, "sending request");

        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.inspect_err(|e| {
            warn!(%url, error = %e, "request failed");
        })?;
        let status = response.status();
        let text = response.text().await?;

        match serde_json::from_str(&text) {
            Ok(decoded) => {
                debug!(%url, status = status.as_u16(), "response decoded");
                Ok(decoded)
            }
            Err(_) if !status.is_success() => {
                warn!(%url, status = status.as_u16(), "error status without a readable body");
                Err(Error::Status(status.as_u16()))
            }
            Err(e) => {
                warn!(%url, error = %e, "malformed response");
                Err(e.into())
            }
        }
    }

    async fn game_call(&self, method: Method, path: &str) -> Result<GameResponse> {
        self.call::<(), GameResponse>(method, path, None).await
    }

    fn round_reply(&self, response: GameResponse) -> RoundReply {
        match RoundReply::from(response) {
            RoundReply::Round(mut start) => {
                start.photo_url = self.absolute(start.photo_url);
                RoundReply::Round(start)
            }
            reply => reply,
        }
    }
}

#[async_trait]
impl GameApi for HttpApi {
    async fn create_session(&self, request: &CreateSession) -> Result<SessionReply> {
        let response: GameResponse = self
            .call(Method::POST, "session/create", Some(request))
            .await?;
        Ok(response.into())
    }

    async fn start_game(&self) -> Result<RoundReply> {
        let response = self.game_call(Method::POST, "start").await?;
        Ok(self.round_reply(response))
    }

    async fn unlock_photo(&self) -> Result<PhotoReply> {
        let response = self.game_call(Method::POST, "next-photo").await?;
        Ok(match PhotoReply::from(response) {
            PhotoReply::Unlocked { url, total_photos } => PhotoReply::Unlocked {
                url: self.absolute(url),
                total_photos,
            },
            reply => reply,
        })
    }

    async fn reveal_answer(&self) -> Result<AnswerReply> {
        let response = self.game_call(Method::POST, "answer").await?;
        Ok(response.into())
    }

    async fn advance_round(&self) -> Result<RoundReply> {
        let response = self.game_call(Method::POST, "next-round").await?;
        Ok(self.round_reply(response))
    }

    async fn scoreboard(&self) -> Result<ScoreboardReply> {
        let response = self.game_call(Method::GET, "scoreboard").await?;
        Ok(response.into())
    }

    async fn stats(&self) -> Result<Stats> {
        let response: StatsResponse = self.call::<(), _>(Method::GET, "stats", None).await?;
        Ok(response.into())
    }
}
