//! reqwest-backed [`ArenaApi`] implementation.
//!
//! # Design
//!
//! The transport is thin: build the request, send it,
//! normalize the failure. Every request carries
//! `Content-Type: application/json`. No timeout is set; a hung request
//! stays pending until the service answers or the connection drops.
//!
//! ```text
//! ArenaApi::start_battle(matchup, topic)
//!   → POST {base}/arena/battle {"matchup": .., "topic": ..}
//!   → 2xx: decode Battle
//!   → 204 / empty body: explicit empty result
//!   → non-2xx: RequestError (detail message or "Request failed with <status>")
//! ```

use crate::api::{ArenaApi, HistoryPage};
use crate::error::{truncate_for_log, RequestError};
use arena_types::{Battle, HistoryEntry, Persona, Scoreboard};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

/// Default service location.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Serialize)]
struct BattleRequest<'a> {
    matchup: &'a str,
    topic: &'a str,
}

#[derive(Serialize)]
struct DethroneRequest<'a> {
    topic: &'a str,
}

#[derive(Serialize)]
struct VoteRequest<'a> {
    battle_id: &'a str,
    winner: Persona,
}

/// HTTP client for the arena service.
#[derive(Debug, Clone)]
pub struct HttpArenaClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpArenaClient {
    /// Creates a client for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidUrl` error unless the URL is `http://` or
    /// `https://` and parses.
    pub fn new(base_url: impl Into<String>) -> Result<Self, RequestError> {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    /// Creates a client reusing an existing reqwest client.
    ///
    /// # Errors
    ///
    /// See [`HttpArenaClient::new`].
    pub fn with_http_client(
        base_url: impl Into<String>,
        http: reqwest::Client,
    ) -> Result<Self, RequestError> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(RequestError::invalid_url(format!(
                "invalid base URL '{base_url}': must start with http:// or https://"
            )));
        }
        Url::parse(&base_url).map_err(|e| {
            RequestError::invalid_url(format!("invalid base URL '{base_url}': {e}"))
        })?;
        Ok(Self { http, base_url })
    }

    fn url(&self, path: &str) -> Result<Url, RequestError> {
        Url::parse(&format!("{}{path}", self.base_url))
            .map_err(|e| RequestError::invalid_url(format!("invalid request URL: {e}")))
    }

    fn builder(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header(CONTENT_TYPE, "application/json")
    }

    /// Sends a request and returns the raw body.
    ///
    /// `Ok(None)` is the explicit empty result (204 or empty 2xx body).
    async fn execute(&self, builder: RequestBuilder) -> Result<Option<String>, RequestError> {
        let request = builder.build().map_err(|e| RequestError::from_reqwest(&e))?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        debug!(%method, %path, "Sending arena request");

        let response = self.http.execute(request).await.map_err(|e| {
            let err = RequestError::from_reqwest(&e);
            warn!(%method, %path, error = %err, "Arena request failed in transport");
            err
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RequestError::from_reqwest(&e))?;
        debug!(%method, %path, status = status.as_u16(), "Arena response received");

        if !status.is_success() {
            debug!(body = truncate_for_log(&body), "Arena error body");
            return Err(RequestError::from_status(status.as_u16(), &body));
        }

        if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(body))
    }

    /// Sends a request and decodes the body, if any.
    async fn request_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<Option<T>, RequestError> {
        match self.execute(builder).await? {
            None => Ok(None),
            Some(body) => serde_json::from_str(&body).map(Some).map_err(|e| {
                debug!(body = truncate_for_log(&body), "Undecodable arena body");
                RequestError::decode(format!("invalid response body: {e}"))
            }),
        }
    }

    /// Like [`Self::request_json`] but an empty result is an error.
    async fn expect_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, RequestError> {
        self.request_json(builder)
            .await?
            .ok_or_else(|| RequestError::decode("expected a response body but got none"))
    }
}

#[async_trait]
impl ArenaApi for HttpArenaClient {
    async fn fetch_scoreboard(&self) -> Result<Scoreboard, RequestError> {
        let url = self.url("/arena/scoreboard")?;
        self.expect_json(self.builder(Method::GET, url)).await
    }

    async fn start_battle(&self, matchup: &str, topic: &str) -> Result<Battle, RequestError> {
        let url = self.url("/arena/battle")?;
        let body = BattleRequest { matchup, topic };
        self.expect_json(self.builder(Method::POST, url).json(&body))
            .await
    }

    async fn start_dethrone(&self, topic: &str) -> Result<Battle, RequestError> {
        let url = self.url("/arena/dethrone")?;
        let body = DethroneRequest { topic };
        self.expect_json(self.builder(Method::POST, url).json(&body))
            .await
    }

    async fn submit_vote(&self, battle_id: &str, winner: Persona) -> Result<(), RequestError> {
        let url = self.url("/arena/vote")?;
        let body = VoteRequest { battle_id, winner };
        // The service may answer 204 or echo the scoreboard; either is success.
        self.execute(self.builder(Method::POST, url).json(&body))
            .await
            .map(|_| ())
    }

    async fn fetch_history(&self, page: HistoryPage) -> Result<Vec<HistoryEntry>, RequestError> {
        let url = self.url("/arena/battles")?;
        let builder = self
            .builder(Method::GET, url)
            .query(&[("limit", page.limit), ("offset", page.offset)]);
        self.expect_json(builder).await
    }

    async fn fetch_battle(&self, id: &str) -> Result<Battle, RequestError> {
        let mut url = self.url("/arena/battles")?;
        url.path_segments_mut()
            .map_err(|()| RequestError::invalid_url("base URL cannot carry a path"))?
            .push(id);
        self.expect_json(self.builder(Method::GET, url)).await
    }
}
