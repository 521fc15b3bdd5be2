//! # Network
//!
//! HTTP client for the BoxLift server.
//!
//! A game starts with one POST to the building collection, which answers with a game
//! id and a token. Every later round POSTs the token and a command map to the game's
//! building url and gets the next [`BuildingState`] back. The server may rotate the
//! token on any round; the client always sends the latest one.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{self, Plan};
use crate::init::Credentials;
use crate::print;
use crate::world_view::{serial, BuildingState, Command};

/// Body of the game creation request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InitRequest<'a> {
    /// Bot name shown on the leader board
    pub username: &'a str,
    /// Contact email
    pub email: &'a str,
    /// Plan name
    pub plan: &'a str,
    /// Opt out of the leader board; tokens do not expire
    pub sandbox: bool,
    /// Event entered
    #[serde(skip_serializing_if = "str::is_empty")]
    pub event_name: &'a str,
    /// Registration id for the event
    #[serde(skip_serializing_if = "str::is_empty")]
    pub event_id: &'a str,
}

/// The server's answer to game creation
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GameInfo {
    /// Game id
    pub id: String,
    /// First token
    pub token: String,
    /// Game status
    #[serde(default)]
    pub status: String,
    /// Where to watch the run
    #[serde(default)]
    pub visualization: String,
    /// Greeting from the server
    #[serde(default)]
    pub message: String,
}

/// Url of the building collection
pub fn buildings_url() -> String {
    format!("{}{}", config::HOST, config::BUILDINGS_PATH)
}

/// Url of a single game's building
pub fn building_url(game_id: &str) -> String {
    format!("{}/{}", buildings_url(), game_id)
}

/// An open game on the BoxLift server.
#[derive(Debug, Clone)]
pub struct BoxLift {
    client: Client,
    game_id: String,
    token: String,
    status: String,
    building_url: String,
    visualization_url: String,
    verbose: bool,
}

impl BoxLift {
    /// Opens a new game of `plan`.
    ///
    /// With `verbose` every request and response body is printed.
    pub async fn connect(
        credentials: &Credentials,
        plan: &Plan,
        sandbox: bool,
        verbose: bool,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(config::HTTP_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;

        let init = InitRequest {
            username: &credentials.username,
            email: &credentials.email,
            plan: plan.name,
            sandbox,
            event_name: config::EVENT_NAME,
            event_id: &credentials.registration_id,
        };
        let url = buildings_url();
        let body = post(&client, &url, &init, verbose).await?;
        let info: GameInfo = serde_json::from_value(body)
            .with_context(|| format!("unexpected game creation response from {}", url))?;

        let lift = BoxLift {
            client,
            building_url: building_url(&info.id),
            game_id: info.id,
            token: info.token,
            status: info.status,
            visualization_url: info.visualization,
            verbose,
        };

        if !info.message.is_empty() {
            print::info(info.message);
        }
        print::info(format!("building url: {}", lift.building_url));
        Ok(lift)
    }

    /// Game id assigned by the server
    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    /// Status reported when the game was created
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Where to watch the run
    pub fn visualization_url(&self) -> &str {
        &self.visualization_url
    }

    /// Sends one round of commands and returns the new state.
    ///
    /// An empty list only fetches the state; the clock does not advance. An HTTP error
    /// status is not an `Err`: it comes back as a state with status `"error"` and the
    /// server's reason as message, so the caller can decide whether to retry.
    ///
    /// ## Errors
    /// Transport failures and bodies that are not a building state.
    pub async fn send_commands(&mut self, commands: &[Command]) -> Result<BuildingState> {
        let body = serial::serialize_commands(&self.token, commands);
        if self.verbose {
            print::info(format!("{}: {}", self.building_url, body));
        }

        let response = self
            .client
            .post(&self.building_url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("POST {} failed", self.building_url))?;

        if let Err(e) = response.error_for_status_ref() {
            return Ok(BuildingState::error(e.to_string()));
        }

        let text = response.text().await.context("failed to read building state")?;
        if self.verbose {
            print::info(text.clone());
        }
        let state = serial::deserialize_building_state(&text)
            .with_context(|| format!("malformed building state from {}", self.building_url))?;

        if self.verbose {
            print::info(format!("status: {}", state.status));
        }
        if let Some(token) = &state.token {
            self.token = token.clone();
        }
        Ok(state)
    }

    /// Current state, without advancing the clock.
    pub async fn get_building_state(&mut self) -> Result<BuildingState> {
        self.send_commands(&[]).await
    }
}

async fn post<T: Serialize + ?Sized>(
    client: &Client,
    url: &str,
    payload: &T,
    verbose: bool,
) -> Result<Value> {
    if verbose {
        let shown = serde_json::to_string(payload).unwrap_or_default();
        print::info(format!("{}: {}", url, shown));
    }

    let response = client
        .post(url)
        .json(payload)
        .send()
        .await
        .with_context(|| format!("POST {} failed", url))?
        .error_for_status()
        .with_context(|| format!("server rejected POST {}", url))?;

    let body: Value = response
        .json()
        .await
        .with_context(|| format!("response from {} is not JSON", url))?;
    if verbose {
        print::info(body.to_string());
    }
    Ok(body)
}
