//! Game service client.
//!
//! The service owns the authoritative game state; the client only creates
//! games and submits take/pass actions, receiving a fresh snapshot each time.

use game_def::{Action, GameState};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ServiceConfig;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Action rejected: {0}")]
    Rejected(String),
}

/// A freshly created game.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGame {
    pub game_id: String,
    pub status: GameState,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ActionRequest {
    take_card: bool,
}

#[derive(Debug, Deserialize)]
struct ActionResponse {
    status: GameState,
}

pub trait GameService {
    fn create_game(&mut self) -> Result<NewGame, ServiceError>;

    fn send_action(&mut self, game_id: &str, action: Action) -> Result<GameState, ServiceError>;
}

impl<S: GameService + ?Sized> GameService for &mut S {
    fn create_game(&mut self) -> Result<NewGame, ServiceError> {
        (**self).create_game()
    }

    fn send_action(&mut self, game_id: &str, action: Action) -> Result<GameState, ServiceError> {
        (**self).send_action(game_id, action)
    }
}

/// Game service reached over HTTP with a bearer token.
pub struct HttpGameService {
    client: Client,
    config: ServiceConfig,
}

impl HttpGameService {
    pub fn new(config: ServiceConfig) -> Result<Self, ServiceError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        info!("Game service client initialized: {}", config.base_url);
        Ok(Self { client, config })
    }

    fn read_json<T: DeserializeOwned>(response: reqwest::blocking::Response) -> Result<T, ServiceError> {
        let status = response.status();
        let body = response.text()?;
        if status != StatusCode::OK {
            return Err(ServiceError::Status { status, body });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

impl GameService for HttpGameService {
    fn create_game(&mut self) -> Result<NewGame, ServiceError> {
        let url = self.config.create_url();
        debug!("Creating game: {}", url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.token)
            .send()?;
        Self::read_json(response)
    }

    fn send_action(&mut self, game_id: &str, action: Action) -> Result<GameState, ServiceError> {
        let url = self.config.action_url(game_id);
        debug!("Sending {:?} to {}", action, url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.token)
            .json(&ActionRequest {
                take_card: action.take_card(),
            })
            .send()?;
        let ActionResponse { status } = Self::read_json(response)?;
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_request_uses_take_card_flag() {
        let body = serde_json::to_string(&ActionRequest { take_card: false }).unwrap();
        assert_eq!(body, r#"{"takeCard":false}"#);
    }

    #[test]
    fn decodes_new_game_response() {
        let game: NewGame = serde_json::from_str(
            r#"{
                "gameId": "g-1",
                "status": {
                    "finished": false,
                    "card": 21,
                    "money": 0,
                    "cardsLeft": 23,
                    "players": [{"name": "me", "money": 11, "cards": []}]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(game.game_id, "g-1");
        assert_eq!(game.status.card, 21);
        assert_eq!(game.status.cards_left, 23);
    }

    #[test]
    fn decodes_action_response() {
        let response: ActionResponse = serde_json::from_str(
            r#"{"status": {"finished": true, "card": null, "money": 0, "cardsLeft": 0,
                "players": [{"name": "me", "money": 2, "cards": [[7, 8]]}]}}"#,
        )
        .unwrap();
        assert!(response.status.finished);
        assert_eq!(response.status.final_scores()[0].score, 5);
    }
}
