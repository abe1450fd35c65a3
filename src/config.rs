use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://koodipahkina.monad.fi/api/game";

/// Where the game service lives and how to authenticate against it.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub base_url: String,
    pub token: String,
    pub timeout: Duration,
}

impl ServiceConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_owned(),
            token: token.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn create_url(&self) -> String {
        self.base_url.trim_end_matches('/').to_owned()
    }

    pub fn action_url(&self, game_id: &str) -> String {
        format!("{}/{}/action", self.create_url(), game_id)
    }
}
