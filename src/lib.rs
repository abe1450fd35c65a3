pub mod agent;
pub mod client;
pub mod config;
pub mod driver;
pub mod local;

pub use agent::Agent;
pub use client::{GameService, HttpGameService, NewGame, ServiceError};
pub use config::{ServiceConfig, DEFAULT_API_URL};
pub use driver::{Driver, DriverError, GameReport};
pub use local::LocalGame;
