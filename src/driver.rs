//! Plays games from creation to the final standings, one action at a time.

use game_def::{Action, FinalScore, GameState};
use tracing::{error, info, warn};

use crate::agent::Agent;
use crate::client::{GameService, NewGame, ServiceError};

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("Failed to create game: {0}")]
    Creation(#[source] ServiceError),
    #[error("Action failed {attempts} times in a row, last error: {last}")]
    Stalled { attempts: u32, last: ServiceError },
    #[error("Game state has no acting player")]
    NoActingPlayer,
    #[error("Agent {name} failed: {error:#}")]
    Agent { name: String, error: anyhow::Error },
}

#[derive(Debug, Clone)]
pub struct GameReport {
    pub game_id: String,
    pub final_state: GameState,
    pub scores: Vec<FinalScore>,
}

pub struct Driver<S> {
    service: S,
    seats: Vec<Agent>,
    fallback: Agent,
    /// Consecutive failed submissions before a game is abandoned; 0 never gives up.
    max_action_failures: u32,
}

impl<S: GameService> Driver<S> {
    pub fn new(service: S, seats: Vec<Agent>, max_action_failures: u32) -> Self {
        Driver {
            service,
            seats,
            fallback: Agent::heuristic("Heuristic".to_owned()),
            max_action_failures,
        }
    }

    /// Plays `games` games in a row. Games that fail are logged and skipped.
    pub fn run(&mut self, games: usize) -> Vec<GameReport> {
        let mut reports = vec![];
        for i in 0..games {
            info!("Starting game {}", i + 1);
            match self.play_game() {
                Ok(report) => reports.push(report),
                Err(e) => error!("Game {} abandoned: {}", i + 1, e),
            }
        }
        info!("{} of {} games were played", reports.len(), games);
        reports
    }

    pub fn play_game(&mut self) -> Result<GameReport, DriverError> {
        let NewGame { game_id, status } =
            self.service.create_game().map_err(DriverError::Creation)?;
        info!("Game {} created", game_id);

        let mut state = status;
        let mut failures = 0;
        while !state.finished {
            let action = self.choose(&state)?;
            match self.service.send_action(&game_id, action) {
                Ok(next) => {
                    state = next;
                    failures = 0;
                }
                Err(e) => {
                    failures += 1;
                    warn!("Failed to send action ({} in a row): {}", failures, e);
                    if self.max_action_failures != 0 && failures >= self.max_action_failures {
                        return Err(DriverError::Stalled {
                            attempts: failures,
                            last: e,
                        });
                    }
                }
            }
        }

        let scores = state.final_scores();
        info!("Game {} finished", game_id);
        Ok(GameReport {
            game_id,
            final_state: state,
            scores,
        })
    }

    fn choose(&mut self, state: &GameState) -> Result<Action, DriverError> {
        let player = state.acting_player().ok_or(DriverError::NoActingPlayer)?;
        info!("Current card: {} with {} coins", state.card, state.money);
        info!("{}'s turn (Money: {})", player.name, player.money);

        if player.money == 0 {
            info!("{} is forced to take the card!", player.name);
            return Ok(Action::Take);
        }

        let agent = match self.seats.iter_mut().find(|a| a.name() == player.name) {
            Some(agent) => agent,
            None => &mut self.fallback,
        };
        let action = agent.act(state).map_err(|error| DriverError::Agent {
            name: agent.name().to_owned(),
            error,
        })?;
        match action {
            Action::Pass => info!("{} bets a coin on the card.", player.name),
            Action::Take => info!(
                "{} takes the card and {} coins.",
                player.name, state.money
            ),
        }
        Ok(action)
    }
}
