//! In-process game engine speaking the same contract as the remote service.

use anyhow::{bail, Context};
use game_def::{Action, Card, GameState, Player, HIGHEST_CARD, LOWEST_CARD, REMOVED_CARDS};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use tracing::debug;

use crate::client::{GameService, NewGame, ServiceError};

#[derive(Debug, Clone)]
struct Table {
    id: String,
    deck: Vec<Card>,
    card: Card,
    pot: u32,
    players: Vec<Player>,
    turn: usize,
    finished: bool,
}

impl Table {
    fn snapshot(&self) -> GameState {
        let (before, after) = self.players.split_at(self.turn);
        GameState {
            finished: self.finished,
            card: self.card,
            money: self.pot,
            cards_left: self.deck.len() as u32,
            players: after.iter().chain(before).cloned().collect(),
        }
    }

    fn run(&mut self, action: Action) -> anyhow::Result<()> {
        if self.finished {
            bail!("Game {} is already finished", self.id);
        }
        let player = &mut self.players[self.turn];
        match action {
            Action::Take => {
                player.take(self.card, self.pot);
                self.pot = 0;
                match self.deck.pop() {
                    Some(card) => self.card = card,
                    None => self.finished = true,
                }
            }
            Action::Pass => {
                player.pass()?;
                self.pot += 1;
                self.change_player();
            }
        }
        Ok(())
    }

    fn change_player(&mut self) {
        self.turn += 1;
        if self.turn == self.players.len() {
            self.turn = 0;
        }
    }
}

/// Plays games locally with a shuffled 3..=35 deck, nine cards removed.
pub struct LocalGame {
    seats: Vec<String>,
    rng: StdRng,
    games_created: usize,
    table: Option<Table>,
}

impl LocalGame {
    pub fn new(seats: Vec<String>, seed: Option<u64>) -> anyhow::Result<Self> {
        if seats.is_empty() {
            bail!("A local game needs at least one player");
        }
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(LocalGame {
            seats,
            rng,
            games_created: 0,
            table: None,
        })
    }

    fn table_mut(&mut self, game_id: &str) -> anyhow::Result<&mut Table> {
        self.table
            .as_mut()
            .filter(|t| t.id == game_id)
            .with_context(|| format!("Unknown game {game_id}"))
    }
}

impl GameService for LocalGame {
    fn create_game(&mut self) -> Result<NewGame, ServiceError> {
        let mut deck: Vec<Card> = (LOWEST_CARD..=HIGHEST_CARD).collect();
        deck.shuffle(&mut self.rng);
        deck.truncate(deck.len() - REMOVED_CARDS);
        let Some(card) = deck.pop() else {
            return Err(ServiceError::Rejected("Empty deck".to_owned()));
        };

        self.games_created += 1;
        let table = Table {
            id: format!("local-{}", self.games_created),
            deck,
            card,
            pot: 0,
            players: self.seats.iter().map(|name| Player::new(name)).collect(),
            turn: 0,
            finished: false,
        };
        debug!("Created {} with first card {}", table.id, card);
        let game = NewGame {
            game_id: table.id.clone(),
            status: table.snapshot(),
        };
        self.table = Some(table);
        Ok(game)
    }

    fn send_action(&mut self, game_id: &str, action: Action) -> Result<GameState, ServiceError> {
        let step = self.table_mut(game_id).and_then(|table| {
            table.run(action)?;
            Ok(table.snapshot())
        });
        step.map_err(|e| ServiceError::Rejected(format!("{e:#}")))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn seats(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn total_coins(state: &GameState) -> u32 {
        state.money + state.players.iter().map(|p| p.money).sum::<u32>()
    }

    #[test]
    fn new_game_deals_twenty_four_cards() {
        let mut local = LocalGame::new(seats(&["A", "B", "C"]), Some(7)).unwrap();
        let game = local.create_game().unwrap();
        let state = game.status;
        assert!(!state.finished);
        assert_eq!(state.cards_left, 23);
        assert!((LOWEST_CARD..=HIGHEST_CARD).contains(&state.card));
        assert_eq!(state.players[0].name, "A");
        assert!(state.players.iter().all(|p| p.money == 11));
    }

    #[test]
    fn pass_moves_turn_and_grows_pot() {
        let mut local = LocalGame::new(seats(&["A", "B", "C"]), Some(1)).unwrap();
        let game = local.create_game().unwrap();
        let state = local.send_action(&game.game_id, Action::Pass).unwrap();
        assert_eq!(state.money, 1);
        assert_eq!(state.card, game.status.card);
        let names: Vec<&str> = state.players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["B", "C", "A"]);
        assert_eq!(state.players[2].money, 10);
    }

    #[test]
    fn take_keeps_turn_and_collects_pot() {
        let mut local = LocalGame::new(seats(&["A", "B"]), Some(2)).unwrap();
        let game = local.create_game().unwrap();
        let first = game.status.card;
        local.send_action(&game.game_id, Action::Pass).unwrap();
        let state = local.send_action(&game.game_id, Action::Take).unwrap();
        assert_eq!(state.players[0].name, "B");
        assert_eq!(state.players[0].money, 12);
        assert_eq!(state.players[0].cards[0].cards(), [first]);
        assert_eq!(state.money, 0);
        assert_eq!(state.cards_left, 22);
    }

    #[test]
    fn broke_player_cannot_pass() {
        let mut local = LocalGame::new(seats(&["A"]), Some(3)).unwrap();
        let game = local.create_game().unwrap();
        for _ in 0..11 {
            local.send_action(&game.game_id, Action::Pass).unwrap();
        }
        let err = local.send_action(&game.game_id, Action::Pass).unwrap_err();
        assert!(matches!(err, ServiceError::Rejected(_)));
    }

    #[test]
    fn game_ends_when_every_card_is_taken() {
        let mut local = LocalGame::new(seats(&["A", "B", "C"]), Some(4)).unwrap();
        let game = local.create_game().unwrap();
        let mut state = game.status;
        let mut seen = HashSet::new();
        while !state.finished {
            seen.insert(state.card);
            let action = if state.players[0].money > 0 && state.money < 2 {
                Action::Pass
            } else {
                Action::Take
            };
            state = local.send_action(&game.game_id, action).unwrap();
            assert_eq!(total_coins(&state), 33);
        }
        assert_eq!(seen.len(), 24);
        let held: usize = state
            .players
            .iter()
            .flat_map(|p| &p.cards)
            .map(|s| s.len())
            .sum();
        assert_eq!(held, 24);
        assert!(local.send_action(&game.game_id, Action::Take).is_err());
    }

    #[test]
    fn unknown_game_is_rejected() {
        let mut local = LocalGame::new(seats(&["A"]), Some(5)).unwrap();
        local.create_game().unwrap();
        assert!(local.send_action("nope", Action::Take).is_err());
    }

    #[test]
    fn same_seed_deals_same_game() {
        let mut a = LocalGame::new(seats(&["A"]), Some(9)).unwrap();
        let mut b = LocalGame::new(seats(&["A"]), Some(9)).unwrap();
        assert_eq!(a.create_game().unwrap().status, b.create_game().unwrap().status);
    }
}
