use anyhow::{bail, Context};
use enum_map::Enum;
use serde::{Deserialize, Deserializer, Serialize};

mod series;

pub use series::{insert_card, Series};

pub type Card = u32;

pub const LOWEST_CARD: Card = 3;
pub const HIGHEST_CARD: Card = 35;
/// Cards removed face down from the deck before a game starts.
pub const REMOVED_CARDS: usize = 9;
pub const STARTING_MONEY: u32 = 11;

/// Sum of the lowest card of every run, minus the coins still held. Lower is better.
pub fn score(cards: &[Series], money: u32) -> i32 {
    let card_points: i64 = cards.iter().filter_map(Series::min).map(i64::from).sum();
    (card_points - i64::from(money)) as i32
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub money: u32,
    #[serde(default)]
    pub cards: Vec<Series>,
}

impl Player {
    pub fn new(name: &str) -> Self {
        Player {
            name: name.to_owned(),
            money: STARTING_MONEY,
            cards: vec![],
        }
    }

    pub fn points(&self) -> i32 {
        score(&self.cards, self.money)
    }

    pub fn add_card(&mut self, card: Card) {
        insert_card(&mut self.cards, card);
    }

    pub fn fits_in_series(&self, card: Card) -> bool {
        self.cards.iter().any(|s| s.is_adjacent(card))
    }

    /// Takes the card together with every coin on it.
    pub fn take(&mut self, card: Card, pot: u32) {
        self.add_card(card);
        self.money += pot;
    }

    /// Pays one coin into the pot.
    pub fn pass(&mut self) -> anyhow::Result<()> {
        if self.money == 0 {
            bail!("{} has no coins left and must take the card", self.name);
        }
        self.money -= 1;
        Ok(())
    }
}

/// Coarse game progress, derived from the number of cards left in the deck.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Enum, Serialize, Deserialize)]
pub enum Phase {
    Start,
    Middle,
    End,
}

impl Phase {
    pub fn from_cards_left(cards_left: u32) -> Self {
        if cards_left >= 15 {
            Phase::Start
        } else if cards_left > 5 {
            Phase::Middle
        } else {
            Phase::End
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Snapshot of a game as reported by the game service.
///
/// `players[0]` is always the player whose turn it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub finished: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub card: Card,
    /// Coins on the current card.
    #[serde(default, deserialize_with = "null_as_default")]
    pub money: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cards_left: u32,
    pub players: Vec<Player>,
}

impl GameState {
    pub fn acting_player(&self) -> Option<&Player> {
        self.players.first()
    }

    pub fn phase(&self) -> Phase {
        Phase::from_cards_left(self.cards_left)
    }

    pub fn final_scores(&self) -> Vec<FinalScore> {
        self.players.iter().map(FinalScore::of).collect()
    }

    pub fn json(&self) -> anyhow::Result<String> {
        serde_json::to_string(self).context("Failed to encode game state")
    }

    pub fn print(&self) {
        if self.finished {
            println!("Game finished");
        } else {
            println!(
                "Card {} with {} coins, {} cards left",
                self.card, self.money, self.cards_left
            );
        }
        for p in &self.players {
            println!("{}:", p.name);
            println!("   Money: {}", p.money);
            if !p.cards.is_empty() {
                let cards: Vec<String> = p.cards.iter().map(|s| s.to_string()).collect();
                println!("   Cards: {}", cards.join(", "));
            }
            println!("   Points: {}", p.points());
        }
        if let Some(p) = self.acting_player().filter(|_| !self.finished) {
            println!("Turn {}", p.name);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalScore {
    pub name: String,
    pub score: i32,
    pub money_left: u32,
}

impl FinalScore {
    pub fn of(player: &Player) -> Self {
        FinalScore {
            name: player.name.clone(),
            score: player.points(),
            money_left: player.money,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::Parser, Serialize, Deserialize)]
pub enum Action {
    /// Take the card and every coin on it
    Take,
    /// Pay one coin into the pot and pass the card on
    Pass,
}

impl Action {
    pub fn from_take_card(take_card: bool) -> Self {
        if take_card {
            Action::Take
        } else {
            Action::Pass
        }
    }

    pub fn take_card(self) -> bool {
        self == Action::Take
    }
}

/// Serves an agent over stdin/stdout: one JSON game state per input line, one
/// JSON action per output line.
pub fn ai_from_function(mut function: impl FnMut(GameState) -> Action) -> anyhow::Result<()> {
    for line in std::io::stdin().lines() {
        let line = line.context("Failed to read game state")?;
        if line.trim().is_empty() {
            continue;
        }
        let state = serde_json::from_str(&line).context("Invalid game state")?;
        let action = function(state);
        println!("{}", serde_json::to_string(&action)?);
    }
    Ok(())
}
