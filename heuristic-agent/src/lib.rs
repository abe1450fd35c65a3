//! Rule-based take-or-pass strategy.
//!
//! Rules are checked in a fixed order and the first one that matches decides.

use enum_map::{enum_map, EnumMap};
use game_def::{Action, Card, GameState, Phase, Player};

/// The rule that produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// No coins left, passing is not possible.
    ForcedTake,
    /// The pot is worth at least as much as the card costs.
    CoinsCoverCard,
    /// The card extends one of the runs already held.
    ExtendsSeries,
    /// Early in the game the pot alone is worth grabbing.
    LucrativePot,
    /// Early in the game with a full purse, let others pay into a high card.
    FreshHighCard,
    /// The card is too expensive for the current phase.
    HighCard(Phase),
    /// Enough coins to keep passing until the deck runs out.
    FundsRemainingPasses,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,
    pub rule: Rule,
}

impl Decision {
    fn take(rule: Rule) -> Self {
        Decision {
            action: Action::Take,
            rule,
        }
    }

    fn pass(rule: Rule) -> Self {
        Decision {
            action: Action::Pass,
            rule,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Thresholds {
    /// Pot size that is taken outright at the start of the game.
    pub lucrative_pot: u32,
    /// Money above which a fresh player passes on high cards at the start.
    pub full_purse: u32,
    /// Lowest card value avoided in each phase.
    pub avoid_card_from: EnumMap<Phase, Card>,
    /// Coins needed per remaining card to keep passing until the end.
    pub coins_per_card_left: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            lucrative_pot: 9,
            full_purse: 10,
            avoid_card_from: enum_map! {
                Phase::Start => 16,
                Phase::Middle => 20,
                Phase::End => 25,
            },
            coins_per_card_left: 2,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeuristicAgent {
    pub thresholds: Thresholds,
}

impl HeuristicAgent {
    pub fn new(thresholds: Thresholds) -> Self {
        HeuristicAgent { thresholds }
    }

    /// Decides for the acting player of `state`. `None` when nobody is acting.
    pub fn decide(&self, state: &GameState) -> Option<Decision> {
        let player = state.acting_player()?;
        if player.money == 0 {
            return Some(Decision::take(Rule::ForcedTake));
        }
        Some(self.evaluate(state.card, state.money, player, state.cards_left))
    }

    /// Applies every rule except the forced take, which the caller handles.
    pub fn evaluate(&self, card: Card, coins: u32, player: &Player, cards_left: u32) -> Decision {
        let t = &self.thresholds;

        if coins >= card {
            return Decision::take(Rule::CoinsCoverCard);
        }

        if player.fits_in_series(card) {
            return Decision::take(Rule::ExtendsSeries);
        }

        let phase = Phase::from_cards_left(cards_left);
        let avoid_from = t.avoid_card_from[phase];
        match phase {
            Phase::Start => {
                if coins >= t.lucrative_pot {
                    return Decision::take(Rule::LucrativePot);
                }
                if player.money > t.full_purse && card >= avoid_from {
                    return Decision::pass(Rule::FreshHighCard);
                }
            }
            Phase::Middle | Phase::End => {
                if card >= avoid_from {
                    return Decision::pass(Rule::HighCard(phase));
                }
            }
        }

        if player.money >= cards_left.saturating_mul(t.coins_per_card_left) {
            return Decision::pass(Rule::FundsRemainingPasses);
        }

        Decision::pass(Rule::Default)
    }
}
