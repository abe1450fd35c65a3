use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::Card;

/// A contiguous ascending run of cards held by one player.
///
/// Only the lowest card of a run counts against its owner, so every card that
/// extends a run is free in points.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series(Vec<Card>);

impl Series {
    pub fn new(card: Card) -> Self {
        Series(vec![card])
    }

    pub fn cards(&self) -> &[Card] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn min(&self) -> Option<Card> {
        self.0.iter().copied().min()
    }

    pub fn max(&self) -> Option<Card> {
        self.0.iter().copied().max()
    }

    /// True when `card` sits directly above the highest or below the lowest card.
    pub fn is_adjacent(&self, card: Card) -> bool {
        self.max().is_some_and(|max| card == max + 1)
            || self.min().is_some_and(|min| card + 1 == min)
    }

    fn try_extend(&mut self, card: Card) -> bool {
        match (self.0.first(), self.0.last()) {
            (_, Some(&last)) if card == last + 1 => {
                self.0.push(card);
                true
            }
            (Some(&first), _) if card + 1 == first => {
                self.0.insert(0, card);
                true
            }
            _ => false,
        }
    }
}

impl From<Vec<Card>> for Series {
    fn from(cards: Vec<Card>) -> Self {
        Series(cards)
    }
}

impl Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Places `card` into the first series (in storage order) it extends, or opens
/// a new series at the end.
///
/// A card that bridges two runs only joins the first one; the runs are not merged.
pub fn insert_card(collection: &mut Vec<Series>, card: Card) {
    for series in collection.iter_mut() {
        if series.try_extend(card) {
            return;
        }
    }
    collection.push(Series::new(card));
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;

    fn build(cards: &[Card]) -> Vec<Series> {
        let mut collection = vec![];
        for &card in cards {
            insert_card(&mut collection, card);
        }
        collection
    }

    fn runs(collection: &[Series]) -> Vec<Vec<Card>> {
        collection.iter().map(|s| s.cards().to_vec()).collect()
    }

    #[test]
    fn appends_to_run_ending_below() {
        let collection = build(&[7, 8, 9, 10]);
        assert_eq!(runs(&collection), vec![vec![7, 8, 9, 10]]);
    }

    #[test]
    fn prepends_to_run_starting_above() {
        let collection = build(&[10, 9, 8]);
        assert_eq!(runs(&collection), vec![vec![8, 9, 10]]);
    }

    #[test]
    fn unrelated_card_opens_new_run_at_the_end() {
        let collection = build(&[20, 5, 21, 30]);
        assert_eq!(runs(&collection), vec![vec![20, 21], vec![5], vec![30]]);
    }

    #[test]
    fn first_matching_run_wins() {
        // 11 extends [10] upwards and [12] downwards; storage order decides.
        let collection = build(&[10, 12, 11]);
        assert_eq!(runs(&collection), vec![vec![10, 11], vec![12]]);

        let collection = build(&[12, 10, 11]);
        assert_eq!(runs(&collection), vec![vec![11, 12], vec![10]]);
    }

    #[test]
    fn adjacency_checks_both_ends() {
        let series = Series::from(vec![6, 7]);
        assert!(series.is_adjacent(8));
        assert!(series.is_adjacent(5));
        assert!(!series.is_adjacent(7));
        assert!(!series.is_adjacent(9));
        assert!(!Series::from(vec![]).is_adjacent(1));
    }

    #[test]
    fn lowest_card_does_not_underflow() {
        let collection = build(&[0, 1]);
        assert_eq!(runs(&collection), vec![vec![0, 1]]);
    }

    #[test]
    fn serializes_as_plain_array() {
        let series = Series::from(vec![3, 4, 5]);
        assert_eq!(serde_json::to_string(&series).unwrap(), "[3,4,5]");
        let back: Series = serde_json::from_str("[3,4,5]").unwrap();
        assert_eq!(back, series);
        assert_eq!(series.to_string(), "[3, 4, 5]");
    }

    proptest! {
        #[test]
        fn insertion_is_deterministic(cards in proptest::collection::vec(3u32..=35, 0..24)) {
            prop_assert_eq!(build(&cards), build(&cards));
        }

        #[test]
        fn runs_stay_contiguous_and_hold_every_card(
            cards in Just((3u32..=35).collect::<Vec<_>>()).prop_shuffle(),
            take in 0usize..=33,
        ) {
            let cards = &cards[..take];
            let collection = build(cards);

            for series in &collection {
                prop_assert!(!series.is_empty());
                for pair in series.cards().windows(2) {
                    prop_assert_eq!(pair[1], pair[0] + 1);
                }
            }

            let held: Vec<Card> = collection.iter().flat_map(|s| s.cards().iter().copied()).collect();
            prop_assert_eq!(held.len(), cards.len());
            let unique: HashSet<Card> = held.iter().copied().collect();
            prop_assert_eq!(unique, cards.iter().copied().collect::<HashSet<_>>());
        }
    }
}
