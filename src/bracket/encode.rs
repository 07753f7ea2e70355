//! Prediction Encoding
//!
//! Packs a complete round-by-round selection sequence into a single
//! bounded integer, and unpacks it again. Bit `i` (traversal order:
//! round-major, matchup-index-minor, bit 0 = least significant) is 1
//! iff the selected winner is the matchup's second-listed team.
//!
//! The encoding is a bijection between the `2^(roster_size - 1)`
//! possible selection vectors and the integers in
//! `[0, 2^(roster_size - 1))`.

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::bracket::draw::{next_round, opening_round, Matchup};
use crate::bracket::team::{Roster, TeamId};

/// A full set of winner selections, round-major.
///
/// Round `r` (0-indexed) must contain `roster_size / 2^(r+1)` winners,
/// one per matchup of that round, in matchup order. Built incrementally
/// by callers; only a complete prediction can be packed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    /// Winners per round, in matchup order within each round.
    pub rounds: Vec<Vec<TeamId>>,
}

impl Prediction {
    /// Create from explicit per-round winner lists.
    pub fn new(rounds: Vec<Vec<TeamId>>) -> Self {
        Self { rounds }
    }

    /// The predicted champion: the final round's single winner.
    pub fn champion(&self) -> Option<TeamId> {
        self.rounds.last().and_then(|r| r.first()).copied()
    }

    /// Total number of selections across all rounds.
    pub fn selection_count(&self) -> usize {
        self.rounds.iter().map(|r| r.len()).sum()
    }
}

/// Errors raised while packing a prediction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// A recorded winner is not one of its matchup's two teams.
    ///
    /// `round` and `slot` are 0-indexed in traversal order.
    #[error("invalid selection: round {round} matchup {slot} winner is not a member of the pair")]
    InvalidSelection {
        /// Round index (0-based).
        round: usize,
        /// Matchup index within the round (0-based).
        slot: usize,
    },

    /// The prediction does not cover every round of the bracket.
    #[error("incomplete bracket: expected {expected} rounds, got {got}")]
    IncompleteBracket {
        /// Rounds the roster requires.
        expected: usize,
        /// Rounds the prediction provided.
        got: usize,
    },

    /// A round has the wrong number of winner selections.
    #[error("round {round} expects {expected} winners, got {got}")]
    WrongWinnerCount {
        /// Round index (0-based).
        round: usize,
        /// Matchups in that round.
        expected: usize,
        /// Winners the prediction provided.
        got: usize,
    },
}

/// Pack a complete prediction into its integer encoding.
///
/// Each round's matchups are derived from the previous round's selected
/// winners, so a winner that never reached its claimed matchup fails
/// the membership check. Returns a value strictly below
/// `2^(roster.matchup_count())`.
pub fn pack(roster: &Roster, prediction: &Prediction) -> Result<u32, EncodeError> {
    let expected_rounds = roster.round_count();
    if prediction.rounds.len() != expected_rounds {
        return Err(EncodeError::IncompleteBracket {
            expected: expected_rounds,
            got: prediction.rounds.len(),
        });
    }

    let mut pairs = opening_round(roster);
    let mut value = 0u32;
    let mut bit_pos = 0u32;

    for (round, winners) in prediction.rounds.iter().enumerate() {
        if winners.len() != pairs.len() {
            return Err(EncodeError::WrongWinnerCount {
                round,
                expected: pairs.len(),
                got: winners.len(),
            });
        }

        for (slot, (pair, &winner)) in pairs.iter().zip(winners).enumerate() {
            let bit = pair
                .winner_bit(winner)
                .ok_or(EncodeError::InvalidSelection { round, slot })?;
            value |= bit << bit_pos;
            bit_pos += 1;
        }

        pairs = next_round(winners);
    }

    Ok(value)
}

/// Unpack an integer encoding into per-round winner selections.
///
/// Never fails: only the low `roster.matchup_count()` bits are
/// consulted, higher bits are ignored by policy. The result is always a
/// coherent bracket, since each round's pairs are formed from the
/// previous round's decoded winners.
pub fn unpack(roster: &Roster, value: u32) -> Prediction {
    let mut pairs = opening_round(roster);
    let mut rounds = Vec::with_capacity(roster.round_count());
    let mut bit_pos = 0u32;

    loop {
        let mut winners = Vec::with_capacity(pairs.len());
        for pair in &pairs {
            winners.push(pair.team_for_bit(value >> bit_pos));
            bit_pos += 1;
        }

        let finished = pairs.len() == 1;
        pairs = next_round(&winners);
        rounds.push(winners);

        if finished {
            break;
        }
    }

    Prediction::new(rounds)
}

/// Matchups of every round implied by a decoded prediction, paired with
/// the selected winner. Useful for presentation layers.
pub fn walk_matchups(roster: &Roster, prediction: &Prediction) -> Vec<Vec<(Matchup, TeamId)>> {
    let mut pairs = opening_round(roster);
    let mut out = Vec::with_capacity(prediction.rounds.len());

    for winners in &prediction.rounds {
        let round: Vec<(Matchup, TeamId)> =
            pairs.iter().copied().zip(winners.iter().copied()).collect();
        pairs = next_round(winners);
        out.push(round);
    }

    out
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::team::{world_cup_roster, Team};
    use proptest::prelude::*;

    /// Roster of 4: A(1), B(2), C(3), D(4), round 1 pairs (A,B), (C,D).
    fn four_team_roster() -> Roster {
        Roster::new(vec![
            Team::new(1, "A", ""),
            Team::new(2, "B", ""),
            Team::new(3, "C", ""),
            Team::new(4, "D", ""),
        ])
        .unwrap()
    }

    #[test]
    fn test_scenario_four_teams() {
        // winner(A,B)=B sets bit 0; winner(C,D)=C leaves bit 1 clear;
        // final (B,C) winner B leaves bit 2 clear -> encoded 0b001 = 1.
        let roster = four_team_roster();
        let prediction = Prediction::new(vec![
            vec![TeamId(2), TeamId(3)],
            vec![TeamId(2)],
        ]);

        assert_eq!(pack(&roster, &prediction).unwrap(), 1);

        let decoded = unpack(&roster, 1);
        assert_eq!(decoded.rounds[0], vec![TeamId(2), TeamId(3)]);
        assert_eq!(decoded.champion(), Some(TeamId(2)));
    }

    #[test]
    fn test_bijection_four_teams_exhaustive() {
        // 3 matchups -> 8 codes; every code must decode to a distinct
        // prediction that packs back to itself.
        let roster = four_team_roster();
        let mut seen = std::collections::BTreeSet::new();

        for code in 0u32..8 {
            let prediction = unpack(&roster, code);
            assert_eq!(prediction.selection_count(), 3);
            assert_eq!(pack(&roster, &prediction).unwrap(), code);
            assert!(seen.insert(prediction.rounds.clone()), "code {} collided", code);
        }

        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn test_invalid_selection_rejected() {
        let roster = four_team_roster();
        // Team 4 never plays in the (A,B) opener.
        let prediction = Prediction::new(vec![
            vec![TeamId(4), TeamId(3)],
            vec![TeamId(3)],
        ]);

        let err = pack(&roster, &prediction).unwrap_err();
        assert_eq!(err, EncodeError::InvalidSelection { round: 0, slot: 0 });
    }

    #[test]
    fn test_inconsistent_cross_round_selection_rejected() {
        let roster = four_team_roster();
        // A is claimed as champion but B was selected to win the opener,
        // so the final pair is (B, C) and A is not a member.
        let prediction = Prediction::new(vec![
            vec![TeamId(2), TeamId(3)],
            vec![TeamId(1)],
        ]);

        let err = pack(&roster, &prediction).unwrap_err();
        assert_eq!(err, EncodeError::InvalidSelection { round: 1, slot: 0 });
    }

    #[test]
    fn test_shape_errors() {
        let roster = four_team_roster();

        let missing_final = Prediction::new(vec![vec![TeamId(1), TeamId(3)]]);
        assert_eq!(
            pack(&roster, &missing_final).unwrap_err(),
            EncodeError::IncompleteBracket { expected: 2, got: 1 }
        );

        let short_round = Prediction::new(vec![vec![TeamId(1)], vec![TeamId(1)]]);
        assert_eq!(
            pack(&roster, &short_round).unwrap_err(),
            EncodeError::WrongWinnerCount { round: 0, expected: 2, got: 1 }
        );
    }

    #[test]
    fn test_all_home_winners_encode_to_zero() {
        let roster = world_cup_roster();
        let prediction = unpack(&roster, 0);
        for (round, winners) in prediction.rounds.iter().enumerate() {
            assert_eq!(winners.len(), 8 >> round);
        }
        assert_eq!(prediction.champion(), Some(TeamId(1)));
        assert_eq!(pack(&roster, &prediction).unwrap(), 0);
    }

    #[test]
    fn test_walk_matchups_groups_rounds() {
        let roster = world_cup_roster();
        let prediction = unpack(&roster, 0b101);
        let walked = walk_matchups(&roster, &prediction);

        assert_eq!(walked.len(), 4);
        assert_eq!(walked[0].len(), 8);
        assert_eq!(walked[3].len(), 1);
        // Selected winner is always a member of its matchup.
        for round in &walked {
            for (matchup, winner) in round {
                assert!(matchup.contains(*winner));
            }
        }
    }

    proptest! {
        #[test]
        fn prop_round_trip_sixteen_teams(code in 0u32..(1 << 15)) {
            let roster = world_cup_roster();
            let prediction = unpack(&roster, code);
            prop_assert_eq!(pack(&roster, &prediction).unwrap(), code);
        }

        #[test]
        fn prop_high_bits_ignored(code in any::<u32>()) {
            // Masking policy: only the low matchup_count bits matter.
            let roster = world_cup_roster();
            let prediction = unpack(&roster, code);
            prop_assert_eq!(pack(&roster, &prediction).unwrap(), code & 0x7FFF);
        }

        #[test]
        fn prop_pack_stays_in_range(code in 0u32..(1 << 15)) {
            let roster = world_cup_roster();
            let prediction = unpack(&roster, code);
            let packed = pack(&roster, &prediction).unwrap();
            prop_assert!(packed < (1 << roster.matchup_count()));
        }
    }
}
