//! Bracket Draw
//!
//! Derives the matchup structure of a single-elimination bracket.
//! Round 1 pairs are fixed by roster order; every later round pairs the
//! previous round's winners two at a time, in order.

use serde::{Serialize, Deserialize};

use crate::bracket::team::{Roster, TeamId};

/// One pairwise comparison within a round.
///
/// `home` is the first-listed team (bit value 0 in the encoding),
/// `away` the second-listed team (bit value 1).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matchup {
    /// First-listed team.
    pub home: TeamId,
    /// Second-listed team.
    pub away: TeamId,
}

impl Matchup {
    /// Create a matchup from an ordered pair.
    pub const fn new(home: TeamId, away: TeamId) -> Self {
        Self { home, away }
    }

    /// Check whether a team takes part in this matchup.
    pub fn contains(&self, id: TeamId) -> bool {
        self.home == id || self.away == id
    }

    /// Bit value for a claimed winner: 0 for the first-listed team,
    /// 1 for the second-listed team, `None` for a team that is not a
    /// member of this matchup.
    pub fn winner_bit(&self, winner: TeamId) -> Option<u32> {
        if winner == self.home {
            Some(0)
        } else if winner == self.away {
            Some(1)
        } else {
            None
        }
    }

    /// Resolve a bit back to the winning team.
    pub fn team_for_bit(&self, bit: u32) -> TeamId {
        if bit & 1 == 0 { self.home } else { self.away }
    }
}

/// Opening-round matchups, paired by roster order.
pub fn opening_round(roster: &Roster) -> Vec<Matchup> {
    pair_up(&roster.ids())
}

/// Matchups of the round fed by the given winners, in order.
///
/// Callers must pass an even number of winners; the trailing team of an
/// odd-length slice would have no opponent and is dropped.
pub fn next_round(winners: &[TeamId]) -> Vec<Matchup> {
    pair_up(winners)
}

fn pair_up(ids: &[TeamId]) -> Vec<Matchup> {
    ids.chunks_exact(2)
        .map(|pair| Matchup::new(pair[0], pair[1]))
        .collect()
}

/// Human-readable name for a round with the given number of matchups.
pub fn round_name(matchups_in_round: usize) -> String {
    match matchups_in_round {
        1 => "Final".to_string(),
        2 => "Semi-Finals".to_string(),
        4 => "Quarter-Finals".to_string(),
        n => format!("Round of {}", n * 2),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::team::world_cup_roster;

    #[test]
    fn test_opening_round_pairs_by_roster_order() {
        let roster = world_cup_roster();
        let pairs = opening_round(&roster);

        assert_eq!(pairs.len(), 8);
        assert_eq!(pairs[0], Matchup::new(TeamId(1), TeamId(2)));
        assert_eq!(pairs[7], Matchup::new(TeamId(15), TeamId(16)));
    }

    #[test]
    fn test_next_round_chunks_winners() {
        let winners = [TeamId(2), TeamId(3), TeamId(5), TeamId(8)];
        let pairs = next_round(&winners);

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], Matchup::new(TeamId(2), TeamId(3)));
        assert_eq!(pairs[1], Matchup::new(TeamId(5), TeamId(8)));
    }

    #[test]
    fn test_matchup_count_invariant() {
        // Matchups across all rounds must equal roster_size - 1.
        let roster = world_cup_roster();
        let mut total = 0;
        let mut pairs = opening_round(&roster);
        loop {
            total += pairs.len();
            if pairs.len() == 1 {
                break;
            }
            // Advance with arbitrary winners (home side).
            let winners: Vec<TeamId> = pairs.iter().map(|m| m.home).collect();
            pairs = next_round(&winners);
        }
        assert_eq!(total, roster.matchup_count());
    }

    #[test]
    fn test_winner_bit() {
        let m = Matchup::new(TeamId(3), TeamId(7));
        assert_eq!(m.winner_bit(TeamId(3)), Some(0));
        assert_eq!(m.winner_bit(TeamId(7)), Some(1));
        assert_eq!(m.winner_bit(TeamId(9)), None);
        assert_eq!(m.team_for_bit(0), TeamId(3));
        assert_eq!(m.team_for_bit(1), TeamId(7));
    }

    #[test]
    fn test_round_names() {
        assert_eq!(round_name(8), "Round of 16");
        assert_eq!(round_name(4), "Quarter-Finals");
        assert_eq!(round_name(2), "Semi-Finals");
        assert_eq!(round_name(1), "Final");
    }
}
