//! Team Roster Definitions
//!
//! Immutable reference data for the tournament: team identities and the
//! validated roster a bracket is drawn from. Created once at startup,
//! never mutated.

use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Largest roster the encoder supports. A 32-team bracket has 31
/// matchups, so every encoding fits the 32-bit plaintext width of the
/// confidential value layer.
pub const MAX_ROSTER_SIZE: usize = 32;

// =============================================================================
// TEAM ID
// =============================================================================

/// Unique team identifier within a roster.
///
/// Implements Ord for deterministic BTreeMap ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub struct TeamId(pub u32);

impl TeamId {
    /// Create from a raw integer.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw integer.
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// TEAM
// =============================================================================

/// A single team in the roster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Unique identifier across the roster.
    pub id: TeamId,
    /// Display name.
    pub name: String,
    /// Icon reference (path or URL, opaque to this crate).
    pub icon: String,
}

impl Team {
    /// Create a new team.
    pub fn new(id: u32, name: &str, icon: &str) -> Self {
        Self {
            id: TeamId::new(id),
            name: name.to_string(),
            icon: icon.to_string(),
        }
    }
}

// =============================================================================
// ROSTER
// =============================================================================

/// Errors raised by roster validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// Roster size is not a power of two (or below the two-team minimum).
    #[error("roster size {got} is not a power of two of at least 2")]
    NotPowerOfTwo {
        /// Size that was provided.
        got: usize,
    },

    /// Roster exceeds the supported encoding width.
    #[error("roster size {got} exceeds the maximum of {MAX_ROSTER_SIZE}")]
    TooLarge {
        /// Size that was provided.
        got: usize,
    },

    /// Two teams share an identifier.
    #[error("duplicate team id {0}")]
    DuplicateTeam(TeamId),
}

/// A validated, ordered tournament roster.
///
/// Roster order fixes the opening-round pairings: teams are paired two
/// at a time in the order given here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    teams: Vec<Team>,
}

impl Roster {
    /// Validate and build a roster.
    pub fn new(teams: Vec<Team>) -> Result<Self, RosterError> {
        let n = teams.len();
        if n < 2 || !n.is_power_of_two() {
            return Err(RosterError::NotPowerOfTwo { got: n });
        }
        if n > MAX_ROSTER_SIZE {
            return Err(RosterError::TooLarge { got: n });
        }

        let mut seen = std::collections::BTreeSet::new();
        for team in &teams {
            if !seen.insert(team.id) {
                return Err(RosterError::DuplicateTeam(team.id));
            }
        }

        Ok(Self { teams })
    }

    /// Number of teams.
    pub fn len(&self) -> usize {
        self.teams.len()
    }

    /// True when the roster holds no teams (never, for a valid roster).
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Total matchups across all rounds (`len - 1`), which is also the
    /// bit width of an encoded prediction.
    pub fn matchup_count(&self) -> usize {
        self.teams.len() - 1
    }

    /// Number of rounds until a champion is decided.
    pub fn round_count(&self) -> usize {
        self.teams.len().trailing_zeros() as usize
    }

    /// All teams in roster order.
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Look up a team by id.
    pub fn get(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    /// Check whether an id belongs to this roster.
    pub fn contains(&self, id: TeamId) -> bool {
        self.get(id).is_some()
    }

    /// Team ids in roster order.
    pub fn ids(&self) -> Vec<TeamId> {
        self.teams.iter().map(|t| t.id).collect()
    }
}

/// The built-in 16-team roster used by the demo and tests.
pub fn world_cup_roster() -> Roster {
    let teams = vec![
        Team::new(1, "Brazil", "/brazil.png"),
        Team::new(2, "Argentina", "/argentina.png"),
        Team::new(3, "Germany", "/germany.png"),
        Team::new(4, "France", "/france.png"),
        Team::new(5, "Spain", "/spain.png"),
        Team::new(6, "Italy", "/italy.png"),
        Team::new(7, "Netherlands", "/netherlands.png"),
        Team::new(8, "Belgium", "/belgium.png"),
        Team::new(9, "Portugal", "/portugal.png"),
        Team::new(10, "England", "/england.png"),
        Team::new(11, "Croatia", "/croatia.png"),
        Team::new(12, "Uruguay", "/uruguay.png"),
        Team::new(13, "Mexico", "/mexico.png"),
        Team::new(14, "USA", "/usa.png"),
        Team::new(15, "Japan", "/japan.png"),
        Team::new(16, "South Korea", "/southkorea.png"),
    ];

    Roster::new(teams).expect("built-in roster is valid")
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_teams(n: usize) -> Vec<Team> {
        (1..=n as u32)
            .map(|i| Team::new(i, &format!("Team {}", i), ""))
            .collect()
    }

    #[test]
    fn test_world_cup_roster_shape() {
        let roster = world_cup_roster();
        assert_eq!(roster.len(), 16);
        assert_eq!(roster.matchup_count(), 15);
        assert_eq!(roster.round_count(), 4);
    }

    #[test]
    fn test_roster_rejects_non_power_of_two() {
        let result = Roster::new(numbered_teams(6));
        assert!(matches!(result, Err(RosterError::NotPowerOfTwo { got: 6 })));

        let result = Roster::new(numbered_teams(1));
        assert!(matches!(result, Err(RosterError::NotPowerOfTwo { got: 1 })));

        let result = Roster::new(Vec::new());
        assert!(matches!(result, Err(RosterError::NotPowerOfTwo { got: 0 })));
    }

    #[test]
    fn test_roster_rejects_oversized() {
        let result = Roster::new(numbered_teams(64));
        assert!(matches!(result, Err(RosterError::TooLarge { got: 64 })));
    }

    #[test]
    fn test_roster_rejects_duplicate_ids() {
        let mut teams = numbered_teams(4);
        teams[3].id = teams[0].id;
        let result = Roster::new(teams);
        assert!(matches!(result, Err(RosterError::DuplicateTeam(TeamId(1)))));
    }

    #[test]
    fn test_roster_lookup() {
        let roster = world_cup_roster();
        assert!(roster.contains(TeamId::new(1)));
        assert!(roster.contains(TeamId::new(16)));
        assert!(!roster.contains(TeamId::new(17)));
        assert_eq!(roster.get(TeamId::new(10)).unwrap().name, "England");
    }

    #[test]
    fn test_minimum_roster() {
        let roster = Roster::new(numbered_teams(2)).unwrap();
        assert_eq!(roster.matchup_count(), 1);
        assert_eq!(roster.round_count(), 1);
    }
}
