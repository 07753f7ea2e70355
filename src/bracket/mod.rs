//! Bracket Logic Module
//!
//! Pure, side-effect-free bracket code: the roster, the round/matchup
//! structure, and the integer encoding of a full prediction.
//!
//! ## Module Structure
//!
//! - `team`: Team identities and the validated roster
//! - `draw`: Matchup derivation round by round
//! - `encode`: pack/unpack between selections and a bounded integer

pub mod team;
pub mod draw;
pub mod encode;

// Re-export key types
pub use team::{Team, TeamId, Roster, RosterError, world_cup_roster, MAX_ROSTER_SIZE};
pub use draw::{Matchup, opening_round, next_round, round_name};
pub use encode::{Prediction, EncodeError, pack, unpack, walk_matchups};
