//! Bracket Vault Demo
//!
//! End-to-end walkthrough: build a bracket prediction for the built-in
//! 16-team roster, seal it in the mock vault, register the handle, show
//! the at-most-one-submission guarantee, then decrypt and decode.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use bracket_vault::bracket::{
    next_round, opening_round, round_name, walk_matchups, world_cup_roster, Matchup,
};
use bracket_vault::vault::auth::AuthorizationSigner;
use bracket_vault::{
    pack, unpack, ChainId, Identity, MockVault, Prediction, PredictionClient, PredictionRegistry,
    Roster, SessionContext, TeamId, VERSION,
};

const DEMO_SECRET: &str = "bracket-vault-demo-secret";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Bracket Vault v{}", VERSION);

    let roster = world_cup_roster();
    info!(
        "Roster: {} teams, {} matchups, {} rounds",
        roster.len(),
        roster.matchup_count(),
        roster.round_count()
    );

    // Shared stack: one vault, one registry.
    let vault = Arc::new(MockVault::new(DEMO_SECRET));
    let registry = Arc::new(PredictionRegistry::new(Arc::clone(&vault)));

    // Alice picks the second-listed team in every matchup, Bob the first.
    let alice_prediction = favor_away(&roster);
    let bob_prediction = favor_home(&roster);

    let alice_code = pack(&roster, &alice_prediction)?;
    let bob_code = pack(&roster, &bob_prediction)?;
    info!("Alice's bracket packs to {:#x}", alice_code);
    info!("Bob's bracket packs to {:#x}", bob_code);

    let mut alice =
        PredictionClient::new(session(0x0A), Arc::clone(&registry), Arc::clone(&vault)).await;
    let mut bob =
        PredictionClient::new(session(0x0B), Arc::clone(&registry), Arc::clone(&vault)).await;

    info!("=== Submitting ===");
    alice.submit_prediction(alice_code).await?;
    info!("Alice: {}", alice.status().map(|s| s.text.as_str()).unwrap_or("-"));

    bob.submit_prediction(bob_code).await?;
    info!("Bob: {}", bob.status().map(|s| s.text.as_str()).unwrap_or("-"));

    // A second attempt from Alice is refused before anything is sealed.
    if let Err(e) = alice.submit_prediction(bob_code).await {
        info!("Alice's second submission rejected: {}", e);
    }

    info!("Registered participants: {}", registry.registered_count().await);

    info!("=== Decrypting ===");
    let decrypted = alice.decrypt_my_prediction().await?;
    info!("Alice decrypts her sealed bracket: {:#x}", decrypted);

    let prediction = unpack(&roster, decrypted);
    print_bracket(&roster, &prediction);

    info!("Snapshot:\n{}", alice.snapshot().to_json()?);

    Ok(())
}

fn session(byte: u8) -> SessionContext {
    SessionContext::with_signer(
        Identity([byte; 20]),
        ChainId(31337),
        AuthorizationSigner::new(DEMO_SECRET),
    )
}

/// A bracket picking every matchup's second-listed team.
fn favor_away(roster: &Roster) -> Prediction {
    build_prediction(roster, |m| m.away)
}

/// A bracket picking every matchup's first-listed team.
fn favor_home(roster: &Roster) -> Prediction {
    build_prediction(roster, |m| m.home)
}

fn build_prediction(roster: &Roster, pick: impl Fn(&Matchup) -> TeamId) -> Prediction {
    let mut rounds = Vec::with_capacity(roster.round_count());
    let mut pairs = opening_round(roster);
    while !pairs.is_empty() {
        let winners: Vec<TeamId> = pairs.iter().map(&pick).collect();
        pairs = next_round(&winners);
        rounds.push(winners);
    }
    Prediction::new(rounds)
}

fn print_bracket(roster: &Roster, prediction: &Prediction) {
    for round in walk_matchups(roster, prediction) {
        info!("--- {} ---", round_name(round.len()));
        for (matchup, winner) in round {
            let home = team_name(roster, matchup.home);
            let away = team_name(roster, matchup.away);
            info!("{} vs {} -> {}", home, away, team_name(roster, winner));
        }
    }
    if let Some(champion) = prediction.champion() {
        info!("Predicted champion: {}", team_name(roster, champion));
    }
}

fn team_name(roster: &Roster, id: TeamId) -> String {
    roster
        .get(id)
        .map(|t| t.name.clone())
        .unwrap_or_else(|| id.to_string())
}
