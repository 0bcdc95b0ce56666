//! Score relaying. When a round is won the final score is posted to an external relay as a
//! fire-and-forget background task; the frame loop never waits on it and a failed request is
//! logged and forgotten. Who the score belongs to is fixed once at startup.

use bevy::prelude::*;
use serde::Serialize;

use crate::round::RoundState;

/// Relay endpoint the score lands on. The service republishes onto a pub-sub stream; from this
/// side it is an opaque HTTP collaborator.
pub const SCORE_ENDPOINT: &str =
    "https://lw3-streamr.onrender.com/streamr/publish/0x4be4f472ff58b8aaa999253cfd2474a8b6cae160%2Flw3_game";

/// Who is playing. Parsed once at startup and immutable for the process lifetime.
#[derive(Resource, Clone, Debug)]
pub struct Identity {
    pub username: String,
    pub wallet: String,
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(clap::Parser, Debug)]
#[command(name = "hillside-runner", about = "Side-scrolling platformer that relays round scores")]
struct Cli {
    /// Display name attached to submitted scores.
    #[arg(long, default_value = "None")]
    username: String,

    /// Wallet address attached to submitted scores.
    #[arg(long, default_value = "wallet")]
    wallet: String,
}

impl Identity {
    /// Reads the identity the process will play under. Native builds take `--username` and
    /// `--wallet` flags; web builds run with the literal fallbacks.
    pub fn from_startup() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        {
            let cli = <Cli as clap::Parser>::parse();
            Self {
                username: cli.username,
                wallet: cli.wallet,
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            Self {
                username: "None".to_owned(),
                wallet: "wallet".to_owned(),
            }
        }
    }
}

/// The JSON body the relay expects.
#[derive(Serialize, Clone, Debug)]
pub struct ScorePayload {
    pub username: String,
    pub score: u64,
    pub wallet: String,
    pub datetime: u64,
}

/// Runs once on entering the won state. The submission guard lives on the round, so re-entering
/// the state within one round (which cannot normally happen) would still post only once.
pub fn report_score(identity: Res<Identity>, mut round: ResMut<RoundState>) {
    if !round.take_submission() {
        return;
    }

    let payload = ScorePayload {
        username: identity.username.clone(),
        score: round.score,
        wallet: identity.wallet.clone(),
        datetime: epoch_millis(),
    };
    submit(payload);
}

fn epoch_millis() -> u64 {
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0)
    }

    // No wall clock without a bindings layer on the web; the relay task is native-only anyway.
    #[cfg(target_arch = "wasm32")]
    {
        0
    }
}

/// Detached background POST. Whatever the relay answers is logged; an error is swallowed after
/// a log line and never blocks or aborts the round reset.
#[cfg(not(target_arch = "wasm32"))]
fn submit(payload: ScorePayload) {
    bevy::tasks::IoTaskPool::get()
        .spawn(async move {
            match ureq::post(SCORE_ENDPOINT).send_json(&payload) {
                Ok(response) => match response.into_string() {
                    Ok(body) => info!("Score relay answered: {body}"),
                    Err(err) => warn!("Score relay answered but the body was unreadable: {err}"),
                },
                Err(err) => warn!("Posting the score failed: {err}"),
            }
        })
        .detach();
}

#[cfg(target_arch = "wasm32")]
fn submit(payload: ScorePayload) {
    match serde_json::to_string(&payload) {
        Ok(body) => info!("Score relay is native-only; would have posted: {body}"),
        Err(err) => warn!("Could not encode the score payload: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_carries_the_relay_field_names() {
        let payload = ScorePayload {
            username: "Jean".to_owned(),
            score: 42,
            wallet: "0x25D".to_owned(),
            datetime: 1_700_000_000_000,
        };

        let value = serde_json::to_value(&payload).expect("payload always serializes");

        assert_eq!(value["username"], "Jean");
        assert_eq!(value["score"], 42);
        assert_eq!(value["wallet"], "0x25D");
        assert_eq!(value["datetime"], 1_700_000_000_000u64);
    }
}
