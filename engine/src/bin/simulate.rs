//! Plays seeded AI-vs-AI games and prints one JSON summary line per game.

use std::fs;

use clap::Parser;
use dice_engine::rng::{ManualClock, RngDice};
use dice_engine::{winner, EngineConfig, GameSession, Variant};
use serde_json::json;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "simulate")]
#[command(about = "Run AI-vs-AI dice games and report the results")]
struct Args {
    /// Variant to play (pig, greed, mexico, chicago, balut)
    variant: String,

    /// Number of games to play
    #[arg(short, long, default_value = "1")]
    games: u32,

    /// Base seed; game `n` uses `seed + n`
    #[arg(long, default_value = "1")]
    seed: u64,

    /// JSON engine config
    #[arg(long)]
    config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

const MAX_TURNS: u32 = 10_000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let variant: Variant = args.variant.parse()?;
    let base = match &args.config {
        Some(path) => EngineConfig::from_json(&fs::read_to_string(path)?)?,
        None => EngineConfig::default(),
    };

    for game in 0..args.games {
        let seed = args.seed.wrapping_add(game as u64);
        let mut config = base.clone();
        config.ai.seed = Some(seed);
        let seats = if variant.is_solo() { 1 } else { config.players };
        let mut session = GameSession::new(variant, config, RngDice::seeded(seed ^ 0x5EED), ManualClock::new(0))?;
        for seat in 0..seats { session = session.with_ai_seat(seat); }

        let mut turns = 0;
        while session.ai_to_move() && turns < MAX_TURNS {
            session.run_ai_turn()?;
            turns += 1;
        }
        if !session.state().is_game_over() {
            warn!(game, turns, "game did not finish");
        }
        info!(game, turns, events = session.events().len(), "game played");

        let state = session.state();
        let totals: Vec<u32> = (0..state.players()).map(|p| state.total_for(p)).collect();
        println!("{}", json!({
            "game": game,
            "seed": seed,
            "variant": variant.name(),
            "turns": turns,
            "finished": state.is_game_over(),
            "winner": winner(state),
            "totals": totals,
            "events": session.events().len()
        }));
    }
    Ok(())
}
