//! Pig: one die per roll. Bank the running total or lose it on a one.

use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::model::{PigState, PlayerId, Variant};
use crate::rules::{self, PIG_BUST_FACE, PIG_TARGET};

pub fn initialize(players: usize) -> PigState {
    PigState {
        player_scores: (0..players).map(|p| (p, 0)).collect(),
        current_turn_score: 0,
        current_player_index: 0,
        is_game_over: false,
    }
}

pub fn handle_turn(state: &PigState, roll: u8) -> EngineResult<PigState> {
    if state.is_game_over { return Err(EngineError::GameOver); }
    rules::check_dice(Variant::Pig, &[roll], 1, 1)?;
    let mut next = state.clone();
    if roll == PIG_BUST_FACE {
        debug!(player = state.current_player_index, lost = state.current_turn_score, "pig: rolled a one");
        next.current_turn_score = 0;
        next.current_player_index = rules::next_seat(state.current_player_index, state.player_scores.len());
    } else {
        next.current_turn_score += roll as u32;
    }
    Ok(next)
}

pub fn bank_score(state: &PigState) -> EngineResult<PigState> {
    if state.is_game_over { return Err(EngineError::GameOver); }
    let player = state.current_player_index;
    let banked = *state.player_scores.get(&player).ok_or(EngineError::UnknownPlayer(player))?;
    let total = banked + state.current_turn_score;
    let mut next = state.clone();
    next.player_scores.insert(player, total);
    next.current_turn_score = 0;
    next.current_player_index = rules::next_seat(player, state.player_scores.len());
    if total >= PIG_TARGET {
        info!(player, total, "pig: game won");
        next.is_game_over = true;
    }
    Ok(next)
}

pub fn winner(state: &PigState) -> Option<PlayerId> {
    if !state.is_game_over { return None; }
    state.player_scores.iter().find(|(_, &s)| s >= PIG_TARGET).map(|(&p, _)| p)
}
