//! Chicago: eleven rounds, two dice, round `r` scores `r` when the sum hits it.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::model::{ChicagoState, Variant};
use crate::rules::{self, CHICAGO_FIRST_ROUND, CHICAGO_LAST_ROUND};

pub fn initialize() -> ChicagoState {
    ChicagoState {
        current_round: CHICAGO_FIRST_ROUND,
        total_score: 0,
        round_score: 0,
        round_scores: BTreeMap::new(),
        has_scored: false,
        is_game_over: false,
    }
}

pub fn handle_turn(state: &ChicagoState, dice: &[u8]) -> EngineResult<ChicagoState> {
    if state.is_game_over { return Err(EngineError::GameOver); }
    rules::check_dice(Variant::Chicago, dice, 2, 2)?;
    if state.has_scored { return Ok(state.clone()); }
    let points = rules::chicago_score(dice, state.current_round);
    if points == 0 { return Ok(state.clone()); }
    debug!(round = state.current_round, points, "chicago: target hit");
    let mut next = state.clone();
    next.round_scores.insert(state.current_round, points);
    next.total_score += points;
    next.round_score = points;
    next.has_scored = true;
    Ok(next)
}

/// Closes the current round. An unscored round is recorded as 0.
pub fn advance_round(state: &ChicagoState) -> EngineResult<ChicagoState> {
    if state.is_game_over { return Err(EngineError::GameOver); }
    let mut next = state.clone();
    next.round_scores.entry(state.current_round).or_insert(0);
    if state.current_round >= CHICAGO_LAST_ROUND {
        info!(total = state.total_score, "chicago: game over");
        next.is_game_over = true;
        return Ok(next);
    }
    next.current_round += 1;
    next.round_score = 0;
    next.has_scored = false;
    Ok(next)
}
