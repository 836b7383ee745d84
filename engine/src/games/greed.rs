//! Greed (10000): set scoring dice aside and reroll the rest, or bank.
//!
//! `dice` is always the whole table. Positions already set aside, either held
//! or scoring from an earlier roll of the same turn, keep their value and are
//! not scored again. A roll that scores nothing busts the turn; a roll that
//! leaves every die scoring or held is "hot dice" and frees the full table.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::model::{DieIndex, GreedState, PlayerId, Variant};
use crate::rules::{self, GREED_MAX_DICE, GREED_MIN_BANK, GREED_TARGET};

pub fn initialize(players: usize) -> GreedState {
    GreedState {
        player_scores: (0..players).map(|p| (p, 0)).collect(),
        current_player_index: 0,
        current_turn_score: 0,
        held_dice: BTreeSet::new(),
        scoring_dice: BTreeSet::new(),
        can_reroll: true,
        last_roll: vec![],
        round_history: vec![],
        is_game_over: false,
    }
}

/// Positions that were rolled fresh this time.
pub fn free_positions(state: &GreedState, dice: usize) -> Vec<DieIndex> {
    (0..dice)
        .filter(|i| !state.held_dice.contains(i) && !state.scoring_dice.contains(i))
        .collect()
}

pub fn handle_turn(state: &GreedState, dice: &[u8], held: &BTreeSet<DieIndex>) -> EngineResult<GreedState> {
    if state.is_game_over { return Err(EngineError::GameOver); }
    rules::check_dice(Variant::Greed, dice, 1, GREED_MAX_DICE)?;
    rules::check_indices(held, dice.len())?;
    if !state.can_reroll {
        debug!(player = state.current_player_index, "greed: reroll refused, turn must be banked");
        return Ok(state.clone());
    }

    let mut next = state.clone();
    next.last_roll = dice.to_vec();
    let free = free_positions(state, dice.len());
    if held.len() == dice.len() || free.is_empty() {
        next.held_dice = held.clone();
        next.can_reroll = false;
        return Ok(next);
    }

    let rolled: Vec<u8> = free.iter().map(|&i| dice[i]).collect();
    let (delta, scoring) = rules::greed_score(&rolled);
    if delta == 0 {
        info!(player = state.current_player_index, lost = state.current_turn_score, "greed: bust");
        next.current_turn_score = 0;
        next.can_reroll = false;
        next.held_dice.clear();
        next.scoring_dice.clear();
        return Ok(next);
    }

    next.current_turn_score += delta;
    next.scoring_dice.extend(scoring.iter().map(|&k| free[k]));
    if next.scoring_dice.union(held).count() == dice.len() {
        debug!(player = state.current_player_index, turn = next.current_turn_score, "greed: hot dice");
        next.held_dice.clear();
        next.scoring_dice.clear();
    } else {
        next.held_dice = held.clone();
    }
    next.can_reroll = true;
    Ok(next)
}

/// True when the last roll freed the whole table without banking.
pub fn is_hot_dice(before: &GreedState, after: &GreedState) -> bool {
    after.can_reroll
        && after.held_dice.is_empty()
        && after.scoring_dice.is_empty()
        && after.current_turn_score > before.current_turn_score
}

/// True when the last roll scored nothing and cost the turn.
pub fn is_bust(before: &GreedState, after: &GreedState) -> bool {
    before.can_reroll
        && !after.can_reroll
        && after.current_turn_score == 0
        && after.held_dice.is_empty()
        && after.scoring_dice.is_empty()
}

pub fn bank_score(state: &GreedState) -> EngineResult<GreedState> {
    if state.is_game_over { return Err(EngineError::GameOver); }
    let player = state.current_player_index;
    let banked = *state.player_scores.get(&player).ok_or(EngineError::UnknownPlayer(player))?;
    // the threshold only gates a player's first bank
    let on_the_board = banked > 0;
    let committed = if on_the_board || state.current_turn_score >= GREED_MIN_BANK { state.current_turn_score } else { 0 };
    if committed == 0 && state.current_turn_score > 0 {
        debug!(player, turn = state.current_turn_score, "greed: below the opening threshold");
    }
    let total = banked + committed;
    let mut next = state.clone();
    next.player_scores.insert(player, total);
    next.round_history.push(committed);
    next.current_turn_score = 0;
    next.held_dice.clear();
    next.scoring_dice.clear();
    next.last_roll.clear();
    next.can_reroll = true;
    next.current_player_index = rules::next_seat(player, state.player_scores.len());
    if total >= GREED_TARGET {
        info!(player, total, "greed: game won");
        next.is_game_over = true;
    }
    Ok(next)
}

pub fn winner(state: &GreedState) -> Option<PlayerId> {
    if !state.is_game_over { return None; }
    state.player_scores.iter().find(|(_, &s)| s >= GREED_TARGET).map(|(&p, _)| p)
}
