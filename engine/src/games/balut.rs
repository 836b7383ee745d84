//! Balut: five dice, three rolls a turn, eleven one-shot categories per player.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::model::{BalutState, Category, DieIndex, PlayerId, Variant};
use crate::rules::{self, BALUT_DICE, BALUT_MAX_ROLLS};

pub fn initialize(players: usize) -> BalutState {
    BalutState {
        player_scores: (0..players).map(|p| (p, BTreeMap::new())).collect(),
        current_player_index: 0,
        first_player: 0,
        current_round: 1,
        rolls_left: BALUT_MAX_ROLLS,
        held_dice: BTreeSet::new(),
        last_roll: vec![],
        is_game_over: false,
    }
}

/// Spends one roll. Out of rolls the call returns the state unchanged.
pub fn handle_turn(state: &BalutState, dice: &[u8], held: &BTreeSet<DieIndex>) -> EngineResult<BalutState> {
    if state.rolls_left == 0 { return Ok(state.clone()); }
    if state.is_game_over { return Err(EngineError::GameOver); }
    rules::check_dice(Variant::Balut, dice, BALUT_DICE, BALUT_DICE)?;
    rules::check_indices(held, dice.len())?;
    let mut next = state.clone();
    next.rolls_left -= 1;
    next.held_dice = held.clone();
    next.last_roll = dice.to_vec();
    Ok(next)
}

pub fn score_category(state: &BalutState, dice: &[u8], category: Category) -> EngineResult<BalutState> {
    if state.is_game_over { return Err(EngineError::GameOver); }
    rules::check_dice(Variant::Balut, dice, BALUT_DICE, BALUT_DICE)?;
    let player = state.current_player_index;
    let filled = state.player_scores.get(&player).ok_or(EngineError::UnknownPlayer(player))?;
    if filled.contains_key(&category) {
        return Err(EngineError::CategoryAlreadyScored { player, category });
    }

    let points = rules::balut_score(dice, category);
    debug!(player, %category, points, "balut: category scored");
    let mut next = state.clone();
    next.player_scores.entry(player).or_default().insert(category, points);
    next.current_player_index = rules::next_seat(player, state.player_scores.len());
    next.rolls_left = BALUT_MAX_ROLLS;
    next.held_dice.clear();
    next.last_roll.clear();
    if next.current_player_index == state.first_player { next.current_round += 1; }

    if next.player_scores.values().all(|c| c.len() == Category::ALL.len()) {
        info!(round = next.current_round, "balut: every category filled");
        next.is_game_over = true;
    }
    Ok(next)
}

pub fn available_categories(state: &BalutState, player: PlayerId) -> Vec<Category> {
    let filled = state.player_scores.get(&player);
    Category::ALL
        .iter()
        .copied()
        .filter(|c| filled.map_or(true, |f| !f.contains_key(c)))
        .collect()
}

pub fn player_total(state: &BalutState, player: PlayerId) -> u32 {
    state.player_scores.get(&player).map_or(0, |c| c.values().sum())
}

/// Highest card once the board is full; a shared top score has no winner.
pub fn winner(state: &BalutState) -> Option<PlayerId> {
    if !state.is_game_over { return None; }
    let best = state.player_scores.keys().map(|&p| player_total(state, p)).max()?;
    let mut leaders = state.player_scores.keys().copied().filter(|&p| player_total(state, p) == best);
    match (leaders.next(), leaders.next()) {
        (Some(p), None) => Some(p),
        _ => None,
    }
}
