//! Free-form scoreboard: roll any number of dice, keep score by hand.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::model::{CustomState, PlayerId, Variant};
use crate::rules::{self, CUSTOM_MAX_DICE, CUSTOM_MAX_PLAYERS, CUSTOM_MIN_PLAYERS};

pub const DEFAULT_GAME_NAME: &str = "Custom Dice Game";

fn seat_name(player: PlayerId) -> String { format!("Player {}", player + 1) }

pub fn initialize(players: usize) -> CustomState {
    let seats = players.clamp(CUSTOM_MIN_PLAYERS, CUSTOM_MAX_PLAYERS);
    CustomState {
        game_name: DEFAULT_GAME_NAME.to_string(),
        player_names: (0..seats).map(|p| (p, seat_name(p))).collect(),
        player_scores: (0..seats).map(|p| (p, 0)).collect(),
        score_history: (0..seats).map(|p| (p, vec![])).collect(),
        notes: vec![],
        dice_count: CUSTOM_MAX_DICE,
        last_roll: vec![],
    }
}

fn seat(state: &CustomState, player: PlayerId) -> EngineResult<()> {
    if state.player_scores.contains_key(&player) { Ok(()) } else { Err(EngineError::UnknownPlayer(player)) }
}

/// Records the roll; scores are entered separately.
pub fn handle_turn(state: &CustomState, dice: &[u8]) -> EngineResult<CustomState> {
    rules::check_dice(Variant::Custom, dice, state.dice_count, state.dice_count)?;
    let total: u32 = dice.iter().map(|&f| f as u32).sum();
    debug!(?dice, total, "custom: rolled");
    Ok(CustomState { last_roll: dice.to_vec(), ..state.clone() })
}

pub fn add_player(state: &CustomState) -> EngineResult<CustomState> {
    if state.player_scores.len() >= CUSTOM_MAX_PLAYERS {
        return Err(EngineError::TooManyPlayers { max: CUSTOM_MAX_PLAYERS });
    }
    let player = state.player_scores.len();
    let mut next = state.clone();
    next.player_names.insert(player, seat_name(player));
    next.player_scores.insert(player, 0);
    next.score_history.insert(player, vec![]);
    Ok(next)
}

pub fn update_player_name(state: &CustomState, player: PlayerId, name: &str) -> EngineResult<CustomState> {
    seat(state, player)?;
    let mut next = state.clone();
    next.player_names.insert(player, name.to_string());
    Ok(next)
}

pub fn add_score(state: &CustomState, player: PlayerId, points: i32) -> EngineResult<CustomState> {
    seat(state, player)?;
    let mut next = state.clone();
    *next.player_scores.entry(player).or_insert(0) += points;
    next.score_history.entry(player).or_default().push(format!("Score: {points}"));
    Ok(next)
}

/// Notes land in the player's history and the board-wide log.
pub fn add_note(state: &CustomState, player: PlayerId, note: &str) -> EngineResult<CustomState> {
    seat(state, player)?;
    let mut next = state.clone();
    next.score_history.entry(player).or_default().push(note.to_string());
    let name = next.player_names.get(&player).cloned().unwrap_or_else(|| seat_name(player));
    next.notes.push(format!("{name}: {note}"));
    Ok(next)
}

pub fn set_dice_count(state: &CustomState, count: usize) -> EngineResult<CustomState> {
    if !(1..=CUSTOM_MAX_DICE).contains(&count) {
        return Err(EngineError::InvalidDiceCount { variant: Variant::Custom, min: 1, max: CUSTOM_MAX_DICE, actual: count });
    }
    Ok(CustomState { dice_count: count, last_roll: vec![], ..state.clone() })
}

pub fn set_game_name(state: &CustomState, name: &str) -> CustomState {
    CustomState { game_name: name.to_string(), ..state.clone() }
}

/// Zeroes the board but keeps the seats, their names, the dice count and the game name.
pub fn reset_scores(state: &CustomState) -> CustomState {
    CustomState {
        player_scores: state.player_scores.keys().map(|&p| (p, 0)).collect(),
        score_history: state.player_scores.keys().map(|&p| (p, vec![])).collect::<BTreeMap<_, _>>(),
        notes: vec![],
        last_roll: vec![],
        ..state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_two_named_seats() {
        let state = initialize(2);
        assert_eq!(state.player_names[&0], "Player 1");
        assert_eq!(state.player_names[&1], "Player 2");
        assert_eq!(state.dice_count, 6);
        assert_eq!(state.game_name, DEFAULT_GAME_NAME);
    }

    #[test]
    fn seats_are_capped_at_six() {
        let mut state = initialize(2);
        for _ in 0..4 { state = add_player(&state).unwrap(); }
        assert_eq!(state.player_names[&5], "Player 6");
        assert_eq!(add_player(&state), Err(EngineError::TooManyPlayers { max: 6 }));
    }

    #[test]
    fn scores_keep_a_history() {
        let state = add_score(&initialize(2), 1, 12).unwrap();
        let state = add_score(&state, 1, -4).unwrap();
        assert_eq!(state.player_scores[&1], 8);
        assert_eq!(state.score_history[&1], vec!["Score: 12", "Score: -4"]);
        assert_eq!(add_score(&state, 9, 1), Err(EngineError::UnknownPlayer(9)));
    }

    #[test]
    fn notes_and_names() {
        let state = update_player_name(&initialize(2), 0, "Ada").unwrap();
        let state = add_note(&state, 0, "doubled up").unwrap();
        assert_eq!(state.score_history[&0], vec!["doubled up"]);
        assert_eq!(state.notes, vec!["Ada: doubled up"]);
    }

    #[test]
    fn roll_must_match_the_dice_count() {
        let state = set_dice_count(&initialize(2), 3).unwrap();
        assert_eq!(handle_turn(&state, &[1, 2, 3]).unwrap().last_roll, vec![1, 2, 3]);
        assert!(matches!(handle_turn(&state, &[1, 2]), Err(EngineError::InvalidDiceCount { actual: 2, .. })));
        assert!(set_dice_count(&state, 0).is_err());
        assert!(set_dice_count(&state, 7).is_err());
    }

    #[test]
    fn reset_keeps_the_table() {
        let state = add_player(&initialize(2)).unwrap();
        let state = set_game_name(&update_player_name(&state, 2, "Cy").unwrap(), "Farkle night");
        let state = set_dice_count(&add_score(&state, 2, 30).unwrap(), 4).unwrap();
        let reset = reset_scores(&state);
        assert_eq!(reset.player_scores.values().copied().collect::<Vec<_>>(), vec![0, 0, 0]);
        assert!(reset.score_history.values().all(|h| h.is_empty()));
        assert_eq!(reset.player_names[&2], "Cy");
        assert_eq!(reset.dice_count, 4);
        assert_eq!(reset.game_name, "Farkle night");
    }
}
