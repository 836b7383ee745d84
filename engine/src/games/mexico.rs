//! Mexico: a timed round of two-dice rolls against an opponent score.
//!
//! The round starts a countdown; rolls are collected until the player stands
//! or the clock runs out, then the best roll (by [`rules::mexico_rank`]) is
//! compared with the opponent's. A strictly worse roll costs a life.

use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::model::{MexicoState, MexicoStatus, Variant};
use crate::rules::{self, MEXICO_LIVES, MEXICO_MAX_ROUNDS};

pub fn initialize(round_seconds: u32) -> MexicoState {
    MexicoState {
        lives: MEXICO_LIVES,
        round_scores: vec![],
        current_round_number: 1,
        is_timer_running: false,
        round_time_seconds: round_seconds,
        round_length_seconds: round_seconds,
        round_started_at_ms: None,
        highest_score: 0,
        is_game_over: false,
        game_status: MexicoStatus::Waiting,
    }
}

fn ensure_live(state: &MexicoState) -> EngineResult<()> {
    if state.is_game_over { Err(EngineError::GameOver) } else { Ok(()) }
}

/// Starts the countdown. Starting a round that is already running is a no-op.
pub fn start_round(state: &MexicoState, now_ms: u64) -> EngineResult<MexicoState> {
    ensure_live(state)?;
    if state.is_timer_running { return Ok(state.clone()); }
    debug!(round = state.current_round_number, now_ms, "mexico: round started");
    Ok(MexicoState {
        round_scores: vec![],
        is_timer_running: true,
        round_time_seconds: state.round_length_seconds,
        round_started_at_ms: Some(now_ms),
        game_status: MexicoStatus::Rolling,
        ..state.clone()
    })
}

pub fn handle_turn(state: &MexicoState, dice: &[u8]) -> EngineResult<MexicoState> {
    ensure_live(state)?;
    rules::check_dice(Variant::Mexico, dice, 2, 2)?;
    if !state.is_timer_running {
        debug!(round = state.current_round_number, "mexico: roll outside a running round");
        return Err(EngineError::RoundNotRunning);
    }
    let score = rules::mexico_score(dice[0], dice[1]);
    let mut next = state.clone();
    next.round_scores.push(score);
    next.game_status = MexicoStatus::Rolling;
    Ok(next)
}

/// Recomputes the seconds left; the flag is true when this tick ran the clock out.
pub fn tick(state: &MexicoState, now_ms: u64) -> EngineResult<(MexicoState, bool)> {
    ensure_live(state)?;
    let started = match (state.is_timer_running, state.round_started_at_ms) {
        (true, Some(at)) => at,
        _ => return Ok((state.clone(), false)),
    };
    let elapsed = (now_ms.saturating_sub(started) / 1000).min(u32::MAX as u64) as u32;
    let mut next = state.clone();
    next.round_time_seconds = state.round_length_seconds.saturating_sub(elapsed);
    let expired = next.round_time_seconds == 0;
    if expired {
        debug!(round = state.current_round_number, "mexico: round timer expired");
        next.is_timer_running = false;
    }
    Ok((next, expired))
}

/// Stops the clock early; the round still has to be settled with [`end_round`].
pub fn stand(state: &MexicoState) -> EngineResult<MexicoState> {
    ensure_live(state)?;
    Ok(MexicoState { is_timer_running: false, ..state.clone() })
}

pub fn best_round_score(state: &MexicoState) -> Option<u32> {
    state.round_scores.iter().copied().max_by_key(|&s| rules::mexico_rank(s))
}

pub fn end_round(state: &MexicoState, opponent_score: u32) -> EngineResult<MexicoState> {
    ensure_live(state)?;
    let best = best_round_score(state);
    let won = best.map_or(false, |b| rules::mexico_rank(b) >= rules::mexico_rank(opponent_score));
    let mut next = state.clone();
    next.is_timer_running = false;
    match best {
        Some(b) if won => {
            if rules::mexico_rank(b) > rules::mexico_rank(next.highest_score) { next.highest_score = b; }
            next.game_status = MexicoStatus::RoundWon;
        }
        _ => {
            next.lives = next.lives.saturating_sub(1);
            next.game_status = MexicoStatus::RoundLost;
        }
    }
    info!(round = state.current_round_number, best = ?best, opponent_score, won, lives = next.lives, "mexico: round settled");

    if next.lives == 0 || state.current_round_number >= MEXICO_MAX_ROUNDS {
        info!(highest = next.highest_score, lives = next.lives, "mexico: game over");
        next.is_game_over = true;
        next.game_status = MexicoStatus::GameOver;
    } else {
        next.current_round_number += 1;
        next.round_scores.clear();
        next.round_time_seconds = next.round_length_seconds;
        next.round_started_at_ms = None;
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolls_collect_scores() {
        let s = start_round(&initialize(15), 0).unwrap();
        let s = handle_turn(&s, &[2, 1]).unwrap();
        let s = handle_turn(&s, &[4, 4]).unwrap();
        let s = handle_turn(&s, &[3, 5]).unwrap();
        assert_eq!(s.round_scores, vec![21, 44, 53]);
        assert_eq!(best_round_score(&s), Some(21));
        assert_eq!(s.game_status, MexicoStatus::Rolling);
    }

    #[test]
    fn timer_counts_down_and_expires() {
        let s = start_round(&initialize(15), 1_000).unwrap();
        let (s, expired) = tick(&s, 5_500).unwrap();
        assert!(!expired);
        assert_eq!(s.round_time_seconds, 11);
        let (s, expired) = tick(&s, 16_000).unwrap();
        assert!(expired);
        assert!(!s.is_timer_running);
        assert_eq!(s.round_time_seconds, 0);
        // a stopped clock never expires twice
        let (_, again) = tick(&s, 20_000).unwrap();
        assert!(!again);
    }

    #[test]
    fn worse_roll_costs_a_life() {
        let s = handle_turn(&start_round(&initialize(15), 0).unwrap(), &[3, 1]).unwrap();
        let next = end_round(&s, 54).unwrap();
        assert_eq!(next.lives, MEXICO_LIVES - 1);
        assert_eq!(next.game_status, MexicoStatus::RoundLost);
        assert_eq!(next.current_round_number, 2);
        assert!(next.round_scores.is_empty());
    }

    #[test]
    fn doubles_beat_a_high_plain_roll() {
        let s = handle_turn(&start_round(&initialize(15), 0).unwrap(), &[1, 1]).unwrap();
        let next = end_round(&s, 65).unwrap();
        assert_eq!(next.lives, MEXICO_LIVES);
        assert_eq!(next.game_status, MexicoStatus::RoundWon);
        assert_eq!(next.highest_score, 11);
    }

    #[test]
    fn an_empty_round_is_lost() {
        let s = start_round(&initialize(15), 0).unwrap();
        assert_eq!(end_round(&s, 21).unwrap().lives, MEXICO_LIVES - 1);
    }

    #[test]
    fn sixth_round_ends_the_game() {
        let mut s = initialize(15);
        for _ in 0..MEXICO_MAX_ROUNDS {
            s = start_round(&s, 0).unwrap();
            s = handle_turn(&s, &[2, 1]).unwrap();
            s = end_round(&s, 30).unwrap();
        }
        assert!(s.is_game_over);
        assert_eq!(s.game_status, MexicoStatus::GameOver);
        assert_eq!(s.current_round_number, MEXICO_MAX_ROUNDS);
        assert_eq!(s.highest_score, 21);
        assert_eq!(handle_turn(&s, &[1, 1]), Err(EngineError::GameOver));
    }

    #[test]
    fn losing_every_life_ends_the_game_early() {
        let mut s = MexicoState { lives: 1, ..initialize(15) };
        s = end_round(&s, 21).unwrap();
        assert_eq!(s.lives, 0);
        assert!(s.is_game_over);
        assert_eq!(s.current_round_number, 1);
    }

    #[test]
    fn rolls_need_a_running_round() {
        assert_eq!(handle_turn(&initialize(15), &[2, 1]), Err(EngineError::RoundNotRunning));

        let s = handle_turn(&start_round(&initialize(15), 0).unwrap(), &[3, 1]).unwrap();
        let (s, expired) = tick(&s, 15_000).unwrap();
        assert!(expired);
        assert_eq!(handle_turn(&s, &[2, 1]), Err(EngineError::RoundNotRunning));
        assert_eq!(best_round_score(&s), Some(31));

        let stood = stand(&start_round(&initialize(15), 0).unwrap()).unwrap();
        assert_eq!(handle_turn(&stood, &[4, 4]), Err(EngineError::RoundNotRunning));
    }

    #[test]
    fn rejects_a_single_die() {
        assert!(matches!(
            handle_turn(&initialize(15), &[3]),
            Err(EngineError::InvalidDiceCount { actual: 1, .. })
        ));
    }
}
