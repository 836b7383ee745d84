pub mod bot;
pub mod config;
pub mod error;
pub mod games;
pub mod model;
pub mod rng;
pub mod rules;
pub mod session;

pub use config::{AiConfig, EngineConfig};
pub use error::{EngineError, EngineResult};
pub use model::*;
pub use session::GameSession;

use games::{balut, chicago, custom, greed, mexico, pig};
use serde_json::json;
use tracing::debug;

pub fn initialize_game(variant: Variant, config: &EngineConfig) -> GameState {
    debug!(%variant, players = config.players, "new game");
    match variant {
        Variant::Pig => GameState::Pig(pig::initialize(config.players)),
        Variant::Greed => GameState::Greed(greed::initialize(config.players)),
        Variant::Mexico => GameState::Mexico(mexico::initialize(config.mexico_round_seconds)),
        Variant::Chicago => GameState::Chicago(chicago::initialize()),
        Variant::Balut => GameState::Balut(balut::initialize(config.players)),
        Variant::Custom => GameState::Custom(custom::initialize(config.players)),
    }
}

fn pass_or_end(state: &GameState, from: PlayerId) -> Event {
    if state.is_game_over() {
        Event::new(EventType::GameEnd, json!({ "winner": winner(state), "totals": totals(state) }))
    } else {
        Event::new(EventType::Pass, json!({ "from": from, "to": state.current_player() }))
    }
}

fn totals(state: &GameState) -> Vec<u32> {
    (0..state.players()).map(|p| state.total_for(p)).collect()
}

/// Applies one action and reports what happened. The input state is never
/// modified; rejected actions leave no trace.
pub fn apply(state: &GameState, action: &Action) -> EngineResult<(GameState, Vec<Event>)> {
    debug!(variant = %state.variant(), action = action.name(), "apply");
    let unsupported = || EngineError::UnsupportedAction { variant: state.variant(), action: action.name() };
    let mut events = Vec::new();

    let next = match (state, action) {
        (GameState::Pig(s), Action::Roll { dice, .. }) => {
            rules::check_dice(Variant::Pig, dice, 1, 1)?;
            let player = s.current_player_index;
            let n = pig::handle_turn(s, dice[0])?;
            events.push(Event::new(EventType::Roll, json!({ "player": player, "dice": dice, "turnScore": n.current_turn_score })));
            if dice[0] == rules::PIG_BUST_FACE {
                events.push(Event::new(EventType::Bust, json!({ "player": player, "lost": s.current_turn_score })));
                events.push(Event::new(EventType::Pass, json!({ "from": player, "to": n.current_player_index })));
            }
            GameState::Pig(n)
        }
        (GameState::Pig(s), Action::Bank) => {
            let player = s.current_player_index;
            let next = GameState::Pig(pig::bank_score(s)?);
            events.push(Event::new(EventType::Bank, json!({ "player": player, "banked": s.current_turn_score, "total": next.total_for(player) })));
            events.push(pass_or_end(&next, player));
            next
        }

        (GameState::Greed(s), Action::Roll { dice, held }) => {
            let player = s.current_player_index;
            let n = greed::handle_turn(s, dice, held)?;
            if n != *s {
                events.push(Event::new(EventType::Roll, json!({
                    "player": player, "dice": dice, "held": held,
                    "scoring": n.scoring_dice, "turnScore": n.current_turn_score
                })));
                if greed::is_bust(s, &n) {
                    events.push(Event::new(EventType::Bust, json!({ "player": player, "lost": s.current_turn_score })));
                } else if greed::is_hot_dice(s, &n) {
                    events.push(Event::new(EventType::HotDice, json!({ "player": player, "turnScore": n.current_turn_score })));
                }
            }
            GameState::Greed(n)
        }
        (GameState::Greed(s), Action::Bank) => {
            let player = s.current_player_index;
            let n = greed::bank_score(s)?;
            let committed = n.round_history.last().copied().unwrap_or(0);
            let next = GameState::Greed(n);
            events.push(Event::new(EventType::Bank, json!({
                "player": player, "turnScore": s.current_turn_score,
                "committed": committed, "total": next.total_for(player)
            })));
            events.push(pass_or_end(&next, player));
            next
        }

        (GameState::Mexico(s), Action::StartRound { now_ms }) => {
            let n = mexico::start_round(s, *now_ms)?;
            if !s.is_timer_running {
                events.push(Event::new(EventType::RoundAdvanced, json!({ "round": n.current_round_number, "seconds": n.round_time_seconds })));
            }
            GameState::Mexico(n)
        }
        (GameState::Mexico(s), Action::Roll { dice, .. }) => {
            let n = mexico::handle_turn(s, dice)?;
            let score = n.round_scores.last().copied().unwrap_or(0);
            events.push(Event::new(EventType::Roll, json!({ "round": n.current_round_number, "dice": dice, "score": score })));
            GameState::Mexico(n)
        }
        (GameState::Mexico(s), Action::Tick { now_ms }) => {
            let (n, expired) = mexico::tick(s, *now_ms)?;
            if expired {
                events.push(Event::new(EventType::RoundExpired, json!({ "round": n.current_round_number, "best": mexico::best_round_score(&n) })));
            }
            GameState::Mexico(n)
        }
        (GameState::Mexico(s), Action::Bank) => {
            let n = mexico::stand(s)?;
            events.push(Event::new(EventType::RoundExpired, json!({ "round": n.current_round_number, "best": mexico::best_round_score(&n), "stood": true })));
            GameState::Mexico(n)
        }
        (GameState::Mexico(s), Action::EndRound { opponent_score }) => {
            let n = mexico::end_round(s, *opponent_score)?;
            let ty = if n.lives < s.lives { EventType::RoundLost } else { EventType::RoundWon };
            events.push(Event::new(ty, json!({
                "round": s.current_round_number, "best": mexico::best_round_score(s),
                "opponentScore": opponent_score, "lives": n.lives
            })));
            if n.is_game_over {
                events.push(Event::new(EventType::GameEnd, json!({ "highestScore": n.highest_score, "lives": n.lives })));
            }
            GameState::Mexico(n)
        }

        (GameState::Chicago(s), Action::Roll { dice, .. }) => {
            let n = chicago::handle_turn(s, dice)?;
            let points = if n.has_scored && !s.has_scored { n.round_score } else { 0 };
            events.push(Event::new(EventType::Roll, json!({ "round": s.current_round, "dice": dice, "points": points })));
            GameState::Chicago(n)
        }
        (GameState::Chicago(s), Action::Bank) => {
            let n = chicago::advance_round(s)?;
            if n.is_game_over {
                events.push(Event::new(EventType::GameEnd, json!({ "total": n.total_score, "rounds": n.round_scores })));
            } else {
                events.push(Event::new(EventType::RoundAdvanced, json!({ "finished": s.current_round, "points": s.round_score, "round": n.current_round })));
            }
            GameState::Chicago(n)
        }

        (GameState::Balut(s), Action::Roll { dice, held }) => {
            let n = balut::handle_turn(s, dice, held)?;
            if n != *s {
                events.push(Event::new(EventType::Roll, json!({
                    "player": s.current_player_index, "dice": dice, "held": held, "rollsLeft": n.rolls_left
                })));
            }
            GameState::Balut(n)
        }
        (GameState::Balut(s), Action::ScoreCategory { dice, category }) => {
            let player = s.current_player_index;
            let n = balut::score_category(s, dice, *category)?;
            let points = n.player_scores.get(&player).and_then(|c| c.get(category)).copied().unwrap_or(0);
            let round = n.current_round;
            let advanced = round != s.current_round && !n.is_game_over;
            let next = GameState::Balut(n);
            events.push(Event::new(EventType::CategoryScored, json!({
                "player": player, "category": category, "points": points, "total": next.total_for(player)
            })));
            if advanced {
                events.push(Event::new(EventType::RoundAdvanced, json!({ "round": round })));
            }
            events.push(pass_or_end(&next, player));
            next
        }

        (GameState::Custom(s), Action::Roll { dice, .. }) => {
            let n = custom::handle_turn(s, dice)?;
            let total: u32 = dice.iter().map(|&f| f as u32).sum();
            events.push(Event::new(EventType::Roll, json!({ "dice": dice, "total": total })));
            GameState::Custom(n)
        }
        (GameState::Custom(s), edit) => {
            let n = match edit {
                Action::AddPlayer => custom::add_player(s)?,
                Action::RenamePlayer { player, name } => custom::update_player_name(s, *player, name)?,
                Action::AddScore { player, points } => custom::add_score(s, *player, *points)?,
                Action::AddNote { player, note } => custom::add_note(s, *player, note)?,
                Action::SetDiceCount { count } => custom::set_dice_count(s, *count)?,
                Action::SetGameName { name } => custom::set_game_name(s, name),
                Action::ResetScores => custom::reset_scores(s),
                _ => return Err(unsupported()),
            };
            events.push(Event::new(EventType::BoardEdited, json!({ "edit": edit.name(), "action": edit })));
            GameState::Custom(n)
        }

        _ => return Err(unsupported()),
    };
    Ok((next, events))
}

pub fn winner(state: &GameState) -> Option<PlayerId> {
    match state {
        GameState::Pig(s) => pig::winner(s),
        GameState::Greed(s) => greed::winner(s),
        GameState::Balut(s) => balut::winner(s),
        GameState::Mexico(_) | GameState::Chicago(_) | GameState::Custom(_) => None,
    }
}
