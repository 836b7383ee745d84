mod common;

use std::collections::BTreeSet;

use dice_engine::rules::{balut_score, mexico_score};
use dice_engine::*;

fn start(variant: Variant) -> GameState {
    common::init_logging();
    initialize_game(variant, &EngineConfig::default())
}

fn kinds(events: &[Event]) -> Vec<EventType> { events.iter().map(|e| e.ty).collect() }

#[test]
fn pig_one_loses_the_turn() {
    let mut state = start(Variant::Pig);
    if let GameState::Pig(s) = &mut state { s.current_turn_score = 12; }
    let (next, events) = apply(&state, &Action::roll(vec![1])).unwrap();
    let GameState::Pig(s) = &next else { panic!("variant changed") };
    assert_eq!(s.current_turn_score, 0);
    assert_eq!(s.current_player_index, 1);
    assert_eq!(s.player_scores[&0], 0);
    assert_eq!(kinds(&events), vec![EventType::Roll, EventType::Bust, EventType::Pass]);
}

#[test]
fn pig_bank_past_one_hundred_wins() {
    let mut state = start(Variant::Pig);
    if let GameState::Pig(s) = &mut state {
        s.player_scores.insert(0, 95);
        s.current_turn_score = 10;
    }
    let (next, events) = apply(&state, &Action::Bank).unwrap();
    assert_eq!(next.total_for(0), 105);
    assert!(next.is_game_over());
    assert_eq!(winner(&next), Some(0));
    assert_eq!(events.last().map(|e| e.ty), Some(EventType::GameEnd));
    assert_eq!(events.last().unwrap().payload["winner"], 0);
    assert_eq!(apply(&next, &Action::roll(vec![3])), Err(EngineError::GameOver));
}

#[test]
fn greed_bust_wipes_the_turn() {
    let mut state = start(Variant::Greed);
    if let GameState::Greed(s) = &mut state { s.current_turn_score = 500; }
    let (next, events) = apply(&state, &Action::roll(vec![2, 2, 3, 4, 4])).unwrap();
    let GameState::Greed(s) = &next else { panic!("variant changed") };
    assert_eq!(s.current_turn_score, 0);
    assert!(!s.can_reroll);
    assert!(events.iter().any(|e| e.ty == EventType::Bust));
}

#[test]
fn greed_five_ones_are_hot_dice() {
    let mut state = start(Variant::Greed);
    if let GameState::Greed(s) = &mut state { s.current_turn_score = 500; }
    let (next, events) = apply(&state, &Action::roll(vec![1, 1, 1, 1, 1])).unwrap();
    let GameState::Greed(s) = &next else { panic!("variant changed") };
    assert_eq!(s.current_turn_score, 2500);
    assert!(s.held_dice.is_empty());
    assert!(s.can_reroll);
    assert_eq!(kinds(&events), vec![EventType::Roll, EventType::HotDice]);
}

#[test]
fn greed_small_bank_passes_without_points() {
    let state = start(Variant::Greed);
    // a straight is worth 1500 on its own
    let (state, _) = apply(&state, &Action::roll(vec![1, 5, 2, 3, 4, 6])).unwrap();
    assert_eq!(state.total_for(0), 0);
    let (state, events) = apply(&state, &Action::Bank).unwrap();
    assert_eq!(state.total_for(0), 1500);
    assert_eq!(state.current_player(), Some(1));
    assert_eq!(events[0].payload["committed"], 1500);

    let (state, _) = apply(&state, &Action::roll(vec![5, 2, 2, 3, 4, 6])).unwrap();
    let (state, events) = apply(&state, &Action::Bank).unwrap();
    assert_eq!(state.total_for(1), 0);
    assert_eq!(events[0].payload["committed"], 0);
    assert_eq!(state.current_player(), Some(0));
}

#[test]
fn balut_number_and_full_house_scores() {
    assert_eq!(balut_score(&[6, 6, 6, 2, 1], Category::Sixes), 18);
    assert_eq!(balut_score(&[2, 2, 2, 3, 3], Category::FullHouse), 35);
    assert_eq!(balut_score(&[1, 1, 2, 3, 4], Category::Ones), 2);
    assert_eq!(balut_score(&[4, 4, 4, 4, 4], Category::FiveOfAKind), 50);
}

#[test]
fn balut_scoring_through_the_reducer() {
    let state = start(Variant::Balut);
    let held: BTreeSet<usize> = [0, 1, 2].into_iter().collect();
    let (state, _) = apply(&state, &Action::Roll { dice: vec![6, 6, 6, 2, 1], held: held.clone() }).unwrap();
    let GameState::Balut(s) = &state else { panic!("variant changed") };
    assert_eq!(s.rolls_left, 2);
    assert_eq!(s.held_dice, held);

    let action = Action::ScoreCategory { dice: vec![6, 6, 6, 2, 1], category: Category::Sixes };
    let (state, events) = apply(&state, &action).unwrap();
    assert_eq!(events[0].ty, EventType::CategoryScored);
    assert_eq!(events[0].payload["category"], "Sixes");
    assert_eq!(events[0].payload["points"], 18);
    let GameState::Balut(s) = &state else { panic!("variant changed") };
    assert_eq!(s.current_player_index, 1);
    assert_eq!(s.rolls_left, 3);
    assert!(s.held_dice.is_empty());
}

#[test]
fn balut_last_category_finishes_the_game() {
    let mut state = start(Variant::Balut);
    if let GameState::Balut(s) = &mut state {
        for c in Category::ALL {
            s.player_scores.get_mut(&1).unwrap().insert(c, 0);
            if c != Category::Choice { s.player_scores.get_mut(&0).unwrap().insert(c, 0); }
        }
        s.current_round = 11;
    }
    let action = Action::ScoreCategory { dice: vec![1, 2, 3, 4, 5], category: Category::Choice };
    let (state, events) = apply(&state, &action).unwrap();
    assert!(state.is_game_over());
    assert_eq!(state.total_for(0), 15);
    assert_eq!(winner(&state), Some(0));
    assert_eq!(events.last().map(|e| e.ty), Some(EventType::GameEnd));
}

#[test]
fn chicago_round_five() {
    let mut state = start(Variant::Chicago);
    if let GameState::Chicago(s) = &mut state { s.current_round = 5; }
    let (hit, _) = apply(&state, &Action::roll(vec![1, 4])).unwrap();
    let GameState::Chicago(s) = &hit else { panic!("variant changed") };
    assert_eq!(s.round_scores.get(&5), Some(&5));
    assert!(s.has_scored);

    let (miss, events) = apply(&state, &Action::roll(vec![3, 4])).unwrap();
    assert_eq!(miss, state);
    assert_eq!(events[0].payload["points"], 0);
}

#[test]
fn chicago_bank_moves_to_the_next_target() {
    let state = start(Variant::Chicago);
    let (state, events) = apply(&state, &Action::Bank).unwrap();
    assert_eq!(events[0].ty, EventType::RoundAdvanced);
    assert_eq!(events[0].payload["round"], 3);
    let GameState::Chicago(s) = &state else { panic!("variant changed") };
    assert_eq!(s.round_scores.get(&2), Some(&0));
}

#[test]
fn mexico_values() {
    assert_eq!(mexico_score(2, 1), 21);
    assert_eq!(mexico_score(4, 4), 44);
    assert_eq!(mexico_score(5, 3), 53);
}

#[test]
fn mexico_round_lifecycle() {
    let state = start(Variant::Mexico);
    let (state, events) = apply(&state, &Action::StartRound { now_ms: 0 }).unwrap();
    assert_eq!(kinds(&events), vec![EventType::RoundAdvanced]);
    let (state, _) = apply(&state, &Action::roll(vec![3, 1])).unwrap();
    let (state, events) = apply(&state, &Action::Tick { now_ms: 20_000 }).unwrap();
    assert_eq!(kinds(&events), vec![EventType::RoundExpired]);
    let (state, events) = apply(&state, &Action::EndRound { opponent_score: 42 }).unwrap();
    assert_eq!(kinds(&events), vec![EventType::RoundLost]);
    let GameState::Mexico(s) = &state else { panic!("variant changed") };
    assert_eq!(s.lives, 5);
    assert_eq!(s.current_round_number, 2);
    assert_eq!(s.game_status, MexicoStatus::RoundLost);
}

#[test]
fn mexico_rolls_outside_the_clock_are_refused() {
    let state = start(Variant::Mexico);
    assert_eq!(apply(&state, &Action::roll(vec![2, 1])).map(|_| ()), Err(EngineError::RoundNotRunning));

    let (state, _) = apply(&state, &Action::StartRound { now_ms: 0 }).unwrap();
    let (state, _) = apply(&state, &Action::roll(vec![3, 1])).unwrap();
    let (state, events) = apply(&state, &Action::Tick { now_ms: 15_000 }).unwrap();
    assert_eq!(kinds(&events), vec![EventType::RoundExpired]);
    assert_eq!(apply(&state, &Action::roll(vec![2, 1])).map(|_| ()), Err(EngineError::RoundNotRunning));

    // the late roll did not count: 31 loses to 42
    let (state, events) = apply(&state, &Action::EndRound { opponent_score: 42 }).unwrap();
    assert_eq!(kinds(&events), vec![EventType::RoundLost]);
    assert_eq!(events[0].payload["best"], 31);
    let GameState::Mexico(s) = &state else { panic!("variant changed") };
    assert_eq!(s.lives, 5);
}

#[test]
fn greed_small_banks_count_after_the_opening() {
    let mut state = start(Variant::Greed);
    if let GameState::Greed(s) = &mut state {
        s.player_scores.insert(0, 7600);
        s.current_turn_score = 600;
    }
    let (state, events) = apply(&state, &Action::Bank).unwrap();
    assert_eq!(events[0].payload["committed"], 600);
    assert_eq!(state.total_for(0), 8200);
}

#[test]
fn custom_board_edits() {
    let state = start(Variant::Custom);
    let (state, _) = apply(&state, &Action::AddPlayer).unwrap();
    let (state, _) = apply(&state, &Action::RenamePlayer { player: 2, name: "Mo".into() }).unwrap();
    let (state, _) = apply(&state, &Action::AddScore { player: 2, points: 25 }).unwrap();
    let (state, _) = apply(&state, &Action::SetDiceCount { count: 2 }).unwrap();
    let (state, events) = apply(&state, &Action::roll(vec![6, 5])).unwrap();
    assert_eq!(events[0].payload["total"], 11);
    assert_eq!(state.total_for(2), 25);
    assert_eq!(
        apply(&state, &Action::roll(vec![6, 5, 4])).map(|_| ()),
        Err(EngineError::InvalidDiceCount { variant: Variant::Custom, min: 2, max: 2, actual: 3 })
    );
    let (state, _) = apply(&state, &Action::ResetScores).unwrap();
    let GameState::Custom(s) = &state else { panic!("variant changed") };
    assert_eq!(s.player_names[&2], "Mo");
    assert_eq!(s.player_scores[&2], 0);
}

#[test]
fn variant_names_parse() {
    assert_eq!("greed / 10000".parse::<Variant>(), Ok(Variant::Greed));
    assert_eq!("BALUT".parse::<Variant>(), Ok(Variant::Balut));
    assert_eq!("yahtzee".parse::<Variant>(), Err(EngineError::InvalidVariant("yahtzee".into())));
    assert_eq!("full house".parse::<Category>(), Ok(Category::FullHouse));
}
