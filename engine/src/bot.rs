use rand::Rng;

use crate::games::{balut, mexico};
use crate::model::{AiDecision, BalutState, Category, DieIndex, GameState, PlayerId, Variant};
use crate::rules::{self, GREED_TARGET, PIG_TARGET};

/// What the bot gets to see before deciding.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AiView {
    pub current_score: u32,
    pub turn_score: u32,
    pub dice: Vec<u8>,
    pub opponent_score: u32,
    pub target: u32,
}

pub fn decide<R: Rng + ?Sized>(variant: Variant, view: &AiView, rng: &mut R) -> AiDecision {
    if view.dice.is_empty() { return AiDecision::Roll; }
    match variant {
        Variant::Pig => pig_policy(view, rng),
        Variant::Greed => greed_policy(view),
        Variant::Mexico => mexico_policy(view, rng),
        Variant::Chicago => chicago_policy(view, rng),
        Variant::Balut => balut_policy(&view.dice),
        Variant::Custom => AiDecision::Roll,
    }
}

fn pig_policy<R: Rng + ?Sized>(v: &AiView, rng: &mut R) -> AiDecision {
    let last = v.dice.last().copied().unwrap_or(0);
    if last == rules::PIG_BUST_FACE { return AiDecision::Bank; }
    if v.turn_score >= PIG_TARGET || v.current_score + v.turn_score >= PIG_TARGET { return AiDecision::Bank; }
    if v.opponent_score >= 80 {
        return if v.turn_score < 20 { AiDecision::Roll } else { AiDecision::Bank };
    }
    if v.turn_score >= 20 && (last <= 3 || rng.gen_bool(0.7)) { return AiDecision::Bank; }
    if v.turn_score >= 25 { AiDecision::Bank } else { AiDecision::Roll }
}

fn greed_policy(v: &AiView) -> AiDecision {
    if rules::greed_score(&v.dice).0 == 0 { return AiDecision::Bank; }
    if v.opponent_score >= 8000 { return AiDecision::Roll; }
    if v.current_score + v.turn_score >= GREED_TARGET { return AiDecision::Bank; }
    let enough = match v.current_score {
        s if s >= 7500 => 500,
        s if s >= 5000 => 1000,
        _ => 2000,
    };
    if v.turn_score >= enough { AiDecision::Bank } else { AiDecision::Roll }
}

fn mexico_policy<R: Rng + ?Sized>(v: &AiView, rng: &mut R) -> AiDecision {
    if v.dice.len() < 2 { return AiDecision::Roll; }
    let score = rules::mexico_score(v.dice[0], v.dice[1]);
    if score == rules::MEXICO || score >= 65 { return AiDecision::Bank; }
    if score >= 53 && rng.gen_bool(0.8) { return AiDecision::Bank; }
    if score <= 31 { return AiDecision::Roll; }
    if rng.gen_bool(0.6) { AiDecision::Bank } else { AiDecision::Roll }
}

fn chicago_policy<R: Rng + ?Sized>(v: &AiView, rng: &mut R) -> AiDecision {
    let sum: u32 = v.dice.iter().map(|&f| f as u32).sum();
    if sum == v.target { return AiDecision::Bank; }
    if v.dice.len() >= 2 && rng.gen_bool(0.7) { AiDecision::Bank } else { AiDecision::Roll }
}

fn balut_policy(dice: &[u8]) -> AiDecision {
    let counts = rules::face_counts(dice);
    let made = counts.iter().any(|&c| c == dice.len())
        || counts.iter().any(|&c| c >= 4)
        || rules::is_full_house(&counts)
        || rules::is_low_straight(dice)
        || rules::is_high_straight(dice);
    if made { AiDecision::Bank } else { AiDecision::SelectDice(best_dice_to_keep(dice)) }
}

/// Dice worth keeping for the next Balut roll: a set of three or more,
/// else one of each face when four or more faces show (a straight draw).
pub fn best_dice_to_keep(dice: &[u8]) -> Vec<DieIndex> {
    let counts = rules::face_counts(dice);
    // ties go to the higher face
    let (face, most) = (1..=6u8).map(|f| (f, counts[f as usize])).max_by_key(|&(f, c)| (c, f)).unwrap_or((0, 0));
    if most >= 3 {
        return dice.iter().enumerate().filter(|(_, &f)| f == face).map(|(i, _)| i).collect();
    }
    if counts.iter().filter(|&&c| c > 0).count() >= 4 {
        let mut seen = [false; 7];
        return dice
            .iter()
            .enumerate()
            .filter(|(_, &f)| rules::is_face(f) && !std::mem::replace(&mut seen[f as usize], true))
            .map(|(i, _)| i)
            .collect();
    }
    vec![]
}

/// Best open category for the player to move; earlier categories win ties.
pub fn choose_balut_category(state: &BalutState, dice: &[u8]) -> Option<Category> {
    let mut best: Option<(Category, u32)> = None;
    for c in balut::available_categories(state, state.current_player_index) {
        let points = rules::balut_score(dice, c);
        if best.map_or(true, |(_, b)| points > b) { best = Some((c, points)); }
    }
    best.map(|(c, _)| c)
}

fn best_opponent(state: &GameState, me: PlayerId) -> u32 {
    (0..state.players()).filter(|&p| p != me).map(|p| state.total_for(p)).max().unwrap_or(0)
}

/// Decision for whoever is to move. `last_dice` is the most recent roll the
/// caller saw; variants that keep their own table ignore it.
pub fn decide_for_state<R: Rng + ?Sized>(state: &GameState, last_dice: &[u8], rng: &mut R) -> AiDecision {
    let me = state.current_player().unwrap_or(0);
    let view = match state {
        GameState::Pig(s) => AiView {
            current_score: state.total_for(me),
            turn_score: s.current_turn_score,
            dice: last_dice.to_vec(),
            opponent_score: best_opponent(state, me),
            target: PIG_TARGET,
        },
        GameState::Greed(s) => {
            if !s.can_reroll && !s.last_roll.is_empty() { return AiDecision::Bank; }
            AiView {
                current_score: state.total_for(me),
                turn_score: s.current_turn_score,
                dice: s.last_roll.clone(),
                opponent_score: best_opponent(state, me),
                target: GREED_TARGET,
            }
        }
        GameState::Mexico(s) => AiView {
            current_score: s.highest_score,
            turn_score: mexico::best_round_score(s).unwrap_or(0),
            dice: if s.round_scores.is_empty() { vec![] } else { last_dice.to_vec() },
            opponent_score: 0,
            target: rules::MEXICO,
        },
        GameState::Chicago(s) => {
            if s.has_scored { return AiDecision::Bank; }
            AiView {
                current_score: s.total_score,
                turn_score: s.round_score,
                dice: last_dice.to_vec(),
                opponent_score: 0,
                target: s.current_round as u32,
            }
        }
        GameState::Balut(s) => {
            if s.rolls_left == 0 { return AiDecision::Bank; }
            AiView {
                current_score: state.total_for(me),
                turn_score: 0,
                dice: s.last_roll.clone(),
                opponent_score: best_opponent(state, me),
                target: 0,
            }
        }
        GameState::Custom(_) => return AiDecision::Roll,
    };
    decide(state.variant(), &view, rng)
}
