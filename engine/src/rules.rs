//! Scoring functions and fixed rule constants. Everything here is pure.

use std::collections::BTreeSet;

use crate::error::{EngineError, EngineResult};
use crate::model::{Category, DieIndex, PlayerId, Variant};

pub const PIG_TARGET: u32 = 100;
pub const PIG_BUST_FACE: u8 = 1;

pub const GREED_TARGET: u32 = 10_000;
pub const GREED_MIN_BANK: u32 = 800;
pub const GREED_MAX_DICE: usize = 6;

pub const MEXICO: u32 = 21;
pub const MEXICO_LIVES: u8 = 6;
pub const MEXICO_MAX_ROUNDS: u32 = 6;
pub const MEXICO_ROUND_SECONDS: u32 = 15;

pub const CHICAGO_FIRST_ROUND: u8 = 2;
pub const CHICAGO_LAST_ROUND: u8 = 12;

pub const BALUT_DICE: usize = 5;
pub const BALUT_MAX_ROLLS: u8 = 3;

pub const CUSTOM_MAX_DICE: usize = 6;
pub const CUSTOM_MIN_PLAYERS: usize = 2;
pub const CUSTOM_MAX_PLAYERS: usize = 6;

#[inline] pub fn is_face(face: u8) -> bool { (1..=6).contains(&face) }

/// Rejects a roll whose size is outside `min..=max` or that shows a face outside 1..=6.
pub fn check_dice(variant: Variant, dice: &[u8], min: usize, max: usize) -> EngineResult<()> {
    if dice.len() < min || dice.len() > max {
        return Err(EngineError::InvalidDiceCount { variant, min, max, actual: dice.len() });
    }
    match dice.iter().find(|&&f| !is_face(f)) {
        Some(&bad) => Err(EngineError::InvalidDieFace(bad)),
        None => Ok(()),
    }
}

pub fn check_indices(held: &BTreeSet<DieIndex>, dice: usize) -> EngineResult<()> {
    match held.iter().find(|&&i| i >= dice) {
        Some(&index) => Err(EngineError::InvalidDieIndex { index, dice }),
        None => Ok(()),
    }
}

#[inline] pub fn next_seat(current: PlayerId, seats: usize) -> PlayerId { (current + 1) % seats.max(1) }

/// Occurrences per face, indexed 1..=6; slot 0 is unused.
pub fn face_counts(dice: &[u8]) -> [usize; 7] {
    let mut counts = [0usize; 7];
    for &f in dice.iter().filter(|&&f| is_face(f)) { counts[f as usize] += 1; }
    counts
}

fn positions_of(dice: &[u8], face: u8, take: usize) -> impl Iterator<Item = DieIndex> + '_ {
    dice.iter().enumerate().filter(move |(_, &f)| f == face).map(|(i, _)| i).take(take)
}

/// Greed score of a roll and the indices of the dice that scored.
///
/// The combinations are mutually exclusive and tried in order: straight,
/// six of a kind, five of a kind, three pairs, then per-face sets and singles.
pub fn greed_score(dice: &[u8]) -> (u32, Vec<DieIndex>) {
    let counts = face_counts(dice);
    let all: Vec<DieIndex> = (0..dice.len()).collect();
    let mut sorted = dice.to_vec();
    sorted.sort_unstable();

    if sorted == [1, 2, 3, 4, 5, 6] { return (1500, all); }
    if counts.iter().any(|&c| c == 6) { return (3000, all); }
    if let Some(face) = (1..=6u8).find(|&f| counts[f as usize] == 5) {
        return (2000, positions_of(dice, face, 5).collect());
    }
    if counts.iter().filter(|&&c| c == 2).count() == 3 { return (1500, all); }

    let mut score = 0;
    let mut scoring = Vec::new();
    for face in 1..=6u8 {
        let n = counts[face as usize];
        let (points, used) = match n {
            4 => (1000, 4),
            3 if face == 1 => (1000, 3),
            3 => (face as u32 * 100, 3),
            1 | 2 if face == 1 => (100 * n as u32, n),
            1 | 2 if face == 5 => (50 * n as u32, n),
            _ => (0, 0),
        };
        score += points;
        scoring.extend(positions_of(dice, face, used));
    }
    scoring.sort_unstable();
    (score, scoring)
}

/// Mexico value of a two-dice roll: 21 for {2,1}, doubles ×11, else high then low digit.
pub fn mexico_score(d1: u8, d2: u8) -> u32 {
    let (hi, lo) = if d1 >= d2 { (d1 as u32, d2 as u32) } else { (d2 as u32, d1 as u32) };
    if hi == 2 && lo == 1 { MEXICO } else if hi == lo { hi * 11 } else { hi * 10 + lo }
}

/// Orders Mexico scores: Mexico over doubles over everything else.
pub fn mexico_rank(score: u32) -> (u8, u32) {
    if score == MEXICO {
        (2, score)
    } else if (11..=66).contains(&score) && score % 11 == 0 {
        (1, score)
    } else {
        (0, score)
    }
}

/// Chicago points for a roll in round `round`: the round number when the sum hits it.
pub fn chicago_score(dice: &[u8], round: u8) -> u32 {
    let sum: u32 = dice.iter().map(|&f| f as u32).sum();
    if sum == round as u32 { round as u32 } else { 0 }
}

pub fn balut_score(dice: &[u8], category: Category) -> u32 {
    let counts = face_counts(dice);
    match category {
        Category::Ones | Category::Twos | Category::Threes
        | Category::Fours | Category::Fives | Category::Sixes => {
            let face = category.face().unwrap_or(0);
            counts[face as usize] as u32 * face as u32
        }
        Category::Straight => if is_low_straight(dice) { 30 } else { 0 },
        Category::FullHouse => if is_full_house(&counts) { 35 } else { 0 },
        Category::FourOfAKind => (1..=6u8)
            .find(|&f| counts[f as usize] >= 4)
            .map_or(0, |f| f as u32 * 4),
        Category::FiveOfAKind => if counts.iter().any(|&c| c == 5) { 50 } else { 0 },
        Category::Choice => dice.iter().map(|&f| f as u32).sum(),
    }
}

pub fn is_low_straight(dice: &[u8]) -> bool {
    let mut sorted = dice.to_vec();
    sorted.sort_unstable();
    sorted == [1, 2, 3, 4, 5]
}

pub fn is_high_straight(dice: &[u8]) -> bool {
    let mut sorted = dice.to_vec();
    sorted.sort_unstable();
    sorted == [2, 3, 4, 5, 6]
}

pub fn is_full_house(counts: &[usize; 7]) -> bool {
    let mut groups: Vec<usize> = counts[1..].iter().copied().filter(|&c| c > 0).collect();
    groups.sort_unstable();
    groups == [2, 3]
}
