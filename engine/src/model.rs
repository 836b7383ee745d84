use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Seat index, `0..players`. Two-player AI games seat the AI at 1.
pub type PlayerId = usize;
pub type DieIndex = usize;
pub type Round = u8;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variant { Pig, Greed, Mexico, Chicago, Balut, Custom }

impl Variant {
    pub const ALL: [Variant; 6] = [
        Variant::Pig, Variant::Greed, Variant::Mexico,
        Variant::Chicago, Variant::Balut, Variant::Custom,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Variant::Pig => "Pig",
            Variant::Greed => "Greed / 10000",
            Variant::Mexico => "Mexico",
            Variant::Chicago => "Chicago",
            Variant::Balut => "Balut",
            Variant::Custom => "Custom",
        }
    }

    /// Mexico and Chicago are played solo against the round structure.
    pub fn is_solo(self) -> bool { matches!(self, Variant::Mexico | Variant::Chicago) }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for Variant {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pig" => Ok(Variant::Pig),
            "greed" | "greed / 10000" | "greed/10000" | "10000" => Ok(Variant::Greed),
            "mexico" => Ok(Variant::Mexico),
            "chicago" => Ok(Variant::Chicago),
            "balut" => Ok(Variant::Balut),
            "custom" => Ok(Variant::Custom),
            _ => Err(EngineError::InvalidVariant(s.to_string())),
        }
    }
}

/// Balut scoring slots, each usable once per player.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Ones,
    Twos,
    Threes,
    Fours,
    Fives,
    Sixes,
    Straight,
    #[serde(rename = "Full House")]
    FullHouse,
    #[serde(rename = "Four of a Kind")]
    FourOfAKind,
    #[serde(rename = "Five of a Kind")]
    FiveOfAKind,
    Choice,
}

impl Category {
    pub const ALL: [Category; 11] = [
        Category::Ones, Category::Twos, Category::Threes, Category::Fours,
        Category::Fives, Category::Sixes, Category::Straight, Category::FullHouse,
        Category::FourOfAKind, Category::FiveOfAKind, Category::Choice,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Ones => "Ones",
            Category::Twos => "Twos",
            Category::Threes => "Threes",
            Category::Fours => "Fours",
            Category::Fives => "Fives",
            Category::Sixes => "Sixes",
            Category::Straight => "Straight",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::FiveOfAKind => "Five of a Kind",
            Category::Choice => "Choice",
        }
    }

    /// Face counted by the numeric categories.
    pub fn face(self) -> Option<u8> {
        match self {
            Category::Ones => Some(1),
            Category::Twos => Some(2),
            Category::Threes => Some(3),
            Category::Fours => Some(4),
            Category::Fives => Some(5),
            Category::Sixes => Some(6),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for Category {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| EngineError::UnknownCategory(s.to_string()))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PigState {
    pub player_scores: BTreeMap<PlayerId, u32>,
    pub current_turn_score: u32,
    pub current_player_index: PlayerId,
    pub is_game_over: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GreedState {
    pub player_scores: BTreeMap<PlayerId, u32>,
    pub current_player_index: PlayerId,
    pub current_turn_score: u32,
    pub held_dice: BTreeSet<DieIndex>,
    pub scoring_dice: BTreeSet<DieIndex>,
    pub can_reroll: bool,
    pub last_roll: Vec<u8>,
    /// Points committed by each finished turn; 0 for busts and sub-threshold banks.
    pub round_history: Vec<u32>,
    pub is_game_over: bool,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MexicoStatus { Waiting, Rolling, RoundWon, RoundLost, GameOver }

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MexicoState {
    pub lives: u8,
    pub round_scores: Vec<u32>,
    pub current_round_number: u32,
    pub is_timer_running: bool,
    pub round_time_seconds: u32,
    pub round_length_seconds: u32,
    pub round_started_at_ms: Option<u64>,
    pub highest_score: u32,
    pub is_game_over: bool,
    pub game_status: MexicoStatus,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChicagoState {
    /// Also the target sum for the round.
    pub current_round: Round,
    pub total_score: u32,
    pub round_score: u32,
    pub round_scores: BTreeMap<Round, u32>,
    pub has_scored: bool,
    pub is_game_over: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BalutState {
    pub player_scores: BTreeMap<PlayerId, BTreeMap<Category, u32>>,
    pub current_player_index: PlayerId,
    pub first_player: PlayerId,
    pub current_round: u32,
    pub rolls_left: u8,
    pub held_dice: BTreeSet<DieIndex>,
    pub last_roll: Vec<u8>,
    pub is_game_over: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomState {
    pub game_name: String,
    pub player_names: BTreeMap<PlayerId, String>,
    pub player_scores: BTreeMap<PlayerId, i32>,
    pub score_history: BTreeMap<PlayerId, Vec<String>>,
    pub notes: Vec<String>,
    pub dice_count: usize,
    pub last_roll: Vec<u8>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "variant", content = "state")]
pub enum GameState {
    Pig(PigState),
    Greed(GreedState),
    Mexico(MexicoState),
    Chicago(ChicagoState),
    Balut(BalutState),
    Custom(CustomState),
}

impl GameState {
    pub fn variant(&self) -> Variant {
        match self {
            GameState::Pig(_) => Variant::Pig,
            GameState::Greed(_) => Variant::Greed,
            GameState::Mexico(_) => Variant::Mexico,
            GameState::Chicago(_) => Variant::Chicago,
            GameState::Balut(_) => Variant::Balut,
            GameState::Custom(_) => Variant::Custom,
        }
    }

    pub fn is_game_over(&self) -> bool {
        match self {
            GameState::Pig(s) => s.is_game_over,
            GameState::Greed(s) => s.is_game_over,
            GameState::Mexico(s) => s.is_game_over,
            GameState::Chicago(s) => s.is_game_over,
            GameState::Balut(s) => s.is_game_over,
            GameState::Custom(_) => false,
        }
    }

    /// Seat to act; solo variants and the scoreboard have none.
    pub fn current_player(&self) -> Option<PlayerId> {
        match self {
            GameState::Pig(s) => Some(s.current_player_index),
            GameState::Greed(s) => Some(s.current_player_index),
            GameState::Balut(s) => Some(s.current_player_index),
            GameState::Mexico(_) | GameState::Chicago(_) | GameState::Custom(_) => None,
        }
    }

    pub fn players(&self) -> usize {
        match self {
            GameState::Pig(s) => s.player_scores.len(),
            GameState::Greed(s) => s.player_scores.len(),
            GameState::Balut(s) => s.player_scores.len(),
            GameState::Custom(s) => s.player_scores.len(),
            GameState::Mexico(_) | GameState::Chicago(_) => 1,
        }
    }

    /// Committed total for a seat (Custom totals below zero read as 0).
    pub fn total_for(&self, player: PlayerId) -> u32 {
        match self {
            GameState::Pig(s) => s.player_scores.get(&player).copied().unwrap_or(0),
            GameState::Greed(s) => s.player_scores.get(&player).copied().unwrap_or(0),
            GameState::Balut(s) => s.player_scores.get(&player).map(|c| c.values().sum()).unwrap_or(0),
            GameState::Custom(s) => s.player_scores.get(&player).map(|&v| v.max(0) as u32).unwrap_or(0),
            GameState::Mexico(s) => s.highest_score,
            GameState::Chicago(s) => s.total_score,
        }
    }

    /// Dice shown on the table after the last roll.
    pub fn last_roll(&self) -> &[u8] {
        match self {
            GameState::Greed(s) => &s.last_roll,
            GameState::Balut(s) => &s.last_roll,
            GameState::Custom(s) => &s.last_roll,
            GameState::Pig(_) | GameState::Mexico(_) | GameState::Chicago(_) => &[],
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Roll {
        dice: Vec<u8>,
        #[serde(default)]
        held: BTreeSet<DieIndex>,
    },
    Bank,
    ScoreCategory { dice: Vec<u8>, category: Category },
    StartRound { now_ms: u64 },
    Tick { now_ms: u64 },
    EndRound { opponent_score: u32 },
    AddPlayer,
    RenamePlayer { player: PlayerId, name: String },
    AddScore { player: PlayerId, points: i32 },
    AddNote { player: PlayerId, note: String },
    SetDiceCount { count: usize },
    SetGameName { name: String },
    ResetScores,
}

impl Action {
    pub fn roll(dice: Vec<u8>) -> Self { Action::Roll { dice, held: BTreeSet::new() } }

    pub fn name(&self) -> &'static str {
        match self {
            Action::Roll { .. } => "roll",
            Action::Bank => "bank",
            Action::ScoreCategory { .. } => "score_category",
            Action::StartRound { .. } => "start_round",
            Action::Tick { .. } => "tick",
            Action::EndRound { .. } => "end_round",
            Action::AddPlayer => "add_player",
            Action::RenamePlayer { .. } => "rename_player",
            Action::AddScore { .. } => "add_score",
            Action::AddNote { .. } => "add_note",
            Action::SetDiceCount { .. } => "set_dice_count",
            Action::SetGameName { .. } => "set_game_name",
            Action::ResetScores => "reset_scores",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum EventType {
    Roll,
    Bust,
    HotDice,
    Bank,
    Pass,
    CategoryScored,
    RoundAdvanced,
    RoundExpired,
    RoundWon,
    RoundLost,
    BoardEdited,
    GameEnd,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub ty: EventType,
    pub payload: serde_json::Value,
}

impl Event {
    pub fn new(ty: EventType, payload: serde_json::Value) -> Self { Event { ty, payload } }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum AiDecision {
    Roll,
    Bank,
    /// Keep these dice and reroll the rest.
    SelectDice(Vec<DieIndex>),
}
