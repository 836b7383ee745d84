//! A game in progress: the state plus everything that feeds it (dice, clock,
//! AI seats) and the sequenced event log. Rules live in the reducer; the
//! session only rolls dice, forwards actions and drives the AI.

use std::collections::BTreeSet;

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::bot;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::model::{Action, AiDecision, Category, DieIndex, Event, EventType, GameState, PlayerId, Variant};
use crate::rng::{Clock, DiceSource};
use crate::rules::{BALUT_DICE, GREED_MAX_DICE};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LoggedEvent {
    pub seq: u64,
    #[serde(flatten)]
    pub event: Event,
}

pub struct GameSession<D: DiceSource, C: Clock> {
    state: GameState,
    config: EngineConfig,
    dice: D,
    clock: C,
    rng: StdRng,
    ai_seats: BTreeSet<PlayerId>,
    last_dice: Vec<u8>,
    events_seq: u64,
    log: Vec<LoggedEvent>,
}

impl<D: DiceSource, C: Clock> GameSession<D, C> {
    pub fn new(variant: Variant, config: EngineConfig, dice: D, clock: C) -> EngineResult<Self> {
        config.validate()?;
        let seed = config.ai.seed.unwrap_or_else(rand::random::<u64>);
        let state = crate::initialize_game(variant, &config);
        Ok(GameSession {
            state,
            config,
            dice,
            clock,
            rng: StdRng::seed_from_u64(seed),
            ai_seats: BTreeSet::new(),
            last_dice: vec![],
            events_seq: 0,
            log: vec![],
        })
    }

    /// Seats the AI at `seat`. Solo variants play from seat 0.
    pub fn with_ai_seat(mut self, seat: PlayerId) -> Self {
        self.ai_seats.insert(seat);
        self
    }

    pub fn state(&self) -> &GameState { &self.state }
    pub fn config(&self) -> &EngineConfig { &self.config }
    pub fn events(&self) -> &[LoggedEvent] { &self.log }
    pub fn last_dice(&self) -> &[u8] { &self.last_dice }

    fn seat_to_move(&self) -> PlayerId { self.state.current_player().unwrap_or(0) }

    pub fn ai_to_move(&self) -> bool {
        !self.state.is_game_over()
            && self.state.variant() != Variant::Custom
            && self.ai_seats.contains(&self.seat_to_move())
    }

    /// Runs one action through the reducer and logs what it produced. An
    /// expired Mexico round is settled right away against an opponent drawn
    /// from the seeded AI rng, so dice scripts never shift it.
    pub fn apply(&mut self, action: Action) -> EngineResult<Vec<Event>> {
        let (next, mut events) = match crate::apply(&self.state, &action) {
            Ok(done) => done,
            Err(e) => {
                warn!(variant = %self.state.variant(), action = action.name(), error = %e, "action rejected");
                return Err(e);
            }
        };
        let seat_before = self.state.current_player();
        self.state = next;
        match &action {
            Action::Roll { dice, .. } => self.last_dice = dice.clone(),
            Action::Tick { .. } => {}
            _ => self.last_dice.clear(),
        }
        if self.state.current_player() != seat_before { self.last_dice.clear(); }
        self.record(&events);

        if events.iter().any(|e| e.ty == EventType::RoundExpired) {
            let (low, high) = self.config.mexico_opponent_range;
            let opponent_score = self.rng.gen_range(low..=high);
            debug!(opponent_score, "mexico: opponent drawn");
            events.extend(self.apply(Action::EndRound { opponent_score })?);
        }
        if self.state.is_game_over() && events.iter().any(|e| e.ty == EventType::GameEnd) {
            info!(variant = %self.state.variant(), winner = ?crate::winner(&self.state), "game finished");
        }
        Ok(events)
    }

    fn record(&mut self, events: &[Event]) {
        for event in events {
            self.events_seq += 1;
            self.log.push(LoggedEvent { seq: self.events_seq, event: event.clone() });
        }
    }

    fn dice_on_table(&self) -> usize {
        match &self.state {
            GameState::Pig(_) => 1,
            GameState::Greed(_) => GREED_MAX_DICE,
            GameState::Mexico(_) | GameState::Chicago(_) => 2,
            GameState::Balut(_) => BALUT_DICE,
            GameState::Custom(s) => s.dice_count,
        }
    }

    /// Positions whose previous value stays on the table for this roll.
    fn fixed_positions(&self, held: &BTreeSet<DieIndex>) -> BTreeSet<DieIndex> {
        let mut fixed = held.clone();
        if let GameState::Greed(s) = &self.state {
            fixed.extend(s.held_dice.iter().chain(s.scoring_dice.iter()).copied());
        }
        fixed
    }

    /// Rolls the variant's dice, keeping the faces at `held` (and, in Greed,
    /// everything already set aside this turn).
    pub fn roll(&mut self, held: &BTreeSet<DieIndex>) -> EngineResult<Vec<Event>> {
        let mut out = vec![];
        let idle_round = matches!(&self.state, GameState::Mexico(s) if !s.is_timer_running && !s.is_game_over);
        if idle_round { out.extend(self.start_round()?); }
        let n = self.dice_on_table();
        let mut dice = self.dice.roll_dice(n);
        let previous = self.state.last_roll().to_vec();
        if previous.len() == dice.len() {
            for i in self.fixed_positions(held) {
                if let Some(&face) = previous.get(i) { dice[i] = face; }
            }
        }
        out.extend(self.apply(Action::Roll { dice, held: held.clone() })?);
        Ok(out)
    }

    pub fn bank(&mut self) -> EngineResult<Vec<Event>> { self.apply(Action::Bank) }

    pub fn score_category(&mut self, category: Category) -> EngineResult<Vec<Event>> {
        let dice = self.state.last_roll().to_vec();
        self.apply(Action::ScoreCategory { dice, category })
    }

    pub fn start_round(&mut self) -> EngineResult<Vec<Event>> {
        let now_ms = self.clock.now_millis();
        self.apply(Action::StartRound { now_ms })
    }

    pub fn tick(&mut self) -> EngineResult<Vec<Event>> {
        let now_ms = self.clock.now_millis();
        self.apply(Action::Tick { now_ms })
    }

    /// Ends the current turn the way the variant ends turns: Balut fills the
    /// best open category, everything else banks.
    pub fn finish_turn(&mut self) -> EngineResult<Vec<Event>> {
        match self.state.variant() {
            Variant::Balut if self.state.last_roll().is_empty() => {
                // nothing on the table yet; roll once before scoring
                let mut out = self.roll(&BTreeSet::new())?;
                out.extend(self.finish_turn()?);
                Ok(out)
            }
            Variant::Balut => {
                let category = match &self.state {
                    GameState::Balut(s) => bot::choose_balut_category(s, &s.last_roll),
                    _ => None,
                };
                self.score_category(category.ok_or(EngineError::GameOver)?)
            }
            Variant::Custom => Ok(vec![]),
            _ => self.bank(),
        }
    }

    /// Plays the AI's turn to completion. Stops early once a human is to move.
    pub fn run_ai_turn(&mut self) -> EngineResult<Vec<Event>> {
        let mut out = vec![];
        if !self.ai_to_move() { return Ok(out); }
        let seat = self.seat_to_move();
        let mut steps = 0;
        while self.ai_to_move() && self.seat_to_move() == seat {
            if steps >= self.config.ai.max_steps_per_turn {
                warn!(seat, steps, "ai turn hit the step limit; ending it");
                out.extend(self.finish_turn()?);
                break;
            }
            steps += 1;
            let decision = bot::decide_for_state(&self.state, &self.last_dice, &mut self.rng);
            debug!(seat, ?decision, "ai decision");
            match decision {
                AiDecision::Roll => out.extend(self.roll(&BTreeSet::new())?),
                AiDecision::SelectDice(keep) => out.extend(self.roll(&keep.into_iter().collect())?),
                AiDecision::Bank => {
                    out.extend(self.finish_turn()?);
                    break;
                }
            }
        }
        Ok(out)
    }

    /// Starts the same variant over with the same seats and config.
    pub fn reset(&mut self) {
        self.state = crate::initialize_game(self.state.variant(), &self.config);
        self.last_dice.clear();
        self.events_seq = 0;
        self.log.clear();
    }
}
