use std::cell::Cell;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Where dice faces come from. Every face is in 1..=6.
pub trait DiceSource {
    fn roll_die(&mut self) -> u8;

    fn roll_dice(&mut self, n: usize) -> Vec<u8> {
        (0..n).map(|_| self.roll_die()).collect()
    }
}

impl<T: DiceSource + ?Sized> DiceSource for &mut T {
    fn roll_die(&mut self) -> u8 { (**self).roll_die() }
}

pub struct RngDice<R: Rng> {
    rng: R,
}

impl<R: Rng> RngDice<R> {
    pub fn new(rng: R) -> Self { RngDice { rng } }
}

impl RngDice<StdRng> {
    pub fn seeded(seed: u64) -> Self { RngDice::new(StdRng::seed_from_u64(seed)) }
}

impl<R: Rng> DiceSource for RngDice<R> {
    fn roll_die(&mut self) -> u8 { self.rng.gen_range(1..=6) }
}

/// Replays a fixed sequence of faces, wrapping around at the end.
#[derive(Clone, Debug)]
pub struct ScriptedDice {
    faces: Vec<u8>,
    next: usize,
}

impl ScriptedDice {
    pub fn new(faces: impl Into<Vec<u8>>) -> Self {
        let faces = faces.into();
        assert!(!faces.is_empty(), "scripted dice need at least one face");
        ScriptedDice { faces, next: 0 }
    }
}

impl DiceSource for ScriptedDice {
    fn roll_die(&mut self) -> u8 {
        let face = self.faces[self.next % self.faces.len()];
        self.next += 1;
        face
    }
}

pub trait Clock {
    fn now_millis(&self) -> u64;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self { ManualClock { now: Cell::new(start_ms) } }
    pub fn advance(&self, ms: u64) { self.now.set(self.now.get() + ms); }
    pub fn set(&self, ms: u64) { self.now.set(ms); }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 { self.now.get() }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_millis(&self) -> u64 { (**self).now_millis() }
}
