//! One pure state machine per variant. Every transition takes the current
//! state by reference and returns the next one; nothing here rolls dice.

pub mod balut;
pub mod chicago;
pub mod custom;
pub mod greed;
pub mod mexico;
pub mod pig;
