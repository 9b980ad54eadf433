//! Keypad calculator core.
//!
//! [`calculator`] evaluates infix expressions with `+ - × ÷ % mod` and
//! parentheses; [`session`] turns key presses into expression edits;
//! [`history`] keeps settled calculations.

pub mod calculator;
pub mod config;
pub mod history;
pub mod session;
