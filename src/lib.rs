//! rebullet: interactive prompts drawn in place on an ordinary terminal.

pub mod core;
pub mod term;
pub mod widgets;
