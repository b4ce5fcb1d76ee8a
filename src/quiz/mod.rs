// src/quiz/mod.rs

pub mod bank;
pub mod scoring;
pub mod shuffle;

pub use bank::{default_bank, validate_bank};
pub use scoring::score_answers;
pub use shuffle::{Presentation, shuffle_questions};
