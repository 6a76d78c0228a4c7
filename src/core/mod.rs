pub mod derivation;
pub mod hexagrams;
pub mod interpretation;
pub mod lunar;
pub mod oracle;
pub mod render;
pub mod trigrams;
pub mod zodiac;

pub use crate::domain::model::{Draw, Hexagram, Reading, Trigram, ZodiacHour};
pub use crate::domain::ports::{AiSettings, Interpreter};
pub use crate::utils::error::Result;
