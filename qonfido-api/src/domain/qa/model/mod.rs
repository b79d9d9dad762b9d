//! Answer synthesis models.

mod gemini;

pub use gemini::GeminiAnswerModel;
