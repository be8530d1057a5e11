pub mod phrase;
pub mod translation;

pub use phrase::{PhraseRequest, PhraseResult};
pub use translation::{ExampleSentence, TranslationRequest, TranslationResult};
