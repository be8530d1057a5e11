//! The two crews this service runs.

use super::{Agent, Crew, Task};

pub const PHRASE_CREW: &str = "phrase";
pub const TRANSLATION_CREW: &str = "translation";

/// Inputs: `words` (JSON array) and `user_context` (JSON string).
pub fn phrase_crew() -> Crew {
    Crew {
        name: PHRASE_CREW,
        agent: Agent {
            role: "Creative Language Tutor",
            goal: "Write short, natural phrases that help a learner remember new vocabulary",
            backstory: "You have taught languages for years and know that a word sticks \
                        when it appears in a sentence that means something to the learner. \
                        You keep phrases short, vivid and grammatically correct.",
        },
        tasks: vec![Task {
            description: "Write one short phrase or sentence that uses every one of these \
                          words: {words}.\n\
                          What the learner has told us about themselves: {user_context}.\n\
                          If that context is empty, pick an everyday situation instead. \
                          Keep each word recognisable; light inflection is fine.",
            expected_output: "A single phrase using all the given words, and the list of \
                              words that were used.",
        }],
        output_schema: r#"{"phrase": "string", "words": ["string"]}"#,
        temperature: Some(0.9),
    }
}

/// Inputs: `word`, `source_language`, `target_language`, `user_context`.
pub fn translation_crew() -> Crew {
    Crew {
        name: TRANSLATION_CREW,
        agent: Agent {
            role: "Expert Translator",
            goal: "Translate words from {source_language} to {target_language} accurately \
                   and explain how they are used",
            backstory: "You are a professional translator fluent in {source_language} and \
                        {target_language}. You know that most words carry several meanings \
                        and you always show the learner how a word is used in real sentences.",
        },
        tasks: vec![Task {
            description: "Translate the word \"{word}\" from {source_language} to \
                          {target_language}.\n\
                          What the learner has told us about themselves: {user_context}.\n\
                          Give the most common translation first, then alternatives for other \
                          meanings. Write two or three example sentences in {target_language}, \
                          preferably related to the learner's context, each with its \
                          {source_language} translation. Add short cultural or grammatical \
                          notes when they help.",
            expected_output: "The primary translation, alternative translations, example \
                              sentences with translations, and any useful notes.",
        }],
        output_schema: r#"{"word": "string", "source_language": "string", "target_language": "string", "primary_translation": "string", "alternative_translations": ["string"], "examples": [{"sentence": "string", "translation": "string"}], "notes": "string"}"#,
        temperature: Some(0.3),
    }
}
