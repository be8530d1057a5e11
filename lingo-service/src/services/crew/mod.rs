//! Crews: fixed, sequential agent pipelines over a chat provider.
//!
//! A crew is one agent persona working through an ordered list of tasks.
//! Agent and task texts are templates filled from a flat `{key}` input map;
//! each task sees the outputs of the tasks before it. The last task's reply
//! is the crew's output.

pub mod definitions;

pub use definitions::{phrase_crew, translation_crew};

use crate::services::providers::{
    ChatMessage, ChatProvider, FinishReason, GenerationParams, ProviderError,
};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

/// Flat key-value inputs handed to a crew run.
pub type CrewInputs = BTreeMap<&'static str, String>;

/// What a crew run produced: the result schema, or text that did not fit it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome<T> {
    Structured(T),
    Raw(String),
}

impl<T> GenerationOutcome<T> {
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationOutcome::Structured(_) => "structured",
            GenerationOutcome::Raw(_) => "raw",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Agent {
    pub role: &'static str,
    pub goal: &'static str,
    pub backstory: &'static str,
}

#[derive(Debug, Clone)]
pub struct Task {
    pub description: &'static str,
    pub expected_output: &'static str,
}

#[derive(Debug, Clone)]
pub struct Crew {
    pub name: &'static str,
    pub agent: Agent,
    pub tasks: Vec<Task>,
    /// JSON shape the final task must answer with.
    pub output_schema: &'static str,
    pub temperature: Option<f32>,
}

impl Crew {
    /// Run every task in order and classify the final reply.
    pub async fn kickoff<T: DeserializeOwned>(
        &self,
        provider: &dyn ChatProvider,
        inputs: &CrewInputs,
    ) -> Result<GenerationOutcome<T>, ProviderError> {
        let system = ChatMessage::system(render(
            &format!(
                "You are {}.\n{}\nYour personal goal is: {}",
                self.agent.role, self.agent.backstory, self.agent.goal
            ),
            inputs,
        ));

        let mut previous: Vec<String> = Vec::new();
        let mut last_reply = String::new();

        for (index, task) in self.tasks.iter().enumerate() {
            let is_final = index + 1 == self.tasks.len();
            let prompt = self.task_prompt(task, inputs, &previous, is_final);

            let params = GenerationParams {
                temperature: self.temperature,
                json_output: is_final,
            };

            let response = provider
                .complete(&[system.clone(), ChatMessage::user(prompt)], &params)
                .await?;

            let reply = response
                .text
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .ok_or_else(|| {
                    ProviderError::ApiError(format!(
                        "crew '{}' task {} returned no content",
                        self.name,
                        index + 1
                    ))
                })?;

            if response.finish_reason == FinishReason::Length {
                tracing::warn!(
                    crew = self.name,
                    task = index + 1,
                    output_tokens = response.output_tokens,
                    "Crew task reply was cut off at the token limit"
                );
            }

            tracing::debug!(
                crew = self.name,
                task = index + 1,
                input_tokens = response.input_tokens,
                output_tokens = response.output_tokens,
                "Crew task completed"
            );

            previous.push(reply.clone());
            last_reply = reply;
        }

        Ok(classify(last_reply))
    }

    fn task_prompt(
        &self,
        task: &Task,
        inputs: &CrewInputs,
        previous: &[String],
        is_final: bool,
    ) -> String {
        let mut prompt = format!(
            "Current Task: {}\n\nThis is the expected criteria for your final answer: {}",
            render(task.description, inputs),
            render(task.expected_output, inputs)
        );

        if !previous.is_empty() {
            prompt.push_str("\n\nThis is the context you're working with:\n");
            prompt.push_str(&previous.join("\n\n"));
        }

        if is_final {
            prompt.push_str(
                "\n\nRespond with a single JSON object and nothing else, matching this shape:\n",
            );
            prompt.push_str(self.output_schema);
        }

        prompt
    }
}

/// Substitute `{key}` placeholders in one left-to-right pass.
///
/// Unknown placeholders are left as-is, and substituted values are never
/// rescanned, so input text cannot fill another input's slot.
pub fn render(template: &str, inputs: &CrewInputs) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let candidate = &rest[open + 1..];

        let value = candidate
            .find('}')
            .and_then(|close| inputs.get(&candidate[..close]).map(|v| (close, v)));

        match value {
            Some((close, value)) => {
                out.push_str(value);
                rest = &candidate[close + 1..];
            }
            None => {
                out.push('{');
                rest = candidate;
            }
        }
    }

    out.push_str(rest);
    out
}

fn classify<T: DeserializeOwned>(reply: String) -> GenerationOutcome<T> {
    match serde_json::from_str::<T>(strip_code_fence(&reply)) {
        Ok(parsed) => GenerationOutcome::Structured(parsed),
        Err(_) => GenerationOutcome::Raw(reply),
    }
}

/// Models often wrap JSON in a fenced block despite being told not to.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let body = rest.trim_start_matches("json");
            body.strip_suffix("```").unwrap_or(body).trim()
        }
        None => trimmed,
    }
}
