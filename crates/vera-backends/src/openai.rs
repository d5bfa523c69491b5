//! OpenAI-compatible chat-completions client, used both as the prose
//! completion backend and as the single-choice provider classifier.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use vera_core::config::CompletionConfig;
use vera_router::traits::{Classifier, Completion};
use vera_router::ProviderCard;

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    base_url: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(config: &CompletionConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn chat(&self, content: String, temperature: f32) -> anyhow::Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage { role: "user".into(), content }],
            max_tokens: self.max_tokens,
            temperature,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<ChatResponse>()
            .await?;

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();
        Ok(text)
    }
}

#[async_trait]
impl Completion for OpenAiClient {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        self.chat(prompt.to_string(), 0.1).await
    }
}

/// Build the single-choice selection prompt shown to the model.
pub(crate) fn selection_prompt(message: &str, choices: &[ProviderCard]) -> String {
    let mut prompt = String::from(
        "Elige exactamente una de las siguientes capacidades para atender el \
         mensaje del usuario.\n\n",
    );
    for card in choices {
        prompt.push_str(&format!("- {}: {}\n", card.name, card.description));
    }
    prompt.push_str(&format!(
        "\nMensaje del usuario:\n{message}\n\n\
         Responde únicamente con el nombre exacto de la capacidad elegida."
    ));
    prompt
}

/// Normalize a model answer back onto one of the offered names, when
/// possible. An unmatched answer is returned as-is for the router to reject.
pub(crate) fn match_choice(answer: &str, choices: &[ProviderCard]) -> String {
    let cleaned = answer
        .trim()
        .trim_matches(['"', '\'', '`', '.', ':'])
        .to_lowercase();
    if let Some(card) = choices.iter().find(|c| c.name.to_lowercase() == cleaned) {
        return card.name.clone();
    }
    if let Some(card) = choices
        .iter()
        .find(|c| cleaned.contains(&c.name.to_lowercase()))
    {
        return card.name.clone();
    }
    answer.trim().to_string()
}

#[async_trait]
impl Classifier for OpenAiClient {
    async fn select(&self, message: &str, choices: &[ProviderCard]) -> anyhow::Result<String> {
        let answer = self.chat(selection_prompt(message, choices), 0.0).await?;
        let selected = match_choice(&answer, choices);
        debug!(%answer, %selected, "classifier selection");
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards() -> Vec<ProviderCard> {
        vec![
            ProviderCard { name: "buscar_propiedades".into(), description: "busca".into() },
            ProviderCard { name: "conversacion_general".into(), description: "charla".into() },
        ]
    }

    #[test]
    fn test_selection_prompt_lists_choices() {
        let prompt = selection_prompt("hola", &cards());
        assert!(prompt.contains("- buscar_propiedades: busca"));
        assert!(prompt.contains("hola"));
    }

    #[test]
    fn test_match_choice_exact() {
        assert_eq!(match_choice("buscar_propiedades", &cards()), "buscar_propiedades");
        assert_eq!(match_choice("  \"Conversacion_General\". ", &cards()), "conversacion_general");
    }

    #[test]
    fn test_match_choice_embedded() {
        assert_eq!(
            match_choice("La capacidad es buscar_propiedades.", &cards()),
            "buscar_propiedades"
        );
    }

    #[test]
    fn test_match_choice_unmatched_passthrough() {
        assert_eq!(match_choice("otra_cosa", &cards()), "otra_cosa");
    }
}
