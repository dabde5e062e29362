use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::model::{AnswersManifest, QaPair, QuestionsManifest};
use crate::util::read_json;

mod gemini;

pub use gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL, GeminiConfig, GeminiGenerator};

pub const ERROR_ANSWER: &str = "Error generating answer.";
pub const EMPTY_ANSWER: &str = "No answer generated.";
pub const DEFAULT_CONTEXT_CHARS: usize = 10_000;

const PROMPT_INSTRUCTIONS: &str = "You are a student writing answers for a lab manual.
Please generate a clean, professional, educational answer to the following question, based on the lab manual content.

Format your answer for direct insertion into a Microsoft Word document:
- Start with a short introduction (2-3 lines).
- After that, create detailed points (bullet points if applicable).
- End with a short conclusion (optional).
- Put each paragraph, bullet point, table and diagram on its own line.
- For bullet points, start lines with '•'
- To format bold text, wrap with <b>text</b>
- To format italic text, wrap with <i>text</i>
- To format both bold and italic, wrap with <bi>text</bi>
- For tables, describe using: <table>row1col1|row1col2;row2col1|row2col2</table>
- For diagrams, describe with: <diagram>description</diagram>

Make sure the answer flows like a mini textbook explanation. Keep spacing and clarity.";

/// Produces a markup-tagged answer for one question.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(&self, question: &str, context: &str) -> Result<String>;
}

#[derive(Debug, Clone, Copy)]
pub struct GenerationOptions {
    pub timeout: Duration,
    pub concurrency: usize,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            concurrency: 1,
        }
    }
}

pub fn build_prompt(question: &str, context: &str, context_chars: usize) -> String {
    let context = match context.char_indices().nth(context_chars) {
        Some((end, _)) => &context[..end],
        None => context,
    };
    format!("{PROMPT_INSTRUCTIONS}\n\nQuestion: {question}\n\nContext: {context}\n")
}

pub async fn answer_questions<G: AnswerGenerator + ?Sized>(
    generator: &G,
    questions: &[String],
    context: &str,
    options: &GenerationOptions,
) -> Vec<String> {
    let total = questions.len();
    let timeout = options.timeout;

    stream::iter(questions.iter().enumerate())
        .map(|(index, question)| async move {
            info!(question = index + 1, total, "generating answer");
            answer_one(generator, question, context, timeout).await
        })
        .buffered(options.concurrency.max(1))
        .collect()
        .await
}

async fn answer_one<G: AnswerGenerator + ?Sized>(
    generator: &G,
    question: &str,
    context: &str,
    timeout: Duration,
) -> String {
    match tokio::time::timeout(timeout, generator.generate(question, context)).await {
        Ok(Ok(answer)) => {
            let answer = answer.trim();
            if answer.is_empty() {
                warn!(question, "model returned an empty answer");
                return EMPTY_ANSWER.to_string();
            }
            debug!(question, chars = answer.chars().count(), "answer generated");
            answer.to_string()
        }
        Ok(Err(err)) => {
            warn!(question, error = %format!("{err:#}"), "answer generation failed");
            ERROR_ANSWER.to_string()
        }
        Err(_) => {
            warn!(question, timeout_secs = timeout.as_secs(), "answer generation timed out");
            ERROR_ANSWER.to_string()
        }
    }
}

pub fn is_sentinel(answer: &str) -> bool {
    matches!(answer.trim(), ERROR_ANSWER | EMPTY_ANSWER)
}

#[derive(Debug, Clone)]
pub struct AnswerUpdate {
    pub manifest: AnswersManifest,
    pub generated: usize,
}

pub async fn update_answers<G: AnswerGenerator + ?Sized>(
    questions: &QuestionsManifest,
    prior: Option<AnswersManifest>,
    generator: &G,
    options: &GenerationOptions,
) -> AnswerUpdate {
    let mut manifest = prior.unwrap_or_default();
    let mut known = manifest
        .qa_pairs
        .iter()
        .map(|pair| pair.question.trim().to_string())
        .collect::<HashSet<_>>();

    let mut pending = Vec::new();
    for (index, question) in questions.questions.iter().enumerate() {
        if known.insert(question.trim().to_string()) {
            pending.push(question.clone());
        } else {
            debug!(question = index + 1, "question already answered");
        }
    }

    info!(
        questions = questions.questions.len(),
        new = pending.len(),
        "updating answers"
    );

    let answers = answer_questions(generator, &pending, &questions.context, options).await;
    let generated = answers.len();
    manifest.qa_pairs.extend(
        pending
            .into_iter()
            .zip(answers)
            .map(|(question, answer)| QaPair { question, answer }),
    );

    manifest.question_indices = questions.question_indices.clone();
    manifest.question_texts = questions.question_texts.clone();
    manifest.question_formats = questions.question_formats.clone();
    if questions.source.is_some() {
        manifest.source = questions.source.clone();
    }

    AnswerUpdate {
        manifest,
        generated,
    }
}

pub fn load_prior_answers(path: &Path) -> Option<AnswersManifest> {
    if !path.exists() {
        info!(path = %path.display(), "no existing answers file");
        return None;
    }

    match read_json::<AnswersManifest>(path) {
        Ok(manifest) => {
            info!(
                path = %path.display(),
                answers = manifest.qa_pairs.len(),
                "loaded existing answers"
            );
            Some(manifest)
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                error = %format!("{err:#}"),
                "existing answers file is unreadable; starting fresh"
            );
            None
        }
    }
}
