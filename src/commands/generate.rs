use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::cli::{GenerateArgs, GenerationArgs};
use crate::generator::{
    GeminiConfig, GeminiGenerator, is_sentinel, load_prior_answers, update_answers,
};
use crate::model::{AnswersManifest, QuestionsManifest};
use crate::util::{read_json, write_json_pretty};

pub fn run(args: GenerateArgs) -> Result<()> {
    generate(&args.questions, &args.answers, &args.generation)?;
    Ok(())
}

pub fn generate(
    questions_path: &Path,
    answers_path: &Path,
    settings: &GenerationArgs,
) -> Result<AnswersManifest> {
    if !questions_path.exists() {
        bail!("questions file not found: {}", questions_path.display());
    }
    let questions: QuestionsManifest = read_json(questions_path)?;

    let generator = GeminiGenerator::new(GeminiConfig {
        endpoint: settings.endpoint.clone(),
        model: settings.model.clone(),
        context_chars: settings.context_chars,
        request_timeout: settings.timeout(),
        ..GeminiConfig::from_env()?
    })?;

    info!(
        questions = questions.questions.len(),
        model = %settings.model,
        concurrency = settings.concurrency,
        "generating answers"
    );

    let prior = load_prior_answers(answers_path);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let update = runtime.block_on(update_answers(
        &questions,
        prior,
        &generator,
        &settings.options(),
    ));

    write_json_pretty(answers_path, &update.manifest)?;

    let failed = update
        .manifest
        .qa_pairs
        .iter()
        .filter(|pair| is_sentinel(&pair.answer))
        .count();
    info!(
        path = %answers_path.display(),
        generated = update.generated,
        total = update.manifest.qa_pairs.len(),
        unanswered = failed,
        "saved answers"
    );

    Ok(update.manifest)
}
