use std::path::Path;

use anyhow::{Result, bail};
use tracing::info;

use crate::cli::ExtractArgs;
use crate::commands::source_info;
use crate::model::QuestionsManifest;
use crate::questions::QuestionExtractor;
use crate::util::write_json_pretty;

pub fn run(args: ExtractArgs) -> Result<()> {
    extract(&args.input, &args.questions)?;
    Ok(())
}

pub fn extract(input: &Path, questions_path: &Path) -> Result<QuestionsManifest> {
    if !input.exists() {
        bail!("input document not found: {}", input.display());
    }

    info!(input = %input.display(), "extracting questions");

    let extractor = QuestionExtractor::new()?;
    let extracted = extractor.extract_file(input)?;
    if extracted.questions.is_empty() {
        bail!("no questions found in {}", input.display());
    }

    let manifest = QuestionsManifest {
        question_indices: extracted.records.iter().map(|record| record.position).collect(),
        question_texts: extracted.records.iter().map(|record| record.text.clone()).collect(),
        question_formats: extracted
            .records
            .iter()
            .map(|record| record.format.clone())
            .collect(),
        questions: extracted.questions,
        context: extracted.context,
        source: Some(source_info(input, extracted.kind)?),
    };

    write_json_pretty(questions_path, &manifest)?;

    info!(
        path = %questions_path.display(),
        questions = manifest.questions.len(),
        located = manifest.question_indices.len(),
        quiz_sections = extracted.quiz_sections,
        "saved questions"
    );

    Ok(manifest)
}
