use anyhow::Result;
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::generator::{EMPTY_ANSWER, ERROR_ANSWER};
use crate::matcher::{AnswerBook, AnswerMatcher, ContainmentMatcher};
use crate::model::{AnswersManifest, QuestionsManifest};
use crate::util::read_json;

pub fn run(args: StatusArgs) -> Result<()> {
    info!(
        questions = %args.questions.display(),
        answers = %args.answers.display(),
        "status requested"
    );

    if args.questions.exists() {
        let questions: QuestionsManifest = read_json(&args.questions)?;
        info!(
            questions = questions.questions.len(),
            located = questions.question_indices.len(),
            context_chars = questions.context.chars().count(),
            source = %questions.source.as_ref().map(|source| source.path.as_str()).unwrap_or_default(),
            extracted_at = %questions.source.as_ref().map(|source| source.extracted_at.as_str()).unwrap_or_default(),
            "loaded questions file"
        );
    } else {
        warn!(path = %args.questions.display(), "questions file missing");
    }

    if args.answers.exists() {
        let answers: AnswersManifest = read_json(&args.answers)?;
        let errors = count_answers(&answers, ERROR_ANSWER);
        let empty = count_answers(&answers, EMPTY_ANSWER);

        let book = AnswerBook::from_pairs(&answers.qa_pairs);
        let records = answers.question_records();
        let matched = records
            .iter()
            .filter(|record| ContainmentMatcher.find(&record.text, &book).is_some())
            .count();

        info!(
            pairs = answers.qa_pairs.len(),
            failed = errors,
            empty,
            located = records.len(),
            matched,
            unmatched = records.len() - matched,
            "loaded answers file"
        );
    } else {
        warn!(path = %args.answers.display(), "answers file missing");
    }

    Ok(())
}

fn count_answers(manifest: &AnswersManifest, sentinel: &str) -> usize {
    manifest
        .qa_pairs
        .iter()
        .filter(|pair| pair.answer.trim() == sentinel)
        .count()
}
