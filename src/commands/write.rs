use std::path::Path;

use anyhow::{Result, bail};
use tracing::{info, warn};

use crate::answer::BlockSegmenter;
use crate::cli::WriteArgs;
use crate::document::{DocumentKind, DocxDocument};
use crate::insert::{InsertionSummary, insert_answers};
use crate::matcher::{AnswerBook, ContainmentMatcher};
use crate::model::AnswersManifest;
use crate::util::{read_json, sha256_file};

pub fn run(args: WriteArgs) -> Result<()> {
    write(&args.input, &args.answers, &args.output)?;
    Ok(())
}

pub fn write(input: &Path, answers_path: &Path, output: &Path) -> Result<InsertionSummary> {
    if !input.exists() {
        bail!("input document not found: {}", input.display());
    }
    if DocumentKind::from_path(input)? != DocumentKind::Docx {
        bail!(
            "writing answers is only supported for docx documents: {}",
            input.display()
        );
    }
    if !answers_path.exists() {
        bail!("answers file not found: {}", answers_path.display());
    }

    info!(input = %input.display(), answers = %answers_path.display(), "writing answers");

    let manifest: AnswersManifest = read_json(answers_path)?;
    warn_if_source_changed(input, &manifest)?;

    let mut records = manifest.question_records();
    let book = AnswerBook::from_pairs(&manifest.qa_pairs);
    let segmenter = BlockSegmenter::new()?;
    info!(
        located = records.len(),
        answers = book.len(),
        "loaded answers"
    );
    if book.is_empty() {
        bail!("answers file has no answers: {}", answers_path.display());
    }

    let mut document = DocxDocument::open(input)?;
    let summary = insert_answers(
        &mut document,
        &mut records,
        &book,
        &ContainmentMatcher,
        &segmenter,
    )?;

    info!(
        inserted = summary.inserted,
        skipped = summary.skipped,
        elements = summary.elements,
        "inserted answers into document"
    );

    if summary.inserted == 0 {
        bail!(
            "no answers matched the questions in {}; output not written",
            input.display()
        );
    }

    document.save(output)?;
    info!(output = %output.display(), "saved document with answers");

    Ok(summary)
}

fn warn_if_source_changed(input: &Path, manifest: &AnswersManifest) -> Result<()> {
    let Some(source) = &manifest.source else {
        return Ok(());
    };

    let current = sha256_file(input)?;
    if current != source.sha256 {
        warn!(
            input = %input.display(),
            recorded = %source.path,
            "document changed since questions were extracted; positions may be stale"
        );
    }
    Ok(())
}
