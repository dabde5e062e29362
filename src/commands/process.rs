use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::ProcessArgs;
use crate::commands::{extract, generate, write};
use crate::document::DocumentKind;

pub fn run(args: ProcessArgs) -> Result<()> {
    info!(
        input = %args.input.display(),
        output = %args.output.display(),
        questions = %args.questions.display(),
        answers = %args.answers.display(),
        "processing lab manual"
    );

    extract::extract(&args.input, &args.questions).context("question extraction failed")?;
    generate::generate(&args.questions, &args.answers, &args.generation)
        .context("answer generation failed")?;

    if DocumentKind::from_path(&args.input)? != DocumentKind::Docx {
        warn!(
            input = %args.input.display(),
            answers = %args.answers.display(),
            "answers saved; only docx documents can be annotated"
        );
        return Ok(());
    }

    write::write(&args.input, &args.answers, &args.output).context("writing answers failed")?;

    info!(output = %args.output.display(), "processing complete");
    Ok(())
}
