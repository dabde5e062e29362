use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::generator::GenerationOptions;

#[derive(Parser, Debug)]
#[command(
    name = "lab-answers",
    version,
    about = "Answer numbered lab-manual questions and write the answers back into the document"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Locate questions in a DOCX or PDF and save them with the document context.
    Extract(ExtractArgs),
    /// Generate answers for questions not yet answered.
    Generate(GenerateArgs),
    /// Insert saved answers after their questions and save a new DOCX.
    Write(WriteArgs),
    /// Run extract, generate and write in sequence.
    Process(ProcessArgs),
    /// Summarize the questions and answers files.
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[arg(long, short = 'i')]
    pub input: PathBuf,

    #[arg(long, short = 'q', default_value = "questions_data.json")]
    pub questions: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct GenerationArgs {
    #[arg(long, default_value = crate::generator::DEFAULT_MODEL)]
    pub model: String,

    #[arg(long, default_value = crate::generator::DEFAULT_ENDPOINT)]
    pub endpoint: String,

    #[arg(long, default_value_t = 60)]
    pub timeout_secs: u64,

    #[arg(long, default_value_t = 1)]
    pub concurrency: usize,

    #[arg(long, default_value_t = crate::generator::DEFAULT_CONTEXT_CHARS)]
    pub context_chars: usize,
}

impl GenerationArgs {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn options(&self) -> GenerationOptions {
        GenerationOptions {
            timeout: self.timeout(),
            concurrency: self.concurrency.max(1),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(long, short = 'q', default_value = "questions_data.json")]
    pub questions: PathBuf,

    #[arg(long, short = 'a', default_value = "answers_data.json")]
    pub answers: PathBuf,

    #[command(flatten)]
    pub generation: GenerationArgs,
}

#[derive(Args, Debug, Clone)]
pub struct WriteArgs {
    #[arg(long, short = 'i')]
    pub input: PathBuf,

    #[arg(long, short = 'o')]
    pub output: PathBuf,

    #[arg(long, short = 'a', default_value = "answers_data.json")]
    pub answers: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct ProcessArgs {
    #[arg(long, short = 'i')]
    pub input: PathBuf,

    #[arg(long, short = 'o')]
    pub output: PathBuf,

    #[arg(long, short = 'q', default_value = "questions_data.json")]
    pub questions: PathBuf,

    #[arg(long, short = 'a', default_value = "answers_data.json")]
    pub answers: PathBuf,

    #[command(flatten)]
    pub generation: GenerationArgs,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, short = 'q', default_value = "questions_data.json")]
    pub questions: PathBuf,

    #[arg(long, short = 'a', default_value = "answers_data.json")]
    pub answers: PathBuf,
}
