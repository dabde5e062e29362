use anyhow::{Context, Result};
use regex::Regex;

use crate::document::{Paragraph, Table, TableCell};
use crate::markup::{BULLET, render_fragment};
use crate::model::QuestionFormat;

#[cfg(test)]
mod tests;

pub const ANSWER_TABLE_STYLE: &str = "TableGrid";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerBlock {
    Paragraph(String),
    Bullet(String),
    // `r1c1|r1c2;r2c1|r2c2`
    Table(String),
    Diagram(String),
}

impl AnswerBlock {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Paragraph(_) => "paragraph",
            Self::Bullet(_) => "bullet",
            Self::Table(_) => "table",
            Self::Diagram(_) => "diagram",
        }
    }
}

pub struct BlockSegmenter {
    table: Regex,
    diagram: Regex,
}

impl BlockSegmenter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            table: Regex::new(r"<table>(.*?)</table>").context("failed to compile table tag regex")?,
            diagram: Regex::new(r"<diagram>(.*?)</diagram>")
                .context("failed to compile diagram tag regex")?,
        })
    }

    pub fn segment(&self, body: &str) -> Vec<AnswerBlock> {
        body.split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| self.classify(line))
            .collect()
    }

    fn classify(&self, line: &str) -> AnswerBlock {
        if let Some(descriptor) = capture_inner(&self.table, line) {
            return AnswerBlock::Table(descriptor.to_string());
        }
        if let Some(description) = capture_inner(&self.diagram, line) {
            return AnswerBlock::Diagram(description.to_string());
        }
        if line.starts_with(BULLET) {
            AnswerBlock::Bullet(line.to_string())
        } else {
            AnswerBlock::Paragraph(line.to_string())
        }
    }
}

fn capture_inner<'a>(pattern: &Regex, line: &'a str) -> Option<&'a str> {
    pattern
        .captures(line)
        .and_then(|captures| captures.get(1))
        .map(|inner| inner.as_str())
}

pub fn diagram_label(description: &str) -> String {
    format!("[Diagram: {description}]")
}

// The first row fixes the column count.
pub fn parse_table_descriptor(descriptor: &str) -> Vec<Vec<String>> {
    let rows = descriptor.split(';').collect::<Vec<_>>();
    let columns = rows.first().map(|row| row.split('|').count()).unwrap_or(0);

    rows.iter()
        .map(|row| {
            row.split('|')
                .take(columns)
                .map(|cell| cell.trim().to_string())
                .collect()
        })
        .collect()
}

pub fn build_table(descriptor: &str, format: &QuestionFormat) -> Table {
    let parsed = parse_table_descriptor(descriptor);
    let columns = parsed.first().map(Vec::len).unwrap_or(0);

    let rows = parsed
        .iter()
        .map(|cells| {
            (0..columns)
                .map(|column| {
                    let mut paragraph = Paragraph::default();
                    if let Some(text) = cells.get(column) {
                        render_fragment(&mut paragraph, text, format);
                    }
                    TableCell {
                        paragraphs: vec![paragraph],
                    }
                })
                .collect()
        })
        .collect();

    Table {
        rows,
        style: Some(ANSWER_TABLE_STYLE.to_string()),
    }
}
