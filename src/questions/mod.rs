use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::{debug, info};

use crate::document::{Document, DocumentKind, DocxDocument, Paragraph, extract_pdf_text};
use crate::model::{QuestionFormat, QuestionRecord};

#[cfg(test)]
mod tests;

const MIN_QUESTION_CHARS: usize = 10;

pub struct QuestionLocator {
    numbered: Regex,
}

impl QuestionLocator {
    pub fn new() -> Result<Self> {
        Ok(Self {
            numbered: Regex::new(r"^\s*(\d+)\.\s*(.*)$")
                .context("failed to compile numbered question regex")?,
        })
    }

    // Continuation lines of multi-line questions are not joined.
    pub fn locate(&self, document: &Document) -> Vec<QuestionRecord> {
        let mut records = Vec::new();

        for (position, paragraph) in document.paragraphs() {
            let text = paragraph.text();
            let Some((number, question)) = self.split_numbered(text.trim()) else {
                continue;
            };

            debug!(position, number, question, "found question");
            records.push(QuestionRecord {
                position,
                text: question.to_string(),
                format: capture_format(paragraph),
            });
        }

        records
    }

    fn split_numbered<'a>(&self, text: &'a str) -> Option<(&'a str, &'a str)> {
        let captures = self.numbered.captures(text)?;
        let number = captures.get(1)?.as_str();
        let question = captures.get(2)?.as_str().trim();
        if question.is_empty() {
            return None;
        }
        Some((number, question))
    }
}

fn capture_format(paragraph: &Paragraph) -> QuestionFormat {
    let mut format = QuestionFormat {
        alignment: paragraph.alignment,
        ..QuestionFormat::default()
    };

    if let Some(run) = paragraph
        .runs
        .iter()
        .find(|run| !run.text.trim().is_empty())
    {
        format.font_name = run.format.font_name.clone();
        format.font_size = run.format.font_size;
        format.font_color = run.format.color;
    }

    format
}

pub struct QuizSectionParser {
    section: Regex,
    item_start: Regex,
    item_boundary: Regex,
    whitespace: Regex,
    disallowed: Regex,
}

impl QuizSectionParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            section: Regex::new(
                r"(?s)(Quiz\(.*?\)|Quiz: \(Sufficient space to be provided for the answers\))(.*?)(References used by the students:?|Suggested Reference:?)",
            )
            .context("failed to compile quiz section regex")?,
            item_start: Regex::new(r"\d+\.\s*").context("failed to compile item start regex")?,
            item_boundary: Regex::new(r"\d+\.\s")
                .context("failed to compile item boundary regex")?,
            whitespace: Regex::new(r"\s+").context("failed to compile whitespace regex")?,
            disallowed: Regex::new(r"[^\w\s.,:;\-()\[\]{}?!]")
                .context("failed to compile character filter regex")?,
        })
    }

    pub fn sections(&self, full_text: &str) -> Vec<String> {
        self.section
            .captures_iter(full_text)
            .filter_map(|captures| captures.get(2))
            .map(|body| body.as_str().trim().to_string())
            .collect()
    }

    pub fn clean_text(&self, text: &str) -> String {
        let collapsed = self.whitespace.replace_all(text, " ");
        let bulleted = collapsed.replace('•', "- ");
        self.disallowed
            .replace_all(&bulleted, "")
            .trim()
            .to_string()
    }

    pub fn numbered_items(&self, text: &str) -> Vec<String> {
        let cleaned = self.clean_text(text);
        let mut items = Vec::new();
        let mut position = 0;

        while let Some(start) = self.item_start.find_at(&cleaned, position) {
            let body_start = start.end();
            let body_end = self
                .item_boundary
                .find_at(&cleaned, body_start)
                .map(|boundary| boundary.start())
                .unwrap_or(cleaned.len());

            let item = self.clean_text(&cleaned[body_start..body_end]);
            if item.chars().count() > MIN_QUESTION_CHARS {
                items.push(item);
            }

            if body_end >= cleaned.len() {
                break;
            }
            position = body_end;
        }

        items
    }
}

#[derive(Debug, Clone)]
pub struct ExtractedQuestions {
    pub kind: DocumentKind,
    pub questions: Vec<String>,
    pub context: String,
    pub records: Vec<QuestionRecord>,
    pub quiz_sections: usize,
}

pub struct QuestionExtractor {
    locator: QuestionLocator,
    quiz: QuizSectionParser,
}

impl QuestionExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            locator: QuestionLocator::new()?,
            quiz: QuizSectionParser::new()?,
        })
    }

    pub fn extract_file(&self, path: &Path) -> Result<ExtractedQuestions> {
        match DocumentKind::from_path(path)? {
            DocumentKind::Docx => {
                info!(path = %path.display(), "processing docx document");
                let document = DocxDocument::open(path)?;
                Ok(self.extract_document(&document.snapshot()))
            }
            DocumentKind::Pdf => {
                info!(path = %path.display(), "processing pdf document");
                let text = extract_pdf_text(path)?;
                Ok(self.extract_text(text))
            }
        }
    }

    pub fn extract_document(&self, document: &Document) -> ExtractedQuestions {
        let records = self.locator.locate(document);
        let context = document.context_text();
        let sections = self.quiz.sections(&context);

        let questions = if !sections.is_empty() {
            self.section_questions(&sections)
        } else if !records.is_empty() {
            records.iter().map(|record| record.text.clone()).collect()
        } else {
            self.quiz.numbered_items(&context)
        };

        ExtractedQuestions {
            kind: DocumentKind::Docx,
            questions,
            context,
            records,
            quiz_sections: sections.len(),
        }
    }

    pub fn extract_text(&self, text: String) -> ExtractedQuestions {
        let sections = self.quiz.sections(&text);
        let questions = if sections.is_empty() {
            self.quiz.numbered_items(&text)
        } else {
            self.section_questions(&sections)
        };

        ExtractedQuestions {
            kind: DocumentKind::Pdf,
            questions,
            context: text,
            records: Vec::new(),
            quiz_sections: sections.len(),
        }
    }

    fn section_questions(&self, sections: &[String]) -> Vec<String> {
        let mut questions = Vec::new();
        for (index, section) in sections.iter().enumerate() {
            let items = self.quiz.numbered_items(section);
            info!(section = index + 1, questions = items.len(), "parsed quiz section");
            questions.extend(items);
        }
        questions
    }
}
