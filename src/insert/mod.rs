use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::answer::{AnswerBlock, BlockSegmenter, build_table, diagram_label};
use crate::document::{BodyElement, DocumentBody, Indent, Paragraph, Rgb, RunFormat};
use crate::markup::render_fragment;
use crate::matcher::{AnswerBook, AnswerMatcher};
use crate::model::{QuestionFormat, QuestionRecord};


pub const ANSWER_HEADING: &str = "Answer: ";
pub const ANSWER_HEADING_COLOR: Rgb = Rgb::new(0, 102, 0);
pub const ANSWER_SPACE_BEFORE_PT: f32 = 12.0;
pub const ANSWER_INDENT_PT: f32 = 20.0;
pub const ANSWER_PARAGRAPH_STYLE: &str = "Normal";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionCursor {
    anchor: usize,
    current: usize,
}

impl InsertionCursor {
    pub fn after(anchor: usize) -> Self {
        Self {
            anchor,
            current: anchor + 1,
        }
    }

    pub fn position(&self) -> usize {
        self.current
    }

    // A table counts as one unit like any paragraph.
    pub fn place<B: DocumentBody + ?Sized>(
        &mut self,
        body: &mut B,
        element: BodyElement,
    ) -> Result<()> {
        body.insert_element(self.current, element)?;
        self.current += 1;
        Ok(())
    }

    pub fn offset(&self) -> usize {
        self.current - (self.anchor + 1)
    }
}

pub fn propagate_offset(records: &mut [QuestionRecord], anchor: usize, offset: usize) {
    if offset == 0 {
        return;
    }
    for record in records.iter_mut().filter(|record| record.position > anchor) {
        record.position += offset;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertionSummary {
    pub inserted: usize,
    pub skipped: usize,
    pub elements: usize,
}

pub fn insert_answers<B, M>(
    body: &mut B,
    records: &mut [QuestionRecord],
    book: &AnswerBook,
    matcher: &M,
    segmenter: &BlockSegmenter,
) -> Result<InsertionSummary>
where
    B: DocumentBody + ?Sized,
    M: AnswerMatcher + ?Sized,
{
    let mut summary = InsertionSummary::default();

    for index in 0..records.len() {
        let (current, pending) = records[index..].split_at_mut(1);
        let record = &current[0];

        let Some(found) = matcher.find(&record.text, book) else {
            warn!(
                position = record.position,
                question = %preview(&record.text),
                "no answer found for question; skipping"
            );
            summary.skipped += 1;
            continue;
        };

        debug!(
            position = record.position,
            matched = found.question,
            kind = ?found.kind,
            "matched answer"
        );
        let blocks = segmenter.segment(found.answer);
        let mut cursor = InsertionCursor::after(record.position);

        cursor
            .place(body, BodyElement::Paragraph(answer_heading(&record.format)))
            .with_context(|| format!("failed to insert answer for question at {}", record.position))?;
        for block in &blocks {
            debug!(kind = block.kind(), position = cursor.position(), "inserting answer block");
            cursor.place(body, render_block(block, &record.format))?;
        }
        cursor.place(body, BodyElement::Paragraph(Paragraph::default()))?;

        let offset = cursor.offset();
        info!(
            position = record.position,
            blocks = blocks.len(),
            offset,
            question = %preview(&record.text),
            "inserted answer"
        );
        propagate_offset(pending, record.position, offset);

        summary.inserted += 1;
        summary.elements += offset;
    }

    Ok(summary)
}

pub fn answer_heading(format: &QuestionFormat) -> Paragraph {
    let mut heading = Paragraph {
        space_before_pt: Some(ANSWER_SPACE_BEFORE_PT),
        style: Some(ANSWER_PARAGRAPH_STYLE.to_string()),
        ..Paragraph::default()
    };
    heading.push_run(
        ANSWER_HEADING,
        RunFormat {
            bold: true,
            color: Some(ANSWER_HEADING_COLOR),
            ..format.run_format()
        },
    );
    heading
}

pub fn render_block(block: &AnswerBlock, format: &QuestionFormat) -> BodyElement {
    match block {
        AnswerBlock::Paragraph(text) => {
            let mut paragraph = answer_paragraph();
            paragraph.indent = Some(Indent::left(ANSWER_INDENT_PT));
            render_fragment(&mut paragraph, text, format);
            BodyElement::Paragraph(paragraph)
        }
        AnswerBlock::Bullet(text) => {
            let mut paragraph = answer_paragraph();
            render_fragment(&mut paragraph, text, format);
            BodyElement::Paragraph(paragraph)
        }
        AnswerBlock::Table(descriptor) => BodyElement::Table(build_table(descriptor, format)),
        AnswerBlock::Diagram(description) => {
            let mut paragraph = Paragraph::default();
            paragraph.push_run(
                diagram_label(description),
                RunFormat {
                    italic: true,
                    ..format.run_format()
                },
            );
            BodyElement::Paragraph(paragraph)
        }
    }
}

fn answer_paragraph() -> Paragraph {
    Paragraph {
        style: Some(ANSWER_PARAGRAPH_STYLE.to_string()),
        ..Paragraph::default()
    }
}

fn preview(text: &str) -> String {
    const PREVIEW_CHARS: usize = 50;
    if text.chars().count() <= PREVIEW_CHARS {
        return text.to_string();
    }
    let mut short = text.chars().take(PREVIEW_CHARS).collect::<String>();
    short.push_str("...");
    short
}
