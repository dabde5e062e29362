use crate::document::{Alignment, BodyElement, Rgb, Run, RunFormat, Table, TableCell};

use super::*;

fn paragraph(text: &str) -> Paragraph {
    Paragraph {
        runs: vec![Run::new(text, RunFormat::default())],
        ..Paragraph::default()
    }
}

fn extractor() -> QuestionExtractor {
    QuestionExtractor::new().expect("question regexes should compile")
}

fn quiz() -> QuizSectionParser {
    QuizSectionParser::new().expect("quiz regexes should compile")
}

#[test]
fn locator_records_numbered_paragraphs_with_positions() {
    let document = Document::from_paragraphs(vec![
        paragraph("Lab 3: Network devices"),
        paragraph("1. What is a hub?"),
        paragraph("Some notes"),
        paragraph("  2.   Compare a switch and a router.  "),
    ]);

    let records = QuestionLocator::new().unwrap().locate(&document);

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].position, 1);
    assert_eq!(records[0].text, "What is a hub?");
    assert_eq!(records[1].position, 3);
    assert_eq!(records[1].text, "Compare a switch and a router.");
}

#[test]
fn locator_skips_empty_and_unnumbered_lines() {
    let document = Document::from_paragraphs(vec![
        paragraph("3."),
        paragraph("3.   "),
        paragraph("Question 4. Why?"),
        paragraph("a. lettered item"),
    ]);

    assert!(QuestionLocator::new().unwrap().locate(&document).is_empty());
}

#[test]
fn locator_counts_tables_in_positions() {
    let document = Document {
        elements: vec![
            BodyElement::Paragraph(paragraph("Intro")),
            BodyElement::Table(Table::default()),
            BodyElement::Other,
            BodyElement::Paragraph(paragraph("1. Define latency.")),
        ],
    };

    let records = QuestionLocator::new().unwrap().locate(&document);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].position, 3);
}

#[test]
fn format_comes_from_first_visible_run_and_paragraph_alignment() {
    let styled = RunFormat {
        font_name: Some("Calibri".to_string()),
        font_size: Some(12.0),
        color: Some(Rgb::new(0, 0, 128)),
        bold: true,
        italic: false,
    };
    let question = Paragraph {
        runs: vec![
            Run::new("   ", RunFormat {
                font_name: Some("Symbol".to_string()),
                ..RunFormat::default()
            }),
            Run::new("1. Explain ARP.", styled),
        ],
        alignment: Some(Alignment::Justify),
        ..Paragraph::default()
    };

    let records = QuestionLocator::new()
        .unwrap()
        .locate(&Document::from_paragraphs(vec![question]));

    let format = &records[0].format;
    assert_eq!(format.font_name.as_deref(), Some("Calibri"));
    assert_eq!(format.font_size, Some(12.0));
    assert_eq!(format.font_color, Some(Rgb::new(0, 0, 128)));
    assert_eq!(format.alignment, Some(Alignment::Justify));
}

#[test]
fn clean_text_collapses_whitespace_and_filters_symbols() {
    let cleaned = quiz().clean_text("  What  is\n\tthe  MTU™ of • Ethernet?  ");
    assert_eq!(cleaned, "What is the MTU of -  Ethernet?");
}

#[test]
fn numbered_items_split_at_each_number_and_drop_short_items() {
    let items = quiz().numbered_items(
        "1. What is a MAC address? 2. Why? 3. Explain the role of version 2.0 of DHCP.",
    );

    assert_eq!(
        items,
        vec![
            "What is a MAC address?".to_string(),
            "Explain the role of version 2.0 of DHCP.".to_string(),
        ]
    );
}

#[test]
fn quiz_sections_capture_the_text_between_header_and_references() {
    let text = "Aim\nQuiz(Answer briefly)\n1. What is a subnet mask?\n2. Define a default gateway.\nReferences used by the students:\nBook\n\
                Quiz: (Sufficient space to be provided for the answers)\n1. What does TTL limit?\nSuggested Reference\n";

    let sections = quiz().sections(text);

    assert_eq!(sections.len(), 2);
    assert!(sections[0].starts_with("1. What is a subnet mask?"));
    assert!(sections[0].ends_with("Define a default gateway."));
    assert_eq!(sections[1], "1. What does TTL limit?");
}

#[test]
fn quiz_without_reference_footer_is_not_a_section() {
    assert!(quiz().sections("Quiz(1)\n1. What is NAT translation?").is_empty());
}

#[test]
fn document_prefers_quiz_sections_over_located_paragraphs() {
    let document = Document::from_paragraphs(vec![
        paragraph("1. Set up the lab bench."),
        paragraph("Quiz(Attempt all)"),
        paragraph("1. What is the purpose of ICMP?"),
        paragraph("Suggested Reference:"),
    ]);

    let extracted = extractor().extract_document(&document);

    assert_eq!(extracted.kind, DocumentKind::Docx);
    assert_eq!(extracted.quiz_sections, 1);
    assert_eq!(extracted.questions, vec!["What is the purpose of ICMP?".to_string()]);
    assert_eq!(extracted.records.len(), 2);
}

#[test]
fn document_without_quiz_uses_located_question_texts() {
    let document = Document::from_paragraphs(vec![
        paragraph("1. What is a hub?"),
        paragraph("2. Compare TCP and UDP."),
    ]);

    let extracted = extractor().extract_document(&document);

    assert_eq!(extracted.quiz_sections, 0);
    assert_eq!(
        extracted.questions,
        vec!["What is a hub?".to_string(), "Compare TCP and UDP.".to_string()]
    );
}

#[test]
fn document_context_includes_table_cells() {
    let table = Table {
        rows: vec![vec![TableCell {
            paragraphs: vec![paragraph("cell text")],
        }]],
        style: None,
    };
    let document = Document {
        elements: vec![
            BodyElement::Table(table),
            BodyElement::Paragraph(paragraph("1. Explain VLAN tagging.")),
        ],
    };

    let extracted = extractor().extract_document(&document);
    assert_eq!(extracted.context, "1. Explain VLAN tagging.\ncell text");
}

#[test]
fn plain_text_falls_back_to_numbered_items_without_records() {
    let extracted = extractor().extract_text(
        "Experiment 4\n1. Explain the three way handshake.\n2. List the TCP flags used.".to_string(),
    );

    assert_eq!(extracted.kind, DocumentKind::Pdf);
    assert!(extracted.records.is_empty());
    assert_eq!(
        extracted.questions,
        vec![
            "Explain the three way handshake.".to_string(),
            "List the TCP flags used.".to_string(),
        ]
    );
}
