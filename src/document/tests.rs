use std::path::PathBuf;

use docx_rs::DocumentChild;
use serde_json::json;

use super::docx::{element_from_json, element_to_child};
use super::pdf::split_pages;
use super::*;

#[test]
fn document_kind_is_detected_from_extension() {
    assert_eq!(
        DocumentKind::from_path(&PathBuf::from("manual.DOCX")).unwrap(),
        DocumentKind::Docx
    );
    assert_eq!(
        DocumentKind::from_path(&PathBuf::from("notes/manual.pdf")).unwrap(),
        DocumentKind::Pdf
    );
    assert!(DocumentKind::from_path(&PathBuf::from("manual.odt")).is_err());
    assert!(DocumentKind::from_path(&PathBuf::from("manual")).is_err());
}

#[test]
fn rgb_parses_triple_and_hex_forms() {
    assert_eq!(Rgb::parse_triple("0:102:0"), Some(Rgb::new(0, 102, 0)));
    assert_eq!(Rgb::parse_triple(" 255 : 1 : 2 "), Some(Rgb::new(255, 1, 2)));
    assert_eq!(Rgb::parse_triple("1:2"), None);
    assert_eq!(Rgb::parse_triple("1:2:3:4"), None);
    assert_eq!(Rgb::parse_triple("300:0:0"), None);

    assert_eq!(Rgb::parse_hex("006600"), Some(Rgb::new(0, 102, 0)));
    assert_eq!(Rgb::parse_hex("#FF0080"), Some(Rgb::new(255, 0, 128)));
    assert_eq!(Rgb::parse_hex("auto"), None);

    assert_eq!(Rgb::new(0, 102, 0).to_hex(), "006600");
    assert_eq!(Rgb::new(0, 102, 0).to_triple(), "0:102:0");
}

#[test]
fn alignment_accepts_names_and_numeric_forms() {
    assert_eq!(Alignment::parse("center"), Some(Alignment::Center));
    assert_eq!(Alignment::parse("CENTER (1)"), Some(Alignment::Center));
    assert_eq!(Alignment::parse("2"), Some(Alignment::Right));
    assert_eq!(Alignment::parse("both"), Some(Alignment::Justify));
    assert_eq!(Alignment::parse("start"), Some(Alignment::Left));
    assert_eq!(Alignment::parse("sideways"), None);
}

#[test]
fn context_text_lists_paragraphs_before_table_cells() {
    let mut intro = Paragraph::default();
    intro.push_run("Intro", RunFormat::default());
    let mut outro = Paragraph::default();
    outro.push_run("Outro", RunFormat::default());
    let mut cell = Paragraph::default();
    cell.push_run("Cell", RunFormat::default());

    let document = Document {
        elements: vec![
            BodyElement::Paragraph(intro),
            BodyElement::Table(Table {
                rows: vec![vec![TableCell {
                    paragraphs: vec![cell],
                }]],
                style: None,
            }),
            BodyElement::Other,
            BodyElement::Paragraph(outro),
        ],
    };

    assert_eq!(document.context_text(), "Intro\nOutro\nCell");
    let positions = document
        .paragraphs()
        .map(|(position, _)| position)
        .collect::<Vec<_>>();
    assert_eq!(positions, vec![0, 3]);
}

#[test]
fn in_memory_body_rejects_positions_past_the_end() {
    let mut document = Document::from_paragraphs(vec![Paragraph::default()]);
    assert!(
        document
            .insert_element(1, BodyElement::Paragraph(Paragraph::default()))
            .is_ok()
    );
    assert!(
        document
            .insert_element(5, BodyElement::Paragraph(Paragraph::default()))
            .is_err()
    );
    assert_eq!(document.elements.len(), 2);
}

#[test]
fn serialized_paragraph_maps_runs_and_formatting() {
    let value = json!({
        "type": "paragraph",
        "data": {
            "id": "1",
            "children": [
                {
                    "type": "run",
                    "data": {
                        "runProperty": {
                            "sz": 24,
                            "color": "FF0000",
                            "bold": true,
                            "fonts": { "ascii": "Arial" }
                        },
                        "children": [
                            { "type": "text", "data": { "preserveSpace": true, "text": "1. What" } },
                            { "type": "tab" },
                            { "type": "text", "data": { "preserveSpace": true, "text": "is a hub?" } }
                        ]
                    }
                },
                {
                    "type": "hyperlink",
                    "data": {
                        "children": [
                            {
                                "type": "run",
                                "data": {
                                    "runProperty": {},
                                    "children": [
                                        { "type": "text", "data": { "text": " (see notes)" } }
                                    ]
                                }
                            }
                        ]
                    }
                }
            ],
            "property": { "alignment": "center", "style": "Normal" },
            "hasNumbering": false
        }
    });

    let BodyElement::Paragraph(paragraph) = element_from_json(&value) else {
        panic!("expected paragraph");
    };

    assert_eq!(paragraph.text(), "1. What\tis a hub? (see notes)");
    assert_eq!(paragraph.alignment, Some(Alignment::Center));
    assert_eq!(paragraph.style.as_deref(), Some("Normal"));
    assert_eq!(paragraph.runs.len(), 2);

    let format = &paragraph.runs[0].format;
    assert_eq!(format.font_name.as_deref(), Some("Arial"));
    assert_eq!(format.font_size, Some(12.0));
    assert_eq!(format.color, Some(Rgb::new(255, 0, 0)));
    assert!(format.bold);
    assert!(!format.italic);
    assert_eq!(paragraph.runs[1].format, RunFormat::default());
}

#[test]
fn serialized_table_maps_cells_in_row_major_order() {
    let cell = |text: &str| {
        json!({
            "type": "tableCell",
            "data": {
                "children": [
                    {
                        "type": "paragraph",
                        "data": {
                            "children": [
                                { "type": "run", "data": { "children": [
                                    { "type": "text", "data": { "text": text } }
                                ] } }
                            ],
                            "property": {}
                        }
                    }
                ]
            }
        })
    };
    let value = json!({
        "type": "table",
        "data": {
            "rows": [
                { "type": "tableRow", "data": { "cells": [cell("A"), cell("B")] } },
                { "type": "tableRow", "data": { "cells": [cell("C"), cell("D")] } }
            ]
        }
    });

    let BodyElement::Table(table) = element_from_json(&value) else {
        panic!("expected table");
    };

    let texts = table
        .rows
        .iter()
        .flatten()
        .map(TableCell::text)
        .collect::<Vec<_>>();
    assert_eq!(texts, vec!["A", "B", "C", "D"]);
    assert_eq!(table.column_count(), 2);
}

#[test]
fn unknown_body_content_is_opaque() {
    let value = json!({ "type": "bookmarkStart", "data": { "id": 0 } });
    assert_eq!(element_from_json(&value), BodyElement::Other);
    assert!(element_to_child(&BodyElement::Other).is_err());
}

#[test]
fn rendered_elements_convert_to_docx_children() {
    let mut paragraph = Paragraph {
        alignment: Some(Alignment::Right),
        indent: Some(Indent::hanging(18.0)),
        space_before_pt: Some(12.0),
        ..Paragraph::default()
    };
    paragraph.push_run(
        "Answer: ",
        RunFormat {
            bold: true,
            color: Some(Rgb::new(0, 102, 0)),
            font_size: Some(11.0),
            font_name: Some("Calibri".to_string()),
            ..RunFormat::default()
        },
    );

    assert!(matches!(
        element_to_child(&BodyElement::Paragraph(paragraph.clone())),
        Ok(DocumentChild::Paragraph(_))
    ));

    let table = Table {
        rows: vec![vec![TableCell {
            paragraphs: vec![paragraph],
        }]],
        style: Some("TableGrid".to_string()),
    };
    assert!(matches!(
        element_to_child(&BodyElement::Table(table)),
        Ok(DocumentChild::Table(_))
    ));
}

#[test]
fn pdf_pages_split_on_form_feed_and_drop_trailing_blanks() {
    let pages = split_pages("Page one\u{000C}Page\u{0000} two\u{000C}  \n\u{000C}");
    assert_eq!(pages, vec!["Page one".to_string(), "Page two".to_string()]);
}

#[test]
fn unit_conversions_round_to_nearest() {
    assert_eq!(points_to_twips(20.0), 400);
    assert_eq!(points_to_twips(0.25 * POINTS_PER_INCH), 360);
    assert_eq!(points_to_half_points(10.5), 21);
}
