use crate::document::Alignment;

use super::*;

fn segmenter() -> BlockSegmenter {
    BlockSegmenter::new().expect("segmenter regexes should compile")
}

#[test]
fn segment_classifies_each_non_empty_line() {
    let body = "A <b>hub</b> is a layer 1 device.\n\n  • Broadcasts frames  \n<table>Device|Layer;Hub|1</table>\n<diagram>network topology</diagram>\n   \n";

    let blocks = segmenter().segment(body);

    assert_eq!(
        blocks,
        vec![
            AnswerBlock::Paragraph("A <b>hub</b> is a layer 1 device.".to_string()),
            AnswerBlock::Bullet("• Broadcasts frames".to_string()),
            AnswerBlock::Table("Device|Layer;Hub|1".to_string()),
            AnswerBlock::Diagram("network topology".to_string()),
        ]
    );
}

#[test]
fn tagged_line_keeps_only_the_captured_span() {
    let blocks = segmenter().segment("See below: <table>A|B</table> and more text");
    assert_eq!(blocks, vec![AnswerBlock::Table("A|B".to_string())]);
}

#[test]
fn table_tag_wins_over_diagram_tag_on_the_same_line() {
    let blocks = segmenter().segment("<diagram>x</diagram><table>A|B</table>");
    assert_eq!(blocks, vec![AnswerBlock::Table("A|B".to_string())]);
}

#[test]
fn unclosed_block_tag_stays_a_paragraph() {
    let blocks = segmenter().segment("<table>A|B");
    assert_eq!(blocks, vec![AnswerBlock::Paragraph("<table>A|B".to_string())]);
    assert_eq!(blocks[0].kind(), "paragraph");
}

#[test]
fn windows_line_endings_are_trimmed() {
    let blocks = segmenter().segment("first\r\nsecond\r\n");
    assert_eq!(
        blocks,
        vec![
            AnswerBlock::Paragraph("first".to_string()),
            AnswerBlock::Paragraph("second".to_string()),
        ]
    );
}

#[test]
fn descriptor_parses_to_row_major_grid() {
    assert_eq!(
        parse_table_descriptor("A|B;C|D"),
        vec![
            vec!["A".to_string(), "B".to_string()],
            vec!["C".to_string(), "D".to_string()],
        ]
    );
}

#[test]
fn first_row_fixes_the_column_count() {
    let rows = parse_table_descriptor(" Name | Layer ;Hub|1|extra|more;Switch");
    assert_eq!(rows[0], vec!["Name", "Layer"]);
    assert_eq!(rows[1], vec!["Hub", "1"]);
    assert_eq!(rows[2], vec!["Switch"]);
}

#[test]
fn built_table_pads_short_rows_with_empty_cells() {
    let table = build_table("Term|Meaning;<b>MAC</b>", &QuestionFormat::default());

    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.column_count(), 2);
    assert_eq!(table.rows[1].len(), 2);
    assert_eq!(table.rows[1][0].text(), "MAC");
    assert!(table.rows[1][0].paragraphs[0].runs[0].format.bold);
    assert_eq!(table.rows[1][1].text(), "");
    assert_eq!(table.rows[1][1].paragraphs.len(), 1);
    assert_eq!(table.style.as_deref(), Some(ANSWER_TABLE_STYLE));
}

#[test]
fn table_cells_use_the_question_format() {
    let format = QuestionFormat {
        alignment: Some(Alignment::Center),
        font_size: Some(10.0),
        ..QuestionFormat::default()
    };
    let table = build_table("x|y", &format);

    let paragraph = &table.rows[0][1].paragraphs[0];
    assert_eq!(paragraph.alignment, Some(Alignment::Center));
    assert_eq!(paragraph.runs[0].format.font_size, Some(10.0));
}

#[test]
fn diagram_label_wraps_description() {
    assert_eq!(diagram_label("network topology"), "[Diagram: network topology]");
}
