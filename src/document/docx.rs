use std::fs::{self, File};
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use docx_rs::{
    AlignmentType, DocumentChild, Docx, LineSpacing, RunFonts, SpecialIndentType, TableRow,
    read_docx,
};
use serde_json::Value;
use tracing::debug;

use super::{
    Alignment, BodyElement, Document, DocumentBody, Paragraph, Rgb, Run, RunFormat, Table,
    TableCell, points_to_half_points, points_to_twips,
};

pub struct DocxDocument {
    docx: Docx,
}

impl DocxDocument {
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let docx =
            read_docx(&bytes).map_err(|err| anyhow!("failed to parse {}: {err}", path.display()))?;
        Ok(Self { docx })
    }

    pub fn snapshot(&self) -> Document {
        let elements = self
            .docx
            .document
            .children
            .iter()
            .enumerate()
            .map(|(position, child)| match serde_json::to_value(child) {
                Ok(value) => element_from_json(&value),
                Err(err) => {
                    debug!(position, error = %err, "body element not inspectable");
                    BodyElement::Other
                }
            })
            .collect();

        Document { elements }
    }

    pub fn save(self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        self.docx
            .build()
            .pack(file)
            .map_err(|err| anyhow!("failed to pack {}: {err}", path.display()))?;
        Ok(())
    }
}

impl DocumentBody for DocxDocument {
    fn insert_element(&mut self, position: usize, element: BodyElement) -> Result<()> {
        let children = &mut self.docx.document.children;
        if position > children.len() {
            bail!(
                "insertion position {position} is past the end of the document body ({} elements)",
                children.len()
            );
        }
        children.insert(position, element_to_child(&element)?);
        Ok(())
    }
}

fn data(value: &Value) -> &Value {
    value.get("data").unwrap_or(value)
}

fn kind(value: &Value) -> Option<&str> {
    value.get("type").and_then(Value::as_str)
}

fn scalar_str(value: &Value) -> Option<&str> {
    value
        .as_str()
        .or_else(|| value.get("val").and_then(Value::as_str))
}

fn scalar_f64(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.get("val").and_then(Value::as_f64))
}

fn flag(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(enabled) => *enabled,
        other => other
            .get("val")
            .and_then(Value::as_bool)
            .unwrap_or(true),
    }
}

pub(super) fn element_from_json(value: &Value) -> BodyElement {
    match kind(value) {
        Some("paragraph") => BodyElement::Paragraph(paragraph_from_json(data(value))),
        Some("table") => BodyElement::Table(table_from_json(data(value))),
        _ => BodyElement::Other,
    }
}

fn paragraph_from_json(value: &Value) -> Paragraph {
    let mut paragraph = Paragraph::default();
    if let Some(children) = value.get("children").and_then(Value::as_array) {
        collect_runs(children, &mut paragraph.runs);
    }

    let property = value.get("property");
    paragraph.alignment = property
        .and_then(|p| p.get("alignment"))
        .and_then(scalar_str)
        .and_then(Alignment::parse);
    paragraph.style = property
        .and_then(|p| p.get("style"))
        .and_then(scalar_str)
        .map(ToOwned::to_owned);

    paragraph
}

// Hyperlinks and tracked insertions nest their runs one level down.
fn collect_runs(children: &[Value], runs: &mut Vec<Run>) {
    for child in children {
        if kind(child) == Some("run") {
            runs.push(run_from_json(data(child)));
        } else if let Some(nested) = data(child).get("children").and_then(Value::as_array) {
            collect_runs(nested, runs);
        }
    }
}

fn run_from_json(value: &Value) -> Run {
    let property = value.get("runProperty");
    let mut format = RunFormat::default();

    format.font_name = property
        .and_then(|p| p.get("fonts"))
        .and_then(|fonts| {
            ["ascii", "hiAnsi", "eastAsia", "cs"]
                .iter()
                .find_map(|key| fonts.get(key).and_then(Value::as_str))
        })
        .map(ToOwned::to_owned);
    format.font_size = property
        .and_then(|p| p.get("sz"))
        .and_then(scalar_f64)
        .map(|half_points| (half_points / 2.0) as f32);
    format.color = property
        .and_then(|p| p.get("color"))
        .and_then(scalar_str)
        .and_then(Rgb::parse_hex);
    format.bold = property.and_then(|p| p.get("bold")).is_some_and(flag);
    format.italic = property.and_then(|p| p.get("italic")).is_some_and(flag);

    let mut text = String::new();
    for child in value
        .get("children")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
    {
        match kind(child) {
            Some("text") => {
                if let Some(fragment) = data(child).get("text").and_then(Value::as_str) {
                    text.push_str(fragment);
                }
            }
            Some("tab") => text.push('\t'),
            Some("break") => text.push('\n'),
            _ => {}
        }
    }

    Run { text, format }
}

fn table_from_json(value: &Value) -> Table {
    let mut table = Table::default();

    for row in value
        .get("rows")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
    {
        let mut cells = Vec::new();
        for cell in data(row)
            .get("cells")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
        {
            let paragraphs = data(cell)
                .get("children")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
                .filter(|content| kind(content) == Some("paragraph"))
                .map(|content| paragraph_from_json(data(content)))
                .collect();
            cells.push(TableCell { paragraphs });
        }
        table.rows.push(cells);
    }

    table
}

pub(super) fn element_to_child(element: &BodyElement) -> Result<DocumentChild> {
    match element {
        BodyElement::Paragraph(paragraph) => {
            Ok(DocumentChild::Paragraph(Box::new(build_paragraph(paragraph))))
        }
        BodyElement::Table(table) => Ok(DocumentChild::Table(Box::new(build_table(table)))),
        BodyElement::Other => bail!("opaque body elements cannot be written"),
    }
}

fn build_paragraph(source: &Paragraph) -> docx_rs::Paragraph {
    let mut paragraph = docx_rs::Paragraph::new();
    for run in &source.runs {
        paragraph = paragraph.add_run(build_run(run));
    }

    if let Some(style) = &source.style {
        paragraph = paragraph.style(style.as_str());
    }
    if let Some(alignment) = source.alignment {
        paragraph = paragraph.align(alignment_type(alignment));
    }
    if let Some(indent) = source.indent {
        let special = if indent.first_line_pt < 0.0 {
            Some(SpecialIndentType::Hanging(points_to_twips(
                -indent.first_line_pt,
            )))
        } else if indent.first_line_pt > 0.0 {
            Some(SpecialIndentType::FirstLine(points_to_twips(
                indent.first_line_pt,
            )))
        } else {
            None
        };
        paragraph = paragraph.indent(Some(points_to_twips(indent.left_pt)), special, None, None);
    }
    if let Some(before) = source.space_before_pt {
        let twips = points_to_twips(before).max(0) as u32;
        paragraph = paragraph.line_spacing(LineSpacing::new().before(twips));
    }

    paragraph
}

fn build_run(source: &Run) -> docx_rs::Run {
    let format = &source.format;
    let mut run = docx_rs::Run::new().add_text(source.text.as_str());

    if format.bold {
        run = run.bold();
    }
    if format.italic {
        run = run.italic();
    }
    if let Some(size) = format.font_size {
        run = run.size(points_to_half_points(size));
    }
    if let Some(color) = format.color {
        let hex = color.to_hex();
        run = run.color(hex.as_str());
    }
    if let Some(name) = &format.font_name {
        run = run.fonts(
            RunFonts::new()
                .ascii(name.as_str())
                .hi_ansi(name.as_str())
                .cs(name.as_str()),
        );
    }

    run
}

fn build_table(source: &Table) -> docx_rs::Table {
    let rows = source
        .rows
        .iter()
        .map(|row| {
            let cells = row
                .iter()
                .map(|cell| {
                    let mut docx_cell = docx_rs::TableCell::new();
                    for paragraph in &cell.paragraphs {
                        docx_cell = docx_cell.add_paragraph(build_paragraph(paragraph));
                    }
                    docx_cell
                })
                .collect();
            TableRow::new(cells)
        })
        .collect();

    let table = docx_rs::Table::new(rows);
    match &source.style {
        Some(style) => table.style(style.as_str()),
        None => table,
    }
}

fn alignment_type(alignment: Alignment) -> AlignmentType {
    match alignment {
        Alignment::Left => AlignmentType::Left,
        Alignment::Center => AlignmentType::Center,
        Alignment::Right => AlignmentType::Right,
        Alignment::Justify => AlignmentType::Both,
    }
}
