use std::path::Path;

use anyhow::{Result, bail};

mod docx;
mod pdf;
#[cfg(test)]
mod tests;

pub use docx::DocxDocument;
pub use pdf::extract_pdf_text;

pub const POINTS_PER_INCH: f32 = 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Docx,
    Pdf,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "docx" => Ok(Self::Docx),
            "pdf" => Ok(Self::Pdf),
            "" => bail!("unsupported document without extension: {}", path.display()),
            other => bail!("unsupported document format '.{other}': {}", path.display()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Pdf => "pdf",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn parse_triple(raw: &str) -> Option<Self> {
        let mut parts = raw.trim().split(':');
        let r = parts.next()?.trim().parse().ok()?;
        let g = parts.next()?.trim().parse().ok()?;
        let b = parts.next()?.trim().parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self { r, g, b })
    }

    pub fn parse_hex(raw: &str) -> Option<Self> {
        let hex = raw.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }

    pub fn to_triple(self) -> String {
        format!("{}:{}:{}", self.r, self.g, self.b)
    }

    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "justify",
        }
    }

    // Also takes the numeric `WD_ALIGN_PARAGRAPH` forms (`1`, `CENTER (1)`).
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        let name = normalized
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .trim_matches(|c: char| c == '(' || c == ')');

        match name {
            "left" | "start" | "0" => Some(Self::Left),
            "center" | "centre" | "1" => Some(Self::Center),
            "right" | "end" | "2" => Some(Self::Right),
            "justify" | "both" | "justified" | "distribute" | "3" => Some(Self::Justify),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunFormat {
    pub font_name: Option<String>,
    pub font_size: Option<f32>,
    pub color: Option<Rgb>,
    pub bold: bool,
    pub italic: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    pub text: String,
    pub format: RunFormat,
}

impl Run {
    pub fn new(text: impl Into<String>, format: RunFormat) -> Self {
        Self {
            text: text.into(),
            format,
        }
    }
}

// A negative first line hangs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Indent {
    pub left_pt: f32,
    pub first_line_pt: f32,
}

impl Indent {
    pub fn left(left_pt: f32) -> Self {
        Self {
            left_pt,
            first_line_pt: 0.0,
        }
    }

    pub fn hanging(width_pt: f32) -> Self {
        Self {
            left_pt: width_pt,
            first_line_pt: -width_pt,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub runs: Vec<Run>,
    pub alignment: Option<Alignment>,
    pub indent: Option<Indent>,
    pub space_before_pt: Option<f32>,
    pub style: Option<String>,
}

impl Paragraph {
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    pub fn push_run(&mut self, text: impl Into<String>, format: RunFormat) {
        self.runs.push(Run::new(text, format));
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableCell {
    pub paragraphs: Vec<Paragraph>,
}

impl TableCell {
    #[cfg(test)]
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub rows: Vec<Vec<TableCell>>,
    pub style: Option<String>,
}

impl Table {
    #[cfg(test)]
    pub fn column_count(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BodyElement {
    Paragraph(Paragraph),
    Table(Table),
    Other,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub elements: Vec<BodyElement>,
}

impl Document {
    #[cfg(test)]
    pub fn from_paragraphs(paragraphs: Vec<Paragraph>) -> Self {
        Self {
            elements: paragraphs.into_iter().map(BodyElement::Paragraph).collect(),
        }
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = (usize, &Paragraph)> {
        self.elements
            .iter()
            .enumerate()
            .filter_map(|(position, element)| match element {
                BodyElement::Paragraph(paragraph) => Some((position, paragraph)),
                _ => None,
            })
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.elements.iter().filter_map(|element| match element {
            BodyElement::Table(table) => Some(table),
            _ => None,
        })
    }

    pub fn context_text(&self) -> String {
        let mut lines = self
            .paragraphs()
            .map(|(_, paragraph)| paragraph.text())
            .collect::<Vec<_>>();

        for table in self.tables() {
            for row in &table.rows {
                for cell in row {
                    lines.extend(cell.paragraphs.iter().map(Paragraph::text));
                }
            }
        }

        lines.join("\n")
    }
}

/// An ordered body that rendered answer elements can be spliced into.
pub trait DocumentBody {
    fn insert_element(&mut self, position: usize, element: BodyElement) -> Result<()>;
}

impl DocumentBody for Document {
    fn insert_element(&mut self, position: usize, element: BodyElement) -> Result<()> {
        if position > self.elements.len() {
            bail!(
                "insertion position {position} is past the end of the document ({} elements)",
                self.elements.len()
            );
        }
        self.elements.insert(position, element);
        Ok(())
    }
}

pub fn points_to_twips(points: f32) -> i32 {
    (points * 20.0).round() as i32
}

pub fn points_to_half_points(points: f32) -> usize {
    (points * 2.0).round().max(0.0) as usize
}
