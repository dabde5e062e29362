use crate::document::{Indent, POINTS_PER_INCH, Paragraph, RunFormat};
use crate::model::QuestionFormat;


pub const BULLET: char = '•';
pub const BULLET_RUN: &str = "• ";
pub const BULLET_INDENT_PT: f32 = 0.25 * POINTS_PER_INCH;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Bold,
    Italic,
    BoldItalic,
}

impl Emphasis {
    const ALL: [Emphasis; 3] = [Emphasis::Bold, Emphasis::Italic, Emphasis::BoldItalic];

    pub fn open_tag(self) -> &'static str {
        match self {
            Self::Bold => "<b>",
            Self::Italic => "<i>",
            Self::BoldItalic => "<bi>",
        }
    }

    pub fn close_tag(self) -> &'static str {
        match self {
            Self::Bold => "</b>",
            Self::Italic => "</i>",
            Self::BoldItalic => "</bi>",
        }
    }

    pub fn is_bold(self) -> bool {
        matches!(self, Self::Bold | Self::BoldItalic)
    }

    pub fn is_italic(self) -> bool {
        matches!(self, Self::Italic | Self::BoldItalic)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupEvent<'a> {
    Bullet,
    Text(&'a str),
    Open(Emphasis),
    Close(Emphasis),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledRun<'a> {
    pub text: &'a str,
    pub bold: bool,
    pub italic: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFragment<'a> {
    pub bullet: bool,
    pub runs: Vec<StyledRun<'a>>,
}

impl ParsedFragment<'_> {
    #[cfg(test)]
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|run| run.text).collect()
    }
}

pub fn tokenize(fragment: &str) -> Vec<MarkupEvent<'_>> {
    let mut events = Vec::new();
    let mut remaining = fragment;

    if let Some(rest) = fragment.strip_prefix(BULLET) {
        events.push(MarkupEvent::Bullet);
        remaining = rest.trim();
    }

    let mut position = 0;
    while position < remaining.len() {
        let Some((tag_start, emphasis)) = earliest_open_tag(remaining, position) else {
            events.push(MarkupEvent::Text(&remaining[position..]));
            break;
        };

        if tag_start > position {
            events.push(MarkupEvent::Text(&remaining[position..tag_start]));
        }

        let content_start = tag_start + emphasis.open_tag().len();
        let Some(offset) = remaining[content_start..].find(emphasis.close_tag()) else {
            if content_start < remaining.len() {
                events.push(MarkupEvent::Text(&remaining[content_start..]));
            }
            break;
        };

        let content_end = content_start + offset;
        events.push(MarkupEvent::Open(emphasis));
        if content_end > content_start {
            events.push(MarkupEvent::Text(&remaining[content_start..content_end]));
        }
        events.push(MarkupEvent::Close(emphasis));
        position = content_end + emphasis.close_tag().len();
    }

    events
}

// Tag literals are prefix-distinct, so two tags never start at the same index.
fn earliest_open_tag(text: &str, from: usize) -> Option<(usize, Emphasis)> {
    Emphasis::ALL
        .iter()
        .filter_map(|emphasis| {
            text[from..]
                .find(emphasis.open_tag())
                .map(|offset| (from + offset, *emphasis))
        })
        .min_by_key(|(index, _)| *index)
}

pub fn parse_fragment(fragment: &str) -> ParsedFragment<'_> {
    let mut parsed = ParsedFragment::default();
    let mut active: Option<Emphasis> = None;

    for event in tokenize(fragment) {
        match event {
            MarkupEvent::Bullet => {
                parsed.bullet = true;
                parsed.runs.push(StyledRun {
                    text: BULLET_RUN,
                    bold: false,
                    italic: false,
                });
            }
            MarkupEvent::Text(text) => parsed.runs.push(StyledRun {
                text,
                bold: active.is_some_and(Emphasis::is_bold),
                italic: active.is_some_and(Emphasis::is_italic),
            }),
            MarkupEvent::Open(emphasis) => active = Some(emphasis),
            MarkupEvent::Close(_) => active = None,
        }
    }

    parsed
}

pub fn render_fragment(paragraph: &mut Paragraph, fragment: &str, format: &QuestionFormat) {
    let parsed = parse_fragment(fragment);
    let base = format.run_format();

    if parsed.bullet {
        paragraph.indent = Some(Indent::hanging(BULLET_INDENT_PT));
    }

    for run in parsed.runs {
        paragraph.push_run(
            run.text,
            RunFormat {
                bold: run.bold,
                italic: run.italic,
                ..base.clone()
            },
        );
    }

    if format.alignment.is_some() {
        paragraph.alignment = format.alignment;
    }
}
