use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::document::{Alignment, Rgb, RunFormat};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionFormat {
    #[serde(default)]
    pub font_name: Option<String>,
    #[serde(default)]
    pub font_size: Option<f32>,
    #[serde(default, with = "color_triple")]
    pub font_color: Option<Rgb>,
    #[serde(default, with = "alignment_name")]
    pub alignment: Option<Alignment>,
}

impl QuestionFormat {
    pub fn run_format(&self) -> RunFormat {
        RunFormat {
            font_name: self.font_name.clone(),
            font_size: self.font_size,
            color: self.font_color,
            bold: false,
            italic: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionRecord {
    pub position: usize,
    pub text: String,
    pub format: QuestionFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub path: String,
    pub kind: String,
    pub sha256: String,
    pub extracted_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionsManifest {
    #[serde(default)]
    pub questions: Vec<String>,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub question_indices: Vec<usize>,
    #[serde(default)]
    pub question_texts: Vec<String>,
    #[serde(default)]
    pub question_formats: Vec<QuestionFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswersManifest {
    #[serde(default)]
    pub qa_pairs: Vec<QaPair>,
    #[serde(default)]
    pub question_indices: Vec<usize>,
    #[serde(default)]
    pub question_texts: Vec<String>,
    #[serde(default)]
    pub question_formats: Vec<QuestionFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceInfo>,
}

impl AnswersManifest {
    pub fn question_records(&self) -> Vec<QuestionRecord> {
        let count = self
            .question_indices
            .len()
            .min(self.question_texts.len())
            .min(self.question_formats.len());

        if count != self.question_texts.len()
            || count != self.question_indices.len()
            || count != self.question_formats.len()
        {
            warn!(
                indices = self.question_indices.len(),
                texts = self.question_texts.len(),
                formats = self.question_formats.len(),
                "question arrays differ in length; extra entries ignored"
            );
        }

        self.question_indices
            .iter()
            .zip(&self.question_texts)
            .zip(&self.question_formats)
            .take(count)
            .map(|((position, text), format)| QuestionRecord {
                position: *position,
                text: text.clone(),
                format: format.clone(),
            })
            .collect()
    }
}

mod color_triple {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::document::Rgb;

    pub fn serialize<S: Serializer>(value: &Option<Rgb>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(rgb) => serializer.serialize_some(&rgb.to_triple()),
            None => serializer.serialize_none(),
        }
    }

    // An unreadable color is treated as unset rather than failing the file.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Rgb>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(Rgb::parse_triple))
    }
}

mod alignment_name {
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    use crate::document::Alignment;

    pub fn serialize<S: Serializer>(
        value: &Option<Alignment>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(alignment) => serializer.serialize_some(alignment.as_str()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Alignment>, D::Error> {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(match raw {
            Some(Value::String(name)) => Alignment::parse(&name),
            Some(Value::Number(number)) => Alignment::parse(&number.to_string()),
            _ => None,
        })
    }
}
