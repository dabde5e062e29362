use indexmap::IndexMap;
use tracing::warn;

use crate::model::QaPair;

// A repeated question keeps its first slot and takes the later answer.
#[derive(Debug, Clone, Default)]
pub struct AnswerBook {
    answers: IndexMap<String, String>,
}

impl AnswerBook {
    pub fn from_pairs(pairs: &[QaPair]) -> Self {
        let mut answers = IndexMap::with_capacity(pairs.len());
        for pair in pairs {
            answers.insert(pair.question.trim().to_string(), pair.answer.clone());
        }
        Self { answers }
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, question: &str) -> Option<&str> {
        self.answers.get(question).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.answers
            .iter()
            .map(|(question, answer)| (question.as_str(), answer.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Containment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerMatch<'a> {
    pub question: &'a str,
    pub answer: &'a str,
    pub kind: MatchKind,
}

pub trait AnswerMatcher {
    fn find<'a>(&self, question: &str, book: &'a AnswerBook) -> Option<AnswerMatch<'a>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ContainmentMatcher;

impl AnswerMatcher for ContainmentMatcher {
    fn find<'a>(&self, question: &str, book: &'a AnswerBook) -> Option<AnswerMatch<'a>> {
        let question = question.trim();
        if question.is_empty() {
            return None;
        }

        if let Some((key, answer)) = book.answers.get_key_value(question) {
            return answered(key, answer, MatchKind::Exact);
        }

        let mut candidates = book.iter().filter(|(key, _)| {
            !key.is_empty() && (key.contains(question) || question.contains(key))
        });
        let (key, answer) = candidates.next()?;

        let others = candidates.count();
        if others > 0 {
            warn!(
                question,
                chosen = key,
                others,
                "question matches several answers by containment; using the first"
            );
        }

        answered(key, answer, MatchKind::Containment)
    }
}

fn answered<'a>(question: &'a str, answer: &'a str, kind: MatchKind) -> Option<AnswerMatch<'a>> {
    if answer.trim().is_empty() {
        return None;
    }
    Some(AnswerMatch {
        question,
        answer,
        kind,
    })
}
