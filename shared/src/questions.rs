//! Clarifying-question flow shown between intake and analysis.
//!
//! One question is visible at a time. `next` on the last question finalizes the
//! flow and hands back the collected answers exactly once; `skip` abandons it.

use std::collections::BTreeMap;

use crate::models::{Question, QuestionKind, QuestionSet};
use crate::{Error, Result};

/// Answers keyed by question id.
pub type Answers = BTreeMap<String, String>;

const YES_NO_OPTIONS: [&str; 2] = ["Yes", "No"];

/// Outcome of a navigation action.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowStep {
    /// Now showing the question at this index
    Moved(usize),
    /// Last question confirmed; answers ready for analysis
    Submit(Answers),
    /// User abandoned the questions
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionFlow {
    set: QuestionSet,
    answers: Answers,
    current: usize,
    finished: bool,
}

impl QuestionFlow {
    /// Start a flow; `None` when the set has no questions.
    pub fn new(set: QuestionSet) -> Option<Self> {
        if set.questions.is_empty() {
            return None;
        }
        Some(Self {
            set,
            answers: Answers::new(),
            current: 0,
            finished: false,
        })
    }

    pub fn category(&self) -> &str {
        &self.set.category
    }

    pub fn len(&self) -> usize {
        self.set.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.questions.is_empty()
    }

    pub fn index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> &Question {
        &self.set.questions[self.current]
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.len()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Percent complete counting the visible question as done.
    pub fn progress_percent(&self) -> u8 {
        let ratio = (self.current + 1) as f64 / self.len() as f64;
        (ratio * 100.0).round() as u8
    }

    /// Fixed or question-provided choices for radio-style questions.
    pub fn choices(question: &Question) -> Vec<String> {
        match question.kind {
            QuestionKind::MultipleChoice => question.options.clone(),
            QuestionKind::YesNo => YES_NO_OPTIONS.iter().map(|s| s.to_string()).collect(),
            QuestionKind::Text => Vec::new(),
        }
    }

    pub fn answer_for(&self, question_id: &str) -> Option<&str> {
        self.answers.get(question_id).map(String::as_str)
    }

    pub fn current_answer(&self) -> Option<&str> {
        self.answer_for(&self.current_question().id)
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    /// Record an answer for the visible question.
    ///
    /// Radio-style questions only accept one of their choices.
    pub fn answer(&mut self, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        let question = self.current_question();

        if question.kind != QuestionKind::Text {
            let choices = Self::choices(question);
            if !choices.iter().any(|c| *c == value) {
                return Err(Error::validation(format!(
                    "'{}' is not one of the available options",
                    value
                )));
            }
        }

        let id = question.id.clone();
        self.answers.insert(id, value);
        Ok(())
    }

    /// Only a required, unanswered question blocks `next`.
    pub fn can_proceed(&self) -> bool {
        let question = self.current_question();
        !question.required || self.current_answer().is_some_and(|a| !a.is_empty())
    }

    pub fn next(&mut self) -> Result<FlowStep> {
        if self.finished {
            return Err(Error::validation("These questions were already submitted"));
        }
        if !self.can_proceed() {
            return Err(Error::validation("Please answer this question to continue"));
        }

        if self.is_last() {
            self.finished = true;
            return Ok(FlowStep::Submit(self.answers.clone()));
        }

        self.current += 1;
        Ok(FlowStep::Moved(self.current))
    }

    /// Go back one question; `false` when already on the first.
    pub fn back(&mut self) -> bool {
        if self.finished || self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Let a finalized flow be submitted again after its analysis failed.
    pub(crate) fn reopen(&mut self) {
        self.finished = false;
    }

    pub fn skip(&mut self) -> FlowStep {
        self.finished = true;
        FlowStep::Skipped
    }

    /// Entries of `answers` in the order their questions were asked.
    pub fn in_question_order<'a>(
        &'a self,
        answers: &'a Answers,
    ) -> impl Iterator<Item = (&'a String, &'a String)> + 'a {
        self.set
            .questions
            .iter()
            .filter_map(move |q| answers.get_key_value(&q.id))
    }

    /// Answers in question order, for display.
    pub fn labelled_answers(&self) -> String {
        let ordered: Vec<(&str, &str)> = self
            .set
            .questions
            .iter()
            .filter_map(|q| self.answer_for(&q.id).map(|a| (q.id.as_str(), a)))
            .collect();
        labelled_answers(ordered)
    }
}

/// Capitalize the first letter of every word after turning `_` into spaces.
pub fn humanize(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut prev_is_word = false;
    for c in key.chars() {
        let c = if c == '_' { ' ' } else { c };
        let is_word = c.is_ascii_alphanumeric();
        if is_word && !prev_is_word {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
        prev_is_word = is_word;
    }
    out
}

/// `Question Id: answer` lines under an "Additional Details" heading.
pub fn labelled_answers<'a>(answers: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let lines: Vec<String> = answers
        .into_iter()
        .map(|(id, answer)| format!("{}: {}", humanize(id), answer))
        .collect();

    if lines.is_empty() {
        String::new()
    } else {
        format!("\n\nAdditional Details:\n{}", lines.join("\n"))
    }
}

/// Append non-blank answers to the description as bullet lines.
///
/// When every answer is blank the description comes back verbatim.
pub fn merge_answers<'a>(
    description: &str,
    answers: impl IntoIterator<Item = (&'a String, &'a String)>,
) -> String {
    let kept: Vec<&String> = answers
        .into_iter()
        .map(|(_, answer)| answer)
        .filter(|answer| !answer.trim().is_empty())
        .collect();

    if kept.is_empty() {
        return description.to_string();
    }

    let mut merged = String::from(description);
    merged.push_str("\n\nAdditional Details:\n");
    for answer in kept {
        merged.push_str("- ");
        merged.push_str(answer);
        merged.push('\n');
    }
    merged
}
