//! Live completion metrics over the currently visible question set.
//!
//! The calculator is a pure function of the flow, the answer context, and a
//! per-question status map it never owns: status transitions are the
//! caller's responsibility. Metrics are recomputed on every call — visibility
//! depends on the context, so nothing here may be cached across answers.

use crate::engine::FlowEngine;
use crate::flow::{AnswerContext, Question};
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

/// The lifecycle state of one question, owned by the hosting application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionStatus {
    Pending,
    Current,
    Answered,
    Skipped,
}

/// Completion counts and percentages over the visible question set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressMetrics {
    pub total: usize,
    pub required: usize,
    pub answered: usize,
    pub answered_required: usize,
    pub skipped: usize,
    /// `round(100 * answered / total)`; 0 when nothing is visible.
    pub progress_percent: u8,
    /// `round(100 * answered_required / required)`; 100 when no visible
    /// question is required (vacuously complete).
    pub required_progress_percent: u8,
    /// `total - answered - skipped`, deliberately unclamped: a negative
    /// value surfaces an inconsistent status map instead of hiding it.
    pub remaining: i64,
    /// `remaining * avg_seconds_per_question`. Linear and non-adaptive.
    pub estimated_seconds_remaining: i64,
}

/// Derives [`ProgressMetrics`] from the flow, context, and status map.
#[derive(Debug, Clone, Copy)]
pub struct ProgressCalculator {
    avg_seconds_per_question: u32,
}

impl Default for ProgressCalculator {
    fn default() -> Self {
        Self {
            avg_seconds_per_question: 30,
        }
    }
}

impl ProgressCalculator {
    pub fn new(avg_seconds_per_question: u32) -> Self {
        Self {
            avg_seconds_per_question,
        }
    }

    /// Metrics over every currently visible question.
    pub fn calculate(
        &self,
        engine: &FlowEngine,
        statuses: &AHashMap<String, QuestionStatus>,
        context: &AnswerContext,
    ) -> ProgressMetrics {
        self.metrics_over(engine.visible_questions(context), statuses)
    }

    /// Metrics scoped to a named subset of question ids, same shape.
    pub fn section_progress(
        &self,
        engine: &FlowEngine,
        statuses: &AHashMap<String, QuestionStatus>,
        context: &AnswerContext,
        question_ids: &[String],
    ) -> ProgressMetrics {
        let section: AHashSet<&str> = question_ids.iter().map(String::as_str).collect();
        let visible = engine
            .visible_questions(context)
            .into_iter()
            .filter(|question| section.contains(question.id.as_str()))
            .collect();
        self.metrics_over(visible, statuses)
    }

    /// Whether the flow counts as complete.
    ///
    /// With `require_all_required`, every visible required question must be
    /// answered. Without it, completion only demands that no visible
    /// question is still pending or current.
    pub fn is_flow_complete(
        &self,
        engine: &FlowEngine,
        statuses: &AHashMap<String, QuestionStatus>,
        context: &AnswerContext,
        require_all_required: bool,
    ) -> bool {
        let visible = engine.visible_questions(context);
        if require_all_required {
            visible
                .iter()
                .filter(|question| question.required)
                .all(|question| status_of(statuses, question) == QuestionStatus::Answered)
        } else {
            visible.iter().all(|question| {
                !matches!(
                    status_of(statuses, question),
                    QuestionStatus::Pending | QuestionStatus::Current
                )
            })
        }
    }

    fn metrics_over(
        &self,
        visible: Vec<&Question>,
        statuses: &AHashMap<String, QuestionStatus>,
    ) -> ProgressMetrics {
        let total = visible.len();
        let required = visible.iter().filter(|q| q.required).count();
        let answered = visible
            .iter()
            .filter(|q| status_of(statuses, q) == QuestionStatus::Answered)
            .count();
        let answered_required = visible
            .iter()
            .filter(|q| q.required && status_of(statuses, q) == QuestionStatus::Answered)
            .count();
        let skipped = visible
            .iter()
            .filter(|q| status_of(statuses, q) == QuestionStatus::Skipped)
            .count();

        let remaining = total as i64 - answered as i64 - skipped as i64;

        ProgressMetrics {
            total,
            required,
            answered,
            answered_required,
            skipped,
            progress_percent: rounded_percent(answered, total, 0),
            required_progress_percent: rounded_percent(answered_required, required, 100),
            remaining,
            estimated_seconds_remaining: remaining * i64::from(self.avg_seconds_per_question),
        }
    }
}

/// A question absent from the status map has simply not been touched yet.
fn status_of(statuses: &AHashMap<String, QuestionStatus>, question: &Question) -> QuestionStatus {
    statuses
        .get(&question.id)
        .copied()
        .unwrap_or(QuestionStatus::Pending)
}

fn rounded_percent(part: usize, whole: usize, when_empty: u8) -> u8 {
    if whole == 0 {
        when_empty
    } else {
        ((part as f64 / whole as f64) * 100.0).round() as u8
    }
}
