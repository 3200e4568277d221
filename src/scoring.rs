// src/scoring.rs

//! Marks an attempt: +4 correct, -1 wrong, 0 unattempted.

use std::collections::HashMap;

use crate::{
    config::{MARKS_CORRECT, MARKS_WRONG},
    models::{
        exam::ExamPayload,
        result::{ChapterSummary, QuestionResult, ResultBreakdown, Verdict},
    },
};

/// Question id -> answer as entered.
pub type AnswerMap = HashMap<String, String>;

/// The one comparison form for answers: trimmed and case-folded.
pub fn normalize_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}

/// `round(part / whole * 1000) / 10`, i.e. a percentage with one decimal. 0 when `whole` is 0.
fn percent_1dp(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    (part / whole * 1000.0).round() / 10.0
}

fn judge(user: Option<&str>, correct: Option<&str>) -> Verdict {
    let user = user.map(normalize_answer).unwrap_or_default();
    if user.is_empty() {
        return Verdict::Unattempted;
    }
    match correct.map(normalize_answer) {
        Some(key) if key == user => Verdict::Correct,
        _ => Verdict::Wrong,
    }
}

/// Scores `answers` against the key embedded in `exam`. Pure; safe to call on every render.
pub fn score(exam: &ExamPayload, answers: &AnswerMap) -> ResultBreakdown {
    let mut rows = Vec::with_capacity(exam.questions.len());
    let mut by_chapter: Vec<ChapterSummary> = Vec::new();

    for question in &exam.questions {
        let user_answer = answers
            .get(&question.id)
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());
        let verdict = judge(user_answer.as_deref(), question.correct_answer.as_deref());
        let marks = match verdict {
            Verdict::Correct => MARKS_CORRECT,
            Verdict::Wrong => MARKS_WRONG,
            Verdict::Unattempted => 0,
        };

        let idx = match by_chapter.iter().position(|c| c.chapter == question.chapter) {
            Some(idx) => idx,
            None => {
                by_chapter.push(ChapterSummary {
                    chapter: question.chapter.clone(),
                    total: 0,
                    correct: 0,
                    wrong: 0,
                    unattempted: 0,
                    net_marks: 0,
                });
                by_chapter.len() - 1
            }
        };
        let summary = &mut by_chapter[idx];
        summary.total += 1;
        summary.net_marks += marks;
        match verdict {
            Verdict::Correct => summary.correct += 1,
            Verdict::Wrong => summary.wrong += 1,
            Verdict::Unattempted => summary.unattempted += 1,
        }

        rows.push(QuestionResult {
            id: question.id.clone(),
            chapter: question.chapter.clone(),
            verdict,
            marks,
            user_answer,
            correct_answer: question.correct_answer.clone(),
        });
    }

    let count = |v: Verdict| rows.iter().filter(|r| r.verdict == v).count();
    let correct = count(Verdict::Correct);
    let wrong = count(Verdict::Wrong);
    let unattempted = count(Verdict::Unattempted);
    let attempted = correct + wrong;

    let total_questions = rows.len();
    let net_marks = MARKS_CORRECT * correct as i64 + MARKS_WRONG * wrong as i64;
    let max_marks = MARKS_CORRECT * total_questions as i64;

    let accuracy_percent = percent_1dp(correct as f64, attempted as f64);
    let score_percent = percent_1dp(net_marks as f64, max_marks as f64);
    // Negative net marks floor at 0%; the comparison also folds -0.0 into 0.0.
    let score_percent = if score_percent > 0.0 { score_percent } else { 0.0 };

    ResultBreakdown {
        rows,
        by_chapter,
        total_questions,
        attempted,
        correct,
        wrong,
        unattempted,
        net_marks,
        max_marks,
        accuracy_percent,
        score_percent,
    }
}
