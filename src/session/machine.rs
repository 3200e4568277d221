// src/session/machine.rs

use chrono::{DateTime, Utc};

use super::store::{SessionStore, load_or_start};
use crate::{
    error::TokenError,
    models::{exam::ExamPayload, question::NormalizedQuestion, result::ResultBreakdown},
    scoring::{AnswerMap, score},
    utils::token::decode_exam,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No token decoded yet.
    Loading,
    Active,
    /// Locked for answering; navigation still works for review.
    Submitted,
    /// The token could not be used. Terminal, no exam content is exposed.
    Failed(TokenError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitReason {
    Manual,
    TimeUp,
}

/// Outcome of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Milliseconds left, never negative.
    pub remaining_ms: i64,
    /// True only on the tick that forced submission.
    pub auto_submitted: bool,
}

/// State machine for one sitting of a mock.
#[derive(Debug)]
pub struct ExamSession {
    state: SessionState,
    exam: Option<ExamPayload>,
    current: usize,
    answers: AnswerMap,
    started_at: Option<DateTime<Utc>>,
    submit_reason: Option<SubmitReason>,
}

impl Default for ExamSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ExamSession {
    pub fn new() -> Self {
        ExamSession {
            state: SessionState::Loading,
            exam: None,
            current: 0,
            answers: AnswerMap::new(),
            started_at: None,
            submit_reason: None,
        }
    }

    /// Creates a session and loads `token` into it in one go.
    pub fn open(token: Option<&str>, store: &dyn SessionStore, now: DateTime<Utc>) -> Self {
        let mut session = Self::new();
        // A failure is kept in the session state.
        let _ = session.load(token, store, now);
        session
    }

    /// `Loading -> Active` on a good token, `Loading -> Failed` otherwise.
    ///
    /// The session start is read from `store`, or recorded as `now` when this
    /// token has never been opened on this device.
    pub fn load(
        &mut self,
        token: Option<&str>,
        store: &dyn SessionStore,
        now: DateTime<Utc>,
    ) -> Result<(), TokenError> {
        if self.state != SessionState::Loading {
            tracing::debug!("Ignoring load in state {:?}", self.state);
            return Ok(());
        }

        match decode_exam(token) {
            Ok(exam) => {
                // decode_exam only succeeds with a token present.
                let token = token.unwrap_or_default();
                self.started_at = Some(load_or_start(store, token, now));
                self.exam = Some(exam);
                self.current = 0;
                self.answers.clear();
                self.state = SessionState::Active;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Cannot open mock: {}", e);
                self.state = SessionState::Failed(e.clone());
                Err(e)
            }
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn exam(&self) -> Option<&ExamPayload> {
        self.exam.as_ref()
    }

    pub fn total_questions(&self) -> usize {
        self.exam.as_ref().map_or(0, |e| e.questions.len())
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> Option<&NormalizedQuestion> {
        self.exam.as_ref()?.questions.get(self.current)
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn answer_for(&self, question_id: &str) -> Option<&str> {
        self.answers.get(question_id).map(String::as_str)
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn submit_reason(&self) -> Option<SubmitReason> {
        self.submit_reason
    }

    pub fn is_locked(&self) -> bool {
        self.state == SessionState::Submitted
    }

    /// Records `value` for the current question. Blank clears the answer.
    /// Returns false when answering is not allowed.
    pub fn set_answer(&mut self, value: &str) -> bool {
        if self.state != SessionState::Active {
            return false;
        }
        let Some(id) = self.current_question().map(|q| q.id.clone()) else {
            return false;
        };

        let value = value.trim();
        if value.is_empty() {
            self.answers.remove(&id);
        } else {
            self.answers.insert(id, value.to_string());
        }
        true
    }

    pub fn next(&mut self) -> usize {
        self.jump_to(self.current.saturating_add(1))
    }

    pub fn prev(&mut self) -> usize {
        self.jump_to(self.current.saturating_sub(1))
    }

    /// Moves to question `index`, clamped to the exam. Works after submission too.
    pub fn jump_to(&mut self, index: usize) -> usize {
        let total = self.total_questions();
        if total > 0 {
            self.current = index.min(total - 1);
        }
        self.current
    }

    /// `Active -> Submitted`. Returns false if the session was not active.
    pub fn submit(&mut self) -> bool {
        self.submit_with(SubmitReason::Manual)
    }

    fn submit_with(&mut self, reason: SubmitReason) -> bool {
        if self.state != SessionState::Active {
            return false;
        }
        self.state = SessionState::Submitted;
        self.submit_reason = Some(reason);
        tracing::info!(
            "Mock submitted ({:?}): {} of {} answered",
            reason,
            self.answers.len(),
            self.total_questions()
        );
        true
    }

    /// Milliseconds left at `now`. Capped at the exam duration when the stored
    /// start lies in the future.
    pub fn remaining_ms(&self, now: DateTime<Utc>) -> Option<i64> {
        let exam = self.exam.as_ref()?;
        let started = self.started_at?;
        let elapsed = (now - started).num_milliseconds();
        Some((exam.duration_ms() - elapsed).min(exam.duration_ms()))
    }

    /// Advances the countdown. Forces submission once time is up; later ticks
    /// only report zero remaining.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Tick> {
        let remaining = self.remaining_ms(now)?;
        let auto_submitted = remaining <= 0 && self.submit_with(SubmitReason::TimeUp);
        Some(Tick {
            remaining_ms: remaining.max(0),
            auto_submitted,
        })
    }

    /// The scored breakdown, available once submitted.
    pub fn result(&self) -> Option<ResultBreakdown> {
        if self.state != SessionState::Submitted {
            return None;
        }
        self.exam.as_ref().map(|exam| score(exam, &self.answers))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::{
        models::question::QuestionType,
        session::store::{MemoryStore, session_key},
        utils::token::encode_exam,
    };

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 14, 18, 0, 0).unwrap()
    }

    fn token_with(answers: &[&str]) -> String {
        token_created_at(t0(), answers)
    }

    fn token_created_at(created: DateTime<Utc>, answers: &[&str]) -> String {
        let questions = answers
            .iter()
            .enumerate()
            .map(|(i, a)| NormalizedQuestion {
                id: format!("physics::Units::p1::{}", i),
                subject: "physics".to_string(),
                chapter: "Units".to_string(),
                question_type: QuestionType::Value,
                exam_html: String::new(),
                prompt_html: format!("Q{}", i),
                options: vec![],
                correct_answer: Some(a.to_string()),
                source: String::new(),
            })
            .collect();
        let exam = ExamPayload::new(created, 1200, 10, vec!["Units".to_string()], questions);
        encode_exam(&exam).unwrap()
    }

    #[test]
    fn opens_active_at_first_question() {
        let store = MemoryStore::new();
        let token = token_with(&["A", "42", "7"]);
        let session = ExamSession::open(Some(&token), &store, t0());
        assert_eq!(session.state(), &SessionState::Active);
        assert_eq!(session.current_index(), 0);
        assert!(session.answers().is_empty());
        assert_eq!(session.started_at(), Some(t0()));
    }

    #[test]
    fn missing_and_corrupt_tokens_fail_terminally() {
        let store = MemoryStore::new();
        let mut missing = ExamSession::open(None, &store, t0());
        assert_eq!(missing.state(), &SessionState::Failed(TokenError::Missing));
        assert!(missing.exam().is_none());
        assert!(!missing.set_answer("A"));
        assert!(missing.tick(t0()).is_none());

        let corrupt = ExamSession::open(Some("@@@"), &store, t0());
        assert!(matches!(corrupt.state(), SessionState::Failed(TokenError::Decode(_))));
        assert!(corrupt.current_question().is_none());
    }

    #[test]
    fn navigation_is_clamped() {
        let store = MemoryStore::new();
        let token = token_with(&["A", "B", "C"]);
        let mut session = ExamSession::open(Some(&token), &store, t0());
        assert_eq!(session.prev(), 0);
        assert_eq!(session.next(), 1);
        assert_eq!(session.jump_to(99), 2);
        assert_eq!(session.next(), 2);
        assert_eq!(session.jump_to(0), 0);
    }

    #[test]
    fn answers_follow_current_question() {
        let store = MemoryStore::new();
        let token = token_with(&["A", "42"]);
        let mut session = ExamSession::open(Some(&token), &store, t0());

        assert!(session.set_answer(" a "));
        session.next();
        assert!(session.set_answer("41"));
        assert!(session.set_answer("43"));
        assert_eq!(session.answer_for("physics::Units::p1::0"), Some("a"));
        assert_eq!(session.answer_for("physics::Units::p1::1"), Some("43"));

        assert!(session.set_answer("   "));
        assert_eq!(session.answer_for("physics::Units::p1::1"), None);
    }

    #[test]
    fn submission_locks_answers_but_not_navigation() {
        let store = MemoryStore::new();
        let token = token_with(&["A", "42"]);
        let mut session = ExamSession::open(Some(&token), &store, t0());
        session.set_answer("A");
        session.next();
        session.set_answer("43");

        assert!(session.result().is_none());
        assert!(session.submit());
        assert!(!session.submit());
        assert_eq!(session.submit_reason(), Some(SubmitReason::Manual));

        assert!(!session.set_answer("42"));
        assert_eq!(session.prev(), 0);

        let result = session.result().unwrap();
        assert_eq!(result.net_marks, 3);
        assert_eq!(result.score_percent, 37.5);
        assert_eq!(session.result(), Some(result));
    }

    #[test]
    fn resumed_session_keeps_its_deadline() {
        let store = MemoryStore::new();
        let token = token_with(&["A"]);
        let started = t0() - Duration::minutes(19);
        store.set(&session_key(&token), &started.timestamp_millis().to_string());

        let mut session = ExamSession::open(Some(&token), &store, t0());
        assert_eq!(session.started_at(), Some(started));
        let tick = session.tick(t0()).unwrap();
        assert_eq!(tick.remaining_ms, 60_000);
        assert!(!tick.auto_submitted);

        // Reload a few seconds later: same start, not reset.
        let mut reloaded = ExamSession::open(Some(&token), &store, t0() + Duration::seconds(5));
        assert_eq!(reloaded.tick(t0() + Duration::seconds(5)).unwrap().remaining_ms, 55_000);
    }

    #[test]
    fn other_token_gets_fresh_deadline() {
        let store = MemoryStore::new();
        let first = token_with(&["A"]);
        let second = token_created_at(t0() + Duration::milliseconds(1234), &["B", "C"]);
        assert_ne!(session_key(&first), session_key(&second));
        ExamSession::open(Some(&first), &store, t0() - Duration::minutes(15));

        let mut session = ExamSession::open(Some(&second), &store, t0());
        assert_eq!(session.tick(t0()).unwrap().remaining_ms, 1_200_000);
    }

    #[test]
    fn auto_submit_fires_once() {
        let store = MemoryStore::new();
        let token = token_with(&["A", "B"]);
        let mut session = ExamSession::open(Some(&token), &store, t0());
        session.set_answer("A");

        let before = session.tick(t0() + Duration::seconds(1199)).unwrap();
        assert_eq!(before.remaining_ms, 1000);
        assert!(!before.auto_submitted);
        assert_eq!(session.state(), &SessionState::Active);

        let expiry = session.tick(t0() + Duration::seconds(1200)).unwrap();
        assert_eq!(expiry.remaining_ms, 0);
        assert!(expiry.auto_submitted);
        assert_eq!(session.state(), &SessionState::Submitted);
        assert_eq!(session.submit_reason(), Some(SubmitReason::TimeUp));

        for s in 1..5 {
            let later = session.tick(t0() + Duration::seconds(1200 + s)).unwrap();
            assert!(!later.auto_submitted);
            assert_eq!(later.remaining_ms, 0);
        }
        assert_eq!(session.result().unwrap().correct, 1);
    }

    #[test]
    fn manual_submit_then_expiry_does_not_resubmit() {
        let store = MemoryStore::new();
        let token = token_with(&["A"]);
        let mut session = ExamSession::open(Some(&token), &store, t0());
        session.submit();
        let tick = session.tick(t0() + Duration::hours(1)).unwrap();
        assert!(!tick.auto_submitted);
        assert_eq!(session.submit_reason(), Some(SubmitReason::Manual));
    }

    #[test]
    fn future_start_is_capped_at_duration() {
        let store = MemoryStore::new();
        let token = token_with(&["A"]);
        let ahead = t0() + Duration::minutes(10);
        store.set(&session_key(&token), &ahead.timestamp_millis().to_string());
        let session = ExamSession::open(Some(&token), &store, t0());
        assert_eq!(session.remaining_ms(t0()), Some(1_200_000));
    }
}
