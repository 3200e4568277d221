// tests/session_flow.rs

use chrono::{Duration, TimeZone, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;

use mock_exam::{
    corpus::{
        assembly::{MockRequest, assemble_mock},
        fs::FsCorpus,
    },
    models::result::Verdict,
    session::{ExamSession, FileStore, MemoryStore, SessionState, SubmitReason},
};

const FIXTURE_CORPUS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/corpus");

async fn fixture_token(max: u32, duration: u32) -> String {
    let corpus = FsCorpus::new(FIXTURE_CORPUS);
    let request = MockRequest {
        chapters: vec!["Units and Dimensions".to_string()],
        max_questions: max,
        duration_seconds: duration,
    };
    let mut rng = StdRng::seed_from_u64(2024);
    let created = Utc.with_ymd_and_hms(2026, 10, 1, 9, 0, 0).unwrap();
    assemble_mock(&corpus, &request, created, &mut rng)
        .await
        .expect("fixture corpus should assemble")
        .token
}

#[tokio::test]
async fn sitting_a_mock_end_to_end() {
    let token = fixture_token(4, 1200).await;
    let store = MemoryStore::new();
    let start = Utc.with_ymd_and_hms(2026, 10, 1, 9, 5, 0).unwrap();

    let mut session = ExamSession::open(Some(&token), &store, start);
    assert_eq!(session.state(), &SessionState::Active);
    assert_eq!(session.total_questions(), 4);

    // Answer every question with its key, except the one without a key.
    for i in 0..session.total_questions() {
        session.jump_to(i);
        let key = session.current_question().unwrap().correct_answer.clone();
        session.set_answer(key.as_deref().unwrap_or("a guess"));
    }

    let tick = session.tick(start + Duration::minutes(10)).unwrap();
    assert_eq!(tick.remaining_ms, 600_000);
    assert!(session.submit());

    let result = session.result().unwrap();
    assert_eq!(result.correct, 3);
    assert_eq!(result.wrong, 1);
    assert_eq!(result.net_marks, 11);
    assert_eq!(result.max_marks, 16);
    assert_eq!(result.score_percent, 68.8);
    assert_eq!(result.accuracy_percent, 75.0);

    let unkeyed = result
        .rows
        .iter()
        .find(|r| r.correct_answer.is_none())
        .unwrap();
    assert_eq!(unkeyed.verdict, Verdict::Wrong);
}

#[tokio::test]
async fn reload_from_disk_resumes_deadline() {
    let token = fixture_token(2, 120).await;
    let path = std::env::temp_dir().join(format!("mock_exam_flow_{}.json", std::process::id()));
    let _ = std::fs::remove_file(&path);
    let start = Utc.with_ymd_and_hms(2026, 10, 1, 9, 0, 0).unwrap();

    {
        let session = ExamSession::open(Some(&token), &FileStore::new(&path), start);
        assert_eq!(session.started_at(), Some(start));
    }

    // "Reload" 90 seconds later with a fresh store handle on the same file.
    let later = start + Duration::seconds(90);
    let mut session = ExamSession::open(Some(&token), &FileStore::new(&path), later);
    assert_eq!(session.started_at(), Some(start));
    assert_eq!(session.tick(later).unwrap().remaining_ms, 30_000);

    let expired = session.tick(start + Duration::seconds(121)).unwrap();
    assert!(expired.auto_submitted);
    assert_eq!(session.submit_reason(), Some(SubmitReason::TimeUp));
    assert!(!session.tick(start + Duration::seconds(122)).unwrap().auto_submitted);

    let _ = std::fs::remove_file(&path);
}
