use std::sync::Arc;

use storage::{SessionStore, SqliteStore};
use talk100_core::model::{InputMode, QuestionId};
use talk100_core::time::fixed_clock;

fn question_ids(raw: &[u64]) -> Vec<QuestionId> {
    raw.iter().map(|id| QuestionId::new(*id)).collect()
}

#[test]
fn sqlite_session_survives_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("talk100.sqlite3");

    let session_id = {
        let kv = SqliteStore::open(&db_path).expect("open");
        let store = SessionStore::new(Arc::new(kv)).with_clock(fixed_clock());
        let id = store
            .create_session(1, 5, question_ids(&[11, 12, 13]), InputMode::Keyboard)
            .unwrap();
        store.mark_question_completed(&id, QuestionId::new(11)).unwrap();
        store.move_to_next_question(&id).unwrap();
        id
    };

    // A fresh connection sees the same session, as after a page reload.
    let kv = SqliteStore::open(&db_path).expect("reopen");
    let store = SessionStore::new(Arc::new(kv));

    let record = store.get_session(&session_id).unwrap().expect("persisted");
    assert_eq!(record.day, 5);
    assert_eq!(record.current_question_index, 1);
    assert_eq!(record.current_question_id, Some(QuestionId::new(12)));
    assert_eq!(record.completed_question_ids, question_ids(&[11]));
    assert_eq!(record.input_mode, InputMode::Keyboard);
    assert_eq!(record.progress.completed, 1);
    assert_eq!(record.progress.total, 3);
}

#[test]
fn sqlite_walks_a_session_to_completion_and_deletion() {
    let kv = SqliteStore::open_in_memory().expect("open");
    let store = SessionStore::new(Arc::new(kv)).with_clock(fixed_clock());

    let id = store
        .create_session(2, 1, question_ids(&[101, 102, 103]), InputMode::Voice)
        .unwrap();

    for (question, expect_advance) in [(101, true), (102, true), (103, false)] {
        store
            .mark_question_completed(&id, QuestionId::new(question))
            .unwrap();
        assert_eq!(store.move_to_next_question(&id).unwrap(), expect_advance);
    }

    assert!(store.is_quiz_completed(&id).unwrap());

    assert!(store.delete_session(&id).unwrap());
    assert!(store.get_session(&id).unwrap().is_none());
    // Completion queries on a deleted session degrade to false, not an error.
    assert!(!store.is_quiz_completed(&id).unwrap());
}
