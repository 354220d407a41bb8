//! Storage Integration Tests
//!
//! Tests for the session, note, section-chat, and feedback stores against an
//! in-memory database.

use ccv_research::models::{AccuracyRating, AppFeedback};
use ccv_research::storage::Database;

// ============================================================================
// Session Tests
// ============================================================================

#[test]
fn test_create_and_list_sessions() {
    let db = Database::new_in_memory().unwrap();
    db.create_session("s1", "thyroid biopsy", "Researcher").unwrap();
    db.create_session("s2", "knee arthroscopy", "Clinician").unwrap();

    let sessions = db.list_sessions().unwrap();
    assert_eq!(sessions.len(), 2);
    let topics: Vec<&str> = sessions.iter().map(|s| s.topic.as_str()).collect();
    assert!(topics.contains(&"thyroid biopsy"));
    assert!(topics.contains(&"knee arthroscopy"));
}

#[test]
fn test_list_sessions_caps_at_50_most_recent_first() {
    let db = Database::new_in_memory().unwrap();
    for i in 0..60 {
        db.append_interaction(&format!("s{}", i), &format!("topic {}", i), "Researcher", "q", "a")
            .unwrap();
    }

    let sessions = db.list_sessions().unwrap();
    assert_eq!(sessions.len(), 50);
    assert_eq!(sessions[0].session_id, "s59");
    assert_eq!(sessions[49].session_id, "s10");
    assert!(!sessions.iter().any(|s| s.session_id == "s0"));
}

#[test]
fn test_session_history_reconstruction() {
    let db = Database::new_in_memory().unwrap();
    db.append_interaction("s1", "topic", "Researcher", "first question", "first answer")
        .unwrap();
    db.append_interaction("s1", "topic", "Researcher", "second question", "second answer")
        .unwrap();

    let history = db.session_history("s1").unwrap();
    assert_eq!(history.len(), 5);
    assert_eq!(history[0].content, "You are an APC research assistant.");
    assert_eq!(history[1].content, "first question");
    assert_eq!(history[2].content, "first answer");
    assert_eq!(history[3].content, "second question");
    assert_eq!(history[4].content, "second answer");
}

#[test]
fn test_rename_updates_every_row_of_one_session() {
    let db = Database::new_in_memory().unwrap();
    db.append_interaction("s1", "draft", "Researcher", "q1", "a1").unwrap();
    db.append_interaction("s1", "draft", "Researcher", "q2", "a2").unwrap();
    db.append_interaction("s2", "other", "Researcher", "q", "a").unwrap();

    db.rename_session("s1", "final topic").unwrap();

    assert!(db
        .session_interactions("s1")
        .unwrap()
        .iter()
        .all(|row| row.topic == "final topic"));
    assert!(db
        .session_interactions("s2")
        .unwrap()
        .iter()
        .all(|row| row.topic == "other"));
}

// ============================================================================
// Upsert Semantics Tests
// ============================================================================

#[test]
fn test_note_saved_twice_keeps_latest() {
    let db = Database::new_in_memory().unwrap();
    db.upsert_note("s1", "27447", "initial note").unwrap();
    db.upsert_note("s1", "27447", "revised note").unwrap();

    let note = db.get_note("s1", "27447").unwrap().unwrap();
    assert_eq!(note.content, "revised note");

    // A different key is independent.
    assert!(db.get_note("s1", "27448").unwrap().is_none());
}

#[test]
fn test_section_chat_saved_twice_keeps_both() {
    let db = Database::new_in_memory().unwrap();
    db.append_section_chat("s1", "27447", 5, "first?", "yes").unwrap();
    db.append_section_chat("s1", "27447", 5, "second?", "no").unwrap();

    let turns = db.get_section_chat("s1", "27447", 5).unwrap();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].question, "first?");
    assert_eq!(turns[1].question, "second?");
}

#[test]
fn test_accuracy_rating_upsert_with_reason() {
    let db = Database::new_in_memory().unwrap();
    db.upsert_accuracy("s1", "27447", 1, AccuracyRating::Bad, Some("wrong codes listed"))
        .unwrap();
    db.upsert_accuracy("s1", "27447", 1, AccuracyRating::Medium, Some("partially fixed"))
        .unwrap();

    let feedback = db.get_accuracy("s1", "27447", 1).unwrap().unwrap();
    assert_eq!(feedback.rating, AccuracyRating::Medium);
    assert_eq!(feedback.reason.as_deref(), Some("partially fixed"));
}

// ============================================================================
// Feedback Tests
// ============================================================================

#[test]
fn test_app_feedback_rows_accumulate() {
    let db = Database::new_in_memory().unwrap();
    for i in 1..=3 {
        db.save_app_feedback(&AppFeedback {
            model_used: "gpt-4.1".to_string(),
            research_type: "APC Research".to_string(),
            topic: format!("topic {}", i),
            ui_rating: i,
            content_rating: i,
            feedback_text: String::new(),
        })
        .unwrap();
    }
    // Feedback is append-only, so nothing should have been collapsed; the
    // store not erroring on repeat submissions is the contract.
    db.save_app_feedback(&AppFeedback {
        model_used: "gpt-4.1".to_string(),
        research_type: "APC Research".to_string(),
        topic: "topic 1".to_string(),
        ui_rating: 3,
        content_rating: 3,
        feedback_text: "resubmitted".to_string(),
    })
    .unwrap();
}
