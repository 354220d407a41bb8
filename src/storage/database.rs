//! SQLite Database
//!
//! Embedded database for persistent storage using rusqlite with r2d2
//! connection pooling. Holds the four research stores (interactions, notes,
//! section chat, accuracy feedback) plus application feedback.

use std::path::Path;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

use ccv_research_llm::types::Message;

use crate::models::{
    AccuracyFeedback, AccuracyRating, AppFeedback, Interaction, SectionChatTurn, SessionNote,
    SessionSummary,
};
use crate::research::prompts::HISTORY_SYSTEM_PROMPT;
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::database_path;

/// Type alias for the connection pool
pub type DbPool = Pool<SqliteConnectionManager>;

/// Database service for managing SQLite operations
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Create a new database instance at the default path
    pub fn new() -> AppResult<Self> {
        Self::open(&database_path()?)
    }

    /// Open (or create) a database file, with connection pooling
    pub fn open(db_path: &Path) -> AppResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let manager = SqliteConnectionManager::file(db_path);
        let pool = Pool::builder()
            .max_size(10)
            .build(manager)
            .map_err(|e| AppError::database(format!("Failed to create connection pool: {}", e)))?;

        let db = Self { pool };
        db.init_schema()?;

        Ok(db)
    }

    /// Create an in-memory database for testing.
    ///
    /// Same schema as the production database, single pooled connection so
    /// every caller sees the same in-memory store.
    pub fn new_in_memory() -> AppResult<Self> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e| AppError::database(format!("Failed to create connection pool: {}", e)))?;

        let db = Self { pool };
        db.init_schema()?;
        Ok(db)
    }

    fn get_connection(&self) -> AppResult<PooledConnection<SqliteConnectionManager>> {
        self.pool
            .get()
            .map_err(|e| AppError::database(format!("Failed to get connection: {}", e)))
    }

    /// Initialize the database schema
    fn init_schema(&self) -> AppResult<()> {
        let conn = self.get_connection()?;

        // Append-only conversational turns; sessions exist only as distinct
        // session_id values here, there is no separate session header table.
        conn.execute(
            "CREATE TABLE IF NOT EXISTS interactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL,
                topic TEXT NOT NULL,
                persona TEXT NOT NULL DEFAULT '',
                question TEXT NOT NULL,
                response TEXT NOT NULL,
                timestamp TEXT DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_interactions_session ON interactions(session_id)",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS notes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL,
                code TEXT NOT NULL,
                content TEXT NOT NULL DEFAULT '',
                updated_at TEXT DEFAULT CURRENT_TIMESTAMP,
                UNIQUE(session_id, code)
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS section_chat (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL,
                code TEXT NOT NULL,
                section_id INTEGER NOT NULL,
                question TEXT NOT NULL,
                answer TEXT NOT NULL,
                timestamp TEXT DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_section_chat_key
             ON section_chat(session_id, code, section_id)",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS accuracy_feedback (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL,
                code TEXT NOT NULL,
                section_id INTEGER NOT NULL,
                rating TEXT NOT NULL,
                reason TEXT,
                updated_at TEXT DEFAULT CURRENT_TIMESTAMP,
                UNIQUE(session_id, code, section_id)
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS app_feedback (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                model_used TEXT,
                research_type TEXT,
                topic TEXT,
                ui_rating INTEGER,
                content_rating INTEGER,
                feedback_text TEXT,
                submitted_at TEXT DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;

        Ok(())
    }

    // ========================================================================
    // Session / Interaction Operations
    // ========================================================================

    /// Create a session by seeding its first interaction row
    pub fn create_session(&self, session_id: &str, topic: &str, persona: &str) -> AppResult<()> {
        self.append_interaction(session_id, topic, persona, "", "")
    }

    /// Append one conversational turn to a session
    pub fn append_interaction(
        &self,
        session_id: &str,
        topic: &str,
        persona: &str,
        question: &str,
        response: &str,
    ) -> AppResult<()> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO interactions (session_id, topic, persona, question, response)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![session_id, topic, persona, question, response],
        )?;
        Ok(())
    }

    /// List distinct sessions, most recent first, capped at 50
    pub fn list_sessions(&self) -> AppResult<Vec<SessionSummary>> {
        let conn = self.get_connection()?;
        // id breaks timestamp ties (CURRENT_TIMESTAMP has second resolution).
        let mut stmt = conn.prepare(
            "SELECT DISTINCT session_id, topic FROM interactions
             ORDER BY timestamp DESC, id DESC LIMIT 50",
        )?;
        let sessions = stmt
            .query_map([], |row| {
                Ok(SessionSummary {
                    session_id: row.get(0)?,
                    topic: row.get(1)?,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();
        Ok(sessions)
    }

    /// Reconstruct a session as an ordered conversation, beginning with the
    /// fixed system turn. Seed rows with an empty question are skipped.
    pub fn session_history(&self, session_id: &str) -> AppResult<Vec<Message>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(
            "SELECT question, response FROM interactions
             WHERE session_id = ?1 ORDER BY timestamp ASC, id ASC",
        )?;
        let turns: Vec<(String, String)> = stmt
            .query_map(params![session_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .filter_map(|r| r.ok())
            .collect();

        let mut messages = vec![Message::system(HISTORY_SYSTEM_PROMPT)];
        for (question, response) in turns {
            if question.is_empty() && response.is_empty() {
                continue;
            }
            messages.push(Message::user(question));
            messages.push(Message::assistant(response));
        }
        Ok(messages)
    }

    /// Fetch every interaction row for a session, oldest first
    pub fn session_interactions(&self, session_id: &str) -> AppResult<Vec<Interaction>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(
            "SELECT session_id, topic, persona, question, response, timestamp
             FROM interactions WHERE session_id = ?1 ORDER BY timestamp ASC, id ASC",
        )?;
        let rows = stmt
            .query_map(params![session_id], |row| {
                Ok(Interaction {
                    session_id: row.get(0)?,
                    topic: row.get(1)?,
                    persona: row.get(2)?,
                    question: row.get(3)?,
                    response: row.get(4)?,
                    timestamp: row.get(5)?,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();
        Ok(rows)
    }

    /// Rename a session. The topic lives on every interaction row sharing the
    /// session id, so all of them are updated.
    pub fn rename_session(&self, session_id: &str, new_topic: &str) -> AppResult<()> {
        let conn = self.get_connection()?;
        conn.execute(
            "UPDATE interactions SET topic = ?1 WHERE session_id = ?2",
            params![new_topic, session_id],
        )?;
        Ok(())
    }

    /// Delete a session and everything keyed under it
    pub fn delete_session(&self, session_id: &str) -> AppResult<()> {
        let conn = self.get_connection()?;
        conn.execute(
            "DELETE FROM interactions WHERE session_id = ?1",
            params![session_id],
        )?;
        conn.execute("DELETE FROM notes WHERE session_id = ?1", params![session_id])?;
        conn.execute(
            "DELETE FROM section_chat WHERE session_id = ?1",
            params![session_id],
        )?;
        conn.execute(
            "DELETE FROM accuracy_feedback WHERE session_id = ?1",
            params![session_id],
        )?;
        Ok(())
    }

    // ========================================================================
    // Note Operations
    // ========================================================================

    /// Insert or replace the note for a (session, code) key
    pub fn upsert_note(&self, session_id: &str, code: &str, content: &str) -> AppResult<()> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO notes (session_id, code, content, updated_at)
             VALUES (?1, ?2, ?3, CURRENT_TIMESTAMP)
             ON CONFLICT(session_id, code) DO UPDATE SET content = ?3, updated_at = CURRENT_TIMESTAMP",
            params![session_id, code, content],
        )?;
        Ok(())
    }

    /// Get the note for a (session, code) key
    pub fn get_note(&self, session_id: &str, code: &str) -> AppResult<Option<SessionNote>> {
        let conn = self.get_connection()?;
        let result = conn.query_row(
            "SELECT session_id, code, content, updated_at FROM notes
             WHERE session_id = ?1 AND code = ?2",
            params![session_id, code],
            |row| {
                Ok(SessionNote {
                    session_id: row.get(0)?,
                    code: row.get(1)?,
                    content: row.get(2)?,
                    updated_at: row.get(3)?,
                })
            },
        );

        match result {
            Ok(note) => Ok(Some(note)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::database(e.to_string())),
        }
    }

    // ========================================================================
    // Section Chat Operations
    // ========================================================================

    /// Append one question/answer turn for a section
    pub fn append_section_chat(
        &self,
        session_id: &str,
        code: &str,
        section_id: u8,
        question: &str,
        answer: &str,
    ) -> AppResult<()> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO section_chat (session_id, code, section_id, question, answer)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![session_id, code, section_id as i64, question, answer],
        )?;
        Ok(())
    }

    /// Fetch the ordered chat history for a section
    pub fn get_section_chat(
        &self,
        session_id: &str,
        code: &str,
        section_id: u8,
    ) -> AppResult<Vec<SectionChatTurn>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(
            "SELECT session_id, code, section_id, question, answer, timestamp
             FROM section_chat
             WHERE session_id = ?1 AND code = ?2 AND section_id = ?3
             ORDER BY timestamp ASC, id ASC",
        )?;
        let turns = stmt
            .query_map(params![session_id, code, section_id as i64], |row| {
                Ok(SectionChatTurn {
                    session_id: row.get(0)?,
                    code: row.get(1)?,
                    section_id: row.get::<_, i64>(2)? as u8,
                    question: row.get(3)?,
                    answer: row.get(4)?,
                    timestamp: row.get(5)?,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();
        Ok(turns)
    }

    // ========================================================================
    // Accuracy Feedback Operations
    // ========================================================================

    /// Insert or replace the accuracy rating for a (session, code, section) key
    pub fn upsert_accuracy(
        &self,
        session_id: &str,
        code: &str,
        section_id: u8,
        rating: AccuracyRating,
        reason: Option<&str>,
    ) -> AppResult<()> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO accuracy_feedback (session_id, code, section_id, rating, reason, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, CURRENT_TIMESTAMP)
             ON CONFLICT(session_id, code, section_id)
             DO UPDATE SET rating = ?4, reason = ?5, updated_at = CURRENT_TIMESTAMP",
            params![session_id, code, section_id as i64, rating.to_string(), reason],
        )?;
        Ok(())
    }

    /// Get the accuracy rating for a (session, code, section) key
    pub fn get_accuracy(
        &self,
        session_id: &str,
        code: &str,
        section_id: u8,
    ) -> AppResult<Option<AccuracyFeedback>> {
        let conn = self.get_connection()?;
        let result = conn.query_row(
            "SELECT session_id, code, section_id, rating, reason, updated_at
             FROM accuracy_feedback
             WHERE session_id = ?1 AND code = ?2 AND section_id = ?3",
            params![session_id, code, section_id as i64],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, Option<String>>(5)?,
                ))
            },
        );

        match result {
            Ok((session_id, code, section_id, rating, reason, updated_at)) => {
                let rating = rating
                    .parse::<AccuracyRating>()
                    .map_err(AppError::database)?;
                Ok(Some(AccuracyFeedback {
                    session_id,
                    code,
                    section_id: section_id as u8,
                    rating,
                    reason,
                    updated_at,
                }))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::database(e.to_string())),
        }
    }

    // ========================================================================
    // Application Feedback Operations
    // ========================================================================

    /// Append an application feedback submission
    pub fn save_app_feedback(&self, feedback: &AppFeedback) -> AppResult<()> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO app_feedback (model_used, research_type, topic, ui_rating, content_rating, feedback_text)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                feedback.model_used,
                feedback.research_type,
                feedback.topic,
                feedback.ui_rating,
                feedback.content_rating,
                feedback.feedback_text
            ],
        )?;
        Ok(())
    }
}
