use anyhow::{bail, Context, Result};
use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }

    fn from_db(value: &str) -> Result<Self> {
        match value {
            "user" => Ok(Sender::User),
            "bot" => Ok(Sender::Bot),
            other => bail!("Unknown sender stored in database: {}", other),
        }
    }
}

/// One persisted turn half. Never mutated after insertion.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: i64,
    pub user_id: String,
    pub text: String,
    pub sender: Sender,
    pub language: String,
    pub created_at: String,
}

/// Fields supplied by the orchestrator; id and timestamp are assigned on append.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub user_id: String,
    pub text: String,
    pub sender: Sender,
    pub language: String,
}

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open the database and create the messages table if needed.
    pub fn open(database_path: &str) -> Result<Self> {
        let conn = Connection::open(database_path)
            .context(format!("Failed to open database at {}", database_path))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                text TEXT NOT NULL,
                sender TEXT NOT NULL,
                language TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create messages table")?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_messages_user_created
             ON messages (user_id, created_at, id)",
            [],
        )
        .context("Failed to create messages index")?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Append a message, assigning its id and timestamp.
    ///
    /// Timestamps use fixed-width RFC 3339 (microseconds, UTC) so that string
    /// ordering matches chronological ordering.
    pub fn append_message(&self, new: NewMessage) -> Result<ChatMessage> {
        let conn = self.conn.lock().unwrap();
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

        conn.execute(
            "INSERT INTO messages (user_id, text, sender, language, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                new.user_id,
                new.text,
                new.sender.as_str(),
                new.language,
                created_at
            ],
        )
        .context("Failed to append chat message")?;

        Ok(ChatMessage {
            id: conn.last_insert_rowid(),
            user_id: new.user_id,
            text: new.text,
            sender: new.sender,
            language: new.language,
            created_at,
        })
    }

    /// All messages for a user, ascending by creation time. The id tiebreak
    /// preserves insertion order when two rows share a timestamp.
    pub fn list_for_user(&self, user_id: &str) -> Result<Vec<ChatMessage>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT id, user_id, text, sender, language, created_at
                 FROM messages
                 WHERE user_id = ?1
                 ORDER BY created_at ASC, id ASC",
            )
            .context("Failed to prepare history query")?;

        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })
            .context("Failed to query chat history")?;

        let mut messages = Vec::new();
        for row in rows {
            let (id, user_id, text, sender, language, created_at) =
                row.context("Failed to read chat history row")?;
            messages.push(ChatMessage {
                id,
                user_id,
                text,
                sender: Sender::from_db(&sender)?,
                language,
                created_at,
            });
        }

        Ok(messages)
    }
}
