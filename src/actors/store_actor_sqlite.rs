//! The store actor owns the one and only `SQLite` connection of the process.
//!
//! Every statement against the `pessoas` table goes through this actor's
//! mailbox, so the connection is never shared and statements run one at a
//! time in arrival order.  Two concurrent updates of the same id are not
//! coordinated beyond that: the last one to reach the mailbox wins.
//!
//! The connection is opened and the schema ensured before the actor is
//! spawned, so a `Handle` returned by [`new`] always points at a ready store.
//! An `EndOfStream` message closes the connection and ends the actor; the
//! connection is also closed if every handle is dropped.
//!
//! Mutations reply with `RowsAffected`, the count reported by the statement
//! itself, which is how callers tell "no such id" apart from success.

use crate::actors::actor::respond_or_log_error;
use crate::actors::actor::Actor;
use crate::actors::actor::Handle;
use crate::actors::message::Envelope;
use crate::actors::message::Message;
use crate::actors::message::StoreError;
use crate::actors::message::StoreResult;
use crate::pessoa::model::Pessoa;
use async_trait::async_trait;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::sqlite::SqliteJournalMode;
use sqlx::ConnectOptions;
use sqlx::Connection;
use sqlx::SqliteConnection;
use std::fmt;
use std::str::FromStr;
use tokio::sync::mpsc;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::trace;
use tracing::warn;

const CREATE_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS pessoas (
        id TEXT PRIMARY KEY,
        nome TEXT,
        idade INTEGER
    )";
const INSERT: &str = "INSERT INTO pessoas (id, nome, idade) VALUES (?, ?, ?)";
const SELECT_ALL: &str = "SELECT id, nome, idade FROM pessoas";
const SELECT_BY_ID: &str = "SELECT id, nome, idade FROM pessoas WHERE id = ?";
const UPDATE_BY_ID: &str = "UPDATE pessoas SET nome = ?, idade = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM pessoas WHERE id = ?";

/// where and how the store keeps its data
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub dbfile: String,
    pub memory_only: bool,
    pub write_ahead_logging: bool,
}

impl StoreConfig {
    #[must_use]
    pub fn new(dbfile: Option<String>, memory_only: bool, write_ahead_logging: bool) -> Self {
        Self {
            dbfile: dbfile.unwrap_or_else(|| "pessoas.db".to_string()),
            memory_only,
            write_ahead_logging,
        }
    }

    /// an ephemeral store, mostly for tests
    #[must_use]
    pub fn memory() -> Self {
        Self::new(None, true, false)
    }
}

impl fmt::Display for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.memory_only {
            write!(f, "[sqlite in memory]")
        } else {
            write!(
                f,
                "[sqlite {} wal: {}]",
                self.dbfile, self.write_ahead_logging
            )
        }
    }
}

pub struct StoreActor {
    pub receiver: mpsc::Receiver<Envelope>,
    conn: Option<SqliteConnection>,
    description: String,
}

#[async_trait]
impl Actor for StoreActor {
    async fn handle_envelope(&mut self, envelope: Envelope) {
        let Envelope {
            message,
            respond_to,
        } = envelope;
        trace!("store {} handling {message}", self.description);

        let result = match message {
            Message::InsertCmd { pessoa } => self.insert(&pessoa).await,
            Message::ListQuery {} => self.list_all().await,
            Message::GetQuery { id } => self.get_by_id(id).await,
            Message::UpdateCmd { id, nome, idade } => self.update_by_id(&id, &nome, idade).await,
            Message::DeleteCmd { id } => self.delete_by_id(&id).await,
            Message::EndOfStream {} => {
                self.stop().await;
                Ok(Message::EndOfStream {})
            }
            m => {
                warn!("unexpected message: {m}");
                Err(StoreError::UnexpectedReply(m.to_string()))
            }
        };

        respond_or_log_error(respond_to, result);
    }

    async fn stop(&mut self) {
        if let Some(conn) = self.conn.take() {
            match conn.close().await {
                Ok(()) => info!("store {} closed", self.description),
                Err(e) => error!("can not close store {}: {e}", self.description),
            }
        }
    }
}

/// actor private constructor and statements
impl StoreActor {
    fn new(
        receiver: mpsc::Receiver<Envelope>,
        conn: SqliteConnection,
        description: String,
    ) -> Self {
        Self {
            receiver,
            conn: Some(conn),
            description,
        }
    }

    fn conn(&mut self) -> StoreResult<&mut SqliteConnection> {
        self.conn
            .as_mut()
            .ok_or_else(|| StoreError::Unavailable(format!("store {} is closed", self.description)))
    }

    async fn insert(&mut self, pessoa: &Pessoa) -> StoreResult<Message> {
        let result = sqlx::query(INSERT)
            .bind(&pessoa.id)
            .bind(&pessoa.nome)
            .bind(pessoa.idade)
            .execute(self.conn()?)
            .await?;
        Ok(Message::RowsAffected {
            count: result.rows_affected(),
        })
    }

    async fn list_all(&mut self) -> StoreResult<Message> {
        let pessoas = sqlx::query_as::<_, Pessoa>(SELECT_ALL)
            .fetch_all(self.conn()?)
            .await?;
        Ok(Message::PessoaList { pessoas })
    }

    async fn get_by_id(&mut self, id: String) -> StoreResult<Message> {
        let found = sqlx::query_as::<_, Pessoa>(SELECT_BY_ID)
            .bind(&id)
            .fetch_optional(self.conn()?)
            .await?;
        Ok(found.map_or(Message::NotFound { id }, |pessoa| Message::PessoaReport {
            pessoa,
        }))
    }

    async fn update_by_id(&mut self, id: &str, nome: &str, idade: i64) -> StoreResult<Message> {
        let result = sqlx::query(UPDATE_BY_ID)
            .bind(nome)
            .bind(idade)
            .bind(id)
            .execute(self.conn()?)
            .await?;
        Ok(Message::RowsAffected {
            count: result.rows_affected(),
        })
    }

    async fn delete_by_id(&mut self, id: &str) -> StoreResult<Message> {
        let result = sqlx::query(DELETE_BY_ID)
            .bind(id)
            .execute(self.conn()?)
            .await?;
        Ok(Message::RowsAffected {
            count: result.rows_affected(),
        })
    }
}

async fn connect(config: &StoreConfig) -> StoreResult<SqliteConnection> {
    let options = if config.memory_only {
        SqliteConnectOptions::from_str("sqlite::memory:")?
    } else {
        let journal_mode = if config.write_ahead_logging {
            SqliteJournalMode::Wal
        } else {
            SqliteJournalMode::Delete
        };
        SqliteConnectOptions::new()
            .filename(&config.dbfile)
            .create_if_missing(true)
            .journal_mode(journal_mode)
    };
    let mut conn = options.connect().await?;

    // idempotent across restarts
    sqlx::query(CREATE_TABLE).execute(&mut conn).await?;
    Ok(conn)
}

/// actor handle public constructor - opens the store and ensures the
/// `pessoas` table exists before accepting messages
///
/// # Errors
///
/// Returns [`StoreError::Database`] if the database can not be opened or the
/// table can not be created
pub async fn new(bufsz: usize, config: &StoreConfig) -> StoreResult<Handle> {
    async fn start(mut actor: StoreActor) {
        while let Some(envelope) = actor.receiver.recv().await {
            let last = matches!(envelope.message, Message::EndOfStream {});
            actor.handle_envelope(envelope).await;
            if last {
                break;
            }
        }
        // no-op if an EndOfStream already closed the connection
        actor.stop().await;
        debug!("store actor {} finished", actor.description);
    }

    let conn = connect(config).await?;
    info!("store {config} ready");

    let (sender, receiver) = mpsc::channel(bufsz.max(1));
    let actor = StoreActor::new(receiver, conn, config.to_string());
    let actor_handle = Handle::new(sender);
    tokio::spawn(start(actor));
    Ok(actor_handle)
}
