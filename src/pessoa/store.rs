use crate::actors::actor::Handle;
use crate::actors::message::Message;
use crate::actors::message::StoreError;
use crate::actors::message::StoreResult;
use crate::actors::store_actor_sqlite;
use crate::actors::store_actor_sqlite::StoreConfig;
use crate::pessoa::model::Pessoa;
use std::sync::Arc;

/// Typed access to the store actor.  Cheap to clone; every clone talks to the
/// same actor and therefore the same connection.
#[derive(Debug, Clone)]
pub struct PessoaStore {
    handle: Arc<Handle>,
}

fn unexpected(reply: &Message) -> StoreError {
    StoreError::UnexpectedReply(reply.to_string())
}

impl PessoaStore {
    /// Open the backing database and make sure the `pessoas` table exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the database can not be opened
    pub async fn initialize(bufsz: usize, config: &StoreConfig) -> StoreResult<Self> {
        let handle = store_actor_sqlite::new(bufsz, config).await?;
        Ok(Self {
            handle: Arc::new(handle),
        })
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] on any database failure, including an id that
    /// is already taken
    pub async fn insert(&self, id: String, nome: String, idade: i64) -> StoreResult<()> {
        let cmd = Message::InsertCmd {
            pessoa: Pessoa::new(id, nome, idade),
        };
        match self.handle.ask(cmd).await? {
            Message::RowsAffected { .. } => Ok(()),
            m => Err(unexpected(&m)),
        }
    }

    /// All records, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on any database failure
    pub async fn list_all(&self) -> StoreResult<Vec<Pessoa>> {
        match self.handle.ask(Message::ListQuery {}).await? {
            Message::PessoaList { pessoas } => Ok(pessoas),
            m => Err(unexpected(&m)),
        }
    }

    /// `Ok(None)` when no record has this id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on any database failure
    pub async fn get_by_id(&self, id: &str) -> StoreResult<Option<Pessoa>> {
        let cmd = Message::GetQuery { id: id.to_string() };
        match self.handle.ask(cmd).await? {
            Message::PessoaReport { pessoa } => Ok(Some(pessoa)),
            Message::NotFound { .. } => Ok(None),
            m => Err(unexpected(&m)),
        }
    }

    /// Replace `nome` and `idade` of one record; returns the affected-row
    /// count, 0 when there is no such id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on any database failure
    pub async fn update_by_id(&self, id: &str, nome: String, idade: i64) -> StoreResult<u64> {
        let cmd = Message::UpdateCmd {
            id: id.to_string(),
            nome,
            idade,
        };
        match self.handle.ask(cmd).await? {
            Message::RowsAffected { count } => Ok(count),
            m => Err(unexpected(&m)),
        }
    }

    /// Returns the affected-row count, 0 when there is no such id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on any database failure
    pub async fn delete_by_id(&self, id: &str) -> StoreResult<u64> {
        let cmd = Message::DeleteCmd { id: id.to_string() };
        match self.handle.ask(cmd).await? {
            Message::RowsAffected { count } => Ok(count),
            m => Err(unexpected(&m)),
        }
    }

    /// Close the connection.  Any later call fails with
    /// [`StoreError::Unavailable`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store was already shut down
    pub async fn shutdown(&self) -> StoreResult<()> {
        match self.handle.ask(Message::EndOfStream {}).await? {
            Message::EndOfStream {} => Ok(()),
            m => Err(unexpected(&m)),
        }
    }
}
