use crate::pessoa::model::Pessoa;
use std::fmt;
use thiserror::Error;
use tokio::sync::oneshot;

pub type StoreResult<T> = Result<T, StoreError>;

/// Returned when the store can not complete an operation.  Not-found is not
/// an error; it travels as [`Message::NotFound`].
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database: {0}")]
    Database(#[from] sqlx::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("unexpected store reply: {0}")]
    UnexpectedReply(String),
}

/// all actor messages are delivered in envelopes that contain an optional
/// sender - it is set when an `ask` message is sent so that the reply can be
/// delivered.  Replies are not placed in envelopes.
#[derive(Debug)]
pub struct Envelope {
    pub message: Message,
    pub respond_to: Option<oneshot::Sender<StoreResult<Message>>>,
}

/// all actor API interaction is via async messages
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    InsertCmd {
        pessoa: Pessoa,
    },
    UpdateCmd {
        id: String,
        nome: String,
        idade: i64,
    },
    DeleteCmd {
        id: String,
    },
    ListQuery {},
    GetQuery {
        id: String,
    },
    PessoaReport {
        pessoa: Pessoa,
    },
    PessoaList {
        pessoas: Vec<Pessoa>,
    },
    RowsAffected {
        count: u64,
    },
    NotFound {
        id: String,
    },
    EndOfStream {},
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InsertCmd { pessoa } => write!(f, "[InsertCmd {}]", pessoa.id),
            Self::UpdateCmd { id, .. } => write!(f, "[UpdateCmd {id}]"),
            Self::DeleteCmd { id } => write!(f, "[DeleteCmd {id}]"),
            Self::ListQuery {} => write!(f, "[ListQuery]"),
            Self::GetQuery { id } => write!(f, "[GetQuery {id}]"),
            Self::PessoaReport { pessoa } => write!(f, "[PessoaReport {}]", pessoa.id),
            Self::PessoaList { pessoas } => write!(f, "[PessoaList {}]", pessoas.len()),
            Self::RowsAffected { count } => write!(f, "[RowsAffected {count}]"),
            Self::NotFound { id } => write!(f, "[NotFound {id}]"),
            Self::EndOfStream {} => write!(f, "[EndOfStream]"),
        }
    }
}
