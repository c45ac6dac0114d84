use poem_openapi::Object;

/// A person record as persisted in the `pessoas` table and returned by the
/// listing and lookup endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Object, sqlx::FromRow)]
pub struct Pessoa {
    /// ID da pessoa.
    pub id: String,
    /// Nome da pessoa.
    pub nome: String,
    /// Idade da pessoa.
    pub idade: i64,
}

impl Pessoa {
    #[must_use]
    pub fn new(id: String, nome: String, idade: i64) -> Self {
        Self { id, nome, idade }
    }
}
