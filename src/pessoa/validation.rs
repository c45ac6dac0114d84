//! Entity invariants checked before any store mutation.
//!
//! Both fields are checked as raw JSON values, so a field of the wrong type is
//! reported with that field's message.  The name is checked first and only
//! the first violation is reported.  Ages must be whole JSON numbers: the
//! `idade` column is integer-typed and the API reports ages as JSON integers.

use serde_json::Value;
use thiserror::Error;

pub const INVALID_NAME_MSG: &str = "O nome não pode estar em branco.";
pub const INVALID_AGE_MSG: &str = "A idade deve ser um número válido.";

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{}", INVALID_NAME_MSG)]
    InvalidName,
    #[error("{}", INVALID_AGE_MSG)]
    InvalidAge,
}

/// A candidate that passed validation, with the age narrowed to an integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPessoa<'a> {
    pub nome: &'a str,
    pub idade: i64,
}

/// Check a candidate `(nome, idade)` pair as it arrived in the request body.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidName`] if `nome` is missing, not a
/// string, or blank, otherwise [`ValidationError::InvalidAge`] if `idade` is
/// missing, not a number, negative, fractional, or out of the integer range.
pub fn validate<'a>(
    nome: Option<&'a Value>,
    idade: Option<&Value>,
) -> Result<ValidPessoa<'a>, ValidationError> {
    let nome = match nome {
        Some(Value::String(n)) if !n.trim().is_empty() => n.as_str(),
        _ => return Err(ValidationError::InvalidName),
    };
    let idade = validate_idade(idade.and_then(Value::as_f64))?;
    Ok(ValidPessoa { nome, idade })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn validate_idade(idade: Option<f64>) -> Result<i64, ValidationError> {
    match idade {
        Some(i) if i.is_finite() && i >= 0.0 && i.fract() == 0.0 && i < i64::MAX as f64 => {
            Ok(i as i64)
        }
        _ => Err(ValidationError::InvalidAge),
    }
}
