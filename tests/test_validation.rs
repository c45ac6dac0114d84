use pessoas::pessoa::validation::validate;
use pessoas::pessoa::validation::ValidPessoa;
use pessoas::pessoa::validation::ValidationError;
use pessoas::pessoa::validation::INVALID_AGE_MSG;
use pessoas::pessoa::validation::INVALID_NAME_MSG;
use serde_json::json;
use serde_json::Value;
use test_log::test;

#[test]
fn test_valid_pessoa() {
    let nome = json!("Ana");
    assert_eq!(
        validate(Some(&nome), Some(&json!(30))),
        Ok(ValidPessoa {
            nome: "Ana",
            idade: 30
        })
    );
    // zero is a valid age, and so is a whole float
    assert_eq!(validate(Some(&nome), Some(&json!(0))).map(|v| v.idade), Ok(0));
    assert_eq!(
        validate(Some(&nome), Some(&json!(30.0))).map(|v| v.idade),
        Ok(30)
    );
}

#[test]
fn test_nome_is_kept_as_given() {
    let nome = json!("  Ana  ");
    let valid = validate(Some(&nome), Some(&json!(1)));
    assert_eq!(valid.map(|v| v.nome), Ok("  Ana  "));
}

#[test]
fn test_blank_nome() {
    for nome in ["", " ", "   ", "\t\n"] {
        let nome = json!(nome);
        assert_eq!(
            validate(Some(&nome), Some(&json!(30))),
            Err(ValidationError::InvalidName),
            "nome {nome} should be rejected"
        );
    }
    assert_eq!(
        validate(None, Some(&json!(30))),
        Err(ValidationError::InvalidName)
    );
}

#[test]
fn test_nome_must_be_a_string() {
    for nome in [
        json!(42),
        json!(true),
        json!(null),
        json!(["Ana"]),
        json!({"nome": "Ana"}),
    ] {
        assert_eq!(
            validate(Some(&nome), Some(&json!(30))),
            Err(ValidationError::InvalidName),
            "nome {nome} should be rejected"
        );
    }
}

#[test]
fn test_bad_idade() {
    let nome = json!("Ana");
    for idade in [
        json!(-1),
        json!(-0.5),
        json!(30.5),
        json!(1e300),
        json!("30"),
        json!("abc"),
        json!(true),
        json!(null),
        json!([30]),
    ] {
        assert_eq!(
            validate(Some(&nome), Some(&idade)),
            Err(ValidationError::InvalidAge),
            "idade {idade} should be rejected"
        );
    }
    assert_eq!(validate(Some(&nome), None), Err(ValidationError::InvalidAge));
}

#[test]
fn test_name_is_checked_first() {
    let blank = json!(" ");
    assert_eq!(
        validate(Some(&blank), None),
        Err(ValidationError::InvalidName)
    );
    assert_eq!(
        validate(None, Some(&json!(-3))),
        Err(ValidationError::InvalidName)
    );
    let not_a_name = Value::Bool(false);
    assert_eq!(
        validate(Some(&not_a_name), Some(&json!("abc"))),
        Err(ValidationError::InvalidName)
    );
}

#[test]
fn test_messages() {
    assert_eq!(ValidationError::InvalidName.to_string(), INVALID_NAME_MSG);
    assert_eq!(ValidationError::InvalidAge.to_string(), INVALID_AGE_MSG);
    assert_eq!(INVALID_NAME_MSG, "O nome não pode estar em branco.");
    assert_eq!(INVALID_AGE_MSG, "A idade deve ser um número válido.");
}
