//! Validation errors for incoming payloads

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Nome do cliente é obrigatório")]
    MissingName,

    #[error("Campos obrigatórios faltando")]
    MissingFields,

    #[error("Valores inválidos: {0}")]
    InvalidValue(String),

    #[error("Valores devem ser positivos")]
    NonPositiveValue,

    /// `cliente_id` that cannot name any customer row
    #[error("Cliente não encontrado")]
    UnknownCustomer,
}
