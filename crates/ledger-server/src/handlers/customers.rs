//! Customer handlers

use super::DeletedResponse;
use crate::error::{ApiError, OrInternal};
use crate::extractors::{EntityId, JsonBody};
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use ledger_types::{Customer, CustomerInput, CustomerWithPurchases};
use serde::Serialize;
use tracing::info;

const CUSTOMER_NOT_FOUND: &str = "Cliente não encontrado";

#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    #[serde(flatten)]
    customer: Customer,
    message: &'static str,
}

/// Every customer with its purchases nested. One query per customer.
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerWithPurchases>>, ApiError> {
    const FAILED: &str = "Erro ao buscar clientes";

    let customers = state.db.list_customers().await.or_internal(FAILED)?;

    let mut listing = Vec::with_capacity(customers.len());
    for customer in customers {
        let purchases = state
            .db
            .list_purchases_by_customer(customer.id)
            .await
            .or_internal(FAILED)?;
        listing.push(CustomerWithPurchases {
            customer,
            purchases,
        });
    }

    Ok(Json(listing))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CustomerInput>,
) -> Result<(StatusCode, Json<CustomerResponse>), ApiError> {
    let new_customer = input.validate()?;

    let id = state
        .db
        .create_customer(&new_customer)
        .await
        .or_internal("Erro ao criar cliente")?;
    info!("Created customer {}", id);

    Ok((
        StatusCode::CREATED,
        Json(CustomerResponse {
            customer: new_customer.into_customer(id),
            message: "Cliente criado com sucesso",
        }),
    ))
}

/// Full replace: an omitted address is stored as null.
pub async fn update(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    JsonBody(input): JsonBody<CustomerInput>,
) -> Result<Json<CustomerResponse>, ApiError> {
    const FAILED: &str = "Erro ao atualizar cliente";

    let changes = input.validate()?;

    if !state.db.customer_exists(id).await.or_internal(FAILED)? {
        return Err(ApiError::NotFound(CUSTOMER_NOT_FOUND));
    }

    state
        .db
        .update_customer(id, &changes)
        .await
        .or_internal(FAILED)?;
    info!("Updated customer {}", id);

    Ok(Json(CustomerResponse {
        customer: changes.into_customer(id),
        message: "Cliente atualizado com sucesso",
    }))
}

pub async fn delete(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<Json<DeletedResponse>, ApiError> {
    const FAILED: &str = "Erro ao excluir cliente";

    if !state.db.customer_exists(id).await.or_internal(FAILED)? {
        return Err(ApiError::NotFound(CUSTOMER_NOT_FOUND));
    }

    state.db.delete_customer(id).await.or_internal(FAILED)?;
    info!("Deleted customer {} and its purchases", id);

    Ok(Json(DeletedResponse {
        id,
        message: "Cliente e compras relacionadas excluídos com sucesso",
    }))
}
