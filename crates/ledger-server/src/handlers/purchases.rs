//! Purchase handlers

use super::DeletedResponse;
use crate::error::{ApiError, OrInternal};
use crate::extractors::{EntityId, JsonBody};
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use ledger_types::{CreatePurchaseInput, Purchase, PurchaseId, UpdatePurchaseInput};
use serde::Serialize;
use tracing::info;

const PURCHASE_NOT_FOUND: &str = "Compra não encontrada";

#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    message: &'static str,
    #[serde(flatten)]
    purchase: Purchase,
}

#[derive(Debug, Serialize)]
pub struct UpdatedPurchaseResponse {
    message: &'static str,
    #[serde(rename = "compra")]
    purchase: Purchase,
}

#[derive(Debug, Serialize)]
pub struct PaymentStatusResponse {
    message: &'static str,
    id: PurchaseId,
    #[serde(rename = "pago")]
    paid: bool,
}

/// Creation time in local time, ISO-8601 with microseconds.
fn creation_timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreatePurchaseInput>,
) -> Result<(StatusCode, Json<PurchaseResponse>), ApiError> {
    const FAILED: &str = "Erro ao criar compra";

    info!("Received new purchase: {:?}", input);
    let new_purchase = input.validate()?;

    if !state
        .db
        .customer_exists(new_purchase.customer_id)
        .await
        .or_internal(FAILED)?
    {
        return Err(ApiError::NotFound("Cliente não encontrado"));
    }

    let created_at = creation_timestamp();
    let id = state
        .db
        .create_purchase(&new_purchase, &created_at)
        .await
        .or_internal(FAILED)?;
    info!(
        "Created purchase {} for customer {}",
        id, new_purchase.customer_id
    );

    Ok((
        StatusCode::CREATED,
        Json(PurchaseResponse {
            message: "Compra adicionada com sucesso",
            purchase: new_purchase.into_purchase(id, created_at),
        }),
    ))
}

/// Replaces description and both values; `pago`, owner and creation time
/// stay as they were.
pub async fn update(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    JsonBody(input): JsonBody<UpdatePurchaseInput>,
) -> Result<Json<UpdatedPurchaseResponse>, ApiError> {
    const FAILED: &str = "Erro ao atualizar compra";

    info!("Received update for purchase {}: {:?}", id, input);
    let changes = input.validate()?;

    if !state.db.purchase_exists(id).await.or_internal(FAILED)? {
        return Err(ApiError::NotFound(PURCHASE_NOT_FOUND));
    }

    state
        .db
        .update_purchase(id, &changes)
        .await
        .or_internal(FAILED)?;

    let purchase = state
        .db
        .get_purchase(id)
        .await
        .or_internal(FAILED)?
        .ok_or(ApiError::NotFound(PURCHASE_NOT_FOUND))?;

    Ok(Json(UpdatedPurchaseResponse {
        message: "Compra atualizada com sucesso",
        purchase,
    }))
}

/// Flips `pago`. Check, update and re-read are separate statements, so two
/// concurrent toggles on one purchase can interleave.
pub async fn toggle_paid(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<Json<PaymentStatusResponse>, ApiError> {
    const FAILED: &str = "Erro ao atualizar pagamento";

    if !state.db.purchase_exists(id).await.or_internal(FAILED)? {
        return Err(ApiError::NotFound(PURCHASE_NOT_FOUND));
    }

    state
        .db
        .toggle_purchase_paid(id)
        .await
        .or_internal(FAILED)?;

    let paid = state
        .db
        .purchase_paid(id)
        .await
        .or_internal(FAILED)?
        .ok_or(ApiError::NotFound(PURCHASE_NOT_FOUND))?;
    info!("Purchase {} paid={}", id, paid);

    Ok(Json(PaymentStatusResponse {
        message: "Status de pagamento atualizado",
        id,
        paid,
    }))
}

pub async fn delete(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<Json<DeletedResponse>, ApiError> {
    const FAILED: &str = "Erro ao excluir compra";

    if !state.db.purchase_exists(id).await.or_internal(FAILED)? {
        return Err(ApiError::NotFound(PURCHASE_NOT_FOUND));
    }

    state.db.delete_purchase(id).await.or_internal(FAILED)?;
    info!("Deleted purchase {}", id);

    Ok(Json(DeletedResponse {
        id,
        message: "Compra excluída com sucesso",
    }))
}
