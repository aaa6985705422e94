// src/handlers/orders.rs

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    common::{
        error::{ApiError, AppError},
        extract::{json_body, order_id},
    },
    config::AppState,
    middleware::i18n::Locale,
    models::{
        auth::MessageResponse,
        order::{Order, ReprintPayload, SubmitOrderPayload, SubmitOrderResponse, UpdateOrderPayload},
    },
};

#[utoipa::path(
    post,
    path = "/submitData",
    tag = "Orders",
    request_body = SubmitOrderPayload,
    responses(
        (status = 201, description = "Ordem gravada (impressa ou não)", body = SubmitOrderResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Vendedor não encontrado")
    )
)]
pub async fn submit_order(
    State(app_state): State<AppState>,
    locale: Locale,
    payload: Result<Json<SubmitOrderPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let payload = json_body(payload).map_err(to_api)?;
    let outcome = app_state
        .order_service
        .submit(payload)
        .await
        .map_err(to_api)?;

    // A ordem já está gravada; falha de impressão só é informada
    let print_error = outcome
        .print_error
        .map(|_| app_state.i18n_store.translate(&locale.0, "errors.print_failed"));

    Ok((
        StatusCode::CREATED,
        Json(SubmitOrderResponse {
            message: app_state.i18n_store.translate(&locale.0, "messages.order_saved"),
            id: outcome.order.id,
            printed: print_error.is_none(),
            print_error,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/getOrders",
    tag = "Orders",
    responses((status = 200, description = "Ordens, mais recentes primeiro", body = Vec<Order>))
)]
pub async fn get_orders(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<Json<Vec<Order>>, ApiError> {
    let orders = app_state
        .order_service
        .list()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(orders))
}

#[utoipa::path(
    delete,
    path = "/deleteOrder/{id}",
    tag = "Orders",
    params(("id" = i64, Path, description = "ID da ordem")),
    responses(
        (status = 200, description = "Ordem apagada", body = MessageResponse),
        (status = 404, description = "Ordem não encontrada")
    )
)]
pub async fn delete_order(
    State(app_state): State<AppState>,
    locale: Locale,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let id = order_id(id).map_err(to_api)?;
    app_state
        .order_service
        .delete(id)
        .await
        .map_err(to_api)?;

    Ok(Json(MessageResponse {
        message: app_state.i18n_store.translate(&locale.0, "messages.order_deleted"),
    }))
}

#[utoipa::path(
    put,
    path = "/updateOrder/{id}",
    tag = "Orders",
    request_body = UpdateOrderPayload,
    params(("id" = i64, Path, description = "ID da ordem")),
    responses(
        (status = 200, description = "Ordem atualizada", body = MessageResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Ordem não encontrada")
    )
)]
pub async fn update_order(
    State(app_state): State<AppState>,
    locale: Locale,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateOrderPayload>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let id = order_id(id).map_err(to_api)?;
    let payload = json_body(payload).map_err(to_api)?;
    app_state
        .order_service
        .update(id, payload)
        .await
        .map_err(to_api)?;

    Ok(Json(MessageResponse {
        message: app_state.i18n_store.translate(&locale.0, "messages.order_updated"),
    }))
}

#[utoipa::path(
    post,
    path = "/reprintOrder/{id}",
    tag = "Orders",
    request_body = ReprintPayload,
    params(("id" = i64, Path, description = "ID da ordem")),
    responses(
        (status = 200, description = "Vias reimpressas", body = MessageResponse),
        (status = 400, description = "Tipo de reimpressão inválido"),
        (status = 404, description = "Ordem não encontrada"),
        (status = 500, description = "Falha na impressora")
    )
)]
pub async fn reprint_order(
    State(app_state): State<AppState>,
    locale: Locale,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ReprintPayload>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let id = order_id(id).map_err(to_api)?;
    let payload = json_body(payload).map_err(to_api)?;
    let kind = app_state
        .order_service
        .reprint(id, payload.reprint_type.as_deref())
        .await
        .map_err(to_api)?;

    Ok(Json(MessageResponse {
        message: app_state.i18n_store.translate(&locale.0, kind.message_key()),
    }))
}
