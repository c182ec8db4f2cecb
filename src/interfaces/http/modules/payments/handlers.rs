//! Order, payment and gateway notification handlers
//!
//! Gateway callbacks and webhooks reply in each gateway's own format, not
//! in the standard envelope.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde_json::{Map, Value};

use super::dto::*;
use crate::interfaces::http::common::{
    created, ok, ApiError, ApiResponse, ApiResult, CreatedResult, PageQuery, PaginatedResponse,
    ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::state::AppState;

// ── Orders ─────────────────────────────────────────────────────

#[utoipa::path(
    post,
    path = "/api/v1/orders",
    tag = "Orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created; prices come from the catalog", body = ApiResponse<OrderDto>),
        (status = 400, description = "Validation error or out of stock"),
        (status = 404, description = "Unknown product")
    )
)]
pub async fn create_order(
    State(state): State<AppState>,
    caller: Option<Extension<AuthenticatedUser>>,
    ValidatedJson(request): ValidatedJson<CreateOrderRequest>,
) -> CreatedResult<OrderDto> {
    let user_id = caller.and_then(|Extension(user)| user.account_id());
    let order = state.payments.create_order(request.into_input(user_id)).await?;
    created(order.into())
}

#[utoipa::path(
    get,
    path = "/api/v1/orders",
    tag = "Orders",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(PageQuery),
    responses((status = 200, description = "Order page, newest first", body = ApiResponse<PaginatedResponse<OrderDto>>))
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<PaginatedResponse<OrderDto>> {
    let page = state.payments.list_orders(query.params()).await?;
    ok(PaginatedResponse::from_result(page, OrderDto::from))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    tag = "Orders",
    params(("id" = String, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order with items", body = ApiResponse<OrderDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<OrderDto> {
    ok(state.payments.get_order(&id).await?.into())
}

// ── Payments ───────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/v1/payments/methods",
    tag = "Payments",
    responses((status = 200, description = "Payment methods and whether each is usable", body = ApiResponse<Vec<PaymentMethodDto>>))
)]
pub async fn payment_methods(State(state): State<AppState>) -> ApiResult<Vec<PaymentMethodDto>> {
    ok(state
        .payments
        .payment_methods()
        .into_iter()
        .map(PaymentMethodDto::from)
        .collect())
}

#[utoipa::path(
    get,
    path = "/api/v1/payments/status",
    tag = "Payments",
    responses((status = 200, description = "Gateway configuration status", body = ApiResponse<GatewayStatusDto>))
)]
pub async fn payment_status(State(state): State<AppState>) -> ApiResult<GatewayStatusDto> {
    let gateways = state
        .payments
        .gateway_status()
        .into_iter()
        .map(|(name, enabled)| (name.to_string(), enabled))
        .collect();
    ok(GatewayStatusDto { gateways })
}

#[utoipa::path(
    get,
    path = "/api/v1/payments",
    tag = "Payments",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(PaymentListQuery),
    responses(
        (status = 200, description = "Payment page", body = ApiResponse<PaginatedResponse<PaymentDto>>),
        (status = 400, description = "Unknown status or provider filter")
    )
)]
pub async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<PaymentListQuery>,
) -> ApiResult<PaginatedResponse<PaymentDto>> {
    let page = state.payments.list_payments(query.into_filter()?).await?;
    ok(PaginatedResponse::from_result(page, PaymentDto::from))
}

#[utoipa::path(
    get,
    path = "/api/v1/payments/stats",
    tag = "Payments",
    security(("bearer_auth" = []), ("api_key" = [])),
    responses((status = 200, description = "Totals by status and provider", body = ApiResponse<PaymentStatsDto>))
)]
pub async fn payment_stats(State(state): State<AppState>) -> ApiResult<PaymentStatsDto> {
    ok(state.payments.stats().await?.into())
}

#[utoipa::path(
    post,
    path = "/api/v1/payments/intents",
    tag = "Payments",
    security(("bearer_auth" = []), ("api_key" = [])),
    request_body = CreateIntentRequest,
    responses(
        (status = 201, description = "Intent created, or the existing one for this idempotency key", body = ApiResponse<IntentDto>),
        (status = 400, description = "Amount, provider or order state rejected"),
        (status = 409, description = "Idempotency key used for another order")
    )
)]
pub async fn create_intent(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateIntentRequest>,
) -> CreatedResult<IntentDto> {
    let intent = state.payments.create_intent(request.into_request()?).await?;
    created(intent.into())
}

#[utoipa::path(
    post,
    path = "/api/v1/payments/refunds",
    tag = "Payments",
    security(("bearer_auth" = []), ("api_key" = [])),
    request_body = CreateRefundRequest,
    responses(
        (status = 201, description = "Refund recorded", body = ApiResponse<RefundOutcomeDto>),
        (status = 400, description = "Payment not refundable or amount too large"),
        (status = 404, description = "Payment not found")
    )
)]
pub async fn create_refund(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateRefundRequest>,
) -> CreatedResult<RefundOutcomeDto> {
    let outcome = state
        .payments
        .create_refund(&request.payment_id, request.amount_cents, request.reason)
        .await?;
    created(outcome.into())
}

// ── Gateway callbacks (browser redirects) and webhooks ─────────

/// VNPAY return URL and IPN; both carry the signed `vnp_*` query.
#[utoipa::path(
    get,
    path = "/api/v1/payments/vnpay/callback",
    tag = "Payment Gateways",
    responses((status = 200, description = "`{RspCode, Message}`; 97 = bad signature, 01 = unknown order"))
)]
pub async fn vnpay_callback(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.payments.handle_vnpay(params).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/payments/vnpay/webhook",
    tag = "Payment Gateways",
    responses((status = 200, description = "`{RspCode, Message}`"))
)]
pub async fn vnpay_webhook(
    state: State<AppState>,
    params: Query<BTreeMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    vnpay_callback(state, params).await
}

/// MoMo redirect: the notification fields arrive as query parameters.
#[utoipa::path(
    get,
    path = "/api/v1/payments/momo/callback",
    tag = "Payment Gateways",
    responses((status = 200, description = "`{resultCode, message}`"))
)]
pub async fn momo_callback(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let payload: Map<String, Value> = params
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect();
    Ok(Json(state.payments.handle_momo(Value::Object(payload)).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/payments/momo/webhook",
    tag = "Payment Gateways",
    request_body = Object,
    responses((status = 200, description = "`{resultCode, message}`"))
)]
pub async fn momo_webhook(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.payments.handle_momo(payload).await?))
}

/// PayOS return URL; unsigned, so it only reports the order's state.
#[utoipa::path(
    get,
    path = "/api/v1/payments/payos/callback",
    tag = "Payment Gateways",
    params(("orderCode" = String, Query, description = "Our order number")),
    responses((status = 200, description = "`{orderNo, status}` or ignored"))
)]
pub async fn payos_callback(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let order_no = params.get("orderCode").map(String::as_str).unwrap_or_default();
    Ok(Json(state.payments.payos_return(order_no).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/payments/payos/webhook",
    tag = "Payment Gateways",
    request_body = Object,
    responses((status = 200, description = "`{error, message}`; -1 = bad signature"))
)]
pub async fn payos_webhook(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.payments.handle_payos_webhook(payload).await?))
}
