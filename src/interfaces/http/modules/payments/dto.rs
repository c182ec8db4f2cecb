//! Order and payment DTOs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::services::payment::{
    IntentCreated, IntentRequest, OrderInput, OrderLine, PaymentMethod, RefundOutcome,
};
use crate::domain::payment::{
    Order, OrderItem, Payment, PaymentFilter, PaymentIntent, PaymentProvider, PaymentStats,
    PaymentStatus, ProviderStats, Refund,
};
use crate::domain::DomainResult;
use crate::shared::{validate_phone, PaginationParams};

// ── Orders ─────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemDto {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

impl From<OrderItem> for OrderItemDto {
    fn from(i: OrderItem) -> Self {
        Self {
            line_total_cents: i.line_total(),
            product_id: i.product_id,
            product_name: i.product_name,
            quantity: i.quantity,
            unit_price_cents: i.unit_price_cents,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDto {
    pub id: String,
    pub order_no: String,
    pub user_id: Option<String>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub shipping_address: Option<String>,
    pub total_cents: i64,
    /// PENDING, PAID, CANCELLED or REFUNDED
    pub status: String,
    pub items: Vec<OrderItemDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderDto {
    fn from(o: Order) -> Self {
        Self {
            id: o.id,
            order_no: o.order_no,
            user_id: o.user_id,
            customer_name: o.customer_name,
            customer_phone: o.customer_phone,
            customer_email: o.customer_email,
            shipping_address: o.shipping_address,
            total_cents: o.total_cents,
            status: o.status.to_string(),
            items: o.items.into_iter().map(Into::into).collect(),
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderLineRequest {
    pub product_id: String,
    #[validate(range(min = 1, max = 999, message = "quantity must be 1–999"))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, max = 120, message = "customer_name is required"))]
    pub customer_name: String,
    #[validate(custom(function = "validate_phone"))]
    pub customer_phone: String,
    #[validate(email(message = "Invalid email"))]
    pub customer_email: Option<String>,
    #[validate(length(max = 500))]
    pub shipping_address: Option<String>,
    #[validate(length(min = 1, max = 100, message = "order needs at least one item"), nested)]
    pub items: Vec<OrderLineRequest>,
}

impl CreateOrderRequest {
    pub fn into_input(self, user_id: Option<String>) -> OrderInput {
        OrderInput {
            user_id,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            customer_email: self.customer_email,
            shipping_address: self.shipping_address,
            items: self
                .items
                .into_iter()
                .map(|l| OrderLine {
                    product_id: l.product_id,
                    quantity: l.quantity,
                })
                .collect(),
        }
    }
}

// ── Payments ───────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentMethodDto {
    pub provider: String,
    pub name: String,
    pub description: String,
    pub enabled: bool,
}

impl From<PaymentMethod> for PaymentMethodDto {
    fn from(m: PaymentMethod) -> Self {
        Self {
            provider: m.provider.to_string(),
            name: m.name.to_string(),
            description: m.description.to_string(),
            enabled: m.enabled,
        }
    }
}

/// Which gateways have credentials configured
#[derive(Debug, Serialize, ToSchema)]
pub struct GatewayStatusDto {
    pub gateways: BTreeMap<String, bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateIntentRequest {
    pub order_id: String,
    /// VNPAY, MOMO, PAYOS or COD
    pub provider: String,
    /// Defaults to the order total
    #[validate(range(min = 1000, message = "amount must be at least 1000 VND"))]
    pub amount_cents: Option<i64>,
    #[validate(length(min = 8, max = 128, message = "idempotency_key must be 8–128 characters"))]
    pub idempotency_key: String,
    #[validate(url(message = "return_url must be a URL"))]
    pub return_url: Option<String>,
}

impl CreateIntentRequest {
    pub fn into_request(self) -> DomainResult<IntentRequest> {
        Ok(IntentRequest {
            provider: self.provider.parse::<PaymentProvider>()?,
            order_id: self.order_id,
            amount_cents: self.amount_cents,
            idempotency_key: self.idempotency_key,
            return_url: self.return_url,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IntentDto {
    pub intent_id: String,
    pub order_id: String,
    pub provider: String,
    pub amount_cents: i64,
    pub status: String,
    /// Gateway checkout link; absent for COD
    pub redirect_url: Option<String>,
}

impl IntentDto {
    fn from_intent(intent: PaymentIntent, redirect_url: Option<String>) -> Self {
        Self {
            intent_id: intent.id,
            order_id: intent.order_id,
            provider: intent.provider.to_string(),
            amount_cents: intent.amount_cents,
            status: intent.status.to_string(),
            redirect_url,
        }
    }
}

impl From<IntentCreated> for IntentDto {
    fn from(c: IntentCreated) -> Self {
        Self::from_intent(c.intent, c.redirect_url)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentDto {
    pub id: String,
    pub order_id: String,
    pub intent_id: String,
    pub provider: String,
    pub amount_cents: i64,
    pub refunded_cents: i64,
    pub status: String,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Payment> for PaymentDto {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id,
            order_id: p.order_id,
            intent_id: p.intent_id,
            provider: p.provider.to_string(),
            amount_cents: p.amount_cents,
            refunded_cents: p.refunded_cents,
            status: p.status.to_string(),
            transaction_id: p.transaction_id,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PaymentListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
    pub provider: Option<String>,
}

impl PaymentListQuery {
    pub fn into_filter(self) -> DomainResult<PaymentFilter> {
        let status = self
            .status
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::parse::<PaymentStatus>)
            .transpose()?;
        let provider = self
            .provider
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::parse::<PaymentProvider>)
            .transpose()?;
        Ok(PaymentFilter {
            status,
            provider,
            pagination: PaginationParams::new(self.page, self.limit, 20),
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProviderStatsDto {
    pub provider: String,
    pub count: u64,
    pub amount_cents: i64,
}

impl From<ProviderStats> for ProviderStatsDto {
    fn from(s: ProviderStats) -> Self {
        Self {
            provider: s.provider.to_string(),
            count: s.count,
            amount_cents: s.amount_cents,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentStatsDto {
    pub total_payments: u64,
    pub succeeded_payments: u64,
    pub refunded_payments: u64,
    pub total_amount_cents: i64,
    pub refunded_amount_cents: i64,
    pub by_provider: Vec<ProviderStatsDto>,
}

impl From<PaymentStats> for PaymentStatsDto {
    fn from(s: PaymentStats) -> Self {
        Self {
            total_payments: s.total_payments,
            succeeded_payments: s.succeeded_payments,
            refunded_payments: s.refunded_payments,
            total_amount_cents: s.total_amount_cents,
            refunded_amount_cents: s.refunded_amount_cents,
            by_provider: s.by_provider.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRefundRequest {
    pub payment_id: String,
    /// Defaults to everything not yet refunded
    #[validate(range(min = 1))]
    pub amount_cents: Option<i64>,
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RefundDto {
    pub id: String,
    pub payment_id: String,
    pub amount_cents: i64,
    pub reason: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Refund> for RefundDto {
    fn from(r: Refund) -> Self {
        Self {
            id: r.id,
            payment_id: r.payment_id,
            amount_cents: r.amount_cents,
            reason: r.reason,
            status: r.status.to_string(),
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RefundOutcomeDto {
    pub refund: RefundDto,
    pub payment: PaymentDto,
}

impl From<RefundOutcome> for RefundOutcomeDto {
    fn from(o: RefundOutcome) -> Self {
        Self {
            refund: o.refund.into(),
            payment: o.payment.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::payment::MIN_AMOUNT_CENTS;
    use crate::interfaces::http::common::validated_json::describe_violations;

    fn intent(amount: Option<i64>, key: &str) -> CreateIntentRequest {
        CreateIntentRequest {
            order_id: "o-1".into(),
            provider: "vnpay".into(),
            amount_cents: amount,
            idempotency_key: key.into(),
            return_url: None,
        }
    }

    #[test]
    fn intent_amount_floor_matches_service() {
        assert!(intent(Some(MIN_AMOUNT_CENTS), "key-12345").validate().is_ok());
        assert!(intent(Some(MIN_AMOUNT_CENTS - 1), "key-12345").validate().is_err());
        assert!(intent(None, "short").validate().is_err());
    }

    fn order(items: Vec<OrderLineRequest>) -> CreateOrderRequest {
        CreateOrderRequest {
            customer_name: "Nguyễn Văn A".into(),
            customer_phone: "0901234567".into(),
            customer_email: None,
            shipping_address: None,
            items,
        }
    }

    #[test]
    fn order_lines_are_validated_as_a_list() {
        let line = |quantity| OrderLineRequest {
            product_id: "p-1".into(),
            quantity,
        };
        assert!(order(vec![line(2)]).validate().is_ok());
        assert!(order(vec![]).validate().is_err());

        let errors = order(vec![line(1), line(0)]).validate().unwrap_err();
        let message = describe_violations(&errors);
        assert!(message.contains("items[1].quantity"), "{}", message);
    }

    #[test]
    fn provider_is_parsed_case_insensitively() {
        let req = intent(None, "key-12345").into_request().unwrap();
        assert_eq!(req.provider, PaymentProvider::Vnpay);

        let mut bad = intent(None, "key-12345");
        bad.provider = "paypal".into();
        assert!(bad.into_request().is_err());
    }

    #[test]
    fn unknown_payment_status_filter_is_rejected() {
        let q = PaymentListQuery {
            page: None,
            limit: None,
            status: Some("SETTLED".into()),
            provider: None,
        };
        assert!(q.into_filter().is_err());
    }
}
