//! Orders, payment intents, gateway notifications and refunds
//!
//! Checkout links for VNPAY, MoMo and PayOS are assembled and signed
//! locally; the gateways report back through callbacks (browser redirects)
//! and webhooks (server to server), both routed through [`PaymentService`].

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::{info, warn};
use url::Url;

use crate::config::PaymentConfig;
use crate::domain::payment::{
    IntentStatus, Order, OrderItem, OrderStatus, Payment, PaymentFilter, PaymentIntent,
    PaymentProvider, PaymentStats, PaymentStatus, Refund, RefundStatus,
};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::infrastructure::crypto::signature::{hmac_sha256_hex, sorted_query, sorted_raw_query, verify_hex};
use crate::shared::{PaginatedResult, PaginationParams};

/// Gateways refuse smaller charges
pub const MIN_AMOUNT_CENTS: i64 = 1_000;
pub const MIN_IDEMPOTENCY_KEY_LEN: usize = 8;
/// VNPAY expects `vnp_Amount` in hundredths of a dong
pub const VNPAY_AMOUNT_SCALE: i64 = 100;

#[derive(Debug, Clone)]
pub struct OrderLine {
    pub product_id: String,
    pub quantity: i32,
}

#[derive(Debug, Clone, Default)]
pub struct OrderInput {
    pub user_id: Option<String>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub shipping_address: Option<String>,
    pub items: Vec<OrderLine>,
}

#[derive(Debug, Clone)]
pub struct IntentRequest {
    pub order_id: String,
    pub provider: PaymentProvider,
    /// Defaults to the order total
    pub amount_cents: Option<i64>,
    pub idempotency_key: String,
    pub return_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct IntentCreated {
    pub intent: PaymentIntent,
    pub redirect_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PaymentMethod {
    pub provider: PaymentProvider,
    pub name: &'static str,
    pub description: &'static str,
    pub enabled: bool,
}

#[derive(Debug, Clone)]
pub struct RefundOutcome {
    pub refund: Refund,
    pub payment: Payment,
}

fn payments_metric(provider: PaymentProvider, status: &'static str) {
    metrics::counter!(
        "payments_total",
        "provider" => provider.as_str(),
        "status" => status
    )
    .increment(1);
}

/// JSON scalar as the string a gateway signed
fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn object_pairs(value: &Value, skip: &[&str]) -> Vec<(String, String)> {
    value
        .as_object()
        .map(|obj| {
            obj.iter()
                .filter(|(k, _)| !skip.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), scalar_to_string(v)))
                .collect()
        })
        .unwrap_or_default()
}

/// Signature PayOS attaches to webhook `data`: HMAC over its sorted fields
pub fn payos_data_signature(checksum_key: &str, data: &Value) -> String {
    hmac_sha256_hex(checksum_key, &sorted_raw_query(&object_pairs(data, &[])))
}

/// MoMo signs every notification field except `signature`
pub fn momo_signature(secret_key: &str, payload: &Value) -> String {
    hmac_sha256_hex(secret_key, &sorted_raw_query(&object_pairs(payload, &["signature"])))
}

/// `vnp_SecureHash` over every `vnp_*` field except the hash fields
pub fn vnpay_signature(hash_secret: &str, params: &BTreeMap<String, String>) -> String {
    let signed: Vec<(String, String)> = params
        .iter()
        .filter(|(k, _)| k.starts_with("vnp_") && *k != "vnp_SecureHash" && *k != "vnp_SecureHashType")
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    hmac_sha256_hex(hash_secret, &sorted_raw_query(&signed))
}

pub struct PaymentService {
    repos: Arc<dyn RepositoryProvider>,
    config: PaymentConfig,
}

impl PaymentService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, config: PaymentConfig) -> Self {
        Self { repos, config }
    }

    // ── Orders ──────────────────────────────────────────────────

    /// Prices come from the catalog, never from the client.
    pub async fn create_order(&self, input: OrderInput) -> DomainResult<Order> {
        if input.customer_name.trim().is_empty() || input.customer_phone.trim().is_empty() {
            return Err(DomainError::Validation(
                "Customer name and phone are required".into(),
            ));
        }
        if input.items.is_empty() {
            return Err(DomainError::Validation("Order has no items".into()));
        }

        let order_id = uuid::Uuid::new_v4().to_string();
        let mut items = Vec::with_capacity(input.items.len());
        for line in &input.items {
            if line.quantity <= 0 {
                return Err(DomainError::Validation(format!(
                    "Quantity for {} must be positive",
                    line.product_id
                )));
            }
            let product = match self.repos.products().find_by_id(&line.product_id).await? {
                Some(p) if !p.is_deleted() && p.is_active => p,
                _ => return Err(DomainError::not_found("Product", "id", &line.product_id)),
            };
            items.push(OrderItem {
                id: uuid::Uuid::new_v4().to_string(),
                order_id: order_id.clone(),
                product_id: product.id,
                product_name: product.name,
                quantity: line.quantity,
                unit_price_cents: product.price_cents,
            });
        }

        let now = Utc::now();
        let order = Order {
            id: order_id,
            order_no: Order::generate_order_no(now),
            user_id: input.user_id,
            customer_name: input.customer_name.trim().to_string(),
            customer_phone: input.customer_phone.trim().to_string(),
            customer_email: input.customer_email,
            shipping_address: input.shipping_address,
            total_cents: items.iter().map(OrderItem::line_total).sum(),
            status: OrderStatus::Pending,
            items,
            created_at: now,
            updated_at: now,
        };
        let order = self.repos.orders().create(order).await?;
        info!(order_no = %order.order_no, total = order.total_cents, "Order created");
        Ok(order)
    }

    pub async fn get_order(&self, id: &str) -> DomainResult<Order> {
        self.repos
            .orders()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Order", "id", id))
    }

    pub async fn list_orders(&self, pagination: PaginationParams) -> DomainResult<PaginatedResult<Order>> {
        self.repos.orders().list(pagination).await
    }

    // ── Methods / configuration ─────────────────────────────────

    fn is_configured(&self, provider: PaymentProvider) -> bool {
        let c = &self.config;
        match provider {
            PaymentProvider::Vnpay => !c.vnpay.tmn_code.is_empty() && !c.vnpay.hash_secret.is_empty(),
            PaymentProvider::Momo => {
                !c.momo.partner_code.is_empty() && !c.momo.secret_key.is_empty()
            }
            PaymentProvider::Payos => {
                !c.payos.client_id.is_empty() && !c.payos.checksum_key.is_empty()
            }
            PaymentProvider::Cod => true,
        }
    }

    pub fn payment_methods(&self) -> Vec<PaymentMethod> {
        PaymentProvider::ALL
            .iter()
            .map(|&provider| PaymentMethod {
                provider,
                name: provider.display_name(),
                description: provider.description(),
                enabled: self.is_configured(provider),
            })
            .collect()
    }

    /// `{provider: configured}` for each gateway
    pub fn gateway_status(&self) -> BTreeMap<&'static str, bool> {
        PaymentProvider::ALL
            .iter()
            .map(|&p| (p.as_str(), self.is_configured(p)))
            .collect()
    }

    // ── Intents ─────────────────────────────────────────────────

    pub async fn create_intent(&self, req: IntentRequest) -> DomainResult<IntentCreated> {
        let key = req.idempotency_key.trim();
        if key.len() < MIN_IDEMPOTENCY_KEY_LEN {
            return Err(DomainError::Validation(format!(
                "idempotency_key must be at least {} characters",
                MIN_IDEMPOTENCY_KEY_LEN
            )));
        }

        let order = self.get_order(&req.order_id).await?;

        if let Some(existing) = self
            .repos
            .payments()
            .find_intent_by_idempotency_key(key)
            .await?
        {
            if existing.order_id != order.id {
                return Err(DomainError::Conflict(
                    "idempotency_key already used for another order".into(),
                ));
            }
            let redirect_url = self.redirect_url(&existing, &order)?;
            return Ok(IntentCreated {
                intent: existing,
                redirect_url,
            });
        }

        if order.status != OrderStatus::Pending {
            return Err(DomainError::Validation(format!(
                "Order {} is already {}",
                order.order_no, order.status
            )));
        }
        if !self.is_configured(req.provider) {
            return Err(DomainError::Validation(format!(
                "{} is not configured",
                req.provider
            )));
        }
        let amount = req.amount_cents.unwrap_or(order.total_cents);
        if amount < MIN_AMOUNT_CENTS {
            return Err(DomainError::Validation(format!(
                "Amount must be at least {} VND",
                MIN_AMOUNT_CENTS
            )));
        }
        if amount > order.total_cents {
            return Err(DomainError::Validation(format!(
                "Amount {} exceeds order total {}",
                amount, order.total_cents
            )));
        }
        if let Some(url) = req.return_url.as_deref() {
            Url::parse(url)
                .map_err(|_| DomainError::Validation(format!("Invalid return_url: {}", url)))?;
        }

        let now = Utc::now();
        let intent = self
            .repos
            .payments()
            .create_intent(PaymentIntent {
                id: uuid::Uuid::new_v4().to_string(),
                order_id: order.id.clone(),
                provider: req.provider,
                amount_cents: amount,
                status: IntentStatus::Pending,
                return_url: req.return_url,
                idempotency_key: Some(key.to_string()),
                created_at: now,
                updated_at: now,
            })
            .await?;
        payments_metric(intent.provider, "INTENT_CREATED");
        info!(intent_id = %intent.id, order_no = %order.order_no, provider = %intent.provider, amount, "Payment intent created");

        let redirect_url = self.redirect_url(&intent, &order)?;
        Ok(IntentCreated {
            intent,
            redirect_url,
        })
    }

    fn redirect_url(&self, intent: &PaymentIntent, order: &Order) -> DomainResult<Option<String>> {
        let return_url = intent
            .return_url
            .clone()
            .unwrap_or_else(|| self.config.return_url.clone());
        let url = match intent.provider {
            PaymentProvider::Cod => return Ok(None),
            PaymentProvider::Vnpay => self.vnpay_url(intent, order, &return_url),
            PaymentProvider::Momo => self.momo_url(intent, order, &return_url),
            PaymentProvider::Payos => self.payos_url(intent, order, &return_url),
        };
        Ok(Some(url))
    }

    fn vnpay_url(&self, intent: &PaymentIntent, order: &Order, return_url: &str) -> String {
        let vnp = &self.config.vnpay;
        let mut params = BTreeMap::new();
        params.insert(
            "vnp_Amount".to_string(),
            (intent.amount_cents * VNPAY_AMOUNT_SCALE).to_string(),
        );
        params.insert("vnp_CurrCode".to_string(), "VND".to_string());
        params.insert("vnp_OrderInfo".to_string(), format!("Thanh toan don hang {}", order.order_no));
        params.insert("vnp_ReturnUrl".to_string(), return_url.to_string());
        params.insert("vnp_TmnCode".to_string(), vnp.tmn_code.clone());
        params.insert("vnp_TxnRef".to_string(), intent.id.clone());
        let hash = vnpay_signature(&vnp.hash_secret, &params);

        let pairs: Vec<(String, String)> = params.into_iter().collect();
        format!(
            "{}?{}&vnp_SecureHash={}",
            vnp.pay_url,
            sorted_query(&pairs),
            hash
        )
    }

    fn momo_url(&self, intent: &PaymentIntent, order: &Order, return_url: &str) -> String {
        let momo = &self.config.momo;
        let mut signed = vec![
            ("accessKey".to_string(), momo.access_key.clone()),
            ("amount".to_string(), intent.amount_cents.to_string()),
            ("orderId".to_string(), order.order_no.clone()),
            ("orderInfo".to_string(), format!("Thanh toán đơn hàng {}", order.order_no)),
            ("partnerCode".to_string(), momo.partner_code.clone()),
            ("redirectUrl".to_string(), return_url.to_string()),
            ("requestId".to_string(), intent.id.clone()),
            ("requestType".to_string(), "payWithATM".to_string()),
        ];
        let signature = hmac_sha256_hex(&momo.secret_key, &sorted_raw_query(&signed));
        signed.retain(|(k, _)| k != "accessKey");
        signed.push(("signature".to_string(), signature));
        format!("{}?{}", momo.checkout_url, sorted_query(&signed))
    }

    fn payos_url(&self, intent: &PaymentIntent, order: &Order, return_url: &str) -> String {
        let payos = &self.config.payos;
        let mut signed = vec![
            ("amount".to_string(), intent.amount_cents.to_string()),
            ("cancelUrl".to_string(), return_url.to_string()),
            ("description".to_string(), format!("Thanh toan {}", order.order_no)),
            ("orderCode".to_string(), order.order_no.clone()),
            ("returnUrl".to_string(), return_url.to_string()),
        ];
        let signature = hmac_sha256_hex(&payos.checksum_key, &sorted_raw_query(&signed));
        signed.push(("clientId".to_string(), payos.client_id.clone()));
        signed.push(("signature".to_string(), signature));
        format!("{}?{}", payos.checkout_url, sorted_query(&signed))
    }

    // ── Settlement ──────────────────────────────────────────────

    async fn intent(&self, intent_id: &str) -> DomainResult<PaymentIntent> {
        self.repos
            .payments()
            .find_intent(intent_id)
            .await?
            .ok_or_else(|| DomainError::not_found("PaymentIntent", "id", intent_id))
    }

    /// Settle an intent. Repeated notifications return the first payment.
    pub async fn mark_paid(
        &self,
        provider: PaymentProvider,
        intent_id: &str,
        transaction_id: Option<String>,
    ) -> DomainResult<Payment> {
        let intent = self.intent(intent_id).await?;
        if intent.provider != provider {
            return Err(DomainError::Validation(format!(
                "Intent {} belongs to {}, not {}",
                intent.id, intent.provider, provider
            )));
        }
        if let Some(existing) = self.repos.payments().find_payment_by_intent(&intent.id).await? {
            return Ok(existing);
        }

        let now = Utc::now();
        let payment = self
            .repos
            .payments()
            .record_success(Payment {
                id: uuid::Uuid::new_v4().to_string(),
                order_id: intent.order_id.clone(),
                intent_id: intent.id.clone(),
                provider,
                amount_cents: intent.amount_cents,
                refunded_cents: 0,
                status: PaymentStatus::Succeeded,
                transaction_id: transaction_id.or_else(|| Some(intent.id.clone())),
                created_at: now,
                updated_at: now,
            })
            .await?;
        payments_metric(provider, "SUCCEEDED");
        info!(payment_id = %payment.id, intent_id = %intent.id, provider = %provider, "Payment succeeded");
        Ok(payment)
    }

    /// [`Self::mark_paid`] for gateway notifications: an order that already
    /// left PENDING through another intent yields `None` instead of an error.
    async fn settle(
        &self,
        provider: PaymentProvider,
        intent_id: &str,
        transaction_id: Option<String>,
    ) -> DomainResult<Option<Payment>> {
        match self.mark_paid(provider, intent_id, transaction_id).await {
            Ok(payment) => Ok(Some(payment)),
            Err(DomainError::Conflict(reason)) => {
                warn!(intent_id, provider = %provider, %reason, "Late success notification ignored");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// A settled intent is never downgraded; unknown intents are ignored.
    pub async fn mark_failed(&self, provider: PaymentProvider, intent_id: &str) -> DomainResult<()> {
        let Some(intent) = self.repos.payments().find_intent(intent_id).await? else {
            warn!(intent_id, provider = %provider, "Failure reported for unknown intent");
            return Ok(());
        };
        if intent.status == IntentStatus::Succeeded {
            return Ok(());
        }
        self.repos
            .payments()
            .update_intent_status(&intent.id, IntentStatus::Failed)
            .await?;
        payments_metric(provider, "FAILED");
        info!(intent_id, provider = %provider, "Payment failed");
        Ok(())
    }

    async fn latest_intent_by_order_no(
        &self,
        order_no: &str,
        provider: PaymentProvider,
    ) -> DomainResult<Option<PaymentIntent>> {
        let Some(order) = self.repos.orders().find_by_order_no(order_no).await? else {
            return Ok(None);
        };
        self.repos
            .payments()
            .latest_intent_for_order(&order.id, provider)
            .await
    }

    // ── Gateway notifications ───────────────────────────────────

    /// VNPAY return/IPN parameters; the reply follows VNPAY's `RspCode` format.
    pub async fn handle_vnpay(&self, params: BTreeMap<String, String>) -> DomainResult<Value> {
        if !self.is_configured(PaymentProvider::Vnpay) {
            warn!("VNPAY notification while VNPAY is not configured");
            return Ok(json!({"RspCode": "97", "Message": "Invalid signature"}));
        }
        let received = params.get("vnp_SecureHash").cloned().unwrap_or_default();
        let expected = vnpay_signature(&self.config.vnpay.hash_secret, &params);
        if received.is_empty() || !verify_hex(&expected, &received) {
            warn!("VNPAY notification with invalid signature");
            return Ok(json!({"RspCode": "97", "Message": "Invalid signature"}));
        }

        let txn_ref = params.get("vnp_TxnRef").cloned().unwrap_or_default();
        let Some(intent) = self.repos.payments().find_intent(&txn_ref).await? else {
            warn!(txn_ref = %txn_ref, "VNPAY notification for unknown intent");
            return Ok(json!({"RspCode": "01", "Message": "Order not found"}));
        };

        let amount = params.get("vnp_Amount").and_then(|a| a.parse::<i64>().ok());
        if amount != intent.amount_cents.checked_mul(VNPAY_AMOUNT_SCALE) {
            warn!(txn_ref = %txn_ref, ?amount, expected = intent.amount_cents, "VNPAY amount mismatch");
            return Ok(json!({"RspCode": "04", "Message": "Invalid amount"}));
        }

        if params.get("vnp_ResponseCode").map(String::as_str) == Some("00") {
            let transaction_no = params.get("vnp_TransactionNo").cloned();
            if self
                .settle(PaymentProvider::Vnpay, &txn_ref, transaction_no)
                .await?
                .is_none()
            {
                return Ok(json!({"RspCode": "02", "Message": "Order already confirmed"}));
            }
        } else {
            self.mark_failed(PaymentProvider::Vnpay, &txn_ref).await?;
        }
        Ok(json!({"RspCode": "00", "Message": "success"}))
    }

    /// MoMo redirect or IPN. `orderId` carries our order number.
    pub async fn handle_momo(&self, payload: Value) -> DomainResult<Value> {
        if !self.is_configured(PaymentProvider::Momo) {
            warn!("MoMo notification while MoMo is not configured");
            return Ok(json!({"resultCode": 97, "message": "invalid signature"}));
        }
        let received = payload
            .get("signature")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let expected = momo_signature(&self.config.momo.secret_key, &payload);
        if received.is_empty() || !verify_hex(&expected, received) {
            warn!("MoMo notification with invalid signature");
            return Ok(json!({"resultCode": 97, "message": "invalid signature"}));
        }

        let order_no = payload.get("orderId").map(scalar_to_string).unwrap_or_default();
        let Some(intent) = self
            .latest_intent_by_order_no(&order_no, PaymentProvider::Momo)
            .await?
        else {
            warn!(order_no = %order_no, "MoMo notification for unknown order");
            return Ok(json!({"resultCode": 0, "message": "ignored"}));
        };

        let result_code = payload
            .get("resultCode")
            .map(scalar_to_string)
            .unwrap_or_default();
        if result_code == "0" {
            let trans_id = payload.get("transId").map(scalar_to_string);
            if self
                .settle(PaymentProvider::Momo, &intent.id, trans_id)
                .await?
                .is_none()
            {
                return Ok(json!({"resultCode": 0, "message": "ignored"}));
            }
        } else {
            self.mark_failed(PaymentProvider::Momo, &intent.id).await?;
        }
        Ok(json!({"resultCode": 0, "message": "success"}))
    }

    /// PayOS webhook: `{code, desc, data: {orderCode, reference, ...}, signature}`
    pub async fn handle_payos_webhook(&self, payload: Value) -> DomainResult<Value> {
        if !self.is_configured(PaymentProvider::Payos) {
            warn!("PayOS webhook while PayOS is not configured");
            return Ok(json!({"error": -1, "message": "invalid signature"}));
        }
        let data = payload.get("data").cloned().unwrap_or(Value::Null);
        let received = payload
            .get("signature")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let expected = payos_data_signature(&self.config.payos.checksum_key, &data);
        if received.is_empty() || !verify_hex(&expected, received) {
            warn!("PayOS webhook with invalid signature");
            return Ok(json!({"error": -1, "message": "invalid signature"}));
        }

        let order_no = data.get("orderCode").map(scalar_to_string).unwrap_or_default();
        let Some(intent) = self
            .latest_intent_by_order_no(&order_no, PaymentProvider::Payos)
            .await?
        else {
            warn!(order_no = %order_no, "PayOS webhook for unknown order");
            return Ok(json!({"error": 0, "message": "ignored"}));
        };

        let code = payload.get("code").map(scalar_to_string).unwrap_or_default();
        if code == "00" {
            let reference = data
                .get("reference")
                .or_else(|| data.get("id"))
                .map(scalar_to_string);
            if self
                .settle(PaymentProvider::Payos, &intent.id, reference)
                .await?
                .is_none()
            {
                return Ok(json!({"error": 0, "message": "ignored"}));
            }
        } else {
            self.mark_failed(PaymentProvider::Payos, &intent.id).await?;
        }
        Ok(json!({"error": 0, "message": "success"}))
    }

    /// PayOS browser return carries no signature, so it only reports state.
    pub async fn payos_return(&self, order_no: &str) -> DomainResult<Value> {
        match self.repos.orders().find_by_order_no(order_no).await? {
            Some(order) => Ok(json!({
                "orderNo": order.order_no,
                "status": order.status.as_str(),
            })),
            None => Ok(json!({"error": 0, "message": "ignored"})),
        }
    }

    // ── Refunds / reporting ─────────────────────────────────────

    pub async fn get_payment(&self, id: &str) -> DomainResult<Payment> {
        self.repos
            .payments()
            .find_payment(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Payment", "id", id))
    }

    /// Refund part or (by default) all of what remains on a payment.
    pub async fn create_refund(
        &self,
        payment_id: &str,
        amount_cents: Option<i64>,
        reason: Option<String>,
    ) -> DomainResult<RefundOutcome> {
        let payment = self.get_payment(payment_id).await?;
        if payment.status != PaymentStatus::Succeeded {
            return Err(DomainError::Validation(format!(
                "Payment is {}, only SUCCEEDED payments can be refunded",
                payment.status
            )));
        }
        let amount = amount_cents.unwrap_or_else(|| payment.refundable_cents());
        if amount <= 0 {
            return Err(DomainError::Validation("Refund amount must be positive".into()));
        }
        if amount > payment.refundable_cents() {
            return Err(DomainError::Validation(format!(
                "Refund of {} exceeds remaining {} VND",
                amount,
                payment.refundable_cents()
            )));
        }

        let refund = Refund {
            id: uuid::Uuid::new_v4().to_string(),
            payment_id: payment.id.clone(),
            amount_cents: amount,
            reason: reason.or_else(|| Some("Customer request".to_string())),
            status: RefundStatus::Succeeded,
            created_at: Utc::now(),
        };
        let payment = self.repos.payments().record_refund(refund.clone()).await?;
        payments_metric(payment.provider, "REFUNDED");
        info!(payment_id = %payment.id, amount, refunded_total = payment.refunded_cents, "Refund recorded");
        Ok(RefundOutcome { refund, payment })
    }

    pub async fn list_payments(&self, filter: PaymentFilter) -> DomainResult<PaginatedResult<Payment>> {
        self.repos.payments().list_payments(filter).await
    }

    pub async fn stats(&self) -> DomainResult<PaymentStats> {
        self.repos.payments().stats().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PayosConfig;
    use crate::domain::catalog::Product;
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
    use crate::infrastructure::database::test_connection;

    struct Fixture {
        svc: PaymentService,
        repos: Arc<dyn RepositoryProvider>,
        order: Order,
    }

    fn config() -> PaymentConfig {
        let mut c = PaymentConfig::default();
        c.vnpay.tmn_code = "ATLTEST1".into();
        c.vnpay.hash_secret = "vnpay-secret".into();
        c.momo.partner_code = "MOMOTEST".into();
        c.momo.access_key = "access".into();
        c.momo.secret_key = "momo-secret".into();
        c.payos = PayosConfig {
            client_id: "client".into(),
            api_key: "api".into(),
            checksum_key: "checksum".into(),
            checkout_url: "https://pay.payos.vn/web".into(),
        };
        c
    }

    async fn fixture() -> Fixture {
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(test_connection().await));
        let product = repos
            .products()
            .create({
                let mut p = Product::new("micro-shure", "Micro Shure", 250_000);
                p.sku = "ATL-MIC-0001".into();
                p
            })
            .await
            .unwrap();
        let svc = PaymentService::new(repos.clone(), config());
        let order = svc
            .create_order(OrderInput {
                customer_name: "Phạm D".into(),
                customer_phone: "0909999999".into(),
                items: vec![OrderLine {
                    product_id: product.id,
                    quantity: 2,
                }],
                ..Default::default()
            })
            .await
            .unwrap();
        Fixture { svc, repos, order }
    }

    fn intent_req(order_id: &str, provider: PaymentProvider, key: &str) -> IntentRequest {
        IntentRequest {
            order_id: order_id.into(),
            provider,
            amount_cents: None,
            idempotency_key: key.into(),
            return_url: None,
        }
    }

    #[tokio::test]
    async fn order_total_uses_catalog_prices() {
        let f = fixture().await;
        assert_eq!(f.order.total_cents, 500_000);
        assert!(f.order.order_no.starts_with("ATL"));
        assert_eq!(f.order.items.len(), 1);
    }

    #[tokio::test]
    async fn intent_amount_rules() {
        let f = fixture().await;
        let mut req = intent_req(&f.order.id, PaymentProvider::Vnpay, "key-small-1");
        req.amount_cents = Some(999);
        assert!(matches!(
            f.svc.create_intent(req).await.unwrap_err(),
            DomainError::Validation(_)
        ));

        let mut req = intent_req(&f.order.id, PaymentProvider::Vnpay, "key-large-1");
        req.amount_cents = Some(500_001);
        assert!(f.svc.create_intent(req).await.is_err());

        let short = intent_req(&f.order.id, PaymentProvider::Vnpay, "short");
        assert!(f.svc.create_intent(short).await.is_err());
    }

    #[tokio::test]
    async fn same_idempotency_key_returns_same_intent() {
        let f = fixture().await;
        let a = f
            .svc
            .create_intent(intent_req(&f.order.id, PaymentProvider::Vnpay, "checkout-123"))
            .await
            .unwrap();
        let b = f
            .svc
            .create_intent(intent_req(&f.order.id, PaymentProvider::Vnpay, "checkout-123"))
            .await
            .unwrap();
        assert_eq!(a.intent.id, b.intent.id);
        let url = a.redirect_url.unwrap();
        assert!(url.contains("vnp_SecureHash="));
        assert!(url.contains(&format!("vnp_TxnRef={}", a.intent.id)));
    }

    #[tokio::test]
    async fn cod_has_no_redirect() {
        let f = fixture().await;
        let created = f
            .svc
            .create_intent(intent_req(&f.order.id, PaymentProvider::Cod, "cod-order-1"))
            .await
            .unwrap();
        assert!(created.redirect_url.is_none());
    }

    #[tokio::test]
    async fn vnpay_callback_settles_once() {
        let f = fixture().await;
        let created = f
            .svc
            .create_intent(intent_req(&f.order.id, PaymentProvider::Vnpay, "vnpay-flow-1"))
            .await
            .unwrap();
        let url = created.redirect_url.unwrap();
        assert!(url.contains("vnp_Amount=50000000"), "{}", url);
        assert!(url.contains("vnp_TmnCode=ATLTEST1"), "{}", url);

        let mut params = BTreeMap::new();
        params.insert("vnp_TxnRef".to_string(), created.intent.id.clone());
        params.insert("vnp_ResponseCode".to_string(), "00".to_string());
        params.insert("vnp_TransactionNo".to_string(), "14226112".to_string());

        let mut short = params.clone();
        short.insert("vnp_Amount".to_string(), "100000".to_string());
        let hash = vnpay_signature("vnpay-secret", &short);
        short.insert("vnp_SecureHash".to_string(), hash);
        let ack = f.svc.handle_vnpay(short).await.unwrap();
        assert_eq!(ack["RspCode"], "04");
        assert_eq!(
            f.svc.get_order(&f.order.id).await.unwrap().status,
            OrderStatus::Pending
        );

        params.insert("vnp_Amount".to_string(), "50000000".to_string());
        let hash = vnpay_signature("vnpay-secret", &params);

        let mut forged = params.clone();
        forged.insert("vnp_SecureHash".to_string(), "deadbeef".to_string());
        let ack = f.svc.handle_vnpay(forged).await.unwrap();
        assert_eq!(ack["RspCode"], "97");

        params.insert("vnp_SecureHash".to_string(), hash);
        let ack = f.svc.handle_vnpay(params.clone()).await.unwrap();
        assert_eq!(ack["RspCode"], "00");
        f.svc.handle_vnpay(params).await.unwrap();

        let order = f.svc.get_order(&f.order.id).await.unwrap();
        assert_eq!(order.status, OrderStatus::Paid);
        let page = f.svc.list_payments(PaymentFilter::default()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].transaction_id.as_deref(), Some("14226112"));

        let again = f
            .svc
            .create_intent(intent_req(&f.order.id, PaymentProvider::Vnpay, "vnpay-flow-2"))
            .await
            .unwrap_err();
        assert!(matches!(again, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn payos_webhook_requires_valid_signature() {
        let f = fixture().await;
        f.svc
            .create_intent(intent_req(&f.order.id, PaymentProvider::Payos, "payos-flow-1"))
            .await
            .unwrap();

        let data = json!({
            "orderCode": f.order.order_no,
            "amount": 500000,
            "reference": "FT123",
        });
        let bad = json!({"code": "00", "data": data, "signature": "00"});
        let ack = f.svc.handle_payos_webhook(bad).await.unwrap();
        assert_eq!(ack["error"], -1);

        let good = json!({
            "code": "00",
            "data": data,
            "signature": payos_data_signature("checksum", &data),
        });
        let ack = f.svc.handle_payos_webhook(good).await.unwrap();
        assert_eq!(ack["error"], 0);
        assert_eq!(
            f.svc.get_order(&f.order.id).await.unwrap().status,
            OrderStatus::Paid
        );
    }

    #[tokio::test]
    async fn momo_unknown_order_is_ignored_and_failure_recorded() {
        let f = fixture().await;
        let signed = |mut payload: Value| {
            let sig = momo_signature("momo-secret", &payload);
            payload["signature"] = Value::String(sig);
            payload
        };

        let unsigned = json!({"orderId": f.order.order_no, "resultCode": 0});
        let ack = f.svc.handle_momo(unsigned).await.unwrap();
        assert_eq!(ack["resultCode"], 97);

        let ack = f
            .svc
            .handle_momo(signed(json!({"orderId": "ATL-NOPE", "resultCode": 0})))
            .await
            .unwrap();
        assert_eq!(ack["message"], "ignored");

        let created = f
            .svc
            .create_intent(intent_req(&f.order.id, PaymentProvider::Momo, "momo-flow-1"))
            .await
            .unwrap();
        assert!(created.redirect_url.unwrap().contains("signature="));
        f.svc
            .handle_momo(signed(json!({"orderId": f.order.order_no, "resultCode": 1006})))
            .await
            .unwrap();
        let intent = f
            .repos
            .payments()
            .find_intent(&created.intent.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(intent.status, IntentStatus::Failed);
    }

    #[tokio::test]
    async fn refunds_never_exceed_payment() {
        let f = fixture().await;
        let created = f
            .svc
            .create_intent(intent_req(&f.order.id, PaymentProvider::Cod, "cod-refund-1"))
            .await
            .unwrap();
        let payment = f
            .svc
            .mark_paid(PaymentProvider::Cod, &created.intent.id, None)
            .await
            .unwrap();

        let partial = f
            .svc
            .create_refund(&payment.id, Some(200_000), Some("Trả một phần".into()))
            .await
            .unwrap();
        assert_eq!(partial.payment.refunded_cents, 200_000);
        assert_eq!(partial.payment.status, PaymentStatus::Succeeded);

        let err = f
            .svc
            .create_refund(&payment.id, Some(300_001), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let rest = f.svc.create_refund(&payment.id, None, None).await.unwrap();
        assert_eq!(rest.refund.amount_cents, 300_000);
        assert_eq!(rest.payment.status, PaymentStatus::Refunded);
        assert_eq!(
            f.svc.get_order(&f.order.id).await.unwrap().status,
            OrderStatus::Refunded
        );
        assert!(f.svc.create_refund(&payment.id, None, None).await.is_err());

        let stats = f.svc.stats().await.unwrap();
        assert_eq!(stats.refunded_amount_cents, 500_000);
    }

    #[tokio::test]
    async fn unconfigured_gateway_rejects_empty_key_signatures() {
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(test_connection().await));
        let svc = PaymentService::new(repos, PaymentConfig::default());

        let mut params = BTreeMap::new();
        params.insert("vnp_TxnRef".to_string(), "anything".to_string());
        params.insert("vnp_ResponseCode".to_string(), "00".to_string());
        params.insert("vnp_Amount".to_string(), "100000".to_string());
        let hash = vnpay_signature("", &params);
        params.insert("vnp_SecureHash".to_string(), hash);
        let ack = svc.handle_vnpay(params).await.unwrap();
        assert_eq!(ack["RspCode"], "97");

        let mut payload = json!({"orderId": "ATL-1", "resultCode": 0});
        payload["signature"] = Value::String(momo_signature("", &payload));
        let ack = svc.handle_momo(payload).await.unwrap();
        assert_eq!(ack["resultCode"], 97);

        let data = json!({"orderCode": "ATL-1"});
        let ack = svc
            .handle_payos_webhook(json!({
                "code": "00",
                "data": data,
                "signature": payos_data_signature("", &data),
            }))
            .await
            .unwrap();
        assert_eq!(ack["error"], -1);
    }

    #[tokio::test]
    async fn late_success_cannot_reopen_a_refunded_order() {
        let f = fixture().await;
        let first = f
            .svc
            .create_intent(intent_req(&f.order.id, PaymentProvider::Cod, "cod-first-1"))
            .await
            .unwrap();
        let second = f
            .svc
            .create_intent(intent_req(&f.order.id, PaymentProvider::Payos, "payos-late-1"))
            .await
            .unwrap();

        let payment = f
            .svc
            .mark_paid(PaymentProvider::Cod, &first.intent.id, None)
            .await
            .unwrap();
        f.svc.create_refund(&payment.id, None, None).await.unwrap();
        assert_eq!(
            f.svc.get_order(&f.order.id).await.unwrap().status,
            OrderStatus::Refunded
        );

        let err = f
            .svc
            .mark_paid(PaymentProvider::Payos, &second.intent.id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let data = json!({"orderCode": f.order.order_no, "reference": "FT999"});
        let ack = f
            .svc
            .handle_payos_webhook(json!({
                "code": "00",
                "data": data,
                "signature": payos_data_signature("checksum", &data),
            }))
            .await
            .unwrap();
        assert_eq!(ack["message"], "ignored");

        assert_eq!(
            f.svc.get_order(&f.order.id).await.unwrap().status,
            OrderStatus::Refunded
        );
        let page = f.svc.list_payments(PaymentFilter::default()).await.unwrap();
        assert_eq!(page.total, 1);
        let intent = f
            .repos
            .payments()
            .find_intent(&second.intent.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(intent.status, IntentStatus::Pending);
    }

    #[test]
    fn methods_reflect_configuration() {
        let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(
            sea_orm::DatabaseConnection::Disconnected,
        ));
        let mut cfg = PaymentConfig::default();
        cfg.vnpay.tmn_code = "ATLTEST1".into();
        let svc = PaymentService::new(repos, cfg);
        let methods = svc.payment_methods();
        assert_eq!(methods.len(), 4);
        let vnpay = methods
            .iter()
            .find(|m| m.provider == PaymentProvider::Vnpay)
            .unwrap();
        assert!(!vnpay.enabled);
        assert_eq!(svc.gateway_status().get("COD"), Some(&true));
    }
}
