use async_trait::async_trait;

use super::model::{
    IntentStatus, Order, OrderStatus, Payment, PaymentFilter, PaymentIntent, PaymentProvider,
    PaymentStats, Refund,
};
use crate::domain::DomainResult;
use crate::shared::{PaginatedResult, PaginationParams};

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Inserts the order and its items together
    async fn create(&self, order: Order) -> DomainResult<Order>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Order>>;
    async fn find_by_order_no(&self, order_no: &str) -> DomainResult<Option<Order>>;
    async fn list(&self, pagination: PaginationParams) -> DomainResult<PaginatedResult<Order>>;
    async fn update_status(&self, id: &str, status: OrderStatus) -> DomainResult<()>;
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn create_intent(&self, intent: PaymentIntent) -> DomainResult<PaymentIntent>;
    async fn find_intent(&self, id: &str) -> DomainResult<Option<PaymentIntent>>;
    async fn find_intent_by_idempotency_key(&self, key: &str)
        -> DomainResult<Option<PaymentIntent>>;
    /// Newest intent of the order for the given provider
    async fn latest_intent_for_order(
        &self,
        order_id: &str,
        provider: PaymentProvider,
    ) -> DomainResult<Option<PaymentIntent>>;
    async fn update_intent_status(&self, id: &str, status: IntentStatus) -> DomainResult<()>;

    /// Store `payment`, mark its intent SUCCEEDED and its order PAID in one
    /// transaction.
    async fn record_success(&self, payment: Payment) -> DomainResult<Payment>;

    async fn find_payment(&self, id: &str) -> DomainResult<Option<Payment>>;
    async fn find_payment_by_intent(&self, intent_id: &str) -> DomainResult<Option<Payment>>;
    async fn list_payments(&self, filter: PaymentFilter) -> DomainResult<PaginatedResult<Payment>>;

    /// Store `refund` and bump the payment's refunded total in one
    /// transaction. When the payment becomes fully refunded, payment and
    /// order move to REFUNDED. Returns the updated payment.
    async fn record_refund(&self, refund: Refund) -> DomainResult<Payment>;
    async fn refunds_for(&self, payment_id: &str) -> DomainResult<Vec<Refund>>;

    async fn stats(&self) -> DomainResult<PaymentStats>;
}
