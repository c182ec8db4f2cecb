//! Orders and payments
//!
//! Checkout orders, provider payment intents, settled payments and refunds.

pub mod model;
pub mod repository;

pub use model::{
    IntentStatus, Order, OrderItem, OrderStatus, Payment, PaymentFilter, PaymentIntent,
    PaymentProvider, PaymentStats, PaymentStatus, ProviderStats, Refund, RefundStatus,
};
pub use repository::{OrderRepository, PaymentRepository};
