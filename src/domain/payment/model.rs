use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::shared::PaginationParams;

/// Defines a string-backed status enum with `as_str`, `Display`, and a
/// `FromStr` that reports unknown values as validation errors.
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident, $label:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| DomainError::Validation(format!("Unknown {}: {}", $label, s)))
            }
        }
    };
}

string_enum!(
    /// Payment gateway, or cash on delivery
    PaymentProvider, "payment provider" {
        Vnpay => "VNPAY",
        Momo => "MOMO",
        Payos => "PAYOS",
        Cod => "COD",
    }
);

impl PaymentProvider {
    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentProvider::Vnpay => "VNPAY",
            PaymentProvider::Momo => "Ví MoMo",
            PaymentProvider::Payos => "PayOS",
            PaymentProvider::Cod => "Thanh toán khi nhận hàng",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PaymentProvider::Vnpay => "Thanh toán qua cổng VNPAY (thẻ ATM, Visa, QR)",
            PaymentProvider::Momo => "Thanh toán bằng ví điện tử MoMo",
            PaymentProvider::Payos => "Chuyển khoản ngân hàng qua PayOS",
            PaymentProvider::Cod => "Thanh toán bằng tiền mặt khi nhận hàng",
        }
    }

    /// Whether checkout leaves the site for a gateway page
    pub fn is_online(&self) -> bool {
        !matches!(self, PaymentProvider::Cod)
    }
}

string_enum!(
    OrderStatus, "order status" {
        Pending => "PENDING",
        Paid => "PAID",
        Cancelled => "CANCELLED",
        Refunded => "REFUNDED",
    }
);

string_enum!(
    IntentStatus, "intent status" {
        Pending => "PENDING",
        Succeeded => "SUCCEEDED",
        Failed => "FAILED",
    }
);

string_enum!(
    PaymentStatus, "payment status" {
        Pending => "PENDING",
        Succeeded => "SUCCEEDED",
        Failed => "FAILED",
        Refunded => "REFUNDED",
    }
);

string_enum!(
    RefundStatus, "refund status" {
        Pending => "PENDING",
        Succeeded => "SUCCEEDED",
        Failed => "FAILED",
    }
);

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price_cents: i64,
}

impl OrderItem {
    pub fn line_total(&self) -> i64 {
        self.unit_price_cents * self.quantity as i64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: String,
    /// Human-facing number, also sent to gateways as their order reference
    pub order_no: String,
    pub user_id: Option<String>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub shipping_address: Option<String>,
    pub total_cents: i64,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// `ATL` + UTC timestamp + four random digits
    pub fn generate_order_no(now: DateTime<Utc>) -> String {
        use rand::Rng;
        let suffix: u16 = rand::thread_rng().gen_range(0..10_000);
        format!("ATL{}{:04}", now.format("%Y%m%d%H%M%S"), suffix)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentIntent {
    pub id: String,
    pub order_id: String,
    pub provider: PaymentProvider,
    pub amount_cents: i64,
    pub status: IntentStatus,
    pub return_url: Option<String>,
    pub idempotency_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub id: String,
    pub order_id: String,
    pub intent_id: String,
    pub provider: PaymentProvider,
    pub amount_cents: i64,
    pub refunded_cents: i64,
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    pub fn refundable_cents(&self) -> i64 {
        (self.amount_cents - self.refunded_cents).max(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Refund {
    pub id: String,
    pub payment_id: String,
    pub amount_cents: i64,
    pub reason: Option<String>,
    pub status: RefundStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct PaymentFilter {
    pub status: Option<PaymentStatus>,
    pub provider: Option<PaymentProvider>,
    pub pagination: PaginationParams,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderStats {
    pub provider: PaymentProvider,
    pub count: u64,
    pub amount_cents: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentStats {
    pub total_payments: u64,
    pub succeeded_payments: u64,
    pub refunded_payments: u64,
    pub total_amount_cents: i64,
    pub refunded_amount_cents: i64,
    pub by_provider: Vec<ProviderStats>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_parsing() {
        assert_eq!("vnpay".parse::<PaymentProvider>().unwrap(), PaymentProvider::Vnpay);
        assert_eq!("COD".parse::<PaymentProvider>().unwrap(), PaymentProvider::Cod);
        assert!(matches!(
            "PAYPAL".parse::<PaymentProvider>(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn provider_serializes_upper_case() {
        let json = serde_json::to_string(&PaymentProvider::Payos).unwrap();
        assert_eq!(json, "\"PAYOS\"");
    }

    #[test]
    fn order_no_has_prefix_and_fixed_width() {
        let no = Order::generate_order_no(Utc::now());
        assert!(no.starts_with("ATL"));
        assert_eq!(no.len(), 3 + 14 + 4);
    }

    #[test]
    fn refundable_never_negative() {
        let now = Utc::now();
        let p = Payment {
            id: "p".into(),
            order_id: "o".into(),
            intent_id: "i".into(),
            provider: PaymentProvider::Momo,
            amount_cents: 100_000,
            refunded_cents: 120_000,
            status: PaymentStatus::Succeeded,
            transaction_id: None,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(p.refundable_cents(), 0);
    }
}
