//! SeaORM implementation of PaymentRepository
//!
//! Settlement and refunds touch several tables and run inside a single
//! database transaction each.

use async_trait::async_trait;
use chrono::Utc;
use log::info;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::{db_err, parse_or, write_err};
use crate::domain::payment::{
    IntentStatus, OrderStatus, Payment, PaymentFilter, PaymentIntent, PaymentProvider,
    PaymentRepository, PaymentStats, PaymentStatus, ProviderStats, Refund, RefundStatus,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{order, payment, payment_intent, refund};
use crate::shared::PaginatedResult;

fn intent_to_domain(m: payment_intent::Model) -> PaymentIntent {
    PaymentIntent {
        id: m.id,
        order_id: m.order_id,
        provider: parse_or(&m.provider, PaymentProvider::Cod),
        amount_cents: m.amount_cents,
        status: parse_or(&m.status, IntentStatus::Pending),
        return_url: m.return_url,
        idempotency_key: m.idempotency_key,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn payment_to_domain(m: payment::Model) -> Payment {
    Payment {
        id: m.id,
        order_id: m.order_id,
        intent_id: m.intent_id,
        provider: parse_or(&m.provider, PaymentProvider::Cod),
        amount_cents: m.amount_cents,
        refunded_cents: m.refunded_cents,
        status: parse_or(&m.status, PaymentStatus::Pending),
        transaction_id: m.transaction_id,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn refund_to_domain(m: refund::Model) -> Refund {
    Refund {
        id: m.id,
        payment_id: m.payment_id,
        amount_cents: m.amount_cents,
        reason: m.reason,
        status: parse_or(&m.status, RefundStatus::Pending),
        created_at: m.created_at,
    }
}

pub struct SeaOrmPaymentRepository {
    db: DatabaseConnection,
}

impl SeaOrmPaymentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PaymentRepository for SeaOrmPaymentRepository {
    async fn create_intent(&self, i: PaymentIntent) -> DomainResult<PaymentIntent> {
        let result = payment_intent::ActiveModel {
            id: Set(i.id),
            order_id: Set(i.order_id),
            provider: Set(i.provider.as_str().to_string()),
            amount_cents: Set(i.amount_cents),
            status: Set(i.status.as_str().to_string()),
            return_url: Set(i.return_url),
            idempotency_key: Set(i.idempotency_key),
            created_at: Set(i.created_at),
            updated_at: Set(i.updated_at),
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_err(e, || "Idempotency key already used".to_string()))?;
        info!(
            "Payment intent created: {} [{}] {} VND for order {}",
            result.id, result.provider, result.amount_cents, result.order_id
        );
        Ok(intent_to_domain(result))
    }

    async fn find_intent(&self, id: &str) -> DomainResult<Option<PaymentIntent>> {
        let model = payment_intent::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(intent_to_domain))
    }

    async fn find_intent_by_idempotency_key(
        &self,
        key: &str,
    ) -> DomainResult<Option<PaymentIntent>> {
        let model = payment_intent::Entity::find()
            .filter(payment_intent::Column::IdempotencyKey.eq(key))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(intent_to_domain))
    }

    async fn latest_intent_for_order(
        &self,
        order_id: &str,
        provider: PaymentProvider,
    ) -> DomainResult<Option<PaymentIntent>> {
        let model = payment_intent::Entity::find()
            .filter(payment_intent::Column::OrderId.eq(order_id))
            .filter(payment_intent::Column::Provider.eq(provider.as_str()))
            .order_by_desc(payment_intent::Column::CreatedAt)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(intent_to_domain))
    }

    async fn update_intent_status(&self, id: &str, status: IntentStatus) -> DomainResult<()> {
        let result = payment_intent::Entity::update_many()
            .col_expr(payment_intent::Column::Status, Expr::value(status.as_str()))
            .col_expr(payment_intent::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(payment_intent::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("PaymentIntent", "id", id));
        }
        info!("Payment intent {} -> {}", id, status);
        Ok(())
    }

    async fn record_success(&self, p: Payment) -> DomainResult<Payment> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let now = Utc::now();

        // Only a PENDING order can settle; the dropped txn rolls back otherwise.
        let settled = order::Entity::update_many()
            .col_expr(order::Column::Status, Expr::value(OrderStatus::Paid.as_str()))
            .col_expr(order::Column::UpdatedAt, Expr::value(now))
            .filter(order::Column::Id.eq(p.order_id.as_str()))
            .filter(order::Column::Status.eq(OrderStatus::Pending.as_str()))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        if settled.rows_affected == 0 {
            return Err(DomainError::Conflict(format!(
                "Order {} is no longer pending",
                p.order_id
            )));
        }

        let saved = payment::ActiveModel {
            id: Set(p.id),
            order_id: Set(p.order_id.clone()),
            intent_id: Set(p.intent_id.clone()),
            provider: Set(p.provider.as_str().to_string()),
            amount_cents: Set(p.amount_cents),
            refunded_cents: Set(0),
            status: Set(PaymentStatus::Succeeded.as_str().to_string()),
            transaction_id: Set(p.transaction_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| write_err(e, || "Intent already settled".to_string()))?;

        payment_intent::Entity::update_many()
            .col_expr(
                payment_intent::Column::Status,
                Expr::value(IntentStatus::Succeeded.as_str()),
            )
            .col_expr(payment_intent::Column::UpdatedAt, Expr::value(now))
            .filter(payment_intent::Column::Id.eq(p.intent_id.as_str()))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        info!(
            "Payment recorded: {} [{}] {} VND, order {} paid",
            saved.id, saved.provider, saved.amount_cents, saved.order_id
        );
        Ok(payment_to_domain(saved))
    }

    async fn find_payment(&self, id: &str) -> DomainResult<Option<Payment>> {
        let model = payment::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(payment_to_domain))
    }

    async fn find_payment_by_intent(&self, intent_id: &str) -> DomainResult<Option<Payment>> {
        let model = payment::Entity::find()
            .filter(payment::Column::IntentId.eq(intent_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(payment_to_domain))
    }

    async fn list_payments(&self, filter: PaymentFilter) -> DomainResult<PaginatedResult<Payment>> {
        let mut query = payment::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(payment::Column::Status.eq(status.as_str()));
        }
        if let Some(provider) = filter.provider {
            query = query.filter(payment::Column::Provider.eq(provider.as_str()));
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let page = filter.pagination;
        let models = query
            .order_by_desc(payment::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(PaginatedResult::new(
            models.into_iter().map(payment_to_domain).collect(),
            total,
            page.page,
            page.limit,
        ))
    }

    async fn record_refund(&self, r: Refund) -> DomainResult<Payment> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let Some(current) = payment::Entity::find_by_id(r.payment_id.clone())
            .one(&txn)
            .await
            .map_err(db_err)?
        else {
            return Err(DomainError::not_found("Payment", "id", r.payment_id));
        };

        let refunded = current.refunded_cents + r.amount_cents;
        if refunded > current.amount_cents {
            return Err(DomainError::Validation(format!(
                "Refund of {} exceeds remaining {} VND",
                r.amount_cents,
                current.amount_cents - current.refunded_cents
            )));
        }
        let fully_refunded = refunded == current.amount_cents;
        let now = Utc::now();

        refund::ActiveModel {
            id: Set(r.id.clone()),
            payment_id: Set(r.payment_id.clone()),
            amount_cents: Set(r.amount_cents),
            reason: Set(r.reason),
            status: Set(r.status.as_str().to_string()),
            created_at: Set(r.created_at),
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        let order_id = current.order_id.clone();
        let mut active: payment::ActiveModel = current.into();
        active.refunded_cents = Set(refunded);
        active.updated_at = Set(now);
        if fully_refunded {
            active.status = Set(PaymentStatus::Refunded.as_str().to_string());
        }
        let updated = active.update(&txn).await.map_err(db_err)?;

        if fully_refunded {
            order::Entity::update_many()
                .col_expr(
                    order::Column::Status,
                    Expr::value(OrderStatus::Refunded.as_str()),
                )
                .col_expr(order::Column::UpdatedAt, Expr::value(now))
                .filter(order::Column::Id.eq(order_id.as_str()))
                .exec(&txn)
                .await
                .map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)?;
        info!(
            "Refund {} recorded on payment {}: {} VND (total refunded {})",
            r.id, updated.id, r.amount_cents, updated.refunded_cents
        );
        Ok(payment_to_domain(updated))
    }

    async fn refunds_for(&self, payment_id: &str) -> DomainResult<Vec<Refund>> {
        let models = refund::Entity::find()
            .filter(refund::Column::PaymentId.eq(payment_id))
            .order_by_asc(refund::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(refund_to_domain).collect())
    }

    async fn stats(&self) -> DomainResult<PaymentStats> {
        let payments: Vec<Payment> = payment::Entity::find()
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(payment_to_domain)
            .collect();

        let settled = |p: &&Payment| {
            matches!(p.status, PaymentStatus::Succeeded | PaymentStatus::Refunded)
        };

        let by_provider = PaymentProvider::ALL
            .iter()
            .map(|provider| {
                let mine: Vec<&Payment> = payments
                    .iter()
                    .filter(|p| p.provider == *provider)
                    .filter(settled)
                    .collect();
                ProviderStats {
                    provider: *provider,
                    count: mine.len() as u64,
                    amount_cents: mine.iter().map(|p| p.amount_cents).sum(),
                }
            })
            .collect();

        Ok(PaymentStats {
            total_payments: payments.len() as u64,
            succeeded_payments: payments
                .iter()
                .filter(|p| p.status == PaymentStatus::Succeeded)
                .count() as u64,
            refunded_payments: payments
                .iter()
                .filter(|p| p.status == PaymentStatus::Refunded)
                .count() as u64,
            total_amount_cents: payments.iter().filter(settled).map(|p| p.amount_cents).sum(),
            refunded_amount_cents: payments.iter().map(|p| p.refunded_cents).sum(),
            by_provider,
        })
    }
}
