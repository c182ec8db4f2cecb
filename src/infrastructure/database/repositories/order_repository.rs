//! SeaORM implementation of OrderRepository

use async_trait::async_trait;
use chrono::Utc;
use log::info;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::{db_err, parse_or, write_err};
use crate::domain::payment::{Order, OrderItem, OrderRepository, OrderStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{order, order_item};
use crate::shared::{PaginatedResult, PaginationParams};

fn item_to_domain(m: order_item::Model) -> OrderItem {
    OrderItem {
        id: m.id,
        order_id: m.order_id,
        product_id: m.product_id,
        product_name: m.product_name,
        quantity: m.quantity,
        unit_price_cents: m.unit_price_cents,
    }
}

fn order_to_domain(m: order::Model, items: Vec<order_item::Model>) -> Order {
    Order {
        id: m.id,
        order_no: m.order_no,
        user_id: m.user_id,
        customer_name: m.customer_name,
        customer_phone: m.customer_phone,
        customer_email: m.customer_email,
        shipping_address: m.shipping_address,
        total_cents: m.total_cents,
        status: parse_or(&m.status, OrderStatus::Pending),
        items: items.into_iter().map(item_to_domain).collect(),
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

pub struct SeaOrmOrderRepository {
    db: DatabaseConnection,
}

impl SeaOrmOrderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load_items(&self, order_id: &str) -> DomainResult<Vec<order_item::Model>> {
        order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(order_id))
            .all(&self.db)
            .await
            .map_err(db_err)
    }
}

#[async_trait]
impl OrderRepository for SeaOrmOrderRepository {
    async fn create(&self, o: Order) -> DomainResult<Order> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let order_no = o.order_no.clone();
        let saved = order::ActiveModel {
            id: Set(o.id.clone()),
            order_no: Set(o.order_no),
            user_id: Set(o.user_id),
            customer_name: Set(o.customer_name),
            customer_phone: Set(o.customer_phone),
            customer_email: Set(o.customer_email),
            shipping_address: Set(o.shipping_address),
            total_cents: Set(o.total_cents),
            status: Set(o.status.as_str().to_string()),
            created_at: Set(o.created_at),
            updated_at: Set(o.updated_at),
        }
        .insert(&txn)
        .await
        .map_err(|e| write_err(e, || format!("Order number {} already exists", order_no)))?;

        let mut items = Vec::with_capacity(o.items.len());
        for item in o.items {
            let model = order_item::ActiveModel {
                id: Set(item.id),
                order_id: Set(saved.id.clone()),
                product_id: Set(item.product_id),
                product_name: Set(item.product_name),
                quantity: Set(item.quantity),
                unit_price_cents: Set(item.unit_price_cents),
            }
            .insert(&txn)
            .await
            .map_err(db_err)?;
            items.push(model);
        }

        txn.commit().await.map_err(db_err)?;
        info!(
            "Order created: {} ({} items, {} VND)",
            saved.order_no,
            items.len(),
            saved.total_cents
        );
        Ok(order_to_domain(saved, items))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Order>> {
        let model = order::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        match model {
            Some(m) => {
                let items = self.load_items(&m.id).await?;
                Ok(Some(order_to_domain(m, items)))
            }
            None => Ok(None),
        }
    }

    async fn find_by_order_no(&self, order_no: &str) -> DomainResult<Option<Order>> {
        let model = order::Entity::find()
            .filter(order::Column::OrderNo.eq(order_no))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        match model {
            Some(m) => {
                let items = self.load_items(&m.id).await?;
                Ok(Some(order_to_domain(m, items)))
            }
            None => Ok(None),
        }
    }

    async fn list(&self, pagination: PaginationParams) -> DomainResult<PaginatedResult<Order>> {
        let total = order::Entity::find()
            .count(&self.db)
            .await
            .map_err(db_err)?;

        let orders = order::Entity::find()
            .order_by_desc(order::Column::CreatedAt)
            .offset(pagination.offset())
            .limit(pagination.limit as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let ids: Vec<String> = orders.iter().map(|o| o.id.clone()).collect();
        let mut all_items = order_item::Entity::find()
            .filter(order_item::Column::OrderId.is_in(ids))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let items = orders
            .into_iter()
            .map(|o| {
                let (mine, rest): (Vec<_>, Vec<_>) =
                    all_items.drain(..).partition(|i| i.order_id == o.id);
                all_items = rest;
                order_to_domain(o, mine)
            })
            .collect();
        Ok(PaginatedResult::new(
            items,
            total,
            pagination.page,
            pagination.limit,
        ))
    }

    async fn update_status(&self, id: &str, status: OrderStatus) -> DomainResult<()> {
        let result = order::Entity::update_many()
            .col_expr(order::Column::Status, Expr::value(status.as_str()))
            .col_expr(order::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(order::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Order", "id", id));
        }
        info!("Order {} -> {}", id, status);
        Ok(())
    }
}
