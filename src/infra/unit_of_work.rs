//! Unit of Work pattern implementation.
//!
//! SOLID (SRP): Manages transaction lifecycle and repository access.
//! DDD: Coordinates operations across multiple aggregates atomically.
//!
//! The Unit of Work pattern:
//! - Centralizes access to all repositories
//! - Manages database transactions (begin, commit, rollback)
//! - Ensures consistency across multiple repository operations
//! - Provides atomic operations for complex business workflows

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use std::sync::Arc;

use super::repositories::{
    ContactRepository, ContactStore, OrderRepository, OrderStore, ProductRepository, ProductStore,
    UserRepository, UserStore, WishlistRepository, WishlistStore,
};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Provides centralized access to all repositories and transaction management.
/// Note: This trait is not mockable directly due to generic methods.
/// For testing, mock at the service level or use integration tests.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get product repository
    fn products(&self) -> Arc<dyn ProductRepository>;

    /// Get order repository
    fn orders(&self) -> Arc<dyn OrderRepository>;

    /// Get wishlist repository
    fn wishlists(&self) -> Arc<dyn WishlistRepository>;

    /// Get contact message repository
    fn contacts(&self) -> Arc<dyn ContactRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is automatically committed on success or rolled back on error.
    /// Uses ReadCommitted isolation level by default for balanced consistency/performance.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;

    /// Execute a closure within a transaction with serializable isolation.
    ///
    /// Use this for operations requiring the strongest consistency guarantees.
    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
///
/// All repository operations performed through this context are part
/// of the same database transaction. The context borrows the transaction
/// to ensure proper lifetime management.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    /// Create a new transaction context
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Get order repository for this transaction
    pub fn orders(&self) -> TxOrderRepository<'_> {
        TxOrderRepository::new(self.txn)
    }

    /// Get product repository for this transaction
    pub fn products(&self) -> TxProductRepository<'_> {
        TxProductRepository::new(self.txn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    product_repo: Arc<ProductStore>,
    order_repo: Arc<OrderStore>,
    wishlist_repo: Arc<WishlistStore>,
    contact_repo: Arc<ContactStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        let user_repo = Arc::new(UserStore::new(db.clone()));
        let product_repo = Arc::new(ProductStore::new(db.clone()));
        let order_repo = Arc::new(OrderStore::new(db.clone()));
        let wishlist_repo = Arc::new(WishlistStore::new(db.clone()));
        let contact_repo = Arc::new(ContactStore::new(db.clone()));
        Self {
            db,
            user_repo,
            product_repo,
            order_repo,
            wishlist_repo,
            contact_repo,
        }
    }

    /// Internal transaction execution with configurable isolation level
    async fn execute_transaction<F, T>(&self, isolation: IsolationLevel, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        // Begin transaction
        let txn = self
            .db
            .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;

        // Create context with borrowed transaction
        let ctx = TransactionContext::new(&txn);

        // Execute the closure
        match f(ctx).await {
            Ok(result) => {
                // Commit on success - txn is owned, so this always works
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                // Rollback on error
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.product_repo.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.order_repo.clone()
    }

    fn wishlists(&self) -> Arc<dyn WishlistRepository> {
        self.wishlist_repo.clone()
    }

    fn contacts(&self) -> Arc<dyn ContactRepository> {
        self.contact_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        // Use ReadCommitted for balanced consistency/performance
        self.execute_transaction(IsolationLevel::ReadCommitted, f).await
    }

    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::Serializable, f).await
    }
}

/// Transaction-aware order repository.
///
/// Owns the write side of the order aggregate: creation of the order with
/// its items and address, and saves of lifecycle state. Reads taken through
/// `find_for_update` hold a row lock until the transaction ends, so
/// concurrent mutations of the same order serialize instead of racing.
pub struct TxOrderRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxOrderRepository<'a> {
    /// Create new transaction-aware repository
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Insert an order together with its line items and shipping address.
    ///
    /// Item snapshots are resolved by the caller before this runs; the rows
    /// land in one transaction so a failed line never leaves a partial order.
    pub async fn create(
        &self,
        customer: Option<crate::domain::OrderCustomer>,
        data: &crate::domain::CreateOrder,
        lines: Vec<crate::domain::NewOrderItem>,
    ) -> AppResult<crate::domain::Order> {
        use super::repositories::assemble_order;
        use super::repositories::entities::{order, order_item, shipping_address};
        use crate::domain::OrderStatus;
        use sea_orm::{ActiveModelTrait, Set};

        let now = chrono::Utc::now();
        let order_model = order::ActiveModel {
            user_id: Set(customer.as_ref().map(|c| c.id)),
            payment_method: Set(data.payment_method.clone()),
            tax_price: Set(data.tax_price),
            shipping_price: Set(data.shipping_price),
            total_price: Set(data.total_price),
            is_paid: Set(false),
            paid_at: Set(None),
            payment_result: Set(None),
            is_delivered: Set(false),
            delivered_at: Set(None),
            is_refunded: Set(false),
            transfer_confirmed: Set(false),
            transfer_confirmed_at: Set(None),
            status: Set(OrderStatus::Pending.as_str().to_string()),
            tracking_number: Set(None),
            estimated_delivery: Set(None),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(self.txn)
        .await
        .map_err(AppError::from)?;

        let mut item_models = Vec::with_capacity(lines.len());
        for line in lines {
            let item = order_item::ActiveModel {
                order_id: Set(order_model.id),
                product_id: Set(Some(line.product_id)),
                name: Set(line.name),
                qty: Set(line.qty),
                price: Set(line.price),
                image: Set(line.image),
                ..Default::default()
            }
            .insert(self.txn)
            .await
            .map_err(AppError::from)?;
            item_models.push(item);
        }

        let address = &data.shipping_address;
        let address_model = shipping_address::ActiveModel {
            order_id: Set(order_model.id),
            address: Set(address.address.clone()),
            city: Set(address.city.clone()),
            postal_code: Set(address.postal_code.clone()),
            country: Set(address.country.clone()),
            shipping_price: Set(data.shipping_price),
            ..Default::default()
        }
        .insert(self.txn)
        .await
        .map_err(AppError::from)?;

        let mut order = assemble_order(order_model, None, item_models, Some(address_model));
        order.customer = customer;
        Ok(order)
    }

    /// Load a fully hydrated order and lock its row for the transaction.
    pub async fn find_for_update(&self, id: i64) -> AppResult<Option<crate::domain::Order>> {
        use super::repositories::entities::{order, user};
        use super::repositories::hydrate_order;
        use sea_orm::{EntityTrait, QuerySelect};

        let model = match order::Entity::find_by_id(id)
            .lock_exclusive()
            .one(self.txn)
            .await
            .map_err(AppError::from)?
        {
            Some(model) => model,
            None => return Ok(None),
        };

        let customer = match model.user_id {
            Some(user_id) => user::Entity::find_by_id(user_id)
                .one(self.txn)
                .await
                .map_err(AppError::from)?,
            None => None,
        };

        let order = hydrate_order(self.txn, model, customer).await?;
        Ok(Some(order))
    }

    /// Write the order's lifecycle state back to its row.
    ///
    /// Items, address, prices, and ownership are immutable after creation
    /// and are deliberately not written here.
    pub async fn save(&self, order: &crate::domain::Order) -> AppResult<()> {
        use super::repositories::entities::order::{ActiveModel, Entity as OrderEntity};
        use sea_orm::{ActiveModelTrait, EntityTrait, Set};

        let model = OrderEntity::find_by_id(order.id)
            .one(self.txn)
            .await
            .map_err(AppError::from)?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = model.into();
        active.is_paid = Set(order.is_paid);
        active.paid_at = Set(order.paid_at);
        active.payment_result = Set(order.payment_result.clone());
        active.is_delivered = Set(order.is_delivered);
        active.delivered_at = Set(order.delivered_at);
        active.is_refunded = Set(order.is_refunded);
        active.transfer_confirmed = Set(order.transfer_confirmed);
        active.transfer_confirmed_at = Set(order.transfer_confirmed_at);
        active.status = Set(order.status.as_str().to_string());
        active.tracking_number = Set(order.tracking_number.clone());
        active.estimated_delivery = Set(order.estimated_delivery);

        active.update(self.txn).await.map_err(AppError::from)?;
        Ok(())
    }
}

/// Transaction-aware product repository.
///
/// Used during order placement to resolve each line's product while the
/// surrounding transaction is open.
pub struct TxProductRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxProductRepository<'a> {
    /// Create new transaction-aware repository
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Find product by ID
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<crate::domain::Product>> {
        use super::repositories::entities::product::Entity as ProductEntity;
        use sea_orm::EntityTrait;

        let result = ProductEntity::find_by_id(id)
            .one(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(crate::domain::Product::from))
    }
}

/// Simpler API for executing transactional operations.
///
/// This helper macro reduces boilerplate when using transactions.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
