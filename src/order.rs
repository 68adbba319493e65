//! Order service — an example caller of the hook engine.
//!
//! `Before` hooks gate order creation; `After` hooks are best-effort
//! follow-ups (loyalty points, SMS) that run on the worker pool.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{info, warn};

use hookflow_core::AppResult;
use hookflow_core::config::{AppConfig, OrderConfig};
use hookflow_engine::{
    ExecutionContext, HookDescriptor, HookEngine, HookError, HookObserver, Phase,
};

/// An order submitted by a user.
#[derive(Debug, Clone)]
pub struct Order {
    /// Order identifier.
    pub id: String,
    /// Buyer.
    pub user_id: String,
    /// Amount in minor units.
    pub amount: i64,
}

impl Order {
    /// Creates an order.
    pub fn new(id: impl Into<String>, user_id: impl Into<String>, amount: i64) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            amount,
        }
    }
}

/// Payload shared by every hook of an order's phase runs.
#[derive(Debug)]
pub struct OrderContext {
    /// Order identifier.
    pub order_id: String,
    /// Buyer.
    pub user_id: String,
    /// Amount in minor units.
    pub amount: i64,
    /// When the context was built.
    pub created_at: DateTime<Utc>,
    /// Values hooks attach for later hooks or the caller.
    metadata: RwLock<HashMap<String, Value>>,
}

impl OrderContext {
    /// Builds the payload for an order.
    pub fn from_order(order: &Order) -> Self {
        Self {
            order_id: order.id.clone(),
            user_id: order.user_id.clone(),
            amount: order.amount,
            created_at: Utc::now(),
            metadata: RwLock::new(HashMap::new()),
        }
    }

    /// Stores a metadata value.
    pub async fn set_metadata(&self, key: &str, value: Value) {
        self.metadata.write().await.insert(key.to_string(), value);
    }

    /// Reads a metadata value.
    pub async fn metadata(&self, key: &str) -> Option<Value> {
        self.metadata.read().await.get(key).cloned()
    }
}

/// Creates orders, surrounded by `Before` and `After` hooks.
#[derive(Debug)]
pub struct OrderService {
    engine: Arc<HookEngine<OrderContext>>,
}

impl OrderService {
    /// Builds the service with an engine configured from `config`.
    pub async fn new(config: &AppConfig) -> Self {
        let engine = Arc::new(HookEngine::new(config.engine.clone()));
        Self::with_engine(engine, &config.order).await
    }

    /// Builds the service with a custom instrumentation sink.
    pub async fn with_observer(config: &AppConfig, observer: Arc<dyn HookObserver>) -> Self {
        let engine = Arc::new(HookEngine::with_observer(config.engine.clone(), observer));
        Self::with_engine(engine, &config.order).await
    }

    /// Registers the order hooks on an existing engine.
    pub async fn with_engine(engine: Arc<HookEngine<OrderContext>>, config: &OrderConfig) -> Self {
        let risk_limit = config.risk_limit;

        engine
            .register(
                Phase::Before,
                HookDescriptor::from_fn("RiskCheck", move |_, order: Arc<OrderContext>| async move {
                    if order.amount > risk_limit {
                        return Err(HookError::failed("risk rejected"));
                    }
                    order.set_metadata("risk_checked", Value::Bool(true)).await;
                    Ok(())
                })
                .with_priority(100)
                .must_succeed(true),
            )
            .await;

        engine
            .register(
                Phase::After,
                HookDescriptor::from_fn(
                    "SendSms",
                    |ctx: ExecutionContext, order: Arc<OrderContext>| async move {
                        if ctx.is_cancelled() {
                            return Err(HookError::Cancelled);
                        }
                        info!(order_id = %order.order_id, "send sms for order");
                        order.set_metadata("sms_sent", Value::Bool(true)).await;
                        Ok(())
                    },
                )
                .with_priority(10)
                .asynchronous(),
            )
            .await;

        engine
            .register(
                Phase::After,
                HookDescriptor::from_fn("AddPoints", |_, order: Arc<OrderContext>| async move {
                    info!(user_id = %order.user_id, "add points for user");
                    order
                        .set_metadata("points_added", Value::from(order.amount))
                        .await;
                    Ok(())
                })
                .with_priority(20)
                .asynchronous(),
            )
            .await;

        Self { engine }
    }

    /// Creates an order.
    ///
    /// Fails with a rejection when a `Before` gate refuses the order. `After`
    /// hooks never fail the call and may still be running when it returns.
    pub async fn create_order(
        &self,
        ctx: &ExecutionContext,
        order: &Order,
    ) -> AppResult<Arc<OrderContext>> {
        let payload = Arc::new(OrderContext::from_order(order));

        self.engine
            .execute(&Phase::Before, ctx, Arc::clone(&payload))
            .await?;

        info!(order_id = %order.id, "order saved");

        if let Err(e) = self
            .engine
            .execute(&Phase::After, ctx, Arc::clone(&payload))
            .await
        {
            warn!(order_id = %order.id, error = %e, "After-phase hooks failed");
        }

        Ok(payload)
    }

    /// Waits for outstanding `After` hooks. Returns `false` on timeout.
    pub async fn shutdown(&self) -> bool {
        self.engine.drain().await
    }

    /// Returns the underlying engine.
    pub fn engine(&self) -> &Arc<HookEngine<OrderContext>> {
        &self.engine
    }
}
