use std::{fmt::Debug, time::Duration};

use log::*;
use tokio::time::timeout;

use crate::{
    db_types::{NewOrderRecord, OrderDetails},
    engine_api::{
        errors::OrderFlowError,
        order_objects::{CreatePaymentRequest, PaymentTokenResult},
    },
    traits::{GatewayClient, GatewayError, InsertOrderResult, NewTransaction, OrderStore},
};

pub const DEFAULT_TOKEN_TIMEOUT: Duration = Duration::from_secs(20);

/// `OrderFlowApi` opens new payments with the gateway and seeds a pending order record for each of them, so that
/// later webhooks and polls have something to reconcile against.
pub struct OrderFlowApi<G, S> {
    gateway: G,
    store: Option<S>,
    call_timeout: Duration,
}

impl<G, S> Debug for OrderFlowApi<G, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi (store enabled: {})", self.store.is_some())
    }
}

impl<G, S> OrderFlowApi<G, S> {
    pub fn new(gateway: G, store: Option<S>) -> Self {
        Self { gateway, store, call_timeout: DEFAULT_TOKEN_TIMEOUT }
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }
}

impl<G, S> OrderFlowApi<G, S>
where
    G: GatewayClient,
    S: OrderStore,
{
    /// Validates the request, asks the gateway for a payment token and stores the new order as `pending`.
    ///
    /// Storing the order is best-effort. The buyer already has a valid token at that point, so a failing store is
    /// logged and the token is returned anyway. Re-using an order id leaves the existing record alone.
    pub async fn create_payment_token(
        &self,
        request: CreatePaymentRequest,
    ) -> Result<PaymentTokenResult, OrderFlowError> {
        let payment = request.validate()?;
        let transaction = NewTransaction {
            order_id: payment.order_id.clone(),
            gross_amount: payment.gross_amount,
            customer: payment.customer.clone(),
            items: payment.items.clone(),
        };
        let token = timeout(self.call_timeout, self.gateway.create_transaction(&transaction))
            .await
            .unwrap_or(Err(GatewayError::Timeout))
            .map_err(|e| {
                error!("📡️ Could not create a payment token for order {}. {e}", payment.order_id);
                e
            })?;
        info!("📡️ Payment token created for order {}", payment.order_id);
        let mut record_seeded = false;
        if let Some(store) = &self.store {
            let details = OrderDetails {
                customer: payment.customer,
                items: payment.items,
                category: payment.category,
                snap_token: Some(token.token.clone()),
            };
            let order = NewOrderRecord::new(payment.order_id.clone(), payment.gross_amount).with_details(details);
            match timeout(self.call_timeout, store.insert_order(order)).await {
                Ok(Ok(InsertOrderResult::Inserted(record))) => {
                    info!("🗃️ Payment record created for {} with status {}", record.order_id, record.status);
                    record_seeded = true;
                },
                Ok(Ok(InsertOrderResult::AlreadyExists(record))) => {
                    warn!("🗃️ Order {} already has a payment record. Leaving it as is.", record.order_id);
                },
                Ok(Err(e)) => error!("🗃️ Could not store the payment record for {}. {e}", payment.order_id),
                Err(_) => error!("🗃️ Timed out storing the payment record for {}", payment.order_id),
            }
        }
        Ok(PaymentTokenResult { order_id: payment.order_id, gross_amount: payment.gross_amount, token, record_seeded })
    }
}
