use std::{fmt::Debug, future::Future, time::Duration};

use chrono::Utc;
use log::*;
use mpg_common::Secret;
use tokio::time::timeout;

use crate::{
    db_types::{OrderId, OrderRecord, StatusUpdate},
    engine_api::{
        errors::ReconciliationError,
        order_locks::OrderLocks,
        status_objects::{PaymentStatusReport, StatusSources, WebhookAck, WebhookPayload},
    },
    helpers::{is_valid_order_id, verify_webhook_signature},
    traits::{GatewayClient, GatewayError, GatewayStatusReport, OrderStore, OrderStoreError},
};

pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(15);

/// `PaymentStatusApi` keeps the local order records consistent with the payment gateway.
///
/// Two channels feed it:
/// * webhook notifications pushed by the gateway ([`Self::process_webhook`]), which are only trusted once their
///   signature checks out, and
/// * status polls made on behalf of a client ([`Self::poll_status`]), which ask the gateway directly and fall back on
///   the stored record when the gateway is unavailable.
///
/// Persistence is optional. Without a store, webhooks are acknowledged without side effects and polls rely on the
/// gateway alone.
///
/// Work on a single order id is serialized, so a webhook and a poll for the same order never interleave their
/// read-normalize-write steps. Every call to the gateway or the store is bounded by the call timeout.
pub struct PaymentStatusApi<G, S> {
    gateway: G,
    store: Option<S>,
    server_key: Secret<String>,
    locks: OrderLocks,
    call_timeout: Duration,
}

impl<G, S> Debug for PaymentStatusApi<G, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PaymentStatusApi (store enabled: {})", self.store.is_some())
    }
}

impl<G, S> PaymentStatusApi<G, S> {
    pub fn new(gateway: G, store: Option<S>, server_key: Secret<String>) -> Self {
        Self { gateway, store, server_key, locks: OrderLocks::new(), call_timeout: DEFAULT_CALL_TIMEOUT }
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn store_enabled(&self) -> bool {
        self.store.is_some()
    }

    pub fn store(&self) -> Option<&S> {
        self.store.as_ref()
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn locks(&self) -> &OrderLocks {
        &self.locks
    }
}

impl<G, S> PaymentStatusApi<G, S>
where
    G: GatewayClient,
    S: OrderStore,
{
    /// Handles a notification pushed by the gateway.
    ///
    /// The payload must carry `order_id`, `status_code`, `gross_amount`, `signature_key` and `transaction_status`,
    /// and the signature must match. Only then is the stored record (if any) brought in line with the notified
    /// status. Notifications for unknown orders are acknowledged but never create a record, and a failing store is
    /// logged rather than reported: the gateway only needs to know that the notification was authentic.
    pub async fn process_webhook(&self, payload: &WebhookPayload) -> Result<WebhookAck, ReconciliationError> {
        let fields = payload.required_fields()?;
        if !verify_webhook_signature(
            fields.order_id,
            fields.status_code,
            fields.gross_amount,
            fields.signature_key,
            self.server_key.reveal(),
        ) {
            warn!("🔔️ Invalid signature on webhook for order {}. Ignoring it.", fields.order_id);
            return Err(ReconciliationError::Authentication);
        }
        let order_id = OrderId::from(fields.order_id);
        let update = StatusUpdate::from_transaction_status(fields.transaction_status);
        info!("🔔️ Webhook received for {order_id}: {} -> {}", fields.transaction_status, update.status());
        let record_updated = match &self.store {
            Some(store) => {
                let _guard = self.locks.lock(&order_id).await;
                match self.write_status(store, &order_id, &update).await {
                    Ok(Some(record)) => {
                        info!("🔔️ Webhook updated {order_id}: {}, paid: {}", record.status, record.is_paid);
                        true
                    },
                    Ok(None) => {
                        warn!("🔔️ No payment record found for {order_id}. Nothing to update.");
                        false
                    },
                    Err(e) => {
                        error!("🔔️ Could not save webhook status for {order_id}. {e}");
                        false
                    },
                }
            },
            None => {
                debug!("🔔️ Persistence is disabled. Webhook for {order_id} has no side effects.");
                false
            },
        };
        Ok(WebhookAck { order_id, status: update.status(), record_updated })
    }

    /// Works out the current payment status of an order.
    ///
    /// The gateway is authoritative. When it answers, its status is reported and written back to the stored record,
    /// if there is one. When it does not, the stored status is reported as is. Failures of either source are
    /// tolerated and collected in the report; the order is only "not found" when neither source knows about it.
    pub async fn poll_status(&self, order_id: &str) -> Result<PaymentStatusReport, ReconciliationError> {
        if !is_valid_order_id(order_id) {
            return Err(ReconciliationError::Validation("Invalid order ID format".to_string()));
        }
        let order_id = OrderId::from(order_id);
        debug!("🔍️ Checking payment status for order {order_id}");
        let _guard = self.locks.lock(&order_id).await;
        let mut upstream_errors = Vec::new();
        let mut gateway_failure = None;

        let gateway_report = match self.query_gateway(&order_id).await {
            Ok(report) => {
                debug!("📡️ Gateway status for {order_id}: {}", report.transaction_status);
                Some(report)
            },
            Err(e) => {
                warn!("📡️ Could not fetch gateway status for {order_id}. {e}");
                upstream_errors.push(ReconciliationError::Upstream(e.to_string()));
                gateway_failure = Some(e);
                None
            },
        };

        let record = match &self.store {
            Some(store) => match self.fetch_record(store, &order_id).await {
                Ok(record) => record,
                Err(e) => {
                    error!("🗃️ Could not read the stored record for {order_id}. {e}");
                    upstream_errors.push(ReconciliationError::Upstream(e.to_string()));
                    None
                },
            },
            None => None,
        };

        let mut sources =
            StatusSources { store: record.is_some(), gateway: gateway_report.is_some(), ..Default::default() };

        let (tuple, transaction_status) = match (&gateway_report, &record) {
            (Some(report), record) => {
                let update = StatusUpdate::from_transaction_status(&report.transaction_status);
                if let (Some(store), Some(_)) = (&self.store, record) {
                    sources.store_update_success = match self.write_status(store, &order_id, &update).await {
                        Ok(Some(updated)) => {
                            let (status, paid) = (updated.status, updated.is_paid);
                            info!("🗃️ Stored status for {order_id} is now {status}, paid: {paid}");
                            true
                        },
                        Ok(None) => false,
                        Err(e) => {
                            warn!("🗃️ Could not write the gateway status back for {order_id}. {e}");
                            false
                        },
                    };
                }
                (update.tuple(), report.transaction_status.clone())
            },
            (None, Some(record)) => {
                debug!("🔍️ Falling back on the stored status for {order_id}: {}", record.status);
                (record.status_tuple(), record.transaction_status.clone())
            },
            (None, None) => {
                info!("🔍️ Payment for {order_id} was not found");
                return Err(ReconciliationError::NotFound {
                    order_id: order_id.0,
                    gateway_error: gateway_failure.as_ref().map(GatewayError::to_string),
                    gateway_summary: gateway_failure.as_ref().map(GatewayError::summary),
                });
            },
        };

        Ok(PaymentStatusReport {
            order_id,
            tuple,
            transaction_status,
            sources,
            gateway_report,
            upstream_errors,
            checked_at: Utc::now(),
        })
    }

    async fn query_gateway(&self, order_id: &OrderId) -> Result<GatewayStatusReport, GatewayError> {
        let report = bounded(self.call_timeout, self.gateway.transaction_status(order_id))
            .await
            .unwrap_or(Err(GatewayError::Timeout))?;
        if report.transaction_status.trim().is_empty() {
            return Err(GatewayError::InvalidResponse("The transaction status is empty".to_string()));
        }
        Ok(report)
    }

    async fn fetch_record(&self, store: &S, order_id: &OrderId) -> Result<Option<OrderRecord>, OrderStoreError> {
        bounded(self.call_timeout, store.fetch_order(order_id)).await.unwrap_or(Err(OrderStoreError::Timeout))
    }

    async fn write_status(
        &self,
        store: &S,
        order_id: &OrderId,
        update: &StatusUpdate,
    ) -> Result<Option<OrderRecord>, OrderStoreError> {
        bounded(self.call_timeout, store.update_status(order_id, update))
            .await
            .unwrap_or(Err(OrderStoreError::Timeout))
    }
}

/// Runs `fut` to completion, or gives up after `limit`.
async fn bounded<F: Future>(limit: Duration, fut: F) -> Option<F::Output> {
    timeout(limit, fut).await.ok()
}
