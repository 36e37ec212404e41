use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use crate::{
    db_types::OrderId,
    traits::{GatewayClient, GatewayError, GatewayStatusReport, NewTransaction, PaymentToken},
};

/// A scriptable stand-in for the payment gateway.
///
/// Orders that were never given a status are reported the way Midtrans reports them: as a 404.
#[derive(Debug, Clone, Default)]
pub struct FakeGateway {
    statuses: Arc<Mutex<HashMap<OrderId, String>>>,
    unreachable: bool,
    delay: Option<Duration>,
}

impl FakeGateway {
    pub fn unreachable() -> Self {
        Self { unreachable: true, ..Default::default() }
    }

    pub fn with_status(self, order_id: &str, transaction_status: &str) -> Self {
        self.set_status(order_id, transaction_status);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_status(&self, order_id: &str, transaction_status: &str) {
        let mut statuses = self.statuses.lock().unwrap_or_else(PoisonError::into_inner);
        statuses.insert(OrderId::from(order_id), transaction_status.to_string());
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl GatewayClient for FakeGateway {
    async fn transaction_status(&self, order_id: &OrderId) -> Result<GatewayStatusReport, GatewayError> {
        self.pause().await;
        if self.unreachable {
            return Err(GatewayError::Unreachable("connection refused".to_string()));
        }
        let status = self.statuses.lock().unwrap_or_else(PoisonError::into_inner).get(order_id).cloned();
        match status {
            Some(status) => {
                let mut report = GatewayStatusReport::new(order_id.clone(), status);
                report.payment_type = Some("bank_transfer".to_string());
                report.fraud_status = Some("accept".to_string());
                Ok(report)
            },
            None => Err(GatewayError::Rejected { status: 404, message: "Transaction doesn't exist.".to_string() }),
        }
    }

    async fn create_transaction(&self, transaction: &NewTransaction) -> Result<PaymentToken, GatewayError> {
        self.pause().await;
        if self.unreachable {
            return Err(GatewayError::Unreachable("connection refused".to_string()));
        }
        let token = format!("snap-{}", transaction.order_id.as_str());
        let redirect_url = format!("https://app.sandbox.midtrans.com/snap/v4/redirection/{token}");
        Ok(PaymentToken { token, redirect_url })
    }
}
