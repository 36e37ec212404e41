//! Adapts the Midtrans REST client to the engine's [`GatewayClient`] contract.
use log::*;
use midtrans_tools::{
    CreditCardOptions,
    MidtransApi,
    MidtransApiError,
    SnapCustomerDetails,
    SnapItemDetails,
    SnapTransactionRequest,
    TransactionDetails,
    TransactionStatus,
};
use payment_engine::{
    db_types::OrderId,
    traits::{GatewayClient, GatewayError, GatewayStatusReport, NewTransaction, PaymentToken},
};

#[derive(Clone)]
pub struct MidtransGateway {
    api: MidtransApi,
}

impl MidtransGateway {
    pub fn new(api: MidtransApi) -> Self {
        Self { api }
    }
}

impl GatewayClient for MidtransGateway {
    async fn transaction_status(&self, order_id: &OrderId) -> Result<GatewayStatusReport, GatewayError> {
        let status = self.api.get_transaction_status(order_id.as_str()).await.map_err(gateway_error)?;
        let report = status_report(order_id, status)?;
        debug!("📡️ Midtrans status for {order_id}: {}", report.transaction_status);
        Ok(report)
    }

    async fn create_transaction(&self, transaction: &NewTransaction) -> Result<PaymentToken, GatewayError> {
        let request = snap_request(transaction);
        let snap = self.api.create_snap_transaction(&request).await.map_err(gateway_error)?;
        if snap.token.is_empty() {
            return Err(GatewayError::InvalidResponse("Snap returned an empty token".to_string()));
        }
        Ok(PaymentToken { token: snap.token, redirect_url: snap.redirect_url })
    }
}

fn gateway_error(e: MidtransApiError) -> GatewayError {
    match e {
        MidtransApiError::Timeout(_) => GatewayError::Timeout,
        MidtransApiError::QueryError { status, message } => GatewayError::Rejected { status, message },
        MidtransApiError::JsonError(s) => GatewayError::InvalidResponse(s),
        e => GatewayError::Unreachable(e.to_string()),
    }
}

fn status_report(order_id: &OrderId, status: TransactionStatus) -> Result<GatewayStatusReport, GatewayError> {
    let transaction_status = status
        .transaction_status
        .ok_or_else(|| GatewayError::InvalidResponse("No transaction status in response".to_string()))?;
    Ok(GatewayStatusReport {
        order_id: status.order_id.map(OrderId::from).unwrap_or_else(|| order_id.clone()),
        transaction_status,
        fraud_status: status.fraud_status,
        payment_type: status.payment_type,
        gross_amount: status.gross_amount,
        transaction_time: status.transaction_time,
    })
}

fn snap_request(transaction: &NewTransaction) -> SnapTransactionRequest {
    let customer = &transaction.customer;
    SnapTransactionRequest {
        transaction_details: TransactionDetails {
            order_id: transaction.order_id.as_str().to_string(),
            gross_amount: transaction.gross_amount.value(),
        },
        customer_details: SnapCustomerDetails {
            first_name: customer.first_name.clone(),
            last_name: customer.last_name.clone(),
            email: customer.email.clone(),
            phone: customer.phone.clone(),
        },
        item_details: transaction
            .items
            .iter()
            .map(|i| SnapItemDetails { id: i.id.clone(), price: i.price, quantity: i.quantity, name: i.name.clone() })
            .collect(),
        credit_card: CreditCardOptions::default(),
    }
}
