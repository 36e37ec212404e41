use mockall::mock;
use payment_engine::{
    db_types::{NewOrderRecord, OrderId, OrderRecord, StatusUpdate},
    traits::{
        GatewayClient,
        GatewayError,
        GatewayStatusReport,
        InsertOrderResult,
        NewTransaction,
        OrderStore,
        OrderStoreError,
        PaymentToken,
    },
};

mock! {
    pub Gateway {}
    impl GatewayClient for Gateway {
        async fn transaction_status(&self, order_id: &OrderId) -> Result<GatewayStatusReport, GatewayError>;
        async fn create_transaction(&self, transaction: &NewTransaction) -> Result<PaymentToken, GatewayError>;
    }
}

mock! {
    pub Store {}
    impl OrderStore for Store {
        async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<OrderRecord>, OrderStoreError>;
        async fn insert_order(&self, order: NewOrderRecord) -> Result<InsertOrderResult, OrderStoreError>;
        async fn update_status(
            &self,
            order_id: &OrderId,
            update: &StatusUpdate,
        ) -> Result<Option<OrderRecord>, OrderStoreError>;
    }
}
