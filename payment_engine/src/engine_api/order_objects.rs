use mpg_common::{
    helpers::{lenient_i64, lenient_string, sanitize},
    GrossAmount,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    db_types::{
        CategoryBuyer,
        CustomerDetails,
        DestinationOrder,
        EventOrder,
        ItemDetails,
        OrderCategory,
        OrderId,
    },
    engine_api::errors::OrderFlowError,
    helpers::{is_valid_email, is_valid_order_id},
    traits::PaymentToken,
};

pub const DEFAULT_FIRST_NAME: &str = "Customer";

/// A request from the storefront to open a new payment. Everything in here is unvalidated user input; see
/// [`CreatePaymentRequest::validate`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePaymentRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub order_id: Option<String>,
    #[serde(default)]
    pub gross_amount: Option<Value>,
    #[serde(default)]
    pub customer_details: Option<CustomerDetailsInput>,
    #[serde(default)]
    pub item_details: Option<Vec<ItemInput>>,
    /// `event`, `destination`, or anything else for a general order.
    #[serde(default, deserialize_with = "lenient_string")]
    pub payment_type: Option<String>,
}

/// Customer details as the storefront sends them. The storefront also tucks the event or destination bookkeeping in
/// here, in camelCase.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerDetailsInput {
    #[serde(default, deserialize_with = "lenient_string")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(default, alias = "userId", deserialize_with = "lenient_string")]
    pub user_id: Option<String>,
    #[serde(default, alias = "eventId", deserialize_with = "lenient_string")]
    pub event_id: Option<String>,
    #[serde(default, alias = "eventName", deserialize_with = "lenient_string")]
    pub event_name: Option<String>,
    #[serde(default, alias = "eventData")]
    pub event_data: Option<Value>,
    #[serde(default, alias = "destinasiId", deserialize_with = "lenient_string")]
    pub destination_id: Option<String>,
    #[serde(default, alias = "destinasiName", deserialize_with = "lenient_string")]
    pub destination_name: Option<String>,
    #[serde(default, alias = "destinasiData")]
    pub destination_data: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemInput {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_i64")]
    pub price: i64,
    #[serde(deserialize_with = "lenient_i64")]
    pub quantity: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
}

/// A payment request that passed validation, with every string trimmed and every default filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPayment {
    pub order_id: OrderId,
    pub gross_amount: GrossAmount,
    pub customer: CustomerDetails,
    pub items: Vec<ItemDetails>,
    pub category: OrderCategory,
}

impl CreatePaymentRequest {
    pub fn validate(self) -> Result<ValidatedPayment, OrderFlowError> {
        let order_id = sanitize(self.order_id.as_deref());
        let gross_amount = self.gross_amount.filter(|v| !v.is_null());
        let (Some(order_id), Some(gross_amount), Some(customer), Some(items)) =
            (order_id, gross_amount, self.customer_details, self.item_details)
        else {
            return Err(OrderFlowError::Validation(
                "Missing required fields: order_id, gross_amount, customer_details, item_details".to_string(),
            ));
        };
        if !is_valid_order_id(&order_id) {
            return Err(OrderFlowError::Validation(
                "Invalid order_id format. Only alphanumeric characters, hyphens, underscores, and dots are allowed."
                    .to_string(),
            ));
        }
        let gross_amount = GrossAmount::try_from(&gross_amount).map_err(|_| {
            OrderFlowError::Validation("Invalid gross_amount. Must be a valid positive number.".to_string())
        })?;
        let email = sanitize(customer.email.as_deref());
        if email.as_deref().is_some_and(|e| !is_valid_email(e)) {
            return Err(OrderFlowError::Validation("Invalid customer email format".to_string()));
        }
        let first_name = sanitize(customer.first_name.as_deref());
        let details = CustomerDetails {
            first_name: first_name.clone().unwrap_or_else(|| DEFAULT_FIRST_NAME.to_string()),
            last_name: sanitize(customer.last_name.as_deref()).unwrap_or_default(),
            email: email.clone().unwrap_or_default(),
            phone: sanitize(customer.phone.as_deref()).unwrap_or_default(),
        };
        let items = items
            .into_iter()
            .map(|item| ItemDetails {
                id: sanitize(item.id.as_deref()).unwrap_or_default(),
                price: item.price,
                quantity: item.quantity,
                name: sanitize(item.name.as_deref()).unwrap_or_default(),
            })
            .collect::<Vec<_>>();
        let buyer = CategoryBuyer {
            user_email: email.unwrap_or_default(),
            user_name: first_name.unwrap_or_default(),
            quantity: items.first().map(|i| i.quantity).filter(|q| *q != 0).unwrap_or(1),
            total_amount: gross_amount,
            is_free: gross_amount.is_zero(),
        };
        let category = match self.payment_type.as_deref().map(str::trim) {
            Some("event") => OrderCategory::Event(EventOrder {
                user_id: customer.user_id,
                event_id: customer.event_id,
                event_name: customer.event_name,
                event_data: customer.event_data,
                buyer,
            }),
            Some("destination") => OrderCategory::Destination(DestinationOrder {
                user_id: customer.user_id,
                destination_id: customer.destination_id,
                destination_name: customer.destination_name,
                destination_data: customer.destination_data,
                buyer,
            }),
            _ => OrderCategory::General,
        };
        Ok(ValidatedPayment { order_id: OrderId(order_id), gross_amount, customer: details, items, category })
    }
}

/// The outcome of opening a payment.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentTokenResult {
    pub order_id: OrderId,
    pub gross_amount: GrossAmount,
    pub token: PaymentToken,
    /// Whether a new pending record was stored for the order.
    #[serde(skip)]
    pub record_seeded: bool,
}
