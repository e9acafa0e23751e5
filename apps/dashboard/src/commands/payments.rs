//! # Payment Commands
//!
//! The cashier's view: served checks waiting for payment, settlement and
//! refunds.
//!
//! Settling does not close the check. The order stays `served` with payment
//! `paid` until someone marks it `completed`, which hands the table to
//! cleaning.

use bistro_core::analytics;
use bistro_core::{Money, Order, PaymentMethod, PaymentReceipt, PaymentRequest, PaymentStatus, ValidationError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{DashboardConfig, DbState, SessionState};

/// A settled payment with display strings for the receipt printer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptResponse {
    pub receipt: PaymentReceipt,
    pub order: Order,
    pub charged_display: String,
    pub tip_display: String,
    pub change_display: String,
}

/// The cashier form as typed. Amounts are decimal strings (`"2.50"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentForm {
    pub method: PaymentMethod,
    #[serde(default)]
    pub tip: String,
    #[serde(default)]
    pub tendered: Option<String>,
}

impl PaymentForm {
    /// Converts the typed amounts to cents. A blank field counts as absent.
    pub fn parse(&self) -> Result<PaymentRequest, ValidationError> {
        let tip_cents = match self.tip.trim() {
            "" => 0,
            tip => Money::parse(tip)?.cents(),
        };
        let tendered_cents = match self.tendered.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(tendered) => Some(Money::parse(tendered)?.cents()),
        };

        Ok(PaymentRequest {
            method: self.method,
            tip_cents,
            tendered_cents,
        })
    }
}

/// Served orders with payment still pending, oldest first.
pub fn payment_queue(session: &SessionState) -> Vec<Order> {
    session.with_store(|s| {
        let mut queue: Vec<Order> = analytics::awaiting_payment(s.orders())
            .into_iter()
            .cloned()
            .collect();
        queue.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        queue
    })
}

/// Orders already paid, newest first.
pub fn payment_history(session: &SessionState) -> Vec<Order> {
    session.with_store(|s| {
        let mut paid: Vec<Order> = s
            .orders()
            .iter()
            .filter(|o| o.payment_status == PaymentStatus::Paid)
            .cloned()
            .collect();
        paid.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        paid
    })
}

pub async fn settle_payment(
    session: &SessionState,
    db: &DbState,
    config: &DashboardConfig,
    order_id: String,
    payment: PaymentRequest,
) -> Result<ReceiptResponse, ApiError> {
    debug!(order_id = %order_id, method = ?payment.method, "settle_payment command");

    let ((receipt, order), snapshot) = session.mutate(|s| {
        let receipt = s.settle_payment(&order_id, payment)?;
        let order = s.order(&order_id)?.clone();
        Ok((receipt, order))
    })?;
    db.mirror(&snapshot).await;

    if receipt.method == PaymentMethod::Cash && receipt.change_cents > 0 {
        info!(order_id = %order_id, change = receipt.change_cents, "Change due");
    }

    Ok(ReceiptResponse {
        charged_display: config.format_currency(receipt.charged_cents),
        tip_display: config.format_currency(receipt.tip_cents),
        change_display: config.format_currency(receipt.change_cents),
        receipt,
        order,
    })
}

/// Settles from the cashier form. Nothing is touched if an amount does
/// not parse.
pub async fn settle_payment_form(
    session: &SessionState,
    db: &DbState,
    config: &DashboardConfig,
    order_id: String,
    form: PaymentForm,
) -> Result<ReceiptResponse, ApiError> {
    let payment = form.parse()?;
    settle_payment(session, db, config, order_id, payment).await
}

pub async fn refund_payment(
    session: &SessionState,
    db: &DbState,
    order_id: String,
) -> Result<Order, ApiError> {
    debug!(order_id = %order_id, "refund_payment command");
    let (order, snapshot) = session.mutate(|s| s.refund_payment(&order_id))?;
    db.mirror(&snapshot).await;
    Ok(order)
}
