//! Payment slice: the method chosen at checkout.

use bazaar_core::PaymentMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentAction {
    AddPaymentMethod(PaymentMethod),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaymentState {
    pub payment_method: Option<PaymentMethod>,
}

impl PaymentState {
    pub fn reduce(&mut self, action: PaymentAction) {
        match action {
            PaymentAction::AddPaymentMethod(method) => self.payment_method = Some(method),
        }
    }
}
