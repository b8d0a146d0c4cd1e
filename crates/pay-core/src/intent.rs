//! # Payment Intent Flow
//!
//! Customer first, then the intent. The second call needs the customer id
//! from the first, so the two are always awaited in order.

use crate::error::PaymentResult;
use crate::payment::{NewCustomer, NewPaymentIntent, PaymentIntentCreated, PaymentRequest};
use crate::processor::PaymentProcessor;
use tracing::{info, instrument};

/// Create a customer and a payment intent for a validated request.
///
/// Any processor error is returned as-is; nothing is retried and the
/// customer is not cleaned up if the intent call fails.
#[instrument(
    skip(processor, request),
    fields(provider = processor.provider_name(), amount = request.amount, currency = %request.currency)
)]
pub async fn open_payment_intent(
    processor: &dyn PaymentProcessor,
    request: PaymentRequest,
) -> PaymentResult<PaymentIntentCreated> {
    let customer = processor
        .create_customer(&NewCustomer::for_email(&request.email))
        .await?;

    info!("Created customer: {}", customer.id);

    let params = NewPaymentIntent::for_customer(&request, &customer);
    let intent = processor.create_payment_intent(&params).await?;

    info!(
        "Created payment intent: id={}, customer={}, mode={:?}",
        intent.id, customer.id, params.payment_methods
    );

    Ok(PaymentIntentCreated::new(customer, intent))
}
