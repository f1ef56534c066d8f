use crate::application::locks::KeyedLocks;
use crate::application::reconciler::PaymentReconciler;
use crate::domain::booking::BookingId;
use crate::domain::money::Amount;
use crate::domain::payment::{PaymentStatus, TransactionRef};
use crate::domain::ports::{
    BookingStoreArc, CheckoutRequest, PaymentGatewayArc, UserStoreArc,
};
use crate::domain::user::UserId;
use crate::error::{BookingError, Result};
use chrono::Utc;
use log::info;
use std::sync::Arc;

/// What the caller needs to continue a freshly initiated checkout.
#[derive(Debug, Clone)]
pub struct InitiatedPayment {
    pub checkout_url: String,
    pub transaction_ref: TransactionRef,
    pub status: PaymentStatus,
}

/// Front door for the payment flow: opens checkout sessions at the gateway
/// and answers verification requests through the reconciler.
///
/// Initiation for one booking is serialized on a per-booking lock so two
/// concurrent requests cannot interleave their gateway calls and row
/// inserts. The gateway is asked first and the `Pending` row is only
/// recorded once a checkout session exists; a declined or unreachable
/// gateway therefore leaves no payment row behind.
pub struct PaymentService {
    bookings: BookingStoreArc,
    users: UserStoreArc,
    gateway: PaymentGatewayArc,
    reconciler: Arc<PaymentReconciler>,
    booking_locks: KeyedLocks<BookingId>,
}

impl PaymentService {
    pub fn new(
        bookings: BookingStoreArc,
        users: UserStoreArc,
        gateway: PaymentGatewayArc,
        reconciler: Arc<PaymentReconciler>,
    ) -> Self {
        Self {
            bookings,
            users,
            gateway,
            reconciler,
            booking_locks: KeyedLocks::new(),
        }
    }

    /// Opens a checkout session for `booking_id` on behalf of `user`.
    pub async fn initiate(
        &self,
        user: UserId,
        booking_id: BookingId,
        amount: Amount,
    ) -> Result<InitiatedPayment> {
        let booking = self
            .bookings
            .get_for_user(booking_id, user)
            .await?
            .ok_or(BookingError::NotFound("booking"))?;

        let payer = self
            .users
            .get(user)
            .await?
            .ok_or(BookingError::NotFound("user"))?;

        let _guard = self.booking_locks.acquire(booking.id).await;

        let transaction_ref = TransactionRef::generate(booking.id, Utc::now());
        let session = self
            .gateway
            .initiate(CheckoutRequest {
                tx_ref: transaction_ref.clone(),
                amount,
                email: payer.email,
                first_name: payer.first_name,
                last_name: payer.last_name,
            })
            .await?;

        let payment = self
            .reconciler
            .record_initiated(booking.id, amount, transaction_ref)
            .await?;

        info!(
            "checkout opened for booking {} under {}",
            booking.id, payment.transaction_ref
        );

        Ok(InitiatedPayment {
            checkout_url: session.checkout_url,
            transaction_ref: payment.transaction_ref,
            status: payment.status,
        })
    }

    /// Looks up the payment behind `transaction_ref` and settles it against
    /// the gateway's verdict. See [`PaymentReconciler::reconcile`].
    pub async fn verify(
        &self,
        user: UserId,
        transaction_ref: &TransactionRef,
    ) -> Result<PaymentStatus> {
        self.reconciler.reconcile(user, transaction_ref).await
    }
}
