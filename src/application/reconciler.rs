use crate::application::locks::KeyedLocks;
use crate::domain::booking::BookingId;
use crate::domain::money::Amount;
use crate::domain::payment::{NewPayment, Payment, PaymentId, PaymentStatus, TransactionRef};
use crate::domain::ports::{
    BookingStoreArc, PaymentGatewayArc, PaymentStoreArc, PaymentVerdict,
};
use crate::domain::user::UserId;
use crate::error::{BookingError, Result};
use log::{info, warn};

/// Settles pending payments against the gateway's answer.
///
/// A payment row starts `Pending` when checkout is initiated. Reconciling it
/// asks the gateway for a verdict and moves the row to `Completed` or
/// `Failed` exactly once; rows already in a terminal state are returned as-is
/// without another gateway round trip. A gateway that cannot answer leaves
/// the row `Pending` so the caller can retry later.
///
/// Reconciles of one payment are serialized on a per-payment lock held
/// across the read-verify-write span, so only the first caller reaches the
/// gateway; the rest observe the settled row. Terminal rows therefore never
/// regress, and the stores refuse such an overwrite independently.
pub struct PaymentReconciler {
    payments: PaymentStoreArc,
    bookings: BookingStoreArc,
    gateway: PaymentGatewayArc,
    payment_locks: KeyedLocks<PaymentId>,
}

impl PaymentReconciler {
    pub fn new(
        payments: PaymentStoreArc,
        bookings: BookingStoreArc,
        gateway: PaymentGatewayArc,
    ) -> Self {
        Self {
            payments,
            bookings,
            gateway,
            payment_locks: KeyedLocks::new(),
        }
    }

    /// Records a freshly initiated checkout as a `Pending` payment row.
    pub async fn record_initiated(
        &self,
        booking_id: BookingId,
        amount: Amount,
        transaction_ref: TransactionRef,
    ) -> Result<Payment> {
        self.payments
            .insert(NewPayment {
                booking_id,
                amount,
                transaction_ref,
                status: PaymentStatus::Pending,
            })
            .await
    }

    /// Resolves the payment behind `transaction_ref` for `user` and returns
    /// its (possibly updated) status.
    ///
    /// References that do not exist, or whose booking belongs to someone
    /// else, both surface as not-found. Only a definite gateway verdict
    /// moves the row; transport or protocol trouble is reported to the
    /// caller with the row left `Pending`.
    pub async fn reconcile(
        &self,
        user: UserId,
        transaction_ref: &TransactionRef,
    ) -> Result<PaymentStatus> {
        let found = self
            .payments
            .find_by_reference(transaction_ref)
            .await?
            .ok_or(BookingError::NotFound("payment"))?;

        self.bookings
            .get_for_user(found.booking_id, user)
            .await?
            .ok_or(BookingError::NotFound("payment"))?;

        let _guard = self.payment_locks.acquire(found.id).await;

        // Re-read under the lock; a racing reconcile may have settled the row
        // while we were waiting.
        let mut payment = self
            .payments
            .find_by_reference(transaction_ref)
            .await?
            .ok_or(BookingError::NotFound("payment"))?;

        if payment.status.is_terminal() {
            return Ok(payment.status);
        }

        match self.gateway.verify(transaction_ref).await {
            Ok(PaymentVerdict::Settled) => {
                payment.transition(PaymentStatus::Completed)?;
                let payment = self.payments.update(payment).await?;
                info!("payment {} completed", payment.transaction_ref);
                Ok(payment.status)
            }
            Ok(PaymentVerdict::Declined) => {
                payment.transition(PaymentStatus::Failed)?;
                let payment = self.payments.update(payment).await?;
                info!("payment {} failed at the gateway", payment.transaction_ref);
                Ok(payment.status)
            }
            Err(err) => {
                warn!(
                    "could not verify {}, leaving it pending: {}",
                    transaction_ref, err
                );
                Err(err.into())
            }
        }
    }
}
