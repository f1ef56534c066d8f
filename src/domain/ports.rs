use crate::domain::booking::{Booking, BookingId, NewBooking};
use crate::domain::listing::{Listing, ListingId, NewListing};
use crate::domain::money::Amount;
use crate::domain::payment::{NewPayment, Payment, TransactionRef};
use crate::domain::user::{NewUser, User, UserId};
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: NewUser) -> Result<User>;
    async fn get(&self, id: UserId) -> Result<Option<User>>;
}

#[async_trait]
pub trait ListingStore: Send + Sync {
    async fn insert(&self, listing: NewListing) -> Result<Listing>;
    async fn get(&self, id: ListingId) -> Result<Option<Listing>>;
    async fn all(&self) -> Result<Vec<Listing>>;
    async fn clear(&self) -> Result<usize>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Persists the booking atomically; readers never observe a partial row.
    async fn insert(&self, booking: NewBooking) -> Result<Booking>;
    /// Ownership-scoped lookup: `None` when the booking does not exist or
    /// belongs to another user.
    async fn get_for_user(&self, id: BookingId, user: UserId) -> Result<Option<Booking>>;
    async fn list_for_user(&self, user: UserId) -> Result<Vec<Booking>>;
    async fn list_for_listing(&self, listing: ListingId) -> Result<Vec<Booking>>;
}

#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Persists a new payment row. The `transaction_ref` is the unique
    /// correlation key: an insert reusing a stored reference is rejected
    /// with [`BookingError::DuplicateReference`](crate::error::BookingError).
    async fn insert(&self, payment: NewPayment) -> Result<Payment>;
    async fn find_by_reference(&self, tx_ref: &TransactionRef) -> Result<Option<Payment>>;
    /// Persists a payment mutated through the domain transition guard.
    /// Refuses to move a stored row out of a terminal status, so a caller
    /// holding a stale `Pending` copy cannot clobber a settled payment.
    async fn update(&self, payment: Payment) -> Result<Payment>;
    async fn list_for_booking(&self, booking: BookingId) -> Result<Vec<Payment>>;
}

/// Checkout details sent to the gateway at initiation.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub tx_ref: TransactionRef,
    pub amount: Amount,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Successful initiation: where to send the payer to complete checkout.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub checkout_url: String,
}

/// A definite answer from the gateway about a transaction's outcome.
///
/// Anything less definite than this (timeouts, 5xx, undecodable bodies) is a
/// [`GatewayError`](crate::error::GatewayError), never a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentVerdict {
    Settled,
    Declined,
}

/// External payment provider reached over HTTPS. Outbound calls only; the
/// client never mutates local state.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn initiate(
        &self,
        request: CheckoutRequest,
    ) -> std::result::Result<CheckoutSession, GatewayError>;

    async fn verify(
        &self,
        tx_ref: &TransactionRef,
    ) -> std::result::Result<PaymentVerdict, GatewayError>;
}

/// Fire-and-forget notification message.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Hand-off point for notifications. Dispatch is best-effort: implementations
/// must not block the caller and must swallow delivery failures.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

pub type UserStoreArc = Arc<dyn UserStore>;
pub type ListingStoreArc = Arc<dyn ListingStore>;
pub type BookingStoreArc = Arc<dyn BookingStore>;
pub type PaymentStoreArc = Arc<dyn PaymentStore>;
pub type PaymentGatewayArc = Arc<dyn PaymentGateway>;
pub type NotifierArc = Arc<dyn Notifier>;
