use crate::domain::booking::{Booking, BookingId, NewBooking};
use crate::domain::listing::{Listing, ListingId, NewListing};
use crate::domain::payment::{NewPayment, Payment, PaymentId, TransactionRef};
use crate::domain::ports::{BookingStore, ListingStore, PaymentStore, UserStore};
use crate::domain::user::{NewUser, User, UserId};
use crate::error::{BookingError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// A thread-safe in-memory backend covering all four store ports.
///
/// Each entity lives in a `RwLock<HashMap>` keyed by its numeric id, with
/// ids handed out from per-entity counters. Ideal for tests and for running
/// the server without a data directory.
#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<u64, User>>,
    listings: RwLock<HashMap<u64, Listing>>,
    bookings: RwLock<HashMap<u64, Booking>>,
    payments: RwLock<HashMap<u64, Payment>>,
    next_user: AtomicU64,
    next_listing: AtomicU64,
    next_booking: AtomicU64,
    next_payment: AtomicU64,
}

impl InMemoryStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn next_id(counter: &AtomicU64) -> u64 {
    counter.fetch_add(1, Ordering::SeqCst) + 1
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn insert(&self, user: NewUser) -> Result<User> {
        let user = User {
            id: UserId(next_id(&self.next_user)),
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        };
        let mut users = self.users.write().await;
        users.insert(user.id.0, user.clone());
        Ok(user)
    }

    async fn get(&self, id: UserId) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id.0).cloned())
    }
}

#[async_trait]
impl ListingStore for InMemoryStore {
    async fn insert(&self, listing: NewListing) -> Result<Listing> {
        let now = Utc::now();
        let listing = Listing {
            id: ListingId(next_id(&self.next_listing)),
            owner: listing.owner,
            title: listing.title,
            description: listing.description,
            price_per_night: listing.price_per_night,
            available_from: listing.available_from,
            available_to: listing.available_to,
            location: listing.location,
            max_guests: listing.max_guests,
            created_at: now,
            updated_at: now,
        };
        let mut listings = self.listings.write().await;
        listings.insert(listing.id.0, listing.clone());
        Ok(listing)
    }

    async fn get(&self, id: ListingId) -> Result<Option<Listing>> {
        let listings = self.listings.read().await;
        Ok(listings.get(&id.0).cloned())
    }

    async fn all(&self) -> Result<Vec<Listing>> {
        let listings = self.listings.read().await;
        let mut all: Vec<Listing> = listings.values().cloned().collect();
        all.sort_by_key(|l| l.id);
        Ok(all)
    }

    async fn clear(&self) -> Result<usize> {
        let mut listings = self.listings.write().await;
        let removed = listings.len();
        listings.clear();
        Ok(removed)
    }
}

#[async_trait]
impl BookingStore for InMemoryStore {
    async fn insert(&self, booking: NewBooking) -> Result<Booking> {
        let now = Utc::now();
        let booking = Booking {
            id: BookingId(next_id(&self.next_booking)),
            listing_id: booking.listing_id,
            user_id: booking.user_id,
            check_in_date: booking.check_in_date,
            check_out_date: booking.check_out_date,
            created_at: now,
            updated_at: now,
        };
        let mut bookings = self.bookings.write().await;
        bookings.insert(booking.id.0, booking.clone());
        Ok(booking)
    }

    async fn get_for_user(&self, id: BookingId, user: UserId) -> Result<Option<Booking>> {
        let bookings = self.bookings.read().await;
        Ok(bookings
            .get(&id.0)
            .filter(|b| b.user_id == user)
            .cloned())
    }

    async fn list_for_user(&self, user: UserId) -> Result<Vec<Booking>> {
        let bookings = self.bookings.read().await;
        let mut mine: Vec<Booking> = bookings
            .values()
            .filter(|b| b.user_id == user)
            .cloned()
            .collect();
        mine.sort_by_key(|b| b.id);
        Ok(mine)
    }

    async fn list_for_listing(&self, listing: ListingId) -> Result<Vec<Booking>> {
        let bookings = self.bookings.read().await;
        let mut found: Vec<Booking> = bookings
            .values()
            .filter(|b| b.listing_id == listing)
            .cloned()
            .collect();
        found.sort_by_key(|b| b.id);
        Ok(found)
    }
}

#[async_trait]
impl PaymentStore for InMemoryStore {
    async fn insert(&self, payment: NewPayment) -> Result<Payment> {
        let mut payments = self.payments.write().await;
        if payments
            .values()
            .any(|p| p.transaction_ref == payment.transaction_ref)
        {
            return Err(BookingError::DuplicateReference(
                payment.transaction_ref.to_string(),
            ));
        }
        let now = Utc::now();
        let payment = Payment {
            id: PaymentId(next_id(&self.next_payment)),
            booking_id: payment.booking_id,
            amount: payment.amount,
            transaction_ref: payment.transaction_ref,
            status: payment.status,
            created_at: now,
            updated_at: now,
        };
        payments.insert(payment.id.0, payment.clone());
        Ok(payment)
    }

    async fn find_by_reference(&self, tx_ref: &TransactionRef) -> Result<Option<Payment>> {
        let payments = self.payments.read().await;
        Ok(payments
            .values()
            .find(|p| &p.transaction_ref == tx_ref)
            .cloned())
    }

    async fn update(&self, payment: Payment) -> Result<Payment> {
        let mut payments = self.payments.write().await;
        let current = payments.get(&payment.id.0).ok_or_else(|| {
            BookingError::StorageError(format!("no payment row with id {}", payment.id))
        })?;
        if current.status.is_terminal() && current.status != payment.status {
            return Err(BookingError::ValidationError(format!(
                "payment {} is already {}",
                current.transaction_ref, current.status
            )));
        }
        payments.insert(payment.id.0, payment.clone());
        Ok(payment)
    }

    async fn list_for_booking(&self, booking: BookingId) -> Result<Vec<Payment>> {
        let payments = self.payments.read().await;
        let mut found: Vec<Payment> = payments
            .values()
            .filter(|p| p.booking_id == booking)
            .cloned()
            .collect();
        found.sort_by_key(|p| p.id);
        Ok(found)
    }
}
