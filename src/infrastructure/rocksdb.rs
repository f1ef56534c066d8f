use crate::domain::booking::{Booking, BookingId, NewBooking};
use crate::domain::listing::{Listing, ListingId, NewListing};
use crate::domain::payment::{NewPayment, Payment, PaymentId, TransactionRef};
use crate::domain::ports::{BookingStore, ListingStore, PaymentStore, UserStore};
use crate::domain::user::{NewUser, User, UserId};
use crate::error::{BookingError, Result};
use async_trait::async_trait;
use chrono::Utc;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Column Family for user records.
pub const CF_USERS: &str = "users";
/// Column Family for listings.
pub const CF_LISTINGS: &str = "listings";
/// Column Family for bookings.
pub const CF_BOOKINGS: &str = "bookings";
/// Column Family for payment rows.
pub const CF_PAYMENTS: &str = "payments";

/// A persistent store implementation using RocksDB.
///
/// Each entity gets its own Column Family with big-endian id keys and JSON
/// values so iteration yields rows in id order. Id counters are rebuilt from
/// the highest existing key when the database is opened.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    next_user: Arc<AtomicU64>,
    next_listing: Arc<AtomicU64>,
    next_booking: Arc<AtomicU64>,
    next_payment: Arc<AtomicU64>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path, ensuring
    /// all required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cfs = [CF_USERS, CF_LISTINGS, CF_BOOKINGS, CF_PAYMENTS]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect::<Vec<_>>();

        let db = Arc::new(DB::open_cf_descriptors(&opts, path, cfs)?);

        let next_user = Arc::new(AtomicU64::new(last_id(&db, CF_USERS)?));
        let next_listing = Arc::new(AtomicU64::new(last_id(&db, CF_LISTINGS)?));
        let next_booking = Arc::new(AtomicU64::new(last_id(&db, CF_BOOKINGS)?));
        let next_payment = Arc::new(AtomicU64::new(last_id(&db, CF_PAYMENTS)?));

        Ok(Self {
            db,
            next_user,
            next_listing,
            next_booking,
            next_payment,
        })
    }

    fn cf(&self, name: &'static str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| BookingError::StorageError(format!("{name} column family not found")))
    }

    fn put<T: serde::Serialize>(&self, cf_name: &'static str, id: u64, value: &T) -> Result<()> {
        let cf = self.cf(cf_name)?;
        let bytes = serde_json::to_vec(value)
            .map_err(|e| BookingError::StorageError(format!("serialization error: {e}")))?;
        self.db.put_cf(&cf, id.to_be_bytes(), bytes)?;
        Ok(())
    }

    fn get_raw<T: serde::de::DeserializeOwned>(
        &self,
        cf_name: &'static str,
        id: u64,
    ) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        match self.db.get_cf(&cf, id.to_be_bytes())? {
            Some(bytes) => {
                let value = serde_json::from_slice(&bytes).map_err(|e| {
                    BookingError::StorageError(format!("deserialization error: {e}"))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn scan<T: serde::de::DeserializeOwned>(&self, cf_name: &'static str) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let mut rows = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_key, value) = item?;
            let row = serde_json::from_slice(&value)
                .map_err(|e| BookingError::StorageError(format!("deserialization error: {e}")))?;
            rows.push(row);
        }
        Ok(rows)
    }
}

fn last_id(db: &DB, name: &'static str) -> Result<u64> {
    let cf = db
        .cf_handle(name)
        .ok_or_else(|| BookingError::StorageError(format!("{name} column family not found")))?;
    match db.iterator_cf(&cf, IteratorMode::End).next() {
        Some(item) => {
            let (key, _value) = item?;
            let bytes: [u8; 8] = key
                .as_ref()
                .try_into()
                .map_err(|_| BookingError::StorageError(format!("malformed key in {name}")))?;
            Ok(u64::from_be_bytes(bytes))
        }
        None => Ok(0),
    }
}

fn next_id(counter: &AtomicU64) -> u64 {
    counter.fetch_add(1, Ordering::SeqCst) + 1
}

#[async_trait]
impl UserStore for RocksDBStore {
    async fn insert(&self, user: NewUser) -> Result<User> {
        let user = User {
            id: UserId(next_id(&self.next_user)),
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        };
        self.put(CF_USERS, user.id.0, &user)?;
        Ok(user)
    }

    async fn get(&self, id: UserId) -> Result<Option<User>> {
        self.get_raw(CF_USERS, id.0)
    }
}

#[async_trait]
impl ListingStore for RocksDBStore {
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
        self.put(CF_LISTINGS, listing.id.0, &listing)?;
        Ok(listing)
    }

    async fn get(&self, id: ListingId) -> Result<Option<Listing>> {
        self.get_raw(CF_LISTINGS, id.0)
    }

    async fn all(&self) -> Result<Vec<Listing>> {
        self.scan(CF_LISTINGS)
    }

    async fn clear(&self) -> Result<usize> {
        let cf = self.cf(CF_LISTINGS)?;
        let mut keys = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (key, _value) = item?;
            keys.push(key);
        }
        for key in &keys {
            self.db.delete_cf(&cf, key)?;
        }
        Ok(keys.len())
    }
}

#[async_trait]
impl BookingStore for RocksDBStore {
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
        self.put(CF_BOOKINGS, booking.id.0, &booking)?;
        Ok(booking)
    }

    async fn get_for_user(&self, id: BookingId, user: UserId) -> Result<Option<Booking>> {
        let booking: Option<Booking> = self.get_raw(CF_BOOKINGS, id.0)?;
        Ok(booking.filter(|b| b.user_id == user))
    }

    async fn list_for_user(&self, user: UserId) -> Result<Vec<Booking>> {
        let all: Vec<Booking> = self.scan(CF_BOOKINGS)?;
        Ok(all.into_iter().filter(|b| b.user_id == user).collect())
    }

    async fn list_for_listing(&self, listing: ListingId) -> Result<Vec<Booking>> {
        let all: Vec<Booking> = self.scan(CF_BOOKINGS)?;
        Ok(all.into_iter().filter(|b| b.listing_id == listing).collect())
    }
}

#[async_trait]
impl PaymentStore for RocksDBStore {
    async fn insert(&self, payment: NewPayment) -> Result<Payment> {
        let existing: Vec<Payment> = self.scan(CF_PAYMENTS)?;
        if existing
            .iter()
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
        self.put(CF_PAYMENTS, payment.id.0, &payment)?;
        Ok(payment)
    }

    async fn find_by_reference(&self, tx_ref: &TransactionRef) -> Result<Option<Payment>> {
        let all: Vec<Payment> = self.scan(CF_PAYMENTS)?;
        Ok(all.into_iter().find(|p| &p.transaction_ref == tx_ref))
    }

    async fn update(&self, payment: Payment) -> Result<Payment> {
        let current: Payment = self.get_raw(CF_PAYMENTS, payment.id.0)?.ok_or_else(|| {
            BookingError::StorageError(format!("no payment row with id {}", payment.id))
        })?;
        if current.status.is_terminal() && current.status != payment.status {
            return Err(BookingError::ValidationError(format!(
                "payment {} is already {}",
                current.transaction_ref, current.status
            )));
        }
        self.put(CF_PAYMENTS, payment.id.0, &payment)?;
        Ok(payment)
    }

    async fn list_for_booking(&self, booking: BookingId) -> Result<Vec<Payment>> {
        let all: Vec<Payment> = self.scan(CF_PAYMENTS)?;
        Ok(all.into_iter().filter(|p| p.booking_id == booking).collect())
    }
}
