use crate::application::locks::KeyedLocks;
use crate::domain::booking::{Booking, NewBooking};
use crate::domain::listing::ListingId;
use crate::domain::ports::{
    BookingStoreArc, ListingStoreArc, Notification, NotifierArc, UserStoreArc,
};
use crate::domain::user::UserId;
use crate::error::{BookingError, Result};
use chrono::NaiveDate;
use log::warn;

/// Strictly-typed booking request, already parsed at the transport boundary.
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub listing_id: ListingId,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
}

/// Owns booking records and enforces one consistent view of a listing's
/// committed date ranges.
///
/// Creation validates the proposed dates against the listing's availability
/// window, then checks for range overlap against existing bookings on the
/// same listing. Check and insert run under a per-listing advisory lock so
/// two racing requests cannot both commit overlapping stays.
pub struct BookingService {
    listings: ListingStoreArc,
    bookings: BookingStoreArc,
    users: UserStoreArc,
    notifier: NotifierArc,
    listing_locks: KeyedLocks<ListingId>,
}

impl BookingService {
    pub fn new(
        listings: ListingStoreArc,
        bookings: BookingStoreArc,
        users: UserStoreArc,
        notifier: NotifierArc,
    ) -> Self {
        Self {
            listings,
            bookings,
            users,
            notifier,
            listing_locks: KeyedLocks::new(),
        }
    }

    /// Creates a booking for `user`. Validation runs before any mutation;
    /// a successful insert is followed by a best-effort confirmation
    /// notification that never fails the call.
    pub async fn create(&self, user: UserId, request: CreateBooking) -> Result<Booking> {
        let listing = self
            .listings
            .get(request.listing_id)
            .await?
            .ok_or(BookingError::NotFound("listing"))?;

        listing.validate_booking_window(request.check_in_date, request.check_out_date)?;

        let booking = {
            let _guard = self.listing_locks.acquire(listing.id).await;

            let existing = self.bookings.list_for_listing(listing.id).await?;
            if existing
                .iter()
                .any(|b| b.overlaps(request.check_in_date, request.check_out_date))
            {
                return Err(BookingError::DatesUnavailable);
            }

            self.bookings
                .insert(NewBooking {
                    listing_id: listing.id,
                    user_id: user,
                    check_in_date: request.check_in_date,
                    check_out_date: request.check_out_date,
                })
                .await?
        };

        self.send_confirmation(user, &booking).await;

        Ok(booking)
    }

    /// Bookings owned by `user`, and nothing else.
    pub async fn list_for_user(&self, user: UserId) -> Result<Vec<Booking>> {
        self.bookings.list_for_user(user).await
    }

    async fn send_confirmation(&self, user: UserId, booking: &Booking) {
        match self.users.get(user).await {
            Ok(Some(user)) => self.notifier.notify(Notification {
                to: user.email,
                subject: "Booking Confirmation".to_string(),
                body: format!(
                    "Thank you for your booking, {}! Your booking ID is {}.",
                    user.username, booking.id
                ),
            }),
            Ok(None) => warn!("no user record for {}, skipping confirmation", user),
            Err(err) => warn!("could not load user {} for confirmation: {}", user, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::NewListing;
    use crate::domain::money::Amount;
    use crate::domain::ports::{ListingStore, Notifier, UserStore};
    use crate::domain::user::NewUser;
    use crate::infrastructure::in_memory::InMemoryStore;
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<Notification>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notification: Notification) {
            self.sent.lock().unwrap().push(notification);
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn service_with_listing() -> (BookingService, UserId, ListingId, Arc<RecordingNotifier>)
    {
        let store = Arc::new(InMemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::default());

        let guest = UserStore::insert(
            store.as_ref(),
            NewUser {
                username: "wanjiru".to_string(),
                email: "wanjiru@example.com".to_string(),
                first_name: "Wanjiru".to_string(),
                last_name: "Kamau".to_string(),
            },
        )
        .await
        .unwrap();

        let host = UserStore::insert(
            store.as_ref(),
            NewUser {
                username: "host".to_string(),
                email: "host@example.com".to_string(),
                first_name: "Host".to_string(),
                last_name: "Account".to_string(),
            },
        )
        .await
        .unwrap();

        let listing = ListingStore::insert(
            store.as_ref(),
            NewListing {
                owner: host.id,
                title: "Jumeirah Beach Hotel".to_string(),
                description: "One of the biggest beach hotels around.".to_string(),
                price_per_night: Amount::new(dec!(100000.00)).unwrap(),
                available_from: date(2024, 6, 1),
                available_to: date(2024, 6, 30),
                location: "Nyali, Mombasa".to_string(),
                max_guests: 30,
            },
        )
        .await
        .unwrap();

        let service = BookingService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            notifier.clone(),
        );
        (service, guest.id, listing.id, notifier)
    }

    #[tokio::test]
    async fn test_valid_booking_is_created() {
        let (service, guest, listing_id, notifier) = service_with_listing().await;

        let booking = service
            .create(
                guest,
                CreateBooking {
                    listing_id,
                    check_in_date: date(2024, 6, 5),
                    check_out_date: date(2024, 6, 10),
                },
            )
            .await
            .unwrap();

        assert_eq!(booking.user_id, guest);
        assert_eq!(booking.listing_id, listing_id);

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "wanjiru@example.com");
        assert_eq!(sent[0].subject, "Booking Confirmation");
        assert!(sent[0].body.contains("Thank you for your booking, wanjiru!"));
        assert!(sent[0].body.contains(&booking.id.to_string()));
    }

    #[tokio::test]
    async fn test_out_of_window_booking_is_rejected_without_side_effects() {
        let (service, guest, listing_id, notifier) = service_with_listing().await;

        let result = service
            .create(
                guest,
                CreateBooking {
                    listing_id,
                    check_in_date: date(2024, 6, 29),
                    check_out_date: date(2024, 7, 2),
                },
            )
            .await;

        assert!(matches!(result, Err(BookingError::InvalidDateRange(_))));
        assert!(service.list_for_user(guest).await.unwrap().is_empty());
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_listing_is_not_found() {
        let (service, guest, _listing_id, _) = service_with_listing().await;

        let result = service
            .create(
                guest,
                CreateBooking {
                    listing_id: ListingId(999),
                    check_in_date: date(2024, 6, 5),
                    check_out_date: date(2024, 6, 10),
                },
            )
            .await;

        assert!(matches!(result, Err(BookingError::NotFound("listing"))));
    }

    #[tokio::test]
    async fn test_overlapping_booking_is_rejected() {
        let (service, guest, listing_id, _) = service_with_listing().await;

        service
            .create(
                guest,
                CreateBooking {
                    listing_id,
                    check_in_date: date(2024, 6, 5),
                    check_out_date: date(2024, 6, 10),
                },
            )
            .await
            .unwrap();

        let result = service
            .create(
                guest,
                CreateBooking {
                    listing_id,
                    check_in_date: date(2024, 6, 8),
                    check_out_date: date(2024, 6, 12),
                },
            )
            .await;
        assert!(matches!(result, Err(BookingError::DatesUnavailable)));

        // A back-to-back stay starting on the check-out day is fine.
        let result = service
            .create(
                guest,
                CreateBooking {
                    listing_id,
                    check_in_date: date(2024, 6, 10),
                    check_out_date: date(2024, 6, 14),
                },
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_overlapping_requests_commit_only_one() {
        let (service, guest, listing_id, _) = service_with_listing().await;
        let service = Arc::new(service);

        let mut handles = Vec::new();
        for _ in 0..4 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service
                    .create(
                        guest,
                        CreateBooking {
                            listing_id,
                            check_in_date: date(2024, 6, 5),
                            check_out_date: date(2024, 6, 10),
                        },
                    )
                    .await
            }));
        }

        let mut created = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(BookingError::DatesUnavailable) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(created, 1);
        assert_eq!(conflicts, 3);
    }

    #[tokio::test]
    async fn test_listing_scope_of_user_bookings() {
        let (service, guest, listing_id, _) = service_with_listing().await;

        service
            .create(
                guest,
                CreateBooking {
                    listing_id,
                    check_in_date: date(2024, 6, 5),
                    check_out_date: date(2024, 6, 10),
                },
            )
            .await
            .unwrap();

        let mine = service.list_for_user(guest).await.unwrap();
        assert_eq!(mine.len(), 1);

        let other = service.list_for_user(UserId(999)).await.unwrap();
        assert!(other.is_empty());
    }
}
