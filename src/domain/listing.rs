use crate::domain::money::Amount;
use crate::domain::user::UserId;
use crate::error::{BookingError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ListingId(pub u64);

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A rentable property with a price, capacity, and availability window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub owner: UserId,
    pub title: String,
    pub description: String,
    pub price_per_night: Amount,
    pub available_from: NaiveDate,
    pub available_to: NaiveDate,
    pub location: String,
    pub max_guests: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    /// Validates a proposed booking's dates against this listing's
    /// availability window. Pure predicate, no side effects.
    ///
    /// Boundary semantics: check-in must fall strictly before
    /// `available_to`, check-out may equal it.
    pub fn validate_booking_window(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<()> {
        if check_in >= check_out {
            return Err(BookingError::InvalidDateRange(
                "check_in_date must be before check_out_date".to_string(),
            ));
        }

        let check_in_ok = self.available_from <= check_in && check_in < self.available_to;
        let check_out_ok = self.available_from < check_out && check_out <= self.available_to;
        if !(check_in_ok && check_out_ok) {
            return Err(BookingError::InvalidDateRange(
                "booking dates must be within the listing's availability".to_string(),
            ));
        }

        Ok(())
    }
}

/// Listing fields before the store assigns an id and timestamps.
#[derive(Debug, Clone)]
pub struct NewListing {
    pub owner: UserId,
    pub title: String,
    pub description: String,
    pub price_per_night: Amount,
    pub available_from: NaiveDate,
    pub available_to: NaiveDate,
    pub location: String,
    pub max_guests: u32,
}

impl NewListing {
    /// Field-level invariants that do not depend on other records:
    /// availability window ordered, capacity positive. The price is already
    /// positive by construction of [`Amount`].
    pub fn validate(&self) -> Result<()> {
        if self.available_from >= self.available_to {
            return Err(BookingError::InvalidDateRange(
                "available_from must be before available_to".to_string(),
            ));
        }
        if self.max_guests == 0 {
            return Err(BookingError::ValidationError(
                "max_guests must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
