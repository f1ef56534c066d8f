use crate::domain::listing::NewListing;
use crate::domain::money::Amount;
use crate::domain::user::UserId;
use crate::error::{BookingError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// One listing row as it appears in an import file.
///
/// Dates use `YYYY-MM-DD` and the price is a plain decimal. The owner is not
/// part of the file; imports assign one when converting the row.
#[derive(Debug, Deserialize)]
pub struct ListingRecord {
    pub title: String,
    pub description: String,
    pub price_per_night: Decimal,
    pub available_from: NaiveDate,
    pub available_to: NaiveDate,
    pub location: String,
    pub max_guests: u32,
}

impl ListingRecord {
    /// Converts the raw row into a validated `NewListing` owned by `owner`.
    pub fn into_new_listing(self, owner: UserId) -> Result<NewListing> {
        let listing = NewListing {
            owner,
            title: self.title,
            description: self.description,
            price_per_night: Amount::new(self.price_per_night)?,
            available_from: self.available_from,
            available_to: self.available_to,
            location: self.location,
            max_guests: self.max_guests,
        };
        listing.validate()?;
        Ok(listing)
    }
}

/// Reads listings from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over
/// `Result<ListingRecord>`. It handles whitespace trimming and flexible
/// record lengths automatically.
pub struct ListingReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ListingReader<R> {
    /// Creates a new `ListingReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes listing rows.
    pub fn records(self) -> impl Iterator<Item = Result<ListingRecord>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(BookingError::from))
    }
}
