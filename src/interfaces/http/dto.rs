use crate::domain::booking::Booking;
use crate::domain::listing::Listing;
use crate::domain::payment::PaymentStatus;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub listing_id: u64,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: u64,
    pub listing_id: u64,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id.0,
            listing_id: booking.listing_id.0,
            check_in_date: booking.check_in_date,
            check_out_date: booking.check_out_date,
            created_at: booking.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InitiatePaymentRequest {
    pub booking_id: u64,
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct InitiatePaymentResponse {
    pub checkout_url: String,
    pub transaction_id: String,
    pub status: PaymentStatus,
}

#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub transaction_id: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyPaymentResponse {
    pub status: PaymentStatus,
}

#[derive(Debug, Serialize)]
pub struct ListingResponse {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub price_per_night: Decimal,
    pub available_from: NaiveDate,
    pub available_to: NaiveDate,
    pub location: String,
    pub max_guests: u32,
}

impl From<Listing> for ListingResponse {
    fn from(listing: Listing) -> Self {
        Self {
            id: listing.id.0,
            title: listing.title,
            description: listing.description,
            price_per_night: listing.price_per_night.value(),
            available_from: listing.available_from,
            available_to: listing.available_to,
            location: listing.location,
            max_guests: listing.max_guests,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}
