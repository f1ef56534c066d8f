use crate::application::bookings::BookingService;
use crate::application::payments::PaymentService;
use crate::domain::ports::{ListingStoreArc, UserStoreArc};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

pub mod dto;
pub mod error;
pub mod handlers;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub users: UserStoreArc,
    pub listings: ListingStoreArc,
    pub bookings: Arc<BookingService>,
    pub payments: Arc<PaymentService>,
}

/// Create the REST API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/bookings", post(handlers::create_booking))
        .route("/api/bookings", get(handlers::list_bookings))
        .route("/api/payments/initiate", post(handlers::initiate_payment))
        .route("/api/payments/verify", post(handlers::verify_payment))
        .route("/api/listings", get(handlers::list_listings))
        .with_state(state)
}
