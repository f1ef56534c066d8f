use crate::application::bookings::CreateBooking;
use crate::domain::booking::BookingId;
use crate::domain::listing::ListingId;
use crate::domain::money::Amount;
use crate::domain::payment::TransactionRef;
use crate::domain::user::UserId;
use crate::interfaces::http::AppState;
use crate::interfaces::http::dto::{
    BookingResponse, CreateBookingRequest, InitiatePaymentRequest, InitiatePaymentResponse,
    ListingResponse, VerifyPaymentRequest, VerifyPaymentResponse,
};
use crate::interfaces::http::error::ApiError;
use axum::{
    Json,
    extract::{FromRequestParts, State},
    http::{StatusCode, request::Parts},
};

/// The authenticated caller, resolved from the `X-User-Id` header.
///
/// Credential checking sits in front of this service; the header is trusted
/// as an opaque user handle, but it must name a user that exists.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub UserId);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                ApiError::unauthorized("Authentication credentials were not provided.")
            })?;

        let id = raw
            .parse::<u64>()
            .map_err(|_| ApiError::unauthorized("Invalid user."))?;

        let user = state
            .users
            .get(UserId(id))
            .await?
            .ok_or_else(|| ApiError::unauthorized("Invalid user."))?;

        Ok(CurrentUser(user.id))
    }
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// POST /api/bookings
pub async fn create_booking(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    let booking = state
        .bookings
        .create(
            user.0,
            CreateBooking {
                listing_id: ListingId(request.listing_id),
                check_in_date: request.check_in_date,
                check_out_date: request.check_out_date,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(booking.into())))
}

/// GET /api/bookings
pub async fn list_bookings(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let bookings = state.bookings.list_for_user(user.0).await?;
    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

/// POST /api/payments/initiate
pub async fn initiate_payment(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<InitiatePaymentRequest>,
) -> Result<Json<InitiatePaymentResponse>, ApiError> {
    let amount = Amount::new(request.amount)?;
    let initiated = state
        .payments
        .initiate(user.0, BookingId(request.booking_id), amount)
        .await?;

    Ok(Json(InitiatePaymentResponse {
        checkout_url: initiated.checkout_url,
        transaction_id: initiated.transaction_ref.to_string(),
        status: initiated.status,
    }))
}

/// POST /api/payments/verify
pub async fn verify_payment(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<VerifyPaymentRequest>,
) -> Result<Json<VerifyPaymentResponse>, ApiError> {
    let tx_ref = TransactionRef::from(request.transaction_id);
    let status = state.payments.verify(user.0, &tx_ref).await?;
    Ok(Json(VerifyPaymentResponse { status }))
}

/// GET /api/listings
pub async fn list_listings(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<Vec<ListingResponse>>, ApiError> {
    let listings = state.listings.all().await?;
    Ok(Json(listings.into_iter().map(ListingResponse::from).collect()))
}
