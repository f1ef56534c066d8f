mod common;

use common::{
    date, mount_initialize_success, mount_verify_declined, mount_verify_settled, test_app,
    TestApp,
};
use lodgebook::application::bookings::CreateBooking;
use lodgebook::domain::booking::Booking;
use lodgebook::domain::money::Amount;
use lodgebook::domain::payment::PaymentStatus;
use lodgebook::domain::ports::PaymentStore;
use lodgebook::error::BookingError;
use rust_decimal_macros::dec;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn book_june_stay(app: &TestApp) -> Booking {
    app.bookings
        .create(
            app.guest.id,
            CreateBooking {
                listing_id: app.listing.id,
                check_in_date: date(2024, 6, 5),
                check_out_date: date(2024, 6, 10),
            },
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_booking_payment_lifecycle_settles() {
    let server = MockServer::start().await;
    mount_initialize_success(&server).await;
    mount_verify_settled(&server).await;

    let app = test_app(&server.uri()).await;
    let booking = book_june_stay(&app).await;

    let initiated = app
        .payments
        .initiate(app.guest.id, booking.id, Amount::new(dec!(150000.00)).unwrap())
        .await
        .unwrap();
    assert_eq!(initiated.checkout_url, "https://checkout.chapa.co/pay/test");
    assert_eq!(initiated.status, PaymentStatus::Pending);
    assert!(initiated
        .transaction_ref
        .as_str()
        .starts_with(&format!("booking_{}_", booking.id)));

    let status = app
        .payments
        .verify(app.guest.id, &initiated.transaction_ref)
        .await
        .unwrap();
    assert_eq!(status, PaymentStatus::Completed);

    let rows = app.store.list_for_booking(booking.id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, PaymentStatus::Completed);
}

#[tokio::test]
async fn test_settled_payment_is_not_verified_twice_at_the_gateway() {
    let server = MockServer::start().await;
    mount_initialize_success(&server).await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/transaction/verify/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "data": { "status": "success" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = test_app(&server.uri()).await;
    let booking = book_june_stay(&app).await;
    let initiated = app
        .payments
        .initiate(app.guest.id, booking.id, Amount::new(dec!(150000.00)).unwrap())
        .await
        .unwrap();

    let first = app
        .payments
        .verify(app.guest.id, &initiated.transaction_ref)
        .await
        .unwrap();
    let second = app
        .payments
        .verify(app.guest.id, &initiated.transaction_ref)
        .await
        .unwrap();

    assert_eq!(first, PaymentStatus::Completed);
    assert_eq!(second, PaymentStatus::Completed);
    // Dropping the server checks the expect(1) on the verify mock.
}

#[tokio::test]
async fn test_declined_initiation_records_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/transaction/initialize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "failed",
            "message": "Insufficient balance"
        })))
        .mount(&server)
        .await;

    let app = test_app(&server.uri()).await;
    let booking = book_june_stay(&app).await;

    let result = app
        .payments
        .initiate(app.guest.id, booking.id, Amount::new(dec!(150000.00)).unwrap())
        .await;
    match result {
        Err(BookingError::GatewayDeclined(message)) => {
            assert_eq!(message, "Insufficient balance");
        }
        other => panic!("unexpected result: {other:?}"),
    }

    assert!(app
        .store
        .list_for_booking(booking.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_declined_settlement_fails_the_payment() {
    let server = MockServer::start().await;
    mount_initialize_success(&server).await;
    mount_verify_declined(&server).await;

    let app = test_app(&server.uri()).await;
    let booking = book_june_stay(&app).await;
    let initiated = app
        .payments
        .initiate(app.guest.id, booking.id, Amount::new(dec!(150000.00)).unwrap())
        .await
        .unwrap();

    let status = app
        .payments
        .verify(app.guest.id, &initiated.transaction_ref)
        .await
        .unwrap();
    assert_eq!(status, PaymentStatus::Failed);

    let rows = app.store.list_for_booking(booking.id).await.unwrap();
    assert_eq!(rows[0].status, PaymentStatus::Failed);
}

#[tokio::test]
async fn test_pending_payment_survives_an_outage_and_settles_on_retry() {
    let server = MockServer::start().await;
    mount_initialize_success(&server).await;
    // First verification attempt hits an unavailable gateway, the second
    // falls through to the settled response below.
    Mock::given(method("GET"))
        .and(path_regex(r"^/transaction/verify/.+$"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_verify_settled(&server).await;

    let app = test_app(&server.uri()).await;
    let booking = book_june_stay(&app).await;
    let initiated = app
        .payments
        .initiate(app.guest.id, booking.id, Amount::new(dec!(150000.00)).unwrap())
        .await
        .unwrap();

    let result = app
        .payments
        .verify(app.guest.id, &initiated.transaction_ref)
        .await;
    assert!(matches!(result, Err(BookingError::GatewayUnreachable(_))));

    let rows = app.store.list_for_booking(booking.id).await.unwrap();
    assert_eq!(rows[0].status, PaymentStatus::Pending);

    let status = app
        .payments
        .verify(app.guest.id, &initiated.transaction_ref)
        .await
        .unwrap();
    assert_eq!(status, PaymentStatus::Completed);
}

#[tokio::test]
async fn test_verification_is_owner_scoped() {
    let server = MockServer::start().await;
    mount_initialize_success(&server).await;
    mount_verify_settled(&server).await;

    let app = test_app(&server.uri()).await;
    let booking = book_june_stay(&app).await;
    let initiated = app
        .payments
        .initiate(app.guest.id, booking.id, Amount::new(dec!(150000.00)).unwrap())
        .await
        .unwrap();

    let result = app
        .payments
        .verify(app.host.id, &initiated.transaction_ref)
        .await;
    assert!(matches!(result, Err(BookingError::NotFound("payment"))));
}
