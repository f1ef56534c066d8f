use chrono::NaiveDate;
use lodgebook::application::bookings::BookingService;
use lodgebook::application::payments::PaymentService;
use lodgebook::application::reconciler::PaymentReconciler;
use lodgebook::config::GatewayConfig;
use lodgebook::domain::listing::{Listing, NewListing};
use lodgebook::domain::money::Amount;
use lodgebook::domain::ports::{ListingStore, Notification, Notifier, UserStore};
use lodgebook::domain::user::{NewUser, User};
use lodgebook::infrastructure::chapa::ChapaGateway;
use lodgebook::infrastructure::in_memory::InMemoryStore;
use lodgebook::interfaces::http::{AppState, create_router};
use rust_decimal_macros::dec;
use std::fs::File;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _notification: Notification) {}
}

/// Fully wired application backed by the in-memory store and a gateway
/// pointed at `gateway_url`, with one guest, one host, and one June listing.
pub struct TestApp {
    pub store: Arc<InMemoryStore>,
    pub bookings: Arc<BookingService>,
    pub payments: Arc<PaymentService>,
    pub guest: User,
    pub host: User,
    pub listing: Listing,
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub async fn test_app(gateway_url: &str) -> TestApp {
    let store = Arc::new(InMemoryStore::new());

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
            first_name: "Asha".to_string(),
            last_name: "Odhiambo".to_string(),
        },
    )
    .await
    .unwrap();

    let listing = ListingStore::insert(
        store.as_ref(),
        NewListing {
            owner: host.id,
            title: "Mombasa Beach Hotel".to_string(),
            description: "A luxurious villa with a beachfront view.".to_string(),
            price_per_night: Amount::new(dec!(30000.00)).unwrap(),
            available_from: date(2024, 6, 1),
            available_to: date(2024, 6, 30),
            location: "Nyali, Mombasa".to_string(),
            max_guests: 50,
        },
    )
    .await
    .unwrap();

    let gateway = Arc::new(
        ChapaGateway::new(GatewayConfig::for_base_url(gateway_url)).unwrap(),
    );
    let bookings = Arc::new(BookingService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        Arc::new(NullNotifier),
    ));
    let reconciler = Arc::new(PaymentReconciler::new(
        store.clone(),
        store.clone(),
        gateway.clone(),
    ));
    let payments = Arc::new(PaymentService::new(
        store.clone(),
        store.clone(),
        gateway,
        reconciler,
    ));

    TestApp {
        store,
        bookings,
        payments,
        guest,
        host,
        listing,
    }
}

/// Binds the REST shell for `app` on an ephemeral port.
pub async fn spawn_server(app: &TestApp) -> SocketAddr {
    let state = AppState {
        users: app.store.clone(),
        listings: app.store.clone(),
        bookings: app.bookings.clone(),
        payments: app.payments.clone(),
    };
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, create_router(state)).await.unwrap();
    });
    addr
}

pub async fn mount_initialize_success(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/transaction/initialize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "message": "Hosted Link",
            "data": { "checkout_url": "https://checkout.chapa.co/pay/test" }
        })))
        .mount(server)
        .await;
}

pub async fn mount_verify_settled(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/transaction/verify/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "message": "Payment details",
            "data": { "status": "success" }
        })))
        .mount(server)
        .await;
}

pub async fn mount_verify_declined(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/transaction/verify/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "message": "Payment details",
            "data": { "status": "failed" }
        })))
        .mount(server)
        .await;
}

/// Writes a listing import file with `rows` identical valid rows.
pub fn generate_listing_csv(path: &Path, rows: usize) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record([
        "title",
        "description",
        "price_per_night",
        "available_from",
        "available_to",
        "location",
        "max_guests",
    ])?;

    for i in 1..=rows {
        let title = format!("Imported Hotel {i}");
        wtr.write_record([
            title.as_str(),
            "Imported from CSV",
            "12000.00",
            "2024-06-01",
            "2024-06-30",
            "Diani, Kenya",
            "8",
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
