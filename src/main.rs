use clap::{Parser, Subcommand};
use lodgebook::application::bookings::BookingService;
use lodgebook::application::payments::PaymentService;
use lodgebook::application::reconciler::PaymentReconciler;
use lodgebook::application::seed;
use lodgebook::config::GatewayConfig;
use lodgebook::domain::ports::{
    BookingStoreArc, ListingStoreArc, NotifierArc, PaymentStoreArc, UserStoreArc,
};
use lodgebook::infrastructure::chapa::ChapaGateway;
use lodgebook::infrastructure::in_memory::InMemoryStore;
use lodgebook::infrastructure::notifier::ChannelNotifier;
use lodgebook::interfaces::csv::listing_reader::ListingReader;
use lodgebook::interfaces::http::{AppState, create_router};
use log::info;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the booking API server
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1:3000")]
        bind: String,

        /// Path to persistent database (optional). If provided, uses RocksDB.
        #[arg(long)]
        db_path: Option<PathBuf>,

        /// Seed demo users and listings before serving
        #[arg(long)]
        seed_demo: bool,
    },
    /// Seed the database with initial data for listings
    Seed {
        /// Number of listings to create
        #[arg(long, default_value_t = 5)]
        count: usize,

        /// Clear existing listings before seeding
        #[arg(long)]
        clear: bool,

        /// Import listings from a CSV file instead of the built-in samples
        #[arg(long)]
        file: Option<PathBuf>,

        /// Path to persistent database (optional). If provided, uses RocksDB.
        #[arg(long)]
        db_path: Option<PathBuf>,
    },
}

struct Stores {
    users: UserStoreArc,
    listings: ListingStoreArc,
    bookings: BookingStoreArc,
    payments: PaymentStoreArc,
}

fn open_stores(db_path: Option<PathBuf>) -> Result<Stores> {
    match db_path {
        Some(path) => {
            #[cfg(feature = "storage-rocksdb")]
            {
                let store = Arc::new(
                    lodgebook::infrastructure::rocksdb::RocksDBStore::open(path)
                        .into_diagnostic()?,
                );
                Ok(Stores {
                    users: store.clone(),
                    listings: store.clone(),
                    bookings: store.clone(),
                    payments: store,
                })
            }
            #[cfg(not(feature = "storage-rocksdb"))]
            {
                let _ = path;
                Err(miette::miette!(
                    "--db-path requires the storage-rocksdb feature"
                ))
            }
        }
        None => {
            let store = Arc::new(InMemoryStore::new());
            Ok(Stores {
                users: store.clone(),
                listings: store.clone(),
                bookings: store.clone(),
                payments: store,
            })
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            bind,
            db_path,
            seed_demo,
        } => serve(bind, db_path, seed_demo).await,
        Command::Seed {
            count,
            clear,
            file,
            db_path,
        } => run_seed(count, clear, file, db_path).await,
    }
}

async fn serve(bind: String, db_path: Option<PathBuf>, seed_demo: bool) -> Result<()> {
    let stores = open_stores(db_path)?;

    if seed_demo {
        let summary = seed::seed_demo_data(&stores.users, &stores.listings, 5, false)
            .await
            .into_diagnostic()?;
        info!(
            "seeded {} demo listings for host {}",
            summary.listings.len(),
            summary.host.username
        );
    }

    let notifier: NotifierArc = Arc::new(ChannelNotifier::spawn());
    let gateway = Arc::new(ChapaGateway::new(GatewayConfig::from_env()).into_diagnostic()?);

    let bookings = Arc::new(BookingService::new(
        stores.listings.clone(),
        stores.bookings.clone(),
        stores.users.clone(),
        notifier,
    ));
    let reconciler = Arc::new(PaymentReconciler::new(
        stores.payments.clone(),
        stores.bookings.clone(),
        gateway.clone(),
    ));
    let payments = Arc::new(PaymentService::new(
        stores.bookings.clone(),
        stores.users.clone(),
        gateway,
        reconciler,
    ));

    let state = AppState {
        users: stores.users,
        listings: stores.listings,
        bookings,
        payments,
    };

    let listener = tokio::net::TcpListener::bind(&bind).await.into_diagnostic()?;
    let addr = listener.local_addr().into_diagnostic()?;
    println!("Listening on http://{addr}");

    axum::serve(listener, create_router(state))
        .await
        .into_diagnostic()?;

    Ok(())
}

async fn run_seed(
    count: usize,
    clear: bool,
    file: Option<PathBuf>,
    db_path: Option<PathBuf>,
) -> Result<()> {
    let stores = open_stores(db_path)?;

    if let Some(path) = file {
        if clear {
            stores.listings.clear().await.into_diagnostic()?;
            println!("Cleared existing listings.");
        }

        let (host, _guest) = seed::ensure_demo_users(&stores.users)
            .await
            .into_diagnostic()?;

        let file = File::open(path).into_diagnostic()?;
        let reader = ListingReader::new(file);
        let mut imported = 0usize;
        for record in reader.records() {
            let listing = match record.and_then(|r| r.into_new_listing(host.id)) {
                Ok(listing) => listing,
                Err(e) => {
                    eprintln!("Skipping listing row: {e}");
                    continue;
                }
            };
            stores.listings.insert(listing).await.into_diagnostic()?;
            imported += 1;
        }
        println!("Imported {imported} listings.");
        return Ok(());
    }

    if clear {
        stores.listings.clear().await.into_diagnostic()?;
        println!("Cleared existing listings.");
    }

    println!("Creating {count} sample listings...");
    let summary = seed::seed_demo_data(&stores.users, &stores.listings, count, false)
        .await
        .into_diagnostic()?;
    println!("Successfully created {} listings.", summary.listings.len());

    println!();
    println!("Sample Listings Created:");
    for listing in summary.listings.iter().take(4) {
        println!(
            "{} in {} is ${} per night",
            listing.title, listing.location, listing.price_per_night
        );
    }

    Ok(())
}
