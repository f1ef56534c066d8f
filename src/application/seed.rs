use crate::domain::listing::{Listing, NewListing};
use crate::domain::money::Amount;
use crate::domain::ports::{ListingStoreArc, UserStoreArc};
use crate::domain::user::{NewUser, User, UserId};
use crate::error::Result;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

struct SampleListing {
    title: &'static str,
    description: &'static str,
    price_per_night: Decimal,
    days_available: i64,
    location: &'static str,
    max_guests: u32,
}

fn sample_data() -> [SampleListing; 3] {
    [
        SampleListing {
            title: "Jumeirah Beach Hotel",
            description: "One of the biggest beach hotels in Kenya",
            price_per_night: dec!(100000.00),
            days_available: 30,
            location: "Nyali, Mombasa",
            max_guests: 30,
        },
        SampleListing {
            title: "Mombasa Beach Hotel",
            description: "A luxurious villa with a beachfront view.",
            price_per_night: dec!(30000.00),
            days_available: 60,
            location: "Nyali, Mombasa",
            max_guests: 50,
        },
        SampleListing {
            title: "Sarova Whitesands Hotel",
            description: "A luxurious resort with stunning ocean views in Mombasa.",
            price_per_night: dec!(25000.00),
            days_available: 45,
            location: "Mombasa, Kenya",
            max_guests: 40,
        },
    ]
}

/// What a seeding run produced.
pub struct SeedSummary {
    pub cleared: usize,
    pub host: User,
    pub guest: User,
    pub listings: Vec<Listing>,
}

/// Populates the store with demo accounts and `count` sample listings,
/// cycling through the sample set. With `clear`, existing listings are
/// removed first.
pub async fn seed_demo_data(
    users: &UserStoreArc,
    listings: &ListingStoreArc,
    count: usize,
    clear: bool,
) -> Result<SeedSummary> {
    let cleared = if clear { listings.clear().await? } else { 0 };

    let (host, guest) = ensure_demo_users(users).await?;

    let samples = sample_data();
    let today = chrono::Utc::now().date_naive();

    let mut created = Vec::with_capacity(count);
    for i in 0..count {
        let sample = &samples[i % samples.len()];
        let listing = listings
            .insert(NewListing {
                owner: host.id,
                title: sample.title.to_string(),
                description: sample.description.to_string(),
                price_per_night: Amount::new(sample.price_per_night)?,
                available_from: today,
                available_to: today + chrono::Duration::days(sample.days_available),
                location: sample.location.to_string(),
                max_guests: sample.max_guests,
            })
            .await?;
        created.push(listing);
    }

    Ok(SeedSummary {
        cleared,
        host,
        guest,
        listings: created,
    })
}

/// The first two user slots are reserved for the demo host and guest, so
/// re-seeding an existing store reuses them instead of minting duplicates.
/// Imports that need an owner for incoming listings use the host.
pub async fn ensure_demo_users(users: &UserStoreArc) -> Result<(User, User)> {
    let host = match users.get(UserId(1)).await? {
        Some(user) => user,
        None => {
            users
                .insert(NewUser {
                    username: "demo-host".to_string(),
                    email: "host@lodgebook.example".to_string(),
                    first_name: "Asha".to_string(),
                    last_name: "Odhiambo".to_string(),
                })
                .await?
        }
    };
    let guest = match users.get(UserId(2)).await? {
        Some(user) => user,
        None => {
            users
                .insert(NewUser {
                    username: "demo-guest".to_string(),
                    email: "guest@lodgebook.example".to_string(),
                    first_name: "Wanjiru".to_string(),
                    last_name: "Kamau".to_string(),
                })
                .await?
        }
    };
    Ok((host, guest))
}
