//! Seed script for development — populates the hosted store with sample
//! dashboard data through the platform's REST API.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `PLATFORM_URL` and `PLATFORM_ANON_KEY` (reads .env). The demo
//! account defaults to `demo@pulseboard.local` / `Demo123!Seed`; override
//! with `SEED_EMAIL` / `SEED_PASSWORD`.

use chrono::{Days, Local, NaiveDate};
use rust_decimal::Decimal;
use uuid::Uuid;

use pulseboard::config::AppConfig;
use pulseboard::identity::{AuthError, IdentityClient, SignupOutcome, SignupProfile};
use pulseboard::models::customer::{Customer, SubscriptionStatus};
use pulseboard::models::metrics::CounterSnapshot;
use pulseboard::models::sales::SalesRecord;
use pulseboard::services::dashboard::{
    ACTIVE_USERS_TABLE, CUSTOMERS_TABLE, SALES_TABLE, VIEWS_TABLE,
};
use pulseboard::store::{Query, StoreClient};

const SEED_SALES_DAYS: u64 = 14;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().expect("PLATFORM_URL and PLATFORM_ANON_KEY must be set");
    let store = StoreClient::new(&config.store_url(), &config.platform_anon_key);
    let identity = IdentityClient::new(&config.identity_url(), &config.platform_anon_key);

    let email = std::env::var("SEED_EMAIL").unwrap_or_else(|_| "demo@pulseboard.local".into());
    let password = std::env::var("SEED_PASSWORD").unwrap_or_else(|_| "Demo123!Seed".into());

    println!("=== Pulseboard Seed Script ===");

    let token = sign_in_or_up(&identity, &email, &password).await?;
    let today = Local::now().date_naive();

    seed_sales(&store, &token, today).await?;
    seed_customers(&store, &token, today).await?;
    seed_counter(&store, &token, VIEWS_TABLE, today, 15_230).await?;
    seed_counter(&store, &token, ACTIVE_USERS_TABLE, today, 573).await?;

    println!("\n=== Seed complete! ===");
    println!("Demo login: {email} / {password}");

    Ok(())
}

async fn sign_in_or_up(
    identity: &IdentityClient,
    email: &str,
    password: &str,
) -> anyhow::Result<String> {
    match identity.sign_in_with_password(email, password).await {
        Ok(session) => {
            println!("[done] Signed in as {email}");
            return Ok(session.access_token);
        }
        Err(AuthError::Rejected { .. }) => {}
        Err(error) => return Err(error.into()),
    }

    let profile = SignupProfile {
        first_name: "Demo".to_string(),
        last_name: "User".to_string(),
    };
    match identity.sign_up(email, password, &profile).await? {
        SignupOutcome::SignedIn(session) => {
            println!("[done] Created demo account {email}");
            Ok(session.access_token)
        }
        SignupOutcome::ConfirmationRequired(_) => anyhow::bail!(
            "the platform requires email confirmation; confirm {email} and re-run the seed"
        ),
    }
}

async fn seed_sales(store: &StoreClient, token: &str, today: NaiveDate) -> anyhow::Result<()> {
    if has_rows(store, token, SALES_TABLE).await? {
        println!("[skip] Sales data already exists");
        return Ok(());
    }

    let rows: Vec<SalesRecord> = (0..SEED_SALES_DAYS)
        .map(|i| {
            let date = today
                .checked_sub_days(Days::new(SEED_SALES_DAYS - 1 - i))
                .unwrap_or(today);
            // Deterministic daily variation between $900 and $1,550.
            let cents = 90_000 + (i as i64 * 13_750) % 65_000;
            SalesRecord {
                date: date.format("%Y-%m-%d").to_string(),
                amount: Decimal::new(cents, 2),
            }
        })
        .collect();

    store.insert(SALES_TABLE, &rows, Some(token)).await?;
    println!("[done] Inserted {} days of sales data", rows.len());
    Ok(())
}

async fn seed_customers(store: &StoreClient, token: &str, today: NaiveDate) -> anyhow::Result<()> {
    if has_rows(store, token, CUSTOMERS_TABLE).await? {
        println!("[skip] Customers already exist");
        return Ok(());
    }

    let profiles: [(&str, &str, SubscriptionStatus, u64, i64); 8] = [
        ("Olivia Martin", "olivia.martin@example.com", SubscriptionStatus::Subscribed, 0, 199_900),
        ("Jackson Lee", "jackson.lee@example.com", SubscriptionStatus::Subscribed, 1, 3_900),
        ("Isabella Nguyen", "isabella.nguyen@example.com", SubscriptionStatus::Unsubscribed, 2, 29_900),
        ("William Kim", "will.kim@example.com", SubscriptionStatus::Subscribed, 4, 9_900),
        ("Sofia Davis", "sofia.davis@example.com", SubscriptionStatus::Subscribed, 6, 3_900),
        ("Ethan Brown", "ethan.brown@example.com", SubscriptionStatus::Unsubscribed, 9, 14_900),
        ("Mia Wilson", "mia.wilson@example.com", SubscriptionStatus::Subscribed, 12, 49_900),
        ("Lucas Anderson", "lucas.anderson@example.com", SubscriptionStatus::Subscribed, 16, 7_900),
    ];

    let rows: Vec<Customer> = profiles
        .into_iter()
        .map(|(name, email, status, days_ago, revenue_cents)| {
            let day = today.checked_sub_days(Days::new(days_ago)).unwrap_or(today);
            Customer {
                id: Uuid::new_v4(),
                name: Some(name.to_string()),
                email: email.to_string(),
                subscription_status: status,
                purchase_date: Some(format!("{}T09:00:00+00:00", day.format("%Y-%m-%d"))),
                total_revenue: Decimal::new(revenue_cents, 2),
            }
        })
        .collect();

    store.insert(CUSTOMERS_TABLE, &rows, Some(token)).await?;
    println!("[done] Inserted {} customers", rows.len());
    Ok(())
}

async fn seed_counter(
    store: &StoreClient,
    token: &str,
    table: &str,
    today: NaiveDate,
    count: i64,
) -> anyhow::Result<()> {
    if has_rows(store, token, table).await? {
        println!("[skip] {table} already has a snapshot");
        return Ok(());
    }

    let snapshot = CounterSnapshot {
        date: today.format("%Y-%m-%d").to_string(),
        count,
    };
    store.insert(table, &[snapshot], Some(token)).await?;
    println!("[done] Inserted {table} snapshot ({count})");
    Ok(())
}

async fn has_rows(store: &StoreClient, token: &str, table: &str) -> anyhow::Result<bool> {
    let rows: Vec<serde_json::Value> = store
        .select(&Query::table(table).limit(1), Some(token))
        .await?;
    Ok(!rows.is_empty())
}
