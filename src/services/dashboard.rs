//! Dashboard data fetch: four independent reads per cycle, aggregated
//! fail-open.

use std::fmt::Display;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Notify, RwLock};

use crate::models::customer::Customer;
use crate::models::metrics::CounterSnapshot;
use crate::models::sales::SalesRecord;
use crate::models::session::Session;
use crate::services::session::SessionCache;
use crate::store::{Direction, Query, StoreClient, StoreError};

/// Logical tables on the hosted store.
pub const SALES_TABLE: &str = "sales_data";
pub const CUSTOMERS_TABLE: &str = "customers";
pub const VIEWS_TABLE: &str = "views_data";
pub const ACTIVE_USERS_TABLE: &str = "active_users";

const UNAUTHENTICATED_NOTE: &str =
    "No authenticated user found. Please sign in to view dashboard data.";

/// Outcome of one of the four independent reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReadOutcome {
    /// The read was never issued: no session, or an earlier fault ended the
    /// cycle.
    #[default]
    NotAttempted,
    Loaded {
        rows: usize,
    },
    Empty,
    Failed {
        message: String,
    },
}

impl ReadOutcome {
    fn loaded(rows: usize) -> Self {
        if rows == 0 {
            Self::Empty
        } else {
            Self::Loaded { rows }
        }
    }

    fn failed(error: impl Display) -> Self {
        Self::Failed {
            message: error.to_string(),
        }
    }
}

/// Per-read outcomes for one fetch cycle, keyed by read name and assembled
/// into diagnostic text only after all reads settle — the text cannot
/// depend on call order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FetchReport {
    pub sales: ReadOutcome,
    pub customers: ReadOutcome,
    pub page_views: ReadOutcome,
    pub active_users: ReadOutcome,
}

impl FetchReport {
    fn entries(&self) -> [(&'static str, &ReadOutcome); 4] {
        [
            ("sales", &self.sales),
            ("customers", &self.customers),
            ("page views", &self.page_views),
            ("active users", &self.active_users),
        ]
    }

    pub fn all_loaded(&self) -> bool {
        self.entries()
            .iter()
            .all(|(_, outcome)| matches!(outcome, ReadOutcome::Loaded { .. }))
    }

    /// Debug-panel text; `None` when every read loaded rows.
    pub fn diagnostics(&self) -> Option<String> {
        if self.all_loaded() {
            return None;
        }
        let lines: Vec<String> = self
            .entries()
            .iter()
            .map(|(name, outcome)| match outcome {
                ReadOutcome::NotAttempted => format!("{name}: not attempted"),
                ReadOutcome::Loaded { rows } => format!("{name}: {rows} rows"),
                ReadOutcome::Empty => format!("{name}: no rows found"),
                ReadOutcome::Failed { message } => format!("{name}: error: {message}"),
            })
            .collect();
        Some(lines.join("\n"))
    }
}

/// Raw result of one fetch cycle. Discarded and replaced wholesale by the
/// next cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardData {
    pub all_sales: Vec<SalesRecord>,
    pub all_customers: Vec<Customer>,
    pub views_count: i64,
    pub active_users: i64,
    /// User-visible banner; set only by an unexpected fault.
    pub error: Option<String>,
    /// Debug-panel text; set whenever any read did not load rows.
    pub debug_info: Option<String>,
    pub report: FetchReport,
}

impl DashboardData {
    /// True if any of the four sets came back non-empty / non-zero.
    pub fn has_any_data(&self) -> bool {
        !self.all_sales.is_empty()
            || !self.all_customers.is_empty()
            || self.views_count > 0
            || self.active_users > 0
    }

    fn unauthenticated() -> Self {
        Self {
            debug_info: Some(UNAUTHENTICATED_NOTE.to_string()),
            ..Self::default()
        }
    }
}

/// One fetch cycle: the four reads, issued sequentially but evaluated
/// independently, scoped server-side by the session identity.
///
/// A read the store refuses records a failed outcome and leaves the other
/// reads untouched. A transport/decode fault sets the user-visible error,
/// stops issuing further reads, and still returns a complete result — the
/// cycle always ends, with whatever data arrived (fail open).
pub async fn fetch_dashboard_data(
    store: &StoreClient,
    session: Option<&Session>,
) -> DashboardData {
    let Some(session) = session else {
        tracing::debug!("no signed-in identity, skipping dashboard fetch");
        return DashboardData::unauthenticated();
    };

    let token = session.access_token.as_str();
    let mut data = DashboardData::default();
    let mut report = FetchReport::default();
    let mut fault: Option<StoreError> = None;

    match read_sales(store, token).await {
        Ok(rows) => {
            report.sales = ReadOutcome::loaded(rows.len());
            data.all_sales = rows;
        }
        Err(error) if error.is_rejection() => {
            tracing::warn!(error = %error, "sales read failed");
            report.sales = ReadOutcome::failed(&error);
        }
        Err(error) => fault = Some(error),
    }

    if fault.is_none() {
        match read_customers(store, token).await {
            Ok(rows) => {
                report.customers = ReadOutcome::loaded(rows.len());
                data.all_customers = rows;
            }
            Err(error) if error.is_rejection() => {
                tracing::warn!(error = %error, "customers read failed");
                report.customers = ReadOutcome::failed(&error);
            }
            Err(error) => fault = Some(error),
        }
    }

    if fault.is_none() {
        match read_latest_counter(store, VIEWS_TABLE, token).await {
            Ok(snapshot) => {
                report.page_views = ReadOutcome::loaded(usize::from(snapshot.is_some()));
                data.views_count = snapshot.map(|s| s.count).unwrap_or(0);
            }
            Err(error) if error.is_rejection() => {
                tracing::warn!(error = %error, "page views read failed");
                report.page_views = ReadOutcome::failed(&error);
            }
            Err(error) => fault = Some(error),
        }
    }

    if fault.is_none() {
        match read_latest_counter(store, ACTIVE_USERS_TABLE, token).await {
            Ok(snapshot) => {
                report.active_users = ReadOutcome::loaded(usize::from(snapshot.is_some()));
                data.active_users = snapshot.map(|s| s.count).unwrap_or(0);
            }
            Err(error) if error.is_rejection() => {
                tracing::warn!(error = %error, "active users read failed");
                report.active_users = ReadOutcome::failed(&error);
            }
            Err(error) => fault = Some(error),
        }
    }

    if let Some(fault) = fault {
        tracing::error!(error = %fault, "unexpected fault while fetching dashboard data");
        data.error = Some(format!("Failed to load dashboard data: {fault}"));
    }
    data.debug_info = report.diagnostics();
    data.report = report;
    data
}

async fn read_sales(store: &StoreClient, token: &str) -> Result<Vec<SalesRecord>, StoreError> {
    store
        .select(
            &Query::table(SALES_TABLE)
                .columns("date, amount")
                .order_by("date", Direction::Ascending),
            Some(token),
        )
        .await
}

async fn read_customers(store: &StoreClient, token: &str) -> Result<Vec<Customer>, StoreError> {
    store
        .select(
            &Query::table(CUSTOMERS_TABLE).order_by("purchase_date", Direction::Descending),
            Some(token),
        )
        .await
}

/// Only the most recent snapshot of a counter table is retained.
async fn read_latest_counter(
    store: &StoreClient,
    table: &str,
    token: &str,
) -> Result<Option<CounterSnapshot>, StoreError> {
    let rows: Vec<CounterSnapshot> = store
        .select(
            &Query::table(table)
                .columns("date, count")
                .order_by("date", Direction::Descending)
                .limit(1),
            Some(token),
        )
        .await?;
    Ok(rows.into_iter().next())
}

/// Latest dashboard data plus the loading flag for the cycle in flight.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub loading: bool,
    pub data: DashboardData,
}

/// Long-lived holder of the latest snapshot, refreshed by a background
/// task.
#[derive(Debug, Clone)]
pub struct DashboardState {
    snapshot: Arc<RwLock<DashboardSnapshot>>,
    refresh: Arc<Notify>,
}

impl DashboardState {
    /// Starts loading: the page shows the loading state until the first
    /// cycle lands.
    pub fn new() -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(DashboardSnapshot {
                loading: true,
                data: DashboardData::default(),
            })),
            refresh: Arc::new(Notify::new()),
        }
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.snapshot.read().await.clone()
    }

    /// Ask the refresher for an extra fetch cycle.
    pub fn request_refresh(&self) {
        self.refresh.notify_one();
    }

    /// Run fetch cycles: one at startup, then one per session change or
    /// refresh request. The loading flag is raised at cycle start and
    /// cleared exactly once at cycle end, failed cycles included. An
    /// in-flight cycle is never aborted; a superseding session change
    /// simply overwrites state when its own cycle completes
    /// (last-write-wins), and rapid changes coalesce in the watch channel.
    pub async fn run_refresher(self, store: StoreClient, sessions: SessionCache) {
        let mut watcher = sessions.subscribe();
        loop {
            self.snapshot.write().await.loading = true;
            let session = sessions.current();
            let data = fetch_dashboard_data(&store, session.as_ref()).await;
            *self.snapshot.write().await = DashboardSnapshot {
                loading: false,
                data,
            };

            tokio::select! {
                alive = watcher.changed() => {
                    if !alive {
                        break;
                    }
                }
                _ = self.refresh.notified() => {}
            }
        }
        tracing::debug!("session cache dropped, dashboard refresher stopping");
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}
