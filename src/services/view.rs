//! Presentation view models for the dashboard page.
//!
//! Pure rendering data: every decision already happened in the fetch and
//! filter components. The browser page draws these verbatim.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::customer::Customer;
use crate::models::sales::SalesRecord;
use crate::services::dashboard::DashboardSnapshot;
use crate::services::filter::DateFilter;

const OVERALL_EMPTY_MESSAGE: &str =
    "No data available yet. Data will appear here once it's generated.";
const FILTERED_EMPTY_MESSAGE: &str = "There is no data available for the selected time period. \
     Try selecting a different date range or check if data exists in the system.";
const TABLE_EMPTY_MESSAGE: &str = "No customer data available for the selected timeframe.";
const UNNAMED_CUSTOMER: &str = "Unnamed";

/// One stat card of the overview strip.
#[derive(Debug, Clone, Serialize)]
pub struct StatCard {
    pub title: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

impl StatCard {
    fn new(title: &str, value: String) -> Self {
        Self {
            title: title.to_string(),
            value,
            subtitle: None,
        }
    }

    fn with_subtitle(mut self, subtitle: &str) -> Self {
        self.subtitle = Some(subtitle.to_string());
        self
    }
}

/// The four overview cards.
#[derive(Debug, Clone, Serialize)]
pub struct StatsOverview {
    pub revenue: StatCard,
    pub subscriptions: StatCard,
    pub active_now: StatCard,
    pub page_views: StatCard,
}

/// One point of the revenue-over-time chart.
#[derive(Debug, Clone, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct RevenueChart {
    pub points: Vec<ChartPoint>,
}

/// One row of the recent-customers table.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerRow {
    pub name: String,
    pub email: String,
    pub status: String,
    pub revenue: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomersTable {
    pub rows: Vec<CustomerRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
}

/// Filter controls state for the page header.
#[derive(Debug, Clone, Serialize)]
pub struct FilterView {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub active: bool,
}

impl From<&DateFilter> for FilterView {
    fn from(filter: &DateFilter) -> Self {
        let selection = filter.selection();
        Self {
            start: selection.start,
            end: selection.end,
            active: filter.is_active(),
        }
    }
}

/// Everything the dashboard page renders.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub loading: bool,
    pub has_any_data: bool,
    pub stats: StatsOverview,
    pub chart: RevenueChart,
    pub customers: CustomersTable,
    pub filter: FilterView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_info: Option<String>,
    /// Whole-dashboard empty state (no data at all).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
    /// Set when data exists but nothing survives the active filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filtered_empty_message: Option<String>,
}

/// Assemble the page view from the latest snapshot and filter state.
pub fn render(snapshot: &DashboardSnapshot, filter: &DateFilter) -> DashboardView {
    let data = &snapshot.data;
    let filtered = filter.apply(&data.all_sales, &data.all_customers);
    let has_any_data = data.has_any_data();
    let has_filtered_data = !filtered.sales.is_empty() || !filtered.customers.is_empty();

    let revenue_total: Decimal = filtered.sales.iter().map(|record| record.amount).sum();
    let stats = StatsOverview {
        revenue: StatCard::new("Revenue", format_currency(revenue_total)),
        subscriptions: StatCard::new("Subscriptions", filtered.customers.len().to_string()),
        active_now: StatCard::new("Active Now", data.active_users.to_string())
            .with_subtitle("Active users right now"),
        page_views: StatCard::new("Page Views", format_large_number(data.views_count)),
    };

    let chart = RevenueChart {
        points: filtered.sales.iter().map(chart_point).collect(),
    };

    let rows: Vec<CustomerRow> = filtered.customers.iter().map(customer_row).collect();
    let customers = CustomersTable {
        empty_message: rows
            .is_empty()
            .then(|| TABLE_EMPTY_MESSAGE.to_string()),
        rows,
    };

    DashboardView {
        loading: snapshot.loading,
        has_any_data,
        stats,
        chart,
        customers,
        filter: FilterView::from(filter),
        error: data.error.clone(),
        debug_info: data.debug_info.clone(),
        empty_message: (!snapshot.loading && !has_any_data).then(|| {
            data.debug_info
                .clone()
                .unwrap_or_else(|| OVERALL_EMPTY_MESSAGE.to_string())
        }),
        filtered_empty_message: (has_any_data && !has_filtered_data)
            .then(|| FILTERED_EMPTY_MESSAGE.to_string()),
    }
}

fn chart_point(record: &SalesRecord) -> ChartPoint {
    let label = record
        .calendar_date()
        .map(|date| date.format("%b %-d").to_string())
        .unwrap_or_else(|| record.date.clone());
    ChartPoint {
        label,
        amount: record.amount,
    }
}

fn customer_row(customer: &Customer) -> CustomerRow {
    CustomerRow {
        name: customer
            .name
            .clone()
            .unwrap_or_else(|| UNNAMED_CUSTOMER.to_string()),
        email: customer.email.clone(),
        status: customer.subscription_status.as_str().to_string(),
        revenue: format_currency(customer.total_revenue),
    }
}

/// `$1,234.56` with thousands grouping; negative amounts keep their sign.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.abs().round_dp(2);
    let text = rounded.to_string();
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole.to_string(), format!("{fraction:0<2}")),
        None => (text, "00".to_string()),
    };
    let sign = if amount.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${}.{fraction}", group_thousands(&whole))
}

/// Abbreviate large counters for the stat cards: `12.3k`, `1.2M`.
pub fn format_large_number(count: i64) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}k", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
