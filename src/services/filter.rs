//! Date-filter component: interval selection state and pure derivation of
//! the filtered view.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::customer::Customer;
use crate::models::sales::SalesRecord;

/// Customers shown in the table, filtered or not.
pub const CUSTOMER_DISPLAY_LIMIT: usize = 5;

/// Default selection at startup: trailing window ending today, inclusive.
pub const DEFAULT_WINDOW_DAYS: u64 = 14;

/// Inclusive date interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateInterval {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Trailing window of `days` calendar days ending at `end`, inclusive.
    pub fn trailing(days: u64, end: NaiveDate) -> Self {
        let start = end
            .checked_sub_days(Days::new(days.saturating_sub(1)))
            .unwrap_or(end);
        Self { start, end }
    }
}

/// Interval endpoints while the user is still picking. Incomplete
/// selections never filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalSelection {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl IntervalSelection {
    pub fn of(interval: DateInterval) -> Self {
        Self {
            start: Some(interval.start),
            end: Some(interval.end),
        }
    }

    /// The interval, if both endpoints are set.
    pub fn complete(&self) -> Option<DateInterval> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(DateInterval { start, end }),
            _ => None,
        }
    }
}

/// Effective filter state derived from flag and selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterState {
    Inactive,
    Filtering(DateInterval),
}

/// Records surviving the current filter state, customers truncated for
/// display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredData {
    pub sales: Vec<SalesRecord>,
    pub customers: Vec<Customer>,
}

/// The date-filter component. Long-lived: the selection survives the flag
/// being toggled off and is remembered for the next activation.
#[derive(Debug, Clone)]
pub struct DateFilter {
    selection: IntervalSelection,
    active: bool,
}

impl DateFilter {
    /// Starts inactive with the default trailing window already selected,
    /// so activating the flag filters immediately.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            selection: IntervalSelection::of(DateInterval::trailing(DEFAULT_WINDOW_DAYS, today)),
            active: false,
        }
    }

    /// Store a new selection. A complete selection turns filtering on; an
    /// incomplete one leaves the flag as it was.
    pub fn select_range(&mut self, selection: IntervalSelection) {
        self.selection = selection;
        if selection.complete().is_some() {
            self.active = true;
        }
    }

    /// Toggle filtering. The stored selection is kept either way.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn selection(&self) -> IntervalSelection {
        self.selection
    }

    /// The flag only filters when the selection is complete; an incomplete
    /// selection behaves as inactive.
    pub fn state(&self) -> FilterState {
        match (self.active, self.selection.complete()) {
            (true, Some(interval)) => FilterState::Filtering(interval),
            _ => FilterState::Inactive,
        }
    }

    /// Derive the displayed subset of the fetched record sets. Pure; called
    /// on every input change.
    ///
    /// Inactive: all sales, and the first `CUSTOMER_DISPLAY_LIMIT` customers
    /// in store order (purchase date descending) — an explicit contract, not
    /// a consequence of the store's sort. Filtering: records whose date lies
    /// within the interval, inclusive; a record with a missing or unparsable
    /// date drops out of the filtered set only. Failures never leave this
    /// boundary.
    pub fn apply(&self, all_sales: &[SalesRecord], all_customers: &[Customer]) -> FilteredData {
        match self.state() {
            FilterState::Inactive => FilteredData {
                sales: all_sales.to_vec(),
                customers: truncate(all_customers),
            },
            FilterState::Filtering(interval) => {
                let sales: Vec<SalesRecord> = all_sales
                    .iter()
                    .filter(|record| {
                        record
                            .calendar_date()
                            .is_some_and(|date| interval.contains(date))
                    })
                    .cloned()
                    .collect();
                let customers: Vec<Customer> = all_customers
                    .iter()
                    .filter(|customer| {
                        customer
                            .purchase_day()
                            .is_some_and(|date| interval.contains(date))
                    })
                    .cloned()
                    .collect();
                FilteredData {
                    sales,
                    customers: truncate(&customers),
                }
            }
        }
    }
}

fn truncate(customers: &[Customer]) -> Vec<Customer> {
    customers
        .iter()
        .take(CUSTOMER_DISPLAY_LIMIT)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::customer::SubscriptionStatus;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn sales_record(date: &str) -> SalesRecord {
        SalesRecord {
            date: date.to_string(),
            amount: Decimal::new(10000, 2),
        }
    }

    fn customer(name: &str, purchase_date: Option<&str>) -> Customer {
        Customer {
            id: Uuid::new_v4(),
            name: Some(name.to_string()),
            email: format!("{name}@example.com"),
            subscription_status: SubscriptionStatus::Subscribed,
            purchase_date: purchase_date.map(str::to_string),
            total_revenue: Decimal::ZERO,
        }
    }

    fn january_sales() -> Vec<SalesRecord> {
        (1..=20)
            .map(|d| sales_record(&format!("2024-01-{d:02}")))
            .collect()
    }

    fn filter_over(start: u32, end: u32) -> DateFilter {
        let mut filter = DateFilter::new(day(1));
        filter.select_range(IntervalSelection {
            start: Some(day(start)),
            end: Some(day(end)),
        });
        filter
    }

    #[test]
    fn default_selection_is_trailing_window() {
        let filter = DateFilter::new(day(20));
        assert!(!filter.is_active());
        assert_eq!(
            filter.selection().complete(),
            Some(DateInterval {
                start: day(7),
                end: day(20),
            })
        );
        assert_eq!(filter.state(), FilterState::Inactive);
    }

    #[test]
    fn complete_selection_activates_filtering() {
        let filter = filter_over(5, 10);
        assert!(filter.is_active());
        assert_eq!(
            filter.state(),
            FilterState::Filtering(DateInterval {
                start: day(5),
                end: day(10),
            })
        );
    }

    #[test]
    fn incomplete_selection_behaves_as_inactive() {
        let mut filter = filter_over(5, 10);
        filter.select_range(IntervalSelection {
            start: Some(day(5)),
            end: None,
        });
        // Flag untouched, but without both endpoints nothing filters.
        assert!(filter.is_active());
        assert_eq!(filter.state(), FilterState::Inactive);

        let filtered = filter.apply(&january_sales(), &[]);
        assert_eq!(filtered.sales.len(), 20);
    }

    #[test]
    fn inclusive_interval_bounds() {
        let filter = filter_over(5, 10);
        let filtered = filter.apply(&january_sales(), &[]);
        let dates: Vec<&str> = filtered.sales.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(
            dates,
            vec![
                "2024-01-05",
                "2024-01-06",
                "2024-01-07",
                "2024-01-08",
                "2024-01-09",
                "2024-01-10",
            ]
        );
    }

    #[test]
    fn customers_truncated_to_display_limit_in_both_states() {
        let customers: Vec<Customer> = (1..=9)
            .map(|d| customer(&format!("c{d}"), Some(&format!("2024-01-{d:02}"))))
            .collect();

        let mut filter = filter_over(1, 9);
        let active = filter.apply(&[], &customers);
        assert_eq!(active.customers.len(), CUSTOMER_DISPLAY_LIMIT);

        filter.set_active(false);
        let inactive = filter.apply(&[], &customers);
        assert_eq!(inactive.customers.len(), CUSTOMER_DISPLAY_LIMIT);
        // Inactive view shows the first five in store order.
        let names: Vec<&str> = inactive
            .customers
            .iter()
            .filter_map(|c| c.name.as_deref())
            .collect();
        assert_eq!(names, vec!["c1", "c2", "c3", "c4", "c5"]);
    }

    #[test]
    fn unparsable_purchase_date_excluded_from_filtered_set_only() {
        let customers = vec![
            customer("good", Some("2024-01-06T10:00:00+00:00")),
            customer("garbled", Some("last tuesday")),
            customer("missing", None),
        ];

        let filter = filter_over(5, 10);
        let filtered = filter.apply(&[], &customers);
        assert_eq!(filtered.customers.len(), 1);
        assert_eq!(filtered.customers[0].name.as_deref(), Some("good"));

        // The unfiltered view keeps every fetched customer.
        let mut inactive = filter.clone();
        inactive.set_active(false);
        assert_eq!(inactive.apply(&[], &customers).customers.len(), 3);
    }

    #[test]
    fn unparsable_sales_date_excluded_when_filtering() {
        let sales = vec![sales_record("2024-01-06"), sales_record("n/a")];
        let filter = filter_over(5, 10);
        assert_eq!(filter.apply(&sales, &[]).sales.len(), 1);
    }

    #[test]
    fn toggle_round_trip_reproduces_output() {
        let sales = january_sales();
        let customers: Vec<Customer> = (4..=12)
            .map(|d| customer(&format!("c{d}"), Some(&format!("2024-01-{d:02}"))))
            .collect();

        let mut filter = filter_over(5, 10);
        let before = filter.apply(&sales, &customers);

        filter.set_active(false);
        assert_eq!(filter.state(), FilterState::Inactive);
        // The selection is remembered while inactive.
        assert!(filter.selection().complete().is_some());

        filter.set_active(true);
        let after = filter.apply(&sales, &customers);
        assert_eq!(before, after);
    }
}
