//! Sales reports over stored orders
//!
//! Sales are `Σ item.price × qnt` (add-ons, charges and discounts are not
//! part of the figure). Trends compare against the period of the same
//! length that ends where the current one starts.

use crate::money;
use crate::store::{Collection, DocumentStore, StoreResult, from_document};
use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone};
use serde::Serialize;
use shared::order::{Order, PaymentMode};
use std::collections::BTreeMap;

const MILLIS_PER_MINUTE: f64 = 60_000.0;

/// Inclusive millisecond range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: i64,
    pub end: i64,
}

impl DateRange {
    pub fn contains(&self, millis: i64) -> bool {
        millis >= self.start && millis <= self.end
    }

    /// Same length, ending at this range's start
    pub fn previous(&self) -> Self {
        Self {
            start: self.start - (self.end - self.start),
            end: self.start,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFilter {
    Today,
    Yesterday,
    Last7,
    #[default]
    Last30,
    /// `end` defaults to now
    Custom { start: i64, end: Option<i64> },
    All,
}

impl DateFilter {
    /// Range in the local time zone, `None` for [`DateFilter::All`]
    pub fn range(&self) -> Option<DateRange> {
        self.range_at(Local::now())
    }

    pub fn range_at<Tz: TimeZone>(&self, now: DateTime<Tz>) -> Option<DateRange> {
        let now_ms = now.timestamp_millis();
        let today = midnight_millis(now.date_naive(), &now.timezone());
        let days = |n: i64| Duration::days(n).num_milliseconds();

        let range = match *self {
            DateFilter::Today => DateRange {
                start: today,
                end: now_ms,
            },
            DateFilter::Yesterday => DateRange {
                start: today - days(1),
                end: today,
            },
            DateFilter::Last7 => DateRange {
                start: today - days(7),
                end: now_ms,
            },
            DateFilter::Last30 => DateRange {
                start: today - days(30),
                end: now_ms,
            },
            DateFilter::Custom { start, end } => DateRange {
                start,
                end: end.unwrap_or(now_ms),
            },
            DateFilter::All => return None,
        };
        Some(range)
    }
}

impl std::str::FromStr for DateFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "today" => Ok(DateFilter::Today),
            "yesterday" => Ok(DateFilter::Yesterday),
            "last7" => Ok(DateFilter::Last7),
            "last30" => Ok(DateFilter::Last30),
            "all" => Ok(DateFilter::All),
            other => Err(format!("unknown date filter: {}", other)),
        }
    }
}

/// Local midnight; falls back to UTC midnight inside a DST gap
fn midnight_millis<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> i64 {
    let naive = date.and_time(chrono::NaiveTime::MIN);
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// `Σ price × qnt` over the order's items
pub fn order_sales(order: &Order) -> rust_decimal::Decimal {
    money::sum(
        order
            .items
            .iter()
            .map(|item| item.price * f64::from(item.quantity)),
    )
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesMetrics {
    pub total_sales: f64,
    pub total_orders: usize,
    pub avg_order_value: f64,
    /// Creation to COMPLETED, over completed orders only
    pub avg_turnaround_minutes: f64,
    pub online_sales: f64,
    pub offline_sales: f64,
    pub dine_in_sales: f64,
    pub sales_by_pay_mode: BTreeMap<&'static str, f64>,
    /// Payable totals of unpaid CREDIT orders
    pub outstanding_credit: f64,
}

impl SalesMetrics {
    pub fn from_orders<'a, I>(orders: I) -> Self
    where
        I: IntoIterator<Item = &'a Order>,
    {
        let mut total = rust_decimal::Decimal::ZERO;
        let mut online = rust_decimal::Decimal::ZERO;
        let mut offline = rust_decimal::Decimal::ZERO;
        let mut dine_in = rust_decimal::Decimal::ZERO;
        let mut credit = rust_decimal::Decimal::ZERO;
        let mut by_mode: BTreeMap<&'static str, rust_decimal::Decimal> = BTreeMap::new();
        let mut count = 0usize;
        let mut turnaround_sum = 0.0;
        let mut completed = 0usize;

        for order in orders {
            let sales = order_sales(order);
            count += 1;
            total += sales;
            *by_mode.entry(order.pay_mode.as_str()).or_default() += sales;

            if order.is_online_order() {
                online += sales;
            } else {
                offline += sales;
                if order.is_dine_in() {
                    dine_in += sales;
                }
            }

            if order.pay_mode == PaymentMode::Credit && !order.paid {
                credit += money::to_decimal(order.total());
            }

            if let Some(completed_at) = order.completed_at() {
                turnaround_sum += (completed_at - order.date) as f64 / MILLIS_PER_MINUTE;
                completed += 1;
            }
        }

        let total_sales = money::to_f64(total);
        Self {
            total_sales,
            total_orders: count,
            avg_order_value: if count > 0 {
                total_sales / count as f64
            } else {
                0.0
            },
            avg_turnaround_minutes: turnaround_sum / completed.max(1) as f64,
            online_sales: money::to_f64(online),
            offline_sales: money::to_f64(offline),
            dine_in_sales: money::to_f64(dine_in),
            sales_by_pay_mode: by_mode
                .into_iter()
                .map(|(mode, amount)| (mode, money::to_f64(amount)))
                .collect(),
            outstanding_credit: money::to_f64(credit),
        }
    }
}

/// Percentage change against the previous period
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trends {
    pub sales: f64,
    pub orders: f64,
    pub turnaround: f64,
    pub order_value: f64,
}

impl Trends {
    /// All zero when the previous period has no orders
    pub fn between(current: &SalesMetrics, previous: &SalesMetrics) -> Self {
        if previous.total_orders == 0 {
            return Self::default();
        }
        Self {
            sales: percent_change(current.total_sales, previous.total_sales),
            orders: percent_change(current.total_orders as f64, previous.total_orders as f64),
            turnaround: percent_change(
                current.avg_turnaround_minutes,
                previous.avg_turnaround_minutes,
            ),
            order_value: percent_change(current.avg_order_value, previous.avg_order_value),
        }
    }
}

/// `previous == 0` gives 100 for growth, 0 otherwise
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return if current > 0.0 { 100.0 } else { 0.0 };
    }
    (current - previous) / previous * 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub range: Option<DateRange>,
    pub metrics: SalesMetrics,
    pub trends: Trends,
}

impl SalesReport {
    pub fn build(orders: &[Order], range: Option<DateRange>) -> Self {
        let in_range = |r: Option<DateRange>| {
            move |order: &&Order| r.is_none_or(|r| r.contains(order.date))
        };
        let metrics = SalesMetrics::from_orders(orders.iter().filter(in_range(range)));
        let trends = match range {
            Some(range) => {
                let previous = SalesMetrics::from_orders(
                    orders.iter().filter(in_range(Some(range.previous()))),
                );
                Trends::between(&metrics, &previous)
            }
            None => Trends::default(),
        };
        Self {
            range,
            metrics,
            trends,
        }
    }

    /// Load every stored order and report on `filter`
    pub async fn load(store: &dyn DocumentStore, filter: DateFilter) -> StoreResult<Self> {
        let mut orders = Vec::new();
        for doc in store.list(Collection::Orders).await? {
            match from_document::<Order>(doc) {
                Ok(order) => orders.push(order),
                Err(e) => tracing::warn!(error = %e, "Skipping malformed order document"),
            }
        }
        let report = Self::build(&orders, filter.range());
        tracing::debug!(
            orders = report.metrics.total_orders,
            total_sales = report.metrics.total_sales,
            "Sales report built"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::order::{LineItem, OrderStatus, StatusEntry};

    const MINUTE: i64 = 60_000;

    fn item(price: f64, qty: u32) -> LineItem {
        serde_json::from_value(serde_json::json!({
            "pid": "p",
            "title": "Item",
            "price": price,
            "qnt": qty,
            "addonsTotal": 5.0
        }))
        .unwrap()
    }

    fn order(date: i64, items: Vec<LineItem>, pay_mode: PaymentMode) -> Order {
        let placed = StatusEntry::new(OrderStatus::Placed, date);
        Order {
            id: format!("o{}", date),
            bill_no: 1,
            items,
            seller_id: None,
            price_variant: None,
            table_id: None,
            discount: 0.0,
            paid: pay_mode != PaymentMode::Credit,
            pay_mode,
            status: vec![placed.clone()],
            current_status: placed,
            charges: vec![],
            cust_id: None,
            cust_name: None,
            cust_phone: None,
            tax_update_info: None,
            instructions: String::new(),
            date,
            version: 0,
        }
    }

    fn completed(mut order: Order, after_minutes: i64) -> Order {
        let entry = StatusEntry::new(OrderStatus::Completed, order.date + after_minutes * MINUTE);
        order.status.push(entry.clone());
        order.current_status = entry;
        order
    }

    #[test]
    fn test_date_ranges() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 15, 30, 0).unwrap();
        let midnight = Utc
            .with_ymd_and_hms(2026, 3, 10, 0, 0, 0)
            .unwrap()
            .timestamp_millis();
        let day = 24 * 60 * MINUTE;

        let today = DateFilter::Today.range_at(now).unwrap();
        assert_eq!(today.start, midnight);
        assert_eq!(today.end, now.timestamp_millis());

        let yesterday = DateFilter::Yesterday.range_at(now).unwrap();
        assert_eq!(yesterday, DateRange { start: midnight - day, end: midnight });

        assert_eq!(DateFilter::Last7.range_at(now).unwrap().start, midnight - 7 * day);
        assert_eq!(DateFilter::Last30.range_at(now).unwrap().start, midnight - 30 * day);
        assert_eq!(
            DateFilter::Custom { start: 5, end: None }.range_at(now).unwrap().end,
            now.timestamp_millis()
        );
        assert!(DateFilter::All.range_at(now).is_none());
    }

    #[test]
    fn test_previous_range() {
        let range = DateRange { start: 100, end: 160 };
        assert_eq!(range.previous(), DateRange { start: 40, end: 100 });
        assert!(range.contains(100) && range.contains(160));
        assert!(!range.contains(161));
    }

    #[test]
    fn test_metrics() {
        let mut online = order(0, vec![item(100.0, 1)], PaymentMode::Digital);
        online.price_variant = Some("ONLINE_ZOMATO".into());
        let mut dine_in = completed(order(0, vec![item(50.0, 2)], PaymentMode::Cash), 30);
        dine_in.table_id = Some("T4".into());
        let credit = completed(order(0, vec![item(20.0, 1)], PaymentMode::Credit), 10);

        let metrics = SalesMetrics::from_orders([&online, &dine_in, &credit]);
        // add-ons are not counted
        assert_eq!(metrics.total_sales, 220.0);
        assert_eq!(metrics.total_orders, 3);
        assert!((metrics.avg_order_value - 220.0 / 3.0).abs() < 1e-9);
        assert_eq!(metrics.avg_turnaround_minutes, 20.0);
        assert_eq!(metrics.online_sales, 100.0);
        assert_eq!(metrics.offline_sales, 120.0);
        assert_eq!(metrics.dine_in_sales, 100.0);
        assert_eq!(metrics.sales_by_pay_mode.get("CREDIT"), Some(&20.0));
        // payable total includes the add-on
        assert_eq!(metrics.outstanding_credit, 25.0);
    }

    #[test]
    fn test_empty_metrics() {
        let metrics = SalesMetrics::from_orders(std::iter::empty());
        assert_eq!(metrics, SalesMetrics::default());
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(percent_change(150.0, 100.0), 50.0);
        assert_eq!(percent_change(50.0, 100.0), -50.0);
        assert_eq!(percent_change(10.0, 0.0), 100.0);
        assert_eq!(percent_change(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_report_trends() {
        let range = DateRange {
            start: 1_000 * MINUTE,
            end: 2_000 * MINUTE,
        };
        let orders = vec![
            order(500 * MINUTE, vec![item(100.0, 1)], PaymentMode::Cash),
            order(1_500 * MINUTE, vec![item(100.0, 1)], PaymentMode::Cash),
            order(1_600 * MINUTE, vec![item(50.0, 1)], PaymentMode::Cash),
            order(5_000 * MINUTE, vec![item(999.0, 1)], PaymentMode::Cash),
        ];

        let report = SalesReport::build(&orders, Some(range));
        assert_eq!(report.metrics.total_orders, 2);
        assert_eq!(report.metrics.total_sales, 150.0);
        assert_eq!(report.trends.sales, 50.0);
        assert_eq!(report.trends.orders, 100.0);
        assert_eq!(report.trends.order_value, -25.0);
    }

    #[test]
    fn test_report_without_previous_orders_has_flat_trends() {
        let range = DateRange { start: 1_000, end: 2_000 };
        let orders = vec![order(1_500, vec![item(10.0, 1)], PaymentMode::Cash)];
        let report = SalesReport::build(&orders, Some(range));
        assert_eq!(report.trends, Trends::default());

        let all = SalesReport::build(&orders, None);
        assert_eq!(all.metrics.total_orders, 1);
    }
}
