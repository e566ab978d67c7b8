//! ETF Prices Component
//!
//! Price history line chart with a time range selector, plus data point,
//! minimum, maximum and latest price tiles over the whole series.

use chrono::{Days, Months, NaiveDate};
use leptos::*;
use web_sys::HtmlCanvasElement;

use crate::components::chart::{self, Frame, ACCENT, LABEL};
use crate::format::format_price;
use crate::state::{use_upload_store, PricePoint};

/// Summary statistics of a price series
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceSummary {
    pub min: f64,
    pub max: f64,
    pub latest: f64,
}

/// `None` for an empty series
pub fn summarize(prices: &[PricePoint]) -> Option<PriceSummary> {
    let latest = prices.last()?.price;
    let (min, max) = prices
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), p| {
            (min.min(p.price), max.max(p.price))
        });

    Some(PriceSummary { min, max, latest })
}

/// Chart window, counted back from the latest date in the series
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PriceRange {
    Week,
    Month,
    ThreeMonths,
    SixMonths,
    Year,
    #[default]
    All,
}

impl PriceRange {
    /// Selector order
    pub const OPTIONS: [PriceRange; 6] = [
        PriceRange::Week,
        PriceRange::Month,
        PriceRange::ThreeMonths,
        PriceRange::SixMonths,
        PriceRange::Year,
        PriceRange::All,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PriceRange::Week => "1w",
            PriceRange::Month => "1m",
            PriceRange::ThreeMonths => "3m",
            PriceRange::SixMonths => "6m",
            PriceRange::Year => "1y",
            PriceRange::All => "All",
        }
    }

    /// First date inside the window ending at `latest`; `None` means unbounded
    pub fn start(self, latest: NaiveDate) -> Option<NaiveDate> {
        match self {
            PriceRange::Week => latest.checked_sub_days(Days::new(7)),
            PriceRange::Month => latest.checked_sub_months(Months::new(1)),
            PriceRange::ThreeMonths => latest.checked_sub_months(Months::new(3)),
            PriceRange::SixMonths => latest.checked_sub_months(Months::new(6)),
            PriceRange::Year => latest.checked_sub_months(Months::new(12)),
            PriceRange::All => None,
        }
    }
}

fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Points of `prices` inside `range`, in received order
///
/// Points whose date does not parse are only shown for [`PriceRange::All`].
pub fn slice_range(prices: &[PricePoint], range: PriceRange) -> Vec<PricePoint> {
    let latest = prices.iter().filter_map(|p| parse_date(&p.date)).max();

    match latest.and_then(|latest| range.start(latest)) {
        Some(start) => prices
            .iter()
            .filter(|p| parse_date(&p.date).is_some_and(|d| d >= start))
            .cloned()
            .collect(),
        None => prices.to_vec(),
    }
}

/// Price history chart, hidden until an upload succeeds
#[component]
pub fn EtfPrices() -> impl IntoView {
    let store = use_upload_store();
    let canvas_ref = create_node_ref::<html::Canvas>();
    let range = create_rw_signal(PriceRange::default());

    let prices = create_memo(move |_| {
        store.with_state(|s| s.etf_prices().map(|p| p.to_vec()).unwrap_or_default())
    });
    let summary = create_memo(move |_| prices.with(|p| summarize(p)));
    let visible = create_memo(move |_| prices.with(|p| slice_range(p, range.get())));

    // Redraw when the data or the range changes
    create_effect(move |_| {
        let visible = visible.get();
        if let Some(canvas) = canvas_ref.get() {
            draw_line(&canvas, &visible);
        }
    });

    view! {
        <Show when=move || summary.get().is_some()>
            <section class="bg-gray-800 rounded-xl p-6">
                <h2 class="text-xl font-semibold mb-4">"ETF Price History"</h2>

                <div class="grid grid-cols-2 md:grid-cols-4 gap-4 mb-4">
                    <div class="bg-gray-700 rounded-lg p-4 text-center">
                        <div class="text-sm text-gray-400">"Data Points"</div>
                        <div class="text-2xl font-semibold">
                            {move || format!("{} days", prices.with(|p| p.len()))}
                        </div>
                    </div>
                    <StatTile label="Minimum" value=Signal::derive(move || summary.get().map(|s| s.min)) />
                    <StatTile label="Maximum" value=Signal::derive(move || summary.get().map(|s| s.max)) />
                    <StatTile label="Latest" value=Signal::derive(move || summary.get().map(|s| s.latest)) />
                </div>

                <canvas
                    node_ref=canvas_ref
                    width="800"
                    height="400"
                    class="w-full h-64 md:h-96 rounded-lg"
                />

                <div class="flex justify-center space-x-2 mt-4">
                    {PriceRange::OPTIONS
                        .into_iter()
                        .map(|option| view! { <RangeButton option=option selected=range /> })
                        .collect_view()}
                </div>
            </section>
        </Show>
    }
}

#[component]
fn RangeButton(option: PriceRange, selected: RwSignal<PriceRange>) -> impl IntoView {
    view! {
        <button
            on:click=move |_| selected.set(option)
            class=move || {
                let base = "px-4 py-2 rounded-lg text-sm font-medium transition-colors";
                if selected.get() == option {
                    format!("{} bg-primary-600 text-white", base)
                } else {
                    format!("{} bg-gray-700 text-gray-300 hover:bg-gray-600", base)
                }
            }
        >
            {option.label()}
        </button>
    }
}

#[component]
fn StatTile(label: &'static str, value: Signal<Option<f64>>) -> impl IntoView {
    view! {
        <div class="bg-gray-700 rounded-lg p-4 text-center">
            <div class="text-sm text-gray-400">{label}</div>
            <div class="text-2xl font-semibold">
                {move || value.get().map(format_price).unwrap_or_default()}
            </div>
        </div>
    }
}

/// Line through the prices in received order, with a few date labels
fn draw_line(canvas: &HtmlCanvasElement, prices: &[PricePoint]) {
    let Some(ctx) = chart::context_2d(canvas) else {
        return;
    };

    let frame = Frame::new(canvas.width() as f64, canvas.height() as f64);
    chart::clear(&ctx, &frame);

    let Some((min, max)) = chart::value_range(prices.iter().map(|p| p.price)) else {
        return;
    };
    chart::draw_y_grid(&ctx, &frame, min, max);

    let count = prices.len();
    ctx.set_stroke_style(&ACCENT.into());
    ctx.set_line_width(2.0);
    ctx.begin_path();
    for (i, point) in prices.iter().enumerate() {
        let x = frame.x_for(i, count);
        let y = frame.y_for(point.price, min, max);
        if i == 0 {
            ctx.move_to(x, y);
        } else {
            ctx.line_to(x, y);
        }
    }
    ctx.stroke();

    // Date labels at up to 6 evenly spaced points
    ctx.set_fill_style(&LABEL.into());
    ctx.set_font("12px sans-serif");
    let step = (count / 5).max(1);
    for (i, point) in prices.iter().enumerate().step_by(step) {
        let x = frame.x_for(i, count);
        let _ = ctx.fill_text(&point.date, x - 30.0, frame.height - 10.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(date: &str, price: f64) -> PricePoint {
        PricePoint {
            date: date.to_string(),
            price,
        }
    }

    #[test]
    fn test_summary() {
        let prices = vec![
            point("2024-01-02", 101.0),
            point("2024-01-03", 99.25),
            point("2024-01-04", 103.75),
            point("2024-01-05", 102.5),
        ];

        assert_eq!(
            summarize(&prices),
            Some(PriceSummary { min: 99.25, max: 103.75, latest: 102.5 })
        );
    }

    #[test]
    fn test_latest_follows_received_order() {
        // not re-sorted by date
        let prices = vec![point("2024-01-05", 90.0), point("2024-01-02", 110.0)];
        assert_eq!(summarize(&prices).map(|s| s.latest), Some(110.0));
    }

    #[test]
    fn test_single_point_tiles() {
        let summary = summarize(&[point("2024-01-02", 102.5)]).unwrap();
        assert_eq!(format_price(summary.latest), "$102.50");
        assert_eq!(format_price(summary.min), "$102.50");
        assert_eq!(format_price(summary.max), "$102.50");
    }

    #[test]
    fn test_empty_series() {
        assert_eq!(summarize(&[]), None);
        assert!(slice_range(&[], PriceRange::Month).is_empty());
    }

    fn dates(points: &[PricePoint]) -> Vec<&str> {
        points.iter().map(|p| p.date.as_str()).collect()
    }

    fn daily(start: &str, days: u64) -> Vec<PricePoint> {
        let start = parse_date(start).unwrap();
        (0..days)
            .map(|i| {
                let date = start.checked_add_days(Days::new(i)).unwrap();
                point(&date.format("%Y-%m-%d").to_string(), 100.0 + i as f64)
            })
            .collect()
    }

    #[test]
    fn test_week_counts_back_from_latest_date() {
        let prices = daily("2024-01-01", 31);
        let week = slice_range(&prices, PriceRange::Week);

        assert_eq!(week.len(), 8);
        assert_eq!(week.first().map(|p| p.date.as_str()), Some("2024-01-24"));
        assert_eq!(week.last().map(|p| p.date.as_str()), Some("2024-01-31"));
        // received data untouched
        assert_eq!(prices.len(), 31);
    }

    #[test]
    fn test_month_window_uses_calendar_months() {
        let prices = vec![
            point("2024-02-28", 1.0),
            point("2024-02-29", 2.0),
            point("2024-03-15", 3.0),
            point("2024-03-31", 4.0),
        ];

        assert_eq!(
            dates(&slice_range(&prices, PriceRange::Month)),
            vec!["2024-02-29", "2024-03-15", "2024-03-31"]
        );
    }

    #[test]
    fn test_window_longer_than_series() {
        let prices = daily("2024-01-01", 10);

        assert_eq!(slice_range(&prices, PriceRange::Year), prices);
        assert_eq!(slice_range(&prices, PriceRange::All), prices);
    }

    #[test]
    fn test_single_point_series() {
        let prices = vec![point("2024-01-02", 102.5)];

        for range in PriceRange::OPTIONS {
            assert_eq!(slice_range(&prices, range), prices, "range {}", range.label());
        }
    }

    #[test]
    fn test_slice_keeps_received_order() {
        let prices = vec![
            point("2024-01-05", 90.0),
            point("2023-06-01", 80.0),
            point("2024-01-02", 110.0),
        ];

        assert_eq!(
            dates(&slice_range(&prices, PriceRange::Week)),
            vec!["2024-01-05", "2024-01-02"]
        );
        assert_eq!(slice_range(&prices, PriceRange::All), prices);
    }

    #[test]
    fn test_range_labels() {
        let labels: Vec<&str> = PriceRange::OPTIONS.iter().map(|r| r.label()).collect();
        assert_eq!(labels, vec!["1w", "1m", "3m", "6m", "1y", "All"]);
        assert_eq!(PriceRange::default(), PriceRange::All);
    }
}
