//! Text Report
//!
//! Renders an [`EtfReport`] for the terminal: the constituents table, the
//! top holdings ranking and the ETF price summary. All values here are
//! derived at render time and never written back into the report.

use std::fmt::Write;

use crate::etf::{Constituent, EtfReport, PricePoint, TopHolding};

/// Weight fraction as a percentage with 3 decimals (0.07 -> "7.000%")
pub fn format_weight(weight: f64) -> String {
    format!("{:.3}%", weight * 100.0)
}

/// Price as currency with 2 decimals (150.234 -> "$150.23")
pub fn format_price(price: f64) -> String {
    format!("${:.2}", price)
}

pub fn format_holding_size(size: f64) -> String {
    format!("{:.3}", size)
}

/// Case-insensitive substring match on the ticker. A blank query keeps
/// every row in the order received.
pub fn filter_constituents<'a>(constituents: &'a [Constituent], query: &str) -> Vec<&'a Constituent> {
    let query = query.trim().to_lowercase();
    constituents
        .iter()
        .filter(|c| query.is_empty() || c.name.to_lowercase().contains(&query))
        .collect()
}

/// Holdings largest first; ties keep their received order
pub fn top_holdings_order(holdings: &[TopHolding]) -> Vec<&TopHolding> {
    let mut ordered: Vec<&TopHolding> = holdings.iter().collect();
    ordered.sort_by(|a, b| b.holding_size.total_cmp(&a.holding_size));
    ordered
}

/// Minimum, maximum and latest ETF price
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceSummary {
    pub min: f64,
    pub max: f64,
    pub latest: f64,
}

/// Summarize a price series; `None` when it is empty
pub fn summarize(prices: &[PricePoint]) -> Option<PriceSummary> {
    let latest = prices.last()?.price;
    let (min, max) = prices
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), p| {
            (min.min(p.price), max.max(p.price))
        });

    Some(PriceSummary { min, max, latest })
}

/// Render the full report, optionally filtering constituents by ticker
pub fn render(report: &EtfReport, search: Option<&str>) -> String {
    let mut out = String::new();
    render_constituents(&mut out, &report.constituents, search.unwrap_or_default());
    out.push('\n');
    render_top_holdings(&mut out, &report.top_holdings);
    out.push('\n');
    render_prices(&mut out, &report.etf_prices);
    out
}

fn render_constituents(out: &mut String, constituents: &[Constituent], search: &str) {
    let rows = filter_constituents(constituents, search);

    let _ = writeln!(out, "Constituents ({})", constituents.len());
    if !search.trim().is_empty() {
        let _ = writeln!(out, "{} of {} stocks", rows.len(), constituents.len());
    }
    let _ = writeln!(out, "{:<10} {:>10} {:>12}", "Symbol", "Weight", "Price");
    let _ = writeln!(out, "{}", "-".repeat(34));

    if rows.is_empty() {
        let _ = writeln!(out, "No stocks found");
        return;
    }

    for c in rows {
        let _ = writeln!(
            out,
            "{:<10} {:>10} {:>12}",
            c.name,
            format_weight(c.weight),
            format_price(c.price)
        );
    }
}

fn render_top_holdings(out: &mut String, holdings: &[TopHolding]) {
    let _ = writeln!(out, "Top Holdings ({})", holdings.len());

    let ordered = top_holdings_order(holdings);
    let largest = ordered.first().map(|h| h.holding_size).unwrap_or_default();

    for h in ordered {
        let width = if largest > 0.0 {
            ((h.holding_size / largest) * 30.0).round().max(0.0) as usize
        } else {
            0
        };
        let _ = writeln!(
            out,
            "{:<10} {:<30} {}",
            h.name,
            "#".repeat(width),
            format_holding_size(h.holding_size)
        );
    }
}

fn render_prices(out: &mut String, prices: &[PricePoint]) {
    let _ = writeln!(out, "ETF Price History ({} days)", prices.len());

    let Some(summary) = summarize(prices) else {
        let _ = writeln!(out, "No price data");
        return;
    };

    if let (Some(first), Some(last)) = (prices.first(), prices.last()) {
        let _ = writeln!(out, "{} to {}", first.date, last.date);
    }
    let _ = writeln!(out, "Minimum: {}", format_price(summary.min));
    let _ = writeln!(out, "Maximum: {}", format_price(summary.max));
    let _ = writeln!(out, "Latest:  {}", format_price(summary.latest));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constituent(name: &str, weight: f64, price: f64) -> Constituent {
        Constituent {
            name: name.to_string(),
            weight,
            price,
        }
    }

    fn holding(name: &str, holding_size: f64) -> TopHolding {
        TopHolding {
            name: name.to_string(),
            holding_size,
        }
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_weight(0.07), "7.000%");
        assert_eq!(format_weight(0.12345), "12.345%");
        assert_eq!(format_price(150.23), "$150.23");
        assert_eq!(format_price(102.5), "$102.50");
        assert_eq!(format_holding_size(0.07), "0.070");
    }

    #[test]
    fn test_search_filter() {
        let rows = vec![constituent("AAPL", 0.5, 1.0), constituent("MSFT", 0.5, 2.0)];

        let names: Vec<&str> = filter_constituents(&rows, "aap").iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["AAPL"]);

        let names: Vec<&str> = filter_constituents(&rows, "  ").iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["AAPL", "MSFT"]);

        assert!(filter_constituents(&rows, "XYZ").is_empty());
    }

    #[test]
    fn test_top_holdings_largest_first() {
        let holdings = vec![holding("C", 0.2), holding("A", 0.5), holding("B", 0.3), holding("D", 0.2)];

        let names: Vec<&str> = top_holdings_order(&holdings).iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_price_summary() {
        let prices = vec![
            PricePoint { date: "2024-01-02".into(), price: 101.0 },
            PricePoint { date: "2024-01-03".into(), price: 99.5 },
            PricePoint { date: "2024-01-04".into(), price: 102.5 },
        ];

        assert_eq!(
            summarize(&prices),
            Some(PriceSummary { min: 99.5, max: 102.5, latest: 102.5 })
        );
        assert_eq!(summarize(&[]), None);
    }

    #[test]
    fn test_render_report() {
        let report = EtfReport {
            constituents: vec![constituent("AAPL", 0.07, 150.23)],
            top_holdings: vec![holding("AAPL", 0.07)],
            etf_prices: vec![PricePoint { date: "2024-01-02".into(), price: 102.5 }],
        };

        let text = render(&report, None);
        assert!(text.contains("Constituents (1)"));
        assert!(text.contains("7.000%"));
        assert!(text.contains("$150.23"));
        assert!(text.contains("Top Holdings (1)"));
        assert!(text.contains("Latest:  $102.50"));

        let text = render(&report, Some("msft"));
        assert!(text.contains("0 of 1 stocks"));
        assert!(text.contains("No stocks found"));
    }
}
