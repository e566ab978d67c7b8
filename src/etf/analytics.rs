//! ETF Analytics
//!
//! Combines validated holdings with price history to produce the ETF price
//! series, the constituent listing and the top holdings ranking.

use super::error::{EtfError, EtfResult};
use super::prices::PriceSource;
use super::types::{Constituent, EtfReport, Holding, PricePoint, TopHolding};

/// Number of top holdings returned when the caller does not ask for a count
pub const DEFAULT_TOP_HOLDINGS_COUNT: usize = 10;

/// Compute all datasets for an ETF
///
/// - ETF price per date is the weighted sum of constituent prices (2 dp)
/// - Constituent prices and holding sizes use the latest date (3 dp)
/// - Constituents are sorted by name, top holdings by size descending
pub fn calculate_etf_data(
    holdings: &[Holding],
    prices: &dyn PriceSource,
    top_holdings_count: usize,
) -> EtfResult<EtfReport> {
    let dates = prices.dates();
    if dates.is_empty() {
        return Err(EtfError::Unexpected("price table has no rows".to_string()));
    }

    let series = holdings
        .iter()
        .map(|h| {
            prices
                .series(&h.name)
                .map(|s| (h, s))
                .ok_or_else(|| EtfError::StockPriceNotFound {
                    stock: h.name.clone(),
                    date: None,
                })
        })
        .collect::<EtfResult<Vec<_>>>()?;

    let mut etf_prices = Vec::with_capacity(dates.len());
    for (idx, date) in dates.iter().enumerate() {
        let mut price = 0.0;
        for (holding, column) in &series {
            let stock_price =
                column
                    .get(idx)
                    .copied()
                    .flatten()
                    .ok_or_else(|| EtfError::StockPriceNotFound {
                        stock: holding.name.clone(),
                        date: Some(date.format("%Y-%m-%d").to_string()),
                    })?;
            price += holding.weight * stock_price;
        }

        etf_prices.push(PricePoint {
            date: date.format("%Y-%m-%d").to_string(),
            price: round_to(price, 2),
        });
    }

    let latest = dates.len() - 1;
    let mut constituents = Vec::with_capacity(series.len());
    let mut top_holdings = Vec::with_capacity(series.len());

    for (holding, column) in &series {
        // every slot was checked while building the price series
        let last_price = column.get(latest).copied().flatten().unwrap_or_default();

        constituents.push(Constituent {
            name: holding.name.clone(),
            weight: holding.weight,
            price: round_to(last_price, 3),
        });
        top_holdings.push(TopHolding {
            name: holding.name.clone(),
            holding_size: round_to(holding.weight * last_price, 3),
        });
    }

    top_holdings.sort_by(|a, b| b.holding_size.total_cmp(&a.holding_size));
    top_holdings.truncate(top_holdings_count);
    constituents.sort_by(|a, b| a.name.cmp(&b.name));

    tracing::debug!(
        constituents = constituents.len(),
        top_holdings = top_holdings.len(),
        dates = etf_prices.len(),
        "ETF data calculated"
    );

    Ok(EtfReport {
        constituents,
        top_holdings,
        etf_prices,
    })
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
