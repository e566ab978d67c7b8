//! Top Holdings Component
//!
//! Bar chart of the largest holdings, drawn on a canvas.

use leptos::*;
use web_sys::HtmlCanvasElement;

use crate::components::chart::{self, Frame, ACCENT, LABEL};
use crate::format::format_holding_size;
use crate::state::{use_upload_store, TopHolding};

/// Holdings in chart order: largest first, ties keep their received order
pub fn chart_order(holdings: &[TopHolding]) -> Vec<TopHolding> {
    let mut ordered = holdings.to_vec();
    ordered.sort_by(|a, b| b.holding_size.total_cmp(&a.holding_size));
    ordered
}

/// Top holdings chart, hidden until an upload succeeds
#[component]
pub fn TopHoldings() -> impl IntoView {
    let store = use_upload_store();
    let canvas_ref = create_node_ref::<html::Canvas>();

    let holdings = create_memo(move |_| {
        store.with_state(|s| s.top_holdings().map(chart_order).unwrap_or_default())
    });

    // Redraw when the data changes or the canvas mounts
    create_effect(move |_| {
        let holdings = holdings.get();
        if let Some(canvas) = canvas_ref.get() {
            draw_bars(&canvas, &holdings);
        }
    });

    view! {
        <Show when=move || holdings.with(|h| !h.is_empty())>
            <section class="bg-gray-800 rounded-xl p-6">
                <h2 class="text-xl font-semibold mb-4">
                    {move || format!("Top Holdings ({})", holdings.with(|h| h.len()))}
                </h2>
                <canvas
                    node_ref=canvas_ref
                    width="800"
                    height="400"
                    class="w-full h-64 md:h-96 rounded-lg"
                />
            </section>
        </Show>
    }
}

/// One vertical bar per holding, left to right in chart order
fn draw_bars(canvas: &HtmlCanvasElement, holdings: &[TopHolding]) {
    let Some(ctx) = chart::context_2d(canvas) else {
        return;
    };

    let frame = Frame::new(canvas.width() as f64, canvas.height() as f64);
    chart::clear(&ctx, &frame);

    if holdings.is_empty() {
        return;
    }

    let largest = holdings
        .iter()
        .map(|h| h.holding_size)
        .fold(0.0_f64, f64::max);
    let max = if largest > 0.0 { largest * 1.1 } else { 1.0 };
    chart::draw_y_grid(&ctx, &frame, 0.0, max);

    let slot = frame.chart_width() / holdings.len() as f64;
    let bar_width = slot * 0.7;

    ctx.set_font("12px sans-serif");
    ctx.set_text_align("center");

    for (i, holding) in holdings.iter().enumerate() {
        let x = frame.margin_left + i as f64 * slot + (slot - bar_width) / 2.0;
        let y = frame.y_for(holding.holding_size.max(0.0), 0.0, max);
        let base = frame.margin_top + frame.chart_height();

        ctx.set_fill_style(&ACCENT.into());
        ctx.fill_rect(x, y, bar_width, base - y);

        ctx.set_fill_style(&LABEL.into());
        let center = x + bar_width / 2.0;
        let _ = ctx.fill_text(&format_holding_size(holding.holding_size), center, y - 6.0);
        let _ = ctx.fill_text(&holding.name, center, frame.height - 15.0);
    }

    ctx.set_text_align("start");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holding(name: &str, holding_size: f64) -> TopHolding {
        TopHolding {
            name: name.to_string(),
            holding_size,
        }
    }

    fn names(holdings: &[TopHolding]) -> Vec<&str> {
        holdings.iter().map(|h| h.name.as_str()).collect()
    }

    #[test]
    fn test_largest_holding_first() {
        let holdings = vec![holding("A", 0.5), holding("B", 0.3), holding("C", 0.2)];
        assert_eq!(names(&chart_order(&holdings)), vec!["A", "B", "C"]);

        let ascending = vec![holding("C", 0.2), holding("B", 0.3), holding("A", 0.5)];
        assert_eq!(names(&chart_order(&ascending)), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_ties_keep_received_order() {
        let holdings = vec![holding("X", 0.1), holding("Y", 0.4), holding("Z", 0.1)];
        assert_eq!(names(&chart_order(&holdings)), vec!["Y", "X", "Z"]);
    }

    #[test]
    fn test_values_not_rounded() {
        let ordered = chart_order(&[holding("A", 0.123456)]);
        assert_eq!(ordered[0].holding_size, 0.123456);
    }
}
