//! Constituents Component
//!
//! Searchable, sortable table of the ETF's constituents. Search text and
//! sort order are local to the view.

use leptos::*;

use crate::format::{format_price, format_weight};
use crate::state::{use_upload_store, Constituent};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortColumn {
    Symbol,
    Weight,
    Price,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

pub type Sort = Option<(SortColumn, SortDirection)>;

/// Clicking a header cycles ascending, descending, then received order
pub fn next_sort(current: Sort, clicked: SortColumn) -> Sort {
    match current {
        Some((column, SortDirection::Ascending)) if column == clicked => {
            Some((clicked, SortDirection::Descending))
        }
        Some((column, SortDirection::Descending)) if column == clicked => None,
        _ => Some((clicked, SortDirection::Ascending)),
    }
}

/// Rows whose ticker contains `query`, ignoring case. Blank keeps everything.
pub fn filter_constituents(rows: &[Constituent], query: &str) -> Vec<Constituent> {
    let query = query.trim().to_lowercase();
    rows.iter()
        .filter(|c| query.is_empty() || c.name.to_lowercase().contains(&query))
        .cloned()
        .collect()
}

/// Stable sort; `None` leaves the received order
pub fn sort_constituents(rows: &mut [Constituent], sort: Sort) {
    let Some((column, direction)) = sort else {
        return;
    };

    rows.sort_by(|a, b| {
        let ordering = match column {
            SortColumn::Symbol => a.name.cmp(&b.name),
            SortColumn::Weight => a.weight.total_cmp(&b.weight),
            SortColumn::Price => a.price.total_cmp(&b.price),
        };
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

fn sort_indicator(sort: Sort, column: SortColumn) -> &'static str {
    match sort {
        Some((c, SortDirection::Ascending)) if c == column => " ▲",
        Some((c, SortDirection::Descending)) if c == column => " ▼",
        _ => "",
    }
}

/// Constituents table, hidden until an upload succeeds
#[component]
pub fn Constituents() -> impl IntoView {
    let store = use_upload_store();

    let rows = create_memo(move |_| {
        store.with_state(|s| s.constituents().map(|c| c.to_vec()).unwrap_or_default())
    });

    let (search, set_search) = create_signal(String::new());
    let (sort, set_sort) = create_signal(None::<(SortColumn, SortDirection)>);

    let visible = create_memo(move |_| {
        let mut filtered = rows.with(|r| filter_constituents(r, &search.get()));
        sort_constituents(&mut filtered, sort.get());
        filtered
    });

    let header = move |label: &'static str, column: SortColumn| {
        view! {
            <th
                class="px-4 py-2 text-left cursor-pointer select-none hover:text-white"
                on:click=move |_| set_sort.update(|s| *s = next_sort(*s, column))
            >
                {label}
                {move || sort_indicator(sort.get(), column)}
            </th>
        }
    };

    move || {
        let total = rows.with(|r| r.len());
        if total == 0 {
            return view! {}.into_view();
        }

        view! {
            <section class="bg-gray-800 rounded-xl p-6">
                <div class="flex items-center justify-between mb-4">
                    <h2 class="text-xl font-semibold">{format!("Constituents ({})", total)}</h2>
                    <span class="text-sm text-gray-400">
                        {move || format!("{} of {} stocks", visible.with(|v| v.len()), total)}
                    </span>
                </div>

                <div class="flex space-x-2 mb-4">
                    <input
                        type="text"
                        placeholder="Search by symbol..."
                        prop:value=search
                        on:input=move |ev| set_search.set(event_target_value(&ev))
                        class="flex-1 bg-gray-700 rounded-lg px-4 py-2 text-white placeholder-gray-400"
                    />
                    <button
                        type="button"
                        on:click=move |_| set_search.set(String::new())
                        class="px-4 py-2 bg-gray-600 hover:bg-gray-500 rounded-lg text-sm"
                    >
                        "Clear"
                    </button>
                </div>

                <table class="w-full text-sm">
                    <thead class="text-gray-400 border-b border-gray-700">
                        <tr>
                            {header("Symbol", SortColumn::Symbol)}
                            {header("Weight", SortColumn::Weight)}
                            {header("Price", SortColumn::Price)}
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            let rows = visible.get();
                            if rows.is_empty() {
                                return view! {
                                    <tr>
                                        <td colspan="3" class="px-4 py-6 text-center text-gray-500">
                                            "No stocks found"
                                        </td>
                                    </tr>
                                }
                                .into_view();
                            }

                            rows.into_iter()
                                .map(|c| view! {
                                    <tr class="border-b border-gray-700/50">
                                        <td class="px-4 py-2 font-medium">{c.name}</td>
                                        <td class="px-4 py-2">{format_weight(c.weight)}</td>
                                        <td class="px-4 py-2">{format_price(c.price)}</td>
                                    </tr>
                                })
                                .collect_view()
                        }}
                    </tbody>
                </table>
            </section>
        }
        .into_view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<Constituent> {
        vec![
            Constituent { name: "MSFT".into(), weight: 0.3, price: 190.0 },
            Constituent { name: "AAPL".into(), weight: 0.5, price: 110.0 },
            Constituent { name: "NVDA".into(), weight: 0.2, price: 60.0 },
        ]
    }

    fn names(rows: &[Constituent]) -> Vec<&str> {
        rows.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let rows = vec![
            Constituent { name: "AAPL".into(), weight: 0.5, price: 1.0 },
            Constituent { name: "MSFT".into(), weight: 0.5, price: 1.0 },
        ];

        assert_eq!(names(&filter_constituents(&rows, "AAP")), vec!["AAPL"]);
        assert_eq!(names(&filter_constituents(&rows, "sf")), vec!["MSFT"]);
        assert_eq!(names(&filter_constituents(&rows, "")), vec!["AAPL", "MSFT"]);
        assert_eq!(names(&filter_constituents(&rows, "   ")), vec!["AAPL", "MSFT"]);
        assert!(filter_constituents(&rows, "XYZ").is_empty());
    }

    #[test]
    fn test_sort_cycle() {
        let s = next_sort(None, SortColumn::Weight);
        assert_eq!(s, Some((SortColumn::Weight, SortDirection::Ascending)));

        let s = next_sort(s, SortColumn::Weight);
        assert_eq!(s, Some((SortColumn::Weight, SortDirection::Descending)));

        assert_eq!(next_sort(s, SortColumn::Weight), None);
        assert_eq!(
            next_sort(s, SortColumn::Price),
            Some((SortColumn::Price, SortDirection::Ascending))
        );
    }

    #[test]
    fn test_sorting() {
        let mut r = rows();
        sort_constituents(&mut r, Some((SortColumn::Symbol, SortDirection::Ascending)));
        assert_eq!(names(&r), vec!["AAPL", "MSFT", "NVDA"]);

        sort_constituents(&mut r, Some((SortColumn::Weight, SortDirection::Descending)));
        assert_eq!(names(&r), vec!["AAPL", "MSFT", "NVDA"]);

        sort_constituents(&mut r, Some((SortColumn::Price, SortDirection::Ascending)));
        assert_eq!(names(&r), vec!["NVDA", "AAPL", "MSFT"]);

        let mut r = rows();
        sort_constituents(&mut r, None);
        assert_eq!(names(&r), vec!["MSFT", "AAPL", "NVDA"]);
    }
}
