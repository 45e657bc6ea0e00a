//! Pure derivations over loaded product data.
//!
//! Nothing in this crate touches storage: each function takes rows that a
//! query already selected and turns them into chart-ready values.

/// Scaling and rounding for displayed numbers.
pub mod display {
    /// Flow counts are displayed in millions of items.
    pub const DISPLAY_DIVISOR: f64 = 1_000_000.0;

    /// Round to one decimal place, ties to even on the value times ten.
    ///
    /// `1.25 -> 1.2`, `3.75 -> 3.8`. Matches the rounding spreadsheet and
    /// dataframe tooling applies when the same figures are prepared there.
    pub fn round_one_decimal(value: f64) -> f64 {
        (value * 10.0).round_ties_even() / 10.0
    }

    /// Convert a raw item count to rounded millions.
    pub fn to_millions(count: f64) -> f64 {
        round_one_decimal(count / DISPLAY_DIVISOR)
    }

}

/// Windowed flow series and cumulative totals.
pub mod flow {
    use crate::display::to_millions;
    use pdh_types::{CumulativeTotal, WindowedFlow, YearValue, YearWindow};

    /// Restrict raw yearly counts to `window` and summarize them.
    ///
    /// `points` carry unscaled item counts and may arrive in any order.
    /// The series comes back ascending by year, each value in rounded
    /// millions. The total is summed on the unscaled counts before the
    /// same scaling and rounding, so it can differ from the sum of the
    /// rounded bars. A window that keeps no points yields
    /// [`WindowedFlow::empty`].
    pub fn summarize_window(points: &[YearValue], window: &YearWindow) -> WindowedFlow {
        let mut in_window: Vec<YearValue> = points
            .iter()
            .filter(|p| window.contains(p.year))
            .copied()
            .collect();

        if in_window.is_empty() {
            log::debug!("[PDH] flow: no years inside window {}", window);
            return WindowedFlow::empty();
        }

        in_window.sort_by_key(|p| p.year);

        let raw_total: f64 = in_window.iter().map(|p| p.value).sum();
        // Non-empty, so there is a last element
        let as_of = in_window[in_window.len() - 1].year;

        let series = in_window
            .into_iter()
            .map(|p| YearValue {
                year: p.year,
                value: to_millions(p.value),
            })
            .collect();

        WindowedFlow {
            series,
            total: CumulativeTotal::Total {
                millions: to_millions(raw_total),
                as_of,
            },
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn laptop_imports() -> Vec<YearValue> {
            [
                (2010, 1_250_000.0),
                (2015, 3_750_000.0),
                (2020, 5_000_000.0),
                (2025, 6_200_000.0),
                (2035, 7_000_000.0),
                (2040, 8_450_000.0),
                (2045, 9_100_000.0),
                (2050, 9_650_000.0),
            ]
            .into_iter()
            .map(|(year, value)| YearValue { year, value })
            .collect()
        }

        fn window(start: i32, end: i32) -> YearWindow {
            YearWindow::new(start, end).unwrap()
        }

        #[test]
        fn full_window_scales_every_year() {
            let flow = summarize_window(&laptop_imports(), &window(2010, 2050));
            let values: Vec<f64> = flow.series.iter().map(|p| p.value).collect();
            assert_eq!(values, vec![1.2, 3.8, 5.0, 6.2, 7.0, 8.4, 9.1, 9.6]);
            assert_eq!(
                flow.total,
                CumulativeTotal::Total {
                    millions: 50.4,
                    as_of: 2050
                }
            );
        }

        #[test]
        fn partial_window_keeps_inclusive_bounds() {
            let flow = summarize_window(&laptop_imports(), &window(2020, 2035));
            let years: Vec<i32> = flow.series.iter().map(|p| p.year).collect();
            assert_eq!(years, vec![2020, 2025, 2035]);
            assert_eq!(
                flow.total,
                CumulativeTotal::Total {
                    millions: 18.2,
                    as_of: 2035
                }
            );
        }

        #[test]
        fn as_of_is_latest_year_with_data() {
            // 2030 has no value, so the window [2026, 2034] is empty and
            // [2020, 2034] reports 2025.
            let flow = summarize_window(&laptop_imports(), &window(2020, 2034));
            assert_eq!(flow.total.as_of(), Some(2025));
            assert!(summarize_window(&laptop_imports(), &window(2026, 2034)).is_empty());
        }

        #[test]
        fn window_outside_data_is_empty() {
            let flow = summarize_window(&laptop_imports(), &window(2051, 2060));
            assert_eq!(flow, WindowedFlow::empty());
        }

        #[test]
        fn empty_input_is_empty() {
            let flow = summarize_window(&[], &window(2010, 2050));
            assert_eq!(flow, WindowedFlow::empty());
        }

        #[test]
        fn unsorted_input_comes_back_ascending() {
            let mut points = laptop_imports();
            points.reverse();
            let flow = summarize_window(&points, &window(2010, 2020));
            let years: Vec<i32> = flow.series.iter().map(|p| p.year).collect();
            assert_eq!(years, vec![2010, 2015, 2020]);
            assert_eq!(flow.total.as_of(), Some(2020));
        }

        #[test]
        fn total_is_rounded_after_summing() {
            // Bars 0.1 + 0.1 = 0.2, but the raw sum 0.3M rounds to 0.3
            let points = vec![
                YearValue { year: 2010, value: 149_000.0 },
                YearValue { year: 2011, value: 149_000.0 },
            ];
            let flow = summarize_window(&points, &window(2010, 2011));
            assert_eq!(flow.series[0].value, 0.1);
            assert_eq!(flow.series[1].value, 0.1);
            assert_eq!(flow.total.millions(), Some(0.3));
        }

        #[test]
        fn widening_never_removes_years_or_shrinks_total() {
            let points = laptop_imports();
            let mut previous_years: Vec<i32> = Vec::new();
            let mut previous_total = 0.0;
            for end in 2010..=2050 {
                let flow = summarize_window(&points, &window(2010, end));
                let years: Vec<i32> = flow.series.iter().map(|p| p.year).collect();
                assert!(
                    previous_years.iter().all(|y| years.contains(y)),
                    "window ending {} dropped a year",
                    end
                );
                let total = flow.total.millions().unwrap_or(0.0);
                assert!(total >= previous_total, "total shrank at {}", end);
                previous_years = years;
                previous_total = total;
            }
        }

        #[test]
        fn repeated_calls_are_bit_identical() {
            let points = laptop_imports();
            let first = summarize_window(&points, &window(2015, 2045));
            for _ in 0..10 {
                let again = summarize_window(&points, &window(2015, 2045));
                assert_eq!(again, first);
                for (a, b) in again.series.iter().zip(first.series.iter()) {
                    assert_eq!(a.value.to_bits(), b.value.to_bits());
                }
            }
        }
    }
}

/// Composition rows to treemap shares.
pub mod composition {
    use pdh_types::{CompositionRecord, MaterialShare};

    /// Convert fractions to percentages, keeping row order.
    ///
    /// Rows naming the same material twice stay separate entries; merging
    /// them would change the displayed shares.
    pub fn normalize(rows: &[CompositionRecord]) -> Vec<MaterialShare> {
        rows.iter()
            .map(|r| MaterialShare {
                material: r.material.clone(),
                percentage: r.fraction * 100.0,
            })
            .collect()
    }

    /// Sum of the reported percentages. Complete data sums to about 100,
    /// but the source is not required to.
    pub fn total_percentage(shares: &[MaterialShare]) -> f64 {
        shares.iter().map(|s| s.percentage).sum()
    }

}

/// Display strings for end-of-life estimates.
pub mod lifespan {
    use pdh_types::Lifespan;

    /// Render a year count the way the source sheet shows it: always with
    /// a fractional part (`7.0`, `5.5`).
    pub fn format_years(value: f64) -> String {
        format!("{:?}", value)
    }

    const LOWER: &str = "EoL lower";
    const UPPER: &str = "EoL upper";
    const AVERAGE: &str = "EoL average";

    /// Shown in place of a value when no product could be resolved.
    pub const MISSING: &str = "n/a";

    /// The three labelled strings shown next to the treemap.
    pub fn labels(lifespan: &Lifespan) -> [String; 3] {
        [
            format!("{}: {}", LOWER, format_years(lifespan.lower)),
            format!("{}: {}", UPPER, format_years(lifespan.upper)),
            format!("{}: {}", AVERAGE, format_years(lifespan.average)),
        ]
    }

    /// Labels with every value replaced by [`MISSING`].
    pub fn placeholder_labels() -> [String; 3] {
        [
            format!("{}: {}", LOWER, MISSING),
            format!("{}: {}", UPPER, MISSING),
            format!("{}: {}", AVERAGE, MISSING),
        ]
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn whole_years_keep_decimal_point() {
            assert_eq!(format_years(7.0), "7.0");
            assert_eq!(format_years(5.5), "5.5");
            assert_eq!(format_years(12.25), "12.25");
        }

        #[test]
        fn labels_are_in_lower_upper_average_order() {
            let l = Lifespan {
                lower: 4.0,
                upper: 8.0,
                average: 6.0,
            };
            assert_eq!(
                labels(&l),
                [
                    "EoL lower: 4.0".to_string(),
                    "EoL upper: 8.0".to_string(),
                    "EoL average: 6.0".to_string(),
                ]
            );
        }

        #[test]
        fn placeholder_labels_keep_prefixes() {
            let [lower, upper, average] = placeholder_labels();
            assert_eq!(lower, "EoL lower: n/a");
            assert_eq!(upper, "EoL upper: n/a");
            assert_eq!(average, "EoL average: n/a");
        }
    }
}
