//! CAGR command implementation.

use bilan::{Availability, metrics::growth::growth_rate};

/// Print the compound annual growth rate between two values.
pub(crate) fn show_cagr(start: f64, end: f64, periods: f64) {
    match growth_rate(start, end, periods) {
        Availability::Available(rate) => println!("CAGR: {:.2}%", rate * 100.0),
        Availability::Unavailable(reason) => println!("CAGR: n/a ({reason})"),
    }
}
