//! Financial statement tables.
//!
//! A [`StatementTable`] is what a data provider hands back for one statement
//! (income, balance sheet, cash flow) at one frequency: named line items as
//! rows, reporting periods as columns, most recent period first.

use crate::{BilanError, Date, PeriodSeries, Result, series::parse_iso_date};
use polars::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

/// Name of the string column holding line-item names in the DataFrame layout.
pub const LINE_ITEM_COLUMN: &str = "line_item";

/// One named row of a statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Provider name of the line item, e.g. `"Net Income"`.
    pub name: String,
    /// One value per table period, aligned with [`StatementTable::periods`].
    /// Serialized `null`s read back as `NaN`.
    #[serde(deserialize_with = "null_as_nan")]
    pub values: Vec<f64>,
}

fn null_as_nan<'de, D>(deserializer: D) -> std::result::Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Option<f64>>::deserialize(deserializer)?;
    Ok(values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

impl LineItem {
    /// Creates a line item.
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Line items × reporting periods, most recent period first.
///
/// Every row shares the table's period set. A missing cell is stored as
/// `NaN`.
///
/// # Example
///
/// ```
/// use bilan_traits::{Date, LineItem, StatementTable};
///
/// let periods = vec![
///     Date::from_ymd_opt(2024, 12, 31).unwrap(),
///     Date::from_ymd_opt(2023, 12, 31).unwrap(),
/// ];
/// let table = StatementTable::new(
///     periods,
///     vec![LineItem::new("Net Income", vec![120.0, 100.0])],
/// )
/// .unwrap();
/// assert!(table.has_row("Net Income"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTable")]
pub struct StatementTable {
    periods: Vec<Date>,
    rows: Vec<LineItem>,
}

/// Unchecked serialized form, validated through [`StatementTable::new`].
#[derive(Deserialize)]
struct RawTable {
    periods: Vec<Date>,
    rows: Vec<LineItem>,
}

impl TryFrom<RawTable> for StatementTable {
    type Error = BilanError;

    fn try_from(raw: RawTable) -> Result<Self> {
        Self::new(raw.periods, raw.rows)
    }
}

impl StatementTable {
    /// Builds a table, sorting periods most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`BilanError::InvalidData`] if a row's length differs from the
    /// number of periods, or if a period or row name is duplicated.
    pub fn new(periods: Vec<Date>, rows: Vec<LineItem>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(periods.len());
        if let Some(dup) = periods.iter().find(|p| !seen.insert(**p)) {
            return Err(BilanError::InvalidData(format!(
                "duplicate period {dup} in statement"
            )));
        }
        let mut names = HashSet::with_capacity(rows.len());
        for row in &rows {
            if row.values.len() != periods.len() {
                return Err(BilanError::InvalidData(format!(
                    "line item '{}' has {} values for {} periods",
                    row.name,
                    row.values.len(),
                    periods.len()
                )));
            }
            if !names.insert(row.name.as_str()) {
                return Err(BilanError::InvalidData(format!(
                    "duplicate line item '{}'",
                    row.name
                )));
            }
        }

        let mut order: Vec<usize> = (0..periods.len()).collect();
        order.sort_by(|&a, &b| periods[b].cmp(&periods[a]));
        let sorted_periods = order.iter().map(|&i| periods[i]).collect();
        let rows = rows
            .into_iter()
            .map(|row| LineItem {
                values: order.iter().map(|&i| row.values[i]).collect(),
                name: row.name,
            })
            .collect();

        Ok(Self {
            periods: sorted_periods,
            rows,
        })
    }

    /// A table with no periods and no rows.
    pub const fn empty() -> Self {
        Self {
            periods: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Whether the table has no periods or no rows.
    ///
    /// An empty table has no period set to fill defaults against, so callers
    /// check this before resolving line items.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty() || self.rows.is_empty()
    }

    /// Reporting periods, most recent first.
    pub fn periods(&self) -> &[Date] {
        &self.periods
    }

    /// All rows.
    pub fn rows(&self) -> &[LineItem] {
        &self.rows
    }

    /// Line-item names in table order.
    pub fn line_items(&self) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(|r| r.name.as_str())
    }

    /// Whether a row named exactly `name` exists.
    pub fn has_row(&self, name: &str) -> bool {
        self.rows.iter().any(|r| r.name == name)
    }

    /// The row named exactly `name` as a period series.
    pub fn row(&self, name: &str) -> Option<PeriodSeries> {
        self.rows.iter().find(|r| r.name == name).map(|r| {
            PeriodSeries::from_sorted(
                self.periods
                    .iter()
                    .copied()
                    .zip(r.values.iter().copied())
                    .collect(),
            )
        })
    }

    /// A copy of the table restricted to `periods`, keeping table order.
    pub fn select_periods(&self, periods: &[Date]) -> Self {
        let keep: HashSet<Date> = periods.iter().copied().collect();
        let indices: Vec<usize> = self
            .periods
            .iter()
            .enumerate()
            .filter(|(_, p)| keep.contains(p))
            .map(|(i, _)| i)
            .collect();
        Self {
            periods: indices.iter().map(|&i| self.periods[i]).collect(),
            rows: self
                .rows
                .iter()
                .map(|r| LineItem {
                    name: r.name.clone(),
                    values: indices.iter().map(|&i| r.values[i]).collect(),
                })
                .collect(),
        }
    }

    /// A copy of the table keeping the `n` most recent periods.
    pub fn latest_periods(&self, n: usize) -> Self {
        let periods: Vec<Date> = self.periods.iter().take(n).copied().collect();
        self.select_periods(&periods)
    }

    /// Reads a table from a DataFrame.
    ///
    /// The expected layout is a `line_item` string column plus one numeric
    /// column per period, named `YYYY-MM-DD`. Null cells become `NaN`.
    ///
    /// # Errors
    ///
    /// Returns an error if the `line_item` column is missing or not a string
    /// column, if a period column name is not a date, or if the resulting
    /// table violates the [`StatementTable::new`] invariants.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let names: Vec<String> = df
            .column(LINE_ITEM_COLUMN)?
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|s: Option<&str>| s.unwrap_or_default().to_string())
            .collect();

        let mut periods = Vec::new();
        let mut columns: Vec<Vec<f64>> = Vec::new();
        for column in df.get_columns() {
            let label = column.name().as_str();
            if label == LINE_ITEM_COLUMN {
                continue;
            }
            periods.push(parse_iso_date(label)?);
            let values = column.as_materialized_series().cast(&DataType::Float64)?;
            columns.push(
                values
                    .f64()?
                    .into_iter()
                    .map(|v: Option<f64>| v.unwrap_or(f64::NAN))
                    .collect(),
            );
        }

        let rows = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| LineItem::new(name, columns.iter().map(|c| c[i]).collect()))
            .collect();
        Self::new(periods, rows)
    }
}
