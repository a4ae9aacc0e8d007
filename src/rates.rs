//! Per-site rate tables.
//!
//! A rate table is a tab-separated file with a header line. One column,
//! by default `pr`, holds the rate of each site; rows are read top to
//! bottom in site order, so row `i` (excluding the header) annotates
//! site `i`. Empty lines are ignored; a line holding only whitespace is a
//! row with missing fields. When a rate table is given, its
//! number of rows is the number of sites to simulate.
//!
//! ```text
//! site	pr	posterior
//! 0	0.82	0.91
//! 1	1.37	0.88
//! ```

use crate::error::{FormatError, SegSimError};
use std::fs;
use std::ops::Range;
use std::path::Path;

/// Default name of the rate column.
pub const DEFAULT_RATE_COLUMN: &str = "pr";

const SEPARATOR: char = '\t';

/// Rate of one site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateRow {
    pub site: usize,
    pub rate: f64,
}

/// Dense table of site rates for sites `0..len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    rates: Vec<f64>,
}

impl RateTable {
    /// Creates a rate table from rates in site order.
    ///
    /// # Errors
    /// * [FormatError::EmptyTable] if `rates` is empty
    /// * [FormatError::InvalidRate] for a negative or non-finite rate
    pub fn new(rates: Vec<f64>) -> Result<Self, FormatError> {
        if rates.is_empty() {
            return Err(FormatError::EmptyTable);
        }
        if let Some((row, rate)) = rates.iter().enumerate().find(|(_, r)| !is_valid_rate(**r)) {
            return Err(FormatError::InvalidRate { row, value: rate.to_string() });
        }
        Ok(Self { rates })
    }

    /// Reads a rate table from a file, taking rates from `column`.
    ///
    /// # Errors
    /// [SegSimError::Io] if the file cannot be read, otherwise as [RateTable::parse_str].
    pub fn from_file<P: AsRef<Path>>(path: P, column: &str) -> Result<Self, SegSimError> {
        let content = fs::read_to_string(path.as_ref())?;
        let table = Self::parse_str(&content, column)?;
        log::info!(
            "Read {} site rates from column '{}' of {}",
            table.len(),
            column,
            path.as_ref().display()
        );
        Ok(table)
    }

    /// Parses a tab-separated rate table, taking rates from `column`.
    ///
    /// # Errors
    /// * [FormatError::EmptyTable] if there is no header or no data row
    /// * [FormatError::MissingColumn] if the header lacks `column`
    /// * [FormatError::MissingField] if a row is too short
    /// * [FormatError::InvalidRate] if a rate is not a non-negative number
    ///
    /// # Example
    /// ```
    /// use segsim::rates::RateTable;
    ///
    /// let table = RateTable::parse_str("site\tpr\n0\t0.5\n1\t2.0\n", "pr").unwrap();
    /// assert_eq!(table.rates(), &[0.5, 2.0]);
    /// ```
    pub fn parse_str(input: &str, column: &str) -> Result<Self, FormatError> {
        let mut lines = input.lines().map(|l| l.trim_end_matches('\r')).filter(|l| !l.is_empty());

        let header = lines.next().ok_or(FormatError::EmptyTable)?;
        let column_index = header
            .split(SEPARATOR)
            .position(|name| name.trim() == column)
            .ok_or_else(|| FormatError::MissingColumn { column: column.to_string() })?;

        let mut rates = Vec::new();
        for (row, line) in lines.enumerate() {
            let field = line.split(SEPARATOR).nth(column_index).map(str::trim);
            let field = match field {
                Some(f) if !f.is_empty() => f,
                _ => {
                    return Err(FormatError::MissingField { row, column: column.to_string() });
                }
            };
            let rate = field
                .parse::<f64>()
                .ok()
                .filter(|r| is_valid_rate(*r))
                .ok_or_else(|| FormatError::InvalidRate { row, value: field.to_string() })?;
            rates.push(rate);
        }

        Self::new(rates)
    }

    /// Number of rows, i.e. of sites.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Always `false`, empty tables are rejected.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// All rates in site order.
    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    pub fn row(&self, site: usize) -> Option<RateRow> {
        self.rates.get(site).map(|&rate| RateRow { site, rate })
    }

    pub fn rows(&self) -> impl Iterator<Item = RateRow> + '_ {
        self.rates.iter().enumerate().map(|(site, &rate)| RateRow { site, rate })
    }

    /// Rates of the sites in `range`, or `None` if it exceeds the table.
    pub fn slice(&self, range: Range<usize>) -> Option<&[f64]> {
        self.rates.get(range)
    }
}

fn is_valid_rate(rate: f64) -> bool {
    rate.is_finite() && rate >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_found_by_name() {
        let input = "site\tpost\tpr\n0\t0.9\t1.5\n1\t0.8\t0.25\n\n";
        let table = RateTable::parse_str(input, "pr").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.row(1), Some(RateRow { site: 1, rate: 0.25 }));
        assert_eq!(table.row(2), None);
    }

    #[test]
    fn test_windows_line_endings() {
        let table = RateTable::parse_str("pr\r\n1e-2\r\n3\r\n", "pr").unwrap();
        assert_eq!(table.rates(), &[0.01, 3.0]);
    }

    #[test]
    fn test_errors() {
        assert_eq!(RateTable::parse_str("", "pr"), Err(FormatError::EmptyTable));
        assert_eq!(RateTable::parse_str("pr\n", "pr"), Err(FormatError::EmptyTable));
        assert_eq!(
            RateTable::parse_str("rate\n1\n", "pr"),
            Err(FormatError::MissingColumn { column: "pr".to_string() })
        );
        assert_eq!(
            RateTable::parse_str("site\tpr\n0\t1\n1\n", "pr"),
            Err(FormatError::MissingField { row: 1, column: "pr".to_string() })
        );
        assert_eq!(
            RateTable::parse_str("pr\n1\nfast\n", "pr"),
            Err(FormatError::InvalidRate { row: 1, value: "fast".to_string() })
        );
        assert!(matches!(
            RateTable::parse_str("pr\n-1\n", "pr"),
            Err(FormatError::InvalidRate { row: 0, .. })
        ));
    }

    #[test]
    fn test_whitespace_row_is_not_skipped() {
        assert_eq!(
            RateTable::parse_str("site\tpr\n0\t1\n\t\n2\t3\n", "pr"),
            Err(FormatError::MissingField { row: 1, column: "pr".to_string() })
        );
        assert_eq!(
            RateTable::parse_str("pr\n1\n  \n3\n", "pr"),
            Err(FormatError::MissingField { row: 1, column: "pr".to_string() })
        );
    }

    #[test]
    fn test_slice() {
        let table = RateTable::new((0..10).map(f64::from).collect()).unwrap();
        assert_eq!(table.slice(3..10), Some(&[3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0][..]));
        assert_eq!(table.slice(8..11), None);
        assert_eq!(table.slice(4..4), Some(&[][..]));
    }
}
