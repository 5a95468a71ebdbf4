use crate::error::{PtfError, Result};
use crate::models::{Cell, RowView};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparison {
    // Two-character operators first so `<=` is not read as `<`
    const OPERATORS: [(&'static str, Comparison); 6] = [
        ("==", Comparison::Eq),
        ("!=", Comparison::Ne),
        ("<=", Comparison::Le),
        (">=", Comparison::Ge),
        ("<", Comparison::Lt),
        (">", Comparison::Gt),
    ];

    fn symbol(&self) -> &'static str {
        match self {
            Comparison::Eq => "==",
            Comparison::Ne => "!=",
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
        }
    }

    fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            Comparison::Eq => ordering == Ordering::Equal,
            Comparison::Ne => ordering != Ordering::Equal,
            Comparison::Lt => ordering == Ordering::Less,
            Comparison::Le => ordering != Ordering::Greater,
            Comparison::Gt => ordering == Ordering::Greater,
            Comparison::Ge => ordering != Ordering::Less,
        }
    }
}

/// One `column <op> value` test against a catalog row, e.g. `fid==2` or `obsmjd>=55000`
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub comparison: Comparison,
    pub value: String,
}

impl Condition {
    /// Numeric comparison when both sides are numbers, text comparison otherwise.
    /// Rows without the column never match.
    pub fn matches(&self, row: &RowView<'_>) -> bool {
        let Some(cell) = row.get(&self.column) else {
            return false;
        };

        let ordering = match (cell, self.value.parse::<f64>()) {
            (Cell::Integer(_) | Cell::Float(_), Ok(target)) => {
                match cell.as_f64().and_then(|v| v.partial_cmp(&target)) {
                    Some(ordering) => ordering,
                    None => return false,
                }
            }
            _ => match row.raw(&self.column) {
                Some(text) => text.cmp(self.value.as_str()),
                None => return false,
            },
        };

        self.comparison.accepts(ordering)
    }
}

impl FromStr for Condition {
    type Err = PtfError;

    fn from_str(s: &str) -> Result<Self> {
        let (position, symbol, comparison) = Comparison::OPERATORS
            .iter()
            .filter_map(|&(symbol, comparison)| s.find(symbol).map(|pos| (pos, symbol, comparison)))
            .min_by_key(|&(pos, symbol, _)| (pos, std::cmp::Reverse(symbol.len())))
            .ok_or_else(|| {
                PtfError::InvalidFilter(format!(
                    "'{}' has no comparison operator (==, !=, <, <=, >, >=)",
                    s
                ))
            })?;

        let column = s[..position].trim();
        let value = s[position + symbol.len()..].trim();

        if column.is_empty() || value.is_empty() {
            return Err(PtfError::InvalidFilter(format!(
                "'{}' must have the form column{}value",
                s, symbol
            )));
        }

        Ok(Self {
            column: column.to_string(),
            comparison,
            value: value.to_string(),
        })
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.column, self.comparison.symbol(), self.value)
    }
}

/// All conditions must hold; an empty list matches every row
pub fn matches_all(conditions: &[Condition], row: &RowView<'_>) -> bool {
    conditions.iter().all(|c| c.matches(row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CatalogHeader, CatalogTable, ParsedCatalog};

    fn table() -> CatalogTable {
        let strings = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        CatalogTable::from_parsed(ParsedCatalog {
            header: CatalogHeader {
                names: strings(&["fid", "obsmjd", "obsdate", "ccdid"]),
                ..Default::default()
            },
            rows: vec![
                strings(&["1", "55000.5", "2009-06-17 12:00:00", "05"]),
                strings(&["2", "55100.0", "2009-09-25 12:00:00", "11"]),
            ],
        })
        .unwrap()
    }

    #[test]
    fn test_parse_conditions() {
        let c: Condition = "obsmjd >= 55000".parse().unwrap();
        assert_eq!(c.column, "obsmjd");
        assert_eq!(c.comparison, Comparison::Ge);
        assert_eq!(c.value, "55000");

        let c: Condition = "fid==2".parse().unwrap();
        assert_eq!(c.comparison, Comparison::Eq);
        assert_eq!(c.to_string(), "fid==2");

        let c: Condition = "obsdate<2009-07-01".parse().unwrap();
        assert_eq!(c.comparison, Comparison::Lt);
        assert_eq!(c.value, "2009-07-01");
    }

    #[test]
    fn test_parse_invalid_conditions() {
        assert!(matches!("fid".parse::<Condition>(), Err(PtfError::InvalidFilter(_))));
        assert!("==2".parse::<Condition>().is_err());
        assert!("fid!=".parse::<Condition>().is_err());
    }

    #[test]
    fn test_numeric_matching() {
        let table = table();
        let late: Condition = "obsmjd>55050".parse().unwrap();
        let r_band: Condition = "fid==2".parse().unwrap();

        let rows: Vec<_> = table.rows().collect();
        assert!(!late.matches(&rows[0]));
        assert!(late.matches(&rows[1]));
        assert!(r_band.matches(&rows[1]));
        assert!(matches_all(&[late, r_band], &rows[1]));
        assert!(matches_all(&[], &rows[0]));
    }

    #[test]
    fn test_text_matching_and_unknown_column() {
        let table = table();
        let rows: Vec<_> = table.rows().collect();

        let before: Condition = "obsdate<2009-07-01".parse().unwrap();
        assert!(before.matches(&rows[0]));
        assert!(!before.matches(&rows[1]));

        let missing: Condition = "seeing<2".parse().unwrap();
        assert!(!missing.matches(&rows[0]));
    }
}
