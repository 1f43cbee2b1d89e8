//! Safe dynamic ordering and filtering for fixed SQL statements.
//!
//! Caller input never reaches statement text. Sort keys are a closed set
//! compiled into a `CASE` expression and filters are guarded equality
//! comparisons; in both, the caller's value travels only as a bound argument.
//! Each builder also evaluates its own semantics in-process (`resolve`,
//! `matches`) so in-memory sources can reproduce the database behavior.

use crate::parameters::ParamValue;
use crate::types::Result;
use crate::validation::validate_identifier;
use std::fmt::Write;

/// One permitted sort key and the result column it orders by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub key: &'static str,
    pub column: &'static str,
}

/// Closed enumeration of sort keys with a fallback column.
///
/// Unrecognized keys (including the empty string) order by the default
/// column without raising an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKeys {
    keys: &'static [SortKey],
    default_column: &'static str,
}

impl SortKeys {
    pub fn new(keys: &'static [SortKey], default_column: &'static str) -> Result<Self> {
        for (i, sort_key) in keys.iter().enumerate() {
            validate_identifier(sort_key.key, "sort key")?;
            validate_identifier(sort_key.column, "sort column")?;
            if keys[..i].iter().any(|k| k.key == sort_key.key) {
                return Err(crate::types::Error::validation(format!(
                    "duplicate sort key: {}",
                    sort_key.key
                )));
            }
        }
        validate_identifier(default_column, "default sort column")?;
        Ok(Self {
            keys,
            default_column,
        })
    }

    /// `CASE WHEN ? = 'key' THEN column ... ELSE default END`, one placeholder
    /// per key.
    pub fn case_expression(&self) -> String {
        let mut expr = String::from("CASE");
        for sort_key in self.keys {
            let _ = write!(
                expr,
                "\n    WHEN ? = '{}' THEN {}",
                sort_key.key, sort_key.column
            );
        }
        let _ = write!(expr, "\n    ELSE {}\n  END", self.default_column);
        expr
    }

    /// Bind the caller's sort value once per `WHEN` branch.
    pub fn bind(&self, sort_by: &str, args: &mut Vec<ParamValue>) {
        args.extend(self.keys.iter().map(|_| ParamValue::from(sort_by)));
    }

    /// Column the database will order by for `sort_by`.
    pub fn resolve(&self, sort_by: &str) -> &'static str {
        self.keys
            .iter()
            .find(|k| k.key == sort_by)
            .map_or(self.default_column, |k| k.column)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.keys.iter().map(|k| k.key)
    }

    pub fn default_column(&self) -> &'static str {
        self.default_column
    }
}

/// Optional exact-match filter on one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqualityFilter {
    column: &'static str,
}

impl EqualityFilter {
    /// `column` may be qualified (`t.table_name`).
    pub fn new(column: &'static str) -> Result<Self> {
        for part in column.split('.') {
            validate_identifier(part, "filter column")?;
        }
        Ok(Self { column })
    }

    /// `(COALESCE(?, '') = '' OR column = ?)`
    pub fn clause(&self) -> String {
        format!("(COALESCE(?, '') = '' OR {} = ?)", self.column)
    }

    /// Bind the filter value for the guard and then for the comparison.
    pub fn bind(&self, value: &str, args: &mut Vec<ParamValue>) {
        args.push(ParamValue::from(value));
        args.push(ParamValue::from(value));
    }

    /// Whether a row whose column holds `candidate` passes the filter.
    pub fn matches(&self, value: &str, candidate: &str) -> bool {
        value.is_empty() || value == candidate
    }

    pub fn column(&self) -> &'static str {
        self.column
    }
}

/// Number of positional placeholders in a statement.
///
/// `?` inside single-quoted literals is not counted.
pub fn placeholder_count(statement: &str) -> usize {
    let mut in_literal = false;
    let mut count = 0;
    for c in statement.chars() {
        match c {
            '\'' => in_literal = !in_literal,
            '?' if !in_literal => count += 1,
            _ => {}
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const KEYS: &[SortKey] = &[
        SortKey {
            key: "row_count",
            column: "row_count",
        },
        SortKey {
            key: "fetched",
            column: "rows_fetched",
        },
    ];

    fn sort_keys() -> SortKeys {
        SortKeys::new(KEYS, "total_latency_secs").unwrap()
    }

    #[test]
    fn test_case_expression() {
        assert_eq!(
            sort_keys().case_expression(),
            "CASE\n    WHEN ? = 'row_count' THEN row_count\n    WHEN ? = 'fetched' THEN rows_fetched\n    ELSE total_latency_secs\n  END"
        );
    }

    #[test]
    fn test_sort_binds_once_per_branch() {
        let mut args = Vec::new();
        sort_keys().bind("fetched", &mut args);
        assert_eq!(args, vec![ParamValue::from("fetched"), ParamValue::from("fetched")]);
        assert_eq!(placeholder_count(&sort_keys().case_expression()), args.len());
    }

    #[test]
    fn test_resolve_known_keys() {
        assert_eq!(sort_keys().resolve("row_count"), "row_count");
        assert_eq!(sort_keys().resolve("fetched"), "rows_fetched");
        assert_eq!(sort_keys().resolve(""), "total_latency_secs");
    }

    #[test]
    fn test_rejects_unsafe_keys() {
        const BAD: &[SortKey] = &[SortKey {
            key: "x' OR 1=1 --",
            column: "x",
        }];
        assert!(SortKeys::new(BAD, "y").is_err());
        assert!(SortKeys::new(KEYS, "drop table").is_err());

        const DUP: &[SortKey] = &[
            SortKey { key: "a", column: "a" },
            SortKey { key: "a", column: "b" },
        ];
        assert!(SortKeys::new(DUP, "a").is_err());
    }

    #[test]
    fn test_filter_clause_and_binding() {
        let filter = EqualityFilter::new("t.table_schema").unwrap();
        assert_eq!(filter.clause(), "(COALESCE(?, '') = '' OR t.table_schema = ?)");

        let mut args = Vec::new();
        filter.bind("shop", &mut args);
        assert_eq!(args, vec![ParamValue::from("shop"), ParamValue::from("shop")]);
        assert_eq!(placeholder_count(&filter.clause()), 2);

        assert!(EqualityFilter::new("t.name; --").is_err());
    }

    #[test]
    fn test_filter_matches() {
        let filter = EqualityFilter::new("table_name").unwrap();
        assert!(filter.matches("", "orders"));
        assert!(filter.matches("orders", "orders"));
        assert!(!filter.matches("orders", "order_items"));
    }

    #[test]
    fn test_placeholder_count_skips_literals() {
        assert_eq!(placeholder_count("SELECT '?' WHERE a = ? AND b = ?"), 2);
    }

    proptest! {
        #[test]
        fn prop_unknown_sort_key_falls_back_to_default(sort_by in "\\PC*") {
            prop_assume!(sort_keys().keys().all(|k| k != sort_by));
            prop_assert_eq!(sort_keys().resolve(&sort_by), "total_latency_secs");
        }

        #[test]
        fn prop_empty_filter_matches_everything(candidate in "\\PC*") {
            let filter = EqualityFilter::new("c").unwrap();
            prop_assert!(filter.matches("", &candidate));
        }

        #[test]
        fn prop_non_empty_filter_is_exact(value in "[a-z]{1,6}", candidate in "[a-z]{1,6}") {
            let filter = EqualityFilter::new("c").unwrap();
            prop_assert_eq!(filter.matches(&value, &candidate), value == candidate);
        }
    }
}
