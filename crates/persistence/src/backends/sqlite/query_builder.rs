//! Translates filter criteria into SQL `WHERE` clauses.

use rusqlite::functions::FunctionFlags;
use rusqlite::types::ToSqlOutput;
use rusqlite::{Connection, ToSql};

use crate::filter::{Criterion, FilterValue};

/// SQL function folding text to lowercase with Unicode rules.
///
/// SQLite's built-in `LOWER` only folds ASCII. Registered on every pooled
/// connection by [`register_functions`].
pub const LOWER_FUNCTION: &str = "medrec_lower";

/// Registers the scalar functions the generated SQL relies on.
pub fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        LOWER_FUNCTION,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )
}

/// A fragment of SQL with bound parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlFragment {
    /// The SQL clause.
    pub sql: String,
    /// Bound parameter values.
    pub params: Vec<SqlParam>,
}

/// A bound SQL parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    /// String parameter.
    String(String),
    /// Integer parameter.
    Integer(i64),
}

impl SqlParam {
    /// Creates a string parameter.
    pub fn string(s: impl Into<String>) -> Self {
        SqlParam::String(s.into())
    }
}

impl From<&FilterValue> for SqlParam {
    fn from(value: &FilterValue) -> Self {
        match value {
            FilterValue::Integer(i) => SqlParam::Integer(*i),
            FilterValue::Text(s) => SqlParam::String(s.clone()),
            // Same text form rusqlite uses when storing a NaiveDate.
            FilterValue::Date(d) => SqlParam::String(d.format("%Y-%m-%d").to_string()),
        }
    }
}

impl ToSql for SqlParam {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            SqlParam::String(s) => s.to_sql(),
            SqlParam::Integer(i) => i.to_sql(),
        }
    }
}

impl SqlFragment {
    /// Adds a parameter placeholder and returns the placeholder string.
    pub fn add_param(&mut self, param: SqlParam) -> String {
        self.params.push(param);
        format!("?{}", self.params.len())
    }

    /// Combines with another fragment using AND.
    ///
    /// The other fragment's placeholders are renumbered to follow this one's.
    pub fn and(mut self, other: SqlFragment) -> Self {
        let other_sql = renumber(&other.sql, self.params.len());
        if !self.sql.is_empty() && !other_sql.is_empty() {
            self.sql = format!("({}) AND ({})", self.sql, other_sql);
        } else if !other_sql.is_empty() {
            self.sql = other_sql;
        }
        self.params.extend(other.params);
        self
    }

    /// Returns true if this fragment is empty.
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

/// Shifts every `?N` placeholder in `sql` by `offset`.
fn renumber(sql: &str, offset: usize) -> String {
    if offset == 0 {
        return sql.to_string();
    }
    let mut out = String::with_capacity(sql.len());
    let mut chars = sql.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if c != '?' {
            continue;
        }
        let mut digits = String::new();
        while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
            digits.push(d);
            chars.next();
        }
        match digits.parse::<usize>() {
            Ok(index) => out.push_str(&(index + offset).to_string()),
            Err(_) => out.push_str(&digits),
        }
    }
    out
}

/// Escapes `LIKE` wildcards so they match literally under `ESCAPE '\'`.
pub fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Builds `WHERE` clause bodies for one table.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    /// Alias that qualifies every column, e.g. `p` for `p.status`.
    alias: &'static str,
}

impl QueryBuilder {
    /// Creates a builder for a table referenced as `alias` in the query.
    pub fn new(alias: &'static str) -> Self {
        Self { alias }
    }

    /// Builds the conjunction of `criteria`.
    ///
    /// Returns an empty fragment when there is nothing to constrain.
    pub fn build(&self, criteria: &[Criterion]) -> SqlFragment {
        criteria
            .iter()
            .map(|criterion| self.build_condition(criterion))
            .fold(SqlFragment::default(), SqlFragment::and)
    }

    fn build_condition(&self, criterion: &Criterion) -> SqlFragment {
        let mut fragment = SqlFragment::default();
        match criterion {
            Criterion::ContainsIgnoreCase { column, value } => {
                let pattern = format!("%{}%", escape_like(&value.to_lowercase()));
                let placeholder = fragment.add_param(SqlParam::string(pattern));
                fragment.sql = format!(
                    "{}({}.{}) LIKE {} ESCAPE '\\'",
                    LOWER_FUNCTION, self.alias, column, placeholder
                );
            }
            Criterion::Equals { column, value } => {
                let placeholder = fragment.add_param(value.into());
                fragment.sql = format!("{}.{} = {}", self.alias, column, placeholder);
            }
            Criterion::Range { column, from, to } => {
                let mut bounds = Vec::new();
                if let Some(from) = from {
                    let placeholder = fragment.add_param(from.into());
                    bounds.push(format!("{}.{} >= {}", self.alias, column, placeholder));
                }
                if let Some(to) = to {
                    let placeholder = fragment.add_param(to.into());
                    bounds.push(format!("{}.{} <= {}", self.alias, column, placeholder));
                }
                fragment.sql = bounds.join(" AND ");
            }
        }
        fragment
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_empty_criteria_build_empty_fragment() {
        let fragment = QueryBuilder::new("p").build(&[]);
        assert!(fragment.is_empty());
        assert!(fragment.params.is_empty());
    }

    #[test]
    fn test_contains_is_case_insensitive_and_escaped() {
        let fragment = QueryBuilder::new("pt").build(&[Criterion::ContainsIgnoreCase {
            column: "last_name",
            value: "50%_OFF".to_string(),
        }]);
        assert_eq!(
            fragment.sql,
            "medrec_lower(pt.last_name) LIKE ?1 ESCAPE '\\'"
        );
        assert_eq!(fragment.params, vec![SqlParam::string("%50\\%\\_off%")]);
    }

    #[test]
    fn test_conditions_are_renumbered() {
        let fragment = QueryBuilder::new("p").build(&[
            Criterion::Equals {
                column: "patient_id",
                value: FilterValue::Integer(7),
            },
            Criterion::Range {
                column: "start_date",
                from: Some(FilterValue::Date(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())),
                to: Some(FilterValue::Date(NaiveDate::from_ymd_opt(2025, 3, 31).unwrap())),
            },
        ]);
        assert_eq!(
            fragment.sql,
            "(p.patient_id = ?1) AND (p.start_date >= ?2 AND p.start_date <= ?3)"
        );
        assert_eq!(
            fragment.params,
            vec![
                SqlParam::Integer(7),
                SqlParam::string("2025-01-01"),
                SqlParam::string("2025-03-31"),
            ]
        );
    }

    #[test]
    fn test_lower_function_folds_accented_letters() {
        let conn = Connection::open_in_memory().unwrap();
        register_functions(&conn).unwrap();
        let folded: String = conn
            .query_row("SELECT medrec_lower('ÉMILE Ölçer')", [], |row| row.get(0))
            .unwrap();
        assert_eq!(folded, "émile ölçer");
        let null: Option<String> = conn
            .query_row("SELECT medrec_lower(NULL)", [], |row| row.get(0))
            .unwrap();
        assert_eq!(null, None);
    }

    #[test]
    fn test_renumber_handles_two_digit_indexes() {
        assert_eq!(renumber("?1 AND ?10", 2), "?3 AND ?12");
    }

    #[test]
    fn test_escape_like_escapes_backslash_first() {
        assert_eq!(escape_like("a\\%"), "a\\\\\\%");
    }
}
