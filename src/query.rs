//! Collaborator contract for the query-construction layer.
//!
//! The stream never assembles SQL itself. It hands a [`QuerySpec`] to a
//! [`QueryBuilder`] and drives the resulting [`Statement`] through the
//! storage layer, mutating only the `$_limit` / `$_offset` entries of the
//! statement's parameter set between fetches.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};

use crate::error::Result;

/// Name of the page-size parameter bound on every fetch.
pub const PARAM_LIMIT: &str = "$_limit";

/// Name of the running offset parameter advanced between fetches.
pub const PARAM_OFFSET: &str = "$_offset";

/// Column holding the stored document text.
pub const COLUMN_DOCUMENT: &str = "document";

/// Column holding the row's modification timestamp.
pub const COLUMN_MODIFIED: &str = "modified_date";

/// A single bound statement parameter value.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    /// Text parameter.
    Text(String),
    /// Integer parameter.
    Int(i64),
    /// Boolean parameter.
    Bool(bool),
}

/// Named parameter set for one statement.
///
/// A stream owns its parameter set exclusively for its whole lifetime; no
/// other consumer may mutate it concurrently.
#[derive(Clone, Debug, Default)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a named parameter, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: ParamValue) {
        self.0.insert(name.into(), value);
    }

    /// Look up a bound parameter by name.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    /// Bind the fetch window for the next execution.
    pub fn set_window(&mut self, limit: u64, offset: u64) {
        self.set(PARAM_LIMIT, ParamValue::Int(limit as i64));
        self.set(PARAM_OFFSET, ParamValue::Int(offset as i64));
    }

    /// Iterate over bound parameters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// A parameterized SQL statement plus its parameter set.
#[derive(Clone, Debug)]
pub struct Statement {
    /// The SQL text, with named placeholders.
    pub sql: String,
    /// Initial parameter bindings produced by the builder.
    pub params: Params,
}

/// Filter specification handed to the query builder.
#[derive(Clone, Debug)]
pub struct QuerySpec {
    /// Columns the stream needs selected.
    pub columns: Vec<String>,
    /// Resource types to match; empty means all.
    pub resource_types: Vec<String>,
    /// Optional group filter token.
    pub group: Option<String>,
    /// Only rows modified at or after this instant.
    pub start: Option<DateTime<FixedOffset>>,
    /// Whether the query runs at system level rather than per-type.
    pub system_level: bool,
}

/// Translates a filter specification into parameterized SQL.
///
/// Implementations own the dialect; the stream only requires that the select
/// statement honors [`PARAM_LIMIT`] and [`PARAM_OFFSET`], and that the count
/// statement groups its totals by resource type.
pub trait QueryBuilder: Send + Sync {
    /// Build the bounded, ordered select statement for `spec`.
    fn select(&self, spec: &QuerySpec) -> Result<Statement>;

    /// Build the count statement for `spec`, grouped by resource type.
    fn count(&self, spec: &QuerySpec) -> Result<Statement>;
}
