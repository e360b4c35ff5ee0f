//! Collaborator contract for the storage layer.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

use crate::error::Result;
use crate::query::{Params, Statement};

/// One raw row fetched from storage.
#[derive(Clone, Debug)]
pub struct DocumentRow {
    /// The stored JSON document text.
    pub doc: String,
    /// Stored modification timestamp, when the select included it.
    pub modified: Option<DateTime<FixedOffset>>,
}

/// One result row of a count query, grouped by resource type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeCount {
    /// Resource type this count applies to.
    pub resource_type: String,
    /// Number of matching rows of that type.
    pub rows: u64,
}

/// Asynchronous storage access used by document streams.
///
/// Backends map their driver errors onto [`crate::Error`]; preparation
/// failures become `Error::Prepare`, execution failures `Error::Query`.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Prepare a select statement for repeated windowed execution.
    async fn prepare(&self, statement: &Statement) -> Result<Box<dyn PreparedSelect>>;

    /// Execute a count statement and return per-type totals.
    async fn count(&self, statement: &Statement) -> Result<Vec<TypeCount>>;
}

/// A prepared select the stream drives with a shifting window.
#[async_trait]
pub trait PreparedSelect: Send {
    /// Execute the select with `params` bound and return the matching rows
    /// in order.
    ///
    /// An empty batch means the source is exhausted at the bound offset;
    /// that is not an error.
    async fn fetch(&mut self, params: &Params) -> Result<Vec<DocumentRow>>;
}
