//! Stream request parameters.

use chrono::{DateTime, FixedOffset};

use crate::query::{COLUMN_DOCUMENT, COLUMN_MODIFIED, QuerySpec};

/// Parameters describing one document stream.
///
/// Immutable after construction. A `limit` of zero produces a well-defined
/// empty stream; the routing layer is expected to substitute the configured
/// page size before it gets here.
#[derive(Clone, Debug)]
pub struct StreamRequest {
    /// Resource types to stream; empty means all types.
    pub resource_types: Vec<String>,
    /// Number of logical rows to emit.
    pub limit: u64,
    /// Number of logical rows to skip before the first emission.
    pub offset: u64,
    /// Result-set amplification factor; 1 means no amplification.
    pub multiplier: u64,
    /// Inject a `__modified_date` field into every emitted document.
    pub extended: bool,
    /// Optional group filter token.
    pub group: Option<String>,
    /// Only stream documents modified at or after this instant.
    pub since: Option<DateTime<FixedOffset>>,
    /// Query across all types at system level.
    pub system_level: bool,
}

impl StreamRequest {
    /// Create a request for `limit` rows of the given resource types.
    pub fn new(
        resource_types: impl IntoIterator<Item = impl Into<String>>,
        limit: u64,
    ) -> Self {
        Self {
            resource_types: resource_types.into_iter().map(Into::into).collect(),
            limit,
            offset: 0,
            multiplier: 1,
            extended: false,
            group: None,
            since: None,
            system_level: false,
        }
    }

    /// Skip the first `offset` logical rows.
    #[must_use]
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Amplify the physical result set by `multiplier`.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: u64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Enable extended mode (`__modified_date` injection).
    #[must_use]
    pub fn extended(mut self) -> Self {
        self.extended = true;
        self
    }

    /// Restrict the stream to one group.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Only stream documents modified at or after `since`.
    #[must_use]
    pub fn with_since(mut self, since: DateTime<FixedOffset>) -> Self {
        self.since = Some(since);
        self
    }

    /// Query across all resource types at system level.
    #[must_use]
    pub fn system_level(mut self) -> Self {
        self.system_level = true;
        self
    }

    /// The filter specification this request hands to the query builder.
    pub fn query_spec(&self) -> QuerySpec {
        let mut columns = vec![COLUMN_DOCUMENT.to_string()];
        if self.extended {
            columns.push(COLUMN_MODIFIED.to_string());
        }
        QuerySpec {
            columns,
            resource_types: self.resource_types.clone(),
            group: self.group.clone(),
            start: self.since,
            system_level: self.system_level,
        }
    }
}
