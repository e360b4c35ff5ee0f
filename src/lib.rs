//! # docstream
//!
//! Async streaming cursor that turns a large, filtered set of
//! database-stored JSON documents into a newline-delimited JSON body,
//! without ever holding more than one bounded chunk in memory.
//!
//! ## Why?
//!
//! Serving a big export endpoint the obvious way materializes the whole
//! result set first:
//!
//! ```ignore
//! // This will OOM with millions of rows!
//! let rows: Vec<Document> = db.query_all(select).await?;
//! respond(serde_json::to_string(&rows)?);
//! ```
//!
//! `docstream` pulls bounded chunks behind a throttled, pull-driven stream:
//!
//! ```ignore
//! // Memory stays O(chunk size) no matter how many rows match
//! let mut stream = streamer.stream(request);
//! while let Some(chunk) = stream.next().await {
//!     body.write_all(chunk?.as_bytes()).await?;
//! }
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use docstream::{StreamConfig, StreamRequest, Streamer};
//! use futures::StreamExt;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // `builder` translates filters into SQL; `storage` executes it.
//!     let streamer = Streamer::new(StreamConfig::default(), builder, storage);
//!
//!     let request = StreamRequest::new(["Document"], 1000)
//!         .with_offset(0)
//!         .with_multiplier(3);
//!
//!     let mut stream = streamer.stream(request);
//!     while let Some(chunk) = stream.next().await {
//!         print!("{}", chunk?);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Memory efficient**: chunked fetches keep usage bounded by the
//!   configured chunk size, not the requested row count
//! - **Amplification**: a multiplier replays the physical result set to
//!   synthesize larger datasets for load testing, rewriting embedded UUIDs
//!   so every copy stays distinct
//! - **Throttling**: an optional fixed delay before each emission simulates
//!   slow consumers
//! - **Pull-driven**: nothing happens until the consumer asks; dropping the
//!   stream cancels pending work immediately
//! - **Error handling**: all failures are reported through the stream as
//!   `Result` items, no panics

pub mod config;
pub mod cursor;
pub mod error;
pub mod query;
pub mod request;
pub mod rewrite;
pub mod storage;
pub mod stream;

// Re-export main types at crate root
pub use config::StreamConfig;
pub use error::{Error, Result};
pub use query::{
    COLUMN_DOCUMENT, COLUMN_MODIFIED, PARAM_LIMIT, PARAM_OFFSET, ParamValue, Params, QueryBuilder,
    QuerySpec, Statement,
};
pub use request::StreamRequest;
pub use storage::{DocumentRow, PreparedSelect, Storage, TypeCount};
pub use stream::{DocumentStream, MODIFIED_DATE_FIELD, Streamer};

// Re-export the rewrite transform for advanced use cases
pub use rewrite::{rewrite_identifiers, round_prefix};
