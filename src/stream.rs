//! The streaming cursor: counting, chunked fetch, overflow replay, and the
//! throttled pull-driven emitter.
//!
//! A stream runs count -> prepare -> fetch -> emit as one async sequence;
//! every external call is a suspension point, and every failure surfaces as
//! a stream item at least one poll after construction, never from the
//! constructor itself.

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_stream::stream;
use futures::{Stream, StreamExt};
use serde_json::Value;
use tracing::debug;

use crate::config::StreamConfig;
use crate::cursor::StreamCursor;
use crate::error::Result;
use crate::query::{Params, QueryBuilder, QuerySpec};
use crate::request::StreamRequest;
use crate::rewrite::{rewrite_identifiers, round_prefix};
use crate::storage::{DocumentRow, PreparedSelect, Storage};

/// Field injected into every emitted document in extended mode.
pub const MODIFIED_DATE_FIELD: &str = "__modified_date";

/// A stream of NDJSON chunks.
///
/// Each item is one JSON document; every item after the first carries a
/// single leading `\n`, so concatenating the items yields a
/// newline-delimited JSON body with no trailing separator.
pub type DocumentStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Streaming entry point.
///
/// Holds the process-wide configuration plus the query-construction and
/// storage collaborators, and opens independent [`DocumentStream`]s against
/// them. Each stream exclusively owns its cursor, its in-memory chunk and
/// its statement parameter set; nothing is shared across concurrent streams.
///
/// # Example
///
/// ```ignore
/// use docstream::{StreamConfig, StreamRequest, Streamer};
/// use futures::StreamExt;
///
/// let streamer = Streamer::new(StreamConfig::default(), builder, storage);
/// let mut stream = streamer.stream(StreamRequest::new(["Document"], 1000));
///
/// while let Some(chunk) = stream.next().await {
///     body.push_str(&chunk?);
/// }
/// ```
#[derive(Clone)]
pub struct Streamer {
    config: StreamConfig,
    builder: Arc<dyn QueryBuilder>,
    storage: Arc<dyn Storage>,
}

impl Streamer {
    /// Create a streamer over the given collaborators.
    ///
    /// The configuration is captured once; streams opened later do not see
    /// subsequent changes.
    pub fn new(
        config: StreamConfig,
        builder: Arc<dyn QueryBuilder>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        Self {
            config,
            builder,
            storage,
        }
    }

    /// Open a document stream for `request`.
    ///
    /// Construction is synchronous and performs no I/O. The count query, the
    /// statement preparation and all fetches run lazily as the consumer
    /// pulls, so a caller that attaches its error handling after construction
    /// still observes every failure. Dropping the stream cancels any pending
    /// throttle delay or in-flight fetch; nothing is emitted afterwards.
    pub fn stream(&self, request: StreamRequest) -> DocumentStream {
        let config = self.config.clone();
        let builder = Arc::clone(&self.builder);
        let storage = Arc::clone(&self.storage);

        let s = stream! {
            // Counting
            let spec = request.query_spec();
            let total = match count_total(builder.as_ref(), storage.as_ref(), &spec).await {
                Ok(total) => total,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };
            let mut cursor =
                StreamCursor::new(request.limit, request.offset, request.multiplier, total);
            debug!(
                total,
                total_pages = cursor.total_pages(),
                limit = request.limit,
                offset = request.offset,
                multiplier = request.multiplier,
                "counted matching rows"
            );

            // Preparing
            let statement = match builder.select(&spec) {
                Ok(statement) => statement,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };
            let mut prepared = match storage.prepare(&statement).await {
                Ok(prepared) => prepared,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            // The parameter set is owned by this stream for its lifetime;
            // only the window entries change between fetches.
            let mut params = statement.params.clone();
            let chunk_size = config.chunk_size.min(request.limit);
            let mut fetch_offset = request.offset;
            let mut chunk: VecDeque<DocumentRow> = VecDeque::new();
            let mut first = true;

            // Emitting
            loop {
                throttle(&config).await;
                if cursor.exhausted() {
                    break;
                }

                if chunk.is_empty() {
                    chunk = match next_chunk(
                        prepared.as_mut(),
                        &mut params,
                        chunk_size,
                        &mut fetch_offset,
                    )
                    .await
                    {
                        Ok(rows) => rows,
                        Err(e) => {
                            yield Err(e);
                            return;
                        }
                    };

                    if chunk.is_empty() {
                        // Overflow: replay the physical result set from the
                        // top while the amplified demand is unmet.
                        if !cursor.can_replay() {
                            break;
                        }
                        cursor.begin_overflow_round();
                        fetch_offset = 0;
                        debug!(overflow = cursor.overflow(), "replaying result set");
                        chunk = match next_chunk(
                            prepared.as_mut(),
                            &mut params,
                            chunk_size,
                            &mut fetch_offset,
                        )
                        .await
                        {
                            Ok(rows) => rows,
                            Err(e) => {
                                yield Err(e);
                                return;
                            }
                        };
                        if chunk.is_empty() {
                            break;
                        }
                    }
                }

                let Some(row) = chunk.pop_front() else {
                    break;
                };
                let page = cursor.refresh_page();
                let text = match render(row, page, cursor.overflow(), request.extended) {
                    Ok(text) => text,
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                };
                let item = if first { text } else { format!("\n{text}") };
                first = false;
                yield Ok(item);
                cursor.advance();
            }
        };

        Box::pin(s)
    }

    /// Drain a whole stream into one NDJSON body.
    ///
    /// **Warning**: this buffers every record. For large result sets use
    /// [`Streamer::stream`] and forward the chunks as they arrive.
    pub async fn collect_body(&self, request: StreamRequest) -> Result<String> {
        let mut stream = self.stream(request);
        let mut body = String::new();

        while let Some(chunk) = stream.next().await {
            body.push_str(&chunk?);
        }

        Ok(body)
    }
}

/// Issue the count query and sum the per-type totals.
async fn count_total(
    builder: &dyn QueryBuilder,
    storage: &dyn Storage,
    spec: &QuerySpec,
) -> Result<u64> {
    let statement = builder.count(spec)?;
    let counts = storage.count(&statement).await?;
    Ok(counts.iter().map(|c| c.rows).sum())
}

/// Fetch the next bounded chunk at the running offset and advance it by the
/// number of rows actually returned. An empty chunk means the source is
/// exhausted at this offset.
async fn next_chunk(
    prepared: &mut dyn PreparedSelect,
    params: &mut Params,
    chunk_size: u64,
    fetch_offset: &mut u64,
) -> Result<VecDeque<DocumentRow>> {
    params.set_window(chunk_size, *fetch_offset);
    let rows = prepared.fetch(params).await?;
    *fetch_offset += rows.len() as u64;
    debug!(rows = rows.len(), next_offset = *fetch_offset, "fetched chunk");
    Ok(rows.into())
}

/// Rate-limiting delay before each production step: a fixed timer when
/// configured, otherwise the cheapest cooperative yield.
async fn throttle(config: &StreamConfig) {
    if config.throttle_ms == 0 {
        tokio::task::yield_now().await;
    } else {
        tokio::time::sleep(Duration::from_millis(config.throttle_ms)).await;
    }
}

/// Turn one raw row into its output document: identifier rewriting first,
/// then the extended-mode timestamp injection.
fn render(row: DocumentRow, page: u64, overflow: u64, extended: bool) -> Result<String> {
    let mut text = row.doc;

    if let Some(prefix) = round_prefix(page, overflow) {
        text = rewrite_identifiers(&text, &prefix);
    }

    if extended {
        let mut doc: Value = serde_json::from_str(&text)?;
        if let Value::Object(fields) = &mut doc {
            let modified = match row.modified {
                Some(t) => Value::String(t.to_rfc3339()),
                None => Value::Null,
            };
            fields.insert(MODIFIED_DATE_FIELD.to_string(), modified);
        }
        text = serde_json::to_string(&doc)?;
    }

    Ok(text)
}
