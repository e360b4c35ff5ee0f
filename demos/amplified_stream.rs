//! Streams an amplified in-memory dataset as NDJSON to stdout.
//!
//! Run with: `cargo run --example amplified_stream`

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;

use docstream::{
    DocumentRow, PARAM_LIMIT, PARAM_OFFSET, ParamValue, Params, PreparedSelect, QueryBuilder,
    QuerySpec, Result, Statement, Storage, StreamConfig, StreamRequest, Streamer, TypeCount,
};

/// Minimal in-memory backend: a fixed, ordered row set.
struct DemoStorage {
    rows: Vec<DocumentRow>,
}

struct DemoSelect {
    rows: Vec<DocumentRow>,
}

#[async_trait]
impl Storage for DemoStorage {
    async fn prepare(&self, _statement: &Statement) -> Result<Box<dyn PreparedSelect>> {
        Ok(Box::new(DemoSelect {
            rows: self.rows.clone(),
        }))
    }

    async fn count(&self, _statement: &Statement) -> Result<Vec<TypeCount>> {
        Ok(vec![TypeCount {
            resource_type: "Document".into(),
            rows: self.rows.len() as u64,
        }])
    }
}

#[async_trait]
impl PreparedSelect for DemoSelect {
    async fn fetch(&mut self, params: &Params) -> Result<Vec<DocumentRow>> {
        let limit = match params.get(PARAM_LIMIT) {
            Some(ParamValue::Int(v)) => *v as usize,
            _ => 0,
        };
        let offset = match params.get(PARAM_OFFSET) {
            Some(ParamValue::Int(v)) => *v as usize,
            _ => 0,
        };
        Ok(self.rows.iter().skip(offset).take(limit).cloned().collect())
    }
}

struct DemoBuilder;

impl QueryBuilder for DemoBuilder {
    fn select(&self, spec: &QuerySpec) -> Result<Statement> {
        Ok(Statement {
            sql: format!(
                "SELECT {} FROM documents ORDER BY id LIMIT $_limit OFFSET $_offset",
                spec.columns.join(", ")
            ),
            params: Params::new(),
        })
    }

    fn count(&self, _spec: &QuerySpec) -> Result<Statement> {
        Ok(Statement {
            sql: "SELECT resource_type, COUNT(*) FROM documents GROUP BY resource_type".into(),
            params: Params::new(),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let rows = (0..4)
        .map(|i| DocumentRow {
            doc: format!(
                r#"{{"resourceType":"Document","id":"00000000-0000-4000-8000-{:012x}","seq":{}}}"#,
                i, i
            ),
            modified: None,
        })
        .collect();

    let config = StreamConfig {
        throttle_ms: 50,
        ..StreamConfig::default()
    };
    let streamer = Streamer::new(config, Arc::new(DemoBuilder), Arc::new(DemoStorage { rows }));

    // Ask for more rows than exist: the stream replays the result set and
    // rewrites identifiers so every copy stays distinct.
    let request = StreamRequest::new(["Document"], 10).with_multiplier(3);

    let mut stream = streamer.stream(request);
    while let Some(chunk) = stream.next().await {
        print!("{}", chunk?);
    }
    println!();

    Ok(())
}
