//! Process-wide stream configuration.

use serde::Deserialize;

/// Configuration knobs for document streams.
///
/// Read once at stream construction; changing the values afterwards has no
/// effect on streams already running.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Default logical page size. The routing layer applies this when a
    /// request carries no explicit limit.
    pub page_size: u64,

    /// Maximum number of rows pulled from storage in a single fetch. Memory
    /// usage of a stream is proportional to this, not to the requested limit.
    pub chunk_size: u64,

    /// Fixed delay in milliseconds inserted before each production step,
    /// simulating slow consumption. Zero disables the delay and uses a plain
    /// cooperative yield instead.
    pub throttle_ms: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            chunk_size: 500,
            throttle_ms: 0,
        }
    }
}
