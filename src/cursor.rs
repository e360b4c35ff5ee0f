//! Pagination bookkeeping for one stream.

/// Mutable cursor state owned by exactly one stream.
///
/// Groups the offset, page, overflow and row bookkeeping that the fetch,
/// replay and emit steps all touch. The cursor is passed by exclusive
/// reference through those steps and never aliased; `page` and `overflow`
/// only ever grow over the lifetime of a stream.
#[derive(Clone, Debug)]
pub struct StreamCursor {
    limit: u64,
    offset: u64,
    multiplier: u64,
    /// Count of physically matching rows, ignoring the multiplier.
    total: u64,
    /// 1-based logical page of the most recently emitted row.
    page: u64,
    /// `ceil(total * multiplier / limit)`.
    total_pages: u64,
    /// Completed replay rounds over the physical result set.
    overflow: u64,
    /// Logical rows emitted so far.
    row_index: u64,
}

impl StreamCursor {
    /// Initialize from the physical row count produced by the count query.
    pub fn new(limit: u64, offset: u64, multiplier: u64, total: u64) -> Self {
        let page = if limit == 0 { 1 } else { offset / limit + 1 };
        let total_pages = if limit == 0 {
            0
        } else {
            (total * multiplier).div_ceil(limit)
        };
        Self {
            limit,
            offset,
            multiplier,
            total,
            page,
            total_pages,
            overflow: 0,
            row_index: 0,
        }
    }

    /// Physical row count.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Current 1-based page.
    pub fn page(&self) -> u64 {
        self.page
    }

    /// Total logical pages, multiplier included.
    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    /// Completed overflow rounds.
    pub fn overflow(&self) -> u64 {
        self.overflow
    }

    /// Logical rows emitted so far.
    pub fn row_index(&self) -> u64 {
        self.row_index
    }

    /// Whether the logical limit has been reached.
    pub fn exhausted(&self) -> bool {
        self.row_index >= self.limit
    }

    /// Recompute `page` for the row about to be emitted and return it.
    pub fn refresh_page(&mut self) -> u64 {
        if self.limit != 0 {
            self.page = (self.offset + self.row_index) / self.limit + 1;
        }
        self.page
    }

    /// Record one emitted row.
    pub fn advance(&mut self) {
        self.row_index += 1;
    }

    /// Overflow-continuation rule: replay only while the amplified demand is
    /// unmet and the current page is still within bounds.
    ///
    /// The demand target is `total * multiplier - offset`, compared against
    /// `row_index` even though `row_index` advances across pages. Keep this
    /// exact arithmetic; it determines how many rows come out near boundary
    /// values.
    pub fn can_replay(&self) -> bool {
        let target = (self.total * self.multiplier).saturating_sub(self.offset);
        self.row_index < target && self.page <= self.total_pages
    }

    /// Start another replay round over the physical result set.
    pub fn begin_overflow_round(&mut self) {
        self.overflow += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_page_from_offset() {
        assert_eq!(StreamCursor::new(2, 0, 1, 5).page(), 1);
        assert_eq!(StreamCursor::new(2, 4, 1, 5).page(), 3);
        assert_eq!(StreamCursor::new(10, 25, 1, 100).page(), 3);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(StreamCursor::new(2, 0, 1, 5).total_pages(), 3);
        assert_eq!(StreamCursor::new(10, 0, 3, 4).total_pages(), 2);
        assert_eq!(StreamCursor::new(5, 0, 1, 10).total_pages(), 2);
        assert_eq!(StreamCursor::new(5, 0, 1, 0).total_pages(), 0);
    }

    #[test]
    fn zero_limit_is_degenerate_but_defined() {
        let cursor = StreamCursor::new(0, 3, 2, 10);
        assert!(cursor.exhausted());
        assert_eq!(cursor.page(), 1);
        assert_eq!(cursor.total_pages(), 0);
    }

    #[test]
    fn page_follows_emitted_rows() {
        let mut cursor = StreamCursor::new(3, 2, 1, 10);
        let mut pages = Vec::new();
        for _ in 0..4 {
            pages.push(cursor.refresh_page());
            cursor.advance();
        }
        // (2+k)/3 + 1 for k = 0..4
        assert_eq!(pages, vec![1, 2, 2, 2]);
    }

    #[test]
    fn page_is_monotonic_across_rounds() {
        let mut cursor = StreamCursor::new(4, 0, 3, 2);
        let mut last = 0;
        for _ in 0..6 {
            let page = cursor.refresh_page();
            assert!(page >= last);
            last = page;
            cursor.advance();
        }
    }

    #[test]
    fn replay_stops_once_demand_is_met() {
        // limit=2, offset=4, total=5, m=1: one row satisfies the demand.
        let mut cursor = StreamCursor::new(2, 4, 1, 5);
        cursor.refresh_page();
        cursor.advance();
        assert!(!cursor.can_replay());
    }

    #[test]
    fn replay_continues_while_demand_unmet() {
        // limit=10, offset=0, total=4, m=3: target is 12 rows over 2 pages.
        let mut cursor = StreamCursor::new(10, 0, 3, 4);
        for _ in 0..4 {
            cursor.refresh_page();
            cursor.advance();
        }
        assert!(cursor.can_replay());
        cursor.begin_overflow_round();
        for _ in 0..4 {
            cursor.refresh_page();
            cursor.advance();
        }
        assert!(cursor.can_replay());
        assert_eq!(cursor.overflow(), 1);
    }

    #[test]
    fn replay_denied_when_offset_exceeds_demand() {
        // offset beyond total * multiplier: target saturates to zero.
        let cursor = StreamCursor::new(2, 20, 1, 5);
        assert!(!cursor.can_replay());
    }

    #[test]
    fn replay_denied_for_empty_source() {
        // no physical rows at all: page 1 is already past the zero pages.
        let cursor = StreamCursor::new(2, 0, 3, 0);
        assert_eq!(cursor.total_pages(), 0);
        assert!(!cursor.can_replay());
    }
}
