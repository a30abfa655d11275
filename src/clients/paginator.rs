//! Page-by-page traversal of collection operations.
//!
//! Collection operations answer with a `TotalNumResults` counter for the
//! whole collection and a `NumResults` counter for the page at hand. A
//! [`Paginator`] turns repeated single-page calls into one sequence, driven
//! by a [`PageCursor`].

use crate::clients::client::MturkClient;
use crate::clients::errors::{InvalidArgumentError, MturkError, OperationError};
use crate::clients::operation_call::OperationCall;
use crate::clients::xml::XmlNode;

/// The largest page size the provider accepts.
pub const MAX_PAGE_SIZE: u32 = 65535;

/// Progress through a multi-page collection.
///
/// The cursor is pure bookkeeping; it never talks to the network, which lets
/// [`Paginator`] stay a thin loop around it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageCursor {
    page_number: u32,
    page_size: u32,
    page_size_limit: u32,
    records_fetched: u64,
    records_left: Option<u64>,
    max_records: Option<u64>,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl PageCursor {
    /// Creates an unstarted cursor with the largest page size and no cap.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            page_number: 0,
            page_size: MAX_PAGE_SIZE,
            page_size_limit: MAX_PAGE_SIZE,
            records_fetched: 0,
            records_left: None,
            max_records: None,
        }
    }

    /// Number of the last page requested, `0` before the first.
    #[must_use]
    pub const fn page_number(&self) -> u32 {
        self.page_number
    }

    /// Page size the next request will use, before shrinking to what remains.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Records received so far.
    #[must_use]
    pub const fn records_fetched(&self) -> u64 {
        self.records_fetched
    }

    /// Records not yet received, or `None` before the first page.
    #[must_use]
    pub const fn records_left(&self) -> Option<u64> {
        self.records_left
    }

    /// The caller's cap, or `None` when unlimited.
    #[must_use]
    pub const fn max_records(&self) -> Option<u64> {
        self.max_records
    }

    /// Sets or clears the record cap.
    ///
    /// A cap shrinks the page size right away so the first page never
    /// over-fetches.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgumentError::NegativeMaxRecords`] for negative caps.
    pub fn set_max_records(&mut self, max_records: Option<i64>) -> Result<(), InvalidArgumentError> {
        self.max_records = match max_records {
            None => None,
            Some(value) => Some(
                u64::try_from(value)
                    .map_err(|_| InvalidArgumentError::NegativeMaxRecords { value })?,
            ),
        };
        self.reset_page_size();
        Ok(())
    }

    /// Sets the preferred page size.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgumentError::PageSizeOutOfRange`] unless
    /// `1 <= page_size <= MAX_PAGE_SIZE`.
    pub fn set_page_size(&mut self, page_size: u32) -> Result<(), InvalidArgumentError> {
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(InvalidArgumentError::PageSizeOutOfRange {
                value: page_size,
                max: MAX_PAGE_SIZE,
            });
        }
        self.page_size_limit = page_size;
        self.reset_page_size();
        Ok(())
    }

    fn reset_page_size(&mut self) {
        self.page_size = match self.max_records {
            Some(cap) => shrink(self.page_size_limit, cap).max(1),
            None => self.page_size_limit,
        };
    }

    /// Returns `true` while records may remain and the cap is not reached.
    ///
    /// This is a pure query.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        let records_remain = self.records_left.map_or(true, |left| left > 0);
        let under_cap = self
            .max_records
            .map_or(true, |cap| self.records_fetched < cap);
        records_remain && under_cap
    }

    /// Advances to the next page and returns its `(page_number, page_size)`.
    ///
    /// The page size is shrunk to the known remainder and to what the cap
    /// still allows. Returns `None` when [`has_next_page`](Self::has_next_page)
    /// is false.
    pub fn advance(&mut self) -> Option<(u32, u32)> {
        if !self.has_next_page() {
            return None;
        }
        if let Some(left) = self.records_left {
            self.page_size = shrink(self.page_size, left);
        }
        if let Some(cap) = self.max_records {
            self.page_size = shrink(self.page_size, cap - self.records_fetched);
        }
        self.page_number += 1;
        Some((self.page_number, self.page_size))
    }

    /// Updates the counters from one page's `TotalNumResults` and `NumResults`.
    pub fn record(&mut self, total_num_results: u64, num_results: u64) {
        self.records_fetched = self.records_fetched.saturating_add(num_results);
        let left = match self.records_left {
            None => total_num_results.saturating_sub(num_results),
            Some(left) => left.saturating_sub(num_results),
        };
        self.records_left = Some(if num_results == 0 { 0 } else { left });
    }
}

fn shrink(page_size: u32, limit: u64) -> u32 {
    u32::try_from(limit).map_or(page_size, |limit| page_size.min(limit))
}

/// One page of a collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    /// The page number that was requested.
    pub page_number: u32,
    /// The page size that was requested.
    pub page_size: u32,
    /// Records on this page.
    pub num_results: u64,
    /// Records in the whole collection, as reported with this page.
    pub total_num_results: u64,
    /// The provider's id for this call.
    pub request_id: String,
    /// The result node without its `Request` sub-node.
    pub result: XmlNode,
}

/// Walks a collection operation one page per call.
///
/// Pages are fetched strictly in order: each fetch takes `&mut self` and
/// completes before the next can start.
///
/// # Example
///
/// ```rust,ignore
/// let call = OperationCall::builder("GetBlockedWorkers").build()?;
/// let mut pages = client.paginate(call);
/// pages.set_max_records(Some(100))?;
///
/// while let Some(page) = pages.fetch_next_page().await? {
///     for block in page.result.children_named("WorkerBlock") {
///         println!("{:?}", block.child_text("WorkerId"));
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Paginator<'a> {
    client: &'a MturkClient,
    call: OperationCall,
    result_name: String,
    cursor: PageCursor,
}

impl<'a> Paginator<'a> {
    pub(crate) fn new(client: &'a MturkClient, call: OperationCall, result_name: String) -> Self {
        Self {
            client,
            call,
            result_name,
            cursor: PageCursor::new(),
        }
    }

    /// Returns the cursor.
    #[must_use]
    pub const fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    /// Returns the base call the pages are derived from.
    #[must_use]
    pub const fn call(&self) -> &OperationCall {
        &self.call
    }

    /// See [`PageCursor::set_max_records`].
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgumentError::NegativeMaxRecords`] for negative caps.
    pub fn set_max_records(&mut self, max_records: Option<i64>) -> Result<(), InvalidArgumentError> {
        self.cursor.set_max_records(max_records)
    }

    /// See [`PageCursor::set_page_size`].
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgumentError::PageSizeOutOfRange`] for sizes outside
    /// `1..=MAX_PAGE_SIZE`.
    pub fn set_page_size(&mut self, page_size: u32) -> Result<(), InvalidArgumentError> {
        self.cursor.set_page_size(page_size)
    }

    /// See [`PageCursor::has_next_page`].
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.cursor.has_next_page()
    }

    /// Records received so far.
    #[must_use]
    pub const fn records_fetched(&self) -> u64 {
        self.cursor.records_fetched()
    }

    /// Records not yet received, or `None` before the first page.
    #[must_use]
    pub const fn records_left(&self) -> Option<u64> {
        self.cursor.records_left()
    }

    /// Fetches the next page.
    ///
    /// Returns `Ok(None)` without any network call once the collection is
    /// exhausted or the cap is reached.
    ///
    /// A failed page is not retried on a later call: the cursor has already
    /// moved past it, so the next fetch asks for the following page. After
    /// an error, start a new paginator.
    ///
    /// # Errors
    ///
    /// Returns any error from [`MturkClient::execute`] or
    /// [`Envelope::retrieve_result`](crate::clients::Envelope::retrieve_result),
    /// and [`OperationError::MissingField`] or
    /// [`OperationError::InvalidField`] when the page counters are absent or
    /// not non-negative integers, or when `NumResults` exceeds the page size
    /// that was requested.
    pub async fn fetch_next_page(&mut self) -> Result<Option<Page>, MturkError> {
        let Some((page_number, page_size)) = self.cursor.advance() else {
            return Ok(None);
        };

        tracing::debug!(
            operation = self.call.operation(),
            page_number,
            page_size,
            "Fetching page"
        );

        let call = self
            .call
            .with_param("PageNumber", page_number.to_string())?
            .with_param("PageSize", page_size.to_string())?;
        let envelope = self.client.execute(&call).await?;
        let result = envelope
            .retrieve_result(&self.result_name)?
            .into_payload()
            .ok_or_else(|| OperationError::MissingField {
                field: "NumResults".to_string(),
            })?;

        let total_num_results = counter(&result, "TotalNumResults")?;
        let num_results = counter(&result, "NumResults")?;
        if num_results > u64::from(page_size) {
            return Err(OperationError::InvalidField {
                field: "NumResults".to_string(),
                value: num_results.to_string(),
            }
            .into());
        }

        if num_results == 0 && self.cursor.records_left().unwrap_or(total_num_results) > 0 {
            tracing::warn!(
                operation = self.call.operation(),
                page_number,
                "Empty page while records remain; ending the sequence"
            );
        }
        self.cursor.record(total_num_results, num_results);

        Ok(Some(Page {
            page_number,
            page_size,
            num_results,
            total_num_results,
            request_id: envelope.request_id().to_string(),
            result,
        }))
    }

    /// Fetches every remaining page and collects the children named
    /// `item_name` from each.
    ///
    /// # Errors
    ///
    /// Stops at the first failing page and returns its error; records from
    /// earlier pages are discarded.
    pub async fn collect_all(&mut self, item_name: &str) -> Result<Vec<XmlNode>, MturkError> {
        let mut items = Vec::new();
        while let Some(page) = self.fetch_next_page().await? {
            items.extend(page.result.children_named(item_name).cloned());
        }
        Ok(items)
    }
}

fn counter(result: &XmlNode, field: &str) -> Result<u64, OperationError> {
    let value = result
        .child_text(field)
        .ok_or_else(|| OperationError::MissingField {
            field: field.to_string(),
        })?;
    value
        .trim()
        .parse()
        .map_err(|_| OperationError::InvalidField {
            field: field.to_string(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cursor_is_unstarted() {
        let cursor = PageCursor::new();
        assert_eq!(cursor.page_number(), 0);
        assert_eq!(cursor.page_size(), MAX_PAGE_SIZE);
        assert_eq!(cursor.records_fetched(), 0);
        assert_eq!(cursor.records_left(), None);
        assert_eq!(cursor.max_records(), None);
        assert!(cursor.has_next_page());
    }

    #[test]
    fn test_three_pages_of_fifty_then_exhausted() {
        let mut cursor = PageCursor::new();
        cursor.set_page_size(50).unwrap();

        for expected_page in 1..=3 {
            assert_eq!(cursor.advance(), Some((expected_page, 50)));
            cursor.record(150, 50);
        }

        assert_eq!(cursor.records_fetched(), 150);
        assert_eq!(cursor.records_left(), Some(0));
        assert!(!cursor.has_next_page());
        assert_eq!(cursor.advance(), None);
        assert_eq!(cursor.page_number(), 3);
    }

    #[test]
    fn test_cap_shrinks_first_page() {
        let mut cursor = PageCursor::new();
        cursor.set_max_records(Some(60)).unwrap();
        assert_eq!(cursor.page_size(), 60);

        assert_eq!(cursor.advance(), Some((1, 60)));
        cursor.record(150, 60);

        assert_eq!(cursor.records_fetched(), 60);
        assert_eq!(cursor.records_left(), Some(90));
        assert!(!cursor.has_next_page());
    }

    #[test]
    fn test_cap_shrinks_last_page() {
        let mut cursor = PageCursor::new();
        cursor.set_page_size(50).unwrap();
        cursor.set_max_records(Some(60)).unwrap();

        assert_eq!(cursor.advance(), Some((1, 50)));
        cursor.record(150, 50);
        assert_eq!(cursor.advance(), Some((2, 10)));
        cursor.record(150, 10);

        assert_eq!(cursor.records_fetched(), 60);
        assert!(!cursor.has_next_page());
    }

    #[test]
    fn test_page_size_after_cap_still_honours_cap() {
        let mut cursor = PageCursor::new();
        cursor.set_max_records(Some(30)).unwrap();
        cursor.set_page_size(50).unwrap();
        assert_eq!(cursor.page_size(), 30);
    }

    #[test]
    fn test_remainder_shrinks_page() {
        let mut cursor = PageCursor::new();
        cursor.set_page_size(40).unwrap();

        assert_eq!(cursor.advance(), Some((1, 40)));
        cursor.record(50, 40);
        assert_eq!(cursor.advance(), Some((2, 10)));
        cursor.record(50, 10);
        assert!(!cursor.has_next_page());
    }

    #[test]
    fn test_zero_cap_has_no_pages() {
        let mut cursor = PageCursor::new();
        cursor.set_max_records(Some(0)).unwrap();
        assert!(!cursor.has_next_page());
        assert_eq!(cursor.advance(), None);
        assert_eq!(cursor.page_number(), 0);
    }

    #[test]
    fn test_cap_above_total_ends_when_records_run_out() {
        let mut cursor = PageCursor::new();
        cursor.set_max_records(Some(1000)).unwrap();

        assert_eq!(cursor.advance(), Some((1, 1000)));
        cursor.record(20, 20);

        assert_eq!(cursor.records_fetched(), 20);
        assert!(!cursor.has_next_page());
    }

    #[test]
    fn test_clearing_cap_restores_page_size() {
        let mut cursor = PageCursor::new();
        cursor.set_max_records(Some(5)).unwrap();
        cursor.set_max_records(None).unwrap();
        assert_eq!(cursor.page_size(), MAX_PAGE_SIZE);
        assert_eq!(cursor.max_records(), None);
    }

    #[test]
    fn test_negative_cap_is_rejected() {
        let mut cursor = PageCursor::new();
        assert_eq!(
            cursor.set_max_records(Some(-1)),
            Err(InvalidArgumentError::NegativeMaxRecords { value: -1 })
        );
        assert_eq!(cursor.max_records(), None);
    }

    #[test]
    fn test_page_size_range_is_enforced() {
        let mut cursor = PageCursor::new();
        assert!(cursor.set_page_size(0).is_err());
        assert!(cursor.set_page_size(MAX_PAGE_SIZE + 1).is_err());
        assert!(cursor.set_page_size(MAX_PAGE_SIZE).is_ok());
    }

    #[test]
    fn test_empty_page_while_records_remain_ends_sequence() {
        let mut cursor = PageCursor::new();
        cursor.advance();
        cursor.record(100, 0);
        assert_eq!(cursor.records_left(), Some(0));
        assert!(!cursor.has_next_page());
    }

    #[test]
    fn test_record_saturates_huge_counters() {
        let mut cursor = PageCursor::new();
        cursor.record(u64::MAX, 1 << 63);
        cursor.record(u64::MAX, 1 << 63);
        assert_eq!(cursor.records_fetched(), u64::MAX);
    }

    #[test]
    fn test_has_next_page_is_side_effect_free() {
        let cursor = PageCursor::new();
        let before = cursor.clone();
        for _ in 0..5 {
            assert!(cursor.has_next_page());
        }
        assert_eq!(cursor, before);
    }

    #[test]
    fn test_exhausted_paginator_answers_without_network() {
        use crate::auth::Credentials;
        use crate::config::{AccessKeyId, Environment, SecretKey};

        let credentials = Credentials::new(
            AccessKeyId::new("AK").unwrap(),
            SecretKey::new("SK").unwrap(),
            Environment::Sandbox,
        );
        let client = MturkClient::new(credentials, None);
        let call = OperationCall::builder("GetBlockedWorkers").build().unwrap();

        let mut pages = client.paginate(call);
        pages.set_max_records(Some(0)).unwrap();

        assert!(tokio_test::block_on(pages.fetch_next_page())
            .unwrap()
            .is_none());
        assert!(tokio_test::block_on(pages.collect_all("WorkerBlock"))
            .unwrap()
            .is_empty());
        assert_eq!(pages.cursor().page_number(), 0);
    }

    #[test]
    fn test_counter_parsing() {
        let result = XmlNode {
            name: "R".to_string(),
            text: String::new(),
            children: vec![
                XmlNode::with_text("NumResults", "12"),
                XmlNode::with_text("TotalNumResults", "-3"),
            ],
        };
        assert_eq!(counter(&result, "NumResults"), Ok(12));
        assert_eq!(
            counter(&result, "TotalNumResults"),
            Err(OperationError::InvalidField {
                field: "TotalNumResults".to_string(),
                value: "-3".to_string(),
            })
        );
        assert_eq!(
            counter(&result, "PageNumber"),
            Err(OperationError::MissingField {
                field: "PageNumber".to_string(),
            })
        );
    }
}
