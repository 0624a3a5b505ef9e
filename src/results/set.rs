//! Append-only result sequence with page-fetch-on-demand

use super::types::{PageCursor, SearchHit};
use crate::error::SearchError;
use crate::search::SearchClient;

/// An ordered sequence of [`SearchHit`] records backed by a paginated
/// provider query.
///
/// Records stay in server return order, preserved across pages; the set
/// is only ever appended to, never reordered or deduplicated. Iteration
/// is forward-only and single-pass: [`ResultSet::has_next`] pulls further
/// pages from the owning [`SearchClient`] once the buffered records are
/// consumed, so the caller never needs to know whether the next logical
/// record is already resident.
#[derive(Debug)]
pub struct ResultSet {
    client: SearchClient,
    hits: Vec<SearchHit>,
    cursor: Option<PageCursor>,
    position: usize,
}

impl ResultSet {
    pub(crate) fn new(client: SearchClient, hits: Vec<SearchHit>, cursor: Option<PageCursor>) -> Self {
        Self {
            client,
            hits,
            cursor,
            position: 0,
        }
    }

    /// Number of buffered records. Only ever grows.
    pub fn size(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// True while the provider still reports a further page. Once false
    /// it never becomes true again.
    pub fn has_more_pages(&self) -> bool {
        self.cursor.is_some()
    }

    /// All buffered records, in server return order.
    pub fn hits(&self) -> &[SearchHit] {
        &self.hits
    }

    pub(crate) fn cursor(&self) -> Option<&PageCursor> {
        self.cursor.as_ref()
    }

    pub(crate) fn append_page(&mut self, hits: Vec<SearchHit>, cursor: Option<PageCursor>) {
        self.hits.extend(hits);
        self.cursor = cursor;
    }

    /// Append another set's buffered records verbatim. Pagination state
    /// of `other` is not transferred.
    pub fn add_all(&mut self, other: ResultSet) {
        self.hits.extend(other.hits);
    }

    /// Pull further pages from the owning client until new records appear
    /// or no page remains. Returns the number of records appended.
    pub async fn fetch_next_page(&mut self) -> Result<usize, SearchError> {
        let client = self.client.clone();
        client.fetch_next_page(self).await
    }

    /// True if an unconsumed record exists. May suspend to fetch the next
    /// page when the buffer is exhausted and more pages remain.
    pub async fn has_next(&mut self) -> Result<bool, SearchError> {
        if self.position >= self.hits.len() && self.has_more_pages() {
            self.fetch_next_page().await?;
        }
        Ok(self.position < self.hits.len())
    }

    /// The next record in server order. Fails with
    /// [`SearchError::IterationExhausted`] once no record remains.
    pub async fn next(&mut self) -> Result<SearchHit, SearchError> {
        if self.has_next().await? {
            let hit = self.hits[self.position].clone();
            self.position += 1;
            Ok(hit)
        } else {
            Err(SearchError::IterationExhausted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::HttpClient;
    use crate::providers::stub::StubProvider;
    use serde_json::json;

    fn hit(name: &str) -> SearchHit {
        let mut fields = serde_json::Map::new();
        fields.insert("id".to_string(), json!(name));
        SearchHit::new(name, fields, format!("hit {}", name))
    }

    fn buffered_set(names: &[&str], cursor: Option<PageCursor>) -> ResultSet {
        let client = SearchClient::new(
            StubProvider::new("http://unused.invalid/"),
            HttpClient::new().unwrap(),
        );
        ResultSet::new(client, names.iter().map(|n| hit(n)).collect(), cursor)
    }

    #[tokio::test]
    async fn test_iterates_buffered_records_in_order() {
        let mut set = buffered_set(&["a", "b", "c"], None);
        assert_eq!(set.size(), 3);
        assert!(!set.has_more_pages());

        let mut seen = Vec::new();
        while set.has_next().await.unwrap() {
            seen.push(set.next().await.unwrap().name().to_string());
        }
        assert_eq!(seen, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_next_past_end_is_exhausted() {
        let mut set = buffered_set(&["a"], None);
        set.next().await.unwrap();

        let err = set.next().await.unwrap_err();
        assert!(matches!(err, SearchError::IterationExhausted));
    }

    #[tokio::test]
    async fn test_add_all_appends_without_pagination_transfer() {
        let mut set = buffered_set(&["a", "b"], None);
        let other = buffered_set(&["c"], Some(PageCursor::new("http://unused.invalid/page2")));

        set.add_all(other);
        assert_eq!(set.size(), 3);
        assert!(!set.has_more_pages());
        assert_eq!(set.hits()[2].name(), "c");
    }

    #[tokio::test]
    async fn test_fetch_next_page_without_cursor_is_noop() {
        let mut set = buffered_set(&["a"], None);
        assert_eq!(set.fetch_next_page().await.unwrap(), 0);
        assert_eq!(set.size(), 1);
    }
}
