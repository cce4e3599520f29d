//! Client for The National Map products catalog.

use tracing::debug;

use super::error::{CatalogError, CatalogResult};
use super::types::{BoundingBox, CatalogItem, CatalogResponse, ProductQuery};
use crate::http::HttpClient;

/// Base URL of the catalog API.
pub const CATALOG_BASE_URL: &str = "https://viewer.nationalmap.gov/tnmaccess/api";

/// API version literal sent with every request.
const API_VERSION: &str = "1";

/// Client for searching catalog products intersecting a bounding box.
///
/// Generic over [`HttpClient`] so tests can substitute a request-recording
/// mock.
pub struct CatalogClient<C: HttpClient> {
    pub(crate) http_client: C,
    base_url: String,
}

impl<C: HttpClient> CatalogClient<C> {
    /// Creates a client against the production catalog endpoint.
    pub fn new(http_client: C) -> Self {
        Self::with_base_url(http_client, CATALOG_BASE_URL)
    }

    /// Creates a client against a custom endpoint.
    pub fn with_base_url(http_client: C, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    /// Searches for products matching the query that intersect `bbox`.
    ///
    /// Pagination: if the first response reports more results than it
    /// carries, further pages are requested with `offset` advancing by
    /// the first page's item count until the reported total is reached.
    /// The first page's count is the stride for every subsequent request,
    /// whatever the later pages return.
    ///
    /// Items with `bestFitIndex <= 0` are filtered from the result.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Transport`] on HTTP failure,
    /// [`CatalogError::Malformed`] on an undecodable response or a first
    /// page with zero items but a nonzero total.
    pub fn search(
        &self,
        bbox: &BoundingBox,
        query: &ProductQuery,
    ) -> CatalogResult<Vec<CatalogItem>> {
        let url = format!("{}/products", self.base_url);
        let params = vec![
            ("datasets".to_string(), query.product.dataset_name().to_string()),
            ("bbox".to_string(), bbox.to_query_value()),
            ("outputFormat".to_string(), "JSON".to_string()),
            ("version".to_string(), API_VERSION.to_string()),
            ("prodExtents".to_string(), query.extent.as_str().to_string()),
            ("prodFormats".to_string(), query.format.as_str().to_string()),
        ];

        let first = self.request_page(&url, &params)?;
        let total = first.total;
        let mut items = first.items;

        if (items.len() as u64) < total {
            let stride = items.len() as u64;
            if stride == 0 {
                return Err(CatalogError::Malformed {
                    reason: format!("empty first page but total of {}", total),
                });
            }

            let mut offset = stride;
            while offset < total {
                let mut page_params = params.clone();
                page_params.push(("offset".to_string(), offset.to_string()));
                let page = self.request_page(&url, &page_params)?;
                items.extend(page.items);
                offset += stride;
            }
        }

        debug!(
            product = query.product.as_str(),
            retrieved = items.len(),
            "catalog search complete"
        );

        Ok(items
            .into_iter()
            .filter(|item| item.best_fit_index > 0.0)
            .collect())
    }

    fn request_page(&self, url: &str, params: &[(String, String)]) -> CatalogResult<CatalogResponse> {
        let body = self.http_client.get(url, params)?;
        serde_json::from_slice(&body).map_err(|e| CatalogError::Malformed {
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::{DataProduct, ProductExtent, ProductFormat};
    use crate::http::tests::MockHttpClient;

    fn test_bbox() -> BoundingBox {
        BoundingBox::new(-124.0, 46.0, -117.0, 49.0).unwrap()
    }

    fn test_query() -> ProductQuery {
        ProductQuery::new(
            DataProduct::Nhd,
            ProductExtent::Hu8Subbasin,
            ProductFormat::FileGdb,
        )
    }

    /// Builds a response body with `count` items, each with the given
    /// relevance score, reporting `total` results overall.
    fn page(count: usize, total: u64, score: f64) -> Vec<u8> {
        let items: Vec<String> = (0..count)
            .map(|i| {
                format!(
                    r#"{{"downloadURL": "https://example.com/file{}.zip", "bestFitIndex": {}}}"#,
                    i, score
                )
            })
            .collect();
        format!(r#"{{"items": [{}], "total": {}}}"#, items.join(","), total).into_bytes()
    }

    #[test]
    fn test_single_page_returns_immediately() {
        let mock = MockHttpClient::with_body(page(3, 3, 1.0));
        let client = CatalogClient::new(mock);

        let items = client.search(&test_bbox(), &test_query()).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(client.http_client.request_count(), 1);
    }

    #[test]
    fn test_query_parameters() {
        let mock = MockHttpClient::with_body(page(1, 1, 1.0));
        let client = CatalogClient::new(mock);
        client.search(&test_bbox(), &test_query()).unwrap();

        let requests = client.http_client.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.ends_with("/products"));
        assert_eq!(
            requests[0].param("datasets"),
            Some("National Hydrography Dataset (NHD) Best Resolution")
        );
        assert_eq!(requests[0].param("bbox"), Some("-124,46,-117,49"));
        assert_eq!(requests[0].param("outputFormat"), Some("JSON"));
        assert_eq!(requests[0].param("version"), Some("1"));
        assert_eq!(requests[0].param("prodExtents"), Some("HU-8 Subbasin"));
        assert_eq!(requests[0].param("prodFormats"), Some("FileGDB 10.1"));
        assert_eq!(requests[0].param("offset"), None);
    }

    #[test]
    fn test_pagination_strides_by_first_page_count() {
        // total=250 served in pages of 100: expect requests at offsets
        // (absent), 100, 200 and all 250 items retrieved.
        let mock = MockHttpClient::with_responses(vec![
            Ok(page(100, 250, 1.0)),
            Ok(page(100, 250, 1.0)),
            Ok(page(50, 250, 1.0)),
        ]);
        let client = CatalogClient::new(mock);

        let items = client.search(&test_bbox(), &test_query()).unwrap();
        assert_eq!(items.len(), 250);

        let requests = client.http_client.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].param("offset"), None);
        assert_eq!(requests[1].param("offset"), Some("100"));
        assert_eq!(requests[2].param("offset"), Some("200"));
    }

    #[test]
    fn test_relevance_filter_drops_nonpositive_scores() {
        let body = format!(
            r#"{{"items": [
                {{"downloadURL": "https://example.com/keep.zip", "bestFitIndex": 0.5}},
                {{"downloadURL": "https://example.com/zero.zip", "bestFitIndex": 0}},
                {{"downloadURL": "https://example.com/neg.zip", "bestFitIndex": -1}}
            ], "total": 3}}"#
        );
        let mock = MockHttpClient::with_body(body.into_bytes());
        let client = CatalogClient::new(mock);

        let items = client.search(&test_bbox(), &test_query()).unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0].download_url.ends_with("keep.zip"));
    }

    #[test]
    fn test_relevance_filter_applies_after_pagination() {
        let mock = MockHttpClient::with_responses(vec![
            Ok(page(2, 4, 0.0)),
            Ok(page(2, 4, 2.0)),
        ]);
        let client = CatalogClient::new(mock);

        let items = client.search(&test_bbox(), &test_query()).unwrap();
        // All four retrieved, only the second page's items survive.
        assert_eq!(items.len(), 2);
        assert_eq!(client.http_client.request_count(), 2);
    }

    #[test]
    fn test_malformed_response() {
        let mock = MockHttpClient::with_body(b"<html>not json</html>".to_vec());
        let client = CatalogClient::new(mock);

        let result = client.search(&test_bbox(), &test_query());
        assert!(matches!(result, Err(CatalogError::Malformed { .. })));
    }

    #[test]
    fn test_empty_first_page_with_nonzero_total_is_malformed() {
        let mock = MockHttpClient::with_body(page(0, 10, 1.0));
        let client = CatalogClient::new(mock);

        let result = client.search(&test_bbox(), &test_query());
        assert!(matches!(result, Err(CatalogError::Malformed { .. })));
        assert_eq!(client.http_client.request_count(), 1);
    }

    #[test]
    fn test_empty_result_set_is_ok() {
        let mock = MockHttpClient::with_body(page(0, 0, 1.0));
        let client = CatalogClient::new(mock);

        let items = client.search(&test_bbox(), &test_query()).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_transport_error_propagates() {
        let mock = MockHttpClient::with_responses(vec![Err(
            crate::http::TransportError::Request {
                url: "https://example.com".to_string(),
                reason: "connection refused".to_string(),
            },
        )]);
        let client = CatalogClient::new(mock);

        let result = client.search(&test_bbox(), &test_query());
        assert!(matches!(result, Err(CatalogError::Transport(_))));
    }

    #[test]
    fn test_invalid_query_never_reaches_transport() {
        // String input is validated while building the query, before a
        // client could issue anything: the mock sees zero requests.
        let mock = MockHttpClient::with_body(page(1, 1, 1.0));
        let client = CatalogClient::new(mock);

        let query = ProductQuery::parse("bogus", "State", "IMG");
        assert!(matches!(
            query,
            Err(CatalogError::InvalidArgument { field: "product", .. })
        ));
        assert_eq!(client.http_client.request_count(), 0);
    }
}
