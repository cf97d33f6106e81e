// List query construction
//
// Translates (page, filters) into the backend's Feathers-style query
// operators. Pagination is 1-based; ordering defaults to newest-updated
// first; the `-1` sentinel on equality filters means "no constraint"
// and is omitted from the query entirely.

/// Items per page across all list screens.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Sentinel for equality filters meaning "no constraint".
pub const NO_FILTER: i64 = -1;

/// Builder for list-endpoint query strings.
///
/// Produces pairs in bracket notation, e.g.
/// `$skip=0&$limit=10&$order[updatedAt]=DESC&name[$iLike]=%lamp%&categoryId=3`.
#[derive(Debug, Clone)]
pub struct ListQuery {
    page: u32,
    page_size: u32,
    order_field: String,
    search: Option<(String, String)>,
    equals: Vec<(String, i64)>,
    strings: Vec<(String, String)>,
}

impl ListQuery {
    /// Start a query for the given 1-based page.
    pub fn page(page: u32) -> Self {
        Self {
            page,
            page_size: DEFAULT_PAGE_SIZE,
            order_field: "updatedAt".to_owned(),
            search: None,
            equals: Vec::new(),
            strings: Vec::new(),
        }
    }

    /// Override the page size.
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Order descending by `field` instead of `updatedAt`.
    pub fn order_desc(mut self, field: &str) -> Self {
        self.order_field = field.to_owned();
        self
    }

    /// Case-insensitive substring match of `term` on `field`.
    ///
    /// An empty term still produces `%%`, which matches everything —
    /// the backend treats it as an unconstrained search.
    pub fn search(mut self, field: &str, term: &str) -> Self {
        self.search = Some((field.to_owned(), format!("%{term}%")));
        self
    }

    /// Equality constraint on `field`. [`NO_FILTER`] drops the constraint.
    pub fn equals(mut self, field: &str, value: i64) -> Self {
        if value != NO_FILTER {
            self.equals.push((field.to_owned(), value));
        }
        self
    }

    /// Equality constraint with a string value (e.g. an order status).
    pub fn equals_str(mut self, field: &str, value: &str) -> Self {
        self.strings.push((field.to_owned(), value.to_owned()));
        self
    }

    /// Render the query as key/value pairs for `reqwest::RequestBuilder::query`.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let skip = (self.page.max(1) - 1) * self.page_size;

        let mut pairs = vec![
            ("$skip".to_owned(), skip.to_string()),
            ("$limit".to_owned(), self.page_size.to_string()),
            (format!("$order[{}]", self.order_field), "DESC".to_owned()),
        ];

        if let Some((field, pattern)) = &self.search {
            pairs.push((format!("{field}[$iLike]"), pattern.clone()));
        }

        for (field, value) in &self.equals {
            pairs.push((field.clone(), value.to_string()));
        }

        for (field, value) in &self.strings {
            pairs.push((field.clone(), value.clone()));
        }

        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pair(pairs: &[(String, String)], key: &str) -> Option<String> {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    #[test]
    fn first_page_skips_nothing() {
        let pairs = ListQuery::page(1).to_pairs();
        assert_eq!(pair(&pairs, "$skip").as_deref(), Some("0"));
        assert_eq!(pair(&pairs, "$limit").as_deref(), Some("10"));
    }

    #[test]
    fn third_page_skips_two_pages() {
        let pairs = ListQuery::page(3).to_pairs();
        assert_eq!(pair(&pairs, "$skip").as_deref(), Some("20"));
    }

    #[test]
    fn orders_by_updated_at_desc_by_default() {
        let pairs = ListQuery::page(1).to_pairs();
        assert_eq!(pair(&pairs, "$order[updatedAt]").as_deref(), Some("DESC"));
    }

    #[test]
    fn search_becomes_case_insensitive_substring() {
        let pairs = ListQuery::page(1).search("name", "lamp").to_pairs();
        assert_eq!(pair(&pairs, "name[$iLike]").as_deref(), Some("%lamp%"));
    }

    #[test]
    fn empty_search_matches_everything() {
        let pairs = ListQuery::page(1).search("name", "").to_pairs();
        assert_eq!(pair(&pairs, "name[$iLike]").as_deref(), Some("%%"));
    }

    #[test]
    fn sentinel_equality_filter_is_omitted() {
        let pairs = ListQuery::page(1).equals("categoryId", NO_FILTER).to_pairs();
        assert_eq!(pair(&pairs, "categoryId"), None);
    }

    #[test]
    fn real_equality_filter_is_included() {
        let pairs = ListQuery::page(1).equals("categoryId", 3).to_pairs();
        assert_eq!(pair(&pairs, "categoryId").as_deref(), Some("3"));
    }
}
