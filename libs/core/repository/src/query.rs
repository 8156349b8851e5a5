/// Pagination and ordering for list operations.
///
/// When `sort_field` is `None` the result order is backend-defined and
/// callers must not rely on it being stable.
#[derive(Debug, Clone)]
pub struct Page {
    /// Number of matching records to skip
    pub skip: u64,
    /// Maximum number of records to return
    pub limit: i64,
    /// Optional field to order by
    pub sort_field: Option<String>,
    /// Ascending unless explicitly set to false
    pub sort_ascending: bool,
}

impl Page {
    pub fn new(skip: u64, limit: i64) -> Self {
        Self {
            skip,
            limit,
            sort_field: None,
            sort_ascending: true,
        }
    }

    pub fn sorted_by(mut self, field: impl Into<String>, ascending: bool) -> Self {
        self.sort_field = Some(field.into());
        self.sort_ascending = ascending;
        self
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(0, 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults() {
        let page = Page::default();
        assert_eq!(page.skip, 0);
        assert_eq!(page.limit, 100);
        assert!(page.sort_field.is_none());
        assert!(page.sort_ascending);
    }

    #[test]
    fn test_page_sorted_by() {
        let page = Page::new(10, 20).sorted_by("seq", false);
        assert_eq!(page.sort_field.as_deref(), Some("seq"));
        assert!(!page.sort_ascending);
    }
}
