//! Page windowing over filtered results

use super::params::PageSpec;

/// Filtered results cut into the requested pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedWindow<T> {
    pub pages: Vec<Vec<T>>,
    /// Items across all pages
    pub returned: usize,
    /// True if filtered items exist past the last page
    pub has_more_items: bool,
}

impl<T> PagedWindow<T> {
    /// Drops the page offset, takes up to `page_size * page_count` items and chunks them.
    ///
    /// Without a `PageSpec` the whole sequence is one page, empty or not. A window that starts
    /// past the end of `filtered` yields no pages rather than one empty page.
    pub fn cut(filtered: Vec<T>, page: Option<&PageSpec>) -> Self {
        let found = filtered.len();

        let Some(page) = page else {
            return Self {
                pages: vec![filtered],
                returned: found,
                has_more_items: false,
            };
        };

        let offset = page.offset();
        let page_size = page.page_size() as usize;

        let mut remaining = filtered
            .into_iter()
            .skip(offset)
            .take(page.window_size())
            .peekable();

        let mut pages = Vec::new();
        let mut returned = 0;
        while remaining.peek().is_some() {
            let chunk: Vec<T> = remaining.by_ref().take(page_size).collect();
            returned += chunk.len();
            pages.push(chunk);
        }

        Self {
            pages,
            returned,
            has_more_items: offset.saturating_add(returned) < found,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nine() -> Vec<u32> {
        (0..9).collect()
    }

    fn sizes<T>(window: &PagedWindow<T>) -> Vec<usize> {
        window.pages.iter().map(Vec::len).collect()
    }

    #[test]
    fn test_two_pages_last_short() {
        let page = PageSpec::new(0, 5, 1, 2).unwrap();
        let window = PagedWindow::cut(nine(), Some(&page));
        assert_eq!(sizes(&window), vec![5, 4]);
        assert_eq!(window.returned, 9);
        assert!(!window.has_more_items);
    }

    #[test]
    fn test_skip_then_three_pages() {
        let page = PageSpec::new(2, 3, 1, 3).unwrap();
        let window = PagedWindow::cut(nine(), Some(&page));
        assert_eq!(sizes(&window), vec![3, 3, 1]);
        assert_eq!(window.pages[0], vec![2, 3, 4]);
        assert_eq!(window.returned, 7);
        assert!(!window.has_more_items);
    }

    #[test]
    fn test_window_shorter_than_results() {
        let page = PageSpec::new(2, 3, 1, 2).unwrap();
        let window = PagedWindow::cut(nine(), Some(&page));
        assert_eq!(sizes(&window), vec![3, 3]);
        assert_eq!(window.returned, 6);
        assert!(window.has_more_items);
    }

    #[test]
    fn test_skip_past_end_yields_no_pages() {
        let page = PageSpec::new(20, 3, 1, 2).unwrap();
        let window = PagedWindow::cut(nine(), Some(&page));
        assert_eq!(window.page_count(), 0);
        assert_eq!(window.returned, 0);
        assert!(!window.has_more_items);
    }

    #[test]
    fn test_start_page() {
        let page = PageSpec::new(0, 4, 2, 1).unwrap();
        let window = PagedWindow::cut(nine(), Some(&page));
        assert_eq!(window.pages, vec![vec![4, 5, 6, 7]]);
        assert!(window.has_more_items);
    }

    #[test]
    fn test_unpaged_is_single_page() {
        let window = PagedWindow::cut(nine(), None);
        assert_eq!(sizes(&window), vec![9]);
        assert!(!window.has_more_items);
    }

    #[test]
    fn test_unpaged_empty_is_one_empty_page() {
        let window = PagedWindow::cut(Vec::<u32>::new(), None);
        assert_eq!(window.page_count(), 1);
        assert!(window.pages[0].is_empty());
        assert_eq!(window.returned, 0);
        assert!(!window.has_more_items);
    }
}
