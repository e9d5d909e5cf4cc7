use serde::Serialize;

/// Every listing in the app shows this many posts per page.
pub const POSTS_PER_PAGE: usize = 3;

/// One page of an ordered sequence, plus the metadata the views need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Slices `items` into pages of [`POSTS_PER_PAGE`] and returns the requested
/// one. `None` means the first page; out-of-range numbers clamp to the
/// nearest valid page instead of erroring. An empty sequence yields a single
/// empty page.
pub fn paginate<T>(items: Vec<T>, page: Option<usize>) -> Page<T> {
    let total_pages = (items.len() + POSTS_PER_PAGE - 1) / POSTS_PER_PAGE;
    let total_pages = total_pages.max(1);
    let number = page.unwrap_or(1).clamp(1, total_pages);

    let items: Vec<T> = items
        .into_iter()
        .skip((number - 1) * POSTS_PER_PAGE)
        .take(POSTS_PER_PAGE)
        .collect();

    Page {
        items,
        number,
        total_pages,
        has_next: number < total_pages,
        has_previous: number > 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(n: usize) -> Vec<usize> {
        (1..=n).collect()
    }

    #[test]
    fn page_count_is_ceil_of_len_over_page_size() {
        for n in 1..=10 {
            let page = paginate(numbers(n), None);
            assert_eq!(page.total_pages, (n + 2) / 3, "n = {n}");
        }
    }

    #[test]
    fn last_page_holds_the_remainder() {
        for n in 1..=10 {
            let last = (n + 2) / 3;
            let page = paginate(numbers(n), Some(last));
            let expected = if n % 3 == 0 { 3 } else { n % 3 };
            assert_eq!(page.items.len(), expected, "n = {n}");
        }
    }

    #[test]
    fn missing_page_number_means_page_one() {
        let page = paginate(numbers(7), None);
        assert_eq!(page.number, 1);
        assert_eq!(page.items, vec![1, 2, 3]);
        assert!(page.has_next);
        assert!(!page.has_previous);
    }

    #[test]
    fn out_of_range_pages_clamp() {
        let below = paginate(numbers(7), Some(0));
        assert_eq!(below.number, 1);
        assert_eq!(below.items, vec![1, 2, 3]);

        let above = paginate(numbers(7), Some(99));
        assert_eq!(above.number, 3);
        assert_eq!(above.items, vec![7]);
        assert!(!above.has_next);
        assert!(above.has_previous);
    }

    #[test]
    fn middle_page_has_both_neighbours() {
        let page = paginate(numbers(7), Some(2));
        assert_eq!(page.items, vec![4, 5, 6]);
        assert!(page.has_next);
        assert!(page.has_previous);
    }

    #[test]
    fn empty_sequence_yields_one_empty_page() {
        let page = paginate(Vec::<usize>::new(), None);
        assert_eq!(page.number, 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
        assert!(!page.has_next);
        assert!(!page.has_previous);
    }
}
