pub const QUESTIONS_PER_PAGE: usize = 10;

/// Returns the 1-based `page` window of `items`. Pages past the end, and
/// page 0, come back empty.
pub fn paginate<T>(items: Vec<T>, page: usize) -> Vec<T> {
    let Some(start) = page
        .checked_sub(1)
        .and_then(|p| p.checked_mul(QUESTIONS_PER_PAGE))
    else {
        return vec![];
    };
    items
        .into_iter()
        .skip(start)
        .take(QUESTIONS_PER_PAGE)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected_len(len: usize, page: usize) -> usize {
        len.saturating_sub((page - 1) * QUESTIONS_PER_PAGE)
            .min(QUESTIONS_PER_PAGE)
    }

    #[test]
    fn window_length_matches_formula() {
        for len in [0, 1, 9, 10, 11, 19, 20, 21, 35] {
            for page in 1..=5 {
                let items: Vec<usize> = (0..len).collect();
                assert_eq!(
                    paginate(items, page).len(),
                    expected_len(len, page),
                    "len={len} page={page}"
                );
            }
        }
    }

    #[test]
    fn second_page_starts_at_offset_ten() {
        let items: Vec<usize> = (0..25).collect();
        assert_eq!(paginate(items, 2), (10..20).collect::<Vec<_>>());
    }

    #[test]
    fn page_zero_and_far_pages_are_empty() {
        assert!(paginate(vec![1, 2, 3], 0).is_empty());
        assert!(paginate(vec![1, 2, 3], 9999).is_empty());
        assert!(paginate(vec![1, 2, 3], usize::MAX).is_empty());
    }
}
