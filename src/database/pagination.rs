use serde::{Deserialize, Serialize};

/// One page of a filtered listing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub pages: i64,
}

impl<T> Page<T> {
    /// `per_page` must be positive; callers validate before querying.
    pub fn from_rows(items: Vec<T>, total: i64, page: i64, per_page: i64) -> Self {
        Self {
            items,
            total,
            page,
            per_page,
            pages: page_count(total, per_page),
        }
    }
}

pub fn page_count(total: i64, per_page: i64) -> i64 {
    total / per_page + i64::from(total % per_page != 0)
}

/// Row offset of the first item on a 1-based page.
pub fn page_offset(page: i64, per_page: i64) -> i64 {
    (page - 1).saturating_mul(per_page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, 50), 0);
        assert_eq!(page_count(1, 50), 1);
        assert_eq!(page_count(50, 50), 1);
        assert_eq!(page_count(51, 50), 2);
        assert_eq!(page_count(7, 1), 7);
    }

    #[test]
    fn offsets_are_one_based() {
        assert_eq!(page_offset(1, 50), 0);
        assert_eq!(page_offset(3, 10), 20);
    }
}
