use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Sortable columns shared by every listing. Entities without the
/// requested column fall back to their creation time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sort {
    #[default]
    Created,
    Updated,
    Views,
    Likes,
    Rank,
    RentPrice,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Asc,
    #[default]
    Desc,
}

impl Direction {
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PageRequest {
    #[serde(default = "PageRequest::default_page")]
    pub page: u32,
    #[serde(default = "PageRequest::default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub sort: Sort,
    #[serde(default)]
    pub direction: Direction,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: Self::default_page(),
            limit: Self::default_limit(),
            sort: Sort::default(),
            direction: Direction::default(),
        }
    }
}

impl PageRequest {
    pub const MAX_LIMIT: u32 = 100;

    const fn default_page() -> u32 {
        1
    }

    const fn default_limit() -> u32 {
        10
    }

    #[must_use]
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn sorted(mut self, sort: Sort, direction: Direction) -> Self {
        self.sort = sort;
        self.direction = direction;
        self
    }

    /// Pages are 1-based.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.page >= 1 && (1..=Self::MAX_LIMIT).contains(&self.limit)
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    /// Applies sorting and the page window to rows already filtered in memory.
    pub(crate) fn apply<T, F>(&self, mut rows: Vec<T>, key: F) -> Paginated<T>
    where
        F: Fn(&T, Sort) -> SortKey,
    {
        rows.sort_by(|a, b| {
            let ordering = key(a, self.sort).cmp(&key(b, self.sort));
            match self.direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            }
        });

        let total = rows.len() as u64;
        let offset = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let list = rows
            .into_iter()
            .skip(offset)
            .take(self.limit as usize)
            .collect();

        Paginated { list, total }
    }
}

/// Ordering key for in-memory listings: the sorted value, then the
/// timestamp and id as tie-breakers.
pub(crate) type SortKey = (i64, NaiveDateTime, i64);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T> {
    pub list: Vec<T>,
    /// Number of matches before paging.
    pub total: u64,
}

impl<T> Paginated<T> {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            list: Vec::new(),
            total: 0,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            list: self.list.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn at(secs: i64) -> NaiveDateTime {
        DateTime::from_timestamp(secs, 0).unwrap().naive_utc()
    }

    #[test]
    fn rejects_zero_page_and_oversized_limit() {
        assert!(PageRequest::new(1, 10).is_valid());
        assert!(!PageRequest::new(0, 10).is_valid());
        assert!(!PageRequest::new(1, 0).is_valid());
        assert!(!PageRequest::new(1, PageRequest::MAX_LIMIT + 1).is_valid());
    }

    #[test]
    fn pages_newest_first_by_default() {
        let rows = vec![(1, at(10)), (2, at(30)), (3, at(20))];
        let page = PageRequest::new(1, 2).apply(rows, |(id, ts), _| (0, *ts, *id));
        assert_eq!(page.total, 3);
        assert_eq!(page.list.iter().map(|v| v.0).collect::<Vec<_>>(), vec![2, 3]);

        let rows = vec![(1, at(10)), (2, at(30)), (3, at(20))];
        let page = PageRequest::new(2, 2).apply(rows, |(id, ts), _| (0, *ts, *id));
        assert_eq!(page.list.iter().map(|v| v.0).collect::<Vec<_>>(), vec![1]);
    }
}
