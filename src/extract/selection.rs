//! Page selection and the page-range selector grammar.
//!
//! A selector is a comma-separated list of tokens:
//!
//! - `n`: page `n`
//! - `a:b`: pages `a` through `b`
//! - `a:`: page `a` through the last page
//! - `:b`: the first page through `b`
//!
//! Tokens are trimmed, empty tokens are skipped and overlapping tokens merge.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;

use serde::Serialize;

use crate::error::RangeError;

/// Ascending, duplicate-free set of 1-based page indices.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct PageSelection {
    pages: BTreeSet<u32>,
}

impl PageSelection {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every page of a `total`-page document.
    pub fn all(total: u32) -> Self {
        (1..=total).collect()
    }

    /// Resolve `selector` against a document of `total_pages` pages.
    pub fn resolve(selector: &str, total_pages: u32) -> Result<Self, RangeError> {
        let mut selection = PageSelection::new();

        for token in selector.split(',').map(str::trim) {
            if token.is_empty() {
                continue;
            }
            selection.pages.extend(parse_token(token, total_pages)?);
        }

        if selection.is_empty() {
            return Err(RangeError::EmptySelection);
        }
        Ok(selection)
    }

    /// Add a page. Returns `false` if it was already selected.
    pub fn insert(&mut self, page: u32) -> bool {
        self.pages.insert(page)
    }

    /// Check if a page number is selected.
    pub fn contains(&self, page: u32) -> bool {
        self.pages.contains(&page)
    }

    /// Number of selected pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Selected pages in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.pages.iter().copied()
    }

    /// Lowest selected page.
    pub fn first(&self) -> Option<u32> {
        self.pages.first().copied()
    }

    /// Highest selected page.
    pub fn last(&self) -> Option<u32> {
        self.pages.last().copied()
    }

    /// Selected pages as a vector.
    pub fn to_vec(&self) -> Vec<u32> {
        self.iter().collect()
    }
}

impl FromIterator<u32> for PageSelection {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self {
            pages: iter.into_iter().collect(),
        }
    }
}

impl<'s> IntoIterator for &'s PageSelection {
    type Item = u32;
    type IntoIter = std::iter::Copied<std::collections::btree_set::Iter<'s, u32>>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter().copied()
    }
}

/// Formats as a selector, collapsing runs (e.g. "1:3, 5, 7:10").
impl fmt::Display for PageSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut runs: Vec<(u32, u32)> = Vec::new();
        for page in self.iter() {
            match runs.last_mut() {
                Some((_, end)) if *end + 1 == page => *end = page,
                _ => runs.push((page, page)),
            }
        }

        for (i, (start, end)) in runs.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if start == end {
                write!(f, "{}", start)?;
            } else {
                write!(f, "{}:{}", start, end)?;
            }
        }
        Ok(())
    }
}

/// Resolve `selector` against a document of `total_pages` pages.
pub fn resolve(selector: &str, total_pages: u32) -> Result<PageSelection, RangeError> {
    PageSelection::resolve(selector, total_pages)
}

fn parse_token(token: &str, total: u32) -> Result<RangeInclusive<u32>, RangeError> {
    let Some((start, end)) = token.split_once(':') else {
        let page = parse_index(token, token)?;
        let page = check_bounds(token, page, total)?;
        return Ok(page..=page);
    };

    let (start, end) = (start.trim(), end.trim());
    let first = if start.is_empty() {
        1
    } else {
        parse_index(token, start)?
    };
    let last = if end.is_empty() {
        i64::from(total)
    } else {
        parse_index(token, end)?
    };

    let first = check_bounds(token, first, total)?;
    if i64::from(first) > last {
        return Err(RangeError::InvertedRange {
            token: token.to_string(),
            start: i64::from(first),
            end: last,
        });
    }
    let last = check_bounds(token, last, total)?;

    Ok(first..=last)
}

/// Parse an optionally negative page number. Range checks happen later, so
/// `-1` or a number past `u32::MAX` is out of bounds rather than malformed.
fn parse_index(token: &str, text: &str) -> Result<i64, RangeError> {
    let malformed = |reason: &str| RangeError::Malformed {
        token: token.to_string(),
        reason: reason.to_string(),
    };

    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed(&format!("'{}' is not a page number", text)));
    }
    text.parse()
        .map_err(|_| malformed(&format!("'{}' is too large", text)))
}

fn check_bounds(token: &str, index: i64, total: u32) -> Result<u32, RangeError> {
    match u32::try_from(index) {
        Ok(page) if (1..=total).contains(&page) => Ok(page),
        _ => Err(RangeError::IndexOutOfBounds {
            token: token.to_string(),
            index,
            total,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_mixed() {
        let selection = resolve("1:3, 5, 7:", 10).unwrap();
        assert_eq!(selection.to_vec(), vec![1, 2, 3, 5, 7, 8, 9, 10]);
    }

    #[test]
    fn test_resolve_duplicates_collapse() {
        let selection = resolve("2,2,1", 5).unwrap();
        assert_eq!(selection.to_vec(), vec![1, 2]);

        let selection = resolve("3:6, 4:5, 6", 6).unwrap();
        assert_eq!(selection.to_vec(), vec![3, 4, 5, 6]);
    }

    #[test]
    fn test_resolve_leading_open_range() {
        let selection = resolve(":3", 10).unwrap();
        assert_eq!(selection.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn test_resolve_inverted() {
        let err = resolve("5:3", 10).unwrap_err();
        assert_eq!(
            err,
            RangeError::InvertedRange {
                token: "5:3".to_string(),
                start: 5,
                end: 3
            }
        );
    }

    #[test]
    fn test_resolve_out_of_bounds() {
        let err = resolve("1:3, 5", 4).unwrap_err();
        assert_eq!(
            err,
            RangeError::IndexOutOfBounds {
                token: "5".to_string(),
                index: 5,
                total: 4
            }
        );

        assert!(matches!(
            resolve("0", 4),
            Err(RangeError::IndexOutOfBounds { index: 0, .. })
        ));
        assert!(matches!(
            resolve("2:9", 4),
            Err(RangeError::IndexOutOfBounds { index: 9, .. })
        ));
        assert!(matches!(
            resolve("6:", 4),
            Err(RangeError::IndexOutOfBounds { index: 6, .. })
        ));
    }

    #[test]
    fn test_resolve_malformed() {
        for selector in ["abc", "1-3", "-", "--1", "1:2:3", "1:x", "99999999999999999999"] {
            assert!(
                matches!(resolve(selector, 10), Err(RangeError::Malformed { .. })),
                "expected malformed for {selector:?}"
            );
        }
    }

    #[test]
    fn test_resolve_below_one_or_huge_is_out_of_bounds() {
        assert_eq!(
            resolve("-1", 10),
            Err(RangeError::IndexOutOfBounds {
                token: "-1".to_string(),
                index: -1,
                total: 10
            })
        );
        assert!(matches!(
            resolve("-2:3", 10),
            Err(RangeError::IndexOutOfBounds { index: -2, .. })
        ));
        assert!(matches!(
            resolve("99999999999", 10),
            Err(RangeError::IndexOutOfBounds {
                index: 99999999999,
                ..
            })
        ));
        assert!(matches!(
            resolve("2:4294967296", 10),
            Err(RangeError::IndexOutOfBounds {
                index: 4294967296,
                ..
            })
        ));
    }

    #[test]
    fn test_resolve_empty() {
        assert_eq!(resolve("", 3), Err(RangeError::EmptySelection));
        assert_eq!(resolve("   ", 3), Err(RangeError::EmptySelection));
        assert_eq!(resolve(" , ,", 3), Err(RangeError::EmptySelection));
    }

    #[test]
    fn test_resolve_skips_empty_tokens() {
        let selection = resolve("1,,3,", 3).unwrap();
        assert_eq!(selection.to_vec(), vec![1, 3]);
    }

    #[test]
    fn test_resolve_no_pages() {
        assert!(matches!(
            resolve("1", 0),
            Err(RangeError::IndexOutOfBounds { total: 0, .. })
        ));
    }

    #[test]
    fn test_display_collapses_runs() {
        let selection: PageSelection = [1, 2, 3, 5, 7, 8, 9, 10].into_iter().collect();
        assert_eq!(selection.to_string(), "1:3, 5, 7:10");
        assert_eq!(PageSelection::new().to_string(), "");
    }

    #[test]
    fn test_all() {
        let selection = PageSelection::all(3);
        assert_eq!(selection.to_vec(), vec![1, 2, 3]);
        assert_eq!(selection.first(), Some(1));
        assert_eq!(selection.last(), Some(3));
        assert!(PageSelection::all(0).is_empty());
    }
}
