//! Layout modes and grid pagination

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// How cameras are arranged on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    /// One main view plus an unpaginated thumbnail strip
    #[default]
    Sidebar,
    /// Paginated grid, two columns
    Grid2,
    /// Paginated grid, three columns
    Grid3,
}

impl LayoutMode {
    /// Persisted name
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutMode::Sidebar => "sidebar",
            LayoutMode::Grid2 => "grid2",
            LayoutMode::Grid3 => "grid3",
        }
    }

    /// Check if this is one of the grid layouts
    pub fn is_grid(&self) -> bool {
        !matches!(self, LayoutMode::Sidebar)
    }

    /// Grid column count (`None` in Sidebar)
    pub fn columns(&self) -> Option<u8> {
        match self {
            LayoutMode::Sidebar => None,
            LayoutMode::Grid2 => Some(2),
            LayoutMode::Grid3 => Some(3),
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized layout name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLayout(pub String);

impl FromStr for LayoutMode {
    type Err = UnknownLayout;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sidebar" => Ok(LayoutMode::Sidebar),
            "grid2" => Ok(LayoutMode::Grid2),
            "grid3" => Ok(LayoutMode::Grid3),
            other => Err(UnknownLayout(other.to_string())),
        }
    }
}

/// Grid page arithmetic for a fixed page size
///
/// Pages are 1-based. There is always at least one page, even for an empty
/// camera set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_size: usize,
}

impl Pagination {
    /// Create pagination with the given page size (at least 1)
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// `max(1, ceil(total / page_size))`
    pub fn total_pages(&self, total: usize) -> u32 {
        let pages = total.div_ceil(self.page_size).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Clamp a page number into `[1, total_pages]`
    pub fn clamp(&self, page: u32, total: usize) -> u32 {
        page.clamp(1, self.total_pages(total))
    }

    /// Index range of the cameras shown on `page` (clamped first)
    pub fn slice(&self, page: u32, total: usize) -> Range<usize> {
        let page = self.clamp(page, total) as usize;
        let start = ((page - 1) * self.page_size).min(total);
        let end = (start + self.page_size).min(total);
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_names() {
        for mode in [LayoutMode::Sidebar, LayoutMode::Grid2, LayoutMode::Grid3] {
            assert_eq!(mode.as_str().parse::<LayoutMode>(), Ok(mode));
        }
        assert!("mosaic".parse::<LayoutMode>().is_err());
        assert_eq!(LayoutMode::Grid3.columns(), Some(3));
        assert!(!LayoutMode::Sidebar.is_grid());
    }

    #[test]
    fn test_total_pages() {
        let p = Pagination::new(6);
        assert_eq!(p.total_pages(0), 1);
        assert_eq!(p.total_pages(1), 1);
        assert_eq!(p.total_pages(6), 1);
        assert_eq!(p.total_pages(7), 2);
        assert_eq!(p.total_pages(13), 3);
    }

    #[test]
    fn test_clamp_never_leaves_range() {
        for page_size in 1..=7 {
            let p = Pagination::new(page_size);
            for total in 0..20 {
                let pages = p.total_pages(total);
                for page in [0, 1, 2, 5, 100, u32::MAX] {
                    let clamped = p.clamp(page, total);
                    assert!(clamped >= 1 && clamped <= pages);
                }
            }
        }
    }

    #[test]
    fn test_slice() {
        let p = Pagination::new(6);
        assert_eq!(p.slice(1, 3), 0..3);
        assert_eq!(p.slice(2, 8), 6..8);
        assert_eq!(p.slice(9, 8), 6..8);
        assert_eq!(p.slice(1, 0), 0..0);
    }
}
