use std::ops::Range;

/// Viewports at or below this width (CSS pixels) use the mobile layout.
pub const MOBILE_BREAKPOINT_PX: u32 = 768;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenClass {
    Mobile,
    Desktop,
}

impl ScreenClass {
    pub fn from_width(width_px: u32) -> Self {
        if width_px <= MOBILE_BREAKPOINT_PX {
            ScreenClass::Mobile
        } else {
            ScreenClass::Desktop
        }
    }
}

/// Cards per page: 4x3 desktop grid, 2x2 mobile grid, three list rows.
pub fn page_size(mode: ViewMode, width_px: u32) -> usize {
    match (mode, ScreenClass::from_width(width_px)) {
        (ViewMode::Grid, ScreenClass::Desktop) => 12,
        (ViewMode::Grid, ScreenClass::Mobile) => 4,
        (ViewMode::List, _) => 3,
    }
}

/// Never less than one, even for an empty set.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// Index range of `page` (1-based), clipped to `count`.
pub fn page_range(page: usize, page_size: usize, count: usize) -> Range<usize> {
    let start = page.saturating_sub(1).saturating_mul(page_size).min(count);
    let end = start.saturating_add(page_size).min(count);
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_sizes_follow_breakpoint() {
        assert_eq!(page_size(ViewMode::Grid, 1280), 12);
        assert_eq!(page_size(ViewMode::Grid, 769), 12);
        assert_eq!(page_size(ViewMode::Grid, 768), 4);
        assert_eq!(page_size(ViewMode::List, 1280), 3);
        assert_eq!(page_size(ViewMode::List, 375), 3);
    }

    #[test]
    fn total_pages_has_a_floor_of_one() {
        assert_eq!(total_pages(0, 12), 1);
        assert_eq!(total_pages(12, 12), 1);
        assert_eq!(total_pages(13, 12), 2);
        assert_eq!(total_pages(15, 3), 5);
    }

    #[test]
    fn ranges() {
        assert_eq!(page_range(1, 12, 15), 0..12);
        assert_eq!(page_range(2, 12, 15), 12..15);
        assert_eq!(page_range(3, 12, 15), 15..15);
        assert_eq!(page_range(1, 12, 0), 0..0);
    }
}
