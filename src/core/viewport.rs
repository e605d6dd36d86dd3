//! # List Viewport
//!
//! The bounded window of visible rows over a longer choice list, plus the
//! absolute cursor. Every transition keeps
//!
//! ```text
//! 0 <= top <= len - height
//! top <= cursor <= top + height - 1
//! ```
//!
//! Transitions are pure: they update the three numbers and report which rows
//! need repainting as a [`Scroll`]. Turning that into cursor moves and line
//! clears is the scroll widget's job.

/// What a transition changed, and so what must be repainted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scroll {
    /// Nothing moved. Paint nothing.
    Unchanged,
    /// Only the cursor moved inside a fixed window. Repaint the two rows.
    Step { from: usize, to: usize },
    /// The window moved. Repaint every visible row. `from_cursor` and
    /// `from_top` are the values before the move, needed to find the window's
    /// first row on screen.
    Window { from_top: usize, from_cursor: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    top: usize,
    cursor: usize,
    height: usize,
    len: usize,
}

impl Viewport {
    /// Window of `height` rows over `len` choices, clamped to `1..=len`.
    /// `None` (or zero) means "show everything". `len` must be non-zero.
    pub fn new(len: usize, height: Option<usize>) -> Self {
        debug_assert!(len > 0, "viewport over an empty list");
        let height = match height {
            Some(h) if h > 0 => h.min(len),
            _ => len,
        };
        Self {
            top: 0,
            cursor: 0,
            height,
            len,
        }
    }

    pub fn top(&self) -> usize {
        self.top
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// One past the last visible index.
    pub fn bottom(&self) -> usize {
        self.top + self.height
    }

    /// Visible indices, top to bottom.
    pub fn rows(&self) -> std::ops::Range<usize> {
        self.top..self.bottom()
    }

    /// Cursor row relative to the window's first row.
    pub fn cursor_row(&self) -> usize {
        self.cursor - self.top
    }

    pub fn has_hidden_above(&self) -> bool {
        self.top > 0
    }

    pub fn has_hidden_below(&self) -> bool {
        self.bottom() < self.len
    }

    fn at_top_most(&self) -> bool {
        self.top == 0 && self.cursor == self.top
    }

    fn at_bottom_most(&self) -> bool {
        self.bottom() == self.len && self.cursor == self.len - 1
    }

    fn window(&mut self, top: usize, cursor: usize) -> Scroll {
        let before = Scroll::Window {
            from_top: self.top,
            from_cursor: self.cursor,
        };
        self.top = top;
        self.cursor = cursor;
        before
    }

    pub fn step_up(&mut self) -> Scroll {
        if self.cursor == self.top {
            if self.top == 0 {
                return Scroll::Unchanged;
            }
            return self.window(self.top - 1, self.cursor - 1);
        }
        let from = self.cursor;
        self.cursor -= 1;
        Scroll::Step {
            from,
            to: self.cursor,
        }
    }

    pub fn step_down(&mut self) -> Scroll {
        if self.cursor == self.bottom() - 1 {
            if self.bottom() == self.len {
                return Scroll::Unchanged;
            }
            return self.window(self.top + 1, self.cursor + 1);
        }
        let from = self.cursor;
        self.cursor += 1;
        Scroll::Step {
            from,
            to: self.cursor,
        }
    }

    pub fn home(&mut self) -> Scroll {
        if self.at_top_most() {
            return Scroll::Unchanged;
        }
        self.window(0, 0)
    }

    pub fn end(&mut self) -> Scroll {
        if self.at_bottom_most() {
            return Scroll::Unchanged;
        }
        self.window(self.len - self.height, self.len - 1)
    }

    pub fn page_up(&mut self) -> Scroll {
        if self.at_top_most() {
            return Scroll::Unchanged;
        }
        self.window(
            self.top.saturating_sub(self.height),
            self.cursor.saturating_sub(self.height),
        )
    }

    pub fn page_down(&mut self) -> Scroll {
        if self.at_bottom_most() {
            return Scroll::Unchanged;
        }
        self.window(
            (self.len - self.height).min(self.top + self.height),
            (self.len - 1).min(self.cursor + self.height),
        )
    }

    /// Back to the first page with the cursor on the first choice.
    pub fn reset(&mut self) {
        self.top = 0;
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invariants(vp: &Viewport) {
        assert!(vp.height() >= 1 && vp.height() <= vp.len());
        assert!(vp.top() + vp.height() <= vp.len(), "window past end: {vp:?}");
        assert!(vp.top() <= vp.cursor(), "cursor above window: {vp:?}");
        assert!(vp.cursor() < vp.bottom(), "cursor below window: {vp:?}");
    }

    #[test]
    fn test_height_is_clamped() {
        assert_eq!(Viewport::new(5, None).height(), 5);
        assert_eq!(Viewport::new(5, Some(0)).height(), 5);
        assert_eq!(Viewport::new(5, Some(9)).height(), 5);
        assert_eq!(Viewport::new(5, Some(3)).height(), 3);
    }

    #[test]
    fn test_step_down_then_page_down() {
        let mut vp = Viewport::new(10, Some(3));
        vp.step_down();
        vp.step_down();
        assert_eq!((vp.top(), vp.cursor()), (0, 2));

        let scroll = vp.step_down();
        assert_eq!((vp.top(), vp.cursor()), (1, 3));
        assert_eq!(
            scroll,
            Scroll::Window {
                from_top: 0,
                from_cursor: 2
            }
        );

        vp.page_down();
        assert_eq!((vp.top(), vp.cursor()), (4, 6));
    }

    #[test]
    fn test_page_down_clamps_at_last_page() {
        let mut vp = Viewport::new(10, Some(3));
        for _ in 0..3 {
            vp.page_down();
        }
        assert_eq!((vp.top(), vp.cursor()), (7, 9));
        assert_eq!(vp.page_down(), Scroll::Unchanged);
    }

    #[test]
    fn test_step_inside_window_reports_two_rows() {
        let mut vp = Viewport::new(10, Some(3));
        assert_eq!(vp.step_down(), Scroll::Step { from: 0, to: 1 });
        assert_eq!(vp.step_up(), Scroll::Step { from: 1, to: 0 });
    }

    #[test]
    fn test_top_most_is_fixed_point() {
        let mut vp = Viewport::new(10, Some(3));
        assert_eq!(vp.step_up(), Scroll::Unchanged);
        assert_eq!(vp.home(), Scroll::Unchanged);
        assert_eq!(vp.page_up(), Scroll::Unchanged);
        assert_eq!((vp.top(), vp.cursor()), (0, 0));
    }

    #[test]
    fn test_bottom_most_is_fixed_point() {
        let mut vp = Viewport::new(10, Some(3));
        vp.end();
        assert_eq!((vp.top(), vp.cursor()), (7, 9));
        assert_eq!(vp.step_down(), Scroll::Unchanged);
        assert_eq!(vp.end(), Scroll::Unchanged);
        assert_eq!(vp.page_down(), Scroll::Unchanged);
        assert_eq!((vp.top(), vp.cursor()), (7, 9));
    }

    #[test]
    fn test_page_up_from_first_page_lands_on_zero() {
        let mut vp = Viewport::new(10, Some(4));
        vp.step_down();
        vp.step_down();
        assert!(matches!(vp.page_up(), Scroll::Window { .. }));
        assert_eq!((vp.top(), vp.cursor()), (0, 0));
    }

    #[test]
    fn test_end_on_last_page_moves_cursor_only_to_last_row() {
        let mut vp = Viewport::new(4, None);
        assert!(matches!(vp.end(), Scroll::Window { .. }));
        assert_eq!((vp.top(), vp.cursor()), (0, 3));
    }

    #[test]
    fn test_indicators_track_hidden_rows() {
        let mut vp = Viewport::new(6, Some(3));
        assert!(!vp.has_hidden_above());
        assert!(vp.has_hidden_below());
        vp.page_down();
        assert!(vp.has_hidden_above());
        assert!(!vp.has_hidden_below());

        let full = Viewport::new(3, None);
        assert!(!full.has_hidden_above());
        assert!(!full.has_hidden_below());
    }

    #[test]
    fn test_invariants_hold_over_long_walk() {
        // Deterministic pseudo-random walk over every operation.
        for (len, height) in [(1, None), (2, Some(1)), (7, Some(3)), (10, Some(4)), (5, None)] {
            let mut vp = Viewport::new(len, height);
            let mut seed: u32 = 0x9e37_79b9;
            for _ in 0..500 {
                seed ^= seed << 13;
                seed ^= seed >> 17;
                seed ^= seed << 5;
                let before_top = vp.top();
                match seed % 6 {
                    0 => {
                        vp.step_up();
                        assert!(before_top.abs_diff(vp.top()) <= 1);
                    }
                    1 => {
                        vp.step_down();
                        assert!(before_top.abs_diff(vp.top()) <= 1);
                    }
                    2 => {
                        vp.home();
                    }
                    3 => {
                        vp.end();
                    }
                    4 => {
                        vp.page_up();
                        assert!(before_top.abs_diff(vp.top()) <= vp.height());
                    }
                    _ => {
                        vp.page_down();
                        assert!(before_top.abs_diff(vp.top()) <= vp.height());
                    }
                }
                assert_invariants(&vp);
            }
        }
    }
}
