//! Scroll-proximity detection for infinite lists

/// When a scroll position counts as "near the bottom"
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollTrigger {
    /// `(scroll_top + client_height) / scroll_height` must exceed the fraction
    Fraction(f64),
    /// Distance to the bottom must be at most this many pixels
    PixelsFromBottom(f64),
}

impl ScrollTrigger {
    pub fn is_near_bottom(&self, scroll_top: f64, scroll_height: f64, client_height: f64) -> bool {
        if scroll_height <= 0.0 {
            return false;
        }
        let visible_bottom = scroll_top + client_height;
        match *self {
            ScrollTrigger::Fraction(threshold) => visible_bottom / scroll_height > threshold,
            ScrollTrigger::PixelsFromBottom(pixels) => scroll_height - visible_bottom <= pixels,
        }
    }
}

impl Default for ScrollTrigger {
    fn default() -> Self {
        ScrollTrigger::Fraction(0.8)
    }
}
