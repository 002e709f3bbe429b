use std::time::Instant;

use tui_textarea::TextArea;

/// Scroll position of the transcript viewport.
///
/// Offsets count wrapped rows from the top. The renderer reports the content
/// height every frame through [`TranscriptView::update_bounds`]; while
/// `auto_scroll` is set the view stays pinned to the newest row.
#[derive(Debug, Clone)]
pub struct TranscriptView {
    pub scroll_offset: u16,
    pub auto_scroll: bool,
    max_offset: u16,
    viewport_height: u16,
}

impl Default for TranscriptView {
    fn default() -> Self {
        Self {
            scroll_offset: 0,
            auto_scroll: true,
            max_offset: 0,
            viewport_height: 0,
        }
    }
}

impl TranscriptView {
    pub fn max_offset(&self) -> u16 {
        self.max_offset
    }

    pub fn viewport_height(&self) -> u16 {
        self.viewport_height
    }

    /// Record the wrapped content height and viewport size for this frame
    /// and clamp the offset against them.
    pub fn update_bounds(&mut self, content_height: usize, viewport_height: u16) {
        let content_height = u16::try_from(content_height).unwrap_or(u16::MAX);
        self.viewport_height = viewport_height;
        self.max_offset = content_height.saturating_sub(viewport_height);
        if self.auto_scroll {
            self.scroll_offset = self.max_offset;
        } else {
            self.scroll_offset = self.scroll_offset.min(self.max_offset);
        }
    }

    /// Pin the view to the newest row from the next frame on.
    pub fn follow(&mut self) {
        self.auto_scroll = true;
        self.scroll_offset = self.max_offset;
    }

    fn page_step(&self) -> u16 {
        self.viewport_height.saturating_sub(1).max(1)
    }

    pub fn scroll_up(&mut self, rows: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(rows);
        self.auto_scroll = self.max_offset == 0;
    }

    /// Scrolling back to the bottom re-enables auto-scroll.
    pub fn scroll_down(&mut self, rows: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(rows).min(self.max_offset);
        self.auto_scroll = self.scroll_offset >= self.max_offset;
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.page_step());
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.page_step());
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
        self.auto_scroll = self.max_offset == 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.follow();
    }
}

/// Single-line prompt for an attachment path, shown over the composer.
pub struct AttachPrompt {
    pub textarea: TextArea<'static>,
}

impl Default for AttachPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl AttachPrompt {
    pub fn new() -> Self {
        Self {
            textarea: TextArea::default(),
        }
    }

    pub fn value(&self) -> String {
        self.textarea.lines().join("")
    }
}

/// Animation clock for the loading indicator.
#[derive(Debug, Clone, Copy)]
pub struct Pulse {
    start: Instant,
}

impl Default for Pulse {
    fn default() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Pulse {
    pub fn restart(&mut self) {
        self.start = Instant::now();
    }

    /// One of `○ ◐ ●`, cycling twice a second.
    pub fn symbol(&self) -> &'static str {
        let elapsed = self.start.elapsed().as_millis() as f32 / 1000.0;
        let phase = (elapsed * 2.0) % 2.0;
        let intensity = if phase < 1.0 { phase } else { 2.0 - phase };
        if intensity < 0.33 {
            "○"
        } else if intensity < 0.66 {
            "◐"
        } else {
            "●"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_with(content: usize, viewport: u16) -> TranscriptView {
        let mut view = TranscriptView::default();
        view.update_bounds(content, viewport);
        view
    }

    #[test]
    fn auto_scroll_pins_to_bottom_as_content_grows() {
        let mut view = view_with(30, 10);
        assert_eq!(view.scroll_offset, 20);
        view.update_bounds(45, 10);
        assert_eq!(view.scroll_offset, 35);
    }

    #[test]
    fn scrolling_up_stops_following() {
        let mut view = view_with(30, 10);
        view.scroll_up(5);
        assert_eq!(view.scroll_offset, 15);
        assert!(!view.auto_scroll);

        view.update_bounds(50, 10);
        assert_eq!(view.scroll_offset, 15);
    }

    #[test]
    fn returning_to_bottom_resumes_following() {
        let mut view = view_with(30, 10);
        view.page_up();
        assert_eq!(view.scroll_offset, 11);
        view.page_down();
        assert_eq!(view.scroll_offset, 20);
        assert!(view.auto_scroll);
    }

    #[test]
    fn top_and_bottom_jumps() {
        let mut view = view_with(30, 10);
        view.scroll_to_top();
        assert_eq!(view.scroll_offset, 0);
        assert!(!view.auto_scroll);
        view.scroll_to_bottom();
        assert_eq!(view.scroll_offset, 20);
        assert!(view.auto_scroll);
    }

    #[test]
    fn short_content_never_scrolls() {
        let mut view = view_with(3, 10);
        view.scroll_up(2);
        assert_eq!(view.scroll_offset, 0);
        assert!(view.auto_scroll);
    }

    #[test]
    fn follow_after_manual_scroll() {
        let mut view = view_with(30, 10);
        view.scroll_to_top();
        view.follow();
        view.update_bounds(40, 10);
        assert_eq!(view.scroll_offset, 30);
    }

    #[test]
    fn attach_prompt_joins_lines() {
        let mut prompt = AttachPrompt::new();
        prompt.textarea.insert_str("/tmp/cat.png");
        assert_eq!(prompt.value(), "/tmp/cat.png");
    }
}
