use std::time::Duration;

pub const STEP_INTERVAL: Duration = Duration::from_millis(80);
pub const END_PAUSE: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollStep {
    /// Cursor moved one character to the right.
    Advanced(usize),
    /// Cursor hit the end; schedule `finish_pause(generation)` after `END_PAUSE`.
    Pause(u64),
    /// A pause is already pending.
    Waiting,
}

/// Circular scroll through the now-playing line.
#[derive(Debug, Default)]
pub struct TextScroller {
    len: usize,
    cursor: usize,
    pausing: bool,
    generation: u64,
}

impl TextScroller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_pausing(&self) -> bool {
        self.pausing
    }

    /// Starts over on a new line of text. Returns true if a pending pause
    /// was dropped and its timer should be cancelled.
    pub fn set_text(&mut self, text: &str) -> bool {
        let cancelled = self.pausing;
        self.len = text.chars().count();
        self.cursor = 0;
        self.pausing = false;
        self.generation += 1;
        cancelled
    }

    pub fn step(&mut self) -> ScrollStep {
        if self.cursor < self.len {
            self.cursor += 1;
            ScrollStep::Advanced(self.cursor)
        } else if self.pausing {
            ScrollStep::Waiting
        } else {
            self.pausing = true;
            ScrollStep::Pause(self.generation)
        }
    }

    /// Ends the pause started for `generation`. Stale generations are ignored.
    pub fn finish_pause(&mut self, generation: u64) -> bool {
        if !self.pausing || generation != self.generation {
            return false;
        }
        self.pausing = false;
        self.cursor = 0;
        true
    }
}

/// The slice of `text` a `width`-character field shows while its cursor sits
/// at `cursor`; the view only moves once the cursor passes the right edge.
pub fn visible_window(text: &str, cursor: usize, width: usize) -> String {
    let start = cursor.saturating_sub(width);
    text.chars().skip(start).take(width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_to_the_end_then_pauses_once() {
        let mut scroller = TextScroller::new();
        scroller.set_text("abc");
        assert_eq!(scroller.step(), ScrollStep::Advanced(1));
        assert_eq!(scroller.step(), ScrollStep::Advanced(2));
        assert_eq!(scroller.step(), ScrollStep::Advanced(3));

        let generation = match scroller.step() {
            ScrollStep::Pause(g) => g,
            other => panic!("expected a pause, got {:?}", other),
        };
        assert_eq!(scroller.step(), ScrollStep::Waiting);
        assert_eq!(scroller.step(), ScrollStep::Waiting);

        assert!(scroller.finish_pause(generation));
        assert_eq!(scroller.cursor(), 0);
        assert_eq!(scroller.step(), ScrollStep::Advanced(1));
    }

    #[test]
    fn new_text_cancels_pending_pause() {
        let mut scroller = TextScroller::new();
        scroller.set_text("a");
        scroller.step();
        let ScrollStep::Pause(old) = scroller.step() else {
            panic!("expected a pause");
        };

        assert!(scroller.set_text("longer"));
        assert!(!scroller.is_pausing());
        assert!(!scroller.finish_pause(old));
        assert_eq!(scroller.step(), ScrollStep::Advanced(1));
    }

    #[test]
    fn set_text_without_pause_cancels_nothing() {
        let mut scroller = TextScroller::new();
        assert!(!scroller.set_text("abc"));
        scroller.step();
        assert!(!scroller.set_text("xyz"));
        assert_eq!(scroller.cursor(), 0);
    }

    #[test]
    fn empty_text_pauses_immediately() {
        let mut scroller = TextScroller::new();
        scroller.set_text("");
        assert!(matches!(scroller.step(), ScrollStep::Pause(_)));
    }

    #[test]
    fn window_follows_cursor_past_the_edge() {
        let text = "Playing: Song - Band";
        assert_eq!(visible_window(text, 0, 8), "Playing:");
        assert_eq!(visible_window(text, 8, 8), "Playing:");
        assert_eq!(visible_window(text, 10, 8), "aying: S");
        assert_eq!(visible_window(text, 20, 8), "g - Band");
        assert_eq!(visible_window("short", 5, 8), "short");
    }
}
