//! Transient notices stacked in the top-right corner.
//!
//! [`Toasts`] is the form view's [`Notifier`]: the engine reports submission
//! outcomes into it and each notice disappears after its time to live.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use stepform_core::{Notice, NoticeLevel, Notifier};

use crate::command::Command;
use crate::component::Component;

/// How long a notice stays on screen.
pub const DEFAULT_TTL: Duration = Duration::from_secs(10);

/// Messages for [`Toasts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Drop notices that expired before the given instant.
    Tick(Instant),
    /// Drop the oldest visible notice.
    Dismiss,
    /// Drop every notice.
    Clear,
}

struct Toast {
    notice: Notice,
    expires: Instant,
}

/// A queue of expiring notices.
pub struct Toasts {
    items: VecDeque<Toast>,
    ttl: Duration,
    max_visible: usize,
    width: u16,
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new()
    }
}

impl Toasts {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
            ttl: DEFAULT_TTL,
            max_visible: 3,
            width: 36,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Older notices beyond this count are dropped on push.
    pub fn with_max_visible(mut self, max: usize) -> Self {
        self.max_visible = max.max(1);
        self
    }

    pub fn with_width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }

    /// Queue `notice` as if it arrived at `now`.
    pub fn push_at(&mut self, notice: Notice, now: Instant) {
        self.items.push_back(Toast {
            notice,
            expires: now + self.ttl,
        });
        while self.items.len() > self.max_visible {
            self.items.pop_front();
        }
    }

    /// Notices currently queued, oldest first.
    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.items.iter().map(|t| &t.notice)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Notifier for Toasts {
    fn notify(&mut self, notice: Notice) {
        self.push_at(notice, Instant::now());
    }
}

impl Component for Toasts {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::Tick(now) => self.items.retain(|t| t.expires > now),
            Message::Dismiss => {
                self.items.pop_front();
            }
            Message::Clear => self.items.clear(),
        }
        Command::none()
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let width = self.width.min(area.width);
        let mut y = area.y;
        for toast in self.items.iter().rev() {
            let color = match toast.notice.level {
                NoticeLevel::Success => Color::Green,
                NoticeLevel::Error => Color::Red,
            };
            let inner_width = width.saturating_sub(2).max(1) as usize;
            let rows = toast.notice.text.chars().count().div_ceil(inner_width).max(1) as u16;
            let height = rows + 2;
            if y + height > area.bottom() {
                break;
            }
            let rect = Rect::new(area.right().saturating_sub(width), y, width, height);
            frame.render_widget(Clear, rect);
            let block = Block::new()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color));
            frame.render_widget(
                Paragraph::new(toast.notice.text.as_str())
                    .style(Style::default().fg(color))
                    .wrap(Wrap { trim: true })
                    .block(block),
                rect,
            );
            y += height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::Harness;

    #[test]
    fn notify_queues_notice() {
        let mut toasts = Toasts::new();
        toasts.notify(Notice::success("Saved"));
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts.notices().next(), Some(&Notice::success("Saved")));
    }

    #[test]
    fn tick_prunes_expired() {
        let start = Instant::now();
        let mut toasts = Toasts::new().with_ttl(Duration::from_secs(10));
        toasts.push_at(Notice::success("first"), start);
        toasts.push_at(Notice::error("second"), start + Duration::from_secs(5));

        toasts.update(Message::Tick(start + Duration::from_secs(9)));
        assert_eq!(toasts.len(), 2);
        toasts.update(Message::Tick(start + Duration::from_secs(10)));
        assert_eq!(toasts.len(), 1);
        toasts.update(Message::Tick(start + Duration::from_secs(15)));
        assert!(toasts.is_empty());
    }

    #[test]
    fn max_visible_drops_oldest() {
        let now = Instant::now();
        let mut toasts = Toasts::new().with_max_visible(2);
        toasts.push_at(Notice::error("a"), now);
        toasts.push_at(Notice::error("b"), now);
        toasts.push_at(Notice::error("c"), now);
        let texts: Vec<_> = toasts.notices().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "c"]);
    }

    #[test]
    fn dismiss_and_clear() {
        let now = Instant::now();
        let mut toasts = Toasts::new();
        toasts.push_at(Notice::error("a"), now);
        toasts.push_at(Notice::error("b"), now);
        toasts.update(Message::Dismiss);
        assert_eq!(toasts.len(), 1);
        toasts.update(Message::Clear);
        assert!(toasts.is_empty());
    }

    #[test]
    fn renders_in_top_right() {
        let mut toasts = Toasts::new().with_width(12);
        toasts.notify(Notice::success("Done"));
        let h = Harness::new(toasts);
        let screen = h.render_string(30, 5);
        let second_row = screen.lines().nth(1).unwrap_or_default();
        assert!(second_row.starts_with(&" ".repeat(18)));
        assert!(second_row.contains("Done"));
    }
}
