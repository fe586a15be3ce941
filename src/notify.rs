use std::collections::VecDeque;
use std::time::Duration;

use crate::game::{Notice, NoticeKind};

const MAX_TOASTS: usize = 5;
pub const TOAST_LIFETIME: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: NoticeKind,
    remaining: Duration,
}

/// Transient messages, newest first. Each one hides itself after [`TOAST_LIFETIME`].
#[derive(Debug, Default)]
pub struct Notifications {
    toasts: VecDeque<Toast>,
}

impl Notifications {
    pub fn push(&mut self, notice: Notice) {
        self.toasts.push_front(Toast {
            message: notice.message,
            kind: notice.kind,
            remaining: TOAST_LIFETIME,
        });
        while self.toasts.len() > MAX_TOASTS {
            self.toasts.pop_back();
        }
    }

    pub fn on_tick(&mut self, dt: Duration) {
        for toast in self.toasts.iter_mut() {
            toast.remaining = toast.remaining.saturating_sub(dt);
        }
        self.toasts.retain(|toast| !toast.remaining.is_zero());
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.front()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice(message: &str) -> Notice {
        Notice {
            message: message.to_string(),
            kind: NoticeKind::Success,
        }
    }

    #[test]
    fn toasts_expire_after_lifetime() {
        let mut feed = Notifications::default();
        feed.push(notice("first"));
        feed.on_tick(Duration::from_secs(2));
        feed.push(notice("second"));
        feed.on_tick(Duration::from_secs(1));
        assert_eq!(feed.latest().map(|t| t.message.as_str()), Some("second"));
        assert_eq!(feed.iter().count(), 1);
        feed.on_tick(Duration::from_secs(2));
        assert!(feed.is_empty());
    }

    #[test]
    fn keeps_only_recent_toasts() {
        let mut feed = Notifications::default();
        for i in 0..8 {
            feed.push(notice(&format!("n{}", i)));
        }
        assert_eq!(feed.iter().count(), MAX_TOASTS);
        assert_eq!(feed.latest().map(|t| t.message.as_str()), Some("n7"));
    }
}
