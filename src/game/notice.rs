//! Transient messages shown to the player after each action

use super::progression::UiEvent;
use crate::data::{NoticeDuration, NoticeLevel};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A message to display to the player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub created_at: DateTime<Utc>,
    pub level: NoticeLevel,
    pub duration: NoticeDuration,
    pub text: String,
}

/// How long short and long notices stay visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoticeTiming {
    pub short: Duration,
    pub long: Duration,
}

impl NoticeTiming {
    pub fn from_millis(short_ms: u64, long_ms: u64) -> Self {
        Self {
            short: millis(short_ms),
            long: millis(long_ms),
        }
    }

    pub fn for_duration(&self, duration: NoticeDuration) -> Duration {
        match duration {
            NoticeDuration::Short => self.short,
            NoticeDuration::Long => self.long,
        }
    }
}

/// Out-of-range values saturate to the longest representable duration
fn millis(ms: u64) -> Duration {
    i64::try_from(ms)
        .ok()
        .and_then(Duration::try_milliseconds)
        .unwrap_or(Duration::MAX)
}

impl Default for NoticeTiming {
    fn default() -> Self {
        Self::from_millis(2000, 3500)
    }
}

impl Notice {
    pub fn new(level: NoticeLevel, duration: NoticeDuration, text: &str) -> Self {
        Self {
            created_at: Utc::now(),
            level,
            duration,
            text: text.to_string(),
        }
    }

    pub fn info(text: &str) -> Self {
        Self::new(NoticeLevel::Info, NoticeDuration::Short, text)
    }

    pub fn permission_denied() -> Self {
        Self::new(
            NoticeLevel::Error,
            NoticeDuration::Long,
            "Camera permission is required.",
        )
    }

    /// The notice for a progression event, `None` for ignored outcomes
    pub fn from_event(event: &UiEvent) -> Option<Self> {
        let notice = match event {
            UiEvent::Advanced { .. } => Self::new(
                NoticeLevel::Success,
                NoticeDuration::Short,
                "Correct! Next riddle.",
            ),
            UiEvent::Completed => Self::new(
                NoticeLevel::Success,
                NoticeDuration::Long,
                "Congratulations, you escaped!",
            ),
            UiEvent::Incorrect => Self::new(
                NoticeLevel::Warning,
                NoticeDuration::Long,
                "Incorrect. Try again.",
            ),
            UiEvent::Cancelled => Self::info("Scan cancelled"),
            UiEvent::ScanFailed { reason } => Self::new(
                NoticeLevel::Error,
                NoticeDuration::Long,
                &format!("Error: {}", reason),
            ),
            UiEvent::AlreadyCompleted => return None,
        };
        Some(notice)
    }

    /// `None` when the expiry is past the end of representable time
    pub fn expires_at(&self, timing: &NoticeTiming) -> Option<DateTime<Utc>> {
        self.created_at.checked_add_signed(timing.for_duration(self.duration))
    }

    pub fn is_expired(&self, now: DateTime<Utc>, timing: &NoticeTiming) -> bool {
        match self.expires_at(timing) {
            Some(expiry) => now >= expiry,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_map_to_player_wording() {
        let advanced = Notice::from_event(&UiEvent::Advanced { next_index: 1 }).unwrap();
        assert_eq!(advanced.text, "Correct! Next riddle.");
        assert_eq!(advanced.duration, NoticeDuration::Short);

        let wrong = Notice::from_event(&UiEvent::Incorrect).unwrap();
        assert_eq!(wrong.level, NoticeLevel::Warning);
        assert_eq!(wrong.duration, NoticeDuration::Long);

        let failed = Notice::from_event(&UiEvent::ScanFailed {
            reason: "lens covered".to_string(),
        })
        .unwrap();
        assert_eq!(failed.text, "Error: lens covered");
        assert_eq!(failed.level, NoticeLevel::Error);

        assert_eq!(
            Notice::from_event(&UiEvent::Cancelled).unwrap().text,
            "Scan cancelled"
        );
        assert!(Notice::from_event(&UiEvent::AlreadyCompleted).is_none());
    }

    #[test]
    fn short_notices_expire_first() {
        let timing = NoticeTiming::default();
        let short = Notice::info("hi");
        let long = Notice::permission_denied();
        let now = short.created_at.max(long.created_at) + Duration::milliseconds(2500);
        assert!(short.is_expired(now, &timing));
        assert!(!long.is_expired(now, &timing));
        assert!(long.is_expired(now + Duration::seconds(2), &timing));
    }

    #[test]
    fn huge_durations_never_expire() {
        let timing = NoticeTiming::from_millis(1, u64::MAX);
        assert_eq!(timing.long, Duration::MAX);

        let notice = Notice::permission_denied();
        assert_eq!(notice.expires_at(&timing), None);
        assert!(!notice.is_expired(notice.created_at + Duration::days(365), &timing));

        let timing = NoticeTiming::from_millis(1, 9_000_000_000_000_000_000);
        assert!(!notice.is_expired(notice.created_at + Duration::days(365), &timing));
    }
}
