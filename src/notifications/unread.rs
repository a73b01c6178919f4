// SPDX-License-Identifier: MPL-2.0
//! Tab-bar badge aggregation.

use std::fmt;

use crate::config::BADGE_DISPLAY_CAP;

/// Combined unread count of notifications and cheating alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Badge {
    count: usize,
}

/// Sums unread notifications and unread alerts.
#[must_use]
pub fn badge(unread_notifications: usize, unread_alerts: usize) -> Badge {
    Badge {
        count: unread_notifications.saturating_add(unread_alerts),
    }
}

impl Badge {
    #[must_use]
    pub fn count(self) -> usize {
        self.count
    }

    /// The badge is hidden when there is nothing unread.
    #[must_use]
    pub fn is_visible(self) -> bool {
        self.count > 0
    }

    /// Text to render, or `None` when hidden.
    #[must_use]
    pub fn label(self) -> Option<String> {
        self.is_visible().then(|| self.to_string())
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count > BADGE_DISPLAY_CAP {
            write!(f, "{BADGE_DISPLAY_CAP}+")
        } else {
            write!(f, "{}", self.count)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_both_sources() {
        assert_eq!(badge(3, 2).count(), 5);
        assert_eq!(badge(3, 2).to_string(), "5");
    }

    #[test]
    fn caps_display_above_ninety_nine() {
        assert_eq!(badge(55, 60).count(), 115);
        assert_eq!(badge(55, 60).to_string(), "99+");
        assert_eq!(badge(99, 0).to_string(), "99");
        assert_eq!(badge(100, 0).to_string(), "99+");
    }

    #[test]
    fn hidden_when_zero() {
        assert!(!badge(0, 0).is_visible());
        assert_eq!(badge(0, 0).label(), None);
        assert_eq!(badge(0, 1).label().as_deref(), Some("1"));
    }

    #[test]
    fn saturates_instead_of_overflowing() {
        assert_eq!(badge(usize::MAX, 1).count(), usize::MAX);
    }
}
