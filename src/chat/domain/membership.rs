//! Chat membership records and their visibility windows.

use super::{ChatDomainError, ChatId, MembershipId};
use crate::user::domain::UserId;
use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Length of a freshly opened membership window, in calendar years.
///
/// Ten years stands in for "no upper bound" on the persisted
/// `end_message_id` field.
pub const OPEN_WINDOW_YEARS: i32 = 10;

/// Range of message timestamps visible to a member; `start <= end` always.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MembershipWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl MembershipWindow {
    /// Creates a window from explicit bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ChatDomainError::InvertedWindow`] when `end` precedes
    /// `start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ChatDomainError> {
        if end < start {
            return Err(ChatDomainError::InvertedWindow {
                start: start.timestamp_millis(),
                end: end.timestamp_millis(),
            });
        }
        Ok(Self { start, end })
    }

    /// Opens a window at `start` that stays open for
    /// [`OPEN_WINDOW_YEARS`].
    ///
    /// A 29 February start ends on 1 March when the final year has no leap
    /// day. An end past the representable range saturates.
    #[must_use]
    pub fn open_from(start: DateTime<Utc>) -> Self {
        let end = add_years(start, OPEN_WINDOW_YEARS).unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self { start, end }
    }

    /// Returns the earliest visible message time.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Returns the latest visible message time.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns whether a message sent at `at` is visible.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }

    /// Returns the window closed at `at`, never widening it and never
    /// moving the end before the start.
    #[must_use]
    pub fn closed_at(self, at: DateTime<Utc>) -> Self {
        let bound = at.max(self.start);
        Self {
            start: self.start,
            end: self.end.min(bound),
        }
    }
}

/// Per-participant visibility window and read state for a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMembership {
    id: MembershipId,
    chat_id: ChatId,
    user_id: UserId,
    added_at: DateTime<Utc>,
    window: MembershipWindow,
    max_read_date: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedMembershipData {
    /// Persisted membership identifier.
    pub id: MembershipId,
    /// Persisted chat reference.
    pub chat_id: ChatId,
    /// Persisted member.
    pub user_id: UserId,
    /// Persisted join time.
    pub added_at: DateTime<Utc>,
    /// Persisted window start.
    pub start: DateTime<Utc>,
    /// Persisted window end.
    pub end: DateTime<Utc>,
    /// Persisted read watermark.
    pub max_read_date: DateTime<Utc>,
}

impl ChatMembership {
    /// Creates a membership for a user joining at `joined_at`.
    ///
    /// The window opens at the join time and the read watermark starts there.
    #[must_use]
    pub fn new(chat_id: ChatId, user_id: UserId, joined_at: DateTime<Utc>) -> Self {
        Self {
            id: MembershipId::new(),
            chat_id,
            user_id,
            added_at: joined_at,
            window: MembershipWindow::open_from(joined_at),
            max_read_date: joined_at,
        }
    }

    /// Reconstructs a membership from persisted storage data.
    ///
    /// # Errors
    ///
    /// Returns [`ChatDomainError::InvertedWindow`] when the stored window is
    /// inverted.
    pub fn from_persisted(data: PersistedMembershipData) -> Result<Self, ChatDomainError> {
        Ok(Self {
            id: data.id,
            chat_id: data.chat_id,
            user_id: data.user_id,
            added_at: data.added_at,
            window: MembershipWindow::new(data.start, data.end)?,
            max_read_date: data.max_read_date,
        })
    }

    /// Returns the membership identifier.
    #[must_use]
    pub const fn id(&self) -> MembershipId {
        self.id
    }

    /// Returns the chat this membership belongs to.
    #[must_use]
    pub const fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    /// Returns the member.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns the join time.
    #[must_use]
    pub const fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }

    /// Returns the visibility window.
    #[must_use]
    pub const fn window(&self) -> MembershipWindow {
        self.window
    }

    /// Returns the read watermark.
    #[must_use]
    pub const fn max_read_date(&self) -> DateTime<Utc> {
        self.max_read_date
    }

    /// Advances the read watermark to `at`.
    ///
    /// Returns `false` and leaves the watermark unchanged when `at` is not
    /// later than the current watermark.
    pub fn mark_read(&mut self, at: DateTime<Utc>) -> bool {
        if at <= self.max_read_date {
            return false;
        }
        self.max_read_date = at;
        true
    }

    /// Narrows the window so nothing after `at` is visible.
    pub fn close_window(&mut self, at: DateTime<Utc>) {
        self.window = self.window.closed_at(at);
    }
}

/// Derives one membership per participant for a chat being created.
///
/// Every record in the batch shares `now` as its join time, window start,
/// and read watermark. Output order follows `participants`.
#[must_use]
pub fn materialize_memberships(
    chat_id: ChatId,
    participants: &[UserId],
    now: DateTime<Utc>,
) -> Vec<ChatMembership> {
    participants
        .iter()
        .map(|user_id| ChatMembership::new(chat_id, user_id.clone(), now))
        .collect()
}

fn add_years(start: DateTime<Utc>, years: i32) -> Option<DateTime<Utc>> {
    let year = start.year().checked_add(years)?;
    start.with_year(year).or_else(|| {
        NaiveDate::from_ymd_opt(year, 3, 1).map(|date| date.and_time(start.time()).and_utc())
    })
}
