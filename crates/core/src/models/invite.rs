//! Invite links.

use chrono::{DateTime, Duration, Utc};

use crate::types::{InviteCode, PantryId, UserId};

/// An invite document in `invites/{code}`.
///
/// The code is the last path segment of the shared link
/// (`/join/{code}`). Redeeming it adds the redeemer as a pantry member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invite {
    pub code: InviteCode,
    pub pantry_id: PantryId,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Set once the link has been redeemed.
    pub used_by: Option<UserId>,
}

impl Invite {
    /// Create an unused invite valid for `ttl` from `now`.
    #[must_use]
    pub fn new(
        code: InviteCode,
        pantry_id: PantryId,
        created_by: UserId,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            code,
            pantry_id,
            created_by,
            created_at: now,
            expires_at: now + ttl,
            used_by: None,
        }
    }

    /// Whether the link can no longer be redeemed at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether the link is unused and unexpired at `now`.
    #[must_use]
    pub fn is_redeemable(&self, now: DateTime<Utc>) -> bool {
        self.used_by.is_none() && !self.is_expired(now)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn invite() -> Invite {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        Invite::new(
            InviteCode::new("CODE"),
            PantryId::new("pantry1"),
            UserId::new("owner"),
            now,
            Duration::days(7),
        )
    }

    #[test]
    fn test_expiry_boundary() {
        let invite = invite();
        assert!(!invite.is_expired(invite.expires_at - Duration::seconds(1)));
        assert!(invite.is_expired(invite.expires_at));
    }

    #[test]
    fn test_used_invite_not_redeemable() {
        let mut invite = invite();
        assert!(invite.is_redeemable(invite.created_at));
        invite.used_by = Some(UserId::new("friend"));
        assert!(!invite.is_redeemable(invite.created_at));
    }
}
