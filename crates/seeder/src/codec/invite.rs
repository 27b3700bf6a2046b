use tandberg_pantry_core::{Invite, InviteCode};

use super::{CodecError, DocumentCodec, FieldReader, FieldWriter};
use crate::store::Fields;

impl DocumentCodec for Invite {
    fn to_fields(&self) -> Fields {
        FieldWriter::new()
            .set("code", self.code.as_str())
            .set("pantryId", self.pantry_id.as_str())
            .set("createdBy", self.created_by.as_str())
            .set("createdAt", self.created_at)
            .set("expiresAt", self.expires_at)
            .set_opt("usedBy", self.used_by.as_ref().map(|id| id.as_str()))
            .finish()
    }

    fn from_fields(fields: &Fields) -> Result<Self, CodecError> {
        let reader = FieldReader::new(fields);
        Ok(Self {
            code: InviteCode::new(reader.string("code")?),
            pantry_id: reader.string("pantryId")?.into(),
            created_by: reader.string("createdBy")?.into(),
            created_at: reader.timestamp("createdAt")?,
            expires_at: reader.timestamp("expiresAt")?,
            used_by: reader.opt_string("usedBy")?.map(Into::into),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use tandberg_pantry_core::{PantryId, UserId};

    use super::*;
    use crate::store::Value;

    fn invite() -> Invite {
        Invite::new(
            InviteCode::new("WELCOME-HOME-2024"),
            PantryId::new("pantry1"),
            UserId::new("u1"),
            Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap(),
            Duration::days(7),
        )
    }

    #[test]
    fn test_unused_invite_omits_used_by() {
        let fields = invite().to_fields();
        assert!(!fields.contains_key("usedBy"));
        assert_eq!(
            fields.get("expiresAt").and_then(Value::as_timestamp),
            Some(Utc.with_ymd_and_hms(2024, 3, 8, 8, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_decodes_redeemed_invite() {
        let invite = Invite {
            used_by: Some(UserId::new("u2")),
            ..invite()
        };
        let decoded = Invite::from_fields(&invite.to_fields()).unwrap();
        assert_eq!(decoded, invite);
        assert!(!decoded.is_redeemable(decoded.created_at));
    }

    #[test]
    fn test_expiry_must_be_timestamp() {
        let mut fields = invite().to_fields();
        fields.insert("expiresAt".to_owned(), Value::from("next week"));
        assert!(matches!(
            Invite::from_fields(&fields),
            Err(CodecError::WrongType { expected: "timestamp", .. })
        ));
    }
}
