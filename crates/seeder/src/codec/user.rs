use tandberg_pantry_core::{Email, Preferences, User, UserId};

use super::{CodecError, DocumentCodec, FieldReader, FieldWriter};
use crate::store::Fields;

impl DocumentCodec for Preferences {
    fn to_fields(&self) -> Fields {
        FieldWriter::new()
            .set("language", self.language.code())
            .set_opt(
                "defaultPantryId",
                self.default_pantry_id.as_ref().map(|id| id.as_str()),
            )
            .finish()
    }

    fn from_fields(fields: &Fields) -> Result<Self, CodecError> {
        read_preferences(&FieldReader::new(fields))
    }
}

fn read_preferences(reader: &FieldReader<'_>) -> Result<Preferences, CodecError> {
    Ok(Preferences {
        language: reader.opt_parse("language")?.unwrap_or_default(),
        default_pantry_id: reader.opt_string("defaultPantryId")?.map(Into::into),
    })
}

impl DocumentCodec for User {
    fn to_fields(&self) -> Fields {
        FieldWriter::new()
            .set("id", self.id.as_str())
            .set("email", self.email.as_str())
            .set_opt("displayName", self.display_name.as_deref())
            .set("preferences", self.preferences.to_fields())
            .set("createdAt", self.created_at)
            .set("updatedAt", self.updated_at)
            .finish()
    }

    fn from_fields(fields: &Fields) -> Result<Self, CodecError> {
        let reader = FieldReader::new(fields);
        // Accounts created before preferences existed have no map at all
        let preferences = match reader.opt_map("preferences")? {
            Some(preferences) => read_preferences(&preferences)?,
            None => Preferences::default(),
        };

        Ok(Self {
            id: UserId::new(reader.string("id")?),
            email: reader.parse::<Email>("email")?,
            display_name: reader.opt_string("displayName")?,
            preferences,
            created_at: reader.timestamp("createdAt")?,
            updated_at: reader.timestamp("updatedAt")?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use tandberg_pantry_core::{Language, PantryId};

    use super::*;
    use crate::store::Value;

    fn user() -> User {
        User::new(
            UserId::new("s1isQk9Oon02UQQ1xQ8R1XDHV9DD"),
            Email::parse("test@example.com").unwrap(),
            Some("Test User"),
            Preferences {
                language: Language::No,
                default_pantry_id: Some(PantryId::new("pantry1")),
            },
            Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap(),
        )
    }

    #[test]
    fn test_field_names_match_application() {
        let fields = user().to_fields();
        let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            ["createdAt", "displayName", "email", "id", "preferences", "updatedAt"]
        );

        let preferences = fields.get("preferences").and_then(Value::as_map).unwrap();
        assert_eq!(
            preferences.get("language").and_then(Value::as_str),
            Some("no")
        );
        assert_eq!(
            preferences.get("defaultPantryId").and_then(Value::as_str),
            Some("pantry1")
        );
    }

    #[test]
    fn test_decodes_what_it_encodes() {
        let user = user();
        assert_eq!(User::from_fields(&user.to_fields()).unwrap(), user);
    }

    #[test]
    fn test_missing_preferences_default_to_english() {
        let mut fields = user().to_fields();
        fields.remove("preferences");
        fields.remove("displayName");

        let decoded = User::from_fields(&fields).unwrap();
        assert_eq!(decoded.preferences.language, Language::En);
        assert!(decoded.display_name.is_none());
    }

    #[test]
    fn test_rejects_invalid_email() {
        let mut fields = user().to_fields();
        fields.insert("email".to_owned(), Value::from("not-an-email"));
        assert!(matches!(
            User::from_fields(&fields),
            Err(CodecError::Invalid { ref field, .. }) if field == "email"
        ));
    }
}
