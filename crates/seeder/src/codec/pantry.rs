use tandberg_pantry_core::{Item, ItemList, Membership, Pantry, PantryId};

use super::{CodecError, DocumentCodec, FieldReader, FieldWriter};
use crate::store::{Fields, Value};

impl DocumentCodec for Item {
    fn to_fields(&self) -> Fields {
        FieldWriter::new()
            .set("id", self.id.as_str())
            .set("name", self.name.as_str())
            .set_opt("quantity", self.quantity.map(Value::number))
            .set_opt("unit", self.unit.as_deref())
            .set("lastUpdated", self.last_updated)
            .finish()
    }

    fn from_fields(fields: &Fields) -> Result<Self, CodecError> {
        read_item(&FieldReader::new(fields))
    }
}

fn read_item(reader: &FieldReader<'_>) -> Result<Item, CodecError> {
    Ok(Item {
        id: reader.string("id")?.into(),
        name: reader.string("name")?,
        quantity: reader.opt_number("quantity")?,
        unit: reader.opt_string("unit")?,
        last_updated: reader.integer("lastUpdated")?,
    })
}

impl DocumentCodec for Membership {
    fn to_fields(&self) -> Fields {
        FieldWriter::new()
            .set("userId", self.user_id.as_str())
            .set("role", self.role.as_str())
            .set("joinedAt", self.joined_at)
            .set_opt("addedBy", self.added_by.as_ref().map(|id| id.as_str()))
            .finish()
    }

    fn from_fields(fields: &Fields) -> Result<Self, CodecError> {
        let reader = FieldReader::new(fields);
        Ok(Self {
            user_id: reader.string("userId")?.into(),
            role: reader.parse("role")?,
            joined_at: reader.timestamp("joinedAt")?,
            added_by: reader.opt_string("addedBy")?.map(Into::into),
        })
    }
}

/// The pantry document only. Members live in their own sub-collection and
/// decode as an empty list here.
impl DocumentCodec for Pantry {
    fn to_fields(&self) -> Fields {
        let mut writer = FieldWriter::new()
            .set("id", self.id.as_str())
            .set("name", self.name.as_str())
            .set("location", self.location.as_str())
            .set("createdBy", self.created_by.as_str())
            .set("createdAt", self.created_at)
            .set("updatedAt", self.updated_at);

        for list in ItemList::ALL {
            let items: Vec<Value> = self
                .items(list)
                .iter()
                .map(|item| item.to_fields().into())
                .collect();
            writer = writer.set(list.field_name(), items);
        }

        writer.finish()
    }

    fn from_fields(fields: &Fields) -> Result<Self, CodecError> {
        let reader = FieldReader::new(fields);
        let read_list = |list: ItemList| -> Result<Vec<Item>, CodecError> {
            reader
                .map_array(list.field_name())?
                .iter()
                .map(read_item)
                .collect()
        };

        Ok(Self {
            id: PantryId::new(reader.string("id")?),
            name: reader.string("name")?,
            location: reader.string("location")?,
            created_by: reader.string("createdBy")?.into(),
            created_at: reader.timestamp("createdAt")?,
            updated_at: reader.timestamp("updatedAt")?,
            in_stock: read_list(ItemList::InStock)?,
            shopping_list: read_list(ItemList::ShoppingList)?,
            members: Vec::new(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use tandberg_pantry_core::{MemberRole, UserId};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap()
    }

    fn pantry() -> Pantry {
        Pantry::new("pantry1", "Home Kitchen", "Hjemme", UserId::new("u1"), now())
            .with_item(ItemList::InStock, Item::new("1", "Milk", 2.0, "l", now()))
            .with_item(ItemList::InStock, Item::new("2", "Flour", 0.5, "kg", now()))
            .with_item(ItemList::ShoppingList, Item::new("1", "Tomatoes", 6.0, "pcs", now()))
    }

    #[test]
    fn test_whole_quantity_is_integer() {
        let fields = Item::new("1", "Milk", 2.0, "l", now()).to_fields();
        assert_eq!(fields.get("quantity"), Some(&Value::IntegerValue(2)));
        assert_eq!(
            fields.get("lastUpdated").and_then(Value::as_i64),
            Some(now().timestamp_millis())
        );
    }

    #[test]
    fn test_fractional_quantity_is_double() {
        let fields = Item::new("2", "Flour", 0.5, "kg", now()).to_fields();
        assert_eq!(fields.get("quantity"), Some(&Value::DoubleValue(0.5)));
    }

    #[test]
    fn test_item_without_quantity_or_unit() {
        let item = Item {
            quantity: None,
            unit: None,
            ..Item::new("3", "Salt", 1.0, "pack", now())
        };
        let fields = item.to_fields();
        assert!(!fields.contains_key("quantity"));
        assert!(!fields.contains_key("unit"));
        assert_eq!(Item::from_fields(&fields).unwrap(), item);
    }

    #[test]
    fn test_pantry_lists_are_arrays_of_maps() {
        let fields = pantry().to_fields();
        let in_stock = fields.get("inStock").and_then(Value::as_array).unwrap();
        assert_eq!(in_stock.len(), 2);
        let milk = in_stock.first().and_then(Value::as_map).unwrap();
        assert_eq!(milk.get("name").and_then(Value::as_str), Some("Milk"));
        assert!(!fields.contains_key("members"));
    }

    #[test]
    fn test_pantry_decodes_without_members() {
        let pantry = pantry();
        let decoded = Pantry::from_fields(&pantry.to_fields()).unwrap();

        assert!(decoded.members.is_empty());
        assert_eq!(decoded.in_stock, pantry.in_stock);
        assert_eq!(decoded.shopping_list, pantry.shopping_list);
        assert_eq!(decoded.find_item(ItemList::InStock, "Milk").unwrap().quantity, Some(2.0));
    }

    #[test]
    fn test_bad_item_names_list_and_index() {
        let mut fields = pantry().to_fields();
        let broken = FieldWriter::new().set("id", "9").finish();
        fields.insert("shoppingList".to_owned(), vec![Value::from(broken)].into());

        assert_eq!(
            Pantry::from_fields(&fields),
            Err(CodecError::Missing("shoppingList[0].name".to_string()))
        );
    }

    #[test]
    fn test_membership_fields() {
        let member = Membership::added(
            UserId::new("u2"),
            MemberRole::Editor,
            UserId::new("u1"),
            now(),
        );
        let fields = member.to_fields();
        assert_eq!(fields.get("role").and_then(Value::as_str), Some("editor"));
        assert_eq!(fields.get("addedBy").and_then(Value::as_str), Some("u1"));
        assert_eq!(Membership::from_fields(&fields).unwrap(), member);

        let owner = Membership::owner(UserId::new("u1"), now()).to_fields();
        assert!(!owner.contains_key("addedBy"));
    }
}
