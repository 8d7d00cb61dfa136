use crate::errors::DecodeError;
use crate::record::{Record, RecordState};
use crate::schema::{IdPolicy, Schema};
use crate::value::Value;

/// Contact - a named person reachable by email
///
/// Identifier policy: **store-assigned**. `Contact::new` leaves the id empty
/// and the store hands back an integer row id on the first save.
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    state: RecordState,

    pub name: String,

    pub email: String,
}

impl Contact {
    /// Backing table name
    pub const ENTITY: &'static str = "contacts";

    /// Create a transient contact with no identifier
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            state: RecordState::transient(),
            name: name.into(),
            email: email.into(),
        }
    }
}

impl Record for Contact {
    fn schema() -> Schema {
        Schema::new(Self::ENTITY, IdPolicy::StoreAssigned)
            .string("name")
            .string("email")
    }

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        Ok(Self {
            state: RecordState {
                id: value.extract("id")?,
                exists: false,
            },
            name: value.extract("name")?,
            email: value.extract("email")?,
        })
    }

    fn encode(&self) -> Value {
        let mut fields = vec![
            ("name", Value::from(self.name.as_str())),
            ("email", Value::from(self.email.as_str())),
        ];
        if let Some(id) = self.id() {
            fields.push(("id", Value::from(id.clone())));
        }
        Value::mapping(fields)
    }

    fn state(&self) -> &RecordState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut RecordState {
        &mut self.state
    }

    fn probe() -> Self {
        Self::new("", "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::Identifier;

    #[test]
    fn test_new_contact_is_transient_without_id() {
        let contact = Contact::new("Ada", "ada@example.org");
        assert!(contact.id().is_none());
        assert!(!contact.exists());
    }

    #[test]
    fn test_encode_omits_absent_id_and_exists_flag() {
        let encoded = Contact::new("Ada", "ada@example.org").encode();
        let map = encoded.as_mapping().unwrap();
        assert_eq!(map.len(), 2);
        assert!(!map.contains_key("id"));
        assert!(!map.contains_key("exists"));
    }

    #[test]
    fn test_decode_keeps_id_but_not_existing() {
        let value = Value::mapping([
            ("id", Value::from(5_i64)),
            ("name", Value::from("Ada")),
            ("email", Value::from("ada@example.org")),
        ]);
        let contact = Contact::decode(&value).unwrap();
        assert_eq!(contact.id(), Some(&Identifier::Integer(5)));
        assert!(!contact.exists());
    }
}
