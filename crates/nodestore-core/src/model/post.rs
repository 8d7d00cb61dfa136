use crate::errors::DecodeError;
use crate::identifier::Identifier;
use crate::record::{Record, RecordState};
use crate::schema::{IdPolicy, Schema};
use crate::value::Value;

/// Post - a piece of free-form content
///
/// Identifier policy: **client-generated**. `Post::new` assigns a fresh UUID
/// token at construction. `decode` takes whatever `id` the value carries and
/// never backfills one; a decoded post without an id gets its token from the
/// gateway on first save.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    state: RecordState,

    pub content: String,
}

impl Post {
    /// Backing table name
    pub const ENTITY: &'static str = "posts";

    /// Create a transient post with a freshly generated identifier
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            state: RecordState::transient_with_id(Identifier::generate()),
            content: content.into(),
        }
    }
}

impl Record for Post {
    fn schema() -> Schema {
        Schema::new(Self::ENTITY, IdPolicy::ClientGenerated).string("content")
    }

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        Ok(Self {
            state: RecordState {
                id: value.extract("id")?,
                exists: false,
            },
            content: value.extract("content")?,
        })
    }

    fn encode(&self) -> Value {
        let mut fields = vec![("content", Value::from(self.content.as_str()))];
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
        Self::new("")
    }
}
