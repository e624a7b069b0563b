//! Core types: thoughts, their kinds, and the subjects they are about.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ThoughtError;
use crate::validation::ValidationError;

/// Structured thought content: an arbitrary JSON object.
pub type Content = serde_json::Map<String, serde_json::Value>;

/// Importance assigned when none is given.
pub const DEFAULT_IMPORTANCE: i32 = 50;

// ─────────────────────────────────────────────────────────────────────────────
// Identifiers
// ─────────────────────────────────────────────────────────────────────────────

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Parse from the hyphenated string form.
            pub fn parse(s: &str) -> std::result::Result<Self, uuid::Error> {
                Ok(Self(Uuid::parse_str(s)?))
            }

            /// The underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier of a thought.
    ThoughtId
);

uuid_id!(
    /// Identifier of the bot (agent) that owns a thought.
    BotId
);

uuid_id!(
    /// Identifier of a subject instance (a project, a person, ...).
    SubjectId
);

// ─────────────────────────────────────────────────────────────────────────────
// Thought kinds
// ─────────────────────────────────────────────────────────────────────────────

/// The specialization of a thought, stored in the `type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ThoughtKind {
    /// Plain thought; stored with no type.
    #[default]
    Base,
    /// Something the bot noticed.
    Observation,
    /// A conclusion the bot drew from earlier thoughts.
    Reflection,
}

impl ThoughtKind {
    /// The stored type name, `None` for the base kind.
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            Self::Base => None,
            Self::Observation => Some("Observation"),
            Self::Reflection => Some("Reflection"),
        }
    }

    /// Resolve a stored type name.
    pub fn from_type_name(name: Option<&str>) -> std::result::Result<Self, ValidationError> {
        match name {
            None => Ok(Self::Base),
            Some("Observation") => Ok(Self::Observation),
            Some("Reflection") => Ok(Self::Reflection),
            Some(other) => Err(ValidationError::UnknownThoughtKind(other.to_string())),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Subjects
// ─────────────────────────────────────────────────────────────────────────────

/// Kinds of subject a thought can be about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubjectKind {
    Project,
    Person,
}

impl SubjectKind {
    /// All known kinds.
    pub const ALL: [SubjectKind; 2] = [SubjectKind::Project, SubjectKind::Person];

    /// The tag stored in `subject_type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "Project",
            Self::Person => "Person",
        }
    }

    /// Table holding instances of this kind.
    pub(crate) fn table_name(&self) -> &'static str {
        match self {
            Self::Project => "projects",
            Self::Person => "people",
        }
    }
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubjectKind {
    type Err = ThoughtError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Project" => Ok(Self::Project),
            "Person" => Ok(Self::Person),
            other => Err(ThoughtError::UnknownSubjectKind(other.to_string())),
        }
    }
}

/// A reference to the subject a thought is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "subject_type", content = "subject_id")]
pub enum Subject {
    Project(SubjectId),
    Person(SubjectId),
}

impl Subject {
    /// Build a reference of the given kind.
    pub fn new(kind: SubjectKind, id: SubjectId) -> Self {
        match kind {
            SubjectKind::Project => Self::Project(id),
            SubjectKind::Person => Self::Person(id),
        }
    }

    /// The kind of subject referenced.
    pub fn kind(&self) -> SubjectKind {
        match self {
            Self::Project(_) => SubjectKind::Project,
            Self::Person(_) => SubjectKind::Person,
        }
    }

    /// The referenced instance id.
    pub fn id(&self) -> SubjectId {
        match self {
            Self::Project(id) | Self::Person(id) => *id,
        }
    }
}

/// A persisted subject instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectRecord {
    pub id: SubjectId,
    pub kind: SubjectKind,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SubjectRecord {
    /// Create a new, unsaved subject.
    pub fn new(kind: SubjectKind, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: SubjectId::new(),
            kind,
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// A reference to this subject.
    pub fn subject(&self) -> Subject {
        Subject::new(self.kind, self.id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Thought
// ─────────────────────────────────────────────────────────────────────────────

/// A unit of knowledge recorded by a bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thought {
    pub id: ThoughtId,
    pub kind: ThoughtKind,
    /// Short summary. Outer whitespace is kept as given.
    pub brief: String,
    pub content: Content,
    pub importance: i32,
    #[serde(flatten)]
    pub subject: Option<Subject>,
    pub bot_id: BotId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Thought {
    /// Create a new base thought with empty content and default importance.
    pub fn new(bot_id: BotId, brief: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ThoughtId::new(),
            kind: ThoughtKind::Base,
            brief: brief.into(),
            content: Content::new(),
            importance: DEFAULT_IMPORTANCE,
            subject: None,
            bot_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_kind(mut self, kind: ThoughtKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_content(mut self, content: Content) -> Self {
        self.content = content;
        self
    }

    pub fn with_importance(mut self, importance: i32) -> Self {
        self.importance = importance;
        self
    }

    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subject = Some(subject);
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Creation and update parameters
// ─────────────────────────────────────────────────────────────────────────────

/// Parameters for creating a thought.
///
/// The subject can be given either directly (`subject_type` + `subject_id`)
/// or by name (`subject_type` + `subject_name`), in which case a subject with
/// that name is found or created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewThought {
    pub bot_id: Option<BotId>,
    pub brief: String,
    pub content: Content,
    pub importance: Option<i32>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub subject_type: Option<String>,
    pub subject_id: Option<SubjectId>,
    pub subject_name: Option<String>,
}

impl NewThought {
    /// Start creation parameters for a bot.
    pub fn new(bot_id: BotId, brief: impl Into<String>) -> Self {
        Self {
            bot_id: Some(bot_id),
            brief: brief.into(),
            ..Self::default()
        }
    }

    pub fn content(mut self, content: Content) -> Self {
        self.content = content;
        self
    }

    pub fn importance(mut self, importance: i32) -> Self {
        self.importance = Some(importance);
        self
    }

    /// Set the thought type by name (e.g. `"Reflection"`).
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Reference an existing subject by id.
    pub fn subject_id(mut self, subject_type: impl Into<String>, id: SubjectId) -> Self {
        self.subject_type = Some(subject_type.into());
        self.subject_id = Some(id);
        self
    }

    /// Reference a subject by name, creating it if needed.
    pub fn subject_name(mut self, subject_type: impl Into<String>, name: impl Into<String>) -> Self {
        self.subject_type = Some(subject_type.into());
        self.subject_name = Some(name.into());
        self
    }
}

/// Field changes applied to an existing thought. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThoughtUpdate {
    pub brief: Option<String>,
    pub content: Option<Content>,
    pub importance: Option<i32>,
}

impl ThoughtUpdate {
    pub fn brief(mut self, brief: impl Into<String>) -> Self {
        self.brief = Some(brief.into());
        self
    }

    pub fn content(mut self, content: Content) -> Self {
        self.content = Some(content);
        self
    }

    pub fn importance(mut self, importance: i32) -> Self {
        self.importance = Some(importance);
        self
    }

    /// Whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.brief.is_none() && self.content.is_none() && self.importance.is_none()
    }

    /// Apply the changes to a thought.
    pub fn apply(self, thought: &mut Thought) {
        if let Some(brief) = self.brief {
            thought.brief = brief;
        }
        if let Some(content) = self.content {
            thought.content = content;
        }
        if let Some(importance) = self.importance {
            thought.importance = importance;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_thought_defaults() {
        let bot = BotId::new();
        let thought = Thought::new(bot, "Something");
        assert_eq!(thought.kind, ThoughtKind::Base);
        assert_eq!(thought.importance, DEFAULT_IMPORTANCE);
        assert!(thought.content.is_empty());
        assert!(thought.subject.is_none());
        assert_eq!(thought.bot_id, bot);
    }

    #[test]
    fn test_kind_type_names() {
        assert_eq!(ThoughtKind::Base.type_name(), None);
        for kind in [ThoughtKind::Base, ThoughtKind::Observation, ThoughtKind::Reflection] {
            assert_eq!(ThoughtKind::from_type_name(kind.type_name()).unwrap(), kind);
        }
        assert!(matches!(
            ThoughtKind::from_type_name(Some("Dream")),
            Err(ValidationError::UnknownThoughtKind(_))
        ));
    }

    #[test]
    fn test_subject_kind_parse() {
        assert_eq!("Project".parse::<SubjectKind>().unwrap(), SubjectKind::Project);
        assert_eq!("Person".parse::<SubjectKind>().unwrap(), SubjectKind::Person);
        assert!(matches!(
            "Planet".parse::<SubjectKind>(),
            Err(ThoughtError::UnknownSubjectKind(name)) if name == "Planet"
        ));
    }

    #[test]
    fn test_subject_accessors() {
        let id = SubjectId::new();
        let subject = Subject::new(SubjectKind::Person, id);
        assert_eq!(subject, Subject::Person(id));
        assert_eq!(subject.kind(), SubjectKind::Person);
        assert_eq!(subject.id(), id);
    }

    #[test]
    fn test_thought_serializes_subject_as_column_pair() {
        let subject_id = SubjectId::new();
        let thought = Thought::new(BotId::new(), "x").with_subject(Subject::Project(subject_id));
        let value = serde_json::to_value(&thought).unwrap();
        assert_eq!(value["subject_type"], json!("Project"));
        assert_eq!(value["subject_id"], json!(subject_id.to_string()));
    }

    #[test]
    fn test_new_thought_deserializes_from_params() {
        let params: NewThought = serde_json::from_value(json!({
            "brief": "The Hands Down project involves working with AI vision models.",
            "importance": 55,
            "subject_type": "Project",
            "subject_name": "Hands Down"
        }))
        .unwrap();
        assert_eq!(params.importance, Some(55));
        assert_eq!(params.subject_type.as_deref(), Some("Project"));
        assert_eq!(params.subject_name.as_deref(), Some("Hands Down"));
        assert!(params.bot_id.is_none());
        assert!(params.content.is_empty());
    }

    #[test]
    fn test_update_apply() {
        let mut thought = Thought::new(BotId::new(), "old");
        let mut content = Content::new();
        content.insert("k".into(), json!("v"));

        let update = ThoughtUpdate::default().brief("new").content(content.clone());
        assert!(!update.is_empty());
        update.apply(&mut thought);

        assert_eq!(thought.brief, "new");
        assert_eq!(thought.content, content);
        assert_eq!(thought.importance, DEFAULT_IMPORTANCE);
        assert!(ThoughtUpdate::default().is_empty());
    }
}
