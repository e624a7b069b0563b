//! Validation of thought creation and update parameters.
//!
//! Validation runs before anything is written: a rejected request leaves
//! neither a thought nor a subject behind.

use crate::types::{NewThought, ThoughtKind, ThoughtUpdate};

// ─────────────────────────────────────────────────────────────────────────────
// Validation Error
// ─────────────────────────────────────────────────────────────────────────────

/// Specific validation failures for thought parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// The brief is empty or only whitespace.
    #[error("brief is empty")]
    EmptyBrief,

    /// No owning bot was given.
    #[error("bot_id is required")]
    MissingBotId,

    /// A subject type was given without an id or a name.
    #[error("subject_type '{0}' needs a subject_id or a subject_name")]
    MissingSubjectReference(String),

    /// A subject id or name was given without a subject type.
    #[error("subject_type is required when a subject_id or subject_name is given")]
    MissingSubjectType,

    /// The subject name is empty or only whitespace.
    #[error("subject_name is empty")]
    EmptySubjectName,

    /// The thought type names no known kind.
    #[error("unknown thought type: {0}")]
    UnknownThoughtKind(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// Creation
// ─────────────────────────────────────────────────────────────────────────────

/// Validate creation parameters.
///
/// Checks:
/// 1. A bot id is present
/// 2. The brief has non-whitespace text
/// 3. The thought type, if any, is known
/// 4. The subject fields are complete: a type always comes with an id or a name
pub fn validate_new_thought(params: &NewThought) -> std::result::Result<(), ValidationError> {
    if params.bot_id.is_none() {
        return Err(ValidationError::MissingBotId);
    }

    validate_brief(&params.brief)?;
    ThoughtKind::from_type_name(params.kind.as_deref())?;

    match (&params.subject_type, &params.subject_id, &params.subject_name) {
        (None, None, None) => {}
        (None, _, _) => return Err(ValidationError::MissingSubjectType),
        (Some(subject_type), None, None) => {
            return Err(ValidationError::MissingSubjectReference(
                subject_type.clone(),
            ));
        }
        (Some(_), None, Some(name)) if name.trim().is_empty() => {
            return Err(ValidationError::EmptySubjectName);
        }
        (Some(_), _, _) => {}
    }

    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Update
// ─────────────────────────────────────────────────────────────────────────────

/// Validate an update. Only fields being changed are checked.
pub fn validate_update(update: &ThoughtUpdate) -> std::result::Result<(), ValidationError> {
    if let Some(brief) = &update.brief {
        validate_brief(brief)?;
    }
    Ok(())
}

fn validate_brief(brief: &str) -> std::result::Result<(), ValidationError> {
    if brief.trim().is_empty() {
        return Err(ValidationError::EmptyBrief);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BotId, SubjectId};

    fn params() -> NewThought {
        NewThought::new(BotId::new(), "A brief")
    }

    #[test]
    fn test_valid_minimal() {
        assert!(validate_new_thought(&params()).is_ok());
    }

    #[test]
    fn test_missing_bot_id() {
        let mut p = params();
        p.bot_id = None;
        assert_eq!(validate_new_thought(&p), Err(ValidationError::MissingBotId));
    }

    #[test]
    fn test_empty_brief() {
        let p = NewThought::new(BotId::new(), "   ");
        assert_eq!(validate_new_thought(&p), Err(ValidationError::EmptyBrief));
    }

    #[test]
    fn test_unknown_kind() {
        let p = params().kind("Dream");
        assert_eq!(
            validate_new_thought(&p),
            Err(ValidationError::UnknownThoughtKind("Dream".into()))
        );
    }

    #[test]
    fn test_subject_type_without_reference() {
        let mut p = params();
        p.subject_type = Some("Project".into());
        assert_eq!(
            validate_new_thought(&p),
            Err(ValidationError::MissingSubjectReference("Project".into()))
        );
    }

    #[test]
    fn test_subject_reference_without_type() {
        let mut p = params();
        p.subject_name = Some("Hands Down".into());
        assert_eq!(
            validate_new_thought(&p),
            Err(ValidationError::MissingSubjectType)
        );

        let mut p = params();
        p.subject_id = Some(SubjectId::new());
        assert_eq!(
            validate_new_thought(&p),
            Err(ValidationError::MissingSubjectType)
        );
    }

    #[test]
    fn test_blank_subject_name() {
        let p = params().subject_name("Project", "  ");
        assert_eq!(
            validate_new_thought(&p),
            Err(ValidationError::EmptySubjectName)
        );
    }

    #[test]
    fn test_subject_by_id_or_name() {
        assert!(validate_new_thought(&params().subject_id("Project", SubjectId::new())).is_ok());
        assert!(validate_new_thought(&params().subject_name("Project", "Hands Down")).is_ok());
    }

    #[test]
    fn test_validate_update() {
        assert!(validate_update(&ThoughtUpdate::default()).is_ok());
        assert!(validate_update(&ThoughtUpdate::default().importance(90)).is_ok());
        assert_eq!(
            validate_update(&ThoughtUpdate::default().brief("")),
            Err(ValidationError::EmptyBrief)
        );
    }
}
