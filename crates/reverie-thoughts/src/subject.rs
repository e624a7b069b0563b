//! Resolution of the subject a new thought is about.
//!
//! A subject arrives as a type tag plus either an id or a human-readable
//! name. An id is taken as-is; a name is looked up within its kind and the
//! subject is created if it does not exist yet.
//!
//! Creating a subject here is not undone if the thought insert that follows
//! fails; the subject simply remains.

use tracing::debug;

use crate::error::Result;
use crate::store::ThoughtStore;
use crate::types::{NewThought, Subject, SubjectId, SubjectKind};
use crate::validation::ValidationError;

/// Subject fields taken from creation parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubjectParams<'a> {
    pub subject_type: Option<&'a str>,
    pub subject_id: Option<SubjectId>,
    pub subject_name: Option<&'a str>,
}

impl<'a> From<&'a NewThought> for SubjectParams<'a> {
    fn from(params: &'a NewThought) -> Self {
        Self {
            subject_type: params.subject_type.as_deref(),
            subject_id: params.subject_id,
            subject_name: params.subject_name.as_deref(),
        }
    }
}

/// Resolves subject parameters against the subject tables of a store.
#[derive(Debug, Clone, Copy)]
pub struct SubjectResolver<'a> {
    store: &'a ThoughtStore,
}

impl<'a> SubjectResolver<'a> {
    pub fn new(store: &'a ThoughtStore) -> Self {
        Self { store }
    }

    /// Resolve to a subject reference, or `None` when no subject was given.
    ///
    /// An explicit id wins over a name. A type without either is rejected.
    pub fn resolve(&self, params: SubjectParams<'_>) -> Result<Option<Subject>> {
        let Some(subject_type) = params.subject_type else {
            if params.subject_id.is_some() || params.subject_name.is_some() {
                return Err(ValidationError::MissingSubjectType.into());
            }
            return Ok(None);
        };

        let kind: SubjectKind = subject_type.parse()?;

        if let Some(id) = params.subject_id {
            return Ok(Some(Subject::new(kind, id)));
        }

        match params.subject_name {
            Some(name) => {
                let record = self.store.find_or_create_subject(kind, name)?;
                debug!("Resolved {} '{}' to {}", kind, name, record.id);
                Ok(Some(record.subject()))
            }
            None => Err(ValidationError::MissingSubjectReference(subject_type.to_string()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ThoughtError;
    use crate::types::BotId;

    fn store() -> ThoughtStore {
        ThoughtStore::open_in_memory().unwrap()
    }

    #[test]
    fn test_no_subject() {
        let store = store();
        let resolver = SubjectResolver::new(&store);
        assert_eq!(resolver.resolve(SubjectParams::default()).unwrap(), None);
    }

    #[test]
    fn test_id_used_as_is() {
        let store = store();
        let resolver = SubjectResolver::new(&store);
        let id = SubjectId::new();

        let subject = resolver
            .resolve(SubjectParams {
                subject_type: Some("Project"),
                subject_id: Some(id),
                subject_name: None,
            })
            .unwrap();

        assert_eq!(subject, Some(Subject::Project(id)));
        // No existence check, nothing created
        assert_eq!(store.count_subjects(SubjectKind::Project).unwrap(), 0);
    }

    #[test]
    fn test_id_wins_over_name() {
        let store = store();
        let resolver = SubjectResolver::new(&store);
        let id = SubjectId::new();

        let subject = resolver
            .resolve(SubjectParams {
                subject_type: Some("Person"),
                subject_id: Some(id),
                subject_name: Some("Grace"),
            })
            .unwrap();

        assert_eq!(subject, Some(Subject::Person(id)));
        assert_eq!(store.count_subjects(SubjectKind::Person).unwrap(), 0);
    }

    #[test]
    fn test_name_finds_or_creates() {
        let store = store();
        let resolver = SubjectResolver::new(&store);
        let params = NewThought::new(BotId::new(), "x").subject_name("Project", "Hands Down");

        let first = resolver.resolve((&params).into()).unwrap().unwrap();
        assert_eq!(store.count_subjects(SubjectKind::Project).unwrap(), 1);

        let second = resolver.resolve((&params).into()).unwrap().unwrap();
        assert_eq!(first, second);
        assert_eq!(store.count_subjects(SubjectKind::Project).unwrap(), 1);

        let record = store
            .find_subject_by_name(SubjectKind::Project, "Hands Down")
            .unwrap()
            .unwrap();
        assert_eq!(first, Subject::Project(record.id));
    }

    #[test]
    fn test_unknown_kind() {
        let store = store();
        let resolver = SubjectResolver::new(&store);

        let err = resolver
            .resolve(SubjectParams {
                subject_type: Some("Planet"),
                subject_id: None,
                subject_name: Some("Mars"),
            })
            .unwrap_err();
        assert!(matches!(err, ThoughtError::UnknownSubjectKind(_)));
    }

    #[test]
    fn test_type_without_reference() {
        let store = store();
        let resolver = SubjectResolver::new(&store);

        let err = resolver
            .resolve(SubjectParams {
                subject_type: Some("Project"),
                ..SubjectParams::default()
            })
            .unwrap_err();
        assert!(matches!(
            err,
            ThoughtError::Validation(ValidationError::MissingSubjectReference(_))
        ));
    }

    #[test]
    fn test_reference_without_type() {
        let store = store();
        let resolver = SubjectResolver::new(&store);

        let err = resolver
            .resolve(SubjectParams {
                subject_name: Some("Hands Down"),
                ..SubjectParams::default()
            })
            .unwrap_err();
        assert!(matches!(
            err,
            ThoughtError::Validation(ValidationError::MissingSubjectType)
        ));
    }
}
