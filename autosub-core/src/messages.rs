// Failure message table keyed by behaviour and failure kind

use crate::behaviour::SubstituteBehaviour;
use autosub_mock::CallKind;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Failures whose wording depends on the active behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    NoSuitableConstructor,
    VerificationTargetNotFound,
}

const AUTOMATIC_NO_CONSTRUCTOR: &str = "Unable to find suitable constructor. Ensure there is an accessible (public) constructor whose parameter types are substitutable or registered via 'use_instance'. Alternatively, you can enable 'search_private_constructors' when 'AutoSubstitute' is created.";

const AUTOMATIC_NOT_FOUND: &str = "Could not find substituted service. This typically should not have happened but a workaround would be to utilise the 'use_instance'/'use_collection' methods to ensure there is an implementation used.";

const MANUAL_NOT_FOUND: &str = "Could not find substituted service. Substitute behaviour is a 'Manual' behaviour, so unless you have explicitly utilised the '{type}' type or utilise 'use_instance'/'use_collection', the dependency cannot be checked via this method.";

static TEMPLATES: Lazy<HashMap<(SubstituteBehaviour, FailureKind), &'static str>> = Lazy::new(|| {
    use FailureKind::*;
    use SubstituteBehaviour::*;

    HashMap::from([
        ((Automatic, NoSuitableConstructor), AUTOMATIC_NO_CONSTRUCTOR),
        ((LooseParts, NoSuitableConstructor), AUTOMATIC_NO_CONSTRUCTOR),
        (
            (ManualWithNulls, NoSuitableConstructor),
            "Unable to find suitable constructor. You are using 'Manual with Nulls' behaviour mode, a substitute must be created for the dependency before the system under test instance is created. Alternatively, use an 'Automatic' behaviour mode or enable 'search_private_constructors' when 'AutoSubstitute' is created.",
        ),
        (
            (ManualWithExceptions, NoSuitableConstructor),
            "Unable to find suitable constructor. You are using 'Manual with Exceptions' behaviour mode, which only substitutes interfaces. Concrete implementations must be supplied via 'use_instance' before the system under test instance is created. Alternatively, use an 'Automatic' behaviour mode or enable 'search_private_constructors' when 'AutoSubstitute' is created.",
        ),
        ((Automatic, VerificationTargetNotFound), AUTOMATIC_NOT_FOUND),
        ((LooseParts, VerificationTargetNotFound), AUTOMATIC_NOT_FOUND),
        ((ManualWithNulls, VerificationTargetNotFound), MANUAL_NOT_FOUND),
        ((ManualWithExceptions, VerificationTargetNotFound), MANUAL_NOT_FOUND),
    ])
});

/// Render the message for `kind` under `behaviour`
pub fn message(behaviour: SubstituteBehaviour, kind: FailureKind, type_name: &str) -> String {
    TEMPLATES
        .get(&(behaviour, kind))
        .map(|template| template.replace("{type}", type_name))
        .unwrap_or_else(|| {
            format!("{:?} for '{}' under '{}' behaviour", kind, type_name, behaviour)
        })
}

/// Message raised by exception-throwing substitutes
pub fn member_not_configured(type_name: &str, kind: CallKind, member: &str) -> String {
    format!(
        "Substitute has not been configured for '{}' when {} '{}' was invoked. When using a 'Manual' behaviour, the substitute must be created before 'create_instance' is called.",
        type_name,
        kind.describe(),
        member
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_combination_has_a_template() {
        for behaviour in SubstituteBehaviour::ALL {
            for kind in [
                FailureKind::NoSuitableConstructor,
                FailureKind::VerificationTargetNotFound,
            ] {
                assert!(TEMPLATES.contains_key(&(behaviour, kind)), "{behaviour:?} {kind:?}");
            }
        }
    }

    #[test]
    fn test_manual_messages_differ_from_automatic() {
        let automatic = message(
            SubstituteBehaviour::Automatic,
            FailureKind::NoSuitableConstructor,
            "Sut",
        );
        let nulls = message(
            SubstituteBehaviour::ManualWithNulls,
            FailureKind::NoSuitableConstructor,
            "Sut",
        );
        assert_ne!(automatic, nulls);
        assert!(nulls.contains("'Manual with Nulls'"));
    }

    #[test]
    fn test_type_placeholder_is_filled() {
        let text = message(
            SubstituteBehaviour::ManualWithExceptions,
            FailureKind::VerificationTargetNotFound,
            "TextGenerator",
        );
        assert!(text.contains("the 'TextGenerator' type"));
        assert!(!text.contains("{type}"));
    }

    #[test]
    fn test_member_not_configured() {
        assert_eq!(
            member_not_configured("NumberGenerator", CallKind::Method, "generate"),
            "Substitute has not been configured for 'NumberGenerator' when method 'generate' was invoked. When using a 'Manual' behaviour, the substitute must be created before 'create_instance' is called."
        );
        assert!(
            member_not_configured("TextGenerator", CallKind::Get, "value")
                .contains("property 'value'")
        );
    }
}
