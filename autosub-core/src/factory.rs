// Substitute creation per creation mode

use crate::descriptor::{DependencyKind, TypeDescriptor};
use crate::logging::trace;
use crate::messages;
use crate::registry::{SubstituteEntry, SubstituteMode};
use crate::{Error, Result};
use autosub_mock::CallRecorder;

/// Full substitute answering every unconfigured member with a default value
pub(crate) fn full(descriptor: &TypeDescriptor) -> Result<SubstituteEntry> {
    let tag = descriptor.tag();
    let calls = CallRecorder::new(tag.name());

    let instance = descriptor
        .create_substitute(calls.clone())
        .ok_or_else(|| Error::CannotSubstitute { type_name: tag.name() })?;

    trace!(substitute = %tag, "Created full substitute");
    Ok(SubstituteEntry::new(instance, SubstituteMode::For, Some(calls)))
}

/// Partial substitute falling through to the real implementation
pub(crate) fn partial(descriptor: &TypeDescriptor) -> Result<SubstituteEntry> {
    let tag = descriptor.tag();
    let calls = CallRecorder::new(tag.name());

    let instance = descriptor
        .create_partial(calls.clone())
        .ok_or_else(|| Error::PartialSubstituteUnsupported { type_name: tag.name() })?;

    trace!(substitute = %tag, "Created partial substitute");
    Ok(SubstituteEntry::new(instance, SubstituteMode::ForPartsOf, Some(calls)))
}

/// Full substitute whose every declared member raises
/// [`Error::MemberNotConfigured`] until it is stubbed.
///
/// The error is raised as a panic payload, since trait members cannot
/// return it. Only interfaces are supported.
pub(crate) fn throwing(descriptor: &TypeDescriptor) -> Result<SubstituteEntry> {
    let tag = descriptor.tag();
    if descriptor.kind() != DependencyKind::Interface {
        return Err(Error::OnlyInterfacesSupported { type_name: tag.name() });
    }

    let entry = full(descriptor)?;
    let Some(calls) = entry.calls.as_ref() else {
        return Err(Error::CannotSubstitute { type_name: tag.name() });
    };

    let type_name = tag.name();
    for member in descriptor.members() {
        for spec in member.accessors() {
            let error = Error::MemberNotConfigured {
                type_name: type_name.clone(),
                member: member.name().to_string(),
                kind: spec.kind(),
                message: messages::member_not_configured(&type_name, spec.kind(), member.name()),
            };
            calls.throws(spec, move || std::panic::panic_any(error.clone()));
        }
    }

    trace!(substitute = %tag, "Created exception-throwing substitute");
    Ok(entry)
}
