// Typed handle to a tracked substitute

use crate::descriptor::short_type_name;
use crate::registry::{SubstituteEntry, SubstituteMode};
use crate::{Error, Result};
use autosub_mock::{Call, CallRecorder, CallSpec};
use std::any::{Any, type_name};
use std::ops::Deref;
use std::sync::Arc;

/// A dependency handed out by the container, together with the recorder
/// used to configure it and check what it received.
///
/// Dereferences to the dependency itself.
pub struct Substitute<D: ?Sized> {
    instance: Arc<D>,
    calls: Option<CallRecorder>,
    mode: SubstituteMode,
}

impl<D: ?Sized + Send + Sync + 'static> Substitute<D> {
    pub(crate) fn from_entry(entry: &SubstituteEntry) -> Result<Self> {
        let instance = entry.downcast::<D>().ok_or_else(|| Error::ArgumentMismatch {
            target: "Substitute".to_string(),
            index: 0,
            expected: short_type_name(type_name::<D>()),
        })?;

        Ok(Self {
            instance,
            calls: entry.calls.clone(),
            mode: entry.mode,
        })
    }

    pub fn instance(&self) -> Arc<D> {
        self.instance.clone()
    }

    /// Recorder behind the substitute; `None` for supplied objects
    pub fn calls(&self) -> Option<&CallRecorder> {
        self.calls.as_ref()
    }

    pub fn mode(&self) -> SubstituteMode {
        self.mode
    }

    pub fn is_substitute(&self) -> bool {
        self.calls.is_some()
    }

    /// Answer calls matching `spec` with `value`
    pub fn returns<R>(&self, spec: impl Into<CallSpec>, value: R) -> Result<&Self>
    where
        R: Clone + Any + Send + Sync,
    {
        self.recorder()?.returns(spec, value);
        Ok(self)
    }

    pub fn received_calls(&self) -> Vec<Call> {
        self.calls
            .as_ref()
            .map(CallRecorder::received_calls)
            .unwrap_or_default()
    }

    fn recorder(&self) -> Result<&CallRecorder> {
        self.calls.as_ref().ok_or_else(|| Error::NotASubstitute {
            type_name: short_type_name(type_name::<D>()),
        })
    }
}

impl<D: ?Sized> Deref for Substitute<D> {
    type Target = D;

    fn deref(&self) -> &D {
        &self.instance
    }
}

impl<D: ?Sized> Clone for Substitute<D> {
    fn clone(&self) -> Self {
        Self {
            instance: self.instance.clone(),
            calls: self.calls.clone(),
            mode: self.mode,
        }
    }
}

impl<D: ?Sized> std::fmt::Debug for Substitute<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Substitute")
            .field("type", &short_type_name(type_name::<D>()))
            .field("mode", &self.mode)
            .finish()
    }
}
