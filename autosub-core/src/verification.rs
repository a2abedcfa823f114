// Received-call verification through the container

use crate::container::AutoSubstitute;
use crate::descriptor::{TypeKey, short_type_name};
use crate::logging::debug;
use crate::messages::{self, FailureKind};
use crate::{Error, Result};
use autosub_mock::{CallSpec, Quantity};
use std::any::type_name;

impl AutoSubstitute {
    /// Check that the tracked substitute for `D` received calls matching
    /// `call` the expected number of times.
    ///
    /// Only dependencies tracked under exactly `D` can be checked; a missing
    /// entry is [`Error::VerificationTargetNotFound`].
    pub fn received<D: ?Sized + 'static>(
        &self,
        call: impl Into<CallSpec>,
        quantity: Quantity,
    ) -> Result<&Self> {
        let spec = call.into();
        let type_name = short_type_name(type_name::<D>());

        let Some(entry) = self.registry().get_exact(&TypeKey::of::<D>()) else {
            debug!(substitute = %type_name, "No tracked substitute to verify");
            return Err(Error::VerificationTargetNotFound {
                message: messages::message(
                    self.behaviour(),
                    FailureKind::VerificationTargetNotFound,
                    &type_name,
                ),
                type_name,
            });
        };

        let calls = entry.calls.as_ref().ok_or_else(|| Error::NotASubstitute {
            type_name: type_name.clone(),
        })?;

        debug!(
            substitute = %type_name,
            spec = %spec,
            expected = %quantity,
            "Verifying received calls"
        );
        calls.assert_received(&spec, quantity)?;
        Ok(self)
    }

    pub fn received_times<D: ?Sized + 'static>(
        &self,
        call: impl Into<CallSpec>,
        times: usize,
    ) -> Result<&Self> {
        self.received::<D>(call, Quantity::exactly(times))
    }

    pub fn received_once<D: ?Sized + 'static>(&self, call: impl Into<CallSpec>) -> Result<&Self> {
        self.received::<D>(call, Quantity::once())
    }

    pub fn received_at_least_once<D: ?Sized + 'static>(
        &self,
        call: impl Into<CallSpec>,
    ) -> Result<&Self> {
        self.received::<D>(call, Quantity::at_least_once())
    }

    pub fn did_not_receive<D: ?Sized + 'static>(&self, call: impl Into<CallSpec>) -> Result<&Self> {
        self.received::<D>(call, Quantity::none())
    }
}
