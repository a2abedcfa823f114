// Constructor selection and parameter resolution

use crate::behaviour::SubstituteBehaviour;
use crate::constructor::{Accessibility, Arguments, Constructible, Constructor, Parameter};
use crate::descriptor::{DependencyKind, Instance, TypeDescriptor, TypeKey, TypeTag};
use crate::diagnostics::DiagnosticsHandler;
use crate::factory;
use crate::messages::{self, FailureKind};
use crate::registry::{SubstituteEntry, SubstituteMode, TypeRegistry};
use crate::{Error, Result};
use std::sync::Arc;

/// Builds a system under test from the registry, filling the gaps
/// according to the active behaviour.
pub(crate) struct ConstructorResolver<'a> {
    registry: &'a TypeRegistry,
    diagnostics: &'a DiagnosticsHandler,
    behaviour: SubstituteBehaviour,
    accessibility: Accessibility,
}

impl<'a> ConstructorResolver<'a> {
    pub(crate) fn new(
        registry: &'a TypeRegistry,
        diagnostics: &'a DiagnosticsHandler,
        behaviour: SubstituteBehaviour,
        accessibility: Accessibility,
    ) -> Self {
        Self {
            registry,
            diagnostics,
            behaviour,
            accessibility,
        }
    }

    pub(crate) fn create<T: Constructible>(&self) -> Result<T> {
        let target = TypeTag::of::<T>();

        let mut candidates: Vec<Constructor<T>> = T::constructors()
            .into_iter()
            .filter(|constructor| self.accessibility.permits(constructor.visibility()))
            .collect();
        candidates.sort_by(|a, b| b.arity().cmp(&a.arity()));

        self.diagnostics
            .add(target, format!("Found '{}' potential constructors", candidates.len()));

        let built = if self.behaviour.is_automatic() {
            self.first_resolvable(target, &candidates)
        } else {
            match self.first_viable(target, &candidates) {
                Some(instance) => Some(instance),
                None => self.greediest(target, &candidates)?,
            }
        };

        built.ok_or_else(|| Error::NoSuitableConstructor {
            type_name: target.name(),
            message: messages::message(
                self.behaviour,
                FailureKind::NoSuitableConstructor,
                &target.name(),
            ),
        })
    }

    fn first_resolvable<T>(&self, target: TypeTag, candidates: &[Constructor<T>]) -> Option<T> {
        candidates
            .iter()
            .find_map(|constructor| self.try_construct(target, constructor))
    }

    fn first_viable<T>(&self, target: TypeTag, candidates: &[Constructor<T>]) -> Option<T> {
        candidates
            .iter()
            .filter(|constructor| self.is_viable(constructor))
            .find_map(|constructor| self.try_construct(target, constructor))
    }

    fn greediest<T>(&self, target: TypeTag, candidates: &[Constructor<T>]) -> Result<Option<T>> {
        let Some(constructor) = candidates.first() else {
            return Ok(None);
        };

        self.diagnostics.add(
            target,
            format!(
                "Falling back to largest constructor as using '{}' behaviour. Parameters: {}",
                self.behaviour,
                constructor.describe()
            ),
        );

        match self.construct(target, constructor) {
            Ok(instance) => {
                self.diagnostics.add(target, "Found best constructor!");
                Ok(Some(instance))
            }
            Err(error @ Error::OnlyInterfacesSupported { .. }) => Err(error),
            Err(error) => {
                self.diagnostics.add(target, format!("Unsuitable constructor: {}", error));
                Ok(None)
            }
        }
    }

    fn try_construct<T>(&self, target: TypeTag, constructor: &Constructor<T>) -> Option<T> {
        match self.construct(target, constructor) {
            Ok(instance) => {
                self.diagnostics.add(target, "Found best constructor!");
                Some(instance)
            }
            Err(error) => {
                self.diagnostics.add(target, format!("Unsuitable constructor: {}", error));
                None
            }
        }
    }

    /// Every parameter can be satisfied from the registry alone.
    ///
    /// A collection counts when either the collection or a single
    /// instance of its element is registered.
    fn is_viable<T>(&self, constructor: &Constructor<T>) -> bool {
        constructor.parameters().iter().all(|parameter| {
            let key = parameter.key();
            self.registry.contains(&key)
                || (key.is_collection() && self.registry.contains(&TypeKey::Single(key.element())))
        })
    }

    fn construct<T>(&self, target: TypeTag, constructor: &Constructor<T>) -> Result<T> {
        self.diagnostics.add(
            target,
            format!(
                "Checking constructor using '{}' behaviour. Parameters: {}",
                self.behaviour,
                constructor.describe()
            ),
        );

        let values = constructor
            .parameters()
            .iter()
            .map(|parameter| self.resolve_parameter(target, parameter))
            .collect::<Result<Vec<_>>>()?;

        constructor.invoke(&Arguments::new(target.full_name(), values))
    }

    /// Per-parameter decisions are recorded against `target`, registry
    /// hits and creations against the dependency itself.
    fn resolve_parameter(
        &self,
        target: TypeTag,
        parameter: &Parameter,
    ) -> Result<Option<Instance>> {
        let key = parameter.key();
        self.diagnostics
            .add(target, format!("Checking substitute for '{}' type", key));

        if let Some(entry) = self.registry.try_get(&key) {
            self.diagnostics
                .add(key.element(), "Existing substitute found. Will use this!");
            return Ok(Some(entry.instance.clone()));
        }

        if key.is_collection() {
            self.resolve_collection(target, parameter)
        } else {
            self.resolve_single(target, parameter)
        }
    }

    fn resolve_collection(
        &self,
        target: TypeTag,
        parameter: &Parameter,
    ) -> Result<Option<Instance>> {
        let descriptor = parameter.descriptor();
        let tag = descriptor.tag();

        if let Some(entry) = self.registry.try_get(&TypeKey::Single(tag)) {
            self.diagnostics.add(
                target,
                "Found single instance for collection substitute type. Will use this!",
            );
            return collect_one(descriptor, &entry).map(Some);
        }

        match self.behaviour {
            SubstituteBehaviour::Automatic | SubstituteBehaviour::LooseParts => {
                self.diagnostics.add(
                    target,
                    format!("No '{}' instances registered. Will use an empty collection", tag),
                );
                Ok(Some(descriptor.empty_collection()))
            }
            SubstituteBehaviour::ManualWithNulls => {
                self.diagnostics.add(
                    target,
                    format!("No '{}' instances registered. Will use a null collection", tag),
                );
                Ok(None)
            }
            SubstituteBehaviour::ManualWithExceptions => {
                self.diagnostics.add(
                    target,
                    format!(
                        "No '{}' instances registered. Will use a throwing substitute collection",
                        tag
                    ),
                );
                let entry = self.throwing_substitute(descriptor)?;
                collect_one(descriptor, &entry).map(Some)
            }
        }
    }

    fn resolve_single(&self, target: TypeTag, parameter: &Parameter) -> Result<Option<Instance>> {
        let descriptor = parameter.descriptor();
        let key = parameter.key();
        let tag = descriptor.tag();

        let entry = match self.behaviour {
            SubstituteBehaviour::Automatic => match descriptor.kind() {
                DependencyKind::Class => self
                    .registry
                    .get_or_create(key, SubstituteMode::ForPartsOf, false, || {
                        factory::partial(descriptor)
                    })?,
                _ => self
                    .registry
                    .get_or_create(key, SubstituteMode::For, false, || factory::full(descriptor))?,
            },
            SubstituteBehaviour::LooseParts => {
                match self
                    .registry
                    .get_or_create(key, SubstituteMode::ForPartsOf, false, || {
                        factory::partial(descriptor)
                    }) {
                    Err(Error::PartialSubstituteUnsupported { .. }) => {
                        self.registry
                            .get_or_create(key, SubstituteMode::For, false, || {
                                factory::full(descriptor)
                            })?
                    }
                    other => other?,
                }
            }
            SubstituteBehaviour::ManualWithNulls => {
                self.diagnostics
                    .add(target, format!("No '{}' substitute registered. Will use null", tag));
                return Ok(None);
            }
            SubstituteBehaviour::ManualWithExceptions => {
                self.diagnostics.add(
                    target,
                    format!("No '{}' substitute registered. Will use a throwing substitute", tag),
                );
                self.throwing_substitute(descriptor)?
            }
        };

        self.diagnostics.add(
            tag,
            format!("Created '{:?}' substitute. Stored for later use", entry.mode),
        );
        Ok(Some(entry.instance.clone()))
    }

    fn throwing_substitute(&self, descriptor: &TypeDescriptor) -> Result<Arc<SubstituteEntry>> {
        self.registry.get_or_create(
            TypeKey::Single(descriptor.tag()),
            SubstituteMode::For,
            false,
            || factory::throwing(descriptor),
        )
    }
}

fn collect_one(descriptor: &TypeDescriptor, entry: &SubstituteEntry) -> Result<Instance> {
    descriptor
        .collect(std::slice::from_ref(&entry.instance))
        .ok_or_else(|| Error::ArgumentMismatch {
            target: descriptor.tag().name(),
            index: 0,
            expected: format!("[{}]", descriptor.tag().name()),
        })
}
