// Auto-substituting dependency container

use crate::behaviour::SubstituteBehaviour;
use crate::config::AutoSubstituteConfig;
use crate::constructor::Constructible;
use crate::descriptor::{Instance, Substitutable, TypeDescriptor, TypeKey, TypeTag, short_type_name};
use crate::diagnostics::DiagnosticsHandler;
use crate::factory;
use crate::logging::debug;
use crate::registry::{SubstituteMode, TypeRegistry};
use crate::resolver::ConstructorResolver;
use crate::substitute::Substitute;
use crate::{Error, Result};
use std::any::type_name;
use std::sync::Arc;

/// Builds systems under test, substituting every dependency the test did
/// not supply.
///
/// ```
/// use autosub_core::{AutoSubstitute, SubstituteBehaviour};
///
/// let auto = AutoSubstitute::with_behaviour(SubstituteBehaviour::ManualWithNulls);
/// assert_eq!(auto.behaviour(), SubstituteBehaviour::ManualWithNulls);
/// assert!(auto.registry().is_empty());
/// ```
///
/// Clones share the registry and diagnostics.
#[derive(Clone)]
pub struct AutoSubstitute {
    registry: TypeRegistry,
    diagnostics: DiagnosticsHandler,
    config: AutoSubstituteConfig,
}

impl AutoSubstitute {
    pub fn new() -> Self {
        Self::with_config(AutoSubstituteConfig::default())
    }

    pub fn with_behaviour(behaviour: SubstituteBehaviour) -> Self {
        Self::with_config(AutoSubstituteConfig::default().behaviour(behaviour))
    }

    pub fn with_config(config: AutoSubstituteConfig) -> Self {
        debug!(
            behaviour = %config.behaviour,
            search_private_constructors = config.search_private_constructors,
            "Creating auto-substitute container"
        );
        Self {
            registry: TypeRegistry::new(),
            diagnostics: DiagnosticsHandler::new(),
            config,
        }
    }

    pub fn behaviour(&self) -> SubstituteBehaviour {
        self.config.behaviour
    }

    pub fn config(&self) -> &AutoSubstituteConfig {
        &self.config
    }

    pub fn diagnostics(&self) -> &DiagnosticsHandler {
        &self.diagnostics
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Full substitute for `D`, created once and reused by later requests
    /// and by `create_instance`
    pub fn substitute_for<D: ?Sized + Substitutable>(&self) -> Result<Substitute<D>> {
        self.substitute::<D>(SubstituteMode::For, false)
    }

    /// Fresh full substitute that is not tracked by the container
    pub fn substitute_for_no_cache<D: ?Sized + Substitutable>(&self) -> Result<Substitute<D>> {
        self.substitute::<D>(SubstituteMode::For, true)
    }

    /// Partial substitute for `D`, calling the real implementation for
    /// members that are not stubbed
    pub fn substitute_for_parts_of<D: ?Sized + Substitutable>(&self) -> Result<Substitute<D>> {
        self.substitute::<D>(SubstituteMode::ForPartsOf, false)
    }

    pub fn substitute_for_parts_of_no_cache<D: ?Sized + Substitutable>(
        &self,
    ) -> Result<Substitute<D>> {
        self.substitute::<D>(SubstituteMode::ForPartsOf, true)
    }

    fn substitute<D: ?Sized + Substitutable>(
        &self,
        mode: SubstituteMode,
        no_cache: bool,
    ) -> Result<Substitute<D>> {
        let tag = TypeTag::of::<D>();
        let key = TypeKey::Single(tag);
        let descriptor = TypeDescriptor::substitutable::<D>();

        if no_cache {
            self.diagnostics.add(tag, "Creating a non cached substitute");
        } else if self.registry.contains(&key) {
            self.diagnostics.add(tag, "Existing substitute found. Will use this!");
        } else {
            self.diagnostics
                .add(tag, "Substitute not found. Will create and store this for later use");
        }

        let entry = self.registry.get_or_create(key, mode, no_cache, || match mode {
            SubstituteMode::ForPartsOf => factory::partial(&descriptor),
            _ => factory::full(&descriptor),
        })?;

        Substitute::from_entry(&entry)
    }

    /// Supply the object to use for `D`, replacing anything registered
    pub fn use_instance<D: ?Sized + Send + Sync + 'static>(&self, instance: Arc<D>) -> &Self {
        let tag = TypeTag::of::<D>();
        self.diagnostics.add(tag, "Using supplied instance");
        self.registry.put(TypeKey::Single(tag), Arc::new(instance), None);
        self
    }

    /// Supply a substitute created elsewhere, keeping its recorder so it can
    /// still be verified through the container
    pub fn use_substitute<D: ?Sized + Send + Sync + 'static>(
        &self,
        substitute: &Substitute<D>,
    ) -> &Self {
        let tag = TypeTag::of::<D>();
        self.diagnostics.add(tag, "Using supplied substitute");
        self.registry.put(
            TypeKey::Single(tag),
            Arc::new(substitute.instance()),
            substitute.calls().cloned(),
        );
        self
    }

    /// Supply the items of every collection-of-`D` parameter, whatever its shape
    pub fn use_collection<D: ?Sized + Send + Sync + 'static>(&self, items: Vec<Arc<D>>) -> &Self {
        let tag = TypeTag::of::<D>();
        self.diagnostics
            .add(tag, format!("Using supplied collection of {} items", items.len()));
        let instance: Instance = Arc::new(items);
        self.registry.put_collection(tag, instance);
        self
    }

    pub fn use_substitute_collection<D: ?Sized + Send + Sync + 'static>(
        &self,
        substitutes: &[Substitute<D>],
    ) -> &Self {
        self.use_collection(substitutes.iter().map(Substitute::instance).collect())
    }

    /// Build `T` through its best constructor under the active behaviour
    pub fn create_instance<T: Constructible>(&self) -> Result<T> {
        debug!(
            target_type = %short_type_name(type_name::<T>()),
            behaviour = %self.config.behaviour,
            "Creating instance"
        );

        ConstructorResolver::new(
            &self.registry,
            &self.diagnostics,
            self.config.behaviour,
            self.config.accessibility(),
        )
        .create::<T>()
    }
}

impl Default for AutoSubstitute {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AutoSubstitute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoSubstitute")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish()
    }
}

/// Read access to what the container would inject.
pub trait ServiceProvider {
    /// The registered instance for `key`, if any. Never fails.
    fn get_service(&self, key: &TypeKey) -> Option<Instance>;

    fn get_service_of<D: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<D>>
    where
        Self: Sized,
    {
        self.get_service(&TypeKey::of::<D>())
            .and_then(|instance| instance.downcast_ref::<Arc<D>>().cloned())
    }

    fn get_required_service<D: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<D>>
    where
        Self: Sized,
    {
        self.get_service_of::<D>().ok_or_else(|| Error::ServiceNotRegistered {
            type_name: short_type_name(type_name::<D>()),
        })
    }
}

impl ServiceProvider for AutoSubstitute {
    fn get_service(&self, key: &TypeKey) -> Option<Instance> {
        self.registry.try_get(key).map(|entry| entry.instance.clone())
    }
}
