//! Type identity and dependency descriptors.
//!
//! The resolver never sees concrete dependency types. Everything it needs
//! to know about a dependency (its identity, whether it is an interface or
//! a class, and how to build substitutes and collections of it) is captured
//! once, at the point where the type is still known, in a [`TypeDescriptor`]
//! made of monomorphized `fn` pointers.

use autosub_mock::{CallRecorder, Member};
use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A type-erased dependency.
///
/// Single dependencies are stored as `Arc<D>` and collections as
/// `Vec<Arc<D>>`, so cloning an instance never clones the dependency itself.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Identity of a dependency type, usually a `dyn Trait`.
#[derive(Clone, Copy)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name
    pub fn full_name(&self) -> &'static str {
        self.name
    }

    /// Type name without module paths or a leading `dyn`
    pub fn name(&self) -> String {
        short_type_name(self.name)
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeTag({})", self.name)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Strip module paths from every path segment of a type name.
///
/// `dyn my_app::deps::TextGenerator` becomes `TextGenerator` and
/// `alloc::vec::Vec<alloc::string::String>` becomes `Vec<String>`.
pub fn short_type_name(full: &str) -> String {
    fn last_segment(path: &str) -> &str {
        path.rsplit("::").next().unwrap_or(path)
    }

    let mut short = String::with_capacity(full.len());
    let mut path = String::new();

    for ch in full.chars() {
        if ch.is_alphanumeric() || ch == '_' || ch == ':' {
            path.push(ch);
        } else {
            short.push_str(last_segment(&path));
            path.clear();
            short.push(ch);
        }
    }
    short.push_str(last_segment(&path));

    match short.strip_prefix("dyn ") {
        Some(rest) => rest.to_string(),
        None => short,
    }
}

/// Container shape a collection parameter is declared with.
///
/// Every shape holds the same element type, so lookups fall back to the
/// normalized [`CollectionShape::Enumerable`] key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionShape {
    /// Normalized "any sequence of" shape, used by `use_collection`
    Enumerable,
    Vec,
    BoxedSlice,
    VecDeque,
    ReadOnly,
}

/// Registry key: a single dependency or a collection of one.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKey {
    Single(TypeTag),
    Collection {
        element: TypeTag,
        shape: CollectionShape,
    },
}

impl TypeKey {
    pub fn of<D: ?Sized + 'static>() -> Self {
        TypeKey::Single(TypeTag::of::<D>())
    }

    pub fn collection_of<D: ?Sized + 'static>(shape: CollectionShape) -> Self {
        TypeKey::Collection {
            element: TypeTag::of::<D>(),
            shape,
        }
    }

    pub fn enumerable_of<D: ?Sized + 'static>() -> Self {
        Self::collection_of::<D>(CollectionShape::Enumerable)
    }

    /// The dependency type itself, or the element type of a collection
    pub fn element(&self) -> TypeTag {
        match *self {
            TypeKey::Single(tag) => tag,
            TypeKey::Collection { element, .. } => element,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, TypeKey::Collection { .. })
    }

    /// The `Enumerable` key to retry with when an exact collection lookup misses
    pub fn normalized(&self) -> Option<TypeKey> {
        match *self {
            TypeKey::Collection { element, shape } if shape != CollectionShape::Enumerable => {
                Some(TypeKey::Collection {
                    element,
                    shape: CollectionShape::Enumerable,
                })
            }
            _ => None,
        }
    }

    pub fn name(&self) -> String {
        match *self {
            TypeKey::Single(tag) => tag.name(),
            TypeKey::Collection { element, shape } => {
                let element = element.name();
                match shape {
                    CollectionShape::Enumerable => format!("[{}]", element),
                    CollectionShape::Vec => format!("Vec<{}>", element),
                    CollectionShape::BoxedSlice => format!("Box<[{}]>", element),
                    CollectionShape::VecDeque => format!("VecDeque<{}>", element),
                    CollectionShape::ReadOnly => format!("Arc<[{}]>", element),
                }
            }
        }
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.name())
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// How the container may stand in for a dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyKind {
    /// No real implementation behind it; full substitutes only
    Interface,
    /// Has a real implementation that partial substitutes fall through to
    Class,
    /// Cannot be substituted; must be supplied with `use_instance`
    Opaque,
}

/// A dependency type the container knows how to substitute.
///
/// Usually implemented for a trait object, with a hand-written substitute
/// struct forwarding every member to its [`CallRecorder`]:
///
/// ```
/// use autosub_core::{CallRecorder, Member, Substitutable};
/// use std::sync::Arc;
///
/// pub trait Clock: Send + Sync {
///     fn now(&self) -> u64;
/// }
///
/// struct ClockSubstitute {
///     calls: CallRecorder,
/// }
///
/// impl Clock for ClockSubstitute {
///     fn now(&self) -> u64 {
///         self.calls.invoke("now", vec![])
///     }
/// }
///
/// impl Substitutable for dyn Clock {
///     fn substitute(calls: CallRecorder) -> Arc<Self> {
///         Arc::new(ClockSubstitute { calls })
///     }
///
///     fn members() -> Vec<Member> {
///         vec![Member::method("now")]
///     }
/// }
/// ```
pub trait Substitutable: Send + Sync + 'static {
    fn kind() -> DependencyKind {
        DependencyKind::Interface
    }

    /// Build a full substitute recording into `calls`
    fn substitute(calls: CallRecorder) -> Arc<Self>;

    /// Build a partial substitute that falls through to the real
    /// implementation for members that are not stubbed
    fn partial(calls: CallRecorder) -> Option<Arc<Self>> {
        let _ = calls;
        None
    }

    /// Public members, used to synthesize exception-throwing substitutes
    fn members() -> Vec<Member> {
        Vec::new()
    }
}

type SubstituteFn = fn(CallRecorder) -> Instance;
type PartialFn = fn(CallRecorder) -> Option<Instance>;
type MembersFn = fn() -> Vec<Member>;
type CollectFn = fn(&[Instance]) -> Option<Instance>;
type EmptyFn = fn() -> Instance;

/// Everything the resolver needs to know about a dependency type.
#[derive(Clone, Copy)]
pub struct TypeDescriptor {
    tag: TypeTag,
    kind: DependencyKind,
    substitute: Option<SubstituteFn>,
    partial: Option<PartialFn>,
    members: MembersFn,
    collect: CollectFn,
    empty: EmptyFn,
}

impl TypeDescriptor {
    pub fn substitutable<D: ?Sized + Substitutable>() -> Self {
        Self {
            tag: TypeTag::of::<D>(),
            kind: D::kind(),
            substitute: Some(erase_substitute::<D>),
            partial: Some(erase_partial::<D>),
            members: D::members,
            collect: collect_instances::<D>,
            empty: empty_collection::<D>,
        }
    }

    /// A dependency that can only be supplied, never synthesized
    pub fn opaque<T: ?Sized + Send + Sync + 'static>() -> Self {
        Self {
            tag: TypeTag::of::<T>(),
            kind: DependencyKind::Opaque,
            substitute: None,
            partial: None,
            members: Vec::new,
            collect: collect_instances::<T>,
            empty: empty_collection::<T>,
        }
    }

    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    pub fn kind(&self) -> DependencyKind {
        self.kind
    }

    pub fn members(&self) -> Vec<Member> {
        (self.members)()
    }

    pub fn create_substitute(&self, calls: CallRecorder) -> Option<Instance> {
        self.substitute.map(|substitute| substitute(calls))
    }

    pub fn create_partial(&self, calls: CallRecorder) -> Option<Instance> {
        self.partial.and_then(|partial| partial(calls))
    }

    /// Gather single instances of this type into an erased `Vec<Arc<D>>`
    pub fn collect(&self, items: &[Instance]) -> Option<Instance> {
        (self.collect)(items)
    }

    pub fn empty_collection(&self) -> Instance {
        (self.empty)()
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("tag", &self.tag)
            .field("kind", &self.kind)
            .finish()
    }
}

fn erase_substitute<D: ?Sized + Substitutable>(calls: CallRecorder) -> Instance {
    Arc::new(D::substitute(calls))
}

fn erase_partial<D: ?Sized + Substitutable>(calls: CallRecorder) -> Option<Instance> {
    D::partial(calls).map(|partial| Arc::new(partial) as Instance)
}

fn collect_instances<D: ?Sized + Send + Sync + 'static>(items: &[Instance]) -> Option<Instance> {
    let typed = items
        .iter()
        .map(|item| item.downcast_ref::<Arc<D>>().cloned())
        .collect::<Option<Vec<Arc<D>>>>()?;
    Some(Arc::new(typed))
}

fn empty_collection<D: ?Sized + Send + Sync + 'static>() -> Instance {
    Arc::new(Vec::<Arc<D>>::new())
}
