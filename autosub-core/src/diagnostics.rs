// Per-type log of resolution decisions

use crate::descriptor::TypeTag;
use crate::logging::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Append-only record of why the container did what it did.
///
/// Messages are grouped by the type they concern and mirrored to `tracing`.
/// Clones share the same log.
#[derive(Clone, Default)]
pub struct DiagnosticsHandler {
    messages: Arc<RwLock<HashMap<TypeTag, Vec<String>>>>,
}

impl DiagnosticsHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, tag: TypeTag, message: impl Into<String>) {
        let message = message.into();
        debug!(type_name = %tag, "{}", message);
        self.messages.write().entry(tag).or_default().push(message);
    }

    /// Every message, grouped by type name
    pub fn messages(&self) -> HashMap<String, Vec<String>> {
        self.messages
            .read()
            .iter()
            .map(|(tag, messages)| (tag.name(), messages.clone()))
            .collect()
    }

    pub fn messages_for<T: ?Sized + 'static>(&self) -> Vec<String> {
        self.messages_for_tag(TypeTag::of::<T>())
    }

    pub fn messages_for_tag(&self, tag: TypeTag) -> Vec<String> {
        self.messages.read().get(&tag).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.messages.read().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for DiagnosticsHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosticsHandler").field("messages", &self.len()).finish()
    }
}
