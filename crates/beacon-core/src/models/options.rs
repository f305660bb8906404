use std::collections::BTreeMap;
use std::fmt;

/// Custom event properties. Ordered so the encoded `p` field is stable.
pub type Props = BTreeMap<String, String>;

/// Completion callback. Consumed by the dispatch that runs it.
pub type EventCallback = Box<dyn FnOnce() + Send + 'static>;

/// Optional per-event settings.
///
/// The callback is `FnOnce`: it is consumed by the dispatch that runs it and
/// can never fire twice.
#[derive(Default)]
pub struct EventOptions {
    pub props: Option<Props>,
    pub callback: Option<EventCallback>,
}

impl EventOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a single property, creating the map on first use.
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.props
            .get_or_insert_with(Props::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_props(mut self, props: Props) -> Self {
        self.props = Some(props);
        self
    }

    /// Called once the transport reports completion, whatever the outcome.
    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.callback = Some(Box::new(callback));
        self
    }

    /// Props worth sending: present and non-empty.
    pub fn sendable_props(&self) -> Option<&Props> {
        self.props.as_ref().filter(|p| !p.is_empty())
    }
}

impl fmt::Debug for EventOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventOptions")
            .field("props", &self.props)
            .field("callback", &self.callback.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
