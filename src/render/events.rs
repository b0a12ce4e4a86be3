use std::fmt;

use crate::foundation::core::{NodeId, Point};

/// Event channels a [`Renderer`](crate::Renderer) publishes on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RendererEventKind {
    /// A `render` call finished processing its frame.
    CanRender,
    /// An input event was handled.
    UserEvent,
}

/// Payload delivered to subscribers.
#[derive(Clone, Debug, PartialEq)]
pub enum RendererEvent {
    /// A frame has been fully applied. `frame` counts completed `render` calls, from 1.
    CanRender {
        /// Completed frame count.
        frame: u64,
    },
    /// An input event translated to scene terms.
    UserEvent(UserEvent),
}

impl RendererEvent {
    /// Channel this event is delivered on.
    pub fn kind(&self) -> RendererEventKind {
        match self {
            Self::CanRender { .. } => RendererEventKind::CanRender,
            Self::UserEvent(_) => RendererEventKind::UserEvent,
        }
    }
}

/// Input event resolved against the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct UserEvent {
    /// DOM event type, e.g. `"click"`.
    pub event_type: String,
    /// Nearest scene node enclosing the event target, if any.
    pub target: Option<NodeId>,
    /// Client-space pointer position, for pointer events.
    pub position: Option<Point>,
}

/// Subscription handle returned by [`Emitter::on`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Handler = Box<dyn FnMut(&RendererEvent)>;

/// Synchronous, instance-scoped publish/subscribe.
///
/// Handlers run in subscription order, on the caller's stack, before `emit` returns.
#[derive(Default)]
pub struct Emitter {
    next_id: u64,
    listeners: Vec<(ListenerId, RendererEventKind, Handler)>,
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("next_id", &self.next_id)
            .field("listeners_len", &self.listeners.len())
            .finish()
    }
}

impl Emitter {
    /// Create an emitter with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `handler` to events of `kind`.
    pub fn on(
        &mut self,
        kind: RendererEventKind,
        handler: impl FnMut(&RendererEvent) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, kind, Box::new(handler)));
        id
    }

    /// Remove a subscription. Returns `false` when `id` was not subscribed.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Number of subscribers for `kind`.
    pub fn listener_count(&self, kind: RendererEventKind) -> usize {
        self.listeners.iter().filter(|(_, k, _)| *k == kind).count()
    }

    /// Deliver `event` to every subscriber of its kind.
    pub fn emit(&mut self, event: &RendererEvent) {
        let kind = event.kind();
        for (_, k, handler) in &mut self.listeners {
            if *k == kind {
                handler(event);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/events.rs"]
mod tests;
