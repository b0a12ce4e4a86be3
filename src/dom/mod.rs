//! DOM capability traits the renderer drives.
//!
//! The renderer never creates or mutates elements itself. Every element operation goes
//! through a [`Dom`] implementation, so the same reconciliation logic can target a browser
//! binding, a headless tree, or a test double.

use crate::foundation::core::Point;
use crate::foundation::error::SprigResult;

pub mod memory;

/// Element-level operations on a document the renderer draws into.
pub trait Dom {
    /// Handle to an element. Handles are cheap to clone and refer to the same element.
    type Node: Clone + std::fmt::Debug;

    /// Resolve an element by its `id` attribute.
    ///
    /// Implementations report a missing element as an error; the renderer returns it to the
    /// caller unchanged.
    fn element_by_id(&self, id: &str) -> SprigResult<Self::Node>;

    /// Create a detached element with the given tag name.
    fn create_element(&mut self, tag: &str) -> Self::Node;

    /// Set (or overwrite) an attribute.
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    /// Remove an attribute; removing an absent attribute is a no-op.
    fn remove_attribute(&mut self, node: &Self::Node, name: &str);

    /// Read an attribute value.
    fn get_attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Replace the element's text content.
    fn set_text_content(&mut self, node: &Self::Node, text: &str);

    /// Append `child` as the last child of `parent`, moving it if already attached.
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node);

    /// Insert `child` into `parent` right before `before`, moving it if already attached.
    fn insert_before(&mut self, parent: &Self::Node, child: &Self::Node, before: &Self::Node);

    /// Detach the element from its parent.
    fn remove(&mut self, node: &Self::Node);

    /// Parent element, if attached.
    fn parent_node(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Media playback capability of a `video`/`audio` element.
    fn media_mut(&mut self, node: &Self::Node) -> Option<&mut dyn MediaElement>;
}

/// Playback controls of a media element.
pub trait MediaElement {
    /// Start or resume playback.
    fn play(&mut self);
    /// Pause playback.
    fn pause(&mut self);
    /// Current volume.
    fn volume(&self) -> f64;
    /// Overwrite the volume.
    fn set_volume(&mut self, volume: f64);
}

/// A DOM input event as seen by [`Renderer::handle_event`](crate::Renderer::handle_event).
pub trait DomEvent<N> {
    /// Event type name, e.g. `"click"` or `"pointermove"`.
    fn event_type(&self) -> &str;
    /// Element the event was dispatched to.
    fn target(&self) -> &N;
    /// Suppress the host's default action for this event.
    fn prevent_default(&mut self);
    /// Pointer position in client coordinates, for pointer events.
    fn client_position(&self) -> Option<Point> {
        None
    }
}
