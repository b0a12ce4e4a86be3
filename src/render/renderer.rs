use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::time::Instant;

use crate::audio::sync::sync_media;
use crate::dom::{Dom, DomEvent, MediaElement};
use crate::effects::filter::{Filter, filter_signature};
use crate::foundation::core::NodeId;
use crate::foundation::error::SprigResult;
use crate::render::attrs::apply_attributes;
use crate::render::events::{
    Emitter, ListenerId, RendererEvent, RendererEventKind, UserEvent,
};
use crate::render::frame_log::FrameLog;
use crate::render::node::DrawnNode;
use crate::render::opts::RendererOpts;
use crate::render::surface::Svg;
use crate::scene::message::{DrawMessage, NodeKind};

/// Attribute tying an element back to the scene node it draws.
pub const NODE_ID_ATTR: &str = "data-node-id";

/// Zero-argument clock returning milliseconds; must not go backwards.
pub type TimeSource = Box<dyn FnMut() -> f64>;

/// Where to build the drawing surface.
#[derive(Clone, Debug)]
pub enum SurfaceTarget<N> {
    /// An element handle.
    Node(N),
    /// The `id` of an element, resolved through [`Dom::element_by_id`].
    Id(String),
}

impl<N> From<&str> for SurfaceTarget<N> {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

impl<N> From<String> for SurfaceTarget<N> {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

/// Reconciles per-frame draw instructions onto a persistent SVG document.
///
/// Typical driving loop:
///
/// ```rust,ignore
/// let mut renderer = Renderer::new(dom, "stage".into(), 640.0, 480.0, opts)?;
/// renderer.on(RendererEventKind::CanRender, |_| schedule_next_frame());
/// // per frame, from the scene graph:
/// renderer.render(&messages);
/// // per DOM input event:
/// renderer.handle_event(&mut event);
/// ```
pub struct Renderer<D: Dom> {
    surface: Svg<D>,
    nodes: HashMap<NodeId, DrawnNode<D::Node>>,
    allow_event_defaults: bool,
    frame_log: FrameLog,
    clock: TimeSource,
    emitter: Emitter,
    frames_rendered: u64,
}

impl<D: Dom> fmt::Debug for Renderer<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("surface", &self.surface)
            .field("nodes_len", &self.nodes.len())
            .field("allow_event_defaults", &self.allow_event_defaults)
            .field("frame_log", &self.frame_log)
            .field("emitter", &self.emitter)
            .field("frames_rendered", &self.frames_rendered)
            .finish()
    }
}

impl<D: Dom> Renderer<D> {
    /// Build a renderer drawing into `target`.
    ///
    /// An [`SurfaceTarget::Id`] is resolved first and the surface is built inside the
    /// resolved element. A failed lookup returns the document's error unchanged.
    pub fn new(
        dom: D,
        target: SurfaceTarget<D::Node>,
        width: f64,
        height: f64,
        opts: RendererOpts,
    ) -> SprigResult<Self> {
        let container = match target {
            SurfaceTarget::Node(node) => node,
            SurfaceTarget::Id(id) => dom.element_by_id(&id)?,
        };
        let surface = Svg::new(dom, container, width, height);

        Ok(Self {
            surface,
            nodes: HashMap::new(),
            allow_event_defaults: opts.allow_event_defaults,
            frame_log: FrameLog::new(opts.fps_log),
            clock: default_clock(),
            emitter: Emitter::new(),
            frames_rendered: 0,
        })
    }

    /// The drawing surface.
    pub fn surface(&self) -> &Svg<D> {
        &self.surface
    }

    /// Mutable access to the drawing surface.
    pub fn surface_mut(&mut self) -> &mut Svg<D> {
        &mut self.surface
    }

    /// Whether host default actions are allowed for handled events.
    pub fn allow_event_defaults(&self) -> bool {
        self.allow_event_defaults
    }

    /// Change the default-action policy for subsequently handled events.
    pub fn set_allow_event_defaults(&mut self, allow: bool) {
        self.allow_event_defaults = allow;
    }

    /// Frame times collected since the last fps report. Always empty when fps logging is off.
    pub fn frame_times(&self) -> &VecDeque<f64> {
        self.frame_log.times()
    }

    /// Most recently reported frame rate.
    pub fn last_fps(&self) -> Option<f64> {
        self.frame_log.last_fps()
    }

    /// Replace the clock used for frame timing.
    pub fn set_time_source(&mut self, clock: impl FnMut() -> f64 + 'static) {
        self.clock = Box::new(clock);
    }

    /// Subscribe to renderer events.
    pub fn on(
        &mut self,
        kind: RendererEventKind,
        handler: impl FnMut(&RendererEvent) + 'static,
    ) -> ListenerId {
        self.emitter.on(kind, handler)
    }

    /// Unsubscribe. Returns `false` when `id` was not subscribed.
    pub fn off(&mut self, id: ListenerId) -> bool {
        self.emitter.off(id)
    }

    /// State of a drawn node.
    pub fn node(&self, id: NodeId) -> Option<&DrawnNode<D::Node>> {
        self.nodes.get(&id)
    }

    /// Number of nodes currently drawn.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of completed `render` calls.
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Apply one frame of draw instructions, in order, then emit
    /// [`RendererEvent::CanRender`] exactly once.
    #[tracing::instrument(skip_all, fields(messages = messages.len()))]
    pub fn render(&mut self, messages: &[DrawMessage]) {
        for msg in messages {
            self.draw(msg);
        }

        self.frames_rendered += 1;
        self.emitter.emit(&RendererEvent::CanRender {
            frame: self.frames_rendered,
        });

        if self.frame_log.is_enabled() {
            let now = (self.clock)();
            self.frame_log.record(now);
        }
    }

    /// Apply `filters` to `node`.
    ///
    /// The node's signature is always refreshed; the surface is only touched when the
    /// signature differs from the previous one.
    pub fn apply_filters(&mut self, node: &mut DrawnNode<D::Node>, filters: &[Filter]) {
        apply_filters_to(&mut self.surface, node, filters);
    }

    /// Sync a media element to the `playing` / `volume` attributes of `message`.
    pub fn draw_audio(&self, element: &mut dyn MediaElement, message: &DrawMessage) {
        sync_media(element, &message.attributes);
    }

    /// Handle a DOM input event.
    ///
    /// Unless event defaults are allowed, the event's default action is suppressed. The event
    /// is then published as [`RendererEvent::UserEvent`], resolved to the nearest scene node.
    pub fn handle_event(&mut self, event: &mut dyn DomEvent<D::Node>) {
        if !self.allow_event_defaults {
            event.prevent_default();
        }

        let user = UserEvent {
            event_type: event.event_type().to_string(),
            target: self.scene_node_for(event.target()),
            position: event.client_position(),
        };
        tracing::trace!(event_type = %user.event_type, target = ?user.target, "user event");
        self.emitter.emit(&RendererEvent::UserEvent(user));
    }

    fn scene_node_for(&self, element: &D::Node) -> Option<NodeId> {
        let dom = self.surface.dom();
        let mut cur = Some(element.clone());
        while let Some(el) = cur {
            if let Some(raw) = dom.get_attribute(&el, NODE_ID_ATTR)
                && let Ok(id) = raw.parse::<u64>()
            {
                let id = NodeId(id);
                return self.nodes.contains_key(&id).then_some(id);
            }
            cur = dom.parent_node(&el);
        }
        None
    }

    fn draw(&mut self, msg: &DrawMessage) {
        if msg.detach {
            self.detach(msg.id);
            return;
        }

        if let Some(existing) = self.nodes.get(&msg.id)
            && existing.kind != msg.kind
        {
            tracing::debug!(node = %msg.id, from = ?existing.kind, to = ?msg.kind, "node kind changed");
            self.detach(msg.id);
        }

        let created = !self.nodes.contains_key(&msg.id);
        if created {
            self.create(msg.id, msg.kind);
        }
        self.place(msg, created);

        let Some(node) = self.nodes.get_mut(&msg.id) else {
            return;
        };
        apply_attributes(self.surface.dom_mut(), node, &msg.attributes);

        if let Some(filters) = &msg.attributes.filters {
            apply_filters_to(&mut self.surface, node, filters);
        }

        if node.kind.is_media()
            && let Some(media) = self.surface.dom_mut().media_mut(&node.element)
        {
            sync_media(media, &msg.attributes);
        }
    }

    fn create(&mut self, id: NodeId, kind: NodeKind) {
        let dom = self.surface.dom_mut();
        let element = dom.create_element(kind.tag());
        dom.set_attribute(&element, NODE_ID_ATTR, &id.to_string());
        tracing::debug!(node = %id, ?kind, "created element");
        self.nodes.insert(id, DrawnNode::new(id, kind, element));
    }

    // Attach new nodes, and move existing ones whose parent or next sibling changed.
    //
    // The recorded placement is what was actually resolved: a fallback to the root records no
    // parent, so the node is moved again once the named parent exists.
    fn place(&mut self, msg: &DrawMessage, created: bool) {
        let Some(node) = self.nodes.get(&msg.id) else {
            return;
        };
        let unchanged = node.parent == msg.parent && node.next == msg.next;
        if !node.kind.is_attached() {
            self.record_placement(msg.id, msg.parent, msg.next);
            return;
        }
        if !created && unchanged {
            return;
        }
        let element = node.element.clone();

        let (parent, parent_el) = match msg.parent {
            Some(pid) => match self.nodes.get(&pid) {
                Some(p) if pid != msg.id && p.kind.is_attached() => (Some(pid), p.element.clone()),
                _ => {
                    tracing::warn!(node = %msg.id, parent = %pid, "unknown parent; attaching to root");
                    (None, self.surface.root().clone())
                }
            },
            None => (None, self.surface.root().clone()),
        };

        let (next, before) = match msg.next.and_then(|nid| {
            self.nodes
                .get(&nid)
                .filter(|n| nid != msg.id && n.parent == parent && n.kind.is_attached())
                .map(|n| (nid, n.element.clone()))
        }) {
            Some((nid, el)) => (Some(nid), Some(el)),
            None => (None, None),
        };
        if let Some(nid) = msg.next
            && next.is_none()
        {
            tracing::warn!(node = %msg.id, next = %nid, "unknown next sibling; appending");
        }

        let dom = self.surface.dom_mut();
        match before {
            Some(b) => dom.insert_before(&parent_el, &element, &b),
            None => dom.append_child(&parent_el, &element),
        }
        self.record_placement(msg.id, parent, next);
    }

    fn record_placement(&mut self, id: NodeId, parent: Option<NodeId>, next: Option<NodeId>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = parent;
            node.next = next;
        }
    }

    // Forget `id` and every known descendant. Only the subtree root is removed from the
    // document; descendants leave with it.
    fn detach(&mut self, id: NodeId) {
        if !self.nodes.contains_key(&id) {
            tracing::warn!(node = %id, "detach of unknown node");
            return;
        }

        let mut children: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        for n in self.nodes.values() {
            if let Some(parent) = n.parent {
                children.entry(parent).or_default().push(n.id);
            }
        }

        let mut doomed = vec![id];
        let mut seen = HashSet::from([id]);
        let mut i = 0;
        while i < doomed.len() {
            if let Some(kids) = children.get(&doomed[i]) {
                for &kid in kids {
                    if seen.insert(kid) {
                        doomed.push(kid);
                    }
                }
            }
            i += 1;
        }

        let dom = self.surface.dom_mut();
        for nid in &doomed {
            let Some(node) = self.nodes.remove(nid) else {
                continue;
            };
            if *nid == id || !node.kind.is_attached() {
                dom.remove(&node.element);
            }
            if let Some(filter) = &node.filter_element {
                dom.remove(filter);
            }
            if node.kind.is_media()
                && let Some(media) = dom.media_mut(&node.element)
            {
                media.pause();
            }
        }
        tracing::debug!(node = %id, removed = doomed.len(), "detached subtree");
    }
}

fn apply_filters_to<D: Dom>(
    surface: &mut Svg<D>,
    node: &mut DrawnNode<D::Node>,
    filters: &[Filter],
) {
    let signature = filter_signature(filters);
    let changed = node.filter_signature.as_deref() != Some(signature.as_str());
    node.filter_signature = Some(signature);
    if !changed {
        return;
    }

    let previous = node.filter_element.take();
    node.filter_element = surface.set_filters(&node.element, previous, filters);
}

fn default_clock() -> TimeSource {
    let start = Instant::now();
    Box::new(move || start.elapsed().as_secs_f64() * 1000.0)
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
