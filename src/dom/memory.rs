//! Headless [`Dom`] implementation.
//!
//! `MemoryDom` keeps elements in an arena addressed by [`ElementId`]. It is used by the CLI to
//! produce SVG markup without a browser, and by tests to observe exactly what the renderer
//! did to the document.

use std::collections::BTreeMap;
use std::fmt;

use crate::dom::{Dom, DomEvent, MediaElement};
use crate::foundation::core::Point;
use crate::foundation::error::{SprigError, SprigResult};

/// Handle to an element owned by a [`MemoryDom`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(u32);

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({})", self.0)
    }
}

/// Playback state of an in-memory `video`/`audio` element.
#[derive(Clone, Debug, PartialEq)]
pub struct MemoryMedia {
    playing: bool,
    volume: f64,
    play_calls: u32,
    pause_calls: u32,
}

impl Default for MemoryMedia {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl MemoryMedia {
    /// Create a paused media element with the given volume.
    pub fn new(volume: f64) -> Self {
        Self {
            playing: false,
            volume,
            play_calls: 0,
            pause_calls: 0,
        }
    }

    /// Whether the element is currently playing.
    pub fn playing(&self) -> bool {
        self.playing
    }

    /// Number of `play()` calls received.
    pub fn play_calls(&self) -> u32 {
        self.play_calls
    }

    /// Number of `pause()` calls received.
    pub fn pause_calls(&self) -> u32 {
        self.pause_calls
    }
}

impl MediaElement for MemoryMedia {
    fn play(&mut self) {
        self.playing = true;
        self.play_calls += 1;
    }

    fn pause(&mut self) {
        self.playing = false;
        self.pause_calls += 1;
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
    }
}

#[derive(Clone, Debug)]
struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<ElementId>,
    parent: Option<ElementId>,
    media: Option<MemoryMedia>,
}

/// Arena-backed document.
#[derive(Debug, Default)]
pub struct MemoryDom {
    elements: Vec<Element>,
    created: BTreeMap<String, u64>,
}

impl MemoryDom {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached `div` carrying the given `id`, resolvable through
    /// [`Dom::element_by_id`].
    pub fn create_container(&mut self, id: &str) -> ElementId {
        let el = self.create_element("div");
        self.set_attribute(&el, "id", id);
        el
    }

    /// Tag name of an element.
    pub fn tag(&self, id: ElementId) -> Option<&str> {
        self.get(id).map(|e| e.tag.as_str())
    }

    /// Attribute value of an element.
    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.get(id)?
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Text content of an element.
    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.get(id)?.text.as_deref()
    }

    /// Children of an element in document order.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.get(id).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    /// Parent of an element.
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.get(id)?.parent
    }

    /// Media state of a `video`/`audio` element.
    pub fn media(&self, id: ElementId) -> Option<&MemoryMedia> {
        self.get(id)?.media.as_ref()
    }

    /// How many elements with `tag` were ever created.
    pub fn created_count(&self, tag: &str) -> u64 {
        self.created.get(tag).copied().unwrap_or(0)
    }

    /// First element whose attribute `name` equals `value`.
    pub fn find_by_attribute(&self, name: &str, value: &str) -> Option<ElementId> {
        (0..self.elements.len())
            .map(|i| ElementId(i as u32))
            .find(|&id| self.attribute(id, name) == Some(value))
    }

    /// Serialize an element and its subtree as XML markup.
    pub fn to_markup(&self, id: ElementId) -> String {
        let mut out = String::new();
        self.write_markup(id, &mut out);
        out
    }

    fn write_markup(&self, id: ElementId, out: &mut String) {
        let Some(el) = self.get(id) else {
            return;
        };
        out.push('<');
        out.push_str(&el.tag);
        for (k, v) in &el.attrs {
            out.push(' ');
            out.push_str(k);
            out.push_str("=\"");
            push_escaped(out, v);
            out.push('"');
        }
        if el.children.is_empty() && el.text.is_none() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        if let Some(text) = &el.text {
            push_escaped(out, text);
        }
        for &child in &el.children {
            self.write_markup(child, out);
        }
        out.push_str("</");
        out.push_str(&el.tag);
        out.push('>');
    }

    fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0 as usize)
    }

    fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.0 as usize)
    }

    fn detach(&mut self, child: ElementId) {
        let Some(parent) = self.get_mut(child).and_then(|e| e.parent.take()) else {
            return;
        };
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|&c| c != child);
        }
    }

    fn is_ancestor_or_self(&self, candidate: ElementId, of: ElementId) -> bool {
        let mut cur = Some(of);
        while let Some(id) = cur {
            if id == candidate {
                return true;
            }
            cur = self.parent(id);
        }
        false
    }
}

fn push_escaped(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
}

impl Dom for MemoryDom {
    type Node = ElementId;

    fn element_by_id(&self, id: &str) -> SprigResult<ElementId> {
        self.find_by_attribute("id", id)
            .ok_or_else(|| SprigError::unknown_element(id))
    }

    fn create_element(&mut self, tag: &str) -> ElementId {
        let id = ElementId(self.elements.len() as u32);
        let media = matches!(tag, "video" | "audio").then(MemoryMedia::default);
        self.elements.push(Element {
            tag: tag.to_string(),
            attrs: Vec::new(),
            text: None,
            children: Vec::new(),
            parent: None,
            media,
        });
        *self.created.entry(tag.to_string()).or_default() += 1;
        id
    }

    fn set_attribute(&mut self, node: &ElementId, name: &str, value: &str) {
        let Some(el) = self.get_mut(*node) else {
            return;
        };
        match el.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => el.attrs.push((name.to_string(), value.to_string())),
        }
    }

    fn remove_attribute(&mut self, node: &ElementId, name: &str) {
        if let Some(el) = self.get_mut(*node) {
            el.attrs.retain(|(k, _)| k != name);
        }
    }

    fn get_attribute(&self, node: &ElementId, name: &str) -> Option<String> {
        self.attribute(*node, name).map(str::to_string)
    }

    fn set_text_content(&mut self, node: &ElementId, text: &str) {
        if let Some(el) = self.get_mut(*node) {
            el.text = Some(text.to_string());
        }
    }

    fn append_child(&mut self, parent: &ElementId, child: &ElementId) {
        if self.get(*parent).is_none() || self.is_ancestor_or_self(*child, *parent) {
            return;
        }
        self.detach(*child);
        if let Some(p) = self.get_mut(*parent) {
            p.children.push(*child);
        }
        if let Some(c) = self.get_mut(*child) {
            c.parent = Some(*parent);
        }
    }

    fn insert_before(&mut self, parent: &ElementId, child: &ElementId, before: &ElementId) {
        if child == before {
            return;
        }
        if self.get(*parent).is_none() || self.is_ancestor_or_self(*child, *parent) {
            return;
        }
        self.detach(*child);
        if let Some(p) = self.get_mut(*parent) {
            match p.children.iter().position(|c| c == before) {
                Some(at) => p.children.insert(at, *child),
                None => p.children.push(*child),
            }
        }
        if let Some(c) = self.get_mut(*child) {
            c.parent = Some(*parent);
        }
    }

    fn remove(&mut self, node: &ElementId) {
        self.detach(*node);
    }

    fn parent_node(&self, node: &ElementId) -> Option<ElementId> {
        self.parent(*node)
    }

    fn media_mut(&mut self, node: &ElementId) -> Option<&mut dyn MediaElement> {
        self.get_mut(*node)?
            .media
            .as_mut()
            .map(|m| m as &mut dyn MediaElement)
    }
}

/// Input event targeting a [`MemoryDom`] element.
#[derive(Clone, Debug)]
pub struct MemoryEvent {
    event_type: String,
    target: ElementId,
    position: Option<Point>,
    default_prevented: bool,
}

impl MemoryEvent {
    /// Create an event of `event_type` dispatched to `target`.
    pub fn new(event_type: impl Into<String>, target: ElementId) -> Self {
        Self {
            event_type: event_type.into(),
            target,
            position: None,
            default_prevented: false,
        }
    }

    /// Attach a client-space pointer position.
    pub fn with_position(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    /// Whether `prevent_default` was called.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

impl DomEvent<ElementId> for MemoryEvent {
    fn event_type(&self) -> &str {
        &self.event_type
    }

    fn target(&self) -> &ElementId {
        &self.target
    }

    fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    fn client_position(&self) -> Option<Point> {
        self.position
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dom/memory.rs"]
mod tests;
