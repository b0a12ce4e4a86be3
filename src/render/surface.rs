//! The drawing surface: an `<svg>` root built inside a host container.

use std::fmt;

use crate::dom::Dom;
use crate::effects::filter::Filter;
use crate::effects::primitives::{Primitive, compile_filters};
use crate::foundation::core::{Size, fmt_number};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// SVG document the renderer draws into.
///
/// Layout inside the container:
///
/// ```text
/// container
///   └─ <svg width height viewBox>
///        ├─ <defs>      filter definitions
///        └─ <g>         scene root
/// ```
pub struct Svg<D: Dom> {
    dom: D,
    container: D::Node,
    svg: D::Node,
    defs: D::Node,
    root: D::Node,
    size: Size,
    filter_seq: u64,
}

impl<D: Dom> fmt::Debug for Svg<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Svg")
            .field("container", &self.container)
            .field("svg", &self.svg)
            .field("size", &self.size)
            .field("filter_seq", &self.filter_seq)
            .finish()
    }
}

impl<D: Dom> Svg<D> {
    /// Build the surface inside `container`.
    pub fn new(mut dom: D, container: D::Node, width: f64, height: f64) -> Self {
        let svg = dom.create_element("svg");
        dom.set_attribute(&svg, "xmlns", SVG_NS);
        dom.set_attribute(&svg, "width", &fmt_number(width));
        dom.set_attribute(&svg, "height", &fmt_number(height));
        dom.set_attribute(
            &svg,
            "viewBox",
            &format!("0 0 {} {}", fmt_number(width), fmt_number(height)),
        );

        let defs = dom.create_element("defs");
        let root = dom.create_element("g");
        dom.append_child(&svg, &defs);
        dom.append_child(&svg, &root);
        dom.append_child(&container, &svg);

        Self {
            dom,
            container,
            svg,
            defs,
            root,
            size: Size::new(width, height),
            filter_seq: 0,
        }
    }

    /// The document.
    pub fn dom(&self) -> &D {
        &self.dom
    }

    /// Mutable access to the document.
    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    /// Host element the surface was built in.
    pub fn container(&self) -> &D::Node {
        &self.container
    }

    /// The `<svg>` element.
    pub fn svg_element(&self) -> &D::Node {
        &self.svg
    }

    /// The `<defs>` element.
    pub fn defs(&self) -> &D::Node {
        &self.defs
    }

    /// Scene root group; top-level nodes are attached here.
    pub fn root(&self) -> &D::Node {
        &self.root
    }

    /// Surface size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Replace the filter definition referenced by `element`.
    ///
    /// `previous` is removed from `<defs>`. Returns the new `<filter>` element, or `None` when
    /// nothing compiled, in which case the element's `filter` reference is cleared.
    pub(crate) fn set_filters(
        &mut self,
        element: &D::Node,
        previous: Option<D::Node>,
        filters: &[Filter],
    ) -> Option<D::Node> {
        if let Some(prev) = previous {
            self.dom.remove(&prev);
        }

        let chain = compile_filters(filters);
        if chain.is_empty() {
            self.dom.remove_attribute(element, "filter");
            return None;
        }

        self.filter_seq += 1;
        let id = format!("sprig-filter-{}", self.filter_seq);
        let filter = self.dom.create_element("filter");
        self.dom.set_attribute(&filter, "id", &id);
        self.dom.set_attribute(&filter, "x", "-50%");
        self.dom.set_attribute(&filter, "y", "-50%");
        self.dom.set_attribute(&filter, "width", "200%");
        self.dom.set_attribute(&filter, "height", "200%");
        self.dom
            .set_attribute(&filter, "color-interpolation-filters", "sRGB");
        for p in &chain {
            self.append_primitive(&filter, p);
        }
        self.dom.append_child(&self.defs, &filter);
        self.dom
            .set_attribute(element, "filter", &format!("url(#{id})"));

        tracing::debug!(filter_id = %id, primitives = chain.len(), "rebuilt filter");
        Some(filter)
    }

    fn append_primitive(&mut self, parent: &D::Node, p: &Primitive) {
        let el = self.dom.create_element(p.tag);
        for (name, value) in &p.attrs {
            self.dom.set_attribute(&el, name, value);
        }
        for child in &p.children {
            self.append_primitive(&el, child);
        }
        self.dom.append_child(parent, &el);
    }
}
