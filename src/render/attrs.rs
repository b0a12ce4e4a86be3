use crate::dom::Dom;
use crate::foundation::core::fmt_number;
use crate::render::node::DrawnNode;
use crate::scene::message::{Attributes, NodeKind};

/// Write the present drawing attributes of a message onto the node's element.
///
/// Filters and media playback are handled by the renderer, not here.
pub(crate) fn apply_attributes<D: Dom>(
    dom: &mut D,
    node: &mut DrawnNode<D::Node>,
    attrs: &Attributes,
) {
    let el = &node.element;

    if attrs.has_transform() {
        node.transform.merge(attrs);
        dom.set_attribute(el, "transform", &node.transform.to_svg());
    }

    set_number(dom, el, "opacity", attrs.opacity);
    set_str(dom, el, "fill", attrs.fill_color.as_deref());
    set_str(dom, el, "stroke", attrs.stroke_color.as_deref());
    set_number(dom, el, "stroke-width", attrs.stroke_width);

    match attrs.visible {
        Some(true) => dom.remove_attribute(el, "visibility"),
        Some(false) => dom.set_attribute(el, "visibility", "hidden"),
        None => {}
    }

    set_str(dom, el, "cursor", attrs.cursor.as_deref());
    set_str(dom, el, "d", attrs.d.as_deref());

    if let Some(text) = &attrs.text {
        dom.set_text_content(el, text);
    }

    let source_attr = match node.kind {
        NodeKind::Video | NodeKind::Audio => "src",
        _ => "href",
    };
    set_str(dom, el, source_attr, attrs.source.as_deref());

    set_number(dom, el, "width", attrs.width);
    set_number(dom, el, "height", attrs.height);
    set_number(dom, el, "font-size", attrs.font_size);
    set_str(dom, el, "font-family", attrs.font_family.as_deref());
}

fn set_number<D: Dom>(dom: &mut D, el: &D::Node, name: &str, value: Option<f64>) {
    if let Some(v) = value {
        dom.set_attribute(el, name, &fmt_number(v));
    }
}

fn set_str<D: Dom>(dom: &mut D, el: &D::Node, name: &str, value: Option<&str>) {
    if let Some(v) = value {
        dom.set_attribute(el, name, v);
    }
}
