use super::*;
use crate::dom::memory::{ElementId, MemoryDom, MemoryEvent, MemoryMedia};
use crate::foundation::core::Point;
use crate::foundation::error::SprigError;
use crate::scene::message::Attributes;
use serde_json::json;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn renderer_with(opts: RendererOpts) -> Renderer<MemoryDom> {
    let mut dom = MemoryDom::new();
    let stage = dom.create_container("stage");
    Renderer::new(dom, SurfaceTarget::Node(stage), 1.0, 1.0, opts).unwrap()
}

fn renderer() -> Renderer<MemoryDom> {
    renderer_with(RendererOpts::default())
}

fn element_of(r: &Renderer<MemoryDom>, id: u64) -> ElementId {
    *r.node(NodeId(id)).unwrap().element()
}

fn msg(id: u64, kind: NodeKind) -> DrawMessage {
    DrawMessage::new(NodeId(id), kind)
}

fn with_attrs(m: DrawMessage, attrs: Attributes) -> DrawMessage {
    m.with_attributes(attrs)
}

fn detached_node(r: &mut Renderer<MemoryDom>) -> DrawnNode<ElementId> {
    let el = r.surface_mut().dom_mut().create_element("g");
    DrawnNode::new(NodeId(99), NodeKind::Group, el)
}

// Construction

#[test]
fn string_id_is_resolved_before_building_the_surface() {
    let mut dom = MemoryDom::new();
    let stage = dom.create_container("thing");
    let r = Renderer::new(dom, "thing".into(), 1.0, 1.0, RendererOpts::default()).unwrap();

    assert_eq!(*r.surface().container(), stage);
    let svg = *r.surface().svg_element();
    assert_eq!(r.surface().dom().parent(svg), Some(stage));
    assert_eq!(r.surface().dom().attribute(svg, "width"), Some("1"));
    assert_eq!(r.surface().dom().attribute(svg, "height"), Some("1"));
}

#[test]
fn unknown_surface_id_propagates_the_lookup_error() {
    let err = Renderer::new(
        MemoryDom::new(),
        "nope".into(),
        1.0,
        1.0,
        RendererOpts::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SprigError::UnknownElement(ref id) if id == "nope"));
}

#[test]
fn allow_event_defaults_comes_from_opts() {
    let r = renderer_with(RendererOpts {
        allow_event_defaults: true,
        ..Default::default()
    });
    assert!(r.allow_event_defaults());
    assert!(!renderer().allow_event_defaults());
}

// Event policy

fn click_on_root(r: &Renderer<MemoryDom>) -> MemoryEvent {
    MemoryEvent::new("click", *r.surface().root())
}

#[test]
fn allowed_defaults_are_never_prevented() {
    let mut r = renderer();
    r.set_allow_event_defaults(true);
    let mut ev = click_on_root(&r);
    r.handle_event(&mut ev);
    assert!(!ev.default_prevented());
}

#[test]
fn disallowed_defaults_are_prevented() {
    let mut r = renderer();
    r.set_allow_event_defaults(false);
    let mut ev = click_on_root(&r);
    r.handle_event(&mut ev);
    assert!(ev.default_prevented());
}

#[test]
fn defaults_are_prevented_when_unset() {
    let mut r = renderer();
    for kind in ["click", "pointermove", "keydown", "wheel"] {
        let mut ev = MemoryEvent::new(kind, *r.surface().svg_element());
        r.handle_event(&mut ev);
        assert!(ev.default_prevented(), "{kind}");
    }
}

#[test]
fn user_events_resolve_the_nearest_scene_node() {
    let mut r = renderer();
    r.render(&[
        msg(1, NodeKind::Group),
        msg(2, NodeKind::Text).with_parent(NodeId(1)),
    ]);
    let span = r.surface_mut().dom_mut().create_element("tspan");
    let text_el = element_of(&r, 2);
    r.surface_mut().dom_mut().append_child(&text_el, &span);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = Rc::clone(&seen);
    r.on(RendererEventKind::UserEvent, move |e| s.borrow_mut().push(e.clone()));

    let mut ev = MemoryEvent::new("click", span).with_position(Point::new(5.0, 6.0));
    r.handle_event(&mut ev);
    let mut ev = click_on_root(&r);
    r.handle_event(&mut ev);

    let seen = seen.borrow();
    assert_eq!(
        seen[0],
        RendererEvent::UserEvent(UserEvent {
            event_type: "click".to_string(),
            target: Some(NodeId(2)),
            position: Some(Point::new(5.0, 6.0)),
        })
    );
    match &seen[1] {
        RendererEvent::UserEvent(u) => assert_eq!(u.target, None),
        other => panic!("unexpected {other:?}"),
    }
}

// render

#[test]
fn empty_render_emits_can_render_once() {
    let mut r = renderer();
    let hits = Rc::new(Cell::new(0));
    let h = Rc::clone(&hits);
    r.on(RendererEventKind::CanRender, move |_| h.set(h.get() + 1));
    r.render(&[]);
    assert_eq!(hits.get(), 1);
    r.render(&[msg(1, NodeKind::Group), msg(2, NodeKind::Path)]);
    assert_eq!(hits.get(), 2);
}

#[test]
fn can_render_fires_after_the_frame_is_applied() {
    let mut r = renderer();
    let root = *r.surface().root();
    let observed = Rc::new(Cell::new(None));
    let o = Rc::clone(&observed);
    // The handler cannot borrow the renderer, so record the frame number and inspect after.
    r.on(RendererEventKind::CanRender, move |e| {
        if let RendererEvent::CanRender { frame } = e {
            o.set(Some(*frame));
        }
    });
    r.render(&[msg(1, NodeKind::Path)]);
    assert_eq!(observed.get(), Some(1));
    assert_eq!(r.surface().dom().children(root).len(), 1);
    assert_eq!(r.frames_rendered(), 1);
}

#[test]
fn disabled_fps_log_never_collects_or_reads_the_clock() {
    let mut r = renderer_with(RendererOpts {
        fps_log: false,
        ..Default::default()
    });
    let reads = Rc::new(Cell::new(0u32));
    let reads_in = Rc::clone(&reads);
    let mut t = 0.0;
    r.set_time_source(move || {
        reads_in.set(reads_in.get() + 1);
        t += 1000.0 / 60.0;
        f64::round(t)
    });

    for _ in 0..(60 * 3) {
        r.render(&[]);
    }
    assert!(r.frame_times().is_empty());
    assert_eq!(reads.get(), 0);
    assert_eq!(r.last_fps(), None);
}

#[test]
fn enabled_fps_log_records_frames_and_reports() {
    let mut r = renderer_with(RendererOpts {
        fps_log: true,
        ..Default::default()
    });
    let mut t = 0.0;
    r.set_time_source(move || {
        t += 1000.0 / 60.0;
        f64::round(t)
    });

    r.render(&[]);
    assert_eq!(r.frame_times(), &[17.0]);
    for _ in 0..(60 * 3) {
        r.render(&[]);
    }
    let fps = r.last_fps().unwrap();
    assert!((fps - 60.0).abs() < 1.0, "fps {fps}");
    assert!(r.frame_times().len() <= 61);
}

#[test]
fn creates_elements_per_kind_under_the_root() {
    let mut r = renderer();
    r.render(&[
        msg(1, NodeKind::Group),
        msg(2, NodeKind::Path).with_parent(NodeId(1)),
        msg(3, NodeKind::Bitmap),
        msg(4, NodeKind::Audio),
    ]);
    let dom = r.surface().dom();
    let root = *r.surface().root();
    let g = element_of(&r, 1);
    let p = element_of(&r, 2);
    let img = element_of(&r, 3);
    let audio = element_of(&r, 4);

    assert_eq!(dom.tag(g), Some("g"));
    assert_eq!(dom.tag(p), Some("path"));
    assert_eq!(dom.tag(img), Some("image"));
    assert_eq!(dom.children(root), &[g, img]);
    assert_eq!(dom.children(g), &[p]);
    assert_eq!(dom.parent(audio), None);
    assert_eq!(dom.attribute(p, NODE_ID_ATTR), Some("2"));
    assert_eq!(r.node(NodeId(2)).unwrap().parent(), Some(NodeId(1)));
}

#[test]
fn next_sibling_orders_insertion() {
    let mut r = renderer();
    r.render(&[msg(1, NodeKind::Path), msg(2, NodeKind::Path)]);
    r.render(&[msg(3, NodeKind::Path).with_next(NodeId(2))]);
    let root = *r.surface().root();
    let expected = [element_of(&r, 1), element_of(&r, 3), element_of(&r, 2)];
    assert_eq!(r.surface().dom().children(root), &expected);
}

#[test]
fn updates_reuse_elements_and_skip_unchanged_placement() {
    let mut r = renderer();
    r.render(&[msg(1, NodeKind::Group), msg(2, NodeKind::Path)]);
    let before = r.surface().dom().created_count("path");
    r.render(&[with_attrs(
        msg(2, NodeKind::Path),
        Attributes {
            opacity: Some(0.5),
            ..Default::default()
        },
    )]);
    assert_eq!(r.surface().dom().created_count("path"), before);
    let p = element_of(&r, 2);
    assert_eq!(r.surface().dom().attribute(p, "opacity"), Some("0.5"));

    // Re-parenting moves the existing element.
    r.render(&[msg(2, NodeKind::Path).with_parent(NodeId(1))]);
    let g = element_of(&r, 1);
    assert_eq!(r.surface().dom().children(g), &[p]);
}

#[test]
fn unknown_parent_falls_back_to_root() {
    let mut r = renderer();
    r.render(&[msg(5, NodeKind::Path).with_parent(NodeId(42))]);
    let root = *r.surface().root();
    assert_eq!(r.surface().dom().children(root), &[element_of(&r, 5)]);
    assert_eq!(r.node(NodeId(5)).unwrap().parent(), None);
}

#[test]
fn child_drawn_before_its_parent_moves_under_it_later() {
    let mut r = renderer();
    let root = *r.surface().root();
    r.render(&[
        msg(2, NodeKind::Path).with_parent(NodeId(1)),
        msg(1, NodeKind::Group),
    ]);
    let p = element_of(&r, 2);
    let g = element_of(&r, 1);
    assert_eq!(r.surface().dom().children(root), &[p, g]);

    r.render(&[
        msg(1, NodeKind::Group),
        msg(2, NodeKind::Path).with_parent(NodeId(1)),
    ]);
    assert_eq!(r.surface().dom().children(root), &[g]);
    assert_eq!(r.surface().dom().children(g), &[p]);
    assert_eq!(r.node(NodeId(2)).unwrap().parent(), Some(NodeId(1)));

    r.render(&[DrawMessage::detach(NodeId(1))]);
    assert!(r.surface().dom().children(root).is_empty());
    assert_eq!(r.node_count(), 0);
}

#[test]
fn detaching_a_parent_keeps_children_that_fell_back_to_root() {
    let mut r = renderer();
    let root = *r.surface().root();
    r.render(&[msg(2, NodeKind::Path).with_parent(NodeId(1))]);
    r.render(&[msg(1, NodeKind::Group)]);
    let p = element_of(&r, 2);

    r.render(&[DrawMessage::detach(NodeId(1))]);
    // The path never left the root, so it stays drawn and tracked.
    assert_eq!(r.surface().dom().children(root), &[p]);
    assert!(r.node(NodeId(2)).is_some());

    r.render(&[DrawMessage::detach(NodeId(2))]);
    assert!(r.surface().dom().children(root).is_empty());
    assert_eq!(r.node_count(), 0);
}

#[test]
fn unresolved_next_is_retried_once_the_sibling_exists() {
    let mut r = renderer();
    let root = *r.surface().root();
    r.render(&[
        msg(3, NodeKind::Path).with_next(NodeId(2)),
        msg(1, NodeKind::Path),
    ]);
    r.render(&[msg(2, NodeKind::Path)]);
    let (e1, e2, e3) = (element_of(&r, 1), element_of(&r, 2), element_of(&r, 3));
    assert_eq!(r.surface().dom().children(root), &[e3, e1, e2]);

    r.render(&[msg(3, NodeKind::Path).with_next(NodeId(2))]);
    assert_eq!(r.surface().dom().children(root), &[e1, e3, e2]);
}

#[test]
fn detaching_a_deep_tree_removes_every_tracked_node() {
    let mut r = renderer();
    let mut frame = vec![msg(1, NodeKind::Group)];
    for id in 2..200 {
        frame.push(msg(id, NodeKind::Group).with_parent(NodeId(id / 2)));
    }
    frame.push(msg(500, NodeKind::Path));
    r.render(&frame);
    assert_eq!(r.node_count(), 200);

    r.render(&[DrawMessage::detach(NodeId(1))]);
    let root = *r.surface().root();
    assert_eq!(r.node_count(), 1);
    assert_eq!(r.surface().dom().children(root), &[element_of(&r, 500)]);
}

#[test]
fn attributes_map_to_svg() {
    let mut r = renderer();
    r.render(&[
        with_attrs(
            msg(1, NodeKind::Path),
            Attributes {
                x: Some(10.0),
                y: Some(20.0),
                fill_color: Some("red".to_string()),
                stroke_color: Some("#000".to_string()),
                stroke_width: Some(2.0),
                d: Some("M0,0L1,1".to_string()),
                visible: Some(false),
                cursor: Some("pointer".to_string()),
                ..Default::default()
            },
        ),
        with_attrs(
            msg(2, NodeKind::Text),
            Attributes {
                text: Some("hello".to_string()),
                font_size: Some(12.0),
                font_family: Some("serif".to_string()),
                ..Default::default()
            },
        ),
        with_attrs(
            msg(3, NodeKind::Bitmap),
            Attributes {
                source: Some("a.png".to_string()),
                width: Some(4.0),
                height: Some(3.0),
                ..Default::default()
            },
        ),
    ]);
    let dom = r.surface().dom();
    let p = element_of(&r, 1);
    assert_eq!(dom.attribute(p, "transform"), Some("matrix(1,0,0,1,10,20)"));
    assert_eq!(dom.attribute(p, "fill"), Some("red"));
    assert_eq!(dom.attribute(p, "stroke"), Some("#000"));
    assert_eq!(dom.attribute(p, "stroke-width"), Some("2"));
    assert_eq!(dom.attribute(p, "d"), Some("M0,0L1,1"));
    assert_eq!(dom.attribute(p, "visibility"), Some("hidden"));
    assert_eq!(dom.attribute(p, "cursor"), Some("pointer"));

    let t = element_of(&r, 2);
    assert_eq!(dom.text(t), Some("hello"));
    assert_eq!(dom.attribute(t, "font-size"), Some("12"));
    assert_eq!(dom.attribute(t, "font-family"), Some("serif"));

    let img = element_of(&r, 3);
    assert_eq!(dom.attribute(img, "href"), Some("a.png"));
    assert_eq!(dom.attribute(img, "width"), Some("4"));
}

#[test]
fn partial_transform_updates_merge() {
    let mut r = renderer();
    r.render(&[with_attrs(
        msg(1, NodeKind::Group),
        Attributes {
            x: Some(10.0),
            scale_x: Some(2.0),
            ..Default::default()
        },
    )]);
    r.render(&[with_attrs(
        msg(1, NodeKind::Group),
        Attributes {
            y: Some(5.0),
            ..Default::default()
        },
    )]);
    let g = element_of(&r, 1);
    assert_eq!(
        r.surface().dom().attribute(g, "transform"),
        Some("matrix(2,0,0,1,10,5)")
    );

    r.render(&[with_attrs(
        msg(1, NodeKind::Group),
        Attributes {
            visible: Some(true),
            ..Default::default()
        },
    )]);
    assert_eq!(r.surface().dom().attribute(g, "visibility"), None);
}

#[test]
fn detach_removes_the_subtree() {
    let mut r = renderer();
    r.render(&[
        msg(1, NodeKind::Group),
        msg(2, NodeKind::Group).with_parent(NodeId(1)),
        msg(3, NodeKind::Path).with_parent(NodeId(2)),
        msg(4, NodeKind::Path),
    ]);
    let g1 = element_of(&r, 1);
    r.render(&[DrawMessage::detach(NodeId(1))]);

    let root = *r.surface().root();
    assert_eq!(r.surface().dom().children(root), &[element_of(&r, 4)]);
    assert_eq!(r.surface().dom().parent(g1), None);
    assert_eq!(r.node_count(), 1);
    assert!(r.node(NodeId(3)).is_none());

    // Detaching again is tolerated.
    r.render(&[DrawMessage::detach(NodeId(1))]);
    assert_eq!(r.node_count(), 1);
}

#[test]
fn kind_change_replaces_the_element() {
    let mut r = renderer();
    r.render(&[msg(1, NodeKind::Path)]);
    let old = element_of(&r, 1);
    r.render(&[msg(1, NodeKind::Text)]);
    let new = element_of(&r, 1);
    assert_ne!(old, new);
    assert_eq!(r.surface().dom().tag(new), Some("text"));
    let root = *r.surface().root();
    assert_eq!(r.surface().dom().children(root), &[new]);
}

// Filters

#[test]
fn empty_filter_list_writes_bare_signature() {
    let mut r = renderer();
    let mut node = detached_node(&mut r);
    r.apply_filters(&mut node, &[]);
    assert_eq!(node.filter_signature(), Some("filter:"));
}

#[test]
fn color_matrix_signature() {
    let mut r = renderer();
    let mut node = detached_node(&mut r);
    r.apply_filters(&mut node, &[Filter::new("colorMatrix", json!([]))]);
    assert_eq!(node.filter_signature(), Some("filter:colorMatrix()"));
}

#[test]
fn unchanged_signature_skips_the_surface_update() {
    let mut r = renderer();
    let mut node = detached_node(&mut r);
    let filters = [Filter::new("blur", json!(2))];

    r.apply_filters(&mut node, &filters);
    let first = node.filter_element().copied().unwrap();
    r.apply_filters(&mut node, &filters);

    assert_eq!(node.filter_signature(), Some("filter:blur(2)"));
    assert_eq!(r.surface().dom().created_count("filter"), 1);
    assert_eq!(node.filter_element().copied(), Some(first));
    let url = format!(
        "url(#{})",
        r.surface().dom().attribute(first, "id").unwrap()
    );
    assert_eq!(
        r.surface().dom().attribute(*node.element(), "filter"),
        Some(url.as_str())
    );
}

#[test]
fn changed_signature_replaces_the_definition() {
    let mut r = renderer();
    let mut node = detached_node(&mut r);
    let defs = *r.surface().defs();

    r.apply_filters(&mut node, &[Filter::new("blur", json!(2))]);
    r.apply_filters(&mut node, &[Filter::new("blur", json!(3))]);
    assert_eq!(r.surface().dom().created_count("filter"), 2);
    assert_eq!(r.surface().dom().children(defs).len(), 1);

    r.apply_filters(&mut node, &[]);
    assert_eq!(node.filter_signature(), Some("filter:"));
    assert!(node.filter_element().is_none());
    assert!(r.surface().dom().children(defs).is_empty());
    assert_eq!(
        r.surface().dom().attribute(*node.element(), "filter"),
        None
    );
}

#[test]
fn render_applies_filters_with_change_detection() {
    let mut r = renderer();
    let blurred = || {
        with_attrs(
            msg(1, NodeKind::Path),
            Attributes {
                filters: Some(vec![Filter::new("blur", json!(1))]),
                ..Default::default()
            },
        )
    };
    r.render(&[blurred()]);
    r.render(&[blurred()]);
    r.render(&[msg(1, NodeKind::Path)]);
    assert_eq!(r.surface().dom().created_count("filter"), 1);
    assert_eq!(
        r.node(NodeId(1)).unwrap().filter_signature(),
        Some("filter:blur(1)")
    );
}

#[test]
fn detach_removes_filter_definitions() {
    let mut r = renderer();
    r.render(&[with_attrs(
        msg(1, NodeKind::Path),
        Attributes {
            filters: Some(vec![Filter::new("sepia", json!(1))]),
            ..Default::default()
        },
    )]);
    let defs = *r.surface().defs();
    assert_eq!(r.surface().dom().children(defs).len(), 1);
    r.render(&[DrawMessage::detach(NodeId(1))]);
    assert!(r.surface().dom().children(defs).is_empty());
}

// Media

#[test]
fn draw_audio_follows_message_attributes() {
    let r = renderer();
    let mut media = MemoryMedia::new(-1.0);
    let m = with_attrs(
        msg(1, NodeKind::Audio),
        Attributes {
            playing: Some(true),
            volume: Some(f64::NAN),
            ..Default::default()
        },
    );
    r.draw_audio(&mut media, &m);
    assert!(media.playing());
    assert_eq!(media.volume(), 0.0);

    r.draw_audio(&mut media, &msg(1, NodeKind::Audio));
    assert!(media.playing());
    assert_eq!(media.volume(), 0.0);
}

#[test]
fn render_syncs_media_elements() {
    let mut r = renderer();
    r.render(&[with_attrs(
        msg(1, NodeKind::Video),
        Attributes {
            playing: Some(true),
            volume: Some(0.5),
            source: Some("clip.webm".to_string()),
            ..Default::default()
        },
    )]);
    let v = element_of(&r, 1);
    let state = r.surface().dom().media(v).unwrap();
    assert!(state.playing());
    assert_eq!(state.volume(), 0.5);
    assert_eq!(r.surface().dom().attribute(v, "src"), Some("clip.webm"));

    r.render(&[msg(1, NodeKind::Video)]);
    let state = r.surface().dom().media(v).unwrap();
    assert!(state.playing());
    assert_eq!(state.play_calls(), 1);

    r.render(&[DrawMessage::detach(NodeId(1))]);
    assert!(!r.surface().dom().media(v).unwrap().playing());
}

#[test]
fn off_stops_delivery() {
    let mut r = renderer();
    let hits = Rc::new(Cell::new(0));
    let h = Rc::clone(&hits);
    let id = r.on(RendererEventKind::CanRender, move |_| h.set(h.get() + 1));
    r.render(&[]);
    assert!(r.off(id));
    r.render(&[]);
    assert_eq!(hits.get(), 1);
}
