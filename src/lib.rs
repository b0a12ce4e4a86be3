//! Sprig is the SVG back-end of a scene-graph animation library.
//!
//! A scene graph (not part of this crate) produces, per frame, an ordered list of
//! [`DrawMessage`]s. The [`Renderer`] reconciles them onto persistent elements of an SVG
//! document and reports completion of every frame.
//!
//! # Frame overview
//!
//! 1. **Reconcile**: create, re-parent, update or detach one element per [`DrawMessage`]
//! 2. **Filter**: rebuild a node's `<filter>` definition only when its [`filter_signature`]
//!    changed
//! 3. **Media**: sync `video`/`audio` playback to the `playing` / `volume` attributes
//! 4. **Notify**: emit [`RendererEvent::CanRender`] once, then record the frame time when fps
//!    logging is on
//!
//! Input events go through [`Renderer::handle_event`], which suppresses host default actions
//! unless [`RendererOpts::allow_event_defaults`] is set.
//!
//! Element operations are delegated to a [`Dom`] implementation. [`MemoryDom`] is a headless
//! one that serializes to SVG markup.
#![forbid(unsafe_code)]

mod audio;
mod effects;
mod foundation;
mod render;
mod scene;

/// DOM capabilities and the headless document.
pub mod dom;

pub use crate::audio::sync::sync_media;
pub use crate::dom::memory::{ElementId, MemoryDom, MemoryEvent, MemoryMedia};
pub use crate::dom::{Dom, DomEvent, MediaElement};
pub use crate::effects::filter::{Filter, SIGNATURE_PREFIX, filter_signature};
pub use crate::effects::primitives::{Primitive, compile_filters};
pub use crate::foundation::core::{Affine, NodeId, Point, Size, fmt_number};
pub use crate::foundation::error::{SprigError, SprigResult};
pub use crate::render::events::{
    Emitter, ListenerId, RendererEvent, RendererEventKind, UserEvent,
};
pub use crate::render::frame_log::{FrameLog, MAX_FRAME_TIMES, REPORT_INTERVAL_MS};
pub use crate::render::node::DrawnNode;
pub use crate::render::opts::RendererOpts;
pub use crate::render::renderer::{NODE_ID_ATTR, Renderer, SurfaceTarget, TimeSource};
pub use crate::render::surface::Svg;
pub use crate::scene::message::{Attributes, DrawMessage, NodeKind};
pub use crate::scene::script::FrameScript;
