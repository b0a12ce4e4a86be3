use crate::effects::filter::Filter;
use crate::foundation::core::NodeId;

/// Kind of drawable a scene node materializes as.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    /// Container (`<g>`).
    #[default]
    Group,
    /// Vector shape (`<path>`).
    Path,
    /// Text block (`<text>`).
    Text,
    /// Inline text run (`<tspan>`).
    TextSpan,
    /// Raster image (`<image>`).
    Bitmap,
    /// Video element.
    Video,
    /// Audio element. Never attached to the SVG tree.
    Audio,
}

impl NodeKind {
    /// Element tag created for this kind.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Group => "g",
            Self::Path => "path",
            Self::Text => "text",
            Self::TextSpan => "tspan",
            Self::Bitmap => "image",
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }

    /// Whether elements of this kind expose a media capability.
    pub fn is_media(self) -> bool {
        matches!(self, Self::Video | Self::Audio)
    }

    /// Whether elements of this kind are placed in the SVG tree.
    pub fn is_attached(self) -> bool {
        !matches!(self, Self::Audio)
    }
}

/// One per-node draw instruction of a frame.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DrawMessage {
    /// Node this instruction targets.
    pub id: NodeId,
    /// Drawable kind.
    #[serde(rename = "type", default)]
    pub kind: NodeKind,
    /// Parent node; `None` attaches to the surface root.
    #[serde(default)]
    pub parent: Option<NodeId>,
    /// Sibling this node is placed before; `None` appends.
    #[serde(default)]
    pub next: Option<NodeId>,
    /// Remove the node (and its subtree) instead of drawing it.
    #[serde(default)]
    pub detach: bool,
    /// Attributes to apply; absent fields are left untouched.
    #[serde(default)]
    pub attributes: Attributes,
}

impl DrawMessage {
    /// Instruction for `id` with no attributes.
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            ..Self::default()
        }
    }

    /// Instruction removing `id`.
    pub fn detach(id: NodeId) -> Self {
        Self {
            id,
            detach: true,
            ..Self::default()
        }
    }

    /// Set the parent node.
    pub fn with_parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Set the next sibling.
    pub fn with_next(mut self, next: NodeId) -> Self {
        self.next = Some(next);
        self
    }

    /// Replace the attributes.
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// Drawing attributes carried by a [`DrawMessage`].
///
/// Every field is optional: `None` means "leave as is", so an explicit `0` or `false` is
/// always distinguishable from an absent value.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Attributes {
    pub x: Option<f64>,
    pub y: Option<f64>,
    /// Rotation in radians.
    pub rotation: Option<f64>,
    pub scale_x: Option<f64>,
    pub scale_y: Option<f64>,
    pub opacity: Option<f64>,
    pub fill_color: Option<String>,
    pub stroke_color: Option<String>,
    pub stroke_width: Option<f64>,
    pub visible: Option<bool>,
    pub cursor: Option<String>,
    /// SVG path data for [`NodeKind::Path`].
    pub d: Option<String>,
    pub text: Option<String>,
    /// Resource URL for bitmaps and media.
    pub source: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub filters: Option<Vec<Filter>>,
    pub playing: Option<bool>,
    pub volume: Option<f64>,
}

impl Attributes {
    /// Whether any transform component is present.
    pub fn has_transform(&self) -> bool {
        self.x.is_some()
            || self.y.is_some()
            || self.rotation.is_some()
            || self.scale_x.is_some()
            || self.scale_y.is_some()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/message.rs"]
mod tests;
