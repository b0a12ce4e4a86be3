use crate::foundation::core::{Affine, NodeId, fmt_number};
use crate::scene::message::{Attributes, NodeKind};

/// Persistent state the renderer keeps for one drawn scene node.
#[derive(Clone, Debug)]
pub struct DrawnNode<N> {
    pub(crate) id: NodeId,
    pub(crate) kind: NodeKind,
    pub(crate) element: N,
    pub(crate) parent: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
    pub(crate) transform: TransformState,
    pub(crate) filter_signature: Option<String>,
    pub(crate) filter_element: Option<N>,
}

impl<N> DrawnNode<N> {
    /// Wrap an element that has not been drawn to yet.
    pub fn new(id: NodeId, kind: NodeKind, element: N) -> Self {
        Self {
            id,
            kind,
            element,
            parent: None,
            next: None,
            transform: TransformState::default(),
            filter_signature: None,
            filter_element: None,
        }
    }

    /// Scene node id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Drawable kind.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Backing element.
    pub fn element(&self) -> &N {
        &self.element
    }

    /// Parent this node was last placed under.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Signature of the filters last applied, `None` before the first application.
    pub fn filter_signature(&self) -> Option<&str> {
        self.filter_signature.as_deref()
    }

    /// `<filter>` definition currently referenced by the element.
    pub fn filter_element(&self) -> Option<&N> {
        self.filter_element.as_ref()
    }
}

/// Accumulated transform components; messages may update any subset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct TransformState {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) rotation: f64,
    pub(crate) scale_x: f64,
    pub(crate) scale_y: f64,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl TransformState {
    pub(crate) fn merge(&mut self, attrs: &Attributes) {
        if let Some(v) = attrs.x {
            self.x = v;
        }
        if let Some(v) = attrs.y {
            self.y = v;
        }
        if let Some(v) = attrs.rotation {
            self.rotation = v;
        }
        if let Some(v) = attrs.scale_x {
            self.scale_x = v;
        }
        if let Some(v) = attrs.scale_y {
            self.scale_y = v;
        }
    }

    pub(crate) fn affine(&self) -> Affine {
        Affine::translate((self.x, self.y))
            * Affine::rotate(self.rotation)
            * Affine::scale_non_uniform(self.scale_x, self.scale_y)
    }

    /// SVG `transform` attribute value.
    pub(crate) fn to_svg(self) -> String {
        let c = self.affine().as_coeffs();
        format!(
            "matrix({},{},{},{},{},{})",
            fmt_number(c[0]),
            fmt_number(c[1]),
            fmt_number(c[2]),
            fmt_number(c[3]),
            fmt_number(c[4]),
            fmt_number(c[5]),
        )
    }
}
