pub(crate) mod attrs;
pub(crate) mod events;
pub(crate) mod frame_log;
pub(crate) mod node;
pub(crate) mod opts;
pub(crate) mod renderer;
pub(crate) mod surface;
