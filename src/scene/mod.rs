pub(crate) mod message;
pub(crate) mod script;
