pub(crate) mod element;
pub(crate) mod sink;
pub(crate) mod svg;
