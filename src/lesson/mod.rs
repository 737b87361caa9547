pub(crate) mod compose;
pub(crate) mod model;
pub(crate) mod normalize;
