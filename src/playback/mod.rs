pub(crate) mod driver;
pub(crate) mod groups;
pub(crate) mod scheduler;
pub(crate) mod timer;
