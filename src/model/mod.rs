pub(crate) mod blend;
pub(crate) mod frame;
pub(crate) mod path;
pub(crate) mod project;
pub(crate) mod shape;
pub(crate) mod state;
