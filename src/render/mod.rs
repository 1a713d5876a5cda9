pub(crate) mod composite;
pub(crate) mod cpu;
pub(crate) mod paint;
pub(crate) mod preview;
pub(crate) mod surface;
