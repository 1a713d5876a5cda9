pub(crate) mod history;
pub(crate) mod presets;
pub(crate) mod studio;
