//! Host side of the uploader: effect execution, settings, rendering and the CLI session.
mod app;
mod console;
mod effects;
mod render;
mod session;
mod settings;

pub(crate) use session::run;
