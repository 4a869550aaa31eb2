mod board;
mod bootstrap;
mod campaign;
mod loop_runner;
mod script;

pub(crate) use bootstrap::{build_app, usage_text, Launch};
pub(crate) use loop_runner::run;
