//! CLI subcommand modules.

pub(crate) mod indices;
pub(crate) mod params;
pub(crate) mod rank;
