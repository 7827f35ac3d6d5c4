pub(crate) mod context;
pub(crate) mod cpu;
pub(crate) mod host;
pub(crate) mod recording;
pub(crate) mod shade;
pub(crate) mod surface_pool;
