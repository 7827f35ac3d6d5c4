pub(crate) mod single;
pub(crate) mod uniforms;
