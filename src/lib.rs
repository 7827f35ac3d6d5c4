//! Wavyte FX is a multi-pass post-processing filter pipeline.
//!
//! Filters run fragment programs on a host renderer, threading an image through scratch surfaces
//! borrowed from a [`SurfacePool`]:
//!
//! - Implement [`RenderHost`] for your renderer, or use the bundled [`CpuHost`]
//! - Build filters ([`KawaseBlurFilter`], [`BloomFilter`], [`DropShadowFilter`],
//!   [`TiltShiftFilter`], ...) directly or from JSON via [`FilterConfig`]
//! - Apply them through a [`FilterContext`], which returns every scratch surface before the call
//!   ends
//!
//! ```no_run
//! use wavyte_fx::{BloomFilter, BloomOptions, CpuHost, FilterContext, SurfacePool};
//!
//! # fn main() -> wavyte_fx::FxResult<()> {
//! let mut host = CpuHost::new();
//! let mut bloom = BloomFilter::new(&mut host, BloomOptions::default())?;
//! let img = image::RgbaImage::new(64, 64);
//! let input = host.upload_image(&img)?;
//! let output = host.upload_image(&img)?;
//!
//! let mut pool = SurfacePool::default();
//! FilterContext::new(&mut host, &mut pool).apply_filter(&mut bloom, input, output, true)?;
//! let out = host.to_image(&output)?;
//! # let _ = out;
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod compose;
mod config;
mod filters;
mod foundation;
mod pass;
mod render;

pub use crate::foundation::color::Rgb;
pub use crate::foundation::core::{PixelFormat, Point, Surface, SurfaceDesc, SurfaceId, Vec2};
pub use crate::foundation::error::{FxError, FxResult, PoolMisuseError};

pub use crate::pass::single::SinglePass;
pub use crate::pass::uniforms::{
    UniformLayout, UniformSlot, UniformStore, UniformType, UniformValue,
};

pub use crate::render::context::FilterContext;
pub use crate::render::cpu::CpuHost;
pub use crate::render::host::{DrawCall, ProgramHandle, ProgramKind, RenderHost};
pub use crate::render::recording::{DrawRecord, RecordingHost};
pub use crate::render::surface_pool::{SurfacePool, SurfacePoolOpts, SurfacePoolStats};

pub use crate::compose::chain::FilterChain;
pub use crate::compose::kernel::{Kernel, generate_kernel, quality_and_strength, sanitize_kernel};
pub use crate::compose::padding::{
    HALF_TEXEL, SHADOW_QUALITY_SPREAD, drop_shadow_padding, kernel_padding, offset_padding,
};
pub use crate::compose::{Filter, run_chain};

pub use crate::filters::bloom::{BloomFilter, BloomOptions};
pub use crate::filters::drop_shadow::{DropShadowFilter, DropShadowOptions};
pub use crate::filters::glow::{GlowFilter, GlowOptions};
pub use crate::filters::kawase::{KawaseBlurFilter, KawaseBlurOptions};
pub use crate::filters::outline::{OutlineFilter, OutlineOptions};
pub use crate::filters::tilt_shift::{
    Axis, TiltShiftAxisFilter, TiltShiftFilter, TiltShiftOptions, axis_delta,
};

pub use crate::config::{FilterConfig, build_filter_chain, parse_filter_chain, parse_filter_config};
