//! Serde descriptions of filters, for loading effect stacks from JSON.
//!
//! ```json
//! [
//!   { "kind": "bloom", "threshold": 0.6, "blur": 12 },
//!   { "kind": "drop_shadow", "offset": [2, 2], "color": "#202020" }
//! ]
//! ```

use crate::{
    compose::{Filter, chain::FilterChain},
    filters::{
        bloom::{BloomFilter, BloomOptions},
        drop_shadow::{DropShadowFilter, DropShadowOptions},
        glow::{GlowFilter, GlowOptions},
        kawase::{KawaseBlurFilter, KawaseBlurOptions},
        outline::{OutlineFilter, OutlineOptions},
        tilt_shift::{TiltShiftFilter, TiltShiftOptions},
    },
    foundation::error::{FxError, FxResult},
    render::host::RenderHost,
};

/// One filter and its options.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterConfig {
    /// [`KawaseBlurFilter`].
    KawaseBlur(KawaseBlurOptions),
    /// [`BloomFilter`].
    Bloom(BloomOptions),
    /// [`DropShadowFilter`].
    DropShadow(DropShadowOptions),
    /// [`TiltShiftFilter`].
    TiltShift(TiltShiftOptions),
    /// [`OutlineFilter`].
    Outline(OutlineOptions),
    /// [`GlowFilter`].
    Glow(GlowOptions),
}

impl FilterConfig {
    /// The `kind` tag this config serializes with.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::KawaseBlur(_) => "kawase_blur",
            Self::Bloom(_) => "bloom",
            Self::DropShadow(_) => "drop_shadow",
            Self::TiltShift(_) => "tilt_shift",
            Self::Outline(_) => "outline",
            Self::Glow(_) => "glow",
        }
    }

    /// Construct the filter on `host`.
    pub fn build(&self, host: &mut dyn RenderHost) -> FxResult<Box<dyn Filter>> {
        Ok(match self.clone() {
            Self::KawaseBlur(o) => Box::new(KawaseBlurFilter::new(host, o)?),
            Self::Bloom(o) => Box::new(BloomFilter::new(host, o)?),
            Self::DropShadow(o) => Box::new(DropShadowFilter::new(host, o)?),
            Self::TiltShift(o) => Box::new(TiltShiftFilter::new(host, o)?),
            Self::Outline(o) => Box::new(OutlineFilter::new(host, o)?),
            Self::Glow(o) => Box::new(GlowFilter::new(host, o)?),
        })
    }
}

/// Decode one filter description.
pub fn parse_filter_config(value: &serde_json::Value) -> FxResult<FilterConfig> {
    if let Some(kind) = value.get("kind") {
        match kind.as_str() {
            Some(k) if k.trim().is_empty() => {
                return Err(FxError::validation("filter `kind` must not be empty"));
            }
            None => return Err(FxError::validation("filter `kind` must be a string")),
            Some(_) => {}
        }
    }
    serde_json::from_value(value.clone())
        .map_err(|e| FxError::serde(format!("invalid filter description: {e}")))
}

/// Decode a JSON array of filter descriptions.
pub fn parse_filter_chain(json: &str) -> FxResult<Vec<FilterConfig>> {
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| FxError::serde(format!("invalid filter chain json: {e}")))?;
    let items = value
        .as_array()
        .ok_or_else(|| FxError::validation("filter chain must be a JSON array"))?;
    items
        .iter()
        .enumerate()
        .map(|(i, v)| {
            parse_filter_config(v).map_err(|e| match e {
                FxError::Validation(m) => FxError::validation(format!("filter #{i}: {m}")),
                FxError::Serde(m) => FxError::serde(format!("filter #{i}: {m}")),
                other => other,
            })
        })
        .collect()
}

/// Build every filter in `configs` into one chain.
pub fn build_filter_chain(
    host: &mut dyn RenderHost,
    configs: &[FilterConfig],
) -> FxResult<FilterChain> {
    let mut chain = FilterChain::new(host)?;
    for cfg in configs {
        chain.push(cfg.build(host)?);
    }
    tracing::debug!(filters = chain.len(), "built filter chain");
    Ok(chain)
}

#[cfg(test)]
#[path = "../../tests/unit/config/mod.rs"]
mod tests;
