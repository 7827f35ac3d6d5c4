use std::collections::{HashMap, HashSet};

use crate::{
    foundation::core::{PixelFormat, Surface, SurfaceDesc, SurfaceId},
    foundation::error::{FxError, FxResult, PoolMisuseError},
    render::host::RenderHost,
};

/// Pool configuration for cached scratch surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SurfacePoolOpts {
    /// Maximum bytes retained across all buckets.
    pub max_pool_bytes: usize,
    /// Maximum number of retained surfaces per (w,h,format) bucket.
    pub max_surfaces_per_bucket: usize,
}

impl Default for SurfacePoolOpts {
    fn default() -> Self {
        Self {
            max_pool_bytes: 256 * 1024 * 1024,
            max_surfaces_per_bucket: 8,
        }
    }
}

impl SurfacePoolOpts {
    /// Defaults overridden by `WAVYTE_FX_POOL_MAX_BYTES` / `WAVYTE_FX_POOL_MAX_PER_BUCKET`.
    ///
    /// Unset or unparseable variables keep the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`SurfacePoolOpts::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).and_then(|v| v.trim().parse::<usize>().ok());

        let d = Self::default();
        Self {
            max_pool_bytes: var("WAVYTE_FX_POOL_MAX_BYTES").unwrap_or(d.max_pool_bytes),
            max_surfaces_per_bucket: var("WAVYTE_FX_POOL_MAX_PER_BUCKET")
                .unwrap_or(d.max_surfaces_per_bucket),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SurfaceKey {
    w: u32,
    h: u32,
    format: PixelFormat,
}

impl SurfaceKey {
    fn from_desc(desc: SurfaceDesc) -> Self {
        Self {
            w: desc.width,
            h: desc.height,
            format: desc.format,
        }
    }

    fn desc(self) -> SurfaceDesc {
        SurfaceDesc {
            width: self.w,
            height: self.h,
            format: self.format,
        }
    }

    fn byte_len(self) -> usize {
        self.desc().byte_len()
    }
}

/// Allocation and reuse counters.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SurfacePoolStats {
    /// Surfaces currently parked in buckets.
    pub retained_surfaces: usize,
    /// Bytes currently parked in buckets.
    pub retained_bytes: usize,
    /// Surfaces allocated through the host over the pool's lifetime.
    pub alloc_surfaces: u64,
    /// Bytes allocated through the host over the pool's lifetime.
    pub alloc_bytes: u64,
    /// Total successful `acquire_like` calls (fresh or recycled).
    pub acquired_total: u64,
    /// Releases that were handed back for destruction because a cap was hit.
    pub dropped_on_release: u64,
}

struct Bucket {
    key: SurfaceKey,
    surfaces: Vec<Surface>,
}

/// Bounded pool of scratch surfaces sized like a reference surface.
///
/// Keyed by `(width, height, format)`. Every surface handed out by [`SurfacePool::acquire_like`]
/// must come back through [`SurfacePool::release`] exactly once; [`SurfacePool::outstanding`]
/// reports the current loan count.
pub struct SurfacePool {
    opts: SurfacePoolOpts,
    stats: SurfacePoolStats,

    bucket_idx_by_key: HashMap<SurfaceKey, usize>,
    buckets: Vec<Bucket>,

    // Every live surface created by this pool, and the subset currently on loan.
    owned: HashSet<SurfaceId>,
    loaned: HashSet<SurfaceId>,
}

impl Default for SurfacePool {
    fn default() -> Self {
        Self::new(SurfacePoolOpts::default())
    }
}

impl SurfacePool {
    /// Empty pool.
    pub fn new(opts: SurfacePoolOpts) -> Self {
        Self {
            opts,
            stats: SurfacePoolStats::default(),
            bucket_idx_by_key: HashMap::new(),
            buckets: Vec::new(),
            owned: HashSet::new(),
            loaned: HashSet::new(),
        }
    }

    /// Current configuration.
    pub fn opts(&self) -> SurfacePoolOpts {
        self.opts
    }

    /// Snapshot of the pool counters.
    pub fn stats(&self) -> SurfacePoolStats {
        self.stats.clone()
    }

    /// Number of surfaces currently on loan.
    pub fn outstanding(&self) -> usize {
        self.loaned.len()
    }

    /// Return `true` when `surface` is currently on loan from this pool.
    pub fn is_loaned(&self, surface: &Surface) -> bool {
        self.loaned.contains(&surface.id())
    }

    /// Hand out a surface with the same dimensions and format as `reference`.
    ///
    /// Recycles a retained surface when one matches, otherwise allocates through `host`.
    /// Allocation failure is returned as [`FxError::Allocation`].
    pub fn acquire_like(
        &mut self,
        host: &mut dyn RenderHost,
        reference: &Surface,
    ) -> FxResult<Surface> {
        let key = SurfaceKey::from_desc(reference.desc());

        let recycled = self
            .bucket_idx_by_key
            .get(&key)
            .and_then(|&bi| self.buckets[bi].surfaces.pop());

        let surface = match recycled {
            Some(s) => {
                self.stats.retained_surfaces = self.stats.retained_surfaces.saturating_sub(1);
                self.stats.retained_bytes =
                    self.stats.retained_bytes.saturating_sub(key.byte_len());
                s
            }
            None => {
                let desc = key.desc();
                let s = host.create_surface(&desc)?;
                if s.desc() != desc {
                    let got = s.desc();
                    host.destroy_surface(s);
                    return Err(FxError::allocation(format!(
                        "host returned a {}x{} surface for a {}x{} request",
                        got.width, got.height, desc.width, desc.height
                    )));
                }
                self.stats.alloc_surfaces = self.stats.alloc_surfaces.saturating_add(1);
                self.stats.alloc_bytes = self
                    .stats
                    .alloc_bytes
                    .saturating_add(key.byte_len() as u64);
                tracing::debug!(
                    id = s.id().0,
                    width = desc.width,
                    height = desc.height,
                    "surface pool allocated"
                );
                self.owned.insert(s.id());
                s
            }
        };

        self.loaned.insert(surface.id());
        self.stats.acquired_total = self.stats.acquired_total.saturating_add(1);
        Ok(surface)
    }

    /// Return a loaned surface.
    ///
    /// `Ok(Some(surface))` means the pool chose not to retain it (a cap was hit) and the caller
    /// must destroy it through the host. Releasing a foreign surface or releasing twice is
    /// reported as a [`PoolMisuseError`] and leaves the pool unchanged.
    pub fn release(&mut self, surface: Surface) -> Result<Option<Surface>, PoolMisuseError> {
        let id = surface.id();
        if !self.owned.contains(&id) {
            return Err(PoolMisuseError::ForeignSurface(id));
        }
        if !self.loaned.remove(&id) {
            return Err(PoolMisuseError::DoubleRelease(id));
        }

        let key = SurfaceKey::from_desc(surface.desc());
        let bytes = key.byte_len();

        if self.opts.max_pool_bytes == 0
            || self.opts.max_surfaces_per_bucket == 0
            || self.stats.retained_bytes.saturating_add(bytes) > self.opts.max_pool_bytes
        {
            return Ok(Some(self.evict(surface)));
        }

        let bi = match self.bucket_idx_by_key.get(&key).copied() {
            Some(i) => i,
            None => {
                let i = self.buckets.len();
                self.buckets.push(Bucket {
                    key,
                    surfaces: Vec::new(),
                });
                self.bucket_idx_by_key.insert(key, i);
                i
            }
        };

        let bucket = &mut self.buckets[bi];
        if bucket.surfaces.len() >= self.opts.max_surfaces_per_bucket {
            return Ok(Some(self.evict(surface)));
        }

        bucket.surfaces.push(surface);
        self.stats.retained_surfaces = self.stats.retained_surfaces.saturating_add(1);
        self.stats.retained_bytes = self.stats.retained_bytes.saturating_add(bytes);
        Ok(None)
    }

    /// Destroy every retained surface and forget all buckets.
    ///
    /// Surfaces currently on loan are unaffected and may still be released afterwards.
    pub fn clear(&mut self, host: &mut dyn RenderHost) {
        let mut destroyed = 0usize;
        for bucket in &mut self.buckets {
            for s in bucket.surfaces.drain(..) {
                self.owned.remove(&s.id());
                host.destroy_surface(s);
                destroyed += 1;
            }
        }
        self.buckets.clear();
        self.bucket_idx_by_key.clear();
        self.stats.retained_surfaces = 0;
        self.stats.retained_bytes = 0;
        if destroyed > 0 {
            tracing::debug!(destroyed, "surface pool cleared");
        }
    }

    /// Number of `(w,h,format)` buckets seen since the last [`SurfacePool::clear`].
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Retained surface count for the bucket matching `desc`.
    pub fn retained_for(&self, desc: SurfaceDesc) -> usize {
        self.bucket_idx_by_key
            .get(&SurfaceKey::from_desc(desc))
            .map(|&bi| {
                debug_assert_eq!(self.buckets[bi].key, SurfaceKey::from_desc(desc));
                self.buckets[bi].surfaces.len()
            })
            .unwrap_or(0)
    }

    fn evict(&mut self, surface: Surface) -> Surface {
        self.owned.remove(&surface.id());
        self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
        tracing::debug!(id = surface.id().0, "surface pool evicted on release");
        surface
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface_pool.rs"]
mod tests;
