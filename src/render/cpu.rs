use std::collections::HashMap;

use crate::{
    foundation::core::{Surface, SurfaceDesc, SurfaceId},
    foundation::error::{FxError, FxResult},
    foundation::math::{mul_div255_u8, mul_div255_u16},
    render::host::{DrawCall, ProgramHandle, ProgramKind, RenderHost},
    render::shade::{Shader, Texture, shade_into},
};

pub(crate) type PremulRgba8 = [u8; 4];

struct CpuSurface {
    desc: SurfaceDesc,
    data: Vec<u8>,
}

/// Reference host that executes every program natively on premultiplied RGBA8 buffers.
///
/// Surface ids are never reused, so a stale handle fails instead of aliasing a newer surface.
/// Rows are shaded in parallel with rayon. Handy for tests, previews and headless runs.
#[derive(Default)]
pub struct CpuHost {
    programs: Vec<ProgramKind>,
    surfaces: HashMap<SurfaceId, CpuSurface>,
    next_surface: u32,
    draws: u64,
}

impl std::fmt::Debug for CpuHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuHost")
            .field("programs", &self.programs.len())
            .field("live_surfaces", &self.live_surfaces())
            .field("draws", &self.draws)
            .finish()
    }
}

impl CpuHost {
    /// Empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Upload premultiplied RGBA8 pixels into a new caller-owned surface.
    pub fn upload_rgba8_premul(&mut self, width: u32, height: u32, data: &[u8]) -> FxResult<Surface> {
        let desc = SurfaceDesc::rgba8(width, height);
        if data.len() != desc.byte_len() {
            return Err(FxError::validation(format!(
                "expected {} bytes for a {width}x{height} rgba8 surface, got {}",
                desc.byte_len(),
                data.len()
            )));
        }
        Ok(self.insert(desc, data.to_vec()))
    }

    /// Upload a straight-alpha image into a new caller-owned surface.
    pub fn upload_image(&mut self, img: &image::RgbaImage) -> FxResult<Surface> {
        let (w, h) = img.dimensions();
        let mut data = img.as_raw().clone();
        premultiply_rgba8_in_place(&mut data);
        self.upload_rgba8_premul(w, h, &data)
    }

    /// Premultiplied RGBA8 contents of `surface`.
    pub fn read_rgba8(&self, surface: &Surface) -> FxResult<Vec<u8>> {
        Ok(self.get(surface.id())?.data.clone())
    }

    /// Contents of `surface` as a straight-alpha image.
    pub fn to_image(&self, surface: &Surface) -> FxResult<image::RgbaImage> {
        let s = self.get(surface.id())?;
        let mut data = s.data.clone();
        unpremultiply_rgba8_in_place(&mut data);
        image::RgbaImage::from_raw(s.desc.width, s.desc.height, data)
            .ok_or_else(|| FxError::host("surface storage does not match its dimensions"))
    }

    /// Number of draws executed.
    pub fn draw_count(&self) -> u64 {
        self.draws
    }

    /// Surfaces currently allocated.
    pub fn live_surfaces(&self) -> usize {
        self.surfaces.len()
    }

    fn insert(&mut self, desc: SurfaceDesc, data: Vec<u8>) -> Surface {
        let id = SurfaceId(self.next_surface);
        self.next_surface += 1;
        self.surfaces.insert(id, CpuSurface { desc, data });
        Surface::new(id, desc)
    }

    fn get(&self, id: SurfaceId) -> FxResult<&CpuSurface> {
        self.surfaces
            .get(&id)
            .ok_or_else(|| FxError::host(format!("surface {id:?} is not live")))
    }

    fn get_mut(&mut self, id: SurfaceId) -> FxResult<&mut CpuSurface> {
        self.surfaces
            .get_mut(&id)
            .ok_or_else(|| FxError::host(format!("surface {id:?} is not live")))
    }

    fn texture(&self, id: SurfaceId) -> FxResult<Texture<'_>> {
        let s = self.get(id)?;
        Ok(Texture::new(&s.data, s.desc.width, s.desc.height))
    }
}

impl RenderHost for CpuHost {
    fn compile_program(&mut self, kind: ProgramKind) -> FxResult<ProgramHandle> {
        if let Some(idx) = self.programs.iter().position(|k| *k == kind) {
            return Ok(ProgramHandle(idx as u32));
        }
        self.programs.push(kind);
        Ok(ProgramHandle((self.programs.len() - 1) as u32))
    }

    fn create_surface(&mut self, desc: &SurfaceDesc) -> FxResult<Surface> {
        Ok(self.insert(*desc, vec![0u8; desc.byte_len()]))
    }

    fn destroy_surface(&mut self, surface: Surface) {
        self.surfaces.remove(&surface.id());
    }

    fn draw(&mut self, call: &DrawCall<'_>) -> FxResult<()> {
        let kind = self
            .programs
            .get(call.program.0 as usize)
            .copied()
            .ok_or_else(|| FxError::host(format!("unknown program {:?}", call.program)))?;
        let shader = Shader::resolve(kind, call.uniforms)?;

        let out_desc = self.get(call.output.id())?.desc;
        let mut shaded = vec![0u8; out_desc.byte_len()];
        {
            let src = self.texture(call.input.id())?;
            let map = match shader.map_texture() {
                Some(id) => Some(self.texture(id)?),
                None => None,
            };
            shade_into(
                &shader,
                &src,
                map.as_ref(),
                &mut shaded,
                out_desc.width,
                out_desc.height,
            );
        }

        let dst = self.get_mut(call.output.id())?;
        if call.clear {
            dst.data = shaded;
        } else {
            over_in_place(&mut dst.data, &shaded);
        }
        self.draws += 1;
        Ok(())
    }
}

pub(crate) fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        let dc = mul_div255_u16(u16::from(dst[i]), inv);
        out[i] = (u16::from(src[i]) + dc).min(255) as u8;
    }
    out
}

fn over_in_place(dst: &mut [u8], src: &[u8]) {
    debug_assert_eq!(dst.len(), src.len());
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        for c in &mut px[..3] {
            *c = mul_div255_u8(u16::from(*c), a);
        }
    }
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
