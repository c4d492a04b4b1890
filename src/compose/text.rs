use std::path::{Path, PathBuf};

use embedded_graphics::{
    Drawable, Pixel,
    mono_font::{
        MonoFont, MonoTextStyle,
        ascii::{FONT_6X10, FONT_8X13, FONT_10X20},
    },
    pixelcolor::{Rgb888, RgbColor},
    prelude::{DrawTarget, OriginDimensions},
    text::{Baseline, Text, renderer::TextRenderer},
};

use crate::{
    compose::{model::TextSpec, source::normalize_rel_path},
    foundation::{
        core::{Point, Rgb8},
        error::{ForgeError, ForgeResult},
        math::mul_div255_u16,
    },
    raster::canvas::Canvas,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush colour carried through parley layouts.
pub(crate) struct TextBrushRgba8 {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl From<Rgb8> for TextBrushRgba8 {
    fn from(c: Rgb8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: 255,
        }
    }
}

/// Stateful helper that shapes captions from raw font bytes.
pub(crate) struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// A caption ready to be measured and drawn.
pub(crate) enum PreparedText {
    /// Shaped with a real font face and rasterized once.
    Outline(GlyphRaster),
    /// Built-in bitmap face.
    Builtin {
        text: String,
        font: &'static MonoFont<'static>,
        color: Rgb8,
        width: u32,
    },
}

/// Premultiplied RGBA coverage of a shaped caption.
///
/// Pixel `(x, y)` of the raster lands at `origin + (x - pad, y - pad)`; `pad` leaves room
/// for glyphs that overhang the layout box.
pub(crate) struct GlyphRaster {
    data: Vec<u8>,
    width: u32,
    pad: i64,
    /// Inclusive horizontal extent of the inked columns, in raster coordinates.
    ink: Option<(u32, u32)>,
}

impl GlyphRaster {
    /// Width of the inked bounding box.
    fn ink_width(&self) -> u32 {
        self.ink.map_or(0, |(left, right)| right - left + 1)
    }
}

impl TextEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Resolve the requested face and shape `spec.text`.
    ///
    /// Never fails: any problem with the requested face is logged and the built-in bitmap face is
    /// used instead.
    pub(crate) fn prepare(&mut self, spec: &TextSpec, root: &Path) -> PreparedText {
        let Some(source) = spec.font.source.as_deref() else {
            tracing::debug!("no font requested; using built-in face");
            return builtin(spec);
        };
        match self.prepare_outline(spec, source, root) {
            Ok(prepared) => prepared,
            Err(err) => {
                tracing::warn!(font = source, error = %err, "falling back to built-in face");
                builtin(spec)
            }
        }
    }

    fn prepare_outline(
        &mut self,
        spec: &TextSpec,
        source: &str,
        root: &Path,
    ) -> ForgeResult<PreparedText> {
        let path = find_font(root, source)?;
        let bytes = std::fs::read(&path).map_err(|e| {
            ForgeError::font_unavailable(format!("read '{}': {e}", path.display()))
        })?;
        let layout = self
            .layout_plain(&spec.text, &bytes, spec.font.size_px, spec.color.into())
            .map_err(|e| ForgeError::font_unavailable(format!("'{}': {e}", path.display())))?;

        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0);
        let raster = rasterize(&layout, &font, spec.font.size_px)?;
        Ok(PreparedText::Outline(raster))
    }

    /// Shape and lay out a single unwrapped line.
    fn layout_plain(
        &mut self,
        text: &str,
        font_bytes: &[u8],
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> ForgeResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ForgeError::validation("font size_px must be finite and > 0"));
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| ForgeError::validation("no font families in font file"))?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ForgeError::validation("font family has no name"))?
            .to_string();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

impl PreparedText {
    /// Width of the text's bounding box in pixels.
    pub(crate) fn width(&self) -> u32 {
        match self {
            Self::Outline(raster) => raster.ink_width(),
            Self::Builtin { width, .. } => *width,
        }
    }

    /// Whether the built-in face is in use.
    pub(crate) fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin { .. })
    }

    /// Draw with the text box's top-left corner at `origin`. Pixels off the canvas are clipped.
    pub(crate) fn draw(&self, canvas: &mut Canvas, origin: Point) {
        match self {
            Self::Outline(raster) => draw_raster(canvas, raster, origin),
            Self::Builtin {
                text, font, color, ..
            } => draw_builtin(canvas, text, font, *color, origin),
        }
    }
}

/// `source` relative to the asset root, then relative to its `fonts/` directory.
fn find_font(root: &Path, source: &str) -> ForgeResult<PathBuf> {
    let rel = normalize_rel_path(source)?;
    let candidates = [root.join(&rel), root.join("fonts").join(&rel)];
    candidates
        .into_iter()
        .find(|p| p.is_file())
        .ok_or_else(|| {
            ForgeError::font_unavailable(format!(
                "'{source}' not found under '{}'",
                root.display()
            ))
        })
}

fn builtin_font(size_px: f32) -> &'static MonoFont<'static> {
    if size_px >= 20.0 {
        &FONT_10X20
    } else if size_px >= 13.0 {
        &FONT_8X13
    } else {
        &FONT_6X10
    }
}

fn builtin(spec: &TextSpec) -> PreparedText {
    let font = builtin_font(spec.font.size_px);
    let style = MonoTextStyle::new(font, Rgb888::WHITE);
    let metrics = style.measure_string(
        &spec.text,
        embedded_graphics::prelude::Point::zero(),
        Baseline::Top,
    );
    PreparedText::Builtin {
        text: spec.text.clone(),
        font,
        color: spec.color,
        width: metrics.bounding_box.size.width,
    }
}

/// Render `layout` into an offscreen pixmap sized to the caption, not the canvas.
fn rasterize(
    layout: &parley::Layout<TextBrushRgba8>,
    font: &vello_cpu::peniko::FontData,
    size_px: f32,
) -> ForgeResult<GlyphRaster> {
    let pad = size_px.ceil().max(1.0) as u32;
    let extent = |v: f32| -> ForgeResult<u16> {
        let px = v.ceil().max(0.0) as u64 + 2 * u64::from(pad);
        u16::try_from(px)
            .map_err(|_| ForgeError::font_unavailable("caption too large for outline rendering"))
    };
    let width = extent(layout.width())?;
    let height = extent(layout.height())?;

    let mut ctx = vello_cpu::RenderContext::new(width, height);
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((
        f64::from(pad),
        f64::from(pad),
    )));
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };

            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));

            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    ctx.render_to_pixmap(&mut pixmap);
    let data = pixmap.data_as_u8_slice().to_vec();

    let w = u32::from(width);
    let ink = data
        .chunks_exact(4)
        .enumerate()
        .filter(|(_, px)| px[3] != 0)
        .map(|(i, _)| i as u32 % w)
        .fold(None, |acc: Option<(u32, u32)>, x| match acc {
            None => Some((x, x)),
            Some((l, r)) => Some((l.min(x), r.max(x))),
        });

    Ok(GlyphRaster {
        data,
        width: w,
        pad: i64::from(pad),
        ink,
    })
}

fn draw_raster(canvas: &mut Canvas, raster: &GlyphRaster, origin: Point) {
    let w = raster.width as usize;
    for (i, px) in raster.data.chunks_exact(4).enumerate() {
        let a = px[3];
        if a == 0 {
            continue;
        }
        let x = origin.x + (i % w) as i64 - raster.pad;
        let y = origin.y + (i / w) as i64 - raster.pad;
        let Some(dst) = canvas.get(x, y) else {
            continue;
        };
        // Premultiplied src-over onto the opaque canvas.
        let inv = u16::from(255 - a);
        let over = |s: u8, d: u8| (u16::from(s) + mul_div255_u16(u16::from(d), inv)).min(255) as u8;
        canvas.set(
            x,
            y,
            Rgb8::new(over(px[0], dst.r), over(px[1], dst.g), over(px[2], dst.b)),
        );
    }
}

fn draw_builtin(
    canvas: &mut Canvas,
    text: &str,
    font: &'static MonoFont<'static>,
    color: Rgb8,
    origin: Point,
) {
    let clamp = |v: i64| v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
    let style = MonoTextStyle::new(font, Rgb888::new(color.r, color.g, color.b));
    let position = embedded_graphics::prelude::Point::new(clamp(origin.x), clamp(origin.y));
    Text::with_baseline(text, position, style, Baseline::Top)
        .draw(&mut CanvasTarget { canvas })
        .ok();
}

/// `DrawTarget` adapter so embedded-graphics can paint onto a [`Canvas`].
struct CanvasTarget<'a> {
    canvas: &'a mut Canvas,
}

impl OriginDimensions for CanvasTarget<'_> {
    fn size(&self) -> embedded_graphics::prelude::Size {
        embedded_graphics::prelude::Size::new(self.canvas.width(), self.canvas.height())
    }
}

impl DrawTarget for CanvasTarget<'_> {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            self.canvas.set(
                i64::from(coord.x),
                i64::from(coord.y),
                Rgb8::new(color.r(), color.g(), color.b()),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/text.rs"]
mod tests;
