use std::path::{Path, PathBuf};

use crate::{
    compose::{
        model::{Background, CompositionSpec, ElementSpec, Placement, TextPlacement, TextSpec},
        source::load_canvas,
        text::TextEngine,
    },
    foundation::{
        core::{Point, Rgb8, Size},
        error::ForgeResult,
    },
    raster::canvas::Canvas,
};

/// Offset that centers an `elem`-long span in a `canvas`-long span, using floor division.
///
/// Negative when the element is larger than the canvas.
pub fn center_offset(canvas: u32, elem: u32) -> i64 {
    (i64::from(canvas) - i64::from(elem)).div_euclid(2)
}

/// Top-left corner for an element of `elem` size.
pub fn element_origin(canvas: Size, elem: Size, placement: Placement) -> Point {
    match placement {
        Placement::Center => Point::new(
            center_offset(canvas.width(), elem.width()),
            center_offset(canvas.height(), elem.height()),
        ),
        Placement::At(p) => p,
    }
}

/// Text origin for a caption measured at `text_width`.
///
/// For [`TextPlacement::CenterAboveBottom`] the vertical position depends only on the canvas
/// height, never on the text content.
pub fn text_origin(canvas: Size, text_width: u32, placement: TextPlacement) -> Point {
    match placement {
        TextPlacement::CenterAboveBottom { offset_px } => Point::new(
            center_offset(canvas.width(), text_width),
            i64::from(canvas.height()) - i64::from(offset_px),
        ),
        TextPlacement::At(p) => p,
    }
}

/// Builds canvases from [`CompositionSpec`]s, resolving sources against an asset root.
pub struct Compositor {
    root: PathBuf,
    text: TextEngine,
}

impl Compositor {
    /// Compositor resolving relative sources against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            text: TextEngine::new(),
        }
    }

    /// Asset root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Compose one canvas of `size`.
    ///
    /// Missing element or background sources fail the composition with `MissingSource`; an
    /// unavailable font does not.
    #[tracing::instrument(skip(self, spec))]
    pub fn compose(&mut self, spec: &CompositionSpec, size: Size) -> ForgeResult<Canvas> {
        let fill = spec.background.fill_color();
        let mut canvas = match &spec.background {
            Background::Solid(c) => Canvas::new(size, *c),
            Background::Image {
                source, resample, ..
            } => load_canvas(&self.root, source, fill, Some((size.into(), *resample)))?,
        };

        for element in &spec.elements {
            self.draw_element(&mut canvas, element, fill)?;
        }
        if let Some(text) = &spec.text {
            self.draw_text(&mut canvas, text);
        }
        Ok(canvas)
    }

    fn draw_element(
        &self,
        canvas: &mut Canvas,
        element: &ElementSpec,
        fill: Rgb8,
    ) -> ForgeResult<()> {
        let resize = element.resize.map(|r| (r.size, r.resample));
        let layer = load_canvas(&self.root, &element.source, fill, resize)?;
        let at = element_origin(canvas.size(), layer.size(), element.placement);
        tracing::debug!(
            source = %element.source,
            x = at.x,
            y = at.y,
            width = layer.width(),
            height = layer.height(),
            "placing element"
        );
        canvas.blit(&layer, at);
        Ok(())
    }

    fn draw_text(&mut self, canvas: &mut Canvas, text: &TextSpec) {
        let prepared = self.text.prepare(text, &self.root);
        let at = text_origin(canvas.size(), prepared.width(), text.placement);
        tracing::debug!(
            width = prepared.width(),
            x = at.x,
            y = at.y,
            builtin = prepared.is_builtin(),
            "placing text"
        );
        prepared.draw(canvas, at);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
