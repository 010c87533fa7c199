//! Frame compositor: turns a timeline time into a finished RGBA frame.
//!
//! Rendering is pure with respect to the timeline model, so preview and
//! export produce identical pixels for the same time.

use std::collections::HashMap;

use animatic_core::{Bitmap, Color, ImageSource, Panel, Rect, Surface, Time};
use animatic_timeline::{KenBurnsTransform, TimelineModel};
use tracing::trace;

use crate::font;
use crate::raster;
use crate::transition::TransitionRegistry;
use crate::watermark::Watermark;

/// Source of decoded panel artwork, keyed by URL.
///
/// The compositor never blocks on loading; a URL the source cannot
/// produce renders as a placeholder frame.
pub trait AssetSource {
    fn bitmap(&self, url: &str) -> Option<Bitmap>;
}

impl AssetSource for HashMap<String, Bitmap> {
    fn bitmap(&self, url: &str) -> Option<Bitmap> {
        self.get(url).cloned()
    }
}

/// Rendering options shared by preview and export.
#[derive(Debug, Clone)]
pub struct CompositorOptions {
    /// Letterbox / empty-timeline background.
    pub background: Color,
    /// Optional overlay stamped on every frame.
    pub watermark: Option<Watermark>,
}

impl Default for CompositorOptions {
    fn default() -> Self {
        Self {
            background: Color::from_rgba8(17, 17, 17, 255),
            watermark: None,
        }
    }
}

/// Stateless frame renderer.
pub struct Compositor {
    options: CompositorOptions,
    registry: TransitionRegistry,
}

impl Compositor {
    pub fn new(options: CompositorOptions) -> Self {
        Self {
            options,
            registry: TransitionRegistry::with_builtins(),
        }
    }

    pub fn options(&self) -> &CompositorOptions {
        &self.options
    }

    /// Render the frame at `time` into `surface`.
    ///
    /// During a transition window both panels are rendered full-frame
    /// and composited; otherwise the active panel draws directly. The
    /// watermark, if any, is stamped last.
    pub fn render_frame(
        &self,
        surface: &mut Surface,
        panels: &[Panel],
        assets: &dyn AssetSource,
        model: &TimelineModel,
        time: Time,
    ) {
        surface.fill(self.options.background);

        if let Some(sample) = model.panel_at_time(time) {
            if let Some(active) = model.transition_state(time) {
                trace!(
                    kind = active.kind.name(),
                    progress = active.progress,
                    "compositing transition"
                );
                let mut from = Surface::with_size(surface.size());
                let mut to = Surface::with_size(surface.size());
                self.render_panel(
                    &mut from,
                    find_panel(panels, active.from_panel),
                    assets,
                    model.ken_burns_transform(active.from_panel, sample.progress),
                );
                // incoming panel enters at the start of its own window
                self.render_panel(
                    &mut to,
                    find_panel(panels, active.to_panel),
                    assets,
                    model.ken_burns_transform(active.to_panel, 0.0),
                );
                match self.registry.find(active.kind) {
                    Some(transition) => {
                        transition.composite(&from, &to, surface, active.progress as f32)
                    }
                    None => raster::copy(surface, &to),
                }
            } else {
                let transform = model.ken_burns_transform(sample.panel_id, sample.progress);
                self.draw_panel_content(
                    surface,
                    find_panel(panels, sample.panel_id),
                    assets,
                    transform,
                );
            }
        }

        if let Some(watermark) = &self.options.watermark {
            watermark.draw(surface);
        }
    }

    /// Render one panel full-frame over the background color.
    fn render_panel(
        &self,
        surface: &mut Surface,
        panel: Option<&Panel>,
        assets: &dyn AssetSource,
        transform: KenBurnsTransform,
    ) {
        surface.fill(self.options.background);
        self.draw_panel_content(surface, panel, assets, transform);
    }

    fn draw_panel_content(
        &self,
        surface: &mut Surface,
        panel: Option<&Panel>,
        assets: &dyn AssetSource,
        transform: KenBurnsTransform,
    ) {
        let Some(panel) = panel else {
            draw_placeholder(surface, "MISSING PANEL");
            return;
        };
        let bitmap = match &panel.image {
            Some(ImageSource::Prerendered(bitmap)) => Some(bitmap.clone()),
            Some(ImageSource::Url(url)) => assets.bitmap(url),
            None => None,
        };
        match bitmap {
            Some(bitmap) => raster::draw_bitmap_fitted(surface, &bitmap, transform),
            None => {
                let label = if panel.label.is_empty() {
                    panel.id.to_string()
                } else {
                    panel.label.clone()
                };
                draw_placeholder(surface, &label);
            }
        }
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(CompositorOptions::default())
    }
}

fn find_panel(panels: &[Panel], id: animatic_core::PanelId) -> Option<&Panel> {
    panels.iter().find(|p| p.id == id)
}

/// Gray placeholder card with a border, crossed diagonals, and the
/// panel label, shown when artwork is missing or still loading.
fn draw_placeholder(surface: &mut Surface, label: &str) {
    let w = surface.width();
    let h = surface.height();
    if w == 0 || h == 0 {
        return;
    }
    let card = Color::from_rgba8(42, 42, 48, 255);
    let line = Color::from_rgba8(90, 90, 100, 255);

    raster::fill_rect(surface, Rect::new(0.0, 0.0, w as f32, h as f32), card);

    let border = (w.min(h) / 64).max(1) as f32;
    raster::fill_rect(surface, Rect::new(0.0, 0.0, w as f32, border), line);
    raster::fill_rect(
        surface,
        Rect::new(0.0, h as f32 - border, w as f32, border),
        line,
    );
    raster::fill_rect(surface, Rect::new(0.0, 0.0, border, h as f32), line);
    raster::fill_rect(
        surface,
        Rect::new(w as f32 - border, 0.0, border, h as f32),
        line,
    );

    let line_rgba = line.to_rgba8();
    let steps = w.max(h);
    for i in 0..=steps {
        let x = (i as u64 * (w.saturating_sub(1)) as u64 / steps.max(1) as u64) as u32;
        let y = (i as u64 * (h.saturating_sub(1)) as u64 / steps.max(1) as u64) as u32;
        surface.put_pixel(x, y, line_rgba);
        surface.put_pixel(w - 1 - x, y, line_rgba);
    }

    let scale = (w.min(h) / 120).max(1);
    let (_, text_h) = font::measure_text(label, scale);
    font::draw_text_centered(
        surface,
        w as i32 / 2,
        (h as i32 - text_h as i32) / 2,
        label,
        scale,
        Color::from_rgba8(200, 200, 210, 255),
    );
}
