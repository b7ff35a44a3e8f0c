//! Canvas 2D painter
//!
//! Assets are plain `<img>` elements loaded in the background. Until an image
//! has decoded (or when it fails to), its element is drawn as a colored
//! rectangle instead.

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::{Feedback, HudView, Painter, colors, css_color};
use crate::settings::GameOptions;
use crate::sim::{Note, NoteRegistry, NoteType, Rect};

const HUD_FONT: &str = "bold 18px 'Fira Code', monospace";
const NOTE_FONT: &str = "bold 26px 'Fira Code', monospace";
const TITLE_FONT: &str = "bold 36px 'Fira Code', monospace";
const LIFE_ICON_SIZE: f64 = 14.0;

/// Painter bound to one `<canvas>` element
pub struct CanvasPainter {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    background: Option<HtmlImageElement>,
    paddle: Option<HtmlImageElement>,
    /// Keyed by asset path
    note_images: HashMap<String, HtmlImageElement>,
}

impl CanvasPainter {
    /// Attach to the canvas with `canvas_id`, sizing it from the options
    pub fn new(canvas_id: &str, options: &GameOptions, registry: &NoteRegistry) -> Result<Self, JsValue> {
        let doc = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = doc
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no canvas #{}", canvas_id)))?
            .dyn_into()?;
        canvas.set_width(options.canvas_width as u32);
        canvas.set_height(options.canvas_height as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");

        let mut note_images = HashMap::new();
        for asset in registry.types().iter().filter_map(|t| t.asset.as_deref()) {
            if let Some(img) = load_image(asset) {
                note_images.insert(asset.to_string(), img);
            }
        }

        log::info!(
            "Canvas #{} ready ({}x{}, {} note images)",
            canvas_id,
            canvas.width(),
            canvas.height(),
            note_images.len()
        );

        Ok(Self {
            canvas,
            ctx,
            background: options.background_asset.as_deref().and_then(load_image),
            paddle: options.paddle_asset.as_deref().and_then(load_image),
            note_images,
        })
    }

    fn width(&self) -> f64 {
        self.canvas.width() as f64
    }

    fn height(&self) -> f64 {
        self.canvas.height() as f64
    }

    fn fill(&self, color: [f32; 4]) {
        self.ctx.set_fill_style_str(&css_color(color));
    }

    /// Draw `img` over the box if it has decoded; false otherwise
    fn image(&self, img: Option<&HtmlImageElement>, x: f64, y: f64, w: f64, h: f64) -> bool {
        match img {
            Some(img) if is_ready(img) => self
                .ctx
                .draw_image_with_html_image_element_and_dw_and_dh(img, x, y, w, h)
                .is_ok(),
            _ => false,
        }
    }

    fn centered_text(&self, text: &str, font: &str, y: f64) {
        self.ctx.set_font(font);
        self.ctx.set_text_align("center");
        self.ctx.fill_text(text, self.width() / 2.0, y).ok();
    }

    fn dim(&self) {
        self.fill(colors::OVERLAY);
        self.ctx.fill_rect(0.0, 0.0, self.width(), self.height());
    }

    fn life_icons(&self, hud: &HudView) {
        let y = 44.0;
        let step = LIFE_ICON_SIZE + 6.0;
        self.fill(colors::LIFE);
        for i in 0..hud.icons.whole {
            let x = 12.0 + i as f64 * step;
            self.ctx.fill_rect(x, y, LIFE_ICON_SIZE, LIFE_ICON_SIZE);
        }
        if hud.icons.half {
            let x = 12.0 + hud.icons.whole as f64 * step;
            self.ctx.fill_rect(x, y, LIFE_ICON_SIZE / 2.0, LIFE_ICON_SIZE);
        }
    }
}

impl Painter for CanvasPainter {
    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width(), self.height());
    }

    fn background(&mut self) {
        let (w, h) = (self.width(), self.height());
        if !self.image(self.background.as_ref(), 0.0, 0.0, w, h) {
            self.fill(colors::BACKGROUND);
            self.ctx.fill_rect(0.0, 0.0, w, h);
        }
    }

    fn start_overlay(&mut self, player_name: &str) {
        self.dim();
        self.fill(colors::TEXT);
        let mid = self.height() / 2.0;
        self.centered_text("GRADE CATCH", TITLE_FONT, mid - 40.0);
        self.centered_text(player_name, HUD_FONT, mid + 4.0);
        self.centered_text("Press Space or tap to start", HUD_FONT, mid + 36.0);
    }

    fn paddle(&mut self, rect: &Rect, feedback: &Feedback) {
        let alpha = feedback.death_progress.map(|p| 1.0 - p as f64).unwrap_or(1.0);
        let sink = feedback.death_progress.map(|p| p as f64 * 24.0).unwrap_or(0.0);
        let (x, y) = (rect.pos.x as f64, rect.pos.y as f64 + sink);
        let (w, h) = (rect.size.x as f64, rect.size.y as f64);

        self.ctx.set_global_alpha(alpha);
        if !self.image(self.paddle.as_ref(), x, y, w, h) {
            self.fill(colors::PADDLE);
            self.ctx.fill_rect(x, y, w, h);
        }
        if feedback.damage_flash > 0.0 {
            let mut flash = colors::DAMAGE;
            flash[3] = feedback.damage_flash * 0.8;
            self.fill(flash);
            self.ctx.fill_rect(x - 2.0, y - 2.0, w + 4.0, h + 4.0);
        }
        self.ctx.set_global_alpha(1.0);
    }

    fn note(&mut self, note: &Note, note_type: &NoteType) {
        let (x, y) = (note.pos.x as f64, note.pos.y as f64);
        let (w, h) = (note.size.x as f64, note.size.y as f64);
        let img = note_type.asset.as_ref().and_then(|a| self.note_images.get(a));
        if self.image(img, x, y, w, h) {
            return;
        }
        self.fill(note_type.color);
        self.ctx.fill_rect(x, y, w, h);
        self.fill(colors::TEXT);
        self.ctx.set_font(NOTE_FONT);
        self.ctx.set_text_align("center");
        self.ctx.fill_text(&note_type.name, x + w / 2.0, y + h / 2.0).ok();
    }

    fn hud(&mut self, hud: &HudView) {
        self.fill(colors::TEXT);
        self.ctx.set_font(HUD_FONT);
        self.ctx.set_text_align("left");
        self.ctx
            .fill_text(&format!("{}  {}", hud.player_name, hud.score), 12.0, 22.0)
            .ok();
        self.ctx.set_text_align("right");
        self.ctx
            .fill_text(&format!("Level {}", hud.difficulty), self.width() - 12.0, 22.0)
            .ok();
        self.life_icons(hud);
    }

    fn game_over_overlay(&mut self, hud: &HudView) {
        self.dim();
        self.fill(colors::TEXT);
        let mid = self.height() / 2.0;
        self.centered_text("GAME OVER", TITLE_FONT, mid - 24.0);
        self.centered_text(&format!("{}: {}", hud.player_name, hud.score), HUD_FONT, mid + 20.0);
    }
}

fn load_image(src: &str) -> Option<HtmlImageElement> {
    match HtmlImageElement::new() {
        Ok(img) => {
            img.set_src(src);
            Some(img)
        }
        Err(e) => {
            log::warn!("Could not create image for {}: {:?}", src, e);
            None
        }
    }
}

/// Loaded and decodable; broken images report complete with zero width
fn is_ready(img: &HtmlImageElement) -> bool {
    img.complete() && img.natural_width() > 0
}
