use crate::deck::{CardView, RESET_CAPTION, Scene, Scheduler, Stage, Viewport};
use crate::gui::theme::ThemeColors;
use cairo::{Context, LinearGradient};
use cardkit::geom::Bounds;
use cardkit::metrics::{CardStyle, LayoutMetrics};
use cardkit::shadow::BoxShadow;
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use palette::{Srgba, WithAlpha};
use std::f64::consts::PI;
use std::path::Path;

const SHADOW_LAYERS: usize = 8;
const TITLE_FONT_SIZE: f64 = 28.0;
const RESET_FONT_SIZE: f64 = 16.0;
// keeps an edge-on card from collapsing into a degenerate matrix
const MIN_FLIP_SCALE: f64 = 0.02;

pub fn load_logo(path: Option<&Path>) -> Option<Pixbuf> {
    let path = path?;
    Pixbuf::from_file(path)
        .inspect_err(|e| log::warn!("Failed to load logo {}: {}", path.display(), e))
        .ok()
}

fn set_color(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

fn rounded_rect(cr: &Context, x: f64, y: f64, w: f64, h: f64, radius: f64) {
    let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
    cr.new_sub_path();
    cr.arc(x + w - r, y + r, r, -PI / 2.0, 0.0);
    cr.arc(x + w - r, y + h - r, r, 0.0, PI / 2.0);
    cr.arc(x + r, y + h - r, r, PI / 2.0, PI);
    cr.arc(x + r, y + r, r, PI, 3.0 * PI / 2.0);
    cr.close_path();
}

fn vertical_gradient(top: Srgba<f64>, bottom: Srgba<f64>, y0: f64, y1: f64) -> LinearGradient {
    let gradient = LinearGradient::new(0.0, y0, 0.0, y1);
    for (offset, color) in [(0.0, top), (1.0, bottom)] {
        let (r, g, b, a) = color.into_components();
        gradient.add_color_stop_rgba(offset, r, g, b, a);
    }
    gradient
}

/// Draws `text` centred on `(x, baseline)`.
fn centered_text(cr: &Context, text: &str, x: f64, baseline: f64) -> Result<(), cairo::Error> {
    let ext = cr.text_extents(text)?;
    cr.move_to(x - ext.width() / 2.0 - ext.x_bearing(), baseline);
    cr.show_text(text)
}

/// Greedy word wrap against the current font.
fn wrap_lines(cr: &Context, text: &str, max_width: f64) -> Result<Vec<String>, cairo::Error> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if !current.is_empty() && cr.text_extents(&candidate)?.width() > max_width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    Ok(lines)
}

struct CardRenderer<'a> {
    card: &'a CardView<'a>,
    metrics: &'a LayoutMetrics,
    style: CardStyle,
    logo: Option<&'a Pixbuf>,
}

impl<'a> CardRenderer<'a> {
    fn draw(&self, cr: &Context, stage: Stage, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let bounds = stage.card_bounds(self.metrics, &self.card.frame);
        let center = bounds.center();
        let frame = &self.card.frame;
        let tilt = &self.card.tilt;

        cr.save()?;
        cr.translate(center.x, center.y);
        cr.rotate(frame.rotate_deg.to_radians());
        let scale = frame.scale * tilt.scale;
        cr.scale(scale, scale);

        self.draw_shadow(cr, frame.shadow)?;

        // foreshorten along each tilt axis; the flip squashes horizontally
        let sx = tilt.rotate_y.to_radians().cos() * frame.flip_scale().max(MIN_FLIP_SCALE);
        let sy = tilt.rotate_x.to_radians().cos();
        cr.scale(sx, sy);

        if frame.shows_prize() {
            self.draw_prize_face(cr, colors)?;
        } else {
            self.draw_cover(cr, colors)?;
        }
        cr.restore()
    }

    fn card_rect(&self, cr: &Context) {
        let (w, h) = (self.metrics.card_width, self.metrics.card_height);
        rounded_rect(cr, -w / 2.0, -h / 2.0, w, h, self.style.border_radius);
    }

    /// Approximates a CSS box shadow with stacked translucent layers.
    fn draw_shadow(&self, cr: &Context, descriptor: &str) -> Result<(), cairo::Error> {
        let shadow: BoxShadow = match descriptor.parse() {
            Ok(s) => s,
            Err(e) => {
                log::trace!("Skipping shadow: {}", e);
                return Ok(());
            }
        };
        let (w, h) = (self.metrics.card_width, self.metrics.card_height);
        let [r, g, b, a] = shadow.color;
        cr.set_source_rgba(r, g, b, a / SHADOW_LAYERS as f64);

        for layer in 0..SHADOW_LAYERS {
            let t = layer as f64 / SHADOW_LAYERS as f64;
            let grow = shadow.spread + shadow.blur * (1.0 - t) / 2.0;
            let (sw, sh) = (w + 2.0 * grow, h + 2.0 * grow);
            if sw <= 0.0 || sh <= 0.0 {
                continue;
            }
            rounded_rect(
                cr,
                shadow.offset_x - sw / 2.0,
                shadow.offset_y - sh / 2.0,
                sw,
                sh,
                self.style.border_radius + grow.max(0.0),
            );
            cr.fill()?;
        }
        Ok(())
    }

    fn draw_cover(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let (w, h) = (self.metrics.card_width, self.metrics.card_height);
        let style = &self.style;

        self.card_rect(cr);
        cr.set_source(&vertical_gradient(
            colors.card_face,
            colors.card_face_shade,
            -h / 2.0,
            h / 2.0,
        ))?;
        cr.fill_preserve()?;
        set_color(cr, colors.card_border);
        cr.set_line_width(style.border_width);
        cr.stroke()?;

        let emblem_y = -style.content_gap / 2.0;
        set_color(cr, colors.card_border.with_alpha(0.18));
        cr.arc(0.0, emblem_y, style.emblem_outer / 2.0, 0.0, 2.0 * PI);
        cr.fill()?;
        set_color(cr, colors.card_border.with_alpha(0.35));
        cr.arc(0.0, emblem_y, style.emblem_inner / 2.0, 0.0, 2.0 * PI);
        cr.fill()?;
        self.draw_logo(cr, emblem_y, style.emblem_inner * 0.8)?;

        set_color(cr, colors.card_text);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(style.label_font_size());
        let label_width = w - 2.0 * style.horizontal_padding;
        let lines = wrap_lines(cr, self.card.flags.label, label_width)?;
        let line_height = style.label_font_size() * 1.2;
        let mut baseline = h / 2.0 - style.vertical_padding - line_height * (lines.len() as f64 - 1.0);
        for line in &lines {
            centered_text(cr, line, 0.0, baseline)?;
            baseline += line_height;
        }
        Ok(())
    }

    fn draw_prize_face(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let (w, h) = (self.metrics.card_width, self.metrics.card_height);
        let style = &self.style;

        self.card_rect(cr);
        cr.set_source(&vertical_gradient(
            colors.prize_face,
            colors.prize_face_shade,
            -h / 2.0,
            h / 2.0,
        ))?;
        cr.fill_preserve()?;
        set_color(cr, colors.prize_text.with_alpha(0.25));
        cr.set_line_width(style.border_width);
        cr.stroke()?;

        let emblem_y = -h / 2.0 + style.vertical_padding + style.back_emblem / 2.0;
        set_color(cr, colors.prize_text.with_alpha(0.12));
        cr.arc(0.0, emblem_y, style.back_emblem / 2.0, 0.0, 2.0 * PI);
        cr.fill()?;
        self.draw_logo(cr, emblem_y, style.back_logo)?;

        set_color(cr, colors.prize_text);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(style.prize_font_size);
        let lines = wrap_lines(
            cr,
            self.card.slot.prize.as_str(),
            w - 2.0 * style.horizontal_padding,
        )?;
        let line_height = style.prize_font_size * 1.25;
        let mut baseline = emblem_y + style.back_emblem / 2.0 + style.content_gap + style.prize_font_size;
        for line in &lines {
            centered_text(cr, line, 0.0, baseline)?;
            baseline += line_height;
        }
        Ok(())
    }

    /// Fits the logo into a `size` square centred at `(0, y)`.
    fn draw_logo(&self, cr: &Context, y: f64, size: f64) -> Result<(), cairo::Error> {
        let Some(pixbuf) = self.logo else {
            return Ok(());
        };
        let (pw, ph) = (pixbuf.width() as f64, pixbuf.height() as f64);
        if pw <= 0.0 || ph <= 0.0 {
            return Ok(());
        }
        let scale = size / pw.max(ph);

        cr.save()?;
        cr.translate(-pw * scale / 2.0, y - ph * scale / 2.0);
        cr.scale(scale, scale);
        cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
        cr.paint()?;
        cr.restore()
    }
}

pub fn draw<S: Scheduler, V: Viewport>(
    cr: &Context,
    scene: &Scene<S, V>,
    logo: Option<&Pixbuf>,
    colors: &ThemeColors,
    stage: Stage,
) -> Result<(), cairo::Error> {
    set_color(cr, colors.backdrop);
    cr.paint()?;

    let baseline = stage.title_baseline();
    set_color(cr, colors.title);
    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
    cr.set_font_size(TITLE_FONT_SIZE);
    centered_text(cr, &scene.title, baseline.x, baseline.y)?;

    let metrics = scene.deck.metrics();
    let mut cards = scene.cards();
    cards.sort_by_key(|card| (card.frame.z_index, card.index));
    for card in &cards {
        CardRenderer {
            card,
            metrics,
            style: metrics.style(),
            logo,
        }
        .draw(cr, stage, colors)?;
    }

    if scene.deck.reset_visible() {
        draw_reset(cr, stage.reset_bounds(metrics), scene.reset_hovered(), colors)?;
    }
    Ok(())
}

fn draw_reset(
    cr: &Context,
    bounds: Bounds,
    hovered: bool,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let color = if hovered {
        colors.accent_hovered
    } else {
        colors.accent
    };
    set_color(cr, color);
    rounded_rect(
        cr,
        bounds.x,
        bounds.y,
        bounds.width,
        bounds.height,
        bounds.height / 2.0,
    );
    cr.fill()?;

    let center = bounds.center();
    cr.set_source_rgb(1.0, 1.0, 1.0);
    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
    cr.set_font_size(RESET_FONT_SIZE);
    centered_text(cr, RESET_CAPTION, center.x, center.y + RESET_FONT_SIZE / 3.0)
}
