//! Promotional creatives composited from a product packshot.
//!
//! [`compose`] paints the background, drops the fitted packshot with a soft
//! shadow, draws the CTA pill and writes the wrapped copy with the brief's
//! [`CreativeFont`]. Without a font the copy is only laid out; the returned
//! [`CreativeLayout`] always records where each line goes.

use crate::error::{IaGenError, Result};
use ab_glyph::{FontArc, PxScale};
use image::imageops::{self, FilterType};
use image::{Pixel, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use serde::Serialize;
use std::path::Path;

/// Default brand colour (`#E30613`).
pub const DEFAULT_BRAND: [u8; 3] = [0xE3, 0x06, 0x13];
/// Most creatives per batch.
pub const MAX_BATCH: usize = 4;

const GRADIENT_BOTTOM: [u8; 3] = [248, 248, 248];
const SHADOW_PAD: u32 = 30;
const SHADOW_OFFSET: u32 = 15;
const SHADOW_ALPHA: u8 = 120;
const SHADOW_SIGMA: f32 = 10.0;
const LINE_GAP: u32 = 6;
const CTA_FILL: Rgba<u8> = Rgba([255, 255, 255, 230]);
const TEXT_FILL: [u8; 3] = [255, 255, 255];

/// Where DejaVu Sans Bold is usually installed.
const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/local/share/fonts/DejaVuSans-Bold.ttf",
    "/Library/Fonts/DejaVuSans-Bold.ttf",
    "C:\\Windows\\Fonts\\DejaVuSans-Bold.ttf",
];

/// Parses `#RRGGBB` (leading `#` optional).
pub fn hex_to_rgb(hex: &str) -> Result<[u8; 3]> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(IaGenError::InvalidRequest(format!(
            "invalid colour '{hex}' (expected #RRGGBB)"
        )));
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16);
    match (channel(0), channel(2), channel(4)) {
        (Ok(r), Ok(g), Ok(b)) => Ok([r, g, b]),
        _ => Err(IaGenError::InvalidRequest(format!("invalid colour '{hex}'"))),
    }
}

/// Output canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CanvasFormat {
    /// Portrait social feed post, 1080x1350.
    #[default]
    Feed,
    /// Landscape display ad, 1200x628.
    Ads,
}

impl CanvasFormat {
    /// Width and height in pixels.
    pub fn size(&self) -> (u32, u32) {
        match self {
            Self::Feed => (1080, 1350),
            Self::Ads => (1200, 628),
        }
    }
}

impl std::str::FromStr for CanvasFormat {
    type Err = IaGenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "feed" => Ok(Self::Feed),
            "ads" | "ad" => Ok(Self::Ads),
            other => Err(IaGenError::InvalidRequest(format!(
                "unknown format '{other}' (expected feed or ads)"
            ))),
        }
    }
}

/// Canvas fill behind the packshot.
#[derive(Debug, Clone, Default)]
pub enum Background {
    /// Plain white.
    White,
    /// Flat brand colour.
    Solid,
    /// Brand colour at the top fading to light grey at the bottom.
    #[default]
    Gradient,
    /// A photo stretched over the canvas.
    Image(RgbaImage),
}

impl Background {
    /// Looks up a named style. Returns `None` for anything else.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "white" | "blanco" => Some(Self::White),
            "solid" | "sólido" | "solido" => Some(Self::Solid),
            "gradient" | "degradado" => Some(Self::Gradient),
            _ => None,
        }
    }

    /// Loads a background photo from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::Image(image::open(path)?.to_rgba8()))
    }

    /// Paints a `width` x `height` canvas.
    pub fn render(&self, width: u32, height: u32, brand: [u8; 3]) -> RgbaImage {
        match self {
            Self::White => RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255])),
            Self::Solid => RgbaImage::from_pixel(width, height, opaque(brand)),
            Self::Gradient => vertical_gradient(width, height, brand, GRADIENT_BOTTOM),
            Self::Image(photo) => imageops::resize(photo, width, height, FilterType::Lanczos3),
        }
    }
}

fn opaque([r, g, b]: [u8; 3]) -> Rgba<u8> {
    Rgba([r, g, b, 255])
}

fn vertical_gradient(width: u32, height: u32, top: [u8; 3], bottom: [u8; 3]) -> RgbaImage {
    let last = height.saturating_sub(1).max(1) as f32;
    RgbaImage::from_fn(width, height, |_, y| {
        let t = y as f32 / last;
        let mix = |i: usize| ((1.0 - t) * top[i] as f32 + t * bottom[i] as f32) as u8;
        Rgba([mix(0), mix(1), mix(2), 255])
    })
}

/// Largest size fitting in `max_w` x `max_h` that keeps the aspect ratio.
/// Never enlarges.
pub fn thumbnail_size((w, h): (u32, u32), max_w: u32, max_h: u32) -> (u32, u32) {
    if w <= max_w && h <= max_h {
        return (w, h);
    }
    let scale = (max_w as f64 / w as f64).min(max_h as f64 / h as f64);
    let fit = |v: u32, max: u32| ((v as f64 * scale).round() as u32).clamp(1, max.max(1));
    (fit(w, max_w), fit(h, max_h))
}

/// Shrinks the product to fit and puts it over a blurred drop shadow.
///
/// The result is 30 px wider and taller than the fitted product, which sits
/// at the origin with its shadow offset 15 px down and right.
pub fn fit_with_shadow(product: &RgbaImage, max_w: u32, max_h: u32) -> RgbaImage {
    let (w, h) = thumbnail_size(product.dimensions(), max_w, max_h);
    let fitted = if (w, h) == product.dimensions() {
        product.clone()
    } else {
        imageops::resize(product, w, h, FilterType::Lanczos3)
    };

    let shadow = RgbaImage::from_fn(w + SHADOW_PAD, h + SHADOW_PAD, |x, y| {
        let inside = (SHADOW_OFFSET..SHADOW_OFFSET + w).contains(&x)
            && (SHADOW_OFFSET..SHADOW_OFFSET + h).contains(&y);
        Rgba([0, 0, 0, if inside { SHADOW_ALPHA } else { 0 }])
    });
    let mut canvas = imageops::blur(&shadow, SHADOW_SIGMA);
    imageops::overlay(&mut canvas, &fitted, 0, 0);
    canvas
}

/// Measures rendered text width in pixels.
pub trait TextMeasure {
    /// Width of `text` at `font_size` pixels.
    fn width(&self, text: &str, font_size: f32) -> f32;
}

/// Fixed advance per character, a fair estimate for bold sans-serif faces.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxMeasure;

impl ApproxMeasure {
    /// Advance per character as a fraction of the font size.
    pub const CHAR_WIDTH_RATIO: f32 = 0.55;
}

impl TextMeasure for ApproxMeasure {
    fn width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * Self::CHAR_WIDTH_RATIO
    }
}

/// A TrueType/OpenType face for drawing copy.
#[derive(Clone)]
pub struct CreativeFont(FontArc);

impl CreativeFont {
    /// Parses font file contents.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        FontArc::try_from_vec(data)
            .map(Self)
            .map_err(|e| IaGenError::InvalidRequest(format!("unusable font: {e}")))
    }

    /// Loads a `.ttf` or `.otf` file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_bytes(std::fs::read(path)?)
    }

    /// DejaVu Sans Bold from a common system location, if installed.
    pub fn system() -> Option<Self> {
        SYSTEM_FONT_PATHS
            .iter()
            .map(Path::new)
            .filter(|path| path.is_file())
            .find_map(|path| match Self::from_path(path) {
                Ok(font) => {
                    tracing::debug!(path = %path.display(), "loaded system font");
                    Some(font)
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping system font");
                    None
                }
            })
    }
}

impl std::fmt::Debug for CreativeFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CreativeFont")
    }
}

impl TextMeasure for CreativeFont {
    fn width(&self, text: &str, font_size: f32) -> f32 {
        text_size(PxScale::from(font_size), &self.0, text).0 as f32
    }
}

/// Greedy word wrap. A line only exceeds `max_width` when it is a single
/// word that does not fit on its own.
pub fn wrap_lines<M>(text: &str, max_width: f32, font_size: f32, measure: &M) -> Vec<String>
where
    M: TextMeasure + ?Sized,
{
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if measure.width(&candidate, font_size) <= max_width || current.is_empty() {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// What goes on the creative.
#[derive(Debug, Clone)]
pub struct CreativeBrief {
    /// Main claim.
    pub headline: String,
    /// Supporting line.
    pub subheadline: String,
    /// Button label.
    pub cta: String,
    /// Canvas size.
    pub format: CanvasFormat,
    /// Canvas fill.
    pub background: Background,
    /// Brand colour for backgrounds and the CTA label.
    pub brand: [u8; 3],
    /// Face for the copy; without one no text is drawn.
    pub font: Option<CreativeFont>,
}

impl CreativeBrief {
    /// Feed-sized gradient creative in the default brand colour.
    pub fn new(
        headline: impl Into<String>,
        subheadline: impl Into<String>,
        cta: impl Into<String>,
    ) -> Self {
        Self {
            headline: headline.into(),
            subheadline: subheadline.into(),
            cta: cta.into(),
            format: CanvasFormat::default(),
            background: Background::default(),
            brand: DEFAULT_BRAND,
            font: None,
        }
    }

    /// Sets the canvas format.
    pub fn with_format(mut self, format: CanvasFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the background.
    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    /// Sets the brand colour.
    pub fn with_brand(mut self, brand: [u8; 3]) -> Self {
        self.brand = brand;
        self
    }

    /// Sets the font used to measure and draw the copy.
    pub fn with_font(mut self, font: CreativeFont) -> Self {
        self.font = Some(font);
        self
    }
}

/// A positioned line of copy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLine {
    /// Line content.
    pub text: String,
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Font size in pixels.
    pub font_size: u32,
    /// Fill colour.
    pub color: [u8; 3],
}

/// The CTA pill and its centred label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CtaButton {
    /// Label text.
    pub label: String,
    /// Pill left edge.
    pub x: u32,
    /// Pill top edge.
    pub y: u32,
    /// Pill width.
    pub width: u32,
    /// Pill height.
    pub height: u32,
    /// Label left edge, centred horizontally in the pill.
    pub label_x: u32,
    /// Label top edge, centred vertically in the pill.
    pub label_y: u32,
    /// Label font size in pixels.
    pub font_size: u32,
    /// Label colour.
    pub color: [u8; 3],
}

/// Where each piece of copy belongs on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreativeLayout {
    /// Canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
    /// Headline lines.
    pub headline: Vec<TextLine>,
    /// Subheadline lines.
    pub subheadline: Vec<TextLine>,
    /// Call to action.
    pub cta: CtaButton,
}

/// A composited creative.
#[derive(Debug, Clone)]
pub struct Creative {
    /// The finished canvas.
    pub image: RgbaImage,
    /// Where the copy was placed.
    pub layout: CreativeLayout,
}

impl Creative {
    /// Saves the image flattened to RGB; the format follows the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        image::DynamicImage::ImageRgba8(self.image.clone())
            .to_rgb8()
            .save(path)?;
        Ok(())
    }
}

fn pct(value: u32, fraction: f64) -> u32 {
    (value as f64 * fraction) as u32
}

fn place_lines<M>(
    text: &str,
    (x, y): (u32, u32),
    max_width: u32,
    font_size: u32,
    measure: &M,
) -> Vec<TextLine>
where
    M: TextMeasure + ?Sized,
{
    wrap_lines(text, max_width as f32, font_size as f32, measure)
        .into_iter()
        .enumerate()
        .map(|(i, text)| TextLine {
            text,
            x,
            y: y + i as u32 * (font_size + LINE_GAP),
            font_size,
            color: TEXT_FILL,
        })
        .collect()
}

fn draw_line(
    canvas: &mut RgbaImage,
    font: &CreativeFont,
    text: &str,
    (x, y): (u32, u32),
    font_size: u32,
    color: [u8; 3],
) {
    draw_text_mut(
        canvas,
        opaque(color),
        x as i32,
        y as i32,
        PxScale::from(font_size as f32),
        &font.0,
        text,
    );
}

fn fill_rounded_rect(canvas: &mut RgbaImage, (x0, y0): (u32, u32), (w, h): (u32, u32), color: Rgba<u8>) {
    let radius = (h / 2).min(w / 2) as f32;
    let (cw, ch) = canvas.dimensions();
    for y in y0..(y0 + h).min(ch) {
        for x in x0..(x0 + w).min(cw) {
            let lx = (x - x0) as f32 + 0.5;
            let ly = (y - y0) as f32 + 0.5;
            let dx = (radius - lx).max(lx - (w as f32 - radius)).max(0.0);
            let dy = (radius - ly).max(ly - (h as f32 - radius)).max(0.0);
            if dx * dx + dy * dy <= radius * radius {
                canvas.get_pixel_mut(x, y).blend(&color);
            }
        }
    }
}

fn measure_for(brief: &CreativeBrief) -> &dyn TextMeasure {
    match &brief.font {
        Some(font) => font,
        None => &ApproxMeasure,
    }
}

/// Composites one creative from encoded product image bytes.
pub fn compose(product: &[u8], brief: &CreativeBrief) -> Result<Creative> {
    let product = image::load_from_memory(product)?.to_rgba8();
    Ok(compose_image(&product, brief, measure_for(brief)))
}

/// Composites `count` creatives (1 to 4) from one packshot.
pub fn compose_batch(product: &[u8], brief: &CreativeBrief, count: usize) -> Result<Vec<Creative>> {
    if !(1..=MAX_BATCH).contains(&count) {
        return Err(IaGenError::InvalidRequest(format!(
            "creative count must be between 1 and {MAX_BATCH}, got {count}"
        )));
    }
    let product = image::load_from_memory(product)?.to_rgba8();
    let measure = measure_for(brief);
    Ok((0..count)
        .map(|_| compose_image(&product, brief, measure))
        .collect())
}

/// Composites a decoded packshot, wrapping copy with `measure`.
///
/// Text is drawn only when the brief carries a font.
pub fn compose_image<M>(product: &RgbaImage, brief: &CreativeBrief, measure: &M) -> Creative
where
    M: TextMeasure + ?Sized,
{
    let (width, height) = brief.format.size();
    let mut canvas = brief.background.render(width, height, brief.brand);

    let pack = fit_with_shadow(product, pct(width, 0.65), pct(height, 0.55));
    imageops::overlay(
        &mut canvas,
        &pack,
        pct(width, 0.52) as i64,
        pct(height, 0.18) as i64,
    );

    let head_size = pct(height, 0.06);
    let sub_size = pct(height, 0.035);
    let x = pct(width, 0.07);
    let text_w = pct(width, 0.42);
    let mut y = pct(height, 0.18);

    let headline = place_lines(&brief.headline, (x, y), text_w, head_size, measure);
    y += pct(height, 0.16);
    let subheadline = place_lines(&brief.subheadline, (x, y), text_w, sub_size, measure);
    y += pct(height, 0.14);

    let (btn_w, btn_h) = (pct(text_w, 0.75), pct(height, 0.08));
    fill_rounded_rect(&mut canvas, (x, y), (btn_w, btn_h), CTA_FILL);
    let label_w = measure.width(&brief.cta, sub_size as f32);
    let cta = CtaButton {
        label: brief.cta.clone(),
        x,
        y,
        width: btn_w,
        height: btn_h,
        label_x: x + ((btn_w as f32 - label_w).max(0.0) / 2.0) as u32,
        label_y: (y + btn_h / 2).saturating_sub(sub_size / 2),
        font_size: sub_size,
        color: brief.brand,
    };

    if let Some(font) = &brief.font {
        for line in headline.iter().chain(&subheadline) {
            draw_line(&mut canvas, font, &line.text, (line.x, line.y), line.font_size, line.color);
        }
        draw_line(&mut canvas, font, &cta.label, (cta.label_x, cta.label_y), cta.font_size, cta.color);
    }

    tracing::debug!(
        width,
        height,
        lines = headline.len() + subheadline.len(),
        text_drawn = brief.font.is_some(),
        "creative composed"
    );

    Creative {
        image: canvas,
        layout: CreativeLayout {
            width,
            height,
            headline,
            subheadline,
            cta,
        },
    }
}
