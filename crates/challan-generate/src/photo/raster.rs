use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use ab_glyph::{FontArc, PxScale};
use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use rand::{Rng, RngCore};
use tracing::warn;

use crate::errors::GenerationError;
use crate::photo::{PhotoMeta, PhotoRenderer, PhotoStyle, RendererBackend};

pub const JPEG_QUALITY: u8 = 75;

const BACKGROUNDS: [[u8; 3]; 4] = [
    [220, 220, 220],
    [200, 180, 160],
    [180, 200, 220],
    [240, 230, 210],
];
const ROAD: Rgb<u8> = Rgb([60, 60, 60]);
const MARKING: Rgb<u8> = Rgb([100, 100, 100]);
const TEXT: Rgb<u8> = Rgb([10, 10, 10]);
const ROAD_SHARE: f64 = 0.45;
const MARKING_HALF_HEIGHT: i32 = 10;
const TEXT_ORIGIN: i32 = 20;
const LINE_GAP: i32 = 8;
const BITMAP_GLYPH: u32 = 8;

enum OverlayFont {
    TrueType(FontArc),
    /// Built-in 8x8 glyphs scaled up to the font size.
    Bitmap,
}

/// Draws a flat road scene with a vehicle block and a metadata overlay.
pub struct RasterRenderer {
    photos_dir: PathBuf,
    style: PhotoStyle,
    font: OverlayFont,
}

impl RasterRenderer {
    pub fn new(photos_dir: &Path, style: PhotoStyle) -> Self {
        let font = load_font(style.font_path.as_deref());
        Self {
            photos_dir: photos_dir.to_path_buf(),
            style,
            font,
        }
    }

    pub fn uses_builtin_font(&self) -> bool {
        matches!(self.font, OverlayFont::Bitmap)
    }

    fn draw_scene(&self, meta: &PhotoMeta<'_>, rng: &mut dyn RngCore) -> RgbImage {
        let (width, height) = (self.style.width, self.style.height);
        let background = BACKGROUNDS[rng.random_range(0..BACKGROUNDS.len())];
        let mut image = RgbImage::from_pixel(width, height, Rgb(background));

        let road_height = ((f64::from(height) * ROAD_SHARE) as u32).max(1);
        let road_top = height.saturating_sub(road_height);
        draw_filled_rect_mut(
            &mut image,
            Rect::at(0, road_top as i32).of_size(width, road_height),
            ROAD,
        );
        draw_filled_rect_mut(
            &mut image,
            Rect::at(0, road_top as i32 - MARKING_HALF_HEIGHT)
                .of_size(width, (MARKING_HALF_HEIGHT * 2) as u32),
            MARKING,
        );

        let car_width = (width / 2).max(1);
        let car_height = ((f64::from(road_height) * 0.4) as u32).max(1);
        let max_x = width.saturating_sub(car_width + 20).max(20);
        let car_x = rng.random_range(20..=max_x);
        let car_y = road_top + rng.random_range(10..=30);
        let car_color = Rgb([
            rng.random_range(30..=200),
            rng.random_range(30..=200),
            rng.random_range(30..=200),
        ]);
        draw_filled_rect_mut(
            &mut image,
            Rect::at(car_x as i32, car_y as i32).of_size(car_width, car_height),
            car_color,
        );

        let step = self.style.font_size as i32 + LINE_GAP;
        let mut y = TEXT_ORIGIN;
        for line in meta.overlay_lines() {
            match &self.font {
                OverlayFont::TrueType(font) => draw_text_mut(
                    &mut image,
                    TEXT,
                    TEXT_ORIGIN,
                    y,
                    PxScale::from(self.style.font_size as f32),
                    font,
                    &line,
                ),
                OverlayFont::Bitmap => {
                    let scale = (self.style.font_size / BITMAP_GLYPH).max(1);
                    draw_bitmap_text(&mut image, TEXT_ORIGIN as u32, y as u32, scale, &line);
                }
            }
            y += step;
        }

        image
    }
}

impl PhotoRenderer for RasterRenderer {
    fn backend(&self) -> RendererBackend {
        RendererBackend::Raster
    }

    fn render(
        &self,
        meta: &PhotoMeta<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<PathBuf, GenerationError> {
        let image = self.draw_scene(meta, rng);
        let path = meta.photo_path(&self.photos_dir);

        let mut writer = BufWriter::new(File::create(&path)?);
        JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY).encode_image(&image)?;
        writer.flush()?;
        Ok(path)
    }
}

/// True when a JPEG can be encoded in this build.
pub fn encoder_available() -> bool {
    let sample = RgbImage::new(1, 1);
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY)
        .encode_image(&sample)
        .is_ok()
}

fn load_font(path: Option<&Path>) -> OverlayFont {
    let Some(path) = path else {
        return OverlayFont::Bitmap;
    };
    let loaded = std::fs::read(path)
        .ok()
        .and_then(|bytes| FontArc::try_from_vec(bytes).ok());
    match loaded {
        Some(font) => OverlayFont::TrueType(font),
        None => {
            warn!(
                event = "font_fallback",
                path = %path.display(),
                "font could not be loaded; using built-in bitmap font"
            );
            OverlayFont::Bitmap
        }
    }
}

fn draw_bitmap_text(image: &mut RgbImage, x: u32, y: u32, scale: u32, text: &str) {
    let (width, height) = image.dimensions();
    let mut cursor = x;
    for ch in text.chars() {
        let glyph = BASIC_FONTS
            .get(ch)
            .or_else(|| BASIC_FONTS.get('?'))
            .unwrap_or([0; 8]);
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..BITMAP_GLYPH {
                if bits & (1 << col) == 0 {
                    continue;
                }
                let left = cursor + col * scale;
                let top = y + row as u32 * scale;
                for py in top..(top + scale).min(height) {
                    for px in left..(left + scale).min(width) {
                        image.put_pixel(px, py, TEXT);
                    }
                }
            }
        }
        cursor += BITMAP_GLYPH * scale;
        if cursor >= width {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn meta() -> PhotoMeta<'static> {
        PhotoMeta {
            id: "0badf00d",
            timestamp: "2024-06-01T12:00:00+00:00",
            plate: "MH12DE1433",
            violation_text: "Illegal parking",
        }
    }

    fn temp_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "challan_raster_{label}_{}",
            uuid::Uuid::new_v4()
        ));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn encoder_check_succeeds_with_jpeg_feature() {
        assert!(encoder_available());
    }

    #[test]
    fn missing_font_falls_back_to_bitmap() {
        let style = PhotoStyle {
            font_path: Some(PathBuf::from("/nonexistent/font.ttf")),
            ..PhotoStyle::default()
        };
        let renderer = RasterRenderer::new(Path::new("."), style);
        assert!(renderer.uses_builtin_font());
    }

    #[test]
    fn renders_jpeg_with_requested_dimensions() {
        let dir = temp_dir("render");
        let style = PhotoStyle {
            width: 320,
            height: 200,
            font_size: 16,
            font_path: None,
        };
        let renderer = RasterRenderer::new(&dir, style);
        let mut rng = ChaCha8Rng::seed_from_u64(8);

        let path = renderer.render(&meta(), &mut rng).expect("render photo");
        assert_eq!(path, meta().photo_path(&dir));

        let bytes = std::fs::read(&path).expect("read jpeg");
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory(&bytes).expect("decode jpeg");
        assert_eq!((decoded.width(), decoded.height()), (320, 200));

        let pixels = decoded.to_rgb8();
        // Left of the vehicle, below the lane marking.
        let road = pixels.get_pixel(5, 195);
        assert!(close_to(road.0, ROAD.0), "road pixel {road:?}");
        // Above the first overlay line.
        let sky = pixels.get_pixel(316, 3);
        assert!(
            BACKGROUNDS.iter().any(|colour| close_to(sky.0, *colour)),
            "background pixel {sky:?}"
        );
    }

    fn close_to(actual: [u8; 3], expected: [u8; 3]) -> bool {
        actual
            .iter()
            .zip(expected)
            .all(|(a, e)| a.abs_diff(e) <= 15)
    }

    #[test]
    fn bitmap_text_marks_pixels() {
        let mut image = RgbImage::from_pixel(64, 16, Rgb([255, 255, 255]));
        draw_bitmap_text(&mut image, 0, 0, 1, "ID");
        assert!(image.pixels().any(|pixel| *pixel == TEXT));
    }
}
