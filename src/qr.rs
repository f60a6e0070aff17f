//! QR rendering: upload URL in, PNG data URL out.

use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, Rgba, RgbaImage};
use qrcode::{Color, QrCode};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct QrOptions {
    /// Target image width in pixels. Actual output is the nearest multiple
    /// of the module grid at or below this.
    pub width: u32,
    /// Quiet zone around the code, in modules.
    pub margin: u32,
    pub dark: String,
    pub light: String,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            width: 512,
            margin: 2,
            dark: "#ff6b35".to_string(),
            light: "#ffffff".to_string(),
        }
    }
}

/// Encode `text` and render it as a `data:image/png;base64,...` URL.
pub fn data_url(text: &str, opts: &QrOptions) -> AppResult<String> {
    let code = QrCode::new(text.as_bytes())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("qr encode failed: {e}")))?;
    let dark = parse_hex(&opts.dark)?;
    let light = parse_hex(&opts.light)?;

    let modules = code.width() as u32;
    let total = modules + 2 * opts.margin;
    let scale = (opts.width / total).max(1);
    let size = total * scale;

    let mut img = RgbaImage::from_pixel(size, size, light);
    let colors = code.to_colors();
    for y in 0..modules {
        for x in 0..modules {
            if colors[(y * modules + x) as usize] == Color::Dark {
                let x0 = (x + opts.margin) * scale;
                let y0 = (y + opts.margin) * scale;
                for dy in 0..scale {
                    for dx in 0..scale {
                        img.put_pixel(x0 + dx, y0 + dy, dark);
                    }
                }
            }
        }
    }

    let mut png = Cursor::new(Vec::new());
    img.write_to(&mut png, ImageFormat::Png)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("png encode failed: {e}")))?;
    Ok(format!(
        "data:image/png;base64,{}",
        STANDARD.encode(png.into_inner())
    ))
}

fn parse_hex(hex: &str) -> AppResult<Rgba<u8>> {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(AppError::BadRequest(format!("Invalid color: {hex}")));
    }
    let r = u8::from_str_radix(&digits[0..2], 16).map_err(|e| AppError::Internal(e.into()))?;
    let g = u8::from_str_radix(&digits[2..4], 16).map_err(|e| AppError::Internal(e.into()))?;
    let b = u8::from_str_radix(&digits[4..6], 16).map_err(|e| AppError::Internal(e.into()))?;
    Ok(Rgba([r, g, b, 255]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_a_png_data_url() {
        let url = data_url("https://example.com/upload/abc", &QrOptions::default()).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        assert!(url.len() > 100);
    }

    #[test]
    fn custom_colors_change_the_output() {
        let opts = QrOptions {
            dark: "#000000".to_string(),
            light: "#ffffff".to_string(),
            ..QrOptions::default()
        };
        let a = data_url("hello", &QrOptions::default()).unwrap();
        let b = data_url("hello", &opts).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn hex_parsing_accepts_with_and_without_hash() {
        assert_eq!(parse_hex("#ff6b35").unwrap(), Rgba([0xff, 0x6b, 0x35, 255]));
        assert_eq!(parse_hex("ffffff").unwrap(), Rgba([255, 255, 255, 255]));
        assert!(parse_hex("#zzz").is_err());
        assert!(parse_hex("#12345").is_err());
    }
}
