// エンコーダの可用性確認とフォーマット別のエンコードパラメータ

use crate::core::OutputFormat;
use anyhow::{anyhow, Context, Result};
use image::codecs::avif::AvifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::DynamicImage;
use std::collections::HashMap;

/// WebPの圧縮メソッド（6が最も高圧縮）
const WEBP_METHOD: i32 = 6;

/// AVIFエンコード速度（1が最も遅く高品質、10が最速）
const AVIF_SPEED: u8 = 6;

/// 出力フォーマットごとのエンコーダ可用性
///
/// 変換器の生成時に一度だけ調べる。利用できないフォーマットは変換時に
/// 「利用不可」として即座に失敗させる。
#[derive(Debug, Clone)]
pub struct CodecRegistry {
    encoders: HashMap<OutputFormat, bool>,
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::detect()
    }
}

impl CodecRegistry {
    /// このビルドで使えるエンコーダを調べる
    pub fn detect() -> Self {
        let encoders = OutputFormat::ALL
            .into_iter()
            .map(|format| (format, Self::encoder_linked(format)))
            .collect();
        Self { encoders }
    }

    /// 指定フォーマットのみ利用可能なレジストリ（テスト用）
    pub fn with_available(formats: &[OutputFormat]) -> Self {
        let encoders = OutputFormat::ALL
            .into_iter()
            .map(|format| (format, formats.contains(&format)))
            .collect();
        Self { encoders }
    }

    fn encoder_linked(format: OutputFormat) -> bool {
        match format {
            // libwebp を直接リンクしている
            OutputFormat::WebP => true,
            OutputFormat::JpegXl => false,
            other => other
                .image_format()
                .is_some_and(|format| format.writing_enabled()),
        }
    }

    pub fn is_available(&self, format: OutputFormat) -> bool {
        self.encoders.get(&format).copied().unwrap_or(false)
    }

    /// 利用可能なフォーマット一覧（宣言順）
    pub fn available_formats(&self) -> Vec<OutputFormat> {
        OutputFormat::ALL
            .into_iter()
            .filter(|format| self.is_available(*format))
            .collect()
    }
}

/// フォーマット別のエンコードパラメータ
#[derive(Debug, Clone, PartialEq)]
pub enum EncodeParams {
    WebP { quality: f32, lossless: bool, method: i32 },
    Jpeg { quality: u8 },
    JpegXl { quality: u8, lossless: bool },
    Avif { quality: u8, speed: u8 },
    /// PNGは常に可逆。`optimize`で最大圧縮と適応フィルタを使う
    Png { optimize: bool },
}

impl EncodeParams {
    pub fn for_format(format: OutputFormat, quality: u8, lossless: bool) -> Self {
        let quality = quality.min(100);
        match format {
            OutputFormat::WebP => Self::WebP {
                quality: f32::from(quality),
                lossless,
                method: WEBP_METHOD,
            },
            OutputFormat::Jpeg => Self::Jpeg { quality },
            OutputFormat::JpegXl => Self::JpegXl { quality, lossless },
            OutputFormat::Avif => Self::Avif {
                quality,
                speed: AVIF_SPEED,
            },
            OutputFormat::Png => Self::Png { optimize: true },
        }
    }
}

/// 画像をメモリ上でエンコード
pub fn encode(image: &DynamicImage, params: &EncodeParams) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();

    match *params {
        EncodeParams::WebP {
            quality,
            lossless,
            method,
        } => return encode_webp(image, quality, lossless, method),
        EncodeParams::Jpeg { quality } => {
            // JpegEncoderにはハフマン最適化のオプションがないため品質のみ指定
            let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.max(1));
            image
                .write_with_encoder(encoder)
                .context("Failed to encode JPEG")?;
        }
        EncodeParams::JpegXl { .. } => {
            return Err(anyhow!("no JPEG-XL encoder available in this build"));
        }
        EncodeParams::Avif { quality, speed } => {
            let encoder = AvifEncoder::new_with_speed_quality(&mut buffer, speed, quality.max(1));
            let image = to_8bit(image);
            image
                .write_with_encoder(encoder)
                .context("Failed to encode AVIF")?;
        }
        EncodeParams::Png { optimize } => {
            let (compression, filter) = if optimize {
                (CompressionType::Best, FilterType::Adaptive)
            } else {
                (CompressionType::Default, FilterType::Adaptive)
            };
            let encoder = PngEncoder::new_with_quality(&mut buffer, compression, filter);
            image
                .write_with_encoder(encoder)
                .context("Failed to encode PNG")?;
        }
    }

    Ok(buffer)
}

fn encode_webp(image: &DynamicImage, quality: f32, lossless: bool, method: i32) -> Result<Vec<u8>> {
    let image = to_8bit(image);
    let encoder = webp::Encoder::from_image(&image).map_err(|e| anyhow!("Failed to encode WebP: {e}"))?;

    let mut config = webp::WebPConfig::new()
        .map_err(|_| anyhow!("Failed to initialize WebP encoder config"))?;
    config.quality = quality;
    config.method = method;
    config.lossless = i32::from(lossless);

    let memory = encoder
        .encode_advanced(&config)
        .map_err(|e| anyhow!("Failed to encode WebP: {e:?}"))?;

    Ok(memory.to_vec())
}

/// 8bit RGB/RGBAに揃える（WebP・AVIFエンコーダの入力条件）
fn to_8bit(image: &DynamicImage) -> DynamicImage {
    if image.color().has_alpha() {
        DynamicImage::ImageRgba8(image.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(image.to_rgb8())
    }
}
