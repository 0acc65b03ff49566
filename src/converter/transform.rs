// 出力フォーマットに応じた画素変換

use crate::core::OutputFormat;
use image::{DynamicImage, Rgb, RgbImage};

/// 透過部分を白背景に合成する背景色
const BACKGROUND: [u8; 3] = [255, 255, 255];

/// エンコード前の変換。JPEGはアルファを持てないため白背景に合成する。
/// その他のフォーマットはそのまま返す。
pub fn prepare_for(format: OutputFormat, image: DynamicImage) -> DynamicImage {
    match format {
        OutputFormat::Jpeg if image.color().has_alpha() => {
            DynamicImage::ImageRgb8(flatten_onto_white(&image))
        }
        OutputFormat::Jpeg => match image {
            DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => image,
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        },
        _ => image,
    }
}

/// アルファ値を重みとして白背景にブレンドする（元画像と同じサイズ）
pub fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();

    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = u16::from(a);
        let blend = |channel: u8, background: u8| -> u8 {
            let value = u16::from(channel) * alpha + u16::from(background) * (255 - alpha);
            ((value + 127) / 255) as u8
        };
        Rgb([
            blend(r, BACKGROUND[0]),
            blend(g, BACKGROUND[1]),
            blend(b, BACKGROUND[2]),
        ])
    })
}
