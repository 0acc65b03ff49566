// 統合テスト用のテストデータ生成ヘルパー
#![allow(dead_code)]

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};

/// 単色のRGB PNGを書き出す
pub fn write_png(path: &Path, width: u32, height: u32) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    RgbImage::from_pixel(width, height, Rgb([40, 120, 200]))
        .save(path)
        .unwrap();
    path.to_path_buf()
}

/// 単色のJPEGを書き出す
pub fn write_jpeg(path: &Path, width: u32, height: u32) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    RgbImage::from_pixel(width, height, Rgb([200, 80, 10]))
        .save(path)
        .unwrap();
    path.to_path_buf()
}

/// 左半分が完全透過、右半分が半透明の赤のRGBA PNG
pub fn write_rgba_png(path: &Path) -> PathBuf {
    RgbaImage::from_fn(32, 16, |x, _| {
        if x < 16 {
            Rgba([0, 0, 255, 0])
        } else {
            Rgba([255, 0, 0, 128])
        }
    })
    .save(path)
    .unwrap();
    path.to_path_buf()
}

/// 拡張子だけ画像の壊れたファイル
pub fn write_corrupt(path: &Path) -> PathBuf {
    fs::write(path, b"NOT_AN_IMAGE_AT_ALL").unwrap();
    path.to_path_buf()
}

/// 画像・非画像・隠しディレクトリ・壊れたファイルを含むツリー
///
/// 有効な画像は`photo1.png`、`photo2.jpg`、`nested/deep.png`の3つ。
pub fn setup_image_tree(root: &Path) {
    write_png(&root.join("photo1.png"), 8, 8);
    write_jpeg(&root.join("photo2.jpg"), 8, 8);
    write_png(&root.join("nested").join("deep.png"), 4, 4);
    write_png(&root.join(".cache").join("thumb.png"), 4, 4);
    write_corrupt(&root.join("broken.png"));
    fs::write(root.join("readme.txt"), "not an image").unwrap();
}
