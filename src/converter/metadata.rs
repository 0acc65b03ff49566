// メタデータの抽出と再付与

use anyhow::{anyhow, Context, Result};
use image::{DynamicImage, ImageDecoder, ImageReader};
use img_parts::png::{Png, PngChunk};
use img_parts::riff::{RiffChunk, RiffContent};
use img_parts::webp::{WebP, CHUNK_ALPH, CHUNK_EXIF, CHUNK_VP8L, CHUNK_VP8X};
use img_parts::{Bytes, DynImage, ImageEXIF, ImageICC};
use std::io::Cursor;
use std::path::Path;

/// JPEGのAPP1セグメントに付くEXIFヘッダ
const EXIF_HEADER: &[u8] = b"Exif\0\0";

/// 1メートルあたりの単位（pHYs）
const PHYS_UNIT_METER: u8 = 1;

const PNG_CHUNK_EXIF: [u8; 4] = *b"eXIf";
const PNG_CHUNK_IDAT: [u8; 4] = *b"IDAT";

/// VP8Xヘッダのフラグ
const WEBP_FLAG_ALPHA: u8 = 0b0001_0000;
const WEBP_FLAG_EXIF: u8 = 0b0000_1000;

/// VP8Lヘッダのalpha_is_usedビット
const VP8L_ALPHA_BIT: u32 = 1 << 28;

/// 元画像から取り出した補助情報。全て任意項目
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataBag {
    pub exif: Option<Vec<u8>>,
    pub icc_profile: Option<Vec<u8>>,
    /// (水平, 垂直) DPI
    pub dpi: Option<(u32, u32)>,
    pub gamma: Option<f64>,
    /// PNGのtRNSチャンクの内容
    pub transparency: Option<Vec<u8>>,
}

impl MetadataBag {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// 画像をデコードし、変換前のメタデータも合わせて返す
pub fn decode_with_metadata(data: &[u8]) -> Result<(DynamicImage, MetadataBag)> {
    let mut bag = read_container_metadata(data);

    let mut decoder = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .context("Failed to read image header")?
        .into_decoder()
        .context("Failed to open image")?;

    // コンテナから取れなかったものはデコーダから補う
    if bag.exif.is_none() {
        bag.exif = decoder
            .exif_metadata()
            .ok()
            .flatten()
            .map(|exif| strip_exif_header(&exif).to_vec());
    }
    if bag.icc_profile.is_none() {
        bag.icc_profile = decoder.icc_profile().ok().flatten();
    }

    let image = DynamicImage::from_decoder(decoder).context("Failed to decode image")?;
    Ok((image, bag))
}

/// JPEG/PNG/WebPコンテナからEXIF・ICC・PNG補助チャンクを読む
fn read_container_metadata(data: &[u8]) -> MetadataBag {
    let bytes = Bytes::copy_from_slice(data);
    let mut bag = MetadataBag::default();

    if let Ok(Some(container)) = DynImage::from_bytes(bytes.clone()) {
        bag.exif = container.exif().map(|exif| strip_exif_header(&exif).to_vec());
        bag.icc_profile = container.icc_profile().map(|icc| icc.to_vec());
    }

    if let Ok(png) = Png::from_bytes(bytes) {
        bag.dpi = png
            .chunk_by_type(*b"pHYs")
            .and_then(|chunk| parse_phys(chunk.contents()));
        bag.gamma = png
            .chunk_by_type(*b"gAMA")
            .and_then(|chunk| parse_gamma(chunk.contents()));
        bag.transparency = png
            .chunk_by_type(*b"tRNS")
            .map(|chunk| chunk.contents().to_vec());
    }

    bag
}

fn parse_phys(contents: &[u8]) -> Option<(u32, u32)> {
    if contents.len() < 9 || contents[8] != PHYS_UNIT_METER {
        return None;
    }
    let x = u32::from_be_bytes(contents[0..4].try_into().ok()?);
    let y = u32::from_be_bytes(contents[4..8].try_into().ok()?);
    let to_dpi = |ppm: u32| (f64::from(ppm) * 0.0254).round() as u32;
    Some((to_dpi(x), to_dpi(y)))
}

fn parse_gamma(contents: &[u8]) -> Option<f64> {
    let raw = u32::from_be_bytes(contents.get(0..4)?.try_into().ok()?);
    Some(f64::from(raw) / 100_000.0)
}

fn strip_exif_header(exif: &[u8]) -> &[u8] {
    exif.strip_prefix(EXIF_HEADER).unwrap_or(exif)
}

/// 書き出し済みファイルにEXIFを埋め込んで保存し直す
///
/// PNGとWebPには`Exif\0\0`を付けない生のTIFFデータを格納する。
/// JPEG/PNG/WebP以外のコンテナはエラーを返す。呼び出し側で無視してよい。
pub fn apply_exif(output_path: &Path, exif: &[u8]) -> Result<()> {
    let data = std::fs::read(output_path)
        .with_context(|| format!("Failed to read output: {}", output_path.display()))?;

    let mut container = DynImage::from_bytes(Bytes::from(data))
        .context("Failed to parse output container")?
        .ok_or_else(|| anyhow!("container does not support EXIF: {}", output_path.display()))?;

    let raw = Bytes::copy_from_slice(strip_exif_header(exif));
    match &mut container {
        // JPEGのAPP1ヘッダはimg-parts側で付与される
        DynImage::Jpeg(jpeg) => jpeg.set_exif(Some(raw)),
        DynImage::Png(png) => embed_png_exif(png, raw),
        DynImage::WebP(webp) => embed_webp_exif(webp, raw)?,
    }

    let mut buffer = Vec::new();
    container
        .encoder()
        .write_to(&mut buffer)
        .context("Failed to re-encode container")?;
    std::fs::write(output_path, buffer)
        .with_context(|| format!("Failed to write output: {}", output_path.display()))?;

    Ok(())
}

/// eXIfは最初のIDATより前に置く（デコーダはIDAT以降のメタデータを読まない）
fn embed_png_exif(png: &mut Png, exif: Bytes) {
    png.remove_chunks_by_type(PNG_CHUNK_EXIF);

    let chunks = png.chunks_mut();
    let position = chunks
        .iter()
        .position(|chunk| chunk.kind() == PNG_CHUNK_IDAT)
        .unwrap_or(chunks.len().saturating_sub(1));
    chunks.insert(position, PngChunk::new(PNG_CHUNK_EXIF, exif));
}

/// EXIFチャンクを追加し、VP8Xヘッダのフラグを組み直す
fn embed_webp_exif(webp: &mut WebP, exif: Bytes) -> Result<()> {
    let (width, height) = webp
        .dimensions()
        .ok_or_else(|| anyhow!("WebP canvas size unavailable"))?;

    let existing_flags = webp
        .chunk_by_id(CHUNK_VP8X)
        .and_then(|chunk| chunk.content().data())
        .and_then(|data| data.first().copied());
    let mut flags = WEBP_FLAG_EXIF | existing_flags.unwrap_or(0);
    if webp_has_alpha(webp) {
        flags |= WEBP_FLAG_ALPHA;
    }

    let mut header = Vec::with_capacity(10);
    header.extend_from_slice(&[flags, 0, 0, 0]);
    header.extend_from_slice(&(width - 1).to_le_bytes()[..3]);
    header.extend_from_slice(&(height - 1).to_le_bytes()[..3]);

    webp.remove_chunks_by_id(CHUNK_VP8X);
    webp.remove_chunks_by_id(CHUNK_EXIF);
    let chunks = webp.chunks_mut();
    chunks.insert(0, RiffChunk::new(CHUNK_VP8X, RiffContent::Data(Bytes::from(header))));
    chunks.push(RiffChunk::new(CHUNK_EXIF, RiffContent::Data(exif)));

    Ok(())
}

fn webp_has_alpha(webp: &WebP) -> bool {
    if webp.has_chunk(CHUNK_ALPH) {
        return true;
    }
    webp.chunk_by_id(CHUNK_VP8L)
        .and_then(|chunk| chunk.content().data())
        .and_then(|data| data.get(1..5))
        .and_then(|bits| <[u8; 4]>::try_from(bits).ok())
        .is_some_and(|bits| u32::from_le_bytes(bits) & VP8L_ALPHA_BIT != 0)
}
