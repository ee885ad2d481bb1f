// Dimension sniffing and format detection tests
// Author: kelexine (https://github.com/kelexine)

mod common;

use common::{jpeg_bytes, png_bytes, webp_bytes};
use headshot_forge::imaging::{sniff_dimensions, Dimensions, ImageAsset, ImageFormat};
use proptest::prelude::*;

#[test]
fn test_detects_formats_from_magic_bytes() {
    assert_eq!(ImageFormat::detect(&png_bytes(1, 1)), ImageFormat::Png);
    assert_eq!(ImageFormat::detect(&jpeg_bytes(1, 1)), ImageFormat::Jpeg);
    assert_eq!(ImageFormat::detect(&webp_bytes(1, 1)), ImageFormat::WebP);
    assert_eq!(ImageFormat::detect(b"GIF89a"), ImageFormat::Unknown);
}

#[test]
fn test_asset_sniffs_on_construction() {
    let asset = ImageAsset::new(jpeg_bytes(800, 600), ImageFormat::Jpeg);
    assert_eq!(
        asset.dimensions(),
        Some(Dimensions {
            width: 800,
            height: 600
        })
    );
    assert_eq!(asset.mime_type(), "image/jpeg");
}

#[test]
fn test_unknown_hint_tries_every_parser() {
    let dims = sniff_dimensions(&webp_bytes(1920, 1080), ImageFormat::Unknown).unwrap();
    assert_eq!((dims.width, dims.height), (1920, 1080));
}

#[test]
fn test_wrong_hint_yields_none() {
    assert_eq!(sniff_dimensions(&png_bytes(10, 10), ImageFormat::Jpeg), None);
}

#[test]
fn test_jpeg_without_frame_header() {
    // SOI, then straight to SOS
    let bytes = [0xFF, 0xD8, 0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00];
    assert_eq!(sniff_dimensions(&bytes, ImageFormat::Jpeg), None);
}

proptest! {
    #[test]
    fn sniffing_arbitrary_bytes_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        for hint in [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::WebP, ImageFormat::Unknown] {
            let _ = sniff_dimensions(&bytes, hint);
        }
    }

    #[test]
    fn png_dimensions_survive_header(width in 1u32..=100_000, height in 1u32..=100_000) {
        let dims = sniff_dimensions(&png_bytes(width, height), ImageFormat::Png);
        prop_assert_eq!(dims, Some(Dimensions { width, height }));
    }

    #[test]
    fn jpeg_dimensions_survive_header(width in 1u16.., height in 1u16..) {
        let dims = sniff_dimensions(&jpeg_bytes(width, height), ImageFormat::Jpeg);
        prop_assert_eq!(dims, Some(Dimensions { width: width.into(), height: height.into() }));
    }

    #[test]
    fn webp_dimensions_survive_header(width in 1u32..=16_384, height in 1u32..=16_384) {
        let dims = sniff_dimensions(&webp_bytes(width, height), ImageFormat::WebP);
        prop_assert_eq!(dims, Some(Dimensions { width, height }));
    }

    #[test]
    fn truncated_png_is_unknown(width in 1u32.., height in 1u32.., cut in 0usize..24) {
        let bytes = png_bytes(width, height);
        prop_assert_eq!(sniff_dimensions(&bytes[..cut], ImageFormat::Png), None);
    }
}
