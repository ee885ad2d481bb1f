// Benchmarks for reply extraction and dimension sniffing
// Author: kelexine (https://github.com/kelexine)

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use headshot_forge::extraction::extract_image;
use headshot_forge::imaging::{sniff_dimensions, ImageFormat};
use serde_json::json;

fn png_header(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes
}

fn bench_extraction(c: &mut Criterion) {
    // ~1 MiB image, roughly what the model returns for a portrait
    let mut image = png_header(1024, 1024);
    image.resize(1024 * 1024, 0xAB);
    let encoded = STANDARD.encode(&image);

    let inline_reply = json!({
        "candidates": [{
            "content": { "parts": [
                { "text": "Here is your headshot." },
                { "inlineData": { "mimeType": "image/png", "data": encoded } }
            ]}
        }]
    });

    let nested_reply = json!({
        "candidates": [{ "content": { "parts": [{ "text": "see below" }] } }],
        "metadata": { "outputs": [{ "payload": { "b64_json": encoded } }] }
    });

    let text_reply = json!({
        "candidates": [{ "content": { "parts": [{ "text": "no image today" }] } }]
    });

    c.bench_function("extract_inline_data", |b| {
        b.iter(|| extract_image(black_box(&inline_reply)))
    });
    c.bench_function("extract_nested_base64", |b| {
        b.iter(|| extract_image(black_box(&nested_reply)))
    });
    c.bench_function("extract_miss", |b| {
        b.iter(|| extract_image(black_box(&text_reply)))
    });

    c.bench_function("sniff_png_header", |b| {
        b.iter(|| sniff_dimensions(black_box(&image), ImageFormat::Unknown))
    });
}

criterion_group!(benches, bench_extraction);
criterion_main!(benches);
