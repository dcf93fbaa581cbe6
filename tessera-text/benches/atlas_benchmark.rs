use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tessera_text::{Atlas, CpuPages, FontRaster, PageAllocator};

fn bench_place_16x16(c: &mut Criterion) {
    let coverage = vec![200u8; 16 * 16];

    c.bench_function("place_16x16", |b| {
        let mut alloc = PageAllocator::new(1024, CpuPages::new());
        b.iter(|| {
            // Start over before the page list grows past a few dozen MB.
            if alloc.page_count() == 16 {
                alloc = PageAllocator::new(1024, CpuPages::new());
            }
            alloc
                .place(black_box(16), black_box(16), black_box(&coverage))
                .unwrap()
        });
    });
}

fn bench_cached_query(c: &mut Criterion) {
    let font = tessera_text::fonts::discover_monospace().expect("no system monospace font");
    let mut atlas = Atlas::new(FontRaster::new(font, 24.0), CpuPages::new(), 1024).unwrap();

    // Warm the cache so the loop measures pure hits.
    for ch in ' '..='~' {
        atlas.query(ch).unwrap();
    }

    c.bench_function("cached_query", |b| {
        let mut ch = b'a';
        b.iter(|| {
            ch = if ch == b'z' { b'a' } else { ch + 1 };
            *atlas.query(black_box(ch as char)).unwrap()
        });
    });
}

fn bench_layout_pangram(c: &mut Criterion) {
    let font = tessera_text::fonts::discover_monospace().expect("no system monospace font");
    let mut atlas = Atlas::new(FontRaster::new(font, 24.0), CpuPages::new(), 1024).unwrap();

    let pangram = "The quick brown fox jumps over the lazy dog";

    c.bench_function("layout_pangram", |b| {
        b.iter(|| {
            atlas
                .layout_text(black_box(pangram), 0.0, 24.0, 1.0, 1.0)
                .unwrap()
        });
    });
}

criterion_group!(
    benches,
    bench_place_16x16,
    bench_cached_query,
    bench_layout_pangram,
);
criterion_main!(benches);
