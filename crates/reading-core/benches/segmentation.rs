use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use reading_core::{OptionMap, Reading, ReadingFactory};

static PINYIN: &[(&str, &str)] = &[
    ("short", "hànzì"),
    ("medium", "Běijīng shì Zhōngguó de shǒudū"),
    ("long", "Wǒmen xiàwǔ qù Tiān'ānmén, ránhòu zài fàndiàn chī wǎnfàn, zuìhòu huí jiā shuìjiào."),
];

fn bench_decompose(c: &mut Criterion) {
    let factory = ReadingFactory::new();
    let options = OptionMap::new();
    let mut group = c.benchmark_group("segmentation/pinyin");
    for &(label, text) in PINYIN {
        group.bench_with_input(BenchmarkId::new(label, text.len()), &text, |b, &text| {
            b.iter(|| factory.decompose(text, Reading::Pinyin, &options));
        });
    }
    group.finish();
}

fn bench_convert(c: &mut Criterion) {
    let factory = ReadingFactory::new();
    let options = OptionMap::new();
    let mut group = c.benchmark_group("conversion/pinyin-gr");
    for &(label, text) in PINYIN {
        group.bench_with_input(BenchmarkId::new(label, text.len()), &text, |b, &text| {
            b.iter(|| factory.convert(text, Reading::Pinyin, &options, Reading::Gr, &options));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decompose, bench_convert);
criterion_main!(benches);
