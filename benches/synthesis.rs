use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use protomock::adapters::catalog::SchemaCatalog;
use protomock::adapters::mock_synth::{synthesize, MockSynthesizer};
use protomock::domain::{FieldDef, MessageDef, PackageDef, PackageMap, SchemaFile};

fn flat_message(fields: usize) -> MessageDef {
    let types = ["string", "int32", "uint64", "double", "bool", "bytes"];
    (0..fields).fold(MessageDef::new("Flat"), |message, i| {
        message.with_field(FieldDef::singular(format!("field{}", i), types[i % types.len()]))
    })
}

/// A chain Level0 -> Level1 -> ... where every level also refers to itself.
fn nested_file(depth: usize) -> SchemaFile {
    let mut package = PackageDef::new("bench");
    for level in 0..depth {
        let mut message = MessageDef::new(format!("Level{}", level))
            .with_field(FieldDef::singular("id", "string"))
            .with_field(FieldDef::repeated("tags", "string"))
            .with_field(FieldDef::map("attrs", "string", "int64"))
            .with_field(FieldDef::singular("self", &format!("Level{}", level)));
        if level + 1 < depth {
            message = message.with_field(FieldDef::singular("child", &format!("Level{}", level + 1)));
        }
        package.insert_message(message);
    }
    SchemaFile::new("bench.json", PackageMap::from([("bench".to_string(), package)]))
}

fn benchmark_flat_message(c: &mut Criterion) {
    let message = flat_message(32);
    let file = SchemaFile::new(
        "bench.json",
        PackageMap::from([(
            "bench".to_string(),
            PackageDef::new("bench").with_message(message.clone()),
        )]),
    );

    c.bench_function("flat_message_32_fields", |b| {
        b.iter(|| synthesize(black_box(&message), black_box(&file), "bench"));
    });
}

fn benchmark_nested_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("nested_depth");

    for depth in [1usize, 4, 16] {
        let file = nested_file(depth);
        let root = file.packages["bench"].messages["Level0"].clone();
        group.bench_with_input(BenchmarkId::from_parameter(depth), &file, |b, file| {
            b.iter(|| synthesize(black_box(&root), file, "bench"));
        });
    }

    group.finish();
}

fn benchmark_selected_message(c: &mut Criterion) {
    let mut catalog = SchemaCatalog::new();
    for i in 0..16 {
        let file = nested_file(4);
        catalog.add_file(format!("bench{}.json", i), file.packages);
    }
    let synthesizer = MockSynthesizer::new(&catalog);

    c.bench_function("selected_message_last_file", |b| {
        b.iter(|| {
            synthesizer
                .synthesize_selected(Some("bench15.json"), "bench", black_box("Level0"))
                .unwrap()
        });
    });
}

criterion_group!(
    benches,
    benchmark_flat_message,
    benchmark_nested_depth,
    benchmark_selected_message
);
criterion_main!(benches);
