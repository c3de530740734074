use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use docsearch::prelude::*;
use docsearch::{autocomplete, engine, query_string};
use std::hint::black_box;
use std::sync::OnceLock;

const SPECIALTIES: [&str; 6] = [
    "Dentist",
    "General Physician",
    "Dermatologist",
    "Paediatrician",
    "Gynaecologist",
    "Homeopath",
];

static CATALOG: OnceLock<Catalog> = OnceLock::new();

// Synthetic catalog shaped like the live endpoint payload
fn get_catalog() -> &'static Catalog {
    CATALOG.get_or_init(|| {
        let doctors: Vec<serde_json::Value> = (0..5_000)
            .map(|i| {
                serde_json::json!({
                    "id": i.to_string(),
                    "name": format!("Dr. Doctor {} {}", i, ["Rao", "Gupta", "Sharma", "Iyer"][i % 4]),
                    "specialities": [
                        {"name": SPECIALTIES[i % SPECIALTIES.len()]},
                        {"name": SPECIALTIES[(i / 7) % SPECIALTIES.len()]}
                    ],
                    "video_consult": i % 2 == 0,
                    "in_clinic": i % 3 != 0,
                    "fees": format!("₹ {}", 100 + (i * 37) % 900),
                    "experience": format!("{} Years of experience", (i * 13) % 40),
                })
            })
            .collect();

        Catalog::from_value(serde_json::Value::Array(doctors), "bench").expect("build catalog")
    })
}

fn benchmark_filter_pipeline(c: &mut Criterion) {
    let catalog = get_catalog();
    let mut group = c.benchmark_group("filter_pipeline");

    let cases = [
        ("default", ""),
        ("search", "?search=rao"),
        ("video_dentist_fees", "?consultationType=Video+Consult&specialties=Dentist&sortBy=fees"),
        ("multi_specialty_experience", "?specialties=Dentist,Homeopath,Dermatologist&sortBy=experience"),
    ];

    for (name, query) in cases {
        let state = query_string::decode(query);
        group.bench_with_input(BenchmarkId::from_parameter(name), &state, |b, state| {
            b.iter(|| engine::apply(black_box(catalog.records()), black_box(state)).len())
        });
    }

    group.finish();
}

fn benchmark_autocomplete(c: &mut Criterion) {
    let catalog = get_catalog();

    c.bench_function("suggest_common_fragment", |b| {
        b.iter(|| autocomplete::suggest(black_box(catalog.records()), black_box("gu")).len())
    });

    c.bench_function("suggest_no_match", |b| {
        b.iter(|| autocomplete::suggest(black_box(catalog.records()), black_box("zzz")).len())
    });
}

fn benchmark_query_string(c: &mut Criterion) {
    let state = FilterState::new()
        .with_search("anita rao")
        .with_consultation(ConsultationType::InClinic)
        .with_specialty("General Physician")
        .with_specialty("Dentist")
        .with_sort(SortBy::Experience);

    c.bench_function("query_string_encode", |b| {
        b.iter(|| query_string::encode(black_box(&state)))
    });

    let encoded = query_string::encode(&state);
    c.bench_function("query_string_decode", |b| {
        b.iter(|| query_string::decode(black_box(&encoded)))
    });
}

criterion_group!(
    benches,
    benchmark_filter_pipeline,
    benchmark_autocomplete,
    benchmark_query_string
);
criterion_main!(benches);
