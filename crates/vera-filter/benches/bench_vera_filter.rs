use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::seq::SliceRandom;
use vera_filter::{extract, SearchRequest};

fn bench_extraction(c: &mut Criterion) {
    let queries = vec![
        "terrenos en Guanacaste hasta 200 mil",
        "casas en Alajuela bajo 150000",
        "apartamento en san josé con vista precio máximo 2 millones",
        "hola, buscame algo",
        "lote en puntarenas cerca de la playa menos de 80k",
        "busca bodegas industriales en heredia",
    ];

    c.bench_function("extract_1000_mixed", |b| {
        b.iter(|| {
            for _ in 0..166 {
                for q in &queries {
                    black_box(extract(q));
                }
            }
        })
    });

    let mut rng = rand::thread_rng();
    c.bench_function("build_request_random", |b| {
        b.iter(|| {
            let q = queries.choose(&mut rng).unwrap();
            black_box(SearchRequest::build(q, 20));
        })
    });
}

criterion_group!(benches, bench_extraction);
criterion_main!(benches);
