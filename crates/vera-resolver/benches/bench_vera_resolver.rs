use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vera_core::Turn;
use vera_resolver::ReferenceResolver;
use vera_session::ConversationState;

fn bench_resolution(c: &mut Criterion) {
    let resolver = ReferenceResolver::new("bienesadjudicadoscr.com");
    let state = ConversationState::new();
    let window = vec![
        Turn::user("casas en cartago".into()),
        Turn::assistant(
            "1. Casa A https://bienesadjudicadoscr.com/propiedades/a-1\n\
             2. Casa B https://bienesadjudicadoscr.com/propiedades/b-2\n\
             3. Casa C https://bienesadjudicadoscr.com/propiedades/c-3"
                .to_string(),
        ),
    ];

    let messages = [
        "dime más de la segunda",
        "info de #3",
        "a que banco pertenece?",
        "casas en Alajuela bajo 150000",
        "hola buenas tardes",
    ];

    c.bench_function("resolve_1000_mixed", |b| {
        b.iter(|| {
            for _ in 0..200 {
                for m in &messages {
                    black_box(resolver.resolve(m, &state, &window));
                }
            }
        })
    });
}

criterion_group!(benches, bench_resolution);
criterion_main!(benches);
