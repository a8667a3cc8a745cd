use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;

use messi_chat::compose::compose;
use messi_chat::intent::Classifier;
use messi_chat::store::parse_stats_json;
use messi_chat::text::normalize_text;

const STATS_JSON: &str = include_str!("../tests/fixtures/messi_stats.json");

const QUESTIONS: [&str; 8] = [
    "¿Cuántos goles marcaste?",
    "¿Cuántos goles en el Barça?",
    "¿Ganaste el Mundial?",
    "¿Cuántos Balones de Oro tenés?",
    "¿En qué equipos jugaste?",
    "goles con Argentina en 2022",
    "hola",
    "algo que no entiendo",
];

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize_text", |b| {
        b.iter(|| {
            for q in QUESTIONS {
                black_box(normalize_text(black_box(q)));
            }
        })
    });
}

fn bench_classify(c: &mut Criterion) {
    let classifier = Classifier::default();
    c.bench_function("classify", |b| {
        b.iter(|| {
            for q in QUESTIONS {
                black_box(classifier.classify(black_box(q)));
            }
        })
    });
}

fn bench_reply(c: &mut Criterion) {
    let doc = parse_stats_json(STATS_JSON).expect("valid fixture json");
    let today = NaiveDate::from_ymd_opt(2025, 10, 19).expect("valid date");
    let classifier = Classifier::for_document(&doc);
    let mut rng = StdRng::seed_from_u64(11);
    c.bench_function("classify_and_compose", |b| {
        b.iter(|| {
            for q in QUESTIONS {
                let analysis = classifier.classify(black_box(q));
                black_box(compose(&analysis, Some(&doc), today, &mut rng));
            }
        })
    });
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("stats_parse", |b| {
        b.iter(|| {
            let doc = parse_stats_json(black_box(STATS_JSON)).unwrap();
            black_box(doc.teams.len());
        })
    });
}

criterion_group!(benches, bench_normalize, bench_classify, bench_reply, bench_parse);
criterion_main!(benches);
