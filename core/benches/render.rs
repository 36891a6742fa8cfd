//! Render benchmarks: failure-message construction and word wrapping.

use assay::prelude::*;
use assay::{render, word_wrap, TERMINAL_WIDTH};
use assay_model::{Model, Validation, Writer};

fn main() {
    divan::main();
}

fn disproved_trace() -> Trace {
    let mut model = Model::define("Example")
        .attribute("attr")
        .attribute("other")
        .validates(Validation::length("attr").minimum(4))
        .validates(Validation::presence("other"))
        .build();
    let mut matcher = validate_length_of("attr").is_at_least(3);
    let _ = matcher.matches(&mut model);
    matcher.last_trace().cloned().expect("evaluated")
}

fn interference_trace() -> Trace {
    let mut model = Model::define("Example")
        .writer("attr", Writer::AddCharacter)
        .validates(Validation::length("attr").minimum(4))
        .build();
    let mut matcher = validate_length_of("attr").is_at_least(4);
    let _ = matcher.matches(&mut model);
    matcher.last_trace().cloned().expect("evaluated")
}

#[divan::bench]
fn render_message_mismatch(bencher: divan::Bencher) {
    let trace = disproved_trace();
    let options = RenderOptions::default();

    bencher.bench_local(|| render(&trace, Polarity::Positive, &options));
}

#[divan::bench]
fn render_negated(bencher: divan::Bencher) {
    let mut model = Model::define("Example")
        .validates(Validation::length("attr").minimum(4))
        .build();
    let mut matcher = validate_length_of("attr").is_at_least(4);
    let _ = matcher.matches(&mut model);
    let trace = matcher.last_trace().cloned().expect("evaluated");
    let options = RenderOptions::default();

    bencher.bench_local(|| render(&trace, Polarity::Negative, &options));
}

#[divan::bench]
fn render_interference_explanation(bencher: divan::Bencher) {
    let trace = interference_trace();
    let options = RenderOptions::default();

    bencher.bench_local(|| render(&trace, Polarity::Positive, &options));
}

#[divan::bench(args = [40, 72, 120])]
fn render_width(bencher: divan::Bencher, width: usize) {
    let trace = interference_trace();
    let options = RenderOptions { width };

    bencher.bench_local(|| render(&trace, Polarity::Positive, &options));
}

#[divan::bench(args = [1, 10, 100])]
fn word_wrap_paragraphs(bencher: divan::Bencher, n: usize) {
    let paragraph = "After setting :attr to ‹\"xxx\"›, the matcher expected the Example to \
                     be invalid, but it was valid instead.";
    let document = vec![paragraph; n].join("\n\n");

    bencher.bench_local(|| word_wrap(&document, TERMINAL_WIDTH, 2));
}
