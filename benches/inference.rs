use burn::{
    prelude::*,
    tensor::Distribution,
};
use criterion::{criterion_group, criterion_main, Criterion};
use shl_architectures::{
    domain::shape::InputShape,
    ml::{
        classifier::Classifier, conv_lstm::make_conv_lstm, lstm::make_lstm,
        transformer::make_transformer, CpuBackend, GpuBackend, SequenceClassifier,
    },
};

const SHAPE: InputShape = InputShape { timesteps: 500, features: 3 };
const CLASSES: usize = 9;

fn bench_model<B: Backend, M: SequenceClassifier<B>>(
    c: &mut Criterion,
    group_name: &str,
    model_name: &str,
    classifier: Classifier<B, M>,
) {
    let mut group = c.benchmark_group(group_name);
    group.sample_size(20);
    group.bench_function(model_name, |bench| {
        bench.iter(|| {
            let input = Tensor::<B, 3>::random(
                [1, SHAPE.timesteps, SHAPE.features],
                Distribution::Uniform(-1.0, 1.0),
                classifier.device(),
            );
            classifier.classify_batch(input)
        });
    });
    group.finish()
}

fn bench_on<B: Backend>(c: &mut Criterion, group_name: &str) {
    let device = B::Device::default();
    bench_model(c, group_name, "lstm",
        Classifier::<B, _>::new(make_lstm::<B>(SHAPE, CLASSES, &device), device.clone()));
    bench_model(c, group_name, "conv_lstm",
        Classifier::<B, _>::new(make_conv_lstm::<B>(SHAPE, CLASSES, &device), device.clone()));
    bench_model(c, group_name, "transformer",
        Classifier::<B, _>::new(make_transformer::<B>(SHAPE, CLASSES, &device), device));
}

fn bench_cpu(c: &mut Criterion) {
    bench_on::<CpuBackend>(c, "inference_cpu");
}

// Needs a working adapter, so only runs when SHL_BENCH_GPU is set
fn bench_gpu(c: &mut Criterion) {
    if std::env::var_os("SHL_BENCH_GPU").is_some() {
        bench_on::<GpuBackend>(c, "inference_gpu");
    }
}

criterion_main!(inference);
criterion_group!(inference, bench_cpu, bench_gpu);
