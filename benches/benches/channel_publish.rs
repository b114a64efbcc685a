// Copyright 2025 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::Cell;
use std::rc::Rc;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use vitrine_channel::{Channel, Message, Subscription, ToggleTarget, Topic};

fn subscribed(n: usize) -> (Channel, Vec<Subscription>, Rc<Cell<u64>>) {
    let channel = Channel::new();
    let hits = Rc::new(Cell::new(0_u64));
    let subs = (0..n)
        .map(|i| {
            let hits = hits.clone();
            let topic = Topic::ALL[i % Topic::ALL.len()];
            channel.subscribe(topic, move |msg| {
                if msg.target().is_some() {
                    hits.set(hits.get() + 1);
                }
            })
        })
        .collect();
    (channel, subs, hits)
}

fn bench_publish(c: &mut Criterion) {
    let mut group = c.benchmark_group("channel_publish");
    for &n in &[8_usize, 64, 512] {
        let (channel, _subs, hits) = subscribed(n);
        let msg = Message::Open(ToggleTarget::new("cart-drawer"));
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("open_{n}_subscribers"), |b| {
            b.iter(|| black_box(channel.publish(black_box(&msg))));
        });
        black_box(hits.get());
    }
    group.finish();
}

fn bench_subscribe_unsubscribe(c: &mut Criterion) {
    let mut group = c.benchmark_group("channel_subscriptions");
    for &n in &[64_usize, 512] {
        group.bench_function(format!("churn_{n}"), |b| {
            b.iter_batched(
                || subscribed(n),
                |(channel, subs, _)| {
                    for sub in subs.iter().step_by(2) {
                        sub.unsubscribe();
                    }
                    black_box(channel.publish(&Message::EscapeKey));
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_publish, bench_subscribe_unsubscribe);
criterion_main!(benches);
