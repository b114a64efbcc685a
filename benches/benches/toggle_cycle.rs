// Copyright 2025 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::rc::Rc;

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use vitrine_dom::{Document, Element, NodeId};
use vitrine_toggle::{Page, PageConfig, ToggleElement};

/// A chain of `depth` nested widgets, each holding `links` focusable links.
fn nested_page(depth: usize, links: usize) -> (Rc<Page>, Vec<NodeId>) {
    let mut doc = Document::new();
    let mut parent = doc.root();
    let mut nodes = Vec::with_capacity(depth);
    for level in 0..depth {
        let node = doc.insert(
            Some(parent),
            Element::new("toggle-element")
                .id(&format!("menu-{level}"))
                .attr("preset", "dialog"),
        );
        for _ in 0..links {
            doc.insert(Some(node), Element::new("a").attr("href", "#"));
        }
        nodes.push(node);
        parent = node;
    }
    let page = Page::new(doc, PageConfig::default());
    page.connect_all().expect("bench fixture is well formed");
    (page, nodes)
}

fn widget(page: &Page, node: NodeId) -> Rc<ToggleElement> {
    page.widget(node).expect("connected")
}

fn bench_open_close(c: &mut Criterion) {
    let mut group = c.benchmark_group("toggle_cycle");
    for &depth in &[1_usize, 4, 16] {
        group.bench_function(format!("open_close_depth_{depth}"), |b| {
            b.iter_batched(
                || nested_page(depth, 8),
                |(page, nodes)| {
                    let leaf = widget(&page, nodes[depth - 1]);
                    let top = widget(&page, nodes[0]);
                    black_box(page.drive(leaf.open()));
                    black_box(page.drive(top.close()));
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_connect(c: &mut Criterion) {
    let mut group = c.benchmark_group("toggle_connect");
    for &width in &[16_usize, 128] {
        group.bench_function(format!("siblings_{width}"), |b| {
            b.iter_batched(
                || {
                    let mut doc = Document::new();
                    let root = doc.root();
                    for i in 0..width {
                        doc.insert(
                            Some(root),
                            Element::new("toggle-element").id(&format!("w{i}")),
                        );
                    }
                    doc
                },
                |doc| {
                    let page = Page::new(doc, PageConfig::default());
                    black_box(page.connect_all().map(|c| c.widgets.len()).ok());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_open_close, bench_connect);
criterion_main!(benches);
