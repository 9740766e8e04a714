// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::Cell;
use std::rc::Rc;

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use understory_dnd::{
    BindOptions, ChangeListener, ComponentRef, DecoratedComponent, Disposable, DragDropBinding,
    DragDropContext, DragDropManager, DragSourceSpec, HandlerCollection, HandlerKey, HandlerMap,
    MonitorMap, Props, bind_handlers, shallow_equal, shallow_equal_scalar,
};

/// Manager whose only state is a drag flag shared with its handler maps.
struct FlagManager {
    dragging: Rc<Cell<bool>>,
}

impl DragDropManager for FlagManager {
    type Monitor = ();
    type HandlerMonitor = bool;

    fn monitor(&self) -> &Self::Monitor {
        &()
    }

    fn create_handler_map<I: Clone + 'static>(
        self: Rc<Self>,
        handlers: HandlerCollection<Self, I>,
        _on_change: ChangeListener,
    ) -> Box<dyn HandlerMap<Self, I>> {
        Box::new(FlagMap {
            dragging: self.dragging.clone(),
            keys: handlers.into_keys().collect(),
        })
    }
}

struct FlagMap {
    dragging: Rc<Cell<bool>>,
    keys: Vec<HandlerKey>,
}

impl<I> HandlerMap<FlagManager, I> for FlagMap {
    fn receive_handlers(&mut self, handlers: HandlerCollection<FlagManager, I>) {
        self.keys = handlers.into_keys().collect();
    }

    fn handler_monitors(&self) -> MonitorMap<bool> {
        let dragging = self.dragging.get();
        self.keys.iter().map(|key| (key.clone(), dragging)).collect()
    }

    fn disposable(&mut self) -> Disposable {
        Disposable::empty()
    }
}

struct Source;

impl DragSourceSpec<FlagManager, ()> for Source {
    fn begin_drag(&self, props: &Props, _: &(), _: Option<()>) -> Props {
        props.clone()
    }
}

struct View;

impl DecoratedComponent for View {
    type Instance = ();

    fn render(&mut self, props: &Props, component_ref: &ComponentRef<()>) {
        black_box(props);
        component_ref.set(Some(()));
    }
}

fn binding(handlers: usize) -> DragDropBinding<FlagManager, ()> {
    bind_handlers::<FlagManager, ()>(
        move |register, _| {
            (0..handlers)
                .map(|i| (format!("source{i}"), register.drag_source("ITEM", Source)))
                .collect()
        },
        |monitors, _| {
            let dragging = monitors.keyed().is_some_and(|map| map.values().any(|d| *d));
            Props::new().with("is_dragging", dragging)
        },
        BindOptions::new().validate_handlers(false),
    )
}

fn props(n: i64) -> Props {
    (0..n).map(|i| (format!("p{i}"), i)).collect()
}

fn bench_props(c: &mut Criterion) {
    let mut group = c.benchmark_group("dnd/props");

    for n in [4_i64, 16] {
        let a = props(n);
        let b = props(n);
        group.bench_function(BenchmarkId::new("shallow_equal", n), |bench| {
            bench.iter(|| black_box(shallow_equal(black_box(&a), black_box(&b))))
        });
        group.bench_function(BenchmarkId::new("shallow_equal_scalar", n), |bench| {
            bench.iter(|| black_box(shallow_equal_scalar(black_box(&a), black_box(&b))))
        });
        let state = Props::new().with("is_dragging", true);
        group.bench_function(BenchmarkId::new("merged", n), |bench| {
            bench.iter(|| black_box(a.merged(&state)))
        });
    }

    group.finish();
}

fn bench_wrapper(c: &mut Criterion) {
    let mut group = c.benchmark_group("dnd/wrapper");

    for handlers in [1_usize, 8] {
        let dragging = Rc::new(Cell::new(false));
        let context = DragDropContext::new(FlagManager {
            dragging: dragging.clone(),
        });
        let wrapper = binding(handlers).decorate::<View>();

        group.bench_function(BenchmarkId::new("mount", handlers), |b| {
            b.iter_batched(
                || props(4),
                |props| black_box(wrapper.mount(View, props, &context)),
                BatchSize::SmallInput,
            )
        });

        let Ok(handler) = wrapper.mount(View, props(4), &context) else {
            panic!("mounting the benchmark view failed");
        };

        group.bench_function(BenchmarkId::new("handle_change/unchanged", handlers), |b| {
            b.iter(|| handler.handle_change())
        });

        group.bench_function(BenchmarkId::new("handle_change/flip", handlers), |b| {
            b.iter(|| {
                dragging.set(!dragging.get());
                handler.handle_change();
            })
        });

        group.bench_function(BenchmarkId::new("receive_props/equal", handlers), |b| {
            b.iter_batched(
                || props(4),
                |props| black_box(handler.receive_props(props)),
                BatchSize::SmallInput,
            )
        });

        let mut generation = 0_i64;
        group.bench_function(BenchmarkId::new("receive_props/changed", handlers), |b| {
            b.iter_batched(
                || {
                    generation += 1;
                    props(4).with("generation", generation)
                },
                |props| black_box(handler.receive_props(props)),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_props, bench_wrapper);
criterion_main!(benches);
