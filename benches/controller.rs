//! Criterion benchmarks for the page controller.
//!
//! Run with:
//!   cargo bench
//!
//! Results are saved to target/criterion/

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hashbrown::HashMap;

use simpage::playback::ScheduledTick;
use simpage::prelude::*;

fn numeric_schema(fields: usize) -> (ParamSchema, Vec<String>) {
    let names: Vec<&'static str> = (0..fields)
        .map(|i| &*Box::leak(format!("field_{i}").into_boxed_str()))
        .collect();
    let schema = ParamSchema::new(
        names
            .iter()
            .map(|n| FieldSpec::float(*n).clamped(0.0, 1000.0))
            .collect(),
    );
    (schema, names.iter().map(|n| n.to_string()).collect())
}

/// Binding cost as the field count grows.
fn bench_bind(c: &mut Criterion) {
    let mut group = c.benchmark_group("bind");

    for fields in [4usize, 8, 16, 32].iter() {
        let (schema, names) = numeric_schema(*fields);
        group.throughput(Throughput::Elements(*fields as u64));

        group.bench_with_input(BenchmarkId::new("fallback", fields), fields, |b, _| {
            b.iter(|| {
                let mut builder = schema.builder(CoercionPolicy::Fallback);
                for name in &names {
                    builder = builder.number(name, black_box("123.5")).unwrap();
                }
                black_box(builder.build().unwrap().len())
            });
        });
    }

    group.finish();
}

struct NullSurface;

impl DrawingSurface for NullSurface {
    fn pixel_size(&self) -> (u32, u32) {
        (0, 0)
    }

    fn set_pixel_size(&mut self, _width: u32, _height: u32) {}

    fn to_data_url(&self, _mime: &str) -> Result<String, ModelError> {
        Ok(String::new())
    }
}

struct NullLayout;

impl LayoutTarget for NullLayout {
    fn container_width(&self) -> f64 {
        1200.0
    }

    fn authored_size(&self) -> (f64, f64) {
        (600.0, 400.0)
    }

    fn device_pixel_ratio(&self) -> f64 {
        1.0
    }

    fn apply(&mut self, _spec: &ViewportSpec) {}
}

struct BenchHost {
    controls: HashMap<&'static str, String>,
    layout: NullLayout,
    surface: NullSurface,
}

impl Controls for BenchHost {
    fn control_value(&self, id: &str) -> Option<String> {
        self.controls.get(id).cloned()
    }

    fn set_control_value(&mut self, _id: &str, _value: &str) {}

    fn set_control_max(&mut self, _id: &str, _max: u32) {}
}

impl StatusSink for BenchHost {
    fn set_status(&mut self, text: &str) {
        black_box(text);
    }

    fn set_caption(&mut self, html: &str) {
        black_box(html);
    }
}

impl TickScheduler for BenchHost {
    fn schedule_tick(&mut self, _tick: ScheduledTick) {}

    fn cancel_tick(&mut self, _token: TickToken) {}
}

impl PageHost for BenchHost {
    type Surface = NullSurface;

    fn layout(&mut self) -> &mut dyn LayoutTarget {
        &mut self.layout
    }

    fn surface(&mut self) -> &mut NullSurface {
        &mut self.surface
    }

    fn show_image(&mut self, _data_url: &str) {}

    fn show_playing(&mut self, _playing: bool) {}
}

struct NullModel;

impl ModelFactory<NullSurface> for NullModel {
    type Instance = NoInstance;

    fn draw(
        &mut self,
        _surface: &mut NullSurface,
        tag: Option<&str>,
        params: &ParameterRecord,
    ) -> Result<(), ModelError> {
        black_box((tag, params.len()));
        Ok(())
    }
}

fn caption(ctx: &CaptionContext<'_>) -> String {
    format!(
        "Max Time (t): {}, Initial Pop (N(0)): {}",
        ctx.raw("max_time"),
        ctx.raw("init_pop")
    )
}

fn logistic_page() -> PageDefinition {
    PageDefinition {
        label: "bench_logistic",
        title: "Logistic",
        export: "CDS_LE",
        surface: SurfaceKind::Canvas,
        variant: Variant::Stateless,
        draw_tag: DrawTag::None,
        bindings: vec![
            FieldBinding::control(FieldSpec::float("max_time"), "max_time"),
            FieldBinding::control(FieldSpec::float("initial_population"), "init_pop"),
            FieldBinding::control(FieldSpec::float("birth_rate"), "birth_rate"),
            FieldBinding::control(FieldSpec::float("carrying_capacity"), "carrying_capacity"),
        ],
        compartments: None,
        caption,
        typeset: false,
    }
}

/// One input event end to end, with a model that does no work.
fn bench_input_event(c: &mut Criterion) {
    let controls = [
        ("max_time", "100"),
        ("init_pop", "10"),
        ("birth_rate", "0.5"),
        ("carrying_capacity", "1000"),
    ]
    .into_iter()
    .map(|(k, v)| (k, v.to_string()))
    .collect();
    let host = BenchHost {
        controls,
        layout: NullLayout,
        surface: NullSurface,
    };
    let mut page = PageController::new(
        logistic_page(),
        PageConfig::default(),
        host,
        NullModel,
        MonotonicClock::new(),
    );
    page.mount().unwrap();

    c.bench_function("input_event", |b| {
        b.iter(|| page.on_input(black_box("birth_rate")).unwrap());
    });
}

criterion_group!(benches, bench_bind, bench_input_event);
criterion_main!(benches);
