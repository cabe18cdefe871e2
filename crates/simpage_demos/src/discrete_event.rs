//! Discrete event simulation: a single-server customer queue.

use simpage::page::{CaptionContext, DrawTag, PageDefinition, SurfaceKind, Variant};

use crate::{float, seed, DemoKind};

fn caption(ctx: &CaptionContext<'_>) -> String {
    format!(
        "Max Time (t): {}, Arrival Rate: {}, Service Mean Time: {}, Service Time StdDev: {}",
        ctx.raw("max_time"),
        ctx.raw("lambda_param"),
        ctx.raw("mean_param"),
        ctx.raw("std_dev_param")
    )
}

pub fn customer_queue() -> PageDefinition {
    let kind = DemoKind::CustomerQueue;
    PageDefinition {
        label: kind.label(),
        title: kind.display_name(),
        export: kind.export(),
        surface: SurfaceKind::Canvas,
        variant: Variant::Stateless,
        draw_tag: DrawTag::None,
        bindings: vec![
            float("max_time", "max_time"),
            float("customer_arrival_lambda", "lambda_param"),
            float("customer_served_mean", "mean_param"),
            float("customer_served_std_dev", "std_dev_param"),
            seed("simulation_seed", "seed"),
        ],
        compartments: None,
        caption,
        typeset: false,
    }
}
