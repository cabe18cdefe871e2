//! Multiset rewriting: the water frog (L-E complex) population model.

use simpage::page::{CaptionContext, DrawTag, PageDefinition, SurfaceKind, Variant};

use crate::{float, integer, seed, DemoKind};

fn caption(ctx: &CaptionContext<'_>) -> String {
    format!(
        "Max Time (t): {}, Init Lessonae: {}, Init Hybrids: {}, Init Ridibundus: {}, \
         Carrying Capacity: {}, Selection Strength: {}",
        ctx.raw("max_time"),
        ctx.raw("init_lessonae"),
        ctx.raw("init_hybrid"),
        ctx.raw("init_ridibundus"),
        ctx.raw("carrying_capacity"),
        ctx.raw("selection_strength")
    )
}

pub fn frog_population() -> PageDefinition {
    let kind = DemoKind::FrogPopulation;
    PageDefinition {
        label: kind.label(),
        title: kind.display_name(),
        export: kind.export(),
        surface: SurfaceKind::Canvas,
        variant: Variant::Stateless,
        draw_tag: DrawTag::None,
        bindings: vec![
            float("max_time", "max_time"),
            integer("initial_lessonae_pop", "init_lessonae"),
            integer("initial_hybrid_pop", "init_hybrid"),
            integer("initial_ridibundus_pop", "init_ridibundus"),
            integer("carrying_capacity", "carrying_capacity"),
            float("selection_strength", "selection_strength"),
            seed("simulation_seed", "seed"),
        ],
        compartments: None,
        caption,
        typeset: false,
    }
}
