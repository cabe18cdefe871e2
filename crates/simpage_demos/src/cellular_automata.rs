//! Cellular automata pages.
//!
//! The elementary automaton and the traffic model draw once per input. The
//! others are stepped: the model precomputes every generation and the page
//! animates through them.

use simpage::page::{CaptionContext, DrawTag, FieldBinding, PageDefinition, SurfaceKind, Variant};
use simpage::params::FieldSpec;

use crate::{choice, float, integer, seed, DemoKind};

fn page(kind: DemoKind, surface: SurfaceKind, variant: Variant) -> PageDefinition {
    PageDefinition {
        label: kind.label(),
        title: kind.display_name(),
        export: kind.export(),
        surface,
        variant,
        draw_tag: DrawTag::None,
        bindings: Vec::new(),
        compartments: None,
        caption: step_caption,
        typeset: false,
    }
}

fn step_caption(ctx: &CaptionContext<'_>) -> String {
    format!("Current Step: {}", ctx.step())
}

fn grid_caption(ctx: &CaptionContext<'_>) -> String {
    format!(
        "Max Time (t): {}, Grid Size: {}",
        ctx.raw("max_time"),
        ctx.raw("resolution")
    )
}

fn traffic_caption(ctx: &CaptionContext<'_>) -> String {
    format!(
        "Max Time (t): {}, Grid Size: {}, Congestion: {}",
        ctx.raw("max_time"),
        ctx.raw("resolution"),
        ctx.raw("congestion")
    )
}

/// Wolfram rule on a one-dimensional row, drawn as a space-time diagram.
pub fn elementary() -> PageDefinition {
    PageDefinition {
        bindings: vec![
            integer("max_time", "max_time"),
            integer("resolution", "resolution"),
            choice("boundary", "boundary_condition"),
            FieldBinding::control(FieldSpec::integer("rule").clamped(0.0, 255.0), "rule"),
        ],
        caption: grid_caption,
        ..page(DemoKind::ElementaryAutomaton, SurfaceKind::Canvas, Variant::Stateless)
    }
}

pub fn traffic() -> PageDefinition {
    PageDefinition {
        bindings: vec![
            integer("max_time", "max_time"),
            integer("resolution", "resolution"),
            float("congestion", "congestion"),
            choice("boundary", "boundary_condition"),
            seed("seed", "seed"),
        ],
        caption: traffic_caption,
        ..page(DemoKind::TrafficJam, SurfaceKind::Image, Variant::Stateless)
    }
}

/// Breadth-first search through a named maze, one frontier per step.
pub fn maze() -> PageDefinition {
    PageDefinition {
        bindings: vec![choice("maze", "maze")],
        ..page(DemoKind::Maze, SurfaceKind::Image, Variant::Stepped)
    }
}

pub fn game_of_life() -> PageDefinition {
    PageDefinition {
        bindings: vec![choice("state", "state"), integer("max_time", "max_time")],
        ..page(DemoKind::GameOfLife, SurfaceKind::Image, Variant::Stepped)
    }
}

pub fn forest_fire() -> PageDefinition {
    PageDefinition {
        bindings: vec![
            integer("size", "size"),
            FieldBinding::control(
                FieldSpec::float("lightning_probability").clamped(0.0, 1.0),
                "lightning_probability",
            ),
            FieldBinding::control(
                FieldSpec::float("growing_probability").clamped(0.0, 1.0),
                "growing_probability",
            ),
            integer("max_time", "max_time"),
            seed("simulation_seed", "seed"),
        ],
        ..page(DemoKind::ForestFire, SurfaceKind::Image, Variant::Stepped)
    }
}

pub fn sand_hourglass() -> PageDefinition {
    PageDefinition {
        bindings: vec![
            choice("map", "map"),
            integer("max_time", "max_time"),
            FieldBinding::control(
                FieldSpec::float("friction_probability").clamped(0.0, 1.0),
                "friction_probability",
            ),
            seed("simulation_seed", "seed"),
        ],
        ..page(DemoKind::SandHourglass, SurfaceKind::Image, Variant::Stepped)
    }
}
