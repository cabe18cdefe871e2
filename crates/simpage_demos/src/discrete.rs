//! Discrete dynamical systems. Most pages offer a plot-type selector whose raw
//! value goes to the model as a leading draw argument.

use simpage::float_fmt::fmt_round;
use simpage::page::{
    CaptionContext, CaptionFn, DrawTag, FieldBinding, PageDefinition, SurfaceKind, Variant,
};

use crate::{float, DemoKind};

const PLOT_TYPE: DrawTag = DrawTag::PlotType {
    control: "plot_type",
};

fn plot(
    kind: DemoKind,
    draw_tag: DrawTag,
    bindings: Vec<FieldBinding>,
    caption: CaptionFn,
    typeset: bool,
) -> PageDefinition {
    PageDefinition {
        label: kind.label(),
        title: kind.display_name(),
        export: kind.export(),
        surface: SurfaceKind::Canvas,
        variant: Variant::Stateless,
        draw_tag,
        bindings,
        compartments: None,
        caption,
        typeset,
    }
}

pub fn linear_birth() -> PageDefinition {
    fn caption(ctx: &CaptionContext<'_>) -> String {
        format!(
            "Max Time ($ t $): {}, Time Step ($ \\Delta t $): {}, Initial Pop ($ N(0) $): {}<br/>\
             Offsprings ($ \\lambda $): {}, Reproduction Period ($ \\sigma $): {}",
            ctx.raw("max_time"),
            ctx.raw("step_size"),
            ctx.raw("init_pop"),
            ctx.raw("offsprings"),
            ctx.raw("repr_rate")
        )
    }
    plot(
        DemoKind::DiscreteLinearBirth,
        PLOT_TYPE,
        vec![
            float("max_time", "max_time"),
            float("time_step", "step_size"),
            float("initial_population", "init_pop"),
            float("offsprings_per_individual", "offsprings"),
            float("reproduction_period", "repr_rate"),
        ],
        caption,
        true,
    )
}

fn logistic_caption(ctx: &CaptionContext<'_>) -> String {
    let k = ctx.raw_number("carrying_cap");
    let r = ctx.raw_number("birth_rate");
    format!(
        "Max Time (t): {}, Initial Pop (N(0)): {}, Birth Rate (r): {}, \
         Carrying Capacity (K): {}, Equilibrium Point: {}",
        ctx.raw("max_time"),
        ctx.raw("init_pop"),
        ctx.raw("birth_rate"),
        ctx.raw("carrying_cap"),
        fmt_round(k * (1.0 - 1.0 / r))
    )
}

pub fn logistic() -> PageDefinition {
    plot(
        DemoKind::DiscreteLogistic,
        PLOT_TYPE,
        vec![
            float("max_time", "max_time"),
            float("initial_population", "init_pop"),
            float("birth_rate", "birth_rate"),
            float("carrying_capacity", "carrying_cap"),
        ],
        logistic_caption,
        false,
    )
}

pub fn linear_birth_death() -> PageDefinition {
    fn caption(ctx: &CaptionContext<'_>) -> String {
        format!(
            "Max Time (t): {}, Initial Pop (N(0)): {}, Birth Rate (b): {}, Death Rate (d): {}",
            ctx.raw("max_time"),
            ctx.raw("init_pop"),
            ctx.raw("birth_rate"),
            ctx.raw("death_rate")
        )
    }
    plot(
        DemoKind::LinearBirthDeath,
        PLOT_TYPE,
        vec![
            float("max_time", "max_time"),
            float("initial_population", "init_pop"),
            float("birth_rate", "birth_rate"),
            float("death_rate", "death_rate"),
        ],
        caption,
        false,
    )
}

pub fn linear_birth_migration() -> PageDefinition {
    fn caption(ctx: &CaptionContext<'_>) -> String {
        format!(
            "Max Time (t): {}, Initial Pop (N(0)): {}, Birth-Death Rate (r): {}, \
             Migration Coefficient (m): {}",
            ctx.raw("max_time"),
            ctx.raw("init_pop"),
            ctx.raw("birth_death_rate"),
            ctx.raw("migration_coefficient")
        )
    }
    plot(
        DemoKind::LinearBirthMigration,
        PLOT_TYPE,
        vec![
            float("max_time", "max_time"),
            float("initial_population", "init_pop"),
            float("birth_death_rate", "birth_death_rate"),
            float("migration_coefficient", "migration_coefficient"),
        ],
        caption,
        false,
    )
}

pub fn fish_population() -> PageDefinition {
    fn caption(ctx: &CaptionContext<'_>) -> String {
        format!(
            "Max Time ($ t $): {}, Initial Female Pop ($ F(0) $): {}, \
             Initial Male Pop ($ M(0) $): {},<br/>Birth Rate ($ r $): {}, \
             Male Death Rate ($ s $): {}, Carrying Capacity ($ K $): {}",
            ctx.raw("max_time"),
            ctx.raw("init_female_pop"),
            ctx.raw("init_male_pop"),
            ctx.raw("birth_rate"),
            ctx.raw("male_death_rate"),
            ctx.raw("carrying_cap")
        )
    }
    plot(
        DemoKind::DiscreteFishPopulation,
        DrawTag::None,
        vec![
            float("max_time", "max_time"),
            float("initial_female_population", "init_female_pop"),
            float("initial_male_population", "init_male_pop"),
            float("birth_rate", "birth_rate"),
            float("male_death_rate", "male_death_rate"),
            float("carrying_capacity", "carrying_cap"),
        ],
        caption,
        true,
    )
}
