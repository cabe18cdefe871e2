//! Continuous dynamical systems: ODE models plotted over time.
//!
//! The systems-of-equations pages pass the chosen integration method through
//! as a plain `solver` field.

use simpage::float_fmt::fmt_fixed;
use simpage::page::{
    CaptionContext, CaptionFn, CompartmentControls, DrawTag, FieldBinding, PageDefinition,
    SurfaceKind, Variant,
};
use simpage::params::FieldSpec;
use simpage::simplex::Compartment;

use crate::{choice, float, DemoKind};

fn plot(
    kind: DemoKind,
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
        draw_tag: DrawTag::None,
        bindings,
        compartments: None,
        caption,
        typeset,
    }
}

pub fn radioactive_decay() -> PageDefinition {
    fn caption(ctx: &CaptionContext<'_>) -> String {
        format!(
            "Max Time ($ t $): {}, Initial Pop ($ N(0) $): {}, Decay Rate ($ d $): {}",
            ctx.raw("max_time"),
            ctx.raw("init_pop"),
            ctx.raw("decay_rate")
        )
    }
    plot(
        DemoKind::RadioactiveDecay,
        vec![
            float("max_time", "max_time"),
            float("initial_population", "init_pop"),
            float("decay_rate", "decay_rate"),
        ],
        caption,
        true,
    )
}

pub fn linear_birth() -> PageDefinition {
    fn caption(ctx: &CaptionContext<'_>) -> String {
        format!(
            "Max Time (t): {}, Initial Pop (N(0)): {}, Offsprings (λ): {}, Reproduction Period (σ): {}",
            ctx.raw("max_time"),
            ctx.raw("init_pop"),
            ctx.raw("offsprings"),
            ctx.raw("repr_rate")
        )
    }
    plot(
        DemoKind::ContinuousLinearBirth,
        vec![
            float("max_time", "max_time"),
            float("initial_population", "init_pop"),
            float("offsprings_per_individual", "offsprings"),
            float("reproduction_period", "repr_rate"),
        ],
        caption,
        false,
    )
}

pub fn logistic() -> PageDefinition {
    fn caption(ctx: &CaptionContext<'_>) -> String {
        format!(
            "Max Time (t): {}, Initial Pop (N(0)): {}, Birth Rate (r): {}, Carrying Capacity (K): {}",
            ctx.raw("max_time"),
            ctx.raw("init_pop"),
            ctx.raw("birth_rate"),
            ctx.raw("carrying_capacity")
        )
    }
    plot(
        DemoKind::ContinuousLogistic,
        vec![
            float("max_time", "max_time"),
            float("initial_population", "init_pop"),
            float("birth_rate", "birth_rate"),
            float("carrying_capacity", "carrying_capacity"),
        ],
        caption,
        false,
    )
}

pub fn lotka_volterra() -> PageDefinition {
    fn caption(ctx: &CaptionContext<'_>) -> String {
        format!(
            "Max Time (t): {}, Initial Prey Pop (F(0)): {}, Initial Predator Pop (M(0)): {}, \
             Prey Birth Rate (r): {}, Predator Death Rate (s): {}, Hunting Meetings (a): {}, \
             Hunt Offsprings (b): {}",
            ctx.raw("max_time"),
            ctx.raw("init_prey_pop"),
            ctx.raw("init_predator_pop"),
            ctx.raw("prey_birth_rate"),
            ctx.raw("predator_death_rate"),
            ctx.raw("hunting_meetings"),
            ctx.raw("hunt_offsprings")
        )
    }
    plot(
        DemoKind::ContinuousLotkaVolterra,
        vec![
            choice("solver", "solver"),
            float("max_time", "max_time"),
            float("initial_prey_population", "init_prey_pop"),
            float("initial_predator_population", "init_predator_pop"),
            float("prey_birth_rate", "prey_birth_rate"),
            float("predator_death_rate", "predator_death_rate"),
            float("hunting_meetings", "hunting_meetings"),
            float("hunt_offsprings", "hunt_offsprings"),
        ],
        caption,
        false,
    )
}

fn sir_caption(ctx: &CaptionContext<'_>) -> String {
    format!(
        "Max Time ($ t $): {}, Initial Susceptible Pop ($ S(0) $): {}, \
         Initial Infected Pop ($ I(0) $): {}, Initial Recovered Pop ($ R(0) $): {}<br/>\
         Infection Coefficient ($ \\beta $): {}, Recovery Coefficient ($ \\gamma $): {}, \
         Birth Rate ($ \\mu $): {}, Vaccination Coefficient ($ p $): {}",
        ctx.raw("max_time"),
        fmt_fixed(ctx.field("initial_susceptible_population"), 2),
        fmt_fixed(ctx.field("initial_infected_population"), 2),
        fmt_fixed(ctx.field("initial_recovered_population"), 2),
        ctx.raw("infection_coefficient"),
        ctx.raw("recovery_coefficient"),
        ctx.raw("birth_rate"),
        ctx.raw("vaccination_coefficient")
    )
}

/// SIR with vaccination. The three initial fractions always sum to one; the
/// recovered share has no control of its own.
pub fn sir_vaccination() -> PageDefinition {
    let fraction = |name: &'static str| FieldSpec::float(name).clamped(0.0, 1.0);
    PageDefinition {
        compartments: Some(CompartmentControls {
            susceptible: "init_susceptible_pop",
            infected: "init_infected_pop",
            recovered: None,
        }),
        ..plot(
            DemoKind::SirVaccination,
            vec![
                choice("solver", "solver"),
                float("max_time", "max_time"),
                FieldBinding::compartment(
                    fraction("initial_susceptible_population"),
                    Compartment::Susceptible,
                ),
                FieldBinding::compartment(
                    fraction("initial_infected_population"),
                    Compartment::Infected,
                ),
                FieldBinding::compartment(
                    fraction("initial_recovered_population"),
                    Compartment::Recovered,
                ),
                float("infection_coefficient", "infection_coefficient"),
                float("recovery_coefficient", "recovery_coefficient"),
                float("birth_rate", "birth_rate"),
                float("vaccination_coefficient", "vaccination_coefficient"),
            ],
            sir_caption,
            true,
        )
    }
}

pub fn fish_population() -> PageDefinition {
    fn caption(ctx: &CaptionContext<'_>) -> String {
        format!(
            "Max Time ($ t $): {}, Initial Female Pop ($ F(0) $): {}, \
             Initial Male Pop ($ M(0) $): {},<br/>Birth Rate ($ r $): {}, \
             Carrying Capacity ($ K $): {}, Male Death Rate ($ s $): {}",
            ctx.raw("max_time"),
            ctx.raw("init_female_pop"),
            ctx.raw("init_male_pop"),
            ctx.raw("birth_rate"),
            ctx.raw("carrying_cap"),
            ctx.raw("male_death_rate")
        )
    }
    plot(
        DemoKind::ContinuousFishPopulation,
        vec![
            choice("solver", "solver"),
            float("max_time", "max_time"),
            float("initial_female_population", "init_female_pop"),
            float("initial_male_population", "init_male_pop"),
            float("birth_rate", "birth_rate"),
            float("carrying_capacity", "carrying_cap"),
            float("male_death_rate", "male_death_rate"),
        ],
        caption,
        true,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashbrown::HashMap;
    use simpage::config::CoercionPolicy;

    #[test]
    fn sir_reads_two_fraction_controls() {
        let def = sir_vaccination();
        assert_eq!(
            def.input_controls(),
            vec![
                "solver",
                "max_time",
                "init_susceptible_pop",
                "init_infected_pop",
                "infection_coefficient",
                "recovery_coefficient",
                "birth_rate",
                "vaccination_coefficient",
            ]
        );
    }

    #[test]
    fn sir_caption_prints_bound_fractions() {
        let schema = sir_vaccination().schema();
        let record = schema
            .builder(CoercionPolicy::Fallback)
            .text("solver", "rk4")
            .unwrap()
            .number("max_time", "50")
            .unwrap()
            .number_value("initial_susceptible_population", 0.875)
            .unwrap()
            .number_value("initial_infected_population", 0.1)
            .unwrap()
            .number_value("initial_recovered_population", 0.025)
            .unwrap()
            .number("infection_coefficient", "0.3")
            .unwrap()
            .number("recovery_coefficient", "0.1")
            .unwrap()
            .number("birth_rate", "0")
            .unwrap()
            .number("vaccination_coefficient", "0")
            .unwrap()
            .build()
            .unwrap();
        let values: HashMap<&'static str, String> = [
            ("max_time", "50"),
            ("infection_coefficient", "0.3"),
            ("recovery_coefficient", "0.1"),
            ("birth_rate", "0"),
            ("vaccination_coefficient", "0"),
        ]
        .into_iter()
        .map(|(k, v)| (k, v.to_string()))
        .collect();

        let caption = (sir_vaccination().caption)(&CaptionContext::new(&values, Some(&record), None));
        assert!(caption.starts_with("Max Time ($ t $): 50, Initial Susceptible Pop ($ S(0) $): 0.88"));
        assert!(caption.contains("Initial Recovered Pop ($ R(0) $): 0.03<br/>"));
        assert!(caption.ends_with("Vaccination Coefficient ($ p $): 0"));
    }
}
