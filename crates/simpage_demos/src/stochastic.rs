//! Stochastic simulation pages. A solver selector chooses between Gillespie's
//! SSA (seeded) and a deterministic ODE method; each branch sets only its own
//! leading field.

use simpage::page::{
    CaptionContext, CaptionFn, DrawTag, FieldBinding, PageDefinition, SurfaceKind, Variant,
};
use simpage::params::FieldSpec;
use simpage::render::SolverBranch;

use crate::{float, integer, DemoKind};

fn solver_fields() -> [FieldBinding; 2] {
    [
        FieldBinding::control(
            FieldSpec::seed("ssa_seed").only_for(SolverBranch::Stochastic),
            "seed",
        ),
        FieldBinding::control(
            FieldSpec::enumerated("solver").only_for(SolverBranch::Ode),
            "solver",
        ),
    ]
}

fn plot(
    kind: DemoKind,
    fields: Vec<FieldBinding>,
    caption: CaptionFn,
    typeset: bool,
) -> PageDefinition {
    let mut bindings = solver_fields().to_vec();
    bindings.extend(fields);
    PageDefinition {
        label: kind.label(),
        title: kind.display_name(),
        export: kind.export(),
        surface: SurfaceKind::Canvas,
        variant: Variant::Stateless,
        draw_tag: DrawTag::Solver { control: "solver" },
        bindings,
        compartments: None,
        caption,
        typeset,
    }
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
        DemoKind::StochasticLotkaVolterra,
        vec![
            float("max_time", "max_time"),
            integer("initial_prey_population", "init_prey_pop"),
            integer("initial_predator_population", "init_predator_pop"),
            float("prey_birth_rate", "prey_birth_rate"),
            float("predator_death_rate", "predator_death_rate"),
            float("hunting_meetings", "hunting_meetings"),
            integer("hunt_offsprings", "hunt_offsprings"),
        ],
        caption,
        false,
    )
}

pub fn enzymatic_activity() -> PageDefinition {
    fn caption(ctx: &CaptionContext<'_>) -> String {
        format!(
            "Max Time (t): {}, Initial Enzyme (E(0)): {}, Initial Reactant (S(0)): {}, \
             Binding Coefficient (b): {}, Unbinding Coefficient (ub): {}, \
             Catalysis Coefficient (c): {}",
            ctx.raw("max_time"),
            ctx.raw("init_enzyme"),
            ctx.raw("init_reactant"),
            ctx.raw("binding_coeff"),
            ctx.raw("unbinding_coeff"),
            ctx.raw("catalysis_coeff")
        )
    }
    plot(
        DemoKind::EnzymaticActivity,
        vec![
            float("max_time", "max_time"),
            integer("initial_enzyme", "init_enzyme"),
            integer("initial_reactant", "init_reactant"),
            float("binding_rate", "binding_coeff"),
            float("unbinding_rate", "unbinding_coeff"),
            float("catalysis_rate", "catalysis_coeff"),
        ],
        caption,
        false,
    )
}

/// Three-gene repressor loop. Only the initial state is user-editable; the
/// reaction rates are fixed.
pub fn negative_feedback_loop() -> PageDefinition {
    fn caption(ctx: &CaptionContext<'_>) -> String {
        format!(
            "Max Time ($ t $): {}, Initial $ \\ce{{g1}} $: {}, Initial $ \\ce{{g2}} $: {}, \
             Initial $ \\ce{{g3}} $: {}",
            ctx.raw("max_time"),
            ctx.raw("init_g1_pop"),
            ctx.raw("init_g2_pop"),
            ctx.raw("init_g3_pop")
        )
    }
    plot(
        DemoKind::NegativeFeedbackLoop,
        vec![
            float("max_time", "max_time"),
            FieldBinding::controls(
                FieldSpec::triple("initial_state"),
                ["init_g1_pop", "init_g2_pop", "init_g3_pop"],
            ),
            FieldBinding::fixed(FieldSpec::triple("production_rates"), [10.0, 10000.0, 10.0]),
            FieldBinding::fixed(FieldSpec::triple("binding_rates"), [10.0, 0.1, 10.0]),
            FieldBinding::fixed(FieldSpec::triple("unbinding_rates"), [2.0, 20.0, 20.0]),
            FieldBinding::fixed(FieldSpec::triple("decay_rates"), [1.0, 100.0, 1.0]),
        ],
        caption,
        true,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use simpage::config::CoercionPolicy;
    use simpage::error::PageError;
    use simpage::page::Source;

    #[test]
    fn branches_share_the_solver_control() {
        let ids = lotka_volterra().input_controls();
        assert_eq!(&ids[..3], &["solver", "seed", "max_time"]);
    }

    #[test]
    fn each_branch_requires_only_its_own_field() {
        let schema = enzymatic_activity().schema();
        let ssa: Vec<_> = schema
            .required_fields(Some(SolverBranch::Stochastic))
            .collect();
        assert!(ssa.contains(&"ssa_seed"));
        assert!(!ssa.contains(&"solver"));

        let ode: Vec<_> = schema
            .required_fields(Some(SolverBranch::Ode))
            .collect();
        assert!(ode.contains(&"solver"));
        assert!(!ode.contains(&"ssa_seed"));
    }

    #[test]
    fn feedback_rates_are_constant() {
        let def = negative_feedback_loop();
        let rates = def
            .bindings
            .iter()
            .find(|b| b.spec.name == "binding_rates")
            .unwrap();
        assert_eq!(rates.source, Source::Fixed([10.0, 0.1, 10.0]));
    }

    #[test]
    fn malformed_initial_state_falls_back_to_zero() {
        let schema = negative_feedback_loop().schema();
        let builder = schema
            .builder(CoercionPolicy::Fallback)
            .triple("initial_state", ["1", "0", "x"])
            .unwrap();
        let err = builder.build().unwrap_err();
        assert_eq!(
            err,
            PageError::MissingField {
                field: "max_time".to_string()
            }
        );

        let record = schema
            .builder(CoercionPolicy::Fallback)
            .branch(SolverBranch::Stochastic)
            .seed("ssa_seed", "7")
            .unwrap()
            .number("max_time", "20")
            .unwrap()
            .triple("initial_state", ["1", "0", "x"])
            .unwrap()
            .triple_value("production_rates", [10.0, 10000.0, 10.0])
            .unwrap()
            .triple_value("binding_rates", [10.0, 0.1, 10.0])
            .unwrap()
            .triple_value("unbinding_rates", [2.0, 20.0, 20.0])
            .unwrap()
            .triple_value("decay_rates", [1.0, 100.0, 1.0])
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(record.triple("initial_state"), Some([1.0, 0.0, 0.0]));
    }
}
