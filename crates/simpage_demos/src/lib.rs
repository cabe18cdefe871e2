//! Page inventory for the simulation demo site.
//!
//! Every demo page is a [`PageDefinition`]: the controls it reads, the builder
//! fields they feed, the caption it shows. Keeping the inventory out of the
//! wasm-only web crate lets us unit-test it on the host.

use serde::{Deserialize, Serialize};

use simpage::page::{FieldBinding, PageDefinition};
use simpage::params::FieldSpec;

pub mod cellular_automata;
pub mod continuous;
pub mod discrete;
pub mod discrete_event;
pub mod multiset_rewriting;
pub mod stochastic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemoKind {
    ElementaryAutomaton,
    TrafficJam,
    Maze,
    GameOfLife,
    ForestFire,
    SandHourglass,
    RadioactiveDecay,
    ContinuousLinearBirth,
    ContinuousLogistic,
    ContinuousLotkaVolterra,
    SirVaccination,
    ContinuousFishPopulation,
    DiscreteLinearBirth,
    DiscreteLogistic,
    LinearBirthDeath,
    LinearBirthMigration,
    DiscreteFishPopulation,
    StochasticLotkaVolterra,
    EnzymaticActivity,
    NegativeFeedbackLoop,
    FrogPopulation,
    CustomerQueue,
}

impl DemoKind {
    /// Page path under the site root.
    pub fn label(self) -> &'static str {
        match self {
            DemoKind::ElementaryAutomaton => "cellular_automata/elementary_automaton",
            DemoKind::TrafficJam => "cellular_automata/traffic_jam",
            DemoKind::Maze => "cellular_automata/maze",
            DemoKind::GameOfLife => "cellular_automata/game_of_life",
            DemoKind::ForestFire => "cellular_automata/forest_fire",
            DemoKind::SandHourglass => "cellular_automata/sand_hourglass",
            DemoKind::RadioactiveDecay => "continuous/radioactive_decay",
            DemoKind::ContinuousLinearBirth => "continuous/linear_birth",
            DemoKind::ContinuousLogistic => "continuous/logistic_equation",
            DemoKind::ContinuousLotkaVolterra => "continuous/lotka_volterra",
            DemoKind::SirVaccination => "continuous/sir_vaccination",
            DemoKind::ContinuousFishPopulation => "continuous/fish_population",
            DemoKind::DiscreteLinearBirth => "discrete/linear_birth",
            DemoKind::DiscreteLogistic => "discrete/logistic_equation",
            DemoKind::LinearBirthDeath => "discrete/linear_birth_death",
            DemoKind::LinearBirthMigration => "discrete/linear_birth_migration",
            DemoKind::DiscreteFishPopulation => "discrete/fish_population",
            DemoKind::StochasticLotkaVolterra => "stochastic/lotka_volterra",
            DemoKind::EnzymaticActivity => "stochastic/enzymatic_activity",
            DemoKind::NegativeFeedbackLoop => "stochastic/negative_feedback_loop",
            DemoKind::FrogPopulation => "multiset_rewriting/frog_population",
            DemoKind::CustomerQueue => "discrete_event/customer_queue",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            DemoKind::ElementaryAutomaton => "Elementary Cellular Automaton",
            DemoKind::TrafficJam => "Traffic Jam",
            DemoKind::Maze => "Maze Solver",
            DemoKind::GameOfLife => "Game of Life",
            DemoKind::ForestFire => "Forest Fire",
            DemoKind::SandHourglass => "Sand Hourglass",
            DemoKind::RadioactiveDecay => "Radioactive Decay",
            DemoKind::ContinuousLinearBirth | DemoKind::DiscreteLinearBirth => {
                "Linear Birth Model"
            }
            DemoKind::ContinuousLogistic | DemoKind::DiscreteLogistic => "Logistic Equation",
            DemoKind::ContinuousLotkaVolterra | DemoKind::StochasticLotkaVolterra => {
                "Lotka-Volterra"
            }
            DemoKind::SirVaccination => "SIR with Vaccination",
            DemoKind::ContinuousFishPopulation | DemoKind::DiscreteFishPopulation => {
                "Male/Female Fish Population"
            }
            DemoKind::LinearBirthDeath => "Linear Birth-Death Model",
            DemoKind::LinearBirthMigration => "Linear Birth-Migration Model",
            DemoKind::EnzymaticActivity => "Enzymatic Activity",
            DemoKind::NegativeFeedbackLoop => "Negative Feedback Loop",
            DemoKind::FrogPopulation => "Frog Population",
            DemoKind::CustomerQueue => "Customer Queue",
        }
    }

    /// Class name in the compiled model module.
    pub fn export(self) -> &'static str {
        match self {
            DemoKind::ElementaryAutomaton => "CA_ELEM",
            DemoKind::TrafficJam => "CA_TRAF",
            DemoKind::Maze => "CA_MAZE",
            DemoKind::GameOfLife => "CA_GOL",
            DemoKind::ForestFire => "CA_FF",
            DemoKind::SandHourglass => "CA_SWF",
            DemoKind::RadioactiveDecay => "CDS_RD",
            DemoKind::ContinuousLinearBirth => "CDS_LBM",
            DemoKind::ContinuousLogistic => "CDS_LE",
            DemoKind::ContinuousLotkaVolterra => "CDS_SLE_LV",
            DemoKind::SirVaccination => "CDS_SLE_SIR_V",
            DemoKind::ContinuousFishPopulation => "CDS_SLE_MFFP",
            DemoKind::DiscreteLinearBirth => "DDS_LBM",
            DemoKind::DiscreteLogistic => "DDS_LE",
            DemoKind::LinearBirthDeath => "DDS_LBDM",
            DemoKind::LinearBirthMigration => "DDS_LBMM",
            DemoKind::DiscreteFishPopulation => "DDS_SLE_MFFP",
            DemoKind::StochasticLotkaVolterra => "SSA_LV",
            DemoKind::EnzymaticActivity => "SSA_EA",
            DemoKind::NegativeFeedbackLoop => "SSA_NFL",
            DemoKind::FrogPopulation => "MSR_FLE",
            DemoKind::CustomerQueue => "DES_CQ",
        }
    }

    pub fn all() -> &'static [DemoKind] {
        &[
            DemoKind::ElementaryAutomaton,
            DemoKind::TrafficJam,
            DemoKind::Maze,
            DemoKind::GameOfLife,
            DemoKind::ForestFire,
            DemoKind::SandHourglass,
            DemoKind::RadioactiveDecay,
            DemoKind::ContinuousLinearBirth,
            DemoKind::ContinuousLogistic,
            DemoKind::ContinuousLotkaVolterra,
            DemoKind::SirVaccination,
            DemoKind::ContinuousFishPopulation,
            DemoKind::DiscreteLinearBirth,
            DemoKind::DiscreteLogistic,
            DemoKind::LinearBirthDeath,
            DemoKind::LinearBirthMigration,
            DemoKind::DiscreteFishPopulation,
            DemoKind::StochasticLotkaVolterra,
            DemoKind::EnzymaticActivity,
            DemoKind::NegativeFeedbackLoop,
            DemoKind::FrogPopulation,
            DemoKind::CustomerQueue,
        ]
    }

    /// Look a page up by path or by export name.
    pub fn from_label(s: &str) -> Option<DemoKind> {
        let s = s.trim().trim_matches('/');
        Self::all()
            .iter()
            .copied()
            .find(|k| k.label() == s || k.export() == s)
    }

    pub fn definition(self) -> PageDefinition {
        match self {
            DemoKind::ElementaryAutomaton => cellular_automata::elementary(),
            DemoKind::TrafficJam => cellular_automata::traffic(),
            DemoKind::Maze => cellular_automata::maze(),
            DemoKind::GameOfLife => cellular_automata::game_of_life(),
            DemoKind::ForestFire => cellular_automata::forest_fire(),
            DemoKind::SandHourglass => cellular_automata::sand_hourglass(),
            DemoKind::RadioactiveDecay => continuous::radioactive_decay(),
            DemoKind::ContinuousLinearBirth => continuous::linear_birth(),
            DemoKind::ContinuousLogistic => continuous::logistic(),
            DemoKind::ContinuousLotkaVolterra => continuous::lotka_volterra(),
            DemoKind::SirVaccination => continuous::sir_vaccination(),
            DemoKind::ContinuousFishPopulation => continuous::fish_population(),
            DemoKind::DiscreteLinearBirth => discrete::linear_birth(),
            DemoKind::DiscreteLogistic => discrete::logistic(),
            DemoKind::LinearBirthDeath => discrete::linear_birth_death(),
            DemoKind::LinearBirthMigration => discrete::linear_birth_migration(),
            DemoKind::DiscreteFishPopulation => discrete::fish_population(),
            DemoKind::StochasticLotkaVolterra => stochastic::lotka_volterra(),
            DemoKind::EnzymaticActivity => stochastic::enzymatic_activity(),
            DemoKind::NegativeFeedbackLoop => stochastic::negative_feedback_loop(),
            DemoKind::FrogPopulation => multiset_rewriting::frog_population(),
            DemoKind::CustomerQueue => discrete_event::customer_queue(),
        }
    }
}

// Binding shorthands shared by the family modules.

pub(crate) fn float(name: &'static str, id: &'static str) -> FieldBinding {
    FieldBinding::control(FieldSpec::float(name), id)
}

pub(crate) fn integer(name: &'static str, id: &'static str) -> FieldBinding {
    FieldBinding::control(FieldSpec::integer(name), id)
}

pub(crate) fn choice(name: &'static str, id: &'static str) -> FieldBinding {
    FieldBinding::control(FieldSpec::enumerated(name), id)
}

pub(crate) fn seed(name: &'static str, id: &'static str) -> FieldBinding {
    FieldBinding::control(FieldSpec::seed(name), id)
}
