pub mod policy;
pub mod selector;

pub use policy::{
    CounterSwitch, FrequencyExploiter, MirrorSwitch, Policy, PolicyContext, PolicyKind,
    PolicySpec,
};
pub use selector::{PolicyStanding, RoundReport, SelectorConfig, SelectorError, StrategySelector};
