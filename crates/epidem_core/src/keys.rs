//! Fixed top-level entry names written by the simulation.

pub const SCENARIO_COUNT: &str = "Run_scenario_end";
pub const SCHOOL_COUNT: &str = "Run_school_end";
pub const SOCIAL_DISTANCE_COUNT: &str = "Run_social_distance_end";
pub const STOCHASTIC_COUNT: &str = "RunStoTimes_end";
pub const STOCHASTIC_FLAG: &str = "stoFlag";

pub const SCENARIO_FOCUS: &str = "Run_scenario_Focus";
pub const SCHOOL_FOCUS: &str = "Run_school_Focus";
pub const SOCIAL_DISTANCE_FOCUS: &str = "Run_social_distance_Focus";

/// 5×N case table: run id, scenario, school, social distancing, stochastic iteration
pub const CASE_TABLE: &str = "strategyInd2";

/// One reference per run id, each to an array of per-outcome references
pub const OUTCOMES: &str = "FitnessEs3";

/// Location codes; position in this list is the location index
pub const LOCATIONS: &str = "tempMG";

/// Every array the index reads at load time
pub const REQUIRED: [&str; 11] = [
    SCENARIO_COUNT,
    SCHOOL_COUNT,
    SOCIAL_DISTANCE_COUNT,
    STOCHASTIC_COUNT,
    STOCHASTIC_FLAG,
    SCENARIO_FOCUS,
    SCHOOL_FOCUS,
    SOCIAL_DISTANCE_FOCUS,
    CASE_TABLE,
    OUTCOMES,
    LOCATIONS,
];
