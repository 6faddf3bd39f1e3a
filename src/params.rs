use crate::errors::EngineError;

/// Engine configuration, validated once at construction. Defaults mirror
/// `Cec2_SetDefaultParams` in the ABC sources this design is grounded on.
#[derive(Debug, Clone)]
pub struct EngineParams {
    /// 64-bit simulation words per node per round.
    pub n_sim_words: u32,
    /// Simulation rounds before giving up on further refinement this pass.
    pub n_sim_rounds: u32,
    /// CNF-footprint budget a single `SolveTwo` query may spend before it
    /// is abandoned as undecided (see DESIGN.md for why this is a clause
    /// count rather than a true conflict count).
    pub n_conf_limit: u32,
    /// Treat this AIG as a miter: a nonzero primary output is a
    /// distinguishing counter-example rather than just a node to sweep.
    pub is_miter: bool,
    pub verbose: bool,
    pub very_verbose: bool,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            n_sim_words: 8,
            n_sim_rounds: 4,
            n_conf_limit: 1000,
            is_miter: false,
            verbose: false,
            very_verbose: false,
        }
    }
}

impl EngineParams {
    pub fn validate(self) -> Result<Self, EngineError> {
        if self.n_sim_words == 0 {
            return Err(EngineError::ConfigInvalid("n_sim_words must be nonzero".into()));
        }
        if self.n_sim_rounds == 0 {
            return Err(EngineError::ConfigInvalid("n_sim_rounds must be nonzero".into()));
        }
        Ok(self)
    }
}
