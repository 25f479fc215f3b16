pub mod reputation;
pub mod turing;

pub use reputation::{
    OracleError, ReputationFilter, ReputationOracle, ReputationSelectors, DEBUG_SPAM_MESSAGE,
    GENERIC_SPAM_MESSAGE,
};
pub use turing::{TuringTestFilter, INCORRECT_ANSWER};
