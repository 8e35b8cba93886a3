mod aggregator;
mod deadline;
mod score;
mod wait_group;

pub mod prelude {
    pub use crate::aggregator::{Finalize, ScoreAggregator, WorkerScore};
    pub use crate::deadline::Deadline;
    pub use crate::score::{
        classify, Batch, Checkpoint, ScenarioFlow, CLIENT_ERROR_PENALTY, FAILURE_PENALTY,
        SUCCESS_SCORE,
    };
    pub use crate::wait_group::{WaitGroup, WorkerTicket};
}
