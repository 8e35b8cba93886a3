pub mod scenario;
pub mod shopper;
pub mod validation;
mod values;

pub use values::{AgentValues, BenchValues};
