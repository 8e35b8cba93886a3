mod client;
mod dataset;
pub mod endpoints;
mod request;
mod session;
mod target;

pub mod prelude {
    pub use crate::client::TargetClient;
    pub use crate::dataset::{Credentials, Dataset, DatasetConfig, MysqlDataset};
    pub use crate::endpoints;
    pub use crate::request::{
        Method, Page, Request, Response, TimeoutClass, TRANSPORT_FAILURE_STATUS,
    };
    pub use crate::session::Session;
    pub use crate::target::Target;
}
