mod model_gateway;
mod process_description;

pub use model_gateway::ModelGateway;
pub use process_description::{ProcessDescription, read_description_file};
