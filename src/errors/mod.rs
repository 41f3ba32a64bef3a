pub mod api_error;
pub mod flow_error;

pub use api_error::{ApiError, DetalleCampo};
pub use flow_error::FlowError;
