//! Session-side orchestration: context, prediction client and the
//! polling snapshot surface.

pub mod context;
pub mod prediction;

pub use context::{ChainId, SessionContext};
pub use prediction::{ClientError, ClientSnapshot, PredictionClient, StatusLine};
