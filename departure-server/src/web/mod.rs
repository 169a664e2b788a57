//! Web read surface.
//!
//! A thin host adapter over the departure source: consumers read stop
//! search results and the latest per-stop snapshot as JSON. No rendering
//! happens here; display concerns belong to the consumer.

mod dto;
mod routes;
mod state;

pub use dto::{DepartureDto, SensorStateDto, StopSearchResponse, StopSearchResult};
pub use routes::create_router;
pub use state::AppState;
