//! Domain types for the departure board core.
//!
//! These types represent validated transit data: stop identities from the
//! topology document and departures from the real-time feed. Everything
//! that reaches the poll scheduler or the web layer goes through here.

mod departure;
mod stop;

pub use departure::{Departure, RawDeparture, normalize_departures};
pub use stop::{InvalidStopId, Stop, StopId};
