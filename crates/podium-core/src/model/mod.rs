pub mod assignment;
pub mod ids;
pub mod instrument;
pub mod person;

pub use assignment::{AssignmentLink, AssignmentRaw, MatchBranch};
pub use ids::{InstrumentId, PersonId};
pub use instrument::{Instrument, InstrumentRecord};
pub use person::{Person, PersonName};
