//! Domain model (records, IDs, status, outcomes, errors).

pub mod envelope;
pub mod errors;
pub mod ids;
pub mod outcome;
pub mod record;
pub mod status;

pub use self::envelope::QueueMessage;
pub use self::errors::{AckError, BusError, StoreError, TickOverflow};
pub use self::ids::{CycleId, RecordId};
pub use self::outcome::DispatchOutcome;
pub use self::record::{DEFAULT_RECIPIENT_KEY, DedupToken, OutboundRecord, ticks};
pub use self::status::DeliveryStatus;
