pub mod ids;
pub mod record;

pub use ids::RecordId;
pub use record::Record;
