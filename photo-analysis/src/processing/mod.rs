mod identifier;
mod normalize;
mod pipeline;
mod record;

pub use identifier::photo_id;
pub use normalize::{normalize_texts, CasePolicy};
pub use pipeline::{PhotoPipeline, ProcessOutcome};
pub use record::{PhotoRecord, RecordAssembler};
