//! shiftalarm-ingest: recognition fragments, the schedule grid parser, and fragment dump readers.

pub mod engine;
pub mod parser;
pub mod parsers;
pub mod types;

pub use engine::{RecognitionEngine, RecognitionError, recognize_schedule, recognize_schedule_on};
pub use parser::{ParserConfig, parse_fragments, parse_year_month};
pub use parsers::csv_dump::parse_fragment_csv;
pub use parsers::json_dump::{DumpEngine, parse_fragment_json};
pub use types::{BoundingBox, BoxOrigin, Fragment};
