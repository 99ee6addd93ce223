//! Recognition engine contract and the async entry point that runs it.

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use shiftalarm_core::MonthRecognition;
use tracing::info;

use crate::parser::{ParserConfig, parse_fragments};
use crate::types::Fragment;

#[derive(Debug, thiserror::Error)]
pub enum RecognitionError {
    /// The input could not be decoded as an image.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// The engine ran but produced no usable result.
    #[error("recognition failed: {0}")]
    Failure(String),
}

/// Text recognizer over raw image bytes. May take a while; callers await it off the
/// interactive path.
#[async_trait]
pub trait RecognitionEngine: Send + Sync {
    async fn recognize(&self, image: &[u8]) -> Result<Vec<Fragment>, RecognitionError>;
}

/// Recognize a schedule image and parse it into a month result.
pub async fn recognize_schedule<E: RecognitionEngine + ?Sized>(
    engine: &E,
    image: &[u8],
    config: &ParserConfig,
) -> Result<MonthRecognition, RecognitionError> {
    recognize_schedule_on(engine, image, config, Local::now().date_naive()).await
}

/// Same as [`recognize_schedule`] with an explicit "today" for the missing-header fallback.
pub async fn recognize_schedule_on<E: RecognitionEngine + ?Sized>(
    engine: &E,
    image: &[u8],
    config: &ParserConfig,
    today: NaiveDate,
) -> Result<MonthRecognition, RecognitionError> {
    if image.is_empty() {
        return Err(RecognitionError::InvalidImage("empty input".to_string()));
    }
    let fragments = engine.recognize(image).await?;
    let result = parse_fragments(&fragments, config, today);
    info!(
        fragments = fragments.len(),
        year = result.year,
        month = result.month,
        days = result.entries.len(),
        "schedule recognized"
    );
    Ok(result)
}
