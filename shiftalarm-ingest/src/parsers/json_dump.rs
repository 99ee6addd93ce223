//! JSON fragment dump: an array of `{ "text", "confidence", "box": { x, y, w, h } }`.
//!
//! `DumpEngine` treats the "image" bytes as such a dump, which lets the whole pipeline
//! run from pre-recognized files.

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::engine::{RecognitionEngine, RecognitionError};
use crate::parsers::csv_dump::parse_fragment_csv;
use crate::types::Fragment;

pub fn parse_fragment_json(bytes: &[u8]) -> Result<Vec<Fragment>> {
    serde_json::from_slice(bytes).context("parsing fragment JSON")
}

/// Recognition engine that decodes fragment dumps instead of pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct DumpEngine;

#[async_trait]
impl RecognitionEngine for DumpEngine {
    async fn recognize(&self, image: &[u8]) -> Result<Vec<Fragment>, RecognitionError> {
        let trimmed = image.trim_ascii_start();
        let parsed = if trimmed.starts_with(b"[") {
            parse_fragment_json(image)
        } else {
            parse_fragment_csv(image)
        };
        parsed.map_err(|e| RecognitionError::InvalidImage(format!("{e:#}")))
    }
}
