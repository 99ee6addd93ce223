//! CSV fragment dump with header `text,confidence,x,y,w,h`.

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::types::{BoundingBox, Fragment};

const COLUMNS: [&str; 6] = ["text", "confidence", "x", "y", "w", "h"];

#[derive(Debug, Deserialize)]
struct Row {
    text: String,
    confidence: f32,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

pub fn parse_fragment_csv(bytes: &[u8]) -> Result<Vec<Fragment>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(bytes);

    let headers = rdr.headers().context("reading fragment CSV header")?;
    if let Some(missing) = COLUMNS.iter().find(|c| !headers.iter().any(|h| h == **c)) {
        bail!("fragment CSV is missing column '{missing}'");
    }

    let mut out = Vec::new();
    for (i, row) in rdr.deserialize::<Row>().enumerate() {
        let row = row.with_context(|| format!("fragment row {}", i + 1))?;
        out.push(Fragment::new(
            row.text,
            row.confidence,
            BoundingBox::new(row.x, row.y, row.w, row.h),
        ));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_dump() {
        let csv = "text,confidence,x,y,w,h\n2024年5月,0.9,0.4,0.0,0.2,0.03\n\" A班 \",0.8,0.3,0.46,0.04,0.02\n";
        let frags = parse_fragment_csv(csv.as_bytes()).unwrap();
        assert_eq!(frags.len(), 2);
        // Text is kept verbatim; the parser trims it.
        assert_eq!(frags[1].text, " A班 ");
        assert_eq!(frags[1].bbox.y, 0.46);
    }

    #[test]
    fn test_missing_columns() {
        let err = parse_fragment_csv(b"text,confidence\nA,0.9\n").unwrap_err();
        assert!(err.to_string().contains("'x'"));
    }

    #[test]
    fn test_bad_row_reports_position() {
        let csv = "text,confidence,x,y,w,h\n15,high,0,0,0,0\n";
        let err = parse_fragment_csv(csv.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("fragment row 1"));
    }
}
