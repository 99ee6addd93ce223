use async_trait::async_trait;
use chrono::NaiveDate;
use shiftalarm_core::{AlarmDefaults, ShiftClassifier, default_catalog};
use shiftalarm_ingest::{
    BoundingBox, DumpEngine, Fragment, ParserConfig, RecognitionEngine, RecognitionError,
    recognize_schedule_on,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

/// Engine returning a fixed fragment list.
struct Fixed(Vec<Fragment>);

#[async_trait]
impl RecognitionEngine for Fixed {
    async fn recognize(&self, _image: &[u8]) -> Result<Vec<Fragment>, RecognitionError> {
        Ok(self.0.clone())
    }
}

struct Broken;

#[async_trait]
impl RecognitionEngine for Broken {
    async fn recognize(&self, _image: &[u8]) -> Result<Vec<Fragment>, RecognitionError> {
        Err(RecognitionError::Failure("no text observations".into()))
    }
}

/// Two-week strip: day numbers on one row, shift codes on the row above.
fn grid() -> Vec<Fragment> {
    let header = BoundingBox::new(0.9, 0.02, 0.1, 0.04);
    let mut out = vec![Fragment::new("2024年5月排班", 0.92, header)];
    let codes = ["A班", "C班", "D班", "公休", "早班", "D班", "休"];
    for (i, code) in codes.iter().enumerate() {
        let x = 0.02 + i as f64 * 0.12;
        out.push(Fragment::new(*code, 0.9, BoundingBox::new(x, 0.30, 0.08, 0.03)));
        out.push(Fragment::new((i + 1).to_string(), 0.97, BoundingBox::new(x, 0.35, 0.08, 0.03)));
    }
    out
}

#[tokio::test]
async fn test_grid_to_drafts() {
    let result = recognize_schedule_on(&Fixed(grid()), b"img", &ParserConfig::default(), today())
        .await
        .unwrap();
    assert_eq!((result.year, result.month), (2024, 5));
    assert_eq!(result.entries.len(), 7);

    let catalog = default_catalog(&AlarmDefaults::default());
    let drafts = ShiftClassifier::new(&catalog).map_to_drafts(&result);
    let names: Vec<_> = drafts.iter().map(|d| d.shift_name.as_str()).collect();
    assert_eq!(names, vec!["A", "C", "D", "休", "A", "D", "休"]);
    assert_eq!(drafts[0].date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
}

#[tokio::test]
async fn test_engine_failure_propagates() {
    let err = recognize_schedule_on(&Broken, b"img", &ParserConfig::default(), today())
        .await
        .unwrap_err();
    assert!(matches!(err, RecognitionError::Failure(_)));
}

#[tokio::test]
async fn test_empty_input_is_invalid_image() {
    let err = recognize_schedule_on(&Fixed(grid()), b"", &ParserConfig::default(), today())
        .await
        .unwrap_err();
    assert!(matches!(err, RecognitionError::InvalidImage(_)));
}

#[tokio::test]
async fn test_dump_engine_reads_json_and_csv() {
    let json = serde_json::to_vec(&grid()).unwrap();
    let from_json = recognize_schedule_on(&DumpEngine, &json, &ParserConfig::default(), today())
        .await
        .unwrap();
    assert_eq!(from_json.entries.len(), 7);

    let csv = "text,confidence,x,y,w,h\n15,0.9,0.3,0.5,0.04,0.02\nC班,0.9,0.3,0.46,0.04,0.02\n";
    let from_csv =
        recognize_schedule_on(&DumpEngine, csv.as_bytes(), &ParserConfig::default(), today())
            .await
            .unwrap();
    assert_eq!((from_csv.year, from_csv.month), (2026, 10));
    assert_eq!(from_csv.entries[0].raw_text, "C班");

    let err = recognize_schedule_on(&DumpEngine, b"\x89PNG\r\n", &ParserConfig::default(), today())
        .await
        .unwrap_err();
    assert!(matches!(err, RecognitionError::InvalidImage(_)));
}
