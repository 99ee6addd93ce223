use anyhow::Result;
use shiftalarm_core::AlarmInstance;
use shiftalarm_core::time::local_to_utc;

/// Emit an ICS calendar with one zero-length VEVENT + display VALARM per enabled alarm.
///
/// Notes:
/// - Alarm times are wall-clock; `tz` turns them into UTC DTSTART values.
/// - UIDs reuse the scheduler id, so re-imports replace rather than duplicate.
pub fn alarms_to_ics(alarms: &[AlarmInstance], tz: &str) -> Result<String> {
    let mut s = String::new();
    s.push_str("BEGIN:VCALENDAR\nVERSION:2.0\nPRODID:-//ShiftAlarm//EN\n");

    for a in alarms.iter().filter(|a| a.enabled) {
        let at = local_to_utc(a.date_time, tz)?.format("%Y%m%dT%H%M%SZ");
        let summary = escape_ics(&format!("{} ({})", a.label, a.shift_name));

        s.push_str("BEGIN:VEVENT\n");
        s.push_str(&format!("UID:{}@shiftalarm\n", a.scheduler_id));
        s.push_str(&format!("DTSTART:{}\n", at));
        s.push_str(&format!("DTEND:{}\n", at));
        s.push_str(&format!("SUMMARY:{}\n", summary));
        s.push_str("BEGIN:VALARM\nACTION:DISPLAY\nTRIGGER:PT0M\n");
        s.push_str(&format!("DESCRIPTION:{}\n", summary));
        s.push_str("END:VALARM\n");
        s.push_str("END:VEVENT\n");
    }

    s.push_str("END:VCALENDAR\n");
    Ok(s)
}

fn escape_ics(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace(',', "\\,")
        .replace(';', "\\;")
}
