//! InfluxDB line protocol encoding.
//!
//! `measurement,tag=v,tag=v field=1i,field=2.5 1700000000000000000`

use std::fmt::Write;
use std::time::UNIX_EPOCH;

use autorestic_monitor_types::{FieldValue, MetricPoint};

/// Encode a point as a single line (no trailing newline).
///
/// Tags with an empty value are left out; line protocol has no way to
/// express them.
pub fn encode(point: &MetricPoint) -> String {
    let mut line = String::new();
    escape_into(&mut line, &point.measurement, &[',', ' ']);

    for (key, value) in point.tags.iter().filter(|(_, v)| !v.is_empty()) {
        line.push(',');
        escape_into(&mut line, key, &[',', '=', ' ']);
        line.push('=');
        escape_into(&mut line, value, &[',', '=', ' ']);
    }

    for (i, (key, value)) in point.fields.iter().enumerate() {
        line.push(if i == 0 { ' ' } else { ',' });
        escape_into(&mut line, key, &[',', '=', ' ']);
        line.push('=');
        match value {
            FieldValue::Integer(v) => {
                let _ = write!(line, "{}i", v);
            }
            FieldValue::Float(v) => {
                let _ = write!(line, "{}", v);
            }
        }
    }

    let nanos = point
        .timestamp
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let _ = write!(line, " {}", nanos);

    line
}

/// Backslashes pass through untouched; the server only unescapes the
/// characters listed in `special`. Line breaks and tabs are written as
/// `\n`, `\r` and `\t` so a point never spans more than one line.
fn escape_into(out: &mut String, s: &str, special: &[char]) {
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => {
                if special.contains(&c) {
                    out.push('\\');
                }
                out.push(c);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(secs: u64) -> std::time::SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn encodes_tags_fields_and_timestamp() {
        let point = MetricPoint::builder("autorestic_backup")
            .tag("location", "home")
            .tag("backend", "s3")
            .field("files_added", 1024i64)
            .field("duration_seconds", 90.0)
            .timestamp(at(1_700_000_000))
            .build();

        assert_eq!(
            encode(&point),
            "autorestic_backup,backend=s3,location=home duration_seconds=90,files_added=1024i 1700000000000000000"
        );
    }

    #[test]
    fn escapes_special_characters() {
        let point = MetricPoint::builder("my measurement,x")
            .tag("loc ation", "a=b,c d")
            .tag("path", r"C:\data")
            .field("f=1", 1.5)
            .timestamp(at(1))
            .build();

        assert_eq!(
            encode(&point),
            r"my\ measurement\,x,loc\ ation=a\=b\,c\ d,path=C:\data f\=1=1.5 1000000000"
        );
    }

    #[test]
    fn line_breaks_in_tags_stay_on_one_line() {
        let point = MetricPoint::builder("m")
            .tag("location", "a\nb")
            .tag("tag", "x\r\ty")
            .field("v", 1)
            .timestamp(at(0))
            .build();

        let line = encode(&point);
        assert_eq!(line.lines().count(), 1);
        assert_eq!(line, r"m,location=a\nb,tag=x\r\ty v=1i 0");
    }

    #[test]
    fn backslash_in_tag_value_is_kept_verbatim() {
        let point = MetricPoint::builder("m")
            .tag("location", r"\\nas\backups")
            .field("v", 1)
            .timestamp(at(0))
            .build();

        assert_eq!(encode(&point), r"m,location=\\nas\backups v=1i 0");
    }

    #[test]
    fn skips_empty_tag_values() {
        let point = MetricPoint::builder("m")
            .tag("tag", "")
            .tag("location", "home")
            .field("v", 1)
            .timestamp(at(0))
            .build();

        assert_eq!(encode(&point), "m,location=home v=1i 0");
    }

    #[test]
    fn negative_and_fractional_values() {
        let point = MetricPoint::builder("m")
            .field("a", -3)
            .field("b", 0.25)
            .timestamp(at(2))
            .build();

        assert_eq!(encode(&point), "m a=-3i,b=0.25 2000000000");
    }
}
