use chrono::{DateTime, Local, Utc};

pub fn pad2(n: u32) -> String {
    format!("{:02}", n)
}

pub fn format_local(ts: &DateTime<Utc>) -> String {
    let local = ts.with_timezone(&Local);
    local.format("%d.%m.%Y %H:%M:%S").to_string()
}

pub fn format_celsius(value: f64) -> String {
    format!("{:.1} °C", value)
}

pub fn format_percent(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{} %", value as i64)
    } else {
        format!("{:.1} %", value)
    }
}

/// `90` -> `"1m 30s"`, `10` -> `"10s"`.
pub fn format_interval(secs: u64) -> String {
    let (m, s) = (secs / 60, secs % 60);
    match (m, s) {
        (0, s) => format!("{}s", s),
        (m, 0) => format!("{}m", m),
        (m, s) => format!("{}m {}s", m, pad2(s as u32)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measurements() {
        assert_eq!(format_celsius(23.456), "23.5 °C");
        assert_eq!(format_celsius(0.0), "0.0 °C");
        assert_eq!(format_percent(61.0), "61 %");
        assert_eq!(format_percent(61.26), "61.3 %");
    }

    #[test]
    fn intervals() {
        assert_eq!(format_interval(3), "3s");
        assert_eq!(format_interval(60), "1m");
        assert_eq!(format_interval(65), "1m 05s");
    }
}
