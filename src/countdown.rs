use chrono::NaiveDateTime;

pub const STARTED: &str = "Match Started";

/// Text for the time left until `start`.
///
/// | Remaining | Text          |
/// |-----------|---------------|
/// | negative  | Match Started |
/// | ≥ 1h      | 2h 5m 9s      |
/// | ≥ 1m      | 5m 9s         |
/// | < 1m      | 9s            |
pub fn format_remaining(start: NaiveDateTime, now: NaiveDateTime) -> String {
    let distance = start - now;
    if distance < chrono::Duration::zero() {
        return STARTED.to_string();
    }

    let total = distance.num_seconds();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_hours_minutes_seconds() {
        let now = at("2026-10-18 12:00:00");
        assert_eq!(format_remaining(now + Duration::seconds(2 * 3600 + 5 * 60 + 9), now), "2h 5m 9s");
        // Days roll into hours
        assert_eq!(format_remaining(now + Duration::hours(26), now), "26h 0m 0s");
    }

    #[test]
    fn test_minutes_only() {
        let now = at("2026-10-18 12:00:00");
        assert_eq!(format_remaining(now + Duration::seconds(5 * 60 + 9), now), "5m 9s");
        assert_eq!(format_remaining(now + Duration::seconds(60), now), "1m 0s");
    }

    #[test]
    fn test_seconds_only() {
        let now = at("2026-10-18 12:00:00");
        assert_eq!(format_remaining(now + Duration::seconds(59), now), "59s");
        assert_eq!(format_remaining(now, now), "0s");
    }

    #[test]
    fn test_started() {
        let now = at("2026-10-18 12:00:00");
        assert_eq!(format_remaining(now - Duration::seconds(1), now), STARTED);
    }
}
