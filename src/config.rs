//! Application configuration from environment variables.

use chrono::Weekday;
use std::env;

use crate::models::calendar::{DayHours, WeeklyHours};

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Store zone as a whole-hour UTC offset
    pub store_offset_hours: i32,
    /// Number of ovens the default registry models
    pub oven_count: u32,
    /// Last-call buffer before closing, in minutes
    pub last_call_buffer_min: i64,
    /// How long a manual report counts as confirmed, in minutes
    pub confirm_window_min: i64,
    /// Safety bound on chain-advance iterations
    pub max_chain_steps: u32,
    /// Weekly operating hours
    pub weekly_hours: WeeklyHours,
    /// The weekday with relaxed last-call rules
    pub rest_day: Weekday,
}

impl AppConfig {
    /// Create a configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `HOST` (optional, default: 0.0.0.0)
    /// - `PORT` (optional, default: 8080)
    /// - `STORE_UTC_OFFSET_HOURS` (optional, default: -5)
    /// - `OVEN_COUNT` (optional, default: 4)
    /// - `LAST_CALL_BUFFER_MIN` (optional, default: 20)
    /// - `CONFIRM_WINDOW_MIN` (optional, default: 90)
    /// - `MAX_CHAIN_STEPS` (optional, default: 64)
    /// - `STORE_HOURS` (optional): seven comma-separated `open-close` hour
    ///   pairs, Monday first, e.g. `10-20,10-20,10-20,10-20,10-20,9-20,10-18`
    /// - `REST_DAY` (optional, default: sunday)
    ///
    /// # Errors
    /// Returns an error string if a variable is set but unparsable.
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_or("PORT", 8080)?;
        let store_offset_hours = parse_or("STORE_UTC_OFFSET_HOURS", -5)?;
        let oven_count: u32 = parse_or("OVEN_COUNT", 4)?;
        if oven_count == 0 {
            return Err("OVEN_COUNT must be at least 1".to_string());
        }
        let last_call_buffer_min = parse_or("LAST_CALL_BUFFER_MIN", 20)?;
        let confirm_window_min = parse_or("CONFIRM_WINDOW_MIN", 90)?;
        let max_chain_steps = parse_or("MAX_CHAIN_STEPS", 64)?;

        let weekly_hours = match env::var("STORE_HOURS") {
            Ok(spec) => parse_weekly_hours(&spec)?,
            Err(_) => WeeklyHours::standard(),
        };
        let rest_day = match env::var("REST_DAY") {
            Ok(s) => s
                .parse::<Weekday>()
                .map_err(|_| format!("REST_DAY: unrecognized weekday '{s}'"))?,
            Err(_) => Weekday::Sun,
        };

        Ok(Self {
            host,
            port,
            store_offset_hours,
            oven_count,
            last_call_buffer_min,
            confirm_window_min,
            max_chain_steps,
            weekly_hours,
            rest_day,
        })
    }
}

fn parse_or<T: std::str::FromStr>(var: &str, default: T) -> Result<T, String> {
    match env::var(var) {
        Ok(s) => s.parse().map_err(|_| format!("{var}: invalid value '{s}'")),
        Err(_) => Ok(default),
    }
}

/// Parse seven `open-close` hour pairs, Monday first.
fn parse_weekly_hours(spec: &str) -> Result<WeeklyHours, String> {
    let pairs: Vec<&str> = spec.split(',').map(str::trim).collect();
    if pairs.len() != 7 {
        return Err(format!(
            "STORE_HOURS: expected 7 comma-separated entries, got {}",
            pairs.len()
        ));
    }
    let mut days = [DayHours::new(0, 0, 0, 0); 7];
    for (i, pair) in pairs.iter().enumerate() {
        let (open, close) = pair
            .split_once('-')
            .ok_or_else(|| format!("STORE_HOURS: entry '{pair}' is not 'open-close'"))?;
        let open: u32 = open
            .parse()
            .map_err(|_| format!("STORE_HOURS: invalid opening hour '{open}'"))?;
        let close: u32 = close
            .parse()
            .map_err(|_| format!("STORE_HOURS: invalid closing hour '{close}'"))?;
        if open >= close || close > 24 {
            return Err(format!("STORE_HOURS: entry '{pair}' is not a valid window"));
        }
        days[i] = DayHours::new(open, 0, close, 0);
    }
    Ok(WeeklyHours::new(days))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weekly_hours() {
        let hours = parse_weekly_hours("10-20,10-20,10-20,10-20,10-20,9-20,10-18").unwrap();
        assert_eq!(hours, WeeklyHours::standard());
    }

    #[test]
    fn test_parse_weekly_hours_rejects_bad_shapes() {
        assert!(parse_weekly_hours("10-20").is_err());
        assert!(parse_weekly_hours("10-20,10-20,10-20,10-20,10-20,9-20,18-10").is_err());
        assert!(parse_weekly_hours("10-20,10-20,10-20,10-20,10-20,9-20,ten-18").is_err());
    }
}
