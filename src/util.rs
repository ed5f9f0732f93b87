use std::time::{SystemTime, UNIX_EPOCH};
use time_humanize::HumanTime;

pub fn get_unix() -> i64 {
  let now = SystemTime::now();
  let unix = now.duration_since(UNIX_EPOCH).unwrap_or_default();
  unix.as_millis() as i64
}

// Calculate humantime from now to unix timestamp in milliseconds
// e.g. "5 hours ago"
pub fn unix_to_humantime(unix: i64) -> String {
  if unix <= 0 {
    return "never".to_string();
  }

  let humantime = HumanTime::from_duration_since_timestamp((unix / 1000) as u64);
  humantime.to_string()
}

// Accepts "+7 (423) 200-00-01", "8 914 000 00 00", "9140000000".
// Returns the number as +7XXXXXXXXXX.
pub fn normalize_phone(input: &str) -> Option<String> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    return None;
  }

  let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')');
  if !trimmed.chars().all(allowed) {
    return None;
  }

  // '+' may only lead
  if trimmed.chars().skip(1).any(|c| c == '+') {
    return None;
  }

  let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();

  let national = match digits.len() {
    10 => digits.as_str(),
    11 if digits.starts_with('7') || digits.starts_with('8') => &digits[1..],
    _ => return None,
  };

  Some(format!("+7{}", national))
}
