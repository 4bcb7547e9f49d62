use chrono::{DateTime, Utc};

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a_fold(mut hash: u64, bytes: &[u8]) -> u64 {
    for &byte in bytes {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

pub fn stable_seed(board_seed: &str, task_id: &str) -> u64 {
    let hash = fnv1a_fold(FNV_OFFSET_BASIS, board_seed.as_bytes());
    let hash = fnv1a_fold(hash, b"/");
    fnv1a_fold(hash, task_id.as_bytes())
}

pub fn reseed(seed: u64, salt: u64) -> u64 {
    fnv1a_fold(seed, &salt.to_le_bytes())
}

pub fn unit_from(seed: u64) -> f32 {
    ((seed & 0xffff_ffff) as f64 / u32::MAX as f64) as f32
}

pub fn stable_pair(seed: u64) -> (f32, f32) {
    let x = ((seed & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((seed >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

pub fn compact_title(title: &str, max_chars: usize) -> String {
    if title.chars().count() <= max_chars {
        return title.to_string();
    }

    let head = title
        .chars()
        .take(max_chars.saturating_sub(1))
        .collect::<String>();
    format!("{}…", head.trim_end())
}

pub fn format_day(stamp: DateTime<Utc>) -> String {
    stamp.format("%Y-%m-%d").to_string()
}

pub fn format_due_relative(now: DateTime<Utc>, due: DateTime<Utc>) -> String {
    let days = (due.date_naive() - now.date_naive()).num_days();
    match days {
        d if d < -1 => format!("{} days overdue", -d),
        -1 => "1 day overdue".to_string(),
        0 => "due today".to_string(),
        1 => "due tomorrow".to_string(),
        d => format!("due in {d} days"),
    }
}

pub fn format_age(now: DateTime<Utc>, created: DateTime<Utc>) -> String {
    let days = (now.date_naive() - created.date_naive()).num_days().max(0);
    match days {
        0 => "today".to_string(),
        1 => "1 day old".to_string(),
        d => format!("{d} days old"),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn stable_seed_is_deterministic() {
        let first = stable_seed("workspace-7", "task-42");
        let second = stable_seed("workspace-7", "task-42");
        assert_eq!(first, second);
    }

    #[test]
    fn stable_seed_separates_ids_and_boards() {
        let base = stable_seed("workspace-7", "task-42");
        assert_ne!(base, stable_seed("workspace-7", "task-43"));
        assert_ne!(base, stable_seed("workspace-8", "task-42"));
        assert_ne!(
            stable_seed("ab", "c"),
            stable_seed("a", "bc"),
            "board and id bytes must not collapse into one stream"
        );
    }

    #[test]
    fn reseed_decorrelates_salts() {
        let seed = stable_seed("board", "task-1");
        assert_ne!(reseed(seed, 1), reseed(seed, 2));
        assert_ne!(reseed(seed, 1), seed);
    }

    #[test]
    fn derived_floats_stay_in_range() {
        for id in ["a", "bubble", "task-9000", ""] {
            let seed = stable_seed("range-check", id);
            let unit = unit_from(seed);
            assert!((0.0..=1.0).contains(&unit));

            let (x, y) = stable_pair(seed);
            assert!((-1.0..=1.0).contains(&x));
            assert!((-1.0..=1.0).contains(&y));
        }
    }

    #[test]
    fn compact_title_preserves_short_text() {
        assert_eq!(compact_title("Fix login", 24), "Fix login");
        let shortened = compact_title("Draft the quarterly planning document", 12);
        assert!(shortened.ends_with('…'));
        assert!(shortened.chars().count() <= 12);
    }

    #[test]
    fn relative_due_labels() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap();
        let same_day = Utc.with_ymd_and_hms(2024, 3, 10, 23, 0, 0).unwrap();
        let tomorrow = Utc.with_ymd_and_hms(2024, 3, 11, 1, 0, 0).unwrap();
        let last_week = Utc.with_ymd_and_hms(2024, 3, 3, 9, 0, 0).unwrap();

        assert_eq!(format_due_relative(now, same_day), "due today");
        assert_eq!(format_due_relative(now, tomorrow), "due tomorrow");
        assert_eq!(format_due_relative(now, last_week), "7 days overdue");
    }
}
