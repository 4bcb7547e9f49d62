use chrono::{DateTime, Utc};

pub const NOMINAL_RADIUS_MIN: f32 = 58.0;
pub const NOMINAL_RADIUS_MAX: f32 = 168.0;

const NO_DUE_URGENCY: f32 = 0.15;
const MIN_RANGE_SCALE: f32 = 0.12;

pub fn task_urgency(
    now: DateTime<Utc>,
    created_at: DateTime<Utc>,
    due_at: Option<DateTime<Utc>>,
) -> f32 {
    let Some(due) = due_at else {
        return NO_DUE_URGENCY;
    };

    if now >= due {
        return 1.0;
    }

    let span_seconds = (due - created_at).num_seconds();
    if span_seconds <= 0 {
        return 1.0;
    }

    let elapsed_seconds = (now - created_at).num_seconds().max(0);
    ((elapsed_seconds as f64 / span_seconds as f64) as f32).clamp(0.0, 1.0)
}

pub fn bubble_radius(urgency: f32, radius_min: f32, radius_max: f32) -> f32 {
    let t = urgency.clamp(0.0, 1.0);
    radius_min + ((radius_max - radius_min) * t)
}

pub fn effective_radius_range(task_count: usize, viewport_area: f32) -> (f32, f32) {
    let mut scale = 1.0_f32;
    if task_count > 0 && viewport_area > 0.0 {
        let fit = (viewport_area / task_count as f32).sqrt() * 0.5;
        if fit < NOMINAL_RADIUS_MAX {
            scale = (fit / NOMINAL_RADIUS_MAX).max(MIN_RANGE_SCALE);
        }
    }

    (NOMINAL_RADIUS_MIN * scale, NOMINAL_RADIUS_MAX * scale)
}
