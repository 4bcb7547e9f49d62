use eframe::egui::vec2;

use super::BubbleNode;

pub const CONTACT_GAP: f32 = 1.5;
const RELAXATION_PASSES: usize = 2;
const BUBBLE_RESTITUTION: f32 = 0.25;

pub(super) fn resolve_collisions(nodes: &mut [BubbleNode], collision_scale: f32) {
    let assertiveness = collision_scale.clamp(0.2, 2.0);

    for _ in 0..RELAXATION_PASSES {
        for first in 0..nodes.len() {
            for second in (first + 1)..nodes.len() {
                let (head, tail) = nodes.split_at_mut(second);
                let a = &mut head[first];
                let b = &mut tail[0];

                let min_distance = a.radius + b.radius + CONTACT_GAP;
                let delta = b.pos - a.pos;
                let distance_sq = delta.length_sq();
                if distance_sq >= min_distance * min_distance {
                    continue;
                }

                let distance = distance_sq.sqrt();
                let direction = if distance > 0.0001 {
                    delta / distance
                } else {
                    let angle = ((first as f32) * 0.618_034 + (second as f32) * 0.414_214)
                        * std::f32::consts::TAU;
                    vec2(angle.cos(), angle.sin())
                };

                let push = (min_distance - distance) * 0.5 * assertiveness;
                a.pos -= direction * push;
                b.pos += direction * push;

                let approach = (b.velocity - a.velocity).dot(direction);
                if approach < 0.0 {
                    let impulse = -(1.0 + BUBBLE_RESTITUTION) * approach * 0.5;
                    a.velocity -= direction * impulse;
                    b.velocity += direction * impulse;
                }
            }
        }
    }
}
