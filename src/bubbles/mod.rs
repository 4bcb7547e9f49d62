use std::collections::HashMap;

use eframe::egui::{Pos2, Rect, Vec2, vec2};

use crate::util::{reseed, stable_pair, stable_seed};

mod anchors;
mod collision;

pub use anchors::{AnchorGrid, GRID_MARGIN, GridShape, grid_shape};
pub use collision::CONTACT_GAP;

pub const MAX_FRAME_DT: f32 = 1.0 / 30.0;

const SPAWN_VELOCITY_SALT: u64 = 2;
const DRIFT_PHASE_SALT: u64 = 3;
const DRIFT_FREQUENCY_SALT: u64 = 4;

#[derive(Clone, Debug)]
pub struct BubbleItem {
    pub id: String,
    pub radius: f32,
}

#[derive(Clone, Debug)]
pub struct BubbleNode {
    pub id: String,
    pub pos: Pos2,
    pub velocity: Vec2,
    pub radius: f32,
    seed: u64,
    drift_phase: Vec2,
    drift_frequency: Vec2,
    spawned: bool,
}

impl BubbleNode {
    fn from_item(board_seed: &str, item: &BubbleItem) -> Self {
        let seed = stable_seed(board_seed, &item.id);
        let (phase_x, phase_y) = stable_pair(reseed(seed, DRIFT_PHASE_SALT));
        let (frequency_x, frequency_y) = stable_pair(reseed(seed, DRIFT_FREQUENCY_SALT));

        Self {
            id: item.id.clone(),
            pos: Pos2::ZERO,
            velocity: Vec2::ZERO,
            radius: item.radius.max(1.0),
            seed,
            drift_phase: vec2(phase_x, phase_y) * std::f32::consts::PI,
            drift_frequency: vec2(0.7 + (frequency_x * 0.25), 0.7 + (frequency_y * 0.25)),
            spawned: false,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SimTuning {
    pub intensity: f32,
    pub spring_scale: f32,
    pub drift_scale: f32,
    pub collision_scale: f32,
    pub velocity_damping: f32,
    pub wall_restitution: f32,
}

impl Default for SimTuning {
    fn default() -> Self {
        Self {
            intensity: 1.0,
            spring_scale: 1.0,
            drift_scale: 1.0,
            collision_scale: 1.0,
            velocity_damping: 0.9,
            wall_restitution: 0.72,
        }
    }
}

#[derive(Clone, Debug)]
pub struct BubbleSim {
    board_seed: String,
    nodes: Vec<BubbleNode>,
    index_by_id: HashMap<String, usize>,
    anchor_grid: Option<AnchorGrid>,
    clock: f32,
}

impl BubbleSim {
    pub fn new(board_seed: String) -> Self {
        Self {
            board_seed,
            nodes: Vec::new(),
            index_by_id: HashMap::new(),
            anchor_grid: None,
            clock: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[BubbleNode] {
        &self.nodes
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_by_id.contains_key(id)
    }

    pub fn position_of(&self, id: &str) -> Option<Pos2> {
        self.index_by_id
            .get(id)
            .and_then(|&index| self.nodes.get(index))
            .map(|node| node.pos)
    }

    pub fn sync(&mut self, items: &[BubbleItem]) {
        let mut prior_nodes = std::mem::take(&mut self.nodes)
            .into_iter()
            .map(|node| (node.id.clone(), node))
            .collect::<HashMap<_, _>>();

        let mut next_nodes = Vec::with_capacity(items.len());
        for item in items {
            if let Some(mut node) = prior_nodes.remove(&item.id) {
                node.radius = item.radius.max(1.0);
                next_nodes.push(node);
            } else {
                next_nodes.push(BubbleNode::from_item(&self.board_seed, item));
            }
        }

        self.index_by_id.clear();
        self.index_by_id.reserve(next_nodes.len());
        for (index, node) in next_nodes.iter().enumerate() {
            self.index_by_id.insert(node.id.clone(), index);
        }
        self.nodes = next_nodes;
    }

    pub fn step(&mut self, viewport: Rect, dt_seconds: f32, tuning: SimTuning) -> bool {
        if self.nodes.is_empty() {
            return false;
        }
        if viewport.width() <= 0.0 || viewport.height() <= 0.0 || dt_seconds <= 0.0 {
            return false;
        }

        let dt = dt_seconds.min(MAX_FRAME_DT);
        self.clock += dt;
        let clock = self.clock;

        let node_count = self.nodes.len();
        if self
            .anchor_grid
            .as_ref()
            .is_none_or(|grid| !grid.matches(node_count, viewport))
        {
            self.anchor_grid = Some(AnchorGrid::layout(node_count, viewport));
        }
        let Some(grid) = self.anchor_grid.as_ref() else {
            return false;
        };

        let intensity = tuning.intensity.clamp(0.2, 2.5);
        let spring_strength = 0.016 * intensity * tuning.spring_scale.clamp(0.2, 2.2);
        let drift_strength = 0.55 * intensity * tuning.drift_scale.clamp(0.0, 2.0);
        let damping = (tuning.velocity_damping - (intensity * 0.015)).clamp(0.78, 0.97);
        let time_step_scale = (dt * 60.0).clamp(0.25, 3.0);
        let damping_factor = damping.powf(time_step_scale);
        let max_force = 165.0 + (intensity * 90.0);
        let max_force_sq = max_force * max_force;
        let max_speed = 11.0 + (intensity * 15.0);
        let max_speed_sq = max_speed * max_speed;

        let mut any_motion = false;
        for (rank, node) in self.nodes.iter_mut().enumerate() {
            let anchor = grid.anchor_for(rank, node.seed);

            if !node.spawned {
                node.pos = anchor;
                node.velocity = spawn_velocity(node.seed, rank, node.radius);
                node.spawned = true;
            }

            let mut force = (anchor - node.pos) * spring_strength;
            force += vec2(
                ((clock * node.drift_frequency.x) + node.drift_phase.x).sin(),
                ((clock * node.drift_frequency.y) + node.drift_phase.y).cos(),
            ) * drift_strength;

            let force_sq = force.length_sq();
            if force_sq > max_force_sq {
                force *= max_force / force_sq.sqrt();
            }

            let mut velocity =
                (node.velocity + (force * (0.055 * time_step_scale))) * damping_factor;
            let speed_sq = velocity.length_sq();
            if speed_sq > max_speed_sq {
                velocity *= max_speed / speed_sq.sqrt();
            }

            node.velocity = velocity;
            node.pos += velocity * time_step_scale;
            if velocity.length_sq() > 0.000_001 {
                any_motion = true;
            }

            bounce_off_walls(node, viewport, tuning.wall_restitution);
        }

        collision::resolve_collisions(&mut self.nodes, tuning.collision_scale);

        any_motion
    }
}

fn spawn_velocity(seed: u64, rank: usize, radius: f32) -> Vec2 {
    let (vx, vy) = stable_pair(reseed(seed, SPAWN_VELOCITY_SALT));
    let mut direction = vec2(vx, vy);
    if direction.length_sq() <= 0.0001 {
        let angle = ((rank as f32) * 0.618_034 + 0.11) * std::f32::consts::TAU;
        direction = vec2(angle.cos(), angle.sin());
    } else {
        direction = direction.normalized();
    }

    direction * (1.15 + (radius * 0.022))
}

fn bounce_off_walls(node: &mut BubbleNode, viewport: Rect, wall_restitution: f32) {
    let restitution = wall_restitution.clamp(0.0, 0.95);
    let radius = node.radius;

    if viewport.width() <= radius * 2.0 {
        node.pos.x = viewport.center().x;
        node.velocity.x = 0.0;
    } else {
        let min_x = viewport.left() + radius;
        let max_x = viewport.right() - radius;
        if node.pos.x < min_x {
            node.pos.x = min_x;
            if node.velocity.x < 0.0 {
                node.velocity.x = -node.velocity.x * restitution;
            }
        } else if node.pos.x > max_x {
            node.pos.x = max_x;
            if node.velocity.x > 0.0 {
                node.velocity.x = -node.velocity.x * restitution;
            }
        }
    }

    if viewport.height() <= radius * 2.0 {
        node.pos.y = viewport.center().y;
        node.velocity.y = 0.0;
    } else {
        let min_y = viewport.top() + radius;
        let max_y = viewport.bottom() - radius;
        if node.pos.y < min_y {
            node.pos.y = min_y;
            if node.velocity.y < 0.0 {
                node.velocity.y = -node.velocity.y * restitution;
            }
        } else if node.pos.y > max_y {
            node.pos.y = max_y;
            if node.velocity.y > 0.0 {
                node.velocity.y = -node.velocity.y * restitution;
            }
        }
    }
}
