use eframe::egui::{Rect, pos2, vec2};

use taskbubble::bubbles::{BubbleItem, BubbleSim, SimTuning};

fn viewport() -> Rect {
    Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0))
}

fn items(entries: &[(&str, f32)]) -> Vec<BubbleItem> {
    entries
        .iter()
        .map(|(id, radius)| BubbleItem {
            id: (*id).to_string(),
            radius: *radius,
        })
        .collect()
}

fn run_frames(sim: &mut BubbleSim, frames: usize, dt: f32) {
    let tuning = SimTuning::default();
    for _ in 0..frames {
        sim.step(viewport(), dt, tuning);
    }
}

#[test]
fn identical_boards_stay_in_lockstep() {
    let layout = items(&[("alpha", 40.0), ("beta", 55.0), ("gamma", 32.0)]);

    let mut first = BubbleSim::new("team-board".to_string());
    first.sync(&layout);
    let mut second = BubbleSim::new("team-board".to_string());
    second.sync(&layout);

    let tuning = SimTuning::default();
    for _ in 0..50 {
        first.step(viewport(), 1.0 / 60.0, tuning);
        second.step(viewport(), 1.0 / 60.0, tuning);
    }

    for (a, b) in first.nodes().iter().zip(second.nodes()) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.pos, b.pos);
        assert_eq!(a.velocity, b.velocity);
    }
}

#[test]
fn different_board_seeds_produce_different_layouts() {
    let layout = items(&[("alpha", 40.0), ("beta", 40.0)]);

    let mut first = BubbleSim::new("board-one".to_string());
    first.sync(&layout);
    let mut second = BubbleSim::new("board-two".to_string());
    second.sync(&layout);

    run_frames(&mut first, 1, 1.0 / 60.0);
    run_frames(&mut second, 1, 1.0 / 60.0);

    let moved = first
        .nodes()
        .iter()
        .zip(second.nodes())
        .any(|(a, b)| a.pos != b.pos);
    assert!(moved, "seeds should shift anchors and spawn velocities");
}

#[test]
fn bubbles_stay_inside_the_viewport() {
    let mut sim = BubbleSim::new("containment".to_string());
    sim.sync(&items(&[
        ("a", 40.0),
        ("b", 40.0),
        ("c", 64.0),
        ("d", 52.0),
        ("e", 38.0),
        ("f", 45.0),
    ]));

    let tuning = SimTuning::default();
    let view = viewport();
    for _ in 0..400 {
        sim.step(view, 1.0 / 60.0, tuning);
        for node in sim.nodes() {
            assert!(node.pos.x >= view.left() + node.radius - 1.0);
            assert!(node.pos.x <= view.right() - node.radius + 1.0);
            assert!(node.pos.y >= view.top() + node.radius - 1.0);
            assert!(node.pos.y <= view.bottom() - node.radius + 1.0);
        }
    }
}

#[test]
fn crowded_bubbles_separate() {
    let mut sim = BubbleSim::new("crowded".to_string());
    sim.sync(&items(&[
        ("a", 95.0),
        ("b", 95.0),
        ("c", 95.0),
        ("d", 95.0),
        ("e", 95.0),
        ("f", 95.0),
        ("g", 95.0),
        ("h", 95.0),
        ("i", 95.0),
    ]));

    run_frames(&mut sim, 600, 1.0 / 60.0);

    let nodes = sim.nodes();
    for first in 0..nodes.len() {
        for second in (first + 1)..nodes.len() {
            let a = &nodes[first];
            let b = &nodes[second];
            let distance = a.pos.distance(b.pos);
            assert!(
                distance >= a.radius + b.radius - 0.5,
                "{} and {} still overlap: {distance}",
                a.id,
                b.id
            );
        }
    }
}

#[test]
fn sync_preserves_survivors_and_replaces_the_rest() {
    let mut sim = BubbleSim::new("life".to_string());
    sim.sync(&items(&[("a", 40.0), ("b", 40.0), ("c", 40.0)]));
    run_frames(&mut sim, 120, 1.0 / 60.0);

    let a_before = sim.position_of("a").unwrap();
    let b_before = sim.position_of("b").unwrap();

    sim.sync(&items(&[("a", 40.0), ("b", 48.0), ("d", 40.0)]));

    assert_eq!(sim.position_of("a"), Some(a_before));
    assert_eq!(sim.position_of("b"), Some(b_before));
    assert!(!sim.contains("c"));
    assert!(sim.contains("d"));
    assert_eq!(sim.position_of("d"), Some(pos2(0.0, 0.0)));

    run_frames(&mut sim, 1, 1.0 / 60.0);

    let d_after = sim.position_of("d").unwrap();
    assert_ne!(d_after, pos2(0.0, 0.0));
    assert!(viewport().contains(d_after));

    let a_after = sim.position_of("a").unwrap();
    assert!(
        (a_after - a_before).length() < 30.0,
        "survivor jumped from {a_before:?} to {a_after:?}"
    );
}

#[test]
fn sync_updates_radius_without_moving_the_bubble() {
    let mut sim = BubbleSim::new("resize".to_string());
    sim.sync(&items(&[("a", 40.0), ("b", 40.0)]));
    run_frames(&mut sim, 60, 1.0 / 60.0);

    let before = sim.position_of("a").unwrap();
    sim.sync(&items(&[("a", 72.0), ("b", 40.0)]));

    assert_eq!(sim.position_of("a"), Some(before));
    assert_eq!(sim.nodes()[0].radius, 72.0);
}

#[test]
fn oversized_frame_delta_is_clamped() {
    let mut stalled = BubbleSim::new("clamp".to_string());
    stalled.sync(&items(&[("a", 40.0), ("b", 40.0), ("c", 40.0)]));
    run_frames(&mut stalled, 30, 1.0 / 60.0);
    let mut steady = stalled.clone();

    let tuning = SimTuning::default();
    stalled.step(viewport(), 10.0, tuning);
    steady.step(viewport(), 1.0 / 30.0, tuning);

    for (a, b) in stalled.nodes().iter().zip(steady.nodes()) {
        assert_eq!(a.pos, b.pos);
        assert_eq!(a.velocity, b.velocity);
    }
}

#[test]
fn degenerate_viewport_skips_the_frame() {
    let mut sim = BubbleSim::new("degenerate".to_string());
    sim.sync(&items(&[("a", 40.0), ("b", 40.0)]));

    let tuning = SimTuning::default();
    let flat = Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 0.0));
    assert!(!sim.step(flat, 1.0 / 60.0, tuning));
    assert!(!sim.step(viewport(), 0.0, tuning));

    for node in sim.nodes() {
        assert_eq!(node.pos, pos2(0.0, 0.0));
    }
}

#[test]
fn empty_sim_reports_no_motion() {
    let mut sim = BubbleSim::new("empty".to_string());
    assert!(sim.is_empty());
    assert!(!sim.step(viewport(), 1.0 / 60.0, SimTuning::default()));
}

#[test]
fn bubble_wider_than_the_viewport_is_centered() {
    let mut sim = BubbleSim::new("huge".to_string());
    sim.sync(&items(&[("whale", 1000.0)]));

    let tuning = SimTuning::default();
    sim.step(viewport(), 1.0 / 60.0, tuning);

    let node = &sim.nodes()[0];
    assert_eq!(node.pos, viewport().center());
    assert_eq!(node.velocity, vec2(0.0, 0.0));
}

#[test]
fn four_bubbles_keep_their_quadrants() {
    let view = viewport();
    let mut sim = BubbleSim::new("scenario".to_string());
    sim.sync(&items(&[
        ("t1", 80.0),
        ("t2", 80.0),
        ("t3", 80.0),
        ("t4", 80.0),
    ]));

    let tuning = SimTuning::default();
    sim.step(view, 0.016, tuning);

    let quadrant = |x: f32, y: f32| (x > view.center().x, y > view.center().y);
    let start_quadrants = sim
        .nodes()
        .iter()
        .map(|node| (node.id.clone(), quadrant(node.pos.x, node.pos.y)))
        .collect::<Vec<_>>();

    let mut travelled = vec![0.0_f32; sim.len()];
    let mut previous = sim.nodes().iter().map(|node| node.pos).collect::<Vec<_>>();

    for frame in 1..300 {
        sim.step(view, 0.016, tuning);

        for (index, node) in sim.nodes().iter().enumerate() {
            assert!(node.pos.x >= view.left() + node.radius - 1.0);
            assert!(node.pos.x <= view.right() - node.radius + 1.0);
            assert!(node.pos.y >= view.top() + node.radius - 1.0);
            assert!(node.pos.y <= view.bottom() - node.radius + 1.0);

            if frame >= 250 {
                travelled[index] += (node.pos - previous[index]).length();
            }
            previous[index] = node.pos;
        }
    }

    for (index, node) in sim.nodes().iter().enumerate() {
        let (id, start) = &start_quadrants[index];
        assert_eq!(id, &node.id);
        assert_eq!(
            quadrant(node.pos.x, node.pos.y),
            *start,
            "{id} wandered out of its quadrant"
        );
        assert!(
            travelled[index] > 1.0,
            "{id} stopped drifting near the end of the run"
        );
    }

    let nodes = sim.nodes();
    for first in 0..nodes.len() {
        for second in (first + 1)..nodes.len() {
            let distance = nodes[first].pos.distance(nodes[second].pos);
            assert!(distance >= nodes[first].radius + nodes[second].radius - 0.5);
        }
    }
}
