//! Unit tests for the heuristic shot planner

use storyboard_gateway::planner::heuristic::{
    DOLLY_MOVEMENT, EYE_LEVEL_ANGLE, FINAL_SHOT_DURATION_SEC, PAN_MOVEMENT, SHOT_DURATION_SEC,
    SHOT_NOTES, STATIC_MOVEMENT, THREE_QUARTER_ANGLE,
};
use storyboard_gateway::planner::{Framing, HeuristicPlanner, MAX_SHOTS, MIN_SHOTS};

#[test]
fn test_plan_length_and_ids() {
    let planner = HeuristicPlanner::new();

    for count in MIN_SHOTS..=MAX_SHOTS {
        let plan = planner.plan("a street at dusk", count, "en");
        assert_eq!(plan.len(), count as usize);

        let ids: Vec<u32> = plan.iter().map(|s| s.id).collect();
        let expected: Vec<u32> = (1..=count).collect();
        assert_eq!(ids, expected);

        for shot in &plan {
            assert_eq!(shot.title, format!("Shot {}", shot.id));
            assert_eq!(shot.notes, SHOT_NOTES);
        }
    }
}

#[test]
fn test_first_shot_is_always_static() {
    let planner = HeuristicPlanner::new();

    for prompt in ["dolly in slowly", "pan across the room", "دالی", ""] {
        for count in MIN_SHOTS..=MAX_SHOTS {
            assert_eq!(planner.plan(prompt, count, "fa")[0].movement, STATIC_MOVEMENT);
        }
    }
}

#[test]
fn test_movement_follows_dolly_keyword() {
    let planner = HeuristicPlanner::new();

    let with_dolly = planner.plan("slow dolly toward the window", 6, "en");
    assert!(with_dolly[1..].iter().all(|s| s.movement == DOLLY_MOVEMENT));

    let without = planner.plan("slow push toward the window", 6, "en");
    assert!(without[1..].iter().all(|s| s.movement == PAN_MOVEMENT));
}

#[test]
fn test_framing_and_lens_have_period_four() {
    let plan = HeuristicPlanner::new().plan("brief", MAX_SHOTS, "en");

    for i in 4..plan.len() {
        assert_eq!(plan[i].framing, plan[i - 4].framing);
        assert_eq!(plan[i].lens, plan[i - 4].lens);
    }

    let framings: Vec<Framing> = plan[..4].iter().map(|s| s.framing).collect();
    assert_eq!(
        framings,
        vec![Framing::Wide, Framing::Medium, Framing::Close, Framing::ExtremeClose]
    );
    let lenses: Vec<&str> = plan[..4].iter().map(|s| s.lens.as_str()).collect();
    assert_eq!(lenses, vec!["24mm", "35mm", "50mm", "85mm"]);
}

#[test]
fn test_angle_is_uniform() {
    let planner = HeuristicPlanner::new();

    let angled = planner.plan("hero at a 45 degree angle", 5, "en");
    assert!(angled.iter().all(|s| s.camera_angle == THREE_QUARTER_ANGLE));

    let level = planner.plan("hero at a low angle", 5, "en");
    assert!(level.iter().all(|s| s.camera_angle == EYE_LEVEL_ANGLE));
}

#[test]
fn test_last_shot_holds_longer() {
    let plan = HeuristicPlanner::new().plan("brief", 4, "en");

    assert!(plan[..3].iter().all(|s| s.duration_sec == SHOT_DURATION_SEC));
    assert_eq!(plan[3].duration_sec, FINAL_SHOT_DURATION_SEC);
}

#[test]
fn test_plan_is_deterministic() {
    let planner = HeuristicPlanner::new();
    assert_eq!(
        planner.plan("dolly in on the hero, 45 degree angle", 7, "en"),
        planner.plan("dolly in on the hero, 45 degree angle", 7, "en")
    );
}
