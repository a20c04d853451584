//! Enemy formation: grid layout, edge bounce and speed escalation

use glam::Vec2;

use super::state::{Canvas, Enemy, Formation};
use crate::consts::*;

/// Result of one formation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormationStep {
    /// Enemies moved
    Moved,
    /// No enemies left, nothing moved
    Cleared,
}

/// Lay out the starting grid: rows top to bottom, centered horizontally,
/// top row at 1/8 of the height. Higher rows are worth more.
pub fn build_grid(canvas: &Canvas) -> Vec<Enemy> {
    let size = canvas.enemy_size();
    let start_x = (canvas.width - canvas.grid_width()) / 2.0;
    let start_y = canvas.height / 8.0;

    let mut enemies = Vec::with_capacity((ENEMY_ROWS * ENEMY_COLS) as usize);
    for row in 0..ENEMY_ROWS {
        for col in 0..ENEMY_COLS {
            enemies.push(Enemy {
                pos: Vec2::new(
                    start_x + col as f32 * (size.x + ENEMY_SPACING_H),
                    start_y + row as f32 * (size.y + ENEMY_SPACING_V),
                ),
                size,
                row,
                points: (ENEMY_ROWS - row) as u64 * ROW_POINTS_STEP,
            });
        }
    }
    enemies
}

/// Horizontal extent (leftmost x, rightmost x + width) of the formation
fn extent(enemies: &[Enemy]) -> Option<(f32, f32)> {
    enemies.iter().fold(None, |acc, e| {
        let (left, right) = acc.unwrap_or((f32::INFINITY, f32::NEG_INFINITY));
        Some((left.min(e.rect().left()), right.max(e.rect().right())))
    })
}

/// Advance every enemy by `direction * speed * dt`.
///
/// Reverse-then-move: when the formation touches the wall it is heading
/// toward, the direction flips first and this tick's displacement already
/// uses the new direction. A step that would carry the formation past a wall
/// is pulled back so every enemy stays within `[0, canvas_width]`.
pub fn move_enemies(
    formation: &mut Formation,
    enemies: &mut [Enemy],
    canvas_width: f32,
    dt: f32,
) -> FormationStep {
    let Some((leftmost, rightmost)) = extent(enemies) else {
        return FormationStep::Cleared;
    };

    if (rightmost >= canvas_width && formation.direction > 0.0)
        || (leftmost <= 0.0 && formation.direction < 0.0)
    {
        formation.direction = -formation.direction;
    }

    let dx = formation.direction * formation.speed * dt;
    let (leftmost, rightmost) = (leftmost + dx, rightmost + dx);

    // Overshoot correction
    let correction = if rightmost > canvas_width {
        canvas_width - rightmost
    } else if leftmost < 0.0 {
        -leftmost
    } else {
        0.0
    };

    for enemy in enemies.iter_mut() {
        enemy.pos.x += dx + correction;
    }

    FormationStep::Moved
}

/// Speed up the formation and its missiles. Capped at `MAX_ESCALATIONS`
/// per session; returns whether an escalation was applied.
pub fn escalate(formation: &mut Formation, running: bool) -> bool {
    if !running || formation.acceleration_count >= MAX_ESCALATIONS {
        return false;
    }
    formation.speed *= ESCALATION_FACTOR;
    formation.enemy_missile_speed *= ESCALATION_FACTOR;
    formation.acceleration_count += 1;
    log::info!(
        "Enemies accelerated to {:.1} px/s (level {})",
        formation.speed,
        formation.acceleration_count
    );
    true
}

/// Accumulate running time and escalate once per `ESCALATION_PERIOD_SECS`.
/// Returns the new escalation level when one was applied.
pub fn advance_escalation_timer(formation: &mut Formation, dt: f32) -> Option<u32> {
    formation.escalation_timer += dt;
    if formation.escalation_timer < ESCALATION_PERIOD_SECS {
        return None;
    }
    formation.escalation_timer -= ESCALATION_PERIOD_SECS;
    escalate(formation, true).then_some(formation.acceleration_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn canvas() -> Canvas {
        Canvas::new(800.0, 600.0)
    }

    #[test]
    fn test_build_grid() {
        let enemies = build_grid(&canvas());
        assert_eq!(enemies.len(), 20);

        // Row points 20, 15, 10, 5 top to bottom
        for (row, points) in [(0, 20), (1, 15), (2, 10), (3, 5)] {
            let in_row: Vec<_> = enemies.iter().filter(|e| e.row == row).collect();
            assert_eq!(in_row.len(), 5);
            assert!(in_row.iter().all(|e| e.points == points));
        }

        // Centered: (800 - 5 * 60) / 2 = 250, top row at 600 / 8
        assert_eq!(enemies[0].pos, Vec2::new(250.0, 75.0));
        assert_eq!(enemies[1].pos.x, 310.0);
        assert_eq!(enemies[5].pos.y, 135.0);
    }

    #[test]
    fn test_move_empty_is_cleared() {
        let mut formation = Formation::new(&canvas());
        let mut enemies: Vec<Enemy> = Vec::new();
        assert_eq!(
            move_enemies(&mut formation, &mut enemies, 800.0, SIM_DT),
            FormationStep::Cleared
        );
        assert_eq!(formation.direction, 1.0);
    }

    #[test]
    fn test_move_shifts_all_enemies() {
        let canvas = canvas();
        let mut formation = Formation::new(&canvas);
        let mut enemies = build_grid(&canvas);
        let before: Vec<f32> = enemies.iter().map(|e| e.pos.x).collect();

        let step = move_enemies(&mut formation, &mut enemies, canvas.width, 0.1);
        assert_eq!(step, FormationStep::Moved);

        let dx = formation.speed * 0.1;
        for (enemy, x) in enemies.iter().zip(before) {
            assert!((enemy.pos.x - (x + dx)).abs() < 0.001);
        }
    }

    #[test]
    fn test_reverse_then_move_at_right_wall() {
        let canvas = canvas();
        let mut formation = Formation::new(&canvas);
        let mut enemies = build_grid(&canvas);
        // Push the block flush against the right wall
        let shift = canvas.width - enemies.iter().map(|e| e.rect().right()).fold(0.0, f32::max);
        for e in &mut enemies {
            e.pos.x += shift;
        }
        let right_before = enemies.iter().map(|e| e.rect().right()).fold(0.0, f32::max);
        assert_eq!(right_before, canvas.width);

        move_enemies(&mut formation, &mut enemies, canvas.width, 0.1);
        assert_eq!(formation.direction, -1.0);
        // Same tick already moves left
        let right_after = enemies.iter().map(|e| e.rect().right()).fold(0.0, f32::max);
        assert!(right_after < canvas.width);
    }

    #[test]
    fn test_reverse_at_left_wall() {
        let canvas = canvas();
        let mut formation = Formation::new(&canvas);
        formation.direction = -1.0;
        let mut enemies = build_grid(&canvas);
        let shift = enemies.iter().map(|e| e.pos.x).fold(f32::INFINITY, f32::min);
        for e in &mut enemies {
            e.pos.x -= shift;
        }

        move_enemies(&mut formation, &mut enemies, canvas.width, 0.1);
        assert_eq!(formation.direction, 1.0);
        assert!(enemies.iter().all(|e| e.pos.x > 0.0));
    }

    #[test]
    fn test_overshoot_is_pulled_back() {
        let canvas = canvas();
        let mut formation = Formation::new(&canvas);
        let mut enemies = build_grid(&canvas);
        // One pixel short of the wall, moving right with a big step
        let shift =
            canvas.width - 1.0 - enemies.iter().map(|e| e.rect().right()).fold(0.0, f32::max);
        for e in &mut enemies {
            e.pos.x += shift;
        }

        move_enemies(&mut formation, &mut enemies, canvas.width, 0.5);
        assert_eq!(formation.direction, 1.0);
        let right = enemies.iter().map(|e| e.rect().right()).fold(0.0, f32::max);
        assert!((right - canvas.width).abs() < 0.001);

        // Next step flips
        move_enemies(&mut formation, &mut enemies, canvas.width, SIM_DT);
        assert_eq!(formation.direction, -1.0);
    }

    #[test]
    fn test_escalate_caps_at_four() {
        let canvas = canvas();
        let mut formation = Formation::new(&canvas);
        let base_speed = formation.speed;
        let base_missile = formation.enemy_missile_speed;

        for _ in 0..10 {
            escalate(&mut formation, true);
        }
        assert_eq!(formation.acceleration_count, MAX_ESCALATIONS);
        let factor = ESCALATION_FACTOR.powi(MAX_ESCALATIONS as i32);
        assert!((formation.speed - base_speed * factor).abs() < 0.01);
        assert!((formation.enemy_missile_speed - base_missile * factor).abs() < 0.01);
    }

    #[test]
    fn test_escalate_requires_running() {
        let mut formation = Formation::new(&canvas());
        let speed = formation.speed;
        assert!(!escalate(&mut formation, false));
        assert_eq!(formation.speed, speed);
        assert_eq!(formation.acceleration_count, 0);
    }

    #[test]
    fn test_escalation_timer_period() {
        let mut formation = Formation::new(&canvas());
        assert_eq!(advance_escalation_timer(&mut formation, 4.9), None);
        assert_eq!(advance_escalation_timer(&mut formation, 0.2), Some(1));
        assert!((formation.escalation_timer - 0.1).abs() < 0.001);

        for level in 2..=4 {
            assert_eq!(advance_escalation_timer(&mut formation, 5.0), Some(level));
        }
        // Capped from here on
        assert_eq!(advance_escalation_timer(&mut formation, 5.0), None);
        assert_eq!(advance_escalation_timer(&mut formation, 50.0), None);
        assert_eq!(formation.acceleration_count, 4);
    }

    proptest! {
        #[test]
        fn prop_formation_stays_on_canvas(
            ticks in 1usize..3000,
            escalations in 0u32..=4,
            kill_mask in any::<u32>(),
        ) {
            let canvas = canvas();
            let mut formation = Formation::new(&canvas);
            for _ in 0..escalations {
                escalate(&mut formation, true);
            }
            // Thin the grid so narrower formations are covered too
            let mut enemies: Vec<Enemy> = build_grid(&canvas)
                .into_iter()
                .enumerate()
                .filter(|(i, _)| kill_mask & (1 << i) == 0)
                .map(|(_, e)| e)
                .collect();
            if enemies.is_empty() {
                return Ok(());
            }

            for _ in 0..ticks {
                move_enemies(&mut formation, &mut enemies, canvas.width, SIM_DT);
                for e in &enemies {
                    prop_assert!(e.rect().left() >= -0.001);
                    prop_assert!(e.rect().right() <= canvas.width + 0.001);
                }
            }
        }
    }
}
