//! Placement rules for food and walls.
//!
//! Both scans walk the whole field, so a spawn is O(width * height).

use std::collections::HashSet;

use crate::games::RandomSource;
use super::settings::SnakeGameSettings;
use super::snake::Snake;
use super::types::{FieldSize, Point};
use super::wall::Wall;

/// Picks a food cell uniformly among cells free of snake and walls.
/// Returns `None` when the field is full.
pub fn pick_food_cell(
    field: &FieldSize,
    snake: &Snake,
    walls: &[Wall],
    rng: &mut impl RandomSource,
) -> Option<Point> {
    let wall_cells: HashSet<Point> = walls.iter().map(|w| w.position).collect();

    let free: Vec<Point> = field
        .cells()
        .filter(|p| !snake.occupies(p) && !wall_cells.contains(p))
        .collect();

    if free.is_empty() {
        return None;
    }

    Some(free[rng.index(free.len())])
}

/// Picks a wall cell among cells free of snake, food and walls.
///
/// Cells within `near_head_radius` (Chebyshev) of the head are only
/// candidates when a per-cell override roll succeeds. Returns `None` when the
/// wall cap is reached or no candidate is left.
pub fn pick_wall_cell(
    field: &FieldSize,
    snake: &Snake,
    food: &Point,
    walls: &[Wall],
    settings: &SnakeGameSettings,
    rng: &mut impl RandomSource,
) -> Option<Point> {
    if walls.len() >= settings.max_walls {
        return None;
    }

    let wall_cells: HashSet<Point> = walls.iter().map(|w| w.position).collect();
    let head = snake.head();

    let mut candidates = Vec::new();
    for p in field.cells() {
        if snake.occupies(&p) || p == *food || wall_cells.contains(&p) {
            continue;
        }

        let near_head = p.chebyshev_distance(&head) <= settings.near_head_radius;
        if !near_head || rng.chance(settings.near_head_override_probability) {
            candidates.push(p);
        }
    }

    if candidates.is_empty() {
        return None;
    }

    Some(candidates[rng.index(candidates.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::SessionRng;
    use crate::games::snake::types::Direction;
    use chrono::Utc;

    fn snake() -> Snake {
        Snake::new(Point::new(7, 7), Direction::Right, 3)
    }

    #[test]
    fn test_food_never_lands_on_snake_or_wall() {
        let field = FieldSize::new(15, 15);
        let snake = snake();
        let walls = vec![Wall::new(Point::new(0, 0), Utc::now(), 5)];
        let mut rng = SessionRng::new(11);

        for _ in 0..500 {
            let food = pick_food_cell(&field, &snake, &walls, &mut rng).unwrap();
            assert!(field.contains(&food));
            assert!(!snake.occupies(&food));
            assert_ne!(food, Point::new(0, 0));
        }
    }

    #[test]
    fn test_food_picks_only_free_cell() {
        let field = FieldSize::new(2, 2);
        let snake = Snake::from_body(
            vec![Point::new(0, 0), Point::new(1, 0), Point::new(1, 1)],
            Direction::Left,
        );
        let mut rng = SessionRng::new(5);
        assert_eq!(
            pick_food_cell(&field, &snake, &[], &mut rng),
            Some(Point::new(0, 1))
        );
    }

    #[test]
    fn test_food_on_full_field_is_none() {
        let field = FieldSize::new(2, 1);
        let snake = Snake::from_body(vec![Point::new(0, 0)], Direction::Left);
        let walls = vec![Wall::new(Point::new(1, 0), Utc::now(), 5)];
        let mut rng = SessionRng::new(5);
        assert_eq!(pick_food_cell(&field, &snake, &walls, &mut rng), None);
    }

    #[test]
    fn test_wall_respects_cap() {
        let field = FieldSize::new(15, 15);
        let settings = SnakeGameSettings {
            max_walls: 1,
            ..SnakeGameSettings::default()
        };
        let walls = vec![Wall::new(Point::new(0, 0), Utc::now(), 5)];
        let mut rng = SessionRng::new(5);
        let food = Point::new(10, 10);
        assert_eq!(
            pick_wall_cell(&field, &snake(), &food, &walls, &settings, &mut rng),
            None
        );
    }

    #[test]
    fn test_wall_avoids_head_without_override() {
        let field = FieldSize::new(15, 15);
        let settings = SnakeGameSettings {
            near_head_override_probability: 0.0,
            ..SnakeGameSettings::default()
        };
        let snake = snake();
        let food = Point::new(10, 10);
        let mut rng = SessionRng::new(21);

        for _ in 0..300 {
            let wall = pick_wall_cell(&field, &snake, &food, &[], &settings, &mut rng).unwrap();
            assert!(wall.chebyshev_distance(&snake.head()) > 2);
            assert_ne!(wall, food);
            assert!(!snake.occupies(&wall));
        }
    }

    #[test]
    fn test_wall_near_head_allowed_with_override() {
        let field = FieldSize::new(5, 5);
        let settings = SnakeGameSettings {
            near_head_override_probability: 1.0,
            ..SnakeGameSettings::default()
        };
        let snake = Snake::from_body(vec![Point::new(2, 2)], Direction::Right);
        let food = Point::new(0, 0);
        let mut rng = SessionRng::new(8);

        // Every cell of a 5x5 field is within distance 2 of the centre.
        let wall = pick_wall_cell(&field, &snake, &food, &[], &settings, &mut rng);
        assert!(wall.is_some());
    }

    #[test]
    fn test_wall_none_when_only_near_head_cells_and_no_override() {
        let field = FieldSize::new(5, 5);
        let settings = SnakeGameSettings {
            near_head_override_probability: 0.0,
            ..SnakeGameSettings::default()
        };
        let snake = Snake::from_body(vec![Point::new(2, 2)], Direction::Right);
        let food = Point::new(0, 0);
        let mut rng = SessionRng::new(8);
        assert_eq!(
            pick_wall_cell(&field, &snake, &food, &[], &settings, &mut rng),
            None
        );
    }
}
