use chrono::{DateTime, Utc};

use crate::{log, log_warn, GameId};
use crate::games::RandomSource;
use super::settings::SnakeGameSettings;
use super::snake::Snake;
use super::snapshot::{FoodSnapshot, GameSnapshot, SnakeSnapshot, WallSnapshot};
use super::spawn::{pick_food_cell, pick_wall_cell};
use super::types::{Direction, FieldSize, GameStatus, Point};
use super::wall::Wall;

/// One single-player game: snake, food, transient walls and scoring.
#[derive(Clone, Debug)]
pub struct SnakeGame {
    id: GameId,
    settings: SnakeGameSettings,
    field_size: FieldSize,
    snake: Snake,
    food: Point,
    walls: Vec<Wall>,
    status: GameStatus,
    score: u32,
    food_count: u32,
    time_secs: u32,
    last_food_time: DateTime<Utc>,
    last_update_time: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SnakeGame {
    pub fn new(
        id: GameId,
        settings: SnakeGameSettings,
        now: DateTime<Utc>,
        rng: &mut impl RandomSource,
    ) -> Self {
        let field_size = settings.field_size();
        let start = Point::new(field_size.width / 2, field_size.height / 2);
        let snake = Snake::new(start, Direction::Right, settings.initial_snake_length);

        let mut game = Self {
            id,
            settings,
            field_size,
            snake,
            // Replaced by the initial spawn below.
            food: start,
            walls: Vec::new(),
            status: GameStatus::Running,
            score: 0,
            food_count: 0,
            time_secs: 0,
            last_food_time: now,
            last_update_time: now,
            created_at: now,
            updated_at: now,
        };
        game.respawn_food(now, rng);
        game
    }

    pub fn id(&self) -> &GameId {
        &self.id
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Point {
        self.food
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn food_count(&self) -> u32 {
        self.food_count
    }

    pub fn time_secs(&self) -> u32 {
        self.time_secs
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Queues a turn for the next step. Reversals of the last move and turns
    /// on an ended game are ignored; a later turn replaces an earlier one.
    pub fn change_direction(&mut self, direction: Direction) {
        if self.status != GameStatus::Running || direction.is_opposite(&self.snake.direction()) {
            return;
        }
        self.snake.queue_turn(direction);
    }

    /// Advances the game by one tick. No-op once the game has ended.
    pub fn step(&mut self, now: DateTime<Utc>, rng: &mut impl RandomSource) {
        if self.status != GameStatus::Running {
            return;
        }

        let next_head = self.snake.next_head();
        if self.collides(&next_head, now) {
            self.end("collision");
            return;
        }

        let ate_food = next_head == self.food;
        self.snake.advance(next_head, ate_food);
        if ate_food {
            self.food_count += 1;
            self.last_food_time = now;
            self.respawn_food(now, rng);
        }

        // Whole seconds only; the remainder is dropped when the clock advances.
        let elapsed_ms = (now - self.last_update_time).num_milliseconds();
        if elapsed_ms >= 1000 {
            self.time_secs += (elapsed_ms / 1000) as u32;
            self.last_update_time = now;
        }

        let since_food = (now - self.last_food_time).to_std().unwrap_or_default();
        if since_food > self.settings.starvation_timeout {
            self.end("starvation");
            return;
        }

        self.score = self.compute_score();
        self.updated_at = now;

        self.walls.retain(|wall| !wall.is_expired(now));

        if rng.chance(self.settings.wall_spawn_probability) {
            self.spawn_wall(now, rng);
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            id: self.id.to_string(),
            snake: SnakeSnapshot {
                body: self.snake.body().collect(),
                direction: self.snake.heading(),
            },
            food: FoodSnapshot {
                position: self.food,
            },
            walls: self
                .walls
                .iter()
                .map(|w| WallSnapshot {
                    position: w.position,
                    created_at: w.created_at,
                    lifetime: w.lifetime_secs,
                })
                .collect(),
            width: self.field_size.width,
            height: self.field_size.height,
            status: self.status,
            score: self.score,
            food_count: self.food_count,
            time: self.time_secs,
            last_food_time: self.last_food_time,
            created_at: self.created_at,
            updated_at: self.updated_at,
            last_update_time: self.last_update_time,
            max_walls: self.settings.max_walls,
        }
    }

    fn compute_score(&self) -> u32 {
        self.time_secs + self.food_count * self.settings.food_score
    }

    fn collides(&self, next_head: &Point, now: DateTime<Utc>) -> bool {
        if !self.field_size.contains(next_head) {
            return true;
        }

        // The tail has not moved yet, so it still counts.
        if self.snake.occupies(next_head) {
            return true;
        }

        self.walls
            .iter()
            .any(|wall| wall.position == *next_head && !wall.is_expired(now))
    }

    fn end(&mut self, reason: &str) {
        self.status = GameStatus::Ended;
        log!(
            "[game:{}] ended ({}). Score: {}, food: {}, time: {}s",
            self.id,
            reason,
            self.score,
            self.food_count,
            self.time_secs
        );
    }

    fn respawn_food(&mut self, now: DateTime<Utc>, rng: &mut impl RandomSource) {
        match pick_food_cell(&self.field_size, &self.snake, &self.walls, rng) {
            Some(cell) => {
                self.food = cell;
                self.last_food_time = now;
            }
            None => log_warn!("[game:{}] no free cell for food, keeping previous position", self.id),
        }
    }

    fn spawn_wall(&mut self, now: DateTime<Utc>, rng: &mut impl RandomSource) {
        if self.walls.len() >= self.settings.max_walls {
            return;
        }

        let cell = pick_wall_cell(
            &self.field_size,
            &self.snake,
            &self.food,
            &self.walls,
            &self.settings,
            rng,
        );

        match cell {
            Some(position) => {
                let lifetime = rng.range_inclusive(
                    self.settings.wall_lifetime_min_secs,
                    self.settings.wall_lifetime_max_secs,
                );
                self.walls.push(Wall::new(position, now, lifetime));
            }
            None => log_warn!("[game:{}] no candidate cell for a wall", self.id),
        }
    }

    #[cfg(test)]
    pub(crate) fn set_food(&mut self, food: Point) {
        self.food = food;
    }

    #[cfg(test)]
    pub(crate) fn set_snake(&mut self, snake: Snake) {
        self.snake = snake;
    }

    #[cfg(test)]
    pub(crate) fn push_wall(&mut self, wall: Wall) {
        self.walls.push(wall);
    }
}
