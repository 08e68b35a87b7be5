mod game_state;
mod settings;
mod snake;
mod snapshot;
mod spawn;
mod types;
mod wall;

pub use game_state::SnakeGame;
pub use settings::SnakeGameSettings;
pub use snake::Snake;
pub use snapshot::{FoodSnapshot, GameSnapshot, SnakeSnapshot, WallSnapshot};
pub use spawn::{pick_food_cell, pick_wall_cell};
pub use types::{Direction, FieldSize, GameStatus, Point};
pub use wall::Wall;
