use chrono::{TimeDelta, Utc};
use common::GameId;
use common::games::SessionRng;
use common::games::snake::{
    Direction, FieldSize, Point, Snake, SnakeGame, SnakeGameSettings, pick_food_cell,
    pick_wall_cell,
};
use criterion::{Criterion, criterion_group, criterion_main};

fn settings(size: i32) -> SnakeGameSettings {
    SnakeGameSettings {
        field_width: size,
        field_height: size,
        ..SnakeGameSettings::default()
    }
}

fn bench_step_until_end(c: &mut Criterion, size: i32) {
    let name = format!("step_{}x{}_until_end", size, size);
    c.bench_function(&name, |b| {
        b.iter(|| {
            let mut rng = SessionRng::new(42);
            let start = Utc::now();
            let mut game = SnakeGame::new(GameId::from("bench"), settings(size), start, &mut rng);
            let turns = [Direction::Down, Direction::Left, Direction::Up, Direction::Right];

            for i in 0..200i64 {
                if i % 4 == 0 {
                    game.change_direction(turns[((i / 4) % 4) as usize]);
                }
                game.step(start + TimeDelta::milliseconds(50 * (i + 1)), &mut rng);
                if !game.is_running() {
                    break;
                }
            }
        });
    });
}

fn bench_steps(c: &mut Criterion) {
    bench_step_until_end(c, 15);
    bench_step_until_end(c, 100);
}

fn bench_spawn_scan(c: &mut Criterion) {
    let field = FieldSize::new(100, 100);
    let snake = Snake::new(Point::new(50, 50), Direction::Right, 40);
    let spawn_settings = settings(100);

    c.bench_function("food_spawn_100x100", |b| {
        let mut rng = SessionRng::new(7);
        b.iter(|| pick_food_cell(&field, &snake, &[], &mut rng));
    });

    c.bench_function("wall_spawn_100x100", |b| {
        let mut rng = SessionRng::new(7);
        let food = Point::new(3, 3);
        b.iter(|| pick_wall_cell(&field, &snake, &food, &[], &spawn_settings, &mut rng));
    });
}

criterion_group!(benches, bench_steps, bench_spawn_scan);
criterion_main!(benches);
