use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::config::{Config, GridSize, TickMode};
use crate::error::{ConfigError, GridSizeMismatch};
use crate::food::Food;
use crate::grid::{Grid, Tile};
use crate::input::{Direction, GameInput};
use crate::snake::{Position, Snake, occupies_same_position};

/// What ended a game under the stricter rule set.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathReason {
    SelfCollision,
    ObstacleCollision,
}

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    NotPlaying,
    Playing,
    GameOver(DeathReason),
}

/// Result of one simulation tick.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickOutcome {
    Moved,
    Ate,
    Died(DeathReason),
}

/// Complete mutable game state for one session.
#[derive(Debug, Clone)]
pub struct GameState {
    grid: Grid,
    snake: Snake,
    food: Food,
    status: GameStatus,
    running: bool,
    tick_accumulator: Duration,
    tick_count: u64,
    config: Config,
    rng: StdRng,
}

impl GameState {
    /// Creates a state seeded from OS entropy.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Creates a deterministic state for tests and reproducible runs.
    pub fn new_with_seed(config: Config, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: Config, mut rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;

        let bounds = config.grid_size();
        let snake = starting_snake(bounds);
        let grid = generate_board(&config, &snake, &mut rng);
        let food = initial_food(&config, &grid, &snake, &mut rng);

        debug!(
            cols = bounds.width,
            rows = bounds.height,
            obstacles = grid.obstacle_count(),
            "generated board"
        );

        Ok(Self {
            grid,
            snake,
            food,
            status: GameStatus::NotPlaying,
            running: true,
            tick_accumulator: Duration::ZERO,
            tick_count: 0,
            config,
            rng,
        })
    }

    /// Rebuilds board, snake and food from the same config, continuing the
    /// same random stream.
    pub fn restart(&mut self) {
        self.snake = starting_snake(self.bounds());
        self.grid = generate_board(&self.config, &self.snake, &mut self.rng);
        self.food = initial_food(&self.config, &self.grid, &self.snake, &mut self.rng);
        self.status = GameStatus::NotPlaying;
        self.tick_accumulator = Duration::ZERO;
        self.tick_count = 0;

        info!("game restarted");
    }

    /// Applies one external input event.
    pub fn apply_input(&mut self, input: GameInput) {
        match input {
            GameInput::Direction(direction) => self.set_heading(direction),
            GameInput::TogglePause => self.toggle_playing(),
            GameInput::Restart => {
                if self.running {
                    self.restart();
                }
            }
            GameInput::Quit => self.quit(),
        }
    }

    /// Buffers a direction request for the next tick.
    pub fn set_heading(&mut self, direction: Direction) {
        if self.running && !matches!(self.status, GameStatus::GameOver(_)) {
            self.snake.set_heading(direction);
        }
    }

    /// Switches between playing and not playing. No effect after game over.
    pub fn toggle_playing(&mut self) {
        self.status = match self.status {
            GameStatus::Playing => GameStatus::NotPlaying,
            GameStatus::NotPlaying => GameStatus::Playing,
            other => other,
        };
        info!(status = ?self.status, "play state toggled");
    }

    /// Stops the session for good.
    pub fn quit(&mut self) {
        if self.running {
            info!(ticks = self.tick_count, length = self.snake.len(), "quit requested");
        }
        self.running = false;
    }

    /// Effective interval between ticks for the current snake length.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        let seconds = match self.config.tick_mode {
            TickMode::Fixed => self.config.base_tick_secs,
            TickMode::SpeedUp => {
                let length = self.snake.len() as f64;
                (self.config.base_tick_secs - self.config.speedup_per_segment_secs * length)
                    .max(self.config.min_tick_secs)
            }
        };
        Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
    }

    /// Accumulates frame time and runs at most one tick once the interval is
    /// reached. Nothing accumulates unless the game is running and playing.
    pub fn update(&mut self, elapsed: Duration) -> Option<TickOutcome> {
        if !self.running || self.status != GameStatus::Playing {
            return None;
        }

        self.tick_accumulator += elapsed;
        if self.tick_accumulator < self.tick_interval() {
            return None;
        }

        Some(self.tick())
    }

    /// Advances simulation by one gameplay tick.
    pub fn tick(&mut self) -> TickOutcome {
        self.tick_accumulator = Duration::ZERO;
        self.tick_count += 1;

        let bounds = self.bounds();
        let vacated_tail = self.snake.advance(bounds);
        let head = self.snake.head();

        if let Some(reason) = self.collision(head) {
            self.status = GameStatus::GameOver(reason);
            info!(?reason, length = self.snake.len(), ticks = self.tick_count, "game over");
            return TickOutcome::Died(reason);
        }

        if !occupies_same_position(head, self.food.position) {
            return TickOutcome::Moved;
        }

        self.snake.grow(vacated_tail);
        self.respawn_food();
        debug!(
            length = self.snake.len(),
            food_x = self.food.position.x,
            food_y = self.food.position.y,
            "food eaten"
        );
        TickOutcome::Ate
    }

    fn collision(&self, head: Position) -> Option<DeathReason> {
        let rules = self.config.rules;
        if rules.obstacle_collision_ends_game && self.grid.is_obstacle(head) {
            return Some(DeathReason::ObstacleCollision);
        }
        if rules.self_collision_ends_game && self.snake.head_overlaps_body() {
            return Some(DeathReason::SelfCollision);
        }
        None
    }

    fn respawn_food(&mut self) {
        let rules = self.config.rules;
        if !rules.food_avoids_obstacles && !rules.food_avoids_snake {
            let bounds = self.bounds();
            self.food = Food::spawn(&mut self.rng, bounds);
            return;
        }

        // A board with no eligible cell keeps the old food where it is.
        if let Some(food) = Food::spawn_on_free_cell(
            &mut self.rng,
            &self.grid,
            &self.snake,
            rules.food_avoids_obstacles,
            rules.food_avoids_snake,
        ) {
            self.food = food;
        }
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[must_use]
    pub fn food(&self) -> Food {
        self.food
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.config.grid_size()
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// True before the first tick of a game.
    #[must_use]
    pub fn is_start_screen(&self) -> bool {
        self.status == GameStatus::NotPlaying && self.tick_count == 0
    }

    /// Replaces the snake. Intended for scenarios and tests.
    #[doc(hidden)]
    pub fn set_snake(&mut self, snake: Snake) {
        self.snake = snake;
    }

    /// Replaces the food. Intended for scenarios and tests.
    #[doc(hidden)]
    pub fn set_food(&mut self, food: Food) {
        self.food = food;
    }

    /// Replaces the board. Intended for scenarios and tests.
    #[doc(hidden)]
    pub fn set_grid(&mut self, grid: Grid) -> Result<(), GridSizeMismatch> {
        let configured = self.bounds();
        let actual = grid.size();
        if actual != configured {
            return Err(GridSizeMismatch {
                expected_cols: configured.width,
                expected_rows: configured.height,
                cols: actual.width,
                rows: actual.height,
            });
        }
        self.grid = grid;
        Ok(())
    }
}

fn starting_snake(bounds: GridSize) -> Snake {
    let head = Position {
        x: i32::from(bounds.width / 2),
        y: i32::from(bounds.height / 2),
    };
    Snake::new(head, Direction::Down, bounds)
}

/// Seeds obstacles. When obstacles are deadly, the start segments and the
/// first cell ahead of the head are kept empty.
fn generate_board(config: &Config, snake: &Snake, rng: &mut StdRng) -> Grid {
    let bounds = config.grid_size();
    let mut grid = Grid::generate(bounds, config.obstacle_probability, rng);

    if config.rules.obstacle_collision_ends_game {
        let first_step = snake.next_head_position(bounds);
        for cell in snake.segments().copied().chain([first_step]) {
            grid.set_tile_at(cell.y as usize, cell.x as usize, Tile::Empty);
        }
    }

    grid
}

fn initial_food(config: &Config, grid: &Grid, snake: &Snake, rng: &mut StdRng) -> Food {
    let rules = config.rules;
    if rules.food_avoids_obstacles || rules.food_avoids_snake {
        if let Some(food) = Food::spawn_on_free_cell(
            rng,
            grid,
            snake,
            rules.food_avoids_obstacles,
            rules.food_avoids_snake,
        ) {
            return food;
        }
    }
    Food::spawn(rng, config.grid_size())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{DeathReason, GameState, GameStatus, TickOutcome};
    use crate::config::{Config, Rules, TickMode};
    use crate::error::ConfigError;
    use crate::food::Food;
    use crate::grid::{Grid, Tile};
    use crate::input::{Direction, GameInput};
    use crate::snake::{Position, Snake};

    fn state_with(config: Config) -> GameState {
        GameState::new_with_seed(config, 1).expect("config is valid")
    }

    #[test]
    fn starts_not_playing_with_centered_snake() {
        let state = state_with(Config::default());

        assert_eq!(state.status(), GameStatus::NotPlaying);
        assert!(state.is_running());
        assert!(state.is_start_screen());
        let segments: Vec<_> = state.snake().segments().copied().collect();
        assert_eq!(segments, vec![Position { x: 8, y: 6 }, Position { x: 8, y: 5 }]);
        assert_eq!(state.snake().heading(), Direction::Down);
        assert!(state.food().position.is_within_bounds(state.bounds()));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = Config {
            grid_rows: 0,
            ..Config::default()
        };

        assert!(matches!(
            GameState::new_with_seed(config, 1),
            Err(ConfigError::EmptyGrid { .. })
        ));
    }

    #[test]
    fn tick_interval_shrinks_with_length_down_to_floor() {
        let mut state = state_with(Config::default());
        assert_eq!(state.tick_interval(), Duration::from_secs_f64(0.2 - 0.02));

        let long_body = (0..20).map(|x| Position { x, y: 0 }).collect();
        state.set_snake(Snake::from_segments(long_body, Direction::Right));
        assert_eq!(state.tick_interval(), Duration::from_secs_f64(0.1));
    }

    #[test]
    fn fixed_mode_ignores_length() {
        let mut state = state_with(Config {
            tick_mode: TickMode::Fixed,
            ..Config::default()
        });

        let long_body = (0..10).map(|x| Position { x, y: 0 }).collect();
        state.set_snake(Snake::from_segments(long_body, Direction::Right));
        assert_eq!(state.tick_interval(), Duration::from_secs_f64(0.2));
    }

    #[test]
    fn update_only_ticks_while_playing() {
        let mut state = state_with(Config::default());
        let head = state.snake().head();

        assert_eq!(state.update(Duration::from_secs(5)), None);
        assert_eq!(state.snake().head(), head);
        assert_eq!(state.tick_count(), 0);

        state.toggle_playing();
        assert_eq!(state.status(), GameStatus::Playing);
        assert_eq!(state.update(Duration::from_millis(100)), None);
        assert!(state.update(Duration::from_millis(100)).is_some());
        assert_eq!(state.tick_count(), 1);
    }

    #[test]
    fn update_runs_at_most_one_tick_and_resets_accumulator() {
        let mut state = state_with(Config::default());
        state.toggle_playing();

        assert!(state.update(Duration::from_secs(10)).is_some());
        assert_eq!(state.tick_count(), 1);

        assert_eq!(state.update(Duration::from_millis(10)), None);
        assert_eq!(state.tick_count(), 1);
    }

    #[test]
    fn eating_grows_by_one_and_redraws_food() {
        let mut state = state_with(Config::default());
        state.set_snake(Snake::from_segments(
            vec![Position { x: 3, y: 2 }, Position { x: 3, y: 1 }],
            Direction::Down,
        ));
        state.set_food(Food::new(Position { x: 3, y: 3 }));
        let mut expected_rng = state.rng.clone();
        let expected_food = Food::spawn(&mut expected_rng, state.bounds());

        assert_eq!(state.tick(), TickOutcome::Ate);
        assert_eq!(state.food(), expected_food);

        let segments: Vec<_> = state.snake().segments().copied().collect();
        assert_eq!(
            segments,
            vec![
                Position { x: 3, y: 3 },
                Position { x: 3, y: 2 },
                Position { x: 3, y: 1 },
            ]
        );
    }

    #[test]
    fn moving_without_food_keeps_length() {
        let mut state = state_with(Config::default());
        state.set_food(Food::new(Position { x: 0, y: 0 }));

        for _ in 0..5 {
            assert_eq!(state.tick(), TickOutcome::Moved);
        }
        assert_eq!(state.snake().len(), 2);
    }

    #[test]
    fn permissive_rules_allow_passing_through_obstacles_and_self() {
        let mut state = state_with(Config::default());
        let mut grid = Grid::empty(state.bounds());
        grid.set_tile_at(7, 8, Tile::Obstacle);
        state.set_grid(grid).expect("grid matches config");
        state.set_food(Food::new(Position { x: 0, y: 0 }));

        assert_eq!(state.tick(), TickOutcome::Moved);
        assert_eq!(state.snake().head(), Position { x: 8, y: 7 });
        assert_eq!(state.status(), GameStatus::NotPlaying);
    }

    #[test]
    fn strict_rules_end_game_on_obstacle() {
        let mut state = state_with(Config {
            rules: Rules::strict(),
            ..Config::default()
        });
        let mut grid = Grid::empty(state.bounds());
        grid.set_tile_at(7, 8, Tile::Obstacle);
        state.set_grid(grid).expect("grid matches config");
        state.toggle_playing();

        assert_eq!(
            state.tick(),
            TickOutcome::Died(DeathReason::ObstacleCollision)
        );
        assert_eq!(
            state.status(),
            GameStatus::GameOver(DeathReason::ObstacleCollision)
        );
        assert_eq!(state.update(Duration::from_secs(1)), None);

        state.toggle_playing();
        assert!(matches!(state.status(), GameStatus::GameOver(_)));
    }

    #[test]
    fn strict_rules_end_game_on_self_collision() {
        let mut state = state_with(Config {
            rules: Rules::strict(),
            ..Config::default()
        });
        state
            .set_grid(Grid::empty(state.bounds()))
            .expect("grid matches config");
        state.set_snake(Snake::from_segments(
            vec![
                Position { x: 2, y: 2 },
                Position { x: 1, y: 2 },
                Position { x: 1, y: 3 },
                Position { x: 2, y: 3 },
                Position { x: 3, y: 3 },
                Position { x: 3, y: 2 },
            ],
            Direction::Right,
        ));
        state.set_heading(Direction::Down);

        assert_eq!(state.tick(), TickOutcome::Died(DeathReason::SelfCollision));
    }

    #[test]
    fn strict_food_never_lands_on_snake_or_obstacle() {
        let mut state = state_with(Config {
            rules: Rules::strict(),
            obstacle_probability: 0.3,
            ..Config::default()
        });

        for _ in 0..50 {
            state.restart();
            let food = state.food().position;
            assert!(!state.snake().occupies(food));
            assert!(!state.grid().is_obstacle(food));
        }
    }

    #[test]
    fn inputs_dispatch_to_state() {
        let mut state = state_with(Config::default());

        state.apply_input(GameInput::Direction(Direction::Up));
        assert_eq!(state.snake().pending_heading(), Direction::Down);

        state.apply_input(GameInput::Direction(Direction::Left));
        assert_eq!(state.snake().pending_heading(), Direction::Left);

        state.apply_input(GameInput::TogglePause);
        assert_eq!(state.status(), GameStatus::Playing);

        state.tick();
        state.apply_input(GameInput::Restart);
        assert!(state.is_start_screen());

        state.apply_input(GameInput::Quit);
        assert!(!state.is_running());
        state.apply_input(GameInput::TogglePause);
        assert_eq!(state.update(Duration::from_secs(1)), None);
        assert!(!state.is_running());
    }

    #[test]
    fn strict_games_never_die_on_the_first_tick() {
        let config = Config {
            rules: Rules::strict(),
            ..Config::default()
        };

        for seed in 0..1_000 {
            let mut state = GameState::new_with_seed(config.clone(), seed).expect("config is valid");
            assert!(
                !matches!(state.tick(), TickOutcome::Died(_)),
                "seed {seed} died on the first tick"
            );

            state.restart();
            assert!(
                !matches!(state.tick(), TickOutcome::Died(_)),
                "seed {seed} died on the first tick after restart"
            );
        }
    }

    #[test]
    fn permissive_board_keeps_obstacles_under_the_start() {
        let mut state = state_with(Config {
            obstacle_probability: 1.0,
            ..Config::default()
        });

        state.set_food(Food::new(Position { x: 0, y: 0 }));

        assert_eq!(state.grid().obstacle_count(), state.bounds().total_cells());
        assert_eq!(state.tick(), TickOutcome::Moved);
    }

    #[test]
    fn mismatched_grid_is_refused() {
        let mut state = state_with(Config::default());
        let before = state.grid().clone();

        let error = state
            .set_grid(Grid::empty(crate::config::GridSize {
                width: 4,
                height: 4,
            }))
            .expect_err("4x4 board does not fit a 16x12 game");

        assert_eq!((error.cols, error.rows), (4, 4));
        assert_eq!((error.expected_cols, error.expected_rows), (16, 12));
        assert_eq!(state.grid(), &before);
    }

    #[test]
    fn longest_allowed_tick_converts() {
        let state = state_with(Config {
            base_tick_secs: crate::config::MAX_TICK_SECS,
            min_tick_secs: crate::config::MAX_TICK_SECS,
            ..Config::default()
        });

        assert_eq!(state.tick_interval(), Duration::from_secs(3600));
    }
}
