//! Snake game state and drawing

use heapless::Deque;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rasterline_core::config::ConfigError;
use rasterline_core::{ContentGenerator, FrameContext, FrameView, RawPixel};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::grid::{Cell, Direction, Grid};
use crate::palette;

/// Longest the snake can grow
pub const MAX_SNAKE_LEN: usize = 100;

/// Undelivered events kept before the oldest is dropped
pub const MAX_EVENTS: usize = 8;

/// Random cells tried when placing food before settling for one on the snake
const FOOD_ATTEMPTS: usize = 32;

/// Snake game configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SnakeConfig {
    /// Block edge in pixels
    pub block_size: u16,
    /// Head cell at (re)start
    pub start: Cell,
    /// Snake length at (re)start
    pub initial_len: u8,
    /// Heading at (re)start; the body trails behind the head
    pub direction: Direction,
    /// Food cell at (re)start
    pub food: Cell,
    /// Frames between moves
    pub move_every_frames: u32,
    /// Length at which eating stops growing the snake
    pub max_len: u8,
    /// Seed for food placement
    pub seed: u64,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            block_size: 8,
            start: Cell::new(10, 5),
            initial_len: 5,
            direction: Direction::Right,
            food: Cell::new(10, 10),
            // 250 ms at 60 Hz
            move_every_frames: 15,
            max_len: MAX_SNAKE_LEN as u8,
            seed: 0x5eed,
        }
    }
}

impl SnakeConfig {
    /// Validate against a frame size, returning the playfield grid
    pub fn validate(&self, width: u16, height: u16) -> Result<Grid, ConfigError> {
        let grid = Grid::for_frame(width, height, self.block_size)
            .ok_or(ConfigError::InvalidValue("block_size"))?;
        let (cols, rows) = grid.interior_size();
        if cols < 1 || rows < 1 {
            return Err(ConfigError::InvalidValue("block_size"));
        }
        if self.max_len == 0 || self.max_len as usize > MAX_SNAKE_LEN {
            return Err(ConfigError::InvalidValue("max_len"));
        }
        if self.initial_len == 0 || self.initial_len > self.max_len {
            return Err(ConfigError::InvalidValue("initial_len"));
        }
        if self.move_every_frames == 0 {
            return Err(ConfigError::InvalidValue("move_every_frames"));
        }
        let tail = self.initial_cells().last().unwrap_or(self.start);
        if grid.is_border(self.start) || grid.is_border(tail) {
            return Err(ConfigError::InvalidValue("start"));
        }
        if grid.is_border(self.food) {
            return Err(ConfigError::InvalidValue("food"));
        }
        Ok(grid)
    }

    /// Body cells at (re)start, head first
    fn initial_cells(&self) -> impl Iterator<Item = Cell> {
        let behind = self.direction.opposite();
        let start = self.start;
        (0..self.initial_len).scan(start, move |cell, _| {
            let current = *cell;
            *cell = cell.step(behind);
            Some(current)
        })
    }
}

/// Game transitions worth reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SnakeEvent {
    /// Game returned to its initial configuration
    Reset,
    /// Head ran into the border
    BorderCollision,
    /// Head ran into the body
    SelfCollision,
    /// Head reached the food
    FoodEaten,
}

/// Result of one move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepOutcome {
    /// Head advanced; the tail left `vacated`
    Moved { head: Cell, vacated: Option<Cell> },
    /// Head advanced onto the food and new food was placed
    Ate {
        head: Cell,
        vacated: Option<Cell>,
        food: Cell,
    },
    /// Collision; the game is back at its initial configuration
    Reset,
}

/// Grid snake game
pub struct SnakeGame {
    config: SnakeConfig,
    grid: Grid,
    /// Head at the front
    body: Deque<Cell, MAX_SNAKE_LEN>,
    direction: Direction,
    food: Cell,
    rng: SmallRng,
    frames_since_move: u32,
    needs_redraw: bool,
    events: Deque<SnakeEvent, MAX_EVENTS>,
}

impl SnakeGame {
    /// Create a game for a frame of `width` x `height` pixels
    ///
    /// The game starts in its initial configuration with a `Reset` event
    /// queued, and draws the whole playfield on the first frame.
    pub fn new(config: SnakeConfig, width: u16, height: u16) -> Result<Self, ConfigError> {
        let grid = config.validate(width, height)?;
        let mut game = Self {
            config,
            grid,
            body: Deque::new(),
            direction: config.direction,
            food: config.food,
            rng: SmallRng::seed_from_u64(config.seed),
            frames_since_move: 0,
            needs_redraw: true,
            events: Deque::new(),
        };
        game.reset();
        Ok(game)
    }

    pub fn config(&self) -> &SnakeConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Head cell
    pub fn head(&self) -> Option<Cell> {
        self.body.front().copied()
    }

    /// Snake length in cells
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false once constructed
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Body cells, head first
    pub fn body(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    /// Change heading; takes effect on the next move
    ///
    /// Reversing straight back onto the body is allowed and collides.
    pub fn steer(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Move the food to a chosen cell
    ///
    /// Rejected if the cell is on the border or under the snake.
    pub fn place_food(&mut self, cell: Cell) -> bool {
        if self.grid.is_border(cell) || self.occupies(cell) {
            return false;
        }
        self.food = cell;
        self.needs_redraw = true;
        true
    }

    /// Take the oldest undelivered event
    pub fn pop_event(&mut self) -> Option<SnakeEvent> {
        self.events.pop_front()
    }

    /// Advance the snake by one cell
    pub fn step(&mut self) -> StepOutcome {
        let Some(head) = self.head() else {
            self.reset();
            return StepOutcome::Reset;
        };
        let next = head.step(self.direction);

        if self.grid.is_border(next) {
            self.push_event(SnakeEvent::BorderCollision);
            self.reset();
            return StepOutcome::Reset;
        }
        if self.body.iter().skip(1).any(|&cell| cell == next) {
            self.push_event(SnakeEvent::SelfCollision);
            self.reset();
            return StepOutcome::Reset;
        }

        if next == self.food {
            self.push_event(SnakeEvent::FoodEaten);
            // At the length limit the snake keeps moving without growing
            let vacated = if self.body.len() >= self.config.max_len as usize {
                self.body.pop_back()
            } else {
                None
            };
            let _ = self.body.push_front(next);
            let food = self.place_random_food();
            StepOutcome::Ate {
                head: next,
                vacated,
                food,
            }
        } else {
            let vacated = self.body.pop_back();
            let _ = self.body.push_front(next);
            StepOutcome::Moved {
                head: next,
                vacated,
            }
        }
    }

    /// Return to the initial configuration and queue a `Reset` event
    pub fn reset(&mut self) {
        self.body.clear();
        for cell in self.config.initial_cells() {
            let _ = self.body.push_back(cell);
        }
        self.direction = self.config.direction;
        self.food = self.config.food;
        self.frames_since_move = 0;
        self.needs_redraw = true;
        self.push_event(SnakeEvent::Reset);
    }

    fn occupies(&self, cell: Cell) -> bool {
        self.body.iter().any(|&c| c == cell)
    }

    fn place_random_food(&mut self) -> Cell {
        let (cols, rows) = self.grid.interior_size();
        let mut cell = self.food;
        for _ in 0..FOOD_ATTEMPTS {
            cell = Cell::new(self.rng.gen_range(1..=cols), self.rng.gen_range(1..=rows));
            if !self.occupies(cell) {
                break;
            }
        }
        self.food = cell;
        cell
    }

    fn push_event(&mut self, event: SnakeEvent) {
        if self.events.is_full() {
            self.events.pop_front();
        }
        let _ = self.events.push_back(event);
    }

    fn paint(&self, view: &mut FrameView<'_, '_>, cell: Cell, color: RawPixel) {
        let (x, y, edge) = self.grid.cell_rect(cell);
        view.fill_rect(x, y, edge, edge, color);
    }

    fn redraw(&self, view: &mut FrameView<'_, '_>) {
        view.fill(palette::BACKGROUND);

        let last_col = self.grid.cols - 1;
        let last_row = self.grid.rows - 1;
        for x in 0..self.grid.cols {
            self.paint(view, Cell::new(x, 0), palette::BORDER);
            self.paint(view, Cell::new(x, last_row), palette::BORDER);
        }
        for y in 1..last_row {
            self.paint(view, Cell::new(0, y), palette::BORDER);
            self.paint(view, Cell::new(last_col, y), palette::BORDER);
        }

        for &cell in self.body.iter() {
            self.paint(view, cell, palette::SNAKE);
        }
        self.paint(view, self.food, palette::FOOD);
    }
}

impl ContentGenerator for SnakeGame {
    fn render(&mut self, frame: FrameContext, view: &mut FrameView<'_, '_>) {
        if frame.clear_requested {
            self.needs_redraw = true;
        }

        self.frames_since_move += 1;
        if self.frames_since_move >= self.config.move_every_frames {
            self.frames_since_move = 0;
            match self.step() {
                StepOutcome::Moved { head, vacated } => {
                    if let Some(cell) = vacated {
                        self.paint(view, cell, palette::BACKGROUND);
                    }
                    self.paint(view, head, palette::SNAKE);
                }
                StepOutcome::Ate {
                    head,
                    vacated,
                    food,
                } => {
                    if let Some(cell) = vacated {
                        self.paint(view, cell, palette::BACKGROUND);
                    }
                    self.paint(view, head, palette::SNAKE);
                    self.paint(view, food, palette::FOOD);
                }
                StepOutcome::Reset => {}
            }
        }

        if self.needs_redraw {
            self.redraw(view);
            self.needs_redraw = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(config: SnakeConfig) -> SnakeGame {
        let mut game = SnakeGame::new(config, 320, 240).unwrap();
        assert_eq!(game.pop_event(), Some(SnakeEvent::Reset));
        game
    }

    #[test]
    fn test_initial_configuration() {
        let game = game(SnakeConfig::default());
        assert_eq!(game.head(), Some(Cell::new(10, 5)));
        assert_eq!(game.len(), 5);
        assert_eq!(game.body().last(), Some(&Cell::new(6, 5)));
        assert_eq!(game.direction(), Direction::Right);
        assert_eq!(game.food(), Cell::new(10, 10));
    }

    #[test]
    fn test_moves_one_cell() {
        let mut game = game(SnakeConfig::default());
        assert_eq!(
            game.step(),
            StepOutcome::Moved {
                head: Cell::new(11, 5),
                vacated: Some(Cell::new(6, 5)),
            }
        );
        assert_eq!(game.len(), 5);
        assert_eq!(game.pop_event(), None);
    }

    #[test]
    fn test_border_collision_resets() {
        let mut game = game(SnakeConfig::default());

        // x = 11..=38 are free, x = 39 is the border
        for _ in 0..28 {
            assert!(matches!(game.step(), StepOutcome::Moved { .. }));
        }
        assert_eq!(game.head(), Some(Cell::new(38, 5)));

        assert_eq!(game.step(), StepOutcome::Reset);
        assert_eq!(game.pop_event(), Some(SnakeEvent::BorderCollision));
        assert_eq!(game.pop_event(), Some(SnakeEvent::Reset));
        assert_eq!(game.head(), Some(Cell::new(10, 5)));
        assert_eq!(game.len(), 5);
    }

    #[test]
    fn test_self_collision_resets() {
        let mut game = game(SnakeConfig::default());

        game.steer(Direction::Down);
        game.step();
        game.steer(Direction::Left);
        game.step();
        game.steer(Direction::Up);
        assert_eq!(game.step(), StepOutcome::Reset);

        assert_eq!(game.pop_event(), Some(SnakeEvent::SelfCollision));
        assert_eq!(game.pop_event(), Some(SnakeEvent::Reset));
        assert_eq!(game.direction(), Direction::Right);
    }

    #[test]
    fn test_eating_grows_and_moves_food() {
        let mut game = game(SnakeConfig {
            food: Cell::new(11, 5),
            ..Default::default()
        });

        let StepOutcome::Ate { head, vacated, food } = game.step() else {
            panic!("expected to eat");
        };
        assert_eq!(head, Cell::new(11, 5));
        assert_eq!(vacated, None);
        assert_eq!(game.len(), 6);
        assert_eq!(game.pop_event(), Some(SnakeEvent::FoodEaten));

        assert_eq!(game.food(), food);
        assert!(game.grid().is_interior(food));
        assert!(!game.body().any(|&cell| cell == food));
    }

    #[test]
    fn test_length_limit() {
        let mut game = game(SnakeConfig {
            initial_len: 5,
            max_len: 6,
            food: Cell::new(11, 5),
            ..Default::default()
        });

        assert!(matches!(game.step(), StepOutcome::Ate { .. }));
        assert_eq!(game.len(), 6);

        assert!(game.place_food(Cell::new(12, 5)));
        let outcome = game.step();
        assert!(matches!(
            outcome,
            StepOutcome::Ate {
                vacated: Some(_),
                ..
            }
        ));
        assert_eq!(game.len(), 6);
    }

    #[test]
    fn test_place_food_rejects_occupied_cells() {
        let mut game = game(SnakeConfig::default());
        assert!(!game.place_food(Cell::new(8, 5)));
        assert!(!game.place_food(Cell::new(0, 5)));
        assert!(game.place_food(Cell::new(20, 20)));
        assert_eq!(game.food(), Cell::new(20, 20));
    }

    #[test]
    fn test_event_queue_drops_oldest() {
        let mut game = game(SnakeConfig::default());
        for _ in 0..MAX_EVENTS + 2 {
            game.reset();
        }
        let mut count = 0;
        while game.pop_event().is_some() {
            count += 1;
        }
        assert_eq!(count, MAX_EVENTS);
    }

    #[test]
    fn test_config_validation() {
        let config = SnakeConfig::default();
        assert!(config.validate(320, 240).is_ok());

        let bad = SnakeConfig {
            start: Cell::new(3, 5),
            ..config
        };
        // Tail would sit at x = -1
        assert_eq!(
            bad.validate(320, 240),
            Err(ConfigError::InvalidValue("start"))
        );

        let bad = SnakeConfig {
            block_size: 0,
            ..config
        };
        assert_eq!(
            bad.validate(320, 240),
            Err(ConfigError::InvalidValue("block_size"))
        );

        let bad = SnakeConfig {
            initial_len: 0,
            ..config
        };
        assert!(bad.validate(320, 240).is_err());

        let bad = SnakeConfig {
            max_len: 101,
            ..config
        };
        assert_eq!(
            bad.validate(320, 240),
            Err(ConfigError::InvalidValue("max_len"))
        );
    }
}
