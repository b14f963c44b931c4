use std::io::{self, Write};
use std::time::{Duration, Instant};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::constants::{LOSS_HOLD_MILLIS, TICKS_PER_SECOND};
use crate::rendering::{GameGrid, OutputTarget};
use crate::simulation::{Simulation, StepOutcome};
use crate::terminal_io::{KeyboardState, SimulatedInput};

const CONTROLS_TEXT: &str =
    "Arrows move | Shift boost | Space fire | Tab spread | e EMP 20 | h hyper 100 | s shield 50 | Enter gravity 10 | q quit";

/// Rows given to the scaled play field. The last terminal row holds the legend.
fn field_rows(terminal_height: u16) -> u16 {
    terminal_height.saturating_sub(1)
}

/// How a round ended. Both quitting and defeat exit the process normally.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundOutcome {
    Quit { score: u32 },
    Defeated { score: u32 },
    FrameLimit { score: u32 },
}

pub struct Game {
    pub terminal_width: u16,
    pub terminal_height: u16,
    pub stdout_target: OutputTarget,
    pub loss_hold: Duration,
    simulated_input: Option<SimulatedInput>,
    keyboard: KeyboardState,
    max_frames: Option<u64>,
    seed: Option<u64>,
    keyboard_enhanced: bool,
}

impl Game {
    pub fn new(
        terminal_width: u16,
        terminal_height: u16,
        stdout_target: OutputTarget,
        simulated_input: Option<SimulatedInput>,
        max_frames: Option<u64>,
        seed: Option<u64>,
    ) -> Self {
        Game {
            terminal_width,
            terminal_height,
            stdout_target,
            loss_hold: Duration::from_millis(LOSS_HOLD_MILLIS),
            simulated_input,
            keyboard: KeyboardState::new(false),
            max_frames,
            seed,
            keyboard_enhanced: false,
        }
    }

    /// Raw mode, alternate screen, hidden cursor and, where the terminal
    /// supports it, key release reporting. No-op when headless.
    pub fn enter_terminal(&mut self) -> io::Result<()> {
        if self.stdout_target.is_headless() {
            return Ok(());
        }
        enable_raw_mode().map_err(|e| { error!("Failed to enable raw mode: {}", e); e })?;
        self.stdout_target.execute_other_command(EnterAlternateScreen)?;
        self.stdout_target.execute_other_command(Hide).map_err(|e| { error!("Failed to hide cursor: {}", e); e })?;

        self.keyboard_enhanced = crossterm::terminal::supports_keyboard_enhancement().unwrap_or(false);
        if self.keyboard_enhanced {
            self.stdout_target
                .execute_other_command(PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES))?;
        }
        self.keyboard = KeyboardState::new(self.keyboard_enhanced);
        info!("Terminal ready ({}x{}), key release reporting: {}", self.terminal_width, self.terminal_height, self.keyboard_enhanced);
        Ok(())
    }

    /// Undo `enter_terminal`. Safe to call after a failed or partial setup.
    pub fn leave_terminal(&mut self) -> io::Result<()> {
        if self.stdout_target.is_headless() {
            return Ok(());
        }
        if self.keyboard_enhanced {
            self.stdout_target.execute_other_command(PopKeyboardEnhancementFlags)?;
        }
        self.stdout_target.execute_other_command(Show).map_err(|e| { error!("Failed to show cursor on exit: {}", e); e })?;
        self.stdout_target.execute_other_command(LeaveAlternateScreen)?;
        disable_raw_mode().map_err(|e| { error!("Failed to disable raw mode on exit: {}", e); e })?;
        info!("Terminal restored.");
        Ok(())
    }

    pub fn run(&mut self) -> io::Result<RoundOutcome> {
        let mut simulation = match self.seed {
            Some(seed) => Simulation::with_seed(seed),
            None => Simulation::new(StdRng::from_entropy()),
        };
        self.play(&mut simulation)
    }

    /// Fixed-rate loop: gather input for one frame, step, draw, present.
    pub fn play(&mut self, simulation: &mut Simulation) -> io::Result<RoundOutcome> {
        let frame_budget = Duration::from_millis(1000 / TICKS_PER_SECOND);
        let mut game_grid = GameGrid::new(self.terminal_width, field_rows(self.terminal_height));
        let mut frame_count: u64 = 0;

        loop {
            if self.max_frames.is_some_and(|max| frame_count >= max) {
                info!("Frame limit reached at tick {}", simulation.tick);
                return Ok(RoundOutcome::FrameLimit { score: simulation.score() });
            }

            let deadline = Instant::now() + frame_budget;
            self.gather_input(frame_count, deadline)?;
            if (game_grid.width, game_grid.height) != (self.terminal_width, field_rows(self.terminal_height)) {
                game_grid = GameGrid::new(self.terminal_width, field_rows(self.terminal_height));
            }

            let input = self.keyboard.take_tick_input();
            if input.quit_requested() {
                info!("Quit requested at tick {}", simulation.tick);
                return Ok(RoundOutcome::Quit { score: simulation.score() });
            }

            let outcome = simulation.step(&input);

            game_grid.clear();
            simulation.draw(&mut game_grid);
            self.render(&game_grid)?;

            if outcome == StepOutcome::Defeated {
                info!("Round lost with score {}", simulation.score());
                std::thread::sleep(self.loss_hold);
                return Ok(RoundOutcome::Defeated { score: simulation.score() });
            }

            frame_count += 1;
        }
    }

    /// Drains input until `deadline`. Real terminals block here, which paces the loop.
    fn gather_input(&mut self, frame_count: u64, deadline: Instant) -> io::Result<()> {
        if let Some(sim_input) = &mut self.simulated_input {
            while sim_input.poll(frame_count)? {
                let event = sim_input.read()?;
                self.keyboard.handle_event(&event);
            }
            return Ok(());
        }

        loop {
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            if !event::poll(deadline - now).map_err(|e| { error!("Failed to poll event: {}", e); e })? {
                return Ok(());
            }
            let event = event::read().map_err(|e| { error!("Failed to read event: {}", e); e })?;
            if let Event::Resize(new_width, new_height) = event {
                self.terminal_width = new_width;
                self.terminal_height = new_height;
            } else {
                self.keyboard.handle_event(&event);
            }
        }
    }

    fn render(&mut self, game_grid: &GameGrid) -> io::Result<()> {
        game_grid.render(&mut self.stdout_target)?;

        if self.terminal_height > 0 {
            let legend: String = CONTROLS_TEXT.chars().take(self.terminal_width as usize).collect();
            self.stdout_target.execute_move_to(MoveTo(0, field_rows(self.terminal_height)))?;
            write!(self.stdout_target, "{}", legend)?;
        }

        self.stdout_target.flush().map_err(|e| { error!("Failed to flush stdout during game loop: {}", e); e })?;
        if let OutputTarget::ScreenBuffer(sb) = &self.stdout_target {
            sb.print_to_log();
        }
        Ok(())
    }
}
