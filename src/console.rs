//! Line-oriented console front end.
//!
//! Reads one command per line from stdin. Engine turns are played
//! automatically whenever an engine seat is to move.
//!
//! ## Supported Commands
//!
//! - `<coord>` or `play <coord>` - Play a move, e.g. `d3`
//! - `board` - Show the board and the game status
//! - `moves` - List the legal moves for the side to move
//! - `new` - Start a new game
//! - `help` - List the commands
//! - `quit` - Exit

use std::io::{self, BufRead, Write};
use std::time::Duration;

use crate::board::Color;
use crate::game::{Game, GameState};
use crate::moves::Move;
use crate::session::{AiMove, Session};

const KNOWN_COMMANDS: &[&str] = &["board", "help", "moves", "new", "play", "quit"];

/// One-line summary of a game's status.
pub fn status(game: &Game) -> String {
    let board = game.board();
    let score = format!(
        "white {} - black {}",
        board.number_of_pieces(Color::White),
        board.number_of_pieces(Color::Black)
    );
    match game.state() {
        GameState::Turn(color) => format!("{color} to move ({score})"),
        GameState::Won(color) => format!("game over: {color} won ({score})"),
        GameState::Tie => format!("game over: tied ({score})"),
    }
}

/// Summary of an engine turn.
pub fn describe_ai_move(ai: &AiMove) -> String {
    format!(
        "{} plays {}\nsimulated {} games in {:.1} s, conf: {:.0}%, {:.0} games per second",
        ai.color,
        ai.mv,
        ai.results.simulations,
        ai.elapsed.as_secs_f64(),
        ai.results.best_win_rate() * 100.0,
        ai.games_per_second()
    )
}

pub struct Console {
    session: Session,
    think_time: Duration,
}

impl Console {
    pub fn new(session: Session, think_time: Duration) -> Self {
        Self {
            session,
            think_time,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run(&mut self) -> anyhow::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        writeln!(stdout, "{}\n{}", self.session.game().board(), status(self.session.game()))?;
        self.play_engine_turns(&mut stdout)?;

        for line in stdin.lock().lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            let command = parts[0].to_lowercase();
            let (success, message) = self.execute(&command, &parts[1..]);
            let prefix = if success { '=' } else { '?' };
            writeln!(stdout, "{prefix} {message}")?;
            stdout.flush()?;

            if command == "quit" {
                break;
            }
            if success {
                self.play_engine_turns(&mut stdout)?;
            }
        }
        Ok(())
    }

    fn play_engine_turns(&mut self, out: &mut impl Write) -> anyhow::Result<()> {
        while self.session.ai_to_move().is_some() {
            let mut last_reported = 0;
            let ai = self.session.run_ai(self.think_time, |progress| {
                // Coarse progress so the terminal does not scroll away
                if progress.simulations >= last_reported + 1000 {
                    last_reported = progress.simulations;
                    let _ = writeln!(io::stderr(), "  simulated {} games", progress.simulations);
                }
            })?;
            writeln!(out, "{}", describe_ai_move(&ai))?;
            writeln!(out, "{}\n{}", self.session.game().board(), status(self.session.game()))?;
            out.flush()?;
        }
        Ok(())
    }

    /// Execute a command and return (success, response).
    pub fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "quit" => (true, String::new()),

            "help" => (true, KNOWN_COMMANDS.join("\n")),

            "board" => {
                let game = self.session.game();
                (true, format!("\n{}{}", game.board(), status(game)))
            }

            "moves" => {
                let tips = self.session.snapshot().tips;
                if tips.is_empty() {
                    return (true, "no moves".to_string());
                }
                let list: Vec<String> = tips.iter().map(Move::to_string).collect();
                (true, list.join(" "))
            }

            "new" => {
                self.session.reset();
                (true, status(self.session.game()))
            }

            "play" => match args.first() {
                Some(coord) => self.play(coord),
                None => (false, "missing argument".to_string()),
            },

            coord => self.play(coord),
        }
    }

    fn play(&mut self, coord: &str) -> (bool, String) {
        let mv: Move = match coord.parse() {
            Ok(mv) => mv,
            Err(err) => return (false, format!("unknown command or {err}")),
        };
        match self.session.play(mv) {
            Ok(()) => (true, status(self.session.game())),
            Err(err) => (false, err.to_string()),
        }
    }
}
