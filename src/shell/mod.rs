//! Protocol dispatcher: the blocking read loop and its command handlers.
//!
//! One command per line. Handlers mutate the session or the option
//! registry, or hand a request to the search coordinator; no handler ever
//! tears down the loop except `quit`, and a malformed command only costs
//! its own line.

use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::coordinator::{
    DepthInfo, ExecMode, SearchCoordinator, SearchOutcome, SearchRequest,
};
use crate::game::{GameRules, HashTable, SharedBackend};
use crate::options::{
    OptionRegistry, SetOutcome, OPT_ABORT_TIME_PCT, OPT_DETERMINISTIC, OPT_HASH,
    OPT_SOFT_TIME_PCT,
};
use crate::session::{BasePosition, Session};
use crate::tokenizer::tokenize;

pub mod command;

use command::{parse_command, parse_setoption, Command};

const ENGINE_NAME: &str = concat!("skirmish ", env!("CARGO_PKG_VERSION"));

static HELP_TEXT: Lazy<String> = Lazy::new(|| {
    [
        "Commands:",
        "  uci                                    identity and option table",
        "  isready                                readiness acknowledgement",
        "  setoption name <name> value <val>      set a bounded option",
        "  position startpos|endgame|fen <str> [move <tok> ...]",
        "  move <tok>                             apply one move",
        "  go depth <n> | go time <ms> [inc <ms>] run a search",
        "  perft [<depth>]                        move-count verification (default 4)",
        "  display                                show the current position",
        "  generate                               list legal moves",
        "  eval [<move>]                          evaluate current or successor position",
        "  help                                   this text",
        "  quit                                   exit",
    ]
    .join("\n")
});

/// What a handled line means for the read loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Startup configuration for the shell.
pub struct ShellConfig {
    /// Where search requests execute, chosen once.
    pub exec: ExecMode,
    /// Upper bound on game length (position snapshots).
    pub history_capacity: usize,
}

impl Default for ShellConfig {
    fn default() -> Self {
        ShellConfig { exec: ExecMode::Worker, history_capacity: 512 }
    }
}

/// The protocol dispatcher.
pub struct Shell<R: GameRules, W: Write + Send + 'static> {
    rules: R,
    session: Session<R>,
    options: OptionRegistry,
    coordinator: SearchCoordinator<R::Position>,
    table: Arc<Mutex<Box<dyn HashTable>>>,
    out: Arc<Mutex<W>>,
}

impl<R: GameRules, W: Write + Send + 'static> Shell<R, W> {
    pub fn new(
        rules: R,
        backend: SharedBackend<R::Position>,
        table: Box<dyn HashTable>,
        config: ShellConfig,
        writer: W,
    ) -> Self {
        let options = OptionRegistry::new();
        let out = Arc::new(Mutex::new(writer));
        let table = Arc::new(Mutex::new(table));

        // Size the external table to the option default up front.
        table.lock().resize(options.get(OPT_HASH));

        let mut coordinator = SearchCoordinator::new(backend, config.exec);
        let info_out = Arc::clone(&out);
        coordinator.set_info_callback(Some(Arc::new(move |info: &DepthInfo| {
            let mut out = info_out.lock();
            let _ = writeln!(
                out,
                "info depth {} score {} nodes {} time {} pv {}",
                info.depth, info.score, info.nodes, info.time_ms, info.pv
            );
        })));

        let session = Session::new(&rules, config.history_capacity);

        Shell { rules, session, options, coordinator, table, out }
    }

    /// Shared handle to the output sink (tests read captured output here).
    #[must_use]
    pub fn output(&self) -> Arc<Mutex<W>> {
        Arc::clone(&self.out)
    }

    /// Blocking read loop; returns when `quit` arrives or input ends.
    pub fn run(&mut self, reader: impl BufRead) {
        for line in reader.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    log::error!("input stream error: {e}");
                    break;
                }
            };
            if self.handle_line(&line) == Flow::Quit {
                break;
            }
        }
    }

    fn say(&self, text: impl AsRef<str>) {
        let mut out = self.out.lock();
        if let Err(e) = writeln!(out, "{}", text.as_ref()) {
            log::error!("output write failed: {e}");
        }
    }

    fn handle_line(&mut self, line: &str) -> Flow {
        let tokens = match tokenize(line) {
            Ok(tokens) => tokens,
            Err(e) => {
                // A format error costs only this line.
                log::warn!("dropping malformed line: {e}");
                return Flow::Continue;
            }
        };

        let Some(cmd) = parse_command(&tokens) else {
            return Flow::Continue;
        };

        match cmd {
            Command::Uci => {
                self.say(format!("id name {ENGINE_NAME}"));
                self.say("id author the skirmish developers");
                let mut table = self.options.render();
                table.pop(); // render() ends with a newline
                self.say(table);
                self.say("uciok");
            }
            Command::IsReady => self.say("readyok"),
            Command::SetOption(args) => self.handle_setoption(&args),
            Command::Position(args) => self.handle_position(&args),
            Command::Move(args) => match args.first() {
                Some(token) => {
                    if let Err(e) = self.session.apply_move(&self.rules, token) {
                        self.say(format!("Illegal move: {e}"));
                    }
                }
                None => self.say("move needs a move token"),
            },
            Command::Go(args) => self.handle_go(&args),
            Command::Perft(depth) => {
                let started = Instant::now();
                let nodes = self.rules.perft(self.session.current(), depth);
                let ms = started.elapsed().as_millis();
                self.say(format!("perft depth {depth} nodes {nodes} time {ms}"));
            }
            Command::Display => {
                let text = self.rules.render(self.session.current());
                self.say(text);
            }
            Command::Generate => {
                let moves = self.rules.legal_moves(self.session.current());
                self.say(moves.join(" "));
            }
            Command::Eval(token) => self.handle_eval(token.as_deref()),
            Command::Help => self.say(&*HELP_TEXT),
            Command::Quit => {
                self.table.lock().release();
                return Flow::Quit;
            }
            Command::Unknown(_) => {
                self.say("Illegal command. Use 'help' to see possible options.");
            }
        }

        Flow::Continue
    }

    fn handle_setoption(&mut self, args: &[String]) {
        let Some((name, value)) = parse_setoption(args) else {
            self.say("setoption needs: name <name> value <val>");
            return;
        };
        let Some(raw) = value.as_deref().and_then(|v| v.parse::<i64>().ok()) else {
            self.say("setoption needs an integer value");
            return;
        };

        match self.options.set(&name, raw) {
            SetOutcome::Applied { name, value } => {
                self.say(format!("option {name} is now {value}"));
                if name == OPT_HASH {
                    let bytes = self.table.lock().resize(value);
                    self.say(format!("hash table resized to {bytes} bytes"));
                } else if name == OPT_DETERMINISTIC {
                    self.coordinator.nodes().set_deterministic(value != 0);
                }
            }
            SetOutcome::Unknown => self.say(format!("Unrecognized option: {name}")),
        }
    }

    fn handle_position(&mut self, args: &[String]) {
        match args.first().map(String::as_str) {
            Some("startpos") => {
                // Resetting to a built-in base cannot fail.
                let _ = self.session.reset(&self.rules, BasePosition::Start);
                self.replay_moves(&args[1..]);
            }
            Some("endgame") => {
                let _ = self.session.reset(&self.rules, BasePosition::Endgame);
                self.replay_moves(&args[1..]);
            }
            Some("fen") => {
                // The encoded string runs until the move list begins.
                let end = args
                    .iter()
                    .position(|a| a == "move" || a == "moves")
                    .unwrap_or(args.len());
                if end <= 1 {
                    self.say("position fen needs a position string");
                    return;
                }
                let encoded = args[1..end].join(" ");
                match self.session.reset(&self.rules, BasePosition::Encoded(&encoded)) {
                    Ok(()) => self.replay_moves(&args[end..]),
                    Err(e) => self.say(format!("{e}")),
                }
            }
            _ => self.say("position needs startpos, endgame, or fen <string>"),
        }
    }

    /// Apply a move list, skipping the `move`/`moves` keywords. Stops at
    /// the first illegal token; prior legal moves keep their effect.
    fn replay_moves(&mut self, tokens: &[String]) {
        for token in tokens {
            if token == "move" || token == "moves" {
                continue;
            }
            if let Err(e) = self.session.apply_move(&self.rules, token) {
                self.say(format!("move replay stopped: {e}"));
                return;
            }
        }
    }

    fn handle_go(&mut self, args: &[String]) {
        let request = match args.first().map(String::as_str) {
            Some("depth") => match args.get(1).and_then(|a| a.parse::<u32>().ok()) {
                Some(n) if n >= 1 => Some(SearchRequest::depth(n)),
                _ => None,
            },
            Some("time") => args.get(1).and_then(|a| a.parse::<u64>().ok()).map(|ms| {
                let inc = match args.get(2).map(String::as_str) {
                    Some("inc") => args.get(3).and_then(|a| a.parse::<u64>().ok()).unwrap_or(0),
                    _ => 0,
                };
                // Remaining clock and increment to a per-move budget; a
                // tiny clock still buys at least a millisecond.
                SearchRequest::timed(Duration::from_millis((ms / 30 + inc).max(1)))
            }),
            _ => None,
        };

        let Some(mut request) = request else {
            self.say("go needs 'depth <n>' or 'time <ms> [inc <ms>]'");
            return;
        };
        request.soft_time_pct = self.options.get(OPT_SOFT_TIME_PCT) as u32;
        request.abort_time_pct = self.options.get(OPT_ABORT_TIME_PCT) as u32;

        let position = self.session.current().clone();
        match self.coordinator.run(&position, &request) {
            SearchOutcome::Move { token, .. } => self.say(format!("bestmove {token}")),
            SearchOutcome::NoLegalMove => {
                self.say("info string no legal move");
                self.say("bestmove none");
            }
        }
    }

    fn handle_eval(&mut self, token: Option<&str>) {
        match token {
            None => {
                let score = self.rules.evaluate(self.session.current());
                self.say(format!("eval: {score}"));
            }
            Some(token) => match self.rules.apply_move(self.session.current(), token) {
                Ok(next) => {
                    let score = self.rules.evaluate(&next);
                    self.say(format!("eval after {token}: {score}"));
                }
                Err(e) => self.say(format!("Illegal move: {e}")),
            },
        }
    }
}
