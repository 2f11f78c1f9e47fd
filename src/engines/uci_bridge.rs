//! External UCI engine over a subprocess.
//!
//! Spawns the engine binary, performs the `uci`/`uciok` and
//! `isready`/`readyok` handshake, and asks for one move per call with
//! `position fen` plus `go movetime`. A reader thread forwards stdout lines
//! over a channel so every wait is bounded by a real deadline instead of a
//! blocking read.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::chess_errors::{ChessError, ChessResult};
use crate::config::EngineConfig;
use crate::engines::engine_trait::{Engine, GoParams};
use crate::moves::chess_move::ChessMove;
use crate::position::position::Position;
use crate::utils::long_algebraic::long_algebraic_to_move;

const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);
const SHUTDOWN_POLL: Duration = Duration::from_millis(10);

enum WaitError {
    TimedOut,
    Closed,
}

pub struct UciBridge {
    child: Child,
    stdin: Option<ChildStdin>,
    lines: Receiver<String>,
    reader: Option<JoinHandle<()>>,
    name: String,
    config: EngineConfig,
    shut_down: bool,
}

impl UciBridge {
    pub fn spawn(config: &EngineConfig) -> ChessResult<Self> {
        let mut child = Command::new(&config.path)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                ChessError::EngineUnavailable(format!("failed to start {}: {e}", config.path))
            })?;

        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let (tx, rx) = mpsc::channel();

        let reader = stdout.map(|stdout| {
            thread::Builder::new()
                .name("uci-reader".to_owned())
                .spawn(move || {
                    for line in BufReader::new(stdout).lines() {
                        let Ok(line) = line else { break };
                        if tx.send(line.trim().to_owned()).is_err() {
                            break;
                        }
                    }
                })
        });

        let reader = match reader {
            Some(Ok(handle)) => Some(handle),
            Some(Err(e)) => {
                warn!(error = %e, "could not start engine reader thread");
                None
            }
            None => None,
        };

        let ready = stdin.is_some() && reader.is_some();
        let mut bridge = Self {
            child,
            stdin,
            lines: rx,
            reader,
            name: config.path.clone(),
            config: config.clone(),
            shut_down: false,
        };

        if !ready {
            // Dropping the bridge reaps the child.
            return Err(ChessError::EngineUnavailable(
                "engine pipes could not be opened".to_owned(),
            ));
        }

        bridge.handshake()?;
        info!(engine = %bridge.name, "uci engine ready");
        Ok(bridge)
    }

    fn handshake(&mut self) -> ChessResult<()> {
        let timeout = Duration::from_millis(self.config.handshake_timeout_ms);

        self.send("uci")?;
        let lines = self
            .read_until("uciok", Instant::now() + timeout)
            .map_err(|e| handshake_error("uciok", e))?;
        if let Some(name) = lines
            .iter()
            .find_map(|line| line.strip_prefix("id name "))
        {
            self.name = name.trim().to_owned();
        }

        self.send("isready")?;
        self.read_until("readyok", Instant::now() + timeout)
            .map_err(|e| handshake_error("readyok", e))?;
        Ok(())
    }

    /// Asks the engine for its best move in `fen`, as long algebraic text.
    pub fn best_move(&mut self, fen: &str, movetime_ms: u64) -> ChessResult<String> {
        self.drain_pending();

        self.send("ucinewgame")?;
        self.send(&format!("position fen {fen}"))?;
        self.send(&format!("go movetime {movetime_ms}"))?;

        let timeout_ms = self.config.search_deadline_ms(movetime_ms);
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);

        match self.read_until("bestmove", deadline) {
            Ok(lines) => {
                let answer = lines.last().map(String::as_str).unwrap_or_default();
                debug!(engine = %self.name, answer, "engine answered");
                parse_best_move(answer)
            }
            Err(WaitError::TimedOut) => {
                warn!(engine = %self.name, timeout_ms, "engine search timed out");
                if let Err(e) = self.send("stop") {
                    warn!(error = %e, "could not stop engine search");
                }
                Err(ChessError::EngineTimeout { timeout_ms })
            }
            Err(WaitError::Closed) => {
                warn!(engine = %self.name, "engine output closed during search");
                Err(ChessError::EngineNoMove)
            }
        }
    }

    /// Sends `quit`, closes stdin and reaps the process.
    ///
    /// Failures are logged rather than returned; this also runs on drop.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;

        if let Err(e) = self.send("quit") {
            warn!(engine = %self.name, error = %e, "could not send quit");
        }
        drop(self.stdin.take());

        let reaped = self.reap();
        if reaped {
            if let Some(reader) = self.reader.take() {
                if reader.join().is_err() {
                    warn!(engine = %self.name, "engine reader thread panicked");
                }
            }
        }
        debug!(engine = %self.name, reaped, "uci engine shut down");
    }

    fn reap(&mut self) -> bool {
        let deadline = Instant::now() + SHUTDOWN_GRACE;
        loop {
            match self.child.try_wait() {
                Ok(Some(_)) => return true,
                Ok(None) if Instant::now() < deadline => thread::sleep(SHUTDOWN_POLL),
                Ok(None) => {
                    if let Err(e) = self.child.kill() {
                        warn!(engine = %self.name, error = %e, "could not kill engine");
                    }
                    return match self.child.wait() {
                        Ok(_) => true,
                        Err(e) => {
                            warn!(engine = %self.name, error = %e, "could not reap engine");
                            false
                        }
                    };
                }
                Err(e) => {
                    warn!(engine = %self.name, error = %e, "could not poll engine");
                    return false;
                }
            }
        }
    }

    fn send(&mut self, command: &str) -> ChessResult<()> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| ChessError::EngineUnavailable("engine stdin is closed".to_owned()))?;
        writeln!(stdin, "{command}")
            .and_then(|()| stdin.flush())
            .map_err(|e| ChessError::EngineUnavailable(format!("write to engine failed: {e}")))
    }

    /// Collects lines up to and including the first one starting with `prefix`.
    fn read_until(&self, prefix: &str, deadline: Instant) -> Result<Vec<String>, WaitError> {
        let mut lines = Vec::new();
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(WaitError::TimedOut);
            }
            match self.lines.recv_timeout(remaining) {
                Ok(line) => {
                    let done = line.starts_with(prefix);
                    lines.push(line);
                    if done {
                        return Ok(lines);
                    }
                }
                Err(RecvTimeoutError::Timeout) => return Err(WaitError::TimedOut),
                Err(RecvTimeoutError::Disconnected) => return Err(WaitError::Closed),
            }
        }
    }

    /// Discards output left over from an earlier, abandoned search.
    fn drain_pending(&self) {
        loop {
            match self.lines.try_recv() {
                Ok(line) => debug!(engine = %self.name, line = %line, "discarding stale engine output"),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
    }
}

impl Engine for UciBridge {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, position: &Position, params: &GoParams) -> ChessResult<ChessMove> {
        let movetime_ms = params.movetime_ms.unwrap_or(self.config.movetime_ms);
        let text = self.best_move(&position.to_fen(), movetime_ms)?;
        long_algebraic_to_move(&text, position).map_err(|_| ChessError::EngineIllegalMove(text))
    }
}

impl Drop for UciBridge {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn handshake_error(expected: &str, error: WaitError) -> ChessError {
    match error {
        WaitError::TimedOut => {
            ChessError::EngineUnavailable(format!("no {expected} during handshake"))
        }
        WaitError::Closed => {
            ChessError::EngineUnavailable(format!("engine exited before {expected}"))
        }
    }
}

/// Extracts the move token from `bestmove e2e4 [ponder e7e5]`.
fn parse_best_move(line: &str) -> ChessResult<String> {
    match line.split_whitespace().nth(1) {
        None | Some("(none)") | Some("0000") => Err(ChessError::EngineNoMove),
        Some(token) => Ok(token.to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_best_move;
    use crate::chess_errors::ChessError;

    #[test]
    fn best_move_token_is_extracted() {
        assert_eq!(
            parse_best_move("bestmove e2e4 ponder e7e5").expect("should parse"),
            "e2e4"
        );
        assert_eq!(parse_best_move("bestmove a7a8q").expect("should parse"), "a7a8q");
    }

    #[test]
    fn empty_answers_are_no_move() {
        assert_eq!(parse_best_move("bestmove (none)"), Err(ChessError::EngineNoMove));
        assert_eq!(parse_best_move("bestmove"), Err(ChessError::EngineNoMove));
        assert_eq!(parse_best_move("bestmove 0000"), Err(ChessError::EngineNoMove));
    }

    #[cfg(unix)]
    mod process {
        use std::time::{Duration, Instant};

        use crate::chess_errors::ChessError;
        use crate::config::EngineConfig;
        use crate::engines::engine_trait::{Engine, GoParams};
        use crate::engines::uci_bridge::UciBridge;
        use crate::moves::chess_move::{ChessMove, MoveFlag};
        use crate::position::position::Position;

        /// A shell-script engine that answers every `go` with `reply`.
        fn scripted_engine(go_reply: &str) -> EngineConfig {
            let script = format!(
                r#"while read -r line; do
  case "$line" in
    uci) echo "id name Scripted"; echo uciok ;;
    isready) echo readyok ;;
    go*) {go_reply} ;;
    quit) exit 0 ;;
  esac
done"#
            );
            EngineConfig {
                path: "sh".to_owned(),
                args: vec!["-c".to_owned(), script],
                movetime_ms: 20,
                timeout_margin_ms: 300,
                handshake_timeout_ms: 2_000,
            }
        }

        #[test]
        fn handshake_reads_engine_name() {
            let bridge = UciBridge::spawn(&scripted_engine("echo 'bestmove e2e4'"))
                .expect("scripted engine should start");
            assert_eq!(bridge.name(), "Scripted");
        }

        #[test]
        fn best_move_is_resolved_against_the_position() {
            let mut bridge = UciBridge::spawn(&scripted_engine(
                "echo 'info depth 1 score cp 20'; echo 'bestmove e2e4 ponder e7e5'",
            ))
            .expect("scripted engine should start");
            let mv = bridge
                .choose_move(&Position::new_game(), &GoParams::default())
                .expect("engine should answer");
            assert_eq!(mv, ChessMove::with_flag(12, 28, MoveFlag::DoublePush));
        }

        #[test]
        fn illegal_engine_answer_is_reported() {
            let mut bridge = UciBridge::spawn(&scripted_engine("echo 'bestmove e2e5'"))
                .expect("scripted engine should start");
            assert_eq!(
                bridge.choose_move(&Position::new_game(), &GoParams::default()),
                Err(ChessError::EngineIllegalMove("e2e5".to_owned()))
            );
        }

        #[test]
        fn none_answer_is_no_move() {
            let mut bridge = UciBridge::spawn(&scripted_engine("echo 'bestmove (none)'"))
                .expect("scripted engine should start");
            assert_eq!(
                bridge.choose_move(&Position::new_game(), &GoParams::default()),
                Err(ChessError::EngineNoMove)
            );
        }

        #[test]
        fn silent_search_times_out_after_the_margin() {
            let config = scripted_engine(":");
            let mut bridge = UciBridge::spawn(&config).expect("scripted engine should start");

            let started = Instant::now();
            let result = bridge.best_move(&Position::new_game().to_fen(), config.movetime_ms);
            assert_eq!(
                result,
                Err(ChessError::EngineTimeout {
                    timeout_ms: config.movetime_ms + config.timeout_margin_ms
                })
            );
            assert!(started.elapsed() >= Duration::from_millis(config.movetime_ms));
        }

        #[test]
        fn missing_binary_is_unavailable() {
            let config = EngineConfig {
                path: "/nonexistent/uci-engine".to_owned(),
                ..EngineConfig::default()
            };
            assert!(matches!(
                UciBridge::spawn(&config),
                Err(ChessError::EngineUnavailable(_))
            ));
        }

        #[test]
        fn engine_without_uciok_is_unavailable() {
            let config = EngineConfig {
                path: "sh".to_owned(),
                args: vec!["-c".to_owned(), "while read -r line; do :; done".to_owned()],
                handshake_timeout_ms: 200,
                ..EngineConfig::default()
            };
            assert!(matches!(
                UciBridge::spawn(&config),
                Err(ChessError::EngineUnavailable(_))
            ));
        }
    }
}
