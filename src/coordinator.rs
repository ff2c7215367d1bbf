//! Iterative-deepening search driver.
//!
//! Runs the external search function at increasing depths under a
//! wall-clock budget, with cooperative cancellation and an optional
//! background worker. The caller always gets the outcome synchronously:
//! with a worker the protocol thread blocks on a one-shot completion
//! channel until the deepening loop has fully exited.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::counter::NodeCounter;
use crate::game::{SearchBackend, SearchError, SharedBackend};
use crate::sync::AbortToken;
use crate::timer::spawn_abort_timer;

/// Full-width search window bound.
pub const SCORE_INF: i32 = 32_000;

/// Practical deepening ceiling for "search until time runs out" requests;
/// the time budget, not this, is the binding limit.
pub const MAX_DEPTH: u32 = 64;

/// Depth limit of a search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthLimit {
    Bounded(u32),
    /// Search until time runs out.
    Unbounded,
}

/// One search request, consumed exactly once by `SearchCoordinator::run`.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub depth: DepthLimit,
    /// Wall-clock budget; `None` means unlimited.
    pub budget: Option<Duration>,
    /// Do not start a new depth past this percentage of the budget.
    pub soft_time_pct: u32,
    /// Trip the abort token at this percentage of the budget when the
    /// depth is unbounded.
    pub abort_time_pct: u32,
}

impl SearchRequest {
    /// Depth-limited request with no time budget.
    #[must_use]
    pub fn depth(n: u32) -> Self {
        SearchRequest {
            depth: DepthLimit::Bounded(n),
            budget: None,
            soft_time_pct: 50,
            abort_time_pct: 90,
        }
    }

    /// Time-limited request searching as deep as the budget allows.
    #[must_use]
    pub fn timed(budget: Duration) -> Self {
        SearchRequest {
            depth: DepthLimit::Unbounded,
            budget: Some(budget),
            soft_time_pct: 50,
            abort_time_pct: 90,
        }
    }
}

/// Per-depth progress report delivered through the info callback.
#[derive(Debug, Clone)]
pub struct DepthInfo {
    pub depth: u32,
    pub score: i32,
    pub nodes: u64,
    pub time_ms: u64,
    pub pv: String,
}

pub type DepthInfoCallback = Arc<dyn Fn(&DepthInfo) + Send + Sync>;

/// Where the deepening loop runs, chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecMode {
    /// Inline on the protocol thread.
    Inline,
    /// On a dedicated worker thread; the caller waits on the completion
    /// channel.
    Worker,
}

/// Result of one search request.
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    Move {
        /// Best move found, textual token.
        token: String,
        /// Principal variation it came from.
        pv: Vec<String>,
        score: i32,
        /// Deepest fully-completed depth (0 when only a partial depth-1
        /// pass ran).
        completed_depth: u32,
        /// Whether the requested bounded depth was reached.
        reached_limit: bool,
    },
    NoLegalMove,
}

/// Drives iterative deepening for positions of type `P`.
pub struct SearchCoordinator<P> {
    backend: SharedBackend<P>,
    nodes: Arc<NodeCounter>,
    mode: ExecMode,
    info: Option<DepthInfoCallback>,
}

impl<P: Clone + Send + 'static> SearchCoordinator<P> {
    #[must_use]
    pub fn new(backend: SharedBackend<P>, mode: ExecMode) -> Self {
        SearchCoordinator {
            backend,
            nodes: Arc::new(NodeCounter::new()),
            mode,
            info: None,
        }
    }

    /// Install a per-depth progress callback.
    pub fn set_info_callback(&mut self, cb: Option<DepthInfoCallback>) {
        self.info = cb;
    }

    /// The node aggregator; read-only for reporting between searches.
    #[must_use]
    pub fn nodes(&self) -> &Arc<NodeCounter> {
        &self.nodes
    }

    /// Run one request to completion.
    ///
    /// Synchronous from the caller's view regardless of `ExecMode`.
    pub fn run(&self, position: &P, request: &SearchRequest) -> SearchOutcome {
        self.nodes.reset();

        let started = Instant::now();
        let token_deadline = request.budget.map(|b| started + b);
        let abort = AbortToken::with_deadline(token_deadline);

        // Independent timer for "search until time runs out" requests: it
        // trips the token somewhat before the full budget so the in-flight
        // depth can unwind inside it.
        let timer_deadline = match (request.depth, request.budget) {
            (DepthLimit::Unbounded, Some(budget)) => {
                Some(started + mul_pct(budget, request.abort_time_pct))
            }
            _ => None,
        };

        match self.mode {
            ExecMode::Inline => {
                if let Some(deadline) = timer_deadline {
                    let _ = spawn_abort_timer(deadline, abort.clone());
                }
                deepen(
                    self.backend.as_ref(),
                    position,
                    request,
                    &abort,
                    &self.nodes,
                    self.info.as_ref(),
                )
            }
            ExecMode::Worker => {
                let (done_tx, done_rx) = mpsc::sync_channel::<SearchOutcome>(1);
                let backend = Arc::clone(&self.backend);
                let nodes = Arc::clone(&self.nodes);
                let position = position.clone();
                let request = request.clone();
                let worker_abort = abort.clone();
                let info = self.info.clone();

                let handle = thread::Builder::new()
                    .name("search".to_string())
                    .spawn(move || {
                        let outcome = deepen(
                            backend.as_ref(),
                            &position,
                            &request,
                            &worker_abort,
                            &nodes,
                            info.as_ref(),
                        );
                        let _ = done_tx.send(outcome);
                    })
                    .expect("failed to spawn search worker");

                if let Some(deadline) = timer_deadline {
                    let _ = spawn_abort_timer(deadline, abort.clone());
                }

                // Completion barrier: the outcome is not observable until
                // the deepening loop has fully exited.
                let outcome = done_rx
                    .recv()
                    .expect("search worker disconnected before reporting");
                let _ = handle.join();
                outcome
            }
        }
    }
}

fn mul_pct(budget: Duration, pct: u32) -> Duration {
    budget.mul_f64(f64::from(pct.clamp(1, 100)) / 100.0)
}

/// The iterative-deepening loop itself.
fn deepen<P>(
    backend: &dyn SearchBackend<P>,
    position: &P,
    request: &SearchRequest,
    abort: &AbortToken,
    nodes: &NodeCounter,
    info: Option<&DepthInfoCallback>,
) -> SearchOutcome {
    let started = Instant::now();
    let max_depth = match request.depth {
        DepthLimit::Bounded(n) => n.max(1),
        DepthLimit::Unbounded => MAX_DEPTH,
    };

    let mut best: Option<(Vec<String>, i32)> = None;
    let mut completed_depth = 0u32;

    for depth in 1..=max_depth {
        // Depth 1 always runs, even on an already-exhausted budget, so a
        // position with legal moves never reports "no move".
        if depth > 1 && abort.should_stop() {
            break;
        }

        let report = match backend.search(position, depth, -SCORE_INF, SCORE_INF, abort, nodes) {
            Ok(report) => report,
            Err(SearchError::NoLegalMove) => {
                log::debug!("search reported no legal move at depth {depth}");
                return SearchOutcome::NoLegalMove;
            }
        };

        let aborted = abort.is_aborted();

        // An aborted later depth yields a partial, untrustworthy line:
        // keep the previous depth's move. Depth 1 is the exception, since
        // its partial line is all that exists.
        if (!aborted || depth == 1) && !report.pv.is_empty() {
            best = Some((report.pv.clone(), report.score));
        }

        if aborted {
            break;
        }
        completed_depth = depth;

        if let Some(cb) = info {
            let elapsed = started.elapsed();
            cb(&DepthInfo {
                depth,
                score: report.score,
                nodes: nodes.total(),
                time_ms: elapsed.as_millis() as u64,
                pv: report.pv.join(" "),
            });
        }

        // Do not begin a depth unlikely to finish inside the budget.
        if let Some(budget) = request.budget {
            if started.elapsed() > mul_pct(budget, request.soft_time_pct) {
                break;
            }
        }
    }

    match best {
        Some((pv, score)) => SearchOutcome::Move {
            token: pv[0].clone(),
            pv,
            score,
            completed_depth,
            reached_limit: matches!(request.depth, DepthLimit::Bounded(n) if completed_depth >= n),
        },
        None => SearchOutcome::NoLegalMove,
    }
}
