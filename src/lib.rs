//! Control plane for a two-player board-game engine: a line-oriented
//! command protocol, an iterative-deepening search coordinator with
//! cooperative cancellation, and node-count aggregation. The board, move
//! generation, evaluation, the search tree walk, and the hash table are
//! collaborators behind the traits in [`game`].

pub mod coordinator;
pub mod counter;
pub mod game;
pub mod nim;
pub mod options;
pub mod session;
pub mod shell;
pub mod sync;
pub mod timer;
pub mod tokenizer;

pub use coordinator::{
    DepthInfo, DepthLimit, ExecMode, SearchCoordinator, SearchOutcome, SearchRequest,
};
pub use counter::{BranchTally, NodeCounter};
pub use game::{GameRules, HashTable, SearchBackend, SearchError, SearchReport};
pub use options::{OptionRegistry, SetOutcome};
pub use session::{BasePosition, Session};
pub use shell::{Shell, ShellConfig};
pub use sync::AbortToken;
pub use tokenizer::{tokenize, TokenizeError};
