use std::io;
use std::sync::Arc;

use skirmish::nim::{ByteTable, NimRules, NimSearch};
use skirmish::{Shell, ShellConfig};

fn main() {
    let stdin = io::stdin();
    let stdout = io::stdout();

    let mut shell = Shell::new(
        NimRules::default(),
        Arc::new(NimSearch),
        Box::new(ByteTable::new()),
        ShellConfig::default(),
        stdout,
    );
    shell.run(stdin.lock());
}
