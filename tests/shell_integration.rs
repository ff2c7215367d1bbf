use std::io::{BufRead, BufReader, Write};
use std::process::{Command, Stdio};

fn run_session(input: &str) -> String {
    let exe = env!("CARGO_BIN_EXE_skirmish");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn engine binary");

    child
        .stdin
        .as_mut()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();

    let output = child.wait_with_output().expect("failed to read output");
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn smoke_test_full_session() {
    let stdout = run_session("uci\nisready\nposition startpos\ngo depth 3\nquit\n");

    assert!(stdout.contains("id name skirmish"));
    assert!(stdout.contains("uciok"));
    assert!(stdout.contains("readyok"));
    assert!(stdout.contains("info depth 1"));
    assert!(stdout.contains("info depth 3"));
    // From 21 stones the mirroring move takes one.
    assert!(stdout.contains("bestmove 1"));
}

#[test]
fn go_time_returns_a_bestmove() {
    let stdout = run_session("position endgame\ngo time 3000\nquit\n");

    let bestmove = stdout
        .lines()
        .find(|l| l.starts_with("bestmove"))
        .expect("no bestmove line");
    assert_eq!(bestmove.trim(), "bestmove 1");
}

#[test]
fn setoption_clamps_and_shows_in_option_table() {
    let stdout = run_session("setoption name hash value 999999\nuci\nquit\n");

    assert!(stdout.contains("option hash is now 4096"));
    assert!(stdout.contains("hash table resized to"));
    assert!(stdout.contains("option name hash type spin value 4096"));
}

#[test]
fn perft_reports_node_counts() {
    let stdout = run_session("perft 1\nperft 3\nquit\n");

    assert!(stdout.contains("perft depth 1 nodes 3"));
    assert!(stdout.contains("perft depth 3 nodes 27"));
}

#[test]
fn unknown_command_keeps_the_session_alive() {
    let stdout = run_session("frobnicate\nisready\nquit\n");

    assert!(stdout.contains("Illegal command. Use 'help' to see possible options."));
    assert!(stdout.contains("readyok"));
}

#[test]
fn malformed_quoting_drops_only_that_line() {
    let stdout = run_session("a \"bc\nisready\nquit\n");

    assert!(!stdout.contains("Illegal command"));
    assert!(stdout.contains("readyok"));
}

#[test]
fn introspection_commands() {
    let stdout = run_session("position fen 9\ndisplay\ngenerate\neval\nquit\n");

    assert!(stdout.contains("pile: 9 stone(s)"));
    assert!(stdout.contains("1 2 3"));
    assert!(stdout.contains("eval: 50"));
}

#[test]
fn bestmove_waits_for_the_search_to_finish() {
    let exe = env!("CARGO_BIN_EXE_skirmish");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn engine binary");

    let mut stdin = child.stdin.take().unwrap();
    let stdout = child.stdout.take().unwrap();
    let mut reader = BufReader::new(stdout);

    stdin
        .write_all(b"position startpos\ngo depth 6\n")
        .unwrap();

    let mut bestmove_line = None;
    loop {
        let mut line = String::new();
        let bytes = reader.read_line(&mut line).expect("read failed");
        if bytes == 0 {
            break;
        }
        if line.starts_with("bestmove") {
            bestmove_line = Some(line);
            break;
        }
    }

    stdin.write_all(b"quit\n").unwrap();
    let _ = child.wait();

    let bestmove = bestmove_line.expect("no bestmove found");
    let parts: Vec<&str> = bestmove.split_whitespace().collect();
    assert_eq!(parts.len(), 2, "bestmove missing move: {}", bestmove);
    assert_ne!(parts[1], "none", "engine reported no move from startpos");
}
