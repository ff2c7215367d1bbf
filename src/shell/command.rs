//! First-token command routing for the text protocol.

/// One parsed protocol command. Payload tokens are owned so the command
/// outlives the input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Uci,
    IsReady,
    SetOption(Vec<String>),
    Position(Vec<String>),
    Move(Vec<String>),
    Go(Vec<String>),
    Perft(u32),
    Display,
    Generate,
    Eval(Option<String>),
    Help,
    Quit,
    Unknown(String),
}

/// Route a tokenized line to a command. `None` for an empty line.
pub fn parse_command(tokens: &[&str]) -> Option<Command> {
    let first = *tokens.first()?;
    let rest = || tokens[1..].iter().map(|t| (*t).to_string()).collect::<Vec<String>>();

    let cmd = match first {
        "uci" => Command::Uci,
        "isready" => Command::IsReady,
        "setoption" => Command::SetOption(rest()),
        "position" => Command::Position(rest()),
        "move" => Command::Move(rest()),
        "go" => Command::Go(rest()),
        "perft" => {
            let depth = tokens.get(1).and_then(|t| t.parse::<u32>().ok()).unwrap_or(4);
            Command::Perft(depth)
        }
        "display" => Command::Display,
        "generate" => Command::Generate,
        "eval" => Command::Eval(tokens.get(1).map(|t| (*t).to_string())),
        "help" => Command::Help,
        "quit" => Command::Quit,
        _ => Command::Unknown(first.to_string()),
    };

    Some(cmd)
}

/// Split `setoption` arguments into the name and value word groups
/// (`name <words...> value <words...>`).
#[must_use]
pub fn parse_setoption(args: &[String]) -> Option<(String, Option<String>)> {
    let mut name_parts: Vec<&str> = Vec::new();
    let mut value_parts: Vec<&str> = Vec::new();
    let mut mode = "";

    for part in args {
        match part.as_str() {
            "name" => mode = "name",
            "value" => mode = "value",
            other => match mode {
                "name" => name_parts.push(other),
                "value" => value_parts.push(other),
                _ => {}
            },
        }
    }

    if name_parts.is_empty() {
        return None;
    }

    let name = name_parts.join(" ");
    let value = if value_parts.is_empty() {
        None
    } else {
        Some(value_parts.join(" "))
    };

    Some((name, value))
}
