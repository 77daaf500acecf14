use std::path::PathBuf;

use clap::Parser;

/// Chat with a model that can call local functions.
#[derive(Parser, Debug)]
#[command(name = "calling", version, about)]
pub struct Args {
    /// Messages to send, one `ask` each. Reads lines from stdin when empty.
    pub messages: Vec<String>,

    /// JSON array of chat-completion responses to replay as the model.
    #[arg(short, long)]
    pub script: PathBuf,

    /// Dispatch at most one function call per message and print its raw
    /// result instead of asking the model again.
    #[arg(long)]
    pub no_chain: bool,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Model identifier override.
    #[arg(short, long)]
    pub model: Option<String>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Print the transcript as JSON when done.
    #[arg(long)]
    pub dump_transcript: bool,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_one_shot_invocation() {
        let args = Args::try_parse_from([
            "calling",
            "--script",
            "replies.json",
            "--no-chain",
            "what is 2 + 2?",
        ])
        .unwrap();
        assert_eq!(args.script, PathBuf::from("replies.json"));
        assert!(args.no_chain);
        assert_eq!(args.messages, vec!["what is 2 + 2?"]);
        assert!(args.config.is_none());
    }

    #[test]
    fn script_is_required() {
        assert!(Args::try_parse_from(["calling", "hello"]).is_err());
    }
}
