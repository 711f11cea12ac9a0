//! Command line interface for the service binary.

use clap::Parser;

/// REST API for mapcode encoding and decoding.
#[derive(Parser, Debug, PartialEq)]
#[command(name = "mapcode-service", version, about)]
pub struct Cli {
    /// Port the HTTP listener binds (overrides SERVICE_PORT).
    #[arg(long)]
    pub port: Option<u16>,

    /// Only log warnings and errors.
    #[arg(long)]
    pub silent: bool,

    /// Log debug output.
    #[arg(long, conflicts_with = "silent")]
    pub debug: bool,
}

/// Drop unrecognized command line tokens before parsing.
///
/// Unknown options are reported on stderr and ignored rather than treated as
/// fatal, so stale launcher scripts keep working across releases.
pub fn filter_known_args(args: impl IntoIterator<Item = String>) -> Vec<String> {
    const VALUE_OPTIONS: &[&str] = &["--port"];
    const SWITCHES: &[&str] = &["--silent", "--debug", "--help", "-h", "--version", "-V"];

    let mut iter = args.into_iter();
    // The first token is the program name.
    let mut kept: Vec<String> = iter.next().into_iter().collect();

    while let Some(arg) = iter.next() {
        let name = arg.split('=').next().unwrap_or(&arg).to_string();
        if VALUE_OPTIONS.contains(&name.as_str()) {
            let has_inline_value = arg.contains('=');
            kept.push(arg);
            if !has_inline_value {
                if let Some(value) = iter.next() {
                    kept.push(value);
                }
            }
        } else if SWITCHES.contains(&name.as_str()) {
            kept.push(arg);
        } else {
            eprintln!("Unknown or unsupported argument ignored: {arg}");
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn known_args_pass_through() {
        let kept = filter_known_args(args(&["mapcode-service", "--port", "8080", "--debug"]));
        assert_eq!(kept, args(&["mapcode-service", "--port", "8080", "--debug"]));
    }

    #[test]
    fn inline_value_syntax_is_kept() {
        let kept = filter_known_args(args(&["mapcode-service", "--port=9000"]));
        assert_eq!(kept, args(&["mapcode-service", "--port=9000"]));
    }

    #[test]
    fn unknown_flags_are_dropped() {
        let kept = filter_known_args(args(&["mapcode-service", "--frobnicate", "--silent"]));
        assert_eq!(kept, args(&["mapcode-service", "--silent"]));
    }

    #[test]
    fn stray_positional_tokens_are_dropped() {
        let kept = filter_known_args(args(&["mapcode-service", "serve", "--port", "8080"]));
        assert_eq!(kept, args(&["mapcode-service", "--port", "8080"]));
    }

    #[test]
    fn filtered_args_parse() {
        let kept = filter_known_args(args(&[
            "mapcode-service",
            "--unknown",
            "--port",
            "9999",
        ]));
        let cli = Cli::parse_from(kept);
        assert_eq!(cli.port, Some(9999));
        assert!(!cli.silent);
    }
}
