use crate::utils::validation::parse_datetime;
use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "yijing")]
#[command(version)]
#[command(about = "I Ching hexagram casting by lunar date and hour, with AI interpretation")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, short, global = true, help = "Enable verbose output")]
    pub verbose: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// 起一卦並輸出結果
    Cast(CastArgs),
    /// 啟動 HTTP 服務
    Serve(ServeArgs),
}

#[derive(Debug, Clone, Args)]
pub struct CastArgs {
    #[arg(long, value_parser = parse_cast_time, help = "Casting time, e.g. 2024-09-17T10:30 (default: now)")]
    pub at: Option<NaiveDateTime>,

    #[arg(long, value_parser = clap::value_parser!(u16).range(100..=999), help = "Three-digit draw 100..=999 (default: random)")]
    pub draw: Option<u16>,

    #[arg(long, help = "Skip the AI interpretation")]
    pub offline: bool,

    #[arg(long, help = "Print the reading as JSON")]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    #[arg(long, help = "Bind host (overrides config file)")]
    pub host: Option<String>,

    #[arg(long, help = "Bind port (overrides config file)")]
    pub port: Option<u16>,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

pub fn parse_cast_time(value: &str) -> Result<NaiveDateTime, String> {
    parse_datetime("--at", value).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_cast_time_reports_flag() {
        let at = parse_cast_time("2024-09-17T10:30").unwrap();
        assert_eq!(at.hour(), 10);

        let err = parse_cast_time("yesterday").unwrap_err();
        assert!(err.contains("--at"));
    }

    #[test]
    fn test_cli_parses_cast_subcommand() {
        let cli = CliConfig::try_parse_from([
            "yijing", "cast", "--at", "2024-09-17T10:30", "--draw", "382", "--offline",
        ])
        .unwrap();

        match cli.command {
            Command::Cast(args) => {
                assert_eq!(args.draw, Some(382));
                assert!(args.offline);
                assert!(args.at.is_some());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_out_of_range_draw() {
        assert!(CliConfig::try_parse_from(["yijing", "cast", "--draw", "99"]).is_err());
        assert!(CliConfig::try_parse_from(["yijing", "cast", "--draw", "1000"]).is_err());
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = CliConfig::try_parse_from([
            "yijing", "serve", "--port", "8080", "--verbose", "--config", "oracle.toml",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("oracle.toml")));
        assert!(matches!(cli.command, Command::Serve(ServeArgs { port: Some(8080), .. })));
    }
}
