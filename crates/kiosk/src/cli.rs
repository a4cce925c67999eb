use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use visitor_pass::Field;

#[derive(Parser, Debug)]
#[command(name = "kiosk", version, about = "Campus visitor registration kiosk")]
pub struct Cli {
    /// Directory holding config.json5 / config.toml
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Base URL of the registration endpoint
    #[arg(long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the interactive kiosk (default)
    Run,
    /// Register one visitor without the TUI and print the pass
    Register(RegisterArgs),
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct RegisterArgs {
    #[arg(long)]
    pub first_name: String,
    #[arg(long, default_value = "")]
    pub middle_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub address: String,
    #[arg(long)]
    pub purpose: String,
    /// Also write the pass as an SVG image, into the passes directory when
    /// no path is given
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    pub svg: Option<Option<PathBuf>>,
}

impl RegisterArgs {
    /// Field values in form order.
    pub fn fields(&self) -> [(Field, &str); 5] {
        [
            (Field::FirstName, self.first_name.as_str()),
            (Field::MiddleName, self.middle_name.as_str()),
            (Field::LastName, self.last_name.as_str()),
            (Field::Address, self.address.as_str()),
            (Field::Purpose, self.purpose.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["kiosk"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(cli.endpoint, None);
    }

    #[test]
    fn register_takes_named_fields() {
        let cli = Cli::try_parse_from([
            "kiosk",
            "register",
            "--first-name",
            "ana",
            "--last-name",
            "cruz",
            "--address",
            "Lapasan",
            "--purpose",
            "Enrollment",
            "--endpoint",
            "http://gate.local:9000",
        ])
        .unwrap();

        assert_eq!(cli.endpoint.as_deref(), Some("http://gate.local:9000"));
        let Some(Command::Register(args)) = cli.command else {
            panic!("expected register subcommand");
        };
        assert_eq!(args.middle_name, "");
        assert_eq!(args.svg, None);
        assert_eq!(args.fields()[2], (Field::LastName, "cruz"));
    }

    #[test]
    fn svg_path_is_optional() {
        let base = [
            "kiosk",
            "register",
            "--first-name",
            "ana",
            "--last-name",
            "cruz",
            "--address",
            "Lapasan",
            "--purpose",
            "Enrollment",
        ];
        let parse = |extra: &[&str]| {
            let cli = Cli::try_parse_from(base.iter().chain(extra)).unwrap();
            match cli.command {
                Some(Command::Register(args)) => args.svg,
                other => panic!("unexpected {other:?}"),
            }
        };

        assert_eq!(parse(&["--svg"]), Some(None));
        assert_eq!(
            parse(&["--svg", "pass.svg"]),
            Some(Some(PathBuf::from("pass.svg")))
        );
    }

    #[test]
    fn register_requires_purpose() {
        let err = Cli::try_parse_from([
            "kiosk",
            "register",
            "--first-name",
            "ana",
            "--last-name",
            "cruz",
            "--address",
            "Lapasan",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }
}
