use crate::advise::{
    run_catalog, run_crops, run_market, run_risk, run_schemes, CatalogArgs, CropArgs, MarketArgs,
    RiskArgs, SchemeArgs,
};
use crate::demo::{run_demo, DemoArgs};
use crate::infra::Runtime;
use clap::{Parser, Subcommand};
use smart_agro::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Smart Agro Advisor",
    about = "Crop suitability, scheme eligibility and field risk advice from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank crops for soil and climate readings
    Crops(CropArgs),
    /// List government schemes a farmer qualifies for
    Schemes(SchemeArgs),
    /// Assess disaster risk for a field and print a weather outlook
    Risk(RiskArgs),
    /// Indicative mandi price and simulated price history
    Market(MarketArgs),
    /// Print the loaded crop and scheme tables
    Catalog(CatalogArgs),
    /// Walk through one worked example per advisor (default command)
    Demo(DemoArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Demo(DemoArgs::default()));

    let runtime = Runtime::bootstrap()?;

    match command {
        Command::Crops(args) => run_crops(&runtime, args),
        Command::Schemes(args) => run_schemes(&runtime, args),
        Command::Risk(args) => run_risk(&runtime, args),
        Command::Market(args) => run_market(&runtime, args),
        Command::Catalog(args) => run_catalog(&runtime, args),
        Command::Demo(args) => run_demo(&runtime, args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_crop_readings() {
        let cli = Cli::try_parse_from([
            "smart-agro-cli",
            "crops",
            "--soil",
            "sandy",
            "--ph",
            "6.5",
            "--rainfall",
            "250",
            "--temperature",
            "32",
            "--limit",
            "3",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Crops(args)) => {
                assert_eq!(args.soil, "sandy");
                assert_eq!(args.limit, Some(3));
                assert!(!args.json);
            }
            other => panic!("expected crops command, got {other:?}"),
        }
    }

    #[test]
    fn accepts_sub_zero_crop_temperatures() {
        let cli = Cli::try_parse_from([
            "smart-agro-cli",
            "crops",
            "--soil",
            "loamy",
            "--ph",
            "6.8",
            "--rainfall",
            "400",
            "--temperature",
            "-3",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Crops(args)) => assert_eq!(args.temperature, -3.0),
            other => panic!("expected crops command, got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_dates() {
        let result = Cli::try_parse_from([
            "smart-agro-cli",
            "risk",
            "--state",
            "Kerala",
            "--district",
            "Idukki",
            "--crop-type",
            "rice",
            "--growth-stage",
            "sowing",
            "--temperature",
            "24",
            "--start",
            "10/08/2024",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn demo_is_the_default_command() {
        let cli = Cli::try_parse_from(["smart-agro-cli"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }
}
