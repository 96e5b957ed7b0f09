use anyhow::Result;
use clap::Parser;
use confsheet::{config, pipeline};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Merge a published Google Sheet of conferences into the YAML data file.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Debug output
    #[arg(short = 'v', long)]
    debug: bool,

    /// Google Spreadsheet ID
    #[arg(long, default_value = config::DEFAULT_SHEET_ID)]
    sheetid: String,

    /// Google Spreadsheet tab name
    #[arg(long)]
    sheetname: String,

    /// Conference list to update
    #[arg(long, default_value = config::DEFAULT_DATA_FILE)]
    data_file: PathBuf,

    /// Where the fetched CSV is written
    #[arg(long, default_value = config::DEFAULT_TEMP_DIR)]
    temp_dir: PathBuf,
}

impl From<Args> for config::Config {
    fn from(args: Args) -> Self {
        let mut cfg = config::Config::new(args.sheetname);
        cfg.sheet_id = args.sheetid;
        cfg.data_file = args.data_file;
        cfg.temp_dir = args.temp_dir;
        cfg
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // ─── init logging ────────────────────────────────────────────────
    let default_level = if args.debug { "debug" } else { "info" };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_target(false)
        .init();
    info!("startup");

    let cfg = config::Config::from(args);
    match pipeline::run(&cfg) {
        Ok(stats) => {
            info!(
                "updated {}: {} replaced, {} added",
                cfg.data_file.display(),
                stats.replaced,
                stats.added
            );
            Ok(())
        }
        Err(e) => {
            error!("{:#}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_defaults() {
        Args::command().debug_assert();
        let args = Args::try_parse_from(["confsheet", "--sheetname", "Main"]).unwrap();
        assert!(!args.debug);
        assert_eq!(args.sheetid, config::DEFAULT_SHEET_ID);

        let cfg = config::Config::from(args);
        assert_eq!(cfg.sheet_name, "Main");
        assert_eq!(cfg.data_file, PathBuf::from("_data/conferences.yml"));
        assert_eq!(cfg.temp_dir, PathBuf::from("_temp"));
        assert_eq!(cfg.csv_file, "conferences.csv");
    }

    #[test]
    fn test_sheetname_is_required() {
        assert!(Args::try_parse_from(["confsheet"]).is_err());
        let args =
            Args::try_parse_from(["confsheet", "-v", "--sheetid", "X", "--sheetname", "S"]).unwrap();
        assert!(args.debug);
        assert_eq!(args.sheetid, "X");
    }
}
