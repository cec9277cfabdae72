use clap::Parser;
use clap_verbosity_flag::Level as VerbosityLevel;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use item_catalog::CatalogSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, Level};
use tracing_subscriber::fmt::Subscriber;

mod fetcher;
mod pipeline;

#[cfg(test)]
mod test_server;

/// Downloads the image of every item in the catalogs into `<id>.webp` files.
#[derive(Debug, Parser)]
struct Opts {
    /// Project root. Relative directories below are resolved against it.
    #[clap(long, env = "ITEM_IMAGES_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Directory holding the catalog files. Defaults to `<root>/scripts/data`.
    #[clap(long, env = "ITEM_IMAGES_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory the images are saved to. Defaults to `<root>/public/images/items`.
    #[clap(long, env = "ITEM_IMAGES_OUT_DIR")]
    pub out_dir: Option<PathBuf>,

    /// Timeout for each image request, in seconds.
    #[clap(long, env = "ITEM_IMAGES_TIMEOUT", default_value_t = fetcher::DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Catalog file to process, relative to the data directory. Can be repeated.
    /// Defaults to every known catalog.
    #[clap(long = "catalog")]
    pub catalogs: Vec<PathBuf>,

    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

impl Opts {
    fn config(&self) -> pipeline::Config {
        let data_dir = self
            .root
            .join(self.data_dir.as_deref().unwrap_or(Path::new("scripts/data")));
        let output_dir = self
            .root
            .join(self.out_dir.as_deref().unwrap_or(Path::new("public/images/items")));

        let catalogs = if self.catalogs.is_empty() {
            CatalogSet::default_files(&data_dir)
        } else {
            CatalogSet::new(&data_dir, &self.catalogs)
        };

        pipeline::Config {
            root: self.root.clone(),
            catalogs,
            output_dir,
            timeout: Duration::from_secs(self.timeout),
        }
    }
}

#[tokio::main]
async fn main() {
    let opts = Opts::parse();

    // Initialize tracing.
    let subscriber = Subscriber::builder();
    let subscriber = match opts.verbose.log_level() {
        Some(VerbosityLevel::Error) => subscriber.with_max_level(Level::ERROR),
        Some(VerbosityLevel::Warn) => subscriber.with_max_level(Level::WARN),
        Some(VerbosityLevel::Info) => subscriber.with_max_level(Level::INFO),
        Some(VerbosityLevel::Debug) => subscriber.with_max_level(Level::DEBUG),
        Some(VerbosityLevel::Trace) => subscriber.with_max_level(Level::TRACE),
        None => subscriber.with_max_level(tracing::level_filters::LevelFilter::OFF),
    };
    subscriber
        .with_ansi(true)
        .with_writer(std::io::stdout)
        .init();

    debug!(?opts);
    let config = opts.config();

    if let Err(e) = pipeline::run(&config).await {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use item_catalog::DEFAULT_CATALOG_FILES;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Opts {
        Opts::try_parse_from(std::iter::once("item-images").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_match_the_project_layout() {
        let config = parse(&["--root", "/project"]).config();

        assert_eq!(config.root, PathBuf::from("/project"));
        assert_eq!(config.output_dir, PathBuf::from("/project/public/images/items"));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.catalogs.paths().len(), DEFAULT_CATALOG_FILES.len());
        assert_eq!(
            config.catalogs.paths()[6],
            Path::new("/project/scripts/data/shields.json")
        );
    }

    #[test]
    fn overrides_resolve_against_root() {
        let config = parse(&[
            "--root",
            "/project",
            "--data-dir",
            "catalogs",
            "--out-dir",
            "/tmp/images",
            "--timeout",
            "5",
            "--catalog",
            "weapons.json",
            "--catalog",
            "shields.json",
        ])
        .config();

        assert_eq!(config.output_dir, PathBuf::from("/tmp/images"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(
            config.catalogs.paths(),
            &[
                PathBuf::from("/project/catalogs/weapons.json"),
                PathBuf::from("/project/catalogs/shields.json"),
            ]
        );
    }
}
