//! gridzarr command-line tool.
//!
//! One subcommand per pipeline step: fetch raw files from cloud storage,
//! convert NetCDF/GRIB2 into chunked Zarr stores, inspect stores through
//! lazy array handles, and convert stores back to NetCDF.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

use convert::{
    grib_to_zarr, load_grib, load_lazy, load_netcdf, netcdf_to_zarr, zarr_to_netcdf,
    CombineStrategy, ConvertOutcome, DataDirs, Loaded,
};
use fetch::{FetchConfig, ObjectFetcher};
use grib_source::KeyFilter;
use zarr_store::StoreConfig;

#[derive(Parser, Debug)]
#[command(name = "gridzarr")]
#[command(about = "Convert gridded weather data (NetCDF, GRIB2) to chunked Zarr stores and back")]
struct Args {
    /// Directory of raw (unprocessed) source files
    #[arg(long, env = "GRIDZARR_RAW_DIR", default_value = "raw_data")]
    raw_dir: PathBuf,

    /// Directory of chunked Zarr stores
    #[arg(long, env = "GRIDZARR_ZARR_DIR", default_value = "zarr_data")]
    zarr_dir: PathBuf,

    /// Directory of reconstituted NetCDF files
    #[arg(long, env = "GRIDZARR_NC_DIR", default_value = "nc_data")]
    nc_dir: PathBuf,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Download an object from S3 cloud storage into the raw-data directory
    Download {
        /// Bucket name (e.g. noaa-ufs-regtests-pds)
        #[arg(short, long)]
        bucket: String,

        /// Key of the object in cloud storage
        #[arg(short, long)]
        key: String,

        /// Filename to save the object as under the raw-data directory
        #[arg(short = 'o', long)]
        save_as: String,

        /// Bucket region
        #[arg(long, env = "GRIDZARR_S3_REGION", default_value = "us-east-1")]
        region: String,

        /// Custom S3 endpoint (MinIO and friends)
        #[arg(long, env = "GRIDZARR_S3_ENDPOINT")]
        endpoint: Option<String>,

        /// Sign requests with credentials from the environment instead of
        /// anonymous access
        #[arg(long)]
        signed: bool,
    },

    /// Convert a NetCDF file to a chunked store
    Nc2zarr {
        /// Source filename under the raw-data directory (with extension)
        #[arg(short, long)]
        filename: String,

        /// Store name to save as (without the .zarr extension)
        #[arg(short = 'z', long)]
        store: String,

        /// Variables sharing a name with one of their dimensions, to be
        /// refactored into renamed coordinates
        #[arg(short = 'd', long = "refactor", num_args = 1..)]
        refactor: Vec<String>,

        /// Print the loaded dataset's structure
        #[arg(long)]
        describe: bool,
    },

    /// Convert a GRIB2 file to a chunked store
    Grb2zarr {
        /// Source filename under the raw-data directory (with extension)
        #[arg(short, long)]
        filename: String,

        /// Store name to save as (without the .zarr extension)
        #[arg(short = 'z', long)]
        store: String,

        /// Filter keys (shortName, typeOfLevel, level), paired with -v
        #[arg(short = 'k', long = "key", num_args = 1..)]
        keys: Vec<String>,

        /// Filter values, one per -k key
        #[arg(short = 'v', long = "value", num_args = 1..)]
        values: Vec<String>,

        /// Print the loaded dataset's structure
        #[arg(long)]
        describe: bool,
    },

    /// Open one variable of a store as a lazy array and print its layout
    LoadZarr {
        /// Store name (without the .zarr extension)
        #[arg(short = 'z', long)]
        store: String,

        /// Variable of interest within the store
        #[arg(short, long)]
        variable: String,
    },

    /// Convert a store back to a NetCDF file
    Zarr2nc {
        /// Store name (without the .zarr extension)
        #[arg(short = 'z', long)]
        store: String,

        /// Combine strategy: by_coords or nested
        #[arg(short, long, default_value = "by_coords")]
        combine: String,
    },

    /// Load a NetCDF file and print its structure without persisting
    LoadNc {
        /// Source filename under the raw-data directory (with extension)
        #[arg(short, long)]
        filename: String,

        /// Variables sharing a name with one of their dimensions, to be
        /// refactored into renamed coordinates
        #[arg(short = 'd', long = "refactor", num_args = 1..)]
        refactor: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: logging already initialized");
    }

    netcdf_source::silence_hdf5_errors();

    let dirs = DataDirs::new(args.raw_dir, args.zarr_dir, args.nc_dir);
    if let Err(e) = dirs.ensure() {
        error!(error = %e, "could not create data directories");
        return ExitCode::FAILURE;
    }

    match run(args.command, &dirs).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, dirs: &DataDirs) -> Result<ExitCode> {
    let store_config = StoreConfig::from_env();

    match command {
        Command::Download {
            bucket,
            key,
            save_as,
            region,
            endpoint,
            signed,
        } => {
            let fetcher = ObjectFetcher::new(FetchConfig {
                region,
                endpoint,
                skip_signature: !signed,
            });
            let dest = dirs.raw.join(&save_as);
            let size = fetcher.download(&bucket, &key, &dest).await?;
            println!(
                "Downloaded {} to {} ({} bytes)",
                key,
                dest.display(),
                size
            );
            Ok(ExitCode::SUCCESS)
        }

        Command::Nc2zarr {
            filename,
            store,
            refactor,
            describe,
        } => {
            if describe {
                if let Loaded::Dataset(ds) = load_netcdf(dirs, &filename, &refactor)? {
                    println!("{}", ds.describe());
                }
            }
            report_outcome(netcdf_to_zarr(
                dirs,
                &filename,
                &store,
                &refactor,
                &store_config,
            )?)
        }

        Command::Grb2zarr {
            filename,
            store,
            keys,
            values,
            describe,
        } => {
            let filter = KeyFilter::from_pairs(&keys, &values)?;
            if describe {
                if let Loaded::Dataset(ds) = load_grib(dirs, &filename, &filter)? {
                    println!("{}", ds.describe());
                }
            }
            report_outcome(grib_to_zarr(
                dirs,
                &filename,
                &store,
                &filter,
                &store_config,
            )?)
        }

        Command::LoadZarr { store, variable } => {
            let mut lazy = load_lazy(dirs, &store, &variable)?;
            println!(
                "{}: shape {:?}, dims {:?}",
                lazy.variable(),
                lazy.shape(),
                lazy.dims()
            );
            println!(
                "chunks: {:?} per chunk, {:?} grid, {} total",
                lazy.chunk_shape(),
                lazy.chunk_grid_shape(),
                lazy.num_chunks()
            );

            // Touch only the first chunk for the preview.
            if lazy.num_elements() > 0 {
                let origin = vec![0u64; lazy.shape().len()];
                let chunk = lazy.read_chunk(&origin)?;
                let preview: Vec<f64> = chunk.iter().copied().take(8).collect();
                println!("first chunk starts with {:?}", preview);
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Zarr2nc { store, combine } => {
            let strategy: CombineStrategy = combine.parse()?;
            let out = zarr_to_netcdf(dirs, &store, strategy)?;
            println!("Saved {}", out.display());
            Ok(ExitCode::SUCCESS)
        }

        Command::LoadNc { filename, refactor } => match load_netcdf(dirs, &filename, &refactor)? {
            Loaded::Dataset(ds) => {
                println!("{}", ds.describe());
                Ok(ExitCode::SUCCESS)
            }
            Loaded::Skipped(reason) => {
                println!("Not loaded: {}", reason);
                Ok(ExitCode::FAILURE)
            }
        },
    }
}

/// Print a conversion outcome; skipped conversions exit nonzero with their
/// remediation message.
fn report_outcome(outcome: ConvertOutcome) -> Result<ExitCode> {
    match outcome {
        ConvertOutcome::Stored(report) => {
            println!(
                "Stored {} ({} arrays, {} chunks, {} bytes)",
                report.path.display(),
                report.arrays,
                report.chunks,
                report.bytes_on_disk
            );
            Ok(ExitCode::SUCCESS)
        }
        ConvertOutcome::Skipped(reason) => {
            println!("Not converted: {}", reason);
            Ok(ExitCode::FAILURE)
        }
    }
}
