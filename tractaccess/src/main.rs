use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tractaccess::{
    app::{
        aggregate, plot, post_process, post_process::ComparisonSource, prep, svi_merge,
        travel_time, TractAccessError,
    },
    config::PipelineConfiguration,
};
use tractaccess_core::model::AnalysisOption;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct TractAccessArguments {
    #[arg(long, global = true, help = "path to a .toml or .json pipeline configuration file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "root directory holding state_data and county_data")]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    app: App,
}

#[derive(Subcommand)]
pub enum App {
    /// build the tract, parcel-average and parcel origin sets and select hospitals
    Prep {
        #[arg(long)]
        county_name: String,
        #[arg(long)]
        state_name: String,
    },
    /// compute origin to hospital travel times for one origin set
    TravelTime {
        #[arg(long)]
        county_name: String,
        #[arg(long)]
        state_name: String,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3), help = "origin set: 1 tract centroids, 2 parcel averages, 3 parcels")]
        option: u8,
        #[arg(long, help = "name of the .osm.pbf extract under state_data/osm")]
        osm: String,
    },
    /// combine the aggregated files of all three origin sets per tract
    Aggregate {
        #[arg(long)]
        county_name: String,
    },
    /// write the per-tract comparison table used by the plots
    Combine {
        #[arg(long)]
        county_name: String,
        #[arg(long, value_enum)]
        source: Option<ComparisonSource>,
    },
    /// box plots of the comparison columns for the configured county grid
    PlotBoxes {
        #[arg(long, help = "use a shared y axis for every panel")]
        fixed_scale: bool,
        #[arg(long, help = "also save one figure per county")]
        individual: bool,
    },
    /// travel-time histograms of one aggregated file
    PlotHistogram {
        #[arg(long)]
        county_name: String,
        #[arg(long, help = "aggregated file name within the county directory")]
        file_name: String,
    },
    /// tract map colored by a column of the combined tract table
    PlotChoropleth {
        #[arg(long)]
        county_name: String,
        #[arg(long)]
        state_name: String,
        #[arg(long)]
        column: String,
    },
    /// join census tract polygons with the SVI attribute table
    SviMerge {
        #[arg(long)]
        shapefile: PathBuf,
        #[arg(long)]
        csv: PathBuf,
        #[arg(long)]
        output_dir: PathBuf,
        #[arg(long, default_value = "SVI_North Carolina_SHP")]
        output_name: String,
        #[arg(long, help = "tract id column of the shapefile, detected from GEOID when omitted")]
        shapefile_id_column: Option<String>,
        #[arg(long, default_value = "FIPS")]
        csv_id_column: String,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = TractAccessArguments::parse();
    if let Err(e) = run(&args) {
        log::error!("tractaccess failed: {e}");
        std::process::exit(1);
    }
}

fn run(args: &TractAccessArguments) -> Result<(), TractAccessError> {
    log::info!("starting tractaccess at {}", chrono::Local::now().to_rfc3339());
    let mut conf = PipelineConfiguration::load(args.config.as_deref())?;
    if let Some(dir) = &args.data_dir {
        conf.layout.data_directory = dir.clone();
    }
    match &args.app {
        App::Prep {
            county_name,
            state_name,
        } => {
            let summary = prep::run(&conf, county_name, state_name)?;
            log::info!(
                "prepared {}: {} tracts, {} residential parcels ({} unmatched), {} hospitals",
                summary.county,
                summary.tracts,
                summary.parcels,
                summary.unmatched_parcels,
                summary.hospitals
            );
        }
        App::TravelTime {
            county_name,
            state_name,
            option,
            osm,
        } => {
            let option = AnalysisOption::try_from(*option)?;
            let out = travel_time::run(&conf, county_name, state_name, option, osm)?;
            log::info!(
                "{option}: {} travel times ({} unreachable) written to {}, {} aggregated rows written to {}",
                out.n_records,
                out.n_unreachable,
                out.travel_times_path.display(),
                out.n_aggregated,
                out.aggregated_path.display()
            );
        }
        App::Aggregate { county_name } => match aggregate::run(&conf, county_name)? {
            Some(out) => log::info!(
                "combined {} tracts ({} with top-x lists) into {}",
                out.tracts,
                out.tracts_with_top_x,
                out.combined_path.display()
            ),
            None => log::warn!("{county_name}: travel times are missing for some origin sets, nothing combined"),
        },
        App::Combine {
            county_name,
            source,
        } => match post_process::run(&conf, county_name, *source)? {
            Some(out) => log::info!("wrote {} tracts to {}", out.rows, out.path.display()),
            None => log::warn!("{county_name}: no comparison table written"),
        },
        App::PlotBoxes {
            fixed_scale,
            individual,
        } => {
            let out = plot::plot_boxes(&conf, *fixed_scale, *individual)?;
            match &out.grid {
                Some(path) => log::info!("saved box plot grid to {}", path.display()),
                None => log::error!("box plot grid could not be saved in any format"),
            }
        }
        App::PlotHistogram {
            county_name,
            file_name,
        } => {
            let paths = plot::plot_histogram(&conf, county_name, file_name)?;
            log::info!("saved {} histograms", paths.len());
        }
        App::PlotChoropleth {
            county_name,
            state_name,
            column,
        } => match plot::plot_choropleth(&conf, county_name, state_name, column)? {
            Some(path) => log::info!("saved choropleth to {}", path.display()),
            None => log::error!("choropleth could not be saved in any format"),
        },
        App::SviMerge {
            shapefile,
            csv,
            output_dir,
            output_name,
            shapefile_id_column,
            csv_id_column,
        } => {
            let request = svi_merge::SviMergeRequest {
                shapefile: shapefile.clone(),
                csv: csv.clone(),
                output_directory: output_dir.clone(),
                output_name: output_name.clone(),
                shapefile_id_column: shapefile_id_column.clone(),
                csv_id_column: csv_id_column.clone(),
            };
            let summary = svi_merge::run(&request)?;
            log::info!(
                "merged {} tracts, {} shapefile tracts and {} table records unmatched",
                summary.merged,
                summary.unmatched_tracts,
                summary.unmatched_records
            );
        }
    }
    Ok(())
}
