use clap::{Args, Parser, Subcommand};
use folio::{
    Color, DirectorySink, EngineConfig, ExportError, ExporterBuilder, ImageNode, Orientation,
    PageFormat, PartialExportOptions, ReportMeta, Unit,
};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "folio", version, about = "Export business reports and images as PDF")]
struct Cli {
    /// TOML configuration file; FOLIO_* environment variables override it
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Directory the PDF is written to
    #[arg(long, short)]
    out_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a JSON report bundle as a structured PDF
    Report {
        bundle: PathBuf,

        #[arg(long, default_value = "Business Report")]
        title: String,

        /// Reporting period shown under the title, e.g. "March 2024"
        #[arg(long)]
        period: Option<String>,

        #[arg(long)]
        company: Option<String>,

        #[command(flatten)]
        options: OptionArgs,
    },
    /// Tile one or more images (stacked top to bottom) across PDF pages
    Image {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        options: OptionArgs,
    },
}

#[derive(Args, Debug)]
struct OptionArgs {
    #[arg(long)]
    filename: Option<String>,

    /// portrait | landscape
    #[arg(long)]
    orientation: Option<Orientation>,

    /// pt | mm | cm | in | px
    #[arg(long)]
    unit: Option<Unit>,

    /// a3 | a4 | a5 | letter | legal | <width>x<height>
    #[arg(long)]
    format: Option<PageFormat>,

    #[arg(long)]
    margin: Option<f32>,

    #[arg(long)]
    scale: Option<f32>,

    /// #RGB or #RRGGBB
    #[arg(long)]
    background: Option<Color>,
}

impl From<OptionArgs> for PartialExportOptions {
    fn from(args: OptionArgs) -> Self {
        PartialExportOptions {
            filename: args.filename,
            orientation: args.orientation,
            unit: args.unit,
            page_format: args.format,
            margin: args.margin,
            raster_scale: args.scale,
            background_color: args.background,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), ExportError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("folio=info"))
        .init();

    let cli = Cli::parse();
    let config = EngineConfig::load(cli.config.as_deref())?;
    let out_dir = cli.out_dir.unwrap_or_else(|| config.output.dir.clone());

    let exporter = ExporterBuilder::from_config(&config)
        .with_sink(Arc::new(DirectorySink::new(&out_dir)))
        .build()?;

    match cli.command {
        Command::Report {
            bundle,
            title,
            period,
            company,
            options,
        } => {
            let unreadable =
                |e: &dyn std::fmt::Display| ExportError::Configuration(format!("{}: {}", bundle.display(), e));
            let raw = tokio::fs::read_to_string(&bundle)
                .await
                .map_err(|e| unreadable(&e))?;
            let data: Value = serde_json::from_str(&raw).map_err(|e| unreadable(&e))?;

            let mut meta = ReportMeta::new(title);
            meta.period_label = period;
            meta.company_name = company;
            let meta = config.apply_company(meta);

            exporter
                .export_report_bundle(&data, &meta, options.into())
                .await?;
        }
        Command::Image { files, options } => {
            let mut nodes = Vec::with_capacity(files.len());
            for file in &files {
                nodes.push(ImageNode::open(file).await?);
            }
            if nodes.len() == 1 {
                exporter.export_visual_node(&nodes[0], options.into()).await?;
            } else {
                exporter.export_visual_nodes(nodes, options.into()).await?;
            }
        }
    }

    Ok(())
}
