use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use gray_assay::{
    AssayReport, ConcentrationEstimate, GrayscaleFormula, GrayscaleTransformer, Image, ParallelConfig,
    ParallelTransformer, PixelFormat, TransformerConfig,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "assay_tester")]
#[command(version, about = "Convert a photo to grayscale and estimate concentration from its gray level", long_about = None)]
struct Cli {
    /// Image to convert (PNG, JPEG, BMP, ...)
    #[arg(value_name = "INPUT", required_unless_present = "list")]
    input: Option<PathBuf>,

    /// Destination PNG, overwritten if it exists
    #[arg(value_name = "OUTPUT", required_unless_present = "list")]
    output: Option<PathBuf>,

    /// Grayscale formula (see --list)
    #[arg(short, long, value_name = "NAME", default_value_t = GrayscaleFormula::LuminanceWeighted601)]
    formula: GrayscaleFormula,

    /// Pixel layout of the written PNG
    #[arg(long, value_enum, default_value_t = FormatArg::Keep)]
    format: FormatArg,

    /// Convert row bands concurrently
    #[arg(long)]
    parallel: bool,

    /// Number of row bands when --parallel is set (defaults to the CPU count)
    #[arg(short = 'j', long, value_name = "N", requires = "parallel")]
    workers: Option<usize>,

    /// Skip the mean gray level and concentration estimate
    #[arg(long)]
    no_estimate: bool,

    /// Print the available formula names and exit
    #[arg(long)]
    list: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    /// Same layout as the input
    Keep,
    /// Opaque RGB
    Rgb,
    /// RGB with alpha
    Rgba,
}

impl FormatArg {
    fn resolve(self, input: PixelFormat) -> PixelFormat {
        match self {
            FormatArg::Keep => input,
            FormatArg::Rgb => PixelFormat::Rgb8,
            FormatArg::Rgba => PixelFormat::Rgba8,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Argument Parsing & Setup ---
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if cli.list {
        for formula in GrayscaleFormula::ALL {
            println!("{}", formula);
        }
        return Ok(());
    }

    let (Some(input), Some(output)) = (cli.input.as_ref(), cli.output.as_ref()) else {
        bail!("INPUT and OUTPUT are required");
    };

    // --- 2. Image Loading ---
    let loader = GrayscaleTransformer::default();
    let image = loader
        .load(input)
        .with_context(|| format!("could not read {}", input.display()))?;

    // --- 3. Engine Initialization ---
    let config = TransformerConfig {
        formula: cli.formula,
        output_format: cli.format.resolve(image.format()),
    };

    // --- 4. Conversion ---
    let (converted, report) = if cli.parallel {
        let mut parallel_config = ParallelConfig {
            transformer: config,
            ..ParallelConfig::default()
        };
        if let Some(workers) = cli.workers {
            parallel_config.workers = workers;
        }
        let engine = ParallelTransformer::new(parallel_config);
        if cli.no_estimate {
            let duplicated = image.duplicate(config.output_format);
            (engine.apply(&duplicated).await?, None)
        } else {
            split(engine.analyze(&image).await?)
        }
    } else {
        let engine = GrayscaleTransformer::new(config);
        if cli.no_estimate {
            (engine.apply(&engine.duplicate_default(&image)), None)
        } else {
            split(engine.analyze(&image)?)
        }
    };

    // --- 5. Write Output ---
    loader
        .save(&converted, output)
        .with_context(|| format!("could not write {}", output.display()))?;

    // --- 6. Report ---
    if let Some((mean, estimate)) = report {
        println!("formula: {}", cli.formula);
        println!("mean gray level: {}", mean);
        println!("{}", estimate);
    }

    println!("Processing complete. Output saved to {}", output.display());
    Ok(())
}

fn split(report: AssayReport) -> (Image, Option<(u32, ConcentrationEstimate)>) {
    (report.image, Some((report.mean, report.estimate)))
}
