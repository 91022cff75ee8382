//! CLI for IAGen - product copy, feedback analysis and promo creatives.

use clap::{Args, Parser, Subcommand, ValueEnum};
use iagen::creative::{self, hex_to_rgb, Background, CanvasFormat, CreativeBrief, CreativeFont};
use iagen::feedback::{self, ReviewTable, Sentiment};
use iagen::{
    copy, parse_attributes, Channel, DescriptionRequest, GeminiConfig, GeminiTextProvider,
    Outcome, TextProvider,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "iagen")]
#[command(about = "Product copy, review insights and promo creatives via Gemini, with local fallbacks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse "key: value; ..." attributes
    Attrs {
        /// Attribute text
        text: String,
    },

    /// Write a product description
    Describe(DescribeArgs),

    /// Summarize customer reviews from a CSV file
    Summarize(ReviewArgs),

    /// Classify customer reviews from a CSV file
    Sentiment(ReviewArgs),

    /// Composite promotional creatives from a packshot
    Creative(CreativeArgs),

    /// Show the configured backend and check it responds
    Providers,
}

#[derive(Args)]
struct DescribeArgs {
    /// Product name
    #[arg(long)]
    name: String,

    /// Attributes, e.g. "sabor: coco; peso: 120 g"
    #[arg(long, default_value = "")]
    attrs: String,

    /// Target channel
    #[arg(long, value_enum, default_value_t = ChannelArg::Ecommerce)]
    channel: ChannelArg,

    /// Product photo to send with the prompt (repeatable)
    #[arg(long = "image")]
    images: Vec<PathBuf>,

    /// Skip the remote model
    #[arg(long)]
    local: bool,
}

#[derive(Args)]
struct ReviewArgs {
    /// CSV file with one review per row
    csv: PathBuf,

    /// Column holding the review text (detected when omitted)
    #[arg(long)]
    column: Option<String>,

    /// Skip the remote model
    #[arg(long)]
    local: bool,
}

#[derive(Args)]
struct CreativeArgs {
    /// Product packshot (PNG or JPEG)
    #[arg(long)]
    product: PathBuf,

    /// Output file path; numbered when --count is above 1
    #[arg(short, long)]
    output: PathBuf,

    /// Headline copy
    #[arg(long)]
    headline: String,

    /// Subheadline copy
    #[arg(long, default_value = "")]
    subheadline: String,

    /// Button label
    #[arg(long, default_value = "Compra ahora")]
    cta: String,

    /// Canvas: feed (1080x1350) or ads (1200x628)
    #[arg(long, value_enum, default_value_t = FormatArg::Feed)]
    format: FormatArg,

    /// Brand colour as #RRGGBB
    #[arg(long, default_value = "#E30613")]
    brand: String,

    /// white, solid, gradient, or a path to a background photo
    #[arg(long, default_value = "gradient")]
    background: String,

    /// Number of creatives (1-4)
    #[arg(long, default_value_t = 1)]
    count: usize,

    /// TrueType/OpenType font for the copy (default: DejaVu Sans Bold if installed)
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ChannelArg {
    Ecommerce,
    Marketplace,
    #[value(alias = "social")]
    Redes,
}

impl From<ChannelArg> for Channel {
    fn from(arg: ChannelArg) -> Self {
        match arg {
            ChannelArg::Ecommerce => Channel::Ecommerce,
            ChannelArg::Marketplace => Channel::Marketplace,
            ChannelArg::Redes => Channel::Redes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Feed,
    #[value(alias = "ad")]
    Ads,
}

impl From<FormatArg> for CanvasFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Feed => CanvasFormat::Feed,
            FormatArg::Ads => CanvasFormat::Ads,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = GeminiConfig::from_env();

    match cli.command {
        Commands::Attrs { text } => {
            show_attributes(&text, cli.json)?;
        }
        Commands::Describe(args) => {
            describe(args, &config, cli.json).await?;
        }
        Commands::Summarize(args) => {
            summarize(args, &config, cli.json).await?;
        }
        Commands::Sentiment(args) => {
            sentiment(args, &config, cli.json).await?;
        }
        Commands::Creative(args) => {
            compose_creatives(args, cli.json)?;
        }
        Commands::Providers => {
            list_providers(&config, cli.json).await?;
        }
    }

    Ok(())
}

/// Connects unless `--local` was given. Failure is reported, not fatal.
async fn connect(config: &GeminiConfig, local: bool) -> Option<GeminiTextProvider> {
    if local {
        return None;
    }
    match GeminiTextProvider::connect(config).await {
        Ok(provider) => {
            tracing::debug!(backend = provider.backend().label(), model = provider.model(), "connected");
            Some(provider)
        }
        Err(e) => {
            eprintln!("warning: Gemini unavailable ({e}); using local fallback");
            None
        }
    }
}

fn print_outcome<T, F>(outcome: &Outcome<T>, json_output: bool, render: F) -> anyhow::Result<()>
where
    T: Serialize,
    F: FnOnce(&T),
{
    if json_output {
        let result = serde_json::json!({
            "source": if outcome.is_fallback() { "local" } else { "remote" },
            "fallback_reason": outcome.reason(),
            "result": outcome.value(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        if let Some(reason) = outcome.reason() {
            eprintln!("warning: {reason}; showing local result");
        }
        render(outcome.value());
    }
    Ok(())
}

fn show_attributes(text: &str, json_output: bool) -> anyhow::Result<()> {
    let attrs = parse_attributes(text);
    if json_output {
        println!("{}", serde_json::to_string_pretty(&attrs)?);
    } else if attrs.is_empty() {
        println!("No attributes found.");
    } else {
        for (key, value) in attrs.iter() {
            println!("{key}: {value}");
        }
    }
    Ok(())
}

async fn describe(args: DescribeArgs, config: &GeminiConfig, json_output: bool) -> anyhow::Result<()> {
    let mut request = DescriptionRequest::new(&args.name, &args.attrs, args.channel.into());
    for path in &args.images {
        request = request.with_image(std::fs::read(path)?);
    }

    let provider = connect(config, args.local).await;
    let outcome = copy::describe_or_local(provider.as_ref(), &request).await;

    print_outcome(&outcome, json_output, |d| {
        println!("{}\n", d.short);
        println!("{}\n", d.long);
        for bullet in &d.bullets {
            println!("  • {bullet}");
        }
        if !d.hashtags.is_empty() {
            println!("\n{}", d.hashtags.join(" "));
        }
        if d.is_empty() && !d.raw.is_empty() {
            println!("Unstructured answer:\n{}", d.raw);
        }
    })
}

fn load_reviews(args: &ReviewArgs) -> anyhow::Result<Vec<String>> {
    let table = ReviewTable::from_path(&args.csv)?;
    let column = match args.column.as_deref().or(table.text_column()) {
        Some(column) => column.to_string(),
        None => anyhow::bail!(
            "no review column found; pass --column (headers: {})",
            table.headers().join(", ")
        ),
    };
    let reviews = table.reviews(&column)?;
    tracing::debug!(rows = reviews.len(), %column, "reviews loaded");
    Ok(reviews)
}

async fn summarize(args: ReviewArgs, config: &GeminiConfig, json_output: bool) -> anyhow::Result<()> {
    let reviews = load_reviews(&args)?;
    let provider = connect(config, args.local).await;
    let outcome = feedback::summarize_or_local(provider.as_ref(), &reviews).await;
    print_outcome(&outcome, json_output, |summary| println!("{summary}"))
}

async fn sentiment(args: ReviewArgs, config: &GeminiConfig, json_output: bool) -> anyhow::Result<()> {
    let reviews = load_reviews(&args)?;
    let provider = connect(config, args.local).await;
    let outcome = feedback::score_or_local(provider.as_ref(), &reviews).await;

    print_outcome(&outcome, json_output, |records| {
        for record in records {
            println!("{:>8}  {}", record.sentiment.as_str(), record.text);
        }
        let count = |s: Sentiment| records.iter().filter(|r| r.sentiment == s).count();
        println!(
            "\n{} positive, {} negative, {} neutral",
            count(Sentiment::Positive),
            count(Sentiment::Negative),
            count(Sentiment::Neutral)
        );
    })
}

fn numbered_path(path: &Path, index: usize) -> PathBuf {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("creative");
    let name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}-{index}.{ext}"),
        None => format!("{stem}-{index}"),
    };
    path.with_file_name(name)
}

fn compose_creatives(args: CreativeArgs, json_output: bool) -> anyhow::Result<()> {
    let background = match Background::from_name(&args.background) {
        Some(background) => background,
        None => Background::from_path(&args.background)?,
    };
    let mut brief = CreativeBrief::new(&args.headline, &args.subheadline, &args.cta)
        .with_format(args.format.into())
        .with_background(background)
        .with_brand(hex_to_rgb(&args.brand)?);
    let font = match &args.font {
        Some(path) => Some(CreativeFont::from_path(path)?),
        None => CreativeFont::system(),
    };
    match font {
        Some(font) => brief = brief.with_font(font),
        None => eprintln!("warning: no font found; creatives have no text (pass --font)"),
    }

    let product = std::fs::read(&args.product)?;
    let creatives = creative::compose_batch(&product, &brief, args.count)?;

    let mut written = Vec::with_capacity(creatives.len());
    for (i, creative) in creatives.iter().enumerate() {
        let path = if creatives.len() == 1 {
            args.output.clone()
        } else {
            numbered_path(&args.output, i + 1)
        };
        creative.save(&path)?;
        written.push(path);
    }

    if json_output {
        let result: Vec<_> = written
            .iter()
            .zip(&creatives)
            .map(|(path, creative)| {
                serde_json::json!({
                    "output": path.display().to_string(),
                    "layout": creative.layout,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for path in &written {
            println!("Composed creative: {}", path.display());
        }
    }

    Ok(())
}

async fn list_providers(config: &GeminiConfig, json_output: bool) -> anyhow::Result<()> {
    #[derive(serde::Serialize)]
    struct ProviderInfo {
        backend: &'static str,
        model: String,
        healthy: bool,
        error: Option<String>,
    }

    let info = match GeminiTextProvider::connect(config).await {
        Ok(provider) => {
            let health = provider.health_check().await;
            ProviderInfo {
                backend: provider.backend().label(),
                model: provider.model().to_string(),
                healthy: health.is_ok(),
                error: health.err().map(|e| e.to_string()),
            }
        }
        Err(e) => ProviderInfo {
            backend: "none",
            model: config.model.clone(),
            healthy: false,
            error: Some(e.to_string()),
        },
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        let status = if info.healthy { "✓" } else { "✗" };
        println!("{} Gemini ({}) model {}", status, info.backend, info.model);
        if let Some(error) = &info.error {
            println!("    {error}");
        }
        println!("    Env: GOOGLE_API_KEY, GCP_PROJECT, GCP_LOCATION, GEMINI_MODEL");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("iagen").chain(args.iter().copied()))
    }

    #[test]
    fn test_channel_is_a_closed_choice() {
        let cli = parse(&["describe", "--name", "Snack", "--channel", "social"]).unwrap();
        match cli.command {
            Commands::Describe(args) => assert_eq!(Channel::from(args.channel), Channel::Redes),
            _ => panic!("expected describe"),
        }
        let cli = parse(&["describe", "--name", "Snack"]).unwrap();
        match cli.command {
            Commands::Describe(args) => assert_eq!(args.channel, ChannelArg::Ecommerce),
            _ => panic!("expected describe"),
        }
        let err = parse(&["describe", "--name", "Snack", "--channel", "tv"]).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn test_creative_format_and_font() {
        let cli = parse(&[
            "creative", "--product", "p.png", "-o", "out.png", "--headline", "Hola",
            "--format", "ads", "--font", "brand.ttf",
        ])
        .unwrap();
        match cli.command {
            Commands::Creative(args) => {
                assert_eq!(CanvasFormat::from(args.format), CanvasFormat::Ads);
                assert_eq!(args.font, Some(PathBuf::from("brand.ttf")));
            }
            _ => panic!("expected creative"),
        }
        let err = parse(&[
            "creative", "--product", "p.png", "-o", "out.png", "--headline", "Hola",
            "--format", "story",
        ])
        .err()
        .unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn test_numbered_path() {
        assert_eq!(numbered_path(Path::new("out/promo.png"), 2), PathBuf::from("out/promo-2.png"));
        assert_eq!(numbered_path(Path::new("promo"), 1), PathBuf::from("promo-1"));
    }
}
