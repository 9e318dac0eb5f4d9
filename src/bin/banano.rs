//! CLI for Banano - AI photo styling.

use banano::brand::{all_brands, find_brand, Branding};
use banano::image::capture::center_crop_to_square;
use banano::{
    list_presets, CredentialService, EditingMode, EnvCredentials, GeminiEditor, ImageData,
    SessionController, StudioConfig, SubmitOutcome,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "banano")]
#[command(about = "Restyle photos with Gemini using curated fashion presets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Studio branding (defaults to BANANO_BRAND, then nano-banano)
    #[arg(long, global = true)]
    brand: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Restyle an image with a preset or custom instruction
    Edit(EditArgs),

    /// Center-crop an image to a square (no network)
    Crop(CropArgs),

    /// List the style presets
    Presets,

    /// Report whether a professional-tier credential is configured
    Credential,
}

#[derive(Args)]
struct EditArgs {
    /// Input image file
    input: PathBuf,

    /// Output file path
    #[arg(short, long)]
    output: PathBuf,

    /// Preset id (see `banano presets`)
    #[arg(short, long)]
    preset: Option<String>,

    /// Custom instruction; overrides the preset when not blank
    #[arg(long)]
    prompt: Option<String>,

    /// Model tier
    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,

    /// Center-crop to a square before editing
    #[arg(long)]
    crop_square: bool,

    /// Publish the result to the session gallery and print it
    #[arg(long)]
    share: bool,

    /// Author name used with --share
    #[arg(long)]
    author: Option<String>,
}

#[derive(Args)]
struct CropArgs {
    /// Input image file
    input: PathBuf,

    /// Output file path
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Standard,
    Professional,
}

impl From<ModeArg> for EditingMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Standard => EditingMode::Standard,
            ModeArg::Professional => EditingMode::Professional,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.brand.as_deref())?;

    match cli.command {
        Commands::Edit(args) => edit(args, config, cli.json).await?,
        Commands::Crop(args) => crop(args, cli.json)?,
        Commands::Presets => list(config.brand, cli.json)?,
        Commands::Credential => credential(config.brand, cli.json).await?,
    }

    Ok(())
}

fn load_config(brand: Option<&str>) -> anyhow::Result<StudioConfig> {
    let mut builder = StudioConfig::builder();
    if let Some(slug) = brand {
        let brand = find_brand(slug).ok_or_else(|| {
            let known: Vec<&str> = all_brands().iter().map(|b| b.slug).collect();
            anyhow::anyhow!("unknown brand '{slug}' (expected one of: {})", known.join(", "))
        })?;
        builder = builder.brand(brand);
    }
    Ok(builder.with_env()?.build()?)
}

async fn edit(args: EditArgs, config: StudioConfig, json_output: bool) -> anyhow::Result<()> {
    if args.author.is_some() && !args.share {
        anyhow::bail!("--author requires --share");
    }

    let editor = GeminiEditor::builder().build()?;
    let mut session =
        SessionController::new(config, Arc::new(editor), Arc::new(EnvCredentials));

    if let Some(mode) = args.mode {
        session.set_mode(mode.into());
    }
    if let Some(ref id) = args.preset {
        if !session.select_preset(id) {
            anyhow::bail!("unknown preset '{id}' (see `banano presets`)");
        }
    }
    if let Some(prompt) = args.prompt {
        session.set_custom_prompt(prompt);
    }

    let input = std::fs::read(&args.input)?;
    session.upload_file(Some(input.as_slice()))?;
    if args.crop_square {
        session.crop_to_square()?;
    }

    let brand = config.brand;
    match session.submit().await {
        SubmitOutcome::Edited => {}
        SubmitOutcome::CredentialRequired => {
            anyhow::bail!("{}: {}", brand.copy.credential_title, brand.copy.credential_hint);
        }
        SubmitOutcome::Failed => {
            let msg = session
                .image_state()
                .error
                .clone()
                .unwrap_or_else(|| brand.copy.processing_error.to_string());
            anyhow::bail!(msg);
        }
        SubmitOutcome::NotReady | SubmitOutcome::Stale => {
            anyhow::bail!("no image to edit");
        }
    }

    let Some((_, edited)) = session.download_edited() else {
        anyhow::bail!("no edited image produced");
    };
    edited.save(&args.output)?;
    let size = edited.size();

    if args.share {
        session.share_to_gallery();
        if let Some(author) = args.author {
            session.set_author_name(author);
        }
        session.confirm_share();
    }

    if json_output {
        let mut result = serde_json::json!({
            "success": true,
            "output": args.output.display().to_string(),
            "size_bytes": size,
            "mode": session.mode(),
            "preset": session.selected_preset().id,
            "brand": brand.slug,
        });
        if args.share {
            result["gallery"] = serde_json::to_value(session.gallery())?;
        }
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "Edited image: {} ({} bytes) via {} mode",
            args.output.display(),
            size,
            session.mode()
        );
        if args.share {
            println!("\nGallery:");
            for item in session.gallery().items() {
                println!(
                    "  [{}] {} - {} ({} votes)",
                    item.id, item.author_name, item.created_date, item.vote_count
                );
            }
        }
    }

    Ok(())
}

fn crop(args: CropArgs, json_output: bool) -> anyhow::Result<()> {
    let input = ImageData::from_bytes(std::fs::read(&args.input)?)?;
    let cropped = center_crop_to_square(&input)?;
    cropped.save(&args.output)?;
    let (side, _) = cropped.dimensions()?;

    if json_output {
        let result = serde_json::json!({
            "success": true,
            "output": args.output.display().to_string(),
            "side": side,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Cropped to {side}x{side}: {}", args.output.display());
    }
    Ok(())
}

fn list(brand: &Branding, json_output: bool) -> anyhow::Result<()> {
    let presets = list_presets();
    if json_output {
        println!("{}", serde_json::to_string_pretty(presets)?);
        return Ok(());
    }

    println!("{} {} presets:\n", brand.logo_glyph, brand.latin_name);
    for preset in presets {
        println!("  {} {} ({})", preset.icon, preset.name, preset.id);
        println!("    {}", preset.localized_name);
    }
    Ok(())
}

async fn credential(brand: &Branding, json_output: bool) -> anyhow::Result<()> {
    let present = EnvCredentials.has_credential().await;
    if json_output {
        let result = serde_json::json!({ "configured": present });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if present {
        println!("✓ credential configured (professional mode available)");
    } else {
        println!("✗ {}", brand.copy.credential_hint);
        println!("  API key: GOOGLE_API_KEY or API_KEY");
    }
    Ok(())
}
