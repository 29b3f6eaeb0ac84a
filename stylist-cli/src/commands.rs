//! Session-driven commands: catalog, search, generate

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, bail};
use serde::Serialize;
use stylist_client::{ClientConfig, StylistApi, StylistClient, SwatchFile};
use stylist_session::{GenerateOutcome, LoadOutcome, SearchOutcome, StylistSession};

use crate::cli::GenerateArgs;

/// Print `value` as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn open_session(
    config: &ClientConfig,
    args: Option<&GenerateArgs>,
) -> anyhow::Result<StylistSession> {
    let api: Arc<dyn StylistApi> = Arc::new(StylistClient::new(config)?);
    let poll = args.map(GenerateArgs::poll_config).unwrap_or_default();
    Ok(StylistSession::new(api, poll))
}

/// Load the catalog or fail with the user-facing message
async fn load(session: &StylistSession) -> anyhow::Result<()> {
    match session.load_catalog().await {
        LoadOutcome::Loaded { families } => {
            tracing::debug!(families, "Catalog ready");
            Ok(())
        }
        LoadOutcome::Failed { message } => bail!(message),
        LoadOutcome::Skipped => Ok(()),
    }
}

pub async fn catalog(config: &ClientConfig, json: bool) -> anyhow::Result<ExitCode> {
    let session = open_session(config, None)?;
    load(&session).await?;

    let catalog = session.catalog();
    let selection = session.selection();

    if json {
        #[derive(Serialize)]
        struct CatalogOutput<'a> {
            catalog: &'a shared::models::Catalog,
            selection: &'a shared::models::Selection,
        }
        print_json(&CatalogOutput {
            catalog: &catalog,
            selection: &selection,
        })?;
        return Ok(ExitCode::SUCCESS);
    }

    if catalog.is_empty() {
        println!("Catalog is empty.");
        return Ok(ExitCode::SUCCESS);
    }

    for family in &catalog.families {
        println!(
            "{} ({}) [{}]",
            family.display_name, family.family_id, family.status
        );
        for color in &family.colors {
            let marker = if selection.family_id == family.family_id
                && selection.color_id == color.color_id
            {
                "*"
            } else {
                " "
            };
            println!("  {marker} {:<16} {:<24} {}", color.color_id, color.name, color.hex);
        }
    }
    Ok(ExitCode::SUCCESS)
}

pub async fn search(config: &ClientConfig, id: &str, json: bool) -> anyhow::Result<ExitCode> {
    let session = open_session(config, None)?;
    load(&session).await?;

    let outcome = session.search_and_apply(id);
    if json {
        print_json(&outcome)?;
    } else {
        match &outcome {
            SearchOutcome::Ignored => println!("Nothing to search for."),
            SearchOutcome::AlreadySelected => println!("{id} is already selected."),
            SearchOutcome::Found { selection } => {
                println!("Selected {} / {}", selection.family_id, selection.color_id)
            }
            SearchOutcome::NotFound => println!("ID not found."),
        }
    }

    Ok(match outcome {
        SearchOutcome::NotFound => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}

pub async fn generate(
    config: &ClientConfig,
    args: GenerateArgs,
    json: bool,
) -> anyhow::Result<ExitCode> {
    let session = open_session(config, Some(&args))?;
    load(&session).await?;

    if let Some(family) = args.family.as_deref() {
        session.select_family(family);
    }
    if let Some(color) = args.color.as_deref()
        && !session.select_color(color)
    {
        bail!(
            "color '{color}' is not part of family '{}'",
            session.selection().family_id
        );
    }

    if let Some(path) = args.swatch.as_deref() {
        let file = SwatchFile::from_path(path)
            .await
            .with_context(|| format!("reading swatch {}", path.display()))?;
        file.validate()?;
        session.choose_swatch_file(file);
        session.wait_for_swatch_upload().await;
        if let Some(error) = session.swatch().and_then(|s| s.error) {
            eprintln!("warning: {error}");
        }
    }

    let outcome = tokio::select! {
        outcome = session.generate() => outcome,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, abandoning generation");
            session.shutdown();
            GenerateOutcome::Cancelled
        }
    };

    if json {
        print_json(&session.view())?;
    }

    match outcome {
        GenerateOutcome::Completed(images) => {
            if !json {
                for image in &images {
                    println!(
                        "{:<8} {}x{}  {}",
                        image.cut.as_str(),
                        image.width,
                        image.height,
                        image.url
                    );
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        GenerateOutcome::Skipped => {
            bail!("nothing selected: the catalog has no color to render")
        }
        GenerateOutcome::AlreadyRunning => bail!("a generation is already running"),
        GenerateOutcome::Failed(message) | GenerateOutcome::TimedOut(message) => {
            if !json {
                eprintln!("{message}");
            }
            Ok(ExitCode::FAILURE)
        }
        GenerateOutcome::Cancelled => Ok(ExitCode::from(130)),
    }
}
