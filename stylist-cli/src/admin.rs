//! `stylist admin ...`

use std::process::ExitCode;

use shared::models::{ColorQuery, FabricCreate, FabricQuery, GenerationQuery};
use stylist_client::{AdminClient, ClientConfig};

use crate::cli::{AdminCommand, ColorCommand, FabricCommand, GenerationCommand};
use crate::commands::print_json;

pub async fn run(
    config: &ClientConfig,
    command: AdminCommand,
    json: bool,
) -> anyhow::Result<ExitCode> {
    let admin = AdminClient::new(config)?;
    match command {
        AdminCommand::Fabrics { command } => fabrics(&admin, command, json).await,
        AdminCommand::Colors { command } => colors(&admin, command, json).await,
        AdminCommand::Generations { command } => generations(&admin, command, json).await,
    }
}

async fn fabrics(
    admin: &AdminClient,
    command: FabricCommand,
    json: bool,
) -> anyhow::Result<ExitCode> {
    match command {
        FabricCommand::List { q, status, page } => {
            let fabrics = admin
                .list_fabrics(FabricQuery {
                    q,
                    status_filter: status,
                    limit: page.limit,
                    offset: page.offset,
                })
                .await?;
            if json {
                print_json(&fabrics)?;
            } else {
                for fabric in &fabrics {
                    println!(
                        "{:>5}  {:<16} {:<24} {:<8} {} colors",
                        fabric.id,
                        fabric.family_id,
                        fabric.display_name,
                        fabric.status.as_str(),
                        fabric.colors.len()
                    );
                }
            }
        }
        FabricCommand::Create {
            family_id,
            name,
            status,
        } => {
            let fabric = admin
                .create_fabric(&FabricCreate {
                    family_id,
                    display_name: name,
                    status,
                    colors: Vec::new(),
                })
                .await?;
            if json {
                print_json(&fabric)?;
            } else {
                println!("Created fabric {} ({})", fabric.family_id, fabric.id);
            }
        }
        FabricCommand::Deactivate { id } => {
            let fabric = admin.deactivate_fabric(id).await?;
            if json {
                print_json(&fabric)?;
            } else {
                println!("Fabric {} is now {}", fabric.family_id, fabric.status);
            }
        }
        FabricCommand::Delete { id } => {
            admin.delete_fabric(id).await?;
            if !json {
                println!("Deleted fabric {id}");
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn colors(
    admin: &AdminClient,
    command: ColorCommand,
    json: bool,
) -> anyhow::Result<ExitCode> {
    match command {
        ColorCommand::List {
            q,
            family_id,
            status,
            page,
        } => {
            let colors = admin
                .list_colors(ColorQuery {
                    q,
                    family_id,
                    status_filter: status,
                    limit: page.limit,
                    offset: page.offset,
                })
                .await?;
            if json {
                print_json(&colors)?;
            } else {
                for color in &colors {
                    println!(
                        "{:>5}  {:<16} {:<24} {} {:<8} fabric={}",
                        color.id,
                        color.color_id,
                        color.name,
                        color.hex_value,
                        color.status.as_str(),
                        color.fabric_family_id
                    );
                }
            }
        }
        ColorCommand::Get { id } => {
            let color = admin.get_color(id).await?;
            print_json(&color)?;
        }
        ColorCommand::Status { id, status } => {
            let color = admin.set_color_status(id, status).await?;
            if json {
                print_json(&color)?;
            } else {
                println!("Color {} is now {}", color.color_id, color.status);
            }
        }
        ColorCommand::Move { id, to } => {
            let color = admin.move_color(id, to).await?;
            if json {
                print_json(&color)?;
            } else {
                println!("Moved color {} to fabric {}", color.color_id, color.fabric_family_id);
            }
        }
        ColorCommand::Delete { id } => {
            admin.delete_color(id).await?;
            if !json {
                println!("Deleted color {id}");
            }
        }
        ColorCommand::BulkStatus { status, ids } => {
            let outcome = admin.bulk_set_color_status(&ids, status).await;
            if json {
                print_json(&outcome)?;
            } else {
                println!("Updated {} of {} colors", outcome.updated.len(), ids.len());
                for (id, message) in &outcome.failed {
                    eprintln!("  {id}: {message}");
                }
            }
            if !outcome.is_complete_success() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn generations(
    admin: &AdminClient,
    command: GenerationCommand,
    json: bool,
) -> anyhow::Result<ExitCode> {
    match command {
        GenerationCommand::List {
            family_id,
            color_id,
            page,
        } => {
            let jobs = admin
                .list_generations(GenerationQuery {
                    family_id,
                    color_id,
                    status_filter: None,
                    limit: page.limit,
                    offset: page.offset,
                })
                .await?;
            print_jobs(&jobs, json)?;
        }
        GenerationCommand::ByFabric {
            family_id,
            color_id,
            limit,
        } => {
            let jobs = admin
                .generations_by_fabric(&family_id, &color_id, limit)
                .await?;
            print_jobs(&jobs, json)?;
        }
        GenerationCommand::Stats => {
            let stats = admin.generation_stats().await?;
            if json {
                print_json(&stats)?;
            } else {
                println!("Total generations: {}", stats.total_generations);
                let mut by_status: Vec<_> = stats.by_status.iter().collect();
                by_status.sort();
                for (status, count) in by_status {
                    println!("  {status:<12} {count}");
                }
                for family in &stats.by_family {
                    println!("  {:<16} {}", family.family_id, family.count);
                }
            }
        }
        GenerationCommand::Get { job_id } => {
            let job = admin.get_generation(&job_id).await?;
            print_json(&job)?;
        }
        GenerationCommand::Delete { job_id } => {
            admin.delete_generation(&job_id).await?;
            if !json {
                println!("Deleted generation {job_id}");
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn print_jobs(jobs: &[shared::models::GenerationJobRead], json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&jobs);
    }
    for job in jobs {
        println!(
            "{}  {:<10} {}/{}  {}",
            job.created_at.format("%Y-%m-%d %H:%M"),
            job.status.as_str(),
            job.family_id,
            job.color_id,
            job.job_id
        );
    }
    Ok(())
}
