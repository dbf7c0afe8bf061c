//! Post management against a directory store

use std::path::Path;

use anyhow::{Context, Result};
use gridtone_session::{EditSession, FsPersistence, PersistenceService, StaticAuth};
use tracing::info;

use crate::{PostCommand, PostTarget, SurfaceArgs};

pub fn run(command: PostCommand, config: Option<&Path>, verbose: u8) -> Result<()> {
    match command {
        PostCommand::Create { target, image } => create(&target, &image, verbose),
        PostCommand::Show { target } => show(&target),
        PostCommand::Save {
            target,
            set,
            user,
            surface,
        } => save(&target, &set, user, &surface, config),
        PostCommand::Reset { target } => reset(&target, verbose),
    }
}

fn open_store(target: &PostTarget) -> Result<FsPersistence> {
    FsPersistence::open(&target.store)
        .with_context(|| format!("Failed to open store: {}", target.store.display()))
}

fn create(target: &PostTarget, image: &Path, verbose: u8) -> Result<()> {
    let bytes = std::fs::read(image).with_context(|| format!("Failed to load: {}", image.display()))?;
    // Reject undecodable uploads before they reach the store.
    gridtone_render::texture::decode(&bytes)
        .with_context(|| format!("Failed to decode: {}", image.display()))?;
    let record = open_store(target)?
        .create_post(&target.id, &bytes)
        .with_context(|| format!("Failed to create post {}", target.id))?;
    if verbose > 0 {
        println!("Created post {} ({})", record.id, record.image_url);
    }
    Ok(())
}

fn show(target: &PostTarget) -> Result<()> {
    let record = open_store(target)?
        .get_post(&target.id)
        .with_context(|| format!("Failed to load post {}", target.id))?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

fn save(
    target: &PostTarget,
    sets: &[String],
    user: Option<String>,
    surface: &SurfaceArgs,
    config: Option<&Path>,
) -> Result<()> {
    let config = super::load_config(config, surface)?;
    let mut session = EditSession::open(open_store(target)?, &target.id, config)
        .with_context(|| format!("Failed to open post {}", target.id))?;
    for (name, value) in super::parse_sets(sets)? {
        session
            .assign(name, value)
            .with_context(|| format!("Invalid --set {name}={value}"))?;
    }

    let auth = match user {
        Some(user) => StaticAuth::signed_in(user),
        None => StaticAuth::anonymous(),
    };
    let url = session.save(&auth).context("Save failed")?;
    super::report_lut_error(session.take_lut_error());
    info!(id = %target.id, url = %url, "saved");
    println!("{url}");
    Ok(())
}

fn reset(target: &PostTarget, verbose: u8) -> Result<()> {
    let record = open_store(target)?
        .reset_post(&target.id)
        .with_context(|| format!("Failed to reset post {}", target.id))?;
    if verbose > 0 {
        println!("Reset post {}", record.id);
    }
    Ok(())
}
