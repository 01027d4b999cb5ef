//! Command handlers over a [`Session`].

use crate::args::Commands;
use crate::error::AppError;
use crate::export::{self, ExportOptions};
use crate::script;
use inkboard_core::session::{Confirmation, NoticeLevel, Session};
use inkboard_core::shapes::Element;
use inkboard_core::store::{CanvasFile, CanvasStore, FileId};
use kurbo::Vec2;
use std::collections::BTreeMap;
use std::io::Write;

/// Print queued info notices; the first error notice becomes the result.
fn drain_notices<S, W>(session: &mut Session<S>, out: &mut W) -> Result<(), AppError>
where
    S: CanvasStore + ?Sized,
    W: Write,
{
    let mut failure = None;
    for notice in session.take_notices() {
        match notice.level {
            NoticeLevel::Info => writeln!(out, "{}", notice.message)?,
            NoticeLevel::Error => {
                failure.get_or_insert(notice.message);
            }
        }
    }
    match failure {
        Some(message) => Err(AppError::Failed(message)),
        None => Ok(()),
    }
}

async fn refresh<S, W>(session: &mut Session<S>, out: &mut W) -> Result<(), AppError>
where
    S: CanvasStore + ?Sized,
    W: Write,
{
    session.refresh().await;
    drain_notices(session, out)
}

/// Refresh the list and open `id` in the editor.
async fn open<S, W>(session: &mut Session<S>, id: FileId, out: &mut W) -> Result<(), AppError>
where
    S: CanvasStore + ?Sized,
    W: Write,
{
    refresh(session, out).await?;
    if session.file(id).is_none() {
        return Err(AppError::UnknownDocument(id));
    }
    session.open(id);
    drain_notices(session, out)
}

fn created(file: &CanvasFile) -> String {
    match file.created_date() {
        Some(date) => date.format("%Y-%m-%d %H:%M").to_string(),
        None => file.created_at.clone(),
    }
}

/// Element counts by type, e.g. `2 path, 1 rect`.
fn summarize(elements: &[Element]) -> String {
    if elements.is_empty() {
        return "empty".to_string();
    }
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for element in elements {
        *counts.entry(element.type_name()).or_default() += 1;
    }
    counts
        .iter()
        .map(|(name, count)| format!("{} {}", count, name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Run one command. `confirm` answers yes/no questions.
pub async fn run<S, W, C>(
    session: &mut Session<S>,
    command: Commands,
    out: &mut W,
    mut confirm: C,
) -> Result<(), AppError>
where
    S: CanvasStore + ?Sized,
    W: Write,
    C: FnMut(&str) -> bool,
{
    match command {
        Commands::List => {
            refresh(session, out).await?;
            if session.files().is_empty() {
                writeln!(out, "No documents yet.")?;
            }
            for file in session.files() {
                writeln!(
                    out,
                    "{:>6}  {:<32}  {:<16}  {}",
                    file.id,
                    file.name,
                    created(file),
                    summarize(&file.data)
                )?;
            }
        }
        Commands::Create { name } => match session.create(&name).await {
            Some(id) => writeln!(out, "Created {}: {}", id, name.trim())?,
            None => {
                drain_notices(session, out)?;
                return Err(inkboard_core::store::StoreError::InvalidName.into());
            }
        },
        Commands::Show { id } => {
            open(session, id, out).await?;
            let Some(file) = session.current_file() else {
                return Err(AppError::UnknownDocument(id));
            };
            writeln!(out, "Name:     {}", file.name)?;
            writeln!(out, "Id:       {}", file.id)?;
            writeln!(out, "Created:  {}", created(file))?;
            writeln!(out, "Elements: {}", summarize(&file.data))?;
            if let Some(bounds) = session.canvas().scene.bounds() {
                writeln!(
                    out,
                    "Extent:   ({:.0}, {:.0}) to ({:.0}, {:.0})",
                    bounds.x0, bounds.y0, bounds.x1, bounds.y1
                )?;
            }
        }
        Commands::Delete { id, yes } => {
            refresh(session, out).await?;
            let Some(file) = session.file(id) else {
                return Err(AppError::UnknownDocument(id));
            };
            let question = format!("Are you sure you want to delete \"{}\"?", file.name);
            let confirmation = if yes || confirm(&question) {
                Confirmation::Confirmed
            } else {
                Confirmation::Declined
            };
            if session.delete(id, confirmation).await {
                writeln!(out, "Deleted {}", id)?;
            } else if confirmation == Confirmation::Declined {
                writeln!(out, "Kept {}", id)?;
            }
            drain_notices(session, out)?;
        }
        Commands::Replay { id, script: path } => {
            let steps = script::load(&path)?;
            open(session, id, out).await?;
            let changed = script::replay(session.canvas_mut(), &steps);
            log::info!("Replayed {} step(s) into {}", steps.len(), id);
            session.save().await;
            drain_notices(session, out)?;
            writeln!(
                out,
                "{} step(s), {} changed the canvas; {} element(s) saved",
                steps.len(),
                changed,
                session.canvas().elements().len()
            )?;
        }
        Commands::Export {
            id,
            output,
            width,
            height,
            scale,
            offset_x,
            offset_y,
        } => {
            open(session, id, out).await?;
            let options = ExportOptions {
                width,
                height,
                scale,
                offset: Vec2::new(offset_x, offset_y),
            };
            let canvas = export::prepare_canvas(session.canvas().elements().to_vec(), &options);
            let png = export::export_png(&canvas, width, height)?;
            std::fs::write(&output, &png)?;
            log::info!("Exported {} to {}", id, output.display());
            writeln!(
                out,
                "Wrote {} ({}x{}, {} bytes)",
                output.display(),
                width,
                height,
                png.len()
            )?;
        }
    }
    Ok(())
}
