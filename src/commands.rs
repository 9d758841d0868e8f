use crate::cli::{BulkArgs, FinishedArgs, SingleArgs};
use crate::error::NotionError;
use crate::filter::exclude_ignored;
use crate::manga::{Lookup, MangaRecord, PagePatch, UpdateOutcome};
use crate::notion::NotionSession;
use crate::table::render_table;
use anyhow::Result;
use inquire::Select;
use reqwest::StatusCode;

pub fn all_shonen_jump(session: &NotionSession, args: BulkArgs) -> Result<()> {
    let records = match session.query_category() {
        Ok(records) => records,
        Err(err) => {
            report_query_error(&err);
            return Ok(());
        }
    };

    let records = exclude_ignored(records, &args.ignore);
    if records.is_empty() {
        println!("No mangas to update.");
        return Ok(());
    }

    if args.dry_run {
        records.iter().map(PagePatch::next_chapter).for_each(preview);
        return Ok(());
    }

    increment_chapters(session, &records).iter().for_each(report);
    Ok(())
}

pub fn update_single(session: &NotionSession, args: SingleArgs) -> Result<()> {
    let Some(record) = resolve(session, &args.manga_name, args.pick)? else {
        return Ok(());
    };

    if args.dry_run {
        preview(PagePatch::next_chapter(&record));
    } else {
        increment_chapters(session, std::slice::from_ref(&record))
            .iter()
            .for_each(report);
    }
    Ok(())
}

pub fn finished(session: &NotionSession, args: FinishedArgs) -> Result<()> {
    for name in &args.manga_names {
        let Some(record) = resolve(session, name, args.pick)? else {
            continue;
        };

        if args.dry_run {
            preview(PagePatch::finish(&record));
        } else {
            report(&mark_finished(session, &record));
        }
    }
    Ok(())
}

pub fn list(session: &NotionSession) -> Result<()> {
    let records = match session.query_unfinished() {
        Ok(records) => records,
        Err(err) => {
            report_query_error(&err);
            return Ok(());
        }
    };

    if records.is_empty() {
        println!("No unfinished mangas.");
        return Ok(());
    }

    let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
    print!("{}", render_table(&titles));
    Ok(())
}

/// Sends each patch on its own; a failure is reported and the rest still go out.
pub fn increment_chapters(session: &NotionSession, records: &[MangaRecord]) -> Vec<UpdateOutcome> {
    records
        .iter()
        .map(|record| apply(session, PagePatch::next_chapter(record)))
        .collect()
}

pub fn mark_finished(session: &NotionSession, record: &MangaRecord) -> UpdateOutcome {
    apply(session, PagePatch::finish(record))
}

fn apply(session: &NotionSession, patch: PagePatch) -> UpdateOutcome {
    match session.update_page(&patch) {
        Ok(()) => UpdateOutcome::Updated(patch),
        Err(error) => UpdateOutcome::Failed { patch, error },
    }
}

fn preview(patch: PagePatch) {
    println!("Would update {patch}");
}

/// One line per record: the success line on stdout, the failure and any hint on stderr.
fn report(outcome: &UpdateOutcome) {
    match outcome {
        UpdateOutcome::Updated(_) => println!("{outcome}"),
        UpdateOutcome::Failed { error, .. } => {
            eprintln!("{outcome}");
            if let Some(hint) = hint(error) {
                eprintln!("  {hint}");
            }
        }
    }
}

fn resolve(session: &NotionSession, name: &str, pick: bool) -> Result<Option<MangaRecord>> {
    let matches = match session.find_by_title(name) {
        Ok(matches) => matches,
        Err(err) => {
            report_query_error(&err);
            return Ok(None);
        }
    };

    match Lookup::resolve(name, matches) {
        Lookup::Found(record) => Ok(Some(record)),
        Lookup::NotFound(name) => {
            eprintln!("No manga named {name:?} was found.");
            Ok(None)
        }
        Lookup::Ambiguous(records) if pick => {
            let message = format!("Several pages are named {name:?}, pick one:");
            let choice = Select::new(&message, records)
                .with_help_message("↑↓ to move, enter to select, [Esc] to skip")
                .prompt_skippable();
            match choice {
                Ok(choice) => Ok(choice),
                // Names after this one still get processed.
                Err(err) => {
                    eprintln!("Could not pick a page named {name:?}: {err}");
                    Ok(None)
                }
            }
        }
        Lookup::Ambiguous(records) => {
            let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
            eprintln!(
                "{} pages are named {name:?} ({}), skipping. Pass --pick to choose one.",
                records.len(),
                ids.join(", ")
            );
            Ok(None)
        }
    }
}

fn report_query_error(err: &NotionError) {
    eprintln!("Could not query the database: {err}");
    if let Some(hint) = hint(err) {
        eprintln!("  {hint}");
    }
}

fn hint(err: &NotionError) -> Option<&'static str> {
    match err.status()? {
        StatusCode::UNAUTHORIZED => Some("check that INTEGRATION_TOKEN is set and valid"),
        StatusCode::NOT_FOUND => {
            Some("check DATABASE_ID and that the database is shared with the integration")
        }
        StatusCode::TOO_MANY_REQUESTS => Some("rate limited by notion, try again later"),
        _ => None,
    }
}
