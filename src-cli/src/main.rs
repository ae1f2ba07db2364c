use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use lexai_client::api::http_api::HttpLegalApi;
use lexai_client::api::ActivityScope;
use lexai_client::config::ClientConfig;
use lexai_client::files::UploadFile;
use lexai_client::session::Session;
use lexai_core::cache::{encode_segment, CourtQuery};
use lexai_core::domain::{Document, DocumentStatus, SUPPORTED_LANGUAGES};
use lexai_core::error::AppError;
use lexai_core::filter::{
    criterion, empty_history_message, filter_activities, filter_documents, ActivityFilter,
    CalendarDay, DocumentFilter,
};
use lexai_core::format::{
    file_kind, format_action_label, format_file_size, format_relative, relevance_tier,
};
use lexai_core::normalize::timestamps::{parse_calendar_date, parse_timestamp};
use lexai_core::notice::Notice;
use lexai_core::status::status_badge;
use serde::Serialize;
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lexai", about = "Legal document research client")]
struct Args {
    /// API base URL. Overrides LEXAI_API_BASE_URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload PDF, DOC, DOCX or TXT files (50MB each at most)
    Upload {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// List documents
    Documents {
        /// Only the dashboard's recent documents
        #[arg(long)]
        recent: bool,
        /// Case-insensitive name search
        #[arg(long)]
        search: Option<String>,
        /// pending, processing, processed, failed or "all"
        #[arg(long)]
        status: Option<String>,
        /// Substring of the MIME type, e.g. "pdf"
        #[arg(long = "type")]
        type_contains: Option<String>,
    },
    /// Show a processed document with its analysis and jurisdiction
    Show { id: String },
    /// Run legal analysis on a processed or failed document
    Analyze { id: String },
    /// Courts with jurisdiction over a document
    Jurisdiction {
        id: String,
        /// Run a new lookup instead of reading the stored result
        #[arg(long)]
        refresh: bool,
    },
    /// Translate a document (code or name, e.g. "hi" or "Hindi")
    Translate { id: String, language: String },
    /// Print the document summary
    Summary { id: String },
    /// Save the original file
    Download {
        id: String,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Save the analysis report as PDF
    Export {
        id: String,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Delete a document
    Delete { id: String },
    /// Dashboard counters
    Stats,
    /// Search the court directory
    Courts {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        court_type: Option<String>,
        #[arg(long)]
        region: Option<String>,
    },
    /// Activity history
    History {
        #[arg(long)]
        recent: bool,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        action: Option<String>,
        /// Calendar day (YYYY-MM-DD) in local time
        #[arg(long)]
        date: Option<String>,
    },
    /// List supported translation languages
    Languages,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            if let Some(d) = &e.details {
                eprintln!("  {d}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let mut config = ClientConfig::from_env();
    if let Some(url) = args.base_url {
        config = config.with_base_url(url);
    }
    if let Command::Languages = args.command {
        for l in SUPPORTED_LANGUAGES {
            println!("{} {:<3} {}", l.flag, l.code, l.name);
        }
        return Ok(());
    }
    let session = lexai_client::connect(&config)?;
    let out = Output { json: args.json };

    match args.command {
        Command::Upload { paths } => upload(&session, &out, paths),
        Command::Documents {
            recent,
            search,
            status,
            type_contains,
        } => {
            let status = match criterion(status.as_deref()) {
                Some(s) => Some(DocumentStatus::parse(&s).ok_or_else(|| {
                    AppError::new("VALIDATION_INVALID_FILTER", "Unknown document status")
                        .with_details(format!("status={s}"))
                })?),
                None => None,
            };
            let filter = DocumentFilter {
                search: criterion(search.as_deref()),
                status,
                type_contains: criterion(type_contains.as_deref()),
            };
            let docs = if recent {
                session.recent_documents()?
            } else {
                session.documents()?
            };
            let shown = filter_documents(&docs, &filter);
            if out.json {
                return out.emit(&shown);
            }
            if shown.is_empty() {
                println!("No documents found.");
            }
            for d in shown {
                print_document_line(d);
            }
            Ok(())
        }
        Command::Show { id } => {
            let view = session.view(&id)?;
            if out.json {
                return out.emit(&serde_json::json!({
                    "document": view.document,
                    "analysis": view.analysis,
                    "jurisdiction": view.jurisdiction,
                }));
            }
            print_document_line(&view.document);
            match &view.analysis {
                Some(a) => {
                    println!("\nSummary: {}", a.summary);
                    for p in &a.key_points {
                        println!("  - {p}");
                    }
                    for s in &a.statutes {
                        println!("  [{}] {}", s.name, s.description);
                    }
                }
                None => println!("\nNo analysis yet."),
            }
            if let Some(j) = &view.jurisdiction {
                println!("\nJurisdiction: {}", j.primary);
                for c in &j.courts {
                    println!("  {:>3}% {} ({:?})", c.relevance, c.name, relevance_tier(c.relevance));
                }
            }
            Ok(())
        }
        Command::Analyze { id } => {
            let analysis = session.analyze(&id)?;
            out.notice(&Notice::info("Analysis started", "The document is being analyzed."));
            out.emit(&analysis)
        }
        Command::Jurisdiction { id, refresh } => {
            let found = if refresh {
                Some(session.find_jurisdiction(&id)?)
            } else {
                session.jurisdiction(&id)?
            };
            match found {
                Some(j) => out.emit(&j),
                None => {
                    println!("No jurisdiction found yet. Run with --refresh to look it up.");
                    Ok(())
                }
            }
        }
        Command::Translate { id, language } => {
            let result = session.translate(&id, &language)?;
            out.emit(&result)
        }
        Command::Summary { id } => {
            let summary = session.summary(&id)?;
            out.emit(&summary)
        }
        Command::Download { id, out: path } => {
            let doc = session.document(&id)?;
            let bytes = session.download(&id)?;
            save(path.unwrap_or_else(|| default_download_path(&doc)), &bytes)
        }
        Command::Export { id, out: path } => {
            let doc = session.document(&id)?;
            let bytes = session.export_report(&id)?;
            save(
                path.unwrap_or_else(|| PathBuf::from(format!("{}-report.pdf", encode_segment(&doc.id)))),
                &bytes,
            )
        }
        Command::Delete { id } => {
            session.delete(&id)?;
            out.notice(&Notice::info("Document deleted", format!("Document {id} was removed.")));
            Ok(())
        }
        Command::Stats => {
            let stats = session.stats()?;
            if out.json {
                return out.emit(&stats);
            }
            println!("Documents processed:  {}", stats.documents_processed);
            println!("Successful analyses:  {}", stats.successful_analyses);
            println!("Pending documents:    {}", stats.pending_documents);
            println!("Courts referenced:    {}", stats.courts_referenced);
            Ok(())
        }
        Command::Courts {
            search,
            court_type,
            region,
        } => {
            let query = CourtQuery {
                search_term: search,
                court_type: criterion(court_type.as_deref()),
                region: criterion(region.as_deref()),
            };
            let courts = session.courts(&query)?;
            if out.json {
                return out.emit(&courts);
            }
            for c in &courts {
                println!("{:<40} {:<12} {}", c.name, c.jurisdiction_type, c.location);
            }
            Ok(())
        }
        Command::History {
            recent,
            search,
            action,
            date,
        } => {
            let day = match criterion(date.as_deref()) {
                Some(raw) => Some(CalendarDay::local(parse_calendar_date(&raw).ok_or_else(
                    || {
                        AppError::new("VALIDATION_INVALID_FILTER", "Date must be YYYY-MM-DD")
                            .with_details(format!("date={raw}"))
                    },
                )?)),
                None => None,
            };
            let filter = ActivityFilter {
                search: criterion(search.as_deref()),
                action: criterion(action.as_deref()),
                date: day,
            };
            let scope = if recent {
                ActivityScope::Recent
            } else {
                ActivityScope::All
            };
            let entries = session.activities(scope)?;
            let shown = filter_activities(&entries, &filter);
            if out.json {
                return out.emit(&shown);
            }
            if shown.is_empty() {
                println!("{}", empty_history_message(&filter));
            }
            let now = OffsetDateTime::now_utc();
            for e in shown {
                let when = parse_timestamp(&e.timestamp)
                    .map(|t| format_relative(t, now))
                    .unwrap_or_else(|| e.timestamp.clone());
                println!("{:<16} {:<20} {}", when, format_action_label(&e.action), e.description);
            }
            Ok(())
        }
        Command::Languages => Ok(()),
    }
}

fn upload(session: &Session<HttpLegalApi>, out: &Output, paths: Vec<PathBuf>) -> Result<(), AppError> {
    let files = paths
        .iter()
        .map(|p| UploadFile::from_path(p))
        .collect::<Result<Vec<_>, _>>()?;
    let report = session.submit_files(files)?;
    for n in &report.notices {
        out.notice(n);
    }
    if out.json {
        out.emit(&serde_json::json!({
            "state": report.state,
            "created": report.created,
            "error": report.error,
        }))?;
    }
    // Refused or fully rejected batches exit non-zero.
    let created = report.into_result()?;
    if !out.json {
        for d in &created {
            print_document_line(d);
        }
    }
    Ok(())
}

/// Save under the bare file name the server reported, never a path it chose.
fn default_download_path(doc: &Document) -> PathBuf {
    match Path::new(&doc.name).file_name() {
        Some(name) if !name.is_empty() => PathBuf::from(name),
        _ => PathBuf::from(format!("document-{}", encode_segment(&doc.id))),
    }
}

fn print_document_line(d: &Document) {
    let badge = status_badge(d.status);
    let uploaded = parse_timestamp(&d.uploaded_at)
        .map(|t| format_relative(t, OffsetDateTime::now_utc()))
        .unwrap_or_else(|| d.uploaded_at.clone());
    println!(
        "{:<10} {:<40} {:<5} {:>10} {:<11} {}",
        d.id,
        d.name,
        file_kind(&d.mime_type).label(),
        format_file_size(d.size),
        badge.label,
        uploaded
    );
}

fn save(path: PathBuf, bytes: &[u8]) -> Result<(), AppError> {
    fs::write(&path, bytes).map_err(|e| {
        AppError::new("CLI_WRITE_FAILED", "Failed to write output file")
            .with_details(format!("path={}; err={}", path.display(), e))
    })?;
    eprintln!("saved {} ({})", path.display(), format_file_size(bytes.len() as u64));
    Ok(())
}

struct Output {
    json: bool,
}

impl Output {
    fn emit<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), AppError> {
        let text = serde_json::to_string_pretty(value).map_err(|e| {
            AppError::new("CLI_ENCODE_FAILED", "Failed to encode output").with_details(e.to_string())
        })?;
        println!("{text}");
        Ok(())
    }

    fn notice(&self, n: &Notice) {
        let mark = if n.is_error() { "!" } else { "*" };
        // Keep stdout parseable in JSON mode.
        if self.json {
            eprintln!("{mark} {}: {}", n.title, n.description);
        } else {
            println!("{mark} {}: {}", n.title, n.description);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexai_core::domain::DocumentStatus;

    fn named(id: &str, name: &str) -> Document {
        Document {
            id: id.to_string(),
            name: name.to_string(),
            size: 1,
            mime_type: "application/pdf".to_string(),
            uploaded_at: "2024-01-05T10:00:00Z".to_string(),
            status: DocumentStatus::Processed,
            content: None,
        }
    }

    #[test]
    fn download_name_stays_in_working_directory() {
        assert_eq!(default_download_path(&named("7", "lease.pdf")), PathBuf::from("lease.pdf"));
        assert_eq!(default_download_path(&named("7", "../../.bashrc")), PathBuf::from(".bashrc"));
        assert_eq!(default_download_path(&named("7", "/etc/cron.d/x")), PathBuf::from("x"));
        assert_eq!(default_download_path(&named("7", "..")), PathBuf::from("document-7"));
        assert_eq!(default_download_path(&named("7", "")), PathBuf::from("document-7"));
        assert_eq!(default_download_path(&named("../7", "/")), PathBuf::from("document-..%2F7"));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
