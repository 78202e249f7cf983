use clap::{Parser, Subcommand};
use serde::Serialize;
use spdlog::{Level, LevelFilter, prelude::*};
use std::{
    error::Error,
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::time::sleep;

use sumsub::{
    ApiClient, Applicant, ApplicantCompleteRequest, ApplicantDoc, ApplicantInfo,
    ApplicantRequiredIdDocs, ClientConfig, DocumentMetaData, IdDocSetType, IdDocSubType,
    IdDocType, ReviewAnswer, ReviewRejectType, TEST_API_URL,
};

/// Command line client for the Sumsub verification API
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(long, env = "SUMSUB_URL", default_value = TEST_API_URL)]
    api_url: String,

    #[arg(long, env = "SUMSUB_USER")]
    user: String,

    #[arg(long, env = "SUMSUB_PASS", hide_env_values = true)]
    pass: String,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an applicant and print it
    Create {
        /// Defaults to a random UUID
        #[arg(long)]
        external_user_id: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        lang: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        country: Option<String>,
        /// Required documents as SET:TYPE[,TYPE...], e.g. IDENTITY:PASSPORT,ID_CARD
        #[arg(long = "doc-set", value_parser = parse_doc_set)]
        doc_sets: Vec<ApplicantDoc>,
    },

    /// Print an applicant
    Get { id: String },

    /// Print the review status of an applicant
    Status { id: String },

    /// Upload a document for an applicant
    Upload {
        id: String,
        file: PathBuf,
        #[arg(long)]
        doc_type: String,
        #[arg(long)]
        country: String,
        #[arg(long)]
        sub_type: Option<String>,
    },

    /// Force a review outcome (sandbox only)
    Complete {
        id: String,
        #[arg(long, default_value = "GREEN")]
        answer: String,
        #[arg(long = "reject-label")]
        reject_labels: Vec<String>,
        #[arg(long)]
        reject_type: Option<String>,
    },

    /// Poll the review status until it completes
    Watch {
        id: String,
        /// Seconds between polls
        #[arg(long, default_value_t = 30)]
        refresh_timeout: u64,
    },
}

fn parse_doc_set(s: &str) -> Result<ApplicantDoc, String> {
    let (set, types) = s
        .split_once(':')
        .ok_or_else(|| format!("expected SET:TYPE[,TYPE...], got {s:?}"))?;

    let types: Vec<IdDocType> = types
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(IdDocType::from)
        .collect();

    if types.is_empty() {
        return Err(format!("no document types in {s:?}"));
    }

    Ok(ApplicantDoc::new(IdDocSetType::from(set.trim()), types))
}

/// Sleeps for `total`, waking early once `term` is raised. Returns whether it was.
async fn sleep_unless_stopped(term: &AtomicBool, total: Duration) -> bool {
    const SLICE: Duration = Duration::from_millis(250);

    let mut left = total;
    while !left.is_zero() {
        if term.load(Ordering::Relaxed) {
            return true;
        }
        let step = left.min(SLICE);
        sleep(step).await;
        left -= step;
    }
    term.load(Ordering::Relaxed)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let level = if args.verbose { Level::Debug } else { Level::Info };
    spdlog::default_logger().set_level_filter(LevelFilter::MoreSevereEqual(level));

    let mut config = ClientConfig::new(args.api_url, args.user, args.pass);
    if let Some(secs) = args.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    let client = ApiClient::connect(config).await?;

    match args.command {
        Command::Create {
            external_user_id,
            email,
            lang,
            first_name,
            last_name,
            country,
            doc_sets,
        } => {
            let external_user_id =
                external_user_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

            let mut applicant = Applicant {
                email,
                lang,
                info: Some(ApplicantInfo {
                    first_name,
                    last_name,
                    country,
                    ..Default::default()
                }),
                required_id_docs: (!doc_sets.is_empty()).then(|| ApplicantRequiredIdDocs {
                    doc_sets,
                    ..Default::default()
                }),
                ..Applicant::new(external_user_id)
            };

            client.create_applicant(&mut applicant).await?;
            print_json(&applicant)?;
        }

        Command::Get { id } => {
            let applicant = client.get_applicant(&id).await?;
            print_json(&applicant)?;
        }

        Command::Status { id } => {
            let status = client.get_applicant_status(&id).await?;
            print_json(&status)?;
        }

        Command::Upload {
            id,
            file,
            doc_type,
            country,
            sub_type,
        } => {
            let mut metadata = DocumentMetaData::new(IdDocType::from(doc_type), country);
            if let Some(sub_type) = sub_type {
                metadata = metadata.with_sub_type(IdDocSubType::from(sub_type));
            }

            let mut content = tokio::fs::File::open(&file).await?;
            let response: serde_json::Value = client
                .add_document_with_response(&id, &metadata, &mut content)
                .await?;
            print_json(&response)?;
        }

        Command::Complete {
            id,
            answer,
            reject_labels,
            reject_type,
        } => {
            let request = ApplicantCompleteRequest {
                review_answer: ReviewAnswer::from(answer),
                reject_labels,
                review_reject_type: reject_type.map(ReviewRejectType::from),
            };

            client.applicant_complete(&id, &request).await?;
            info!("Review of {} completed as {}", id, request.review_answer);
        }

        Command::Watch {
            id,
            refresh_timeout,
        } => {
            let term = Arc::new(AtomicBool::new(false));
            signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&term))?;
            signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&term))?;

            let mut last_status = None;
            while !term.load(Ordering::Relaxed) {
                if client.token_expired() {
                    client.refresh_token().await?;
                }

                let status = client.get_applicant_status(&id).await?;
                if status.is_completed() {
                    let (comment, pass) = status.is_pass();
                    info!("Applicant {} review finished, pass: {}", id, pass);
                    if !comment.is_empty() {
                        info!("Moderation comment: {}", comment);
                    }
                    print_json(&status)?;
                    return Ok(());
                }

                debug!(
                    "Applicant {} still {}",
                    id,
                    status
                        .review_status
                        .as_ref()
                        .map(|s| s.as_str())
                        .unwrap_or("unknown")
                );
                last_status = Some(status);

                if sleep_unless_stopped(&term, Duration::from_secs(refresh_timeout)).await {
                    break;
                }
            }

            info!("Stopped watching applicant {}", id);
            if let Some(status) = last_status {
                let (_, pass) = status.is_pass();
                info!("Last seen status of {}, pass so far: {}", id, pass);
                print_json(&status)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_doc_set() {
        let doc = parse_doc_set("IDENTITY:PASSPORT, ID_CARD").unwrap();

        assert_eq!(doc.id_doc_set_type, IdDocSetType::Identity);
        assert_eq!(doc.types, vec![IdDocType::Passport, IdDocType::IdCard]);
    }

    #[test]
    fn test_parse_doc_set_rejects_garbage() {
        assert!(parse_doc_set("SELFIE").is_err());
        assert!(parse_doc_set("SELFIE:").is_err());
    }

    #[tokio::test]
    async fn test_sleep_returns_at_once_when_stopped() {
        // Given
        let term = AtomicBool::new(true);

        // When
        let started = std::time::Instant::now();
        let stopped = sleep_unless_stopped(&term, Duration::from_secs(3600)).await;

        // Then
        assert!(stopped);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_sleep_runs_out_without_signal() {
        let term = AtomicBool::new(false);

        assert!(!sleep_unless_stopped(&term, Duration::from_millis(10)).await);
    }

    #[tokio::test]
    async fn test_sleep_wakes_when_flag_raised() {
        let term = Arc::new(AtomicBool::new(false));
        let raiser = Arc::clone(&term);
        tokio::spawn(async move {
            sleep(Duration::from_millis(50)).await;
            raiser.store(true, Ordering::Relaxed);
        });

        let started = std::time::Instant::now();
        let stopped = sleep_unless_stopped(&term, Duration::from_secs(3600)).await;

        assert!(stopped);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "sumsub",
            "--user",
            "u",
            "--pass",
            "p",
            "create",
            "--external-user-id",
            "testid",
            "--doc-set",
            "SELFIE:SELFIE",
        ])
        .unwrap();

        assert_eq!(args.api_url, TEST_API_URL);
        match args.command {
            Command::Create {
                external_user_id,
                doc_sets,
                ..
            } => {
                assert_eq!(external_user_id.as_deref(), Some("testid"));
                assert_eq!(doc_sets.len(), 1);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
