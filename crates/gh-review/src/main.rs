//! # gh-review
//!
//! Review a GitHub pull request from your editor.
//!
//! ```bash
//! gh-review -p acme/widgets 42
//! ```
//!
//! The pull request's commits are rendered into a text file together with
//! its discussion and existing line comments. Comments typed below a diff
//! line become line comments; text between the top-level markers becomes
//! the review body. After the editor exits you choose how to submit.

mod cli;
mod convert;
mod draft;
mod editor;
mod gather;
mod git;
mod logger;
mod session;
mod submit;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, RepoSlug};
use draft::DraftStore;
use editor::SystemEditor;
use gather::ReviewTarget;
use gh_client::{build_client, GitHubClient, TokenResolver, DEFAULT_HOST};
use gh_review_config::AppConfig;
use git::Git;
use session::{ReviewDocument, ReviewSession, SessionOutcome, StdPrompt};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load .env before anything reads GITHUB_TOKEN
    if let Ok(path) = dotenvy::dotenv() {
        eprintln!("Loaded environment from {}", path.display());
    }

    let log_file = logger::init(cli.verbose);
    log::info!("Starting gh-review");
    if let Some(path) = &log_file {
        log::debug!("Logging to {}", path.display());
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::debug!("Exiting with error: {:?}", err);
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load();

    let slug: RepoSlug = match cli.project {
        Some(slug) => slug,
        None => config
            .repository
            .as_deref()
            .context("No repository given; pass -p owner/repo or set `repository` in .gh-review.toml")?
            .parse()
            .map_err(anyhow::Error::msg)?,
    };
    let host = cli.host.or_else(|| config.host.clone());
    let number = cli.number;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
    let _guard = runtime.enter();

    let mut tokens = TokenResolver::new();
    if let Some(path) = cli.token {
        tokens = tokens.with_token_file(path);
    }
    let token = runtime.block_on(tokens.get_token(host.as_deref()))?;
    let client = build_client(host.as_deref(), token)?;
    let drafts = DraftStore::new(config.draft_dir());

    let (pr, contents) = if cli.resume {
        let contents = drafts.load(number)?;
        let pr = runtime.block_on(client.fetch_pull_request(&slug.owner, &slug.repo, number))?;
        println!("Resuming review of #{}: {}", pr.number, pr.title);
        (pr, contents)
    } else {
        let remote = format!(
            "https://{}/{}/{}",
            host.as_deref().unwrap_or(DEFAULT_HOST),
            slug.owner,
            slug.repo
        );
        let git = Git::new(config.git.as_str());
        let target = ReviewTarget {
            owner: &slug.owner,
            repo: &slug.repo,
            number,
            remote: &remote,
            base_branch: &config.base_branch,
        };
        let data = runtime.block_on(gather::gather(&client, &git, &target))?;
        let contents = data.render();
        (data.pr, contents)
    };

    let document = ReviewDocument::create(&contents)?;
    let editor = SystemEditor::resolve(config.editor.as_deref());
    log::debug!("Using editor {}", editor.command());
    let mut prompt = StdPrompt;
    let outcome = ReviewSession::new(&editor, &mut prompt, &drafts, number).run(&document)?;

    let request = match outcome {
        SessionOutcome::Submit(request) => request,
        SessionOutcome::Saved(path) => {
            println!("Review saved to {}; continue with --resume", path.display());
            return Ok(());
        }
        SessionOutcome::Abandoned => {
            println!("Review abandoned");
            return Ok(());
        }
    };

    let submission = submit::build_review(&request, &config.signature, &pr.head_sha);
    let posted = runtime.block_on(submit::post_review(
        &client,
        &slug.owner,
        &slug.repo,
        number,
        &submission,
    ));

    match posted {
        Ok(review_id) => {
            if cli.resume {
                drafts.remove(number)?;
            }
            println!("Submitted review {} on {}", review_id, pr.html_url);
            Ok(())
        }
        Err(err) => {
            // Keep the text so nothing typed is lost.
            let saved = document
                .read()
                .and_then(|text| drafts.save(number, &text));
            match saved {
                Ok(path) => Err(err.context(format!(
                    "Submitting failed; review saved to {}",
                    path.display()
                ))),
                Err(save_err) => {
                    log::error!("Could not save the review: {:#}", save_err);
                    Err(err)
                }
            }
        }
    }
}
