use std::{collections::BTreeMap, ffi::OsString, path::PathBuf};

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncReadExt;
use tracing::warn;

use formguard::{
    akismet::{AkismetClient, RequestContext},
    config::{self, AppConfig, ConfigError},
    infrastructure::logging,
    ClassifierOptions, FormConfig, RawParams, SpamClassifier, Submission, Verdict,
};

#[derive(Debug, Default, Deserialize)]
struct SubmissionInput {
    #[serde(default)]
    fields: RawParams,
    #[serde(default)]
    raw: Option<RawParams>,
    #[serde(default)]
    client_ip: Option<String>,
    #[serde(default)]
    user_agent: Option<String>,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    verdict: Verdict,
    errors: &'a [String],
    field_errors: BTreeMap<&'a str, &'a [String]>,
}

#[derive(Debug, PartialEq)]
enum Command {
    Classify(Option<PathBuf>),
    VerifyKey,
}

impl Command {
    fn from_args(arg: Option<OsString>) -> Self {
        match arg {
            Some(arg) if arg == "--verify-key" => Command::VerifyKey,
            other => Command::Classify(other.map(PathBuf::from)),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_config()?;
    logging::init_tracing(&config.logging)?;

    let form = config::load_form_config(&config.form_config_path)?
        .with_default_akismet_key(config.akismet.api_key.as_deref());

    match Command::from_args(std::env::args_os().nth(1)) {
        Command::VerifyKey => verify_key(&config, &form).await,
        Command::Classify(path) => classify(&config, &form, path).await,
    }
}

async fn classify(config: &AppConfig, form: &FormConfig, path: Option<PathBuf>) -> Result<()> {
    let input = read_submission(path).await?;

    let oracle = build_oracle(config, form, &input);
    let classifier = SpamClassifier::new(
        oracle,
        ClassifierOptions {
            debug: config.debug,
            oracle_timeout: config.akismet.timeout,
        },
    );

    let mut submission = match input.raw {
        Some(raw) => Submission::with_raw(input.fields, raw),
        None => Submission::from_post(input.fields),
    };
    let verdict = classifier.classify(&mut submission, form).await;

    let report = Report {
        verdict,
        errors: submission.errors(),
        field_errors: submission
            .fields()
            .iter()
            .filter(|field| !field.errors.is_empty())
            .map(|field| (field.name.as_str(), field.errors.as_slice()))
            .collect(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn verify_key(config: &AppConfig, form: &FormConfig) -> Result<()> {
    let api_key = form
        .akismet_key
        .clone()
        .filter(|key| !key.trim().is_empty())
        .ok_or(ConfigError::Missing("AKISMET_API_KEY"))?;
    let blog = config
        .akismet
        .blog_url
        .clone()
        .ok_or(ConfigError::Missing("AKISMET_BLOG_URL"))?;

    let client = AkismetClient::new(http_client(config)?, api_key, blog);
    let valid = client
        .verify_key()
        .await
        .context("key verification request failed")?;
    println!("{}", serde_json::json!({ "valid": valid }));
    Ok(())
}

async fn read_submission(path: Option<PathBuf>) -> Result<SubmissionInput> {
    let content = match &path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read submission {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .context("failed to read submission from stdin")?;
            buffer
        }
    };
    serde_json::from_str(&content).context("submission is not valid JSON")
}

fn http_client(config: &AppConfig) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(format!("formguard/{}", env!("CARGO_PKG_VERSION")))
        .timeout(config.akismet.timeout)
        .build()
}

// Without an oracle the reputation filter passes everything.
fn build_oracle(
    config: &AppConfig,
    form: &FormConfig,
    input: &SubmissionInput,
) -> Option<AkismetClient> {
    let reputation = form.reputation()?;
    let Some(blog) = config.akismet.blog_url.clone() else {
        warn!(
            target: "config",
            "AKISMET_BLOG_URL is not set; reputation check skipped"
        );
        return None;
    };

    let http = match http_client(config) {
        Ok(http) => http,
        Err(err) => {
            warn!(
                target: "config",
                error = %err,
                "failed to build HTTP client; reputation check skipped"
            );
            return None;
        }
    };

    let client = AkismetClient::new(http, reputation.api_key, blog).with_request_context(
        RequestContext {
            user_ip: input.client_ip.clone(),
            user_agent: input.user_agent.clone(),
        },
    );
    Some(client)
}
