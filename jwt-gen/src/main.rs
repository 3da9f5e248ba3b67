use std::io::{self, Read};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand};
use jsonwebtoken::DecodingKey;
use jwt_util::services::jwt::{builder, inspect, verify};
use jwt_util::{ClaimSet, JsonWebTokenEngine, KeyFamily, PublicKey, TokenBuilder, VerificationKey};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build, inspect and verify compact JWTs.
///
/// - build:   claims (+ optional HMAC secret) -> token (unsigned `h.p.` without a secret)
/// - inspect: token -> header and claims, signature NOT checked
/// - verify:  token + secret or public key PEM -> verified claims
#[derive(Parser, Debug)]
#[command(name = "jwt-gen", version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a token from `name=value` claims
    Build {
        /// Claim as name=value (repeatable)
        #[arg(long = "claim", value_name = "NAME=VALUE", value_parser = parse_claim)]
        claims: Vec<(String, String)>,

        /// HMAC secret. Without it the token is unsigned.
        #[arg(long)]
        secret: Option<String>,

        /// Signing algorithm (HS256/HS384/HS512). Default: HS256.
        #[arg(long)]
        alg: Option<String>,

        /// Lifetime in seconds (sets exp)
        #[arg(long, conflicts_with = "expires_at")]
        ttl: Option<i64>,

        /// Absolute expiration, RFC 3339 (sets exp)
        #[arg(long)]
        expires_at: Option<DateTime<Utc>>,

        /// Fail on an unknown --alg instead of falling back to HS256
        #[arg(long, default_value_t = false)]
        strict: bool,
    },

    /// Print header and claims without checking the signature
    Inspect {
        /// Token, or `-` to read it from stdin
        token: String,
    },

    /// Verify the signature and print the claims
    Verify {
        /// Token, or `-` to read it from stdin
        token: String,

        /// Shared HMAC secret
        #[arg(long, conflicts_with = "public_key", required_unless_present = "public_key")]
        secret: Option<String>,

        /// Public key in PEM
        #[arg(long, value_name = "FILE")]
        public_key: Option<PathBuf>,

        /// Public key type: rsa | ec | ed
        #[arg(long, default_value = "rsa")]
        key_type: String,
    },
}

fn parse_claim(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{}`", raw))?;
    if name.is_empty() {
        return Err("claim name must not be empty".to_string());
    }
    Ok((name.to_string(), value.to_string()))
}

fn init_tracing() {
    // RUST_LOG=debug jwt-gen verify ...
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn read_token(arg: String) -> Result<String> {
    if arg != "-" {
        return Ok(arg);
    }
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read token from stdin")?;
    Ok(buf.trim().to_string())
}

fn load_public_key(path: &Path, key_type: &str) -> Result<VerificationKey> {
    let family =
        KeyFamily::parse(key_type).ok_or_else(|| anyhow!("unknown key type `{}`", key_type))?;
    let pem = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;

    let key = match family {
        KeyFamily::Rsa => DecodingKey::from_rsa_pem(&pem).map(PublicKey::rsa),
        KeyFamily::Ec => DecodingKey::from_ec_pem(&pem).map(PublicKey::ec),
        KeyFamily::Ed => DecodingKey::from_ed_pem(&pem).map(PublicKey::ed),
    }
    .with_context(|| format!("invalid {:?} public key PEM", family))?;

    Ok(key.into())
}

fn run_build(
    claims: Vec<(String, String)>,
    secret: Option<String>,
    alg: Option<String>,
    ttl: Option<i64>,
    expires_at: Option<DateTime<Utc>>,
    strict: bool,
) -> Result<String> {
    let claims: ClaimSet = claims.into_iter().collect();
    let expires_at = match ttl {
        Some(seconds) => {
            let ttl = Duration::try_seconds(seconds).ok_or_else(|| anyhow!("--ttl out of range"))?;
            Some(Utc::now() + ttl)
        }
        None => expires_at,
    };

    if strict {
        let mut token = TokenBuilder::new().claims(&claims);
        if let Some(exp) = expires_at {
            token = token.expires_at(exp);
        }
        if let Some(secret) = secret {
            token = token.secret(secret);
        }
        if let Some(alg) = alg.as_deref() {
            token = token.algorithm(alg)?;
        }
        return Ok(token.build(&JsonWebTokenEngine)?);
    }

    Ok(builder::build_token(
        &JsonWebTokenEngine,
        &claims,
        expires_at,
        alg.as_deref(),
        secret.as_deref(),
    )?)
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    match args.command {
        Command::Build {
            claims,
            secret,
            alg,
            ttl,
            expires_at,
            strict,
        } => {
            let token = run_build(claims, secret, alg, ttl, expires_at, strict)?;
            println!("{}", token);
        }
        Command::Inspect { token } => {
            let token = read_token(token)?;
            let parsed = inspect::inspect(&JsonWebTokenEngine, Some(&token))?;
            let out = serde_json::json!({
                "header": parsed.header,
                "claims": parsed.claims,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Command::Verify {
            token,
            secret,
            public_key,
            key_type,
        } => {
            let token = read_token(token)?;
            let key = match (secret, public_key) {
                (_, Some(path)) => load_public_key(&path, &key_type)?,
                (Some(secret), None) => VerificationKey::secret(secret),
                (None, None) => bail!("either --secret or --public-key is required"),
            };
            let claims = verify::verify_token(&JsonWebTokenEngine, Some(&token), &key)?;
            println!("{}", serde_json::to_string_pretty(&claims)?);
        }
    }

    Ok(())
}
