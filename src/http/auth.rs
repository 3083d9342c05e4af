use aws_credential_types::Credentials;
use aws_sigv4::http_request::{SignableBody, SignableRequest, SigningSettings, sign};
use aws_sigv4::sign::v4;
use aws_smithy_runtime_api::client::identity::Identity;
use base64::Engine as _;
use reqwest::{RequestBuilder, Url};

use crate::args::RoundtripArgs;
use crate::error::{AppError, AppResult, HttpError, ValidationError};

const CREDENTIALS_PROVIDER: &str = "metrics-roundtrip";

/// Credentials attached to every query-backend request.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthConfig {
    Basic {
        username: String,
        password: String,
    },
    SigV4 {
        access_key: String,
        secret_key: String,
        session_token: Option<String>,
        region: String,
        service: String,
    },
}

// Secrets stay out of debug logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthConfig::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .finish_non_exhaustive(),
            AuthConfig::SigV4 {
                region, service, ..
            } => f
                .debug_struct("SigV4")
                .field("region", region)
                .field("service", service)
                .finish_non_exhaustive(),
        }
    }
}

/// Resolves query-backend auth from the CLI/config flags.
///
/// SigV4 takes its key pair from `--basic-auth` when given, otherwise from
/// `--aws-access-key`/`--aws-secret-key` (and their environment variables).
///
/// # Errors
///
/// Returns an error when a flag is malformed or SigV4 has no credentials.
pub fn resolve_auth(args: &RoundtripArgs) -> AppResult<Option<AuthConfig>> {
    if let Some(sigv4) = args.aws_sigv4.as_ref() {
        let (region, service) = parse_aws_sigv4(sigv4)?;
        let (access_key, secret_key) = match (
            args.basic_auth.as_ref(),
            args.aws_access_key.as_ref(),
            args.aws_secret_key.as_ref(),
        ) {
            (Some(basic), _, _) => parse_auth_pair(basic)?,
            (None, Some(access), Some(secret)) => (access.clone(), secret.clone()),
            (None, _, _) => {
                return Err(AppError::validation(
                    ValidationError::AwsSigv4RequiresCredentials,
                ));
            }
        };
        return Ok(Some(AuthConfig::SigV4 {
            access_key,
            secret_key,
            session_token: args.aws_session.clone(),
            region,
            service,
        }));
    }
    if args.aws_session.is_some() {
        tracing::warn!("Ignoring AWS session token: --aws-sigv4 is not set.");
    }
    if let Some(basic) = args.basic_auth.as_ref() {
        let (username, password) = parse_auth_pair(basic)?;
        return Ok(Some(AuthConfig::Basic { username, password }));
    }
    Ok(None)
}

fn parse_auth_pair(value: &str) -> AppResult<(String, String)> {
    let (left, right) = value
        .split_once(':')
        .ok_or_else(|| AppError::validation(ValidationError::AuthPairInvalidFormat))?;
    if left.is_empty() {
        return Err(AppError::validation(ValidationError::AuthUsernameEmpty));
    }
    Ok((left.to_owned(), right.to_owned()))
}

fn parse_aws_sigv4(value: &str) -> AppResult<(String, String)> {
    let parts: Vec<&str> = value.split(':').collect();
    let [_, _, region, service] = parts.as_slice() else {
        return Err(AppError::validation(ValidationError::AwsSigv4InvalidFormat));
    };
    let (region, service) = (region.trim(), service.trim());
    if region.is_empty() || service.is_empty() {
        return Err(AppError::validation(
            ValidationError::AwsSigv4EmptyRegionOrService,
        ));
    }
    Ok((region.to_owned(), service.to_owned()))
}

/// Adds auth headers to a body-less GET for `url`.
pub(super) fn apply_auth_headers(
    builder: RequestBuilder,
    url: &Url,
    auth: &AuthConfig,
) -> Result<RequestBuilder, HttpError> {
    match auth {
        AuthConfig::Basic { username, password } => {
            let token = format!("{}:{}", username, password);
            let encoded = base64::engine::general_purpose::STANDARD.encode(token.as_bytes());
            Ok(builder.header("Authorization", format!("Basic {}", encoded)))
        }
        AuthConfig::SigV4 {
            access_key,
            secret_key,
            session_token,
            region,
            service,
        } => {
            let identity: Identity = Credentials::new(
                access_key,
                secret_key,
                session_token.clone(),
                None,
                CREDENTIALS_PROVIDER,
            )
            .into();
            let signing_params = v4::SigningParams::builder()
                .identity(&identity)
                .region(region)
                .name(service)
                .time(std::time::SystemTime::now())
                .settings(SigningSettings::default())
                .build()
                .map_err(|err| HttpError::SigV4Params {
                    source: Box::new(err),
                })?
                .into();

            let signable = SignableRequest::new(
                "GET",
                url.as_str(),
                std::iter::empty(),
                SignableBody::Bytes(&[]),
            )
            .map_err(|err| HttpError::SigV4Request {
                source: Box::new(err),
            })?;

            let (instructions, _signature) = sign(signable, &signing_params)
                .map_err(|err| HttpError::SigV4Sign {
                    source: Box::new(err),
                })?
                .into_parts();

            let mut signed = http::Request::builder()
                .method("GET")
                .uri(url.as_str())
                .body(())
                .map_err(|err| HttpError::SigV4BuildSign {
                    source: Box::new(err),
                })?;
            instructions.apply_to_request_http1x(&mut signed);

            Ok(signed
                .headers()
                .iter()
                .fold(builder, |builder, (name, value)| builder.header(name, value)))
        }
    }
}
