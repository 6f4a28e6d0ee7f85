//! Upload policy for the Nimbus CLI client.
//!
//! Write operations do not go through the plain read dispatch path. The
//! policy here first resolves the destination to an effective target file
//! path, then chooses between a single-shot write and a server-issued
//! resumable session. The session path is mandatory for large payloads and
//! whenever the conflict mode is `fail`, because only the session flow can
//! reject an existing file without a race. A conflict response is reported,
//! never retried automatically; retrying is the caller's decision.

use serde_json::{json, Value};
use std::path::Path;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString};
use tracing::{debug, trace};

use crate::client::HttpClient;
use crate::dispatch::{self, RequestSpec};
use crate::model::{Item, UploadSession};
use crate::nimbus_v1::ApiError;
use crate::resolve::{join_item_path, split_item_path, ItemRef};

/// Payloads up to this size may use the single-shot write.
pub const SIMPLE_UPLOAD_THRESHOLD: u64 = 4 * 1024 * 1024;

/// Chunk size for session uploads; a multiple of the 320 KiB granule the
/// session endpoint requires.
pub const UPLOAD_CHUNK_SIZE: u64 = 3200 * 1024;

/// Query parameter carrying the conflict mode on single-shot writes.
const CONFLICT_BEHAVIOR_PARAMETER: &str = "@nimbus.conflictBehavior";

/// How an upload behaves when the target name already exists.
///
/// With `Rename` the server chooses the final name; the name in its
/// response is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, Default)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ConflictBehavior {
    #[default]
    Replace,
    Fail,
    Rename,
}

impl ConflictBehavior {
    pub fn names() -> Vec<&'static str> {
        vec!["replace", "fail", "rename"]
    }

    pub fn from_parameter(parameter: Option<&String>) -> Result<Self, ApiError> {
        match parameter {
            Some(value) => ConflictBehavior::from_str(value).map_err(|_| {
                ApiError::InvalidReference(format!("unknown conflict mode: {}", value))
            }),
            None => Ok(ConflictBehavior::default()),
        }
    }
}

/// The two write flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UploadMode {
    SingleShot,
    Session,
}

/// Select the write flow for a payload.
///
/// The `fail` mode needs the atomic existence check of the session flow
/// regardless of size.
pub(crate) fn select_mode(payload_size: u64, conflict: ConflictBehavior) -> UploadMode {
    if payload_size < SIMPLE_UPLOAD_THRESHOLD && conflict != ConflictBehavior::Fail {
        UploadMode::SingleShot
    } else {
        UploadMode::Session
    }
}

/// Inclusive byte ranges covering a payload of the given size.
pub(crate) fn chunk_ranges(total: u64, chunk_size: u64) -> Vec<(u64, u64)> {
    let mut ranges = Vec::new();
    let mut start = 0u64;
    while start < total {
        let end = (start + chunk_size).min(total) - 1;
        ranges.push((start, end));
        start = end + 1;
    }
    ranges
}

/// Resolve the effective target file path for an upload destination.
///
/// - destination resolves to an existing folder: target is the folder plus
///   the source file name;
/// - destination resolves to an existing file: target is that file's path,
///   the name is forced to match;
/// - destination is absent but its parent resolves to a folder: target is
///   the destination path itself;
/// - anything else is an invalid destination.
pub(crate) async fn resolve_destination(
    http: &HttpClient,
    access_token: Option<&str>,
    container_path: &str,
    destination: &ItemRef,
    file_name: &str,
) -> Result<String, ApiError> {
    let destination_path = destination.resolve()?;
    let uri = format!("{}/{}", container_path, destination_path);

    match dispatch::dispatch_single(http, access_token, RequestSpec::get(uri)).await {
        Ok(existing) => {
            if existing.get("folder").is_some() {
                debug!(
                    "Destination {:?} is an existing folder; appending file name",
                    destination_path
                );
                Ok(join_item_path(&destination_path, file_name))
            } else {
                debug!(
                    "Destination {:?} is an existing file; name is forced to match",
                    destination_path
                );
                Ok(destination_path)
            }
        }
        Err(ApiError::NotFound(_)) => {
            let (parent_path, _leaf) = split_item_path(&destination_path).ok_or_else(|| {
                ApiError::InvalidDestination(format!(
                    "{} does not exist and has no resolvable parent",
                    destination_path
                ))
            })?;

            let parent_uri = format!("{}/{}", container_path, parent_path);
            match dispatch::dispatch_single(http, access_token, RequestSpec::get(parent_uri)).await
            {
                Ok(parent) if parent.get("folder").is_some() => {
                    debug!(
                        "Destination {:?} does not exist; parent folder does",
                        destination_path
                    );
                    Ok(destination_path)
                }
                Ok(_) => Err(ApiError::InvalidDestination(format!(
                    "parent of {} is not a folder",
                    destination_path
                ))),
                Err(ApiError::NotFound(_)) => Err(ApiError::InvalidDestination(format!(
                    "neither {} nor its parent exists",
                    destination_path
                ))),
                Err(e) => Err(e),
            }
        }
        Err(e) => Err(e),
    }
}

/// Upload a local file to the resolved target path inside a container.
///
/// Returns the raw item property bag of the created or updated file with
/// transport annotations stripped; typing and adaptation happen in the
/// caller.
pub(crate) async fn upload_payload(
    http: &HttpClient,
    access_token: Option<&str>,
    container_path: &str,
    target_path: &str,
    local_path: &Path,
    conflict: ConflictBehavior,
) -> Result<Value, ApiError> {
    let payload = tokio::fs::read(local_path).await?;
    let payload_size = payload.len() as u64;

    match select_mode(payload_size, conflict) {
        UploadMode::SingleShot => {
            trace!(
                "Uploading {} byte(s) to {:?} in a single request",
                payload_size,
                target_path
            );
            single_shot_upload(http, access_token, container_path, target_path, payload, conflict)
                .await
        }
        UploadMode::Session => {
            trace!(
                "Uploading {} byte(s) to {:?} through an upload session",
                payload_size,
                target_path
            );
            session_upload(http, access_token, container_path, target_path, payload, conflict)
                .await
        }
    }
}

async fn single_shot_upload(
    http: &HttpClient,
    access_token: Option<&str>,
    container_path: &str,
    target_path: &str,
    payload: Vec<u8>,
    conflict: ConflictBehavior,
) -> Result<Value, ApiError> {
    let uri = format!(
        "{}/{}/content?{}={}",
        container_path, target_path, CONFLICT_BEHAVIOR_PARAMETER, conflict
    );

    let response = http
        .invoke_bytes(reqwest::Method::PUT, &uri, payload, access_token)
        .await?;

    if !response.is_success() {
        return Err(dispatch::status_error(&response, &uri));
    }

    let mut body = response.body;
    dispatch::strip_annotations(&mut body);
    Ok(body)
}

async fn session_upload(
    http: &HttpClient,
    access_token: Option<&str>,
    container_path: &str,
    target_path: &str,
    payload: Vec<u8>,
    conflict: ConflictBehavior,
) -> Result<Value, ApiError> {
    let total = payload.len() as u64;
    if total == 0 {
        // A session needs at least one range-addressed chunk.
        return Err(ApiError::InvalidDestination(
            "an empty payload cannot go through an upload session".to_string(),
        ));
    }

    let session = create_session(http, access_token, container_path, target_path, conflict).await?;

    let mut final_body = Value::Null;
    for (start, end) in chunk_ranges(total, UPLOAD_CHUNK_SIZE) {
        let content_range = format!("bytes {}-{}/{}", start, end, total);
        let chunk = payload[start as usize..=end as usize].to_vec();

        let response = http.put_chunk(&session.upload_url, chunk, &content_range).await?;
        if !response.is_success() {
            return Err(dispatch::status_error(&response, &session.upload_url));
        }
        final_body = response.body;
    }

    // The last chunk's response carries the created item.
    dispatch::strip_annotations(&mut final_body);
    Ok(final_body)
}

async fn create_session(
    http: &HttpClient,
    access_token: Option<&str>,
    container_path: &str,
    target_path: &str,
    conflict: ConflictBehavior,
) -> Result<UploadSession, ApiError> {
    let uri = format!("{}/{}/createUploadSession", container_path, target_path);
    let mut item = serde_json::Map::new();
    item.insert(
        CONFLICT_BEHAVIOR_PARAMETER.to_string(),
        Value::String(conflict.to_string()),
    );
    let body = json!({ "item": item });

    let raw = dispatch::dispatch_single(http, access_token, RequestSpec::post(uri, body)).await?;
    let session: UploadSession = serde_json::from_value(raw)?;
    debug!(
        "Upload session created, expires {:?}",
        session.expiration_date_time
    );
    Ok(session)
}

/// Materialize the final upload response. With conflict mode `rename` the
/// server may have chosen a different name; whatever came back is
/// authoritative.
pub(crate) fn finish_upload(raw: Value, container_id: &str) -> Result<Item, ApiError> {
    crate::adapt::adapt_item(raw, container_id)
}
