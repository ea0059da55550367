/// Remove.bg client

use reqwest::blocking::multipart::Form;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::error::{report, Outcome, SuiteError, SuiteResult};
use crate::http;
use crate::processing::naming;

const SERVICE: &str = "Remove.bg";
const TIMEOUT: Duration = Duration::from_secs(30);

fn remove(input: &Path, key: Option<&str>, endpoint: &str) -> SuiteResult<(PathBuf, String)> {
    let key = key
        .filter(|k| !k.trim().is_empty())
        .ok_or(SuiteError::MissingKey(SERVICE))?;
    if input.as_os_str().is_empty() {
        return Err(SuiteError::MissingInput);
    }

    let form = Form::new().text("size", "auto").file("image_file", input)?;
    let response = http::client(TIMEOUT)?
        .post(endpoint)
        .header("X-Api-Key", key)
        .multipart(form)
        .send()?;
    let bytes = http::expect_ok(SERVICE, response)?.bytes()?;

    let out_path = naming::prefixed_png(input, "removebg");
    fs::write(&out_path, &bytes)?;

    info!("Remove.bg result written to {}", out_path.display());
    Ok((out_path, "Background removed with Remove.bg".to_string()))
}

/// Send `input` to Remove.bg and write the returned PNG as `removebg_<stem>.png`
pub fn remove_with_removebg(input: &Path, key: Option<&str>, endpoint: &str) -> Outcome {
    report("Remove.bg error", remove(input, key, endpoint))
}
