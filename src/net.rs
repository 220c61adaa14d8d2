//! Asset endpoints, called from the browser via `gloo-net`.
//!
//! Both calls return `Result` so the caller can fold failures into
//! [`crate::assets::AssetPanel`], which logs them and degrades quietly.

use gloo_net::http::{Request, Response};
use web_sys::{File, FormData};

use crate::assets::{AssetError, UploadResponse};

fn check_status(resp: &Response) -> Result<(), AssetError> {
    let status = resp.status();
    if (200..300).contains(&status) { Ok(()) } else { Err(AssetError::Status(status)) }
}

/// Fetch the list of asset locators from `url` (a JSON array of strings).
///
/// # Errors
///
/// Returns `Request` if the call fails, `Status` on a non-2xx response, or
/// `Decode` if the body is not a string array.
pub async fn list_assets(url: &str) -> Result<Vec<String>, AssetError> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| AssetError::Request(e.to_string()))?;
    check_status(&resp)?;
    resp.json::<Vec<String>>()
        .await
        .map_err(|e| AssetError::Decode(e.to_string()))
}

/// Upload `file` as multipart field `field` to `url`.
///
/// # Errors
///
/// Returns `Request` if the form cannot be built or the call fails, `Status`
/// on a non-2xx response, `Decode` for an unreadable body, and `Rejected` if
/// the server stored nothing.
pub async fn upload_asset(url: &str, field: &str, file: &File) -> Result<String, AssetError> {
    let form = FormData::new().map_err(|e| AssetError::Request(format!("{e:?}")))?;
    form.append_with_blob(field, file)
        .map_err(|e| AssetError::Request(format!("{e:?}")))?;
    let resp = Request::post(url)
        .body(form)
        .map_err(|e| AssetError::Request(e.to_string()))?
        .send()
        .await
        .map_err(|e| AssetError::Request(e.to_string()))?;
    check_status(&resp)?;
    let body: UploadResponse = resp.json().await.map_err(|e| AssetError::Decode(e.to_string()))?;
    body.into_locator()
}
