//! Asynchronous image reads
//!
//! Each file becomes one future resolving to an [`ImageAttachment`]. The
//! futures are polled together and their results are applied in completion
//! order, each as an independent attach.

use crate::controller::{report_error, PageController};
use crate::error::WizardError;
use crate::input::HostInput;
use dfm_form::{is_image_mime, EventSink, FormError, ImageAttachment, ImageSource};
use futures::stream::{FuturesUnordered, Stream, StreamExt};
use std::future::Future;
use std::path::{Path, PathBuf};

/// MIME type guessed from the file extension
#[must_use]
pub fn guess_mime(path: &Path) -> &'static str {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream")
}

/// Read one file into an attachment
///
/// # Errors
/// - [`FormError::NotAnImage`] when the extension is not an image type
/// - [`WizardError::Io`] when the file cannot be read
pub async fn read_image(path: PathBuf, source: ImageSource) -> Result<ImageAttachment, WizardError> {
    let mime = guess_mime(&path);
    if !is_image_mime(mime) {
        return Err(FormError::NotAnImage(mime.to_string()).into());
    }
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|source| WizardError::Io {
            path: path.clone(),
            source,
        })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(ImageAttachment::from_bytes(name, mime, &bytes, source)?)
}

/// Start reading every path; results arrive in completion order
pub fn read_images(
    paths: Vec<PathBuf>,
    source: ImageSource,
) -> FuturesUnordered<impl Future<Output = Result<ImageAttachment, WizardError>>> {
    paths
        .into_iter()
        .map(|path| read_image(path, source))
        .collect()
}

/// Apply one completed read to `entity`
///
/// Non-image files are skipped silently; other read failures are reported
/// as warnings. Returns whether an image was attached.
pub fn attach_result(
    controller: &mut dyn PageController,
    entity: usize,
    result: Result<ImageAttachment, WizardError>,
    sink: &mut dyn EventSink,
) -> bool {
    match result {
        Ok(image) => controller
            .handle(HostInput::AttachImage { entity, image }, sink)
            .is_ok(),
        Err(WizardError::Form(FormError::NotAnImage(mime))) => {
            tracing::debug!(%mime, "skipping non-image file");
            false
        }
        Err(e) => {
            tracing::warn!(error = %e, "image read failed");
            report_error(&e, sink);
            false
        }
    }
}

/// Attach each completed read to `entity` as it arrives
///
/// A failed read does not stop the remaining ones. Returns the number of
/// images attached.
pub async fn attach_completions<S>(
    controller: &mut dyn PageController,
    entity: usize,
    mut completions: S,
    sink: &mut dyn EventSink,
) -> usize
where
    S: Stream<Item = Result<ImageAttachment, WizardError>> + Unpin,
{
    let mut attached = 0;
    while let Some(result) = completions.next().await {
        if attach_result(controller, entity, result, sink) {
            attached += 1;
        }
    }
    attached
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_from_extension() {
        assert_eq!(guess_mime(Path::new("front.PNG")), "image/png");
        assert_eq!(guess_mime(Path::new("a.jpeg")), "image/jpeg");
        assert!(!is_image_mime(guess_mime(Path::new("notes.txt"))));
        assert_eq!(guess_mime(Path::new("noext")), "application/octet-stream");
    }

    #[tokio::test]
    async fn reads_file_into_data_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("part.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let image = read_image(path, ImageSource::Camera).await.unwrap();
        assert_eq!(image.name, "part.png");
        assert_eq!(image.size, 4);
        assert_eq!(image.mime_type, "image/png");
        assert!(image.data.starts_with("data:image/png;base64,"));
        assert_eq!(image.decode().unwrap(), [0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let err = read_image(PathBuf::from("/nonexistent/dir/x.png"), ImageSource::Gallery)
            .await
            .unwrap_err();
        assert!(matches!(err, WizardError::Io { .. }));
        assert!(!err.is_blocking());
    }

    #[tokio::test]
    async fn text_file_rejected_before_read() {
        let err = read_image(PathBuf::from("/nonexistent/notes.txt"), ImageSource::Gallery)
            .await
            .unwrap_err();
        assert!(matches!(err, WizardError::Form(FormError::NotAnImage(_))));
    }
}
