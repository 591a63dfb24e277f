use crate::model::TaskRecord;

/// Strips the content digest from an image reference.
///
/// `app:1.0.0@sha256:abc` becomes `app:1.0.0`. References without `@` are
/// returned unchanged.
pub fn normalize_image(reference: &str) -> &str {
    match reference.split_once('@') {
        Some((image, _digest)) => image,
        None => reference,
    }
}

/// Whether at least one task runs `image`, ignoring digests.
pub fn is_image_deployed(tasks: &[TaskRecord], image: &str) -> bool {
    tasks
        .iter()
        .any(|task| normalize_image(task.image()) == image)
}
