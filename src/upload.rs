//! Image upload intake and storage. Uploads land in a purpose-specific
//! folder under the upload root with a collision-resistant storage key; the
//! client's original filename is only consulted for its extension.

use std::collections::HashMap;
use std::path::Path;

use axum::extract::Multipart;
use uuid::Uuid;

use crate::models::Role;
use crate::utils::error::AppError;

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const DEFAULT_EXTENSION: &str = "png";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    UserProfile,
    AdminProfile,
    EventImage,
}

impl UploadKind {
    pub fn for_profile(role: Role) -> Self {
        match role {
            Role::Admin => UploadKind::AdminProfile,
            Role::User => UploadKind::UserProfile,
        }
    }

    pub fn folder(&self) -> &'static str {
        match self {
            UploadKind::UserProfile => "profile_pictures",
            UploadKind::AdminProfile => "admin_profile_pictures",
            UploadKind::EventImage => "event_images",
        }
    }

    /// Base URL under which this kind's files are served back.
    pub fn public_base(&self, base_url: &str) -> String {
        format!("{base_url}/uploads/{}", self.folder())
    }
}

#[derive(Debug)]
pub struct ImageUpload {
    pub original_name: String,
    pub data: Vec<u8>,
}

/// Drains a multipart request into its text fields plus at most one image,
/// identified by `file_field`. MIME and size limits are enforced here so no
/// handler can forget them.
pub async fn collect_form(
    multipart: &mut Multipart,
    file_field: &str,
) -> Result<(HashMap<String, String>, Option<ImageUpload>), AppError> {
    let mut fields = HashMap::new();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::Validation("Malformed multipart payload".to_string()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == file_field {
            let original_name = field.file_name().unwrap_or("upload").to_string();
            let content_type = field.content_type().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|_| AppError::Validation("Upload exceeds the request size limit".to_string()))?;

            validate_image(&content_type, data.len())?;
            image = Some(ImageUpload {
                original_name,
                data: data.to_vec(),
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|_| AppError::Validation("Malformed multipart field".to_string()))?;
            fields.insert(name, value);
        }
    }

    Ok((fields, image))
}

fn validate_image(content_type: &str, len: usize) -> Result<(), AppError> {
    if !content_type.starts_with("image/") {
        return Err(AppError::Validation(
            "Only image files are allowed".to_string(),
        ));
    }
    if len > MAX_IMAGE_BYTES {
        return Err(AppError::Validation(
            "Image exceeds the 5 MiB upload limit".to_string(),
        ));
    }
    Ok(())
}

/// Writes the upload to disk and returns the stored filename
/// (`{uuid}.{ext}`). Filenames are unique per upload, so replacement never
/// clobbers another account's file.
pub async fn store(
    upload_root: &Path,
    kind: UploadKind,
    upload: &ImageUpload,
) -> Result<String, AppError> {
    let stored_name = storage_key(&upload.original_name);
    let dir = upload_root.join(kind.folder());
    tokio::fs::create_dir_all(&dir).await?;
    tokio::fs::write(dir.join(&stored_name), &upload.data).await?;
    Ok(stored_name)
}

/// Removes a stored file. Missing files are fine (the record may outlive a
/// manually pruned disk); other failures are logged, never surfaced.
pub async fn remove(upload_root: &Path, kind: UploadKind, file_name: &str) {
    let path = upload_root.join(kind.folder()).join(file_name);
    if let Err(err) = tokio::fs::remove_file(&path).await {
        if err.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %err, "Failed to delete stored image");
        }
    }
}

fn storage_key(original_name: &str) -> String {
    let extension = Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
    format!("{}.{extension}", Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_image_mime_is_rejected() {
        let err = validate_image("application/pdf", 100).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_oversized_image_is_rejected() {
        let err = validate_image("image/png", MAX_IMAGE_BYTES + 1).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_image_at_the_ceiling_is_accepted() {
        assert!(validate_image("image/jpeg", MAX_IMAGE_BYTES).is_ok());
    }

    #[test]
    fn test_storage_keys_preserve_extension_and_differ() {
        let first = storage_key("Party Photo.JPG");
        let second = storage_key("Party Photo.JPG");
        assert!(first.ends_with(".jpg"));
        assert!(second.ends_with(".jpg"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_storage_key_without_extension_gets_default() {
        assert!(storage_key("photo").ends_with(".png"));
    }

    #[tokio::test]
    async fn test_store_and_remove_round_trip() {
        let root = std::env::temp_dir().join(format!("gatepass-test-{}", Uuid::new_v4()));
        let upload = ImageUpload {
            original_name: "avatar.png".to_string(),
            data: vec![0x89, 0x50, 0x4e, 0x47],
        };

        let stored = store(&root, UploadKind::UserProfile, &upload).await.unwrap();
        let path = root.join(UploadKind::UserProfile.folder()).join(&stored);
        assert!(path.exists());

        remove(&root, UploadKind::UserProfile, &stored).await;
        assert!(!path.exists());

        tokio::fs::remove_dir_all(&root).await.ok();
    }

    #[test]
    fn test_public_base_includes_purpose_folder() {
        assert_eq!(
            UploadKind::EventImage.public_base("http://localhost:5000"),
            "http://localhost:5000/uploads/event_images"
        );
    }
}
