mod common;

use bytes::Bytes;
use tempfile::TempDir;

use common::{RecordingStore, RecordingThumbnail, JPEG_BYTES};
use dog_blob::{BlobStore, FsBlobStore};
use dog_media::{
    BinaryContent, FileProvider, Media, MediaError, MediaMetadata, MediaProvider, ProviderConfig,
    ProviderCore, ProviderStatus, RemovalPolicy, ServerCdn, BINARY_CONTENT_FIELD,
};

fn image_config() -> ProviderConfig {
    ProviderConfig::new()
        .with_allowed_extensions(["jpg", "png"])
        .with_allowed_mime_types(["image/jpeg", "image/png"])
        .with_formats(["small", "big"])
}

fn create_test_provider(config: ProviderConfig) -> (FileProvider, RecordingStore, RecordingThumbnail) {
    let store = RecordingStore::new();
    let thumbnail = RecordingThumbnail::new();
    let core = ProviderCore::new(store.clone())
        .with_cdn(ServerCdn::new("https://cdn.example.com/media"))
        .with_thumbnail(thumbnail.clone());
    (FileProvider::new("file", core, config), store, thumbnail)
}

fn uploaded_jpeg() -> Media {
    Media::new("file").with_binary_content(BinaryContent::uploaded(JPEG_BYTES, "Holiday.jpg"))
}

#[tokio::test]
async fn test_transform_assigns_reference_with_extension() {
    let (provider, _store, _thumbs) = create_test_provider(image_config());
    let mut media = uploaded_jpeg();

    provider.transform(&mut media).await.unwrap();

    let reference = media.provider_reference.clone().unwrap();
    assert!(reference.ends_with(".jpg"));
    assert!(reference.len() > ".jpg".len());
    assert_eq!(media.name, "Holiday.jpg");
    assert_eq!(media.metadata.filename(), Some("Holiday.jpg"));
    assert_eq!(media.content_type.as_deref(), Some("image/jpeg"));
    assert_eq!(media.size, Some(JPEG_BYTES.len() as u64));
    assert_eq!(media.provider_status, ProviderStatus::Ok);
}

#[tokio::test]
async fn test_transform_twice_keeps_reference() {
    let (provider, _store, _thumbs) = create_test_provider(image_config());
    let mut media = uploaded_jpeg();

    provider.transform(&mut media).await.unwrap();
    let first = media.provider_reference.clone();
    provider.transform(&mut media).await.unwrap();

    assert_eq!(media.provider_reference, first);
}

#[tokio::test]
async fn test_new_content_keeps_reference_but_rederives_details() {
    let (provider, _store, _thumbs) = create_test_provider(image_config());
    let mut media = uploaded_jpeg();
    provider.transform(&mut media).await.unwrap();
    let reference = media.provider_reference.clone();

    media.set_binary_content(BinaryContent::uploaded(&b"\x89PNG\r\n\x1a\n...."[..], "other.png"));
    assert_eq!(media.provider_status, ProviderStatus::Pending);
    provider.transform(&mut media).await.unwrap();

    assert_eq!(media.provider_reference, reference);
    assert_eq!(media.content_type.as_deref(), Some("image/png"));
    assert_eq!(media.size, Some(12));
    assert_eq!(media.provider_status, ProviderStatus::Ok);
}

#[tokio::test]
async fn test_transform_missing_path_fails_without_changes() {
    let (provider, _store, _thumbs) = create_test_provider(image_config());
    let mut media = Media::new("file").with_binary_content(BinaryContent::raw_path("/no/such/file.jpg"));

    let result = provider.transform(&mut media).await;

    assert!(matches!(result, Err(MediaError::Precondition { .. })));
    assert!(media.name.is_empty());
    assert!(media.provider_reference.is_none());
    assert_eq!(media.provider_status, ProviderStatus::Pending);
}

#[tokio::test]
async fn test_transform_raw_path_becomes_local_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("scan.png");
    std::fs::write(&path, b"\x89PNG\r\n\x1a\nimage-data").unwrap();
    let (provider, _store, _thumbs) = create_test_provider(image_config());
    let mut media = Media::new("file").with_binary_content(BinaryContent::raw_path(&path));

    provider.transform(&mut media).await.unwrap();

    assert!(matches!(media.binary_content, Some(BinaryContent::LocalFile { .. })));
    assert_eq!(media.name, "scan.png");
    assert!(media.provider_reference.unwrap().ends_with(".png"));
}

#[tokio::test]
async fn test_transform_without_content_or_name_fails() {
    let (provider, _store, _thumbs) = create_test_provider(image_config());
    let mut media = Media::new("file");

    let result = provider.transform(&mut media).await;

    assert!(matches!(result, Err(MediaError::Precondition { .. })));
}

#[tokio::test]
async fn test_transform_upload_without_name_fails() {
    let (provider, _store, _thumbs) = create_test_provider(image_config());
    let mut media = Media::new("file").with_binary_content(BinaryContent::uploaded(JPEG_BYTES, ""));

    let result = provider.transform(&mut media).await;

    assert!(matches!(result, Err(MediaError::Precondition { .. })));
    assert!(media.provider_reference.is_none());
}

#[tokio::test]
async fn test_upload_without_name_keeps_existing_name() {
    let (provider, _store, _thumbs) = create_test_provider(image_config());
    let mut media = Media::new("file")
        .with_name("Profile picture")
        .with_binary_content(BinaryContent::uploaded(JPEG_BYTES, ""));

    provider.transform(&mut media).await.unwrap();

    assert_eq!(media.name, "Profile picture");
    assert_eq!(media.metadata.filename(), None);
    assert!(media.provider_reference.unwrap().ends_with(".jpg"));
}

#[tokio::test]
async fn test_on_create_stores_bytes_and_requests_formats() {
    let (provider, store, thumbs) = create_test_provider(image_config());
    let mut media = uploaded_jpeg();
    provider.transform(&mut media).await.unwrap();
    media.id = Some(7_u64.into());

    provider.on_create(&media).await.unwrap();

    let key = provider.reference_key(&media).unwrap();
    assert_eq!(
        key,
        format!("default/0001/01/{}", media.provider_reference.as_deref().unwrap())
    );
    assert_eq!(store.writes(), vec![key]);
    assert_eq!(provider.reference_bytes(&media).await.unwrap(), Bytes::from_static(JPEG_BYTES));
    assert_eq!(
        thumbs.calls(),
        vec![(Some("7".to_string()), vec!["small".to_string(), "big".to_string()])]
    );
}

#[tokio::test]
async fn test_on_create_without_content_is_noop() {
    let (provider, store, thumbs) = create_test_provider(image_config());
    let mut media = Media::new("file").with_id(7_u64).with_name("existing.jpg");
    media.provider_reference = Some("abc.jpg".to_string());

    provider.on_create(&media).await.unwrap();

    assert!(store.writes().is_empty());
    assert!(thumbs.calls().is_empty());
}

#[tokio::test]
async fn test_on_update_without_content_is_noop() {
    let (provider, store, thumbs) = create_test_provider(image_config());
    let mut media = uploaded_jpeg();
    provider.transform(&mut media).await.unwrap();
    media.id = Some(3_u64.into());
    media.clear_binary_content();

    provider.on_update(&media).await.unwrap();

    assert!(store.writes().is_empty());
    assert!(thumbs.calls().is_empty());
}

#[tokio::test]
async fn test_on_update_ignores_raw_paths() {
    let (provider, store, thumbs) = create_test_provider(image_config());
    let mut media = Media::new("file").with_id(3_u64).with_name("a.jpg");
    media.provider_reference = Some("abc.jpg".to_string());
    media.binary_content = Some(BinaryContent::raw_path("/tmp/whatever.jpg"));

    provider.on_update(&media).await.unwrap();

    assert!(store.writes().is_empty());
    assert!(thumbs.calls().is_empty());
}

#[tokio::test]
async fn test_on_update_overwrites_existing_key() {
    let (provider, store, thumbs) = create_test_provider(image_config());
    let mut media = uploaded_jpeg();
    provider.transform(&mut media).await.unwrap();
    media.id = Some(3_u64.into());
    provider.on_create(&media).await.unwrap();
    let key = provider.reference_key(&media).unwrap();

    let replacement: &'static [u8] = b"\xFF\xD8\xFF\xE1replacement";
    media.set_binary_content(BinaryContent::uploaded(replacement, "Replacement.jpg"));
    provider.transform(&mut media).await.unwrap();
    provider.on_update(&media).await.unwrap();

    assert_eq!(provider.reference_key(&media).unwrap(), key);
    assert_eq!(store.writes(), vec![key.clone(), key]);
    assert_eq!(provider.reference_bytes(&media).await.unwrap(), Bytes::from_static(replacement));
    assert_eq!(media.name, "Replacement.jpg");
    assert_eq!(thumbs.calls().len(), 2);
}

#[tokio::test]
async fn test_on_remove_retains_bytes_by_default() {
    let (provider, store, _thumbs) = create_test_provider(image_config());
    let mut media = uploaded_jpeg();
    provider.transform(&mut media).await.unwrap();
    media.id = Some(11_u64.into());
    provider.on_create(&media).await.unwrap();

    provider.on_remove(&media).await.unwrap();

    assert!(store.deletes().is_empty());
    assert_eq!(provider.reference_bytes(&media).await.unwrap(), Bytes::from_static(JPEG_BYTES));
}

#[tokio::test]
async fn test_on_remove_with_delete_policy() {
    let (provider, store, _thumbs) =
        create_test_provider(image_config().with_removal_policy(RemovalPolicy::Delete));
    let mut media = uploaded_jpeg();
    provider.transform(&mut media).await.unwrap();
    media.id = Some(11_u64.into());
    provider.on_create(&media).await.unwrap();
    let key = provider.reference_key(&media).unwrap();

    provider.on_remove(&media).await.unwrap();

    assert_eq!(store.deletes(), vec![key]);
    assert!(provider.reference_bytes(&media).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_reference_bytes_missing_is_not_found() {
    let (provider, _store, _thumbs) = create_test_provider(image_config());
    let mut media = Media::new("file").with_id(1_u64).with_name("gone.jpg");
    media.provider_reference = Some("gone.jpg".to_string());

    let err = provider.reference_bytes(&media).await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_urls() {
    let (provider, _store, _thumbs) = create_test_provider(image_config());
    let mut media = Media::new("file").with_id(1_u64).with_name("a.jpg").with_cdn_flushable(true);
    media.provider_reference = Some("abc.jpg".to_string());

    assert_eq!(
        provider.public_url(&media, "reference").unwrap(),
        "https://cdn.example.com/media/default/0001/01/abc.jpg"
    );
    assert_eq!(
        provider.public_url(&media, "small").unwrap(),
        "https://cdn.example.com/media/default/0001/01/thumb_1_small.jpg"
    );
    assert_eq!(provider.private_url(&media, "reference").unwrap(), None);

    let properties = provider.helper_properties(&media, "small").unwrap();
    assert_eq!(properties["title"], "a.jpg");
    assert_eq!(properties["file"], "default/0001/01/abc.jpg");
}

#[tokio::test]
async fn test_validate_reports_both_violations() {
    let (provider, _store, _thumbs) = create_test_provider(image_config());
    let media = Media::new("file").with_binary_content(BinaryContent::uploaded(
        &b"MZ\x90\x00\x03\x00\x00\x00"[..],
        "installer.exe",
    ));

    let violations = provider.validate(&media).await;

    assert_eq!(violations.len(), 2);
    assert!(violations.iter().all(|v| v.field == BINARY_CONTENT_FIELD));
}

#[tokio::test]
async fn test_validate_accepts_allowed_upload() {
    let (provider, _store, _thumbs) = create_test_provider(image_config());

    assert!(provider.validate(&uploaded_jpeg()).await.is_empty());
    assert!(provider.validate(&Media::new("file")).await.is_empty());
}

#[tokio::test]
async fn test_full_lifecycle_on_filesystem_store() {
    let temp = TempDir::new().unwrap();
    let store = FsBlobStore::new(temp.path()).await.unwrap();
    let provider = FileProvider::new("file", ProviderCore::new(store.clone()), image_config());
    let mut media = uploaded_jpeg();

    provider.transform(&mut media).await.unwrap();
    media.id = Some(250_000_u64.into());
    provider.on_create(&media).await.unwrap();

    let key = provider.reference_key(&media).unwrap();
    assert!(key.starts_with("default/0003/51/"));
    assert!(store.exists(&key).await.unwrap());
    assert!(temp.path().join(&key).is_file());
    assert_eq!(media.metadata.get(MediaMetadata::FILENAME), Some("Holiday.jpg"));
}
