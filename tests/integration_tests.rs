use anyhow::Result;
use async_trait::async_trait;
use backline::catalog::{CatalogAlbum, CatalogImage, CatalogTrack, ExternalUrls};
use backline::models::UserRole;
use backline::services::upload::{ServiceSubmitter, StagedFile, UploadQueue, UploadRules};
use backline::services::{about, albums, auth, events, media, tracks, users};
use backline::storage::{BlobStore, Visibility};
use backline::Database;
use std::sync::Mutex;

fn create_test_db() -> Database {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let id: u32 = rng.gen();
    let name = format!("test_db_{}", id);

    let db = Database::open_memory(&name).expect("Failed to create test database");
    db.migrate().expect("Failed to run migrations");
    db
}

fn test_rules() -> UploadRules {
    UploadRules {
        allowed_types: vec![
            "image/jpeg".to_string(),
            "image/png".to_string(),
            "image/webp".to_string(),
            "image/gif".to_string(),
        ],
        max_bytes: 15 * 1024 * 1024,
    }
}

/// In-memory blob store recording every put; URLs are deterministic.
#[derive(Default)]
struct MemoryBlobStore {
    puts: Mutex<Vec<(String, usize)>>,
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, path_hint: &str, data: &[u8], _visibility: Visibility) -> Result<String> {
        self.puts
            .lock()
            .expect("puts lock")
            .push((path_hint.to_string(), data.len()));
        Ok(format!("https://blobs.test/{}", path_hint))
    }
}

impl MemoryBlobStore {
    fn put_count(&self) -> usize {
        self.puts.lock().expect("puts lock").len()
    }
}

/// Always fails, standing in for an unreachable storage collaborator.
struct BrokenBlobStore;

#[async_trait]
impl BlobStore for BrokenBlobStore {
    async fn put(&self, _path_hint: &str, _data: &[u8], _visibility: Visibility) -> Result<String> {
        anyhow::bail!("storage unavailable")
    }
}

fn make_event(db: &Database, title: &str) -> i64 {
    events::create_event(
        db,
        events::NewEvent {
            title: title.to_string(),
            date: "2026-06-01".to_string(),
            ..events::NewEvent::default()
        },
    )
    .expect("Failed to create event")
    .id
}

async fn submit(db: &Database, store: &dyn BlobStore, event_id: i64, name: &str) -> i64 {
    media::submit_media(
        db,
        store,
        &test_rules(),
        event_id,
        name,
        "image/jpeg",
        b"jpeg bytes",
    )
    .await
    .expect("Failed to submit media")
    .id
}

fn media_count(db: &Database) -> i64 {
    let conn = db.get().unwrap();
    conn.query_row("SELECT COUNT(*) FROM media", [], |row| row.get(0))
        .unwrap()
}

mod media_pipeline_tests {
    use super::*;
    use backline::services::media::MediaError;

    #[tokio::test]
    async fn test_submission_starts_unapproved() {
        let db = create_test_db();
        let store = MemoryBlobStore::default();
        let event_id = make_event(&db, "Release show");

        let item = media::submit_media(
            &db,
            &store,
            &test_rules(),
            event_id,
            "crowd.jpg",
            "image/jpeg",
            b"jpeg bytes",
        )
        .await
        .unwrap();

        assert!(!item.approved);
        assert_eq!(item.event_id, event_id);
        assert!(item.blob_url.starts_with("https://blobs.test/events/"));
        assert_eq!(store.put_count(), 1);

        // Unapproved, so invisible to the public gallery.
        assert!(media::list_approved(&db, event_id).unwrap().is_empty());
        assert_eq!(media::list_pending(&db).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_validation_failure_never_reaches_storage() {
        let db = create_test_db();
        let store = MemoryBlobStore::default();
        let event_id = make_event(&db, "Release show");

        let result = media::submit_media(
            &db,
            &store,
            &test_rules(),
            event_id,
            "notes.pdf",
            "application/pdf",
            b"%PDF-1.4",
        )
        .await;

        assert!(matches!(result, Err(MediaError::Validation(_))));
        assert_eq!(store.put_count(), 0);
        assert_eq!(media_count(&db), 0);
    }

    #[tokio::test]
    async fn test_spoofed_mime_type_is_sniffed_out() {
        let db = create_test_db();
        let store = MemoryBlobStore::default();
        let event_id = make_event(&db, "Release show");

        // Declared as JPEG, but the bytes are a PDF.
        let result = media::submit_media(
            &db,
            &store,
            &test_rules(),
            event_id,
            "sneaky.jpg",
            "image/jpeg",
            b"%PDF-1.4 fake document",
        )
        .await;

        assert!(matches!(result, Err(MediaError::Validation(_))));
        assert_eq!(store.put_count(), 0);
    }

    #[tokio::test]
    async fn test_storage_failure_creates_no_record() {
        let db = create_test_db();
        let event_id = make_event(&db, "Release show");

        let result = media::submit_media(
            &db,
            &BrokenBlobStore,
            &test_rules(),
            event_id,
            "crowd.jpg",
            "image/jpeg",
            b"jpeg bytes",
        )
        .await;

        assert!(matches!(result, Err(MediaError::Storage(_))));
        assert_eq!(media_count(&db), 0);
    }

    #[tokio::test]
    async fn test_approved_listing_filters_exactly() {
        let db = create_test_db();
        let store = MemoryBlobStore::default();
        let e1 = make_event(&db, "Show one");
        let e2 = make_event(&db, "Show two");

        let a = submit(&db, &store, e1, "a.jpg").await;
        let _b = submit(&db, &store, e1, "b.jpg").await;
        let c = submit(&db, &store, e2, "c.jpg").await;

        assert!(media::approve(&db, a).unwrap());
        assert!(media::approve(&db, c).unwrap());

        let approved = media::list_approved(&db, e1).unwrap();
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].id, a);
        assert!(approved.iter().all(|m| m.approved && m.event_id == e1));
    }

    #[tokio::test]
    async fn test_approve_moves_item_out_of_pending() {
        let db = create_test_db();
        let store = MemoryBlobStore::default();
        let event_id = make_event(&db, "Show");

        let first = submit(&db, &store, event_id, "first.jpg").await;
        let second = submit(&db, &store, event_id, "second.jpg").await;

        assert!(media::approve(&db, first).unwrap());

        let approved = media::list_approved(&db, event_id).unwrap();
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].id, first);

        let pending = media::list_pending(&db).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, second);
    }

    #[tokio::test]
    async fn test_approve_is_idempotent() {
        let db = create_test_db();
        let store = MemoryBlobStore::default();
        let event_id = make_event(&db, "Show");

        let id = submit(&db, &store, event_id, "a.jpg").await;

        assert!(media::approve(&db, id).unwrap());
        assert!(media::approve(&db, id).unwrap());
        assert_eq!(media::list_approved(&db, event_id).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_approve_missing_id_reports_not_found() {
        let db = create_test_db();
        assert!(!media::approve(&db, 4242).unwrap());
    }

    #[tokio::test]
    async fn test_reject_removes_record_permanently() {
        let db = create_test_db();
        let store = MemoryBlobStore::default();
        let event_id = make_event(&db, "Show");

        let id = submit(&db, &store, event_id, "a.jpg").await;
        media::approve(&db, id).unwrap();

        assert!(media::reject(&db, id).unwrap());
        assert!(media::list_pending(&db).unwrap().is_empty());
        assert!(media::list_approved(&db, event_id).unwrap().is_empty());

        // Rejecting again is harmless.
        assert!(!media::reject(&db, id).unwrap());
    }

    #[tokio::test]
    async fn test_reject_unknown_id_is_a_noop() {
        let db = create_test_db();
        let store = MemoryBlobStore::default();
        let event_id = make_event(&db, "Show");
        submit(&db, &store, event_id, "a.jpg").await;

        assert!(!media::reject(&db, 999_999).unwrap());
        assert_eq!(media_count(&db), 1);
    }

    #[tokio::test]
    async fn test_pending_annotated_with_event_title() {
        let db = create_test_db();
        let store = MemoryBlobStore::default();
        let event_id = make_event(&db, "Album release");
        submit(&db, &store, event_id, "a.jpg").await;

        let pending = media::list_pending(&db).unwrap();
        assert_eq!(pending[0].event_title.as_deref(), Some("Album release"));

        // Deleting the event orphans the submission; the queue keeps
        // showing it, without a title.
        events::delete_event(&db, event_id).unwrap();
        let pending = media::list_pending(&db).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].event_title, None);
        assert_eq!(pending[0].event_id, event_id);
    }

    #[tokio::test]
    async fn test_listings_are_newest_first() {
        let db = create_test_db();
        let store = MemoryBlobStore::default();
        let event_id = make_event(&db, "Show");

        let first = submit(&db, &store, event_id, "a.jpg").await;
        let second = submit(&db, &store, event_id, "b.jpg").await;
        media::approve(&db, first).unwrap();
        media::approve(&db, second).unwrap();

        let approved = media::list_approved(&db, event_id).unwrap();
        assert_eq!(
            approved.iter().map(|m| m.id).collect::<Vec<_>>(),
            vec![second, first]
        );
    }
}

mod upload_queue_pipeline_tests {
    use super::*;

    #[tokio::test]
    async fn test_oversized_file_never_lands_server_side() {
        let db = create_test_db();
        let store = MemoryBlobStore::default();
        let event_id = make_event(&db, "Show");
        let rules = test_rules();

        let mut queue = UploadQueue::new(event_id, rules.clone());
        queue.enqueue(vec![
            StagedFile {
                name: "huge.png".to_string(),
                mime_type: "image/png".to_string(),
                data: vec![0u8; 20 * 1024 * 1024],
            },
            StagedFile {
                name: "ok.jpg".to_string(),
                mime_type: "image/jpeg".to_string(),
                data: vec![0u8; 2 * 1024 * 1024],
            },
        ]);

        let mut submitter = ServiceSubmitter {
            db: &db,
            store: &store,
            rules,
        };
        let outcomes = queue.upload_all(&mut submitter).await;

        assert!(queue.is_empty());
        assert_eq!(outcomes[0].error.as_deref(), Some("File exceeds 15MB"));
        assert!(outcomes[1].blob_url.is_some());

        // Exactly one submission exists, pending moderation; the
        // oversized file never reached storage or the database.
        assert_eq!(store.put_count(), 1);
        assert_eq!(media_count(&db), 1);
        let pending = media::list_pending(&db).unwrap();
        assert_eq!(pending.len(), 1);
        assert!(media::list_approved(&db, event_id).unwrap().is_empty());
    }
}

mod event_tests {
    use super::*;

    #[test]
    fn test_create_requires_title_and_date() {
        let db = create_test_db();
        let result = events::create_event(&db, events::NewEvent::default());
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_listing_attaches_approved_media_only() {
        let db = create_test_db();
        let store = MemoryBlobStore::default();
        let event_id = make_event(&db, "Show");

        let a = submit(&db, &store, event_id, "a.jpg").await;
        submit(&db, &store, event_id, "b.jpg").await;
        media::approve(&db, a).unwrap();

        let listed = events::list_events(&db).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].media.len(), 1);
        assert_eq!(listed[0].media[0].id, a);
    }

    #[test]
    fn test_listing_is_newest_date_first() {
        let db = create_test_db();
        events::create_event(
            &db,
            events::NewEvent {
                title: "Old".to_string(),
                date: "2025-01-01".to_string(),
                ..events::NewEvent::default()
            },
        )
        .unwrap();
        events::create_event(
            &db,
            events::NewEvent {
                title: "New".to_string(),
                date: "2026-05-01".to_string(),
                ..events::NewEvent::default()
            },
        )
        .unwrap();

        let listed = events::list_events(&db).unwrap();
        let titles: Vec<_> = listed.iter().map(|e| e.event.title.as_str()).collect();
        assert_eq!(titles, ["New", "Old"]);
    }

    #[test]
    fn test_partial_update() {
        let db = create_test_db();
        let id = make_event(&db, "Working title");

        let found = events::update_event(
            &db,
            id,
            events::UpdateEvent {
                location: Some("Paradiso".to_string()),
                ..events::UpdateEvent::default()
            },
        )
        .unwrap();
        assert!(found);

        let event = events::get_event(&db, id).unwrap().unwrap();
        assert_eq!(event.title, "Working title");
        assert_eq!(event.location, "Paradiso");
    }

    #[test]
    fn test_update_missing_event_reports_not_found() {
        let db = create_test_db();
        let found = events::update_event(&db, 77, events::UpdateEvent::default()).unwrap();
        assert!(!found);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let db = create_test_db();
        let id = make_event(&db, "Show");

        assert!(events::delete_event(&db, id).unwrap());
        assert!(!events::delete_event(&db, id).unwrap());
    }
}

mod catalog_overlay_tests {
    use super::*;

    fn catalog_album(id: &str, name: &str) -> CatalogAlbum {
        CatalogAlbum {
            id: id.to_string(),
            name: name.to_string(),
            images: vec![CatalogImage {
                url: format!("https://img.test/{}", id),
            }],
            release_date: "2024-03-01".to_string(),
            external_urls: ExternalUrls {
                spotify: Some(format!("https://open.test/{}", id)),
            },
        }
    }

    #[test]
    fn test_album_merge_uses_overlay_when_present() {
        let db = create_test_db();
        albums::update_album(&db, "al1", Some("Debut record"), Some(true), Some(2)).unwrap();

        let meta = albums::list_album_meta(&db).unwrap();
        let merged = albums::merge_albums(
            vec![catalog_album("al1", "First"), catalog_album("al2", "Second")],
            &meta,
        );

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].description, "Debut record");
        assert!(merged[0].featured);
        assert_eq!(merged[0].sort_order, 2);
        assert_eq!(merged[0].image.as_deref(), Some("https://img.test/al1"));

        // No overlay row yet: editable fields fall back to defaults.
        assert_eq!(merged[1].description, "");
        assert!(!merged[1].featured);
        assert_eq!(merged[1].sort_order, 0);
    }

    #[test]
    fn test_album_update_leaves_absent_fields_alone() {
        let db = create_test_db();
        albums::update_album(&db, "al1", Some("Text"), None, None).unwrap();
        albums::update_album(&db, "al1", None, Some(true), None).unwrap();

        let meta = albums::list_album_meta(&db).unwrap();
        assert_eq!(meta.len(), 1);
        assert_eq!(meta[0].description, "Text");
        assert!(meta[0].featured);
        assert_eq!(meta[0].sort_order, 0);
    }

    #[test]
    fn test_track_merge_and_upsert() {
        let db = create_test_db();
        tracks::update_track(&db, "tr1", "https://video.test/clip").unwrap();

        let meta = tracks::list_track_meta(&db).unwrap();
        let merged = tracks::merge_tracks(
            vec![
                CatalogTrack {
                    id: "tr1".to_string(),
                    name: "Opener".to_string(),
                    duration_ms: 215_000,
                    track_number: 1,
                    external_urls: ExternalUrls {
                        spotify: Some("https://open.test/tr1".to_string()),
                    },
                },
                CatalogTrack {
                    id: "tr2".to_string(),
                    name: "Closer".to_string(),
                    duration_ms: 180_000,
                    track_number: 2,
                    external_urls: ExternalUrls::default(),
                },
            ],
            &meta,
        );

        assert_eq!(merged[0].video_url, "https://video.test/clip");
        assert_eq!(merged[1].video_url, "");
        assert_eq!(merged[1].url, "");
    }

    #[test]
    fn test_track_update_overwrites_video_url() {
        let db = create_test_db();
        tracks::update_track(&db, "tr1", "https://video.test/old").unwrap();
        tracks::update_track(&db, "tr1", "https://video.test/new").unwrap();

        let meta = tracks::list_track_meta(&db).unwrap();
        assert_eq!(meta.len(), 1);
        assert_eq!(meta[0].video_url, "https://video.test/new");
    }
}

mod user_tests {
    use super::*;

    const TEST_PASSWORD: &str = "Password123";

    fn new_user(email: &str) -> users::NewUser {
        users::NewUser {
            email: email.to_string(),
            name: "Sam".to_string(),
            password: TEST_PASSWORD.to_string(),
            ..users::NewUser::default()
        }
    }

    #[test]
    fn test_create_and_authenticate() {
        let db = create_test_db();
        let user = users::create_user(&db, new_user("sam@example.com")).unwrap();
        assert_eq!(user.role, UserRole::Editor);

        let authed = auth::authenticate(&db, "sam@example.com", TEST_PASSWORD)
            .unwrap()
            .expect("User should authenticate");
        assert_eq!(authed.id, user.id);

        assert!(auth::authenticate(&db, "sam@example.com", "WrongPass456")
            .unwrap()
            .is_none());
        assert!(auth::authenticate(&db, "nobody@example.com", TEST_PASSWORD)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_duplicate_email_is_rejected() {
        let db = create_test_db();
        users::create_user(&db, new_user("sam@example.com")).unwrap();
        assert!(users::create_user(&db, new_user("sam@example.com")).is_err());
    }

    #[test]
    fn test_band_profile_update() {
        let db = create_test_db();
        let user = users::create_user(&db, new_user("sam@example.com")).unwrap();

        let found = users::update_user(
            &db,
            user.id,
            users::UpdateUser {
                is_band_member: Some(true),
                display_name: Some("  Sam on drums  ".to_string()),
                bio: Some("Keeps time".to_string()),
                ..users::UpdateUser::default()
            },
        )
        .unwrap();
        assert!(found);

        let user = users::get_user(&db, user.id).unwrap().unwrap();
        assert!(user.is_band_member);
        assert_eq!(user.display_name, "Sam on drums");
        assert_eq!(user.bio, "Keeps time");
        // Untouched fields survive.
        assert_eq!(user.name, "Sam");
    }

    #[test]
    fn test_password_change_rehashes() {
        let db = create_test_db();
        let user = users::create_user(&db, new_user("sam@example.com")).unwrap();

        users::update_user(
            &db,
            user.id,
            users::UpdateUser {
                password: Some("NewPass456".to_string()),
                ..users::UpdateUser::default()
            },
        )
        .unwrap();

        assert!(auth::authenticate(&db, "sam@example.com", TEST_PASSWORD)
            .unwrap()
            .is_none());
        assert!(auth::authenticate(&db, "sam@example.com", "NewPass456")
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_sessions_round_trip_and_expire() {
        let db = create_test_db();
        let user = users::create_user(&db, new_user("sam@example.com")).unwrap();

        let token = auth::create_session(&db, user.id, 7).unwrap();
        let resolved = auth::validate_session(&db, &token).unwrap();
        assert_eq!(resolved.map(|u| u.id), Some(user.id));

        auth::delete_session(&db, &token).unwrap();
        assert!(auth::validate_session(&db, &token).unwrap().is_none());

        // Zero-lifetime session is expired on arrival.
        let stale = auth::create_session(&db, user.id, 0).unwrap();
        assert!(auth::validate_session(&db, &stale).unwrap().is_none());
    }

    #[test]
    fn test_delete_user() {
        let db = create_test_db();
        let user = users::create_user(&db, new_user("sam@example.com")).unwrap();

        assert!(users::delete_user(&db, user.id).unwrap());
        assert!(users::get_user(&db, user.id).unwrap().is_none());
        assert!(!users::delete_user(&db, user.id).unwrap());
    }
}

mod about_tests {
    use super::*;

    #[test]
    fn test_first_read_creates_empty_row() {
        let db = create_test_db();
        let about = about::get_about(&db).unwrap();
        assert_eq!(about.description, "");
        assert_eq!(about.image, "");
    }

    #[test]
    fn test_merge_update() {
        let db = create_test_db();
        about::update_about(&db, Some("Three-piece from Utrecht"), None).unwrap();
        let about = about::update_about(&db, None, Some("/media/band.jpg")).unwrap();

        assert_eq!(about.description, "Three-piece from Utrecht");
        assert_eq!(about.image, "/media/band.jpg");
    }
}
