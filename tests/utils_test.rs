use orpheus::spotify::client::error_message;
use orpheus::types::PlaylistSummary;
use orpheus::usbpod::start_error_message;
use orpheus::utils::*;

// Helper function to create a test playlist summary
fn create_test_playlist(id: &str, name: &str, owned: bool) -> PlaylistSummary {
    PlaylistSummary {
        id: id.to_string(),
        name: name.to_string(),
        owner: "Someone".to_string(),
        owner_id: "someone".to_string(),
        total: 10,
        owned_by_current_user: owned,
    }
}

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    // Should be exactly 128 characters
    assert_eq!(verifier.len(), 128);

    // Should contain only alphanumeric characters
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated verifiers should be different
    let verifier2 = generate_code_verifier();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_challenge() {
    let verifier = "test_verifier_123";
    let challenge = generate_code_challenge(verifier);

    assert!(!challenge.is_empty());

    // Deterministic
    assert_eq!(challenge, generate_code_challenge(verifier));
    assert_ne!(challenge, generate_code_challenge("different_verifier"));

    // SHA256 digest, base64url without padding
    assert_eq!(challenge.len(), 43);
    assert!(
        challenge
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    );
}

#[test]
fn test_format_duration() {
    assert_eq!(format_duration(Some(0)), "0:00");
    assert_eq!(format_duration(Some(61_000)), "1:01");
    assert_eq!(format_duration(Some(215_999)), "3:35");
    assert_eq!(format_duration(None), "");
}

#[test]
fn test_format_added_at() {
    assert_eq!(
        format_added_at(Some("2024-03-09T18:22:01Z")),
        "2024-03-09".to_string()
    );
    assert_eq!(format_added_at(Some("yesterday")), "yesterday".to_string());
    assert_eq!(format_added_at(None), String::new());
}

#[test]
fn test_filter_playlists() {
    let mut playlists = vec![
        create_test_playlist("1", "Morning Run", true),
        create_test_playlist("2", "Evening Chill", false),
        create_test_playlist("3", "run club", true),
    ];

    filter_playlists(&mut playlists, Some("  RUN "));
    let ids: Vec<&str> = playlists.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "3"]);

    // Blank query keeps everything
    filter_playlists(&mut playlists, Some("   "));
    assert_eq!(playlists.len(), 2);
    filter_playlists(&mut playlists, None);
    assert_eq!(playlists.len(), 2);
}

#[test]
fn test_sort_playlists() {
    let mut playlists = vec![
        create_test_playlist("1", "zebra", true),
        create_test_playlist("2", "Alpha", true),
        create_test_playlist("3", "beta", true),
    ];

    sort_playlists(&mut playlists);
    let names: Vec<&str> = playlists.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "beta", "zebra"]);
}

#[test]
fn test_batches() {
    let items: Vec<u32> = (0..250).collect();
    let chunks = batches(&items, 100);

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].len(), 100);
    assert_eq!(chunks[2].len(), 50);
    assert_eq!(chunks[2][0], 200);

    assert!(batches::<u32>(&[], 100).is_empty());
}

#[test]
fn test_error_message() {
    // Spotify style error object
    let body = r#"{"error":{"status":403,"message":"Insufficient client scope"}}"#;
    assert_eq!(error_message(body), "Insufficient client scope");

    // Plain error string
    assert_eq!(error_message(r#"{"error":"invalid_grant"}"#), "invalid_grant");

    // Not JSON at all
    assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
}

#[test]
fn test_start_error_message() {
    assert_eq!(
        start_error_message(r#"{"ok":false,"error":"yt-dlp not installed"}"#),
        "yt-dlp not installed"
    );
    assert_eq!(
        start_error_message(r#"{"ok":false}"#),
        "Failed to start download"
    );
    assert_eq!(start_error_message("<html>oops</html>"), "Unknown error");
}
