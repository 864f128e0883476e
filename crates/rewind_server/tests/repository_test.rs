//! Tests for the score repository.

use tempfile::NamedTempFile;

use rewind_server::{
    DbErrorKind, ROLE_ADMIN, ROLE_USER, ScoreRepository, hash_password, verify_password,
};

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready repository.
fn setup_test_db() -> (NamedTempFile, ScoreRepository) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let repo = ScoreRepository::new(db_path).expect("Failed to create repository");
    repo.run_migrations().expect("Migrations failed");
    (db_file, repo)
}

#[test]
fn test_games_are_seeded() {
    let (_db, repo) = setup_test_db();
    let games = repo.list_games().expect("Query failed");
    let ids: Vec<&str> = games.iter().map(|g| g.id().as_str()).collect();
    for id in ["tetris", "snake", "pong", "connect4", "tictactoe"] {
        assert!(ids.contains(&id), "missing {id}");
    }
    assert!(repo.get_game("pacman").expect("Query failed").is_none());
}

#[test]
fn test_duplicate_email_conflicts() {
    let (_db, repo) = setup_test_db();
    repo.create_user("alice", "a@arcade.test", hash_password("pw"))
        .expect("First create failed");
    let err = repo
        .create_user("alice2", "a@arcade.test", hash_password("pw"))
        .expect_err("Duplicate email should fail");
    assert_eq!(err.kind, DbErrorKind::Conflict);
    assert_eq!(err.message, "Email already exists");
}

#[test]
fn test_duplicate_username_conflicts() {
    let (_db, repo) = setup_test_db();
    repo.create_user("bob", "b@arcade.test", hash_password("pw"))
        .expect("First create failed");
    let err = repo
        .create_user("bob", "other@arcade.test", hash_password("pw"))
        .expect_err("Duplicate username should fail");
    assert_eq!(err.message, "Username already exists");
}

#[test]
fn test_token_resolves_user() {
    let (_db, repo) = setup_test_db();
    let user = repo
        .create_user("carol", "c@arcade.test", hash_password("pw"))
        .expect("Create failed");
    repo.store_token(*user.id(), "tok-1").expect("Store failed");

    let found = repo.user_for_token("tok-1").expect("Query failed");
    assert_eq!(found.map(|u| *u.id()), Some(*user.id()));
    assert!(repo.user_for_token("tok-2").expect("Query failed").is_none());
}

#[test]
fn test_submit_keeps_best_score() {
    let (_db, repo) = setup_test_db();
    let user = repo
        .create_user("dave", "d@arcade.test", hash_password("pw"))
        .expect("Create failed");
    let id = *user.id();

    let first = repo.submit_score(id, "tetris", 500).expect("Submit failed");
    assert_eq!(*first.points(), 500);
    assert_eq!(first.game_name(), "Tetris");
    assert_eq!(first.username(), "dave");

    let lower = repo.submit_score(id, "tetris", 300).expect("Submit failed");
    assert_eq!(*lower.points(), 500);
    assert_eq!(lower.id(), first.id());

    let higher = repo.submit_score(id, "tetris", 900).expect("Submit failed");
    assert_eq!(*higher.points(), 900);
    assert_eq!(higher.id(), first.id());

    assert_eq!(repo.user_scores(id).expect("Query failed").len(), 1);
}

#[test]
fn test_submit_unknown_game_not_found() {
    let (_db, repo) = setup_test_db();
    let user = repo
        .create_user("erin", "e@arcade.test", hash_password("pw"))
        .expect("Create failed");
    let err = repo
        .submit_score(*user.id(), "pacman", 10)
        .expect_err("Unknown game should fail");
    assert_eq!(err.kind, DbErrorKind::NotFound);
}

#[test]
fn test_top_scores_ordered_and_limited() {
    let (_db, repo) = setup_test_db();
    for (i, points) in [120, 40, 300, 75].into_iter().enumerate() {
        let user = repo
            .create_user(&format!("p{i}"), &format!("p{i}@arcade.test"), hash_password("pw"))
            .expect("Create failed");
        repo.submit_score(*user.id(), "snake", points)
            .expect("Submit failed");
    }

    let top = repo.top_scores("snake", 3).expect("Query failed");
    let points: Vec<i32> = top.iter().map(|s| *s.points()).collect();
    assert_eq!(points, vec![300, 120, 75]);
    assert!(repo.top_scores("pong", 10).expect("Query failed").is_empty());
    assert_eq!(repo.all_scores().expect("Query failed").len(), 4);
}

#[test]
fn test_concurrent_submissions_all_recorded() {
    let (_db, repo) = setup_test_db();
    let ids: Vec<i32> = (0..10)
        .map(|i| {
            let user = repo
                .create_user(&format!("c{i}"), &format!("c{i}@arcade.test"), hash_password("pw"))
                .expect("Create failed");
            *user.id()
        })
        .collect();

    std::thread::scope(|scope| {
        for &id in &ids {
            for k in 0..4 {
                let repo = repo.clone();
                scope.spawn(move || {
                    repo.submit_score(id, "snake", 10 + k)
                        .expect("Concurrent submit failed")
                });
            }
        }
    });

    let top = repo.top_scores("snake", 100).expect("Query failed");
    assert_eq!(top.len(), ids.len());
    assert!(top.iter().all(|s| *s.points() == 13));
}

#[test]
fn test_admin_account_is_seeded() {
    let (_db, repo) = setup_test_db();
    let admin = repo
        .find_user_by_email("admin@arcade.com")
        .expect("Query failed")
        .expect("Admin missing");
    assert!(admin.is_admin());
    assert!(verify_password("admin123", admin.password_hash()));

    let player = repo
        .create_user("fay", "f@arcade.test", hash_password("pw"))
        .expect("Create failed");
    assert_eq!(player.role(), ROLE_USER);
    assert!(!player.is_admin());
}

#[test]
fn test_delete_user_cascades() {
    let (_db, repo) = setup_test_db();
    let user = repo
        .create_user("gus", "g@arcade.test", hash_password("pw"))
        .expect("Create failed");
    let id = *user.id();
    repo.store_token(id, "tok-gus").expect("Store failed");
    repo.submit_score(id, "pong", 7).expect("Submit failed");

    repo.delete_user(id).expect("Delete failed");
    assert!(repo.get_user(id).expect("Query failed").is_none());
    assert!(repo.user_for_token("tok-gus").expect("Query failed").is_none());
    assert!(repo.all_scores().expect("Query failed").is_empty());

    let err = repo.delete_user(id).expect_err("Second delete should fail");
    assert_eq!(err.kind, DbErrorKind::NotFound);
}

#[test]
fn test_set_role() {
    let (_db, repo) = setup_test_db();
    let user = repo
        .create_user("hal", "h@arcade.test", hash_password("pw"))
        .expect("Create failed");
    let promoted = repo.set_role(*user.id(), ROLE_ADMIN).expect("Update failed");
    assert!(promoted.is_admin());

    let err = repo.set_role(9999, ROLE_ADMIN).expect_err("Unknown user should fail");
    assert_eq!(err.kind, DbErrorKind::NotFound);
}

#[test]
fn test_game_catalogue_changes() {
    let (_db, repo) = setup_test_db();
    let game = repo
        .create_game("breakout", "Breakout", None)
        .expect("Create failed");
    assert_eq!(game.name(), "Breakout");
    assert!(game.description().is_none());

    let err = repo
        .create_game("breakout", "Again", None)
        .expect_err("Duplicate id should fail");
    assert_eq!(err.kind, DbErrorKind::Conflict);
    assert_eq!(err.message, "Game ID already exists");

    let renamed = repo
        .update_game("breakout", "Brick Breaker", Some("Bounce and smash"))
        .expect("Update failed");
    assert_eq!(renamed.name(), "Brick Breaker");
    assert_eq!(renamed.description().as_deref(), Some("Bounce and smash"));
    let err = repo
        .update_game("pacman", "Pac", None)
        .expect_err("Unknown game should fail");
    assert_eq!(err.kind, DbErrorKind::NotFound);
}

#[test]
fn test_delete_game_removes_its_scores() {
    let (_db, repo) = setup_test_db();
    let user = repo
        .create_user("ivy", "i@arcade.test", hash_password("pw"))
        .expect("Create failed");
    repo.submit_score(*user.id(), "tetris", 40).expect("Submit failed");
    repo.submit_score(*user.id(), "snake", 20).expect("Submit failed");

    repo.delete_game("tetris").expect("Delete failed");
    assert!(repo.get_game("tetris").expect("Query failed").is_none());
    let left: Vec<String> = repo
        .all_scores()
        .expect("Query failed")
        .iter()
        .map(|s| s.game_id().clone())
        .collect();
    assert_eq!(left, vec!["snake".to_string()]);

    let err = repo.delete_game("tetris").expect_err("Second delete should fail");
    assert_eq!(err.kind, DbErrorKind::NotFound);
}
