use diesel_async::AsyncConnection;
#[cfg(feature = "sqlite")]
use rstest::{fixture, rstest};

use super::*;
#[cfg(feature = "sqlite")]
use crate::{
    capabilities::Capabilities,
    credentials,
    db::{self, DbConnection},
    identity::{CapabilityError, Identity},
};

#[cfg(feature = "sqlite")]
const SALT: &str = "ops-test-salt";

#[cfg(feature = "sqlite")]
#[fixture]
async fn migrated_conn() -> DbConnection {
    let mut conn = DbConnection::establish(":memory:")
        .await
        .expect("failed to create in-memory connection");
    db::enable_foreign_keys(&mut conn)
        .await
        .expect("failed to enable foreign keys");
    db::apply_migrations(&mut conn, "")
        .await
        .expect("failed to apply migrations");
    conn
}

/// Seed an account and return its identity. The row must exist because
/// category and article writes reference the acting user id.
#[cfg(feature = "sqlite")]
async fn seed_identity(
    conn: &mut DbConnection,
    id: &str,
    name: &str,
    capabilities: Capabilities,
) -> Identity {
    db::create_user(
        conn,
        &crate::models::NewUser {
            id,
            name,
            password: &credentials::hash_password("secret123", SALT),
            permission: capabilities.to_stored(),
        },
    )
    .await
    .expect("failed to seed user");
    Identity::User {
        id: id.to_owned(),
        capabilities,
    }
}

#[cfg(feature = "sqlite")]
fn meta() -> RequestMeta {
    RequestMeta {
        ip_address: Some("203.0.113.7".to_owned()),
        endpoint: "api.test".to_owned(),
        request_line: "POST /api/test HTTP/1.1".to_owned(),
    }
}

#[cfg(feature = "sqlite")]
async fn seed_article(conn: &mut DbConnection, identity: &Identity, id: &str, public: bool) {
    articles::create_article(
        conn,
        identity,
        &articles::CreateArticle {
            id,
            title: "A post",
            text_type: "markdown",
            source_text: "# A post",
            content: Some("<h1>A post</h1>"),
            public,
            is_commentable: true,
            category_id: None,
        },
    )
    .await
    .expect("failed to create article");
}

#[cfg(feature = "sqlite")]
#[rstest]
#[tokio::test]
async fn login_succeeds_and_bumps_last_login(#[future] migrated_conn: DbConnection) {
    let mut conn = migrated_conn.await;
    seed_identity(&mut conn, "u1", "alice", Capabilities::author()).await;

    let stored = credentials::hash_password("secret123", SALT);
    let timestamp = 1_770_000_000;
    let request = auth::LoginRequest {
        name: "alice".to_owned(),
        enc_password: credentials::challenge_digest(&stored, timestamp),
        timestamp,
    };
    let user = auth::login(&mut conn, &request, &meta())
        .await
        .expect("login must succeed");
    assert_eq!(user.id, "u1");

    let fetched = db::get_user(&mut conn, "u1")
        .await
        .expect("lookup failed")
        .expect("user not found");
    assert!(fetched.last_login.and_utc().timestamp() > 0);

    let trail = db::list_events(&mut conn, 10).await.expect("listing failed");
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].kind, "login");
    assert_eq!(trail[0].user_id.as_deref(), Some("u1"));
    assert_eq!(trail[0].endpoint, "api.test");
}

#[cfg(feature = "sqlite")]
#[rstest]
#[tokio::test]
async fn login_failures_are_indistinguishable(#[future] migrated_conn: DbConnection) {
    let mut conn = migrated_conn.await;
    let admin = seed_identity(&mut conn, "admin", "root", Capabilities::admin()).await;
    seed_identity(&mut conn, "u1", "alice", Capabilities::author()).await;

    let stored = credentials::hash_password("secret123", SALT);
    let timestamp = 1_770_000_000;

    // wrong digest
    let request = auth::LoginRequest {
        name: "alice".to_owned(),
        enc_password: credentials::challenge_digest(&stored, timestamp + 1),
        timestamp,
    };
    let err = auth::login(&mut conn, &request, &meta())
        .await
        .expect_err("wrong digest must be rejected");
    assert!(matches!(err, OpError::AuthRejected));

    // unknown name
    let request = auth::LoginRequest {
        name: "nobody".to_owned(),
        enc_password: credentials::challenge_digest(&stored, timestamp),
        timestamp,
    };
    let err = auth::login(&mut conn, &request, &meta())
        .await
        .expect_err("unknown name must be rejected");
    assert!(matches!(err, OpError::AuthRejected));

    // expired account, even with a correct digest
    users::expire_user(&mut conn, &admin, "u1")
        .await
        .expect("expire failed");
    let request = auth::LoginRequest {
        name: "alice".to_owned(),
        enc_password: credentials::challenge_digest(&stored, timestamp),
        timestamp,
    };
    let err = auth::login(&mut conn, &request, &meta())
        .await
        .expect_err("expired account must be rejected");
    assert!(matches!(err, OpError::AuthRejected));
}

#[cfg(feature = "sqlite")]
#[rstest]
#[tokio::test]
async fn capability_checks_gate_writes(#[future] migrated_conn: DbConnection) {
    let mut conn = migrated_conn.await;
    let author = seed_identity(&mut conn, "u1", "alice", Capabilities::author()).await;

    let err = articles::create_article(
        &mut conn,
        &Identity::Anonymous,
        &articles::CreateArticle {
            id: "a1",
            title: "nope",
            text_type: "markdown",
            source_text: "",
            content: None,
            public: true,
            is_commentable: true,
            category_id: None,
        },
    )
    .await
    .expect_err("anonymous cannot post");
    assert!(matches!(
        err,
        OpError::Capability(CapabilityError::NotAuthenticated)
    ));

    let err = users::create_user(
        &mut conn,
        &author,
        SALT,
        &users::CreateUser {
            id: "u2",
            name: "bob",
            password: "pw",
            capabilities: Capabilities::empty(),
        },
    )
    .await
    .expect_err("authors cannot manage users");
    assert!(matches!(
        err,
        OpError::Capability(CapabilityError::Insufficient(_))
    ));

    let err = categories::create_category(&mut conn, &author, "c1", "rust")
        .await
        .expect_err("authors cannot manage categories");
    assert!(matches!(
        err,
        OpError::Capability(CapabilityError::Insufficient(_))
    ));
}

#[cfg(feature = "sqlite")]
#[rstest]
#[tokio::test]
async fn private_articles_hide_from_strangers(#[future] migrated_conn: DbConnection) {
    let mut conn = migrated_conn.await;
    let author = seed_identity(&mut conn, "u1", "alice", Capabilities::author()).await;
    let other = seed_identity(&mut conn, "u2", "bob", Capabilities::POST_ARTICLE).await;
    seed_article(&mut conn, &author, "a1", false).await;

    let err = articles::get_article(&mut conn, &Identity::Anonymous, "a1", false, false)
        .await
        .expect_err("private article must look absent");
    assert!(matches!(err, OpError::NotFound));
    let err = articles::get_article(&mut conn, &other, "a1", false, false)
        .await
        .expect_err("private article must look absent to non-editors");
    assert!(matches!(err, OpError::NotFound));

    // the author and any editor see it
    let payload = articles::get_article(&mut conn, &author, "a1", true, true)
        .await
        .expect("author must see their own draft");
    assert_eq!(payload.id, "a1");
    assert_eq!(payload.source_text.as_deref(), Some("# A post"));

    let listed = articles::list_articles(&mut conn, &Identity::Anonymous)
        .await
        .expect("listing failed");
    assert!(listed.is_empty());
    let listed = articles::list_articles(&mut conn, &author)
        .await
        .expect("listing failed");
    assert_eq!(listed.len(), 1);
}

#[cfg(feature = "sqlite")]
#[rstest]
#[tokio::test]
async fn comments_flow_from_post_to_review(#[future] migrated_conn: DbConnection) {
    let mut conn = migrated_conn.await;
    let author = seed_identity(&mut conn, "u1", "alice", Capabilities::author()).await;
    let moderator = seed_identity(&mut conn, "u2", "mod", Capabilities::moderator()).await;
    seed_article(&mut conn, &author, "a1", true).await;

    // anonymous comment, context captured from the request metadata
    let posted = comments::post_comment(
        &mut conn,
        &Identity::Anonymous,
        &comments::PostComment {
            article_id: "a1",
            content: "nice post",
            nickname: "bob",
            reply_to: None,
        },
        &meta(),
    )
    .await
    .expect("anonymous comment must be accepted");
    assert_eq!(posted.is_author, None);

    // the author's own comment is flagged, not claimed
    let authored = comments::post_comment(
        &mut conn,
        &author,
        &comments::PostComment {
            article_id: "a1",
            content: "thanks",
            nickname: "alice",
            reply_to: Some(posted.id),
        },
        &meta(),
    )
    .await
    .expect("author comment must be accepted");
    assert_eq!(authored.is_author, Some(true));

    // unreviewed comments are only visible to reviewers
    let visible = comments::list_comments(&mut conn, &Identity::Anonymous, "a1")
        .await
        .expect("listing failed");
    assert!(visible.is_empty());
    let visible = comments::list_comments(&mut conn, &moderator, "a1")
        .await
        .expect("listing failed");
    assert_eq!(visible.len(), 2);

    comments::review_comment(&mut conn, &moderator, posted.id)
        .await
        .expect("review failed");
    let visible = comments::list_comments(&mut conn, &Identity::Anonymous, "a1")
        .await
        .expect("listing failed");
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, posted.id);
}

#[cfg(feature = "sqlite")]
#[rstest]
#[tokio::test]
async fn closed_articles_refuse_comments(#[future] migrated_conn: DbConnection) {
    let mut conn = migrated_conn.await;
    let author = seed_identity(&mut conn, "u1", "alice", Capabilities::author()).await;
    articles::create_article(
        &mut conn,
        &author,
        &articles::CreateArticle {
            id: "a1",
            title: "No comments",
            text_type: "markdown",
            source_text: "",
            content: None,
            public: true,
            is_commentable: false,
            category_id: None,
        },
    )
    .await
    .expect("failed to create article");

    let err = comments::post_comment(
        &mut conn,
        &Identity::Anonymous,
        &comments::PostComment {
            article_id: "a1",
            content: "anyway",
            nickname: "bob",
            reply_to: None,
        },
        &meta(),
    )
    .await
    .expect_err("closed article must refuse comments");
    assert!(matches!(err, OpError::Forbidden));
}

#[cfg(feature = "sqlite")]
#[rstest]
#[tokio::test]
async fn audit_log_needs_view_event(#[future] migrated_conn: DbConnection) {
    let mut conn = migrated_conn.await;
    let admin = seed_identity(&mut conn, "admin", "root", Capabilities::admin()).await;
    let author = seed_identity(&mut conn, "u1", "alice", Capabilities::author()).await;

    events::record(
        &mut conn,
        &author,
        &events::RecordEvent {
            kind: "article.delete",
            description: "removed a draft",
        },
        &meta(),
    )
    .await
    .expect("recording must be open");

    let err = events::list_events(&mut conn, &author, 10)
        .await
        .expect_err("authors cannot read the audit log");
    assert!(matches!(err, OpError::Capability(_)));

    let trail = events::list_events(&mut conn, &admin, 10)
        .await
        .expect("admins read the audit log");
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].kind, "article.delete");
    assert_eq!(trail[0].user_id.as_deref(), Some("u1"));
}

#[cfg(feature = "sqlite")]
#[rstest]
#[tokio::test]
async fn password_change_invalidates_old_challenges(#[future] migrated_conn: DbConnection) {
    let mut conn = migrated_conn.await;
    let identity = seed_identity(&mut conn, "u1", "alice", Capabilities::author()).await;

    users::change_own_password(&mut conn, &identity, SALT, "hunter2")
        .await
        .expect("password change failed");

    let timestamp = 1_770_000_000;
    let old_stored = credentials::hash_password("secret123", SALT);
    let request = auth::LoginRequest {
        name: "alice".to_owned(),
        enc_password: credentials::challenge_digest(&old_stored, timestamp),
        timestamp,
    };
    let err = auth::login(&mut conn, &request, &meta())
        .await
        .expect_err("old password must stop working");
    assert!(matches!(err, OpError::AuthRejected));

    let new_stored = credentials::hash_password("hunter2", SALT);
    let request = auth::LoginRequest {
        name: "alice".to_owned(),
        enc_password: credentials::challenge_digest(&new_stored, timestamp),
        timestamp,
    };
    auth::login(&mut conn, &request, &meta())
        .await
        .expect("new password must work");
}

#[cfg(feature = "sqlite")]
#[rstest]
#[tokio::test]
async fn user_management_round_trip(#[future] migrated_conn: DbConnection) {
    let mut conn = migrated_conn.await;
    let admin = seed_identity(&mut conn, "admin", "root", Capabilities::admin()).await;

    let created = users::create_user(
        &mut conn,
        &admin,
        SALT,
        &users::CreateUser {
            id: "u1",
            name: "alice",
            password: "secret123",
            capabilities: Capabilities::author(),
        },
    )
    .await
    .expect("create failed");
    let summary = created.permission.expect("summary requested");
    let enabled: Vec<&str> = summary
        .iter()
        .filter(|f| f.enabled)
        .map(|f| f.name)
        .collect();
    assert_eq!(enabled, ["POST_ARTICLE", "EDIT_ARTICLE"]);

    users::set_permission(&mut conn, &admin, "u1", Capabilities::moderator())
        .await
        .expect("mask update failed");
    let fetched = users::get_user(&mut conn, &admin, "u1", false)
        .await
        .expect("get failed");
    assert!(fetched.permission.is_none());

    users::delete_user(&mut conn, &admin, "u1")
        .await
        .expect("delete failed");
    let err = users::get_user(&mut conn, &admin, "u1", false)
        .await
        .expect_err("deleted user must be gone");
    assert!(matches!(err, OpError::NotFound));
}
