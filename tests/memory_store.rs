mod common;

use std::collections::HashSet;

use reelmate::{Engine, EntityKind, Error, Stores};

use common::{film, user};

fn engine() -> Engine {
    Engine::from_stores(Stores::in_memory())
}

#[tokio::test]
async fn film_create_get_round_trip() {
    let engine = engine();
    let draft = film("The Matrix");
    let created = engine.films.create(draft.clone()).await.unwrap();
    assert_eq!(created.id, 1);

    let fetched = engine.films.get(created.id).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.title, draft.title);
    assert_eq!(fetched.release_date, draft.release_date);
    assert_eq!(fetched.genres, draft.genres);
}

#[tokio::test]
async fn film_ids_strictly_increase() {
    let engine = engine();
    let first = engine.films.create(film("one")).await.unwrap();
    let second = engine.films.create(film("two")).await.unwrap();
    assert!(second.id > first.id);
}

#[tokio::test]
async fn film_update_replaces_all_fields() {
    let engine = engine();
    let created = engine.films.create(film("draft title")).await.unwrap();

    let mut replacement = film("final title");
    replacement.duration_minutes = 95;
    replacement.genres = vec![2];
    let updated = engine.films.update(created.id, replacement).await.unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "final title");
    assert_eq!(updated.duration_minutes, 95);
    assert_eq!(engine.films.get(created.id).await.unwrap().genres, vec![2]);
}

#[tokio::test]
async fn film_update_unknown_id_fails() {
    let engine = engine();
    let err = engine.films.update(42, film("nope")).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { kind: EntityKind::Film, id: 42 }));
}

#[tokio::test]
async fn genre_order_survives_round_trip() {
    let engine = engine();
    let mut draft = film("ordered");
    draft.genres = vec![4, 1, 3];
    let created = engine.films.create(draft).await.unwrap();
    assert_eq!(engine.films.get(created.id).await.unwrap().genres, vec![4, 1, 3]);
}

#[tokio::test]
async fn get_user_not_found_is_structural() {
    let engine = engine();
    let err = engine.users.get(999).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { kind: EntityKind::User, id: 999 }));
}

#[tokio::test]
async fn display_name_falls_back_to_login() {
    let engine = engine();

    let from_none = engine.users.create(user("neo")).await.unwrap();
    assert_eq!(from_none.name, "neo");

    let mut blank = user("trinity");
    blank.name = Some("   ".to_string());
    let from_blank = engine.users.create(blank).await.unwrap();
    assert_eq!(from_blank.name, "trinity");

    let mut named = user("morpheus");
    named.name = Some("Morpheus".to_string());
    let from_named = engine.users.create(named).await.unwrap();
    assert_eq!(from_named.name, "Morpheus");
}

#[tokio::test]
async fn likes_are_idempotent() {
    let engine = engine();
    let film = engine.films.create(film("liked")).await.unwrap();
    let user = engine.users.create(user("fan")).await.unwrap();

    engine.films.add_like(film.id, user.id).await.unwrap();
    engine.films.add_like(film.id, user.id).await.unwrap();
    assert_eq!(engine.films.like_count(film.id).await.unwrap(), 1);

    engine.films.remove_like(film.id, user.id).await.unwrap();
    engine.films.remove_like(film.id, user.id).await.unwrap();
    assert_eq!(engine.films.like_count(film.id).await.unwrap(), 0);
}

#[tokio::test]
async fn like_with_unknown_film_leaves_relation_unchanged() {
    let engine = engine();
    let film = engine.films.create(film("only film")).await.unwrap();
    let user = engine.users.create(user("only user")).await.unwrap();

    let err = engine.films.add_like(999, user.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { kind: EntityKind::Film, id: 999 }));

    let err = engine.films.add_like(film.id, 999).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { kind: EntityKind::User, id: 999 }));

    assert_eq!(engine.films.like_count(film.id).await.unwrap(), 0);
}

#[tokio::test]
async fn friendship_is_symmetric() {
    let engine = engine();
    let a = engine.users.create(user("a")).await.unwrap();
    let b = engine.users.create(user("b")).await.unwrap();

    engine.users.add_friend(a.id, b.id).await.unwrap();

    let friends_of_a = engine.users.friend_ids(a.id).await.unwrap();
    let friends_of_b = engine.users.friend_ids(b.id).await.unwrap();
    assert_eq!(friends_of_a, HashSet::from([b.id]));
    assert_eq!(friends_of_b, HashSet::from([a.id]));
}

#[tokio::test]
async fn friendship_add_is_idempotent() {
    let engine = engine();
    let a = engine.users.create(user("a")).await.unwrap();
    let b = engine.users.create(user("b")).await.unwrap();

    engine.users.add_friend(a.id, b.id).await.unwrap();
    engine.users.add_friend(a.id, b.id).await.unwrap();
    engine.users.add_friend(b.id, a.id).await.unwrap();

    assert_eq!(engine.users.friend_ids(a.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn removing_either_direction_removes_both() {
    let engine = engine();
    let a = engine.users.create(user("a")).await.unwrap();
    let b = engine.users.create(user("b")).await.unwrap();

    engine.users.add_friend(a.id, b.id).await.unwrap();
    engine.users.remove_friend(b.id, a.id).await.unwrap();

    assert!(engine.users.friend_ids(a.id).await.unwrap().is_empty());
    assert!(engine.users.friend_ids(b.id).await.unwrap().is_empty());

    // removing again is a no-op
    engine.users.remove_friend(a.id, b.id).await.unwrap();
}

#[tokio::test]
async fn friends_resolves_user_records() {
    let engine = engine();
    let a = engine.users.create(user("a")).await.unwrap();
    let b = engine.users.create(user("b")).await.unwrap();
    let c = engine.users.create(user("c")).await.unwrap();

    engine.users.add_friend(a.id, b.id).await.unwrap();
    engine.users.add_friend(a.id, c.id).await.unwrap();

    let friends = engine.users.friends(a.id).await.unwrap();
    let logins: Vec<_> = friends.iter().map(|u| u.login.as_str()).collect();
    assert_eq!(logins, vec!["b", "c"]);
}

#[tokio::test]
async fn common_friends_is_commutative() {
    let engine = engine();
    let a = engine.users.create(user("a")).await.unwrap();
    let b = engine.users.create(user("b")).await.unwrap();
    let c = engine.users.create(user("c")).await.unwrap();
    let d = engine.users.create(user("d")).await.unwrap();

    engine.users.add_friend(a.id, c.id).await.unwrap();
    engine.users.add_friend(b.id, c.id).await.unwrap();
    engine.users.add_friend(a.id, d.id).await.unwrap();

    let forward = engine.users.common_friends(a.id, b.id).await.unwrap();
    let backward = engine.users.common_friends(b.id, a.id).await.unwrap();

    assert_eq!(forward.iter().map(|u| u.id).collect::<Vec<_>>(), vec![c.id]);
    assert_eq!(forward, backward);
}

#[tokio::test]
async fn common_friends_empty_without_overlap() {
    let engine = engine();
    let a = engine.users.create(user("a")).await.unwrap();
    let b = engine.users.create(user("b")).await.unwrap();

    assert!(engine.users.common_friends(a.id, b.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn self_friendship_is_permitted_once() {
    let engine = engine();
    let a = engine.users.create(user("loner")).await.unwrap();

    engine.users.add_friend(a.id, a.id).await.unwrap();
    assert_eq!(engine.users.friend_ids(a.id).await.unwrap(), HashSet::from([a.id]));

    engine.users.remove_friend(a.id, a.id).await.unwrap();
    assert!(engine.users.friend_ids(a.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn friends_of_unknown_user_fails() {
    let engine = engine();
    let err = engine.users.friends(5).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { kind: EntityKind::User, id: 5 }));
}

#[tokio::test]
async fn popular_orders_by_count_then_ascending_id() {
    let engine = engine();
    let f1 = engine.films.create(film("one")).await.unwrap();
    let f2 = engine.films.create(film("two")).await.unwrap();
    let f3 = engine.films.create(film("three")).await.unwrap();

    let u1 = engine.users.create(user("u1")).await.unwrap();
    let u2 = engine.users.create(user("u2")).await.unwrap();

    engine.films.add_like(f1.id, u1.id).await.unwrap();
    engine.films.add_like(f2.id, u1.id).await.unwrap();
    engine.films.add_like(f2.id, u2.id).await.unwrap();
    engine.films.add_like(f3.id, u1.id).await.unwrap();
    engine.films.add_like(f3.id, u2.id).await.unwrap();

    // f2 and f3 tie on two likes; the lower id wins the tie.
    let top = engine.films.popular(2).await.unwrap();
    let ids: Vec<_> = top.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![f2.id, f3.id]);

    let all = engine.films.popular(10).await.unwrap();
    let ids: Vec<_> = all.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![f2.id, f3.id, f1.id]);
}

#[tokio::test]
async fn popular_includes_films_without_likes() {
    let engine = engine();
    let f1 = engine.films.create(film("quiet one")).await.unwrap();
    let f2 = engine.films.create(film("quiet two")).await.unwrap();

    let ranked = engine.films.popular(100).await.unwrap();
    let ids: Vec<_> = ranked.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![f1.id, f2.id]);
}

#[tokio::test]
async fn unknown_genre_reference_rejected_before_write() {
    let engine = engine();
    let mut draft = film("bad genre");
    draft.genres = vec![99];

    let err = engine.films.create(draft).await.unwrap_err();
    assert!(matches!(err, Error::InvalidReference { kind: EntityKind::Genre, id: 99 }));
    assert!(engine.films.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_age_rating_rejected_before_write() {
    let engine = engine();
    let mut draft = film("bad rating");
    draft.age_rating_id = 99;

    let err = engine.films.create(draft).await.unwrap_err();
    assert!(matches!(err, Error::InvalidReference { kind: EntityKind::AgeRating, id: 99 }));
    assert!(engine.films.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_update_leaves_existing_record() {
    let engine = engine();
    let created = engine.films.create(film("stable")).await.unwrap();

    let mut bad = film("unstable");
    bad.genres = vec![99];
    engine.films.update(created.id, bad).await.unwrap_err();

    assert_eq!(engine.films.get(created.id).await.unwrap(), created);
}

#[tokio::test]
async fn reference_tables_are_seeded() {
    let engine = engine();
    assert_eq!(engine.reference.genres().await.unwrap().len(), 6);
    assert_eq!(engine.reference.age_ratings().await.unwrap().len(), 5);
    assert_eq!(engine.reference.genre(3).await.unwrap().name, "Animation");
    assert_eq!(engine.reference.age_rating(5).await.unwrap().name, "NC-17");

    let err = engine.reference.genre(42).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { kind: EntityKind::Genre, id: 42 }));
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_creates_get_distinct_ids() {
    let engine = engine();

    let mut handles = Vec::new();
    for n in 0..20 {
        let users = engine.users.clone();
        handles.push(tokio::spawn(async move {
            users.create(user(&format!("user{n}"))).await.unwrap().id
        }));
    }

    let mut ids = HashSet::new();
    for handle in handles {
        ids.insert(handle.await.unwrap());
    }
    assert_eq!(ids.len(), 20);
}
