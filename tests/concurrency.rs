use std::sync::Arc;

use cisium::api::{AdminAPI, BidAPI, ProfileAPI, RatingAPI, RideAPI};
use cisium::auth::User;
use cisium::engine::Engine;
use cisium::entities::{Profile, Role, Status};
use cisium::external::identity::Identity;
use cisium::store::Store;

fn identity(tag: &str) -> Identity {
    Identity {
        external_id: format!("ext-{}", tag),
        display_name: tag.into(),
        email: format!("{}@example.com", tag),
        photo_url: None,
    }
}

async fn passenger(engine: &Engine, tag: &str) -> (Profile, User) {
    let profile = engine
        .provision_profile(identity(tag), Role::Passenger)
        .await
        .unwrap();
    let user = User::from(&profile);

    (profile, user)
}

async fn verified_driver(engine: &Engine, tag: &str) -> (Profile, User) {
    std::env::set_var("ADMIN_EMAIL", "root@example.com");

    let profile = engine
        .provision_profile(identity(tag), Role::Driver)
        .await
        .unwrap();

    let root = engine
        .provision_profile(
            Identity {
                external_id: "ext-root".into(),
                display_name: "root".into(),
                email: "root@example.com".into(),
                photo_url: None,
            },
            Role::Admin,
        )
        .await
        .unwrap();

    let profile = engine
        .set_driver_verification(User::from(&root), profile.id, true)
        .await
        .unwrap();
    let user = User::from(&profile);

    (profile, user)
}

#[tokio::test(flavor = "multi_thread")]
async fn racing_accepts_produce_exactly_one_winner() {
    let engine = Arc::new(Engine::new(Store::temporary().unwrap()).unwrap());
    let (_, user) = passenger(&engine, "bola").await;
    let (_, driver) = verified_driver(&engine, "femi").await;

    let ride = engine
        .create_ride(user.clone(), "Yaba".into(), "Lekki".into())
        .await
        .unwrap();

    let first = engine
        .submit_bid(driver.clone(), ride.id, 3000, None)
        .await
        .unwrap();
    let second = engine
        .submit_bid(driver, ride.id, 2500, None)
        .await
        .unwrap();

    let mut handles = Vec::new();

    for bid_id in [first.id, second.id] {
        let engine = engine.clone();
        let user = user.clone();

        handles.push(tokio::spawn(async move {
            engine.accept_bid(user, ride.id, bid_id).await
        }));
    }

    let mut winners = Vec::new();
    let mut losers = Vec::new();

    for handle in handles {
        match handle.await.unwrap() {
            Ok(accepted) => winners.push(accepted),
            Err(err) => losers.push(err),
        }
    }

    assert_eq!(winners.len(), 1);
    assert_eq!(losers.len(), 1);
    assert_eq!(losers[0].code, 100);

    // the stored document agrees with the winner, snapshot and all
    let stored = engine
        .find_ride(user, ride.id)
        .await
        .unwrap();
    assert_eq!(stored.status, Status::Accepted);
    assert_eq!(stored.accepted_bid_id, winners[0].accepted_bid_id);
    assert_eq!(
        stored.accepted_bid.as_ref().unwrap().id,
        stored.accepted_bid_id.unwrap()
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn racing_ratings_leave_exactly_one_row_and_one_fold() {
    let engine = Arc::new(Engine::new(Store::temporary().unwrap()).unwrap());
    let (_, user) = passenger(&engine, "bola").await;
    let (driver_profile, driver) = verified_driver(&engine, "femi").await;

    let ride = engine
        .create_ride(user.clone(), "Yaba".into(), "Lekki".into())
        .await
        .unwrap();
    let bid = engine
        .submit_bid(driver.clone(), ride.id, 3000, None)
        .await
        .unwrap();
    engine.accept_bid(user.clone(), ride.id, bid.id).await.unwrap();
    engine.complete_ride(driver, ride.id).await.unwrap();

    let mut handles = Vec::new();

    for value in [5u8, 3u8] {
        let engine = engine.clone();
        let user = user.clone();

        handles.push(tokio::spawn(async move {
            engine.submit_rating(user, ride.id, value, None).await
        }));
    }

    let mut applied = Vec::new();
    let mut rejected = Vec::new();

    for handle in handles {
        match handle.await.unwrap() {
            Ok(rating) => applied.push(rating),
            Err(err) => rejected.push(err),
        }
    }

    // exactly one submission lands, the other observes "already rated"
    assert_eq!(applied.len(), 1);
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].code, 100);

    // the aggregate folded the winning value exactly once
    let profile = engine.find_profile(driver_profile.id).await.unwrap();
    let aggregate = profile.rating.unwrap();
    assert_eq!(aggregate.count, 1);
    assert_eq!(aggregate.average, applied[0].rating as f64);
}

#[tokio::test(flavor = "multi_thread")]
async fn racing_creates_never_leave_two_active_requests() {
    let engine = Arc::new(Engine::new(Store::temporary().unwrap()).unwrap());
    let (profile, user) = passenger(&engine, "bola").await;

    let mut handles = Vec::new();

    for destination in ["Lekki", "Epe"] {
        let engine = engine.clone();
        let user = user.clone();
        let destination = destination.to_string();

        handles.push(tokio::spawn(async move {
            engine.create_ride(user, "Yaba".into(), destination).await
        }));
    }

    let mut created = Vec::new();
    let mut conflicted = Vec::new();

    for handle in handles {
        match handle.await.unwrap() {
            Ok(ride) => created.push(ride),
            Err(err) => conflicted.push(err),
        }
    }

    assert_eq!(created.len(), 1);
    assert_eq!(conflicted.len(), 1);
    assert_eq!(conflicted[0].code, 104);

    // the store holds a single live request for the passenger
    let active = engine.active_ride(user).await.unwrap().unwrap();
    assert_eq!(active.id, created[0].id);
    assert_eq!(active.passenger.id, profile.id);
}
