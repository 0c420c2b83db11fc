use oso::{Oso, PolarClass};

use crate::auth::{Platform, User};
use crate::entities::Ride;

pub fn new() -> Oso {
    let mut o = Oso::new();

    o.register_class(Platform::get_polar_class()).unwrap();
    o.register_class(User::get_polar_class()).unwrap();
    o.register_class(Ride::get_polar_class()).unwrap();

    o.load_str(include_str!("rules.polar")).unwrap();

    o
}

#[test]
fn passenger_owns_their_ride() {
    use crate::entities::{Profile, Role};
    use crate::external::identity::Identity;

    let authorizor = new();

    let profile = Profile::new(
        Identity {
            external_id: "ext-p".into(),
            display_name: "Bola".into(),
            email: "bola@example.com".into(),
            photo_url: None,
        },
        Role::Passenger,
    );
    let passenger = User::from(&profile);
    let ride = Ride::new(&profile, "Yaba".into(), "Lekki".into(), 1);

    assert!(authorizor
        .is_allowed(passenger.clone(), "read", ride.clone())
        .unwrap());
    assert!(authorizor
        .is_allowed(passenger.clone(), "cancel", ride.clone())
        .unwrap());
    assert!(authorizor
        .is_allowed(passenger.clone(), "accept_bid", ride.clone())
        .unwrap());

    // but not someone else's ride
    let other_profile = Profile::new(
        Identity {
            external_id: "ext-q".into(),
            display_name: "Chi".into(),
            email: "chi@example.com".into(),
            photo_url: None,
        },
        Role::Passenger,
    );
    let other = User::from(&other_profile);

    assert!(!authorizor
        .is_allowed(other.clone(), "read", ride.clone())
        .unwrap());
    assert!(!authorizor.is_allowed(other, "cancel", ride).unwrap());
}

#[test]
fn drivers_see_and_bid_on_pending_rides_only() {
    use crate::entities::{Bid, Profile, Role};
    use crate::external::identity::Identity;

    let authorizor = new();

    let passenger_profile = Profile::new(
        Identity {
            external_id: "ext-p".into(),
            display_name: "Bola".into(),
            email: "bola@example.com".into(),
            photo_url: None,
        },
        Role::Passenger,
    );
    let driver_profile = Profile::new(
        Identity {
            external_id: "ext-d".into(),
            display_name: "Femi".into(),
            email: "femi@example.com".into(),
            photo_url: None,
        },
        Role::Driver,
    );
    let driver = User::from(&driver_profile);
    let mut ride = Ride::new(&passenger_profile, "Yaba".into(), "Lekki".into(), 1);

    assert!(authorizor
        .is_allowed(driver.clone(), "read", ride.clone())
        .unwrap());
    assert!(authorizor
        .is_allowed(driver.clone(), "bid", ride.clone())
        .unwrap());
    assert!(!authorizor
        .is_allowed(driver.clone(), "complete", ride.clone())
        .unwrap());

    ride.accept_bid(Bid::new(ride.id, &driver_profile, 3000, None, 2))
        .unwrap();

    // once matched, the accepted driver may complete and message, and other
    // drivers lose sight of the request
    assert!(authorizor
        .is_allowed(driver.clone(), "complete", ride.clone())
        .unwrap());
    assert!(authorizor
        .is_allowed(driver.clone(), "message", ride.clone())
        .unwrap());

    let rival_profile = Profile::new(
        Identity {
            external_id: "ext-r".into(),
            display_name: "Seyi".into(),
            email: "seyi@example.com".into(),
            photo_url: None,
        },
        Role::Driver,
    );
    let rival = User::from(&rival_profile);

    assert!(!authorizor.is_allowed(rival, "read", ride).unwrap());
}

#[test]
fn platform_actions_are_role_gated() {
    use crate::entities::{Profile, Role};
    use crate::external::identity::Identity;

    let authorizor = new();

    let admin_profile = Profile::new(
        Identity {
            external_id: "ext-a".into(),
            display_name: "Root".into(),
            email: "root@example.com".into(),
            photo_url: None,
        },
        Role::Admin,
    );
    let admin = User::from(&admin_profile);

    let passenger_profile = Profile::new(
        Identity {
            external_id: "ext-p".into(),
            display_name: "Bola".into(),
            email: "bola@example.com".into(),
            photo_url: None,
        },
        Role::Passenger,
    );
    let passenger = User::from(&passenger_profile);

    assert!(authorizor
        .is_allowed(admin.clone(), "administer", Platform::default())
        .unwrap());
    assert!(!authorizor
        .is_allowed(passenger.clone(), "administer", Platform::default())
        .unwrap());

    assert!(authorizor
        .is_allowed(passenger.clone(), "create_ride", Platform::default())
        .unwrap());
    assert!(!authorizor
        .is_allowed(admin.clone(), "create_ride", Platform::default())
        .unwrap());

    assert!(!authorizor
        .is_allowed(passenger, "list_available", Platform::default())
        .unwrap());
}
