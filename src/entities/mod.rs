mod bid;
mod fare;
mod location;
mod message;
mod profile;
mod rating;
mod ride;

pub use bid::{Bid, BidView, DriverSnapshot};
pub use fare::{FareConfig, FareConfigPatch, FareEstimate, FARE_ROUNDING_UNIT};
pub use location::{eta_minutes, haversine_km, Coordinates, AVERAGE_SPEED_KMH, EARTH_RADIUS_KM};
pub use message::Message;
pub use profile::{CarDetails, Profile, RatingAggregate, Role};
pub use rating::Rating;
pub use ride::{PassengerSnapshot, Ride, Status};
