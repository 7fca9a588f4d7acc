//! Blocking clients for the three remote collaborators: the static-map
//! renderer, the geocoder (forward and reverse), and the business search.
//! Every user interaction issues its request serially on the calling thread,
//! matching the app's request-per-action model.

pub mod client;
pub mod geocode;
pub mod search;
pub mod static_map;
