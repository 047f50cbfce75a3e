//! Maps adapter module. Implements Geocoder and PlacesGateway.

pub mod google_maps;

pub use google_maps::GoogleMapsAdapter;
