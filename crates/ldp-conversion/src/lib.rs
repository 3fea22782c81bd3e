//! Representation conversion for the LDP server.
//!
//! [`PreferenceNegotiator`] picks an output media type from weighted caller
//! preferences; converters such as [`TurtleQuadConverter`] stream data from
//! one media type to another and are composed as handlers.

pub mod converter;
pub mod negotiation;

pub use converter::{
    has_media_type, ConversionArgs, RepresentationConverter, SharedConverter,
    TurtleQuadConverter,
};
pub use negotiation::PreferenceNegotiator;
