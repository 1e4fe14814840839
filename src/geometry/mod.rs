//! Immutable geometric values: [`Point`], [`Polyline`], [`Envelope`],
//! bound to a topology by a [`GeometryFactory`].

mod envelope;
mod error;
mod factory;
mod point;
mod polyline;

pub mod hull;
pub mod simplify;
pub mod sweep;

pub use envelope::Envelope;
pub use error::GeometryError;
pub use factory::{FactoryKind, GeometryFactory};
pub use point::Point;
pub use polyline::Polyline;

/// Default coordinate-equality tolerance, in the units of the factory's
/// topology (degrees for geoidal factories, the same planar unit as the
/// input data for planar factories). Chosen to be well under GPS noise
/// floor while still discriminating distinct road nodes.
pub const PRECISION_TOLERANCE: f64 = 1e-9;
