mod accumulator;

pub use self::accumulator::{Accumulator, Direction};
