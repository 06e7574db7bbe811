//! Value and feature types
//!
//! - `ValueType`: the primitive type of a join key column
//! - `FeatureType`: the tensor type a feature value is declared as

pub mod feature_type;
pub mod value_type;

pub use feature_type::FeatureType;
pub use value_type::ValueType;
